//! # HTTP File Server - Entry Point
//! src/main.rs
//!
//! Uso: `httpserver [-t THREADS] PORT`
//!
//! Sale con 1 ante argumentos inválidos o si no se puede abrir el puerto.

use clap::Parser;
use httpserver::config::Config;
use httpserver::logging;
use httpserver::server::Server;
use std::process::ExitCode;

fn main() -> ExitCode {
    let config = match Config::try_parse() {
        Ok(config) => config,
        Err(e) => {
            // --help / --version no son errores
            let code = if e.use_stderr() { ExitCode::FAILURE } else { ExitCode::SUCCESS };
            let _ = e.print();
            return code;
        }
    };

    logging::init_tracing(&config.log_level);

    let server = Server::new(config);

    // Solo retorna si la configuración es inválida o el arranque falla
    match server.run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!(error = %e, "error fatal");
            eprintln!("httpserver: {}", e);
            ExitCode::FAILURE
        }
    }
}
