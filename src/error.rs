//! # Errores del Servidor
//! src/error.rs
//!
//! Errores fatales de arranque. Los errores por request (parsing, archivos,
//! transferencias) nunca llegan aquí: se convierten en una respuesta HTTP.

use std::io;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ServerError {
    /// Configuración inválida (ver `Config::validate`)
    #[error("invalid configuration: {0}")]
    Config(String),

    /// No se pudo abrir el socket de escucha
    #[error("failed to bind {address}: {source}")]
    Bind {
        address: String,
        #[source]
        source: io::Error,
    },

    /// No se pudo crear un thread del pool
    #[error("failed to spawn worker thread: {0}")]
    Spawn(#[source] io::Error),
}
