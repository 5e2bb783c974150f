//! # GET
//! src/handlers/get.rs
//!
//! Lee un archivo con el lock de su URI en modo lector. Varios GET a la misma
//! URI avanzan en paralelo; un PUT en curso (o esperando) los detiene.

use super::{open_error_response, FileHandlers};
use crate::http::{Request, Response, StatusCode};
use crate::server::Connection;
use std::fs::File;
use std::io::{Read, Write};
use std::path::Path;

/// Resultado de intentar servir un archivo
enum GetOutcome {
    /// El body ya salió por el socket con este resultado
    Sent(StatusCode),

    /// Falta enviar esta respuesta
    Reply(Response),
}

impl GetOutcome {
    fn status(&self) -> StatusCode {
        match self {
            GetOutcome::Sent(status) => *status,
            GetOutcome::Reply(response) => response.status(),
        }
    }
}

impl FileHandlers {
    /// Atiende un GET
    pub fn get<S: Read + Write>(&self, conn: &mut Connection<S>, request: &Request) {
        let lock = match self.lock_for(request) {
            Ok(lock) => lock,
            Err(response) => return Self::respond(conn, &response),
        };

        let outcome = {
            let _reader = lock.read();
            let outcome = self.serve_file(conn, &self.resolve(request));
            self.log(request, outcome.status());
            outcome
        };

        if let GetOutcome::Reply(response) = outcome {
            Self::respond(conn, &response);
        }
    }

    fn serve_file<S: Read + Write>(&self, conn: &mut Connection<S>, path: &Path) -> GetOutcome {
        let mut file = match File::open(path) {
            Ok(file) => file,
            Err(e) => {
                tracing::debug!(path = %path.display(), error = %e, "open falló");
                return GetOutcome::Reply(open_error_response(&e));
            }
        };

        let metadata = match file.metadata() {
            Ok(metadata) => metadata,
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "fstat falló");
                return GetOutcome::Reply(Response::status_only(StatusCode::InternalServerError));
            }
        };

        if metadata.is_dir() {
            return GetOutcome::Reply(Response::status_only(StatusCode::Forbidden));
        }

        match conn.send_file(&mut file, metadata.len()) {
            None => GetOutcome::Sent(StatusCode::Ok),
            Some(error) => GetOutcome::Sent(error.status()),
        }
    }
}
