//! # Dispatcher de Requests
//! src/router/mod.rs
//!
//! Procesa una conexión completa:
//!
//! ```text
//! parse ──error──▶ respuesta del parser (sin lock, sin log)
//!   │
//!   ├─ GET ─────▶ FileHandlers::get
//!   ├─ PUT ─────▶ FileHandlers::put
//!   └─ otro ────▶ 501 Not Implemented (sin lock, sin log)
//! ```
//!
//! Al terminar, la conexión se cierra al soltar el stream.

use crate::handlers::FileHandlers;
use crate::http::{Method, ParseError, Response, StatusCode};
use crate::server::Connection;
use std::io::{Read, Write};

/// Enruta cada request a su handler
pub struct Dispatcher {
    files: FileHandlers,
}

impl Dispatcher {
    pub fn new(files: FileHandlers) -> Self {
        Self { files }
    }

    /// Atiende un request y cierra la conexión
    pub fn handle_connection<S: Read + Write>(&self, stream: S) {
        let mut conn = Connection::new(stream);

        let request = match conn.parse() {
            Ok(request) => request,
            Err(ParseError::EmptyRequest) => {
                tracing::debug!("conexión cerrada sin datos");
                return;
            }
            Err(e) => {
                tracing::debug!(error = %e, "request inválido");
                Self::send(&mut conn, &e.response());
                return;
            }
        };

        match request.method() {
            Method::GET => self.files.get(&mut conn, &request),
            Method::PUT => self.files.put(&mut conn, &request),
            Method::Unsupported => {
                tracing::debug!(method = request.method_name(), "método no implementado");
                Self::send(&mut conn, &Response::status_only(StatusCode::NotImplemented));
            }
        }
    }

    fn send<S: Read + Write>(conn: &mut Connection<S>, response: &Response) {
        if let Err(e) = conn.send_response(response) {
            tracing::debug!(error = %e, "no se pudo enviar la respuesta");
        }
    }
}
