//! # PUT
//! src/handlers/put.rs
//!
//! Crea o reemplaza un archivo con el lock de su URI en modo escritor.
//! Responde 201 si el archivo no existía y 200 si existía; un error durante
//! la recepción del body tiene prioridad sobre ambos.

use super::{open_error_response, FileHandlers};
use crate::http::{Request, Response, StatusCode};
use crate::server::Connection;
use std::fs::OpenOptions;
use std::io::{Read, Write};
use std::os::unix::fs::OpenOptionsExt;
use std::path::Path;

/// Permisos de los archivos creados (solo el dueño lee/escribe)
const FILE_MODE: u32 = 0o600;

impl FileHandlers {
    /// Atiende un PUT
    pub fn put<S: Read + Write>(&self, conn: &mut Connection<S>, request: &Request) {
        let lock = match self.lock_for(request) {
            Ok(lock) => lock,
            Err(response) => return Self::respond(conn, &response),
        };

        let response = {
            let _writer = lock.write();
            let response = self.store_file(conn, request, &self.resolve(request));
            self.log(request, response.status());
            response
        };

        Self::respond(conn, &response);
    }

    fn store_file<S: Read + Write>(
        &self,
        conn: &mut Connection<S>,
        request: &Request,
        path: &Path,
    ) -> Response {
        // Antes de abrir: open con O_CREAT haría que siempre exista
        let existed = path.exists();

        let mut file = match OpenOptions::new()
            .write(true)
            .create(true)
            .truncate(true)
            .mode(FILE_MODE)
            .open(path)
        {
            Ok(file) => file,
            Err(e) => {
                tracing::debug!(path = %path.display(), error = %e, "open falló");
                return open_error_response(&e);
            }
        };

        let length = request.content_length().unwrap_or(0);
        if let Some(error) = conn.recv_file(&mut file, length) {
            return error;
        }

        if existed {
            Response::status_only(StatusCode::Ok)
        } else {
            Response::status_only(StatusCode::Created)
        }
    }
}
