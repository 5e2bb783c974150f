//! # Handlers de Archivos
//! src/handlers/mod.rs
//!
//! GET y PUT sobre el sistema de archivos local. Cada handler:
//!
//! 1. Obtiene el lock de la URI desde el [`LockRegistry`]
//! 2. Lo toma en modo lector (GET) o escritor (PUT)
//! 3. Abre el archivo y transfiere el body
//! 4. Registra la línea del access log mientras aún tiene el lock
//!
//! El lock se suelta al salir del scope del guard, en cualquier rama.

pub mod get;
pub mod put;

use crate::http::{Request, Response, StatusCode};
use crate::locks::{LockRegistry, UriLock};
use crate::logging::AccessLog;
use crate::server::Connection;
use std::io::{self, Read, Write};
use std::path::PathBuf;
use std::sync::Arc;

/// Estado compartido por los handlers de GET y PUT
pub struct FileHandlers {
    root: PathBuf,
    locks: Arc<LockRegistry>,
    access_log: Arc<AccessLog>,
}

impl FileHandlers {
    pub fn new(root: impl Into<PathBuf>, locks: Arc<LockRegistry>, access_log: Arc<AccessLog>) -> Self {
        Self {
            root: root.into(),
            locks,
            access_log,
        }
    }

    /// Ruta en disco de la URI del request
    fn resolve(&self, request: &Request) -> PathBuf {
        let relative = request.relative_path();
        if relative.is_empty() {
            self.root.clone()
        } else {
            self.root.join(relative)
        }
    }

    /// Lock de la URI del request
    ///
    /// Si el registro no puede crear la entrada, el request termina con 500
    /// (ya registrado en el access log) y el resto del servidor sigue igual.
    fn lock_for(&self, request: &Request) -> Result<Arc<UriLock>, Response> {
        self.locks.acquire_or_create(request.uri()).map_err(|e| {
            tracing::error!(error = %e, "sin lock para el request");
            self.log(request, StatusCode::InternalServerError);
            Response::status_only(StatusCode::InternalServerError)
        })
    }

    fn respond<S: Read + Write>(conn: &mut Connection<S>, response: &Response) {
        if let Err(e) = conn.send_response(response) {
            tracing::debug!(error = %e, status = response.status().as_u16(), "no se pudo enviar la respuesta");
        }
    }

    fn log(&self, request: &Request, status: StatusCode) {
        self.access_log.record(
            request.method_name(),
            request.uri(),
            status,
            request.header("Request-Id"),
        );
    }
}

/// Traduce el error de `open` a una respuesta
///
/// Permiso denegado → 403, no existe → 404, cualquier otro → 500.
pub fn open_error_response(error: &io::Error) -> Response {
    let status = match error.kind() {
        io::ErrorKind::PermissionDenied => StatusCode::Forbidden,
        io::ErrorKind::NotFound => StatusCode::NotFound,
        _ => StatusCode::InternalServerError,
    };

    Response::status_only(status)
}
