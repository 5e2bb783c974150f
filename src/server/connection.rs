//! # Conexión HTTP
//! src/server/connection.rs
//!
//! Envuelve el stream de un cliente y ofrece las cuatro operaciones que usan
//! los handlers:
//!
//! - `parse`: lee la cabecera del request
//! - `send_file`: transmite un archivo como body de una respuesta 200
//! - `recv_file`: copia el body del request a un archivo
//! - `send_response`: escribe una respuesta completa
//!
//! `send_file` y `recv_file` retornan `None` si todo salió bien, o la
//! respuesta de error a usar.

use crate::http::{ParseError, Request, Response, StatusCode};
use std::io::{self, Read, Write};

/// Tamaño máximo de la cabecera de un request
pub const MAX_HEAD_SIZE: usize = 8192;

/// Tamaño de los bloques al copiar bodies
const CHUNK_SIZE: usize = 8192;

/// Conexión con un cliente
pub struct Connection<S> {
    stream: S,

    /// Bytes del body leídos junto con la cabecera
    pending: Vec<u8>,
}

impl<S: Read + Write> Connection<S> {
    pub fn new(stream: S) -> Self {
        Self {
            stream,
            pending: Vec::new(),
        }
    }

    /// Lee hasta la línea vacía y parsea la cabecera
    ///
    /// Lo que llegue después de `\r\n\r\n` queda guardado para `recv_file`.
    pub fn parse(&mut self) -> Result<Request, ParseError> {
        let mut buffer = Vec::with_capacity(1024);
        let mut chunk = [0u8; 1024];

        let head_end = loop {
            if let Some(pos) = find_head_end(&buffer) {
                break pos;
            }

            if buffer.len() >= MAX_HEAD_SIZE {
                return Err(ParseError::HeadTooLarge(MAX_HEAD_SIZE));
            }

            let bytes_read = match self.stream.read(&mut chunk) {
                Ok(n) => n,
                Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                Err(e) => return Err(ParseError::Io(e.to_string())),
            };

            if bytes_read == 0 {
                return Err(if buffer.is_empty() {
                    ParseError::EmptyRequest
                } else {
                    ParseError::IncompleteRequest
                });
            }

            buffer.extend_from_slice(&chunk[..bytes_read]);
        };

        if head_end > MAX_HEAD_SIZE {
            return Err(ParseError::HeadTooLarge(MAX_HEAD_SIZE));
        }

        self.pending = buffer.split_off(head_end);
        Request::parse(&buffer)
    }

    /// Escribe una respuesta completa
    pub fn send_response(&mut self, response: &Response) -> io::Result<()> {
        self.stream.write_all(&response.to_bytes())?;
        self.stream.flush()
    }

    /// Envía `size` bytes de `file` como body de un 200 OK
    ///
    /// Una vez enviada la cabecera ya no se puede cambiar el código, así que
    /// la respuesta de error retornada solo sirve para registrar el resultado.
    pub fn send_file<R: Read>(&mut self, file: &mut R, size: u64) -> Option<Response> {
        let head = Response::new(StatusCode::Ok)
            .with_header("Content-Length", &size.to_string())
            .head_bytes();

        if let Err(e) = self.stream.write_all(&head) {
            tracing::debug!(error = %e, "no se pudo enviar la cabecera");
            return Some(Response::status_only(StatusCode::InternalServerError));
        }

        match io::copy(&mut file.take(size), &mut self.stream) {
            Ok(sent) if sent == size => {}
            Ok(sent) => {
                tracing::warn!(sent, size, "el archivo terminó antes de lo esperado");
                return Some(Response::status_only(StatusCode::InternalServerError));
            }
            Err(e) => {
                tracing::debug!(error = %e, "fallo enviando el archivo");
                return Some(Response::status_only(StatusCode::InternalServerError));
            }
        }

        match self.stream.flush() {
            Ok(()) => None,
            Err(_) => Some(Response::status_only(StatusCode::InternalServerError)),
        }
    }

    /// Copia `length` bytes del body del request a `file`
    ///
    /// Un body más corto que `length` produce 400; un error de escritura en
    /// el archivo produce 500.
    pub fn recv_file<W: Write>(&mut self, file: &mut W, length: u64) -> Option<Response> {
        let mut remaining = length;

        let pending = std::mem::take(&mut self.pending);
        let from_pending = pending.len().min(usize::try_from(remaining).unwrap_or(usize::MAX));
        if let Err(e) = file.write_all(&pending[..from_pending]) {
            tracing::warn!(error = %e, "fallo escribiendo el archivo");
            return Some(Response::status_only(StatusCode::InternalServerError));
        }
        remaining -= from_pending as u64;

        let mut chunk = vec![0u8; CHUNK_SIZE];
        while remaining > 0 {
            let want = remaining.min(CHUNK_SIZE as u64) as usize;

            let bytes_read = match self.stream.read(&mut chunk[..want]) {
                Ok(0) => {
                    tracing::debug!(remaining, "el cliente cerró antes de enviar todo el body");
                    return Some(Response::status_only(StatusCode::BadRequest));
                }
                Ok(n) => n,
                Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                Err(e) => {
                    tracing::debug!(error = %e, "fallo leyendo el body");
                    return Some(Response::status_only(StatusCode::BadRequest));
                }
            };

            if let Err(e) = file.write_all(&chunk[..bytes_read]) {
                tracing::warn!(error = %e, "fallo escribiendo el archivo");
                return Some(Response::status_only(StatusCode::InternalServerError));
            }
            remaining -= bytes_read as u64;
        }

        match file.flush() {
            Ok(()) => None,
            Err(_) => Some(Response::status_only(StatusCode::InternalServerError)),
        }
    }

    pub fn into_inner(self) -> S {
        self.stream
    }
}

/// Posición justo después de `\r\n\r\n`, si ya llegó
fn find_head_end(buffer: &[u8]) -> Option<usize> {
    buffer.windows(4).position(|w| w == b"\r\n\r\n").map(|pos| pos + 4)
}
