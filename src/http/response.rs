//! # Construcción de Respuestas HTTP
//! src/http/response.rs
//!
//! API para construir respuestas HTTP y convertirlas a bytes.
//!
//! ## Formato
//!
//! ```text
//! HTTP/1.1 201 Created\r\n
//! Content-Length: 8\r\n
//! \r\n
//! Created\n
//! ```
//!
//! Las respuestas de solo-estado llevan como body la reason phrase seguida de
//! `\n`. El body de un GET exitoso no pasa por aquí: se transmite directo desde
//! el archivo (ver `server::connection`), usando solo la cabecera generada por
//! [`Response::head_bytes`].

use super::StatusCode;
use std::collections::HashMap;

/// Representa una respuesta HTTP completa
#[derive(Debug, Clone)]
pub struct Response {
    /// Código de estado HTTP
    status: StatusCode,

    /// Headers HTTP. Usamos HashMap para evitar duplicados
    headers: HashMap<String, String>,

    /// Cuerpo de la respuesta (puede ser vacío)
    body: Vec<u8>,
}

impl Response {
    /// Crea una respuesta sin headers ni body
    pub fn new(status: StatusCode) -> Self {
        Self {
            status,
            headers: HashMap::new(),
            body: Vec::new(),
        }
    }

    /// Respuesta cuyo body es la reason phrase del código
    ///
    /// # Ejemplo
    /// ```
    /// use httpserver::http::{Response, StatusCode};
    ///
    /// let response = Response::status_only(StatusCode::NotFound);
    /// assert_eq!(response.body(), b"Not Found\n");
    /// ```
    pub fn status_only(status: StatusCode) -> Self {
        Self::new(status).with_body(&format!("{}\n", status.reason_phrase()))
    }

    /// Agrega un header a la respuesta. Si ya existe, se sobrescribe.
    pub fn with_header(mut self, name: &str, value: &str) -> Self {
        self.headers.insert(name.to_string(), value.to_string());
        self
    }

    /// Establece el body y calcula `Content-Length`
    pub fn with_body(mut self, body: &str) -> Self {
        self.body = body.as_bytes().to_vec();
        self.headers.insert(
            "Content-Length".to_string(),
            self.body.len().to_string()
        );
        self
    }

    /// Status line + headers + línea vacía, sin body
    pub fn head_bytes(&self) -> Vec<u8> {
        let mut result = Vec::new();

        let status_line = format!("HTTP/1.1 {}\r\n", self.status);
        result.extend_from_slice(status_line.as_bytes());

        for (name, value) in &self.headers {
            let header_line = format!("{}: {}\r\n", name, value);
            result.extend_from_slice(header_line.as_bytes());
        }

        result.extend_from_slice(b"\r\n");
        result
    }

    /// Convierte la respuesta completa a bytes listos para el socket
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut result = self.head_bytes();
        result.extend_from_slice(&self.body);
        result
    }

    /// Obtiene el código de estado de la respuesta
    pub fn status(&self) -> StatusCode {
        self.status
    }

    /// Obtiene una referencia al body
    pub fn body(&self) -> &[u8] {
        &self.body
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_response() {
        let response = Response::new(StatusCode::Ok);
        assert_eq!(response.status(), StatusCode::Ok);
        assert!(response.body().is_empty());
        assert!(!String::from_utf8(response.to_bytes()).unwrap().contains("Content-Length"));
    }

    #[test]
    fn test_status_only_sets_length() {
        let response = Response::status_only(StatusCode::Created);
        assert_eq!(response.body(), b"Created\n");
        let text = String::from_utf8(response.to_bytes()).unwrap();
        assert!(text.contains("Content-Length: 8\r\n"));
    }

    #[test]
    fn test_head_bytes_has_no_body() {
        let response = Response::new(StatusCode::Ok)
            .with_header("Content-Length", "1024");

        let text = String::from_utf8(response.head_bytes()).unwrap();
        assert!(text.starts_with("HTTP/1.1 200 OK\r\n"));
        assert!(text.contains("Content-Length: 1024\r\n"));
        assert!(text.ends_with("\r\n\r\n"));
    }

    #[test]
    fn test_to_bytes() {
        let response = Response::status_only(StatusCode::NotImplemented);
        let text = String::from_utf8(response.to_bytes()).unwrap();

        assert!(text.starts_with("HTTP/1.1 501 Not Implemented\r\n"));
        assert!(text.contains("Content-Length: 16\r\n"));
        assert!(text.ends_with("\r\n\r\nNot Implemented\n"));
    }
}
