//! # Parsing de Requests HTTP
//! src/http/request.rs
//!
//! Parser de la cabecera (head) de un request HTTP/1.x.
//!
//! ## Formato
//!
//! ```text
//! PUT /notes.txt HTTP/1.1\r\n
//! Content-Length: 5\r\n
//! Request-Id: 7\r\n
//! \r\n
//! hello
//! ```
//!
//! El parser solo recibe los bytes hasta la línea vacía. El body (PUT) lo
//! consume después `Connection::recv_file` directamente hacia el archivo.

use super::{Response, StatusCode};
use std::collections::HashMap;
use thiserror::Error;

/// Longitud máxima de la URI (incluyendo el `/` inicial)
pub const MAX_URI_LEN: usize = 2048;

/// Longitud máxima de un método
const MAX_METHOD_LEN: usize = 8;

/// Clasificación del método del request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    /// GET - Leer un archivo
    GET,

    /// PUT - Crear o reemplazar un archivo
    PUT,

    /// Cualquier otro método bien formado (se responde 501)
    Unsupported,
}

impl Method {
    fn from_token(s: &str) -> Self {
        match s {
            "GET" => Method::GET,
            "PUT" => Method::PUT,
            _ => Method::Unsupported,
        }
    }
}

/// Errores que pueden ocurrir durante el parsing
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    /// El peer cerró sin enviar nada
    #[error("Empty request")]
    EmptyRequest,

    /// El peer cerró antes de terminar los headers
    #[error("Incomplete HTTP request")]
    IncompleteRequest,

    /// La cabecera no cabe en el buffer
    #[error("Request head exceeds {0} bytes")]
    HeadTooLarge(usize),

    /// Formato inválido de la request line
    #[error("Invalid request line format")]
    InvalidRequestLine,

    /// Método con caracteres o longitud inválidos
    #[error("Invalid HTTP method: {0}")]
    InvalidMethod(String),

    /// URI fuera del alfabeto permitido o con segmentos `.`/`..`
    #[error("Invalid URI: {0}")]
    InvalidUri(String),

    /// Versión con formato distinto de `HTTP/d.d`
    #[error("Invalid HTTP version: {0}")]
    InvalidHttpVersion(String),

    /// Versión bien formada pero no soportada
    #[error("Unsupported HTTP version: {0}")]
    UnsupportedVersion(String),

    /// Header malformado
    #[error("Invalid header: {0}")]
    InvalidHeader(String),

    /// PUT sin Content-Length
    #[error("Missing Content-Length")]
    MissingContentLength,

    /// Content-Length no numérico
    #[error("Invalid Content-Length: {0}")]
    InvalidContentLength(String),

    /// Error de lectura del socket
    #[error("I/O error while reading request: {0}")]
    Io(String),
}

impl ParseError {
    /// Código con el que se responde este error
    pub fn status(&self) -> StatusCode {
        match self {
            ParseError::UnsupportedVersion(_) => StatusCode::VersionNotSupported,
            _ => StatusCode::BadRequest,
        }
    }

    /// Respuesta lista para enviar al cliente
    pub fn response(&self) -> Response {
        Response::status_only(self.status())
    }
}

/// Representa un request HTTP parseado
#[derive(Debug, Clone)]
pub struct Request {
    method: Method,

    /// Método tal como llegó (ej: "DELETE")
    method_name: String,

    /// URI tal como llegó (ej: "/notes.txt"); también es la llave del lock
    uri: String,

    /// Headers con el nombre en minúsculas
    headers: HashMap<String, String>,
}

impl Request {
    /// Parsea la cabecera de un request
    ///
    /// # Ejemplo
    ///
    /// ```
    /// use httpserver::http::Request;
    /// use httpserver::http::request::Method;
    ///
    /// let raw = b"GET /hello.txt HTTP/1.1\r\nRequest-Id: 9\r\n\r\n";
    /// let request = Request::parse(raw).unwrap();
    ///
    /// assert_eq!(request.method(), Method::GET);
    /// assert_eq!(request.uri(), "/hello.txt");
    /// assert_eq!(request.header("request-id"), Some("9"));
    /// ```
    pub fn parse(head: &[u8]) -> Result<Self, ParseError> {
        let head_str = std::str::from_utf8(head)
            .map_err(|_| ParseError::InvalidRequestLine)?;

        // Sin request line (solo espacios o líneas vacías). El caso de cero
        // bytes lo detecta `Connection::parse` antes de llegar aquí.
        if head_str.trim().is_empty() {
            return Err(ParseError::InvalidRequestLine);
        }

        let mut lines = head_str.split("\r\n");
        let request_line = lines.next().ok_or(ParseError::IncompleteRequest)?;

        let (method_name, uri) = Self::parse_request_line(request_line)?;
        let headers = Self::parse_headers(lines)?;
        let method = Method::from_token(&method_name);

        let request = Request {
            method,
            method_name,
            uri,
            headers,
        };

        if method == Method::PUT {
            match request.header("Content-Length") {
                None => return Err(ParseError::MissingContentLength),
                Some(value) if value.parse::<u64>().is_err() => {
                    return Err(ParseError::InvalidContentLength(value.to_string()));
                }
                Some(_) => {}
            }
        }

        Ok(request)
    }

    /// Formato: `METHOD /uri HTTP/1.1`
    fn parse_request_line(line: &str) -> Result<(String, String), ParseError> {
        let parts: Vec<&str> = line.split(' ').collect();

        // Exactamente 3 partes separadas por un único espacio
        if parts.len() != 3 || parts.iter().any(|p| p.is_empty()) {
            return Err(ParseError::InvalidRequestLine);
        }

        let method = parts[0];
        if method.len() > MAX_METHOD_LEN || !method.bytes().all(|b| b.is_ascii_alphabetic()) {
            return Err(ParseError::InvalidMethod(method.to_string()));
        }

        let uri = parts[1];
        Self::validate_uri(uri)?;

        Self::validate_version(parts[2])?;

        Ok((method.to_string(), uri.to_string()))
    }

    /// Segmentos `[A-Za-z0-9._-]` separados por `/`, sin `.` ni `..`
    fn validate_uri(uri: &str) -> Result<(), ParseError> {
        let invalid = || ParseError::InvalidUri(uri.to_string());

        if uri.len() > MAX_URI_LEN {
            return Err(invalid());
        }

        let rest = uri.strip_prefix('/').ok_or_else(invalid)?;
        if rest.is_empty() {
            return Ok(());
        }

        for segment in rest.split('/') {
            let allowed = segment
                .bytes()
                .all(|b| b.is_ascii_alphanumeric() || matches!(b, b'.' | b'-' | b'_'));

            if segment.is_empty() || segment == "." || segment == ".." || !allowed {
                return Err(invalid());
            }
        }

        Ok(())
    }

    fn validate_version(version: &str) -> Result<(), ParseError> {
        let digits = version
            .strip_prefix("HTTP/")
            .map(|v| v.as_bytes())
            .filter(|v| v.len() == 3 && v[0].is_ascii_digit() && v[1] == b'.' && v[2].is_ascii_digit());

        if digits.is_none() {
            return Err(ParseError::InvalidHttpVersion(version.to_string()));
        }

        if version != "HTTP/1.1" && version != "HTTP/1.0" {
            return Err(ParseError::UnsupportedVersion(version.to_string()));
        }

        Ok(())
    }

    /// Cada header tiene formato: "Name: Value"
    fn parse_headers<'a>(
        lines: impl Iterator<Item = &'a str>,
    ) -> Result<HashMap<String, String>, ParseError> {
        let mut headers = HashMap::new();

        for line in lines {
            // La línea vacía marca el fin de los headers
            if line.is_empty() {
                break;
            }

            let (name, value) = line
                .split_once(':')
                .ok_or_else(|| ParseError::InvalidHeader(line.to_string()))?;

            let valid_name = !name.is_empty()
                && name
                    .bytes()
                    .all(|b| b.is_ascii_alphanumeric() || matches!(b, b'-' | b'_' | b'.'));

            if !valid_name {
                return Err(ParseError::InvalidHeader(line.to_string()));
            }

            headers.insert(name.to_ascii_lowercase(), value.trim().to_string());
        }

        Ok(headers)
    }

    // === Métodos públicos para acceder a los campos ===

    pub fn method(&self) -> Method {
        self.method
    }

    pub fn method_name(&self) -> &str {
        &self.method_name
    }

    pub fn uri(&self) -> &str {
        &self.uri
    }

    /// URI sin el `/` inicial, relativa al directorio raíz del servidor
    pub fn relative_path(&self) -> &str {
        self.uri.trim_start_matches('/')
    }

    /// Obtiene un header (sin distinguir mayúsculas)
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(&name.to_ascii_lowercase()).map(|s| s.as_str())
    }

    pub fn content_length(&self) -> Option<u64> {
        self.header("Content-Length").and_then(|v| v.parse().ok())
    }
}
