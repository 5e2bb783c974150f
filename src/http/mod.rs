//! # Módulo HTTP
//!
//! Implementa el subconjunto de HTTP/1.x que necesita el servidor de archivos,
//! sin librerías de alto nivel:
//!
//! - Parsing de la cabecera de requests (request line + headers)
//! - Construcción de responses
//! - Códigos de estado
//!
//! Cada conexión lleva un único request y una única respuesta; después se
//! cierra (no hay conexiones persistentes).
//!
//! ### Formato de Request
//!
//! ```text
//! GET /path HTTP/1.1\r\n
//! Request-Id: 17\r\n
//! \r\n
//! ```
//!
//! ### Formato de Response
//!
//! ```text
//! HTTP/1.1 404 Not Found\r\n
//! Content-Length: 10\r\n
//! \r\n
//! Not Found
//! ```

pub mod request;   // Parsing de HTTP requests
pub mod response;  // Construcción de HTTP responses
pub mod status;    // Códigos de estado HTTP

// Re-exportamos los tipos principales para facilitar su uso
pub use request::{Method, ParseError, Request};
pub use response::Response;
pub use status::StatusCode;
