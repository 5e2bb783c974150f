//! # Módulo del Servidor HTTP
//! src/server/mod.rs
//!
//! - `tcp`: socket de escucha, acceptor y pool de workers
//! - `connection`: lectura del request y escritura de respuestas sobre un
//!   stream

pub mod connection;
pub mod tcp;

// Re-exportar para facilitar el uso
pub use connection::Connection;
pub use tcp::Server;
