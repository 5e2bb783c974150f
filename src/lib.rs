//! # HTTP File Server
//! src/lib.rs
//!
//! Servidor HTTP concurrente de archivos que atiende GET y PUT sobre el
//! sistema de archivos local, con exclusión lector/escritor por URI.
//!
//! ## Arquitectura
//!
//! ```text
//! Acceptor → BoundedQueue → Worker → Dispatcher → (LockRegistry → RwLock) → archivo → respuesta
//! ```
//!
//! - `config`: argumentos CLI y variables de entorno
//! - `server`: socket, acceptor y lectura/escritura de cada conexión
//! - `workers`: cola acotada y pool fijo de threads
//! - `router`: despacho por método
//! - `handlers`: GET y PUT
//! - `locks`: un lock lector/escritor por URI
//! - `http`: parsing de requests y construcción de responses
//! - `logging`: tracing y access log
//!
//! ## Ejemplo de uso
//!
//! ```no_run
//! use httpserver::config::Config;
//! use httpserver::server::Server;
//!
//! let mut config = Config::default();
//! config.port = 8080;
//! Server::new(config).run().expect("Error al iniciar servidor");
//! ```

pub mod config;
pub mod error;
pub mod handlers;
pub mod http;
pub mod locks;
pub mod logging;
pub mod router;
pub mod server;
pub mod workers;

pub use error::ServerError;
