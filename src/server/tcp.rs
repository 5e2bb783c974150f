//! # Servidor TCP con Pool de Workers
//! src/server/tcp.rs
//!
//! Un thread acceptor y N workers:
//!
//! ```text
//! acceptor ── accept() ──▶ BoundedQueue<TcpStream> ──▶ worker-i ── Dispatcher
//! ```
//!
//! El acceptor bloquea en `push` si la cola está llena; así la presión llega
//! hasta el backlog del socket y ninguna conexión aceptada se pierde.

use crate::config::Config;
use crate::error::ServerError;
use crate::handlers::FileHandlers;
use crate::locks::LockRegistry;
use crate::logging::AccessLog;
use crate::router::Dispatcher;
use crate::workers::{BoundedQueue, WorkerPool};
use std::net::{TcpListener, TcpStream};
use std::sync::Arc;

/// Servidor HTTP de archivos
pub struct Server {
    config: Config,
    registry: Arc<LockRegistry>,
    access_log: Arc<AccessLog>,
}

impl Server {
    pub fn new(config: Config) -> Self {
        Self::with_access_log(config, AccessLog::stderr())
    }

    /// Igual que `new` pero con un destino propio para el access log
    pub fn with_access_log(config: Config, access_log: AccessLog) -> Self {
        let registry = match config.max_locks {
            Some(limit) => LockRegistry::with_limit(limit),
            None => LockRegistry::new(),
        };

        Self {
            config,
            registry: Arc::new(registry),
            access_log: Arc::new(access_log),
        }
    }

    /// Registro de locks compartido con los workers
    pub fn registry(&self) -> Arc<LockRegistry> {
        Arc::clone(&self.registry)
    }

    /// Abre el socket de escucha
    pub fn bind(&self) -> Result<TcpListener, ServerError> {
        let address = self.config.address();
        TcpListener::bind(&address).map_err(|source| ServerError::Bind { address, source })
    }

    /// `bind` + `serve`. Solo retorna si falla el arranque.
    pub fn run(&self) -> Result<(), ServerError> {
        self.config.validate().map_err(ServerError::Config)?;
        let listener = self.bind()?;
        self.serve(listener)
    }

    /// Lanza el pool y acepta conexiones para siempre
    pub fn serve(&self, listener: TcpListener) -> Result<(), ServerError> {
        let queue: Arc<BoundedQueue<TcpStream>> =
            Arc::new(BoundedQueue::new(self.config.queue_capacity()));

        let files = FileHandlers::new(
            &self.config.root,
            Arc::clone(&self.registry),
            Arc::clone(&self.access_log),
        );
        let dispatcher = Dispatcher::new(files);

        let pool = WorkerPool::spawn(self.config.threads, Arc::clone(&queue), move |stream: TcpStream| {
            dispatcher.handle_connection(stream)
        })
        .map_err(ServerError::Spawn)?;

        let local = listener
            .local_addr()
            .map(|addr| addr.to_string())
            .unwrap_or_else(|_| self.config.address());

        tracing::info!(
            address = %local,
            workers = pool.size(),
            queue = queue.capacity(),
            root = %self.config.root,
            "servidor escuchando"
        );

        for stream in listener.incoming() {
            match stream {
                Ok(stream) => queue.push(stream),
                Err(e) => {
                    tracing::warn!(error = %e, "error al aceptar conexión");
                }
            }
        }

        Ok(())
    }
}
