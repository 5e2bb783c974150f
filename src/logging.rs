//! # Logging
//! src/logging.rs
//!
//! Dos salidas distintas, ambas a stderr por defecto:
//!
//! - **Diagnóstico**: `tracing` con un subscriber `fmt` filtrado por
//!   `RUST_LOG` o por `--log-level`.
//! - **Access log**: una línea por request GET/PUT completado, sin filtro:
//!
//! ```text
//! METHOD,URI,STATUS_CODE,REQUEST_ID
//! GET,/a.txt,200,0
//! PUT,/b.txt,201,17
//! ```

use crate::http::StatusCode;
use parking_lot::Mutex;
use std::io::{self, Write};
use tracing_subscriber::EnvFilter;

/// Instala el subscriber global de `tracing`
///
/// `RUST_LOG` tiene prioridad sobre `level`. Llamarla más de una vez no hace
/// nada.
pub fn init_tracing(level: &str) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("httpserver={}", level)));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_thread_names(true)
        .try_init();
}

/// Escritor del access log. Cada registro se escribe como una línea completa
/// bajo un mutex, así las líneas de distintos workers no se mezclan.
pub struct AccessLog {
    sink: Mutex<Box<dyn Write + Send>>,
}

impl AccessLog {
    /// Access log sobre un destino arbitrario
    pub fn new(sink: Box<dyn Write + Send>) -> Self {
        Self {
            sink: Mutex::new(sink),
        }
    }

    /// Access log hacia stderr
    pub fn stderr() -> Self {
        Self::new(Box::new(io::stderr()))
    }

    /// Formatea una línea sin escribirla
    pub fn format_line(method: &str, uri: &str, status: StatusCode, request_id: Option<&str>) -> String {
        format!("{},{},{},{}\n", method, uri, status.as_u16(), request_id.unwrap_or("0"))
    }

    /// Registra un request completado
    pub fn record(&self, method: &str, uri: &str, status: StatusCode, request_id: Option<&str>) {
        let line = Self::format_line(method, uri, status, request_id);
        let mut sink = self.sink.lock();

        if let Err(e) = sink.write_all(line.as_bytes()).and_then(|_| sink.flush()) {
            tracing::warn!(error = %e, "no se pudo escribir el access log");
        }
    }
}

impl Default for AccessLog {
    fn default() -> Self {
        Self::stderr()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::thread;

    /// Buffer compartido para inspeccionar lo escrito
    #[derive(Clone, Default)]
    struct SharedBuffer(Arc<Mutex<Vec<u8>>>);

    impl Write for SharedBuffer {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.lock().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn test_format_with_request_id() {
        let line = AccessLog::format_line("PUT", "/a.txt", StatusCode::Created, Some("17"));
        assert_eq!(line, "PUT,/a.txt,201,17\n");
    }

    #[test]
    fn test_format_without_request_id() {
        let line = AccessLog::format_line("GET", "/missing", StatusCode::NotFound, None);
        assert_eq!(line, "GET,/missing,404,0\n");
    }

    #[test]
    fn test_concurrent_lines_do_not_interleave() {
        let buffer = SharedBuffer::default();
        let log = Arc::new(AccessLog::new(Box::new(buffer.clone())));

        let handles: Vec<_> = (0..8)
            .map(|i| {
                let log = Arc::clone(&log);
                thread::spawn(move || {
                    for j in 0..100 {
                        let id = format!("{}-{}", i, j);
                        log.record("GET", "/file", StatusCode::Ok, Some(&id));
                    }
                })
            })
            .collect();

        for handle in handles {
            handle.join().unwrap();
        }

        let text = String::from_utf8(buffer.0.lock().clone()).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 800);
        assert!(lines.iter().all(|l| l.starts_with("GET,/file,200,")));
    }

    #[test]
    fn test_init_tracing_twice_is_harmless() {
        init_tracing("debug");
        init_tracing("warn");
    }
}
