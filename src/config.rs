//! # Configuración del Servidor
//! src/config.rs
//!
//! Configuración desde argumentos CLI y variables de entorno.
//!
//! ## Ejemplos de uso
//!
//! ### CLI
//! ```bash
//! ./httpserver 8080 -t 8 --root ./data
//! ```
//!
//! ### Variables de entorno
//! ```bash
//! HTTP_THREADS=8 HTTP_ROOT=./data ./httpserver 8080
//! ```

use clap::Parser;

/// Configuración del servidor de archivos
#[derive(Debug, Clone, Parser)]
#[command(name = "httpserver")]
#[command(about = "Servidor HTTP concurrente de archivos (GET/PUT) con locks por URI")]
#[command(version = "0.1.0")]
pub struct Config {
    /// Puerto en el que escucha el servidor (1-65535)
    #[arg(value_parser = clap::value_parser!(u16).range(1..))]
    pub port: u16,

    /// Número de workers del pool
    #[arg(short = 't', long = "threads", default_value = "4", env = "HTTP_THREADS")]
    pub threads: usize,

    /// Capacidad de la cola de conexiones (por defecto, igual a --threads)
    #[arg(long = "queue", env = "HTTP_QUEUE")]
    pub queue_capacity: Option<usize>,

    /// Máximo de locks por URI en el registro (por defecto, sin límite)
    #[arg(long = "max-locks", env = "HTTP_MAX_LOCKS")]
    pub max_locks: Option<usize>,

    /// Host/IP en el que escucha
    #[arg(long, default_value = "0.0.0.0", env = "HTTP_HOST")]
    pub host: String,

    /// Directorio contra el que se resuelven las URIs
    #[arg(long, default_value = ".", env = "HTTP_ROOT")]
    pub root: String,

    /// Nivel de logs de diagnóstico (RUST_LOG tiene prioridad)
    #[arg(long = "log-level", default_value = "warn", env = "HTTP_LOG_LEVEL")]
    pub log_level: String,
}

impl Config {
    /// Obtiene la dirección completa para bind (host:port)
    ///
    /// # Ejemplo
    /// ```rust
    /// use httpserver::config::Config;
    ///
    /// let config = Config::default();
    /// assert_eq!(config.address(), "0.0.0.0:8080");
    /// ```
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Capacidad efectiva de la cola
    pub fn queue_capacity(&self) -> usize {
        self.queue_capacity.unwrap_or(self.threads)
    }

    /// Valida la configuración
    ///
    /// Retorna errores si hay valores inválidos
    pub fn validate(&self) -> Result<(), String> {
        if self.threads == 0 {
            return Err("Worker threads must be >= 1".to_string());
        }

        if self.queue_capacity() == 0 {
            return Err("Queue capacity must be >= 1".to_string());
        }

        if self.root.trim().is_empty() {
            return Err("Root directory must not be empty".to_string());
        }

        Ok(())
    }
}

impl Default for Config {
    /// Configuración por defecto
    fn default() -> Self {
        Self {
            port: 8080,
            threads: 4,
            queue_capacity: None,
            max_locks: None,
            host: "0.0.0.0".to_string(),
            root: ".".to_string(),
            log_level: "warn".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.port, 8080);
        assert_eq!(config.threads, 4);
        assert_eq!(config.queue_capacity(), 4);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_parse_port_only() {
        let config = Config::try_parse_from(["httpserver", "1234"]).unwrap();
        assert_eq!(config.port, 1234);
        assert_eq!(config.address(), "0.0.0.0:1234");
    }

    #[test]
    fn test_parse_threads_flag() {
        let config = Config::try_parse_from(["httpserver", "-t", "8", "9000"]).unwrap();
        assert_eq!(config.threads, 8);
        assert_eq!(config.queue_capacity(), 8);
        assert_eq!(config.port, 9000);
    }

    #[test]
    fn test_explicit_queue_capacity() {
        let config = Config::try_parse_from(["httpserver", "--queue", "64", "9000"]).unwrap();
        assert_eq!(config.threads, 4);
        assert_eq!(config.queue_capacity(), 64);
    }

    #[test]
    fn test_missing_port_is_error() {
        assert!(Config::try_parse_from(["httpserver"]).is_err());
    }

    #[test]
    fn test_port_with_trailing_garbage_is_error() {
        assert!(Config::try_parse_from(["httpserver", "80abc"]).is_err());
        assert!(Config::try_parse_from(["httpserver", "70000"]).is_err());
    }

    #[test]
    fn test_port_zero_is_error() {
        assert!(Config::try_parse_from(["httpserver", "0"]).is_err());
        assert!(Config::try_parse_from(["httpserver", "1"]).is_ok());
    }

    #[test]
    fn test_max_locks_flag() {
        let config = Config::try_parse_from(["httpserver", "8080"]).unwrap();
        assert_eq!(config.max_locks, None);

        let config = Config::try_parse_from(["httpserver", "--max-locks", "100", "8080"]).unwrap();
        assert_eq!(config.max_locks, Some(100));
    }

    #[test]
    fn test_invalid_threads_flag() {
        assert!(Config::try_parse_from(["httpserver", "-t", "many", "8080"]).is_err());
        assert!(Config::try_parse_from(["httpserver", "-x", "8080"]).is_err());
    }

    #[test]
    fn test_validate_zero_threads() {
        let mut config = Config::default();
        config.threads = 0;
        let result = config.validate();
        assert!(result.unwrap_err().contains("Worker threads"));
    }

    #[test]
    fn test_validate_zero_queue() {
        let mut config = Config::default();
        config.queue_capacity = Some(0);
        let result = config.validate();
        assert!(result.unwrap_err().contains("Queue capacity"));
    }

    #[test]
    fn test_validate_empty_root() {
        let mut config = Config::default();
        config.root = "  ".to_string();
        assert!(config.validate().is_err());
    }
}
