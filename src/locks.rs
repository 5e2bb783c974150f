//! # Registro de Locks por URI
//! src/locks.rs
//!
//! Mapea cada URI a un lock lector/escritor propio. El lock se crea la primera
//! vez que se pide esa URI y vive mientras viva el proceso: el registro solo
//! crece, nunca se borran entradas ni se reemplaza un lock ya entregado.
//!
//! ```text
//! GET /a ──┐                         ┌─ read()  ─┐
//! GET /a ──┼─ acquire_or_create("/a")┼─ read()  ─┼─ mismo RwLock
//! PUT /a ──┘                         └─ write() ─┘
//! PUT /b ──── acquire_or_create("/b") ── write() ── otro RwLock
//! ```
//!
//! Todo el "buscar y si no existe insertar" ocurre bajo un único mutex, así
//! dos threads que piden una URI nueva al mismo tiempo reciben el mismo lock.

use parking_lot::{Mutex, RwLock};
use std::collections::{HashMap, TryReserveError};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use thiserror::Error;

/// Lock lector/escritor asociado a una URI. Protege el archivo, no datos en
/// memoria, por eso el valor es `()`.
pub type UriLock = RwLock<()>;

#[derive(Debug, Error)]
pub enum RegistryError {
    /// No hubo memoria para una entrada nueva
    #[error("unable to allocate lock entry for {uri}: {source}")]
    Exhausted {
        uri: String,
        #[source]
        source: TryReserveError,
    },

    /// Se alcanzó el máximo de entradas configurado
    #[error("lock registry is full ({limit} entries), cannot add {uri}")]
    Full { uri: String, limit: usize },
}

/// Registro global de locks por URI
#[derive(Debug, Default)]
pub struct LockRegistry {
    locks: Mutex<HashMap<String, Arc<UriLock>>>,

    /// Máximo de entradas; `None` = sin límite
    limit: Option<usize>,

    /// Cantidad de locks creados desde el arranque
    created: AtomicUsize,
}

impl LockRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registro que no crea más de `limit` locks. Las URIs ya registradas
    /// siguen funcionando; las nuevas fallan como si no hubiera memoria.
    pub fn with_limit(limit: usize) -> Self {
        Self {
            limit: Some(limit),
            ..Self::default()
        }
    }

    /// Retorna el lock de `uri`, creándolo si es la primera vez
    ///
    /// La comparación de llaves es exacta (sensible a mayúsculas, sin
    /// normalizar). Si no hay memoria para la entrada nueva se retorna
    /// error y el registro queda intacto.
    ///
    /// # Ejemplo
    /// ```
    /// use httpserver::locks::LockRegistry;
    /// use std::sync::Arc;
    ///
    /// let registry = LockRegistry::new();
    /// let a = registry.acquire_or_create("/a.txt").unwrap();
    /// let b = registry.acquire_or_create("/a.txt").unwrap();
    /// assert!(Arc::ptr_eq(&a, &b));
    /// ```
    pub fn acquire_or_create(&self, uri: &str) -> Result<Arc<UriLock>, RegistryError> {
        let mut locks = self.locks.lock();

        if let Some(lock) = locks.get(uri) {
            return Ok(Arc::clone(lock));
        }

        if let Some(limit) = self.limit.filter(|limit| locks.len() >= *limit) {
            return Err(RegistryError::Full {
                uri: uri.to_string(),
                limit,
            });
        }

        locks.try_reserve(1).map_err(|source| RegistryError::Exhausted {
            uri: uri.to_string(),
            source,
        })?;

        let lock = Arc::new(UriLock::new(()));
        locks.insert(uri.to_string(), Arc::clone(&lock));
        self.created.fetch_add(1, Ordering::Relaxed);

        tracing::trace!(uri, "lock creado");
        Ok(lock)
    }

    /// Busca sin crear
    pub fn lookup(&self, uri: &str) -> Option<Arc<UriLock>> {
        self.locks.lock().get(uri).cloned()
    }

    pub fn len(&self) -> usize {
        self.locks.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Locks creados en total; igual a `len()` porque nunca se borran
    pub fn created(&self) -> usize {
        self.created.load(Ordering::Relaxed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::AtomicIsize;
    use std::sync::Barrier;
    use std::thread;
    use std::time::Duration;

    #[test]
    fn test_same_uri_same_lock() {
        let registry = LockRegistry::new();
        let first = registry.acquire_or_create("/a").unwrap();
        let second = registry.acquire_or_create("/a").unwrap();

        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(registry.len(), 1);
        assert_eq!(registry.created(), 1);
    }

    #[test]
    fn test_keys_are_exact() {
        let registry = LockRegistry::new();
        let lower = registry.acquire_or_create("/a.txt").unwrap();
        let upper = registry.acquire_or_create("/A.txt").unwrap();

        assert!(!Arc::ptr_eq(&lower, &upper));
        assert_eq!(registry.len(), 2);
    }

    #[test]
    fn test_lookup_does_not_create() {
        let registry = LockRegistry::new();
        assert!(registry.lookup("/missing").is_none());
        assert!(registry.is_empty());

        let lock = registry.acquire_or_create("/present").unwrap();
        let found = registry.lookup("/present").unwrap();
        assert!(Arc::ptr_eq(&lock, &found));
    }

    #[test]
    fn test_limit_rejects_only_new_uris() {
        let registry = LockRegistry::with_limit(1);
        let first = registry.acquire_or_create("/one").unwrap();

        let err = registry.acquire_or_create("/two").unwrap_err();
        assert!(matches!(err, RegistryError::Full { limit: 1, .. }));
        assert!(registry.lookup("/two").is_none());

        let again = registry.acquire_or_create("/one").unwrap();
        assert!(Arc::ptr_eq(&first, &again));
        assert_eq!(registry.created(), 1);
    }

    #[test]
    fn test_concurrent_first_access_creates_once() {
        const THREADS: usize = 32;

        let registry = Arc::new(LockRegistry::new());
        let barrier = Arc::new(Barrier::new(THREADS));

        let handles: Vec<_> = (0..THREADS)
            .map(|_| {
                let registry = Arc::clone(&registry);
                let barrier = Arc::clone(&barrier);
                thread::spawn(move || {
                    barrier.wait();
                    registry.acquire_or_create("/fresh").unwrap()
                })
            })
            .collect();

        let locks: Vec<_> = handles.into_iter().map(|h| h.join().unwrap()).collect();

        assert_eq!(registry.created(), 1);
        assert!(locks.iter().all(|l| Arc::ptr_eq(l, &locks[0])));
    }

    #[test]
    fn test_writers_exclude_readers_and_writers() {
        // >0: lectores activos, -1: un escritor, 0: libre
        let state = Arc::new(AtomicIsize::new(0));
        let registry = Arc::new(LockRegistry::new());

        let handles: Vec<_> = (0..16)
            .map(|i| {
                let registry = Arc::clone(&registry);
                let state = Arc::clone(&state);
                thread::spawn(move || {
                    for _ in 0..50 {
                        let lock = registry.acquire_or_create("/shared").unwrap();
                        if i % 4 == 0 {
                            let _guard = lock.write();
                            assert_eq!(state.compare_exchange(0, -1, Ordering::SeqCst, Ordering::SeqCst), Ok(0));
                            thread::sleep(Duration::from_micros(200));
                            state.store(0, Ordering::SeqCst);
                        } else {
                            let _guard = lock.read();
                            let before = state.fetch_add(1, Ordering::SeqCst);
                            assert!(before >= 0, "lector concurrente con escritor");
                            thread::sleep(Duration::from_micros(100));
                            state.fetch_sub(1, Ordering::SeqCst);
                        }
                    }
                })
            })
            .collect();

        for handle in handles {
            handle.join().unwrap();
        }
        assert_eq!(registry.created(), 1);
    }

    #[test]
    fn test_different_uris_do_not_block() {
        let registry = LockRegistry::new();
        let a = registry.acquire_or_create("/a").unwrap();
        let b = registry.acquire_or_create("/b").unwrap();

        let _writer_a = a.write();
        assert!(b.try_write().is_some());
        assert!(a.try_read().is_none());
    }
}
