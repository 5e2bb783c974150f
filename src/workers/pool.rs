//! # Pool de Workers
//! src/workers/pool.rs
//!
//! N threads de vida larga. Cada uno repite para siempre:
//!
//! ```text
//! loop {
//!     item = queue.pop()   // bloquea si no hay trabajo
//!     handler(item)        // procesa hasta terminar
//! }
//! ```
//!
//! No existe protocolo de apagado: los workers viven lo que vive el proceso.
//! Un panic dentro del handler se captura y el worker sigue con el siguiente
//! elemento; los guards (locks por URI, sockets) se liberan al desenrollar.

use crate::workers::queue::BoundedQueue;
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;
use std::thread::{self, JoinHandle};

/// Pool de tamaño fijo que consume una [`BoundedQueue`]
pub struct WorkerPool {
    /// Handles de los threads; nunca se hace join
    workers: Vec<JoinHandle<()>>,
}

impl WorkerPool {
    /// Lanza `size` workers que procesan `queue` con `handler`
    ///
    /// # Errores
    ///
    /// Retorna el error del sistema operativo si algún thread no pudo crearse.
    pub fn spawn<T, F>(size: usize, queue: Arc<BoundedQueue<T>>, handler: F) -> std::io::Result<Self>
    where
        T: Send + 'static,
        F: Fn(T) + Send + Sync + 'static,
    {
        let handler = Arc::new(handler);
        let mut workers = Vec::with_capacity(size);

        for id in 0..size {
            let queue = Arc::clone(&queue);
            let handler = Arc::clone(&handler);

            let handle = thread::Builder::new()
                .name(format!("worker-{}", id))
                .spawn(move || Self::worker_loop(id, queue, handler))?;

            workers.push(handle);
        }

        Ok(Self { workers })
    }

    /// Loop principal del worker
    fn worker_loop<T, F>(id: usize, queue: Arc<BoundedQueue<T>>, handler: Arc<F>)
    where
        F: Fn(T),
    {
        tracing::debug!(worker = id, "worker iniciado");

        loop {
            let item = queue.pop();
            tracing::trace!(worker = id, "conexión tomada de la cola");

            if panic::catch_unwind(AssertUnwindSafe(|| handler(item))).is_err() {
                tracing::error!(worker = id, "panic procesando una conexión; se descarta");
            }
        }
    }

    /// Número de workers
    pub fn size(&self) -> usize {
        self.workers.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;
    use std::sync::mpsc;
    use std::time::Duration;

    #[test]
    fn test_pool_size() {
        let queue: Arc<BoundedQueue<u32>> = Arc::new(BoundedQueue::new(2));
        let pool = WorkerPool::spawn(3, queue, |_| {}).unwrap();
        assert_eq!(pool.size(), 3);
    }

    #[test]
    fn test_every_item_processed_once() {
        const ITEMS: u32 = 500;

        let queue = Arc::new(BoundedQueue::new(4));
        let (tx, rx) = mpsc::channel();
        let tx = parking_lot::Mutex::new(tx);

        let _pool = WorkerPool::spawn(4, Arc::clone(&queue), move |item: u32| {
            tx.lock().send(item).unwrap();
        })
        .unwrap();

        for i in 0..ITEMS {
            queue.push(i);
        }

        let mut seen = HashSet::new();
        for _ in 0..ITEMS {
            let item = rx.recv_timeout(Duration::from_secs(5)).unwrap();
            assert!(seen.insert(item), "item {} entregado dos veces", item);
        }
        assert!(rx.recv_timeout(Duration::from_millis(100)).is_err());
    }

    #[test]
    fn test_worker_survives_panic() {
        let queue = Arc::new(BoundedQueue::new(2));
        let (tx, rx) = mpsc::channel();
        let tx = parking_lot::Mutex::new(tx);

        // Un solo worker: si muriera con el panic, nada más se procesaría
        let _pool = WorkerPool::spawn(1, Arc::clone(&queue), move |item: u32| {
            if item % 2 == 1 {
                panic!("fallo simulado en {}", item);
            }
            tx.lock().send(item).unwrap();
        })
        .unwrap();

        for i in 0..6 {
            queue.push(i);
        }

        let processed: Vec<u32> = (0..3)
            .map(|_| rx.recv_timeout(Duration::from_secs(5)).unwrap())
            .collect();
        assert_eq!(processed, vec![0, 2, 4]);
    }
}
