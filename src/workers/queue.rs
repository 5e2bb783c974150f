//! # Cola Acotada de Conexiones
//! src/workers/queue.rs
//!
//! Cola FIFO thread-safe de capacidad fija entre el acceptor y los workers.
//!
//! - `push` bloquea mientras la cola está llena
//! - `pop` bloquea mientras la cola está vacía
//!
//! Cada elemento se entrega a exactamente un consumidor.

use parking_lot::{Condvar, Mutex};
use std::collections::VecDeque;

/// Cola FIFO acotada y bloqueante
pub struct BoundedQueue<T> {
    items: Mutex<VecDeque<T>>,

    /// Se notifica cuando entra un elemento
    not_empty: Condvar,

    /// Se notifica cuando sale un elemento
    not_full: Condvar,

    capacity: usize,
}

impl<T> BoundedQueue<T> {
    /// Crea una cola con la capacidad indicada (mínimo 1)
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            items: Mutex::new(VecDeque::with_capacity(capacity)),
            not_empty: Condvar::new(),
            not_full: Condvar::new(),
            capacity,
        }
    }

    /// Encola al final. Bloquea hasta que haya espacio.
    pub fn push(&self, item: T) {
        let mut items = self.items.lock();

        while items.len() >= self.capacity {
            self.not_full.wait(&mut items);
        }

        items.push_back(item);

        // Despertar a un consumidor esperando
        self.not_empty.notify_one();
    }

    /// Desencola el primer elemento. Bloquea hasta que haya uno.
    pub fn pop(&self) -> T {
        let mut items = self.items.lock();

        loop {
            if let Some(item) = items.pop_front() {
                self.not_full.notify_one();
                return item;
            }

            self.not_empty.wait(&mut items);
        }
    }

    /// Retorna el tamaño actual de la cola
    pub fn len(&self) -> usize {
        self.items.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn is_full(&self) -> bool {
        self.len() >= self.capacity
    }
}
