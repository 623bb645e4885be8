use std::sync::{Arc, Mutex, PoisonError, Weak};
use tracing::trace;

type KeyAction = Arc<dyn Fn() + Send + Sync>;

#[derive(Default)]
struct Registry {
    next_id: u64,
    listeners: Vec<Listener>,
}

struct Listener {
    id: u64,
    key: String,
    action: KeyAction,
}

/// Global key-press stream with per-key listeners.
///
/// Cloning shares the same registry. Key names match case-insensitively.
#[derive(Clone, Default)]
pub struct KeyEvents {
    registry: Arc<Mutex<Registry>>,
}

impl KeyEvents {
    pub fn new() -> Self {
        Self::default()
    }

    /// Call `action` whenever `key` is dispatched, until the returned subscription is dropped
    pub fn subscribe<F>(&self, key: &str, action: F) -> KeySubscription
    where
        F: Fn() + Send + Sync + 'static,
    {
        let mut registry = self.registry.lock().unwrap_or_else(PoisonError::into_inner);
        let id = registry.next_id;
        registry.next_id += 1;
        registry.listeners.push(Listener {
            id,
            key: key.to_lowercase(),
            action: Arc::new(action),
        });
        trace!(key = %key, listener = id, "Key listener attached");

        KeySubscription {
            id,
            registry: Arc::downgrade(&self.registry),
        }
    }

    /// Deliver a key press. Returns how many listeners ran.
    pub fn dispatch(&self, key: &str) -> usize {
        let key = key.to_lowercase();
        // Listeners may unsubscribe from inside their action, so run them unlocked
        let actions: Vec<KeyAction> = {
            let registry = self.registry.lock().unwrap_or_else(PoisonError::into_inner);
            registry
                .listeners
                .iter()
                .filter(|l| l.key == key)
                .map(|l| Arc::clone(&l.action))
                .collect()
        };
        for action in &actions {
            action();
        }
        actions.len()
    }

    pub fn listener_count(&self) -> usize {
        self.registry
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .listeners
            .len()
    }
}

/// Live key listener; detached on drop
pub struct KeySubscription {
    id: u64,
    registry: Weak<Mutex<Registry>>,
}

impl Drop for KeySubscription {
    fn drop(&mut self) {
        if let Some(registry) = self.registry.upgrade() {
            let mut registry = registry.lock().unwrap_or_else(PoisonError::into_inner);
            registry.listeners.retain(|l| l.id != self.id);
            trace!(listener = self.id, "Key listener detached");
        }
    }
}
