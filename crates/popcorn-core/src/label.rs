use std::sync::{Arc, Mutex, PoisonError};

/// Ambient display label (window or terminal title).
pub trait DisplayLabel: Send + Sync {
    fn set_label(&self, text: &str);
}

/// Shows a title while held and puts the default label back when dropped.
pub struct TitleGuard {
    label: Arc<dyn DisplayLabel>,
    default_title: String,
}

impl TitleGuard {
    pub fn acquire(label: Arc<dyn DisplayLabel>, title: &str, default_title: &str) -> Self {
        label.set_label(title);
        Self {
            label,
            default_title: default_title.to_string(),
        }
    }
}

impl Drop for TitleGuard {
    fn drop(&mut self) {
        self.label.set_label(&self.default_title);
    }
}

/// Label kept in memory; readable back with `current`.
#[derive(Debug, Default)]
pub struct LabelCell {
    current: Mutex<String>,
}

impl LabelCell {
    pub fn new(initial: &str) -> Self {
        Self {
            current: Mutex::new(initial.to_string()),
        }
    }

    pub fn current(&self) -> String {
        self.current.lock().unwrap_or_else(PoisonError::into_inner).clone()
    }
}

impl DisplayLabel for LabelCell {
    fn set_label(&self, text: &str) {
        *self.current.lock().unwrap_or_else(PoisonError::into_inner) = text.to_string();
    }
}
