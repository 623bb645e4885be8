use popcorn_core::{DisplayLabel, LabelCell};
use std::io::{self, IsTerminal, Write};
use std::sync::Arc;
use tracing::trace;

/// Window title of the controlling terminal, set with the OSC 0 escape
pub struct TerminalTitle;

impl DisplayLabel for TerminalTitle {
    fn set_label(&self, label: &str) {
        trace!(label = %label, "Setting terminal title");
        let mut stdout = io::stdout().lock();
        // A failed title update is cosmetic
        let _ = write!(stdout, "\x1b]0;{}\x07", sanitize(label));
        let _ = stdout.flush();
    }
}

/// Escape sequences inside a title would end the OSC early
fn sanitize(label: &str) -> String {
    label.chars().filter(|c| !c.is_control()).collect()
}

/// The terminal title when stdout is a human-facing terminal, an in-memory label otherwise
pub fn display_label(human: bool, default_title: &str) -> Arc<dyn DisplayLabel> {
    if human && io::stdout().is_terminal() {
        let title = TerminalTitle;
        title.set_label(default_title);
        Arc::new(title)
    } else {
        Arc::new(LabelCell::new(default_title))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sanitize_strips_control_characters() {
        assert_eq!(sanitize("Inception\x07\x1b]0;evil"), "Inception]0;evil");
        assert_eq!(sanitize("Amélie"), "Amélie");
    }
}
