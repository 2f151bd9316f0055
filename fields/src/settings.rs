use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tokio::sync::watch;
use tracing::debug;

use crate::locale::Language;

/// Colour theme preference
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    #[default]
    Light,
    Dark,
}

/// Read-only presentation settings threaded through every view
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Settings {
    pub language: Language,
    pub theme: Theme,
}

/// Owner of the current [`Settings`].
///
/// Created once at the application root. Readers take snapshots or subscribe
/// to changes; the `set_*` methods are the only way to change them.
#[derive(Clone)]
pub struct SettingsHandle {
    sender: Arc<watch::Sender<Settings>>,
}

impl SettingsHandle {
    pub fn new(initial: Settings) -> Self {
        let (sender, _) = watch::channel(initial);
        Self {
            sender: Arc::new(sender),
        }
    }

    /// Snapshot of the current settings
    pub fn current(&self) -> Settings {
        *self.sender.borrow()
    }

    pub fn language(&self) -> Language {
        self.current().language
    }

    /// Receive a notification every time the settings change
    pub fn subscribe(&self) -> watch::Receiver<Settings> {
        self.sender.subscribe()
    }

    pub fn set_language(&self, language: Language) {
        self.sender.send_if_modified(|settings| {
            if settings.language == language {
                return false;
            }
            debug!("Language changed: {} -> {}", settings.language, language);
            settings.language = language;
            true
        });
    }

    pub fn toggle_language(&self) -> Language {
        let next = self.language().toggled();
        self.set_language(next);
        next
    }

    pub fn set_theme(&self, theme: Theme) {
        self.sender.send_if_modified(|settings| {
            if settings.theme == theme {
                return false;
            }
            settings.theme = theme;
            true
        });
    }
}

impl Default for SettingsHandle {
    fn default() -> Self {
        Self::new(Settings::default())
    }
}
