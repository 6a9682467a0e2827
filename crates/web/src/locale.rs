//! Locale signal for the rendering layer.
//!
//! After an order loads, its language code is handed to a [`LocaleSwitch`].
//! The signal is fire-and-forget: a failing switch never changes the facts
//! returned to the caller.

use thiserror::Error;

/// Errors reported by a locale switch.
#[derive(Debug, Error)]
pub enum LocaleError {
    /// The language code is empty.
    #[error("language code cannot be empty")]
    Empty,
    /// The switch could not apply the language.
    #[error("locale switch failed: {0}")]
    Unavailable(String),
}

/// Receiver of detected order languages.
pub trait LocaleSwitch: Send + Sync {
    /// Switch to `code` (e.g. `en`, `it`).
    ///
    /// # Errors
    ///
    /// Returns an error if the language cannot be applied.
    fn switch_language(&self, code: &str) -> Result<(), LocaleError>;
}

/// Locale switch that tags the current Sentry scope.
///
/// Errors reported while rendering the checkout then carry the order
/// language.
#[derive(Debug, Clone, Copy, Default)]
pub struct SentryLocaleSwitch;

impl LocaleSwitch for SentryLocaleSwitch {
    fn switch_language(&self, code: &str) -> Result<(), LocaleError> {
        let code = code.trim();
        if code.is_empty() {
            return Err(LocaleError::Empty);
        }

        sentry::configure_scope(|scope| {
            scope.set_tag("locale", code);
        });
        tracing::debug!(locale = %code, "Switched checkout locale");
        Ok(())
    }
}
