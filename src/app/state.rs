use super::config::Config;
use crate::util::i18n::LocalizationManager;
use anyhow::Result;
use std::sync::Arc;

/// Shared, read-only application context handed to the screen
#[derive(Debug, Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    /// Shared internationalization manager
    pub i18n: Arc<LocalizationManager>,
}

impl AppState {
    pub fn new(config: Config) -> Result<Self> {
        let i18n = LocalizationManager::new(&config.general.language)?;
        Ok(Self {
            config: Arc::new(config),
            i18n: Arc::new(i18n),
        })
    }

    /// Get translated string
    pub fn t(&self, key: &str) -> String {
        self.i18n.get(key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_uses_configured_language() {
        let state = AppState::new(Config::default()).unwrap();
        assert_eq!(state.i18n.current_locale(), "es-MX");
        assert_eq!(state.t("field-period"), "Periodo");
    }

    #[test]
    fn test_unknown_language_falls_back() {
        let mut config = Config::default();
        config.general.language = "fr".to_string();

        let state = AppState::new(config).unwrap();

        assert_eq!(state.i18n.current_locale(), "es-MX");
    }
}
