use fluent::{FluentBundle, FluentResource};
use fluent_bundle::FluentArgs;
use std::sync::Arc;
use unic_langid::LanguageIdentifier;

/// The only locale the picker ships with
pub const DEFAULT_LOCALE: &str = "es-MX";

const EMBEDDED_FTL: &str = include_str!("../../locales/es-MX/mesdoc.ftl");

/// Manages the message catalog and provides translation API
pub struct LocalizationManager {
    bundle: FluentBundle<Arc<FluentResource>>,
    current_locale: String,
}

impl std::fmt::Debug for LocalizationManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LocalizationManager")
            .field("current_locale", &self.current_locale)
            .finish_non_exhaustive()
    }
}

impl LocalizationManager {
    /// Create a LocalizationManager for the requested locale
    ///
    /// # Arguments
    /// * `locale` - Language code from config ("es", "es-MX")
    ///
    /// # Returns
    /// * `Ok(LocalizationManager)` on success
    /// * `Err` if the embedded catalog cannot be parsed
    pub fn new(locale: &str) -> anyhow::Result<Self> {
        let locale_lower = locale.to_lowercase();
        let locale_id = match locale_lower.as_str() {
            "es" | "es-mx" => DEFAULT_LOCALE,
            other => {
                tracing::warn!(
                    "Locale '{}' is not available, using {}",
                    other,
                    DEFAULT_LOCALE
                );
                DEFAULT_LOCALE
            }
        };

        tracing::info!("Loading translations for locale: {}", locale_id);

        let bundle = Self::load_locale_bundle(locale_id, EMBEDDED_FTL)?;

        Ok(Self {
            bundle,
            current_locale: locale_id.to_string(),
        })
    }

    /// Catalog for the fixed default locale
    pub fn embedded() -> anyhow::Result<Self> {
        Self::new(DEFAULT_LOCALE)
    }

    /// Parse an .ftl source into a FluentBundle
    fn load_locale_bundle(
        locale_id: &str,
        source: &str,
    ) -> anyhow::Result<FluentBundle<Arc<FluentResource>>> {
        let lang_id: LanguageIdentifier = locale_id
            .parse()
            .map_err(|e| anyhow::anyhow!("Invalid locale ID '{}': {:?}", locale_id, e))?;

        let mut bundle = FluentBundle::new(vec![lang_id]);
        // Keys such as "2025-09" must appear verbatim in status text
        bundle.set_use_isolating(false);

        let resource = FluentResource::try_new(source.to_string()).map_err(|(_, errors)| {
            anyhow::anyhow!("Failed to parse catalog for {}: {:?}", locale_id, errors)
        })?;

        if let Err(errors) = bundle.add_resource(Arc::new(resource)) {
            for error in errors {
                tracing::error!("Failed to add resource to bundle: {:?}", error);
            }
        }

        tracing::debug!("Loaded locale bundle for {}", locale_id);

        Ok(bundle)
    }

    /// Get a translated string by key
    pub fn get(&self, key: &str) -> String {
        self.get_with_args(key, None)
    }

    /// Get a translated string with arguments
    ///
    /// # Returns
    /// * Translated string, or `[missing: key]` if the key does not exist
    pub fn get_with_args(&self, key: &str, args: Option<&FluentArgs>) -> String {
        if let Some(message) = self.bundle.get_message(key) {
            if let Some(pattern) = message.value() {
                let mut errors = vec![];
                let value = self.bundle.format_pattern(pattern, args, &mut errors);

                if !errors.is_empty() {
                    tracing::warn!("Translation errors for key '{}': {:?}", key, errors);
                }

                return value.to_string();
            }
        }

        tracing::warn!("Missing translation key: {}", key);
        format!("[missing: {}]", key)
    }

    /// Get the current locale code
    pub fn current_locale(&self) -> &str {
        &self.current_locale
    }
}
