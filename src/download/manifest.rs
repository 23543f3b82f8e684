use std::collections::BTreeMap;

/// Documents published with the application (period key -> href)
pub const PUBLISHED_DOCUMENTS: &[(&str, &str)] = &[
    (
        "2025-11",
        "/Reporte_complementario_vehiculos_sin_movimiento_2025-11.pdf",
    ),
    (
        "2025-10",
        "/Reporte_complementario_vehiculos_sin_movimiento_2025-10.pdf",
    ),
];

/// Partial mapping from period key to document href.
///
/// Lookups never fail; unknown keys simply resolve to `None`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Manifest {
    entries: BTreeMap<String, String>,
}

impl Manifest {
    pub fn new<I, K, V>(entries: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            entries: entries
                .into_iter()
                .map(|(key, href)| (key.into(), href.into()))
                .collect(),
        }
    }

    /// The compiled-in documents
    pub fn builtin() -> Self {
        Self::new(PUBLISHED_DOCUMENTS.iter().copied())
    }

    /// Built-in documents with `overrides` layered on top
    pub fn with_overrides<'a, I>(overrides: I) -> Self
    where
        I: IntoIterator<Item = (&'a String, &'a String)>,
    {
        let mut manifest = Self::builtin();
        for (key, href) in overrides {
            if let Some(previous) = manifest.entries.insert(key.clone(), href.clone()) {
                tracing::debug!("Manifest entry {} overridden ({} -> {})", key, previous, href);
            }
        }
        manifest
    }

    pub fn resolve(&self, key: &str) -> Option<&str> {
        self.entries.get(key).map(String::as_str)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;

    #[test]
    fn test_builtin_entries() {
        let manifest = Manifest::builtin();
        assert_eq!(manifest.len(), 2);
        assert_eq!(
            manifest.resolve("2025-11"),
            Some("/Reporte_complementario_vehiculos_sin_movimiento_2025-11.pdf")
        );
        assert!(manifest.contains("2025-10"));
    }

    #[test]
    fn test_unknown_keys_resolve_to_none() {
        let manifest = Manifest::builtin();
        assert_eq!(manifest.resolve("2025-09"), None);
        assert_eq!(manifest.resolve(""), None);
        assert_eq!(manifest.resolve("2099-01"), None);
        assert_eq!(manifest.resolve("not a key"), None);
    }

    #[test]
    fn test_overrides_add_and_replace_entries() {
        let mut overrides = BTreeMap::new();
        overrides.insert("2025-09".to_string(), "/septiembre.pdf".to_string());
        overrides.insert("2025-11".to_string(), "/noviembre-v2.pdf".to_string());

        let manifest = Manifest::with_overrides(&overrides);

        assert_eq!(manifest.len(), 3);
        assert_eq!(manifest.resolve("2025-09"), Some("/septiembre.pdf"));
        assert_eq!(manifest.resolve("2025-11"), Some("/noviembre-v2.pdf"));
    }
}
