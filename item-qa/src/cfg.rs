//! Runtime configuration loaded from environment variables.

use std::{path::PathBuf, str::FromStr};

use crate::{
    catalog::ItemCatalog,
    error::ItemQaError,
    postprocess::{GuardMessages, MessageOverrides},
    variant::{ModelVariant, PromptFamily, VariantProfile},
};

/// Everything the pipeline needs besides the model.
#[derive(Debug, Clone)]
pub struct ItemQaConfig {
    pub variant: ModelVariant,
    pub profile: VariantProfile,
    pub catalog: ItemCatalog,
    pub messages: GuardMessages,
}

impl ItemQaConfig {
    /// Variant defaults with the given catalog and no message overrides.
    pub fn new(variant: ModelVariant, catalog: ItemCatalog) -> Self {
        let profile = variant.profile();
        let messages = default_messages(profile.family);
        Self {
            variant,
            profile,
            catalog,
            messages,
        }
    }

    pub fn with_overrides(mut self, overrides: MessageOverrides) -> Self {
        self.messages = self.messages.with_overrides(overrides);
        self
    }

    /// Reads `MODEL_VARIANT`, `ITEMS_DIR`, `ITEMS_CATALOG`, `CONTEXT_BUDGET`
    /// and `MIN_CONFIDENCE`, then loads the catalog.
    ///
    /// # Errors
    /// Unparsable values and catalog failures.
    pub fn from_env() -> Result<Self, ItemQaError> {
        Self::from_vars(|k| std::env::var(k).ok())
    }

    /// Same as [`Self::from_env`] with an injectable lookup.
    pub fn from_vars<F>(get: F) -> Result<Self, ItemQaError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |k: &str| get(k).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        let variant = match get("MODEL_VARIANT") {
            Some(v) => v.parse()?,
            None => ModelVariant::default(),
        };
        let dir = PathBuf::from(get("ITEMS_DIR").unwrap_or_else(|| "items".to_string()));
        let catalog_path = get("ITEMS_CATALOG").map(PathBuf::from);
        let (catalog, overrides) = ItemCatalog::load(dir, catalog_path.as_deref())?;

        let mut cfg = Self::new(variant, catalog).with_overrides(overrides);

        if let Some(budget) = parse::<usize>("CONTEXT_BUDGET", get("CONTEXT_BUDGET"))? {
            if budget == 0 {
                return Err(ItemQaError::Config {
                    var: "CONTEXT_BUDGET",
                    reason: "must be greater than zero".to_string(),
                });
            }
            cfg.profile.context_budget = budget;
        }
        if let Some(min) = parse::<f32>("MIN_CONFIDENCE", get("MIN_CONFIDENCE"))? {
            if !(0.0..=1.0).contains(&min) {
                return Err(ItemQaError::Config {
                    var: "MIN_CONFIDENCE",
                    reason: format!("{min} is outside 0..=1"),
                });
            }
            cfg.profile.rules.min_confidence = Some(min);
        }
        Ok(cfg)
    }
}

/// Canned messages a prompt family starts with.
pub fn default_messages(family: PromptFamily) -> GuardMessages {
    match family {
        PromptFamily::Extractive => GuardMessages::extractive(),
        PromptFamily::Summarization => GuardMessages::summarization(),
        PromptFamily::Text2Text => GuardMessages::text2text(),
    }
}

fn parse<T>(var: &'static str, raw: Option<String>) -> Result<Option<T>, ItemQaError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    raw.map(|v| {
        v.parse::<T>().map_err(|e| ItemQaError::Config {
            var,
            reason: format!("`{v}`: {e}"),
        })
    })
    .transpose()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn vars(pairs: &[(&str, &str)], dir: &std::path::Path) -> HashMap<String, String> {
        let mut m: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        m.insert("ITEMS_DIR".into(), dir.display().to_string());
        m
    }

    #[test]
    fn defaults_to_extractive_builtin_catalog() {
        let dir = tempfile::tempdir().unwrap();
        let m = vars(&[], dir.path());
        let cfg = ItemQaConfig::from_vars(|k| m.get(k).cloned()).unwrap();
        assert_eq!(cfg.variant, ModelVariant::Extractive);
        assert_eq!(cfg.profile.context_budget, 450);
        assert_eq!(cfg.messages, GuardMessages::extractive());
        assert_eq!(cfg.catalog.ids().count(), 5);
    }

    #[test]
    fn overrides_budget_and_threshold() {
        let dir = tempfile::tempdir().unwrap();
        let m = vars(
            &[
                ("MODEL_VARIANT", "summarization"),
                ("CONTEXT_BUDGET", "300"),
                ("MIN_CONFIDENCE", "0.25"),
            ],
            dir.path(),
        );
        let cfg = ItemQaConfig::from_vars(|k| m.get(k).cloned()).unwrap();
        assert_eq!(cfg.variant, ModelVariant::Summarization);
        assert_eq!(cfg.profile.context_budget, 300);
        assert_eq!(cfg.profile.rules.min_confidence, Some(0.25));
        assert_eq!(
            cfg.messages.uncertain,
            "Based on the description, I cannot answer this question."
        );
    }

    #[test]
    fn rejects_bad_values() {
        let dir = tempfile::tempdir().unwrap();
        for pairs in [
            [("CONTEXT_BUDGET", "lots")],
            [("CONTEXT_BUDGET", "0")],
            [("MIN_CONFIDENCE", "1.5")],
            [("MODEL_VARIANT", "gpt")],
        ] {
            let m = vars(&pairs, dir.path());
            let err = ItemQaConfig::from_vars(|k| m.get(k).cloned()).unwrap_err();
            assert!(matches!(err, ItemQaError::Config { .. }), "{pairs:?}: {err}");
        }
    }

    #[test]
    fn blank_values_count_as_unset() {
        let dir = tempfile::tempdir().unwrap();
        let m = vars(&[("MODEL_VARIANT", "  "), ("CONTEXT_BUDGET", "")], dir.path());
        let cfg = ItemQaConfig::from_vars(|k| m.get(k).cloned()).unwrap();
        assert_eq!(cfg.variant, ModelVariant::Extractive);
    }
}
