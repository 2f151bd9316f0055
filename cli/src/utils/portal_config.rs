use anyhow::{anyhow, bail, Context, Result};
use api_client::ApiConfig;
use fields::Language;
use navigation::{DomainTree, SiteConfig, DEFAULT_ANCESTOR_PAGE_SIZE, DEFAULT_LIST_PAGE_SIZE};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::Path;
use std::time::Duration;
use tracing::{debug, info};

/// Search page settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchSettings {
    pub page_size: u32,
}

impl Default for SearchSettings {
    fn default() -> Self {
        Self {
            page_size: search::DEFAULT_PAGE_SIZE,
        }
    }
}

/// Listing and detail page settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ListingSettings {
    pub page_size: u32,
    /// Siblings fetched per level when resolving a detail path
    pub ancestor_page_size: u32,
}

impl Default for ListingSettings {
    fn default() -> Self {
        Self {
            page_size: DEFAULT_LIST_PAGE_SIZE,
            ancestor_page_size: DEFAULT_ANCESTOR_PAGE_SIZE,
        }
    }
}

/// Everything read from `amn.yaml`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PortalConfig {
    pub language: Language,
    pub api: ApiConfig,
    pub site: SiteConfig,
    pub search: SearchSettings,
    pub listing: ListingSettings,
    pub domains: Vec<DomainTree>,
}

impl Default for PortalConfig {
    fn default() -> Self {
        Self {
            language: Language::default(),
            api: ApiConfig::default(),
            site: SiteConfig::default(),
            search: SearchSettings::default(),
            listing: ListingSettings::default(),
            domains: DomainTree::defaults(),
        }
    }
}

impl PortalConfig {
    /// Read the configuration file, falling back to defaults when it does
    /// not exist and `required` is false
    pub fn load(path: &Path, required: bool) -> Result<Self> {
        if !path.exists() {
            if required {
                bail!("Configuration file not found: {}", path.display());
            }
            debug!("No configuration at {}, using defaults", path.display());
            return Ok(Self::default());
        }

        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        let config = Self::from_yaml(&raw)
            .with_context(|| format!("Invalid configuration in {}", path.display()))?;
        info!("Loaded configuration from {}", path.display());
        Ok(config)
    }

    pub fn from_yaml(raw: &str) -> Result<Self> {
        let mut config: Self = serde_yaml::from_str(raw)?;
        if config.domains.is_empty() {
            config.domains = DomainTree::defaults();
        }
        Ok(config)
    }

    /// Apply `AMN_API_URL`, `AMN_LANGUAGE` and `AMN_TIMEOUT_SECS`
    pub fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) -> Result<()> {
        if let Some(url) = lookup("AMN_API_URL").filter(|v| !v.is_empty()) {
            debug!("AMN_API_URL overrides api.base_url");
            self.api.base_url = url;
        }
        if let Some(language) = lookup("AMN_LANGUAGE").filter(|v| !v.is_empty()) {
            self.language = language
                .parse()
                .map_err(|e| anyhow!("AMN_LANGUAGE: {}", e))?;
        }
        if let Some(secs) = lookup("AMN_TIMEOUT_SECS").filter(|v| !v.is_empty()) {
            let secs: u64 = secs
                .parse()
                .with_context(|| format!("AMN_TIMEOUT_SECS is not a number: {}", secs))?;
            self.api.timeout = Duration::from_secs(secs);
        }
        Ok(())
    }

    pub fn validate(&self) -> Result<()> {
        self.api
            .validate()
            .map_err(|e| anyhow!("api: {}", e))?;

        if self.search.page_size == 0 {
            bail!("search.page_size must be greater than zero");
        }
        if self.listing.page_size == 0 || self.listing.ancestor_page_size == 0 {
            bail!("listing page sizes must be greater than zero");
        }

        let mut seen = HashSet::new();
        for domain in &self.domains {
            domain.validate().map_err(|e| anyhow!("domains: {}", e))?;
            if !seen.insert(domain.id.to_ascii_lowercase()) {
                bail!("domains: '{}' is defined twice", domain.id);
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use tempfile::TempDir;

    #[test]
    fn test_missing_optional_file_uses_defaults() {
        let temp_dir = TempDir::new().unwrap();
        let config = PortalConfig::load(&temp_dir.path().join("amn.yaml"), false).unwrap();
        assert_eq!(config, PortalConfig::default());
        assert_eq!(config.domains.len(), 2);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_missing_required_file_is_an_error() {
        let temp_dir = TempDir::new().unwrap();
        assert!(PortalConfig::load(&temp_dir.path().join("amn.yaml"), true).is_err());
    }

    #[test]
    fn test_partial_yaml() {
        let config = PortalConfig::from_yaml(
            r#"
language: en
api:
  base_url: "https://portal.example.org/api"
  timeout: 5
domains:
  - id: awareness
    title:
      primary: "التوعية"
      fallback: "Awareness"
    levels: [awareness/categories, awareness/articles]
"#,
        )
        .unwrap();

        assert_eq!(config.language, Language::En);
        assert_eq!(config.api.timeout, Duration::from_secs(5));
        assert_eq!(config.api.max_retries, 2);
        assert_eq!(config.search, SearchSettings::default());
        assert_eq!(config.domains.len(), 1);
        assert_eq!(config.domains[0].depth(), 2);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_environment_overrides() {
        let env: HashMap<&str, &str> = HashMap::from([
            ("AMN_API_URL", "https://staging.example.org/api"),
            ("AMN_LANGUAGE", "EN"),
            ("AMN_TIMEOUT_SECS", "3"),
        ]);
        let mut config = PortalConfig::default();
        config
            .apply_overrides(|key| env.get(key).map(|v| v.to_string()))
            .unwrap();

        assert_eq!(config.api.base_url, "https://staging.example.org/api");
        assert_eq!(config.language, Language::En);
        assert_eq!(config.api.timeout, Duration::from_secs(3));

        let mut config = PortalConfig::default();
        assert!(config
            .apply_overrides(|key| (key == "AMN_TIMEOUT_SECS").then(|| "soon".to_string()))
            .is_err());
    }

    #[test]
    fn test_validation_rejects_bad_domains() {
        let mut config = PortalConfig::default();
        config.domains.push(config.domains[0].clone());
        assert!(config.validate().is_err());

        let mut config = PortalConfig::default();
        config.domains[0].levels.clear();
        assert!(config.validate().is_err());

        let mut config = PortalConfig::default();
        config.search.page_size = 0;
        assert!(config.validate().is_err());
    }
}
