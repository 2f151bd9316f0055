use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::FieldsError;

/// Display language of the portal.
///
/// Arabic is the primary locale: content is authored in Arabic first and the
/// English fields are translations that may be missing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    #[default]
    Ar,
    En,
}

/// Text direction implied by a language
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TextDirection {
    Rtl,
    Ltr,
}

impl Language {
    /// The primary locale, whose fields are never empty on well-formed content
    pub const PRIMARY: Language = Language::Ar;

    pub fn is_primary(self) -> bool {
        self == Self::PRIMARY
    }

    pub fn direction(self) -> TextDirection {
        match self {
            Language::Ar => TextDirection::Rtl,
            Language::En => TextDirection::Ltr,
        }
    }

    pub fn code(self) -> &'static str {
        match self {
            Language::Ar => "ar",
            Language::En => "en",
        }
    }

    /// The other language
    pub fn toggled(self) -> Self {
        match self {
            Language::Ar => Language::En,
            Language::En => Language::Ar,
        }
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for Language {
    type Err = FieldsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "ar" => Ok(Language::Ar),
            "en" => Ok(Language::En),
            other => Err(FieldsError::InvalidType(format!(
                "Unsupported language '{}', expected 'ar' or 'en'",
                other
            ))),
        }
    }
}

/// Pick the display string for `language` out of a bilingual pair.
///
/// The primary locale always gets `primary`. Any other locale gets `fallback`
/// when it is non-empty and `primary` otherwise. Missing values resolve to an
/// empty string.
pub fn resolve_localized(language: Language, primary: Option<&str>, fallback: Option<&str>) -> String {
    let primary = primary.unwrap_or_default();
    if language.is_primary() {
        return primary.to_string();
    }

    match fallback {
        Some(text) if !text.trim().is_empty() => text.to_string(),
        _ => primary.to_string(),
    }
}

/// A bilingual text value: the Arabic original and its English translation
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LocalizedText {
    #[serde(default)]
    pub primary: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fallback: Option<String>,
}

impl LocalizedText {
    pub fn new(primary: impl Into<String>, fallback: impl Into<String>) -> Self {
        let fallback = fallback.into();
        Self {
            primary: primary.into(),
            fallback: if fallback.is_empty() { None } else { Some(fallback) },
        }
    }

    /// Build from the optional pair carried by wire models
    pub fn from_options(primary: Option<&str>, fallback: Option<&str>) -> Self {
        Self {
            primary: primary.unwrap_or_default().to_string(),
            fallback: fallback
                .filter(|text| !text.is_empty())
                .map(str::to_string),
        }
    }

    pub fn resolve(&self, language: Language) -> String {
        resolve_localized(language, Some(&self.primary), self.fallback.as_deref())
    }

    pub fn is_empty(&self) -> bool {
        self.primary.trim().is_empty()
            && self
                .fallback
                .as_deref()
                .map_or(true, |text| text.trim().is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_primary_language_uses_primary_field() {
        assert_eq!(
            resolve_localized(Language::Ar, Some("كلمات المرور"), Some("Passwords")),
            "كلمات المرور"
        );
    }

    #[test]
    fn test_secondary_language_uses_fallback_field() {
        assert_eq!(
            resolve_localized(Language::En, Some("كلمات المرور"), Some("Passwords")),
            "Passwords"
        );
    }

    #[test]
    fn test_missing_translation_falls_back_to_primary() {
        assert_eq!(resolve_localized(Language::En, Some("نسخ"), Some("")), "نسخ");
        assert_eq!(resolve_localized(Language::En, Some("نسخ"), Some("   ")), "نسخ");
        assert_eq!(resolve_localized(Language::En, Some("نسخ"), None), "نسخ");
    }

    #[test]
    fn test_missing_values_resolve_to_empty() {
        assert_eq!(resolve_localized(Language::Ar, None, Some("x")), "");
        assert_eq!(resolve_localized(Language::En, None, None), "");
    }

    #[test]
    fn test_language_parsing_and_direction() {
        assert_eq!("AR".parse::<Language>().unwrap(), Language::Ar);
        assert_eq!(" en ".parse::<Language>().unwrap(), Language::En);
        assert!("fr".parse::<Language>().is_err());

        assert_eq!(Language::Ar.direction(), TextDirection::Rtl);
        assert_eq!(Language::En.direction(), TextDirection::Ltr);
        assert_eq!(Language::Ar.toggled(), Language::En);
    }

    #[test]
    fn test_localized_text() {
        let text = LocalizedText::new("أخبار", "");
        assert_eq!(text.fallback, None);
        assert_eq!(text.resolve(Language::En), "أخبار");
        assert!(!text.is_empty());
        assert!(LocalizedText::default().is_empty());
    }
}
