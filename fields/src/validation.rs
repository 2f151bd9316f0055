use crate::{Field, FieldType, Language};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;
use serde_json::Value as JsonValue;
use std::collections::HashMap;

static EMAIL_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[A-Za-z0-9._%+-]+@[A-Za-z0-9.-]+\.[A-Za-z]{2,}$").expect("valid email regex")
});

static PHONE_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\+?[0-9]{8,15}$").expect("valid phone regex"));

static NUMBER_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[0-9]+$").expect("valid number regex"));

/// Why a single field was rejected
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldErrorKind {
    Required,
    WrongType,
    InvalidEmail,
    InvalidPhone,
    InvalidNumber,
    InvalidDatetime,
    TooLong { max: usize },
    NotAnOption,
}

/// A field-level validation failure, rendered inline next to the input
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
    pub field: String,
    pub kind: FieldErrorKind,
}

impl FieldError {
    fn new(field: &Field, kind: FieldErrorKind) -> Self {
        Self {
            field: field.id.clone(),
            kind,
        }
    }

    /// User-facing message in the requested language
    pub fn message(&self, language: Language) -> String {
        match (&self.kind, language) {
            (FieldErrorKind::Required, Language::Ar) => "هذا الحقل مطلوب".to_string(),
            (FieldErrorKind::Required, Language::En) => "This field is required".to_string(),
            (FieldErrorKind::WrongType, Language::Ar) => "قيمة غير صالحة".to_string(),
            (FieldErrorKind::WrongType, Language::En) => "Invalid value".to_string(),
            (FieldErrorKind::InvalidEmail, Language::Ar) => {
                "يرجى إدخال بريد إلكتروني صحيح".to_string()
            }
            (FieldErrorKind::InvalidEmail, Language::En) => {
                "Please enter a valid email address".to_string()
            }
            (FieldErrorKind::InvalidPhone, Language::Ar) => "يرجى إدخال رقم هاتف صحيح".to_string(),
            (FieldErrorKind::InvalidPhone, Language::En) => {
                "Please enter a valid phone number".to_string()
            }
            (FieldErrorKind::InvalidNumber, Language::Ar) => "يرجى إدخال أرقام فقط".to_string(),
            (FieldErrorKind::InvalidNumber, Language::En) => "Please enter digits only".to_string(),
            (FieldErrorKind::InvalidDatetime, Language::Ar) => "تاريخ غير صالح".to_string(),
            (FieldErrorKind::InvalidDatetime, Language::En) => "Invalid date".to_string(),
            (FieldErrorKind::TooLong { max }, Language::Ar) => {
                format!("الحد الأقصى {} حرفاً", max)
            }
            (FieldErrorKind::TooLong { max }, Language::En) => {
                format!("Maximum {} characters", max)
            }
            (FieldErrorKind::NotAnOption, Language::Ar) => "يرجى اختيار قيمة من القائمة".to_string(),
            (FieldErrorKind::NotAnOption, Language::En) => {
                "Please choose a value from the list".to_string()
            }
        }
    }
}

/// Validates submitted form values against their field definitions
pub struct FieldValidator;

impl FieldValidator {
    /// Validate every field and collect all failures.
    ///
    /// Submission must be blocked while the returned list is non-empty.
    pub fn validate_form(fields: &[Field], values: &HashMap<String, JsonValue>) -> Vec<FieldError> {
        fields
            .iter()
            .filter_map(|field| {
                Self::validate_field_value(field, values.get(&field.id).unwrap_or(&JsonValue::Null))
                    .err()
            })
            .collect()
    }

    /// Validate a field value against its field definition
    pub fn validate_field_value(field: &Field, value: &JsonValue) -> Result<(), FieldError> {
        let text = match value {
            JsonValue::Null => None,
            JsonValue::String(s) if s.trim().is_empty() => None,
            JsonValue::String(s) => Some(s.trim().to_string()),
            JsonValue::Number(n) if field.field_type == FieldType::Number => Some(n.to_string()),
            _ => return Err(FieldError::new(field, FieldErrorKind::WrongType)),
        };

        let Some(text) = text else {
            if field.required {
                return Err(FieldError::new(field, FieldErrorKind::Required));
            }
            return Ok(());
        };

        if let Some(max) = field.max_length {
            if text.chars().count() > max {
                return Err(FieldError::new(field, FieldErrorKind::TooLong { max }));
            }
        }

        match field.field_type {
            FieldType::Text | FieldType::LongText => Ok(()),
            FieldType::Email => Self::check(field, &EMAIL_PATTERN, &text, FieldErrorKind::InvalidEmail),
            FieldType::Phone => {
                let compact: String = text.chars().filter(|c| *c != ' ' && *c != '-').collect();
                Self::check(field, &PHONE_PATTERN, &compact, FieldErrorKind::InvalidPhone)
            }
            FieldType::Number => {
                Self::check(field, &NUMBER_PATTERN, &text, FieldErrorKind::InvalidNumber)
            }
            FieldType::Datetime => Self::validate_datetime(field, &text),
            FieldType::Choice => {
                if field.options.iter().any(|option| option == &text) {
                    Ok(())
                } else {
                    Err(FieldError::new(field, FieldErrorKind::NotAnOption))
                }
            }
        }
    }

    fn check(field: &Field, pattern: &Regex, text: &str, kind: FieldErrorKind) -> Result<(), FieldError> {
        if pattern.is_match(text) {
            Ok(())
        } else {
            Err(FieldError::new(field, kind))
        }
    }

    /// Accepts RFC 3339 timestamps and plain `YYYY-MM-DD` dates
    fn validate_datetime(field: &Field, text: &str) -> Result<(), FieldError> {
        let valid = chrono::DateTime::parse_from_rfc3339(text).is_ok()
            || chrono::NaiveDate::parse_from_str(text, "%Y-%m-%d").is_ok();
        if valid {
            Ok(())
        } else {
            Err(FieldError::new(field, FieldErrorKind::InvalidDatetime))
        }
    }
}
