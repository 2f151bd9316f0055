use serde::{Deserialize, Serialize};

use crate::locale::LocalizedText;

/// Input types supported by portal forms
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "snake_case")]
pub enum FieldType {
    Text,
    LongText,
    Email,
    Phone,
    Number,
    Datetime,
    Choice,
}

impl FieldType {
    /// Check if this field type needs a list of options
    pub fn requires_options(&self) -> bool {
        matches!(self, FieldType::Choice)
    }
}

/// Form field definition
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Field {
    pub id: String,
    #[serde(rename = "type")]
    pub field_type: FieldType,
    pub label: LocalizedText,
    #[serde(default)]
    pub required: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_length: Option<usize>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub options: Vec<String>,
}

impl Field {
    /// Create a new optional field
    pub fn new(id: impl Into<String>, field_type: FieldType, label: LocalizedText) -> Self {
        Self {
            id: id.into(),
            field_type,
            label,
            required: false,
            max_length: None,
            options: Vec::new(),
        }
    }

    /// Set the field as required
    pub fn required(mut self, required: bool) -> Self {
        self.required = required;
        self
    }

    /// Limit the number of characters accepted
    pub fn with_max_length(mut self, max_length: usize) -> Self {
        self.max_length = Some(max_length);
        self
    }

    /// Set the accepted values of a choice field
    pub fn with_options<I, S>(mut self, options: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.options = options.into_iter().map(Into::into).collect();
        self
    }

    /// Validate the field configuration
    pub fn validate(&self) -> Result<(), String> {
        if self.id.is_empty() {
            return Err("Field ID cannot be empty".to_string());
        }

        if self.label.is_empty() {
            return Err(format!("Field '{}' label cannot be empty", self.id));
        }

        if self.field_type.requires_options() && self.options.is_empty() {
            return Err(format!("Field '{}' is a choice but has no options", self.id));
        }

        if self.max_length == Some(0) {
            return Err(format!("Field '{}' max_length must be positive", self.id));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn label(text: &str) -> LocalizedText {
        LocalizedText::new(text, text)
    }

    #[test]
    fn test_field_type_properties() {
        assert!(FieldType::Choice.requires_options());
        assert!(!FieldType::Text.requires_options());
    }

    #[test]
    fn test_field_builder() {
        let field = Field::new("description", FieldType::LongText, label("Description"))
            .required(true)
            .with_max_length(2000);

        assert_eq!(field.id, "description");
        assert_eq!(field.field_type, FieldType::LongText);
        assert!(field.required);
        assert_eq!(field.max_length, Some(2000));
    }

    #[test]
    fn test_field_validation() {
        assert!(Field::new("name", FieldType::Text, label("Name"))
            .validate()
            .is_ok());
        assert!(Field::new("", FieldType::Text, label("Name"))
            .validate()
            .is_err());
        assert!(Field::new("name", FieldType::Text, LocalizedText::default())
            .validate()
            .is_err());

        let choice = Field::new("kind", FieldType::Choice, label("Kind"));
        assert!(choice.validate().is_err());
        assert!(choice.with_options(["phishing", "malware"]).validate().is_ok());
    }
}
