//! Bilingual text handling, presentation settings and form field validation.

use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;
use std::collections::HashMap;

pub mod error;
pub mod field_types;
pub mod locale;
pub mod settings;
pub mod validation;

pub use error::{FieldsError, Result};
pub use field_types::{Field, FieldType};
pub use locale::{resolve_localized, Language, LocalizedText, TextDirection};
pub use settings::{Settings, SettingsHandle, Theme};
pub use validation::{FieldError, FieldErrorKind, FieldValidator};

/// An ordered set of form fields
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FormSchema {
    pub id: String,
    fields: Vec<Field>,
}

impl FormSchema {
    /// Create a form, rejecting invalid or duplicated field definitions
    pub fn new(id: impl Into<String>, fields: Vec<Field>) -> Result<Self> {
        let mut seen = std::collections::HashSet::new();
        for field in &fields {
            field.validate().map_err(FieldsError::InvalidDefinition)?;
            if !seen.insert(field.id.as_str()) {
                return Err(FieldsError::InvalidDefinition(format!(
                    "Duplicate field '{}'",
                    field.id
                )));
            }
        }
        Ok(Self {
            id: id.into(),
            fields,
        })
    }

    /// The cyber incident report form
    pub fn incident_report() -> Self {
        let fields = vec![
            Field::new(
                "fullName",
                FieldType::Text,
                LocalizedText::new("الاسم الكامل", "Full name"),
            )
            .required(true)
            .with_max_length(100),
            Field::new(
                "email",
                FieldType::Email,
                LocalizedText::new("البريد الإلكتروني", "Email"),
            )
            .required(true),
            Field::new(
                "phoneNumber",
                FieldType::Phone,
                LocalizedText::new("رقم الهاتف", "Phone number"),
            ),
            Field::new(
                "nationalId",
                FieldType::Number,
                LocalizedText::new("رقم الهوية", "National ID"),
            )
            .with_max_length(10),
            Field::new(
                "incidentType",
                FieldType::Choice,
                LocalizedText::new("نوع الحادثة", "Incident type"),
            )
            .required(true)
            .with_options(["phishing", "malware", "fraud", "account_takeover", "other"]),
            Field::new(
                "incidentDate",
                FieldType::Datetime,
                LocalizedText::new("تاريخ الحادثة", "Incident date"),
            ),
            Field::new(
                "description",
                FieldType::LongText,
                LocalizedText::new("وصف الحادثة", "Description"),
            )
            .required(true)
            .with_max_length(2000),
        ];

        Self {
            id: "incident_report".to_string(),
            fields,
        }
    }

    pub fn fields(&self) -> &[Field] {
        &self.fields
    }

    pub fn get_field(&self, id: &str) -> Option<&Field> {
        self.fields.iter().find(|f| f.id == id)
    }

    /// Validate submitted values, returning every field-level error
    pub fn validate_values(&self, values: &HashMap<String, JsonValue>) -> Vec<FieldError> {
        FieldValidator::validate_form(&self.fields, values)
    }

    /// Validate and fail as a whole when any field is rejected
    pub fn ensure_valid(&self, values: &HashMap<String, JsonValue>) -> Result<()> {
        let errors = self.validate_values(values);
        if errors.is_empty() {
            Ok(())
        } else {
            tracing::debug!(form = %self.id, rejected = errors.len(), "form submission blocked");
            Err(FieldsError::Validation(errors.len()))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_incident_report_form_definition_is_valid() {
        let form = FormSchema::incident_report();
        assert!(FormSchema::new(form.id.clone(), form.fields().to_vec()).is_ok());
        assert!(form.get_field("email").unwrap().required);
        assert!(form.get_field("unknown").is_none());
    }

    #[test]
    fn test_duplicate_field_ids_rejected() {
        let label = LocalizedText::new("اسم", "Name");
        let result = FormSchema::new(
            "dup",
            vec![
                Field::new("name", FieldType::Text, label.clone()),
                Field::new("name", FieldType::Text, label),
            ],
        );
        assert!(matches!(result, Err(FieldsError::InvalidDefinition(_))));
    }

    #[test]
    fn test_incident_report_submission() {
        let form = FormSchema::incident_report();
        let mut values = HashMap::new();
        values.insert("fullName".to_string(), json!("Sara Ahmed"));
        values.insert("email".to_string(), json!("sara@example.com"));
        values.insert("incidentType".to_string(), json!("phishing"));
        values.insert("description".to_string(), json!("Suspicious link received by SMS"));
        assert!(form.ensure_valid(&values).is_ok());

        values.insert("phoneNumber".to_string(), json!("123"));
        assert!(matches!(
            form.ensure_valid(&values),
            Err(FieldsError::Validation(1))
        ));
    }
}
