use fields::LocalizedText;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::EntitiesError;

/// Every kind of entity the search backend can return
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum EntityType {
    News,
    Definition,
    Law,
    Regulation,
    Standard,
    StandardCategory,
    StandardSubCategory,
    StandardControl,
    StandardControlStep,
    Procedure,
    ProcedureControl,
    ProcedureSafeguard,
    ProcedureTechnique,
    ProcedureImplementationStep,
    PersonalProtection,
    PersonalProtectionControl,
    PersonalProtectionStep,
    Video,
    Lecture,
    Presentation,
}

impl EntityType {
    pub const ALL: [EntityType; 20] = [
        EntityType::News,
        EntityType::Definition,
        EntityType::Law,
        EntityType::Regulation,
        EntityType::Standard,
        EntityType::StandardCategory,
        EntityType::StandardSubCategory,
        EntityType::StandardControl,
        EntityType::StandardControlStep,
        EntityType::Procedure,
        EntityType::ProcedureControl,
        EntityType::ProcedureSafeguard,
        EntityType::ProcedureTechnique,
        EntityType::ProcedureImplementationStep,
        EntityType::PersonalProtection,
        EntityType::PersonalProtectionControl,
        EntityType::PersonalProtectionStep,
        EntityType::Video,
        EntityType::Lecture,
        EntityType::Presentation,
    ];

    /// Wire name, as used by the search backend
    pub fn as_str(self) -> &'static str {
        match self {
            EntityType::News => "News",
            EntityType::Definition => "Definition",
            EntityType::Law => "Law",
            EntityType::Regulation => "Regulation",
            EntityType::Standard => "Standard",
            EntityType::StandardCategory => "StandardCategory",
            EntityType::StandardSubCategory => "StandardSubCategory",
            EntityType::StandardControl => "StandardControl",
            EntityType::StandardControlStep => "StandardControlStep",
            EntityType::Procedure => "Procedure",
            EntityType::ProcedureControl => "ProcedureControl",
            EntityType::ProcedureSafeguard => "ProcedureSafeguard",
            EntityType::ProcedureTechnique => "ProcedureTechnique",
            EntityType::ProcedureImplementationStep => "ProcedureImplementationStep",
            EntityType::PersonalProtection => "PersonalProtection",
            EntityType::PersonalProtectionControl => "PersonalProtectionControl",
            EntityType::PersonalProtectionStep => "PersonalProtectionStep",
            EntityType::Video => "Video",
            EntityType::Lecture => "Lecture",
            EntityType::Presentation => "Presentation",
        }
    }

    /// Facet label
    pub fn label(self) -> LocalizedText {
        let (ar, en) = match self {
            EntityType::News => ("الأخبار", "News"),
            EntityType::Definition => ("التعريفات", "Definitions"),
            EntityType::Law => ("الأنظمة", "Laws"),
            EntityType::Regulation => ("اللوائح", "Regulations"),
            EntityType::Standard => ("المعايير", "Standards"),
            EntityType::StandardCategory => ("فئات المعايير", "Standard categories"),
            EntityType::StandardSubCategory => ("الفئات الفرعية", "Standard subcategories"),
            EntityType::StandardControl => ("الضوابط", "Standard controls"),
            EntityType::StandardControlStep => ("خطوات الضوابط", "Control steps"),
            EntityType::Procedure => ("الإجراءات", "Procedures"),
            EntityType::ProcedureControl => ("ضوابط الإجراءات", "Procedure controls"),
            EntityType::ProcedureSafeguard => ("الضمانات", "Safeguards"),
            EntityType::ProcedureTechnique => ("التقنيات", "Techniques"),
            EntityType::ProcedureImplementationStep => ("خطوات التنفيذ", "Implementation steps"),
            EntityType::PersonalProtection => ("الحماية الشخصية", "Personal protection"),
            EntityType::PersonalProtectionControl => {
                ("ضوابط الحماية الشخصية", "Personal protection controls")
            }
            EntityType::PersonalProtectionStep => {
                ("خطوات الحماية الشخصية", "Personal protection steps")
            }
            EntityType::Video => ("الفيديوهات", "Videos"),
            EntityType::Lecture => ("المحاضرات", "Lectures"),
            EntityType::Presentation => ("العروض التقديمية", "Presentations"),
        };
        LocalizedText::new(ar, en)
    }
}

impl fmt::Display for EntityType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EntityType {
    type Err = EntitiesError;

    /// Case-insensitive; also accepts `snake_case` and `kebab-case` spellings
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted: String = s
            .chars()
            .filter(|c| *c != '_' && *c != '-')
            .collect::<String>()
            .to_ascii_lowercase();
        EntityType::ALL
            .iter()
            .copied()
            .find(|t| t.as_str().to_ascii_lowercase() == wanted)
            .ok_or_else(|| EntitiesError::UnknownEntityType(s.to_string()))
    }
}
