//! The generic content tree node returned by every list and detail endpoint

use chrono::{DateTime, NaiveDateTime, Utc};
use fields::{Language, LocalizedText};
use serde::{Deserialize, Deserializer, Serialize};

use crate::slug::Sluggable;
use crate::utils::{extract_summary, strip_html_tags};

/// Length of the excerpt used when a node has no explicit summary
pub const EXCERPT_LENGTH: usize = 200;

/// A category, control, procedure, article or any other node of a content tree
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContentNode {
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub name_en: Option<String>,
    #[serde(default)]
    pub summary: Option<String>,
    #[serde(default)]
    pub summary_en: Option<String>,
    #[serde(default)]
    pub content: Option<String>,
    #[serde(default)]
    pub content_en: Option<String>,
    #[serde(default)]
    pub image_url: Option<String>,
    #[serde(default)]
    pub video_url: Option<String>,
    #[serde(default)]
    pub document_url: Option<String>,
    #[serde(default)]
    pub order: i32,
    #[serde(default, deserialize_with = "deserialize_timestamp")]
    pub created_at: Option<DateTime<Utc>>,
}

/// Optional media attached to a node
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "url", rename_all = "lowercase")]
pub enum MediaBlock {
    Image(String),
    Video(String),
    Document(String),
}

impl ContentNode {
    /// Minimal node, mostly useful for fixtures
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            name_en: None,
            summary: None,
            summary_en: None,
            content: None,
            content_en: None,
            image_url: None,
            video_url: None,
            document_url: None,
            order: 0,
            created_at: None,
        }
    }

    pub fn with_name_en(mut self, name_en: impl Into<String>) -> Self {
        self.name_en = Some(name_en.into());
        self
    }

    pub fn with_content(mut self, content: impl Into<String>, content_en: impl Into<String>) -> Self {
        self.content = Some(content.into());
        self.content_en = Some(content_en.into());
        self
    }

    pub fn with_order(mut self, order: i32) -> Self {
        self.order = order;
        self
    }

    pub fn name_text(&self) -> LocalizedText {
        LocalizedText::from_options(Some(&self.name), self.name_en.as_deref())
    }

    pub fn title(&self, language: Language) -> String {
        self.name_text().resolve(language)
    }

    /// Localized summary, or an excerpt of the body when no summary exists
    pub fn summary(&self, language: Language) -> String {
        let summary = LocalizedText::from_options(self.summary.as_deref(), self.summary_en.as_deref())
            .resolve(language);
        if !summary.trim().is_empty() {
            return summary;
        }
        extract_summary(&strip_html_tags(&self.body(language)), EXCERPT_LENGTH)
    }

    /// Localized body HTML, unsanitized
    pub fn body(&self, language: Language) -> String {
        LocalizedText::from_options(self.content.as_deref(), self.content_en.as_deref())
            .resolve(language)
    }

    /// Whether the payload carries body content in either language.
    ///
    /// List endpoints usually omit bodies; a detail fetch is needed when false.
    pub fn has_body(&self) -> bool {
        [&self.content, &self.content_en]
            .iter()
            .any(|c| c.as_deref().is_some_and(|text| !text.trim().is_empty()))
    }

    /// Media blocks for every non-empty media URL, in display order
    pub fn media(&self) -> Vec<MediaBlock> {
        let non_empty = |url: &Option<String>| {
            url.as_deref()
                .map(str::trim)
                .filter(|url| !url.is_empty())
                .map(str::to_string)
        };

        let mut blocks = Vec::new();
        if let Some(url) = non_empty(&self.image_url) {
            blocks.push(MediaBlock::Image(url));
        }
        if let Some(url) = non_empty(&self.video_url) {
            blocks.push(MediaBlock::Video(url));
        }
        if let Some(url) = non_empty(&self.document_url) {
            blocks.push(MediaBlock::Document(url));
        }
        blocks
    }
}

impl Sluggable for ContentNode {
    fn slug_id(&self) -> &str {
        &self.id
    }

    fn slug_name(&self) -> &str {
        &self.name
    }

    fn slug_name_en(&self) -> Option<&str> {
        self.name_en.as_deref()
    }
}

/// Order siblings by their `order` key, oldest first on ties
pub fn sort_siblings(nodes: &mut [ContentNode]) {
    nodes.sort_by(|a, b| a.order.cmp(&b.order).then(a.created_at.cmp(&b.created_at)));
}

/// Accepts RFC 3339 and offset-less ISO timestamps (read as UTC)
fn deserialize_timestamp<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<String> = Option::deserialize(deserializer)?;
    let Some(raw) = raw.filter(|s| !s.trim().is_empty()) else {
        return Ok(None);
    };

    if let Ok(parsed) = DateTime::parse_from_rfc3339(&raw) {
        return Ok(Some(parsed.with_timezone(&Utc)));
    }

    NaiveDateTime::parse_from_str(&raw, "%Y-%m-%dT%H:%M:%S%.f")
        .map(|naive| Some(naive.and_utc()))
        .map_err(serde::de::Error::custom)
}
