use fields::{Language, LocalizedText};
use serde::Serialize;

/// One entry of the navigation trail
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BreadcrumbItem {
    pub label: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub href: Option<String>,
}

/// An ancestor as far as it has been resolved
#[derive(Debug, Clone, PartialEq)]
pub enum Crumb {
    /// Its fetch has not settled yet
    Pending,
    Resolved { name: LocalizedText, href: String },
}

impl Crumb {
    pub fn resolved(name: LocalizedText, href: impl Into<String>) -> Self {
        Crumb::Resolved {
            name,
            href: href.into(),
        }
    }
}

/// Builds breadcrumb trails, root first
#[derive(Debug, Clone)]
pub struct BreadcrumbBuilder {
    language: Language,
    placeholder: LocalizedText,
}

impl BreadcrumbBuilder {
    pub fn new(language: Language) -> Self {
        Self {
            language,
            placeholder: LocalizedText::new("جار التحميل...", "Loading..."),
        }
    }

    pub fn with_placeholder(mut self, placeholder: LocalizedText) -> Self {
        self.placeholder = placeholder;
        self
    }

    /// One item per ancestor plus a terminal item for the current page.
    ///
    /// Pending ancestors get the placeholder label and no link; resolved ones
    /// render whatever the state of the others. The terminal item never links.
    pub fn build(
        &self,
        ancestors: &[Crumb],
        current: Option<&LocalizedText>,
        is_loading: bool,
    ) -> Vec<BreadcrumbItem> {
        let placeholder = self.placeholder.resolve(self.language);

        let mut items: Vec<BreadcrumbItem> = ancestors
            .iter()
            .map(|crumb| match crumb {
                Crumb::Pending => BreadcrumbItem {
                    label: placeholder.clone(),
                    href: None,
                },
                Crumb::Resolved { name, href } => BreadcrumbItem {
                    label: name.resolve(self.language),
                    href: Some(href.clone()),
                },
            })
            .collect();

        let terminal_label = match current {
            Some(name) if !(is_loading && name.is_empty()) => name.resolve(self.language),
            _ => placeholder,
        };
        items.push(BreadcrumbItem {
            label: terminal_label,
            href: None,
        });

        items
    }
}
