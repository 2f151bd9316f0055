//! URL slugs for content nodes.
//!
//! A slug is the normalized display name followed by the normalized id, e.g.
//! `passwords-s1`. The id suffix keeps slugs unique among siblings that share
//! a name and lets a slug be matched back to its node even after a rename.

use tracing::debug;

use crate::error::ContentError;

/// Anything that can be addressed by a slug
pub trait Sluggable {
    fn slug_id(&self) -> &str;

    /// Primary (Arabic) display name
    fn slug_name(&self) -> &str;

    /// English display name, preferred for slugs when present
    fn slug_name_en(&self) -> Option<&str>;

    /// Canonical slug: English name when available, primary name otherwise
    fn slug(&self) -> String {
        let name = self
            .slug_name_en()
            .filter(|name| !name.trim().is_empty())
            .unwrap_or_else(|| self.slug_name());
        slugify(name, self.slug_id())
    }
}

/// Lowercase `text` and collapse every run of whitespace or punctuation into
/// a single hyphen. Letters and digits of any script are kept.
pub fn normalize_segment(text: &str) -> String {
    text.chars()
        .flat_map(char::to_lowercase)
        .map(|c| if c.is_alphanumeric() { c } else { ' ' })
        .collect::<String>()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join("-")
}

/// Build the slug for a node named `name` with identifier `id`
pub fn slugify(name: &str, id: &str) -> String {
    let name = normalize_segment(name);
    let id = normalize_segment(id);
    match (name.is_empty(), id.is_empty()) {
        (_, true) => name,
        (true, false) => id,
        (false, false) => format!("{}-{}", name, id),
    }
}

/// Whether `slug` carries `id` as its suffix (or is the id itself)
pub fn slug_has_id(slug: &str, id: &str) -> bool {
    let id = normalize_segment(id);
    if id.is_empty() {
        return false;
    }
    let slug = slug.to_lowercase();
    slug == id || slug.ends_with(&format!("-{}", id))
}

/// Find the item a route slug refers to.
///
/// Tried in order: the canonical slug, the raw id (old short links), the slug
/// built from the primary name, and finally the id suffix alone, which still
/// matches links created before the node was renamed.
pub fn resolve_by_slug<'a, T: Sluggable>(items: &'a [T], slug: &str) -> Result<&'a T, ContentError> {
    let wanted = slug.trim().to_lowercase();
    if wanted.is_empty() {
        return Err(ContentError::NotFound(slug.to_string()));
    }

    let found = items
        .iter()
        .find(|item| item.slug() == wanted)
        .or_else(|| {
            items
                .iter()
                .find(|item| item.slug_id().eq_ignore_ascii_case(slug.trim()))
        })
        .or_else(|| {
            items
                .iter()
                .find(|item| slugify(item.slug_name(), item.slug_id()) == wanted)
        })
        .or_else(|| items.iter().find(|item| slug_has_id(&wanted, item.slug_id())));

    match found {
        Some(item) => {
            debug!("Resolved slug '{}' to id '{}'", slug, item.slug_id());
            Ok(item)
        }
        None => {
            debug!("Slug '{}' matched none of {} siblings", slug, items.len());
            Err(ContentError::NotFound(slug.to_string()))
        }
    }
}
