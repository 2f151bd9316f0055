use serde::Serialize;
use std::fmt;

use crate::error::ContentError;

/// A hierarchical portal path: `/{domain}/{slug}/{slug}/...`
///
/// Segments are held decoded; [`RoutePath::href`] percent-encodes them so
/// Arabic slugs survive in links.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RoutePath {
    pub domain: String,
    pub segments: Vec<String>,
}

impl RoutePath {
    pub fn new(domain: impl Into<String>) -> Self {
        Self {
            domain: domain.into(),
            segments: Vec::new(),
        }
    }

    /// Parse a path such as `/standards/governance-c1/passwords-s1`
    pub fn parse(path: &str) -> Result<Self, ContentError> {
        let path = path.split(['?', '#']).next().unwrap_or_default();
        let mut parts = path
            .split('/')
            .filter(|part| !part.is_empty())
            .map(|part| {
                urlencoding::decode(part)
                    .map(|decoded| decoded.into_owned())
                    .map_err(|e| ContentError::InvalidRoute(format!("{}: {}", part, e)))
            });

        let domain = parts
            .next()
            .ok_or_else(|| ContentError::InvalidRoute(format!("'{}' has no domain", path)))??;
        let segments = parts.collect::<Result<Vec<_>, _>>()?;

        Ok(Self { domain, segments })
    }

    /// Path one level deeper
    pub fn child(&self, slug: impl Into<String>) -> Self {
        let mut next = self.clone();
        next.segments.push(slug.into());
        next
    }

    /// Path truncated to its first `depth` segments
    pub fn prefix(&self, depth: usize) -> Self {
        Self {
            domain: self.domain.clone(),
            segments: self.segments.iter().take(depth).cloned().collect(),
        }
    }

    pub fn parent(&self) -> Option<Self> {
        if self.segments.is_empty() {
            None
        } else {
            Some(self.prefix(self.segments.len() - 1))
        }
    }

    pub fn depth(&self) -> usize {
        self.segments.len()
    }

    /// Encoded link target
    pub fn href(&self) -> String {
        let mut href = format!("/{}", urlencoding::encode(&self.domain));
        for segment in &self.segments {
            href.push('/');
            href.push_str(&urlencoding::encode(segment));
        }
        href
    }
}

impl fmt::Display for RoutePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.href())
    }
}
