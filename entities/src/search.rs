use chrono::{DateTime, TimeZone, Utc};
use content::Pagination;
use fields::{Language, LocalizedText};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use tracing::{debug, warn};

use crate::EntityType;

/// A single hit of the multi-entity search
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchResult {
    pub id: String,
    pub entity_type: EntityType,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub title_en: Option<String>,
    #[serde(default)]
    pub summary: Option<String>,
    #[serde(default)]
    pub summary_en: Option<String>,
    #[serde(default)]
    pub image_url: Option<String>,
    #[serde(default)]
    pub highlights: Vec<String>,
    #[serde(default)]
    pub navigation_route: Option<String>,
    /// Milliseconds since the Unix epoch
    #[serde(default)]
    pub created_timestamp: Option<i64>,
}

impl SearchResult {
    pub fn title(&self, language: Language) -> String {
        LocalizedText::from_options(Some(&self.title), self.title_en.as_deref()).resolve(language)
    }

    pub fn summary(&self, language: Language) -> String {
        LocalizedText::from_options(self.summary.as_deref(), self.summary_en.as_deref())
            .resolve(language)
    }

    pub fn created_at(&self) -> Option<DateTime<Utc>> {
        self.created_timestamp
            .and_then(|ms| Utc.timestamp_millis_opt(ms).single())
    }
}

/// Query echo and timing reported by the search backend
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchMetadata {
    #[serde(default)]
    pub query: String,
    #[serde(default)]
    pub total_results: u64,
    #[serde(default)]
    pub execution_time_ms: u64,
    #[serde(default)]
    pub entity_types_with_results_list: Vec<EntityType>,
}

/// One entity type available as a client-side filter
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Facet {
    pub entity_type: EntityType,
    pub count: usize,
    pub label: LocalizedText,
}

/// A page of search results.
///
/// Backends do not always send `resultsByType`; after
/// [`SearchResponse::normalized`] it is always present and partitions
/// `allResults`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchResponse {
    #[serde(default)]
    pub all_results: Vec<SearchResult>,
    #[serde(default)]
    pub results_by_type: Option<BTreeMap<EntityType, Vec<SearchResult>>>,
    #[serde(default)]
    pub metadata: SearchMetadata,
    #[serde(default = "default_pagination")]
    pub pagination: Pagination,
}

fn default_pagination() -> Pagination {
    Pagination::empty(1)
}

impl SearchResponse {
    /// Response for a query that was never sent
    pub fn empty(query: &str, page_size: u32) -> Self {
        Self {
            all_results: Vec::new(),
            results_by_type: Some(BTreeMap::new()),
            metadata: SearchMetadata {
                query: query.to_string(),
                ..SearchMetadata::default()
            },
            pagination: Pagination::empty(page_size),
        }
    }

    /// Group results by type, keeping their order within each group
    pub fn group_by_type(results: &[SearchResult]) -> BTreeMap<EntityType, Vec<SearchResult>> {
        let mut grouped: BTreeMap<EntityType, Vec<SearchResult>> = BTreeMap::new();
        for result in results {
            grouped
                .entry(result.entity_type)
                .or_default()
                .push(result.clone());
        }
        grouped
    }

    /// Whether `resultsByType` puts every result of `allResults` in exactly
    /// the bucket of its own type, and nothing else
    pub fn is_partitioned(&self) -> bool {
        let Some(by_type) = &self.results_by_type else {
            return false;
        };

        let mut expected: HashMap<(EntityType, &str), usize> = HashMap::new();
        for result in &self.all_results {
            *expected.entry((result.entity_type, result.id.as_str())).or_default() += 1;
        }

        for (entity_type, bucket) in by_type {
            for result in bucket {
                if result.entity_type != *entity_type {
                    return false;
                }
                match expected.get_mut(&(result.entity_type, result.id.as_str())) {
                    Some(count) if *count > 0 => *count -= 1,
                    _ => return false,
                }
            }
        }

        expected.values().all(|count| *count == 0)
    }

    /// Make the response self-consistent.
    ///
    /// `allResults` is authoritative: a missing or inconsistent
    /// `resultsByType` is rebuilt from it, and pagination is recomputed for
    /// `page_size`.
    pub fn normalized(mut self, page_size: u32) -> Self {
        match &self.results_by_type {
            None => {
                debug!("Search response has no resultsByType, grouping client-side");
                self.results_by_type = Some(Self::group_by_type(&self.all_results));
            }
            Some(_) if !self.is_partitioned() => {
                warn!(
                    "Search response resultsByType disagrees with allResults for query '{}', regrouping",
                    self.metadata.query
                );
                self.results_by_type = Some(Self::group_by_type(&self.all_results));
            }
            Some(_) => {}
        }

        if let Some(by_type) = &mut self.results_by_type {
            by_type.retain(|_, bucket| !bucket.is_empty());
        }

        self.pagination = self.pagination.normalized(page_size);
        self
    }

    /// Results of one type: the backend grouping when present, otherwise a
    /// filter over `allResults`
    pub fn results_for(&self, entity_type: EntityType) -> Vec<SearchResult> {
        match self
            .results_by_type
            .as_ref()
            .and_then(|by_type| by_type.get(&entity_type))
        {
            Some(bucket) => bucket.clone(),
            None => self.filter_all(entity_type),
        }
    }

    /// Client-side filter of `allResults` by type
    pub fn filter_all(&self, entity_type: EntityType) -> Vec<SearchResult> {
        self.all_results
            .iter()
            .filter(|r| r.entity_type == entity_type)
            .cloned()
            .collect()
    }

    /// Facets in the order the backend listed types with results, followed
    /// by any other type present on this page
    pub fn facets(&self) -> Vec<Facet> {
        let mut order: Vec<EntityType> = Vec::new();
        let present = self
            .metadata
            .entity_types_with_results_list
            .iter()
            .copied()
            .chain(self.all_results.iter().map(|r| r.entity_type));
        for entity_type in present {
            if !order.contains(&entity_type) {
                order.push(entity_type);
            }
        }

        order
            .into_iter()
            .map(|entity_type| Facet {
                entity_type,
                count: self.results_for(entity_type).len(),
                label: entity_type.label(),
            })
            .filter(|facet| facet.count > 0)
            .collect()
    }
}
