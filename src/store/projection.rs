//! Client-side filtering and pagination over an in-memory snapshot.
//!
//! Everything here is pure: the same entities and parameters always give the
//! same page, in the same relative order as the input.

use std::borrow::Cow;

use crate::domain::ValidationError;

/// Exposes named string fields so a list can be filtered by column key.
pub trait FieldLookup {
    fn field(&self, key: &str) -> Option<Cow<'_, str>>;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ViewParameters {
    page_index: usize,
    page_size: usize,
    filter_text: String,
}

impl ViewParameters {
    /// `page_index` is 1-based; zero is clamped to the first page.
    pub fn new(
        page_index: usize,
        page_size: usize,
        filter_text: impl Into<String>,
    ) -> Result<Self, ValidationError> {
        if page_size == 0 {
            return Err(ValidationError::new(
                "Page size must be greater than zero".to_string(),
            ));
        }
        Ok(Self {
            page_index: page_index.max(1),
            page_size,
            filter_text: filter_text.into(),
        })
    }

    pub fn page_index(&self) -> usize {
        self.page_index
    }

    pub fn page_size(&self) -> usize {
        self.page_size
    }

    pub fn filter_text(&self) -> &str {
        &self.filter_text
    }

    pub fn with_page(mut self, page_index: usize) -> Self {
        self.page_index = page_index.max(1);
        self
    }

    pub fn with_filter(mut self, filter_text: impl Into<String>) -> Self {
        self.filter_text = filter_text.into();
        self
    }

    fn offset(&self) -> usize {
        (self.page_index - 1).saturating_mul(self.page_size)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Projection<T> {
    pub page: Vec<T>,
    /// Number of entities that passed the filter, before pagination.
    pub total_count: usize,
}

pub fn project<T: FieldLookup + Clone>(
    entities: &[T],
    params: &ViewParameters,
    filter_key: &str,
) -> Projection<T> {
    let needle = params.filter_text.to_lowercase();
    let filtered: Vec<&T> = entities
        .iter()
        .filter(|entity| matches_filter(*entity, filter_key, &needle))
        .collect();

    let total_count = filtered.len();
    let page = filtered
        .into_iter()
        .skip(params.offset())
        .take(params.page_size)
        .cloned()
        .collect();

    Projection { page, total_count }
}

fn matches_filter<T: FieldLookup>(entity: &T, key: &str, needle: &str) -> bool {
    if needle.is_empty() {
        return true;
    }
    entity
        .field(key)
        .is_some_and(|value| value.to_lowercase().contains(needle))
}
