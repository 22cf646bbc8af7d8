use crate::domain::PostStatus;
use crate::store::{Projection, ViewParameters};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusBadge {
    pub value: &'static str,
    pub label: &'static str,
    pub tone: &'static str,
}

impl From<PostStatus> for StatusBadge {
    fn from(status: PostStatus) -> Self {
        Self {
            value: status.label(),
            label: status.label(),
            tone: status.tone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ColumnKind {
    Date,
    Text,
    Status(Vec<StatusBadge>),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Column {
    pub key: &'static str,
    pub label: &'static str,
    pub kind: ColumnKind,
    /// Whether the table offers a per-column filter control.
    pub filter: bool,
}

impl Column {
    pub fn new(
        key: &'static str,
        label: &'static str,
        kind: ColumnKind,
    ) -> Self {
        Self {
            key,
            label,
            kind,
            filter: false,
        }
    }

    pub fn filterable(mut self) -> Self {
        self.filter = true;
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pagination {
    pub page: usize,
    pub size: usize,
    pub total: usize,
}

impl Pagination {
    pub fn page_count(&self) -> usize {
        self.total.div_ceil(self.size)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Search {
    pub key: &'static str,
    pub placeholder: &'static str,
    pub value: String,
}

/// Everything a data table needs to render one page.
#[derive(Debug, Clone, PartialEq)]
pub struct ListView<R> {
    pub columns: Vec<Column>,
    pub rows: Vec<R>,
    pub pagination: Pagination,
    pub search: Search,
}

impl<R> ListView<R> {
    pub fn from_projection<T>(
        columns: Vec<Column>,
        projection: Projection<T>,
        params: &ViewParameters,
        search_key: &'static str,
        placeholder: &'static str,
        to_row: impl FnMut(T) -> R,
    ) -> Self {
        Self {
            columns,
            rows: projection.page.into_iter().map(to_row).collect(),
            pagination: Pagination {
                page: params.page_index(),
                size: params.page_size(),
                total: projection.total_count,
            },
            search: Search {
                key: search_key,
                placeholder,
                value: params.filter_text().to_owned(),
            },
        }
    }
}
