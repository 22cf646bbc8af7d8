use std::sync::Arc;

use crate::{
    domain::{Post, PostStatus, RejectionReason, ValidationError},
    store::{project, PostSlice, ViewParameters},
};

use super::{Column, ColumnKind, ListView, StatusBadge};

pub const SEARCH_KEY: &str = "taskName";
pub const SEARCH_PLACEHOLDER: &str = "업무명을 검색하세요";
pub const NEW_POST_LINK: &str = "/posts/new";

#[derive(Debug, Clone, PartialEq)]
pub struct PostRow {
    pub post: Post,
    pub link: String,
}

pub fn post_columns() -> Vec<Column> {
    vec![
        Column::new("createdAt", "작성일", ColumnKind::Date),
        Column::new("author", "작성자", ColumnKind::Text),
        Column::new("taskName", "업무명", ColumnKind::Text),
        Column::new(
            "status",
            "상태",
            ColumnKind::Status(
                PostStatus::ALL.into_iter().map(StatusBadge::from).collect(),
            ),
        )
        .filterable(),
        Column::new("dueDate", "마감일", ColumnKind::Date),
    ]
}

pub fn row_link(post: &Post) -> String {
    format!("/posts/{}", post.id)
}

/// Post list with free-text search on the task name.
pub struct PostListPage {
    slice: Arc<PostSlice>,
    params: ViewParameters,
}

impl PostListPage {
    pub fn new(
        slice: Arc<PostSlice>,
        page_size: usize,
    ) -> Result<Self, ValidationError> {
        Ok(Self {
            slice,
            params: ViewParameters::new(1, page_size, "")?,
        })
    }

    pub async fn load(&self) -> Result<(), RejectionReason> {
        self.slice.list().await.map(|_| ())
    }

    pub fn set_page(&mut self, page: usize) {
        self.params = self.params.clone().with_page(page);
    }

    /// The current page is kept; a search that leaves it out of range
    /// renders an empty page.
    pub fn set_search(&mut self, text: impl Into<String>) {
        self.params = self.params.clone().with_filter(text);
    }

    pub fn params(&self) -> &ViewParameters {
        &self.params
    }

    pub async fn view(&self) -> ListView<PostRow> {
        let posts = self.slice.snapshot().await.data;
        let projection = project(&posts, &self.params, SEARCH_KEY);
        ListView::from_projection(
            post_columns(),
            projection,
            &self.params,
            SEARCH_KEY,
            SEARCH_PLACEHOLDER,
            |post| PostRow {
                link: row_link(&post),
                post,
            },
        )
    }

    /// Target of the "new post" button.
    pub fn new_post_link(&self) -> &'static str {
        NEW_POST_LINK
    }

    pub fn summary(total: usize) -> String {
        format!("총 {total}개의 게시글이 있습니다.")
    }
}
