mod list_view;
mod member_selector;
mod post_page;

pub use list_view::*;
pub use member_selector::*;
pub use post_page::*;
