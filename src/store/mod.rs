mod assignment;
mod entity_slice;
mod manager_toggle;
mod post_slice;
mod project_member_slice;
mod projection;

pub use assignment::*;
pub use entity_slice::*;
pub use manager_toggle::*;
pub use post_slice::*;
pub use project_member_slice::*;
pub use projection::*;
