mod error;
mod gateway;
mod member;
mod member_id;
mod post;
mod project;

pub use error::*;
pub use gateway::*;
pub use member::*;
pub use member_id::*;
pub use post::*;
pub use project::*;
