pub mod hashmap_gateway;
pub mod http_gateway;

pub use hashmap_gateway::*;
pub use http_gateway::*;
