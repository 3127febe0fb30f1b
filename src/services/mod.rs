pub mod list_cache;
pub mod token_service;

pub use list_cache::ListCache;
pub use token_service::{Claims, TokenError, TokenService};
