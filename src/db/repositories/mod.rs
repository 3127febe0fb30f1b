pub mod defaults;
pub mod pr;
pub mod share_link;
pub mod user;
pub mod workspace;
