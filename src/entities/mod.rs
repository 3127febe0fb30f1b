pub mod prelude;

pub mod defaults;
pub mod prs;
pub mod share_links;
pub mod users;
pub mod workspaces;
