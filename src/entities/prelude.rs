pub use super::defaults::Entity as Defaults;
pub use super::prs::Entity as Prs;
pub use super::share_links::Entity as ShareLinks;
pub use super::users::Entity as Users;
pub use super::workspaces::Entity as Workspaces;
