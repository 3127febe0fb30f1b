mod auth;
mod board;
mod defaults;
mod session;
mod share;
mod workspace;

pub use auth::{cmd_login, cmd_logout, cmd_signup, cmd_whoami};
pub use board::{cmd_add, cmd_board, cmd_edit, cmd_move, cmd_reminders, cmd_remove};
pub use defaults::{cmd_defaults_set, cmd_defaults_show};
pub use share::{cmd_share_create, cmd_share_show};
pub use workspace::{cmd_workspace_add, cmd_workspace_list, cmd_workspace_remove};
