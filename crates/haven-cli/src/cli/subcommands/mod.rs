pub mod admin;
pub mod auth;
pub mod inventory;
pub mod open;

pub use admin::AdminCommands;
pub use auth::AuthCommands;
pub use inventory::InventoryCommands;
pub use open::{OpenArgs, View};
