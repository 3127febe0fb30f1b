pub mod pr;

pub use pr::{Category, PrItem, PrLink, PrStatus, Priority};
