pub mod export;
pub mod store;

pub use store::{HistoryError, HistoryStore};
