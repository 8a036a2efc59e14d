pub mod json_store;
pub mod state;

pub use json_store::{next_id, Collection, JsonStore, StoreError};
pub use state::AppState;
