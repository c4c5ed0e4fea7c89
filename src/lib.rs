pub mod app;
pub mod config;
pub mod dom;
pub mod errors;
pub mod handlers;
pub mod list;
pub mod map;
pub mod models;
pub mod persistence;
pub mod state;
pub mod storage;
pub mod store;
pub mod tracker;
pub mod ui;

pub use app::router;
pub use config::Settings;
pub use errors::ActivityError;
pub use state::AppState;
pub use storage::{load_blobs, persist_blobs, BlobStore, MemoryBlobStore};
pub use store::ActivityStore;
pub use tracker::Tracker;
