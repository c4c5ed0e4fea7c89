use crate::dom::HeadlessDom;
use crate::map::HeadlessMap;
use crate::storage::MemoryBlobStore;
use crate::tracker::Tracker;
use std::{path::PathBuf, sync::Arc};
use tokio::sync::Mutex;

pub type PageTracker = Tracker<HeadlessMap, HeadlessDom, MemoryBlobStore>;

#[derive(Clone)]
pub struct AppState {
    pub data_path: PathBuf,
    pub tracker: Arc<Mutex<PageTracker>>,
}

impl AppState {
    pub fn new(data_path: PathBuf, tracker: PageTracker) -> Self {
        Self {
            data_path,
            tracker: Arc::new(Mutex::new(tracker)),
        }
    }
}
