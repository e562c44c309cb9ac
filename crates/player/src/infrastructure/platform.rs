//! Desktop platform providers and the DI container that aggregates them.

use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};

use crate::infrastructure::storage::FileStorage;
use crate::ports::{RandomProvider, StorageProvider, TimeProvider};

/// Desktop time provider using std::time
#[derive(Clone, Default)]
pub struct DesktopTimeProvider;

impl TimeProvider for DesktopTimeProvider {
    fn now_millis(&self) -> i64 {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_millis() as i64)
            .unwrap_or(0)
    }
}

/// Desktop random provider using the rand crate
#[derive(Clone, Default)]
pub struct DesktopRandomProvider;

impl RandomProvider for DesktopRandomProvider {
    fn random_range(&self, min: i32, max: i32) -> i32 {
        use rand::Rng;
        rand::thread_rng().gen_range(min..=max)
    }
}

/// Aggregated platform services handed to the application layer.
#[derive(Clone)]
pub struct Platform {
    pub random: Arc<dyn RandomProvider>,
    pub time: Arc<dyn TimeProvider>,
    pub storage: Arc<dyn StorageProvider>,
}

impl Platform {
    pub fn desktop() -> Self {
        Self {
            random: Arc::new(DesktopRandomProvider),
            time: Arc::new(DesktopTimeProvider),
            storage: Arc::new(FileStorage::desktop()),
        }
    }
}
