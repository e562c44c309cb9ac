//! Roll Service - compute dice rolls and share them through the log.
//!
//! Rolls are computed client-side and POSTed to the roll log; the server
//! broadcasts them to every connected client over the rolls feed. The
//! originating client renders its own roll optimistically instead of
//! waiting for the echo, and falls back to local-only rendering when the
//! POST fails - a failed dice roll must never block the table.

use std::sync::Arc;

use vellum_domain::RollSpec;
use vellum_shared::{unwrap_list, RollEntry};

use crate::ports::{HttpPort, RandomProvider, TimeProvider};

const ROLLS_PATH: &str = "/api/rolls/";

/// History keeps only the most recent entries.
pub const ROLL_HISTORY_LIMIT: usize = 5;

#[derive(Clone)]
pub struct RollService {
    api: Arc<dyn HttpPort>,
    random: Arc<dyn RandomProvider>,
    time: Arc<dyn TimeProvider>,
}

impl RollService {
    pub fn new(
        api: Arc<dyn HttpPort>,
        random: Arc<dyn RandomProvider>,
        time: Arc<dyn TimeProvider>,
    ) -> Self {
        Self { api, random, time }
    }

    /// Compute a roll locally and stamp it for the log.
    pub fn compute(&self, spec: RollSpec, character: &str, spell: &str) -> RollEntry {
        let outcome = spec.roll_with(|sides| self.random.random_range(1, sides as i32) as u32);
        RollEntry {
            ts: Some(self.time.now_millis()),
            character: character.to_string(),
            spell: spell.to_string(),
            expr: spec.expr(),
            total: outcome.total,
            breakdown: outcome.breakdown,
        }
    }

    /// POST the roll to the shared log. Returns whether the server took
    /// it; a refusal only means the roll stays local.
    pub async fn submit(&self, entry: &RollEntry) -> bool {
        let body = match serde_json::to_value(entry) {
            Ok(body) => body,
            Err(e) => {
                tracing::error!("failed to serialize roll entry: {e}");
                return false;
            }
        };
        match self.api.post_json(ROLLS_PATH, &body).await {
            Ok(_) => true,
            Err(e) => {
                tracing::warn!("roll log post failed, keeping roll local: {e}");
                false
            }
        }
    }

    /// The most recent shared rolls, newest first. Failures degrade to
    /// an empty history.
    pub async fn history(&self) -> Vec<RollEntry> {
        let path = format!("{ROLLS_PATH}?limit={ROLL_HISTORY_LIMIT}");
        match self.api.get_json(&path).await {
            Ok(value) => {
                let mut entries: Vec<RollEntry> = unwrap_list(value);
                entries.truncate(ROLL_HISTORY_LIMIT);
                entries
            }
            Err(e) => {
                tracing::warn!("roll history fetch failed: {e}");
                Vec::new()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};
    use std::sync::Mutex;

    use serde_json::{json, Value};

    use vellum_domain::Die;

    use crate::ports::{ApiError, UploadPart};

    struct FakeApi {
        fail_post: bool,
        posted: Mutex<Vec<Value>>,
    }

    #[async_trait::async_trait]
    impl HttpPort for FakeApi {
        async fn get_json(&self, _path: &str) -> Result<Value, ApiError> {
            // more entries than the cap, in the `{items}` wrapper
            let items: Vec<Value> = (0..8).map(|i| json!({"total": i})).collect();
            Ok(json!({ "items": items }))
        }

        async fn post_json(&self, _path: &str, body: &Value) -> Result<Value, ApiError> {
            if self.fail_post {
                return Err(ApiError::Status {
                    status: 500,
                    body: "boom".to_string(),
                });
            }
            self.posted.lock().unwrap().push(body.clone());
            Ok(body.clone())
        }

        async fn patch_json(&self, _: &str, _: &Value) -> Result<Value, ApiError> {
            unreachable!("rolls never patch")
        }

        async fn delete(&self, _: &str) -> Result<(), ApiError> {
            unreachable!("rolls never delete")
        }

        async fn post_multipart(&self, _: &str, _: Vec<UploadPart>) -> Result<Value, ApiError> {
            unreachable!("rolls never upload")
        }

        async fn patch_multipart(&self, _: &str, _: Vec<UploadPart>) -> Result<Value, ApiError> {
            unreachable!("rolls never upload")
        }
    }

    /// Deterministic "random" that cycles 1..=sides.
    struct CyclingRandom(AtomicU32);

    impl RandomProvider for CyclingRandom {
        fn random_range(&self, min: i32, max: i32) -> i32 {
            let n = self.0.fetch_add(1, Ordering::SeqCst) as i32;
            min + n % (max - min + 1)
        }
    }

    struct FixedTime;

    impl TimeProvider for FixedTime {
        fn now_millis(&self) -> i64 {
            1_719_000_000_000
        }
    }

    fn service(fail_post: bool) -> RollService {
        RollService::new(
            Arc::new(FakeApi {
                fail_post,
                posted: Mutex::new(Vec::new()),
            }),
            Arc::new(CyclingRandom(AtomicU32::new(0))),
            Arc::new(FixedTime),
        )
    }

    #[test]
    fn test_compute_3d6_plus_2_bounds_and_breakdown() {
        let service = service(false);
        for _ in 0..50 {
            let entry = service.compute(RollSpec::new(Die::D6, 3, 2), "Mira", "");
            assert!((5..=20).contains(&entry.total));
            assert_eq!(entry.expr, "3d6+2");
            // 3 addends plus the modifier suffix
            assert_eq!(entry.breakdown.split(" + ").count(), 4);
        }
    }

    #[test]
    fn test_compute_stamps_character_and_time() {
        let service = service(false);
        let entry = service.compute(RollSpec::new(Die::D20, 1, 0), "Mira", "Fire Bolt");
        assert_eq!(entry.ts, Some(1_719_000_000_000));
        assert_eq!(entry.character, "Mira");
        assert_eq!(entry.spell, "Fire Bolt");
    }

    #[tokio::test]
    async fn test_submit_failure_is_degraded_not_fatal() {
        let service = service(true);
        let entry = service.compute(RollSpec::new(Die::D6, 1, 0), "Mira", "");
        assert!(!service.submit(&entry).await);
    }

    #[tokio::test]
    async fn test_submit_success() {
        let service = service(false);
        let entry = service.compute(RollSpec::new(Die::D6, 1, 0), "Mira", "");
        assert!(service.submit(&entry).await);
    }

    #[tokio::test]
    async fn test_history_truncated_to_cap() {
        let service = service(false);
        assert_eq!(service.history().await.len(), ROLL_HISTORY_LIMIT);
    }
}
