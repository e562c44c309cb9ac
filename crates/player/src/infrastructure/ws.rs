//! WebSocket feed client.
//!
//! Both feeds (`/ws/rolls`, `/ws/art`) are read-only from the client's
//! side: connect, hand every text frame to the callback, reconnect when
//! the connection drops. Reconnection uses bounded exponential backoff
//! with no attempt ceiling - the feed should keep trying for as long as
//! the window is open - and is suppressed after an intentional
//! disconnect.

use std::sync::Arc;
use std::time::Duration;

use futures_util::StreamExt;
use tokio::sync::RwLock;
use tokio_tungstenite::{connect_async, tungstenite::Message};

pub const INITIAL_RETRY_DELAY_MS: u64 = 1_500;
pub const MAX_RETRY_DELAY_MS: u64 = 30_000;
pub const BACKOFF_MULTIPLIER: f64 = 2.0;

/// Reconnection delay state.
#[derive(Debug, Clone)]
pub struct BackoffState {
    attempts: u32,
    delay_ms: u64,
}

impl Default for BackoffState {
    fn default() -> Self {
        Self {
            attempts: 0,
            delay_ms: INITIAL_RETRY_DELAY_MS,
        }
    }
}

impl BackoffState {
    /// The delay to wait before the next attempt, advancing the state.
    pub fn next_delay_and_advance(&mut self) -> u64 {
        let delay = self.delay_ms;
        self.attempts += 1;
        self.delay_ms =
            ((self.delay_ms as f64 * BACKOFF_MULTIPLIER) as u64).min(MAX_RETRY_DELAY_MS);
        delay
    }

    pub fn attempts(&self) -> u32 {
        self.attempts
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

/// One feed subscription with supervised reconnection.
pub struct FeedClient {
    url: String,
    intentional_disconnect: Arc<RwLock<bool>>,
}

impl FeedClient {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            intentional_disconnect: Arc::new(RwLock::new(false)),
        }
    }

    /// Run the subscription until [`disconnect`](Self::disconnect) is
    /// called. Every text frame goes to `on_frame`; decoding is the
    /// caller's business.
    pub async fn run(&self, on_frame: impl Fn(String) + Send + Sync + 'static) {
        let mut backoff = BackoffState::default();

        loop {
            match connect_async(&self.url).await {
                Ok((ws_stream, _)) => {
                    tracing::info!("feed connected: {}", self.url);
                    backoff.reset();

                    let (_, mut read) = ws_stream.split();
                    while let Some(message) = read.next().await {
                        match message {
                            Ok(Message::Text(text)) => on_frame(text.to_string()),
                            Ok(Message::Close(_)) => {
                                tracing::info!("feed closed by server: {}", self.url);
                                break;
                            }
                            Ok(_) => {}
                            Err(e) => {
                                tracing::warn!("feed error on {}: {e}", self.url);
                                break;
                            }
                        }
                    }
                }
                Err(e) => {
                    tracing::warn!("feed connect failed for {}: {e}", self.url);
                }
            }

            if *self.intentional_disconnect.read().await {
                tracing::info!("feed stopped: {}", self.url);
                return;
            }

            let delay = backoff.next_delay_and_advance();
            tracing::debug!(
                "feed reconnect attempt {} for {} in {delay}ms",
                backoff.attempts(),
                self.url
            );
            tokio::time::sleep(Duration::from_millis(delay)).await;
        }
    }

    /// Stop reconnecting; the run loop exits after the current attempt.
    pub async fn disconnect(&self) {
        *self.intentional_disconnect.write().await = true;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_backoff_progression() {
        let mut backoff = BackoffState::default();
        assert_eq!(backoff.next_delay_and_advance(), 1_500);
        assert_eq!(backoff.next_delay_and_advance(), 3_000);
        assert_eq!(backoff.next_delay_and_advance(), 6_000);
        assert_eq!(backoff.next_delay_and_advance(), 12_000);
        assert_eq!(backoff.next_delay_and_advance(), 24_000);
        // capped at the ceiling from here on
        assert_eq!(backoff.next_delay_and_advance(), 30_000);
        assert_eq!(backoff.next_delay_and_advance(), 30_000);
        assert_eq!(backoff.attempts(), 7);
    }

    #[test]
    fn test_backoff_reset() {
        let mut backoff = BackoffState::default();
        backoff.next_delay_and_advance();
        backoff.next_delay_and_advance();
        backoff.reset();
        assert_eq!(backoff.next_delay_and_advance(), 1_500);
    }
}
