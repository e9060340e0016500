//! Fixed-interval polling with an overall deadline

use serde::{Deserialize, Serialize};
use std::future::Future;
use std::time::Duration;
use tokio::time::{Instant, sleep};

/// Polling configuration shared by every wait condition
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WaitConfig {
    /// Delay between two checks
    #[serde(with = "duration_millis")]
    pub interval: Duration,

    /// Overall budget for one wait condition
    #[serde(with = "duration_millis")]
    pub timeout: Duration,
}

impl Default for WaitConfig {
    fn default() -> Self {
        Self {
            interval: Duration::from_secs(3),
            timeout: Duration::from_secs(180),
        }
    }
}

impl WaitConfig {
    pub fn new(interval: Duration, timeout: Duration) -> Self {
        Self { interval, timeout }
    }
}

/// The deadline elapsed before the condition held
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WaitTimeout {
    /// Number of checks performed
    pub attempts: u32,
}

/// Poll `check` every `config.interval` until it returns `true` or
/// `config.timeout` elapses.
///
/// The condition is checked at least once, even with a zero timeout. On
/// success the number of checks performed is returned. A timeout too large
/// to represent as an instant means no deadline.
pub async fn wait_for<F, Fut>(config: &WaitConfig, mut check: F) -> Result<u32, WaitTimeout>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = bool>,
{
    let deadline = Instant::now().checked_add(config.timeout);
    let mut attempts = 0;

    loop {
        attempts += 1;
        if check().await {
            return Ok(attempts);
        }

        if let Some(deadline) = deadline {
            let next_check = Instant::now().checked_add(config.interval);
            if next_check.is_none_or(|next| next > deadline) {
                tracing::debug!("Condition still false after {} attempts", attempts);
                return Err(WaitTimeout { attempts });
            }
        }

        sleep(config.interval).await;
    }
}

mod duration_millis {
    use serde::{Deserialize, Deserializer, Serializer};
    use std::time::Duration;

    pub fn serialize<S: Serializer>(value: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u64(value.as_millis() as u64)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Duration, D::Error> {
        Ok(Duration::from_millis(u64::deserialize(deserializer)?))
    }
}
