//! Waits for the eventually consistent directory to reflect a write.

use std::time::Duration;

use websignin_core::{ProviderError, Result};

use crate::client::ApplicationsClient;

pub const DEFAULT_MAX_ATTEMPTS: u32 = 30;
pub const DEFAULT_INTERVAL: Duration = Duration::from_secs(1);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollSettings {
    pub max_attempts: u32,
    pub interval: Duration,
}

impl Default for PollSettings {
    fn default() -> Self {
        Self {
            max_attempts: DEFAULT_MAX_ATTEMPTS,
            interval: DEFAULT_INTERVAL,
        }
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct ExistencePoller {
    settings: PollSettings,
}

impl ExistencePoller {
    pub fn new(settings: PollSettings) -> Self {
        Self { settings }
    }

    /// Poll until the object's presence equals `expected_present`.
    ///
    /// Returns as soon as the expectation is observed. Not-found is the only
    /// outcome waited through; any other failure ends the wait immediately.
    /// After `max_attempts` checks without a match, returns a timeout error.
    pub async fn wait_for_existence(
        &self,
        client: &ApplicationsClient,
        object_id: &str,
        expected_present: bool,
    ) -> Result<()> {
        let max_attempts = self.settings.max_attempts.max(1);
        let mut attempt = 0;

        loop {
            attempt += 1;

            let present = client.exists(object_id).await?;
            if present == expected_present {
                tracing::debug!(object_id, expected_present, attempt, "Existence confirmed");
                return Ok(());
            }

            if attempt >= max_attempts {
                break;
            }

            tracing::trace!(
                object_id,
                expected_present,
                attempt,
                "Existence not yet as expected, waiting"
            );
            tokio::time::sleep(self.settings.interval).await;
        }

        tracing::warn!(object_id, expected_present, attempts = attempt, "Gave up waiting");
        Err(ProviderError::timeout(object_id, expected_present, attempt))
    }
}
