//! Fixed-interval polling of a draft until the server finishes preparing it.

use std::thread;
use std::time::{Duration, Instant};

use tracing::{debug, info};

use crate::api::{ApiClient, ApiError, DraftStatus};

/// Anything that can report the status of a draft.
pub trait DraftStatusSource {
    fn draft_status(&self, uuid: &str) -> Result<DraftStatus, ApiError>;
}

impl DraftStatusSource for ApiClient {
    fn draft_status(&self, uuid: &str) -> Result<DraftStatus, ApiError> {
        ApiClient::draft_status(self, uuid)
    }
}

/// Block until both readiness flags of `uuid` are set, polling every
/// `interval` until `timeout` has elapsed.
pub fn wait_until_ready<S: DraftStatusSource + ?Sized>(
    source: &S,
    uuid: &str,
    timeout: Duration,
    interval: Duration,
) -> Result<DraftStatus, ApiError> {
    wait_until_ready_with(source, uuid, timeout, interval, |_, _| {})
}

/// Same as [`wait_until_ready`], calling `on_poll` with the 1-based poll
/// number and the status after every poll.
pub fn wait_until_ready_with<S, F>(
    source: &S,
    uuid: &str,
    timeout: Duration,
    interval: Duration,
    mut on_poll: F,
) -> Result<DraftStatus, ApiError>
where
    S: DraftStatusSource + ?Sized,
    F: FnMut(u32, &DraftStatus),
{
    // A timeout too large to represent as an instant means no deadline.
    let deadline = Instant::now().checked_add(timeout);
    let mut polls = 0u32;
    while deadline.map_or(true, |deadline| Instant::now() < deadline) {
        let status = source.draft_status(uuid)?;
        polls += 1;
        on_poll(polls, &status);
        debug!(
            uuid,
            polls,
            credentials_ready = status.credentials_ready(),
            trustees_ready = status.trustees_ready(),
            "polled draft status"
        );
        if status.is_ready() {
            info!(uuid, polls, "draft ready");
            return Ok(status);
        }
        thread::sleep(interval);
    }
    Err(ApiError::ReadinessTimeout {
        uuid: uuid.to_string(),
    })
}
