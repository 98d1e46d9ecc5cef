//! Modification timestamps.
//!
//! Freshness checks compare whole seconds since the UNIX epoch, which is
//! what both the source file and the cache entry report through their
//! filesystem metadata.

use std::io;
use std::path::Path;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

/// Seconds since the UNIX epoch.
pub type Timestamp = u64;

/// Convert a `SystemTime` to a [`Timestamp`]; times before the epoch clamp to 0.
pub fn from_system_time(time: SystemTime) -> Timestamp {
    time.duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0)
}

/// Convert a [`Timestamp`] back to a `SystemTime`.
pub fn to_system_time(timestamp: Timestamp) -> SystemTime {
    UNIX_EPOCH + Duration::from_secs(timestamp)
}

/// Current wall-clock time.
pub fn now() -> Timestamp {
    from_system_time(SystemTime::now())
}

/// Modification time of the file at `path`.
pub fn modified_timestamp(path: &Path) -> io::Result<Timestamp> {
    let modified = std::fs::metadata(path)?.modified()?;
    Ok(from_system_time(modified))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_round_trip_through_system_time() {
        let ts: Timestamp = 1_700_000_000;
        assert_eq!(from_system_time(to_system_time(ts)), ts);
    }

    #[test]
    fn test_before_epoch_clamps_to_zero() {
        let before = UNIX_EPOCH - Duration::from_secs(10);
        assert_eq!(from_system_time(before), 0);
    }
}
