use std::time::{SystemTime, UNIX_EPOCH};

/// Wall clock time in millis since epoch, as it is used for packet timestamps on the wire.
///
/// NB: This is the system clock, not a monotonic clock, since timestamps are compared with the
///      peer's clock. A clock before the epoch is reported as 0.
pub fn millis_since_epoch() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| i64::try_from(d.as_millis()).unwrap_or(i64::MAX))
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_millis_since_epoch() {
        let before = millis_since_epoch();
        std::thread::sleep(std::time::Duration::from_millis(5));
        let after = millis_since_epoch();

        // 2020-01-01
        assert!(before > 1_577_836_800_000);
        assert!(after >= before + 5);
    }
}
