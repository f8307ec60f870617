//! Some tools and enhancements to the used libraries, there should be
//! no references to Context and other "larger" entities here.

use std::time::SystemTime;

use chrono::{TimeZone, Utc};

/// Formats a unix timestamp for log messages.
pub fn timestamp_to_str(wanted: i64) -> String {
    if let Some(ts) = Utc.timestamp_opt(wanted, 0).single() {
        ts.format("%Y.%m.%d %H:%M:%S").to_string()
    } else {
        // Out of range number of seconds.
        "??.??.?? ??:??:??".to_string()
    }
}

pub(crate) fn time() -> i64 {
    SystemTime::now()
        .duration_since(SystemTime::UNIX_EPOCH)
        .unwrap_or_default()
        .as_secs() as i64
}

/// If `collection` contains exactly one element, return this element.
/// Otherwise, return None.
pub(crate) fn single_value<T>(collection: impl IntoIterator<Item = T>) -> Option<T> {
    let mut iter = collection.into_iter();
    if let Some(value) = iter.next() {
        if iter.next().is_none() {
            return Some(value);
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_value() {
        assert_eq!(single_value(Vec::<u32>::new()), None);
        assert_eq!(single_value(vec![7]), Some(7));
        assert_eq!(single_value(vec![7, 7]), None);
    }

    #[test]
    fn test_timestamp_to_str() {
        assert_eq!(timestamp_to_str(0), "1970.01.01 00:00:00");
        assert_eq!(timestamp_to_str(1_475_224_800), "2016.09.30 08:40:00");
        assert_eq!(timestamp_to_str(i64::MAX), "??.??.?? ??:??:??");
    }

    #[test]
    fn test_time() {
        assert!(time() > 1_600_000_000);
    }
}
