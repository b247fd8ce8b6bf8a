use std::time::SystemTime;
use std::time::UNIX_EPOCH;

/// return second
pub(crate) fn unix_now_secs() -> u64 {
    let now = SystemTime::now();
    let since_epoch = now.duration_since(UNIX_EPOCH).expect("Time went backwards");
    since_epoch.as_secs()
}

/// return millisecond
#[allow(dead_code)]
pub(crate) fn unix_now_millis() -> u128 {
    let now = SystemTime::now();
    let since_epoch = now.duration_since(UNIX_EPOCH).expect("Time went backwards");
    since_epoch.as_millis()
}
