use std::time::{SystemTime, UNIX_EPOCH};

// Fast path: returns 0 on any error instead of double error handling
#[inline]
pub fn current_time_secs_or_zero() -> u32 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs() as u32)
        .unwrap_or(0)
}
