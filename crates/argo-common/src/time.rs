//! ARGO Julian day (JULD) conversions.
//!
//! JULD counts fractional days since 1950-01-01T00:00:00Z.

use chrono::{DateTime, Duration, Utc};

/// Days between the JULD epoch (1950-01-01) and the Unix epoch.
pub const ARGO_EPOCH_UNIX_OFFSET_DAYS: i64 = 7305;

const MILLIS_PER_DAY: f64 = 86_400_000.0;

/// 1950-01-01T00:00:00Z
pub fn argo_epoch() -> DateTime<Utc> {
    DateTime::<Utc>::UNIX_EPOCH - Duration::days(ARGO_EPOCH_UNIX_OFFSET_DAYS)
}

/// Convert a JULD day count into a UTC timestamp.
///
/// Returns `None` for non-finite values or offsets chrono cannot represent.
pub fn juld_to_datetime(days: f64) -> Option<DateTime<Utc>> {
    if !days.is_finite() {
        return None;
    }

    let millis = (days * MILLIS_PER_DAY).round();
    if millis.abs() > i64::MAX as f64 {
        return None;
    }

    let offset = Duration::try_milliseconds(millis as i64)?;
    argo_epoch().checked_add_signed(offset)
}

/// Convert a UTC timestamp into a JULD day count.
pub fn datetime_to_juld(time: DateTime<Utc>) -> f64 {
    (time - argo_epoch()).num_milliseconds() as f64 / MILLIS_PER_DAY
}
