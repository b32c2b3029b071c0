use carinv_core::CanonicalRecord;
use chrono::{DateTime, SubsecRound, Utc};

/// Current UTC time at whole-second precision, the resolution used for
/// `scraped_at`.
#[must_use]
pub fn capture_time() -> DateTime<Utc> {
    Utc::now().trunc_subsecs(0)
}

/// Records when the listing was captured.
pub fn stamp(record: &mut CanonicalRecord, at: DateTime<Utc>) {
    record.scraped_at = Some(at);
}
