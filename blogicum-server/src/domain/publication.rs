use chrono::{DateTime, Utc};

/// Publication flag stored for a post being created.
///
/// A future `submitted_pub_date` forces the flag on so the author sees the
/// post as scheduled in their own listings; visitors still cannot see it until
/// `is_live` holds. Otherwise the submitted flag is kept. Only applied at
/// creation, never on edit.
pub(crate) fn resolve_publish_flag(
    submitted_pub_date: DateTime<Utc>,
    submitted_flag: bool,
    now: DateTime<Utc>,
) -> bool {
    submitted_pub_date > now || submitted_flag
}
