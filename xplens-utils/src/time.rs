use chrono::{DateTime, Utc};

/// Calendar date label (`YYYY-MM-DD`, UTC) used for time-series points.
pub fn date_label(at: &DateTime<Utc>) -> String {
    at.format("%Y-%m-%d").to_string()
}
