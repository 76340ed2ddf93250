use chrono::{DateTime, NaiveDate, NaiveTime};

/// Return the UTC calendar date containing the given unix timestamp in milliseconds.
pub fn date_from_millis(millis: i64) -> Option<NaiveDate> {
    DateTime::from_timestamp_millis(millis).map(|instant| instant.date_naive())
}

/// Return the unix timestamp in milliseconds of UTC midnight on `date`.
pub fn millis_from_date(date: NaiveDate) -> i64 {
    date.and_time(NaiveTime::MIN).and_utc().timestamp_millis()
}
