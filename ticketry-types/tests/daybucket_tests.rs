use chrono::NaiveDate;
use ticketry_types::{Clock, DayBucket, SystemClock};

#[test]
fn today_matches_system_clock() {
    let clock = SystemClock;
    assert_eq!(clock.today(), DayBucket::today());
}

#[test]
fn from_date_formats_iso() {
    let bucket = DayBucket::from_date(NaiveDate::from_ymd_opt(2025, 7, 4).unwrap());
    assert_eq!(bucket.as_str(), "2025-07-04");
}

#[test]
fn parse_rejects_out_of_range() {
    assert!("2025-02-30".parse::<DayBucket>().is_err());
}

#[test]
fn serde_is_transparent() {
    let bucket = DayBucket::from_date(NaiveDate::from_ymd_opt(2025, 1, 2).unwrap());
    let json = serde_json::to_string(&bucket).unwrap();
    assert_eq!(json, "\"2025-01-02\"");
    let parsed: DayBucket = serde_json::from_str(&json).unwrap();
    assert_eq!(bucket, parsed);
}

#[test]
fn buckets_order_across_months() {
    let jan = DayBucket::from_date(NaiveDate::from_ymd_opt(2025, 1, 31).unwrap());
    let feb = DayBucket::from_date(NaiveDate::from_ymd_opt(2025, 2, 1).unwrap());
    assert!(jan < feb);
}
