//! Visit-record extraction from snapshot databases.
//!
//! Firefox stores visit times as microseconds since the Unix epoch in
//! `moz_historyvisits`. Chrome stores them as microseconds since the
//! Windows epoch (1601-01-01) in `urls.last_visit_time`. Both are
//! converted to naive UTC datetimes here rather than in SQL.

use std::path::Path;

use anyhow::Result;
use chrono::NaiveDateTime;
use rusqlite::{Connection, OpenFlags};

use crate::cli::Browser;

/// Seconds between 1601-01-01 and 1970-01-01.
const WEBKIT_EPOCH_OFFSET_SECS: i64 = 11_644_473_600;

/// One recorded page visit.
#[derive(Debug, Clone)]
pub struct VisitRecord {
    pub url: String,
    pub visit_time: Option<NaiveDateTime>,
}

/// Read visit records from a history database, newest first. `None` limit
/// fetches every row.
pub fn extract_history(
    path: &Path,
    browser: Browser,
    limit: Option<u64>,
) -> Result<Vec<VisitRecord>> {
    let conn = Connection::open_with_flags(
        path,
        OpenFlags::SQLITE_OPEN_READ_ONLY | OpenFlags::SQLITE_OPEN_NO_MUTEX,
    )?;
    match browser {
        Browser::Firefox => extract_firefox_visits(&conn, limit),
        Browser::Chrome => extract_chrome_visits(&conn, limit),
    }
}

/// Render a visit time the way both console output and CSV export print it.
pub fn format_visit_time(time: Option<NaiveDateTime>) -> String {
    time.map(|t| t.format("%Y-%m-%d %H:%M:%S").to_string())
        .unwrap_or_default()
}

// SQLite treats a negative LIMIT as unlimited; requested limits saturate
// rather than wrap into that range.
fn sql_limit(limit: Option<u64>) -> i64 {
    limit
        .map(|n| i64::try_from(n).unwrap_or(i64::MAX))
        .unwrap_or(-1)
}

fn extract_firefox_visits(conn: &Connection, limit: Option<u64>) -> Result<Vec<VisitRecord>> {
    let mut stmt = conn.prepare(
        "SELECT moz_places.url, moz_historyvisits.visit_date \
         FROM moz_historyvisits JOIN moz_places ON moz_historyvisits.place_id = moz_places.id \
         ORDER BY moz_historyvisits.visit_date DESC LIMIT ?1",
    )?;
    let rows = stmt.query_map([sql_limit(limit)], |row| {
        let url: String = row.get(0)?;
        let visit_date: Option<i64> = row.get(1)?;
        Ok((url, visit_date))
    })?;

    let mut out = Vec::new();
    for row in rows {
        let (url, visit_date) = row?;
        out.push(VisitRecord {
            url,
            visit_time: visit_date.and_then(unix_micro_to_datetime),
        });
    }
    Ok(out)
}

fn extract_chrome_visits(conn: &Connection, limit: Option<u64>) -> Result<Vec<VisitRecord>> {
    let mut stmt = conn
        .prepare("SELECT url, last_visit_time FROM urls ORDER BY last_visit_time DESC LIMIT ?1")?;
    let rows = stmt.query_map([sql_limit(limit)], |row| {
        let url: String = row.get(0)?;
        let last_visit_time: Option<i64> = row.get(1)?;
        Ok((url, last_visit_time))
    })?;

    let mut out = Vec::new();
    for row in rows {
        let (url, last_visit_time) = row?;
        out.push(VisitRecord {
            url,
            visit_time: last_visit_time.and_then(webkit_micro_to_datetime),
        });
    }
    Ok(out)
}

fn webkit_micro_to_datetime(microseconds: i64) -> Option<NaiveDateTime> {
    if microseconds < 0 {
        return None;
    }
    let secs = microseconds / 1_000_000 - WEBKIT_EPOCH_OFFSET_SECS;
    let nsecs = ((microseconds % 1_000_000) as u32) * 1000;
    chrono::DateTime::<chrono::Utc>::from_timestamp(secs, nsecs).map(|dt| dt.naive_utc())
}

fn unix_micro_to_datetime(microseconds: i64) -> Option<NaiveDateTime> {
    if microseconds < 0 {
        return None;
    }
    let secs = microseconds / 1_000_000;
    let nsecs = ((microseconds % 1_000_000) as u32) * 1000;
    chrono::DateTime::<chrono::Utc>::from_timestamp(secs, nsecs).map(|dt| dt.naive_utc())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn make_firefox_db(path: &Path, visits: &[(&str, i64)]) {
        let conn = Connection::open(path).expect("conn");
        conn.execute(
            "CREATE TABLE moz_places (id INTEGER PRIMARY KEY, url TEXT)",
            [],
        )
        .expect("create places");
        conn.execute(
            "CREATE TABLE moz_historyvisits (id INTEGER PRIMARY KEY, place_id INTEGER, visit_date INTEGER)",
            [],
        )
        .expect("create visits");
        for (i, (url, visit_date)) in visits.iter().enumerate() {
            let id = (i + 1) as i64;
            conn.execute("INSERT INTO moz_places (id, url) VALUES (?1, ?2)", (id, url))
                .expect("insert place");
            conn.execute(
                "INSERT INTO moz_historyvisits (place_id, visit_date) VALUES (?1, ?2)",
                (id, visit_date),
            )
            .expect("insert visit");
        }
    }

    fn make_chrome_db(path: &Path, urls: &[(&str, i64)]) {
        let conn = Connection::open(path).expect("conn");
        conn.execute(
            "CREATE TABLE urls (id INTEGER PRIMARY KEY, url TEXT, last_visit_time INTEGER)",
            [],
        )
        .expect("create urls");
        for (url, last_visit_time) in urls {
            conn.execute(
                "INSERT INTO urls (url, last_visit_time) VALUES (?1, ?2)",
                (*url, *last_visit_time),
            )
            .expect("insert url");
        }
    }

    #[test]
    fn firefox_rows_come_back_newest_first() {
        let dir = tempdir().expect("tempdir");
        let path = dir.path().join("places.sqlite");
        make_firefox_db(
            &path,
            &[
                ("https://old.example", 1_000_000_000_000_000),
                ("https://new.example", 1_700_000_000_000_000),
                ("https://mid.example", 1_400_000_000_000_000),
            ],
        );

        let records = extract_history(&path, Browser::Firefox, None).expect("extract");
        let urls: Vec<&str> = records.iter().map(|r| r.url.as_str()).collect();
        assert_eq!(
            urls,
            ["https://new.example", "https://mid.example", "https://old.example"]
        );
    }

    #[test]
    fn limit_caps_row_count() {
        let dir = tempdir().expect("tempdir");
        let path = dir.path().join("places.sqlite");
        make_firefox_db(
            &path,
            &[
                ("https://a.example", 1_000_000_000_000_000),
                ("https://b.example", 1_700_000_000_000_000),
                ("https://c.example", 1_400_000_000_000_000),
            ],
        );

        let records = extract_history(&path, Browser::Firefox, Some(2)).expect("extract");
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].url, "https://b.example");
        assert_eq!(records[1].url, "https://c.example");
    }

    #[test]
    fn limit_larger_than_row_count_returns_everything() {
        let dir = tempdir().expect("tempdir");
        let path = dir.path().join("places.sqlite");
        make_firefox_db(&path, &[("https://only.example", 1_700_000_000_000_000)]);

        let records = extract_history(&path, Browser::Firefox, Some(100)).expect("extract");
        assert_eq!(records.len(), 1);
    }

    #[test]
    fn oversized_limit_saturates_instead_of_going_negative() {
        assert_eq!(sql_limit(Some(u64::MAX)), i64::MAX);
        assert_eq!(sql_limit(Some(2)), 2);
        assert_eq!(sql_limit(None), -1);
    }

    #[test]
    fn firefox_microseconds_convert_to_unix_time() {
        let dir = tempdir().expect("tempdir");
        let path = dir.path().join("places.sqlite");
        make_firefox_db(&path, &[("https://example.com", 1_700_000_000_000_000)]);

        let records = extract_history(&path, Browser::Firefox, None).expect("extract");
        assert_eq!(
            format_visit_time(records[0].visit_time),
            "2023-11-14 22:13:20"
        );
    }

    #[test]
    fn firefox_zero_timestamp_is_unix_epoch() {
        let dir = tempdir().expect("tempdir");
        let path = dir.path().join("places.sqlite");
        make_firefox_db(&path, &[("https://example.com", 0)]);

        let records = extract_history(&path, Browser::Firefox, None).expect("extract");
        assert_eq!(
            format_visit_time(records[0].visit_time),
            "1970-01-01 00:00:00"
        );
    }

    #[test]
    fn chrome_microseconds_shift_by_windows_epoch() {
        let dir = tempdir().expect("tempdir");
        let path = dir.path().join("History");
        make_chrome_db(&path, &[("https://example.com", 13_344_473_600_000_000)]);

        let records = extract_history(&path, Browser::Chrome, None).expect("extract");
        assert_eq!(
            format_visit_time(records[0].visit_time),
            "2023-11-14 22:13:20"
        );
    }

    #[test]
    fn chrome_zero_timestamp_is_windows_epoch() {
        let dir = tempdir().expect("tempdir");
        let path = dir.path().join("History");
        make_chrome_db(&path, &[("https://example.com", 0)]);

        let records = extract_history(&path, Browser::Chrome, None).expect("extract");
        assert_eq!(
            format_visit_time(records[0].visit_time),
            "1601-01-01 00:00:00"
        );
    }

    #[test]
    fn negative_timestamps_convert_to_none() {
        let dir = tempdir().expect("tempdir");

        let ff_path = dir.path().join("places.sqlite");
        make_firefox_db(&ff_path, &[("https://example.com", -1)]);
        let records = extract_history(&ff_path, Browser::Firefox, None).expect("extract");
        assert!(records[0].visit_time.is_none());
        assert_eq!(format_visit_time(records[0].visit_time), "");

        let cr_path = dir.path().join("History");
        make_chrome_db(&cr_path, &[("https://example.com", -1)]);
        let records = extract_history(&cr_path, Browser::Chrome, None).expect("extract");
        assert!(records[0].visit_time.is_none());
        assert_eq!(format_visit_time(records[0].visit_time), "");
    }

    #[test]
    fn null_visit_time_formats_as_empty() {
        let dir = tempdir().expect("tempdir");
        let path = dir.path().join("History");
        let conn = Connection::open(&path).expect("conn");
        conn.execute(
            "CREATE TABLE urls (id INTEGER PRIMARY KEY, url TEXT, last_visit_time INTEGER)",
            [],
        )
        .expect("create urls");
        conn.execute(
            "INSERT INTO urls (url, last_visit_time) VALUES ('https://example.com', NULL)",
            [],
        )
        .expect("insert");
        drop(conn);

        let records = extract_history(&path, Browser::Chrome, None).expect("extract");
        assert!(records[0].visit_time.is_none());
        assert_eq!(format_visit_time(records[0].visit_time), "");
    }
}
