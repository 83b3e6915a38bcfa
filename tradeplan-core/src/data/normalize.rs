//! Raw-bar normalization.
//!
//! Upstream JSON APIs deliver numeric fields as strings and bars in
//! newest-first order. This module parses records into typed `PriceBar`s
//! and hands off to `PriceHistory::from_bars` for ordering, sanity
//! filtering, and the minimum-length check.

use chrono::NaiveDate;
use serde::Deserialize;

use crate::data::provider::FetchError;
use crate::domain::PriceBar;

/// One raw bar record as it arrives off the wire.
#[derive(Debug, Clone, Deserialize)]
pub struct RawBarRecord {
    pub datetime: String,
    pub open: String,
    pub high: String,
    pub low: String,
    pub close: String,
    #[serde(default)]
    pub volume: String,
}

/// Parse raw records into typed bars, preserving input order.
///
/// A record with an unparseable price or date fails the whole batch —
/// a half-parsed history would silently shift every indicator window.
/// A missing/empty volume parses as 0 (some feeds omit it for indices).
pub fn normalize(records: &[RawBarRecord]) -> Result<Vec<PriceBar>, FetchError> {
    records.iter().map(parse_record).collect()
}

fn parse_record(record: &RawBarRecord) -> Result<PriceBar, FetchError> {
    let date = parse_date(&record.datetime)?;
    Ok(PriceBar {
        date,
        open: parse_price(&record.open, "open", &record.datetime)?,
        high: parse_price(&record.high, "high", &record.datetime)?,
        low: parse_price(&record.low, "low", &record.datetime)?,
        close: parse_price(&record.close, "close", &record.datetime)?,
        volume: parse_volume(&record.volume),
    })
}

fn parse_date(raw: &str) -> Result<NaiveDate, FetchError> {
    // Daily feeds send "2024-01-02"; some send a full timestamp.
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .or_else(|_| NaiveDate::parse_from_str(raw, "%Y-%m-%d %H:%M:%S"))
        .map_err(|_| FetchError::ResponseFormatChanged(format!("unparseable datetime: {raw:?}")))
}

fn parse_price(raw: &str, field: &str, datetime: &str) -> Result<f64, FetchError> {
    raw.trim().parse::<f64>().map_err(|_| {
        FetchError::ResponseFormatChanged(format!(
            "unparseable {field} {raw:?} at {datetime}"
        ))
    })
}

fn parse_volume(raw: &str) -> u64 {
    // Volume occasionally arrives as a float string ("123456.0").
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return 0;
    }
    trimmed
        .parse::<u64>()
        .ok()
        .or_else(|| trimmed.parse::<f64>().ok().map(|v| v.max(0.0) as u64))
        .unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(datetime: &str, close: &str) -> RawBarRecord {
        RawBarRecord {
            datetime: datetime.to_string(),
            open: close.to_string(),
            high: close.to_string(),
            low: close.to_string(),
            close: close.to_string(),
            volume: "1000".to_string(),
        }
    }

    #[test]
    fn parses_string_typed_fields() {
        let bars = normalize(&[record("2024-01-02", "101.50")]).unwrap();
        assert_eq!(bars[0].close, 101.50);
        assert_eq!(bars[0].volume, 1000);
        assert_eq!(
            bars[0].date,
            NaiveDate::from_ymd_opt(2024, 1, 2).unwrap()
        );
    }

    #[test]
    fn accepts_timestamp_datetimes() {
        let bars = normalize(&[record("2024-01-02 00:00:00", "100")]).unwrap();
        assert_eq!(bars[0].date, NaiveDate::from_ymd_opt(2024, 1, 2).unwrap());
    }

    #[test]
    fn bad_price_fails_the_batch() {
        let mut bad = record("2024-01-02", "100");
        bad.close = "n/a".to_string();
        let err = normalize(&[record("2024-01-01", "99"), bad]).unwrap_err();
        assert!(matches!(err, FetchError::ResponseFormatChanged(_)));
    }

    #[test]
    fn bad_date_fails_the_batch() {
        let err = normalize(&[record("yesterday", "100")]).unwrap_err();
        assert!(matches!(err, FetchError::ResponseFormatChanged(_)));
    }

    #[test]
    fn volume_variants() {
        let mut r = record("2024-01-02", "100");
        r.volume = String::new();
        assert_eq!(normalize(&[r]).unwrap()[0].volume, 0);

        let mut r = record("2024-01-02", "100");
        r.volume = "123456.0".to_string();
        assert_eq!(normalize(&[r]).unwrap()[0].volume, 123456);
    }
}
