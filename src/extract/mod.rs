// src/extract/mod.rs
use std::path::Path;

use chrono::NaiveDate;

use crate::error::ImportError;

/// Daily vendor drops end with an 8-digit date and a fixed 2-digit feed
/// suffix before the extension, e.g. `vendor-ftp_securities_2021070719.csv`.
const DATE_LEN: usize = 8;
const SUFFIX_LEN: usize = 2;

/// Pull the partition date out of a daily drop's filename.
///
/// Only the file stem is inspected, so directories containing digits do not
/// confuse the extraction. Fails if the stem is too short, the date slot
/// holds anything but digits, or the digits are not a real calendar date.
pub fn partition_date_from_filename(path: &str) -> Result<NaiveDate, ImportError> {
    let stem = Path::new(path)
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("");

    let fail = |reason: &str| ImportError::DateExtraction {
        path: path.to_string(),
        reason: reason.to_string(),
    };

    let bytes = stem.as_bytes();
    if bytes.len() < DATE_LEN + SUFFIX_LEN {
        return Err(fail("file name is too short to end with YYYYMMDD plus the feed suffix"));
    }

    let cut = bytes.len() - SUFFIX_LEN;
    let slot = &bytes[cut - DATE_LEN..cut];
    if !slot.iter().all(|b| b.is_ascii_digit()) {
        return Err(fail("expected 8 digits in the YYYYMMDD position before the feed suffix"));
    }

    // all-ASCII slice, safe to treat as str
    let digits = std::str::from_utf8(slot).expect("digit slice is ASCII");
    NaiveDate::parse_from_str(digits, "%Y%m%d")
        .map_err(|_| fail("the 8 digits are not a valid calendar date"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extracts_date_from_daily_drop_name() {
        let date =
            partition_date_from_filename("/tmp/vendor-europe-ftp_securities_2021070719.csv")
                .unwrap();
        assert_eq!(date, NaiveDate::from_ymd_opt(2021, 7, 7).unwrap());
    }

    #[test]
    fn ignores_digits_in_directories() {
        let date = partition_date_from_filename("/data/2020/dividends_2021123119.csv").unwrap();
        assert_eq!(date.to_string(), "2021-12-31");
    }

    #[test]
    fn works_for_other_extensions() {
        let date = partition_date_from_filename("drop_2021030119.txt").unwrap();
        assert_eq!(date.to_string(), "2021-03-01");
    }

    #[test]
    fn rejects_name_without_feed_suffix() {
        // date is flush with the extension, so the 8-digit window lands on "s_202107"
        assert!(partition_date_from_filename("securities_20210707.csv").is_err());
    }

    #[test]
    fn rejects_non_digit_date_slot() {
        assert!(partition_date_from_filename("securities_2021jul0719.csv").is_err());
    }

    #[test]
    fn rejects_impossible_calendar_date() {
        assert!(partition_date_from_filename("securities_2021139919.csv").is_err());
    }

    #[test]
    fn rejects_short_names() {
        assert!(partition_date_from_filename("x.csv").is_err());
        assert!(partition_date_from_filename("").is_err());
    }
}
