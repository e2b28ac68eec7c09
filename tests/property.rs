use proptest::prelude::*;
use std::sync::Arc;
use tx_fetcher::explorer::{parse_date, DATE_TIME_FORMAT};
use tx_fetcher::{ErrorCode, ExplorerEndpoints, PeriodFetcher, PeriodQuery};

mod common;
use common::{january_explorer, ADDRESS};

/// Strings that can never be `YYYY-MM-DD` or `YYYY-MM-DD HH:MM:SS`
fn malformed_date() -> impl Strategy<Value = String> {
    prop_oneof![
        // no digits at all
        "[a-zA-Z :/.]{0,24}",
        // day-first with slashes
        "[0-9]{2}/[0-9]{2}/[0-9]{4}",
        // ISO with a T separator
        "20[0-9]{2}-0[1-9]-1[0-9]T[01][0-9]:[0-5][0-9]:[0-5][0-9]",
        // valid date followed by an hour-minute suffix only
        "20[0-9]{2}-0[1-9]-1[0-9] [01][0-9]:[0-5][0-9]",
        // date and time run together
        "20[0-9]{2}-0[1-9]-1[0-9][01][0-9]:[0-5][0-9]:[0-5][0-9]",
        // leading whitespace or sign
        "[ \t]{1,3}20[0-9]{2}-0[1-9]-1[0-9]",
        "[+-]20[0-9]{2}-0[1-9]-1[0-9]",
        // leap or out-of-range seconds
        "20[0-9]{2}-0[1-9]-1[0-9] [01][0-9]:[0-5][0-9]:[6-9][0-9]",
        // trailing whitespace
        "20[0-9]{2}-0[1-9]-1[0-9][ \t]{1,3}",
    ]
}

proptest! {
    #[test]
    fn malformed_dates_are_validation_errors(date in malformed_date()) {
        let err = parse_date(&date).unwrap_err();
        prop_assert_eq!(err.code, ErrorCode::Validation);
        prop_assert!(err.message.contains(&date));
    }

    #[test]
    fn well_formed_dates_round_trip(
        year in 1971i32..2100,
        month in 1u32..=12,
        day in 1u32..=28,
        hour in 0u32..24,
        minute in 0u32..60,
        second in 0u32..60,
    ) {
        let full = format!("{:04}-{:02}-{:02} {:02}:{:02}:{:02}", year, month, day, hour, minute, second);
        let parsed = parse_date(&full).unwrap();
        prop_assert_eq!(parsed.format(DATE_TIME_FORMAT).to_string(), full);

        let day_only = format!("{:04}-{:02}-{:02}", year, month, day);
        let midnight = parse_date(&day_only).unwrap();
        prop_assert_eq!(midnight.format(DATE_TIME_FORMAT).to_string(), format!("{} 00:00:00", day_only));
    }

    #[test]
    fn malformed_period_dates_never_reach_the_explorer(date in malformed_date()) {
        let explorer = Arc::new(january_explorer());
        let fetcher = PeriodFetcher::new(explorer.clone(), ExplorerEndpoints::default());
        let query = PeriodQuery::new(ADDRESS, "2024-01-01", date, "ethereum", Some("TESTKEY".to_string()));

        let err = fetcher.get_transactions_for_period(&query).unwrap_err();
        prop_assert_eq!(err.code, ErrorCode::Validation);
        prop_assert_eq!(explorer.call_count(), 0);
    }
}
