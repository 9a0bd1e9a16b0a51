use chrono::NaiveDate;

/// Format a calendar date as YYYY-MM-DD, the value format of date inputs
pub fn format_iso_date(year: i32, month: u32, day: u32) -> Option<String> {
    NaiveDate::from_ymd_opt(year, month, day).map(|date| date.format("%Y-%m-%d").to_string())
}

/// Get current local date in YYYY-MM-DD format
pub fn get_current_date() -> Option<String> {
    use js_sys::Date;
    let now = Date::new_0();
    let year = now.get_full_year();
    let month = now.get_month() + 1; // JavaScript months are 0-indexed
    let day = now.get_date();

    format_iso_date(year as i32, month, day)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_iso_date_pads() {
        assert_eq!(format_iso_date(2025, 6, 5), Some("2025-06-05".to_string()));
        assert_eq!(format_iso_date(2024, 12, 31), Some("2024-12-31".to_string()));
    }

    #[test]
    fn test_format_iso_date_rejects_impossible_dates() {
        assert_eq!(format_iso_date(2025, 2, 29), None);
        assert_eq!(format_iso_date(2025, 13, 1), None);
        assert_eq!(format_iso_date(2024, 2, 29), Some("2024-02-29".to_string()));
    }
}
