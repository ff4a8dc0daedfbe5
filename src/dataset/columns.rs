use chrono::NaiveDate;

/// Columns every dataset must declare in its header row, in the order used
/// for reporting missing ones.
pub const REQUIRED_COLUMNS: [&str; 6] = ["id", "date", "description", "amount", "category", "source"];

/// Grouping column for summaries. Not part of the structure check; it is
/// resolved during coercion, so a dataset without it fails as an internal
/// error rather than a structure error.
pub const CURRENCY_COLUMN: &str = "currency";

/// Identifiers are exactly twelve ASCII alphanumerics.
pub fn parse_id(raw: &str) -> Option<&str> {
    (raw.len() == 12 && raw.bytes().all(|byte| byte.is_ascii_alphanumeric())).then_some(raw)
}

/// Dates are fixed-width `YYYY-MM-DD` and must exist on the calendar.
pub fn parse_date(raw: &str) -> Option<NaiveDate> {
    let bytes = raw.as_bytes();

    // chrono's `%Y` accepts a sign and its numeric fields skip leading
    // whitespace, so every position is pinned before the calendar parse.
    let shaped = bytes.len() == 10
        && bytes.iter().enumerate().all(|(index, byte)| match index {
            4 | 7 => *byte == b'-',
            _ => byte.is_ascii_digit(),
        });

    if !shaped {
        return None;
    }

    NaiveDate::parse_from_str(raw, "%Y-%m-%d").ok()
}

/// Amounts accept any integer-valued numeric rendering: plain integers, or
/// float forms such as `10.0` and `1e3`, with surrounding whitespace
/// tolerated. Fractional values are rejected.
pub fn parse_amount(raw: &str) -> Option<i64> {
    let trimmed = raw.trim();

    if let Ok(amount) = trimmed.parse::<i64>() {
        return Some(amount);
    }

    let value: f64 = trimmed.parse().ok()?;
    let in_range = value >= i64::MIN as f64 && value < i64::MAX as f64;

    (value.is_finite() && value.fract() == 0.0 && in_range).then_some(value as i64)
}

/// Currency codes are any three characters; the character set is not
/// restricted.
pub fn parse_currency(raw: &str) -> Option<&str> {
    (raw.chars().count() == 3).then_some(raw)
}
