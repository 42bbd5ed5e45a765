use crate::domain::transaction::{Timestamp, DEFAULT_CURRENCY};
use bigdecimal::BigDecimal;
use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use num_format::{Locale, ToFormattedString};

pub const INVALID_DATE: &str = "Invalid Date";

const DATE_DISPLAY_FORMAT: &str = "%b %-d, %Y, %I:%M %p";
const NAIVE_DATE_TIME_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%dT%H:%M:%S%.f",
];

fn currency_symbol(code: &str) -> Option<&'static str> {
    match code {
        "USD" => Some("$"),
        "EUR" => Some("€"),
        "GBP" => Some("£"),
        "JPY" => Some("¥"),
        _ => None,
    }
}

/// Formats an amount with two decimals and thousands grouping, e.g.
/// `ETB 1,234.50` or `$1,234.50`. Codes that are not three letters fall back
/// to `"{currency} {amount}"`.
pub fn format_amount(amount: &BigDecimal, currency: &str) -> String {
    let currency = match currency.trim() {
        "" => DEFAULT_CURRENCY,
        c => c,
    };

    if currency.len() != 3 || !currency.chars().all(|c| c.is_ascii_alphabetic()) {
        return format!("{} {}", currency, amount);
    }
    let code = currency.to_ascii_uppercase();

    let fixed = amount.round(2).with_scale(2).to_string();
    let (sign, digits) = match fixed.strip_prefix('-') {
        Some(rest) => ("-", rest),
        None => ("", fixed.as_str()),
    };
    let (integer, fraction) = digits.split_once('.').unwrap_or((digits, "00"));
    let grouped = integer
        .parse::<u128>()
        .map(|n| n.to_formatted_string(&Locale::en))
        .unwrap_or_else(|_| integer.to_string());

    // -0.00 reads as 0.00
    let sign = if grouped == "0" && fraction.bytes().all(|b| b == b'0') {
        ""
    } else {
        sign
    };

    match currency_symbol(&code) {
        Some(symbol) => format!("{}{}{}.{}", sign, symbol, grouped, fraction),
        None => format!("{}{} {}.{}", sign, code, grouped, fraction),
    }
}

/// Parses the upstream's creation time into UTC.
pub fn parse_timestamp(timestamp: &Timestamp) -> Option<DateTime<Utc>> {
    match timestamp {
        Timestamp::Unix(seconds) => DateTime::<Utc>::from_timestamp(*seconds, 0),
        Timestamp::Text(text) => parse_date_text(text.trim()),
        Timestamp::Missing => None,
    }
}

fn parse_date_text(text: &str) -> Option<DateTime<Utc>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(text) {
        return Some(dt.with_timezone(&Utc));
    }
    for format in NAIVE_DATE_TIME_FORMATS {
        if let Ok(naive) = NaiveDateTime::parse_from_str(text, format) {
            return Some(naive.and_utc());
        }
    }
    if let Ok(date) = NaiveDate::parse_from_str(text, "%Y-%m-%d") {
        return date.and_hms_opt(0, 0, 0).map(|naive| naive.and_utc());
    }
    if !text.is_empty() && text.chars().all(|c| c.is_ascii_digit()) {
        return text
            .parse::<i64>()
            .ok()
            .and_then(|seconds| DateTime::<Utc>::from_timestamp(seconds, 0));
    }
    None
}

/// `Nov 14, 2023, 10:13 PM` (UTC), or `Invalid Date`.
pub fn format_date(timestamp: &Timestamp) -> String {
    parse_timestamp(timestamp)
        .map(|dt| dt.format(DATE_DISPLAY_FORMAT).to_string())
        .unwrap_or_else(|| INVALID_DATE.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn dec(s: &str) -> BigDecimal {
        BigDecimal::from_str(s).unwrap()
    }

    #[test]
    fn test_amount_with_code_prefix() {
        assert_eq!(format_amount(&dec("1234.5"), "ETB"), "ETB 1,234.50");
        assert_eq!(format_amount(&dec("0"), "ETB"), "ETB 0.00");
        assert_eq!(format_amount(&dec("1000000"), "etb"), "ETB 1,000,000.00");
    }

    #[test]
    fn test_amount_with_symbol() {
        assert_eq!(format_amount(&dec("1234.5"), "USD"), "$1,234.50");
        assert_eq!(format_amount(&dec("-5"), "USD"), "-$5.00");
        assert_eq!(format_amount(&dec("99.999"), "EUR"), "€100.00");
    }

    #[test]
    fn test_amount_rounds_to_two_places() {
        assert_eq!(format_amount(&dec("10.126"), "ETB"), "ETB 10.13");
        assert_eq!(format_amount(&dec("10.124"), "ETB"), "ETB 10.12");
    }

    #[test]
    fn test_amount_missing_currency_defaults() {
        assert_eq!(format_amount(&dec("7"), ""), "ETB 7.00");
    }

    #[test]
    fn test_amount_invalid_currency_falls_back() {
        assert_eq!(format_amount(&dec("12.5"), "BITCOIN"), "BITCOIN 12.5");
        assert_eq!(format_amount(&dec("3"), "U$"), "U$ 3");
    }

    #[test]
    fn test_unix_seconds() {
        assert_eq!(
            format_date(&Timestamp::Unix(1700000000)),
            "Nov 14, 2023, 10:13 PM"
        );
    }

    #[test]
    fn test_date_strings() {
        assert_eq!(
            format_date(&Timestamp::Text("2024-01-05T09:30:00Z".to_string())),
            "Jan 5, 2024, 09:30 AM"
        );
        assert_eq!(
            format_date(&Timestamp::Text("2024-01-05T12:30:00+03:00".to_string())),
            "Jan 5, 2024, 09:30 AM"
        );
        assert_eq!(
            format_date(&Timestamp::Text("2024-01-05 18:45:10".to_string())),
            "Jan 5, 2024, 06:45 PM"
        );
        assert_eq!(
            format_date(&Timestamp::Text("2024-01-05".to_string())),
            "Jan 5, 2024, 12:00 AM"
        );
    }

    #[test]
    fn test_numeric_string_is_unix_seconds() {
        assert_eq!(
            format_date(&Timestamp::Text("1700000000".to_string())),
            "Nov 14, 2023, 10:13 PM"
        );
    }

    #[test]
    fn test_unparsable_dates() {
        assert_eq!(format_date(&Timestamp::Text("yesterday".to_string())), INVALID_DATE);
        assert_eq!(format_date(&Timestamp::Text(String::new())), INVALID_DATE);
        assert_eq!(format_date(&Timestamp::Missing), INVALID_DATE);
        assert_eq!(format_date(&Timestamp::Unix(i64::MAX)), INVALID_DATE);
    }
}
