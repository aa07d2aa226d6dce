//! # Display Formatting
//!
//! Stateless helpers the view layer uses to render money and delivery
//! estimates. Pure string builders - no locale machinery, just the es-MX
//! conventions the storefront displays.

use chrono::{Datelike, Days, NaiveDate, Utc, Weekday};

use crate::money::Money;

// =============================================================================
// Currency
// =============================================================================

/// Formats money for display with thousands separators and two decimals.
///
/// ## Example
/// ```rust
/// use tienda_core::format::format_currency;
/// use tienda_core::money::Money;
///
/// assert_eq!(format_currency(Money::from_cents(1_299_950)), "$12,999.50");
/// assert_eq!(format_currency(Money::from_cents(-550)), "-$5.50");
/// ```
pub fn format_currency(amount: Money) -> String {
    let sign = if amount.is_negative() { "-" } else { "" };
    let pesos = amount.pesos().abs().to_string();

    // Group the integer part in threes from the right.
    let mut grouped = String::with_capacity(pesos.len() + pesos.len() / 3);
    for (i, c) in pesos.chars().enumerate() {
        if i > 0 && (pesos.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(c);
    }

    format!("{}${}.{:02}", sign, grouped, amount.cents_part())
}

// =============================================================================
// Delivery ETA
// =============================================================================

/// Short Spanish weekday abbreviation.
const fn weekday_abbr(weekday: Weekday) -> &'static str {
    match weekday {
        Weekday::Mon => "lun",
        Weekday::Tue => "mar",
        Weekday::Wed => "mié",
        Weekday::Thu => "jue",
        Weekday::Fri => "vie",
        Weekday::Sat => "sáb",
        Weekday::Sun => "dom",
    }
}

/// Short Spanish month abbreviation (1-based month number).
const MONTH_ABBR: [&str; 12] = [
    "ene", "feb", "mar", "abr", "may", "jun", "jul", "ago", "sep", "oct", "nov", "dic",
];

/// Formats a delivery date `eta_days` from the given date: "mié 12 ago".
///
/// Exposed separately from [`format_eta`] so the arrival date is a pure
/// function of its inputs.
pub fn format_eta_from(from: NaiveDate, eta_days: u32) -> String {
    let date = from
        .checked_add_days(Days::new(eta_days as u64))
        .unwrap_or(from);
    format!(
        "{} {} {}",
        weekday_abbr(date.weekday()),
        date.day(),
        MONTH_ABBR[date.month0() as usize]
    )
}

/// Formats the delivery date `eta_days` from today.
pub fn format_eta(eta_days: u32) -> String {
    format_eta_from(Utc::now().date_naive(), eta_days)
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_currency() {
        assert_eq!(format_currency(Money::from_cents(0)), "$0.00");
        assert_eq!(format_currency(Money::from_cents(999)), "$9.99");
        assert_eq!(format_currency(Money::from_cents(100_000)), "$1,000.00");
        assert_eq!(format_currency(Money::from_cents(1_299_950)), "$12,999.50");
        assert_eq!(
            format_currency(Money::from_cents(123_456_789_00)),
            "$123,456,789.00"
        );
        assert_eq!(format_currency(Money::from_cents(-550)), "-$5.50");
    }

    #[test]
    fn test_format_eta_from() {
        // 2026-08-07 is a Friday
        let from = NaiveDate::from_ymd_opt(2026, 8, 7).unwrap();
        assert_eq!(format_eta_from(from, 0), "vie 7 ago");
        assert_eq!(format_eta_from(from, 3), "lun 10 ago");
        // Month rollover
        assert_eq!(format_eta_from(from, 25), "mar 1 sep");
    }

    #[test]
    fn test_format_eta_uses_today() {
        // Smoke: shape is "<abbr> <day> <abbr>"
        let rendered = format_eta(1);
        let parts: Vec<&str> = rendered.split(' ').collect();
        assert_eq!(parts.len(), 3);
        assert!(parts[1].parse::<u32>().is_ok());
    }
}
