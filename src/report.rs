//! Terminal rendering of an estimate for the `carquote` command.

use std::fmt::Write as _;

use crate::estimator::CarQuote;

/// Substituted when the user leaves the description empty.
pub const NO_DESCRIPTION: &str = "No description provided";

/// `1234567.891` → `$1,234,567.89`. Negative values render as `$-12.00`.
pub fn format_usd(amount: f64) -> String {
    let fixed = format!("{:.2}", amount.abs());
    let (whole, cents) = fixed.split_once('.').unwrap_or((fixed.as_str(), "00"));

    let mut grouped = String::with_capacity(whole.len() + whole.len() / 3);
    for (i, digit) in whole.chars().enumerate() {
        if i > 0 && (whole.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(digit);
    }

    let sign = if amount < 0.0 && fixed != "0.00" { "-" } else { "" };
    format!("${sign}{grouped}.{cents}")
}

/// Upper-cases the first character: `suv` → `Suv`.
pub fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars.flat_map(char::to_lowercase)).collect(),
        None => String::new(),
    }
}

/// The price breakdown plus a short summary of the car.
pub fn render_estimate(car: &CarQuote, estimated: f64) -> String {
    let markup = estimated - car.price;
    let mut out = String::new();

    let _ = writeln!(out, "Price Estimate Generated!");
    let _ = writeln!(out);
    let _ = writeln!(out, "  Base Price       {}", format_usd(car.price));
    let _ = writeln!(out, "  Markup           {}", format_usd(markup));
    let _ = writeln!(out, "  Estimated Price  {} (+{})", format_usd(estimated), format_usd(markup));
    let _ = writeln!(out);
    let _ = writeln!(out, "Car Summary:");
    let _ = writeln!(out, "  - Name: {}", car.name);
    let _ = writeln!(out, "  - Type: {}", capitalize(&car.kind));
    let _ = write!(out, "  - Description: {}", car.description);
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn usd_groups_thousands_and_rounds_cents() {
        assert_eq!(format_usd(25_000.0), "$25,000.00");
        assert_eq!(format_usd(1_234_567.891), "$1,234,567.89");
        assert_eq!(format_usd(999.0), "$999.00");
        assert_eq!(format_usd(0.0), "$0.00");
    }

    #[test]
    fn usd_keeps_the_sign_after_the_dollar() {
        assert_eq!(format_usd(-1_500.0), "$-1,500.00");
        assert_eq!(format_usd(-0.001), "$0.00");
    }

    #[test]
    fn capitalize_matches_title_style() {
        assert_eq!(capitalize("suv"), "Suv");
        assert_eq!(capitalize("SEDAN"), "Sedan");
        assert_eq!(capitalize(""), "");
    }

    #[test]
    fn render_shows_breakdown_and_summary() {
        let car = CarQuote {
            name: "Toyota Camry".to_owned(),
            kind: "sedan".to_owned(),
            price: 20_000.0,
            description: NO_DESCRIPTION.to_owned(),
        };
        let out = render_estimate(&car, 25_000.0);

        assert!(out.contains("Base Price       $20,000.00"));
        assert!(out.contains("Markup           $5,000.00"));
        assert!(out.contains("Estimated Price  $25,000.00 (+$5,000.00)"));
        assert!(out.contains("- Type: Sedan"));
        assert!(out.ends_with("- Description: No description provided"));
    }
}
