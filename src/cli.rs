use time::{Date, macros::format_description};

pub mod check;
pub mod probe;
pub mod run;

pub fn parse_iso_date(value: &str) -> Result<Date, String> {
    Date::parse(value, format_description!("[year]-[month]-[day]"))
        .map_err(|e| format!("expected YYYY-MM-DD: {e}"))
}

pub fn parse_serving_date(value: &str) -> Result<Date, String> {
    Date::parse(value, format_description!("[month]/[day]/[year]"))
        .map_err(|e| format!("expected MM/DD/YYYY: {e}"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::date;

    #[test]
    fn test_parse_dates() {
        assert_eq!(parse_iso_date("2025-08-18"), Ok(date!(2025 - 08 - 18)));
        assert_eq!(parse_serving_date("08/18/2025"), Ok(date!(2025 - 08 - 18)));
        assert!(parse_iso_date("08/18/2025").is_err());
        assert!(parse_serving_date("2025-13-01").is_err());
    }
}
