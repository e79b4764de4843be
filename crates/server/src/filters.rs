//! Custom Askama template filters.

#![allow(clippy::unnecessary_wraps)]

use std::fmt::Display;

/// Returns the current year.
///
/// Usage in templates: `{{ ""|current_year }}`
#[askama::filter_fn]
pub fn current_year(_value: impl Display, _env: &dyn askama::Values) -> askama::Result<i32> {
    use chrono::Datelike;
    Ok(chrono::Utc::now().year())
}

/// Labels a product status flag.
///
/// Usage in templates: `{{ product.available|availability }}`
#[askama::filter_fn]
pub fn availability(status: impl Display, _env: &dyn askama::Values) -> askama::Result<&'static str> {
    Ok(availability_label(&status.to_string()))
}

fn availability_label(status: &str) -> &'static str {
    if status == "true" {
        "Available"
    } else {
        "Unavailable"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_availability_label() {
        assert_eq!(availability_label(&true.to_string()), "Available");
        assert_eq!(availability_label(&false.to_string()), "Unavailable");
    }
}
