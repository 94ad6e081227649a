//! Shipping form validation.

use std::sync::LazyLock;

use regex::Regex;

use super::FieldErrors;
use crate::model::{ShippingDetails, ShippingForm, SHIPPING_FIELDS};

/// Accepted email grammar: dot-separated local atoms, `@`, and a dotted
/// domain of alphanumeric labels.
pub const EMAIL_PATTERN: &str = r"^[A-Za-z0-9_'+\-]+(?:\.[A-Za-z0-9_'+\-]+)*@[A-Za-z0-9](?:[A-Za-z0-9\-]*[A-Za-z0-9])?(?:\.[A-Za-z0-9](?:[A-Za-z0-9\-]*[A-Za-z0-9])?)*\.[A-Za-z]{2,}$";

static EMAIL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(EMAIL_PATTERN).expect("email pattern compiles"));

/// Constraint check for one field; returns the error message on failure.
fn check_field(field: &str, value: &str) -> Option<&'static str> {
    let min_len = |min: usize, message: &'static str| (value.chars().count() < min).then_some(message);
    match field {
        "name" => min_len(2, "Name is required"),
        "email" => (!EMAIL_RE.is_match(value)).then_some("Invalid email address"),
        "address" => min_len(5, "Address is required"),
        "city" => min_len(2, "City is required"),
        "zip" => min_len(3, "Valid zip code is required"),
        "country" => min_len(2, "Country is required"),
        "phone" => min_len(10, "Valid phone number is required"),
        _ => None,
    }
}

/// Validate a raw shipping form.
///
/// Values are trimmed before checking. Unknown fields are dropped. Either every
/// field passes and a complete record is returned, or all failures are.
pub fn validate_shipping(form: &ShippingForm) -> Result<ShippingDetails, FieldErrors> {
    let mut errors = FieldErrors::new();
    for field in SHIPPING_FIELDS {
        if let Some(message) = check_field(field, form.get(field).trim()) {
            errors.add(field, message);
        }
    }

    if !errors.is_empty() {
        return Err(errors);
    }

    let value = |field: &str| form.get(field).trim().to_string();
    Ok(ShippingDetails {
        name: value("name"),
        email: value("email"),
        address: value("address"),
        city: value("city"),
        zip: value("zip"),
        country: value("country"),
        phone: value("phone"),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn valid_form() -> ShippingForm {
        ShippingForm::new()
            .with("name", "Ada Lovelace")
            .with("email", "ada@example.com")
            .with("address", "12 Analytical Way")
            .with("city", "London")
            .with("zip", "N1 9GU")
            .with("country", "UK")
            .with("phone", "+44 20 7946 0000")
    }

    #[test]
    fn test_email_pattern_compiles() {
        assert!(Regex::new(EMAIL_PATTERN).is_ok());
    }

    #[test]
    fn test_valid_form() {
        let details = validate_shipping(&valid_form()).unwrap();
        assert_eq!(details.name, "Ada Lovelace");
        assert_eq!(details.country, "UK");
    }

    #[test]
    fn test_short_name_only_error() {
        let form = valid_form().with("name", "A");
        let errors = validate_shipping(&form).unwrap_err();
        assert_eq!(errors.fields(), vec!["name"]);
        assert_eq!(errors.get("name"), Some("Name is required"));
    }

    #[test]
    fn test_empty_form_reports_every_field() {
        let errors = validate_shipping(&ShippingForm::new()).unwrap_err();
        assert_eq!(
            errors.fields(),
            vec!["name", "email", "address", "city", "zip", "country", "phone"]
        );
    }

    #[test]
    fn test_values_trimmed() {
        let form = valid_form().with("city", "  Oslo  ").with("zip", " 0150 ");
        let details = validate_shipping(&form).unwrap();
        assert_eq!(details.city, "Oslo");
        assert_eq!(details.zip, "0150");

        let form = valid_form().with("name", " A ");
        assert_eq!(validate_shipping(&form).unwrap_err().fields(), vec!["name"]);
    }

    #[test]
    fn test_unknown_fields_dropped() {
        let form = valid_form().with("coupon", "PRINT10");
        assert!(validate_shipping(&form).is_ok());
    }

    #[test]
    fn test_email_grammar() {
        for ok in ["a@b.co", "first.last+tag@sub.example.org", "o'neil@example.ie"] {
            let form = valid_form().with("email", ok);
            assert!(validate_shipping(&form).is_ok(), "{ok}");
        }
        for bad in ["plain", "a@b", "@example.com", "a..b@example.com", ".a@example.com", "a@-x.com", "a b@example.com"] {
            let form = valid_form().with("email", bad);
            let errors = validate_shipping(&form).unwrap_err();
            assert_eq!(errors.fields(), vec!["email"], "{bad}");
        }
    }

    #[test]
    fn test_min_lengths_count_chars() {
        let form = valid_form().with("city", "Åå");
        assert!(validate_shipping(&form).is_ok());
    }
}
