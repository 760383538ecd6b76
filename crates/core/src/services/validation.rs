//! Field validators shared by the service inputs.

use std::borrow::Cow;

use chrono::{NaiveDate, Utc};
use validator::ValidationError;

/// Earliest accepted release date (the first public film screening).
#[must_use]
pub fn cinema_birthday() -> NaiveDate {
    NaiveDate::from_ymd_opt(1895, 12, 28).unwrap_or(NaiveDate::MIN)
}

fn error(code: &'static str, message: &'static str) -> ValidationError {
    ValidationError::new(code).with_message(Cow::Borrowed(message))
}

/// Reject empty or whitespace-only strings.
pub fn not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(error("blank", "must not be blank"));
    }
    Ok(())
}

/// A login is required and must not contain whitespace.
pub fn login(value: &str) -> Result<(), ValidationError> {
    not_blank(value)?;
    if value.chars().any(char::is_whitespace) {
        return Err(error("whitespace", "must not contain whitespace"));
    }
    Ok(())
}

/// Release dates before the birth of cinema are rejected.
pub fn release_date(value: &NaiveDate) -> Result<(), ValidationError> {
    if *value < cinema_birthday() {
        return Err(error("too_early", "must not be before 1895-12-28"));
    }
    Ok(())
}

/// Birthdays in the future are rejected.
pub fn birthday(value: &NaiveDate) -> Result<(), ValidationError> {
    if *value > Utc::now().date_naive() {
        return Err(error("future", "must not be in the future"));
    }
    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use chrono::Days;

    #[test]
    fn test_not_blank() {
        assert!(not_blank("Heat").is_ok());
        assert!(not_blank("").is_err());
        assert!(not_blank("   ").is_err());
    }

    #[test]
    fn test_login_rejects_whitespace() {
        assert!(login("dolores").is_ok());
        assert!(login("dolo res").is_err());
        assert!(login("\t").is_err());
    }

    #[test]
    fn test_release_date_boundary() {
        assert!(release_date(&cinema_birthday()).is_ok());
        let day_before = cinema_birthday().checked_sub_days(Days::new(1)).unwrap();
        assert!(release_date(&day_before).is_err());
    }

    #[test]
    fn test_birthday_in_future_rejected() {
        let today = Utc::now().date_naive();
        assert!(birthday(&today).is_ok());
        assert!(birthday(&today.checked_add_days(Days::new(2)).unwrap()).is_err());
    }
}
