//! Field-level checks shared by the entity models.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;

use crate::error::{FastcoError, FastcoResult};
use crate::registry::EntityKind;

pub fn require_text(kind: EntityKind, field: &str, value: &str) -> FastcoResult<()> {
    if value.trim().is_empty() {
        return Err(FastcoError::validation(format!(
            "{kind}.{field} must not be empty"
        )));
    }
    Ok(())
}

/// Optional text may be absent, but not present-and-blank.
pub fn optional_text(kind: EntityKind, field: &str, value: Option<&str>) -> FastcoResult<()> {
    match value {
        Some(v) => require_text(kind, field, v),
        None => Ok(()),
    }
}

pub fn require_email(kind: EntityKind, field: &str, value: &str) -> FastcoResult<()> {
    require_text(kind, field, value)?;
    match value.split_once('@') {
        Some((local, domain)) if !local.is_empty() && !domain.is_empty() => Ok(()),
        _ => Err(FastcoError::validation(format!(
            "{kind}.{field} is not an email address: {value}"
        ))),
    }
}

pub fn require_non_negative(kind: EntityKind, field: &str, value: Decimal) -> FastcoResult<()> {
    if value.is_sign_negative() && !value.is_zero() {
        return Err(FastcoError::validation(format!(
            "{kind}.{field} must not be negative (got {value})"
        )));
    }
    Ok(())
}

pub fn require_percentage(kind: EntityKind, field: &str, value: Decimal) -> FastcoResult<()> {
    require_non_negative(kind, field, value)?;
    if value > Decimal::ONE_HUNDRED {
        return Err(FastcoError::validation(format!(
            "{kind}.{field} must not exceed 100 (got {value})"
        )));
    }
    Ok(())
}

pub fn require_ordered(
    kind: EntityKind,
    start_field: &str,
    start: DateTime<Utc>,
    end_field: &str,
    end: DateTime<Utc>,
) -> FastcoResult<()> {
    if end < start {
        return Err(FastcoError::validation(format!(
            "{kind}.{end_field} must not precede {start_field}"
        )));
    }
    Ok(())
}

pub fn require_url(kind: EntityKind, field: &str, value: &str) -> FastcoResult<()> {
    url::Url::parse(value).map_err(|e| {
        FastcoError::validation(format!("{kind}.{field} is not a valid URL: {e}"))
    })?;
    Ok(())
}

pub fn require_range(
    kind: EntityKind,
    field: &str,
    value: i64,
    min: i64,
    max: i64,
) -> FastcoResult<()> {
    if value < min || value > max {
        return Err(FastcoError::validation(format!(
            "{kind}.{field} must be between {min} and {max} (got {value})"
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    #[test]
    fn blank_text_is_rejected() {
        assert!(require_text(EntityKind::Document, "name", "  ").is_err());
        assert!(require_text(EntityKind::Document, "name", "contract.pdf").is_ok());
    }

    #[test]
    fn optional_text_allows_absence() {
        assert!(optional_text(EntityKind::Human, "phone", None).is_ok());
        assert!(optional_text(EntityKind::Human, "phone", Some("")).is_err());
    }

    #[test]
    fn email_shape() {
        assert!(require_email(EntityKind::Account, "email", "a@b.io").is_ok());
        assert!(require_email(EntityKind::Account, "email", "nobody").is_err());
        assert!(require_email(EntityKind::Account, "email", "@b.io").is_err());
    }

    #[test]
    fn percentage_bounds() {
        let kind = EntityKind::Discount;
        assert!(require_percentage(kind, "percentage", Decimal::new(125, 1)).is_ok());
        assert!(require_percentage(kind, "percentage", Decimal::ONE_HUNDRED).is_ok());
        assert!(require_percentage(kind, "percentage", Decimal::new(1001, 1)).is_err());
        assert!(require_percentage(kind, "percentage", Decimal::NEGATIVE_ONE).is_err());
    }

    #[test]
    fn date_ordering() {
        let now = Utc::now();
        let kind = EntityKind::Subscription;
        assert!(require_ordered(kind, "start_date", now, "end_date", now).is_ok());
        assert!(
            require_ordered(kind, "start_date", now, "end_date", now - Duration::days(1)).is_err()
        );
    }

    #[test]
    fn url_parsing() {
        let kind = EntityKind::Platform;
        assert!(require_url(kind, "web_url", "https://stripe.com").is_ok());
        assert!(require_url(kind, "web_url", "stripe dot com").is_err());
    }
}
