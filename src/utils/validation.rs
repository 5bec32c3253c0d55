use crate::utils::error::{KitchenError, Result};
use std::collections::HashSet;
use url::Url;

pub trait Validate {
    fn validate(&self) -> Result<()>;
}

pub fn validate_url(field_name: &str, url_str: &str) -> Result<()> {
    if url_str.is_empty() {
        return Err(KitchenError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: url_str.to_string(),
            reason: "URL cannot be empty".to_string(),
        });
    }

    match Url::parse(url_str) {
        Ok(url) => match url.scheme() {
            "http" | "https" => Ok(()),
            scheme => Err(KitchenError::InvalidConfigValueError {
                field: field_name.to_string(),
                value: url_str.to_string(),
                reason: format!("Unsupported URL scheme: {}", scheme),
            }),
        },
        Err(e) => Err(KitchenError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: url_str.to_string(),
            reason: format!("Invalid URL format: {}", e),
        }),
    }
}

pub fn validate_path(field_name: &str, path: &str) -> Result<()> {
    if path.is_empty() {
        return Err(KitchenError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: path.to_string(),
            reason: "Path cannot be empty".to_string(),
        });
    }

    if path.contains('\0') {
        return Err(KitchenError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: path.to_string(),
            reason: "Path contains null bytes".to_string(),
        });
    }

    Ok(())
}

pub fn validate_positive_number(field_name: &str, value: usize, min_value: usize) -> Result<()> {
    if value < min_value {
        return Err(KitchenError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: value.to_string(),
            reason: format!("Value must be at least {}", min_value),
        });
    }
    Ok(())
}

pub fn validate_range<T: PartialOrd + std::fmt::Display + Copy>(
    field_name: &str,
    value: T,
    min: T,
    max: T,
) -> Result<()> {
    if value < min || value > max {
        return Err(KitchenError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: value.to_string(),
            reason: format!("Value must be between {} and {}", min, max),
        });
    }
    Ok(())
}

pub fn validate_one_of(field_name: &str, values: &[String], allowed: &[&str]) -> Result<()> {
    let allowed_set: HashSet<&str> = allowed.iter().copied().collect();

    for value in values {
        if !allowed_set.contains(value.as_str()) {
            return Err(KitchenError::InvalidConfigValueError {
                field: field_name.to_string(),
                value: value.clone(),
                reason: format!("Unsupported value. Allowed: {}", allowed.join(", ")),
            });
        }
    }

    Ok(())
}

pub fn validate_non_empty_string(field_name: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(KitchenError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: value.to_string(),
            reason: "Value cannot be empty or whitespace-only".to_string(),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_url() {
        assert!(validate_url("ephemeris.primary_url", "https://example.com").is_ok());
        assert!(validate_url("ephemeris.primary_url", "http://example.com").is_ok());
        assert!(validate_url("ephemeris.primary_url", "").is_err());
        assert!(validate_url("ephemeris.primary_url", "invalid-url").is_err());
        assert!(validate_url("ephemeris.primary_url", "ftp://example.com").is_err());
    }

    #[test]
    fn test_validate_range_for_coordinates() {
        assert!(validate_range("location.latitude", 40.7498, -90.0, 90.0).is_ok());
        assert!(validate_range("location.latitude", 91.0, -90.0, 90.0).is_err());
        assert!(validate_range("location.longitude", -181.0, -180.0, 180.0).is_err());
    }

    #[test]
    fn test_validate_one_of() {
        let formats = vec!["csv".to_string(), "json".to_string()];
        assert!(validate_one_of("output.formats", &formats, &["csv", "json"]).is_ok());

        let invalid = vec!["xml".to_string()];
        assert!(validate_one_of("output.formats", &invalid, &["csv", "json"]).is_err());
    }

    #[test]
    fn test_validate_positive_number() {
        assert!(validate_positive_number("scoring.limit", 5, 1).is_ok());
        assert!(validate_positive_number("scoring.limit", 0, 1).is_err());
    }
}
