use crate::adapters::store::StoreLocation;
use crate::utils::error::{ImportError, Result};

pub trait Validate {
    fn validate(&self) -> Result<()>;
}

pub fn validate_store_uri(field_name: &str, uri: &str) -> Result<()> {
    if uri.trim().is_empty() {
        return Err(ImportError::InvalidConfigValue {
            field: field_name.to_string(),
            value: uri.to_string(),
            reason: "URI cannot be empty".to_string(),
        });
    }

    StoreLocation::parse(uri)
        .map(|_| ())
        .map_err(|e| ImportError::InvalidConfigValue {
            field: field_name.to_string(),
            value: uri.to_string(),
            reason: e.to_string(),
        })
}

pub fn validate_collection_safe_name(field_name: &str, value: &str) -> Result<()> {
    validate_non_empty_string(field_name, value)?;

    if value.contains(['/', '\\', '\0']) || value == "." || value == ".." {
        return Err(ImportError::InvalidConfigValue {
            field: field_name.to_string(),
            value: value.to_string(),
            reason: "Name cannot contain path separators or be a relative path".to_string(),
        });
    }
    Ok(())
}

pub fn validate_positive_number(field_name: &str, value: usize, min_value: usize) -> Result<()> {
    if value < min_value {
        return Err(ImportError::InvalidConfigValue {
            field: field_name.to_string(),
            value: value.to_string(),
            reason: format!("Value must be at least {}", min_value),
        });
    }
    Ok(())
}

pub fn validate_non_empty_string(field_name: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(ImportError::InvalidConfigValue {
            field: field_name.to_string(),
            value: value.to_string(),
            reason: "Value cannot be empty or whitespace-only".to_string(),
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
        return Err(ImportError::InvalidConfigValue {
            field: field_name.to_string(),
            value: value.to_string(),
            reason: format!("Value must be between {} and {}", min, max),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_store_uri() {
        assert!(validate_store_uri("store_uri", "memory://").is_ok());
        assert!(validate_store_uri("store_uri", "./store").is_ok());
        assert!(validate_store_uri("store_uri", "").is_err());
        assert!(validate_store_uri("store_uri", "ftp://example.com").is_err());
    }

    #[test]
    fn test_validate_collection_safe_name() {
        assert!(validate_collection_safe_name("database", "test_db").is_ok());
        assert!(validate_collection_safe_name("database", "").is_err());
        assert!(validate_collection_safe_name("database", "a/b").is_err());
        assert!(validate_collection_safe_name("database", "..").is_err());
    }

    #[test]
    fn test_validate_positive_number() {
        assert!(validate_positive_number("batch_size", 5, 1).is_ok());
        assert!(validate_positive_number("batch_size", 0, 1).is_err());
    }

    #[test]
    fn test_validate_range() {
        assert!(validate_range("timeout_seconds", 10u64, 1, 3600).is_ok());
        assert!(validate_range("timeout_seconds", 0u64, 1, 3600).is_err());
    }
}
