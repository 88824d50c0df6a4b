use crate::domain::model::Shipment;
use crate::utils::error::{BridgeError, Result};
use std::collections::BTreeSet;
use url::Url;

pub trait Validate {
    fn validate(&self) -> Result<()>;
}

/// 驗證承運商 API 位址，成功時回傳解析後的 Url
pub fn validate_url(field_name: &str, url_str: &str) -> Result<Url> {
    if url_str.is_empty() {
        return Err(BridgeError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: url_str.to_string(),
            reason: "URL cannot be empty".to_string(),
        });
    }

    match Url::parse(url_str) {
        Ok(url) => match url.scheme() {
            "http" | "https" => Ok(url),
            scheme => Err(BridgeError::InvalidConfigValueError {
                field: field_name.to_string(),
                value: url_str.to_string(),
                reason: format!("Unsupported URL scheme: {}", scheme),
            }),
        },
        Err(e) => Err(BridgeError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: url_str.to_string(),
            reason: format!("Invalid URL format: {}", e),
        }),
    }
}

pub fn validate_non_empty_string(field_name: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(BridgeError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: value.to_string(),
            reason: "Value cannot be empty or whitespace-only".to_string(),
        });
    }
    Ok(())
}

/// ISO-3166 alpha-2 國碼
pub fn validate_country_code(field_name: &str, value: &str) -> Result<()> {
    if value.len() != 2 || !value.chars().all(|c| c.is_ascii_alphabetic()) {
        return Err(BridgeError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: value.to_string(),
            reason: "Expected a two-letter ISO country code".to_string(),
        });
    }
    Ok(())
}

/// CLI 讀入的 Shipment：國碼合法、至少一個包裹、包裹 ID 不重複
impl Validate for Shipment {
    fn validate(&self) -> Result<()> {
        validate_country_code("origin.country", &self.origin.country)?;
        validate_country_code("destination.country", &self.destination.country)?;
        if self.packages.is_empty() {
            return Err(BridgeError::InvalidConfigValueError {
                field: "packages".to_string(),
                value: "[]".to_string(),
                reason: "A shipment needs at least one package".to_string(),
            });
        }

        let mut seen = BTreeSet::new();
        for package in &self.packages {
            validate_non_empty_string("packages.id", &package.id)?;
            if !seen.insert(package.id.as_str()) {
                return Err(BridgeError::InvalidConfigValueError {
                    field: "packages.id".to_string(),
                    value: package.id.clone(),
                    reason: "Package ids must be unique within a shipment".to_string(),
                });
            }
        }
        Ok(())
    }
}
