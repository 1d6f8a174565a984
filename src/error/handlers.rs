//! Standardized error handling for identity and catalog responses

use crate::error::{PublishError, Result};
use reqwest::StatusCode;
use std::path::Path;

/// Standard error handler for HTTP responses
pub struct HttpErrorHandler;

impl HttpErrorHandler {
    /// Handle catalog-related HTTP errors with standardized messages
    pub fn handle_catalog_error(status: StatusCode, error_text: &str, context: &str) -> PublishError {
        let message = match status.as_u16() {
            400 => format!("Bad request during {}: {}", context, error_text),
            401 => format!(
                "Unauthorized to perform {} (missing or expired token?): {}",
                context, error_text
            ),
            403 => format!("Forbidden: insufficient permissions for {}: {}", context, error_text),
            404 => format!("Resource not found for {}: {}", context, error_text),
            409 => format!("Conflict during {}: {}", context, error_text),
            413 => format!("Image too large for {}: {}", context, error_text),
            500 => format!("Catalog server error during {}: {}", context, error_text),
            502 | 503 => format!("Catalog unavailable during {}: {}", context, error_text),
            _ => format!("{} failed: {}", context, error_text),
        };

        PublishError::Http {
            status: status.as_u16(),
            context: context.to_string(),
            message,
        }
    }

    /// Describe a rejected token request; rejections are not fatal so this only feeds logging
    pub fn describe_auth_rejection(status: StatusCode) -> String {
        match status.as_u16() {
            400 => "Invalid token request parameters".to_string(),
            401 => "Invalid credentials provided".to_string(),
            403 => "Access denied for tenant".to_string(),
            404 => "Token endpoint not found".to_string(),
            _ => format!("Token request returned status {}", status),
        }
    }
}

/// Network error categorization and handling
pub struct NetworkErrorHandler;

impl NetworkErrorHandler {
    /// Categorize and format network errors with helpful context
    pub fn handle_network_error(error: &reqwest::Error, context: &str) -> PublishError {
        if error.is_timeout() {
            PublishError::Network(format!("{} timed out: {}", context, error))
        } else if error.is_connect() {
            PublishError::Network(format!("Connection error during {}: {}", context, error))
        } else if error.is_body() || error.is_request() {
            PublishError::Network(format!("Transfer interrupted during {}: {}", context, error))
        } else if error.is_decode() {
            PublishError::Parse(format!("Malformed response during {}: {}", context, error))
        } else {
            PublishError::Network(format!("{} network error: {}", context, error))
        }
    }
}

/// Validation error utilities
pub struct ValidationErrorHandler;

impl ValidationErrorHandler {
    /// Disk artifacts must exist and be regular files
    pub fn validate_disk_path(path: &Path) -> Result<()> {
        if !path.exists() {
            return Err(PublishError::Validation(format!(
                "Disk image does not exist: {}",
                path.display()
            )));
        }

        if !path.is_file() {
            return Err(PublishError::Validation(format!(
                "Disk image path is not a file: {}",
                path.display()
            )));
        }

        Ok(())
    }

    /// Standard numeric range validation
    pub fn validate_timeout(timeout: u64) -> Result<()> {
        if timeout == 0 {
            return Err(PublishError::Validation(
                "Timeout must be greater than 0".to_string(),
            ));
        }

        if timeout > 86400 {
            return Err(PublishError::Validation(
                "Timeout cannot exceed 24 hours (86400 seconds)".to_string(),
            ));
        }

        Ok(())
    }
}
