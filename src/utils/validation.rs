use crate::utils::error::{EnrollmentError, Result};
use url::Url;

pub trait Validate {
    fn validate(&self) -> Result<()>;
}

fn invalid(field: &str, value: impl ToString, reason: impl Into<String>) -> EnrollmentError {
    EnrollmentError::InvalidConfigValueError {
        field: field.to_string(),
        value: value.to_string(),
        reason: reason.into(),
    }
}

/// ViaCEP base URL: http(s), no query or fragment, since `/{cep}/json/` is appended to it.
pub fn validate_base_url(field: &str, base_url: &str) -> Result<()> {
    if base_url.trim().is_empty() {
        return Err(invalid(field, base_url, "URL cannot be empty"));
    }

    let url = Url::parse(base_url)
        .map_err(|e| invalid(field, base_url, format!("Invalid URL format: {}", e)))?;

    if !matches!(url.scheme(), "http" | "https") {
        return Err(invalid(
            field,
            base_url,
            format!("Unsupported URL scheme: {}", url.scheme()),
        ));
    }
    if url.query().is_some() || url.fragment().is_some() {
        return Err(invalid(
            field,
            base_url,
            "Base URL must not carry a query or fragment",
        ));
    }

    Ok(())
}

pub fn validate_timeout_seconds(field: &str, seconds: u64) -> Result<()> {
    if seconds == 0 {
        return Err(invalid(field, seconds, "Timeout must be at least 1 second"));
    }
    Ok(())
}

pub fn validate_data_dir(field: &str, dir: &str) -> Result<()> {
    if dir.is_empty() {
        return Err(invalid(field, dir, "Data directory cannot be empty"));
    }
    if dir.contains('\0') {
        return Err(invalid(field, dir, "Path contains null bytes"));
    }
    Ok(())
}

/// The snapshot file lives directly inside the data directory.
pub fn validate_file_name(field: &str, name: &str) -> Result<()> {
    validate_data_dir(field, name)?;

    if name.contains(['/', '\\']) || name == "." || name == ".." {
        return Err(invalid(
            field,
            name,
            "File name must not contain path separators",
        ));
    }
    Ok(())
}
