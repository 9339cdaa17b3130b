use thiserror::Error;

/// Failures from the few fallible core helpers. Frame loops never surface these;
/// callers fall back to a neutral value instead.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum CoreError {
    #[error("value `{value}` for {key} is not a number")]
    Unparseable { key: &'static str, value: String },
    #[error("value for {key} is not finite")]
    NonFinite { key: &'static str },
    #[error("unknown constellation node `{0}`")]
    UnknownNode(String),
    #[error("invalid tuning: {0}")]
    InvalidTuning(&'static str),
}

/// Parses a CSS-ish number such as `"412.5px"` or `"0.25"`.
pub fn parse_css_number(key: &'static str, value: &str) -> Result<f64, CoreError> {
    let trimmed = value.trim();
    let number = trimmed.strip_suffix("px").unwrap_or(trimmed).trim();
    let parsed: f64 = number.parse().map_err(|_| CoreError::Unparseable {
        key,
        value: value.to_string(),
    })?;
    if !parsed.is_finite() {
        return Err(CoreError::NonFinite { key });
    }
    Ok(parsed)
}
