//! Everything that can go wrong while loading a solar system.

/// Why a solar system couldn't be loaded.
#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    /// The file isn't valid JSON5, or doesn't have the right shape.
    #[error("failed to parse system: {0}")]
    Parse(#[from] json5::Error),

    /// A value parsed fine but makes no sense, like a negative radius.
    #[error("invalid `{field}`: {reason}")]
    Invalid { field: String, reason: String },

    /// A body or sun was named by a prefab that doesn't exist.
    #[error("no prefab named `{0}`")]
    UnknownPrefab(String),

    /// `construct` was called twice on the same builder.
    #[error("tried to re-construct a SolarSystemBuilder after it was constructed")]
    AlreadyConstructed,
}

impl LoadError {
    pub(crate) fn invalid(field: impl Into<String>, reason: impl Into<String>) -> Self {
        LoadError::Invalid {
            field: field.into(),
            reason: reason.into(),
        }
    }
}

/// Reject NaN and infinities.
pub(crate) fn check_finite(field: &str, value: f64) -> Result<(), LoadError> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(LoadError::invalid(field, format!("must be a finite number, got {}", value)))
    }
}

/// Reject anything finite-but-negative as well.
pub(crate) fn check_non_negative(field: &str, value: f64) -> Result<(), LoadError> {
    check_finite(field, value)?;
    if value < 0.0 {
        Err(LoadError::invalid(field, format!("must not be negative, got {}", value)))
    } else {
        Ok(())
    }
}

/// Zero is out too, for sizes and distances where it would collapse geometry to a point.
pub(crate) fn check_positive(field: &str, value: f64) -> Result<(), LoadError> {
    check_finite(field, value)?;
    if value > 0.0 {
        Ok(())
    } else {
        Err(LoadError::invalid(field, format!("must be greater than zero, got {}", value)))
    }
}
