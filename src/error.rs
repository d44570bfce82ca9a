//! Game-specific error types.
//!
//! Nothing in the game loop is allowed to crash on these: the host systems
//! log them with `warn!` and fall back (default config, in-memory high
//! score).  Internals propagate them with `?`.

use std::fmt;

/// Top-level error enum for Space Defender.
#[derive(Debug)]
pub enum GameError {
    /// The durable key-value storage could not be read or written.
    StorageUnavailable {
        /// What was being attempted ("read", "write", "create dir").
        operation: &'static str,
        /// Location of the backing store.
        location: String,
        /// Underlying failure, already rendered.
        reason: String,
    },

    /// A stored high score exists but is not a non-negative integer.
    MalformedScore {
        /// Storage key that held the value.
        key: String,
        /// The raw stored text.
        raw: String,
    },

    /// The configuration file exists but could not be decoded.
    ConfigParse {
        /// Path of the rejected file.
        path: String,
        /// Parser message.
        reason: String,
    },

    /// A configured value is outside the range the simulation supports.
    UnsafeConstant {
        /// Name of the config field.
        name: &'static str,
        /// The rejected value.
        value: f64,
        /// Human-readable description of the safe range.
        safe_range: &'static str,
    },
}

impl fmt::Display for GameError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GameError::StorageUnavailable {
                operation,
                location,
                reason,
            } => write!(f, "storage {} failed at {}: {}", operation, location, reason),
            GameError::MalformedScore { key, raw } => {
                write!(f, "stored value for '{}' is not a score: {:?}", key, raw)
            }
            GameError::ConfigParse { path, reason } => {
                write!(f, "failed to parse {}: {}", path, reason)
            }
            GameError::UnsafeConstant {
                name,
                value,
                safe_range,
            } => write!(
                f,
                "config value '{}' = {} is outside safe range {}",
                name, value, safe_range
            ),
        }
    }
}

impl std::error::Error for GameError {}

/// Convenience alias: a `Result` using `GameError` as the error type.
pub type GameResult<T> = Result<T, GameError>;

// ── Validation helpers ────────────────────────────────────────────────────────

/// Returns an error unless `value` lies in the closed interval `[min, max]`.
pub fn ensure_in_range(
    name: &'static str,
    value: f64,
    min: f64,
    max: f64,
    safe_range: &'static str,
) -> GameResult<()> {
    if value.is_nan() || value < min || value > max {
        Err(GameError::UnsafeConstant {
            name,
            value,
            safe_range,
        })
    } else {
        Ok(())
    }
}

/// Returns an error if `value` is not strictly positive.
pub fn ensure_positive(name: &'static str, value: f64) -> GameResult<()> {
    if value.is_nan() || value <= 0.0 {
        Err(GameError::UnsafeConstant {
            name,
            value,
            safe_range: "(0, ∞)",
        })
    } else {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn range_check_accepts_bounds_and_rejects_outside() {
        assert!(ensure_in_range("p", 0.0, 0.0, 1.0, "[0, 1]").is_ok());
        assert!(ensure_in_range("p", 1.0, 0.0, 1.0, "[0, 1]").is_ok());
        assert!(ensure_in_range("p", 1.5, 0.0, 1.0, "[0, 1]").is_err());
        assert!(ensure_in_range("p", f64::NAN, 0.0, 1.0, "[0, 1]").is_err());
    }

    #[test]
    fn display_names_the_offending_field() {
        let err = ensure_positive("projectile_speed", -1.0).unwrap_err();
        let text = err.to_string();
        assert!(text.contains("projectile_speed"), "got: {text}");
    }
}
