//! Canvas configuration parsed from environment variables.

use std::env::VarError;

use crate::consts::{DEFAULT_BORDER_INSET, DEFAULT_CAPTURE_NAME, DEFAULT_WORKSPACE_HEIGHT, DEFAULT_WORKSPACE_WIDTH};
use crate::geometry::Extent;

pub const WORKSPACE_VAR: &str = "CANVAS_WORKSPACE";
pub const CAPTURE_NAME_VAR: &str = "CANVAS_CAPTURE_NAME";
pub const BORDER_INSET_VAR: &str = "CANVAS_BORDER_INSET";

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("invalid {var}={value:?}: {reason}")]
    Parse { var: String, value: String, reason: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CanvasConfig {
    /// Desktop area a window may grow to when auto-resizing.
    pub workspace: Extent,
    /// Name given to captured datasets.
    pub capture_name: String,
    /// Scroll-pane border inset per side, in pixels.
    pub border_inset: i32,
}

impl Default for CanvasConfig {
    fn default() -> Self {
        Self {
            workspace: Extent::new(DEFAULT_WORKSPACE_WIDTH, DEFAULT_WORKSPACE_HEIGHT),
            capture_name: DEFAULT_CAPTURE_NAME.to_string(),
            border_inset: DEFAULT_BORDER_INSET,
        }
    }
}

impl CanvasConfig {
    /// Build typed canvas config from environment variables.
    ///
    /// Optional:
    /// - `CANVAS_WORKSPACE`: `WIDTHxHEIGHT`, default `1920x1080`
    /// - `CANVAS_CAPTURE_NAME`: default `Captured view`
    /// - `CANVAS_BORDER_INSET`: default 1
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Parse` for malformed or non-unicode values.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| match std::env::var(key) {
            Ok(value) => Ok(Some(value)),
            Err(VarError::NotPresent) => Ok(None),
            Err(VarError::NotUnicode(raw)) => Err(parse_error(key, &raw.to_string_lossy(), "not valid unicode")),
        })
    }

    /// Build config from an arbitrary key lookup.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Parse` for malformed values, or whatever the lookup returns.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Result<Option<String>, ConfigError>,
    {
        let defaults = Self::default();

        let workspace = match lookup(WORKSPACE_VAR)? {
            Some(raw) => parse_workspace(&raw)?,
            None => defaults.workspace,
        };
        let capture_name = match lookup(CAPTURE_NAME_VAR)? {
            Some(raw) if !raw.trim().is_empty() => raw.trim().to_string(),
            _ => defaults.capture_name,
        };
        let border_inset = match lookup(BORDER_INSET_VAR)? {
            Some(raw) => parse_inset(&raw)?,
            None => defaults.border_inset,
        };

        Ok(Self { workspace, capture_name, border_inset })
    }
}

fn parse_error(var: &str, value: &str, reason: &str) -> ConfigError {
    ConfigError::Parse { var: var.to_string(), value: value.to_string(), reason: reason.to_string() }
}

fn parse_workspace(raw: &str) -> Result<Extent, ConfigError> {
    let Some((w, h)) = raw.trim().split_once(['x', 'X']) else {
        return Err(parse_error(WORKSPACE_VAR, raw, "expected WIDTHxHEIGHT"));
    };
    let dimension = |s: &str| match s.trim().parse::<i32>() {
        Ok(v) if v > 0 => Ok(v),
        _ => Err(parse_error(WORKSPACE_VAR, raw, "dimensions must be positive integers")),
    };
    Ok(Extent::new(dimension(w)?, dimension(h)?))
}

fn parse_inset(raw: &str) -> Result<i32, ConfigError> {
    match raw.trim().parse::<i32>() {
        Ok(v) if v >= 0 => Ok(v),
        _ => Err(parse_error(BORDER_INSET_VAR, raw, "expected a non-negative integer")),
    }
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
