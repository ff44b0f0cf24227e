//! Severity allow-list.
//!
//! The list is parsed best-effort: tokens that name no level are dropped,
//! and a list with no usable tokens lets every level through.

use crate::types::LogEventLevel;
use tracing::debug;

/// Parsed allow-list of event levels
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LevelFilter {
    allowed: Vec<LogEventLevel>,
}

impl LevelFilter {
    /// Filter that accepts every level
    pub fn allow_all() -> Self {
        Self::default()
    }

    /// Filter restricted to the given levels
    pub fn only(levels: impl IntoIterator<Item = LogEventLevel>) -> Self {
        let mut allowed = Vec::new();
        for level in levels {
            if !allowed.contains(&level) {
                allowed.push(level);
            }
        }
        Self { allowed }
    }

    /// Parse a comma separated list such as `"Warning,Error"`
    pub fn parse(list: Option<&str>) -> Self {
        let Some(list) = list else {
            return Self::allow_all();
        };

        let levels = list
            .split(',')
            .map(str::trim)
            .filter(|token| !token.is_empty())
            .filter_map(|token| match token.parse::<LogEventLevel>() {
                Ok(level) => Some(level),
                Err(e) => {
                    debug!(error = %e, "Ignoring event level filter entry");
                    None
                }
            });

        Self::only(levels)
    }

    /// Whether every level passes
    pub fn is_permissive(&self) -> bool {
        self.allowed.is_empty()
    }

    /// Levels in the allow-list, in the order first listed
    pub fn allowed_levels(&self) -> &[LogEventLevel] {
        &self.allowed
    }

    /// Whether an event at `level` should be relayed
    pub fn allows(&self, level: LogEventLevel) -> bool {
        self.is_permissive() || self.allowed.contains(&level)
    }
}
