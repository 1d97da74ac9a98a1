//! Designer configuration.

use serde::{Deserialize, Serialize};

use crate::markup::MarkupOptions;

/// Default grid pitch in design units.
pub const DEFAULT_GRID_SIZE: i32 = 20;

/// Grid snapping applied to element moves.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GridSnap {
    /// Whether moves snap to the grid.
    pub enabled: bool,
    /// Grid pitch in design units. Non-positive disables snapping.
    pub size: i32,
}

impl Default for GridSnap {
    fn default() -> Self {
        Self {
            enabled: true,
            size: DEFAULT_GRID_SIZE,
        }
    }
}

impl GridSnap {
    /// Snapping turned off.
    #[must_use]
    pub const fn disabled() -> Self {
        Self {
            enabled: false,
            size: DEFAULT_GRID_SIZE,
        }
    }

    /// Round `value` to the nearest grid multiple. Halves round up.
    #[must_use]
    pub fn snap(self, value: i32) -> i32 {
        if !self.enabled || self.size <= 0 {
            return value;
        }
        let size = i64::from(self.size);
        let snapped = (2 * i64::from(value) + size).div_euclid(2 * size) * size;
        // Nearest multiple may lie past the i32 edge; take the one inside.
        let snapped = if snapped > i64::from(i32::MAX) {
            snapped - size
        } else if snapped < i64::from(i32::MIN) {
            snapped + size
        } else {
            snapped
        };
        i32::try_from(snapped).unwrap_or(value)
    }
}

/// Complete designer configuration.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DesignerConfig {
    /// Grid snapping for new editor sessions.
    #[serde(default)]
    pub grid: GridSnap,
    /// Markup encode/decode options.
    #[serde(default)]
    pub markup: MarkupOptions,
}

impl DesignerConfig {
    /// Parse a configuration from JSON; missing sections take their defaults.
    ///
    /// # Errors
    ///
    /// Returns an error if the JSON is malformed.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}
