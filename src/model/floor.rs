use super::Zone;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Floor {
    pub floor_id: String,
    pub floor_name: String,
    /// Never 0; negative numbers are below ground.
    pub floor_number: i32,
    #[serde(default)]
    pub zones: Vec<Zone>,
    #[serde(rename = "isCopied", default, skip_serializing_if = "Option::is_none")]
    pub is_copied: Option<bool>,
}

impl Floor {
    #[must_use]
    pub fn new(id: impl Into<String>, name: impl Into<String>, floor_number: i32) -> Self {
        Self {
            floor_id: id.into(),
            floor_name: name.into(),
            floor_number,
            zones: Vec::new(),
            is_copied: None,
        }
    }

    #[must_use]
    pub fn with_zones(mut self, zones: Vec<Zone>) -> Self {
        self.zones = zones;
        self
    }
}

/// `B2` for -2, `3` for 3.
#[must_use]
pub fn format_floor_number(floor_number: i32) -> String {
    if floor_number < 0 {
        format!("B{}", floor_number.unsigned_abs())
    } else {
        floor_number.to_string()
    }
}

/// The level directly above `n`, skipping the nonexistent floor 0.
#[must_use]
pub const fn floor_above(n: i32) -> i32 {
    if n + 1 == 0 {
        1
    } else {
        n + 1
    }
}

/// The level directly below `n`, skipping the nonexistent floor 0.
#[must_use]
pub const fn floor_below(n: i32) -> i32 {
    if n - 1 == 0 {
        -1
    } else {
        n - 1
    }
}
