//! Limits applied to count-based edits.

use serde::{Deserialize, Serialize};

use crate::model::SurfaceType;

/// Bounds the structural resize engine clamps requested counts into.
///
/// Out-of-range requests are clamped, never rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ResizeLimits {
    pub max_floors_per_side: usize,
    pub min_zones_per_floor: usize,
    pub max_zones_per_floor: usize,
    pub min_surfaces_per_type: usize,
    pub max_floor_surfaces: usize,
    pub max_ceiling_surfaces: usize,
    pub max_walls: usize,
}

impl Default for ResizeLimits {
    fn default() -> Self {
        Self {
            max_floors_per_side: 70,
            min_zones_per_floor: 1,
            max_zones_per_floor: 50,
            min_surfaces_per_type: 1,
            max_floor_surfaces: 10,
            max_ceiling_surfaces: 10,
            max_walls: 50,
        }
    }
}

fn clamp_count(requested: i64, min: usize, max: usize) -> usize {
    usize::try_from(requested.max(0))
        .unwrap_or(usize::MAX)
        .clamp(min, max.max(min))
}

impl ResizeLimits {
    /// Floors above or below ground; zero is allowed.
    #[must_use]
    pub fn clamp_floors(&self, requested: i64) -> usize {
        clamp_count(requested, 0, self.max_floors_per_side)
    }

    #[must_use]
    pub fn clamp_zones(&self, requested: i64) -> usize {
        clamp_count(requested, self.min_zones_per_floor, self.max_zones_per_floor)
    }

    #[must_use]
    pub fn clamp_surfaces(&self, surface_type: SurfaceType, requested: i64) -> usize {
        let max = match surface_type {
            SurfaceType::Floor => self.max_floor_surfaces,
            SurfaceType::Ceiling => self.max_ceiling_surfaces,
            SurfaceType::Wall => self.max_walls,
        };
        clamp_count(requested, self.min_surfaces_per_type, max)
    }
}
