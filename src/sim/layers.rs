//! Geological layer lookup by depth

use serde::{Deserialize, Serialize};

use crate::config::{LayerProperties, WorldConfig};

/// The three vertical bands of the world column
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LayerKind {
    Mantle,
    Crust,
    Surface,
}

impl LayerKind {
    pub fn name(&self) -> &'static str {
        match self {
            LayerKind::Mantle => "Mantle",
            LayerKind::Crust => "Crust",
            LayerKind::Surface => "Surface",
        }
    }

    /// Ambient properties of this band
    pub fn properties<'a>(&self, world: &'a WorldConfig) -> &'a LayerProperties {
        match self {
            LayerKind::Mantle => &world.mantle,
            LayerKind::Crust => &world.crust,
            LayerKind::Surface => &world.surface,
        }
    }
}

/// Band containing world coordinate `y` (0 = top, grows downward)
pub fn layer_kind_at(y: f32, world: &WorldConfig) -> LayerKind {
    if y > world.mantle_start {
        LayerKind::Mantle
    } else if y > world.crust_start {
        LayerKind::Crust
    } else {
        LayerKind::Surface
    }
}

/// Properties of the band containing `y`
#[inline]
pub fn layer_for(y: f32, world: &WorldConfig) -> &LayerProperties {
    layer_kind_at(y, world).properties(world)
}
