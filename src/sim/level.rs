//! Level layout generation
//!
//! Scatters hazards through the world column in horizontal bands. Density
//! depends on depth: rocks crowd the upper column, faults sit in the crust,
//! gas rises from the crust down. Fully determined by the RNG passed in.

use glam::Vec2;
use rand::Rng;

use super::collision::Rect;
use super::hazard::{Fault, GasPocket, Hazard, HazardKind, ResistantRock, Rock, WaterPocket};
use crate::config::GameConfig;

const ROCK_BAND: f32 = 200.0;
const ROCK_SPREAD: f32 = 180.0;
const RESISTANT_BAND: f32 = 250.0;
const RESISTANT_SPREAD: f32 = 200.0;
const FAULT_BAND: f32 = 300.0;
const FAULT_SPREAD: f32 = 250.0;
const WATER_BAND: f32 = 400.0;
const WATER_SPREAD: f32 = 350.0;
const GAS_BAND: f32 = 300.0;
const GAS_SPREAD: f32 = 250.0;

/// Horizontal inset for rectangular hazards
const SIDE_MARGIN: f32 = 50.0;

/// Sequential hazard id source
struct IdAlloc(u32);

impl IdAlloc {
    fn next(&mut self) -> u32 {
        self.0 += 1;
        self.0
    }
}

/// Band start positions from `from` up to (excluding) `to`
fn bands(from: f32, to: f32, step: f32) -> impl Iterator<Item = f32> {
    let count = ((to - from) / step).ceil().max(0.0) as u32;
    (0..count).map(move |i| from + i as f32 * step)
}

/// Generate the full hazard set for one run
pub fn generate_level<R: Rng>(rng: &mut R, config: &GameConfig) -> Vec<Hazard> {
    let world = &config.world;
    let width = config.canvas.width;
    let inner_width = (width - 2.0 * SIDE_MARGIN).max(1.0);
    let mut ids = IdAlloc(0);
    let mut hazards = Vec::new();

    // Ordinary rocks: twice as many in the upper column
    for y in bands(0.0, world.total_height, ROCK_BAND) {
        let count = if y < world.crust_start { 4 } else { 2 };
        for _ in 0..count {
            let x = rng.random::<f32>() * inner_width + SIDE_MARGIN;
            let rock_y = y + rng.random::<f32>() * ROCK_SPREAD;
            let rect = Rect::new(
                x,
                rock_y,
                rng.random_range(30.0..70.0),
                rng.random_range(20.0..50.0),
            );
            hazards.push(Hazard {
                id: ids.next(),
                kind: HazardKind::Rock(Rock::new(rect)),
            });
        }
    }

    // Resistant rocks: only in the upper column, thickest near the surface
    for y in bands(0.0, world.crust_start, RESISTANT_BAND) {
        let count = if y < world.surface_start { 2 } else { 1 };
        for _ in 0..count {
            let x = rng.random::<f32>() * inner_width + SIDE_MARGIN;
            let rock_y = y + rng.random::<f32>() * RESISTANT_SPREAD;
            let rect = Rect::new(
                x,
                rock_y,
                rng.random_range(50.0..90.0),
                rng.random_range(25.0..40.0),
            );
            hazards.push(Hazard {
                id: ids.next(),
                kind: HazardKind::ResistantRock(ResistantRock::new(
                    rect,
                    config.rocks.resistant_integrity,
                )),
            });
        }
    }

    // Faults: crust band only
    for y in bands(world.crust_start, world.mantle_start, FAULT_BAND) {
        for _ in 0..2 {
            let x = rng.random::<f32>() * inner_width + SIDE_MARGIN;
            let fault_y = y + rng.random::<f32>() * FAULT_SPREAD;
            let angle = (rng.random::<f32>() - 0.5) * 0.3;
            let fault = Fault::new(
                Vec2::new(x, fault_y),
                rng.random_range(20.0..35.0),
                rng.random_range(100.0..250.0),
                angle,
            );
            hazards.push(Hazard {
                id: ids.next(),
                kind: HazardKind::Fault(fault),
            });
        }
    }

    // Water pockets: whole column
    for y in bands(0.0, world.total_height, WATER_BAND) {
        for _ in 0..3 {
            let pos = Vec2::new(
                rng.random::<f32>() * width,
                y + rng.random::<f32>() * WATER_SPREAD,
            );
            let pocket = WaterPocket::new(
                pos,
                rng.random_range(8.0..20.0),
                config.pockets.water_content,
            );
            hazards.push(Hazard {
                id: ids.next(),
                kind: HazardKind::WaterPocket(pocket),
            });
        }
    }

    // Gas pockets: from the crust down
    for y in bands(world.crust_start, world.total_height, GAS_BAND) {
        for _ in 0..2 {
            let pos = Vec2::new(
                rng.random::<f32>() * width,
                y + rng.random::<f32>() * GAS_SPREAD,
            );
            let pocket = GasPocket::new(
                pos,
                rng.random_range(6.0..16.0),
                config.pockets.gas_content,
                rng.random_range(0.2..0.7),
            );
            hazards.push(Hazard {
                id: ids.next(),
                kind: HazardKind::GasPocket(pocket),
            });
        }
    }

    log::debug!("Generated level with {} hazards", hazards.len());
    hazards
}
