//! The player-controlled magma body
//!
//! Integrates control input, buoyancy, the layer pressure gradient, viscous
//! damping and density contrast into velocity and position each tick.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::collision::clamp_speed;
use super::composition::{Composition, TemperatureBand};
use super::layers::{LayerKind, layer_kind_at};
use crate::config::{FaultConfig, GameConfig};

/// Maximum number of trail points to store
pub const TRAIL_LENGTH: usize = 20;

/// Per-tick velocity retention while the magma is solidifying
pub const SOLIDIFY_DECAY: f32 = 0.9;

const TRAIL_FADE: f32 = 0.05;
const TRAIL_COOLING: f32 = 2.0;

/// Largest squash a wall impact can produce
const MAX_SQUASH: f32 = 0.4;
/// Rate (per second) at which the deformation factor relaxes back to 1.0
const DEFORM_RECOVERY: f32 = 8.0;

/// Guards every denominator in the force model
const EPSILON: f32 = 1e-6;

/// Player intent for one tick
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ControlIntent {
    pub left: bool,
    pub right: bool,
    pub boost: bool,
}

/// Trail point for magma rendering
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct TrailPoint {
    pub pos: Vec2,
    /// 0-1, fades each tick
    pub life: f32,
    pub temperature: f32,
    pub viscosity: f32,
}

/// Timed modifiers granted by faults (seconds remaining, 0 = inactive)
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct BoostTimers {
    pub speed_boost: f32,
    pub shape_transform: f32,
}

impl BoostTimers {
    pub fn speed_boost_active(&self) -> bool {
        self.speed_boost > 0.0
    }

    pub fn shape_transform_active(&self) -> bool {
        self.shape_transform > 0.0
    }

    fn count_down(&mut self, dt: f32) {
        self.speed_boost = (self.speed_boost - dt).max(0.0);
        self.shape_transform = (self.shape_transform - dt).max(0.0);
    }
}

/// Visual squash left by a wall impact. No physical effect.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Deformation {
    /// Direction the wall pushed the magma
    pub normal: Vec2,
    /// Speed into the wall at impact
    pub impact: f32,
    /// 1.0 = round, smaller = squashed
    pub factor: f32,
}

impl Default for Deformation {
    fn default() -> Self {
        Self {
            normal: Vec2::ZERO,
            impact: 0.0,
            factor: 1.0,
        }
    }
}

/// The magma blob
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MagmaBody {
    pub pos: Vec2,
    pub vel: Vec2,
    pub radius: f32,
    pub density: f32,
    pub mass: f32,
    pub composition: Composition,
    pub boosts: BoostTimers,
    /// Seconds until the space boost can fire again
    pub boost_cooldown: f32,
    /// Pressed against a resistant rock (set by the collision pass)
    pub blocked: bool,
    /// Within reach of a resistant rock (set by the collision pass)
    pub near_resistant: bool,
    pub deformation: Deformation,
    /// Trail history for rendering (oldest first)
    #[serde(skip)]
    pub trail: Vec<TrailPoint>,
}

impl MagmaBody {
    /// Spawn at the bottom-centre of the world
    pub fn spawn(config: &GameConfig) -> Self {
        let pos = Vec2::new(
            config.canvas.width / 2.0,
            config.world.total_height - config.magma.spawn_offset,
        );
        Self::at(pos, config)
    }

    pub fn at(pos: Vec2, config: &GameConfig) -> Self {
        let radius = config.magma.radius;
        let density = config.magma.density;
        Self {
            pos,
            vel: Vec2::ZERO,
            radius,
            density,
            mass: std::f32::consts::PI * radius * radius * density,
            composition: Composition::new(&config.magma),
            boosts: BoostTimers::default(),
            boost_cooldown: 0.0,
            blocked: false,
            near_resistant: false,
            deformation: Deformation::default(),
            trail: Vec::with_capacity(TRAIL_LENGTH),
        }
    }

    pub fn speed(&self) -> f32 {
        self.vel.length()
    }

    /// Height above the world bottom
    pub fn altitude(&self, config: &GameConfig) -> f32 {
        config.world.total_height - self.pos.y
    }

    pub fn layer(&self, config: &GameConfig) -> LayerKind {
        layer_kind_at(self.pos.y, &config.world)
    }

    pub fn temperature_band(&self) -> TemperatureBand {
        self.composition.temperature_band()
    }

    pub fn is_solidifying(&self) -> bool {
        !self.composition.can_melt()
    }

    /// Composition-limited top speed, raised while a fault speed boost runs
    pub fn max_speed(&self, config: &GameConfig) -> f32 {
        let base = config.magma.max_speed / self.composition.viscosity().max(0.5);
        if self.boosts.speed_boost_active() {
            base * config.faults.speed_boost_multiplier
        } else {
            base
        }
    }

    /// Start the timed modifiers a fault grants
    pub fn start_fault_boosts(&mut self, faults: &FaultConfig) {
        self.boosts.speed_boost = faults.speed_boost_secs;
        self.boosts.shape_transform = faults.shape_transform_secs;
    }

    /// Advance the magma by one tick
    pub fn update(&mut self, intent: &ControlIntent, config: &GameConfig, dt: f32) {
        self.boosts.count_down(dt);
        self.boost_cooldown = (self.boost_cooldown - dt).max(0.0);

        let layer = *layer_kind_at(self.pos.y, &config.world).properties(&config.world);
        self.composition.update_from_environment(&layer, dt);

        if !self.composition.can_melt() {
            // Solidifying: coast to a halt, nothing else acts
            self.vel *= SOLIDIFY_DECAY;
            return;
        }

        let controls = &config.controls;
        let squeeze = if self.blocked {
            controls.blocked_multiplier
        } else if self.near_resistant {
            controls.near_multiplier
        } else {
            1.0
        };
        if intent.left {
            self.vel.x -= controls.horizontal_force * dt * squeeze;
        }
        if intent.right {
            self.vel.x += controls.horizontal_force * dt * squeeze;
        }

        if intent.boost && self.boost_cooldown <= 0.0 {
            self.vel.y -= controls.space_boost_force;
            self.boost_cooldown = controls.space_boost_cooldown_secs;
        }

        if !self.blocked {
            let magma = &config.magma;

            let buoyancy = self.composition.buoyancy();
            self.vel.y -= buoyancy * dt * magma.buoyancy_force_scale;

            let pressure_gradient = layer.pressure - magma.reference_pressure;
            self.vel.y -= pressure_gradient * dt;

            let viscosity = self.composition.viscosity() * layer.viscosity;
            self.vel.x *= (1.0 - viscosity * 0.01 * dt).max(0.98);
            self.vel.y *= (1.0 - viscosity * 0.005 * dt).max(0.99);

            let density_ratio = layer.density / self.density.max(EPSILON);
            self.vel.y += (density_ratio - 1.0) * magma.density_force_scale * dt;
        }

        self.vel = clamp_speed(self.vel, self.max_speed(config));

        let prev_pos = self.pos;
        self.pos += self.vel * dt;
        if !self.pos.is_finite() || !self.vel.is_finite() {
            log::warn!(
                "Non-finite magma state (pos={:?}, vel={:?}), restoring last position",
                self.pos,
                self.vel
            );
            self.pos = prev_pos;
            self.vel = Vec2::ZERO;
        }

        self.clamp_to_walls(config);
        self.record_trail();
        self.relax_deformation(dt);
    }

    /// Keep the magma inside the canvas width, recording a squash on impact
    fn clamp_to_walls(&mut self, config: &GameConfig) {
        let min_x = self.radius;
        let max_x = (config.canvas.width - self.radius).max(min_x);

        let normal = if self.pos.x < min_x {
            self.pos.x = min_x;
            Vec2::X
        } else if self.pos.x > max_x {
            self.pos.x = max_x;
            Vec2::NEG_X
        } else {
            return;
        };

        let impact = self.vel.x.abs();
        let squash = (impact / config.magma.max_speed.max(EPSILON)).min(MAX_SQUASH);
        self.deformation = Deformation {
            normal,
            impact,
            factor: 1.0 - squash,
        };
    }

    fn relax_deformation(&mut self, dt: f32) {
        let t = (DEFORM_RECOVERY * dt).min(1.0);
        self.deformation.factor += (1.0 - self.deformation.factor) * t;
        if (1.0 - self.deformation.factor).abs() < 1e-3 {
            self.deformation = Deformation::default();
        }
    }

    /// Record current position to trail
    fn record_trail(&mut self) {
        self.trail.push(TrailPoint {
            pos: self.pos,
            life: 1.0,
            temperature: self.composition.temperature,
            viscosity: self.composition.viscosity(),
        });
        if self.trail.len() > TRAIL_LENGTH {
            self.trail.remove(0);
        }
        for point in &mut self.trail {
            point.life -= TRAIL_FADE;
            point.temperature -= TRAIL_COOLING;
        }
        self.trail.retain(|p| p.life > 0.0);
    }
}
