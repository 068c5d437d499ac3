//! Hazards placed in the world column
//!
//! Each kind owns its geometry and state plus a contact test and the effect
//! it has on the magma. The tick resolves them one kind at a time.

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::collision::{Rect, circles_overlap};
use super::magma::MagmaBody;
use crate::config::{FaultConfig, RockConfig};

/// Maximum embers a single fault keeps alive
pub const MAX_EMBERS: usize = 48;

const WATER_PULSE_RATE: f32 = 0.1;
const GAS_PULSE_RATE: f32 = 0.15;
const GLOW_RISE: f32 = 0.08;
const GLOW_FALL: f32 = 0.03;
const EMBER_FADE: f32 = 0.9;
const EMBER_GRAVITY: f32 = 0.1;

/// Thermal spring: thins the magma with water
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WaterPocket {
    pub pos: Vec2,
    pub radius: f32,
    pub water_content: f32,
    pub pulse: f32,
    pub collected: bool,
}

impl WaterPocket {
    pub fn new(pos: Vec2, radius: f32, water_content: f32) -> Self {
        Self {
            pos,
            radius,
            water_content,
            pulse: 0.0,
            collected: false,
        }
    }

    pub fn update(&mut self, dt: f32) {
        self.pulse += WATER_PULSE_RATE * dt;
    }

    pub fn touches(&self, magma: &MagmaBody) -> bool {
        !self.collected && circles_overlap(self.pos, self.radius, magma.pos, magma.radius)
    }

    pub fn apply(&mut self, magma: &mut MagmaBody) {
        magma.composition.add_water(self.water_content);
        self.collected = true;
    }
}

/// Rising gas bubble: feeds buoyancy
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GasPocket {
    pub pos: Vec2,
    pub radius: f32,
    pub gas_content: f32,
    /// Upward drift in px/s
    pub float_speed: f32,
    pub pulse: f32,
    pub collected: bool,
    /// Drifted out of the top of the world
    pub escaped: bool,
}

impl GasPocket {
    pub fn new(pos: Vec2, radius: f32, gas_content: f32, float_speed: f32) -> Self {
        Self {
            pos,
            radius,
            gas_content,
            float_speed,
            pulse: 0.0,
            collected: false,
            escaped: false,
        }
    }

    /// Drift upward, marking the bubble escaped once it leaves the world
    pub fn update(&mut self, dt: f32, escape_margin: f32) {
        self.pos.y -= self.float_speed * dt;
        self.pulse += GAS_PULSE_RATE * dt;
        if self.pos.y <= -escape_margin {
            self.escaped = true;
        }
    }

    /// Collected or escaped; due for removal
    pub fn is_spent(&self) -> bool {
        self.collected || self.escaped
    }

    pub fn touches(&self, magma: &MagmaBody) -> bool {
        !self.collected && circles_overlap(self.pos, self.radius, magma.pos, magma.radius)
    }

    pub fn apply(&mut self, magma: &mut MagmaBody) {
        magma.composition.add_gas(self.gas_content);
        self.collected = true;
    }
}

/// Heat particle shed by an active fault
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Ember {
    pub pos: Vec2,
    pub vel: Vec2,
    pub life: f32,
    pub size: f32,
}

/// Volcanic fault: reheats, repressurises and flings the magma upward.
///
/// Inactive until touched, then active for `FaultConfig::active_secs` of
/// simulated time. Can fire again once it has cooled back to inactive.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Fault {
    pub rect: Rect,
    /// Render-only tilt
    pub angle: f32,
    pub active: bool,
    /// 0-1 glow intensity
    pub glow: f32,
    /// Seconds since the last activation
    pub active_elapsed: f32,
    #[serde(skip)]
    pub embers: Vec<Ember>,
}

impl Fault {
    pub fn new(top_center: Vec2, width: f32, height: f32, angle: f32) -> Self {
        Self {
            rect: Rect::from_top_center(top_center, width, height),
            angle,
            active: false,
            glow: 0.0,
            active_elapsed: 0.0,
            embers: Vec::new(),
        }
    }

    pub fn update<R: Rng>(&mut self, dt: f32, config: &FaultConfig, rng: &mut R) {
        if self.active {
            self.glow = (self.glow + GLOW_RISE * dt).min(1.0);
            self.active_elapsed += dt;
            if self.active_elapsed >= config.active_secs {
                self.active = false;
            }
        } else {
            self.glow = (self.glow - GLOW_FALL * dt).max(0.0);
        }

        if self.active && self.embers.len() < MAX_EMBERS && rng.random::<f32>() < config.ember_chance
        {
            let offset = Vec2::new(
                (rng.random::<f32>() - 0.5) * self.rect.size.x,
                rng.random::<f32>() * self.rect.size.y,
            );
            self.embers.push(Ember {
                pos: Vec2::new(self.rect.center().x, self.rect.min.y) + offset,
                vel: Vec2::new(
                    (rng.random::<f32>() - 0.5) * 3.0,
                    -rng.random::<f32>() * 4.0 - 1.0,
                ),
                life: 1.0,
                size: rng.random_range(2.0..6.0),
            });
        }

        for ember in &mut self.embers {
            ember.pos += ember.vel * dt;
            ember.vel.y += EMBER_GRAVITY * dt;
            ember.life -= EMBER_FADE * dt;
        }
        self.embers.retain(|e| e.life > 0.0);
    }

    pub fn touches(&self, magma: &MagmaBody) -> bool {
        self.rect.overlaps_circle_box(magma.pos, magma.radius, 0.0)
    }

    pub fn activate(&mut self) {
        self.active = true;
        self.active_elapsed = 0.0;
    }

    pub fn apply(&self, magma: &mut MagmaBody, config: &FaultConfig) {
        magma.composition.add_heat(config.temperature_boost);
        magma.composition.increase_pressure(config.pressure_boost);
        magma.vel.y -= config.upward_kick;
        magma.start_fault_boosts(config);
    }
}

/// Ordinary rock: drags and cools the magma while in contact
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Rock {
    pub rect: Rect,
}

impl Rock {
    pub fn new(rect: Rect) -> Self {
        Self { rect }
    }

    pub fn touches(&self, magma: &MagmaBody) -> bool {
        self.rect.overlaps_circle_box(magma.pos, magma.radius, 0.0)
    }

    pub fn apply(&self, magma: &mut MagmaBody, config: &RockConfig, dt: f32) {
        magma.vel *= 1.0 - config.resistance * dt;
        magma.composition.cool(config.cooling * dt);
    }
}

/// Result of one resistant-rock contact
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Impact {
    /// Magma speed just before it was stopped
    pub speed: f32,
    pub damage: f32,
    pub destroyed: bool,
}

/// Hard rock that stops the magma dead until pressure breaks it apart
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResistantRock {
    pub rect: Rect,
    pub integrity: f32,
    /// Accumulated structural damage; the rock breaks once it exceeds integrity
    pub damage: f32,
}

impl ResistantRock {
    pub fn new(rect: Rect, integrity: f32) -> Self {
        Self {
            rect,
            integrity,
            damage: 0.0,
        }
    }

    pub fn touches(&self, magma: &MagmaBody, config: &RockConfig) -> bool {
        self.rect
            .overlaps_circle_box(magma.pos, magma.radius, config.resistant_tolerance)
    }

    pub fn is_near(&self, magma: &MagmaBody, config: &RockConfig) -> bool {
        self.rect.distance_to(magma.pos) < magma.radius + config.resistant_near_margin
    }

    pub fn is_destroyed(&self) -> bool {
        self.damage > self.integrity
    }

    /// Stop the magma and take damage from the hit
    pub fn apply(&mut self, magma: &mut MagmaBody, config: &RockConfig) -> Impact {
        let speed = magma.speed();
        magma.vel = Vec2::ZERO;
        magma.blocked = true;

        let damage = speed * magma.composition.pressure * config.resistant_damage_factor;
        self.damage += damage;

        Impact {
            speed,
            damage,
            destroyed: self.is_destroyed(),
        }
    }

    /// Remaining strength as a 0-1 fraction
    pub fn health(&self) -> f32 {
        if self.integrity <= 0.0 {
            return 0.0;
        }
        (1.0 - self.damage / self.integrity).clamp(0.0, 1.0)
    }
}

/// Hazard payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum HazardKind {
    WaterPocket(WaterPocket),
    GasPocket(GasPocket),
    Fault(Fault),
    Rock(Rock),
    ResistantRock(ResistantRock),
}

/// A hazard entity
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Hazard {
    pub id: u32,
    pub kind: HazardKind,
}

impl Hazard {
    /// Representative point for rendering and spatial sorting
    pub fn anchor(&self) -> Vec2 {
        match &self.kind {
            HazardKind::WaterPocket(p) => p.pos,
            HazardKind::GasPocket(p) => p.pos,
            HazardKind::Fault(f) => f.rect.center(),
            HazardKind::Rock(r) => r.rect.center(),
            HazardKind::ResistantRock(r) => r.rect.center(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::GameConfig;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    fn magma_at(x: f32, y: f32) -> MagmaBody {
        MagmaBody::at(Vec2::new(x, y), &GameConfig::default())
    }

    #[test]
    fn test_gas_pocket_clamps_magma_gas() {
        let mut magma = magma_at(100.0, 100.0);
        let mut pocket = GasPocket::new(Vec2::new(105.0, 100.0), 8.0, 0.3, 0.5);
        assert!(pocket.touches(&magma));
        pocket.apply(&mut magma);
        assert_eq!(magma.composition.gas, 0.25);
        assert!(pocket.collected);
        // Collected pockets never fire again
        assert!(!pocket.touches(&magma));
    }

    #[test]
    fn test_water_pocket_adds_water() {
        let mut magma = magma_at(100.0, 100.0);
        let mut pocket = WaterPocket::new(Vec2::new(100.0, 110.0), 10.0, 0.05);
        assert!(pocket.touches(&magma));
        pocket.apply(&mut magma);
        assert!((magma.composition.water - 0.07).abs() < 1e-6);
    }

    #[test]
    fn test_gas_pocket_floats_away() {
        let mut pocket = GasPocket::new(Vec2::new(0.0, -99.0), 8.0, 0.3, 1.0);
        pocket.update(1.0, 100.0);
        assert!(pocket.escaped);
        assert!(pocket.is_spent());
        let mut deep = GasPocket::new(Vec2::new(0.0, 500.0), 8.0, 0.3, 1.0);
        deep.update(1.0, 100.0);
        assert!(!deep.is_spent());
        assert_eq!(deep.pos.y, 499.0);
    }

    #[test]
    fn test_fault_state_machine() {
        let config = FaultConfig::default();
        let mut rng = Pcg32::seed_from_u64(7);
        let mut fault = Fault::new(Vec2::new(100.0, 100.0), 30.0, 120.0, 0.0);
        assert!(!fault.active);

        fault.activate();
        let dt = 0.1;
        for _ in 0..29 {
            fault.update(dt, &config, &mut rng);
            assert!(fault.active);
        }
        assert!(fault.glow > 0.0);
        fault.update(dt, &config, &mut rng);
        fault.update(dt, &config, &mut rng);
        assert!(!fault.active);

        // Re-triggerable
        fault.activate();
        assert!(fault.active);
        assert_eq!(fault.active_elapsed, 0.0);
    }

    #[test]
    fn test_fault_effect() {
        let config = FaultConfig::default();
        let fault = Fault::new(Vec2::new(100.0, 100.0), 30.0, 120.0, 0.0);
        let mut magma = magma_at(100.0, 150.0);
        assert!(fault.touches(&magma));

        fault.apply(&mut magma, &config);
        assert_eq!(magma.composition.temperature, 1300.0);
        assert_eq!(magma.composition.pressure, 2.0);
        assert_eq!(magma.vel.y, -15.0);
        assert!(magma.boosts.speed_boost_active());
        assert!(magma.boosts.shape_transform_active());
    }

    #[test]
    fn test_fault_contact_extents() {
        let fault = Fault::new(Vec2::new(100.0, 100.0), 20.0, 100.0, 0.0);
        // Just above the top edge, within radius
        assert!(fault.touches(&magma_at(100.0, 91.0)));
        assert!(!fault.touches(&magma_at(100.0, 90.0)));
        // Beside the fault
        assert!(!fault.touches(&magma_at(121.0, 150.0)));
    }

    #[test]
    fn test_rock_drags_and_cools() {
        let config = RockConfig::default();
        let rock = Rock::new(Rect::new(90.0, 90.0, 40.0, 30.0));
        let mut magma = magma_at(100.0, 100.0);
        magma.vel = Vec2::new(10.0, -20.0);
        assert!(rock.touches(&magma));
        rock.apply(&mut magma, &config, 1.0);
        assert!((magma.vel.x - 7.0).abs() < 1e-5);
        assert!((magma.vel.y + 14.0).abs() < 1e-5);
        assert_eq!(magma.composition.temperature, 990.0);
    }

    #[test]
    fn test_resistant_rock_zeroes_velocity() {
        let config = RockConfig::default();
        let mut rock = ResistantRock::new(Rect::new(90.0, 80.0, 60.0, 30.0), 1.0);
        for vel in [Vec2::new(0.0, -80.0), Vec2::new(300.0, 5.0), Vec2::ZERO] {
            let mut magma = magma_at(100.0, 100.0);
            magma.vel = vel;
            let impact = rock.apply(&mut magma, &config);
            assert_eq!(magma.vel, Vec2::ZERO);
            assert!(magma.blocked);
            assert_eq!(impact.speed, vel.length());
        }
    }

    #[test]
    fn test_resistant_rock_breaks_after_enough_damage() {
        let config = RockConfig::default();
        let mut rock = ResistantRock::new(Rect::new(90.0, 80.0, 60.0, 30.0), 1.0);
        let mut magma = magma_at(100.0, 100.0);
        magma.composition.increase_pressure(1.0); // pressure 2.0

        // 20 px/s * 2.0 * 0.01 = 0.4 damage per hit
        let mut hits = 0;
        loop {
            magma.vel = Vec2::new(0.0, -20.0);
            hits += 1;
            if rock.apply(&mut magma, &config).destroyed {
                break;
            }
        }
        assert_eq!(hits, 3);
        assert_eq!(rock.health(), 0.0);
    }

    #[test]
    fn test_resistant_rock_repeated_contact_is_idempotent() {
        let config = RockConfig::default();
        let mut rock = ResistantRock::new(Rect::new(90.0, 80.0, 60.0, 30.0), 1.0);
        let mut magma = magma_at(100.0, 100.0);
        rock.apply(&mut magma, &config);
        let damage = rock.damage;
        rock.apply(&mut magma, &config);
        assert_eq!(rock.damage, damage);
        assert_eq!(magma.vel, Vec2::ZERO);
        assert!(magma.blocked);
    }

    #[test]
    fn test_resistant_rock_proximity() {
        let config = RockConfig::default();
        let rock = ResistantRock::new(Rect::new(100.0, 100.0, 50.0, 20.0), 1.0);
        assert!(rock.is_near(&magma_at(125.0, 70.0), &config));
        assert!(!rock.is_near(&magma_at(125.0, 50.0), &config));
        assert!(!rock.touches(&magma_at(125.0, 70.0), &config));
    }
}
