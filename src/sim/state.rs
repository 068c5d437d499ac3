//! Game state and core simulation types
//!
//! Everything the tick mutates lives here: the phase machine, the magma,
//! the hazard set, the volcano and the camera.

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::hazard::Hazard;
use super::level::generate_level;
use super::magma::MagmaBody;
use crate::config::GameConfig;

/// Why a run was lost
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DefeatReason {
    /// Sank below the bottom of the world
    Fell,
    /// Cooled or decompressed until it could no longer flow
    Solidified,
}

/// How a run ended
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Outcome {
    Victory,
    Defeat(DefeatReason),
}

/// Current phase of the game
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Title menu
    Menu,
    /// How-to-play screen
    Instructions,
    /// Active gameplay
    Playing,
    /// Game is paused
    Paused,
    /// Run ended
    GameOver(Outcome),
    /// Viewing high scores
    Leaderboard,
}

/// Stage of the victory eruption animation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EruptionPhase {
    Initial,
    Main,
    Explosive,
    Declining,
}

/// The volcano at the top of the world and its crater
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Volcano {
    /// Centre of the cone base
    pub base: Vec2,
    pub width: f32,
    pub height: f32,
    pub crater: Vec2,
    pub crater_radius: f32,
    pub erupting: bool,
    /// Seconds since the eruption began
    pub eruption_time: f32,
    pub intensity: f32,
    pub phase: EruptionPhase,
}

impl Volcano {
    pub fn new(config: &GameConfig) -> Self {
        let v = &config.volcano;
        let base = Vec2::new(config.canvas.width / 2.0, v.base_y);
        Self {
            base,
            width: v.width,
            height: v.height,
            crater: Vec2::new(base.x, base.y - v.height + 20.0),
            crater_radius: v.crater_radius,
            erupting: false,
            eruption_time: 0.0,
            intensity: 0.0,
            phase: EruptionPhase::Initial,
        }
    }

    /// Magma overlaps the crater (strictly)
    pub fn reached(&self, magma: &MagmaBody) -> bool {
        magma.pos.distance(self.crater) < self.crater_radius + magma.radius
    }

    pub fn start_eruption(&mut self) {
        self.erupting = true;
        self.eruption_time = 0.0;
        self.intensity = 0.0;
        self.phase = EruptionPhase::Initial;
    }

    /// Advance the eruption animation
    pub fn update_eruption(&mut self, dt: f32, duration: f32) {
        if !self.erupting {
            return;
        }
        self.eruption_time += dt;

        let progress = self.eruption_time / duration.max(f32::EPSILON);
        (self.phase, self.intensity) = if progress < 0.1 {
            (EruptionPhase::Initial, progress * 10.0)
        } else if progress < 0.3 {
            (EruptionPhase::Main, 1.0)
        } else if progress < 0.6 {
            (EruptionPhase::Explosive, 1.5)
        } else {
            (
                EruptionPhase::Declining,
                (1.5 * (1.0 - (progress - 0.6) / 0.4)).max(0.0),
            )
        };

        if self.eruption_time > duration {
            self.erupting = false;
        }
    }
}

/// Vertical-scrolling camera that trails the magma
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct Camera {
    /// Top-left corner of the view in world space
    pub pos: Vec2,
}

impl Camera {
    /// Ease toward the target framing. Smoothing is per frame.
    pub fn follow(&mut self, target: Vec2, config: &GameConfig) {
        let goal = Vec2::new(
            target.x - config.canvas.width / 2.0,
            target.y - config.canvas.height / 2.0 + config.camera.offset_y,
        );
        self.pos += (goal - self.pos) * config.camera.smoothing;

        // No horizontal scrolling
        self.pos.x = 0.0;
        let max_y = (config.world.total_height - config.canvas.height).max(0.0);
        self.pos.y = self.pos.y.clamp(0.0, max_y);
    }
}

/// An end-of-run transition waiting on simulated time
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PendingEnd {
    pub outcome: Outcome,
    /// Seconds of play left before the run ends
    pub remaining: f32,
}

/// Result of a finished run
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RunSummary {
    pub outcome: Outcome,
    pub score: i64,
    /// Height above the world bottom when the run ended
    pub altitude: f32,
    /// Seconds of play
    pub elapsed: f32,
}

impl RunSummary {
    pub fn new(outcome: Outcome, altitude: f32, elapsed: f32) -> Self {
        Self {
            outcome,
            score: score_run(outcome, altitude, elapsed),
            altitude,
            elapsed,
        }
    }
}

/// Final score for a run. Falling below the world bottom can go negative.
pub fn score_run(outcome: Outcome, altitude: f32, elapsed: f32) -> i64 {
    let secs = elapsed.max(1.0);
    let raw = match outcome {
        Outcome::Victory => 20000.0 + 10000.0 / secs + altitude * 3.0,
        Outcome::Defeat(_) => altitude + 3000.0 / secs,
    };
    if raw.is_finite() {
        raw.round() as i64
    } else {
        0
    }
}

/// Something noteworthy that happened during a tick (for feedback/effects)
#[derive(Debug, Clone, PartialEq)]
pub enum GameEvent {
    WaterCollected { id: u32, pos: Vec2 },
    GasCollected { id: u32, pos: Vec2 },
    FaultActivated { id: u32, pos: Vec2 },
    RockScraped { id: u32 },
    ResistantRockHit { id: u32, damage: f32 },
    ResistantRockDestroyed { id: u32, pos: Vec2 },
    EruptionStarted,
    SolidificationStarted,
    RunEnded(RunSummary),
}

/// Complete game state
#[derive(Debug, Clone)]
pub struct GameState {
    /// Seed the RNG was created from
    pub seed: u64,
    pub rng: Pcg32,
    pub phase: GamePhase,
    pub magma: MagmaBody,
    /// Active hazards (sorted by id)
    pub hazards: Vec<Hazard>,
    pub volcano: Volcano,
    pub camera: Camera,
    /// Seconds of play in the current run
    pub elapsed: f32,
    pub pending_end: Option<PendingEnd>,
    /// Result of the most recent finished run
    pub last_summary: Option<RunSummary>,
    /// Events raised by the most recent tick
    pub events: Vec<GameEvent>,
}

impl GameState {
    /// Create a new game state in the menu, with a level ready behind it
    pub fn new(seed: u64, config: &GameConfig) -> Self {
        let mut rng = Pcg32::seed_from_u64(seed);
        let hazards = generate_level(&mut rng, config);
        let magma = MagmaBody::spawn(config);
        let mut camera = Camera::default();
        camera.follow(magma.pos, config);

        Self {
            seed,
            rng,
            phase: GamePhase::Menu,
            magma,
            hazards,
            volcano: Volcano::new(config),
            camera,
            elapsed: 0.0,
            pending_end: None,
            last_summary: None,
            events: Vec::new(),
        }
    }

    /// Begin a fresh run (from the menu, the pause screen or game over)
    pub fn start_run(&mut self, config: &GameConfig) -> bool {
        match self.phase {
            GamePhase::Menu | GamePhase::Paused | GamePhase::GameOver(_) => {}
            other => {
                log::debug!("Ignoring start_run from {:?}", other);
                return false;
            }
        }

        self.reset_run(config);
        self.phase = GamePhase::Playing;
        log::info!(
            "Run started ({} hazards, seed {})",
            self.hazards.len(),
            self.seed
        );
        true
    }

    pub fn pause(&mut self) -> bool {
        self.transition(GamePhase::Playing, GamePhase::Paused)
    }

    pub fn resume(&mut self) -> bool {
        self.transition(GamePhase::Paused, GamePhase::Playing)
    }

    pub fn show_instructions(&mut self) -> bool {
        self.transition(GamePhase::Menu, GamePhase::Instructions)
    }

    pub fn show_leaderboard(&mut self) -> bool {
        match self.phase {
            GamePhase::Menu | GamePhase::GameOver(_) => {
                self.phase = GamePhase::Leaderboard;
                true
            }
            other => {
                log::debug!("Ignoring show_leaderboard from {:?}", other);
                false
            }
        }
    }

    pub fn back_to_menu(&mut self) -> bool {
        match self.phase {
            GamePhase::Instructions
            | GamePhase::Paused
            | GamePhase::GameOver(_)
            | GamePhase::Leaderboard => {
                // Leaving a paused run abandons it
                self.pending_end = None;
                self.phase = GamePhase::Menu;
                true
            }
            other => {
                log::debug!("Ignoring back_to_menu from {:?}", other);
                false
            }
        }
    }

    fn transition(&mut self, from: GamePhase, to: GamePhase) -> bool {
        if self.phase == from {
            self.phase = to;
            true
        } else {
            log::debug!("Ignoring {:?} -> {:?} from {:?}", from, to, self.phase);
            false
        }
    }

    /// Fresh magma, level, volcano and timers. The RNG stream continues.
    fn reset_run(&mut self, config: &GameConfig) {
        self.magma = MagmaBody::spawn(config);
        self.hazards = generate_level(&mut self.rng, config);
        self.volcano = Volcano::new(config);
        self.camera = Camera::default();
        self.camera.follow(self.magma.pos, config);
        self.elapsed = 0.0;
        self.pending_end = None;
        self.events.clear();
    }

    /// Schedule the end of the run unless one is already pending
    pub fn schedule_end(&mut self, outcome: Outcome, delay: f32) {
        if self.pending_end.is_none() {
            self.pending_end = Some(PendingEnd {
                outcome,
                remaining: delay,
            });
        }
    }

    /// End the run now and record its summary
    pub fn finish_run(&mut self, outcome: Outcome, config: &GameConfig) -> RunSummary {
        let summary = RunSummary::new(outcome, self.magma.altitude(config), self.elapsed);
        self.pending_end = None;
        self.phase = GamePhase::GameOver(outcome);
        self.last_summary = Some(summary);
        self.events.push(GameEvent::RunEnded(summary));
        log::info!(
            "Run ended: {:?}, score {}, altitude {:.0}, {:.1}s",
            outcome,
            summary.score,
            summary.altitude,
            summary.elapsed
        );
        summary
    }
}
