//! Simulation tick
//!
//! Advances one frame of gameplay with an explicit timestep. Given the same
//! seed, inputs and timesteps the outcome is identical.

use super::hazard::HazardKind;
use super::magma::ControlIntent;
use super::state::{DefeatReason, GameEvent, GamePhase, GameState, Outcome, PendingEnd};
use crate::config::GameConfig;

/// Horizontal dead zone for the autopilot
const AUTOPILOT_DEAD_ZONE: f32 = 12.0;
/// How far above the magma the autopilot looks for resistant rock
const AUTOPILOT_LOOKAHEAD: f32 = 120.0;

/// Input commands for a single tick
#[derive(Debug, Clone, Copy, Default)]
pub struct TickInput {
    pub left: bool,
    pub right: bool,
    /// Upward impulse (subject to cooldown)
    pub boost: bool,
    /// Pause toggle
    pub pause: bool,
    /// Demo mode - steer toward the crater automatically
    pub autopilot: bool,
}

impl TickInput {
    fn intent(&self) -> ControlIntent {
        ControlIntent {
            left: self.left,
            right: self.right,
            boost: self.boost,
        }
    }
}

/// Advance the game state by one frame of `dt` seconds
pub fn tick(state: &mut GameState, input: &TickInput, config: &GameConfig, dt: f32) {
    state.events.clear();

    // Handle pause toggle
    if input.pause {
        match state.phase {
            GamePhase::Playing => {
                state.pause();
                return;
            }
            GamePhase::Paused => {
                state.resume();
            }
            _ => {}
        }
    }

    if state.phase != GamePhase::Playing {
        return;
    }
    if !dt.is_finite() || dt < 0.0 {
        log::warn!("Skipping tick with invalid dt {}", dt);
        return;
    }

    state.elapsed += dt;

    let mut input = *input;
    if input.autopilot {
        steer(state, &mut input);
    }

    // The magma freezes in the crater once the eruption starts
    let erupting = matches!(
        state.pending_end,
        Some(PendingEnd {
            outcome: Outcome::Victory,
            ..
        })
    );

    if !erupting {
        state.magma.update(&input.intent(), config, dt);
    }
    state.camera.follow(state.magma.pos, config);

    if !erupting {
        if state.volcano.reached(&state.magma) {
            state.volcano.start_eruption();
            // Replaces a pending solidification: reaching the crater wins
            state.pending_end = Some(PendingEnd {
                outcome: Outcome::Victory,
                remaining: config.volcano.eruption_secs,
            });
            state.events.push(GameEvent::EruptionStarted);
            log::info!("Magma reached the crater after {:.1}s", state.elapsed);
        } else if state.magma.pos.y > config.world.total_height + config.world.fall_margin {
            state.finish_run(Outcome::Defeat(DefeatReason::Fell), config);
            return;
        } else if state.pending_end.is_none() && state.magma.is_solidifying() {
            state.schedule_end(
                Outcome::Defeat(DefeatReason::Solidified),
                config.magma.solidify_grace_secs,
            );
            state.events.push(GameEvent::SolidificationStarted);
            log::info!(
                "Magma solidifying at altitude {:.0}",
                state.magma.altitude(config)
            );
        }
    }

    state
        .volcano
        .update_eruption(dt, config.volcano.eruption_secs);

    if !erupting {
        resolve_pockets(state, config, dt);
        resolve_faults(state, config, dt);
        resolve_rocks(state, config, dt);
        resolve_resistant_rocks(state, config);
    }

    if let Some(pending) = state.pending_end.as_mut() {
        pending.remaining -= dt;
        if pending.remaining <= 0.0 {
            let outcome = pending.outcome;
            state.finish_run(outcome, config);
        }
    }
}

/// Water and gas pockets: drift, absorb on contact, drop the spent ones
fn resolve_pockets(state: &mut GameState, config: &GameConfig, dt: f32) {
    let GameState {
        hazards,
        magma,
        events,
        ..
    } = state;
    let margin = config.pockets.gas_escape_margin;

    for hazard in hazards.iter_mut() {
        match &mut hazard.kind {
            HazardKind::WaterPocket(pocket) => {
                pocket.update(dt);
                if pocket.touches(magma) {
                    pocket.apply(magma);
                    events.push(GameEvent::WaterCollected {
                        id: hazard.id,
                        pos: pocket.pos,
                    });
                }
            }
            HazardKind::GasPocket(pocket) => {
                pocket.update(dt, margin);
                if pocket.touches(magma) {
                    pocket.apply(magma);
                    events.push(GameEvent::GasCollected {
                        id: hazard.id,
                        pos: pocket.pos,
                    });
                }
            }
            _ => {}
        }
    }

    // Remove after the pass so removals never skip a neighbour
    hazards.retain(|h| match &h.kind {
        HazardKind::WaterPocket(p) => !p.collected,
        HazardKind::GasPocket(p) => !p.is_spent(),
        _ => true,
    });
}

/// Faults fire once per activation and then cool down
fn resolve_faults(state: &mut GameState, config: &GameConfig, dt: f32) {
    let GameState {
        hazards,
        magma,
        events,
        rng,
        ..
    } = state;

    for hazard in hazards.iter_mut() {
        let HazardKind::Fault(fault) = &mut hazard.kind else {
            continue;
        };
        fault.update(dt, &config.faults, rng);
        if !fault.active && fault.touches(magma) {
            fault.activate();
            fault.apply(magma, &config.faults);
            events.push(GameEvent::FaultActivated {
                id: hazard.id,
                pos: fault.rect.center(),
            });
            log::debug!("Fault {} activated", hazard.id);
        }
    }
}

fn resolve_rocks(state: &mut GameState, config: &GameConfig, dt: f32) {
    let GameState {
        hazards,
        magma,
        events,
        ..
    } = state;

    for hazard in hazards.iter() {
        if let HazardKind::Rock(rock) = &hazard.kind
            && rock.touches(magma)
        {
            rock.apply(magma, &config.rocks, dt);
            events.push(GameEvent::RockScraped { id: hazard.id });
        }
    }
}

/// Resistant rocks stop the magma on every tick of contact
fn resolve_resistant_rocks(state: &mut GameState, config: &GameConfig) {
    let GameState {
        hazards,
        magma,
        events,
        ..
    } = state;

    magma.near_resistant = false;
    let mut blocked = false;

    for hazard in hazards.iter_mut() {
        let HazardKind::ResistantRock(rock) = &mut hazard.kind else {
            continue;
        };
        if rock.is_near(magma, &config.rocks) {
            magma.near_resistant = true;
        }
        if !rock.touches(magma, &config.rocks) {
            continue;
        }

        let impact = rock.apply(magma, &config.rocks);
        events.push(GameEvent::ResistantRockHit {
            id: hazard.id,
            damage: impact.damage,
        });
        if impact.destroyed {
            events.push(GameEvent::ResistantRockDestroyed {
                id: hazard.id,
                pos: rock.rect.center(),
            });
            log::debug!("Resistant rock {} broke apart", hazard.id);
        } else {
            blocked = true;
        }
    }

    // Only a surviving rock keeps the magma pinned
    magma.blocked = blocked;
    hazards.retain(|h| match &h.kind {
        HazardKind::ResistantRock(r) => !r.is_destroyed(),
        _ => true,
    });
}

/// Demo steering: head for the crater, sidestepping resistant rock overhead
fn steer(state: &GameState, input: &mut TickInput) {
    let magma = &state.magma;
    let mut target_x = state.volcano.crater.x;

    let overhead = state.hazards.iter().find_map(|h| match &h.kind {
        HazardKind::ResistantRock(rock)
            if rock.rect.max().y <= magma.pos.y
                && magma.pos.y - rock.rect.max().y < AUTOPILOT_LOOKAHEAD
                && magma.pos.x + magma.radius > rock.rect.min.x
                && magma.pos.x - magma.radius < rock.rect.max().x =>
        {
            Some(rock.rect)
        }
        _ => None,
    });
    if let Some(rect) = overhead {
        // Go around whichever side is closer
        let left_gap = magma.pos.x - rect.min.x;
        let right_gap = rect.max().x - magma.pos.x;
        target_x = if left_gap < right_gap {
            rect.min.x - magma.radius * 2.0
        } else {
            rect.max().x + magma.radius * 2.0
        };
    }

    let dx = target_x - magma.pos.x;
    input.left = dx < -AUTOPILOT_DEAD_ZONE;
    input.right = dx > AUTOPILOT_DEAD_ZONE;
    input.boost = true;
}
