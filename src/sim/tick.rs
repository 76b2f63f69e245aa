//! Fixed timestep simulation tick
//!
//! Core game loop that advances simulation deterministically.

use glam::Vec2;
use rand::Rng;

use super::collision::car_hits_obstacle;
use super::state::{GameEvent, GamePhase, GameState};
use crate::consts::*;

/// Input commands for a single tick (deterministic)
#[derive(Debug, Clone, Copy, Default)]
pub struct TickInput {
    /// Held direction flags
    pub left: bool,
    pub right: bool,
    pub up: bool,
    pub down: bool,
    /// Restart the run (one-shot, only honored after game-over)
    pub restart: bool,
}

/// Advance the game state by one fixed timestep
pub fn tick(state: &mut GameState, input: &TickInput, dt: f32) {
    // Game-over freezes everything: no movement, no spawning, no scoring,
    // no collision checks, and the clock itself stops.
    if state.phase == GamePhase::GameOver {
        if input.restart {
            state.restart();
        }
        return;
    }

    state.clock_ms += f64::from(dt) * 1000.0;

    // Cosmetic road scroll, delta-scaled for frame-rate independence
    state.scroll_offset -= SCROLL_SPEED * dt;

    // Held keys set velocity outright; releasing them stops the car
    state.car.vel.x = if input.left {
        -CAR_SPEED
    } else if input.right {
        CAR_SPEED
    } else {
        0.0
    };
    state.car.vel.y = if input.up {
        -CAR_SPEED
    } else if input.down {
        CAR_SPEED
    } else {
        0.0
    };
    state.car.pos += state.car.vel * dt;
    state.car.clamp_to(state.config.playfield);

    // The spawn schedule advances even when the pool was full and the
    // spawn itself was skipped.
    if state.clock_ms > state.next_spawn_at_ms {
        spawn_obstacle(state);
        state.next_spawn_at_ms = state.clock_ms + state.difficulty.spawn_interval_ms;
    }

    // Advance obstacles; each one that clears the bottom edge scores
    let height = state.config.playfield.y;
    let mut dodged = 0u32;
    for obstacle in state.obstacles.iter_mut() {
        if !obstacle.active {
            continue;
        }
        obstacle.pos.y += obstacle.vel_y * dt;
        if obstacle.pos.y > height {
            obstacle.active = false;
            dodged += 1;
        }
    }
    state.score += dodged * SCORE_PER_OBSTACLE;

    // Difficulty ramp: at most one step per tick, however long the frame
    if state.clock_ms > state.last_difficulty_increase_at_ms + DIFFICULTY_PERIOD_MS {
        state.difficulty.step();
        state.last_difficulty_increase_at_ms = state.clock_ms;
    }

    // Several obstacles can overlap the car in the same tick; only the
    // first ends the run.
    if state
        .obstacles
        .iter()
        .any(|obstacle| car_hits_obstacle(&state.car, obstacle))
    {
        trigger_game_over(state);
    }
}

/// Draw a fresh obstacle and place it in the first free pool slot.
///
/// The random draws happen before the pool lookup, so the RNG stream
/// advances identically whether or not a slot was free.
fn spawn_obstacle(state: &mut GameState) {
    let playfield = state.config.playfield;
    let kind = state.rng.random_range(1..=OBSTACLE_KINDS);
    let w = state
        .rng
        .random_range(OBSTACLE_MIN_EXTENT..=OBSTACLE_MAX_EXTENT);
    let h = state
        .rng
        .random_range(OBSTACLE_MIN_EXTENT..=OBSTACLE_MAX_EXTENT);
    let max_left = (playfield.x - w).max(0.0);
    let left = state.rng.random_range(0.0..=max_left);
    let speed = state.difficulty.obstacle_speed;

    let Some(slot) = state.obstacles.acquire() else {
        return;
    };
    slot.kind = kind;
    slot.size = Vec2::new(w, h);
    // Center placement: fully inside horizontally, fully above the field
    slot.pos = Vec2::new(left + w / 2.0, -h / 2.0);
    slot.vel_y = speed;
    slot.active = true;
}

fn trigger_game_over(state: &mut GameState) {
    if state.phase == GamePhase::GameOver {
        return;
    }
    state.phase = GamePhase::GameOver;
    for obstacle in state.obstacles.iter_mut() {
        obstacle.vel_y = 0.0;
    }
    state.scroll_offset = 0.0;
    state.events.push(GameEvent::GameOver { score: state.score });
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::SimConfig;
    use proptest::prelude::*;

    fn new_state() -> GameState {
        GameState::new(12345, SimConfig::default())
    }

    /// Park an active obstacle directly on the car
    fn plant_collision(state: &mut GameState) {
        let car_pos = state.car.pos;
        let slot = state.obstacles.acquire().expect("free slot");
        slot.kind = 2;
        slot.pos = car_pos;
        slot.size = Vec2::new(80.0, 80.0);
        slot.vel_y = 0.0;
        slot.active = true;
    }

    #[test]
    fn test_first_tick_spawns_and_reschedules() {
        let mut state = new_state();
        tick(&mut state, &TickInput::default(), SIM_DT);

        assert_eq!(state.obstacles.active_count(), 1);
        let spawned = state.obstacles.iter().find(|o| o.active).unwrap();
        assert!((1..=OBSTACLE_KINDS).contains(&spawned.kind));
        assert!(spawned.size.x >= OBSTACLE_MIN_EXTENT && spawned.size.x <= OBSTACLE_MAX_EXTENT);
        assert!(spawned.size.y >= OBSTACLE_MIN_EXTENT && spawned.size.y <= OBSTACLE_MAX_EXTENT);
        // Fully above the field, fully inside horizontally
        assert_eq!(spawned.pos.y, -spawned.size.y / 2.0);
        assert!(spawned.pos.x - spawned.size.x / 2.0 >= 0.0);
        assert!(spawned.pos.x + spawned.size.x / 2.0 <= state.config.playfield.x);
        assert_eq!(spawned.vel_y, OBSTACLE_START_SPEED);

        let expected = state.clock_ms + state.difficulty.spawn_interval_ms;
        assert!((state.next_spawn_at_ms - expected).abs() < 1e-6);
    }

    #[test]
    fn test_full_pool_skips_spawn_but_still_reschedules() {
        let mut state = new_state();
        while let Some(slot) = state.obstacles.acquire() {
            slot.active = true;
            slot.pos = Vec2::new(10.0, 10.0);
            slot.size = Vec2::new(1.0, 1.0);
        }
        assert_eq!(state.obstacles.active_count(), MAX_OBSTACLES);

        tick(&mut state, &TickInput::default(), SIM_DT);
        assert_eq!(state.obstacles.active_count(), MAX_OBSTACLES);
        assert!(state.next_spawn_at_ms > state.clock_ms);
    }

    #[test]
    fn test_dodged_obstacle_scores_exactly_ten() {
        let mut state = new_state();
        let height = state.config.playfield.y;
        {
            let slot = state.obstacles.acquire().unwrap();
            slot.active = true;
            slot.size = Vec2::new(60.0, 60.0);
            slot.pos = Vec2::new(30.0, height - 0.5);
            slot.vel_y = 1000.0;
        }

        tick(&mut state, &TickInput::default(), SIM_DT);
        assert_eq!(state.score, SCORE_PER_OBSTACLE);
        // The slot is recycled, not removed
        assert!(state.obstacles.capacity() == MAX_OBSTACLES);
    }

    #[test]
    fn test_difficulty_ramp_fires_once_per_tick() {
        let mut state = new_state();
        // Pretend several ramp periods elapsed without a tick
        state.last_difficulty_increase_at_ms = -3.0 * DIFFICULTY_PERIOD_MS;

        tick(&mut state, &TickInput::default(), SIM_DT);
        assert_eq!(
            state.difficulty.obstacle_speed,
            OBSTACLE_START_SPEED + DIFFICULTY_SPEED_STEP
        );
        assert_eq!(
            state.difficulty.spawn_interval_ms,
            SPAWN_START_INTERVAL_MS - DIFFICULTY_INTERVAL_STEP_MS
        );
        assert_eq!(state.last_difficulty_increase_at_ms, state.clock_ms);
    }

    #[test]
    fn test_spawn_interval_floors_at_500ms() {
        let mut state = new_state();
        for _ in 0..40 {
            state.difficulty.step();
        }
        assert_eq!(state.difficulty.spawn_interval_ms, SPAWN_INTERVAL_FLOOR_MS);
        assert_eq!(
            state.difficulty.obstacle_speed,
            OBSTACLE_START_SPEED + 40.0 * DIFFICULTY_SPEED_STEP
        );
    }

    #[test]
    fn test_collision_ends_the_run_exactly_once() {
        let mut state = new_state();
        plant_collision(&mut state);

        tick(&mut state, &TickInput::default(), SIM_DT);
        assert_eq!(state.phase, GamePhase::GameOver);
        assert_eq!(state.events, vec![GameEvent::GameOver { score: 0 }]);
        assert!(state.obstacles.iter().all(|o| o.vel_y == 0.0));
        assert_eq!(state.scroll_offset, 0.0);

        // Still overlapping on the next tick - nothing re-fires
        state.drain_events();
        let clock = state.clock_ms;
        tick(&mut state, &TickInput::default(), SIM_DT);
        assert_eq!(state.phase, GamePhase::GameOver);
        assert!(state.events.is_empty());
        assert_eq!(state.clock_ms, clock);
    }

    #[test]
    fn test_game_over_ignores_movement_input() {
        let mut state = new_state();
        plant_collision(&mut state);
        tick(&mut state, &TickInput::default(), SIM_DT);

        let pos = state.car.pos;
        let input = TickInput {
            left: true,
            up: true,
            ..Default::default()
        };
        tick(&mut state, &input, SIM_DT);
        assert_eq!(state.car.pos, pos);
        assert_eq!(state.score, 0);
    }

    #[test]
    fn test_restart_transitions_back_to_playing() {
        let mut state = new_state();
        plant_collision(&mut state);
        tick(&mut state, &TickInput::default(), SIM_DT);
        assert_eq!(state.phase, GamePhase::GameOver);

        let input = TickInput {
            restart: true,
            ..Default::default()
        };
        tick(&mut state, &input, SIM_DT);
        assert_eq!(state.phase, GamePhase::Playing);
        assert_eq!(state.score, 0);
        assert_eq!(state.obstacles.active_count(), 0);
    }

    #[test]
    fn test_input_sets_velocity_without_inertia() {
        let mut state = new_state();

        let input = TickInput {
            left: true,
            down: true,
            ..Default::default()
        };
        tick(&mut state, &input, SIM_DT);
        assert_eq!(state.car.vel, Vec2::new(-CAR_SPEED, CAR_SPEED));

        tick(&mut state, &TickInput::default(), SIM_DT);
        assert_eq!(state.car.vel, Vec2::ZERO);

        let input = TickInput {
            right: true,
            up: true,
            ..Default::default()
        };
        tick(&mut state, &input, SIM_DT);
        assert_eq!(state.car.vel, Vec2::new(CAR_SPEED, -CAR_SPEED));
    }

    #[test]
    fn test_determinism() {
        // Two states with the same seed and inputs stay in lockstep
        let mut state1 = GameState::new(99999, SimConfig::default());
        let mut state2 = GameState::new(99999, SimConfig::default());

        let inputs = [
            TickInput {
                left: true,
                ..Default::default()
            },
            TickInput {
                up: true,
                ..Default::default()
            },
            TickInput::default(),
            TickInput {
                right: true,
                down: true,
                ..Default::default()
            },
        ];

        for _ in 0..600 {
            for input in &inputs {
                tick(&mut state1, input, SIM_DT);
                tick(&mut state2, input, SIM_DT);
            }
        }

        assert_eq!(state1.score, state2.score);
        assert_eq!(state1.car.pos, state2.car.pos);
        assert_eq!(state1.obstacles.active_count(), state2.obstacles.active_count());
        assert_eq!(state1.next_spawn_at_ms, state2.next_spawn_at_ms);
    }

    proptest! {
        #[test]
        fn prop_core_invariants_hold(
            seed in any::<u64>(),
            moves in proptest::collection::vec(any::<(bool, bool, bool, bool)>(), 1..500),
        ) {
            let mut state = GameState::new(seed, SimConfig::default());
            let mut prev_score = 0u32;
            let mut prev_speed = state.difficulty.obstacle_speed;
            let mut prev_interval = state.difficulty.spawn_interval_ms;
            let mut was_over = false;

            for (left, right, up, down) in moves {
                let input = TickInput { left, right, up, down, restart: false };
                tick(&mut state, &input, SIM_DT);

                // Score only climbs, in steps of exactly 10
                prop_assert!(state.score >= prev_score);
                prop_assert_eq!((state.score - prev_score) % SCORE_PER_OBSTACLE, 0);
                prev_score = state.score;

                // Pool capacity is hard
                prop_assert!(state.obstacles.active_count() <= MAX_OBSTACLES);

                // The ramp never moves the wrong way
                prop_assert!(state.difficulty.obstacle_speed >= prev_speed);
                prop_assert!(state.difficulty.spawn_interval_ms <= prev_interval);
                prop_assert!(state.difficulty.spawn_interval_ms >= SPAWN_INTERVAL_FLOOR_MS);
                prev_speed = state.difficulty.obstacle_speed;
                prev_interval = state.difficulty.spawn_interval_ms;

                // Game-over latches until an explicit restart
                if was_over {
                    prop_assert_eq!(state.phase, GamePhase::GameOver);
                }
                was_over = state.phase == GamePhase::GameOver;
            }
        }
    }
}
