//! Game state and core simulation types
//!
//! Everything the per-frame update mutates lives here, owned by a single
//! `GameState` value so the update function stays testable without a
//! rendering host.

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;

use super::collision::Aabb;
use crate::consts::*;

/// Current phase of gameplay
///
/// `Playing -> (collision) -> GameOver -> (explicit restart) -> Playing`.
/// There are no other transitions and no pause state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GamePhase {
    Playing,
    GameOver,
}

/// Immutable per-run configuration
#[derive(Debug, Clone, Copy)]
pub struct SimConfig {
    /// Playfield extents in px
    pub playfield: Vec2,
    /// Whether restart rolls the difficulty ramp back to its start values.
    /// Off by default: the game keeps getting harder across retries.
    pub reset_difficulty_on_restart: bool,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            playfield: Vec2::new(PLAYFIELD_WIDTH, PLAYFIELD_HEIGHT),
            reset_difficulty_on_restart: false,
        }
    }
}

/// The player's car
#[derive(Debug, Clone, Copy)]
pub struct Car {
    /// Center position, clamped to the playfield
    pub pos: Vec2,
    /// Set directly from input each tick, not integrated acceleration
    pub vel: Vec2,
    pub size: Vec2,
}

impl Car {
    pub fn centered(pos: Vec2) -> Self {
        Self {
            pos,
            vel: Vec2::ZERO,
            size: Vec2::new(CAR_WIDTH, CAR_HEIGHT),
        }
    }

    pub fn aabb(&self) -> Aabb {
        Aabb::from_center_size(self.pos, self.size)
    }

    /// Keep the whole car inside the playfield
    pub fn clamp_to(&mut self, playfield: Vec2) {
        let half = self.size * 0.5;
        self.pos = self.pos.clamp(half, playfield - half);
    }
}

/// One obstacle pool slot
#[derive(Debug, Clone, Copy)]
pub struct Obstacle {
    /// Sprite variant, 1..=3
    pub kind: u8,
    /// Center position
    pub pos: Vec2,
    pub size: Vec2,
    /// Fall speed, frozen to 0 on game-over
    pub vel_y: f32,
    /// Inactive slots are recycled, never removed
    pub active: bool,
}

impl Obstacle {
    fn idle() -> Self {
        Self {
            kind: 1,
            pos: Vec2::ZERO,
            size: Vec2::ZERO,
            vel_y: 0.0,
            active: false,
        }
    }
}

/// Fixed-capacity obstacle pool with get-or-recycle semantics
///
/// Capacity is hard: when every slot is active, `acquire` returns `None`
/// and the caller skips the spawn.
#[derive(Debug, Clone)]
pub struct ObstaclePool {
    slots: Vec<Obstacle>,
}

impl ObstaclePool {
    pub fn new() -> Self {
        Self {
            slots: vec![Obstacle::idle(); MAX_OBSTACLES],
        }
    }

    /// First inactive slot, or `None` when the pool is fully active
    pub fn acquire(&mut self) -> Option<&mut Obstacle> {
        self.slots.iter_mut().find(|slot| !slot.active)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Obstacle> {
        self.slots.iter()
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut Obstacle> {
        self.slots.iter_mut()
    }

    pub fn active_count(&self) -> usize {
        self.slots.iter().filter(|slot| slot.active).count()
    }

    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    pub fn deactivate_all(&mut self) {
        for slot in &mut self.slots {
            slot.active = false;
        }
    }
}

impl Default for ObstaclePool {
    fn default() -> Self {
        Self::new()
    }
}

/// Difficulty ramp counters
///
/// `obstacle_speed` only ever rises; `spawn_interval_ms` only ever falls,
/// floored at `SPAWN_INTERVAL_FLOOR_MS`.
#[derive(Debug, Clone, Copy)]
pub struct Difficulty {
    pub obstacle_speed: f32,
    pub spawn_interval_ms: f64,
}

impl Default for Difficulty {
    fn default() -> Self {
        Self {
            obstacle_speed: OBSTACLE_START_SPEED,
            spawn_interval_ms: SPAWN_START_INTERVAL_MS,
        }
    }
}

impl Difficulty {
    /// One ramp step: faster obstacles, shorter spawn interval
    pub fn step(&mut self) {
        self.obstacle_speed += DIFFICULTY_SPEED_STEP;
        self.spawn_interval_ms =
            (self.spawn_interval_ms - DIFFICULTY_INTERVAL_STEP_MS).max(SPAWN_INTERVAL_FLOOR_MS);
    }
}

/// Side effects the host must react to, drained once per frame
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameEvent {
    /// Emitted exactly once per collision
    GameOver { score: u32 },
}

/// Complete game state (deterministic given seed + input sequence)
#[derive(Debug, Clone)]
pub struct GameState {
    pub config: SimConfig,
    /// Run seed for reproducibility
    pub seed: u64,
    pub rng: Pcg32,
    pub car: Car,
    pub obstacles: ObstaclePool,
    pub difficulty: Difficulty,
    /// Increases only in steps of `SCORE_PER_OBSTACLE`
    pub score: u32,
    pub phase: GamePhase,
    /// Sim clock in ms; frozen while the phase is `GameOver`
    pub clock_ms: f64,
    pub next_spawn_at_ms: f64,
    pub last_difficulty_increase_at_ms: f64,
    /// Cosmetic road scroll offset, reset to 0 on game-over
    pub scroll_offset: f32,
    pub events: Vec<GameEvent>,
}

impl GameState {
    /// Create a new game state with the given seed
    pub fn new(seed: u64, config: SimConfig) -> Self {
        Self {
            config,
            seed,
            rng: Pcg32::seed_from_u64(seed),
            car: Car::centered(Vec2::new(
                config.playfield.x / 2.0,
                config.playfield.y - CAR_SPAWN_OFFSET_Y,
            )),
            obstacles: ObstaclePool::new(),
            difficulty: Difficulty::default(),
            score: 0,
            phase: GamePhase::Playing,
            clock_ms: 0.0,
            next_spawn_at_ms: 0.0,
            last_difficulty_increase_at_ms: 0.0,
            scroll_offset: 0.0,
            events: Vec::new(),
        }
    }

    /// Reset for a new run. The obstacle pool is recycled (not rebuilt) and
    /// the difficulty ramp carries over unless the config says otherwise.
    pub fn restart(&mut self) {
        self.phase = GamePhase::Playing;
        self.score = 0;
        self.obstacles.deactivate_all();
        self.car = Car::centered(Vec2::new(
            self.config.playfield.x / 2.0,
            self.config.playfield.y - CAR_SPAWN_OFFSET_Y,
        ));
        self.scroll_offset = 0.0;
        self.next_spawn_at_ms = self.clock_ms;
        self.last_difficulty_increase_at_ms = self.clock_ms;
        if self.config.reset_difficulty_on_restart {
            self.difficulty = Difficulty::default();
        }
    }

    /// Hand the pending events to the host
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }
}
