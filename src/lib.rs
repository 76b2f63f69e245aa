//! Road Dodge - a vertical-scrolling dodge-the-obstacles arcade game
//!
//! Core modules:
//! - `sim`: Deterministic simulation (movement, spawning, collisions, game state)
//! - `highscores`: Client-side view of the shared leaderboard
//! - `net`: Score API client (fetch-based on wasm32)
//! - `settings`: Player preferences persisted to LocalStorage
//! - `renderer`: Canvas2D presentation (wasm32 only)

pub mod highscores;
pub mod net;
#[cfg(target_arch = "wasm32")]
pub mod renderer;
pub mod settings;
pub mod sim;

pub use highscores::HighScores;
pub use settings::Settings;

/// Game configuration constants
pub mod consts {
    /// Fixed simulation timestep (120 Hz for smooth movement)
    pub const SIM_DT: f32 = 1.0 / 120.0;
    /// Maximum substeps per frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 8;

    /// Playfield defaults (overridden by the canvas size at startup)
    pub const PLAYFIELD_WIDTH: f32 = 800.0;
    pub const PLAYFIELD_HEIGHT: f32 = 600.0;

    /// Car dimensions
    pub const CAR_WIDTH: f32 = 100.0;
    pub const CAR_HEIGHT: f32 = 50.0;
    /// Held direction keys set velocity directly - no acceleration or inertia
    pub const CAR_SPEED: f32 = 160.0;
    /// Car spawns this far above the bottom edge
    pub const CAR_SPAWN_OFFSET_Y: f32 = 150.0;

    /// Obstacle pool capacity (hard cap - a full pool skips the spawn)
    pub const MAX_OBSTACLES: usize = 10;
    /// Obstacle sprite variants
    pub const OBSTACLE_KINDS: u8 = 3;
    /// Obstacle extents are drawn uniformly from this range
    pub const OBSTACLE_MIN_EXTENT: f32 = 50.0;
    pub const OBSTACLE_MAX_EXTENT: f32 = 200.0;

    /// Starting fall speed (px/s)
    pub const OBSTACLE_START_SPEED: f32 = 200.0;
    /// Starting spawn interval (ms)
    pub const SPAWN_START_INTERVAL_MS: f64 = 2000.0;
    /// Spawn interval never drops below this
    pub const SPAWN_INTERVAL_FLOOR_MS: f64 = 500.0;

    /// Difficulty ramps every 30 seconds of play
    pub const DIFFICULTY_PERIOD_MS: f64 = 30_000.0;
    pub const DIFFICULTY_SPEED_STEP: f32 = 20.0;
    pub const DIFFICULTY_INTERVAL_STEP_MS: f64 = 100.0;

    /// Points per obstacle that scrolls off the bottom
    pub const SCORE_PER_OBSTACLE: u32 = 10;

    /// Cosmetic road scroll speed (px/s; 2 px/frame at 60 fps)
    pub const SCROLL_SPEED: f32 = 120.0;
}
