//! Simulation constants and tuning parameters.
//!
//! All lengths, speeds and accelerations here are in reference units,
//! defined at the 1280x720 baseline resolution and converted to device
//! units by the `Scaler`.

// --- Reference resolution ---

pub const REFERENCE_WIDTH: f32 = 1280.0;
pub const REFERENCE_HEIGHT: f32 = 720.0;

/// Edge length of one grid cell.
pub const REFERENCE_TILE_SIZE: f32 = 32.0;

/// Gravity magnitude for arcing projectiles (units/s², pointing down-screen).
pub const REFERENCE_GRAVITY: f32 = 400.0;

/// Screen y of the ground line.
pub const GROUND_Y: f32 = 640.0;

/// Left edge of grid column 0.
pub const GRID_ORIGIN_X: f32 = 256.0;

// --- Frame pacing ---

/// Largest delta a single tick will integrate (seconds).
pub const MAX_FRAME_DT: f32 = 0.25;

// --- Economy ---

pub const STARTING_MONEY: u32 = 600;
pub const STARTING_IRON: f32 = 60.0;
pub const BASE_IRON_CAPACITY: f32 = 100.0;

// --- Grid ---

pub const INITIAL_GRID_ROWS: u32 = 3;
pub const INITIAL_GRID_COLS: u32 = 4;
pub const EXPAND_UP_BASE_COST: u32 = 100;
pub const EXPAND_SIDEWAYS_BASE_COST: u32 = 150;
/// Added to the price of each further expansion in the same direction.
pub const EXPANSION_COST_GROWTH: u32 = 50;
pub const MAX_EXPANSIONS_UP: u32 = 6;
pub const MAX_EXPANSIONS_SIDEWAYS: u32 = 3;
/// Columns appended to each side per sideways expansion.
pub const SIDE_BLOCK_WIDTH: u32 = 2;

// --- City ---

pub const CITY_MAX_HP: f32 = 100.0;

// --- Waves ---

/// Countdown before wave 1 (seconds).
pub const PREPARATION_TIME: f32 = 15.0;
/// Countdown between a cleared wave and the next (seconds).
pub const INTER_WAVE_TIME: f32 = 10.0;

// --- Enemies ---

/// X at which enemies enter (beyond the right edge of the playfield).
pub const ENEMY_SPAWN_X: f32 = REFERENCE_WIDTH + 40.0;
/// Height above the ground inside which entry lanes are jittered.
pub const ENEMY_SPAWN_BAND: f32 = 120.0;
/// Footprint used when an enemy stat entry carries no visual size.
pub const PLACEHOLDER_FOOTPRINT: (f32, f32) = (32.0, 32.0);
/// Default fraction of the visual bounds used as hitbox.
pub const DEFAULT_HITBOX_FRACTION: f32 = 0.8;

// --- Bounds ---

/// Margin beyond the playfield before projectiles and enemies are culled.
pub const OOB_MARGIN: f32 = 200.0;
/// Extra headroom above the playfield for lobbed shells.
pub const ARC_CEILING_MARGIN: f32 = 2000.0;
