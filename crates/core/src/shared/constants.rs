/// Half-width of the window searched around a rough turn boundary.
pub const DEFAULT_SEARCH_RADIUS_SEC: f64 = 0.2;

pub const DEFAULT_WINDOW_MS: f64 = 20.0;
pub const DEFAULT_HOP_MS: f64 = 10.0;

/// Windows quieter than this (dBFS) count as silence when trimming.
pub const DEFAULT_TRIM_THRESHOLD_DB: f64 = -40.0;

/// Energies closer than this are treated as equal when picking a split point.
pub const ENERGY_TIE_EPSILON: f64 = 1e-9;

/// Relative max/min energy spread below which a search window has no clear dip.
pub const FLAT_ENERGY_SPREAD: f64 = 0.1;

/// Setup, Response, Punchline.
pub const DIALOG_TURN_COUNT: usize = 3;
