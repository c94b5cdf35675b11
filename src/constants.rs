/// Rating gap (in ranking places) that moves the base probability by 1.0
pub const RATING_DIVISOR: f64 = 110.0;

/// Form gap that moves the win probability by 1.0
pub const FORM_DIVISOR: f64 = 150.0;

/// Lower bound of the per-match random probability term
pub const NOISE_MIN: f64 = -0.15;

/// Upper bound of the per-match random probability term
pub const NOISE_MAX: f64 = 0.30;

/// Lowest score floor a match can draw
pub const SCORE_FLOOR: u32 = 62;

/// Highest score ceiling a match can draw
pub const SCORE_CEILING: u32 = 144;

/// Maximum amount the floor is raised and the ceiling lowered per match
pub const SCORE_JITTER: u32 = 15;

/// Range of the shared blowout/close-game multiplier
pub const DISPARITY_MIN: f64 = 0.45;
pub const DISPARITY_MAX: f64 = 2.10;

/// Attempts allowed before a level match is reported as a failure
pub const MAX_REPLAYS: u32 = 1_000;

/// Teams entering the knockout bracket
pub const BRACKET_SIZE: usize = 8;

/// League points per group-stage result
pub const WIN_POINTS: u32 = 2;
pub const LOSS_POINTS: u32 = 1;
