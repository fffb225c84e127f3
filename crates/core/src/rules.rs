//! Scoring, pacing and batch-size constants of the game.

/// Questions generated per level attempt.
pub const BATCH_SIZE: usize = 5;

/// Sampling attempts allowed per batch before giving up with a short round.
pub const MAX_SAMPLING_ATTEMPTS: usize = 20;

/// Wrong answers within one batch that force the level to be replayed.
pub const LEVEL_FAIL_THRESHOLD: u32 = 4;

/// Level from which the shorter time allowance applies.
pub const FAST_LEVEL: u32 = 5;

pub const STANDARD_TIME_SECS: u32 = 60;
pub const FAST_TIME_SECS: u32 = 30;

/// Points awarded for a correct answer at `level`.
#[must_use]
pub fn points_for(level: u32) -> u32 {
    level.saturating_mul(10)
}

/// Seconds on the clock when entering `level`.
#[must_use]
pub fn time_allowance(level: u32) -> u32 {
    if level >= FAST_LEVEL {
        FAST_TIME_SECS
    } else {
        STANDARD_TIME_SECS
    }
}

/// Whether a finished batch with `incorrect` wrong answers must be replayed.
#[must_use]
pub fn level_failed(incorrect: u32) -> bool {
    incorrect >= LEVEL_FAIL_THRESHOLD
}
