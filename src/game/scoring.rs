//! Time-based scoring for correct answers
//!
//! A correct answer is worth 100 points scaled by a multiplier of
//! `time_remaining / (full_duration / 2)`. Answering at the halfway mark
//! earns exactly 100; answering instantly earns 200.

/// Base points for a correct answer at the halfway mark
pub const BASE_POINTS: f64 = 100.0;

/// Multiplier for the time left on the clock.
///
/// Ceiling to the next hundredth, then rounded to two decimals.
pub fn time_multiplier(time_remaining: u32, full_duration: u32) -> f64 {
    if full_duration == 0 {
        return 0.0;
    }
    let half = f64::from(full_duration) / 2.0;
    let ceiled = (f64::from(time_remaining) / half * 100.0).ceil() / 100.0;
    (ceiled * 100.0).round() / 100.0
}

/// Points earned for a correct answer with `time_remaining` seconds left
/// out of `full_duration`.
pub fn compute_points(time_remaining: u32, full_duration: u32) -> u32 {
    (BASE_POINTS * time_multiplier(time_remaining, full_duration)).round() as u32
}
