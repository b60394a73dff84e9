//! Savings relative to naive round trips.

use thiserror::Error;

use super::Solution;

/// Errors from [`distance_saving`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ScoreError {
    /// No solution was supplied, typically because the solve was
    /// infeasible.
    #[error("cannot score an absent solution")]
    MissingSolution,
    /// Every location sits on the depot, so there is nothing to save.
    #[error("round-trip baseline is zero")]
    DegenerateBaseline,
}

/// Percentage reduction of the solution's cost against visiting each
/// location with its own return trip from the depot:
/// `100 · (2·Σ d[0][j] − objective) / (2·Σ d[0][j])`.
///
/// # Errors
///
/// Returns [`ScoreError::MissingSolution`] for `None` and
/// [`ScoreError::DegenerateBaseline`] when the round-trip total is zero.
pub fn distance_saving(solution: Option<&Solution<'_>>) -> Result<f64, ScoreError> {
    let solution = solution.ok_or(ScoreError::MissingSolution)?;
    let baseline = solution.model().distances().round_trip_total();
    if baseline == 0.0 {
        return Err(ScoreError::DegenerateBaseline);
    }
    Ok(100.0 * (baseline - solution.objective_value()) / baseline)
}
