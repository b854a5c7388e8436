use crate::error::{Result, RiskError};
use crate::model_selection::{Fold, Hyperparams, ParamGrid};
use tracing::debug;

/// Cross-validated score of one grid point.
#[derive(Clone, Debug, PartialEq)]
pub struct CandidateScore {
    pub params: Hyperparams,
    pub fold_scores: Vec<f64>,
    pub mean_score: f64,
}

#[derive(Clone, Debug, PartialEq)]
pub struct SearchOutcome {
    pub best: Hyperparams,
    pub best_score: f64,
    /// Every candidate in evaluation order.
    pub candidates: Vec<CandidateScore>,
}

/// Exhaustive search: scores every candidate of `grid` on every fold with
/// `score` and returns the one with the highest mean.
///
/// Candidates are evaluated in [`ParamGrid::candidates`] order and the best is
/// replaced only by a strictly greater mean, so ties keep the earliest point.
pub fn grid_search<F>(grid: &ParamGrid, folds: &[Fold], mut score: F) -> Result<SearchOutcome>
where
    F: FnMut(&Hyperparams, &Fold) -> Result<f64>,
{
    grid.validate()?;
    if folds.is_empty() {
        return Err(RiskError::InvalidParameter(
            "grid search needs at least one fold".to_string(),
        ));
    }

    let mut candidates = Vec::with_capacity(grid.len());
    let mut best: Option<(Hyperparams, f64)> = None;

    for params in grid.candidates() {
        let fold_scores = folds
            .iter()
            .map(|fold| score(&params, fold))
            .collect::<Result<Vec<f64>>>()?;
        let mean_score = fold_scores.iter().sum::<f64>() / fold_scores.len() as f64;
        debug!(%params, mean_score, "scored candidate");

        if best.map_or(true, |(_, s)| mean_score > s) {
            best = Some((params, mean_score));
        }
        candidates.push(CandidateScore {
            params,
            fold_scores,
            mean_score,
        });
    }

    let (best, best_score) = best.ok_or_else(|| {
        RiskError::InvalidParameter("parameter grid must not be empty".to_string())
    })?;
    Ok(SearchOutcome {
        best,
        best_score,
        candidates,
    })
}
