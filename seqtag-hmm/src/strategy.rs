//! Shared contract for the decoding strategies.

use seqtag_core::{Result, SeqtagError};

use crate::model::Hmm;

/// Floor probability substituted when a symbol has zero recorded mass under a
/// state, so one missing training example never zeroes out an otherwise
/// plausible state. Effectively below any real estimated probability (corpus
/// counts keep those above ~1e-9) but far above the smallest positive `f64`,
/// so products of floors stay representable over realistic sequence lengths.
pub const EMISSION_FLOOR: f64 = 1e-18;

/// A decoding algorithm: consumes a finalized model and a symbol sequence,
/// produces a state-index sequence of the same length.
///
/// Takes `&mut self` because the sampling strategy carries per-instance state
/// (its RNG and a one-slot posterior memo); the deterministic strategies are
/// stateless unit types.
pub trait InferStrategy<T> {
    /// Infer a state sequence for `symbols`.
    ///
    /// # Errors
    ///
    /// Returns an error if `symbols` is empty.
    fn infer(&mut self, model: &Hmm<T>, symbols: &[T]) -> Result<Vec<usize>>;
}

/// Reject empty symbol sequences up front.
pub(crate) fn require_symbols<T>(symbols: &[T]) -> Result<()> {
    if symbols.is_empty() {
        return Err(SeqtagError::InvalidInput(
            "symbol sequence is empty".into(),
        ));
    }
    Ok(())
}

/// Index of the strictly greatest score, keeping the lowest index on ties.
pub(crate) fn argmax(scores: &[f64]) -> usize {
    let mut best = 0;
    let mut best_score = f64::NEG_INFINITY;
    for (i, &s) in scores.iter().enumerate() {
        if s > best_score {
            best_score = s;
            best = i;
        }
    }
    best
}
