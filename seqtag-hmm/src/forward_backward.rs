//! Forward-Backward posterior decoding.
//!
//! Works in raw probability space rather than log-space: sequences here are
//! tens of positions over dozens of states, and the epsilon floor keeps every
//! factor strictly positive, so underflow is not a practical concern at these
//! lengths.

use std::hash::Hash;

use seqtag_core::Result;

use crate::model::Hmm;
use crate::strategy::{argmax, require_symbols, InferStrategy, EMISSION_FLOOR};

/// Run the forward and backward passes, returning the raw score arrays.
///
/// `forward[i][k]` is `P(S_i = k, w_0..w_i)`:
///
/// - `forward[0][k] = P(S_1 = k) * P(w_0 | k)`
/// - `forward[i][k] = P(w_i | k) * Σ_k' forward[i-1][k'] * P(k | k')`
///
/// `backward[i][k]` scores the remaining suffix given `S_i = k`:
///
/// - `backward[n-1][k] = P(S_n = k)` — the end-state marginal, **not** the
///   textbook all-ones boundary. The substitution biases the last position
///   toward states that end training sequences, which is what we want for
///   sentence-like data; it is kept deliberately and pinned by tests.
/// - `backward[i][k] = Σ_k' P(k' | k) * P(w_{i+1} | k') * backward[i+1][k']`
///
/// Exposed separately from the decoder because the sampling strategy reuses
/// the position-0 scores to seed its draw.
///
/// # Errors
///
/// Returns an error if `symbols` is empty.
pub fn forward_backward<T: Hash + Eq + Clone>(
    model: &Hmm<T>,
    symbols: &[T],
) -> Result<(Vec<Vec<f64>>, Vec<Vec<f64>>)> {
    require_symbols(symbols)?;

    let k = model.state_count();
    let n = symbols.len();

    let mut forward = vec![vec![0.0; k]; n];
    for j in 0..k {
        let e = model.p_emission(j, &symbols[0]).unwrap_or(EMISSION_FLOOR);
        forward[0][j] = model.start_probs()[j] * e;
    }
    for i in 1..n {
        for j in 0..k {
            let e = model.p_emission(j, &symbols[i]).unwrap_or(EMISSION_FLOOR);
            let reach: f64 = (0..k)
                .map(|p| forward[i - 1][p] * model.transition_prob(p, j))
                .sum();
            forward[i][j] = e * reach;
        }
    }

    let mut backward = vec![vec![0.0; k]; n];
    backward[n - 1].copy_from_slice(model.end_probs());
    for i in (0..n - 1).rev() {
        for j in 0..k {
            backward[i][j] = (0..k)
                .map(|s| {
                    let e = model.p_emission(s, &symbols[i + 1]).unwrap_or(EMISSION_FLOOR);
                    model.transition_prob(j, s) * e * backward[i + 1][s]
                })
                .sum();
        }
    }

    Ok((forward, backward))
}

/// Forward-Backward decoder: labels each position with the state maximizing
/// `forward[i][k] * backward[i][k]`, proportional to the position-wise
/// posterior given the whole symbol sequence.
#[derive(Debug, Clone, Copy, Default)]
pub struct ForwardBackward;

impl<T: Hash + Eq + Clone> InferStrategy<T> for ForwardBackward {
    fn infer(&mut self, model: &Hmm<T>, symbols: &[T]) -> Result<Vec<usize>> {
        let (forward, backward) = forward_backward(model, symbols)?;
        let k = model.state_count();

        let mut scores = vec![0.0; k];
        let path = forward
            .iter()
            .zip(&backward)
            .map(|(f, b)| {
                for j in 0..k {
                    scores[j] = f[j] * b[j];
                }
                argmax(&scores)
            })
            .collect();

        Ok(path)
    }
}
