//! Viterbi decoding: the single most probable state sequence.

use std::hash::Hash;

use seqtag_core::Result;

use crate::model::Hmm;
use crate::strategy::{argmax, require_symbols, InferStrategy, EMISSION_FLOOR};

/// Viterbi decoder: dynamic programming over the joint probability of states
/// and symbols, with backpointer reconstruction.
///
/// `delta[0][k] = P(S_1 = k) * P(w_0 | k)`, then
/// `delta[i][k] = max_k' delta[i-1][k'] * P(k | k') * P(w_i | k)` with the
/// maximizing predecessor recorded per cell. The final state is the argmax
/// over the last column and the path is recovered by backtracking.
/// O(n·K²) forward, O(n) backtrack.
#[derive(Debug, Clone, Copy, Default)]
pub struct Viterbi;

impl<T: Hash + Eq + Clone> InferStrategy<T> for Viterbi {
    fn infer(&mut self, model: &Hmm<T>, symbols: &[T]) -> Result<Vec<usize>> {
        require_symbols(symbols)?;

        let k = model.state_count();
        let n = symbols.len();

        let mut delta = vec![vec![0.0f64; k]; n];
        let mut psi = vec![vec![0usize; k]; n];

        for j in 0..k {
            let e = model.p_emission(j, &symbols[0]).unwrap_or(EMISSION_FLOOR);
            delta[0][j] = model.start_probs()[j] * e;
        }

        for i in 1..n {
            for j in 0..k {
                let e = model.p_emission(j, &symbols[i]).unwrap_or(EMISSION_FLOOR);
                let mut best_val = f64::NEG_INFINITY;
                let mut best_state = 0;
                for p in 0..k {
                    let v = delta[i - 1][p] * model.transition_prob(p, j);
                    if v > best_val {
                        best_val = v;
                        best_state = p;
                    }
                }
                delta[i][j] = best_val * e;
                psi[i][j] = best_state;
            }
        }

        let mut path = vec![0usize; n];
        path[n - 1] = argmax(&delta[n - 1]);
        for i in (0..n - 1).rev() {
            path[i] = psi[i + 1][path[i + 1]];
        }

        Ok(path)
    }
}
