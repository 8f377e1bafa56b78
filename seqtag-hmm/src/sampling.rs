//! Stochastic decoding by sequential categorical draws.

use std::hash::Hash;

use seqtag_core::{Result, Xorshift64};

use crate::forward_backward::forward_backward;
use crate::model::Hmm;
use crate::strategy::{require_symbols, InferStrategy, EMISSION_FLOOR};

/// Sampling decoder: draws the first state from the position-0 posterior
/// `P(S_1 | W) ∝ forward[0] * backward[0]`, then each following state from
/// the unnormalized weights `P(k | prev) * P(w_i | k)` given only the
/// previously drawn state.
///
/// This is a forward-only stochastic draw conditioned on the sampled prefix,
/// not a true sample from the joint posterior; the approximation is cheap and
/// kept on purpose. Repeated calls on the same symbols produce independent
/// draws.
///
/// The position-0 posterior is memoized in a one-slot cache keyed by the
/// symbol sequence's *value*, so repeated draws for one observation skip the
/// forward-backward passes. The cache and the RNG are instance-scoped:
/// concurrent callers must each hold their own `Sampling`.
#[derive(Debug, Clone)]
pub struct Sampling<T> {
    /// Last symbol sequence and its position-0 posterior.
    memo: Option<(Vec<T>, Vec<f64>)>,
    rng: Xorshift64,
}

impl<T: Hash + Eq + Clone> Sampling<T> {
    /// A sampler with an explicit RNG seed, for reproducible draws.
    pub fn with_seed(seed: u64) -> Self {
        Self {
            memo: None,
            rng: Xorshift64::new(seed),
        }
    }

    /// Draw an index proportional to a vector of nonnegative weights.
    ///
    /// The weights need not be normalized: `u` is drawn uniformly from
    /// `[0, Σw)` by scaling (never by a modulo of the draw, which is
    /// numerically fragile) and the first index whose cumulative sum strictly
    /// exceeds `u` wins. The last index is the fallback against floating
    /// round-off leaving `u` unreached.
    fn draw(&mut self, weights: &[f64]) -> usize {
        let total: f64 = weights.iter().sum();
        let u = self.rng.next_f64() * total;

        let mut cumulative = 0.0;
        for (i, &w) in weights.iter().enumerate() {
            cumulative += w;
            if cumulative > u {
                return i;
            }
        }
        weights.len() - 1
    }

    /// The position-0 posterior for `symbols`, from the memo when it matches.
    fn first_posterior(&mut self, model: &Hmm<T>, symbols: &[T]) -> Result<Vec<f64>> {
        if let Some((cached, posterior)) = &self.memo {
            if cached.as_slice() == symbols {
                return Ok(posterior.clone());
            }
        }
        let (forward, backward) = forward_backward(model, symbols)?;
        let posterior: Vec<f64> = forward[0]
            .iter()
            .zip(&backward[0])
            .map(|(f, b)| f * b)
            .collect();
        self.memo = Some((symbols.to_vec(), posterior.clone()));
        Ok(posterior)
    }
}

impl<T: Hash + Eq + Clone> Default for Sampling<T> {
    fn default() -> Self {
        Self::with_seed(42)
    }
}

impl<T: Hash + Eq + Clone> InferStrategy<T> for Sampling<T> {
    fn infer(&mut self, model: &Hmm<T>, symbols: &[T]) -> Result<Vec<usize>> {
        require_symbols(symbols)?;

        let posterior = self.first_posterior(model, symbols)?;
        let k = model.state_count();

        let mut path = Vec::with_capacity(symbols.len());
        let mut prev = self.draw(&posterior);
        path.push(prev);

        let mut weights = vec![0.0; k];
        for w in &symbols[1..] {
            for (j, weight) in weights.iter_mut().enumerate() {
                let e = model.p_emission(j, w).unwrap_or(EMISSION_FLOOR);
                *weight = model.transition_prob(prev, j) * e;
            }
            prev = self.draw(&weights);
            path.push(prev);
        }

        Ok(path)
    }
}
