//! Discrete hidden Markov model with supervised, count-based training.

use std::collections::HashMap;
use std::hash::Hash;

use seqtag_core::Result;

use crate::chain::MarkovChain;
use crate::observation::Observation;
use crate::strategy::InferStrategy;

/// A discrete HMM over `state_count` hidden states and an open symbol
/// vocabulary.
///
/// Extends [`MarkovChain`] with per-state emission counting. The symbol type
/// is generic: emission tables are hash maps keyed by the symbol, not arrays,
/// since the vocabulary is open and sparse per state — symbols never seen in
/// training are a normal occurrence at decoding time and are handled by the
/// strategies' epsilon floor, not by the model.
///
/// The model knows nothing about what the states "mean"; mapping state
/// indices to human-readable labels is the caller's concern.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(
    feature = "serde",
    serde(bound(deserialize = "T: serde::Deserialize<'de> + Eq + std::hash::Hash"))
)]
pub struct Hmm<T> {
    chain: MarkovChain,
    /// Per-state symbol occurrence counts.
    c_emissions: Vec<HashMap<T, u64>>,
    /// Per-state emission distributions; each non-empty map sums to 1 over
    /// the symbols observed under that state.
    p_emissions: Vec<HashMap<T, f64>>,
    /// Fraction of all distinct (state, symbol) vocabulary entries owned by
    /// each state. A weak prior, not a proper class prior.
    p_distinct_share: Vec<f64>,
}

impl<T: Hash + Eq + Clone> Hmm<T> {
    /// Create an empty model over `state_count` states.
    ///
    /// # Errors
    ///
    /// Returns an error if `state_count` is zero.
    pub fn new(state_count: usize) -> Result<Self> {
        let chain = MarkovChain::new(state_count)?;
        Ok(Self {
            chain,
            c_emissions: (0..state_count).map(|_| HashMap::new()).collect(),
            p_emissions: (0..state_count).map(|_| HashMap::new()).collect(),
            p_distinct_share: vec![0.0; state_count],
        })
    }

    /// Number of hidden states.
    pub fn state_count(&self) -> usize {
        self.chain.state_count()
    }

    /// The underlying transition model.
    pub fn chain(&self) -> &MarkovChain {
        &self.chain
    }

    /// Accumulate counts from one labeled observation.
    ///
    /// Requires aligned state and symbol sequences of equal, nonzero length.
    /// Returns `true` if the observation was counted; malformed input (or an
    /// observation already marked `learned`) is skipped silently, same policy
    /// as [`MarkovChain::learn`].
    pub fn learn(&mut self, observation: &mut Observation<T>) -> bool {
        if observation.learned {
            return false;
        }
        let Some(states) = observation.states.as_deref() else {
            return false;
        };
        if states.len() != observation.symbols.len() {
            return false;
        }
        // Validates emptiness and state bounds; counts the chain tables.
        if !self.chain.count_states(states) {
            return false;
        }
        for (&s, w) in states.iter().zip(&observation.symbols) {
            *self.c_emissions[s].entry(w.clone()).or_insert(0) += 1;
        }
        observation.learned = true;
        true
    }

    /// Train over a whole corpus, returning how many sequences were counted.
    ///
    /// The difference between the returned value and the corpus size is the
    /// number of malformed (skipped) sequences.
    pub fn learn_all<'a, I>(&mut self, observations: I) -> usize
    where
        T: 'a,
        I: IntoIterator<Item = &'a mut Observation<T>>,
    {
        observations
            .into_iter()
            .map(|obs| self.learn(obs))
            .filter(|&counted| counted)
            .count()
    }

    /// Derive all probability tables from the accumulated counts.
    ///
    /// One-shot finalize: call after all training, before decoding. A state
    /// with no observed symbols keeps an empty emission map (no mass, not
    /// NaN); zero-count transition rows follow the [`MarkovChain`]
    /// degenerate-row sentinel.
    pub fn estimate_probabilities(&mut self) {
        for (counts, probs) in self.c_emissions.iter().zip(&mut self.p_emissions) {
            probs.clear();
            let total: u64 = counts.values().sum();
            if total == 0 {
                continue;
            }
            for (w, &c) in counts {
                probs.insert(w.clone(), c as f64 / total as f64);
            }
        }

        let distinct_total: usize = self.c_emissions.iter().map(|m| m.len()).sum();
        for (share, counts) in self.p_distinct_share.iter_mut().zip(&self.c_emissions) {
            *share = if distinct_total == 0 {
                0.0
            } else {
                counts.len() as f64 / distinct_total as f64
            };
        }

        self.chain.estimate_probabilities();
    }

    /// Decode an observation with the given strategy.
    ///
    /// Pure dispatch: the strategy consumes this model and the observation's
    /// symbols and produces a state-index sequence of the same length, which
    /// is both stored on the observation and returned.
    ///
    /// # Errors
    ///
    /// Returns an error if the observation's symbol sequence is empty.
    pub fn infer(
        &self,
        strategy: &mut dyn InferStrategy<T>,
        observation: &mut Observation<T>,
    ) -> Result<Vec<usize>> {
        let path = strategy.infer(self, &observation.symbols)?;
        observation.states = Some(path.clone());
        Ok(path)
    }

    // -----------------------------------------------------------------------
    // Table accessors (export surface + strategy inputs)
    // -----------------------------------------------------------------------

    /// `P(w | state)`, or `None` if the symbol was never observed under the
    /// state. Decoding code substitutes
    /// [`EMISSION_FLOOR`](crate::strategy::EMISSION_FLOOR) for `None`.
    pub fn p_emission(&self, state: usize, symbol: &T) -> Option<f64> {
        self.p_emissions[state].get(symbol).copied()
    }

    /// Per-state symbol occurrence counts.
    pub fn emission_counts(&self, state: usize) -> &HashMap<T, u64> {
        &self.c_emissions[state]
    }

    /// Per-state emission distribution over the symbols observed under it.
    pub fn emission_probs(&self, state: usize) -> &HashMap<T, f64> {
        &self.p_emissions[state]
    }

    /// Per-state share of the distinct training vocabulary.
    pub fn distinct_shares(&self) -> &[f64] {
        &self.p_distinct_share
    }

    /// `P(S_1 = k)` — start-state distribution.
    pub fn start_probs(&self) -> &[f64] {
        self.chain.start_probs()
    }

    /// `P(S_i = k)` — marginal state distribution.
    pub fn marginal_probs(&self) -> &[f64] {
        self.chain.marginal_probs()
    }

    /// `P(S_n = k)` — end-state distribution.
    pub fn end_probs(&self) -> &[f64] {
        self.chain.end_probs()
    }

    /// `P(S_{i+1} = to | S_i = from)`.
    pub fn transition_prob(&self, from: usize, to: usize) -> f64 {
        self.chain.transition_prob(from, to)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::naive::Naive;

    const TOL: f64 = 1e-12;

    /// Three-state POS-like model trained on two tiny sentences.
    fn trained_model() -> Hmm<&'static str> {
        let mut model = Hmm::new(3).unwrap();
        let mut corpus = vec![
            Observation::labeled(vec![0, 1, 2], vec!["the", "dog", "runs"]),
            Observation::labeled(vec![0, 1, 2], vec!["the", "cat", "runs"]),
        ];
        assert_eq!(model.learn_all(corpus.iter_mut()), 2);
        model.estimate_probabilities();
        model
    }

    #[test]
    fn emission_rows_sum_to_one() {
        let model = trained_model();
        for state in 0..model.state_count() {
            let sum: f64 = model.emission_probs(state).values().sum();
            assert!((sum - 1.0).abs() < TOL, "state {state} sums to {sum}");
        }
    }

    #[test]
    fn emission_counts_match_corpus() {
        let model = trained_model();
        assert_eq!(model.emission_counts(0).get("the"), Some(&2));
        assert_eq!(model.emission_counts(1).get("dog"), Some(&1));
        assert_eq!(model.emission_counts(1).get("cat"), Some(&1));
        assert_eq!(model.p_emission(1, &"dog"), Some(0.5));
        assert_eq!(model.p_emission(1, &"the"), None);
    }

    #[test]
    fn distinct_shares_partition_the_vocabulary() {
        let model = trained_model();
        // Distinct symbols: state 0 has {the}, state 1 {dog, cat}, state 2 {runs}.
        let shares = model.distinct_shares();
        assert!((shares[0] - 0.25).abs() < TOL);
        assert!((shares[1] - 0.5).abs() < TOL);
        assert!((shares[2] - 0.25).abs() < TOL);
        let sum: f64 = shares.iter().sum();
        assert!((sum - 1.0).abs() < TOL);
    }

    #[test]
    fn length_mismatch_is_skipped_entirely() {
        let mut model = Hmm::new(2).unwrap();
        let mut obs = Observation::labeled(vec![0, 1], vec!["a", "b", "c"]);
        assert!(!model.learn(&mut obs));
        assert!(!obs.learned);
        assert!(model.emission_counts(0).is_empty());
        assert_eq!(model.chain().marginal_counts(), &[0, 0]);
    }

    #[test]
    fn relearning_a_learned_observation_changes_nothing() {
        let mut model = Hmm::new(2).unwrap();
        let mut obs = Observation::labeled(vec![0, 1], vec!["a", "b"]);
        assert!(model.learn(&mut obs));
        assert!(!model.learn(&mut obs));
        assert_eq!(model.emission_counts(0).get("a"), Some(&1));
        assert_eq!(model.chain().marginal_counts(), &[1, 1]);
    }

    #[test]
    fn learn_all_reports_skips() {
        let mut model = Hmm::new(2).unwrap();
        let mut corpus = vec![
            Observation::labeled(vec![0, 1], vec!["a", "b"]),
            Observation::labeled(vec![0], vec!["a", "b"]), // mismatch
            Observation::unlabeled(vec!["a"]),             // no labels
        ];
        assert_eq!(model.learn_all(corpus.iter_mut()), 1);
    }

    #[test]
    fn infer_assigns_states_to_the_observation() {
        let model = trained_model();
        let mut obs = Observation::unlabeled(vec!["the", "dog", "runs"]);
        let path = model.infer(&mut Naive, &mut obs).unwrap();
        assert_eq!(path.len(), 3);
        assert_eq!(obs.states.as_deref(), Some(&path[..]));
    }

    #[cfg(feature = "serde")]
    #[test]
    fn tables_round_trip_through_serde() {
        let mut model = Hmm::new(3).unwrap();
        let mut corpus = vec![
            Observation::labeled(vec![0, 1, 2], vec!["the".to_string(), "dog".into(), "runs".into()]),
            Observation::labeled(vec![0, 1, 2], vec!["the".to_string(), "cat".into(), "runs".into()]),
        ];
        model.learn_all(corpus.iter_mut());
        model.estimate_probabilities();

        let json = serde_json::to_string(&model).unwrap();
        let back: Hmm<String> = serde_json::from_str(&json).unwrap();

        assert_eq!(back.state_count(), model.state_count());
        assert_eq!(back.start_probs(), model.start_probs());
        assert_eq!(back.chain().transition_probs(), model.chain().transition_probs());
        assert_eq!(back.emission_probs(1), model.emission_probs(1));
        assert_eq!(back.distinct_shares(), model.distinct_shares());
    }

    #[test]
    fn infer_on_empty_symbols_is_an_error() {
        let model = trained_model();
        let mut obs = Observation::unlabeled(Vec::<&str>::new());
        assert!(model.infer(&mut Naive, &mut obs).is_err());
    }
}
