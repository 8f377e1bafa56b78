//! First-order transition model over a fixed set of discrete states.
//!
//! Accumulates start, marginal, end, and pairwise transition counts from
//! labeled sequences, then derives normalized probability tables in a single
//! finalize pass. The [`Hmm`](crate::Hmm) builds on this by adding per-state
//! emission counting.

use seqtag_core::{Result, SeqtagError};

use crate::observation::Observation;

/// Maximum-likelihood transition model over `state_count` discrete states.
///
/// Counts are accumulated across an arbitrary number of [`learn`](Self::learn)
/// calls; probabilities are derived once by
/// [`estimate_probabilities`](Self::estimate_probabilities), after which the
/// model is treated as read-only by decoding code.
///
/// # Degenerate rows
///
/// Normalizing a count table with a zero total would divide by zero. Instead
/// of producing NaN, such a table (or transition row) is left as all zeros —
/// an explicit sentinel that sums to 0 rather than 1 and cannot win a
/// strict-greater-than argmax scan.
/// [`degenerate_transition_rows`](Self::degenerate_transition_rows) reports
/// which rows were affected.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MarkovChain {
    state_count: usize,
    /// Number of sequences starting in each state.
    c_start: Vec<u64>,
    /// Number of occurrences of each state at any position.
    c_marginal: Vec<u64>,
    /// Number of sequences ending in each state.
    c_end: Vec<u64>,
    /// Adjacent transition counts, row-major `state_count * state_count`.
    c_transitions: Vec<u64>,
    p_start: Vec<f64>,
    p_marginal: Vec<f64>,
    p_end: Vec<f64>,
    /// Transition probabilities, row-major; each non-degenerate row sums to 1.
    p_transitions: Vec<f64>,
}

impl MarkovChain {
    /// Create an empty model over `state_count` states.
    ///
    /// # Errors
    ///
    /// Returns an error if `state_count` is zero.
    pub fn new(state_count: usize) -> Result<Self> {
        if state_count == 0 {
            return Err(SeqtagError::InvalidInput(
                "state_count must be > 0".into(),
            ));
        }
        Ok(Self {
            state_count,
            c_start: vec![0; state_count],
            c_marginal: vec![0; state_count],
            c_end: vec![0; state_count],
            c_transitions: vec![0; state_count * state_count],
            p_start: vec![0.0; state_count],
            p_marginal: vec![0.0; state_count],
            p_end: vec![0.0; state_count],
            p_transitions: vec![0.0; state_count * state_count],
        })
    }

    /// Number of hidden states.
    pub fn state_count(&self) -> usize {
        self.state_count
    }

    /// Accumulate counts from one labeled observation.
    ///
    /// Returns `true` if the observation was counted. Malformed input — a
    /// missing or empty state sequence, an out-of-range state index, or an
    /// observation already marked `learned` — is skipped silently and returns
    /// `false`, so a noisy corpus with a few bad lines still trains. Callers
    /// wanting visibility can tally the returned flags.
    pub fn learn<T>(&mut self, observation: &mut Observation<T>) -> bool {
        if observation.learned {
            return false;
        }
        let Some(states) = observation.states.as_deref() else {
            return false;
        };
        if !self.count_states(states) {
            return false;
        }
        observation.learned = true;
        true
    }

    /// The counting pass shared with [`Hmm::learn`](crate::Hmm::learn).
    ///
    /// Validates before mutating anything, so a rejected sequence leaves no
    /// partial counts behind.
    pub(crate) fn count_states(&mut self, states: &[usize]) -> bool {
        if states.is_empty() || states.iter().any(|&s| s >= self.state_count) {
            return false;
        }

        self.c_start[states[0]] += 1;
        self.c_end[states[states.len() - 1]] += 1;
        for &s in states {
            self.c_marginal[s] += 1;
        }
        for pair in states.windows(2) {
            self.c_transitions[pair[0] * self.state_count + pair[1]] += 1;
        }
        true
    }

    /// Derive the probability tables from the accumulated counts.
    ///
    /// One-shot finalize: call after all training. Each table is normalized
    /// by its own total; each transition row is normalized independently.
    /// Zero-total tables and rows stay all-zero (see the type-level note on
    /// degenerate rows).
    pub fn estimate_probabilities(&mut self) {
        self.p_start = normalized(&self.c_start);
        self.p_marginal = normalized(&self.c_marginal);
        self.p_end = normalized(&self.c_end);

        let k = self.state_count;
        for i in 0..k {
            let row = normalized(&self.c_transitions[i * k..(i + 1) * k]);
            self.p_transitions[i * k..(i + 1) * k].copy_from_slice(&row);
        }
    }

    /// States with no outgoing transitions in the training data.
    ///
    /// Their rows in [`transition_probs`](Self::transition_probs) are the
    /// all-zero sentinel rather than a distribution.
    pub fn degenerate_transition_rows(&self) -> Vec<usize> {
        let k = self.state_count;
        (0..k)
            .filter(|&i| self.c_transitions[i * k..(i + 1) * k].iter().all(|&c| c == 0))
            .collect()
    }

    // -----------------------------------------------------------------------
    // Table accessors (export surface)
    // -----------------------------------------------------------------------

    /// Per-state count of sequences starting in that state.
    pub fn start_counts(&self) -> &[u64] {
        &self.c_start
    }

    /// Per-state count of occurrences at any position.
    pub fn marginal_counts(&self) -> &[u64] {
        &self.c_marginal
    }

    /// Per-state count of sequences ending in that state.
    pub fn end_counts(&self) -> &[u64] {
        &self.c_end
    }

    /// Adjacent transition counts, row-major `state_count * state_count`.
    pub fn transition_counts(&self) -> &[u64] {
        &self.c_transitions
    }

    /// `P(S_1 = k)` — start-state distribution.
    pub fn start_probs(&self) -> &[f64] {
        &self.p_start
    }

    /// `P(S_i = k)` — marginal state distribution over all positions.
    pub fn marginal_probs(&self) -> &[f64] {
        &self.p_marginal
    }

    /// `P(S_n = k)` — end-state distribution.
    pub fn end_probs(&self) -> &[f64] {
        &self.p_end
    }

    /// Transition probabilities, row-major `state_count * state_count`.
    pub fn transition_probs(&self) -> &[f64] {
        &self.p_transitions
    }

    /// One row of the transition table: `P(S_{i+1} | S_i = from)`.
    ///
    /// # Panics
    ///
    /// Panics if `from >= state_count`.
    pub fn transition_row(&self, from: usize) -> &[f64] {
        let k = self.state_count;
        &self.p_transitions[from * k..(from + 1) * k]
    }

    /// `P(S_{i+1} = to | S_i = from)`.
    ///
    /// # Panics
    ///
    /// Panics if `from` or `to` is not below `state_count`.
    pub fn transition_prob(&self, from: usize, to: usize) -> f64 {
        assert!(
            from < self.state_count && to < self.state_count,
            "state index out of range: ({from}, {to}) with state_count {}",
            self.state_count
        );
        self.p_transitions[from * self.state_count + to]
    }
}

/// Normalize a count table, leaving a zero-total table all-zero.
fn normalized(counts: &[u64]) -> Vec<f64> {
    let total: u64 = counts.iter().sum();
    if total == 0 {
        return vec![0.0; counts.len()];
    }
    counts.iter().map(|&c| c as f64 / total as f64).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    const TOL: f64 = 1e-12;

    /// Train a 3-state chain on two short sequences.
    fn trained_chain() -> MarkovChain {
        let mut chain = MarkovChain::new(3).unwrap();
        let mut a = Observation::labeled(vec![0, 1, 2], vec!["w"; 3]);
        let mut b = Observation::labeled(vec![0, 1, 1, 2], vec!["w"; 4]);
        assert!(chain.learn(&mut a));
        assert!(chain.learn(&mut b));
        chain.estimate_probabilities();
        chain
    }

    #[test]
    fn counts_match_hand_tally() {
        let chain = trained_chain();
        assert_eq!(chain.start_counts(), &[2, 0, 0]);
        assert_eq!(chain.end_counts(), &[0, 0, 2]);
        assert_eq!(chain.marginal_counts(), &[2, 3, 2]);
        // Transitions: 0->1 twice, 1->2 twice, 1->1 once.
        assert_eq!(chain.transition_counts()[0 * 3 + 1], 2);
        assert_eq!(chain.transition_counts()[1 * 3 + 2], 2);
        assert_eq!(chain.transition_counts()[1 * 3 + 1], 1);
    }

    #[test]
    fn probability_tables_sum_to_one() {
        let chain = trained_chain();
        for table in [chain.start_probs(), chain.marginal_probs(), chain.end_probs()] {
            let sum: f64 = table.iter().sum();
            assert!((sum - 1.0).abs() < TOL, "table sums to {sum}");
        }
        // Rows 0 and 1 have outgoing transitions.
        for i in [0, 1] {
            let sum: f64 = chain.transition_row(i).iter().sum();
            assert!((sum - 1.0).abs() < TOL, "row {i} sums to {sum}");
        }
    }

    #[test]
    fn learned_flag_prevents_double_counting() {
        let mut chain = MarkovChain::new(2).unwrap();
        let mut obs = Observation::labeled(vec![0, 1], vec!["w"; 2]);
        assert!(chain.learn(&mut obs));
        let before = chain.start_counts().to_vec();
        assert!(!chain.learn(&mut obs));
        assert_eq!(chain.start_counts(), &before[..]);
        assert_eq!(chain.marginal_counts(), &[1, 1]);
    }

    #[test]
    fn unlabeled_observation_is_skipped() {
        let mut chain = MarkovChain::new(2).unwrap();
        let mut obs = Observation::unlabeled(vec!["w"]);
        assert!(!chain.learn(&mut obs));
        assert!(!obs.learned);
        assert_eq!(chain.marginal_counts(), &[0, 0]);
    }

    #[test]
    fn out_of_range_state_is_skipped_without_partial_counts() {
        let mut chain = MarkovChain::new(2).unwrap();
        let mut obs = Observation::labeled(vec![0, 5, 1], vec!["w"; 3]);
        assert!(!chain.learn(&mut obs));
        assert!(!obs.learned);
        assert_eq!(chain.start_counts(), &[0, 0]);
        assert_eq!(chain.marginal_counts(), &[0, 0]);
    }

    #[test]
    fn empty_state_sequence_is_skipped() {
        let mut chain = MarkovChain::new(2).unwrap();
        let mut obs = Observation::labeled(Vec::new(), Vec::<&str>::new());
        assert!(!chain.learn(&mut obs));
        assert!(!obs.learned);
    }

    #[test]
    fn state_without_outgoing_transitions_yields_zero_row() {
        // State 2 only ever ends sequences, so its row has no counts.
        let chain = trained_chain();
        assert_eq!(chain.degenerate_transition_rows(), vec![2]);
        assert!(chain.transition_row(2).iter().all(|&p| p == 0.0));
        let sum: f64 = chain.transition_row(2).iter().sum();
        assert_eq!(sum, 0.0);
    }

    #[test]
    fn untrained_chain_has_all_zero_tables() {
        let mut chain = MarkovChain::new(2).unwrap();
        chain.estimate_probabilities();
        assert!(chain.start_probs().iter().all(|&p| p == 0.0));
        assert!(!chain.start_probs().iter().any(|p| p.is_nan()));
        assert_eq!(chain.degenerate_transition_rows(), vec![0, 1]);
    }

    #[test]
    fn zero_states_is_an_error() {
        assert!(MarkovChain::new(0).is_err());
    }

    #[test]
    #[should_panic(expected = "out of range")]
    fn transition_row_rejects_out_of_range_state() {
        let chain = trained_chain();
        chain.transition_row(3);
    }

    #[test]
    #[should_panic(expected = "out of range")]
    fn transition_prob_rejects_out_of_range_target() {
        // With flat row-major storage, (1, 5) on a 3-state table would
        // otherwise silently alias into row 2.
        let chain = trained_chain();
        chain.transition_prob(1, 5);
    }
}
