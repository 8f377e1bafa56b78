//! Pointwise, context-free decoding.

use std::hash::Hash;

use seqtag_core::Result;

use crate::model::Hmm;
use crate::strategy::{argmax, require_symbols, InferStrategy, EMISSION_FLOOR};

/// Naive decoder: each position is labeled independently with
/// `argmax_k P(w_i | k) * P(S_i = k)`.
///
/// The marginal state distribution stands in for a true posterior and the
/// transition structure is ignored entirely — a deliberately weak baseline
/// for the sequence-aware strategies to beat.
#[derive(Debug, Clone, Copy, Default)]
pub struct Naive;

impl<T: Hash + Eq + Clone> InferStrategy<T> for Naive {
    fn infer(&mut self, model: &Hmm<T>, symbols: &[T]) -> Result<Vec<usize>> {
        require_symbols(symbols)?;

        let k = model.state_count();
        let marginal = model.marginal_probs();
        let mut scores = vec![0.0; k];

        let path = symbols
            .iter()
            .map(|w| {
                for (j, score) in scores.iter_mut().enumerate() {
                    let e = model.p_emission(j, w).unwrap_or(EMISSION_FLOOR);
                    *score = e * marginal[j];
                }
                argmax(&scores)
            })
            .collect();

        Ok(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::observation::Observation;

    fn trained_model() -> Hmm<&'static str> {
        let mut model = Hmm::new(3).unwrap();
        let mut corpus = vec![
            Observation::labeled(vec![0, 1, 2], vec!["the", "dog", "runs"]),
            Observation::labeled(vec![0, 1, 2], vec!["the", "cat", "runs"]),
            Observation::labeled(vec![0, 1], vec!["the", "dog"]),
        ];
        model.learn_all(corpus.iter_mut());
        model.estimate_probabilities();
        model
    }

    #[test]
    fn decodes_memorized_symbols_pointwise() {
        let model = trained_model();
        let path = Naive.infer(&model, &["the", "dog", "runs"]).unwrap();
        assert_eq!(path, vec![0, 1, 2]);
    }

    #[test]
    fn position_order_does_not_matter() {
        // Context-free: shuffling the symbols shuffles the labels with them.
        let model = trained_model();
        let path = Naive.infer(&model, &["runs", "the", "dog"]).unwrap();
        assert_eq!(path, vec![2, 0, 1]);
    }

    #[test]
    fn unseen_symbol_falls_back_to_the_marginal() {
        let model = trained_model();
        // The floor is uniform across states, so an unseen symbol is labeled
        // with the most frequent state overall. States 0 and 1 tie at 3/8
        // here; the tie keeps the lowest index.
        let path = Naive.infer(&model, &["zyzzyva"]).unwrap();
        assert_eq!(path, vec![0]);
        assert_eq!(path, vec![argmax(model.marginal_probs())]);
    }

    #[test]
    fn empty_input_is_an_error() {
        let model = trained_model();
        assert!(Naive.infer(&model, &[] as &[&str]).is_err());
    }
}
