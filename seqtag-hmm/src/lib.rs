//! Discrete hidden Markov model with supervised training and four
//! interchangeable decoding strategies.
//!
//! The model learns by maximum-likelihood counting over labeled sequences:
//! start/marginal/end state counts, pairwise transition counts, and per-state
//! symbol emission counts, normalized in a single finalize pass. Decoding is
//! pluggable behind [`InferStrategy`]:
//!
//! - [`Naive`] — pointwise `argmax P(w|k) * P(k)`, ignores context
//! - [`ForwardBackward`] — position-wise posterior over the whole sequence
//! - [`Viterbi`] — the single most probable state sequence
//! - [`Sampling`] — a stochastic forward draw, seedable for reproducibility
//!
//! The symbol vocabulary is open: decoding symbols never seen in training is
//! routine and handled with a floor probability, never an error. Training on
//! malformed sequences (missing labels, length mismatches) is a silent skip,
//! so noisy corpora still train.
//!
//! # Quick start
//!
//! ```
//! use seqtag_hmm::{Hmm, Observation, Viterbi};
//!
//! // States 0, 1, 2 might be DET, NOUN, VERB; the model only sees indices.
//! let mut model = Hmm::new(3)?;
//! let mut sentence = Observation::labeled(vec![0, 1, 2], vec!["the", "dog", "runs"]);
//! model.learn(&mut sentence);
//! model.estimate_probabilities();
//!
//! let mut unseen = Observation::unlabeled(vec!["the", "dog", "runs"]);
//! let path = model.infer(&mut Viterbi, &mut unseen)?;
//! assert_eq!(path, vec![0, 1, 2]);
//! # Ok::<(), seqtag_core::SeqtagError>(())
//! ```

pub mod chain;
pub mod forward_backward;
pub mod model;
pub mod naive;
pub mod observation;
pub mod sampling;
pub mod strategy;
pub mod viterbi;

pub use chain::MarkovChain;
pub use forward_backward::{forward_backward, ForwardBackward};
pub use model::Hmm;
pub use naive::Naive;
pub use observation::Observation;
pub use sampling::Sampling;
pub use strategy::{InferStrategy, EMISSION_FLOOR};
pub use viterbi::Viterbi;
