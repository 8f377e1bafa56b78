//! A single training or decoding example.

/// One example: an ordered sequence of symbols, optionally aligned with the
/// hidden state sequence that produced it.
///
/// `states` and `symbols` must have equal lengths for the example to count as
/// training data, but the invariant is checked at the learning boundary, not
/// here — noisy corpora must remain representable so that malformed lines can
/// be skipped instead of aborting a training run.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Observation<T> {
    /// Hidden state indices, when known (length `n`).
    pub states: Option<Vec<usize>>,
    /// Observed symbols (length `n`).
    pub symbols: Vec<T>,
    /// Whether this exact object has already contributed to training counts.
    /// Guards against double counting when the same object is passed to
    /// `learn` more than once.
    pub learned: bool,
}

impl<T> Observation<T> {
    /// A labeled example, suitable for training.
    pub fn labeled(states: Vec<usize>, symbols: Vec<T>) -> Self {
        Self {
            states: Some(states),
            symbols,
            learned: false,
        }
    }

    /// An unlabeled example, suitable only for decoding.
    pub fn unlabeled(symbols: Vec<T>) -> Self {
        Self {
            states: None,
            symbols,
            learned: false,
        }
    }

    /// Number of positions in the symbol sequence.
    pub fn len(&self) -> usize {
        self.symbols.len()
    }

    /// Whether the symbol sequence is empty.
    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }
}
