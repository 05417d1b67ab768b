use crate::types::{DocumentSequence, TechnologyIndex};
use crate::{Document, Error, Vocabulary};

/// An optional participant of the analysis pass.
///
/// Every document which passed the filter is handed to each attached consumer exactly
/// once, in corpus order, together with its deduplicated matches (possibly none).
pub trait DocumentConsumer {
    fn consume(
        &mut self,
        document: &Document,
        sequence: DocumentSequence,
        matches: &[TechnologyIndex],
        vocabulary: &Vocabulary,
    ) -> Result<(), Error>;

    /// Called once after the stream is exhausted (or the row limit was hit).
    fn finish(&mut self, vocabulary: &Vocabulary) -> Result<(), Error>;
}
