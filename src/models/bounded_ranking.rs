use crate::types::{DocumentId, DocumentSequence, ViewCount};
use std::cmp::{Ordering, Reverse};
use std::collections::BinaryHeap;

/// A document kept in a technology's most-viewed ranking.
#[derive(Debug, Clone, Eq)]
pub struct RankedPost {
    pub view_count: ViewCount,
    /// Position of the document in the processed stream; earlier documents win ties.
    pub sequence: DocumentSequence,
    pub document_id: DocumentId,
    /// Whitespace-normalized title.
    pub title: String,
}

impl RankedPost {
    fn rank_cmp(
        (view_count, sequence): (ViewCount, DocumentSequence),
        (other_view_count, other_sequence): (ViewCount, DocumentSequence),
    ) -> Ordering {
        view_count
            .cmp(&other_view_count)
            .then_with(|| other_sequence.cmp(&sequence))
    }
}

/// Greater means better ranked: more views, then earlier in the stream.
impl Ord for RankedPost {
    fn cmp(&self, other: &Self) -> Ordering {
        Self::rank_cmp(
            (self.view_count, self.sequence),
            (other.view_count, other.sequence),
        )
    }
}

impl PartialOrd for RankedPost {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for RankedPost {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

/// The `capacity` best-ranked posts seen so far.
///
/// Backed by a min-heap: the worst retained post sits on top and is evicted when a better
/// one arrives, so each offer costs O(log capacity) and memory never exceeds `capacity`
/// entries.
#[derive(Debug, Clone)]
pub struct BoundedRanking {
    capacity: usize,
    heap: BinaryHeap<Reverse<RankedPost>>,
}

impl BoundedRanking {
    pub fn new(capacity: usize) -> Self {
        BoundedRanking {
            capacity,
            heap: BinaryHeap::with_capacity(capacity.saturating_add(1).min(1024)),
        }
    }

    /// Offers a post to the ranking.
    ///
    /// The title is only copied when the post is actually retained.
    ///
    /// # Returns
    /// * `true` if the post entered the ranking.
    pub fn offer(
        &mut self,
        view_count: ViewCount,
        sequence: DocumentSequence,
        document_id: &str,
        title: &str,
    ) -> bool {
        if self.capacity == 0 {
            return false;
        }

        if self.heap.len() >= self.capacity {
            if let Some(Reverse(worst)) = self.heap.peek() {
                let is_better = RankedPost::rank_cmp(
                    (view_count, sequence),
                    (worst.view_count, worst.sequence),
                ) == Ordering::Greater;

                if !is_better {
                    return false;
                }
            }
        }

        self.heap.push(Reverse(RankedPost {
            view_count,
            sequence,
            document_id: document_id.to_string(),
            title: title.to_string(),
        }));

        if self.heap.len() > self.capacity {
            self.heap.pop();
        }

        true
    }

    pub fn len(&self) -> usize {
        self.heap.len()
    }

    pub fn is_empty(&self) -> bool {
        self.heap.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Drains the ranking, best first (views descending, ties in stream order).
    pub fn into_sorted_vec(self) -> Vec<RankedPost> {
        // Ascending order of `Reverse` is descending rank
        self.heap
            .into_sorted_vec()
            .into_iter()
            .map(|Reverse(ranked_post)| ranked_post)
            .collect()
    }
}
