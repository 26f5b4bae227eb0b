//! Partitioned top-N extraction with a total-order tie-break.
//!
//! Entries are grouped by partition and ranked within each partition by
//! measure descending, ties broken by entity ascending. Ranks are row
//! numbers starting at 1, so no two entries in a partition share a rank
//! and the output is identical across runs.

use std::cmp::Ordering;

/// One candidate: an entity's measure inside a partition
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RankedEntry<P, E> {
    pub partition: P,
    pub entity: E,
    pub measure: i64,
}

/// A kept entry with its 1-based rank inside its partition
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Ranked<P, E> {
    pub partition: P,
    pub entity: E,
    pub measure: i64,
    pub rank: u32,
}

fn rank_order<P: Ord, E: Ord>(a: &RankedEntry<P, E>, b: &RankedEntry<P, E>) -> Ordering {
    a.partition
        .cmp(&b.partition)
        .then_with(|| b.measure.cmp(&a.measure))
        .then_with(|| a.entity.cmp(&b.entity))
}

/// Keep the `n` highest-measure entries of every partition.
///
/// Output is ordered by partition ascending, then rank. `n == 0` yields
/// nothing; partitions with fewer than `n` entries keep all of them.
pub fn top_n<P, E>(mut entries: Vec<RankedEntry<P, E>>, n: usize) -> Vec<Ranked<P, E>>
where
    P: Ord + Clone,
    E: Ord,
{
    if n == 0 {
        return Vec::new();
    }

    entries.sort_by(rank_order);

    let mut kept = Vec::new();
    let mut current: Option<P> = None;
    let mut rank = 0u32;

    for entry in entries {
        if current.as_ref() == Some(&entry.partition) {
            rank += 1;
        } else {
            current = Some(entry.partition.clone());
            rank = 1;
        }

        if rank as usize <= n {
            kept.push(Ranked {
                partition: entry.partition,
                entity: entry.entity,
                measure: entry.measure,
                rank,
            });
        }
    }

    kept
}
