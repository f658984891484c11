//! Agglomerative complete-link clustering.
//!
//! Bottom-up merging over a fixed document set: every document starts as a
//! singleton cluster, and each step folds the globally most similar pair into
//! one. Cluster records live in an arena indexed by a stable id; an absorbed
//! record is tombstoned, never removed, so ids are unique for the whole run.
//!
//! The per-step cost stays linear in the number of active clusters: every
//! cluster keeps a priority list of its known neighbors in descending
//! similarity, so the global best pair is found by comparing list heads.
//! A merge only touches the similarity entries and list positions involving
//! the merged pair, not the whole table.

use std::cmp::Ordering;

use serde::{Deserialize, Serialize};

use crate::cluster::partition::{Partition, PartitionCluster};
use crate::cluster::similarity::SimilarityTable;
use crate::error::{Error, Result};

/// One cluster slot in the arena.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClusterRecord {
    /// Original document ids absorbed into this cluster.
    pub members: Vec<usize>,
    /// Cleared when the cluster is absorbed; the slot stays behind as a
    /// tombstone so ids are never reused.
    pub active: bool,
}

/// A single merge performed by the engine.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Merge {
    /// Lower id; keeps the union.
    pub winner: usize,
    /// Higher id; tombstoned.
    pub absorbed: usize,
    /// Similarity of the pair at the time of the merge.
    pub similarity: f64,
}

/// Agglomerative clustering engine using the complete-link recombination
/// rule: after merging, the similarity of the union to any other cluster is
/// the *minimum* of the two previous similarities, so two clusters only look
/// close once their farthest members are close.
#[derive(Debug, Clone)]
pub struct ClusterEngine {
    records: Vec<ClusterRecord>,
    sims: SimilarityTable,
    /// Per cluster, neighbor ids in descending similarity. A list only ever
    /// holds ids greater than its owner, mirroring the triangular table.
    priority: Vec<Vec<usize>>,
    active_count: usize,
}

impl ClusterEngine {
    /// Build the initial state: one singleton cluster per document, priority
    /// lists seeded from the similarity rows.
    pub fn new(sims: SimilarityTable) -> Result<Self> {
        let n = sims.len();
        if n == 0 {
            return Err(Error::EmptyCorpus);
        }

        let records = (0..n)
            .map(|id| ClusterRecord {
                members: vec![id],
                active: true,
            })
            .collect();

        let mut priority = Vec::with_capacity(n);
        for i in 0..n {
            let mut entries: Vec<(usize, f64)> = sims.row(i).collect();
            entries.sort_by(|a, b| {
                b.1.partial_cmp(&a.1)
                    .unwrap_or(Ordering::Equal)
                    .then(a.0.cmp(&b.0))
            });
            priority.push(entries.into_iter().map(|(id, _)| id).collect());
        }

        Ok(Self {
            records,
            sims,
            priority,
            active_count: n,
        })
    }

    /// Number of clusters still active.
    #[inline]
    pub fn active_count(&self) -> usize {
        self.active_count
    }

    /// Ids of the active clusters, ascending.
    pub fn active_clusters(&self) -> Vec<usize> {
        self.records
            .iter()
            .enumerate()
            .filter(|(_, r)| r.active)
            .map(|(id, _)| id)
            .collect()
    }

    /// Arena record for a cluster id.
    pub fn record(&self, id: usize) -> Option<&ClusterRecord> {
        self.records.get(id)
    }

    /// The globally best merge candidate: scan every active cluster's list
    /// head and keep the maximum. Comparison is strict, so on ties the pair
    /// seen first in ascending-id scan order wins; that scan order is what
    /// makes the whole run deterministic. A cluster with an empty list is
    /// skipped (only the last remaining cluster can end up that way).
    pub fn best_pair(&self) -> Result<Option<Merge>> {
        let mut best: Option<Merge> = None;
        for i in 0..self.records.len() {
            if !self.records[i].active {
                continue;
            }
            let Some(&top) = self.priority[i].first() else {
                continue;
            };
            let (lo, hi) = if i < top { (i, top) } else { (top, i) };
            let similarity = self
                .sims
                .get(lo, hi)
                .ok_or(Error::MissingSimilarity { lower: lo, higher: hi })?;
            if best.map_or(true, |b| similarity > b.similarity) {
                best = Some(Merge {
                    winner: lo,
                    absorbed: hi,
                    similarity,
                });
            }
        }
        Ok(best)
    }

    /// Perform one merge; `Ok(None)` once no pair is left.
    ///
    /// Only the entries involving the merged pair are touched: every other
    /// active cluster `x` gets `sim(i, x) = min(sim(i, x), sim(j, x))`, the
    /// absorbed id is dropped from every list and from the table, and the
    /// updated pair is re-inserted at its rank-correct position.
    pub fn merge_step(&mut self) -> Result<Option<Merge>> {
        let Some(merge) = self.best_pair()? else {
            return Ok(None);
        };
        let (i, j) = (merge.winner, merge.absorbed);

        let absorbed_members = std::mem::take(&mut self.records[j].members);
        self.records[i].members.extend(absorbed_members);
        self.records[j].active = false;
        self.active_count -= 1;
        self.priority[i].clear();
        self.priority[j].clear();

        for x in 0..self.records.len() {
            if !self.records[x].active || x == i {
                continue;
            }
            if x < j {
                self.remove_neighbor(x, j)?;
            }
            if x < i {
                self.remove_neighbor(x, i)?;
                let merged = self.complete_link(x, i, j)?;
                self.sims.set(x, i, merged);
                self.insert_ranked(x, i, merged)?;
            } else {
                let merged = self.complete_link(x, i, j)?;
                self.sims.set(i, x, merged);
                self.insert_ranked(i, x, merged)?;
            }
        }
        self.sims.retire(j);

        Ok(Some(merge))
    }

    /// Run merges until the smallest checkpoint, snapshotting the partition
    /// whenever the active count hits a checkpoint value.
    ///
    /// Checkpoints must be strictly descending and at least 1, e.g.
    /// `[20, 13, 8]`.
    pub fn run(&mut self, checkpoints: &[usize]) -> Result<Vec<Partition>> {
        if checkpoints.is_empty() {
            return Err(Error::InvalidCheckpoints("no checkpoints given".into()));
        }
        if checkpoints.contains(&0) {
            return Err(Error::InvalidCheckpoints("checkpoint of 0".into()));
        }
        if checkpoints.windows(2).any(|w| w[0] <= w[1]) {
            return Err(Error::InvalidCheckpoints(
                "checkpoints must be strictly descending".into(),
            ));
        }

        let stop = checkpoints[checkpoints.len() - 1];
        let mut snapshots = Vec::new();
        while self.active_count > stop {
            if self.merge_step()?.is_none() {
                break;
            }
            if checkpoints.contains(&self.active_count) {
                snapshots.push(self.partition());
            }
        }
        Ok(snapshots)
    }

    /// Current partition: active clusters ascending by id, members sorted.
    pub fn partition(&self) -> Partition {
        let clusters = self
            .records
            .iter()
            .enumerate()
            .filter(|(_, r)| r.active)
            .map(|(id, r)| {
                let mut members = r.members.clone();
                members.sort_unstable();
                PartitionCluster { id, members }
            })
            .collect();
        Partition { clusters }
    }

    /// Complete-link similarity of `x` against the union of `i` and `j`,
    /// read from the table before either entry is rewritten.
    fn complete_link(&self, x: usize, i: usize, j: usize) -> Result<f64> {
        let via_i = self.pair_sim(x, i)?;
        let via_j = self.pair_sim(x, j)?;
        Ok(via_i.min(via_j))
    }

    fn pair_sim(&self, a: usize, b: usize) -> Result<f64> {
        let (lo, hi) = if a < b { (a, b) } else { (b, a) };
        self.sims
            .get(lo, hi)
            .ok_or(Error::MissingSimilarity { lower: lo, higher: hi })
    }

    /// Drop `id` from the list of `owner`. Its absence means the bookkeeping
    /// already went wrong, which must surface, not be papered over.
    fn remove_neighbor(&mut self, owner: usize, id: usize) -> Result<()> {
        let list = &mut self.priority[owner];
        match list.iter().position(|&entry| entry == id) {
            Some(pos) => {
                list.remove(pos);
                Ok(())
            }
            None => Err(Error::CorruptPriority {
                cluster: owner,
                missing: id,
            }),
        }
    }

    /// Insert `id` into the list of `owner` keeping descending similarity:
    /// a linear scan to the first entry that does not beat `value`. Ties
    /// place the new entry first; if every entry beats it, it goes last.
    fn insert_ranked(&mut self, owner: usize, id: usize, value: f64) -> Result<()> {
        let pos = {
            let list = &self.priority[owner];
            let mut pos = list.len();
            for (idx, &other) in list.iter().enumerate() {
                if self.pair_sim(owner, other)? <= value {
                    pos = idx;
                    break;
                }
            }
            pos
        };
        self.priority[owner].insert(pos, id);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Engine over an explicit upper-triangular similarity listing.
    fn engine_from_pairs(n: usize, pairs: &[(usize, usize, f64)]) -> ClusterEngine {
        let mut table = SimilarityTable::from_vectors(&vec![vec![1.0]; n]).unwrap();
        for i in 0..n {
            for j in (i + 1)..n {
                table.set(i, j, 0.0);
            }
        }
        for &(a, b, s) in pairs {
            table.set(a, b, s);
        }
        ClusterEngine::new(table).unwrap()
    }

    /// The five-document fixture: documents 0 and 1 share one topic,
    /// 2, 3 and 4 chain through another.
    fn five_doc_vectors() -> Vec<Vec<f64>> {
        vec![
            vec![1.0, 0.0, 0.0],
            vec![1.0, 0.0, 0.0],
            vec![0.0, 1.0, 0.0],
            vec![0.0, 1.0, 1.0],
            vec![0.0, 0.0, 1.0],
        ]
    }

    fn assert_exact_partition(engine: &ClusterEngine, n: usize) {
        let mut seen: Vec<usize> = engine
            .active_clusters()
            .iter()
            .flat_map(|&id| engine.record(id).unwrap().members.clone())
            .collect();
        seen.sort_unstable();
        assert_eq!(seen, (0..n).collect::<Vec<_>>());
    }

    #[test]
    fn test_initial_state_is_singletons() {
        let engine = engine_from_pairs(3, &[(0, 1, 0.5), (0, 2, 0.2), (1, 2, 0.9)]);
        assert_eq!(engine.active_count(), 3);
        assert_eq!(engine.active_clusters(), vec![0, 1, 2]);
        assert_exact_partition(&engine, 3);
    }

    #[test]
    fn test_best_pair_takes_global_maximum() {
        let engine = engine_from_pairs(3, &[(0, 1, 0.5), (0, 2, 0.2), (1, 2, 0.9)]);
        let best = engine.best_pair().unwrap().unwrap();
        assert_eq!((best.winner, best.absorbed), (1, 2));
        assert!((best.similarity - 0.9).abs() < 1e-12);
    }

    #[test]
    fn test_tie_resolved_by_scan_order() {
        // (0,1) and (2,3) tie; the scan hits cluster 0 first.
        let engine = engine_from_pairs(4, &[(0, 1, 0.7), (2, 3, 0.7)]);
        let best = engine.best_pair().unwrap().unwrap();
        assert_eq!((best.winner, best.absorbed), (0, 1));
    }

    #[test]
    fn test_merge_keeps_lower_id_and_tombstones_higher() {
        let mut engine = engine_from_pairs(3, &[(0, 1, 0.9), (0, 2, 0.1), (1, 2, 0.4)]);
        let merge = engine.merge_step().unwrap().unwrap();
        assert_eq!(merge.winner, 0);
        assert_eq!(merge.absorbed, 1);
        assert_eq!(engine.active_count(), 2);
        assert!(!engine.record(1).unwrap().active);
        assert!(engine.record(1).unwrap().members.is_empty());
        let mut members = engine.record(0).unwrap().members.clone();
        members.sort_unstable();
        assert_eq!(members, vec![0, 1]);
    }

    #[test]
    fn test_complete_link_takes_minimum() {
        let mut engine = engine_from_pairs(3, &[(0, 1, 0.9), (0, 2, 0.8), (1, 2, 0.1)]);
        engine.merge_step().unwrap();
        // sim({0,1}, {2}) = min(0.8, 0.1)
        assert!((engine.pair_sim(0, 2).unwrap() - 0.1).abs() < 1e-12);
    }

    #[test]
    fn test_partition_exact_at_every_step() {
        let table = SimilarityTable::from_vectors(&five_doc_vectors()).unwrap();
        let mut engine = ClusterEngine::new(table).unwrap();
        assert_exact_partition(&engine, 5);
        while engine.merge_step().unwrap().is_some() {
            assert_exact_partition(&engine, 5);
        }
        assert_eq!(engine.active_count(), 1);
    }

    #[test]
    fn test_each_merge_is_maximal_among_available() {
        let table = SimilarityTable::from_vectors(&five_doc_vectors()).unwrap();
        let mut engine = ClusterEngine::new(table).unwrap();
        loop {
            // Independent scan of every active cluster's full candidate set.
            let active = engine.active_clusters();
            let mut available = f64::NEG_INFINITY;
            for (ai, &a) in active.iter().enumerate() {
                for &b in &active[ai + 1..] {
                    if let Some(s) = engine.sims.get(a, b) {
                        available = available.max(s);
                    }
                }
            }
            match engine.merge_step().unwrap() {
                Some(merge) => assert!((merge.similarity - available).abs() < 1e-12),
                None => break,
            }
        }
    }

    #[test]
    fn test_checkpoints_four_and_two_over_five_singletons() {
        let table = SimilarityTable::from_vectors(&five_doc_vectors()).unwrap();
        let mut engine = ClusterEngine::new(table).unwrap();
        let snapshots = engine.run(&[4, 2]).unwrap();
        assert_eq!(snapshots.len(), 2);
        assert_eq!(snapshots[0].n_clusters(), 4);
        assert_eq!(snapshots[1].n_clusters(), 2);
        // Halted at the smallest checkpoint, not merged to completion.
        assert_eq!(engine.active_count(), 2);
    }

    #[test]
    fn test_five_doc_trace_byte_for_byte() {
        // cos(0,1) = 1 merges first; then cos(2,3) = cos(3,4) = 1/sqrt(2)
        // ties and the scan picks (2,3); the final merge folds the rest.
        let table = SimilarityTable::from_vectors(&five_doc_vectors()).unwrap();
        let mut engine = ClusterEngine::new(table).unwrap();
        let snapshots = engine.run(&[4, 2]).unwrap();
        assert_eq!(snapshots[0].to_string(), "1\n2\n\n3\n\n4\n\n5\n\n");
        assert_eq!(snapshots[1].to_string(), "1\n2\n3\n4\n\n5\n\n");
    }

    #[test]
    fn test_invalid_checkpoints_rejected() {
        let engine = || {
            let table = SimilarityTable::from_vectors(&five_doc_vectors()).unwrap();
            ClusterEngine::new(table).unwrap()
        };
        assert!(engine().run(&[]).is_err());
        assert!(engine().run(&[2, 4]).is_err());
        assert!(engine().run(&[3, 0]).is_err());
    }

    #[test]
    fn test_single_document_runs_out_of_pairs() {
        let mut engine = engine_from_pairs(1, &[]);
        assert!(engine.merge_step().unwrap().is_none());
        assert_eq!(engine.active_count(), 1);
    }
}
