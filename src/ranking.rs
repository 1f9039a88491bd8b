use std::collections::HashMap;

use serde::Serialize;

pub const DEFAULT_CUT_SIZE: usize = 64;

/// Dense rank, lowest key first. Entries without a key stay unranked.
///
/// Stable sort then a single forward pass, so every consumer of a rank sees the
/// same value for the same player.
pub fn dense_rank<K: Ord + Copy>(keys: &[Option<K>]) -> Vec<Option<u32>> {
    let mut order: Vec<(usize, K)> = keys
        .iter()
        .enumerate()
        .filter_map(|(idx, key)| key.map(|k| (idx, k)))
        .collect();
    order.sort_by_key(|(_, k)| *k);

    let mut ranks = vec![None; keys.len()];
    let mut rank = 0u32;
    let mut prev: Option<K> = None;
    for (idx, key) in order {
        if prev != Some(key) {
            rank += 1;
            prev = Some(key);
        }
        ranks[idx] = Some(rank);
    }
    ranks
}

/// `T{rank}` for shared ranks, bare `{rank}` otherwise.
pub fn position_labels(ranks: &[Option<u32>]) -> Vec<Option<String>> {
    let mut group_sizes: HashMap<u32, usize> = HashMap::new();
    for rank in ranks.iter().flatten() {
        *group_sizes.entry(*rank).or_default() += 1;
    }
    ranks
        .iter()
        .map(|rank| {
            rank.map(|r| {
                if group_sizes.get(&r).copied().unwrap_or(0) > 1 {
                    format!("T{r}")
                } else {
                    r.to_string()
                }
            })
        })
        .collect()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CutLine {
    /// Worst TOTAL that still advances.
    pub score: u16,
    /// Players at or inside the line. Can exceed the nominal cut size on ties.
    pub size: usize,
}

pub fn cut_line(totals: &[Option<u16>], cut_size: usize) -> Option<CutLine> {
    if cut_size == 0 {
        return None;
    }
    let mut sorted: Vec<u16> = totals.iter().flatten().copied().collect();
    if sorted.is_empty() {
        return None;
    }
    sorted.sort_unstable();
    let boundary = cut_size.min(sorted.len()) - 1;
    let score = sorted[boundary];
    let size = sorted.iter().take_while(|t| **t <= score).count();
    Some(CutLine { score, size })
}

pub fn made_cut(total: Option<u16>, line: Option<CutLine>) -> bool {
    matches!((total, line), (Some(t), Some(line)) if t <= line.score)
}

/// Cut-line score minus TOTAL: positive inside the line, negative outside.
pub fn cut_margin(total: Option<u16>, line: Option<CutLine>) -> Option<i32> {
    Some(i32::from(line?.score) - i32::from(total?))
}

/// Field-wide ranks for one build, indexed like the input slices.
#[derive(Debug, Clone)]
pub struct Standings {
    pub pos_rank: Vec<Option<u32>>,
    pub pos: Vec<Option<String>>,
    pub r1_rank: Vec<Option<u32>>,
    pub cut: Option<CutLine>,
    /// Players holding a TOTAL.
    pub ranked: usize,
}

impl Standings {
    pub fn compute(totals: &[Option<u16>], r1_scores: &[Option<u16>], cut_size: usize) -> Self {
        let pos_rank = dense_rank(totals);
        let pos = position_labels(&pos_rank);
        Self {
            r1_rank: dense_rank(r1_scores),
            cut: cut_line(totals, cut_size),
            ranked: totals.iter().flatten().count(),
            pos_rank,
            pos,
        }
    }

    pub fn made_cut(&self, total: Option<u16>) -> bool {
        made_cut(total, self.cut)
    }

    pub fn cut_margin(&self, total: Option<u16>) -> Option<i32> {
        cut_margin(total, self.cut)
    }
}
