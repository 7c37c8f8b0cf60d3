//! Suffix array and equal-run discovery over hash sequences.

use serde::{Deserialize, Serialize};

use super::hashing::SENTINEL;

/// A stretch of cells that is identical in both revisions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct EqualRun {
    /// Flat position of the run's first cell in the old revision.
    pub a_start: usize,
    /// Flat position of the run's first cell in the new revision.
    pub b_start: usize,
    pub len: usize,
}

/// Suffix array of `seq` by prefix doubling.
pub fn suffix_array(seq: &[u64]) -> Vec<usize> {
    let n = seq.len();
    if n == 0 {
        return Vec::new();
    }

    let mut alphabet = seq.to_vec();
    alphabet.sort_unstable();
    alphabet.dedup();
    let mut rank: Vec<usize> = seq
        .iter()
        .map(|v| alphabet.binary_search(v).unwrap_or_else(|i| i))
        .collect();

    let mut sa: Vec<usize> = (0..n).collect();
    let mut next = vec![0usize; n];
    let mut k = 1;
    loop {
        // Rank pair of the suffix's first 2k symbols; 0 marks "past the end".
        let key = |rank: &[usize], i: usize| (rank[i], if i + k < n { rank[i + k] + 1 } else { 0 });
        sa.sort_unstable_by_key(|&i| key(&rank, i));

        next[sa[0]] = 0;
        for w in 1..n {
            let step = usize::from(key(&rank, sa[w - 1]) != key(&rank, sa[w]));
            next[sa[w]] = next[sa[w - 1]] + step;
        }
        std::mem::swap(&mut rank, &mut next);

        if rank[sa[n - 1]] == n - 1 || k >= n {
            break;
        }
        k *= 2;
    }
    sa
}

/// Longest common prefix of each suffix with its predecessor in `sa`
/// (Kasai et al.). `lcp[0]` is 0.
pub fn lcp_array(seq: &[u64], sa: &[usize]) -> Vec<usize> {
    let n = seq.len();
    let mut rank = vec![0usize; n];
    for (pos, &i) in sa.iter().enumerate() {
        rank[i] = pos;
    }

    let mut lcp = vec![0usize; n];
    let mut h = 0;
    for i in 0..n {
        if rank[i] == 0 {
            h = 0;
            continue;
        }
        let j = sa[rank[i] - 1];
        while i + h < n && j + h < n && seq[i + h] == seq[j + h] {
            h += 1;
        }
        lcp[rank[i]] = h;
        h = h.saturating_sub(1);
    }
    lcp
}

/// Runs of equal hashes shared by `a` and `b`.
///
/// Builds the suffix array of `a ++ [SENTINEL] ++ b` and reports every pair
/// of neighbouring suffixes that start on opposite sides of the sentinel and
/// share a non-empty prefix. Matches within one sequence are ignored.
pub fn equal_runs(a: &[u64], b: &[u64]) -> Vec<EqualRun> {
    let split = a.len();
    let mut seq = Vec::with_capacity(a.len() + b.len() + 1);
    seq.extend_from_slice(a);
    seq.push(SENTINEL);
    seq.extend_from_slice(b);

    let sa = suffix_array(&seq);
    let lcp = lcp_array(&seq, &sa);

    let mut runs = Vec::new();
    for k in 1..sa.len() {
        if lcp[k] == 0 {
            continue;
        }
        let (x, y) = (sa[k - 1], sa[k]);
        let (a_start, b_pos) = match (x < split, y < split) {
            (true, false) => (x, y),
            (false, true) => (y, x),
            _ => continue,
        };
        if b_pos <= split {
            continue;
        }
        runs.push(EqualRun {
            a_start,
            b_start: b_pos - split - 1,
            len: lcp[k],
        });
    }
    runs
}
