//! Similarity strategies
//!
//! Every strategy returns a score in `[0.0, 1.0]`, 1.0 meaning identical.
//! Comparison is case-sensitive and works on Unicode scalar values.

use strsim::{jaro_winkler, normalized_levenshtein};

/// Ratcliff/Obershelp similarity: `2 * M / T`, where `M` is the number of
/// characters in the recursively found longest common blocks and `T` the
/// combined length of both strings.
///
/// `a` is the candidate and `b` the query; ties between equally long blocks
/// go to the earliest position in `a`, then in `b`.
pub fn sequence_ratio(a: &str, b: &str) -> f64 {
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();

    let total = a.len() + b.len();
    if total == 0 {
        return 1.0;
    }
    2.0 * matching_characters(&a, &b) as f64 / total as f64
}

/// Sum of the sizes of all matching blocks
fn matching_characters(a: &[char], b: &[char]) -> usize {
    let mut total = 0;
    let mut pending = vec![(0, a.len(), 0, b.len())];

    while let Some((alo, ahi, blo, bhi)) = pending.pop() {
        let (i, j, k) = longest_match(a, b, (alo, ahi), (blo, bhi));
        if k == 0 {
            continue;
        }
        total += k;
        if alo < i && blo < j {
            pending.push((alo, i, blo, j));
        }
        if i + k < ahi && j + k < bhi {
            pending.push((i + k, ahi, j + k, bhi));
        }
    }
    total
}

/// Longest common block of `a[alo..ahi]` and `b[blo..bhi]` as
/// `(start_in_a, start_in_b, len)`
fn longest_match(
    a: &[char],
    b: &[char],
    (alo, ahi): (usize, usize),
    (blo, bhi): (usize, usize),
) -> (usize, usize, usize) {
    let width = bhi - blo + 1;
    let mut best = (alo, blo, 0);
    // run[x] = length of the common run ending at b[blo + x - 1]
    let mut prev = vec![0usize; width];
    let mut run = vec![0usize; width];

    for i in alo..ahi {
        run.iter_mut().for_each(|r| *r = 0);
        for j in blo..bhi {
            if a[i] != b[j] {
                continue;
            }
            let k = prev[j - blo] + 1;
            run[j - blo + 1] = k;
            if k > best.2 {
                best = (i + 1 - k, j + 1 - k, k);
            }
        }
        std::mem::swap(&mut prev, &mut run);
    }
    best
}

/// Normalized Levenshtein similarity: `1 - distance / max_len`
pub fn levenshtein_ratio(a: &str, b: &str) -> f64 {
    normalized_levenshtein(a, b)
}

/// Jaro-Winkler similarity, favouring shared prefixes
pub fn jaro_winkler_ratio(a: &str, b: &str) -> f64 {
    jaro_winkler(a, b)
}
