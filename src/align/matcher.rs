//! Greedy longest-matching-block sequence matcher.
//!
//! A from-scratch implementation of the classic contiguous-block diff:
//! repeatedly find the longest run of equal elements, recurse into the
//! regions left and right of it, then read the gaps between matched
//! blocks as edit operations. Off-the-shelf diff crates implement Myers
//! or patience variants whose tie-breaks differ; the alignment report is
//! part of this crate's output contract, so the convention is pinned
//! here and covered by tests.
//!
//! Tie-break convention: among maximal-length common blocks, pick the
//! one starting earliest in `a`, then earliest in `b`. Adjacent blocks
//! are coalesced before opcodes are derived.

use std::collections::HashMap;
use std::hash::Hash;

/// Edit-script operation kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OpTag {
    /// `a[a_start..a_end]` equals `b[b_start..b_end]`.
    Equal,
    /// `a[a_start..a_end]` should be replaced by `b[b_start..b_end]`.
    Replace,
    /// `a[a_start..a_end]` has no counterpart in `b` (`b` range is empty).
    Delete,
    /// `b[b_start..b_end]` has no counterpart in `a` (`a` range is empty).
    Insert,
}

/// One edit-script operation over half-open index ranges.
///
/// Opcodes partition both sequences exactly: concatenating the `a`
/// ranges reconstructs `a`, likewise for `b`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Opcode {
    pub tag: OpTag,
    pub a_start: usize,
    pub a_end: usize,
    pub b_start: usize,
    pub b_end: usize,
}

/// A maximal run of equal elements: `a[a..a+len] == b[b..b+len]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Block {
    pub a: usize,
    pub b: usize,
    pub len: usize,
}

/// Compares two sequences and derives matching blocks, opcodes, and a
/// similarity ratio.
///
/// Generic over the element type so the same matcher serves token-level
/// alignment (`&[String]`) and char-level similarity (`&[char]`).
pub struct Matcher<'a, T: Eq + Hash> {
    a: &'a [T],
    b: &'a [T],
    /// Element -> ascending positions in `b`.
    b2j: HashMap<&'a T, Vec<usize>>,
}

impl<'a, T: Eq + Hash> Matcher<'a, T> {
    pub fn new(a: &'a [T], b: &'a [T]) -> Self {
        let mut b2j: HashMap<&T, Vec<usize>> = HashMap::new();
        for (j, elt) in b.iter().enumerate() {
            b2j.entry(elt).or_default().push(j);
        }
        Self { a, b, b2j }
    }

    /// Longest block of equal elements within `a[alo..ahi]` / `b[blo..bhi]`.
    ///
    /// Ties go to the block starting earliest in `a`, then earliest in
    /// `b`. Returns a zero-length block at `(alo, blo)` when the regions
    /// share nothing.
    fn find_longest_match(&self, alo: usize, ahi: usize, blo: usize, bhi: usize) -> Block {
        let mut best = Block { a: alo, b: blo, len: 0 };
        // j2len[j] = length of the longest run ending at a[i-1]/b[j].
        let mut j2len: HashMap<usize, usize> = HashMap::new();
        for i in alo..ahi {
            let mut row: HashMap<usize, usize> = HashMap::new();
            if let Some(positions) = self.b2j.get(&self.a[i]) {
                for &j in positions {
                    if j < blo {
                        continue;
                    }
                    if j >= bhi {
                        break;
                    }
                    let k = if j == blo {
                        1
                    } else {
                        j2len.get(&(j - 1)).copied().unwrap_or(0) + 1
                    };
                    row.insert(j, k);
                    // strict > keeps the earliest block on ties
                    if k > best.len {
                        best = Block {
                            a: i + 1 - k,
                            b: j + 1 - k,
                            len: k,
                        };
                    }
                }
            }
            j2len = row;
        }
        best
    }

    /// All matching blocks in ascending order, adjacent blocks coalesced,
    /// terminated by the `(len_a, len_b, 0)` sentinel.
    pub fn matching_blocks(&self) -> Vec<Block> {
        let (la, lb) = (self.a.len(), self.b.len());
        let mut queue = vec![(0usize, la, 0usize, lb)];
        let mut blocks = Vec::new();
        while let Some((alo, ahi, blo, bhi)) = queue.pop() {
            let m = self.find_longest_match(alo, ahi, blo, bhi);
            if m.len > 0 {
                if alo < m.a && blo < m.b {
                    queue.push((alo, m.a, blo, m.b));
                }
                if m.a + m.len < ahi && m.b + m.len < bhi {
                    queue.push((m.a + m.len, ahi, m.b + m.len, bhi));
                }
                blocks.push(m);
            }
        }
        blocks.sort_unstable_by_key(|bl| (bl.a, bl.b));

        let mut merged: Vec<Block> = Vec::with_capacity(blocks.len() + 1);
        for bl in blocks {
            match merged.last_mut() {
                Some(last) if last.a + last.len == bl.a && last.b + last.len == bl.b => {
                    last.len += bl.len;
                }
                _ => merged.push(bl),
            }
        }
        merged.push(Block { a: la, b: lb, len: 0 });
        merged
    }

    /// Edit script covering both sequences exactly.
    pub fn opcodes(&self) -> Vec<Opcode> {
        let (mut i, mut j) = (0usize, 0usize);
        let mut ops = Vec::new();
        for bl in self.matching_blocks() {
            let tag = match (i < bl.a, j < bl.b) {
                (true, true) => Some(OpTag::Replace),
                (true, false) => Some(OpTag::Delete),
                (false, true) => Some(OpTag::Insert),
                (false, false) => None,
            };
            if let Some(tag) = tag {
                ops.push(Opcode {
                    tag,
                    a_start: i,
                    a_end: bl.a,
                    b_start: j,
                    b_end: bl.b,
                });
            }
            i = bl.a + bl.len;
            j = bl.b + bl.len;
            if bl.len > 0 {
                ops.push(Opcode {
                    tag: OpTag::Equal,
                    a_start: bl.a,
                    a_end: i,
                    b_start: bl.b,
                    b_end: j,
                });
            }
        }
        ops
    }

    /// Similarity in `[0.0, 1.0]`: `2*M / (len_a + len_b)` where `M` is
    /// the total matched length. Two empty sequences are fully similar.
    pub fn ratio(&self) -> f64 {
        let matched: usize = self.matching_blocks().iter().map(|bl| bl.len).sum();
        let total = self.a.len() + self.b.len();
        if total == 0 {
            1.0
        } else {
            2.0 * matched as f64 / total as f64
        }
    }
}
