//! Shortest edit script between two token sequences.
//!
//! Linear-space refinement of the O((N+M)·D) algorithm from Myers, "An O(ND)
//! Difference Algorithm and Its Variations" (1986). Forward and backward
//! searches meet at a middle snake, which splits the problem in two; the
//! halves are solved recursively. Memory is O(N+M) regardless of how far
//! apart the inputs are.

use std::iter;
use std::ops::{Index, IndexMut};

/// One step of an edit script.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Edit {
    /// Token present in both sequences
    Equal,
    /// Token only in the old sequence
    Delete,
    /// Token only in the new sequence
    Insert,
}

/// Compute a minimal edit script turning `old` into `new`.
///
/// The result has one entry per token: `Equal` consumes one token from each
/// side, `Delete` one from `old`, `Insert` one from `new`. Within each run of
/// changes, all deletions come before all insertions.
pub fn edit_script<T: PartialEq>(old: &[T], new: &[T]) -> Vec<Edit> {
    let max_d = max_d(old.len(), new.len());
    let mut vf = Frontier::new(max_d);
    let mut vb = Frontier::new(max_d);

    let mut edits = Vec::with_capacity(old.len() + new.len());
    conquer(old, new, &mut vf, &mut vb, &mut edits);
    deletions_first(&mut edits);
    edits
}

fn max_d(n: usize, m: usize) -> usize {
    (n + m + 1) / 2 + 1
}

/// Furthest-reaching x per diagonal `k`, indexed by signed `k`.
struct Frontier {
    offset: isize,
    v: Vec<isize>,
}

impl Frontier {
    fn new(max_d: usize) -> Self {
        Self {
            offset: max_d as isize,
            v: vec![0; 2 * max_d + 1],
        }
    }
}

impl Index<isize> for Frontier {
    type Output = isize;

    fn index(&self, k: isize) -> &isize {
        &self.v[(k + self.offset) as usize]
    }
}

impl IndexMut<isize> for Frontier {
    fn index_mut(&mut self, k: isize) -> &mut isize {
        &mut self.v[(k + self.offset) as usize]
    }
}

fn conquer<T: PartialEq>(
    old: &[T],
    new: &[T],
    vf: &mut Frontier,
    vb: &mut Frontier,
    edits: &mut Vec<Edit>,
) {
    let prefix = old.iter().zip(new).take_while(|(a, b)| a == b).count();
    edits.extend(iter::repeat(Edit::Equal).take(prefix));
    let (old, new) = (&old[prefix..], &new[prefix..]);

    let suffix = old
        .iter()
        .rev()
        .zip(new.iter().rev())
        .take_while(|(a, b)| a == b)
        .count();
    let (old, new) = (&old[..old.len() - suffix], &new[..new.len() - suffix]);

    let (n, m) = (old.len(), new.len());
    if n == 0 || m == 0 {
        edits.extend(iter::repeat(Edit::Delete).take(n));
        edits.extend(iter::repeat(Edit::Insert).take(m));
    } else {
        match middle_snake(old, new, vf, vb) {
            Some((x, y)) if (x, y) != (0, 0) && (x, y) != (n, m) => {
                conquer(&old[..x], &new[..y], vf, vb, edits);
                conquer(&old[x..], &new[y..], vf, vb, edits);
            }
            _ => {
                edits.extend(iter::repeat(Edit::Delete).take(n));
                edits.extend(iter::repeat(Edit::Insert).take(m));
            }
        }
    }

    edits.extend(iter::repeat(Edit::Equal).take(suffix));
}

/// Find the point where an optimal path crosses its middle snake.
///
/// Both inputs are non-empty and differ in their first and last tokens.
fn middle_snake<T: PartialEq>(
    old: &[T],
    new: &[T],
    vf: &mut Frontier,
    vb: &mut Frontier,
) -> Option<(usize, usize)> {
    let n = old.len() as isize;
    let m = new.len() as isize;
    let delta = n - m;
    let odd = delta & 1 == 1;

    vf[1] = 0;
    vb[1] = 0;

    for d in 0..max_d(old.len(), new.len()) as isize {
        let mut k = d;
        while k >= -d {
            let mut x = if k == -d || (k != d && vf[k - 1] < vf[k + 1]) {
                vf[k + 1]
            } else {
                vf[k - 1] + 1
            };
            let mut y = x - k;
            let (x0, y0) = (x, y);

            while x < n && y < m && old[x as usize] == new[y as usize] {
                x += 1;
                y += 1;
            }
            vf[k] = x;

            if odd && (k - delta).abs() < d && vf[k] + vb[delta - k] >= n {
                return Some((x0 as usize, y0 as usize));
            }
            k -= 2;
        }

        let mut k = d;
        while k >= -d {
            let mut x = if k == -d || (k != d && vb[k - 1] < vb[k + 1]) {
                vb[k + 1]
            } else {
                vb[k - 1] + 1
            };
            let mut y = x - k;

            while x < n && y < m && old[(n - x - 1) as usize] == new[(m - y - 1) as usize] {
                x += 1;
                y += 1;
            }
            vb[k] = x;

            if !odd && (k - delta).abs() <= d && vb[k] + vf[delta - k] >= n {
                return Some(((n - x) as usize, (m - y) as usize));
            }
            k -= 2;
        }
    }

    None
}

/// Reorder each run of changes so its deletions precede its insertions.
fn deletions_first(edits: &mut [Edit]) {
    for run in edits.split_mut(|e| *e == Edit::Equal) {
        let deletes = run.iter().filter(|e| **e == Edit::Delete).count();
        let (removed, added) = run.split_at_mut(deletes);
        removed.fill(Edit::Delete);
        added.fill(Edit::Insert);
    }
}
