//! Longest-common-subsequence diffing over word arrays. Downstream
//! reconciliation depends on which side "owns" a difference, so the
//! backtrack tie-break below is load-bearing, not cosmetic.

/// Result of an LCS computation: the matched subsequence plus the
/// indices into `a` and `b` it was found at, both ascending.
#[derive(Debug, Clone, PartialEq)]
pub struct Lcs {
    pub lcs: Vec<String>,
    pub a_indices: Vec<usize>,
    pub b_indices: Vec<usize>,
}

/// Standard DP-table LCS with a deterministic backtrack tie-break:
/// prefer moving up (decrementing `i`) when `dp[i-1][j] > dp[i][j-1]`,
/// otherwise move left.
pub fn compute_lcs<A: AsRef<str>, B: AsRef<str>>(a: &[A], b: &[B]) -> Lcs {
    let n = a.len();
    let m = b.len();
    let mut dp = vec![vec![0usize; m + 1]; n + 1];

    for i in 1..=n {
        for j in 1..=m {
            dp[i][j] = if a[i - 1].as_ref() == b[j - 1].as_ref() {
                dp[i - 1][j - 1] + 1
            } else {
                dp[i - 1][j].max(dp[i][j - 1])
            };
        }
    }

    let mut lcs = Vec::new();
    let mut a_indices = Vec::new();
    let mut b_indices = Vec::new();
    let (mut i, mut j) = (n, m);

    while i > 0 && j > 0 {
        if a[i - 1].as_ref() == b[j - 1].as_ref() {
            lcs.push(a[i - 1].as_ref().to_string());
            a_indices.push(i - 1);
            b_indices.push(j - 1);
            i -= 1;
            j -= 1;
        } else if dp[i - 1][j] > dp[i][j - 1] {
            i -= 1;
        } else {
            j -= 1;
        }
    }

    lcs.reverse();
    a_indices.reverse();
    b_indices.reverse();

    Lcs {
        lcs,
        a_indices,
        b_indices,
    }
}

/// One step of a word-array diff, tagged with the original and/or
/// patched index it came from.
#[derive(Debug, Clone, PartialEq)]
pub enum DiffOp {
    Keep {
        orig_idx: usize,
        patch_idx: usize,
        word: String,
    },
    Remove {
        orig_idx: usize,
        word: String,
    },
    Add {
        patch_idx: usize,
        word: String,
    },
}

/// Walk `original` and `patched` as a single left-to-right pass,
/// consuming both arrays per the LCS alignment. Never stalls: once both
/// pointers are past the LCS, any remaining elements are emitted as
/// REMOVE/ADD.
pub fn compute_diff<A: AsRef<str>, B: AsRef<str>>(original: &[A], patched: &[B]) -> Vec<DiffOp> {
    let Lcs {
        a_indices, b_indices, ..
    } = compute_lcs(original, patched);

    let mut ops = Vec::new();
    let (mut oi, mut pi, mut k) = (0usize, 0usize, 0usize);

    while oi < original.len() || pi < patched.len() {
        let on_keep = k < a_indices.len() && oi == a_indices[k] && pi == b_indices[k];

        if on_keep {
            ops.push(DiffOp::Keep {
                orig_idx: oi,
                patch_idx: pi,
                word: patched[pi].as_ref().to_string(),
            });
            oi += 1;
            pi += 1;
            k += 1;
        } else if oi < original.len() && (k >= a_indices.len() || oi < a_indices[k]) {
            ops.push(DiffOp::Remove {
                orig_idx: oi,
                word: original[oi].as_ref().to_string(),
            });
            oi += 1;
        } else if pi < patched.len() {
            ops.push(DiffOp::Add {
                patch_idx: pi,
                word: patched[pi].as_ref().to_string(),
            });
            pi += 1;
        } else if oi < original.len() {
            // Residual original elements with no patched counterpart left.
            ops.push(DiffOp::Remove {
                orig_idx: oi,
                word: original[oi].as_ref().to_string(),
            });
            oi += 1;
        } else {
            break;
        }
    }

    ops
}
