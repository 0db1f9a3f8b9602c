use ndarray::Array2;

/// Minimum number of single-item insertions, deletions and substitutions turning `a` into `b`.
pub fn levenshtein<T: PartialEq>(a: &[T], b: &[T]) -> usize {
    if a.is_empty() {
        return b.len();
    }
    if b.is_empty() {
        return a.len();
    }
    let mut previous: Vec<usize> = (0..=b.len()).collect();
    let mut current = vec![0; b.len() + 1];
    for (i, left) in a.iter().enumerate() {
        current[0] = i + 1;
        for (j, right) in b.iter().enumerate() {
            current[j + 1] = if left == right {
                previous[j]
            } else {
                1 + previous[j].min(previous[j + 1]).min(current[j])
            };
        }
        std::mem::swap(&mut previous, &mut current);
    }
    previous[b.len()]
}

/// Character-level edit distance.
pub fn levenshtein_str(a: &str, b: &str) -> usize {
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();
    levenshtein(&a, &b)
}

/// Full DP table `D[i][j]` over prefixes of `rows` (length i) and `cols` (length j).
pub(crate) fn edit_table<T: PartialEq>(rows: &[T], cols: &[T]) -> Array2<usize> {
    let mut table = Array2::zeros((rows.len() + 1, cols.len() + 1));
    for i in 0..=rows.len() {
        table[[i, 0]] = i;
    }
    for j in 0..=cols.len() {
        table[[0, j]] = j;
    }
    for i in 1..=rows.len() {
        for j in 1..=cols.len() {
            table[[i, j]] = if rows[i - 1] == cols[j - 1] {
                table[[i - 1, j - 1]]
            } else {
                1 + table[[i - 1, j]]
                    .min(table[[i, j - 1]])
                    .min(table[[i - 1, j - 1]])
            };
        }
    }
    table
}
