//! Levenshtein edit distance

/// Classic dynamic-programming edit distance over chars
pub fn levenshtein(a: &str, b: &str) -> usize {
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();

    if a.is_empty() {
        return b.len();
    }
    if b.is_empty() {
        return a.len();
    }

    let mut prev: Vec<usize> = (0..=b.len()).collect();
    let mut curr = vec![0; b.len() + 1];

    for (i, &ca) in a.iter().enumerate() {
        curr[0] = i + 1;
        for (j, &cb) in b.iter().enumerate() {
            let cost = if ca == cb { 0 } else { 1 };
            curr[j + 1] = (prev[j + 1] + 1).min(curr[j] + 1).min(prev[j] + cost);
        }
        std::mem::swap(&mut prev, &mut curr);
    }

    prev[b.len()]
}

/// Edit distance if it is at most `max_edits`
///
/// Rejects on length difference before filling the table.
pub fn bounded_levenshtein(a: &str, b: &str, max_edits: usize) -> Option<usize> {
    let len_a = a.chars().count();
    let len_b = b.chars().count();
    if len_a.abs_diff(len_b) > max_edits {
        return None;
    }

    let distance = levenshtein(a, b);
    (distance <= max_edits).then_some(distance)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_levenshtein() {
        assert_eq!(levenshtein("kitten", "sitting"), 3);
        assert_eq!(levenshtein("", "abc"), 3);
        assert_eq!(levenshtein("tesla", "tesla"), 0);
        assert_eq!(levenshtein("aple", "apple"), 1);
    }

    #[test]
    fn test_bounded() {
        assert_eq!(bounded_levenshtein("msft", "msfr", 1), Some(1));
        assert_eq!(bounded_levenshtein("msft", "microsoft", 2), None);
        assert_eq!(bounded_levenshtein("abcd", "wxyz", 2), None);
    }
}
