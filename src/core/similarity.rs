/// Edit distance between two strings
///
/// Counts the minimum number of single-character insertions, deletions or
/// substitutions turning `a` into `b`. Case-sensitive; callers lowercase first
/// when they want case-insensitive comparison. Operates on Unicode scalar
/// values, so an empty input yields the character count of the other.
#[inline]
pub fn levenshtein_distance(a: &str, b: &str) -> usize {
    strsim::levenshtein(a, b)
}

/// Case-insensitive similarity of two strings as a 0-100 percentage
///
/// Missing data gets no partial credit: if either side is empty the result
/// is 0. Otherwise the score is
/// `round((max_len - distance) / max_len * 100)`, clamped to 0..=100.
pub fn similarity_percentage(a: &str, b: &str) -> u8 {
    if a.is_empty() || b.is_empty() {
        return 0;
    }

    let a = a.to_lowercase();
    let b = b.to_lowercase();

    let max_len = a.chars().count().max(b.chars().count());
    let distance = levenshtein_distance(&a, &b);

    let ratio = max_len.saturating_sub(distance) as f64 / max_len as f64;

    (ratio * 100.0).round().clamp(0.0, 100.0) as u8
}
