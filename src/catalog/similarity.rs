/// Cosine similarity, `1 - cosine_distance(a, b)`.
///
/// The distance is clipped to `[0, 2]`, so the result always lies in
/// `[-1, 1]`. Returns `None` when the vectors differ in length, are empty, or
/// either side is all zeros: the similarity is undefined there.
pub fn cosine_similarity(a: &[f64], b: &[f64]) -> Option<f64> {
    if a.len() != b.len() || a.is_empty() {
        return None;
    }

    let mut dot = 0.0f64;
    let mut norm_a = 0.0f64;
    let mut norm_b = 0.0f64;

    for (x, y) in a.iter().zip(b) {
        dot += x * y;
        norm_a += x * x;
        norm_b += y * y;
    }

    let denom = (norm_a * norm_b).sqrt();
    if denom == 0.0 || !denom.is_finite() {
        return None;
    }

    let distance = (1.0 - dot / denom).clamp(0.0, 2.0);
    Some(1.0 - distance)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identical_vectors_score_one() {
        let v = [0.5, 0.2, 3.0, 1.0, 1.0, 0.1, 0.05, 1000.0];
        let sim = cosine_similarity(&v, &v).unwrap();
        assert!((sim - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_orthogonal_and_opposite_vectors() {
        assert_eq!(cosine_similarity(&[1.0, 0.0], &[0.0, 1.0]), Some(0.0));
        let opposite = cosine_similarity(&[1.0, 2.0], &[-1.0, -2.0]).unwrap();
        assert!((opposite + 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_scale_invariant() {
        let a = cosine_similarity(&[1.0, 2.0, 3.0], &[2.0, 4.0, 6.0]).unwrap();
        assert!((a - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_degenerate_inputs_are_undefined() {
        assert_eq!(cosine_similarity(&[0.0, 0.0], &[1.0, 2.0]), None);
        assert_eq!(cosine_similarity(&[1.0, 2.0], &[0.0, 0.0]), None);
        assert_eq!(cosine_similarity(&[], &[]), None);
        assert_eq!(cosine_similarity(&[1.0], &[1.0, 2.0]), None);
    }

    #[test]
    fn test_result_stays_in_range() {
        let sim = cosine_similarity(&[1e-300, 1.0], &[1e-300, 1.0]).unwrap();
        assert!((-1.0..=1.0).contains(&sim));
    }
}
