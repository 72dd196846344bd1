/// Cosine similarity: `dot(a, b) / (‖a‖ · ‖b‖)`, each norm taken from its own vector.
///
/// Degenerate inputs are not special-cased: a zero-norm vector divides by zero and
/// yields NaN, and vectors of unequal length also yield NaN. Callers ranking on the
/// result must be prepared for NaN (see [`crate::scoring::top_k`]).
#[inline]
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    if a.len() != b.len() {
        return f32::NAN;
    }

    let (dot, norm_a_sq, norm_b_sq) = a
        .iter()
        .zip(b.iter())
        .fold((0.0f32, 0.0f32, 0.0f32), |(dot, na, nb), (&av, &bv)| {
            (dot + av * bv, na + av * av, nb + bv * bv)
        });

    dot / (norm_a_sq.sqrt() * norm_b_sq.sqrt())
}
