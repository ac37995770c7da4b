/// Nearest-rank percentile of `values`, `p` in [0, 1].
/// Reorders `values`; returns `None` when empty.
pub fn percentile(values: &mut [f64], p: f64) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    let p = p.clamp(0.0, 1.0);
    let idx = (p * (values.len() - 1) as f64).round() as usize;
    let (_, value, _) = values.select_nth_unstable_by(idx, |a, b| a.total_cmp(b));
    Some(*value)
}
