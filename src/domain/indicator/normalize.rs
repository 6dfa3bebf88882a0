//! Min-max normalization to [0, 1].

pub fn normalize(data: &[f64]) -> Vec<f64> {
    let finite = data.iter().copied().filter(|v| v.is_finite());
    let (min, max) = finite.fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| {
        (lo.min(v), hi.max(v))
    });

    let range = max - min;
    data.iter()
        .map(|&v| {
            if !v.is_finite() {
                f64::NAN
            } else if range == 0.0 {
                0.5
            } else {
                (v - min) / range
            }
        })
        .collect()
}
