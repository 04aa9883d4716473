//! Small descriptive statistics over score vectors.

pub fn mean(values: &[f32]) -> f32 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().sum::<f32>() / values.len() as f32
}

/// Population variance.
pub fn variance(values: &[f32]) -> f32 {
    if values.is_empty() {
        return 0.0;
    }
    let m = mean(values);
    values.iter().map(|v| (v - m).powi(2)).sum::<f32>() / values.len() as f32
}

/// Sample standard deviation (`n - 1` denominator); `0.0` below two values.
pub fn sample_std(values: &[f32]) -> f32 {
    if values.len() < 2 {
        return 0.0;
    }
    let m = mean(values);
    let ss: f32 = values.iter().map(|v| (v - m).powi(2)).sum();
    (ss / (values.len() - 1) as f32).sqrt()
}

pub fn max(values: &[f32]) -> f32 {
    values.iter().copied().fold(f32::NEG_INFINITY, f32::max).max(0.0)
}

pub fn min(values: &[f32]) -> f32 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().copied().fold(f32::INFINITY, f32::min)
}

/// Pearson correlation; `None` when either side is constant or lengths differ.
pub fn pearson(a: &[f32], b: &[f32]) -> Option<f32> {
    if a.len() != b.len() || a.len() < 2 {
        return None;
    }
    let ma = mean(a);
    let mb = mean(b);

    let mut cov = 0.0f32;
    let mut va = 0.0f32;
    let mut vb = 0.0f32;
    for (x, y) in a.iter().zip(b) {
        let dx = x - ma;
        let dy = y - mb;
        cov += dx * dy;
        va += dx * dx;
        vb += dy * dy;
    }

    let denom = (va * vb).sqrt();
    if denom <= f32::EPSILON {
        return None;
    }
    let r = cov / denom;
    r.is_finite().then(|| r.clamp(-1.0, 1.0))
}

/// Scores sorted descending.
pub fn sorted_desc(values: &[f32]) -> Vec<f32> {
    let mut sorted = values.to_vec();
    sorted.sort_by(|a, b| b.partial_cmp(a).unwrap_or(std::cmp::Ordering::Equal));
    sorted
}
