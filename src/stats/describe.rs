//! Descriptive statistics shared by the aggregation and pairwise layers

/// Arithmetic mean. Zero for an empty sample.
pub fn mean(sample: &[f64]) -> f64 {
    if sample.is_empty() {
        return 0.0;
    }
    sample.iter().sum::<f64>() / sample.len() as f64
}

/// Sample standard deviation (n - 1 divisor). Zero below 2 samples.
pub fn sample_std(sample: &[f64]) -> f64 {
    let n = sample.len();
    if n < 2 {
        return 0.0;
    }
    let m = mean(sample);
    let ss: f64 = sample.iter().map(|x| (x - m) * (x - m)).sum();
    (ss / (n - 1) as f64).sqrt()
}

/// Quantile by linear interpolation between order statistics (the R-7
/// method, which pandas and numpy use by default). `q` in [0, 1].
pub fn quantile(sample: &[f64], q: f64) -> f64 {
    if sample.is_empty() {
        return f64::NAN;
    }
    let mut sorted = sample.to_vec();
    sorted.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));

    let h = (sorted.len() - 1) as f64 * q;
    let lo = h.floor() as usize;
    let frac = h - lo as f64;
    if lo + 1 < sorted.len() {
        sorted[lo] + frac * (sorted[lo + 1] - sorted[lo])
    } else {
        sorted[lo]
    }
}

/// Median (the 0.5 quantile).
pub fn median(sample: &[f64]) -> f64 {
    quantile(sample, 0.5)
}

/// Interquartile range, Q3 - Q1.
pub fn iqr(sample: &[f64]) -> f64 {
    quantile(sample, 0.75) - quantile(sample, 0.25)
}
