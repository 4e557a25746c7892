//! Ranking with average-method tie resolution
//!
//! Ranks are 1-based; tied values all receive the mean of the positions they
//! occupy, matching the behavior the rank tests assume. Direction handling
//! ranks negated values when larger is better, so the best value always
//! holds rank 1.

/// Average-method ranks of `values`, ascending (smallest value gets rank 1).
pub fn average_ranks(values: &[f64]) -> Vec<f64> {
    let n = values.len();
    let mut order: Vec<usize> = (0..n).collect();
    order.sort_by(|&a, &b| {
        values[a]
            .partial_cmp(&values[b])
            .unwrap_or(std::cmp::Ordering::Equal)
    });

    let mut ranks = vec![0.0; n];
    let mut i = 0;
    while i < n {
        // Extend over the tie run starting at sorted position i
        let mut j = i + 1;
        while j < n && values[order[j]] == values[order[i]] {
            j += 1;
        }
        // Positions i..j (0-based) share the average of ranks i+1..=j
        let avg = (i + j + 1) as f64 / 2.0;
        for &idx in &order[i..j] {
            ranks[idx] = avg;
        }
        i = j;
    }
    ranks
}

/// Ranks with the comparison direction applied: when `maximize` is true the
/// largest value gets rank 1, otherwise the smallest does.
pub fn directed_ranks(values: &[f64], maximize: bool) -> Vec<f64> {
    if maximize {
        let negated: Vec<f64> = values.iter().map(|v| -v).collect();
        average_ranks(&negated)
    } else {
        average_ranks(values)
    }
}
