//! Percentile helpers over relation counts.
//!
//! Thresholds use the exclusive quantile method: the sorted samples are
//! treated as cut points of `n` equally likely intervals and the requested
//! point is interpolated between its two nearest neighbours. All
//! interpolation happens in exact integer math so results are identical on
//! every platform.

pub(crate) const QUANTILE_FACTOR: usize = 100;

/// Mean and median of the dependency counters, for the summary footer.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DependencyStats {
    pub mean: f64,
    pub median: f64,
}

/// Interpolated cut point `cut` of an `n`-interval partition of `values`.
///
/// Fewer than two samples carry no spread, so they yield zero. Cut points
/// near the edges extrapolate beyond the observed range and may come out
/// negative; callers clamp as needed.
fn exclusive_quantile(values: &[usize], n: usize, cut: usize) -> i64 {
    if values.len() < 2 {
        return 0;
    }
    let mut data: Vec<i128> = values.iter().map(|&value| value as i128).collect();
    data.sort_unstable();
    let ld = data.len() as i128;
    let n = n as i128;
    let i = cut as i128 + 1;
    let j = (i * (ld + 1) / n).clamp(1, ld - 1);
    let delta = i * (ld + 1) - j * n;
    let low = data[(j - 1) as usize];
    let high = data[j as usize];
    ((low * (n - delta) + high * delta) / n) as i64
}

/// Threshold separating the hottest children of a package from the rest,
/// taken at `percentile` over the child totals.
pub(crate) fn children_quantile(totals: &[usize], percentile: usize) -> usize {
    let cut = percentile.saturating_sub(1);
    exclusive_quantile(totals, QUANTILE_FACTOR + 1, cut).max(0) as usize
}

/// Global label threshold over all dependency counters.
///
/// The partition is a hundred times finer than [`children_quantile`] so
/// fractional percentiles like 99.9 select their own cut point.
pub(crate) fn dependencies_quantile(counters: &[usize], percentile: f64) -> usize {
    let scaled = (percentile * QUANTILE_FACTOR as f64) as i64;
    let cut = (scaled - 1).max(0) as usize;
    exclusive_quantile(counters, 100 * QUANTILE_FACTOR + 1, cut).max(0) as usize
}

/// Mean and median of the counter values, or `None` without any counters.
pub(crate) fn summarize(counters: &[usize]) -> Option<DependencyStats> {
    if counters.is_empty() {
        return None;
    }
    let mut values = counters.to_vec();
    values.sort_unstable();
    let sum: usize = values.iter().sum();
    let mean = sum as f64 / values.len() as f64;
    let middle = values.len() / 2;
    let median = if values.len() % 2 == 1 {
        values[middle] as f64
    } else {
        (values[middle - 1] + values[middle]) as f64 / 2.0
    };
    Some(DependencyStats { mean, median })
}
