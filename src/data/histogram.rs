use serde::Serialize;

/// One equal-width bin. `start` is inclusive; `end` is exclusive except for
/// the last bin, which also holds the maximum value.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HistogramBin {
    pub start: f64,
    pub end: f64,
    pub count: usize,
}

/// Bin `values` into `bins` equal-width buckets spanning their min..max.
///
/// Returns no bins for empty input. When every value is equal the buckets
/// span one unit starting at that value.
pub fn histogram(values: &[f64], bins: usize) -> Vec<HistogramBin> {
    if values.is_empty() || bins == 0 {
        return Vec::new();
    }
    let min = values.iter().copied().fold(f64::INFINITY, f64::min);
    let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let span = if max > min { max - min } else { 1.0 };
    let width = span / bins as f64;

    let mut out: Vec<HistogramBin> = (0..bins)
        .map(|i| HistogramBin {
            start: min + width * i as f64,
            end: if i + 1 == bins {
                min + span
            } else {
                min + width * (i + 1) as f64
            },
            count: 0,
        })
        .collect();

    for &v in values {
        let idx = (((v - min) / width).floor() as usize).min(bins - 1);
        out[idx].count += 1;
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_input() {
        assert!(histogram(&[], 20).is_empty());
    }

    #[test]
    fn test_counts_cover_every_value() {
        let values: Vec<f64> = (0..=100).map(f64::from).collect();
        let bins = histogram(&values, 20);
        assert_eq!(bins.len(), 20);
        assert_eq!(bins.iter().map(|b| b.count).sum::<usize>(), 101);
        assert_eq!(bins[0].start, 0.0);
        assert_eq!(bins[0].end, 5.0);
        assert_eq!(bins[19].end, 100.0);
        // 95..=100 lands in the last bin, max included.
        assert_eq!(bins[19].count, 6);
    }

    #[test]
    fn test_equal_values() {
        let bins = histogram(&[7.0, 7.0, 7.0], 20);
        assert_eq!(bins.len(), 20);
        assert_eq!(bins[0].count, 3);
        assert_eq!(bins[0].start, 7.0);
        assert_eq!(bins[19].end, 8.0);
    }

    #[test]
    fn test_bins_are_contiguous() {
        let bins = histogram(&[1.0, 2.5, 9.0], 4);
        for pair in bins.windows(2) {
            assert_eq!(pair[0].end, pair[1].start);
        }
    }
}
