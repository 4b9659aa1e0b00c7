use crate::error::{ChartError, Result};
use crate::models::Column;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Summary statistics for one column.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Summary {
    pub count: usize,
    pub missing: usize,
    pub min: Option<f64>,
    pub max: Option<f64>,
    pub mean: Option<f64>,
    pub median: Option<f64>,
}

/// Present values only; `None` and NaN count as missing.
fn present(values: &[Option<f64>]) -> Vec<f64> {
    values
        .iter()
        .filter_map(|v| *v)
        .filter(|v| !v.is_nan())
        .collect()
}

/// Compute count/missing/min/max/mean/median over the non-missing values.
pub fn summarize(values: &[Option<f64>]) -> Summary {
    let mut vals = present(values);
    vals.sort_by(|a, b| a.total_cmp(b));
    let count = vals.len();
    let min = vals.first().cloned();
    let max = vals.last().cloned();
    let mean = if count > 0 {
        Some(vals.iter().copied().sum::<f64>() / count as f64)
    } else {
        None
    };
    let median = if count == 0 {
        None
    } else if count % 2 == 1 {
        Some(vals[count / 2])
    } else {
        Some((vals[count / 2 - 1] + vals[count / 2]) / 2.0)
    };
    Summary {
        count,
        missing: values.len() - count,
        min,
        max,
        mean,
        median,
    }
}

/// Arithmetic mean of the non-missing values.
pub fn mean(values: &[Option<f64>]) -> Result<f64> {
    summarize(values)
        .mean
        .ok_or_else(|| ChartError::InsufficientData("mean of an all-missing column".into()))
}

/// Median of the non-missing values (average of the middle pair for even counts).
pub fn median(values: &[Option<f64>]) -> Result<f64> {
    summarize(values)
        .median
        .ok_or_else(|| ChartError::InsufficientData("median of an all-missing column".into()))
}

/// Pearson correlation over rows where both sides are present.
///
/// Returns `None` with fewer than two complete pairs or when either side is constant.
pub fn pearson(a: &[Option<f64>], b: &[Option<f64>]) -> Option<f64> {
    let pairs: Vec<(f64, f64)> = a
        .iter()
        .zip(b)
        .filter_map(|(x, y)| match (x, y) {
            (Some(x), Some(y)) if !x.is_nan() && !y.is_nan() => Some((*x, *y)),
            _ => None,
        })
        .collect();
    if pairs.len() < 2 {
        return None;
    }
    let n = pairs.len() as f64;
    let mx = pairs.iter().map(|(x, _)| x).sum::<f64>() / n;
    let my = pairs.iter().map(|(_, y)| y).sum::<f64>() / n;
    let (mut sxy, mut sxx, mut syy) = (0.0, 0.0, 0.0);
    for (x, y) in &pairs {
        let dx = x - mx;
        let dy = y - my;
        sxy += dx * dy;
        sxx += dx * dx;
        syy += dy * dy;
    }
    if sxx == 0.0 || syy == 0.0 {
        return None;
    }
    Some((sxy / (sxx.sqrt() * syy.sqrt())).clamp(-1.0, 1.0))
}

/// Square matrix of pairwise correlations; `matrix[i][j]` pairs `columns[i]` with `columns[j]`.
pub fn correlation_matrix(columns: &[&[Option<f64>]]) -> Vec<Vec<Option<f64>>> {
    columns
        .iter()
        .map(|a| columns.iter().map(|b| pearson(a, b)).collect())
        .collect()
}

/// Round to two decimals, the precision correlation charts display.
pub fn round2(v: f64) -> f64 {
    (v * 100.0).round() / 100.0
}

/// Frequency of each category, most frequent first; ties keep first-seen order.
pub fn value_counts(column: &Column) -> Vec<(String, usize)> {
    let mut order: Vec<(String, usize)> = Vec::new();
    let mut index: HashMap<String, usize> = HashMap::new();
    for row in 0..column.data.len() {
        let Some(label) = column.label_at(row) else {
            continue;
        };
        match index.get(&label) {
            Some(&i) => order[i].1 += 1,
            None => {
                index.insert(label.clone(), order.len());
                order.push((label, 1));
            }
        }
    }
    // stable sort keeps first-seen order among equal counts
    order.sort_by(|a, b| b.1.cmp(&a.1));
    order
}

/// One histogram bin, `[start, end)` except the last which is closed.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bin {
    pub start: f64,
    pub end: f64,
    pub count: usize,
}

/// Sturges' rule: `ceil(log2(n)) + 1`, at least one bin.
pub fn suggest_bin_count(n: usize) -> usize {
    if n <= 1 {
        return 1;
    }
    ((n as f64).log2().ceil() as usize) + 1
}

/// Equal-width bins over the non-missing values.
pub fn histogram(values: &[Option<f64>], bins: usize) -> Vec<Bin> {
    let vals = present(values);
    if vals.is_empty() {
        return Vec::new();
    }
    let bins = bins.max(1);
    let mut lo = vals.iter().cloned().fold(f64::INFINITY, f64::min);
    let mut hi = vals.iter().cloned().fold(f64::NEG_INFINITY, f64::max);
    if (hi - lo).abs() < f64::EPSILON {
        lo -= 0.5;
        hi += 0.5;
    }
    let width = (hi - lo) / bins as f64;
    let mut out: Vec<Bin> = (0..bins)
        .map(|i| Bin {
            start: lo + i as f64 * width,
            end: lo + (i + 1) as f64 * width,
            count: 0,
        })
        .collect();
    for v in vals {
        let idx = (((v - lo) / width) as usize).min(bins - 1);
        out[idx].count += 1;
    }
    out
}

/// Five-number box summary with Tukey fences (1.5 × IQR).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BoxStats {
    pub q1: f64,
    pub median: f64,
    pub q3: f64,
    /// Smallest value inside the lower fence.
    pub lower_whisker: f64,
    /// Largest value inside the upper fence.
    pub upper_whisker: f64,
    pub outliers: Vec<f64>,
}

/// Linear-interpolated quantile of sorted values.
fn quantile(sorted: &[f64], p: f64) -> f64 {
    let pos = p * (sorted.len() - 1) as f64;
    let lo = pos.floor() as usize;
    let hi = pos.ceil() as usize;
    sorted[lo] + (sorted[hi] - sorted[lo]) * (pos - lo as f64)
}

/// Quartiles, whiskers and outliers of the non-missing values; `None` when all are missing.
pub fn box_stats(values: &[Option<f64>]) -> Option<BoxStats> {
    let mut vals = present(values);
    if vals.is_empty() {
        return None;
    }
    vals.sort_by(|a, b| a.total_cmp(b));
    let q1 = quantile(&vals, 0.25);
    let q3 = quantile(&vals, 0.75);
    let iqr = q3 - q1;
    let (lo_fence, hi_fence) = (q1 - 1.5 * iqr, q3 + 1.5 * iqr);
    let inside = |v: &&f64| **v >= lo_fence && **v <= hi_fence;
    let lower_whisker = vals.iter().find(inside).copied().unwrap_or(q1);
    let upper_whisker = vals.iter().rev().find(inside).copied().unwrap_or(q3);
    let outliers = vals
        .iter()
        .copied()
        .filter(|v| *v < lo_fence || *v > hi_fence)
        .collect();
    Some(BoxStats {
        q1,
        median: quantile(&vals, 0.5),
        q3,
        lower_whisker,
        upper_whisker,
        outliers,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn median_even_and_odd() {
        assert_eq!(median(&[Some(3.0), Some(1.0), Some(2.0)]).unwrap(), 2.0);
        assert_eq!(
            median(&[Some(4.0), None, Some(1.0), Some(2.0), Some(3.0)]).unwrap(),
            2.5
        );
    }

    #[test]
    fn all_missing_is_insufficient() {
        let err = mean(&[None, None]).unwrap_err();
        assert!(matches!(err, ChartError::InsufficientData(_)));
        assert!(median(&[Some(f64::NAN)]).is_err());
    }

    #[test]
    fn pearson_perfect_and_constant() {
        let a = [Some(1.0), Some(2.0), Some(3.0)];
        let b = [Some(2.0), Some(4.0), Some(6.0)];
        let c = [Some(3.0), Some(2.0), Some(1.0)];
        let k = [Some(5.0), Some(5.0), Some(5.0)];
        assert!((pearson(&a, &b).unwrap() - 1.0).abs() < 1e-12);
        assert!((pearson(&a, &c).unwrap() + 1.0).abs() < 1e-12);
        assert_eq!(pearson(&a, &k), None);
    }

    #[test]
    fn histogram_counts_every_value() {
        let vals: Vec<Option<f64>> = (0..10).map(|i| Some(i as f64)).chain([None]).collect();
        let bins = histogram(&vals, suggest_bin_count(10));
        assert_eq!(bins.len(), 5);
        assert_eq!(bins.iter().map(|b| b.count).sum::<usize>(), 10);
        assert!((bins.last().unwrap().end - 9.0).abs() < 1e-9);
    }

    #[test]
    fn box_stats_flag_outliers() {
        let vals: Vec<Option<f64>> = [1.0, 2.0, 3.0, 4.0, 5.0, 100.0]
            .into_iter()
            .map(Some)
            .chain([None])
            .collect();
        let b = box_stats(&vals).unwrap();
        assert!((b.q1 - 2.25).abs() < 1e-9);
        assert!((b.median - 3.5).abs() < 1e-9);
        assert!((b.q3 - 4.75).abs() < 1e-9);
        assert_eq!(b.lower_whisker, 1.0);
        assert_eq!(b.upper_whisker, 5.0);
        assert_eq!(b.outliers, vec![100.0]);
        assert_eq!(box_stats(&[None]), None);
    }
}
