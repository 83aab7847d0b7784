//! Pairwise Pearson correlation over indicator columns

use polars::prelude::*;
use rayon::prelude::*;
use serde::Serialize;

use super::capabilities::Capabilities;
use super::columns::IndicatorGroup;
use super::frame::numeric_values;

/// A pair of columns and their correlation coefficient
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CorrelatedPair {
    pub feature1: String,
    pub feature2: String,
    pub correlation: f64,
}

/// Symmetric correlation matrix. Entries involving a zero-variance column
/// are `None`, including its diagonal cell.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct CorrelationMatrix {
    pub columns: Vec<String>,
    pub values: Vec<Vec<Option<f64>>>,
}

impl CorrelationMatrix {
    pub fn get(&self, a: &str, b: &str) -> Option<f64> {
        let i = self.columns.iter().position(|c| c == a)?;
        let j = self.columns.iter().position(|c| c == b)?;
        self.values[i][j]
    }

    /// Off-diagonal pairs with `|r| > threshold`, strongest first
    pub fn pairs_above(&self, threshold: f64) -> Vec<CorrelatedPair> {
        let n = self.columns.len();
        let mut pairs: Vec<CorrelatedPair> = (0..n)
            .flat_map(|i| ((i + 1)..n).map(move |j| (i, j)))
            .filter_map(|(i, j)| {
                let r = self.values[i][j]?;
                (r.abs() > threshold).then(|| CorrelatedPair {
                    feature1: self.columns[i].clone(),
                    feature2: self.columns[j].clone(),
                    correlation: r,
                })
            })
            .collect();

        pairs.sort_by(|a, b| {
            b.correlation
                .abs()
                .partial_cmp(&a.correlation.abs())
                .unwrap_or(std::cmp::Ordering::Equal)
        });
        pairs
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }
}

/// Pearson correlation over the positions where both values are present.
///
/// Single-pass Welford update for numerical stability. Returns `None` with
/// fewer than two complete pairs or when either side has zero variance.
pub fn pearson(xs: &[Option<f64>], ys: &[Option<f64>]) -> Option<f64> {
    let mut n = 0.0;
    let mut mean_x = 0.0;
    let mut mean_y = 0.0;
    let mut var_x = 0.0;
    let mut var_y = 0.0;
    let mut cov_xy = 0.0;

    for (x, y) in xs.iter().zip(ys.iter()) {
        let (Some(x), Some(y)) = (x, y) else {
            continue;
        };
        n += 1.0;
        let dx = x - mean_x;
        let dy = y - mean_y;
        mean_x += dx / n;
        mean_y += dy / n;
        var_x += dx * (x - mean_x);
        var_y += dy * (y - mean_y);
        cov_xy += dx * (y - mean_y);
    }

    if n < 2.0 || var_x <= 0.0 || var_y <= 0.0 {
        return None;
    }

    let r = cov_xy / (var_x.sqrt() * var_y.sqrt());
    Some(r.clamp(-1.0, 1.0))
}

/// Correlation matrix over the given columns; absent columns are skipped.
/// Pairs are computed in parallel.
pub fn correlation_matrix<S: AsRef<str>>(df: &DataFrame, columns: &[S]) -> CorrelationMatrix {
    let data: Vec<(String, Vec<Option<f64>>)> = columns
        .iter()
        .filter_map(|name| {
            let name = name.as_ref();
            numeric_values(df, name).map(|v| (name.to_string(), v))
        })
        .collect();

    let n = data.len();
    let pairs: Vec<(usize, usize)> = (0..n)
        .flat_map(|i| (i..n).map(move |j| (i, j)))
        .collect();

    let results: Vec<((usize, usize), Option<f64>)> = pairs
        .par_iter()
        .map(|&(i, j)| {
            let r = pearson(&data[i].1, &data[j].1);
            // Self-correlation is exactly 1 whenever it is defined
            let r = if i == j { r.map(|_| 1.0) } else { r };
            ((i, j), r)
        })
        .collect();

    let mut values = vec![vec![None; n]; n];
    for ((i, j), r) in results {
        values[i][j] = r;
        values[j][i] = r;
    }

    CorrelationMatrix {
        columns: data.into_iter().map(|(name, _)| name).collect(),
        values,
    }
}

/// Co-occurrence of chronic conditions within a respondent
pub fn chronic_condition_correlation(
    df: &DataFrame,
    capabilities: &Capabilities,
) -> Option<CorrelationMatrix> {
    let available = &capabilities.group(IndicatorGroup::ChronicConditions).available;
    if available.len() < 2 {
        return None;
    }
    Some(correlation_matrix(df, available))
}
