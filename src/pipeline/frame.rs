//! Column access helpers over the working DataFrame
//!
//! Aggregations read columns as plain `Option` vectors. Anything the helpers
//! cannot interpret becomes `None` rather than an error.

use polars::prelude::*;

/// Read a column as optional strings. Non-string columns are rendered with
/// [`format_number`] so numeric categories keep a stable label.
pub fn string_values(df: &DataFrame, name: &str) -> Option<Vec<Option<String>>> {
    let column = df.column(name).ok()?;
    match column.dtype() {
        DataType::String => {
            let ca = column.str().ok()?;
            Some(ca.into_iter().map(|v| v.map(str::to_string)).collect())
        }
        dtype if dtype.is_primitive_numeric() => {
            let values = numeric_values(df, name)?;
            Some(values.into_iter().map(|v| v.map(format_number)).collect())
        }
        _ => {
            let cast = column.cast(&DataType::String).ok()?;
            let ca = cast.str().ok()?;
            Some(ca.into_iter().map(|v| v.map(str::to_string)).collect())
        }
    }
}

/// Read a column as optional floats. String cells are parsed after trimming;
/// unparseable or non-finite cells become `None`.
pub fn numeric_values(df: &DataFrame, name: &str) -> Option<Vec<Option<f64>>> {
    let column = df.column(name).ok()?;
    if column.dtype() == &DataType::String {
        let ca = column.str().ok()?;
        return Some(ca.into_iter().map(|v| v.and_then(parse_number)).collect());
    }
    let cast = column.cast(&DataType::Float64).ok()?;
    let ca = cast.f64().ok()?;
    Some(
        ca.into_iter()
            .map(|v| v.filter(|x| x.is_finite()))
            .collect(),
    )
}

/// Read a 0/1 indicator column with missing cells treated as 0
pub fn indicator_values(df: &DataFrame, name: &str) -> Option<Vec<f64>> {
    numeric_values(df, name).map(|values| values.into_iter().map(|v| v.unwrap_or(0.0)).collect())
}

pub fn parse_number(raw: &str) -> Option<f64> {
    raw.trim().parse::<f64>().ok().filter(|v| v.is_finite())
}

/// Render a float the way survey answers are written: integers without a
/// fractional part, everything else as-is.
pub fn format_number(value: f64) -> String {
    if value.fract() == 0.0 && value.abs() < 1e15 {
        format!("{}", value as i64)
    } else {
        format!("{}", value)
    }
}

pub fn has_column(df: &DataFrame, name: &str) -> bool {
    df.get_column_names().iter().any(|c| c.as_str() == name)
}

/// Round to one decimal place, used for reported category shares
pub fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

/// `part / total * 100`, or 0 when the total is zero
pub fn percentage(part: f64, total: f64) -> f64 {
    if total > 0.0 {
        part / total * 100.0
    } else {
        0.0
    }
}

/// Arithmetic mean, `None` for an empty slice
pub fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        None
    } else {
        Some(values.iter().sum::<f64>() / values.len() as f64)
    }
}
