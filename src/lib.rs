//! agelens: eldercare survey analytics
//!
//! Loads a programme survey export, filters respondents by demographic
//! dimensions and turns the subset into distributions, cross-tabulations,
//! correlations and verdicts on three research hypotheses.

pub mod cli;
pub mod pipeline;
pub mod report;
pub mod utils;
