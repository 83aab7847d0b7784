//! Report module - headlines, console summary and file exports

pub mod analysis_report;
pub mod headlines;
pub mod summary;

pub use analysis_report::*;
pub use headlines::*;
pub use summary::*;
