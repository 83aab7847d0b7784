//! Pipeline module - load, filter, aggregate and evaluate

pub mod capabilities;
pub mod columns;
pub mod correlation;
pub mod crosstab;
pub mod distribution;
pub mod error;
pub mod filter;
pub mod frame;
pub mod hypothesis;
pub mod indicators;
pub mod loader;
pub mod ordinal;
pub mod sections;

pub use capabilities::*;
pub use columns::*;
pub use correlation::*;
pub use crosstab::*;
pub use distribution::*;
pub use error::*;
pub use filter::*;
pub use hypothesis::*;
pub use indicators::*;
pub use loader::*;
pub use ordinal::*;
pub use sections::*;
