//! Tax calculation modules.
//!
//! Everything in here is pure: no I/O, no logging, no suspension points.
//! Callers hand in brackets already sorted ascending by `min_income`.

pub mod bracket_table;
pub mod common;
pub mod projection;
pub mod resolver;

pub use bracket_table::{BracketTableError, validate_tiling};
pub use projection::{SalaryProjection, project};
pub use resolver::{TaxResolution, TaxResolver, resolve};
