pub mod calculations;
pub mod db;
pub mod models;
pub mod service;

pub use calculations::{
    BracketTableError, SalaryProjection, TaxResolution, TaxResolver, project, resolve,
    validate_tiling,
};
pub use db::{DbConfig, PayrollRepository, RepositoryError, RepositoryFactory, RepositoryRegistry};
pub use models::*;
pub use service::{PayrollService, ServiceError, TaxCalculation};
