pub mod loader;
pub mod seed;

pub use loader::{TaxBracketLoader, TaxBracketLoaderError, TaxBracketRecord};
pub use seed::{
    DEFAULT_TAX_BRACKETS_CSV, SeedError, SeedOptions, SeedReport, default_tax_brackets, seed,
    seed_employees, seed_tax_brackets,
};
