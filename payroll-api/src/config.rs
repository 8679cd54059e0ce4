use std::path::PathBuf;

use clap::Parser;
use payroll_core::DbConfig;
use payroll_data::SeedOptions;

/// HTTP API for employee records and Philippine income tax.
#[derive(Parser, Debug, Clone)]
#[command(name = "payroll-api")]
#[command(version, about, long_about = None)]
pub struct Config {
    /// Address the HTTP server binds to
    #[arg(long, default_value = "127.0.0.1:3000")]
    pub bind: String,

    /// Database backend to use
    #[arg(long, default_value = "sqlite")]
    pub backend: String,

    /// Database connection string (e.g., payroll.db or sqlite::memory:)
    #[arg(short, long, default_value = "payroll.db")]
    pub database: String,

    /// Seed the default bracket table and sample employees before serving
    #[arg(long, default_value_t = false)]
    pub seed: bool,

    /// Delete all employees before seeding sample ones
    #[arg(long, default_value_t = false, requires = "seed")]
    pub force_seed_employees: bool,

    /// Employee count to seed up to
    #[arg(long, default_value_t = 50)]
    pub employee_target: usize,

    /// Also append log output to this file
    #[arg(long)]
    pub log_file: Option<PathBuf>,
}

impl Config {
    pub fn db_config(&self) -> DbConfig {
        DbConfig {
            backend: self.backend.clone(),
            connection_string: self.database.clone(),
        }
    }

    /// `Some` only when seeding was asked for on the command line.
    pub fn seed_options(&self) -> Option<SeedOptions> {
        self.seed.then(|| SeedOptions {
            employee_target: self.employee_target,
            force_employees: self.force_seed_employees,
        })
    }
}
