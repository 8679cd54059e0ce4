mod employee;
mod salary;
mod tax_bracket;

pub use employee::{Employee, EmployeeQuery, EmployeeUpdate, MAX_NAME_LEN, NewEmployee, Page};
pub(crate) use employee::validate_name;
pub use salary::{MonthlySalary, ValidationError};
pub use tax_bracket::{IncomeBand, NewTaxBracket, TaxBracket};
