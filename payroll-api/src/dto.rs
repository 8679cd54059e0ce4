//! Request and response bodies. JSON is camelCase; money is a JSON number.

use chrono::{DateTime, Utc};
use payroll_core::{
    Employee, EmployeeQuery, EmployeeUpdate, MonthlySalary, NewEmployee, Page, TaxBracket,
    TaxCalculation, ValidationError,
};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// A salary as sent by clients: either a JSON number or a numeric string.
/// Nothing is coerced until [`SalaryInput::parse`] runs.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum SalaryInput {
    Number(serde_json::Number),
    Text(String),
}

impl SalaryInput {
    pub fn parse(&self) -> Result<MonthlySalary, ValidationError> {
        match self {
            SalaryInput::Number(number) => MonthlySalary::parse(&number.to_string()),
            SalaryInput::Text(text) => MonthlySalary::parse(text),
        }
    }
}

// Derived figures (annualSalary, annualTax, netAnnualSalary) are not
// accepted in either body.

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct CreateEmployeeRequest {
    pub first_name: String,
    pub last_name: String,
    pub monthly_salary: SalaryInput,
}

impl CreateEmployeeRequest {
    pub fn into_new_employee(self) -> Result<NewEmployee, ValidationError> {
        let salary = self.monthly_salary.parse()?;
        NewEmployee::new(&self.first_name, &self.last_name, salary)
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct UpdateEmployeeRequest {
    #[serde(default)]
    pub first_name: Option<String>,
    #[serde(default)]
    pub last_name: Option<String>,
    #[serde(default)]
    pub monthly_salary: Option<SalaryInput>,
}

impl UpdateEmployeeRequest {
    /// Names are checked by the service; only the salary is parsed here.
    pub fn into_update(self) -> Result<EmployeeUpdate, ValidationError> {
        let monthly_salary = self
            .monthly_salary
            .as_ref()
            .map(SalaryInput::parse)
            .transpose()?;

        Ok(EmployeeUpdate {
            first_name: self.first_name,
            last_name: self.last_name,
            monthly_salary,
        })
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ListEmployeesQuery {
    pub page: Option<u32>,
    pub limit: Option<u32>,
    pub search: Option<String>,
}

impl From<ListEmployeesQuery> for EmployeeQuery {
    fn from(query: ListEmployeesQuery) -> Self {
        EmployeeQuery::new(query.page, query.limit, query.search)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TaxBracketResponse {
    pub id: i64,
    pub name: String,
    #[serde(with = "rust_decimal::serde::float")]
    pub min_income: Decimal,
    #[serde(with = "rust_decimal::serde::float_option")]
    pub max_income: Option<Decimal>,
    #[serde(with = "rust_decimal::serde::float")]
    pub rate: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub base_tax: Decimal,
}

impl From<&TaxBracket> for TaxBracketResponse {
    fn from(bracket: &TaxBracket) -> Self {
        Self {
            id: bracket.id,
            name: bracket.name.clone(),
            min_income: bracket.min_income,
            max_income: bracket.max_income,
            rate: bracket.rate,
            base_tax: bracket.base_tax,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EmployeeResponse {
    pub id: i64,
    pub first_name: String,
    pub last_name: String,
    #[serde(with = "rust_decimal::serde::float")]
    pub monthly_salary: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub annual_salary: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub annual_tax: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub net_annual_salary: Decimal,
    pub tax_bracket: Option<TaxBracketResponse>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<&Employee> for EmployeeResponse {
    fn from(employee: &Employee) -> Self {
        let projection = employee.projection();
        Self {
            id: employee.id,
            first_name: employee.first_name.clone(),
            last_name: employee.last_name.clone(),
            monthly_salary: employee.monthly_salary().value(),
            annual_salary: projection.annual_salary(),
            annual_tax: projection.annual_tax(),
            net_annual_salary: projection.net_annual_salary(),
            tax_bracket: projection.tax_bracket().map(TaxBracketResponse::from),
            created_at: employee.created_at,
            updated_at: employee.updated_at,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EmployeeListResponse {
    pub data: Vec<EmployeeResponse>,
    pub total: i64,
    pub page: u32,
    pub limit: u32,
    pub total_pages: u32,
}

impl From<&Page<Employee>> for EmployeeListResponse {
    fn from(page: &Page<Employee>) -> Self {
        Self {
            data: page.data.iter().map(EmployeeResponse::from).collect(),
            total: page.total,
            page: page.page,
            limit: page.limit,
            total_pages: page.total_pages(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EmployeeSummary {
    pub id: i64,
    pub first_name: String,
    pub last_name: String,
    #[serde(with = "rust_decimal::serde::float")]
    pub monthly_salary: Decimal,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BracketDetails {
    pub bracket_name: String,
    #[serde(with = "rust_decimal::serde::float")]
    pub min_income: Decimal,
    #[serde(with = "rust_decimal::serde::float_option")]
    pub max_income: Option<Decimal>,
    #[serde(with = "rust_decimal::serde::float")]
    pub rate: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub base_tax: Decimal,
}

/// Result of `POST /calculate-tax/{employeeId}`. `taxBracket` and
/// `bracketDetails` are null when no bracket covers the income.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TaxCalculationResponse {
    pub employee: EmployeeSummary,
    #[serde(with = "rust_decimal::serde::float")]
    pub monthly_salary: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub annual_salary: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub annual_tax: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub monthly_tax: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub net_annual_salary: Decimal,
    pub tax_bracket: Option<String>,
    pub bracket_details: Option<BracketDetails>,
}

impl From<&TaxCalculation> for TaxCalculationResponse {
    fn from(calculation: &TaxCalculation) -> Self {
        let employee = &calculation.employee;
        let projection = &calculation.projection;
        let monthly_salary = employee.monthly_salary().value();
        let bracket = projection.tax_bracket();

        Self {
            employee: EmployeeSummary {
                id: employee.id,
                first_name: employee.first_name.clone(),
                last_name: employee.last_name.clone(),
                monthly_salary,
            },
            monthly_salary,
            annual_salary: projection.annual_salary(),
            annual_tax: projection.annual_tax(),
            monthly_tax: projection.monthly_tax(),
            net_annual_salary: projection.net_annual_salary(),
            tax_bracket: bracket.map(|b| b.name.clone()),
            bracket_details: bracket.map(|b| BracketDetails {
                bracket_name: b.name.clone(),
                min_income: b.min_income,
                max_income: b.max_income,
                rate: b.rate,
                base_tax: b.base_tax,
            }),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
}
