use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use payroll_core::{
    Employee, EmployeeQuery, MonthlySalary, NewEmployee, NewTaxBracket, Page, PayrollRepository,
    RepositoryError, SalaryProjection, TaxBracket,
};
use sqlx::sqlite::{SqlitePool, SqliteRow};
use sqlx::{QueryBuilder, Row, Sqlite};
use tracing::debug;

use crate::decimal::{decimal_to_text, get_decimal, get_optional_decimal};

const BRACKET_COLUMNS: &str = "id, name, min_income, max_income, rate, base_tax";

const EMPLOYEE_SELECT: &str = "SELECT e.id, e.first_name, e.last_name, e.monthly_salary,
        e.annual_salary, e.annual_tax, e.net_annual_salary,
        e.created_at, e.updated_at,
        b.id AS bracket_id, b.name AS bracket_name,
        b.min_income AS bracket_min_income, b.max_income AS bracket_max_income,
        b.rate AS bracket_rate, b.base_tax AS bracket_base_tax
     FROM employees e
     LEFT JOIN tax_brackets b ON b.id = e.tax_bracket_id";

pub struct SqliteRepository {
    pool: SqlitePool,
}

impl SqliteRepository {
    pub async fn new_with_pool(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn run_migrations(&self) -> Result<()> {
        sqlx::migrate!("./migrations")
            .run(&self.pool)
            .await
            .context("Failed to run database migrations")?;
        Ok(())
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }
}

fn db_err(e: sqlx::Error) -> RepositoryError {
    RepositoryError::Database(e.to_string())
}

fn row_to_tax_bracket(row: &SqliteRow) -> Result<TaxBracket, RepositoryError> {
    Ok(TaxBracket {
        id: row.try_get("id").map_err(db_err)?,
        name: row.try_get("name").map_err(db_err)?,
        min_income: get_decimal(row, "min_income")?,
        max_income: get_optional_decimal(row, "max_income")?,
        rate: get_decimal(row, "rate")?,
        base_tax: get_decimal(row, "base_tax")?,
    })
}

/// The bracket joined onto an employee row, if it still exists.
fn joined_tax_bracket(row: &SqliteRow) -> Result<Option<TaxBracket>, RepositoryError> {
    let Some(id) = row.try_get::<Option<i64>, _>("bracket_id").map_err(db_err)? else {
        return Ok(None);
    };

    Ok(Some(TaxBracket {
        id,
        name: row.try_get("bracket_name").map_err(db_err)?,
        min_income: get_decimal(row, "bracket_min_income")?,
        max_income: get_optional_decimal(row, "bracket_max_income")?,
        rate: get_decimal(row, "bracket_rate")?,
        base_tax: get_decimal(row, "bracket_base_tax")?,
    }))
}

fn row_to_employee(row: &SqliteRow) -> Result<Employee, RepositoryError> {
    let monthly_salary = MonthlySalary::new(get_decimal(row, "monthly_salary")?)
        .map_err(|e| RepositoryError::Database(format!("Invalid stored salary: {}", e)))?;

    let projection = SalaryProjection::restore(
        get_decimal(row, "annual_salary")?,
        get_decimal(row, "annual_tax")?,
        get_decimal(row, "net_annual_salary")?,
        joined_tax_bracket(row)?,
    );

    Ok(Employee::restore(
        row.try_get("id").map_err(db_err)?,
        row.try_get("first_name").map_err(db_err)?,
        row.try_get("last_name").map_err(db_err)?,
        monthly_salary,
        projection,
        row.try_get::<DateTime<Utc>, _>("created_at")
            .map_err(|e| RepositoryError::Database(format!("Failed to get created_at: {}", e)))?,
        row.try_get::<DateTime<Utc>, _>("updated_at")
            .map_err(|e| RepositoryError::Database(format!("Failed to get updated_at: {}", e)))?,
    ))
}

/// Escapes LIKE wildcards so a search term matches literally.
fn like_pattern(search: &str) -> String {
    let mut escaped = String::with_capacity(search.len() + 2);
    escaped.push('%');
    for c in search.chars() {
        if matches!(c, '%' | '_' | '\\') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped.push('%');
    escaped
}

fn push_search_filter<'a>(
    builder: &mut QueryBuilder<'a, Sqlite>,
    search: Option<&str>,
) {
    if let Some(search) = search {
        let pattern = like_pattern(search);
        builder
            .push(" WHERE (e.first_name LIKE ")
            .push_bind(pattern.clone())
            .push(" ESCAPE '\\' OR e.last_name LIKE ")
            .push_bind(pattern)
            .push(" ESCAPE '\\')");
    }
}

#[async_trait]
impl PayrollRepository for SqliteRepository {
    async fn list_tax_brackets(&self) -> Result<Vec<TaxBracket>, RepositoryError> {
        let rows = sqlx::query(&format!(
            "SELECT {} FROM tax_brackets ORDER BY CAST(min_income AS REAL), id",
            BRACKET_COLUMNS
        ))
        .fetch_all(&self.pool)
        .await
        .map_err(db_err)?;

        rows.iter().map(row_to_tax_bracket).collect()
    }

    async fn count_tax_brackets(&self) -> Result<i64, RepositoryError> {
        sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM tax_brackets")
            .fetch_one(&self.pool)
            .await
            .map_err(db_err)
    }

    async fn replace_tax_brackets(
        &self,
        brackets: &[NewTaxBracket],
    ) -> Result<Vec<TaxBracket>, RepositoryError> {
        let mut tx = self.pool.begin().await.map_err(db_err)?;

        let removed = sqlx::query("DELETE FROM tax_brackets")
            .execute(&mut *tx)
            .await
            .map_err(db_err)?
            .rows_affected();

        for bracket in brackets {
            sqlx::query(
                "INSERT INTO tax_brackets (name, min_income, max_income, rate, base_tax)
                 VALUES (?, ?, ?, ?, ?)",
            )
            .bind(&bracket.name)
            .bind(decimal_to_text(bracket.min_income))
            .bind(bracket.max_income.map(decimal_to_text))
            .bind(decimal_to_text(bracket.rate))
            .bind(decimal_to_text(bracket.base_tax))
            .execute(&mut *tx)
            .await
            .map_err(db_err)?;
        }

        tx.commit().await.map_err(db_err)?;
        debug!(removed, inserted = brackets.len(), "tax brackets replaced");

        self.list_tax_brackets().await
    }

    async fn create_employee(
        &self,
        employee: &NewEmployee,
        projection: &SalaryProjection,
    ) -> Result<Employee, RepositoryError> {
        let now = Utc::now();

        let result = sqlx::query(
            "INSERT INTO employees (
                first_name, last_name, monthly_salary,
                annual_salary, annual_tax, net_annual_salary, tax_bracket_id,
                created_at, updated_at
            ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(&employee.first_name)
        .bind(&employee.last_name)
        .bind(decimal_to_text(employee.monthly_salary.value()))
        .bind(decimal_to_text(projection.annual_salary()))
        .bind(decimal_to_text(projection.annual_tax()))
        .bind(decimal_to_text(projection.net_annual_salary()))
        .bind(projection.tax_bracket().map(|b| b.id))
        .bind(now)
        .bind(now)
        .execute(&self.pool)
        .await
        .map_err(db_err)?;

        self.get_employee(result.last_insert_rowid()).await
    }

    async fn get_employee(
        &self,
        id: i64,
    ) -> Result<Employee, RepositoryError> {
        let row = sqlx::query(&format!("{} WHERE e.id = ?", EMPLOYEE_SELECT))
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(db_err)?
            .ok_or(RepositoryError::NotFound)?;

        row_to_employee(&row)
    }

    async fn update_employee(
        &self,
        employee: &Employee,
    ) -> Result<Employee, RepositoryError> {
        let projection = employee.projection();

        let result = sqlx::query(
            "UPDATE employees SET
                first_name = ?, last_name = ?, monthly_salary = ?,
                annual_salary = ?, annual_tax = ?, net_annual_salary = ?,
                tax_bracket_id = ?, updated_at = ?
             WHERE id = ?",
        )
        .bind(&employee.first_name)
        .bind(&employee.last_name)
        .bind(decimal_to_text(employee.monthly_salary().value()))
        .bind(decimal_to_text(projection.annual_salary()))
        .bind(decimal_to_text(projection.annual_tax()))
        .bind(decimal_to_text(projection.net_annual_salary()))
        .bind(projection.tax_bracket().map(|b| b.id))
        .bind(Utc::now())
        .bind(employee.id)
        .execute(&self.pool)
        .await
        .map_err(db_err)?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }

        self.get_employee(employee.id).await
    }

    async fn delete_employee(
        &self,
        id: i64,
    ) -> Result<(), RepositoryError> {
        let result = sqlx::query("DELETE FROM employees WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(db_err)?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }

        Ok(())
    }

    async fn list_employees(
        &self,
        query: &EmployeeQuery,
    ) -> Result<Page<Employee>, RepositoryError> {
        let search = query.search.as_deref();

        let mut count = QueryBuilder::<Sqlite>::new("SELECT COUNT(*) FROM employees e");
        push_search_filter(&mut count, search);
        let total: i64 = count
            .build_query_scalar::<i64>()
            .fetch_one(&self.pool)
            .await
            .map_err(db_err)?;

        let offset = i64::try_from(query.offset())
            .map_err(|_| RepositoryError::Database("page offset out of range".to_string()))?;

        let mut select = QueryBuilder::<Sqlite>::new(EMPLOYEE_SELECT);
        push_search_filter(&mut select, search);
        select
            .push(" ORDER BY e.id LIMIT ")
            .push_bind(i64::from(query.limit))
            .push(" OFFSET ")
            .push_bind(offset);

        let rows = select
            .build()
            .fetch_all(&self.pool)
            .await
            .map_err(db_err)?;

        Ok(Page {
            data: rows.iter().map(row_to_employee).collect::<Result<_, _>>()?,
            total,
            page: query.page,
            limit: query.limit,
        })
    }

    async fn count_employees(&self) -> Result<i64, RepositoryError> {
        sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM employees")
            .fetch_one(&self.pool)
            .await
            .map_err(db_err)
    }

    async fn delete_all_employees(&self) -> Result<u64, RepositoryError> {
        let result = sqlx::query("DELETE FROM employees")
            .execute(&self.pool)
            .await
            .map_err(db_err)?;

        Ok(result.rows_affected())
    }
}
