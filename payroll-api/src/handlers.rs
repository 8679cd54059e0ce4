use actix_web::{HttpResponse, web};
use payroll_core::{EmployeeQuery, PayrollService};
use tracing::debug;

use crate::dto::{
    CreateEmployeeRequest, EmployeeListResponse, EmployeeResponse, HealthResponse,
    ListEmployeesQuery, MessageResponse, TaxBracketResponse, TaxCalculationResponse,
    UpdateEmployeeRequest,
};
use crate::error::ApiError;

pub async fn health() -> HttpResponse {
    HttpResponse::Ok().json(HealthResponse { status: "ok" })
}

pub async fn list_employees(
    service: web::Data<PayrollService>,
    query: web::Query<ListEmployeesQuery>,
) -> Result<HttpResponse, ApiError> {
    let query = EmployeeQuery::from(query.into_inner());
    debug!(page = query.page, limit = query.limit, search = ?query.search, "listing employees");

    let page = service.list_employees(&query).await?;
    Ok(HttpResponse::Ok().json(EmployeeListResponse::from(&page)))
}

pub async fn get_employee(
    service: web::Data<PayrollService>,
    path: web::Path<i64>,
) -> Result<HttpResponse, ApiError> {
    let employee = service.get_employee(path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(EmployeeResponse::from(&employee)))
}

pub async fn create_employee(
    service: web::Data<PayrollService>,
    body: web::Json<CreateEmployeeRequest>,
) -> Result<HttpResponse, ApiError> {
    let new_employee = body.into_inner().into_new_employee()?;

    let employee = service.create_employee(new_employee).await?;
    Ok(HttpResponse::Created().json(EmployeeResponse::from(&employee)))
}

pub async fn update_employee(
    service: web::Data<PayrollService>,
    path: web::Path<i64>,
    body: web::Json<UpdateEmployeeRequest>,
) -> Result<HttpResponse, ApiError> {
    let update = body.into_inner().into_update()?;

    let employee = service.update_employee(path.into_inner(), update).await?;
    Ok(HttpResponse::Ok().json(EmployeeResponse::from(&employee)))
}

pub async fn delete_employee(
    service: web::Data<PayrollService>,
    path: web::Path<i64>,
) -> Result<HttpResponse, ApiError> {
    service.delete_employee(path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(MessageResponse::new("Employee deleted successfully")))
}

pub async fn list_tax_brackets(
    service: web::Data<PayrollService>
) -> Result<HttpResponse, ApiError> {
    let brackets = service.list_tax_brackets().await?;
    let body: Vec<TaxBracketResponse> = brackets.iter().map(TaxBracketResponse::from).collect();
    Ok(HttpResponse::Ok().json(body))
}

/// Fresh calculation against the current table. Nothing is written.
pub async fn calculate_tax(
    service: web::Data<PayrollService>,
    path: web::Path<i64>,
) -> Result<HttpResponse, ApiError> {
    let calculation = service.calculate_tax(path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(TaxCalculationResponse::from(&calculation)))
}
