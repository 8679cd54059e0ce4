//! End-to-end handler tests against an in-memory SQLite store.

use std::sync::Arc;

use actix_web::http::StatusCode;
use actix_web::web::Data;
use actix_web::{App, test};
use payroll_api::routes;
use payroll_core::{NewTaxBracket, PayrollService};
use payroll_data::seed_tax_brackets;
use payroll_db_sqlite::SqliteRepository;
use pretty_assertions::assert_eq;
use rust_decimal_macros::dec;
use serde_json::{Value, json};
use sqlx::sqlite::SqlitePoolOptions;

async fn setup_service() -> PayrollService {
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .connect("sqlite::memory:")
        .await
        .expect("Failed to create in-memory database");

    let repo = SqliteRepository::new_with_pool(pool).await;
    repo.run_migrations()
        .await
        .expect("Failed to run migrations");

    PayrollService::new(Arc::new(repo))
}

async fn seeded_service() -> PayrollService {
    let service = setup_service().await;
    seed_tax_brackets(&service)
        .await
        .expect("Failed to seed brackets");
    service
}

macro_rules! init_app {
    ($service:expr) => {
        test::init_service(
            App::new()
                .app_data(Data::new($service.clone()))
                .configure(routes::configure),
        )
        .await
    };
}

macro_rules! send {
    ($app:expr, $req:expr) => {{
        let resp = test::call_service(&$app, $req.to_request()).await;
        let status = resp.status();
        let body: Value = test::read_body_json(resp).await;
        (status, body)
    }};
}

fn employee_body(
    first_name: &str,
    last_name: &str,
    monthly_salary: Value,
) -> Value {
    json!({
        "firstName": first_name,
        "lastName": last_name,
        "monthlySalary": monthly_salary,
    })
}

// ── health & brackets ────────────────────────────────────────────────

#[actix_web::test]
async fn test_health() {
    let service = setup_service().await;
    let app = init_app!(service);

    let (status, body) = send!(app, test::TestRequest::get().uri("/health"));

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "status": "ok" }));
}

#[actix_web::test]
async fn test_tax_brackets_ascending_with_open_top() {
    let service = seeded_service().await;
    let app = init_app!(service);

    let (status, body) = send!(app, test::TestRequest::get().uri("/tax-brackets"));

    assert_eq!(status, StatusCode::OK);
    let brackets = body.as_array().expect("array of brackets");
    assert_eq!(brackets.len(), 6);
    assert_eq!(brackets[0]["name"], json!("Tax Exempt"));
    assert_eq!(brackets[0]["minIncome"], json!(0.0));
    assert_eq!(brackets[1]["minIncome"], json!(250001.0));
    assert_eq!(brackets[1]["rate"], json!(0.15));
    assert_eq!(brackets[5]["name"], json!("35% Bracket"));
    assert_eq!(brackets[5]["maxIncome"], Value::Null);
}

#[actix_web::test]
async fn test_tax_brackets_empty_store() {
    let service = setup_service().await;
    let app = init_app!(service);

    let (status, body) = send!(app, test::TestRequest::get().uri("/tax-brackets"));

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!([]));
}

// ── create ───────────────────────────────────────────────────────────

#[actix_web::test]
async fn test_create_employee_projects_salary() {
    let service = seeded_service().await;
    let app = init_app!(service);

    let (status, body) = send!(
        app,
        test::TestRequest::post()
            .uri("/employees")
            .set_json(employee_body("Alex", "Garcia", json!(30000)))
    );

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["firstName"], json!("Alex"));
    assert_eq!(body["monthlySalary"], json!(30000.0));
    assert_eq!(body["annualSalary"], json!(360000.0));
    assert_eq!(body["annualTax"], json!(16500.0));
    assert_eq!(body["netAnnualSalary"], json!(343500.0));
    assert_eq!(body["taxBracket"]["name"], json!("15% Bracket"));
}

#[actix_web::test]
async fn test_create_accepts_numeric_string() {
    let service = seeded_service().await;
    let app = init_app!(service);

    let (status, body) = send!(
        app,
        test::TestRequest::post()
            .uri("/employees")
            .set_json(employee_body("Sam", "Nguyen", json!("20833.33")))
    );

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["annualSalary"], json!(249999.96));
    assert_eq!(body["annualTax"], json!(0.0));
    assert_eq!(body["taxBracket"]["name"], json!("Tax Exempt"));
}

#[actix_web::test]
async fn test_create_rejects_derived_fields() {
    let service = seeded_service().await;
    let app = init_app!(service);

    let mut body = employee_body("Alex", "Garcia", json!(30000));
    body["annualTax"] = json!(0);

    let (status, body) = send!(
        app,
        test::TestRequest::post().uri("/employees").set_json(body)
    );

    assert_eq!(status, StatusCode::BAD_REQUEST);
    let message = body["message"].as_str().expect("message");
    assert!(message.contains("annualTax"), "{message}");
    assert_eq!(service.repository().count_employees().await, Ok(0));
}

#[actix_web::test]
async fn test_create_rejects_bad_salaries() {
    let service = seeded_service().await;
    let app = init_app!(service);

    for (salary, expected) in [
        (json!(0), "monthly salary must be greater than zero, got 0"),
        (json!(-1500), "monthly salary must be greater than zero, got -1500"),
        (json!("abc"), "monthly salary 'abc' is not a valid number"),
    ] {
        let (status, body) = send!(
            app,
            test::TestRequest::post()
                .uri("/employees")
                .set_json(employee_body("Alex", "Garcia", salary))
        );

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["message"], json!(expected));
    }
    assert_eq!(service.repository().count_employees().await, Ok(0));
}

#[actix_web::test]
async fn test_create_rejects_salary_beyond_max() {
    let service = seeded_service().await;
    let app = init_app!(service);

    let (status, body) = send!(
        app,
        test::TestRequest::post()
            .uri("/employees")
            .set_json(employee_body(
                "Alex",
                "Garcia",
                json!("7922816251426433759354395033")
            ))
    );

    assert_eq!(status, StatusCode::BAD_REQUEST);
    let message = body["message"].as_str().expect("message");
    assert!(message.contains("at most 9999999999.99"), "{message}");
    assert_eq!(service.repository().count_employees().await, Ok(0));

    let (status, body) = send!(
        app,
        test::TestRequest::post()
            .uri("/employees")
            .set_json(employee_body("Alex", "Garcia", json!("9999999999.99")))
    );
    assert_eq!(status, StatusCode::CREATED);
    let annual = body["annualSalary"].as_f64().expect("annualSalary");
    assert!((annual - 119_999_999_999.88).abs() < 0.01, "{annual}");
}

#[actix_web::test]
async fn test_update_rejects_salary_beyond_max() {
    let service = seeded_service().await;
    let app = init_app!(service);

    let (_, created) = send!(
        app,
        test::TestRequest::post()
            .uri("/employees")
            .set_json(employee_body("Alex", "Garcia", json!(30000)))
    );
    let id = created["id"].as_i64().unwrap();

    let (status, _) = send!(
        app,
        test::TestRequest::put()
            .uri(&format!("/employees/{id}"))
            .set_json(json!({ "monthlySalary": "10000000000" }))
    );

    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[actix_web::test]
async fn test_create_rejects_blank_name() {
    let service = seeded_service().await;
    let app = init_app!(service);

    let (status, body) = send!(
        app,
        test::TestRequest::post()
            .uri("/employees")
            .set_json(employee_body("  ", "Garcia", json!(30000)))
    );

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], json!("first name must not be empty"));
}

#[actix_web::test]
async fn test_create_rejects_missing_salary() {
    let service = seeded_service().await;
    let app = init_app!(service);

    let (status, body) = send!(
        app,
        test::TestRequest::post()
            .uri("/employees")
            .set_json(json!({ "firstName": "Alex", "lastName": "Garcia" }))
    );

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["message"].as_str().is_some());
}

// ── read, update, delete ─────────────────────────────────────────────

#[actix_web::test]
async fn test_get_employee_and_not_found() {
    let service = seeded_service().await;
    let app = init_app!(service);

    let (_, created) = send!(
        app,
        test::TestRequest::post()
            .uri("/employees")
            .set_json(employee_body("Alex", "Garcia", json!(30000)))
    );
    let id = created["id"].as_i64().expect("id");

    let (status, body) = send!(
        app,
        test::TestRequest::get().uri(&format!("/employees/{id}"))
    );
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, created);

    let (status, body) = send!(app, test::TestRequest::get().uri("/employees/999"));
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["message"], json!("Employee with ID 999 not found"));
}

#[actix_web::test]
async fn test_non_numeric_id_is_bad_request() {
    let service = seeded_service().await;
    let app = init_app!(service);

    let (status, body) = send!(app, test::TestRequest::get().uri("/employees/abc"));

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["message"].as_str().is_some());
}

#[actix_web::test]
async fn test_update_salary_reprojects() {
    let service = seeded_service().await;
    let app = init_app!(service);

    let (_, created) = send!(
        app,
        test::TestRequest::post()
            .uri("/employees")
            .set_json(employee_body("Alex", "Garcia", json!(30000)))
    );
    let id = created["id"].as_i64().unwrap();

    let (status, body) = send!(
        app,
        test::TestRequest::put()
            .uri(&format!("/employees/{id}"))
            .set_json(json!({ "monthlySalary": "83333.33" }))
    );

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["annualSalary"], json!(999999.96));
    assert_eq!(body["annualTax"], json!(152499.99));
    assert_eq!(body["netAnnualSalary"], json!(847499.97));
    assert_eq!(body["taxBracket"]["name"], json!("25% Bracket"));
    assert_eq!(body["firstName"], json!("Alex"));
}

#[actix_web::test]
async fn test_update_name_keeps_figures() {
    let service = seeded_service().await;
    let app = init_app!(service);

    let (_, created) = send!(
        app,
        test::TestRequest::post()
            .uri("/employees")
            .set_json(employee_body("Alex", "Garcia", json!(30000)))
    );
    let id = created["id"].as_i64().unwrap();

    let (status, body) = send!(
        app,
        test::TestRequest::put()
            .uri(&format!("/employees/{id}"))
            .set_json(json!({ "lastName": " Reyes " }))
    );

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["lastName"], json!("Reyes"));
    assert_eq!(body["annualTax"], created["annualTax"]);
    assert_eq!(body["taxBracket"], created["taxBracket"]);
}

#[actix_web::test]
async fn test_update_cannot_override_tax() {
    let service = seeded_service().await;
    let app = init_app!(service);

    let (_, created) = send!(
        app,
        test::TestRequest::post()
            .uri("/employees")
            .set_json(employee_body("Alex", "Garcia", json!(30000)))
    );
    let id = created["id"].as_i64().unwrap();

    let (status, _) = send!(
        app,
        test::TestRequest::put()
            .uri(&format!("/employees/{id}"))
            .set_json(json!({ "annualTax": 0, "netAnnualSalary": 360000 }))
    );
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (_, body) = send!(
        app,
        test::TestRequest::get().uri(&format!("/employees/{id}"))
    );
    assert_eq!(body["annualTax"], json!(16500.0));
}

#[actix_web::test]
async fn test_update_missing_employee() {
    let service = seeded_service().await;
    let app = init_app!(service);

    let (status, body) = send!(
        app,
        test::TestRequest::put()
            .uri("/employees/42")
            .set_json(json!({ "firstName": "Nobody" }))
    );

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["message"], json!("Employee with ID 42 not found"));
}

#[actix_web::test]
async fn test_delete_employee() {
    let service = seeded_service().await;
    let app = init_app!(service);

    let (_, created) = send!(
        app,
        test::TestRequest::post()
            .uri("/employees")
            .set_json(employee_body("Alex", "Garcia", json!(30000)))
    );
    let id = created["id"].as_i64().unwrap();
    let uri = format!("/employees/{id}");

    let (status, body) = send!(app, test::TestRequest::delete().uri(&uri));
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "message": "Employee deleted successfully" }));

    let (status, _) = send!(app, test::TestRequest::get().uri(&uri));
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = send!(app, test::TestRequest::delete().uri(&uri));
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (_, brackets) = send!(app, test::TestRequest::get().uri("/tax-brackets"));
    assert_eq!(brackets.as_array().map(Vec::len), Some(6));
}

// ── listing ──────────────────────────────────────────────────────────

#[actix_web::test]
async fn test_list_paginates_and_searches() {
    let service = seeded_service().await;
    let app = init_app!(service);

    for (first, last) in [("Alex", "Garcia"), ("Sam", "Nguyen"), ("Edgar", "Smith")] {
        let (status, _) = send!(
            app,
            test::TestRequest::post()
                .uri("/employees")
                .set_json(employee_body(first, last, json!(30000)))
        );
        assert_eq!(status, StatusCode::CREATED);
    }

    let (status, body) = send!(
        app,
        test::TestRequest::get().uri("/employees?page=2&limit=2")
    );
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["total"], json!(3));
    assert_eq!(body["page"], json!(2));
    assert_eq!(body["limit"], json!(2));
    assert_eq!(body["totalPages"], json!(2));
    assert_eq!(body["data"][0]["firstName"], json!("Edgar"));

    let (_, body) = send!(app, test::TestRequest::get().uri("/employees?search=GAR"));
    let names: Vec<&str> = body["data"]
        .as_array()
        .unwrap()
        .iter()
        .filter_map(|e| e["firstName"].as_str())
        .collect();
    assert_eq!(names, vec!["Alex", "Edgar"]);
    assert_eq!(body["total"], json!(2));
}

#[actix_web::test]
async fn test_list_defaults_and_clamps() {
    let service = seeded_service().await;
    let app = init_app!(service);

    let (status, body) = send!(app, test::TestRequest::get().uri("/employees"));
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body,
        json!({ "data": [], "total": 0, "page": 1, "limit": 10, "totalPages": 0 })
    );

    let (_, body) = send!(
        app,
        test::TestRequest::get().uri("/employees?page=0&limit=1000")
    );
    assert_eq!(body["page"], json!(1));
    assert_eq!(body["limit"], json!(100));
}

#[actix_web::test]
async fn test_list_rejects_malformed_query() {
    let service = seeded_service().await;
    let app = init_app!(service);

    let (status, body) = send!(app, test::TestRequest::get().uri("/employees?page=first"));

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["message"].as_str().is_some());
}

// ── calculate-tax ────────────────────────────────────────────────────

#[actix_web::test]
async fn test_calculate_tax() {
    let service = seeded_service().await;
    let app = init_app!(service);

    let (_, created) = send!(
        app,
        test::TestRequest::post()
            .uri("/employees")
            .set_json(employee_body("Alex", "Garcia", json!(30000)))
    );
    let id = created["id"].as_i64().unwrap();

    let (status, body) = send!(
        app,
        test::TestRequest::post().uri(&format!("/calculate-tax/{id}"))
    );

    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body,
        json!({
            "employee": {
                "id": id,
                "firstName": "Alex",
                "lastName": "Garcia",
                "monthlySalary": 30000.0
            },
            "monthlySalary": 30000.0,
            "annualSalary": 360000.0,
            "annualTax": 16500.0,
            "monthlyTax": 1375.0,
            "netAnnualSalary": 343500.0,
            "taxBracket": "15% Bracket",
            "bracketDetails": {
                "bracketName": "15% Bracket",
                "minIncome": 250001.0,
                "maxIncome": 400000.0,
                "rate": 0.15,
                "baseTax": 0.0
            }
        })
    );
}

#[actix_web::test]
async fn test_calculate_tax_uses_current_table_without_persisting() {
    let service = seeded_service().await;
    let app = init_app!(service);

    let (_, created) = send!(
        app,
        test::TestRequest::post()
            .uri("/employees")
            .set_json(employee_body("Alex", "Garcia", json!(30000)))
    );
    let id = created["id"].as_i64().unwrap();

    service
        .replace_tax_brackets(&[NewTaxBracket {
            name: "Flat".to_string(),
            min_income: dec!(0),
            max_income: None,
            rate: dec!(0.10),
            base_tax: dec!(0),
        }])
        .await
        .expect("flat table is valid");

    let (status, body) = send!(
        app,
        test::TestRequest::post().uri(&format!("/calculate-tax/{id}"))
    );
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["annualTax"], json!(36000.0));
    assert_eq!(body["taxBracket"], json!("Flat"));

    // Stored figures are untouched; the vanished bracket reference is cleared.
    let (_, stored) = send!(
        app,
        test::TestRequest::get().uri(&format!("/employees/{id}"))
    );
    assert_eq!(stored["annualTax"], json!(16500.0));
    assert_eq!(stored["taxBracket"], Value::Null);
}

#[actix_web::test]
async fn test_calculate_tax_without_brackets() {
    let service = setup_service().await;
    let app = init_app!(service);

    let (_, created) = send!(
        app,
        test::TestRequest::post()
            .uri("/employees")
            .set_json(employee_body("Alex", "Garcia", json!(30000)))
    );
    let id = created["id"].as_i64().unwrap();
    assert_eq!(created["annualTax"], json!(0.0));
    assert_eq!(created["taxBracket"], Value::Null);

    let (status, body) = send!(
        app,
        test::TestRequest::post().uri(&format!("/calculate-tax/{id}"))
    );

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["annualTax"], json!(0.0));
    assert_eq!(body["netAnnualSalary"], json!(360000.0));
    assert_eq!(body["taxBracket"], Value::Null);
    assert_eq!(body["bracketDetails"], Value::Null);
}

#[actix_web::test]
async fn test_calculate_tax_missing_employee() {
    let service = seeded_service().await;
    let app = init_app!(service);

    let (status, body) = send!(app, test::TestRequest::post().uri("/calculate-tax/404"));

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["message"], json!("Employee with ID 404 not found"));
}
