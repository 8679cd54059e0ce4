use actix_web::{HttpResponse, error::InternalError, web};

use crate::dto::MessageResponse;
use crate::handlers;

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.app_data(json_config())
        .app_data(query_config())
        .app_data(path_config())
        .route("/health", web::get().to(handlers::health))
        .service(
            web::scope("/employees")
                .service(
                    web::resource("")
                        .route(web::get().to(handlers::list_employees))
                        .route(web::post().to(handlers::create_employee)),
                )
                .service(
                    web::resource("/{id}")
                        .route(web::get().to(handlers::get_employee))
                        .route(web::put().to(handlers::update_employee))
                        .route(web::delete().to(handlers::delete_employee)),
                ),
        )
        .route("/tax-brackets", web::get().to(handlers::list_tax_brackets))
        .route(
            "/calculate-tax/{employee_id}",
            web::post().to(handlers::calculate_tax),
        );
}

// Extractor failures answer with the same `{"message": ...}` body as handler
// errors.

fn json_config() -> web::JsonConfig {
    web::JsonConfig::default().error_handler(|err, _req| {
        let response = HttpResponse::BadRequest().json(MessageResponse::new(err.to_string()));
        InternalError::from_response(err, response).into()
    })
}

fn query_config() -> web::QueryConfig {
    web::QueryConfig::default().error_handler(|err, _req| {
        let response = HttpResponse::BadRequest().json(MessageResponse::new(err.to_string()));
        InternalError::from_response(err, response).into()
    })
}

fn path_config() -> web::PathConfig {
    web::PathConfig::default().error_handler(|err, _req| {
        let response = HttpResponse::BadRequest().json(MessageResponse::new(err.to_string()));
        InternalError::from_response(err, response).into()
    })
}
