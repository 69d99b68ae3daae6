mod admin;
mod health;
mod products;

use axum::{routing::get, Router};

use crate::AppState;

pub fn create_router() -> Router<AppState> {
    Router::new()
        .route("/health", get(health::health_check))
        .route("/health/ready", get(health::readiness_check))
        .route(
            "/api/products",
            get(products::list_products).post(admin::create_product),
        )
        .route(
            "/api/products/{id}",
            get(products::get_product)
                .put(admin::update_product)
                .delete(admin::delete_product),
        )
}
