use axum::{
    Json,
    extract::{Multipart, Path, State},
};
use http::StatusCode;
use serde_json::{json, Value};

use crate::{
    AppState,
    error::{AppError, Result},
    models::Product,
    utils::extractors::product_form,
};

pub async fn create_product(
    State(state): State<AppState>,
    multipart: Multipart,
) -> Result<(StatusCode, Json<Product>)> {
    let form = product_form(multipart).await?;

    if form.name.as_deref().map_or(true, |n| n.trim().is_empty()) {
        return Err(AppError::BadRequest("name is required".to_string()));
    }

    let Some(price) = form.price else {
        return Err(AppError::BadRequest("price is required".to_string()));
    };
    if price < 0.0 {
        return Err(AppError::BadRequest(
            "price must be non-negative".to_string(),
        ));
    }

    if form.category.as_deref().map_or(true, |c| c.trim().is_empty()) {
        return Err(AppError::BadRequest("category is required".to_string()));
    }

    let product = state.store.create(form).await?;

    Ok((StatusCode::CREATED, Json(product)))
}

pub async fn update_product(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    multipart: Multipart,
) -> Result<Json<Product>> {
    let form = product_form(multipart).await?;

    if let Some(price) = form.price {
        if price < 0.0 {
            return Err(AppError::BadRequest(
                "price must be non-negative".to_string(),
            ));
        }
    }

    let product = state
        .store
        .update(id, form)
        .await?
        .ok_or(AppError::NotFound("Product not found".to_string()))?;

    Ok(Json(product))
}

pub async fn delete_product(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<Value>> {
    if !state.store.delete(id).await? {
        return Err(AppError::NotFound("Product not found".to_string()));
    }

    Ok(Json(json!({ "message": "Product deleted successfully" })))
}
