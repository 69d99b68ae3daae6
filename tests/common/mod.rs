#![allow(dead_code)]

use std::path::Path;

use axum::body::Body;
use axum::http::{header, Method, Request};
use axum::response::Response;
use axum::Router;
use http_body_util::BodyExt;
use tower::util::ServiceExt;

use lumina_back::{routes, AppState, CatalogStore};

pub const BOUNDARY: &str = "lumina-test-boundary";

/// Build the application router on top of a throwaway storage directory.
pub fn build_test_app(dir: &Path) -> Router {
    let store = CatalogStore::new(dir.join("products.json"), dir.join("uploads"));
    let state = AppState { store };
    routes::create_router().with_state(state)
}

pub async fn get(app: Router, uri: &str) -> Response {
    app.oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap()
}

pub async fn delete(app: Router, uri: &str) -> Response {
    app.oneshot(
        Request::builder()
            .method(Method::DELETE)
            .uri(uri)
            .body(Body::empty())
            .unwrap(),
    )
    .await
    .unwrap()
}

pub async fn send_multipart(app: Router, method: Method, uri: &str, body: Vec<u8>) -> Response {
    app.oneshot(
        Request::builder()
            .method(method)
            .uri(uri)
            .header(
                header::CONTENT_TYPE,
                format!("multipart/form-data; boundary={}", BOUNDARY),
            )
            .body(Body::from(body))
            .unwrap(),
    )
    .await
    .unwrap()
}

pub async fn body_json(response: Response) -> serde_json::Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

/// Hand-rolled multipart encoder: text fields first, then file fields.
pub fn multipart_body(fields: &[(&str, &str)], files: &[(&str, &str, &[u8])]) -> Vec<u8> {
    let mut body = Vec::new();

    for (name, value) in fields {
        body.extend_from_slice(format!("--{}\r\n", BOUNDARY).as_bytes());
        body.extend_from_slice(
            format!("Content-Disposition: form-data; name=\"{}\"\r\n\r\n", name).as_bytes(),
        );
        body.extend_from_slice(value.as_bytes());
        body.extend_from_slice(b"\r\n");
    }

    for (name, file_name, data) in files {
        body.extend_from_slice(format!("--{}\r\n", BOUNDARY).as_bytes());
        body.extend_from_slice(
            format!(
                "Content-Disposition: form-data; name=\"{}\"; filename=\"{}\"\r\n",
                name, file_name
            )
            .as_bytes(),
        );
        body.extend_from_slice(b"Content-Type: application/octet-stream\r\n\r\n");
        body.extend_from_slice(data);
        body.extend_from_slice(b"\r\n");
    }

    body.extend_from_slice(format!("--{}--\r\n", BOUNDARY).as_bytes());
    body
}

/// The standard fields of a valid create form, minus whatever the test
/// overrides.
pub fn lamp_fields<'a>() -> Vec<(&'a str, &'a str)> {
    vec![
        ("name", "Lamp A"),
        ("price", "100"),
        ("oldPrice", "150"),
        ("description", "Warm brass pendant"),
        ("category", "pendant"),
        ("inStock", "true"),
        ("features", "LED"),
        ("features", "Dimmable"),
        ("specifications.brand", "X"),
        ("specifications.country", "Italy"),
    ]
}
