use axum::{
    http::{Response, header},
    response::IntoResponse,
};

/// Serves the bundled `OpenAPI` document with the crate version stamped in.
///
/// # Panics
/// Panics if the response builder fails to construct the response.
pub async fn openapi_yaml() -> impl IntoResponse {
    let spec = include_str!("../../openapi.yaml")
        .replace("version: 0.0.0", concat!("version: ", env!("CARGO_PKG_VERSION")));

    Response::builder()
        .header(header::CONTENT_TYPE, "text/yaml")
        .body(spec)
        .expect("Failed to construct OpenAPI YAML response")
}
