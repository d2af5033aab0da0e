// Common test utilities shared across test files

use axum::{body::Body, http::Request, response::Response};
use querystring::{
    domain::{Catalog, CatalogEntry},
    AppState,
};
use tower::ServiceExt;

fn entry(title: &str, tags: &[&str]) -> CatalogEntry {
    CatalogEntry {
        title: title.to_string(),
        description: format!("About {}", title),
        tags: tags.iter().map(|t| t.to_string()).collect(),
    }
}

/// Create a test Axum router over a small in-memory catalogue (page size 2)
#[allow(dead_code)]
pub fn create_test_app() -> axum::Router {
    let catalog = Catalog::new(vec![
        entry("Axum", &["rust", "web"]),
        entry("Askama", &["rust", "templates"]),
        entry("Tokio", &["rust", "async"]),
        entry("Twig", &["php", "templates"]),
        entry("Craft", &["php", "web"]),
    ]);

    querystring::app(AppState {
        catalog,
        page_size: 2,
    })
}

/// Send a request through a fresh app
#[allow(dead_code)]
pub async fn send(request: Request<Body>) -> Response {
    create_test_app().oneshot(request).await.unwrap()
}

#[allow(dead_code)]
pub async fn get(uri: &str) -> Response {
    send(Request::builder().uri(uri).body(Body::empty()).unwrap()).await
}

#[allow(dead_code)]
pub async fn body_string(response: Response) -> String {
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    String::from_utf8(body.to_vec()).unwrap()
}
