//! In-process HTTP fixtures for tests.

use axum::http::{header, StatusCode};
use axum::response::Html;
use axum::routing::get;
use axum::Router;

/// One canned response served at a fixed path.
pub struct Page {
    path: &'static str,
    status: StatusCode,
    body: &'static str,
    location: Option<String>,
}

impl Page {
    pub fn html(path: &'static str, body: &'static str) -> Self {
        Self { path, status: StatusCode::OK, body, location: None }
    }

    pub fn status(path: &'static str, status: StatusCode) -> Self {
        Self { path, status, body: "", location: None }
    }

    /// A 307 pointing at `location`.
    pub fn redirect(path: &'static str, location: String) -> Self {
        Self {
            path,
            status: StatusCode::TEMPORARY_REDIRECT,
            body: "",
            location: Some(location),
        }
    }
}

/// Serve `pages` on an ephemeral localhost port and return the base URL
/// (`http://127.0.0.1:<port>`). The server lives until the test runtime shuts down.
pub async fn serve(pages: Vec<Page>) -> String {
    let mut router = Router::new();
    for page in pages {
        let (status, body) = (page.status, page.body);
        router = match page.location {
            Some(location) => router.route(
                page.path,
                get(move || async move { (status, [(header::LOCATION, location)]) }),
            ),
            None => router.route(page.path, get(move || async move { (status, Html(body)) })),
        };
    }

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });
    format!("http://{addr}")
}
