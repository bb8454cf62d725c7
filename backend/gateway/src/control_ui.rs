//! Single-page upload UI.
//!
//! The page is compiled into the binary; it posts the chosen file to
//! `/api/analyze` and shows the returned result.

use axum::{Router, response::Html, routing::get};

use crate::server::GatewayState;

const INDEX_HTML: &str = include_str!("../ui/index.html");

/// Returns a router that serves the upload page at `/`.
pub fn ui_router() -> Router<GatewayState> {
    Router::new().route("/", get(index))
}

async fn index() -> Html<&'static str> {
    Html(INDEX_HTML)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn page_posts_to_analyze_endpoint() {
        assert!(INDEX_HTML.contains("/api/analyze"));
        assert!(INDEX_HTML.contains("Analysis Result"));
        assert!(INDEX_HTML.contains(".jpg,.jpeg,.png"));
    }
}
