//! Chat page.

use axum::response::Html;

const INDEX_HTML: &str = include_str!("../../assets/index.html");

/// GET / — static chat page that posts questions to `/ask`.
pub async fn index() -> Html<&'static str> {
    Html(INDEX_HTML)
}
