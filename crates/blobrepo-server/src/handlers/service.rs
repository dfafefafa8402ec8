//! Service-level handlers (landing page)

use crate::AppState;
use axum::{
    extract::State,
    response::{Html, IntoResponse},
};
use quick_xml::escape::escape;
use std::sync::Arc;

/// GET / - Landing page with client configuration snippets
pub async fn landing_page(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    Html(render_landing(
        &state.config.repo_name,
        &state.config.repo_id,
        &state.config.displayed_url,
    ))
}

fn render_landing(name: &str, id: &str, url: &str) -> String {
    let (name, id, url) = (escape(name), escape(id), escape(url));

    format!(
        "<h2>{name}</h2>\n\
         <hr>\n\
         <h3>Maven</h3>\n\
         <pre lang=\"xml\">&lt;repository&gt;\n    \
         &lt;id&gt;{id}&lt;/id&gt;\n    \
         &lt;url&gt;{url}&lt;/url&gt;\n\
         &lt;/repository&gt;</pre>\n\
         <h3>Gradle</h3>\n\
         <pre lang=\"groovy\">repositories {{\n    \
         maven {{ url '{url}' }}\n\
         }}</pre>\n"
    )
}
