//! Static pages and error pages.

use actix_web::http::StatusCode;

use crate::domain::User;

use super::{escape, layout};

/// The not-found page. `path` is echoed when known.
pub fn not_found_page(path: Option<&str>) -> String {
    let detail = path
        .map(|path| format!("<p>There is nothing at <code>{}</code>.</p>\n", escape(path)))
        .unwrap_or_default();
    layout(
        "Page not found",
        None,
        &format!(
            "<h1>Page not found</h1>\n{detail}<p><a href=\"/\">Back to the front page</a></p>\n"
        ),
    )
}

/// Generic error page. `message` must already be safe to show to clients.
pub fn error_page(status: StatusCode, message: &str) -> String {
    let reason = status.canonical_reason().unwrap_or("Error");
    layout(
        reason,
        None,
        &format!(
            "<h1>{code} {reason}</h1>\n<p class=\"error-message\">{message}</p>\n",
            code = status.as_u16(),
            message = escape(message),
        ),
    )
}

/// `GET /about/author/`.
pub fn about_author_page(viewer: Option<&User>) -> String {
    layout(
        "About the author",
        viewer,
        r#"<h1>About the author</h1>
<p>Quill is a small community blog: write posts, file them under groups,
discuss them in comments and follow the authors you like.</p>
"#,
    )
}

/// `GET /about/tech/`.
pub fn about_tech_page(viewer: Option<&User>) -> String {
    layout(
        "Technology",
        viewer,
        r#"<h1>Technology</h1>
<ul>
<li>Rust with actix-web, rendering every page on the server</li>
<li>PostgreSQL through Diesel, or an in-memory store for development</li>
<li>Cookie sessions and Argon2 password hashes</li>
</ul>
"#,
    )
}
