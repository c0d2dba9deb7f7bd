//! Server-rendered HTML pages.
//!
//! Pages are assembled with `format!`. Every value that originated from a
//! client (post text, usernames, group titles, form echoes) passes through
//! [`escape`] before it is interpolated.

mod accounts;
mod misc;
mod posts;

use actix_web::HttpResponse;
use actix_web::http::StatusCode;

use crate::domain::{FieldErrors, User};

pub use accounts::{logged_out_page, login_page, signup_page};
pub use misc::{about_author_page, about_tech_page, error_page, not_found_page};
pub use posts::{
    follow_page, group_page, index_page, post_detail_page, post_form_page, profile_page,
};

/// Content type of every rendered page.
pub const HTML_CONTENT_TYPE: &str = "text/html; charset=utf-8";

/// Escape text for interpolation into element content or quoted attributes.
///
/// # Examples
/// ```
/// use quill::inbound::http::pages::escape;
///
/// assert_eq!(escape(r#"<b>"Tom" & 'Jerry'</b>"#),
///     "&lt;b&gt;&quot;Tom&quot; &amp; &#x27;Jerry&#x27;&lt;/b&gt;");
/// ```
pub fn escape(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for ch in raw.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#x27;"),
            other => out.push(other),
        }
    }
    out
}

/// Escape multi-line text and keep its line breaks.
fn escape_multiline(raw: &str) -> String {
    escape(raw).replace("\r\n", "\n").replace('\n', "<br>\n")
}

/// Wrap page content in the site chrome.
fn layout(title: &str, viewer: Option<&User>, content: &str) -> String {
    let account_links = match viewer {
        Some(user) => format!(
            concat!(
                r#"<a href="/create/">New post</a> "#,
                r#"<a href="/follow/">Following</a> "#,
                r#"<span class="viewer">{username}</span> "#,
                r#"<a href="/auth/logout/">Log out</a>"#,
            ),
            username = escape(user.username().as_str()),
        ),
        None => concat!(
            r#"<a href="/auth/login/">Log in</a> "#,
            r#"<a href="/auth/signup/">Sign up</a>"#,
        )
        .to_owned(),
    };
    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="utf-8">
<meta name="viewport" content="width=device-width, initial-scale=1">
<title>{title} | Quill</title>
</head>
<body>
<header>
<nav><a href="/">Quill</a> <a href="/about/author/">About</a> <a href="/about/tech/">Technology</a> {account_links}</nav>
</header>
<main>
{content}
</main>
<footer><p>Quill</p></footer>
</body>
</html>
"#,
        title = escape(title),
    )
}

/// Render one field's messages, or nothing when it has none.
fn field_errors(errors: &FieldErrors, field: &str) -> String {
    error_list(errors.field(field))
}

fn error_list(messages: &[String]) -> String {
    if messages.is_empty() {
        return String::new();
    }
    let items: String = messages
        .iter()
        .map(|message| format!("<li>{}</li>", escape(message)))
        .collect();
    format!(r#"<ul class="errorlist">{items}</ul>"#)
}

/// Build an HTML response with `status`.
pub fn html(status: StatusCode, body: String) -> HttpResponse {
    HttpResponse::build(status)
        .content_type(HTML_CONTENT_TYPE)
        .body(body)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{UserId, Username};
    use rstest::rstest;

    #[rstest]
    #[case("plain", "plain")]
    #[case("<script>alert(1)</script>", "&lt;script&gt;alert(1)&lt;/script&gt;")]
    #[case("a & b", "a &amp; b")]
    #[case(r#"say "hi""#, "say &quot;hi&quot;")]
    fn escapes_markup(#[case] raw: &str, #[case] expected: &str) {
        assert_eq!(escape(raw), expected);
    }

    #[rstest]
    fn multiline_text_keeps_breaks() {
        assert_eq!(escape_multiline("one\r\n<two>"), "one<br>\n&lt;two&gt;");
    }

    #[rstest]
    fn layout_names_the_viewer() {
        let user = User::new(
            UserId::random(),
            Username::new("leo").expect("valid username"),
        );
        let page = layout("Home", Some(&user), "<p>body</p>");
        assert!(page.contains(r#"<span class="viewer">leo</span>"#));
        assert!(page.contains("/auth/logout/"));
        assert!(!page.contains("/auth/signup/"));

        let anonymous = layout("Home", None, "");
        assert!(anonymous.contains("/auth/login/"));
        assert!(anonymous.contains("<title>Home | Quill</title>"));
    }

    #[rstest]
    fn field_errors_render_as_list() {
        let mut errors = FieldErrors::new();
        errors.add("text", "This field is required.");
        assert_eq!(
            field_errors(&errors, "text"),
            r#"<ul class="errorlist"><li>This field is required.</li></ul>"#
        );
        assert_eq!(field_errors(&errors, "group"), "");
    }
}
