//! Sign-up, log-in and log-out pages.

use crate::domain::{LoginForm, PASSWORD_MIN_LEN, SignupForm};

use super::{error_list, escape, field_errors, layout};

/// `GET/POST /auth/signup/`.
pub fn signup_page(form: &SignupForm) -> String {
    let content = format!(
        r#"<h1>Sign up</h1>
{non_field}<form method="post" action="/auth/signup/">
<label for="id_username">Username</label>
{username_errors}<input type="text" name="username" id="id_username" value="{username}" maxlength="150" required>
<label for="id_password1">Password</label>
{password1_errors}<input type="password" name="password1" id="id_password1" required>
<p class="help">At least {PASSWORD_MIN_LEN} characters.</p>
<label for="id_password2">Password confirmation</label>
{password2_errors}<input type="password" name="password2" id="id_password2" required>
<button type="submit">Sign up</button>
</form>
"#,
        non_field = error_list(form.errors.non_field()),
        username_errors = field_errors(&form.errors, "username"),
        username = escape(&form.username),
        password1_errors = field_errors(&form.errors, "password1"),
        password2_errors = field_errors(&form.errors, "password2"),
    );
    layout("Sign up", None, &content)
}

/// `GET/POST /auth/login/`. `next` rides along as a hidden field.
pub fn login_page(form: &LoginForm) -> String {
    let next = form
        .next
        .as_deref()
        .map(|next| {
            format!(
                r#"<input type="hidden" name="next" value="{}">"#,
                escape(next)
            )
        })
        .unwrap_or_default();
    let content = format!(
        r#"<h1>Log in</h1>
{non_field}<form method="post" action="/auth/login/">
{next}
<label for="id_username">Username</label>
<input type="text" name="username" id="id_username" value="{username}" required>
<label for="id_password">Password</label>
<input type="password" name="password" id="id_password" required>
<button type="submit">Log in</button>
</form>
<p>No account yet? <a href="/auth/signup/">Sign up</a></p>
"#,
        non_field = error_list(form.errors.non_field()),
        username = escape(&form.username),
    );
    layout("Log in", None, &content)
}

/// `GET /auth/logout/`.
pub fn logged_out_page() -> String {
    layout(
        "Logged out",
        None,
        r#"<h1>You have been logged out</h1>
<p><a href="/auth/login/">Log in again</a></p>
"#,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::NON_FIELD_ERRORS;
    use rstest::rstest;

    #[rstest]
    fn signup_echoes_username_escaped() {
        let form = SignupForm::with_error("<leo>", "username", "Taken.");
        let html = signup_page(&form);
        assert!(html.contains(r#"value="&lt;leo&gt;""#));
        assert!(html.contains("Taken."));
    }

    #[rstest]
    fn login_keeps_next_and_non_field_errors() {
        let mut form = LoginForm {
            username: "leo".to_owned(),
            next: Some("/create/".to_owned()),
            ..LoginForm::default()
        };
        form.errors.add(NON_FIELD_ERRORS, "Wrong username or password.");
        let html = login_page(&form);
        assert!(html.contains(r#"<input type="hidden" name="next" value="/create/">"#));
        assert!(html.contains("Wrong username or password."));
    }
}
