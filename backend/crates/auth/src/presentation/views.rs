//! Server-rendered views for the auth pages
//!
//! Deliberately plain HTML, no template engine.

/// Landing page
pub fn home() -> String {
    page(
        "Secrets",
        r#"<h1>Secrets</h1>
<p>Share a secret. Anonymously.</p>
<ul>
  <li><a href="/register">Register</a></li>
  <li><a href="/login">Login</a></li>
  <li><a href="/auth/google">Sign in with Google</a></li>
  <li><a href="/auth/facebook">Sign in with Facebook</a></li>
</ul>"#,
    )
}

/// Registration form
pub fn register_page() -> String {
    page(
        "Register",
        r#"<h1>Register</h1>
<form action="/register" method="post">
  <label>Username <input type="text" name="username" required></label>
  <label>Password <input type="password" name="password" required></label>
  <button type="submit">Register</button>
</form>
<p><a href="/login">Already have an account? Login</a></p>"#,
    )
}

/// Login form
pub fn login_page() -> String {
    page(
        "Login",
        r#"<h1>Login</h1>
<form action="/login" method="post">
  <label>Username <input type="text" name="username" required></label>
  <label>Password <input type="password" name="password" required></label>
  <button type="submit">Login</button>
</form>
<p><a href="/register">Need an account? Register</a></p>"#,
    )
}

fn page(title: &str, body: &str) -> String {
    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head><meta charset="utf-8"><title>{title}</title></head>
<body>
{body}
</body>
</html>
"#
    )
}
