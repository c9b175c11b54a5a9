//! Server-rendered views for the secrets pages
//!
//! Deliberately plain HTML, no template engine. Bodies are user-supplied
//! free text and are escaped before rendering.

use crate::domain::entity::Secret;

/// The "all secrets" view
pub fn secrets_page(secrets: &[Secret]) -> String {
    let items = render_items(secrets);
    page(
        "All Secrets",
        &format!(
            r#"<h1>All Secrets</h1>
{items}
<p>
  <a href="/submit">Submit a secret</a> |
  <a href="/mysecret">My secrets</a> |
  <a href="/logout">Logout</a>
</p>"#
        ),
    )
}

/// The caller-only view
pub fn my_secrets_page(username: Option<&str>, secrets: &[Secret]) -> String {
    let items = render_items(secrets);
    let who = username.map(escape).unwrap_or_else(|| "you".to_string());
    page(
        "My Secrets",
        &format!(
            r#"<h1>Secrets posted by {who}</h1>
{items}
<p>
  <a href="/submit">Submit a secret</a> |
  <a href="/secrets">All secrets</a> |
  <a href="/logout">Logout</a>
</p>"#
        ),
    )
}

/// Submission form
pub fn submit_page() -> String {
    page(
        "Submit a Secret",
        r#"<h1>Submit a Secret</h1>
<form action="/submit" method="post">
  <label>Your secret <input type="text" name="secret"></label>
  <button type="submit">Submit</button>
</form>
<p><a href="/secrets">Back to all secrets</a></p>"#,
    )
}

fn render_items(secrets: &[Secret]) -> String {
    if secrets.is_empty() {
        return "<p>No secrets yet.</p>".to_string();
    }

    let mut list = String::from("<ul>\n");
    for secret in secrets {
        list.push_str(&format!("  <li>{}</li>\n", escape(&secret.body)));
    }
    list.push_str("</ul>");
    list
}

fn escape(raw: &str) -> String {
    raw.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
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

#[cfg(test)]
mod tests {
    use super::*;
    use kernel::id::IdentityId;

    #[test]
    fn test_bodies_are_escaped() {
        let secrets = vec![Secret::new(
            IdentityId::new(),
            "<script>alert('x')</script>".to_string(),
        )];
        let html = secrets_page(&secrets);
        assert!(html.contains("&lt;script&gt;"));
        assert!(!html.contains("<script>"));
    }

    #[test]
    fn test_empty_list_has_placeholder() {
        assert!(secrets_page(&[]).contains("No secrets yet."));
    }

    #[test]
    fn test_submit_form_posts_secret_field() {
        let html = submit_page();
        assert!(html.contains(r#"action="/submit" method="post""#));
        assert!(html.contains(r#"name="secret""#));
    }

    #[test]
    fn test_my_secrets_names_the_caller() {
        let html = my_secrets_page(Some("alice"), &[]);
        assert!(html.contains("Secrets posted by alice"));

        let anonymous = my_secrets_page(None, &[]);
        assert!(anonymous.contains("Secrets posted by you"));
    }
}
