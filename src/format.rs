//! Renders [`Credentials`] for shells, scripts and awscli-compatible consumers.

use crate::config::OutputFormat;
use crate::credentials::Credentials;

pub fn render(format: OutputFormat, creds: &Credentials) -> crate::Result<String> {
    match format {
        OutputFormat::Text => Ok(render_text(creds)),
        OutputFormat::Shell => Ok(render_shell(creds)),
        OutputFormat::Json => render_json(creds),
    }
}

fn render_text(creds: &Credentials) -> String {
    use secrecy::ExposeSecret;
    format!(
        "{} {} {}\n",
        creds.access_key_id,
        creds.secret_access_key.expose_secret(),
        creds.session_token
    )
}

fn render_shell(creds: &Credentials) -> String {
    use secrecy::ExposeSecret;
    let access_key_id = shell_quote(&creds.access_key_id);
    let secret_access_key = shell_quote(creds.secret_access_key.expose_secret());
    let session_token = shell_quote(&creds.session_token);
    indoc::formatdoc! {"
        export AWS_ACCESS_KEY_ID={access_key_id}
        export AWS_SECRET_ACCESS_KEY={secret_access_key}
        export AWS_SESSION_TOKEN={session_token}
    "}
}

/// Same shape as `aws sts get-session-token` output.
#[derive(Debug, serde::Serialize)]
#[serde(rename_all = "PascalCase")]
struct SessionTokenOutput<'a> {
    credentials: JsonCredentials<'a>,
}

#[derive(Debug, serde::Serialize)]
#[serde(rename_all = "PascalCase")]
struct JsonCredentials<'a> {
    access_key_id: &'a str,
    secret_access_key: &'a str,
    session_token: &'a str,
    expiration: String,
}

fn render_json(creds: &Credentials) -> crate::Result<String> {
    use secrecy::ExposeSecret;
    let output = SessionTokenOutput {
        credentials: JsonCredentials {
            access_key_id: &creds.access_key_id,
            secret_access_key: creds.secret_access_key.expose_secret(),
            session_token: &creds.session_token,
            expiration: creds
                .expiration
                .to_rfc3339_opts(chrono::SecondsFormat::Secs, true),
        },
    };
    let mut json = serde_json::to_string(&output)?;
    json.push('\n');
    Ok(json)
}

/// Quote `s` so that a POSIX shell reads it back literally.
pub fn shell_quote(s: &str) -> std::borrow::Cow<'_, str> {
    if s.is_empty() {
        return "''".into();
    }
    if s.chars().all(is_shell_safe) {
        return s.into();
    }
    format!("'{}'", s.replace('\'', r#"'"'"'"#)).into()
}

fn is_shell_safe(c: char) -> bool {
    c.is_ascii_alphanumeric()
        || matches!(
            c,
            '_' | '@' | '%' | '+' | '=' | ':' | ',' | '.' | '/' | '-'
        )
}
