use reqwest::{Client, StatusCode};
use thiserror::Error;

/// An authenticated web session. The underlying client owns the cookie jar
/// holding whatever session cookie the switch set on login; the jar lives for
/// one polling run and is never persisted.
#[derive(Debug)]
pub struct Session {
    client: Client,
}

/// Logs on to the switch's web UI at `{base_url}logon.cgi`.
///
/// The device answers an accepted logon with a plain 200 and a session
/// cookie. It does not answer a rejected one with a distinguishable body, so
/// a 200 is the only success signal there is.
pub async fn login(base_url: &str, username: &str, password: &str) -> Result<Session, AuthError> {
    let client = Client::builder()
        .cookie_store(true)
        .danger_accept_invalid_certs(true)
        .build()
        .map_err(TransportError::from)?;

    let form = [("username", username), ("password", password), ("logon", "Login")];
    let response = client
        .post(format!("{base_url}logon.cgi"))
        .form(&form)
        .send()
        .await
        .map_err(TransportError::from)?;

    if response.status() != StatusCode::OK {
        return Err(AuthError::HttpStatus(response.status()));
    }

    Ok(Session { client })
}

impl Session {
    /// Fetches a management page, replaying the session cookie.
    ///
    /// Returns the body regardless of status: an expired session makes the
    /// switch render its login page with a 200, so the status carries no
    /// signal here. Whether the body is the expected page is for the parsing
    /// layer to find out.
    pub async fn fetch(&self, base_url: &str, page_path: &str) -> Result<String, TransportError> {
        let response = self.client.get(format!("{base_url}{page_path}")).send().await?;
        Ok(response.text().await?)
    }
}

#[derive(Error, Debug)]
pub enum AuthError {
    #[error("login rejected with HTTP status {0}")]
    HttpStatus(StatusCode),
    #[error(transparent)]
    Transport(#[from] TransportError),
}

#[derive(Error, Debug)]
#[error("request failed: {0}")]
pub struct TransportError(#[from] reqwest::Error);
