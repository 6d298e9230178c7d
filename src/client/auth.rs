//! Logging in, registering and reading the signed-in user.

use reqwest::header::CONTENT_TYPE;
use serde::{Deserialize, Serialize};

use crate::{
    Error,
    client::{ApiClient, check_status},
    logging::redact_password,
    token::AccessToken,
    user::{CurrentUser, Registration},
};

const LOGIN_FAILED: &str = "Login failed";
const REGISTRATION_FAILED: &str = "Registration failed";

#[derive(Serialize)]
struct LoginForm<'a> {
    username: &'a str,
    password: &'a str,
}

#[derive(Deserialize)]
struct TokenResponse {
    access_token: String,
}

impl ApiClient {
    /// Exchange a username and password for a bearer token.
    ///
    /// The token is kept on the client for later requests and returned so that
    /// it can be stored.
    ///
    /// # Errors
    ///
    /// Returns [Error::Unauthorized] for wrong credentials, with the API's
    /// message or "Login failed".
    pub async fn login(&mut self, username: &str, password: &str) -> Result<AccessToken, Error> {
        let body = serde_urlencoded::to_string(LoginForm { username, password })?;
        tracing::debug!(
            "POST /auth/login {}",
            redact_password(&body, "password")
        );

        let response = self
            .http
            .post(self.url("/auth/login"))
            .header(CONTENT_TYPE, "application/x-www-form-urlencoded")
            .body(body)
            .send()
            .await?;
        let response = check_status(response, Some(LOGIN_FAILED)).await?;
        let token: TokenResponse = response.json().await?;

        let token = AccessToken::new(token.access_token);
        self.token = Some(token.clone());
        tracing::info!("Logged in as {username}");

        Ok(token)
    }

    /// Create an account. The new user still has to log in.
    ///
    /// # Errors
    ///
    /// Returns an error with the API's message or "Registration failed", e.g.
    /// when the username is taken.
    pub async fn register(&self, registration: &Registration) -> Result<(), Error> {
        tracing::debug!("POST /auth/register {registration:?}");

        let response = self
            .http
            .post(self.url("/auth/register"))
            .json(registration)
            .send()
            .await?;
        check_status(response, Some(REGISTRATION_FAILED)).await?;

        Ok(())
    }

    /// The signed-in user.
    pub async fn me(&self) -> Result<CurrentUser, Error> {
        self.get_json("/auth/me").await
    }

    /// Forget the token. The API keeps no session, so nothing is sent.
    pub fn logout(&mut self) {
        self.token = None;
    }
}

#[cfg(test)]
mod tests {
    use crate::{
        Error,
        client::ApiClient,
        test_utils::{TEST_PASSWORD, TEST_TOKEN, spawn_fake_api},
        user::Registration,
    };

    #[tokio::test]
    async fn login_stores_token() {
        let api = spawn_fake_api().await;
        let mut client = ApiClient::new(&api.base_url).unwrap();

        let token = client.login("jane", TEST_PASSWORD).await.unwrap();

        assert_eq!(token.as_str(), TEST_TOKEN);
        assert_eq!(client.token(), Some(&token));

        let request = api.last_request();
        assert_eq!(request.path, "/auth/login");
        assert_eq!(
            request.content_type.as_deref(),
            Some("application/x-www-form-urlencoded")
        );
        assert_eq!(request.authorization, None);
    }

    #[tokio::test]
    async fn login_with_wrong_password_uses_api_message() {
        let api = spawn_fake_api().await;
        let mut client = ApiClient::new(&api.base_url).unwrap();

        let result = client.login("jane", "wrong").await;

        assert_eq!(
            result,
            Err(Error::Unauthorized(
                "Incorrect username or password".to_owned()
            ))
        );
        assert_eq!(client.token(), None);
    }

    #[tokio::test]
    async fn login_without_detail_falls_back_to_default_message() {
        let api = spawn_fake_api().await;
        let mut client = ApiClient::new(&api.base_url).unwrap();

        let result = client.login("locked", TEST_PASSWORD).await;

        assert_eq!(result, Err(Error::Unauthorized("Login failed".to_owned())));
    }

    #[tokio::test]
    async fn me_sends_the_token() {
        let api = spawn_fake_api().await;
        let mut client = ApiClient::new(&api.base_url).unwrap();
        client.login("jane", TEST_PASSWORD).await.unwrap();

        let user = client.me().await.unwrap();

        assert_eq!(user.username, "jane");
        let request = api.last_request();
        assert_eq!(
            request.authorization.as_deref(),
            Some(format!("Bearer {TEST_TOKEN}").as_str())
        );
    }

    #[tokio::test]
    async fn logout_forgets_the_token() {
        let api = spawn_fake_api().await;
        let mut client = ApiClient::new(&api.base_url).unwrap();
        client.login("jane", TEST_PASSWORD).await.unwrap();

        client.logout();

        assert_eq!(client.me().await, Err(Error::NotLoggedIn));
    }

    #[tokio::test]
    async fn register_reports_api_detail() {
        let api = spawn_fake_api().await;
        let client = ApiClient::new(&api.base_url).unwrap();
        let registration = Registration {
            username: "taken".to_owned(),
            email: "taken@example.com".to_owned(),
            password: "averylongandstrongpassword".to_owned(),
        };

        let result = client.register(&registration).await;

        assert_eq!(
            result,
            Err(Error::ApiError {
                status: 400,
                detail: "Username already registered".to_owned()
            })
        );
    }

    #[tokio::test]
    async fn register_new_user() {
        let api = spawn_fake_api().await;
        let client = ApiClient::new(&api.base_url).unwrap();
        let registration = Registration {
            username: "new".to_owned(),
            email: "new@example.com".to_owned(),
            password: "averylongandstrongpassword".to_owned(),
        };

        assert_eq!(client.register(&registration).await, Ok(()));
        assert_eq!(
            api.last_request().content_type.as_deref(),
            Some("application/json")
        );
    }
}
