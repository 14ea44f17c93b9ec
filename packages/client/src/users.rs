//! Registration and login. Neither request carries a token.

use hackathon_survey_hackathon_models::{Credentials, Token};
use reqwest::multipart::Form;

use crate::{ClientError, HttpClient, retry};

const REGISTER_PATH: &str = "/users";
const LOGIN_PATH: &str = "/users/login";

fn credentials_form(credentials: &Credentials) -> Form {
    Form::new()
        .text("username", credentials.username.clone())
        .text("password", credentials.password.clone())
}

impl HttpClient {
    /// Registers a new user.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::Status`] if the backend rejects the user.
    pub async fn register(&self, credentials: &Credentials) -> Result<(), ClientError> {
        log::info!("Registering user {}", credentials.username);
        retry::send(REGISTER_PATH, 0, || {
            self.request(reqwest::Method::POST, REGISTER_PATH)
                .multipart(credentials_form(credentials))
        })
        .await?;
        Ok(())
    }

    /// Logs in, stores the returned access token on this client, and
    /// returns it.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::Status`] for wrong credentials.
    pub async fn login(&self, credentials: &Credentials) -> Result<Token, ClientError> {
        let token: Token = retry::send_json(LOGIN_PATH, self.config.max_retries, || {
            self.request(reqwest::Method::POST, LOGIN_PATH)
                .multipart(credentials_form(credentials))
        })
        .await?;

        log::info!("Logged in as {}", credentials.username);
        self.set_token(Some(token.access_token.clone()));
        Ok(token)
    }
}
