use reqwest::StatusCode;
use thiserror::Error;

use crate::form::RegistrationForm;
use crate::users::dto::Message;
use crate::users::store::UserRecord;

pub const REGISTER_PATH: &str = "/register";
pub const USERS_PATH: &str = "/getusers";
pub const UPLOAD_PATH: &str = "/upload_profile_picture";

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("server replied {status}: {message}")]
    Rejected { status: StatusCode, message: String },
}

/// HTTP client for the registration service. No retries; reqwest's default
/// timeouts apply.
pub struct RegistrationClient {
    http: reqwest::Client,
    base_url: String,
}

impl RegistrationClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        let base_url = base_url.into();
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// POST /register with all five form fields; the service ignores
    /// `confirm_password`. Returns the confirmation message.
    pub async fn register(&self, form: &RegistrationForm) -> Result<String, ClientError> {
        let response = self
            .http
            .post(self.url(REGISTER_PATH))
            .json(form)
            .send()
            .await?;
        let response = check(response).await?;
        let body: Message = response.json().await?;
        Ok(body.message)
    }

    /// GET /getusers.
    pub async fn list_users(&self) -> Result<Vec<UserRecord>, ClientError> {
        let response = self.http.get(self.url(USERS_PATH)).send().await?;
        let response = check(response).await?;
        Ok(response.json().await?)
    }

    /// POST /upload_profile_picture with a single multipart part named
    /// `file`. Returns the server's plain-text reply.
    pub async fn upload_profile_picture(
        &self,
        file_name: &str,
        body: Vec<u8>,
    ) -> Result<String, ClientError> {
        let part = reqwest::multipart::Part::bytes(body).file_name(file_name.to_string());
        let form = reqwest::multipart::Form::new().part("file", part);
        let response = self
            .http
            .post(self.url(UPLOAD_PATH))
            .multipart(form)
            .send()
            .await?;
        let response = check(response).await?;
        Ok(response.text().await?)
    }
}

/// Maps non-2xx replies to [`ClientError::Rejected`], keeping the server's
/// `{message}` body when it parses as one.
async fn check(response: reqwest::Response) -> Result<reqwest::Response, ClientError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let message = match response.json::<Message>().await {
        Ok(body) => body.message,
        Err(_) => status
            .canonical_reason()
            .unwrap_or("request failed")
            .to_string(),
    };
    Err(ClientError::Rejected { status, message })
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::Matcher;
    use serde_json::json;

    fn valid_form() -> RegistrationForm {
        RegistrationForm {
            name: "Ada Lovelace".to_string(),
            phone: "0123456789".to_string(),
            email: "ada@example.com".to_string(),
            password: "Passw0rd!".to_string(),
            confirm_password: "Passw0rd!".to_string(),
        }
    }

    #[tokio::test]
    async fn register_posts_all_five_fields() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/register")
            .match_body(Matcher::PartialJson(json!({
                "name": "Ada Lovelace",
                "phone": "0123456789",
                "email": "ada@example.com",
                "password": "Passw0rd!",
                "confirm_password": "Passw0rd!",
            })))
            .with_status(201)
            .with_header("content-type", "application/json")
            .with_body(r#"{"message":"User registered successfully"}"#)
            .create_async()
            .await;

        let client = RegistrationClient::new(server.url());
        let message = client.register(&valid_form()).await.unwrap();

        assert_eq!(message, "User registered successfully");
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn list_users_parses_the_user_array() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/getusers")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(
                r#"[{"_id":"66f0c0ffee0ddba11ad0beef","name":"Ada Lovelace","phone":"0123456789","email":"ada@example.com","password":"Passw0rd!"}]"#,
            )
            .create_async()
            .await;

        let client = RegistrationClient::new(server.url());
        let users = client.list_users().await.unwrap();

        assert_eq!(users.len(), 1);
        assert_eq!(users[0].id, "66f0c0ffee0ddba11ad0beef");
        assert_eq!(users[0].name, "Ada Lovelace");
        assert_eq!(users[0].password, "Passw0rd!");
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn upload_sends_one_part_named_file() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/upload_profile_picture")
            .match_header("content-type", Matcher::Regex("multipart/form-data.*".to_string()))
            .match_body(Matcher::Regex(r#"name="file"; filename="avatar.png""#.to_string()))
            .with_status(200)
            .with_body("Profile picture uploaded successfully")
            .create_async()
            .await;

        let client = RegistrationClient::new(server.url());
        let reply = client
            .upload_profile_picture("avatar.png", b"pixels".to_vec())
            .await
            .unwrap();

        assert_eq!(reply, "Profile picture uploaded successfully");
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn non_success_replies_surface_the_server_message() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("POST", "/register")
            .with_status(500)
            .with_header("content-type", "application/json")
            .with_body(r#"{"message":"Internal Server Error"}"#)
            .create_async()
            .await;

        let client = RegistrationClient::new(server.url());
        let err = client.register(&valid_form()).await.unwrap_err();

        match err {
            ClientError::Rejected { status, message } => {
                assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
                assert_eq!(message, "Internal Server Error");
            }
            other => panic!("expected Rejected, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn trailing_slash_in_the_base_url_is_tolerated() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/getusers")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body("[]")
            .create_async()
            .await;

        let client = RegistrationClient::new(format!("{}/", server.url()));
        let users = client.list_users().await.unwrap();

        assert!(users.is_empty());
        mock.assert_async().await;
    }
}
