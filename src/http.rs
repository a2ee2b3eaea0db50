//! HTTP implementation of the [`Backend`] trait.

use crate::api::{
    AccountProfile, AccountRequest, ChatId, ChatIdResponse, ChatListResponse, ChatSummary,
    CreateChatRequest, CreateChatResponse, LoginRequest, LoginResponse, ModelReplies,
    ModelRepliesRequest, SendMessageRequest, SessionCheck, SignUpRequest, StoredTranscript,
    UserId, UserIdRequest, UserIdResponse,
};
use crate::backend::Backend;
use crate::error::{Error, Result};
use url::Url;

/// HTTP backend client.
///
/// The session cookie issued at login is held in the client's cookie jar and
/// replayed on every request, so no operation carries credentials in its
/// payload. No client-side timeout is set; the backend is trusted to respond
/// or error.
///
/// # Example
///
/// ```rust,no_run
/// use medbear_client::http::HttpBackend;
///
/// # fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let backend = HttpBackend::new("http://localhost:8080")?;
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct HttpBackend {
    base_url: Url,
    http: reqwest::Client,
}

impl HttpBackend {
    /// Create a backend client for the given base URL.
    pub fn new(base_url: impl AsRef<str>) -> Result<Self> {
        let http = reqwest::Client::builder().cookie_store(true).build()?;
        Self::with_client(base_url, http)
    }

    /// Create a backend client with a custom `reqwest` client.
    ///
    /// The caller is responsible for enabling a cookie store; without one the
    /// session established at login is lost on the next request.
    pub fn with_client(base_url: impl AsRef<str>, http: reqwest::Client) -> Result<Self> {
        let base_url = Url::parse(base_url.as_ref())?;
        Ok(Self { base_url, http })
    }

    /// Get the base URL.
    #[must_use]
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Internal helpers
    // ─────────────────────────────────────────────────────────────────────────

    fn url(&self, path: &str) -> Url {
        self.base_url
            .join(path)
            .unwrap_or_else(|_| self.base_url.clone())
    }

    async fn handle_response<T: serde::de::DeserializeOwned>(
        response: reqwest::Response,
    ) -> Result<T> {
        let status = response.status();
        if status.is_success() {
            Ok(response.json().await?)
        } else {
            let message = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".into());
            Err(Error::Api {
                status: status.as_u16(),
                message,
            })
        }
    }

    async fn handle_ack(response: reqwest::Response) -> Result<()> {
        let status = response.status();
        if status.is_success() {
            Ok(())
        } else {
            let message = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".into());
            Err(Error::Api {
                status: status.as_u16(),
                message,
            })
        }
    }
}

#[async_trait::async_trait]
impl Backend for HttpBackend {
    async fn check_session(&self) -> Result<SessionCheck> {
        let response = self.http.get(self.url("/home")).send().await?;
        Self::handle_response(response).await
    }

    async fn user_id_for_username(&self, username: &str) -> Result<UserId> {
        let body = UserIdRequest {
            username: username.to_owned(),
        };
        let response = self
            .http
            .post(self.url("/get-id-for-username"))
            .json(&body)
            .send()
            .await?;
        let decoded: UserIdResponse = Self::handle_response(response).await?;
        Ok(decoded.id)
    }

    async fn chat_id_for_user(&self, user_id: UserId) -> Result<Option<ChatId>> {
        let response = self
            .http
            .get(self.url(&format!("/get-chat-id/{user_id}")))
            .send()
            .await?;
        let decoded: ChatIdResponse = Self::handle_response(response).await?;
        Ok(decoded.existing())
    }

    async fn create_chat(&self, user_id: UserId) -> Result<ChatId> {
        let body = CreateChatRequest { user_id };
        let response = self
            .http
            .post(self.url("/create-chat"))
            .json(&body)
            .send()
            .await?;
        let decoded: CreateChatResponse = Self::handle_response(response).await?;
        Ok(decoded.chat_id)
    }

    async fn chats_for_user(&self, user_id: UserId) -> Result<Vec<ChatSummary>> {
        let response = self
            .http
            .get(self.url(&format!("/get-user-chats/{user_id}")))
            .send()
            .await?;
        let decoded: ChatListResponse = Self::handle_response(response).await?;
        Ok(decoded.chats)
    }

    async fn chat_transcript(&self, chat_id: ChatId) -> Result<StoredTranscript> {
        let response = self
            .http
            .get(self.url(&format!("/restore-chat-history/{chat_id}")))
            .send()
            .await?;
        Self::handle_response(response).await
    }

    async fn persist_message(
        &self,
        chat_id: ChatId,
        message: &str,
        sender_id: UserId,
    ) -> Result<()> {
        let body = SendMessageRequest {
            chat_id,
            message: message.to_owned(),
            sender_id,
        };
        let response = self
            .http
            .post(self.url("/send-message"))
            .json(&body)
            .send()
            .await?;
        Self::handle_ack(response).await
    }

    async fn model_replies(&self, chat_id: ChatId, message: &str) -> Result<ModelReplies> {
        let body = ModelRepliesRequest {
            chat_id,
            message: message.to_owned(),
        };
        let response = self
            .http
            .post(self.url("/models-replies"))
            .json(&body)
            .send()
            .await?;
        Self::handle_response(response).await
    }

    async fn log_in(&self, login: &str, pwd: &str) -> Result<LoginResponse> {
        let body = LoginRequest {
            login: login.to_owned(),
            pwd: pwd.to_owned(),
        };
        let response = self
            .http
            .post(self.url("/log-in"))
            .json(&body)
            .send()
            .await?;
        Self::handle_response(response).await
    }

    async fn sign_up(&self, user: &str, email: &str, pwd: &str) -> Result<()> {
        let body = SignUpRequest {
            user: user.to_owned(),
            email: email.to_owned(),
            pwd: pwd.to_owned(),
        };
        let response = self
            .http
            .post(self.url("/sign-up"))
            .json(&body)
            .send()
            .await?;
        Self::handle_ack(response).await
    }

    async fn log_out(&self) -> Result<()> {
        let response = self.http.post(self.url("/log-out")).send().await?;
        Self::handle_ack(response).await
    }

    async fn account(&self, user_id: UserId) -> Result<AccountProfile> {
        let body = AccountRequest { id: user_id };
        let response = self
            .http
            .post(self.url("/get-account"))
            .json(&body)
            .send()
            .await?;
        Self::handle_response(response).await
    }

    async fn update_account(&self, profile: &AccountProfile) -> Result<()> {
        let response = self
            .http
            .post(self.url("/edit-account"))
            .json(profile)
            .send()
            .await?;
        Self::handle_ack(response).await
    }
}
