//! # readarabic-client
//!
//! `reqwest` implementation of the reader API traits.
//!
//! Every endpoint answers with a JSON envelope carrying `success` and, on
//! failure, `error`. A 403 whose error is `FREE_LIMIT_REACHED` becomes
//! [`ApiError::FreeLimitReached`].

use async_trait::async_trait;
use readarabic_core::api::{
    ApiError, ApiResult, AuthApi, CatalogApi, LookupApi, SubscriptionApi, VocabularyApi,
    FREE_LIMIT_REACHED,
};
use readarabic_core::models::{
    Book, BookSummary, Category, Definition, NewSubscription, NewVocabulary, RecentBook,
    Subscription, User, VocabularyRecord,
};
use readarabic_core::Config;
use readarabic_types::{BookId, CategoryId, UserId, VocabularyId};
use reqwest::{Client, RequestBuilder, Url};
use serde::de::DeserializeOwned;
use serde_json::{json, Value};
use std::time::Duration;
use thiserror::Error;
use tracing::debug;

#[derive(Error, Debug)]
pub enum ClientError {
    #[error("invalid API base URL {0:?}")]
    InvalidBaseUrl(String),

    #[error("failed to build HTTP client: {0}")]
    Build(#[from] reqwest::Error),
}

#[derive(Debug, Clone)]
pub struct HttpApi {
    client: Client,
    base: Url,
}

impl HttpApi {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, ClientError> {
        let base = Url::parse(base_url.trim())
            .map_err(|_| ClientError::InvalidBaseUrl(base_url.to_string()))?;
        if base.cannot_be_a_base() || !matches!(base.scheme(), "http" | "https") {
            return Err(ClientError::InvalidBaseUrl(base_url.to_string()));
        }
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self { client, base })
    }

    pub fn from_config(config: &Config) -> Result<Self, ClientError> {
        Self::new(&config.api_base_url(), config.timeout())
    }

    pub fn base_url(&self) -> &Url {
        &self.base
    }

    /// `{base}/api/{segments...}`, each segment percent-encoded
    fn url(&self, segments: &[&str]) -> ApiResult<Url> {
        let mut url = self.base.clone();
        url.path_segments_mut()
            .map_err(|_| ApiError::Transport(format!("cannot build URL from {}", self.base)))?
            .pop_if_empty()
            .push("api")
            .extend(segments);
        Ok(url)
    }

    async fn send(&self, request: RequestBuilder) -> ApiResult<Value> {
        let response = request.send().await.map_err(transport_error)?;
        let status = response.status().as_u16();
        debug!(status, url = %response.url(), "api response");
        let body = response.text().await.map_err(transport_error)?;
        interpret(status, &body)
    }

    async fn get(&self, url: Url) -> ApiResult<Value> {
        self.send(self.client.get(url)).await
    }
}

fn transport_error(err: reqwest::Error) -> ApiError {
    if err.is_timeout() {
        ApiError::Timeout
    } else {
        ApiError::Transport(err.to_string())
    }
}

/// Map a status code and envelope body to a payload or an error
pub fn interpret(status: u16, body: &str) -> ApiResult<Value> {
    let ok = (200..300).contains(&status);
    let value: Value = match serde_json::from_str(body) {
        Ok(value) => value,
        Err(err) if ok => return Err(ApiError::Decode(err.to_string())),
        Err(_) => {
            return Err(ApiError::Status {
                status,
                message: body.trim().chars().take(200).collect(),
            })
        }
    };

    let error = error_message(&value);
    if status == 403 && error.as_deref() == Some(FREE_LIMIT_REACHED) {
        return Err(ApiError::FreeLimitReached {
            vocab_count: value.get("vocab_count").and_then(Value::as_u64),
        });
    }
    if !ok {
        return Err(ApiError::Status {
            status,
            message: error.unwrap_or_else(|| format!("HTTP {status}")),
        });
    }
    if value.get("success").and_then(Value::as_bool) == Some(false) {
        return Err(ApiError::Rejected(
            error.unwrap_or_else(|| "request failed".to_string()),
        ));
    }
    Ok(value)
}

/// `error` may be a string or `{message}`; `message` is a fallback
fn error_message(value: &Value) -> Option<String> {
    match value.get("error") {
        Some(Value::String(s)) => Some(s.clone()),
        Some(Value::Object(obj)) => obj.get("message").and_then(Value::as_str).map(str::to_string),
        _ => value
            .get("message")
            .and_then(Value::as_str)
            .map(str::to_string),
    }
}

/// Deserialize a required top-level field of the payload
pub fn field<T: DeserializeOwned>(value: &mut Value, name: &str) -> ApiResult<T> {
    let raw = value
        .get_mut(name)
        .map(Value::take)
        .ok_or_else(|| ApiError::Decode(format!("missing field `{name}`")))?;
    serde_json::from_value(raw).map_err(|err| ApiError::Decode(format!("`{name}`: {err}")))
}

/// Id of a created record, either nested under `vocabulary` or top level
fn created_id(value: &Value) -> ApiResult<VocabularyId> {
    let raw = value
        .pointer("/vocabulary/id")
        .or_else(|| value.get("id"))
        .cloned()
        .ok_or_else(|| ApiError::Decode("missing field `id`".into()))?;
    serde_json::from_value(raw).map_err(|err| ApiError::Decode(err.to_string()))
}

#[async_trait]
impl CatalogApi for HttpApi {
    async fn categories(&self) -> ApiResult<Vec<Category>> {
        let mut value = self.get(self.url(&["categories"])?).await?;
        field(&mut value, "categories")
    }

    async fn books(&self, category: Option<&CategoryId>) -> ApiResult<Vec<BookSummary>> {
        let mut url = self.url(&["books"])?;
        if let Some(category) = category {
            url.query_pairs_mut().append_pair("category", category.as_str());
        }
        let mut value = self.get(url).await?;
        field(&mut value, "books")
    }

    async fn book(&self, id: &BookId) -> ApiResult<Book> {
        let mut value = self.get(self.url(&["book", id.as_str()])?).await?;
        field(&mut value, "book")
    }
}

#[async_trait]
impl LookupApi for HttpApi {
    async fn define(&self, word: &str) -> ApiResult<Vec<Definition>> {
        let mut value = self.get(self.url(&["define", word])?).await?;
        match value.pointer_mut("/definition/words").map(Value::take) {
            Some(Value::Null) | None => Ok(Vec::new()),
            Some(words) => serde_json::from_value(words)
                .map_err(|err| ApiError::Decode(format!("`definition.words`: {err}"))),
        }
    }

    async fn translate(&self, text: &str, is_single_word: bool) -> ApiResult<String> {
        let request = self
            .client
            .post(self.url(&["translate"])?)
            .json(&json!({ "text": text, "is_single_word": is_single_word }));
        let mut value = self.send(request).await?;
        field(&mut value, "translation")
    }
}

#[async_trait]
impl VocabularyApi for HttpApi {
    async fn list(&self, user: &UserId, book: Option<&BookId>) -> ApiResult<Vec<VocabularyRecord>> {
        let mut url = self.url(&["vocabulary", user.as_str()])?;
        if let Some(book) = book {
            url.query_pairs_mut().append_pair("book_id", book.as_str());
        }
        let mut value = self.get(url).await?;
        field(&mut value, "vocabulary")
    }

    async fn create(&self, record: &NewVocabulary) -> ApiResult<VocabularyId> {
        let request = self
            .client
            .post(self.url(&["vocabulary"])?)
            .json(record);
        let value = self.send(request).await?;
        created_id(&value)
    }

    async fn update(&self, id: &VocabularyId, translation: &str) -> ApiResult<()> {
        let request = self
            .client
            .put(self.url(&["vocabulary", id.as_str()])?)
            .json(&json!({ "translation": translation }));
        self.send(request).await.map(drop)
    }

    async fn delete(&self, id: &VocabularyId) -> ApiResult<()> {
        let request = self.client.delete(self.url(&["vocabulary", id.as_str()])?);
        self.send(request).await.map(drop)
    }

    async fn recent_books(&self, user: &UserId) -> ApiResult<Vec<RecentBook>> {
        let url = self.url(&["vocabulary", user.as_str(), "recent-books"])?;
        let mut value = self.get(url).await?;
        field(&mut value, "books")
    }

    async fn due(&self, user: &UserId, book: Option<&BookId>) -> ApiResult<Vec<VocabularyRecord>> {
        let mut url = self.url(&["vocabulary", "due", user.as_str()])?;
        if let Some(book) = book {
            url.query_pairs_mut().append_pair("book_id", book.as_str());
        }
        let mut value = self.get(url).await?;
        field(&mut value, "vocabulary")
    }

    async fn review(&self, id: &VocabularyId, correct: bool) -> ApiResult<()> {
        let request = self
            .client
            .put(self.url(&["vocabulary", id.as_str(), "review"])?)
            .json(&json!({ "correct": correct }));
        self.send(request).await.map(drop)
    }
}

#[async_trait]
impl SubscriptionApi for HttpApi {
    async fn status(&self, user: &UserId) -> ApiResult<Option<Subscription>> {
        let mut value = self
            .get(self.url(&["subscription", "status", user.as_str()])?)
            .await?;
        match value.get_mut("subscription").map(Value::take) {
            Some(Value::Null) | None => Ok(None),
            Some(sub) => serde_json::from_value(sub)
                .map(Some)
                .map_err(|err| ApiError::Decode(format!("`subscription`: {err}"))),
        }
    }

    async fn cancel(&self, user: &UserId) -> ApiResult<()> {
        let request = self
            .client
            .post(self.url(&["subscription", "cancel", user.as_str()])?);
        self.send(request).await.map(drop)
    }

    async fn create(&self, subscription: &NewSubscription) -> ApiResult<()> {
        let request = self
            .client
            .post(self.url(&["subscription", "create"])?)
            .json(subscription);
        self.send(request).await.map(drop)
    }
}

#[async_trait]
impl AuthApi for HttpApi {
    async fn google_credential(&self, credential: &str) -> ApiResult<User> {
        let request = self
            .client
            .post(self.url(&["auth", "google"])?)
            .json(&json!({ "credential": credential }));
        let mut value = self.send(request).await?;
        field(&mut value, "user")
    }

    async fn google_callback(&self, code: &str, redirect_uri: &str) -> ApiResult<User> {
        let request = self
            .client
            .post(self.url(&["auth", "google", "callback"])?)
            .json(&json!({ "code": code, "redirect_uri": redirect_uri }));
        let mut value = self.send(request).await?;
        field(&mut value, "user")
    }
}
