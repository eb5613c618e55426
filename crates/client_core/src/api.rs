use async_trait::async_trait;
use reqwest::{Client, Response, StatusCode};
use serde::de::DeserializeOwned;
use shared::{
    domain::CharacterId,
    error::ServerMessage,
    protocol::{Character, NewCharacter, UsersListResponse},
};
use url::Url;

use crate::{config::parse_base_url, error::ApiError};

const USERS_PATH: &str = "users";

/// Remote character collection.
#[async_trait]
pub trait CharacterApi: Send + Sync {
    async fn list(&self) -> Result<Vec<Character>, ApiError>;
    /// Succeeds only on `201 Created`.
    async fn create(&self, record: &NewCharacter) -> Result<Character, ApiError>;
    /// Succeeds only on `204 No Content`.
    async fn delete(&self, id: &CharacterId) -> Result<(), ApiError>;
}

pub struct HttpCharacterApi {
    http: Client,
    base_url: Url,
}

impl HttpCharacterApi {
    pub fn new(base_url: &str) -> Result<Self, ApiError> {
        Ok(Self::with_client(Client::new(), parse_base_url(base_url)?))
    }

    pub fn with_client(http: Client, base_url: Url) -> Self {
        Self { http, base_url }
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    fn endpoint(&self, segments: &[&str]) -> Result<Url, ApiError> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|()| ApiError::InvalidBaseUrl {
                url: self.base_url.to_string(),
                reason: "base url cannot carry a path".into(),
            })?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }
}

#[async_trait]
impl CharacterApi for HttpCharacterApi {
    async fn list(&self) -> Result<Vec<Character>, ApiError> {
        let url = self.endpoint(&[USERS_PATH])?;
        let response = self
            .http
            .get(url.clone())
            .send()
            .await
            .map_err(|source| network(&url, source))?;

        if response.status() != StatusCode::OK {
            return Err(unexpected_status(&url, StatusCode::OK, response).await);
        }
        let body: UsersListResponse = decode(&url, response).await?;
        Ok(body.users_list)
    }

    async fn create(&self, record: &NewCharacter) -> Result<Character, ApiError> {
        let url = self.endpoint(&[USERS_PATH])?;
        let response = self
            .http
            .post(url.clone())
            .json(record)
            .send()
            .await
            .map_err(|source| network(&url, source))?;

        if response.status() != StatusCode::CREATED {
            return Err(unexpected_status(&url, StatusCode::CREATED, response).await);
        }
        decode(&url, response).await
    }

    async fn delete(&self, id: &CharacterId) -> Result<(), ApiError> {
        let id = id.to_string();
        let url = self.endpoint(&[USERS_PATH, &id])?;
        let response = self
            .http
            .delete(url.clone())
            .send()
            .await
            .map_err(|source| network(&url, source))?;

        if response.status() != StatusCode::NO_CONTENT {
            return Err(unexpected_status(&url, StatusCode::NO_CONTENT, response).await);
        }
        Ok(())
    }
}

fn network(url: &Url, source: reqwest::Error) -> ApiError {
    ApiError::Network {
        url: url.to_string(),
        source,
    }
}

async fn unexpected_status(url: &Url, expected: StatusCode, response: Response) -> ApiError {
    let actual = response.status();
    let body = response
        .text()
        .await
        .map(|body| ServerMessage::from_body(&body))
        .unwrap_or(ServerMessage::Empty);
    ApiError::UnexpectedStatus {
        url: url.to_string(),
        expected,
        actual,
        body,
    }
}

async fn decode<T: DeserializeOwned>(url: &Url, response: Response) -> Result<T, ApiError> {
    let body = response
        .text()
        .await
        .map_err(|source| network(url, source))?;
    serde_json::from_str(&body).map_err(|source| ApiError::Decode {
        url: url.to_string(),
        source,
    })
}
