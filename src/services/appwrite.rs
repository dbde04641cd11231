use crate::core::CheckInUpdate;
use crate::models::{Match, Swipe, SwipeAction, UserProfile};
use reqwest::{Client, RequestBuilder, StatusCode};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::{json, Value};
use std::time::Duration;
use thiserror::Error;

/// Errors that can occur when interacting with Appwrite
#[derive(Debug, Error)]
pub enum AppwriteError {
    #[error("HTTP request failed: {0}")]
    RequestError(#[from] reqwest::Error),

    #[error("API returned error: {0}")]
    ApiError(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Unauthorized: invalid API key or token")]
    Unauthorized,

    #[error("Invalid response format: {0}")]
    InvalidResponse(String),
}

/// Collection IDs in Appwrite
#[derive(Debug, Clone)]
pub struct AppwriteCollections {
    pub user_profiles: String,
    pub swipes: String,
    pub matches: String,
}

/// Builders for Appwrite's query strings
pub struct Query;

impl Query {
    pub fn equal(attribute: &str, value: &str) -> String {
        format!("equal(\"{}\", [{}])", attribute, Value::from(value))
    }

    pub fn contains(attribute: &str, value: &str) -> String {
        format!("contains(\"{}\", [{}])", attribute, Value::from(value))
    }

    pub fn limit(limit: usize) -> String {
        format!("limit({})", limit)
    }

    pub fn offset(offset: usize) -> String {
        format!("offset({})", offset)
    }
}

/// Appwrite database client
///
/// Handles all communication with the Appwrite backend including:
/// - Reading the full profile table and single profiles
/// - Reading a user's matches and outgoing swipes
/// - Appending swipes and matches
/// - Writing check-in state back to a profile
pub struct AppwriteClient {
    base_url: String,
    api_key: String,
    project_id: String,
    database_id: String,
    client: Client,
    collections: AppwriteCollections,
    page_size: usize,
}

impl AppwriteClient {
    /// Create a new Appwrite client
    pub fn new(
        base_url: String,
        api_key: String,
        project_id: String,
        database_id: String,
        collections: AppwriteCollections,
        page_size: usize,
    ) -> Result<Self, AppwriteError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(30))
            .build()?;

        Ok(Self {
            base_url,
            api_key,
            project_id,
            database_id,
            client,
            collections,
            page_size: page_size.max(1),
        })
    }

    fn documents_url(&self, collection: &str) -> String {
        format!(
            "{}/databases/{}/collections/{}/documents",
            self.base_url.trim_end_matches('/'),
            self.database_id,
            collection
        )
    }

    fn document_url(&self, collection: &str, document_id: &str) -> String {
        format!(
            "{}/{}",
            self.documents_url(collection),
            urlencoding::encode(document_id)
        )
    }

    fn authorized(&self, builder: RequestBuilder) -> RequestBuilder {
        builder
            .header("X-Appwrite-Key", &self.api_key)
            .header("X-Appwrite-Project", &self.project_id)
    }

    async fn check_status(response: reqwest::Response, what: &str) -> Result<reqwest::Response, AppwriteError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_else(|_| "Unable to read body".to_string());
        tracing::debug!("Appwrite {} failed: {} - {}", what, status, body);

        match status {
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => Err(AppwriteError::Unauthorized),
            StatusCode::NOT_FOUND => Err(AppwriteError::NotFound(what.to_string())),
            _ => Err(AppwriteError::ApiError(format!("Failed to {}: {}", what, status))),
        }
    }

    /// List every document of a collection matching `queries`, page by page
    async fn list_documents<T: DeserializeOwned>(
        &self,
        collection: &str,
        queries: &[String],
    ) -> Result<Vec<T>, AppwriteError> {
        let url = self.documents_url(collection);
        let mut items = Vec::new();
        let mut offset = 0;

        loop {
            let mut params: Vec<(&str, String)> = queries
                .iter()
                .map(|q| ("queries[]", q.clone()))
                .collect();
            params.push(("queries[]", Query::limit(self.page_size)));
            params.push(("queries[]", Query::offset(offset)));

            let response = self
                .authorized(self.client.get(&url))
                .query(&params)
                .send()
                .await?;
            let response = Self::check_status(response, &format!("list {}", collection)).await?;

            let json: Value = response.json().await?;

            let total = json
                .get("total")
                .and_then(|t| t.as_u64())
                .unwrap_or(0) as usize;

            let documents = json
                .get("documents")
                .and_then(|d| d.as_array())
                .ok_or_else(|| AppwriteError::InvalidResponse("Missing documents array".into()))?;

            let page_len = documents.len();
            for doc in documents {
                items.push(parse_document(doc)?);
            }

            offset += page_len;
            if page_len < self.page_size || offset >= total {
                break;
            }
        }

        tracing::debug!("Listed {} documents from {}", items.len(), collection);

        Ok(items)
    }

    /// Create a document with a fresh id, returning that id
    async fn create_document<T: Serialize>(&self, collection: &str, data: &T) -> Result<String, AppwriteError> {
        let document_id = uuid::Uuid::new_v4().to_string();
        let payload = json!({
            "documentId": document_id,
            "data": data,
        });

        let response = self
            .authorized(self.client.post(self.documents_url(collection)))
            .json(&payload)
            .send()
            .await?;
        Self::check_status(response, &format!("create document in {}", collection)).await?;

        Ok(document_id)
    }

    /// Read every user profile
    pub async fn list_profiles(&self) -> Result<Vec<UserProfile>, AppwriteError> {
        self.list_documents(&self.collections.user_profiles, &[]).await
    }

    /// Get a single profile by user ID, `None` if it does not exist
    pub async fn get_profile(&self, user_id: &str) -> Result<Option<UserProfile>, AppwriteError> {
        tracing::debug!("Fetching profile for user: {}", user_id);

        let response = self
            .authorized(self.client.get(self.document_url(&self.collections.user_profiles, user_id)))
            .send()
            .await?;

        match Self::check_status(response, "fetch profile").await {
            Ok(response) => {
                let json: Value = response.json().await?;
                Ok(Some(parse_document(&json)?))
            }
            Err(AppwriteError::NotFound(_)) => Ok(None),
            Err(e) => Err(e),
        }
    }

    /// Matches the user belongs to
    pub async fn list_matches(&self, user_id: &str) -> Result<Vec<Match>, AppwriteError> {
        self.list_documents(&self.collections.matches, &[Query::contains("users", user_id)])
            .await
    }

    /// Swipes the user has made
    pub async fn list_swipes_by(&self, user_id: &str) -> Result<Vec<Swipe>, AppwriteError> {
        self.list_documents(&self.collections.swipes, &[Query::equal("swiperId", user_id)])
            .await
    }

    /// Whether `swiper_id` has liked `target_id`
    pub async fn has_liked(&self, swiper_id: &str, target_id: &str) -> Result<bool, AppwriteError> {
        let likes: Vec<Swipe> = self
            .list_documents(
                &self.collections.swipes,
                &[
                    Query::equal("swiperId", swiper_id),
                    Query::equal("targetId", target_id),
                ],
            )
            .await?;

        Ok(likes.iter().any(|s| s.action == SwipeAction::Like))
    }

    /// Append a swipe
    pub async fn record_swipe(&self, swipe: &Swipe) -> Result<String, AppwriteError> {
        let id = self.create_document(&self.collections.swipes, swipe).await?;
        tracing::debug!("Recorded swipe: {} -> {} ({:?})", swipe.swiper_id, swipe.target_id, swipe.action);
        Ok(id)
    }

    /// Create a match document
    pub async fn create_match(&self, m: &Match) -> Result<String, AppwriteError> {
        let id = self.create_document(&self.collections.matches, m).await?;
        tracing::debug!("Created match {} for {:?}", id, m.users);
        Ok(id)
    }

    /// Write the attendance mark, streak and last check-in date to a profile
    pub async fn record_check_in(
        &self,
        profile: &UserProfile,
        update: &CheckInUpdate,
    ) -> Result<(), AppwriteError> {
        let mut attendance = profile.attendance.clone();
        attendance.insert(update.attendance_key(), true);

        let payload = json!({
            "data": {
                "attendance": attendance,
                "streak": update.streak,
                "lastCheckIn": update.date,
            }
        });

        let response = self
            .authorized(self.client.patch(self.document_url(&self.collections.user_profiles, &profile.user_id)))
            .json(&payload)
            .send()
            .await?;
        Self::check_status(response, "update profile").await?;

        tracing::debug!("Recorded check-in for {} on {}", profile.user_id, update.date);

        Ok(())
    }
}

/// Decode an Appwrite document, unwrapping a nested `data` object if present
fn parse_document<T: DeserializeOwned>(doc: &Value) -> Result<T, AppwriteError> {
    let data = doc.get("data").unwrap_or(doc);
    serde_json::from_value(data.clone())
        .map_err(|e| AppwriteError::InvalidResponse(format!("Failed to parse document: {}", e)))
}
