//! Authenticated collection sync
//!
//! Keeps a [`LocalCollection`] consistent with a remote collection endpoint.
//! Every request carries the stored bearer token; every successful response
//! is merged into local state without a re-fetch.

use std::sync::Arc;

use serde_json::Value;
use tokio::sync::{watch, Mutex};
use tracing::{debug, info, warn};

use super::collection::{LocalCollection, Merge};
use super::form::EditForm;
use crate::error::{ApiError, ApiResult, SyncError, SyncResult};
use crate::models::{Resource, ResourceFields};
use crate::token::{load_auth_token, AuthToken, TokenStore};
use crate::transport::{ApiRequest, ApiResponse, Transport};

/// Operation state of a collection
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncStatus {
    /// Nothing in flight
    Idle,
    /// Full list fetch in flight
    Loading,
    /// Create, update or delete in flight
    Submitting,
    /// The last operation failed
    Error,
}

/// How a DELETE response is judged
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeleteMode {
    /// Non-success status fails the delete
    Verified,
    /// Any response counts as success; only transport errors fail
    Optimistic,
}

impl DeleteMode {
    /// Mode for the `verify_delete` config flag
    pub fn from_verify(verify: bool) -> Self {
        if verify {
            DeleteMode::Verified
        } else {
            DeleteMode::Optimistic
        }
    }
}

/// Shared handle; the mutex serializes operations from concurrent tasks
pub type SharedSync<R> = Arc<Mutex<ResourceSync<R>>>;

/// Sync client for one resource collection
pub struct ResourceSync<R: Resource> {
    /// Sends requests
    transport: Arc<dyn Transport>,
    /// Holds the bearer token
    tokens: Arc<dyn TokenStore>,
    /// Local mirror
    collection: LocalCollection<R>,
    /// DELETE response handling
    delete_mode: DeleteMode,
    /// Current status
    status: watch::Sender<SyncStatus>,
    /// Status receiver for external monitoring
    status_rx: watch::Receiver<SyncStatus>,
}

impl<R: Resource> ResourceSync<R> {
    /// Create a sync client with an empty local collection
    pub fn new(transport: Arc<dyn Transport>, tokens: Arc<dyn TokenStore>) -> Self {
        let (status_tx, status_rx) = watch::channel(SyncStatus::Idle);
        Self {
            transport,
            tokens,
            collection: LocalCollection::new(),
            delete_mode: DeleteMode::Verified,
            status: status_tx,
            status_rx,
        }
    }

    /// Set how DELETE responses are judged
    pub fn with_delete_mode(mut self, mode: DeleteMode) -> Self {
        self.delete_mode = mode;
        self
    }

    /// Wrap in a shared handle for use from several tasks
    pub fn into_shared(self) -> SharedSync<R> {
        Arc::new(Mutex::new(self))
    }

    /// Local entries, in order
    pub fn items(&self) -> &[R] {
        self.collection.items()
    }

    /// The local collection
    pub fn collection(&self) -> &LocalCollection<R> {
        &self.collection
    }

    /// Get the current status
    pub fn status(&self) -> SyncStatus {
        *self.status_rx.borrow()
    }

    /// Subscribe to status changes
    pub fn subscribe_status(&self) -> watch::Receiver<SyncStatus> {
        self.status_rx.clone()
    }

    /// Stored bearer token, if any
    ///
    /// Store failures are logged and treated as "no token".
    pub fn auth_token(&self) -> Option<AuthToken> {
        load_auth_token(self.tokens.as_ref())
    }

    /// Value for the `Authorization` header (`Bearer <token>`)
    ///
    /// `None` when there is no usable token; requests then go out without
    /// the header. Never fails.
    pub fn authorization_header(&self) -> Option<String> {
        self.auth_token().map(|token| token.header_value())
    }

    /// Fetch the full collection and replace local state with it
    ///
    /// On failure local state is left untouched.
    pub async fn list_all(&mut self) -> SyncResult<&[R]> {
        self.set_status(SyncStatus::Loading);

        let request = ApiRequest::get([R::COLLECTION]).with_bearer(self.auth_token());
        let result = self.transport.send(request).await.and_then(parse_list::<R>);

        match result {
            Ok(items) => {
                info!("Fetched {} {}", items.len(), R::COLLECTION);
                self.collection.replace_all(items);
                self.set_status(SyncStatus::Idle);
                Ok(self.collection.items())
            }
            Err(e) => {
                warn!("Fetching {} failed: {}", R::COLLECTION, e);
                self.set_status(SyncStatus::Error);
                Err(SyncError::FetchFailed(e))
            }
        }
    }

    /// Create a resource, or update `existing_id` when given
    ///
    /// Every field is required; an empty one fails with
    /// [`SyncError::ValidationFailed`] before anything is sent. The
    /// returned resource is merged into local state (see
    /// [`LocalCollection::merge`]).
    pub async fn upsert(&mut self, fields: &R::Fields, existing_id: Option<&str>) -> SyncResult<R> {
        if let Some(field) = fields.missing_field() {
            debug!("Rejected {} upsert: '{}' is empty", R::COLLECTION, field);
            return Err(SyncError::ValidationFailed { field });
        }

        self.set_status(SyncStatus::Submitting);

        let result = match build_upsert_request::<R>(fields, existing_id) {
            Ok(request) => {
                let request = request.with_bearer(self.auth_token());
                self.transport.send(request).await.and_then(parse_saved::<R>)
            }
            Err(e) => Err(e),
        };

        match result {
            Ok(saved) => {
                let merge = self.collection.merge(saved.clone());
                match (existing_id, merge) {
                    (Some(id), Merge::Appended) => {
                        warn!("Updated {} '{}' was not loaded locally; appended", R::COLLECTION, id)
                    }
                    (None, Merge::Replaced) => warn!(
                        "Created {} '{}' already existed locally; replaced",
                        R::COLLECTION,
                        saved.id()
                    ),
                    _ => {}
                }
                info!(
                    "{} {} '{}'",
                    if existing_id.is_some() { "Updated" } else { "Created" },
                    R::COLLECTION,
                    saved.id()
                );
                self.set_status(SyncStatus::Idle);
                Ok(saved)
            }
            Err(e) => {
                warn!("Saving {} failed: {}", R::COLLECTION, e);
                self.set_status(SyncStatus::Error);
                Err(SyncError::UpsertFailed(e))
            }
        }
    }

    /// Submit a form: update its draft target, or create when there is none
    ///
    /// The form is reset only when the save succeeds.
    pub async fn submit(&mut self, form: &mut EditForm<R>) -> SyncResult<R> {
        let existing_id = form.editing_id().map(str::to_owned);
        let saved = self.upsert(&form.fields, existing_id.as_deref()).await?;
        form.reset();
        Ok(saved)
    }

    /// Delete a resource and remove every local entry with its id
    pub async fn delete(&mut self, id: &str) -> SyncResult<()> {
        self.set_status(SyncStatus::Submitting);

        let request = ApiRequest::delete([R::COLLECTION, id]).with_bearer(self.auth_token());
        let result = match self.transport.send(request).await {
            Ok(response) => match self.delete_mode {
                DeleteMode::Verified => response.error_for_status().map(|_| ()),
                DeleteMode::Optimistic => {
                    if !response.is_success() {
                        debug!("Ignoring status {} for DELETE {}", response.status, id);
                    }
                    Ok(())
                }
            },
            Err(e) => Err(e),
        };

        match result {
            Ok(()) => {
                let removed = self.collection.remove(id);
                info!("Deleted {} '{}' ({} local entries)", R::COLLECTION, id, removed);
                self.set_status(SyncStatus::Idle);
                Ok(())
            }
            Err(e) => {
                warn!("Deleting {} '{}' failed: {}", R::COLLECTION, id, e);
                self.set_status(SyncStatus::Error);
                Err(SyncError::DeleteFailed {
                    id: id.to_string(),
                    source: e,
                })
            }
        }
    }

    fn set_status(&self, status: SyncStatus) {
        let _ = self.status.send(status);
    }
}

fn build_upsert_request<R: Resource>(
    fields: &R::Fields,
    existing_id: Option<&str>,
) -> ApiResult<ApiRequest> {
    let body = serde_json::to_value(fields)?;
    Ok(match existing_id {
        Some(id) => ApiRequest::put([R::COLLECTION, id], body),
        None => ApiRequest::post([R::COLLECTION], body),
    })
}

/// Take the `data` member out of a response envelope
fn take_data(response: ApiResponse) -> ApiResult<Value> {
    let mut body = response.error_for_status()?.json()?;
    match body.get_mut("data").map(Value::take) {
        Some(Value::Null) | None => Err(ApiError::InvalidResponse(
            "response has no `data` field".to_string(),
        )),
        Some(data) => Ok(data),
    }
}

/// `{ "data": [Resource] }`
fn parse_list<R: Resource>(response: ApiResponse) -> ApiResult<Vec<R>> {
    let data = take_data(response)?;
    Ok(serde_json::from_value(data)?)
}

/// `{ "data": Resource }` with a non-empty `_id`
fn parse_saved<R: Resource>(response: ApiResponse) -> ApiResult<R> {
    let data = take_data(response)?;
    let has_id = data
        .get("_id")
        .and_then(Value::as_str)
        .is_some_and(|id| !id.is_empty());
    if !has_id {
        return Err(ApiError::InvalidResponse(
            "response has no `data._id`".to_string(),
        ));
    }
    Ok(serde_json::from_value(data)?)
}
