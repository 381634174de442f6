//! Firestore REST client.
//!
//! The REST API has no push channel, so a subscription is a background
//! task listing the collection every `poll_interval` and forwarding a
//! snapshot whenever the result differs from the last one sent.

use std::time::Duration;

use async_trait::async_trait;
use rand::distributions::Alphanumeric;
use rand::Rng;
use reqwest::{Client, RequestBuilder};
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::{debug, info, warn};

use crate::document::{CollectionPath, Document, DocumentId, Fields, StoreEvent};
use crate::error::{BazaarError, BazaarResult};
use crate::traits::{DocumentStore, Subscription, SubscriptionSink};

use super::read_json;
use super::values::{encode_fields, RestDocument};
use super::FirebaseAuth;

const FIRESTORE_URL: &str = "https://firestore.googleapis.com/v1";
const DOCUMENT_ID_LEN: usize = 20;
const PAGE_SIZE: u32 = 300;

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct ListResponse {
    #[serde(default)]
    documents: Vec<RestDocument>,
    #[serde(default)]
    next_page_token: Option<String>,
}

/// Document store backed by the Firestore REST API.
#[derive(Clone)]
pub struct FirestoreStore {
    client: Client,
    auth: FirebaseAuth,
    poll_interval: Duration,
}

impl FirestoreStore {
    pub fn new(auth: FirebaseAuth, poll_interval: Duration) -> Self {
        Self {
            client: Client::new(),
            auth,
            poll_interval,
        }
    }

    /// Fetch every document of a collection, following pagination.
    pub async fn list(&self, path: &CollectionPath) -> BazaarResult<Vec<Document>> {
        let url = format!("{FIRESTORE_URL}/{}", collection_name(self.auth.project_id()?, path));
        let mut documents = Vec::new();
        let mut page_token: Option<String> = None;

        loop {
            let mut request = self
                .client
                .get(&url)
                .query(&[("pageSize", PAGE_SIZE.to_string())]);
            if let Some(token) = &page_token {
                request = request.query(&[("pageToken", token)]);
            }
            let response = self.authorized(request).await?.send().await?;
            let page: ListResponse = read_json(response, BazaarError::Store).await?;

            documents.extend(page.documents.into_iter().map(RestDocument::into_document));
            match page.next_page_token.filter(|t| !t.is_empty()) {
                Some(next) => page_token = Some(next),
                None => return Ok(documents),
            }
        }
    }

    async fn authorized(&self, request: RequestBuilder) -> BazaarResult<RequestBuilder> {
        Ok(match self.auth.id_token().await? {
            Some(token) => request.bearer_auth(token),
            None => request,
        })
    }

    async fn poll(self, path: CollectionPath, sink: SubscriptionSink) {
        let mut last: Option<Vec<Document>> = None;
        loop {
            let result = tokio::select! {
                () = sink.cancelled() => break,
                result = self.list(&path) => result,
            };
            match result {
                Ok(documents) => {
                    if last.as_ref() != Some(&documents) {
                        debug!(%path, count = documents.len(), "Collection changed");
                        if !sink.send(StoreEvent::Snapshot(documents.clone())) {
                            break;
                        }
                        last = Some(documents);
                    }
                }
                Err(e) => {
                    warn!(%path, "Polling failed: {e}");
                    sink.send(StoreEvent::Error(e.to_string()));
                    break;
                }
            }
            tokio::select! {
                () = sink.cancelled() => break,
                () = tokio::time::sleep(self.poll_interval) => {}
            }
        }
        debug!(%path, "Polling stopped");
    }
}

#[async_trait]
impl DocumentStore for FirestoreStore {
    fn subscribe(&self, path: &CollectionPath) -> Subscription {
        let (sink, subscription) = Subscription::channel();
        info!(%path, interval = ?self.poll_interval, "Starting collection poll");
        tokio::spawn(self.clone().poll(path.clone(), sink));
        subscription
    }

    async fn append(&self, path: &CollectionPath, fields: Fields) -> BazaarResult<DocumentId> {
        let project = self.auth.project_id()?;
        let id = DocumentId::new(generate_document_id());
        let body = commit_body(project, path, &id, &fields);
        let url = format!("{FIRESTORE_URL}/{}:commit", database_root(project));

        let request = self.authorized(self.client.post(url).json(&body)).await?;
        let response = request.send().await?;
        let _: Value = read_json(response, BazaarError::Store).await?;

        info!(%path, %id, "Document created");
        Ok(id)
    }
}

fn database_root(project: &str) -> String {
    format!("projects/{project}/databases/(default)/documents")
}

fn collection_name(project: &str, path: &CollectionPath) -> String {
    format!("{}/{path}", database_root(project))
}

/// Random id in the same alphabet and length the backend uses.
fn generate_document_id() -> String {
    rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(DOCUMENT_ID_LEN)
        .map(char::from)
        .collect()
}

/// A single create-only write; server timestamps become transforms.
fn commit_body(project: &str, path: &CollectionPath, id: &DocumentId, fields: &Fields) -> Value {
    let (encoded, server_timestamps) = encode_fields(fields);
    let transforms: Vec<Value> = server_timestamps
        .iter()
        .map(|field| json!({ "fieldPath": field, "setToServerValue": "REQUEST_TIME" }))
        .collect();

    let mut write = json!({
        "update": {
            "name": format!("{}/{id}", collection_name(project, path)),
            "fields": encoded,
        },
        "currentDocument": { "exists": false },
    });
    if !transforms.is_empty() {
        write["updateTransforms"] = Value::Array(transforms);
    }
    json!({ "writes": [write] })
}
