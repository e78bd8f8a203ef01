//! Layout store backed by the Firestore REST API.
//!
//! Each layout is one document in a single collection, keyed by layout name,
//! with one array field `layout` whose elements are maps holding a string `id`.

use crate::domain::{Layout, NamedLayout, PlacedItem, StoreError, StoreResult};
use crate::infrastructure::config::FirestoreConfig;
use crate::infrastructure::persistence::LayoutStore;
use reqwest::Url;
use reqwest::blocking::Client;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::time::Duration;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(15);
const PAGE_SIZE: &str = "100";

/// Blocking Firestore client scoped to one collection.
pub struct FirestoreStore {
    client: Client,
    config: FirestoreConfig,
}

impl FirestoreStore {
    pub fn new(config: FirestoreConfig) -> StoreResult<Self> {
        let client = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| StoreError::Network(e.to_string()))?;
        Ok(Self { client, config })
    }

    /// URL of the collection, or of one document when `document` is given.
    pub fn url(&self, document: Option<&str>) -> StoreResult<Url> {
        let mut url = Url::parse(&self.config.base_url)
            .map_err(|e| StoreError::Malformed(format!("invalid base url: {}", e)))?;
        {
            let mut segments = url
                .path_segments_mut()
                .map_err(|_| StoreError::Malformed("base url cannot hold a path".into()))?;
            segments.pop_if_empty().extend([
                "projects",
                self.config.project_id.as_str(),
                "databases",
                self.config.database.as_str(),
                "documents",
                self.config.collection.as_str(),
            ]);
            if let Some(document) = document {
                segments.push(document);
            }
        }
        if let Some(key) = &self.config.api_key {
            url.query_pairs_mut().append_pair("key", key);
        }
        Ok(url)
    }

    /// Sends one request and reads the whole reply.
    fn exchange(request: reqwest::blocking::RequestBuilder) -> StoreResult<(u16, String)> {
        let response = request
            .send()
            .map_err(|e| StoreError::Network(e.to_string()))?;
        let status = response.status().as_u16();
        let body = response
            .text()
            .map_err(|e| StoreError::Network(e.to_string()))?;
        Ok((status, body))
    }

    fn list_page(&self, page_token: Option<&str>) -> StoreResult<ListResponse> {
        let mut url = self.url(None)?;
        {
            let mut query = url.query_pairs_mut();
            query.append_pair("pageSize", PAGE_SIZE);
            if let Some(token) = page_token {
                query.append_pair("pageToken", token);
            }
        }
        tracing::debug!(page_token, "firestore list");
        let (status, body) = Self::exchange(self.client.get(url))?;
        list_reply(status, &body)
    }
}

impl LayoutStore for FirestoreStore {
    fn get(&self, name: &str) -> StoreResult<Option<Layout>> {
        let url = self.url(Some(name))?;
        tracing::debug!(%name, "firestore get");
        let (status, body) = Self::exchange(self.client.get(url))?;
        get_reply(status, &body)
    }

    fn set(&self, name: &str, layout: &Layout) -> StoreResult<()> {
        let url = self.url(Some(name))?;
        tracing::debug!(%name, items = layout.len(), "firestore set");
        let body = Document {
            name: None,
            fields: encode_layout(layout),
        };
        let (status, _) = Self::exchange(self.client.patch(url).json(&body))?;
        set_reply(status)
    }

    fn list_all(&self) -> StoreResult<Vec<NamedLayout>> {
        collect_pages(|token| self.list_page(token))
    }
}

fn parse<T: for<'de> Deserialize<'de>>(body: &str) -> StoreResult<T> {
    serde_json::from_str(body).map_err(|e| StoreError::Malformed(e.to_string()))
}

/// 200 carries the document, 404 means no layout has that name.
fn get_reply(status: u16, body: &str) -> StoreResult<Option<Layout>> {
    match status {
        200 => {
            let document: Document = parse(body)?;
            decode_layout(&document.fields).map(Some)
        }
        404 => Ok(None),
        status => Err(StoreError::Status(status)),
    }
}

fn set_reply(status: u16) -> StoreResult<()> {
    match status {
        200 => Ok(()),
        status => Err(StoreError::Status(status)),
    }
}

fn list_reply(status: u16, body: &str) -> StoreResult<ListResponse> {
    match status {
        200 => parse(body),
        status => Err(StoreError::Status(status)),
    }
}

/// Follows `nextPageToken` until a page comes back without one.
///
/// Documents that do not decode are skipped.
fn collect_pages<F>(mut fetch: F) -> StoreResult<Vec<NamedLayout>>
where
    F: FnMut(Option<&str>) -> StoreResult<ListResponse>,
{
    let mut layouts = Vec::new();
    let mut page_token: Option<String> = None;
    loop {
        let page = fetch(page_token.as_deref())?;
        for document in &page.documents {
            match decode_named(document) {
                Ok(named) => layouts.push(named),
                Err(e) => {
                    tracing::warn!(
                        document = document.name.as_deref().unwrap_or("<unnamed>"),
                        error = %e,
                        "skipping malformed layout document"
                    );
                }
            }
        }
        match page.next_page_token {
            Some(token) if !token.is_empty() => page_token = Some(token),
            _ => break,
        }
    }
    layouts.sort_by(|a, b| a.name.cmp(&b.name));
    Ok(layouts)
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub(crate) struct Document {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default)]
    pub fields: BTreeMap<String, Value>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct ListResponse {
    #[serde(default)]
    pub documents: Vec<Document>,
    #[serde(default)]
    pub next_page_token: Option<String>,
}

/// The subset of Firestore's typed value union this store reads and writes.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct Value {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub string_value: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub array_value: Option<ArrayValue>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub map_value: Option<MapValue>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub(crate) struct ArrayValue {
    #[serde(default)]
    pub values: Vec<Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub(crate) struct MapValue {
    #[serde(default)]
    pub fields: BTreeMap<String, Value>,
}

pub(crate) fn encode_layout(layout: &Layout) -> BTreeMap<String, Value> {
    let values = layout
        .iter()
        .map(|item| {
            let id = Value {
                string_value: Some(item.id.clone()),
                ..Value::default()
            };
            Value {
                map_value: Some(MapValue {
                    fields: BTreeMap::from([("id".to_string(), id)]),
                }),
                ..Value::default()
            }
        })
        .collect();
    BTreeMap::from([(
        "layout".to_string(),
        Value {
            array_value: Some(ArrayValue { values }),
            ..Value::default()
        },
    )])
}

pub(crate) fn decode_layout(fields: &BTreeMap<String, Value>) -> StoreResult<Layout> {
    let Some(field) = fields.get("layout") else {
        return Ok(Layout::new());
    };
    let array = field
        .array_value
        .as_ref()
        .ok_or_else(|| StoreError::Malformed("`layout` is not an array".into()))?;
    array
        .values
        .iter()
        .map(|value| {
            value
                .map_value
                .as_ref()
                .and_then(|map| map.fields.get("id"))
                .and_then(|id| id.string_value.clone())
                .map(PlacedItem::new)
                .ok_or_else(|| StoreError::Malformed("layout entry without a string `id`".into()))
        })
        .collect()
}

fn decode_named(document: &Document) -> StoreResult<NamedLayout> {
    let name = document
        .name
        .as_deref()
        .and_then(|path| path.rsplit('/').next())
        .filter(|name| !name.is_empty())
        .ok_or_else(|| StoreError::Malformed("listed document without a name".into()))?
        .to_string();
    Ok(NamedLayout {
        name,
        layout: decode_layout(&document.fields)?,
    })
}
