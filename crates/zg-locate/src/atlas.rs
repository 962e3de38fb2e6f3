//! Locator backed by the Apache Atlas REST API.

use crate::error::{LocateError, LocateResult};
use crate::traits::Locator;
use async_trait::async_trait;
use reqwest::header::ACCEPT;
use reqwest::{Client, RequestBuilder};
use serde_json::{Map, Value};
use std::time::Duration;
use zg_core::{TermId, TermOrigin, TermRecord};

/// Basic-auth credentials for the catalog.
#[derive(Clone)]
pub struct AtlasCredentials {
    pub username: String,
    pub password: String,
}

impl std::fmt::Debug for AtlasCredentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AtlasCredentials")
            .field("username", &self.username)
            .field("password", &"***")
            .finish()
    }
}

/// Glossary term found by the DSL search.
#[derive(Debug, Clone, PartialEq)]
struct SearchHit {
    guid: String,
    name: String,
}

/// Fetches glossary terms and their classifications from Atlas.
///
/// Lookup is three requests: a DSL search by term name, the entity by guid,
/// and the entity's classifications. When the classifications endpoint fails
/// or returns nothing, the classifications embedded in the entity are used.
#[derive(Debug, Clone)]
pub struct AtlasLocator {
    client: Client,
    base_url: String,
    credentials: Option<AtlasCredentials>,
}

impl AtlasLocator {
    /// Create a locator for the API rooted at `base_url` (e.g.
    /// `https://atlas:21000/api/atlas/v2`).
    pub fn new(
        base_url: &str,
        credentials: Option<AtlasCredentials>,
        timeout: Duration,
    ) -> LocateResult<Self> {
        let client = Client::builder()
            .connect_timeout(timeout.min(Duration::from_secs(10)))
            .timeout(timeout)
            .build()
            .map_err(|e| LocateError::Network(e.to_string()))?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            credentials,
        })
    }

    /// API root this locator talks to
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn get(&self, path: &str) -> RequestBuilder {
        let request = self
            .client
            .get(format!("{}{}", self.base_url, path))
            .header(ACCEPT, "application/json");
        match &self.credentials {
            Some(c) => request.basic_auth(&c.username, Some(&c.password)),
            None => request,
        }
    }

    async fn send_json(request: RequestBuilder) -> LocateResult<Value> {
        let response = request
            .send()
            .await
            .map_err(|e| LocateError::Network(e.to_string()))?
            .error_for_status()
            .map_err(|e| LocateError::Network(e.to_string()))?;

        response
            .json()
            .await
            .map_err(|e| LocateError::InvalidResponse(e.to_string()))
    }

    async fn search_term(&self, name: &str) -> LocateResult<Option<SearchHit>> {
        let query = term_query(name);
        let payload = Self::send_json(
            self.get("/search/dsl")
                .query(&[("query", query.as_str()), ("limit", "1")]),
        )
        .await?;
        Ok(first_hit(&payload, name))
    }

    async fn entity(&self, guid: &str) -> LocateResult<Value> {
        let payload = Self::send_json(
            self.get(&format!("/entity/guid/{}", guid))
                .query(&[("minExtInfo", "true"), ("ignoreRelationships", "false")]),
        )
        .await?;

        match payload.get("entity") {
            Some(Value::Object(entity)) => Ok(Value::Object(entity.clone())),
            _ => {
                log::warn!("Catalog entity {} has no entity body", guid);
                Ok(Value::Object(Map::new()))
            }
        }
    }

    async fn classifications(&self, guid: &str) -> LocateResult<Vec<Value>> {
        let payload =
            Self::send_json(self.get(&format!("/entity/guid/{}/classifications", guid))).await?;
        Ok(classification_list(&payload))
    }
}

/// DSL query selecting a glossary term by exact name.
fn term_query(name: &str) -> String {
    format!(
        "from AtlasGlossaryTerm where name = '{}'",
        name.replace('\'', "''")
    )
}

fn first_hit(payload: &Value, fallback_name: &str) -> Option<SearchHit> {
    let entity = payload.get("entities")?.as_array()?.first()?;
    let guid = entity
        .get("guid")
        .and_then(Value::as_str)
        .filter(|g| !g.is_empty())?;
    let name = entity
        .pointer("/attributes/name")
        .and_then(Value::as_str)
        .or_else(|| entity.get("displayText").and_then(Value::as_str))
        .filter(|n| !n.is_empty())
        .unwrap_or(fallback_name);

    Some(SearchHit {
        guid: guid.to_string(),
        name: name.to_string(),
    })
}

/// Classification objects from either `{"list": [...]}` or a bare array.
fn classification_list(payload: &Value) -> Vec<Value> {
    let items = match payload {
        Value::Object(obj) => obj.get("list").and_then(Value::as_array),
        Value::Array(items) => Some(items),
        _ => None,
    };
    items
        .map(|items| items.iter().filter(|c| c.is_object()).cloned().collect())
        .unwrap_or_default()
}

/// Replace the entity's classifications with `fetched` unless it is empty.
fn merge_classifications(entity: &mut Value, fetched: Vec<Value>) {
    let Some(obj) = entity.as_object_mut() else {
        return;
    };
    if !fetched.is_empty() {
        obj.insert("classifications".to_string(), Value::Array(fetched));
    } else if !obj.get("classifications").is_some_and(Value::is_array) {
        obj.insert("classifications".to_string(), Value::Array(Vec::new()));
    }
}

#[async_trait]
impl Locator for AtlasLocator {
    async fn fetch(&self, id: &TermId) -> LocateResult<Option<TermRecord>> {
        let name = id.trim();
        if name.is_empty() {
            return Ok(None);
        }

        let Some(hit) = self.search_term(name).await? else {
            return Ok(None);
        };

        let mut entity = self.entity(&hit.guid).await?;
        let fetched = match self.classifications(&hit.guid).await {
            Ok(list) => list,
            Err(e) => {
                log::debug!(
                    "Classifications endpoint failed for {}, using embedded ones: {}",
                    hit.guid,
                    e
                );
                Vec::new()
            }
        };
        merge_classifications(&mut entity, fetched);

        log::debug!("Found term {} in catalog (guid {})", id, hit.guid);
        Ok(Some(
            TermRecord::new(id.clone(), TermOrigin::Catalog, entity)
                .with_display_name(hit.name)
                .with_guid(hit.guid),
        ))
    }

    fn name(&self) -> &'static str {
        "atlas"
    }
}

#[cfg(test)]
#[path = "atlas_test.rs"]
mod tests;
