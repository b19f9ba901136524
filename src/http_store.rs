// HTTP implementation of DocumentStore against an Elasticsearch-compatible
// REST API
use crate::constants;
use crate::document::{bulk_body, BulkAction, Document};
use crate::metadata::IndexMetadata;
use crate::store::{AliasAction, DocumentStore};
use anyhow::{bail, Context, Result};
use serde::Deserialize;
use serde_json::{json, Value};
use std::collections::BTreeMap;
use std::time::Duration;

/// Document-store client over HTTP. One request per store call, no automatic
/// retry: a failed request surfaces its status and body and aborts the
/// operation in progress.
pub struct HttpStore {
    client: reqwest::Client,
    base_url: String,
}

impl HttpStore {
    pub fn new(server: impl Into<String>) -> Result<Self> {
        let server = server.into();
        let base_url = if server.contains("://") {
            server
        } else {
            format!("http://{}", server)
        };
        Ok(Self {
            client: reqwest::Client::builder()
                .timeout(Duration::from_secs(constants::HTTP_TIMEOUT_SECS))
                .user_agent(constants::user_agent())
                .build()?,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path)
    }

    /// Checks the response status, returning the parsed JSON body on success
    /// and an error carrying status and body otherwise.
    async fn expect_json(&self, response: reqwest::Response, what: &str) -> Result<Value> {
        let status = response.status();
        let body = response.text().await.unwrap_or_default();
        if !status.is_success() {
            bail!("{} failed: {}: {}", what, status, body);
        }
        serde_json::from_str(&body).with_context(|| format!("{}: invalid response body", what))
    }
}

#[derive(Deserialize)]
struct CountResponse {
    count: u64,
}

#[derive(Deserialize)]
struct SearchHit {
    #[serde(rename = "_id")]
    id: String,
    #[serde(rename = "_type", default)]
    doc_type: Option<String>,
    #[serde(rename = "_source")]
    source: Value,
}

#[derive(Deserialize)]
struct SearchHits {
    hits: Vec<SearchHit>,
}

#[derive(Deserialize)]
struct SearchResponse {
    hits: SearchHits,
}

/// Extracts a named sub-object from a per-index keyed response like
/// `{"orders_v1": {"settings": {...}}}`. Falls back to the keyed value itself
/// when the store omits the wrapper.
fn per_index_section(body: Value, section: &str, what: &str) -> Result<BTreeMap<String, Value>> {
    let Value::Object(map) = body else {
        bail!("{}: unexpected response shape", what);
    };
    let (_, entry) = map
        .into_iter()
        .next()
        .with_context(|| format!("{}: empty response", what))?;
    let inner = match entry {
        Value::Object(mut obj) => obj.remove(section).unwrap_or(Value::Object(obj)),
        other => other,
    };
    match inner {
        Value::Object(obj) => Ok(obj.into_iter().collect()),
        _ => bail!("{}: unexpected response shape", what),
    }
}

impl DocumentStore for HttpStore {
    async fn create_index(&self, name: &str, meta: &IndexMetadata) -> Result<()> {
        let response = self
            .client
            .put(self.url(name))
            .json(&json!({"settings": meta.settings, "mappings": meta.mappings}))
            .send()
            .await?;
        self.expect_json(response, &format!("create index '{}'", name))
            .await?;
        Ok(())
    }

    async fn get_settings(&self, name: &str) -> Result<BTreeMap<String, Value>> {
        let what = format!("get settings of '{}'", name);
        let response = self
            .client
            .get(self.url(&format!("{}/_settings", name)))
            .send()
            .await?;
        let body = self.expect_json(response, &what).await?;
        per_index_section(body, "settings", &what)
    }

    async fn get_mappings(&self, name: &str) -> Result<BTreeMap<String, Value>> {
        let what = format!("get mappings of '{}'", name);
        let response = self
            .client
            .get(self.url(&format!("{}/_mapping", name)))
            .send()
            .await?;
        let body = self.expect_json(response, &what).await?;
        per_index_section(body, "mappings", &what)
    }

    async fn delete_index(&self, name: &str) -> Result<()> {
        let response = self.client.delete(self.url(name)).send().await?;
        self.expect_json(response, &format!("delete index '{}'", name))
            .await?;
        Ok(())
    }

    async fn refresh(&self, name: &str) -> Result<()> {
        let response = self
            .client
            .post(self.url(&format!("{}/_refresh", name)))
            .send()
            .await?;
        self.expect_json(response, &format!("refresh '{}'", name))
            .await?;
        Ok(())
    }

    async fn count(&self, name: &str) -> Result<u64> {
        let what = format!("count documents in '{}'", name);
        let response = self
            .client
            .get(self.url(&format!("{}/_count", name)))
            .send()
            .await?;
        let body = self.expect_json(response, &what).await?;
        let parsed: CountResponse =
            serde_json::from_value(body).with_context(|| format!("{}: invalid count", what))?;
        Ok(parsed.count)
    }

    async fn search(&self, name: &str, size: usize, from: u64) -> Result<Vec<Document>> {
        let what = format!("search '{}'", name);
        let response = self
            .client
            .post(self.url(&format!("{}/_search", name)))
            .json(&json!({
                "query": {"match_all": {}},
                "size": size,
                "from": from,
            }))
            .send()
            .await?;
        let body = self.expect_json(response, &what).await?;
        let parsed: SearchResponse = serde_json::from_value(body)
            .with_context(|| format!("{}: invalid search response", what))?;
        Ok(parsed
            .hits
            .hits
            .into_iter()
            .map(|hit| Document {
                id: hit.id,
                doc_type: hit.doc_type.unwrap_or_else(|| "_doc".to_string()),
                source: hit.source,
            })
            .collect())
    }

    async fn bulk(&self, actions: &[BulkAction]) -> Result<()> {
        let response = self
            .client
            .post(self.url("_bulk"))
            .header("Content-Type", "application/x-ndjson")
            .body(bulk_body(actions))
            .send()
            .await?;
        let body = self.expect_json(response, "bulk write").await?;

        // The store answers 200 even when individual actions were rejected;
        // a partial rejection fails the whole bulk call.
        if body["errors"].as_bool().unwrap_or(false) {
            let first_error = body["items"]
                .as_array()
                .and_then(|items| {
                    items
                        .iter()
                        .find_map(|item| item["index"]["error"].as_object().cloned())
                })
                .map(|error| Value::Object(error).to_string())
                .unwrap_or_else(|| "unknown error".to_string());
            bail!("bulk write rejected one or more documents: {}", first_error);
        }
        Ok(())
    }

    async fn update_aliases(&self, actions: &[AliasAction]) -> Result<()> {
        let actions: Vec<Value> = actions
            .iter()
            .map(|action| match action {
                AliasAction::Add { alias, index } => {
                    json!({"add": {"index": index, "alias": alias}})
                }
                AliasAction::Remove { alias, index } => {
                    json!({"remove": {"index": index, "alias": alias}})
                }
            })
            .collect();
        let response = self
            .client
            .post(self.url("_aliases"))
            .json(&json!({"actions": actions}))
            .send()
            .await?;
        self.expect_json(response, "update aliases").await?;
        Ok(())
    }

    async fn resolve_alias(&self, name: &str) -> Result<Option<String>> {
        let response = self
            .client
            .get(self.url(&format!("_alias/{}", name)))
            .send()
            .await?;
        if response.status() == reqwest::StatusCode::NOT_FOUND {
            return Ok(None);
        }
        let body = self
            .expect_json(response, &format!("resolve alias '{}'", name))
            .await?;
        let Value::Object(map) = body else {
            bail!("resolve alias '{}': unexpected response shape", name);
        };
        // Response keys are the concrete indexes carrying the alias. A plain
        // index queried by its own name comes back keyed by itself, which
        // means the name was never an alias.
        Ok(map
            .into_iter()
            .map(|(index, _)| index)
            .find(|index| index.as_str() != name))
    }

    async fn list_aliases(&self) -> Result<Vec<(String, String)>> {
        let body = {
            let response = self.client.get(self.url("_alias")).send().await?;
            self.expect_json(response, "list aliases").await?
        };
        let Value::Object(map) = body else {
            bail!("list aliases: unexpected response shape");
        };
        let mut bound = Vec::new();
        for (index, entry) in map {
            if let Some(aliases) = entry["aliases"].as_object() {
                for alias in aliases.keys() {
                    bound.push((alias.clone(), index.clone()));
                }
            }
        }
        bound.sort();
        Ok(bound)
    }
}
