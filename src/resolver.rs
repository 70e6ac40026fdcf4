//! Core collection resolution functionality.
//!
//! This module fetches a collection of items, then dereferences the locators
//! each item declares. Reference failures are recorded per slot and never
//! abort the item or the run.

use std::time::Instant;

use chrono::Utc;
use reqwest::Client;
use serde::de::DeserializeOwned;
use tracing::{debug, info, instrument, warn};
use url::Url;

use crate::config::ResolverConfig;
use crate::error::{FetchError, ReferenceFetchError, ResolutionError};
use crate::reference::parse_endpoint;
use crate::types::{Document, Item, ResolutionResult, ResolvedItem, ResolvedReference, RunMetadata};

/// Core resolver for collections and their references
pub struct Resolver {
    /// HTTP client shared by every request of a run
    client: Client,
    config: ResolverConfig,
}

impl Resolver {
    /// Creates a new Resolver with the given configuration
    pub fn new(config: ResolverConfig) -> Result<Self, ResolutionError> {
        let client = Client::builder()
            .timeout(config.timeout)
            .user_agent(config.user_agent.as_str())
            .build()
            .map_err(ResolutionError::Client)?;

        Ok(Self { client, config })
    }

    pub fn config(&self) -> &ResolverConfig {
        &self.config
    }

    /// Fetches and resolves a collection
    ///
    /// # Example
    /// ```no_run
    /// use swapi_resolver::{Resolver, ResolverConfig};
    ///
    /// #[tokio::main(flavor = "current_thread")]
    /// async fn main() -> Result<(), Box<dyn std::error::Error>> {
    ///     let resolver = Resolver::new(ResolverConfig::default())?;
    ///     let result = resolver.run("https://swapi.info/api/starships").await?;
    ///     for resolved in &result.items {
    ///         println!("{:?}: {} references", resolved.item.name(), resolved.references.len());
    ///     }
    ///     Ok(())
    /// }
    /// ```
    #[instrument(skip(self))]
    pub async fn run(&self, endpoint: &str) -> Result<ResolutionResult, ResolutionError> {
        let start_time = Instant::now();

        let items = self.fetch_collection(endpoint).await?;
        let retrieved = Utc::now();

        let base = self.reference_base(endpoint);

        let mut resolved = Vec::with_capacity(items.len());
        for item in items {
            let references = self.resolve_references(&item, base.as_ref()).await;
            resolved.push(ResolvedItem { item, references });
        }

        let reference_count = resolved.iter().map(|r| r.references.len()).sum();
        let failed_references = resolved
            .iter()
            .flat_map(|r| &r.references)
            .filter(|r| !r.is_resolved())
            .count();

        let metadata = RunMetadata {
            endpoint: endpoint.to_string(),
            retrieved,
            duration: start_time.elapsed(),
            item_count: resolved.len(),
            reference_count,
            failed_references,
        };

        info!(
            items = metadata.item_count,
            references = metadata.reference_count,
            failed = metadata.failed_references,
            "Resolution complete"
        );

        Ok(ResolutionResult {
            items: resolved,
            metadata,
        })
    }

    /// Runs against the configured collection endpoint
    pub async fn run_default(&self) -> Result<ResolutionResult, ResolutionError> {
        let endpoint = self.config.collection_url.clone();
        self.run(&endpoint).await
    }

    /// Fetches the collection at `endpoint` and decodes it into items
    #[instrument(skip(self))]
    pub async fn fetch_collection(&self, endpoint: &str) -> Result<Vec<Item>, ResolutionError> {
        let url = parse_endpoint(endpoint)
            .ok_or_else(|| ResolutionError::InvalidEndpoint(endpoint.to_string()))?;

        match self.fetch_json::<Vec<Item>>(&url).await {
            Ok(items) => {
                debug!(count = items.len(), "Fetched collection");
                Ok(items)
            }
            Err(FetchError::Decode(source)) => Err(ResolutionError::Decode {
                url: url.to_string(),
                source,
            }),
            Err(source) => Err(ResolutionError::CollectionFetch {
                url: url.to_string(),
                source,
            }),
        }
    }

    /// Base URL for relative references of items fetched from `endpoint`:
    /// the configured `base_url` when set, else the endpoint itself.
    pub fn reference_base(&self, endpoint: &str) -> Option<Url> {
        match &self.config.base_url {
            Some(base) => Some(base.clone()),
            None => parse_endpoint(endpoint),
        }
    }

    /// Resolves every reference declared by `item`, in order.
    ///
    /// Relative references are joined against `base`; without one they fail
    /// their slot. Pass `reference_base(endpoint)` to match `run(endpoint)`.
    pub async fn resolve_references(&self, item: &Item, base: Option<&Url>) -> Vec<ResolvedReference> {
        let references = item.references(&self.config.reference_field);
        let mut resolved = Vec::with_capacity(references.len());

        for reference in references {
            let outcome = match reference.to_url(base) {
                Ok(url) => match self.fetch_document(&url).await {
                    Ok(doc) => ResolvedReference::Resolved(doc),
                    Err(e) => ResolvedReference::Failed(ReferenceFetchError::new(reference.as_str(), e)),
                },
                Err(e) => ResolvedReference::Failed(ReferenceFetchError::new(reference.as_str(), e)),
            };

            if let ResolvedReference::Failed(err) = &outcome {
                warn!(item = item.name().unwrap_or_default(), reference = %reference, reason = %err.reason, "Error fetching reference");
            }
            resolved.push(outcome);
        }

        resolved
    }

    async fn fetch_document(&self, url: &Url) -> Result<Document, FetchError> {
        match self.fetch_json::<serde_json::Value>(url).await? {
            serde_json::Value::Object(doc) => Ok(doc),
            _ => Err(FetchError::NotAnObject),
        }
    }

    async fn fetch_json<T: DeserializeOwned>(&self, url: &Url) -> Result<T, FetchError> {
        debug!(%url, "GET");
        let response = self.client.get(url.clone()).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status { status });
        }

        let body = response.bytes().await?;
        Ok(serde_json::from_slice(&body)?)
    }
}

/// Convenience function for resolving a collection without configuring a Resolver
pub async fn resolve_collection(endpoint: &str) -> Result<ResolutionResult, ResolutionError> {
    let resolver = Resolver::new(ResolverConfig::default())?;
    resolver.run(endpoint).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::net::SocketAddr;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;
    use std::time::Duration;

    use axum::extract::{Path, State};
    use axum::http::StatusCode;
    use axum::response::{IntoResponse, Response};
    use axum::routing::get;
    use axum::{Json, Router};
    use serde_json::{json, Value};

    /// Counts requests made against `/people/{id}`
    type Hits = Arc<AtomicUsize>;

    async fn person(State(hits): State<Hits>, Path(id): Path<u32>) -> Response {
        hits.fetch_add(1, Ordering::SeqCst);
        match id {
            1 => Json(json!({"name": "Luke Skywalker"})).into_response(),
            2 => Json(json!({"name": "Biggs Darklighter"})).into_response(),
            3 => Json(json!({"name": "Wedge Antilles"})).into_response(),
            4 => Json(json!(["not", "an", "object"])).into_response(),
            _ => StatusCode::NOT_FOUND.into_response(),
        }
    }

    /// Serves `collection` at `/starships` plus a fixed set of people
    async fn spawn_server(collection: Value) -> (String, Hits) {
        let hits = Hits::default();
        let app = Router::new()
            .route("/starships", get(move || async move { Json(collection) }))
            .route("/people/{id}", get(person))
            .route("/broken", get(|| async { (StatusCode::INTERNAL_SERVER_ERROR, "boom") }))
            .route("/garbage", get(|| async { "definitely not json" }))
            .route(
                "/slow",
                get(|| async {
                    tokio::time::sleep(Duration::from_secs(3)).await;
                    Json(json!({"name": "Too Late"}))
                }),
            )
            .with_state(hits.clone());

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr: SocketAddr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        (format!("http://{}", addr), hits)
    }

    fn resolver() -> Resolver {
        Resolver::new(ResolverConfig::default()).unwrap()
    }

    #[tokio::test]
    async fn test_single_pilot_resolves() {
        let (base, _) = spawn_server(json!([{"name": "X-wing", "pilots": ["/people/1"]}])).await;

        let result = resolver().run(&format!("{}/starships", base)).await.unwrap();

        assert_eq!(result.items.len(), 1);
        let ship = &result.items[0];
        assert_eq!(ship.item.name(), Some("X-wing"));
        assert_eq!(ship.references.len(), 1);
        let mut expected = Document::new();
        expected.insert("name".to_string(), json!("Luke Skywalker"));
        assert_eq!(ship.references[0], ResolvedReference::Resolved(expected));
    }

    #[tokio::test]
    async fn test_empty_pilots_makes_no_requests() {
        let (base, hits) = spawn_server(json!([{"name": "TIE Fighter", "pilots": []}])).await;

        let result = resolver().run(&format!("{}/starships", base)).await.unwrap();

        assert_eq!(result.items.len(), 1);
        assert_eq!(result.items[0].item.name(), Some("TIE Fighter"));
        assert!(result.items[0].references.is_empty());
        assert_eq!(hits.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_resolve_references_without_references_is_offline() {
        // Nothing listens on this base; any request would fail
        let config = ResolverConfig {
            base_url: Some(Url::parse("http://127.0.0.1:9/").unwrap()),
            ..ResolverConfig::default()
        };
        let resolver = Resolver::new(config).unwrap();
        let item: Item = serde_json::from_value(json!({"name": "Death Star"})).unwrap();
        let base = resolver.reference_base("http://127.0.0.1:9/starships");

        assert!(resolver.resolve_references(&item, base.as_ref()).await.is_empty());
    }

    #[tokio::test]
    async fn test_item_count_survives_reference_failures() {
        let (base, _) = spawn_server(json!([
            {"name": "X-wing", "pilots": ["/people/1", "/people/404"]},
            {"name": "Y-wing", "pilots": ["/broken"]},
            {"name": "TIE Fighter", "pilots": []},
            {"name": "Sentinel-class landing craft"}
        ]))
        .await;

        let result = resolver().run(&format!("{}/starships", base)).await.unwrap();

        assert_eq!(result.items.len(), 4);
        let counts: Vec<usize> = result.items.iter().map(|r| r.references.len()).collect();
        assert_eq!(counts, vec![2, 1, 0, 0]);
        assert_eq!(result.metadata.item_count, 4);
        assert_eq!(result.metadata.reference_count, 3);
        assert_eq!(result.metadata.failed_references, 2);
    }

    #[tokio::test]
    async fn test_failed_reference_does_not_affect_siblings() {
        let (base, hits) = spawn_server(json!([
            {"name": "X-wing", "pilots": ["/people/1", "/people/404", "/people/2", "/garbage", "/people/3"]}
        ]))
        .await;

        let result = resolver().run(&format!("{}/starships", base)).await.unwrap();
        let refs = &result.items[0].references;

        let names: Vec<Option<&str>> = refs.iter().map(ResolvedReference::name).collect();
        assert_eq!(
            names,
            vec![Some("Luke Skywalker"), None, Some("Biggs Darklighter"), None, Some("Wedge Antilles")]
        );

        let not_found = refs[1].error().unwrap();
        assert_eq!(not_found.reference, "/people/404");
        assert!(not_found.reason.contains("404"), "{}", not_found.reason);

        let garbage = refs[3].error().unwrap();
        assert!(garbage.reason.contains("invalid JSON"), "{}", garbage.reason);

        assert_eq!(hits.load(Ordering::SeqCst), 4);
    }

    #[tokio::test]
    async fn test_non_object_reference_body_fails_slot() {
        let (base, _) = spawn_server(json!([{"name": "X-wing", "pilots": ["/people/4"]}])).await;

        let result = resolver().run(&format!("{}/starships", base)).await.unwrap();
        let err = result.items[0].references[0].error().unwrap();
        assert_eq!(err.reason, "expected a JSON object");
    }

    #[tokio::test]
    async fn test_unparseable_reference_fails_slot() {
        let (base, _) = spawn_server(json!([{"name": "X-wing", "pilots": ["http://[::1", 42, "/people/1"]}])).await;

        let result = resolver().run(&format!("{}/starships", base)).await.unwrap();
        let refs = &result.items[0].references;
        assert_eq!(refs.len(), 3);
        assert!(!refs[0].is_resolved());
        assert!(!refs[1].is_resolved());
        assert_eq!(refs[2].name(), Some("Luke Skywalker"));
    }

    #[tokio::test]
    async fn test_collection_server_error_fails_run() {
        let (base, _) = spawn_server(json!([])).await;

        let err = resolver().run(&format!("{}/broken", base)).await.unwrap_err();
        match err {
            ResolutionError::CollectionFetch { url, source } => {
                assert!(url.ends_with("/broken"));
                assert!(matches!(
                    source,
                    FetchError::Status { status } if status == reqwest::StatusCode::INTERNAL_SERVER_ERROR
                ));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_collection_transport_error_fails_run() {
        // Bind then drop to get a port nobody is listening on
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let err = resolver()
            .fetch_collection(&format!("http://{}/starships", addr))
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            ResolutionError::CollectionFetch { source: FetchError::Request(_), .. }
        ));
    }

    #[tokio::test]
    async fn test_malformed_collection_is_decode_error() {
        let (base, _) = spawn_server(json!({"name": "not a list"})).await;

        let err = resolver().fetch_collection(&format!("{}/starships", base)).await.unwrap_err();
        assert!(matches!(err, ResolutionError::Decode { .. }));

        let err = resolver().fetch_collection(&format!("{}/garbage", base)).await.unwrap_err();
        assert!(matches!(err, ResolutionError::Decode { .. }));
    }

    #[tokio::test]
    async fn test_invalid_endpoint() {
        for endpoint in ["", "  ", "/starships"] {
            let err = resolver().run(endpoint).await.unwrap_err();
            assert!(matches!(err, ResolutionError::InvalidEndpoint(_)), "{endpoint:?}");
        }
    }

    #[tokio::test]
    async fn test_slow_reference_times_out() {
        let (base, _) = spawn_server(json!([{"name": "X-wing", "pilots": ["/slow", "/people/1"]}])).await;
        let config = ResolverConfig {
            timeout: Duration::from_millis(200),
            ..ResolverConfig::default()
        };

        let result = Resolver::new(config).unwrap().run(&format!("{}/starships", base)).await.unwrap();
        let refs = &result.items[0].references;
        assert!(!refs[0].is_resolved());
        assert_eq!(refs[1].name(), Some("Luke Skywalker"));
    }

    #[tokio::test]
    async fn test_configured_base_and_field() {
        let (base, _) = spawn_server(json!([{"name": "Tatooine", "residents": ["people/1"]}])).await;
        let config = ResolverConfig {
            collection_url: format!("{}/starships", base),
            reference_field: "residents".to_string(),
            base_url: Some(Url::parse(&format!("{}/", base)).unwrap()),
            ..ResolverConfig::default()
        };

        let result = Resolver::new(config).unwrap().run_default().await.unwrap();
        assert_eq!(result.items[0].references[0].name(), Some("Luke Skywalker"));
        assert_eq!(result.metadata.endpoint, format!("{}/starships", base));
    }

    #[tokio::test]
    async fn test_composed_operations_match_run() {
        let (base, _) = spawn_server(json!([{"name": "X-wing", "pilots": ["/people/1"]}])).await;
        let endpoint = format!("{}/starships", base);
        // Configured endpoint differs from the one fetched below
        let resolver = Resolver::new(ResolverConfig::with_collection_url("http://127.0.0.1:9/starships")).unwrap();

        let items = resolver.fetch_collection(&endpoint).await.unwrap();
        let reference_base = resolver.reference_base(&endpoint);
        let composed = resolver.resolve_references(&items[0], reference_base.as_ref()).await;

        let result = resolver.run(&endpoint).await.unwrap();
        assert_eq!(composed[0].name(), Some("Luke Skywalker"));
        assert_eq!(composed, result.items[0].references);
    }

    #[tokio::test]
    async fn test_relative_reference_without_base_fails_slot() {
        let item: Item = serde_json::from_value(json!({"name": "X-wing", "pilots": ["/people/1"]})).unwrap();

        let refs = resolver().resolve_references(&item, None).await;
        assert_eq!(refs.len(), 1);
        assert_eq!(refs[0].error().unwrap().reference, "/people/1");
    }

    #[tokio::test]
    async fn test_resolve_collection_convenience() {
        let (base, _) = spawn_server(json!([{"name": "X-wing", "pilots": ["/people/2"]}])).await;

        let result = resolve_collection(&format!("{}/starships", base)).await.unwrap();
        assert_eq!(result.items[0].references[0].name(), Some("Biggs Darklighter"));
    }
}
