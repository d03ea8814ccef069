use reqwest::header::ACCEPT;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use std::collections::{BTreeMap, HashMap};
use std::future::Future;
use std::sync::{Arc, Mutex};
use tracing::{debug, warn};
use url::{form_urlencoded, Url};

use crate::config::ClientConfig;
use crate::error::{ContentError, ContentResult, FallbackReason};
use crate::media::{media_from_raw, MediaDescriptor, RawMedia};
use crate::memory::MemoryCache;
use crate::storage::{CacheEntry, CacheStats, ContentCache};
use crate::validate::{validate_item, Validate};

pub const MEDIA_ENDPOINT: &str = "wp/v2/media";
const HEALTH_ENDPOINT: &str = "wp/v2/posts";
const DEFAULT_QUERY: [(&str, &str); 2] = [("_embed", "true"), ("per_page", "100")];
const BUST_PARAM: &str = "_bust";

/// Epoch seconds. Injectable so expiry can be driven from tests.
pub type Clock = Arc<dyn Fn() -> i64 + Send + Sync>;

type Gate = Arc<tokio::sync::Mutex<()>>;

/// Single point of access to the WordPress REST API: transport, validation,
/// TTL caching and media enrichment.
pub struct ContentClient {
    http: reqwest::Client,
    config: ClientConfig,
    base: Url,
    cache: Arc<dyn ContentCache>,
    // one gate per key with a fetch in flight
    inflight: Mutex<HashMap<String, Gate>>,
    clock: Clock,
}

impl ContentClient {
    /// Build a client around an explicitly constructed cache. Share one cache
    /// per process between all clients.
    pub fn new(config: ClientConfig, cache: Arc<dyn ContentCache>) -> ContentResult<Self> {
        let base = parse_base(&config.base_url)?;
        let http = reqwest::Client::builder()
            .user_agent(config.user_agent.clone())
            .timeout(config.timeout())
            .build()
            .map_err(|e| ContentError::Config(format!("building HTTP client: {e}")))?;
        Ok(Self { http, config, base, cache, inflight: Mutex::new(HashMap::new()), clock: Arc::new(current_epoch) })
    }

    /// Environment-configured client with its own in-memory cache.
    pub fn from_env() -> ContentResult<Self> {
        Self::new(ClientConfig::from_env(), Arc::new(MemoryCache::new()))
    }

    pub fn with_clock(mut self, clock: Clock) -> Self {
        self.clock = clock;
        self
    }

    pub fn config(&self) -> &ClientConfig { &self.config }

    pub fn cache(&self) -> &Arc<dyn ContentCache> { &self.cache }

    fn now(&self) -> i64 { (self.clock)() }

    /// Path of a route under the site's custom namespace.
    pub fn custom_endpoint(&self, name: &str) -> String {
        format!("{}/{}", self.config.custom_namespace.trim_matches('/'), name.trim_start_matches('/'))
    }

    /// GET a collection, keep the elements that validate as `T`, cache them.
    ///
    /// Caller params override the defaults (`_embed=true`, `per_page=100`).
    /// Invalid elements are logged and dropped; only transport failures,
    /// non-2xx statuses and non-array bodies are errors.
    pub async fn fetch_collection<T>(&self, endpoint: &str, params: &[(&str, &str)]) -> ContentResult<Vec<T>>
    where T: DeserializeOwned + Serialize + Validate {
        let params = to_query(params);
        let key = cache_key(endpoint, &params);
        self.cached(&key, || self.fetch_validated(endpoint, &params)).await
    }

    /// First element matching `field=value`, if any.
    pub async fn fetch_single_by_field<T>(&self, endpoint: &str, field: &str, value: &str) -> ContentResult<Option<T>>
    where T: DeserializeOwned + Serialize + Validate {
        Ok(self.fetch_collection(endpoint, &[(field, value)]).await?.into_iter().next())
    }

    /// GET a single JSON document (custom endpoints), validated and cached.
    pub async fn fetch_document<T>(&self, endpoint: &str) -> ContentResult<T>
    where T: DeserializeOwned + Serialize + Validate {
        let key = cache_key(endpoint, &BTreeMap::new());
        self.cached(&key, || self.fetch_validated_document(endpoint)).await
    }

    /// Resolve an attachment id. Failures are logged and reported, never raised.
    pub async fn resolve_media(&self, id: u64) -> Result<MediaDescriptor, FallbackReason> {
        if id == 0 {
            return Err(FallbackReason::NotFound("media 0".to_string()));
        }
        let key = format!("media|{id}");
        let endpoint = format!("{MEDIA_ENDPOINT}/{id}");
        self.cached(&key, || self.fetch_media(&endpoint)).await.map_err(|e| {
            warn!(media_id = id, error = %e, "failed to fetch media");
            FallbackReason::from(&e)
        })
    }

    pub async fn health(&self) -> Result<(), FallbackReason> {
        let query = BTreeMap::from([("per_page".to_string(), "1".to_string())]);
        let url = self.build_url(HEALTH_ENDPOINT, &query).map_err(FallbackReason::from)?;
        self.get_json(HEALTH_ENDPOINT, url).await.map(|_| ()).map_err(|e| {
            warn!(error = %e, "health check failed");
            FallbackReason::from(&e)
        })
    }

    pub async fn health_check(&self) -> bool { self.health().await.is_ok() }

    pub async fn clear_cache(&self) { self.cache.clear().await }

    pub async fn cache_stats(&self) -> CacheStats { self.cache.stats(self.now()).await }

    // --- transport ---

    async fn fetch_validated<T>(&self, endpoint: &str, params: &BTreeMap<String, String>) -> ContentResult<Vec<T>>
    where T: DeserializeOwned + Validate {
        let mut query: BTreeMap<String, String> =
            DEFAULT_QUERY.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect();
        query.extend(params.iter().map(|(k, v)| (k.clone(), v.clone())));
        let url = self.build_url(endpoint, &query)?;
        let body = self.get_json(endpoint, url).await?;
        validate_collection(endpoint, body)
    }

    async fn fetch_validated_document<T>(&self, endpoint: &str) -> ContentResult<T>
    where T: DeserializeOwned + Validate {
        let url = self.build_url(endpoint, &BTreeMap::new())?;
        let body = self.get_json(endpoint, url).await?;
        validate_item(body).map_err(|e| ContentError::shape(endpoint, e.to_string()))
    }

    async fn fetch_media(&self, endpoint: &str) -> ContentResult<MediaDescriptor> {
        let url = self.build_url(endpoint, &BTreeMap::new())?;
        let body = self.get_json(endpoint, url).await?;
        let raw: RawMedia = serde_json::from_value(body).map_err(|e| ContentError::shape(endpoint, e.to_string()))?;
        media_from_raw(raw).ok_or_else(|| ContentError::shape(endpoint, "media has no source_url"))
    }

    fn build_url(&self, endpoint: &str, query: &BTreeMap<String, String>) -> ContentResult<Url> {
        let mut url = self
            .base
            .join(endpoint.trim_start_matches('/'))
            .map_err(|e| ContentError::Config(format!("invalid endpoint {endpoint:?}: {e}")))?;
        {
            let mut pairs = url.query_pairs_mut();
            for (k, v) in query {
                pairs.append_pair(k, v);
            }
            if let Some(token) = &self.config.bust_token {
                pairs.append_pair(BUST_PARAM, token);
            }
        }
        // query_pairs_mut leaves a bare `?` when nothing was appended
        if url.query() == Some("") {
            url.set_query(None);
        }
        Ok(url)
    }

    async fn get_json(&self, endpoint: &str, url: Url) -> ContentResult<Value> {
        debug!(%url, "GET");
        let resp = self
            .http
            .get(url)
            .header(ACCEPT, "application/json")
            .send()
            .await
            .map_err(ContentError::network)?;
        let status = resp.status();
        if !status.is_success() {
            let body = resp.bytes().await.unwrap_or_default();
            return Err(ContentError::from_error_body(status.as_u16(), &body));
        }
        let body = resp.bytes().await.map_err(ContentError::network)?;
        serde_json::from_slice(&body).map_err(|e| ContentError::shape(endpoint, format!("body is not JSON: {e}")))
    }

    // --- cache ---

    /// Cache-first lookup; on a miss, concurrent callers for the same key wait
    /// on one gate and only the first one fetches.
    async fn cached<T, F, Fut>(&self, key: &str, fetch: F) -> ContentResult<T>
    where
        T: Serialize + DeserializeOwned,
        F: FnOnce() -> Fut,
        Fut: Future<Output = ContentResult<T>>,
    {
        if self.config.cache_disabled {
            return fetch().await;
        }
        if let Some(hit) = self.cached_value(key, true).await {
            return Ok(hit);
        }
        let gate = self.gate(key);
        let result = {
            let _held = gate.lock().await;
            match self.cached_value(key, false).await {
                Some(hit) => Ok(hit),
                None => {
                    debug!(key, "cache miss, fetching");
                    let fetched = fetch().await;
                    if let Ok(value) = &fetched {
                        self.store(key, value).await;
                    }
                    fetched
                }
            }
        };
        self.release(key, &gate);
        result
    }

    async fn cached_value<T: DeserializeOwned>(&self, key: &str, counted: bool) -> Option<T> {
        let now = self.now();
        let payload = if counted { self.cache.get(key, now).await } else { self.cache.peek(key, now).await }?;
        match serde_json::from_str(&payload) {
            Ok(v) => {
                debug!(key, "cache hit");
                Some(v)
            }
            Err(e) => {
                warn!(key, error = %e, "unreadable cache entry, refetching");
                None
            }
        }
    }

    async fn store<T: Serialize>(&self, key: &str, value: &T) {
        match serde_json::to_string(value) {
            Ok(payload) => {
                // a zero TTL keeps entries until the cache is cleared
                let expires_at = match self.config.ttl().as_secs() {
                    0 => i64::MAX,
                    ttl => self.now().saturating_add(i64::try_from(ttl).unwrap_or(i64::MAX)),
                };
                self.cache.put(CacheEntry { key: key.to_string(), payload, expires_at }).await;
            }
            Err(e) => warn!(key, error = %e, "value could not be cached"),
        }
    }

    fn gate(&self, key: &str) -> Gate {
        let mut inflight = self.inflight.lock().unwrap_or_else(|e| e.into_inner());
        inflight.entry(key.to_string()).or_default().clone()
    }

    fn release(&self, key: &str, gate: &Gate) {
        let mut inflight = self.inflight.lock().unwrap_or_else(|e| e.into_inner());
        // only the map and this caller still hold the gate: nobody is waiting on it
        let idle = Arc::strong_count(gate) <= 2;
        if idle && inflight.get(key).is_some_and(|g| Arc::ptr_eq(g, gate)) {
            inflight.remove(key);
        }
    }
}

fn validate_collection<T>(endpoint: &str, body: Value) -> ContentResult<Vec<T>>
where T: DeserializeOwned + Validate {
    let Value::Array(items) = body else {
        return Err(ContentError::shape(endpoint, "expected a JSON array"));
    };
    let total = items.len();
    let valid: Vec<T> = items
        .into_iter()
        .enumerate()
        .filter_map(|(index, item)| match validate_item::<T>(item) {
            Ok(v) => Some(v),
            Err(e) => {
                warn!(endpoint, index, error = %e, "dropping invalid item");
                None
            }
        })
        .collect();
    debug!(endpoint, total, valid = valid.len(), "validated collection");
    Ok(valid)
}

fn parse_base(raw: &str) -> ContentResult<Url> {
    let mut s = raw.trim().trim_end_matches('/').to_string();
    s.push('/');
    let url = Url::parse(&s).map_err(|e| ContentError::Config(format!("invalid API_BASE_URL {raw:?}: {e}")))?;
    match url.scheme() {
        "http" | "https" => Ok(url),
        other => Err(ContentError::Config(format!("unsupported scheme {other:?} in API_BASE_URL"))),
    }
}

fn to_query(params: &[(&str, &str)]) -> BTreeMap<String, String> {
    params.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect()
}

/// Deterministic key for (endpoint, caller params); param order does not matter.
/// Pairs are form-encoded so a `&` or `=` inside a value cannot alias
/// another parameter list.
fn cache_key(endpoint: &str, params: &BTreeMap<String, String>) -> String {
    let query = form_urlencoded::Serializer::new(String::new()).extend_pairs(params).finish();
    format!("wp|{}|{}", endpoint.trim_matches('/'), query)
}

fn current_epoch() -> i64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .unwrap_or_default()
        .as_secs() as i64
}
