//! Web API catalog backed by `ureq`.
//!
//! Searches a Spotify-compatible Web API using the client-credentials grant.
//! Album search results carry no popularity, so album candidates are hydrated
//! through the batch album endpoint before they are returned.

use std::collections::HashMap;
use std::num::NonZeroU32;
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use async_trait::async_trait;
use governor::state::NotKeyed;
use governor::{Quota, RateLimiter};
use log::{debug, warn};
use serde_json::Value;

use crate::backends::MediaCatalog;
use crate::config::CatalogConfig;
use crate::credentials::CatalogCredentials;
use crate::error::{Error, Result};
use crate::media::{Contributor, MediaItem, MediaKind};

const ALBUM_BATCH_SIZE: usize = 20;
const TOKEN_EXPIRY_SLACK: Duration = Duration::from_secs(30);
const DEFAULT_TOKEN_LIFETIME_SECS: u64 = 3_600;
const RATE_LIMIT_POLL_INTERVAL: Duration = Duration::from_millis(50);
const USER_AGENT: &str = concat!("mentune/", env!("CARGO_PKG_VERSION"));

type DirectLimiter =
    RateLimiter<NotKeyed, governor::state::InMemoryState, governor::clock::DefaultClock>;

struct CachedToken {
    access_token: String,
    expires_at: Instant,
}

struct WebCatalogInner {
    http_client: ureq::Agent,
    settings: CatalogConfig,
    credentials: CatalogCredentials,
    token: Mutex<Option<CachedToken>>,
    limiter: DirectLimiter,
}

/// Catalog that answers searches from the remote Web API.
///
/// Cloning is cheap; clones share the HTTP agent, token cache and limiter.
#[derive(Clone)]
pub struct WebCatalog {
    inner: Arc<WebCatalogInner>,
}

impl WebCatalog {
    /// Creates a catalog client for the configured endpoints.
    pub fn new(settings: &CatalogConfig, credentials: CatalogCredentials) -> Self {
        let http_client = ureq::AgentBuilder::new()
            .timeout_connect(Duration::from_secs(settings.connect_timeout_secs))
            .timeout_read(Duration::from_secs(settings.read_timeout_secs))
            .timeout_write(Duration::from_secs(settings.read_timeout_secs))
            .user_agent(USER_AGENT)
            .build();
        let per_second =
            NonZeroU32::new(settings.requests_per_second).unwrap_or(NonZeroU32::MIN);
        Self {
            inner: Arc::new(WebCatalogInner {
                http_client,
                settings: settings.clone(),
                credentials,
                token: Mutex::new(None),
                limiter: RateLimiter::direct(Quota::per_second(per_second)),
            }),
        }
    }
}

#[async_trait]
impl MediaCatalog for WebCatalog {
    async fn search(&self, kind: MediaKind, title: &str) -> Result<Vec<MediaItem>> {
        let inner = Arc::clone(&self.inner);
        let title = title.to_string();
        tokio::task::spawn_blocking(move || inner.search_blocking(kind, &title))
            .await
            .map_err(|err| Error::lookup(format!("catalog worker failed: {err}")))?
    }
}

impl WebCatalogInner {
    fn search_blocking(&self, kind: MediaKind, title: &str) -> Result<Vec<MediaItem>> {
        let url = search_url(&self.settings, kind, title);
        let payload = self.get_json(&url, "search")?;
        let mut found = parse_search_items(kind, &payload);
        debug!(
            "Catalog search for {} '{}' returned {} items",
            kind.label(),
            title,
            found.len()
        );
        if kind == MediaKind::Album {
            self.hydrate_album_popularity(&mut found)?;
        }
        Ok(found.into_iter().map(|(_, item)| item).collect())
    }

    fn hydrate_album_popularity(&self, albums: &mut [(String, MediaItem)]) -> Result<()> {
        let ids: Vec<&str> = albums
            .iter()
            .map(|(id, _)| id.as_str())
            .filter(|id| !id.is_empty())
            .collect();
        let mut popularity_by_uri: HashMap<String, u32> = HashMap::new();
        for batch in ids.chunks(ALBUM_BATCH_SIZE) {
            let url = albums_url(&self.settings, batch);
            let payload = self.get_json(&url, "albums")?;
            popularity_by_uri.extend(parse_album_popularity(&payload));
        }
        for (_, album) in albums.iter_mut() {
            if let Some(popularity) = popularity_by_uri.get(&album.identity) {
                album.popularity = Some(*popularity);
            }
        }
        Ok(())
    }

    fn wait_for_rate_limit_slot(&self) {
        while self.limiter.check().is_err() {
            std::thread::sleep(RATE_LIMIT_POLL_INTERVAL);
        }
    }

    fn get_json(&self, url: &str, context: &str) -> Result<Value> {
        let token = self.access_token()?;
        self.wait_for_rate_limit_slot();
        let response = self
            .http_client
            .get(url)
            .set("Authorization", &format!("Bearer {token}"))
            .set("Accept", "application/json")
            .call()
            .map_err(|err| describe_failure(context, err))?;
        response
            .into_json::<Value>()
            .map_err(|err| Error::lookup(format!("catalog {context} response parse failed: {err}")))
    }

    fn access_token(&self) -> Result<String> {
        let mut cached = self
            .token
            .lock()
            .map_err(|_| Error::lookup("catalog token cache lock poisoned"))?;
        if let Some(token) = cached
            .as_ref()
            .filter(|token| token.expires_at > Instant::now())
        {
            return Ok(token.access_token.clone());
        }
        let fresh = self.request_token()?;
        let access_token = fresh.access_token.clone();
        *cached = Some(fresh);
        Ok(access_token)
    }

    fn request_token(&self) -> Result<CachedToken> {
        debug!("Requesting catalog access token from {}", self.settings.token_url);
        let response = self
            .http_client
            .post(&self.settings.token_url)
            .send_form(&[
                ("grant_type", "client_credentials"),
                ("client_id", self.credentials.client_id.as_str()),
                ("client_secret", self.credentials.client_secret.as_str()),
            ])
            .map_err(|err| describe_failure("token", err))?;
        let payload: Value = response
            .into_json()
            .map_err(|err| Error::lookup(format!("catalog token response parse failed: {err}")))?;
        parse_token(&payload, Instant::now())
    }
}

fn describe_failure(context: &str, error: ureq::Error) -> Error {
    let message = match error {
        ureq::Error::Status(429, response) => format!(
            "catalog {context} request was rate limited (retry after {}s)",
            response.header("Retry-After").unwrap_or("?")
        ),
        ureq::Error::Status(code, _) => {
            format!("catalog {context} request failed with HTTP {code}")
        }
        ureq::Error::Transport(transport) => {
            format!("catalog {context} request failed: {transport}")
        }
    };
    warn!("{}", message);
    Error::lookup(message)
}

fn search_url(settings: &CatalogConfig, kind: MediaKind, title: &str) -> String {
    let query = format!("{}:\"{}\"", kind.search_type(), title.trim());
    let mut url = format!(
        "{}/search?q={}&type={}&limit={}",
        settings.api_base_url,
        urlencoding::encode(&query),
        kind.search_type(),
        settings.search_limit
    );
    if !settings.market.is_empty() {
        url.push_str("&market=");
        url.push_str(&urlencoding::encode(&settings.market));
    }
    url
}

fn albums_url(settings: &CatalogConfig, ids: &[&str]) -> String {
    format!(
        "{}/albums?ids={}",
        settings.api_base_url,
        urlencoding::encode(&ids.join(","))
    )
}

fn array_items(value: Option<&Value>) -> Vec<&Value> {
    match value {
        Some(Value::Array(items)) => items.iter().collect(),
        Some(item @ Value::Object(_)) => vec![item],
        _ => Vec::new(),
    }
}

fn parse_item(kind: MediaKind, value: &Value) -> Option<MediaItem> {
    let identity = value.get("uri")?.as_str()?.to_string();
    let name = value.get("name")?.as_str()?.to_string();
    let artists: Vec<Contributor> = array_items(value.get("artists"))
        .into_iter()
        .filter_map(|artist| artist.get("name").and_then(Value::as_str))
        .map(Contributor::new)
        .collect();
    if artists.is_empty() {
        return None;
    }
    let popularity = value
        .get("popularity")
        .and_then(Value::as_u64)
        .map(|popularity| u32::try_from(popularity).unwrap_or(u32::MAX));
    Some(MediaItem {
        kind,
        name,
        artists,
        popularity,
        identity,
    })
}

/// Parsed search results paired with their catalog ids.
fn parse_search_items(kind: MediaKind, payload: &Value) -> Vec<(String, MediaItem)> {
    let section = format!("{}s", kind.search_type());
    array_items(
        payload
            .get(section.as_str())
            .and_then(|value| value.get("items")),
    )
    .into_iter()
    .filter_map(|value| {
        let id = value
            .get("id")
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string();
        parse_item(kind, value).map(|item| (id, item))
    })
    .collect()
}

fn parse_album_popularity(payload: &Value) -> Vec<(String, u32)> {
    array_items(payload.get("albums"))
        .into_iter()
        .filter_map(|album| {
            let uri = album.get("uri")?.as_str()?.to_string();
            let popularity = album.get("popularity")?.as_u64()?;
            Some((uri, u32::try_from(popularity).unwrap_or(u32::MAX)))
        })
        .collect()
}

fn parse_token(payload: &Value, now: Instant) -> Result<CachedToken> {
    let access_token = payload
        .get("access_token")
        .and_then(Value::as_str)
        .filter(|token| !token.is_empty())
        .ok_or_else(|| Error::lookup("catalog token response missing access_token"))?
        .to_string();
    let lifetime = payload
        .get("expires_in")
        .and_then(Value::as_u64)
        .unwrap_or(DEFAULT_TOKEN_LIFETIME_SECS);
    let expires_at = now + Duration::from_secs(lifetime).saturating_sub(TOKEN_EXPIRY_SLACK);
    Ok(CachedToken {
        access_token,
        expires_at,
    })
}
