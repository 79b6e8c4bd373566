//!
//! src/fetch.rs  Andrew Belles  Oct 2nd, 2025
//!
//! Defines methods for hitting the spotify endpoints the collector needs.
//! Every lookup is a single attempt; non-2xx, transport errors and timeouts
//! all come back as a miss instead of an error
//!

use async_trait::async_trait;
use reqwest::{Client, header, redirect, RequestBuilder};
use serde_json::Value;
use tracing::{debug, warn};

use crate::config::{HttpConfig, SpotifyConfig};
use crate::types::{genres_from_artist, SpotifyArtistId, TokenResponse, TrackLookup};
use crate::errors::TrendsError;

/// Client building functionality
fn client_helper(http: &HttpConfig) -> reqwest::ClientBuilder  {
    Client::builder()
        .timeout(http.timeout)
        .connect_timeout(http.connect_timeout)
        .pool_max_idle_per_host(http.pool_max_idle_per_host)
        .pool_idle_timeout(Some(http.pool_idle_timeout))
        .redirect(redirect::Policy::limited(http.max_redirects as usize))
}

pub fn base_client(http: &HttpConfig) -> Result<Client, TrendsError> {
    let mut h = header::HeaderMap::new();
    h.insert(header::ACCEPT, header::HeaderValue::from_static("application/json"));
    client_helper(http)
        .default_headers(h)
        .build()
        .map_err(|e| TrendsError::Http(format!("build client: {e}")))
}

#[derive(Clone, Debug)]
pub struct SpotifyClient {
    pub http: Client,
    pub cfg: SpotifyConfig
}

impl SpotifyClient {
    pub fn new(http_config: &HttpConfig, cfg: &SpotifyConfig) ->
        Result<Self, TrendsError> {

        let http = base_client(http_config)?;
        Ok( Self {
            http,
            cfg: cfg.clone()
        })
    }

    fn endpoint(&self, path: &str) -> Result<url::Url, TrendsError> {
        self.cfg.api_base.join(path)
            .map_err(|e| TrendsError::Config(format!("join {path}: {e}")))
    }

    /// POST accounts/api/token (client credentials)
    pub fn token_request(&self) -> RequestBuilder {
        self.http
            .post(self.cfg.token_url.clone())
            .basic_auth(&self.cfg.client_id, Some(&self.cfg.client_secret))
            .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
            .body("grant_type=client_credentials")
    }

    /// GET /v1/search?type=track&q=...&limit=
    pub fn search(&self, query: &str, limit: u32, bearer: &str) ->
        Result<RequestBuilder, TrendsError> {
        let url = self.endpoint("search")?;
        Ok(self.http.get(url).bearer_auth(bearer).query(&[
            ("q", query),
            ("type", "track"),
            ("limit", &limit.to_string()),
        ]))
    }

    /// GET /v1/artists/{id}
    pub fn artist(&self, artist_id: &str, bearer: &str) ->
        Result<RequestBuilder, TrendsError> {
        let url = self.endpoint(&format!("artists/{artist_id}"))?;
        Ok(self.http.get(url).bearer_auth(bearer))
    }

    /// Exchanges the client credentials for a bearer token
    pub async fn authenticate(&self) -> Result<String, TrendsError> {
        let response = self.token_request().send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(TrendsError::Http(format!("token exchange status {status}")));
        }
        let token: TokenResponse = response.json().await?;
        debug!(token_type = ?token.token_type, expires_in = ?token.expires_in, "spotify.token");
        Ok(token.access_token)
    }
}

/// Single attempt json GET, any failure is reported as None
async fn get_json(request: RequestBuilder, event: &'static str) -> Option<Value> {
    match request.send().await {
        Ok(resp) if resp.status().is_success() => {
            match resp.json::<Value>().await {
                Ok(v) => Some(v),
                Err(e) => {
                    warn!(error = %e, "{event}.decode");
                    None
                }
            }
        },
        Ok(resp) => {
            warn!(status = %resp.status(), "{event}.status");
            None
        },
        Err(e) => {
            warn!(error = %e, timeout = e.is_timeout(), "{event}.error");
            None
        }
    }
}

/// Source of track and artist metadata used by the collector
#[async_trait]
pub trait MetadataSource {
    /// First track hit for the song/artist text, None when not found
    async fn search_track(&self, song: &str, artist: &str) -> Option<TrackLookup>;

    /// Genre tags of an artist, empty when not found
    async fn artist_genres(&self, artist_id: &SpotifyArtistId) -> Vec<String>;
}

/// Spotify client holding the bearer token of one run
pub struct SpotifyFetcher {
    client: SpotifyClient,
    bearer: String
}

impl SpotifyFetcher {
    pub async fn connect(client: SpotifyClient) -> Result<Self, TrendsError> {
        let bearer = client.authenticate().await?;
        Ok( Self { client, bearer } )
    }
}

#[async_trait]
impl MetadataSource for SpotifyFetcher {
    async fn search_track(&self, song: &str, artist: &str) -> Option<TrackLookup> {
        let query = format!("{song} {artist}");
        let request = match self.client.search(&query, 1, &self.bearer) {
            Ok(r) => r,
            Err(e) => {
                warn!(error = %e, "fetch.search.build");
                return None;
            }
        };
        let body = get_json(request, "fetch.search").await?;
        let hit = TrackLookup::from_search(&body);
        if hit.is_none() {
            debug!(song, artist, "fetch.search.miss");
        }
        hit
    }

    async fn artist_genres(&self, artist_id: &SpotifyArtistId) -> Vec<String> {
        let request = match self.client.artist(&artist_id.0, &self.bearer) {
            Ok(r) => r,
            Err(e) => {
                warn!(error = %e, "fetch.artist.build");
                return Vec::new();
            }
        };
        match get_json(request, "fetch.artist").await {
            Some(body) => genres_from_artist(&body),
            None => Vec::new()
        }
    }
}
