// src/reddit/client.rs
use crate::canon::Identity;
use crate::config::RedditCredentials;
use crate::harvest::types::{HarvestApi, Item, ItemClass, ItemFeed, ResolveOutcome, UserHandle};
use crate::metrics::FEED_PAGES;
use crate::reddit::listing::{About, Listing, ListingPage};
use anyhow::{anyhow, bail, Context, Result};
use metrics::counter;
use reqwest::{redirect, StatusCode, Url};
use serde::Deserialize;
use std::collections::VecDeque;
use std::time::{Duration, Instant};
use tokio::sync::Mutex;
use tracing::{debug, info};

/// Page size requested from listing endpoints (Reddit's maximum).
pub const PAGE_LIMIT: u32 = 100;
/// Refresh the token this long before it actually expires.
const TOKEN_SLACK: Duration = Duration::from_secs(60);

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    #[serde(default = "default_expires_in")]
    expires_in: u64,
}

fn default_expires_in() -> u64 {
    3600
}

struct AccessToken {
    value: String,
    refresh_at: Instant,
}

/// App-only (client credentials) Reddit client.
pub struct RedditClient {
    http: reqwest::Client,
    creds: RedditCredentials,
    token: Mutex<Option<AccessToken>>,
}

impl RedditClient {
    pub fn new(creds: RedditCredentials) -> Result<Self> {
        let http = reqwest::Client::builder()
            .user_agent(creds.user_agent.clone())
            .redirect(redirect::Policy::none())
            .connect_timeout(Duration::from_secs(10))
            .timeout(Duration::from_secs(30))
            .build()
            .context("building http client")?;
        Ok(Self {
            http,
            creds,
            token: Mutex::new(None),
        })
    }

    async fn bearer(&self) -> Result<String> {
        let mut guard = self.token.lock().await;
        if let Some(tok) = guard.as_ref() {
            if Instant::now() < tok.refresh_at {
                return Ok(tok.value.clone());
            }
        }

        let url = format!("{}/api/v1/access_token", self.creds.auth_base);
        let resp = self
            .http
            .post(&url)
            .basic_auth(&self.creds.client_id, Some(&self.creds.client_secret))
            .form(&[("grant_type", "client_credentials")])
            .send()
            .await
            .context("requesting access token")?;
        let status = resp.status();
        if !status.is_success() {
            bail!("access token request rejected: HTTP {status} (check REDDIT_CLIENT_ID / REDDIT_CLIENT_SECRET)");
        }
        let tok: TokenResponse = resp.json().await.context("decoding access token")?;
        let lifetime = Duration::from_secs(tok.expires_in);
        let value = tok.access_token;
        *guard = Some(AccessToken {
            value: value.clone(),
            refresh_at: Instant::now() + lifetime.saturating_sub(TOKEN_SLACK),
        });
        debug!(target: "reddit", expires_in = tok.expires_in, "access token refreshed");
        Ok(value)
    }

    /// `{api_base}/seg/seg/...` with each segment percent-encoded.
    fn api_url(&self, segments: &[&str]) -> Result<Url> {
        let mut url = Url::parse(&self.creds.api_base)
            .with_context(|| format!("invalid api base {}", self.creds.api_base))?;
        url.path_segments_mut()
            .map_err(|_| anyhow!("api base cannot carry a path: {}", self.creds.api_base))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    async fn get(&self, url: Url, query: &[(&str, String)]) -> Result<reqwest::Response> {
        let token = self.bearer().await?;
        self.http
            .get(url.clone())
            .bearer_auth(token)
            .query(query)
            .send()
            .await
            .with_context(|| format!("GET {}", url.path()))
    }

    /// One cheap authenticated call; fails when credentials or connectivity are broken.
    pub async fn smoke_test(&self) -> Result<()> {
        let url = self.api_url(&["r", "popular", "hot"])?;
        let resp = self.get(url, &[("limit", "1".to_string())]).await?;
        let status = resp.status();
        if !status.is_success() {
            bail!("authentication smoke test failed: HTTP {status}");
        }
        info!(target: "reddit", "auth OK: app-only (client_credentials)");
        Ok(())
    }

    pub async fn resolve_user(&self, identity: &Identity) -> Result<ResolveOutcome> {
        let url = self.api_url(&["user", identity.as_str(), "about"])?;
        let resp = self.get(url, &[("raw_json", "1".to_string())]).await?;
        let status = resp.status();
        if status.is_redirection() {
            return Ok(ResolveOutcome::Redirect);
        }
        match status {
            StatusCode::NOT_FOUND => return Ok(ResolveOutcome::NotFound),
            StatusCode::FORBIDDEN => return Ok(ResolveOutcome::Forbidden),
            s if !s.is_success() => return Ok(ResolveOutcome::Other(format!("HTTP {s}"))),
            _ => {}
        }
        let about: About = match resp.json().await {
            Ok(a) => a,
            Err(e) => return Ok(ResolveOutcome::Other(format!("unexpected payload: {e}"))),
        };
        if about.data.is_suspended {
            return Ok(ResolveOutcome::Forbidden);
        }
        Ok(ResolveOutcome::Found(about.data.into_handle(identity.as_str())))
    }

    /// Fetch one newest-first listing page for `user`.
    pub async fn fetch_page(
        &self,
        user: &str,
        class: ItemClass,
        after: Option<&str>,
    ) -> Result<ListingPage> {
        let endpoint = match class {
            ItemClass::Post => "submitted",
            ItemClass::Comment => "comments",
        };
        let url = self.api_url(&["user", user, endpoint])?;
        let mut query = vec![
            ("sort", "new".to_string()),
            ("limit", PAGE_LIMIT.to_string()),
            ("raw_json", "1".to_string()),
        ];
        if let Some(a) = after {
            query.push(("after", a.to_string()));
        }
        let resp = self.get(url, &query).await?;
        let status = resp.status();
        if !status.is_success() {
            bail!("listing u/{user}/{endpoint} failed: HTTP {status}");
        }
        let listing: Listing = resp
            .json()
            .await
            .with_context(|| format!("decoding u/{user}/{endpoint} listing"))?;
        counter!(FEED_PAGES).increment(1);
        Ok(listing.into_page(class))
    }
}

/// Lazily paged feed: the next page is requested only when the buffer runs dry.
pub struct RedditFeed<'a> {
    client: &'a RedditClient,
    user: String,
    class: ItemClass,
    after: Option<String>,
    buffer: VecDeque<Item>,
    done: bool,
}

impl<'a> RedditFeed<'a> {
    pub fn new(client: &'a RedditClient, user: String, class: ItemClass) -> Self {
        Self {
            client,
            user,
            class,
            after: None,
            buffer: VecDeque::new(),
            done: false,
        }
    }
}

#[async_trait::async_trait]
impl ItemFeed for RedditFeed<'_> {
    async fn next_item(&mut self) -> Result<Option<Item>> {
        loop {
            if let Some(item) = self.buffer.pop_front() {
                return Ok(Some(item));
            }
            if self.done {
                return Ok(None);
            }
            let page = self
                .client
                .fetch_page(&self.user, self.class, self.after.as_deref())
                .await?;
            debug!(target: "reddit", user = %self.user, class = %self.class, items = page.items.len(), "page fetched");
            if page.after.is_none() || page.items.is_empty() {
                self.done = true;
            }
            self.after = page.after;
            self.buffer.extend(page.items);
        }
    }
}

#[async_trait::async_trait]
impl HarvestApi for RedditClient {
    async fn resolve(&self, identity: &Identity) -> Result<ResolveOutcome> {
        self.resolve_user(identity).await
    }

    fn feed<'a>(&'a self, user: &UserHandle, class: ItemClass) -> Box<dyn ItemFeed + Send + 'a> {
        Box::new(RedditFeed::new(self, user.name.clone(), class))
    }
}
