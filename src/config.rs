use once_cell::sync::Lazy;
use std::env;
use std::fmt;
use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::time::Duration;

use crate::prompts::DEFAULT_PERSONA;

pub const DEFAULT_API_URL: &str = "https://openrouter.ai/api/v1/chat/completions";
pub const DEFAULT_MODEL: &str = "google/gemini-pro";
pub const DEFAULT_REFERER: &str = "http://localhost";
pub const DEFAULT_TITLE: &str = "roblox-chat-ai";
pub const DEFAULT_PORT: u16 = 5000;

pub static API_KEY: Lazy<Box<str>> = Lazy::new(|| {
    let key = env::var("OPENROUTER_API_KEY")
        .expect("OPENROUTER_API_KEY environment variable must be set");
    if key.trim().is_empty() {
        panic!("OPENROUTER_API_KEY cannot be empty");
    }
    key.trim().into()
});

pub static API_URL: Lazy<Box<str>> = Lazy::new(|| {
    env::var("API_URL")
        .unwrap_or_else(|_| DEFAULT_API_URL.into())
        .into_boxed_str()
});

pub static MODEL: Lazy<Box<str>> = Lazy::new(|| {
    env::var("MODEL")
        .unwrap_or_else(|_| DEFAULT_MODEL.into())
        .into_boxed_str()
});

pub static PERSONA: Lazy<Box<str>> = Lazy::new(|| {
    env::var("PERSONA")
        .unwrap_or_else(|_| DEFAULT_PERSONA.into())
        .into_boxed_str()
});

pub static HTTP_REFERER: Lazy<Box<str>> = Lazy::new(|| {
    env::var("HTTP_REFERER")
        .unwrap_or_else(|_| DEFAULT_REFERER.into())
        .into_boxed_str()
});

pub static X_TITLE: Lazy<Box<str>> = Lazy::new(|| {
    env::var("X_TITLE")
        .unwrap_or_else(|_| DEFAULT_TITLE.into())
        .into_boxed_str()
});

pub static HOST: Lazy<IpAddr> = Lazy::new(|| match env::var("HOST") {
    Ok(host) => host.parse().expect("HOST must be a valid IP address"),
    Err(_) => IpAddr::V4(Ipv4Addr::LOCALHOST),
});

pub static PORT: Lazy<u16> = Lazy::new(|| match env::var("PORT") {
    Ok(port) => port.parse().expect("PORT must be a valid port number"),
    Err(_) => DEFAULT_PORT,
});

pub static DEBUG: Lazy<bool> = Lazy::new(|| {
    env::var("DEBUG")
        .unwrap_or_else(|_| "false".into())
        .parse()
        .expect("DEBUG must be 'true' or 'false'")
});

/// Unset means the upstream call may block indefinitely.
pub static UPSTREAM_TIMEOUT: Lazy<Option<Duration>> =
    Lazy::new(|| env::var("UPSTREAM_TIMEOUT_SECS").ok().map(|secs| parse_timeout(&secs)));

fn parse_timeout(secs: &str) -> Duration {
    let secs: u64 = secs
        .trim()
        .parse()
        .expect("UPSTREAM_TIMEOUT_SECS must be a whole number of seconds");
    if secs == 0 {
        panic!("UPSTREAM_TIMEOUT_SECS must be greater than zero");
    }
    Duration::from_secs(secs)
}

pub fn validate() {
    // Trigger the lazy statics to force panics early
    let _ = &*API_KEY;
    let _ = &*API_URL;
    let _ = &*MODEL;
    let _ = &*PERSONA;
    let _ = &*HTTP_REFERER;
    let _ = &*X_TITLE;
    let _ = *HOST;
    let _ = *PORT;
    let _ = *DEBUG;
    let _ = *UPSTREAM_TIMEOUT;
}

/// Everything needed to reach the completion API.
#[derive(Clone)]
pub struct UpstreamConfig {
    pub api_url: Box<str>,
    pub api_key: Box<str>,
    pub model: Box<str>,
    pub referer: Box<str>,
    pub title: Box<str>,
    pub timeout: Option<Duration>,
}

impl UpstreamConfig {
    pub fn new(api_url: impl Into<Box<str>>, api_key: impl Into<Box<str>>) -> Self {
        Self {
            api_url: api_url.into(),
            api_key: api_key.into(),
            model: DEFAULT_MODEL.into(),
            referer: DEFAULT_REFERER.into(),
            title: DEFAULT_TITLE.into(),
            timeout: None,
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }
}

// Keeps the key out of `debug!("{:?}", config)` output.
impl fmt::Debug for UpstreamConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UpstreamConfig")
            .field("api_url", &self.api_url)
            .field("api_key", &"<redacted>")
            .field("model", &self.model)
            .field("referer", &self.referer)
            .field("title", &self.title)
            .field("timeout", &self.timeout)
            .finish()
    }
}

#[derive(Debug, Clone)]
pub struct RelayConfig {
    pub upstream: UpstreamConfig,
    pub persona: Box<str>,
    pub addr: SocketAddr,
}

impl RelayConfig {
    /// Snapshot of the process environment. Panics on invalid or missing values,
    /// same as [`validate`].
    pub fn from_env() -> Self {
        Self {
            upstream: UpstreamConfig {
                api_url: API_URL.clone(),
                api_key: API_KEY.clone(),
                model: MODEL.clone(),
                referer: HTTP_REFERER.clone(),
                title: X_TITLE.clone(),
                timeout: *UPSTREAM_TIMEOUT,
            },
            persona: PERSONA.clone(),
            addr: SocketAddr::new(*HOST, *PORT),
        }
    }
}
