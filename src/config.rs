//! Runtime configuration (listen port, static bundle, token key, sessions, CORS).

use std::env;
use std::net::{Ipv4Addr, SocketAddr};
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, bail};
use rand::RngCore;

use crate::auth::session::MAX_TTL;

const DEFAULT_PORT: u16 = 8080;
const DEFAULT_SESSION_TTL: Duration = Duration::from_secs(24 * 60 * 60);

#[derive(Debug, Clone)]
pub struct Config {
    pub addr: SocketAddr,
    pub static_dir: PathBuf,
    pub token_key: [u8; 32],
    pub session_ttl: Duration,
    pub seed_demo: bool,
    /// `None` allows any origin.
    pub allowed_origin: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            addr: SocketAddr::from((Ipv4Addr::UNSPECIFIED, DEFAULT_PORT)),
            static_dir: PathBuf::from("./client/dist"),
            token_key: random_key(),
            session_ttl: DEFAULT_SESSION_TTL,
            seed_demo: true,
            allowed_origin: None,
        }
    }
}

impl Config {
    /// Read the environment. Unset variables fall back to defaults;
    /// malformed ones are an error rather than silently ignored.
    pub fn from_env() -> anyhow::Result<Self> {
        let mut config = Self { static_dir: static_dir(), ..Self::default() };

        if let Some(port) = var("PORT") {
            let port: u16 = port.parse().with_context(|| format!("PORT={port} is not a port number"))?;
            config.addr = SocketAddr::from((Ipv4Addr::UNSPECIFIED, port));
        }
        if let Some(hex_key) = var("CASINO_TOKEN_KEY") {
            config.token_key = parse_key(&hex_key)?;
        }
        if let Some(secs) = var("CASINO_SESSION_TTL_SECS") {
            config.session_ttl = parse_ttl(&secs).context("CASINO_SESSION_TTL_SECS")?;
        }
        if let Some(flag) = var("CASINO_SEED_DEMO") {
            config.seed_demo = parse_flag(&flag).with_context(|| format!("CASINO_SEED_DEMO={flag}"))?;
        }
        config.allowed_origin = var("CASINO_ALLOWED_ORIGIN").filter(|o| o != "*");
        Ok(config)
    }
}

fn var(name: &str) -> Option<String> {
    env::var(name).ok().map(|v| v.trim().to_owned()).filter(|v| !v.is_empty())
}

/// Resolve the client bundle directory.
/// Order:
/// 1) STATIC_DIR env var
/// 2) ./client/dist (container layout)
/// 3) ../client/dist (running from a sibling directory)
fn static_dir() -> PathBuf {
    if let Some(p) = var("STATIC_DIR") {
        return PathBuf::from(p);
    }
    let p1 = Path::new("./client/dist");
    if p1.exists() {
        return p1.to_path_buf();
    }
    PathBuf::from("../client/dist")
}

fn parse_key(hex_key: &str) -> anyhow::Result<[u8; 32]> {
    let bytes = hex::decode(hex_key).context("CASINO_TOKEN_KEY must be hex")?;
    bytes
        .try_into()
        .map_err(|b: Vec<u8>| anyhow::anyhow!("CASINO_TOKEN_KEY must be 32 bytes, got {}", b.len()))
}

fn parse_ttl(secs: &str) -> anyhow::Result<Duration> {
    let secs: u64 = secs.parse().context("must be a whole number of seconds")?;
    let ttl = Duration::from_secs(secs);
    if ttl.is_zero() || ttl > MAX_TTL {
        bail!("must be between 1 and {} seconds", MAX_TTL.as_secs());
    }
    Ok(ttl)
}

fn parse_flag(v: &str) -> anyhow::Result<bool> {
    match v.to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => bail!("expected true or false"),
    }
}

fn random_key() -> [u8; 32] {
    let mut key = [0u8; 32];
    rand::thread_rng().fill_bytes(&mut key);
    key
}
