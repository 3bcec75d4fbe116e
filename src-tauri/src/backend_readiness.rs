use std::{
    env,
    net::{SocketAddr, TcpStream, ToSocketAddrs},
    thread,
    time::{Duration, Instant},
};

use url::Url;

use crate::{
    BACKEND_TIMEOUT_ENV, BACKEND_URL_ENV, DEFAULT_BACKEND_READY_TIMEOUT_MS, DEFAULT_BACKEND_URL,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ReadinessOutcome {
    Ready,
    ProcessGone,
    TimedOut,
}

pub(crate) fn normalize_backend_url(raw: &str, default_backend_url: &str) -> String {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return default_backend_url.to_string();
    }

    match Url::parse(trimmed) {
        Ok(mut parsed) if parsed.host_str().is_some() => {
            if parsed.path().is_empty() {
                parsed.set_path("/");
            }
            parsed.to_string()
        }
        _ => default_backend_url.to_string(),
    }
}

pub(crate) fn backend_url_from_env() -> String {
    normalize_backend_url(
        &env::var(BACKEND_URL_ENV).unwrap_or_else(|_| DEFAULT_BACKEND_URL.to_string()),
        DEFAULT_BACKEND_URL,
    )
}

pub(crate) fn parse_ready_timeout(raw: Option<&str>) -> Duration {
    let timeout_ms = raw
        .and_then(|value| value.trim().parse::<u64>().ok())
        .filter(|value| *value > 0)
        .unwrap_or(DEFAULT_BACKEND_READY_TIMEOUT_MS);
    Duration::from_millis(timeout_ms)
}

pub(crate) fn ready_timeout_from_env() -> Duration {
    parse_ready_timeout(env::var(BACKEND_TIMEOUT_ENV).ok().as_deref())
}

pub(crate) fn backend_socket_addrs(backend_url: &str) -> Vec<SocketAddr> {
    let Ok(parsed) = Url::parse(backend_url) else {
        return Vec::new();
    };
    let Some(host) = parsed.host_str() else {
        return Vec::new();
    };
    let host = host.trim_start_matches('[').trim_end_matches(']');
    let port = parsed.port_or_known_default().unwrap_or(80);

    match (host, port).to_socket_addrs() {
        Ok(addrs) => addrs.collect(),
        Err(_) => Vec::new(),
    }
}

pub(crate) fn ping_backend(addrs: &[SocketAddr], timeout: Duration) -> bool {
    let timeout = timeout.max(Duration::from_millis(50));
    addrs
        .iter()
        .any(|address| TcpStream::connect_timeout(address, timeout).is_ok())
}

/// Polls the loopback port until it accepts a connection. Stops early once
/// `process_alive` reports the backend is gone.
pub(crate) fn wait_for_backend<F>(
    addrs: &[SocketAddr],
    ping_timeout: Duration,
    poll_interval: Duration,
    limit: Duration,
    process_alive: F,
) -> ReadinessOutcome
where
    F: Fn() -> bool,
{
    let start_time = Instant::now();
    loop {
        if !process_alive() {
            return ReadinessOutcome::ProcessGone;
        }
        if ping_backend(addrs, ping_timeout) {
            return ReadinessOutcome::Ready;
        }
        if start_time.elapsed() >= limit {
            return ReadinessOutcome::TimedOut;
        }
        thread::sleep(poll_interval);
    }
}
