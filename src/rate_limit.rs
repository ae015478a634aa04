use std::collections::HashMap;
use std::sync::Mutex;
use std::time::{Duration, Instant};

use actix_web::HttpRequest;

/// Key used when no client address can be derived from the request headers.
/// Every unidentifiable client shares this bucket.
const UNKNOWN_CLIENT_KEY: &str = "unknown";

/// Entry tracking requests for a single client key.
#[derive(Debug, Clone)]
struct WindowEntry {
    count: u32,
    reset_at: Instant,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RateLimitDecision {
    Allowed,
    Limited,
}

impl RateLimitDecision {
    pub fn is_allowed(&self) -> bool {
        matches!(self, RateLimitDecision::Allowed)
    }
}

/// In-memory, per-process request counter with a fixed reset window.
///
/// The map is process-local: counters do not survive a restart and are not
/// shared between instances. A multi-instance deployment needs an external
/// counter with a TTL instead.
#[derive(Debug)]
pub struct RateLimiter {
    max_requests: u32,
    window: Duration,
    entries: Mutex<HashMap<String, WindowEntry>>,
}

impl RateLimiter {
    pub fn new(max_requests: u32, window: Duration) -> RateLimiter {
        RateLimiter {
            max_requests,
            window,
            entries: Mutex::new(HashMap::new()),
        }
    }

    /// Checks whether a request from `key` fits in the current window and
    /// counts it if it does.
    pub fn check(&self, key: &str) -> RateLimitDecision {
        let now = Instant::now();
        let mut entries = self.entries.lock().unwrap();

        let entry = entries.entry(key.to_string()).or_insert(WindowEntry {
            count: 0,
            reset_at: now + self.window,
        });

        // An expired window is replaced, not carried over.
        if now > entry.reset_at {
            entry.count = 0;
            entry.reset_at = now + self.window;
        }

        if entry.count >= self.max_requests {
            return RateLimitDecision::Limited;
        }

        entry.count += 1;
        RateLimitDecision::Allowed
    }
}

/// Derives the rate-limit key for a request: the first `x-forwarded-for`
/// entry, then `x-real-ip`, then the shared "unknown" bucket.
pub fn client_key(request: &HttpRequest) -> String {
    let header_value = |name: &str| {
        request
            .headers()
            .get(name)
            .and_then(|value| value.to_str().ok())
    };

    header_value("x-forwarded-for")
        .and_then(|forwarded| forwarded.split(',').next())
        .map(|ip| ip.trim())
        .filter(|ip| !ip.is_empty())
        .or_else(|| header_value("x-real-ip"))
        .unwrap_or(UNKNOWN_CLIENT_KEY)
        .to_string()
}
