use std::collections::HashMap;

use chrono::{DateTime, Duration, Utc};
use redis::AsyncCommands;
use tokio::sync::Mutex;

use super::config::{
    LOGIN_RATE_LIMIT_MAX_ATTEMPTS, LOGIN_RATE_LIMIT_STORE_URL, LOGIN_RATE_LIMIT_WINDOW_SECONDS,
};

const RATE_LIMIT_KEY_PREFIX: &str = "login:attempts";

/// Full-sweep cadence for the in-process map
fn gc_interval() -> Duration {
    Duration::hours(1)
}

struct LocalAttempts {
    entries: HashMap<String, Vec<DateTime<Utc>>>,
    last_sweep: DateTime<Utc>,
}

/// Sliding-window login rate limiter.
///
/// Owned, injected state rather than process globals: construct one and hand
/// it to the login route. The external counter backend is preferred when
/// configured; any error there falls through to the in-process map for that
/// call, so a backend outage never blocks logins or bypasses the limit.
///
/// Calling [`is_rate_limited`](Self::is_rate_limited) both checks and records
/// an attempt - every login request counts, not just failures, capping total
/// attempts per window regardless of outcome.
pub struct LoginRateLimiter {
    window: Duration,
    max_attempts: u64,
    redis_client: Option<redis::Client>,
    local: Mutex<LocalAttempts>,
}

impl LoginRateLimiter {
    pub fn new(window: Duration, max_attempts: u64, redis_client: Option<redis::Client>) -> Self {
        Self {
            window,
            max_attempts,
            redis_client,
            local: Mutex::new(LocalAttempts {
                entries: HashMap::new(),
                last_sweep: Utc::now(),
            }),
        }
    }

    /// Build from LOGIN_RATE_LIMIT_* environment variables.
    pub fn from_env() -> Self {
        let redis_client = LOGIN_RATE_LIMIT_STORE_URL.as_ref().and_then(|url| {
            match redis::Client::open(url.as_str()) {
                Ok(client) => Some(client),
                Err(e) => {
                    tracing::warn!(
                        "Invalid LOGIN_RATE_LIMIT_STORE_URL, using in-process limiter: {}",
                        e
                    );
                    None
                }
            }
        });

        Self::new(
            Duration::seconds(*LOGIN_RATE_LIMIT_WINDOW_SECONDS),
            *LOGIN_RATE_LIMIT_MAX_ATTEMPTS,
            redis_client,
        )
    }

    /// Record an attempt for `client_id` and report whether it is blocked.
    pub async fn is_rate_limited(&self, client_id: &str) -> bool {
        if let Some(client) = &self.redis_client {
            match self.check_redis(client, client_id).await {
                Ok(blocked) => return blocked,
                Err(e) => {
                    tracing::warn!(
                        "Rate limit backend error, falling back to in-process limiter: {}",
                        e
                    );
                }
            }
        }

        self.check_local(client_id).await
    }

    async fn check_redis(
        &self,
        client: &redis::Client,
        client_id: &str,
    ) -> Result<bool, redis::RedisError> {
        let mut conn = client.get_multiplexed_async_connection().await?;

        let key = format!("{RATE_LIMIT_KEY_PREFIX}:{client_id}");
        let attempts: u64 = conn.incr(&key, 1).await?;
        if attempts == 1 {
            let _: () = conn
                .pexpire(&key, self.window.num_milliseconds())
                .await?;
        }

        Ok(attempts > self.max_attempts)
    }

    async fn check_local(&self, client_id: &str) -> bool {
        let now = Utc::now();
        let mut local = self.local.lock().await;

        if now - local.last_sweep > gc_interval() {
            Self::sweep(&mut local.entries, now, self.window);
            local.last_sweep = now;
        }

        let attempts = local.entries.entry(client_id.to_string()).or_default();
        attempts.retain(|t| now - *t < self.window);
        attempts.push(now);

        attempts.len() as u64 > self.max_attempts
    }

    /// Drop aged-out timestamps for every client id to bound memory when many
    /// distinct origins appear.
    fn sweep(entries: &mut HashMap<String, Vec<DateTime<Utc>>>, now: DateTime<Utc>, window: Duration) {
        entries.retain(|_, attempts| {
            attempts.retain(|t| now - *t < window);
            !attempts.is_empty()
        });
    }

    #[cfg(test)]
    async fn sweep_now(&self) {
        let mut local = self.local.lock().await;
        let now = Utc::now();
        Self::sweep(&mut local.entries, now, self.window);
        local.last_sweep = now;
    }

    #[cfg(test)]
    async fn tracked_clients(&self) -> usize {
        self.local.lock().await.entries.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn limiter(window_ms: i64, max_attempts: u64) -> LoginRateLimiter {
        LoginRateLimiter::new(Duration::milliseconds(window_ms), max_attempts, None)
    }

    #[tokio::test]
    async fn test_attempts_under_threshold_admitted() {
        let limiter = limiter(60_000, 5);

        for _ in 0..5 {
            assert!(!limiter.is_rate_limited("10.0.0.1").await);
        }
    }

    #[tokio::test]
    async fn test_sixth_attempt_blocked() {
        let limiter = limiter(60_000, 5);

        for _ in 0..5 {
            assert!(!limiter.is_rate_limited("10.0.0.1").await);
        }
        assert!(limiter.is_rate_limited("10.0.0.1").await);
    }

    #[tokio::test]
    async fn test_window_expiry_readmits() {
        let limiter = limiter(100, 2);

        assert!(!limiter.is_rate_limited("10.0.0.1").await);
        assert!(!limiter.is_rate_limited("10.0.0.1").await);
        assert!(limiter.is_rate_limited("10.0.0.1").await);

        tokio::time::sleep(std::time::Duration::from_millis(150)).await;

        assert!(!limiter.is_rate_limited("10.0.0.1").await);
    }

    #[tokio::test]
    async fn test_client_ids_are_independent() {
        let limiter = limiter(60_000, 1);

        assert!(!limiter.is_rate_limited("10.0.0.1").await);
        assert!(limiter.is_rate_limited("10.0.0.1").await);

        // A different origin is unaffected
        assert!(!limiter.is_rate_limited("10.0.0.2").await);
    }

    #[tokio::test]
    async fn test_every_call_counts_as_an_attempt() {
        // The check itself records: N+1 calls block even though none "failed"
        let limiter = limiter(60_000, 3);

        let mut results = Vec::new();
        for _ in 0..4 {
            results.push(limiter.is_rate_limited("10.0.0.1").await);
        }
        assert_eq!(results, vec![false, false, false, true]);
    }

    #[tokio::test]
    async fn test_sweep_drops_aged_out_clients() {
        let limiter = limiter(50, 5);

        for i in 0..20 {
            let _ = limiter.is_rate_limited(&format!("10.0.0.{i}")).await;
        }
        assert_eq!(limiter.tracked_clients().await, 20);

        tokio::time::sleep(std::time::Duration::from_millis(80)).await;
        limiter.sweep_now().await;

        assert_eq!(limiter.tracked_clients().await, 0);
    }

    #[tokio::test]
    async fn test_unreachable_backend_falls_through_to_local() {
        // Nothing listens on this port; every redis call errors and the
        // in-process path must still enforce the limit
        let client = redis::Client::open("redis://127.0.0.1:1/").unwrap();
        let limiter =
            LoginRateLimiter::new(Duration::milliseconds(60_000), 2, Some(client));

        assert!(!limiter.is_rate_limited("10.0.0.1").await);
        assert!(!limiter.is_rate_limited("10.0.0.1").await);
        assert!(limiter.is_rate_limited("10.0.0.1").await);
    }

    #[tokio::test]
    async fn test_concurrent_attempts_none_lost() {
        let limiter = std::sync::Arc::new(limiter(60_000, 100));

        let mut handles = Vec::new();
        for _ in 0..10 {
            let limiter = limiter.clone();
            handles.push(tokio::spawn(async move {
                for _ in 0..10 {
                    let _ = limiter.is_rate_limited("10.0.0.1").await;
                }
            }));
        }
        for handle in handles {
            handle.await.unwrap();
        }

        // 100 attempts recorded; the 101st crosses the threshold
        assert!(limiter.is_rate_limited("10.0.0.1").await);
    }
}
