//! crates/wander_persona_core/src/settings.rs
//!
//! The admin-settings cache: an explicit {value, fetched_at} holder with a
//! five-minute TTL, a manual invalidation entry point, and an injectable
//! clock. Values are read-only configuration, so concurrent refreshes are
//! idempotent (last write wins).

use crate::domain::AdminSettings;
use crate::ports::{AdminSettingsSource, PortResult};
use chrono::{DateTime, Duration, Utc};
use std::sync::{Arc, Mutex, MutexGuard};

/// Cache lifetime of a fetched settings value.
pub const SETTINGS_CACHE_TTL_SECS: i64 = 5 * 60;

/// Time source abstraction so expiry can be tested without sleeping.
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

/// The wall clock used in production.
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

struct CachedValue {
    value: AdminSettings,
    fetched_at: DateTime<Utc>,
}

/// Process-wide admin-settings cache.
pub struct SettingsCache {
    source: Arc<dyn AdminSettingsSource>,
    clock: Arc<dyn Clock>,
    ttl: Duration,
    state: Mutex<Option<CachedValue>>,
}

impl SettingsCache {
    pub fn new(source: Arc<dyn AdminSettingsSource>, clock: Arc<dyn Clock>) -> Self {
        Self::with_ttl(source, clock, Duration::seconds(SETTINGS_CACHE_TTL_SECS))
    }

    pub fn with_ttl(
        source: Arc<dyn AdminSettingsSource>,
        clock: Arc<dyn Clock>,
        ttl: Duration,
    ) -> Self {
        Self {
            source,
            clock,
            ttl,
            state: Mutex::new(None),
        }
    }

    fn lock_state(&self) -> MutexGuard<'_, Option<CachedValue>> {
        // A poisoned lock only means a panicked reader; the value inside is
        // still a plain config snapshot.
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Returns the cached settings, refreshing from the source once the TTL
    /// has elapsed. Source failures propagate to the caller.
    pub async fn get(&self) -> PortResult<AdminSettings> {
        let now = self.clock.now();
        {
            let state = self.lock_state();
            if let Some(cached) = state.as_ref() {
                if now - cached.fetched_at < self.ttl {
                    return Ok(cached.value.clone());
                }
            }
        }

        let value = self.source.fetch().await?;
        *self.lock_state() = Some(CachedValue {
            value: value.clone(),
            fetched_at: now,
        });
        Ok(value)
    }

    /// Drops the cached value so the next `get` refetches immediately.
    /// Called after the admin saves new settings.
    pub fn invalidate(&self) {
        *self.lock_state() = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ports::PortError;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct ManualClock {
        now: Mutex<DateTime<Utc>>,
    }

    impl ManualClock {
        fn starting_at(now: DateTime<Utc>) -> Arc<Self> {
            Arc::new(Self { now: Mutex::new(now) })
        }

        fn advance(&self, duration: Duration) {
            let mut now = self.now.lock().unwrap();
            *now += duration;
        }
    }

    impl Clock for ManualClock {
        fn now(&self) -> DateTime<Utc> {
            *self.now.lock().unwrap()
        }
    }

    struct CountingSource {
        fetches: AtomicUsize,
        fail: bool,
    }

    impl CountingSource {
        fn new() -> Arc<Self> {
            Arc::new(Self { fetches: AtomicUsize::new(0), fail: false })
        }

        fn failing() -> Arc<Self> {
            Arc::new(Self { fetches: AtomicUsize::new(0), fail: true })
        }

        fn count(&self) -> usize {
            self.fetches.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl AdminSettingsSource for CountingSource {
        async fn fetch(&self) -> PortResult<AdminSettings> {
            let n = self.fetches.fetch_add(1, Ordering::SeqCst) + 1;
            if self.fail {
                return Err(PortError::Configuration("source down".into()));
            }
            Ok(AdminSettings {
                text_model: format!("text-model-{n}"),
                text_model_api_key: "key".into(),
                image_model: "image-model".into(),
                image_model_api_key: String::new(),
                title: String::new(),
                image_url: String::new(),
            })
        }
    }

    fn epoch() -> DateTime<Utc> {
        DateTime::parse_from_rfc3339("2026-08-06T00:00:00Z")
            .unwrap()
            .with_timezone(&Utc)
    }

    #[tokio::test]
    async fn second_get_within_ttl_reuses_the_cached_value() {
        let source = CountingSource::new();
        let clock = ManualClock::starting_at(epoch());
        let cache = SettingsCache::new(source.clone(), clock.clone());

        let first = cache.get().await.unwrap();
        clock.advance(Duration::seconds(SETTINGS_CACHE_TTL_SECS - 1));
        let second = cache.get().await.unwrap();

        assert_eq!(first.text_model, second.text_model);
        assert_eq!(source.count(), 1);
    }

    #[tokio::test]
    async fn get_past_ttl_refetches() {
        let source = CountingSource::new();
        let clock = ManualClock::starting_at(epoch());
        let cache = SettingsCache::new(source.clone(), clock.clone());

        cache.get().await.unwrap();
        clock.advance(Duration::seconds(SETTINGS_CACHE_TTL_SECS));
        let refreshed = cache.get().await.unwrap();

        assert_eq!(source.count(), 2);
        assert_eq!(refreshed.text_model, "text-model-2");
    }

    #[tokio::test]
    async fn invalidate_forces_an_immediate_refetch() {
        let source = CountingSource::new();
        let clock = ManualClock::starting_at(epoch());
        let cache = SettingsCache::new(source.clone(), clock.clone());

        cache.get().await.unwrap();
        cache.invalidate();
        cache.get().await.unwrap();

        assert_eq!(source.count(), 2);
    }

    #[tokio::test]
    async fn source_failures_propagate_and_are_not_cached() {
        let source = CountingSource::failing();
        let clock = ManualClock::starting_at(epoch());
        let cache = SettingsCache::new(source.clone(), clock.clone());

        assert!(cache.get().await.is_err());
        assert!(cache.get().await.is_err());
        assert_eq!(source.count(), 2);
    }
}
