//! Verification-code cache port and its Redis backend.
//!
//! Expiry is the cache's job: a key that outlives its TTL simply stops
//! existing, which is why `verify` cannot (and must not) distinguish an
//! expired code from one that was never issued.

use std::time::Duration;

use async_trait::async_trait;
use redis::AsyncCommands;

/// Error enumeration for verification-cache failures.
#[derive(Debug, thiserror::Error)]
pub enum CodeStoreError {
    #[error("verification cache unavailable: {0}")]
    Unavailable(String),
}

/// Key-value port for verification codes: set-with-TTL, get, delete.
/// Writing over an existing key replaces it, which is how reissue
/// invalidates the prior code (last writer wins, no locking).
#[async_trait]
pub trait CodeStore: Send + Sync {
    async fn put(&self, email: &str, code: &str, ttl: Duration) -> Result<(), CodeStoreError>;
    async fn get(&self, email: &str) -> Result<Option<String>, CodeStoreError>;
    async fn remove(&self, email: &str) -> Result<(), CodeStoreError>;
}

/// Redis-backed code cache.
pub struct RedisCodeStore {
    client: redis::Client,
}

impl RedisCodeStore {
    pub fn new(client: redis::Client) -> Self {
        Self { client }
    }

    fn key(email: &str) -> String {
        format!("verification:{email}")
    }

    async fn connection(&self) -> Result<redis::aio::MultiplexedConnection, CodeStoreError> {
        self.client
            .get_multiplexed_async_connection()
            .await
            .map_err(unavailable)
    }
}

#[async_trait]
impl CodeStore for RedisCodeStore {
    async fn put(&self, email: &str, code: &str, ttl: Duration) -> Result<(), CodeStoreError> {
        let mut conn = self.connection().await?;
        let _: () = conn
            .set_ex(Self::key(email), code, ttl.as_secs())
            .await
            .map_err(unavailable)?;
        Ok(())
    }

    async fn get(&self, email: &str) -> Result<Option<String>, CodeStoreError> {
        let mut conn = self.connection().await?;
        let value: Option<String> = conn.get(Self::key(email)).await.map_err(unavailable)?;
        Ok(value)
    }

    async fn remove(&self, email: &str) -> Result<(), CodeStoreError> {
        let mut conn = self.connection().await?;
        let _: () = conn.del(Self::key(email)).await.map_err(unavailable)?;
        Ok(())
    }
}

fn unavailable(e: redis::RedisError) -> CodeStoreError {
    CodeStoreError::Unavailable(e.to_string())
}

/// In-memory code cache used as a test double. Deadlines are enforced on
/// read, the same observable behavior Redis expiry gives the service.
#[cfg(test)]
pub struct InMemoryCodeStore {
    entries: std::sync::Mutex<std::collections::HashMap<String, (String, std::time::Instant)>>,
}

#[cfg(test)]
impl InMemoryCodeStore {
    pub fn new() -> Self {
        Self {
            entries: std::sync::Mutex::new(std::collections::HashMap::new()),
        }
    }

    /// The live code for `email`, if any — lets tests read what `issue`
    /// generated without going through the mailer.
    pub fn live_code(&self, email: &str) -> Option<String> {
        let guard = self.entries.lock().expect("code store mutex poisoned");
        guard
            .get(email)
            .filter(|(_, deadline)| *deadline > std::time::Instant::now())
            .map(|(code, _)| code.clone())
    }

    /// Remaining TTL of the live code for `email`, if any.
    pub fn remaining_ttl(&self, email: &str) -> Option<Duration> {
        let guard = self.entries.lock().expect("code store mutex poisoned");
        guard
            .get(email)
            .map(|(_, deadline)| deadline.saturating_duration_since(std::time::Instant::now()))
    }

    /// Force-expires the code for `email`, simulating TTL elapse.
    pub fn expire(&self, email: &str) {
        let mut guard = self.entries.lock().expect("code store mutex poisoned");
        if let Some((_, deadline)) = guard.get_mut(email) {
            *deadline = std::time::Instant::now() - Duration::from_secs(1);
        }
    }
}

#[cfg(test)]
#[async_trait]
impl CodeStore for InMemoryCodeStore {
    async fn put(&self, email: &str, code: &str, ttl: Duration) -> Result<(), CodeStoreError> {
        let mut guard = self.entries.lock().expect("code store mutex poisoned");
        guard.insert(
            email.to_string(),
            (code.to_string(), std::time::Instant::now() + ttl),
        );
        Ok(())
    }

    async fn get(&self, email: &str) -> Result<Option<String>, CodeStoreError> {
        let mut guard = self.entries.lock().expect("code store mutex poisoned");
        match guard.get(email) {
            Some((_, deadline)) if *deadline <= std::time::Instant::now() => {
                guard.remove(email);
                Ok(None)
            }
            Some((code, _)) => Ok(Some(code.clone())),
            None => Ok(None),
        }
    }

    async fn remove(&self, email: &str) -> Result<(), CodeStoreError> {
        let mut guard = self.entries.lock().expect("code store mutex poisoned");
        guard.remove(email);
        Ok(())
    }
}

/// Code cache whose every operation fails, for upstream-outage tests.
#[cfg(test)]
pub struct UnavailableCodeStore;

#[cfg(test)]
#[async_trait]
impl CodeStore for UnavailableCodeStore {
    async fn put(&self, _: &str, _: &str, _: Duration) -> Result<(), CodeStoreError> {
        Err(CodeStoreError::Unavailable("cache offline".to_string()))
    }

    async fn get(&self, _: &str) -> Result<Option<String>, CodeStoreError> {
        Err(CodeStoreError::Unavailable("cache offline".to_string()))
    }

    async fn remove(&self, _: &str) -> Result<(), CodeStoreError> {
        Err(CodeStoreError::Unavailable("cache offline".to_string()))
    }
}
