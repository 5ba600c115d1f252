//! Rating record operations.
//!
//! A record is keyed by document identity and is only served while the
//! stored content hash matches the caller's current content and the record
//! is younger than the configured TTL. Validity is decided at read time, so
//! no invalidation call exists anywhere.

use super::connection::RatingCache;
use super::hash::content_hash;
use crate::Error;
use serde::Serialize;
use serde::de::DeserializeOwned;
use tokio_rusqlite::params;
use tokio_rusqlite::rusqlite;

/// A stored rating record.
///
/// `payload` is the serialized rating exactly as written; the cache never
/// looks inside it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CacheRecord {
    pub document_id: String,
    pub content_hash: String,
    pub payload: String,
    pub written_at: i64,
}

impl CacheRecord {
    /// Deserialize the payload.
    pub fn decode<T: DeserializeOwned>(&self) -> Result<T, Error> {
        serde_json::from_str(&self.payload).map_err(Error::from)
    }

    /// Whether this record may be served for `current_hash` at `now`.
    pub fn is_valid(&self, current_hash: &str, now: i64, ttl_seconds: i64) -> bool {
        self.content_hash == current_hash && now - self.written_at < ttl_seconds
    }
}

/// Outcome of a cache read.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Lookup {
    /// Record exists, content matches and the TTL has not elapsed.
    Hit(CacheRecord),
    /// No record for this document.
    Missing,
    /// Record exists but was written for different content.
    ContentChanged,
    /// Record matches the content but is older than the TTL.
    Expired,
}

impl Lookup {
    /// Collapse to the record on a hit.
    pub fn into_hit(self) -> Option<CacheRecord> {
        match self {
            Lookup::Hit(record) => Some(record),
            _ => None,
        }
    }
}

fn now_secs() -> i64 {
    chrono::Utc::now().timestamp()
}

impl RatingCache {
    /// Get a valid record for `document_id` and its current content.
    ///
    /// Returns None if no record exists, the content changed, or the record expired.
    pub async fn get(&self, document_id: &str, current_content: &str) -> Result<Option<CacheRecord>, Error> {
        self.get_at(document_id, current_content, now_secs()).await
    }

    /// [`RatingCache::get`] evaluated at an explicit `now` (seconds since epoch).
    pub async fn get_at(&self, document_id: &str, current_content: &str, now: i64) -> Result<Option<CacheRecord>, Error> {
        Ok(self.lookup_at(document_id, current_content, now).await?.into_hit())
    }

    /// Classify the cache state for `document_id` against its current content.
    pub async fn lookup_at(&self, document_id: &str, current_content: &str, now: i64) -> Result<Lookup, Error> {
        let current_hash = content_hash(current_content);
        let ttl_seconds = self.ttl_seconds;

        let lookup = match self.fetch_record(document_id).await? {
            None => Lookup::Missing,
            Some(record) if record.content_hash != current_hash => Lookup::ContentChanged,
            Some(record) if !record.is_valid(&current_hash, now, ttl_seconds) => Lookup::Expired,
            Some(record) => Lookup::Hit(record),
        };

        match &lookup {
            Lookup::Hit(record) => tracing::debug!(document_id, written_at = record.written_at, "rating cache hit"),
            Lookup::Missing => tracing::debug!(document_id, "rating cache miss"),
            Lookup::ContentChanged => tracing::debug!(document_id, "cached rating is for different content"),
            Lookup::Expired => tracing::debug!(document_id, ttl_seconds, "cached rating expired"),
        }

        Ok(lookup)
    }

    /// Insert or replace the record for `document_id`.
    ///
    /// The content hash is computed here, from the same content the payload
    /// was produced for. Hash, payload and timestamp land in one statement,
    /// so readers see either the old row or the new row.
    pub async fn put<T: Serialize>(&self, document_id: &str, current_content: &str, payload: &T) -> Result<(), Error> {
        self.put_at(document_id, current_content, payload, now_secs()).await
    }

    /// [`RatingCache::put`] with an explicit write timestamp.
    pub async fn put_at<T: Serialize>(
        &self, document_id: &str, current_content: &str, payload: &T, now: i64,
    ) -> Result<(), Error> {
        let record = CacheRecord {
            document_id: document_id.to_string(),
            content_hash: content_hash(current_content),
            payload: serde_json::to_string(payload)?,
            written_at: now,
        };

        self.conn
            .call(move |conn| -> Result<(), Error> {
                conn.execute(
                    "INSERT INTO page_ratings (document_id, content_hash, payload, written_at)
                    VALUES (?1, ?2, ?3, ?4)
                    ON CONFLICT(document_id) DO UPDATE SET
                        content_hash = excluded.content_hash,
                        payload = excluded.payload,
                        written_at = excluded.written_at",
                    params![&record.document_id, &record.content_hash, &record.payload, record.written_at],
                )?;
                Ok(())
            })
            .await
            .map_err(Error::from)
    }

    /// Delete records older than `ttl_seconds`, regardless of content.
    ///
    /// Returns the number of deleted entries.
    pub async fn sweep(&self, ttl_seconds: i64) -> Result<u64, Error> {
        self.sweep_at(ttl_seconds, now_secs()).await
    }

    /// [`RatingCache::sweep`] evaluated at an explicit `now`.
    pub async fn sweep_at(&self, ttl_seconds: i64, now: i64) -> Result<u64, Error> {
        let cutoff = now - ttl_seconds;
        let deleted = self
            .conn
            .call(move |conn| -> Result<u64, Error> {
                let count = conn.execute("DELETE FROM page_ratings WHERE written_at < ?1", params![cutoff])?;
                Ok(count as u64)
            })
            .await
            .map_err(Error::from)?;

        tracing::info!(deleted, cutoff, "swept expired ratings");
        Ok(deleted)
    }

    /// Number of stored records, valid or not.
    pub async fn count(&self) -> Result<u64, Error> {
        self.conn
            .call(|conn| -> Result<u64, Error> {
                let count: i64 = conn.query_row("SELECT COUNT(*) FROM page_ratings", [], |row| row.get(0))?;
                Ok(count as u64)
            })
            .await
            .map_err(Error::from)
    }

    async fn fetch_record(&self, document_id: &str) -> Result<Option<CacheRecord>, Error> {
        let document_id = document_id.to_string();
        self.conn
            .call(move |conn| -> Result<Option<CacheRecord>, Error> {
                let result = conn.query_row(
                    "SELECT document_id, content_hash, payload, written_at
                    FROM page_ratings WHERE document_id = ?1",
                    params![document_id],
                    |row| {
                        Ok(CacheRecord {
                            document_id: row.get(0)?,
                            content_hash: row.get(1)?,
                            payload: row.get(2)?,
                            written_at: row.get(3)?,
                        })
                    },
                );

                match result {
                    Ok(record) => Ok(Some(record)),
                    Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
                    Err(e) => Err(e.into()),
                }
            })
            .await
            .map_err(Error::from)
    }
}
