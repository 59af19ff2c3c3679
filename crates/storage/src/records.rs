//! Serialized shape of the saved result collection.
//!
//! The collection is stored as a JSON array of records with stable camelCase
//! field names so older snapshots keep loading.

use screening_core::model::{SavedCollection, ScoredResult, SubjectId};
use serde::{Deserialize, Serialize};

use crate::repository::StorageError;

/// Persisted shape for a scored result.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoredResultRecord {
    pub subject_id: String,
    pub total_correct: u32,
    pub total_incorrect: u32,
    pub median_latency_ms: f64,
    #[serde(default)]
    pub note: Option<String>,
}

impl ScoredResultRecord {
    #[must_use]
    pub fn from_result(result: &ScoredResult) -> Self {
        Self {
            subject_id: result.subject_id().as_str().to_owned(),
            total_correct: result.total_correct(),
            total_incorrect: result.total_incorrect(),
            median_latency_ms: result.median_latency_ms(),
            note: result.note().map(str::to_owned),
        }
    }

    /// Convert the record back into a domain `ScoredResult`.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::Serialization` for a blank subject id or a
    /// median that is negative or not finite.
    pub fn into_result(self) -> Result<ScoredResult, StorageError> {
        let subject_id = SubjectId::parse(&self.subject_id)
            .map_err(|e| StorageError::Serialization(e.to_string()))?;
        if !self.median_latency_ms.is_finite() || self.median_latency_ms < 0.0 {
            return Err(StorageError::Serialization(format!(
                "invalid medianLatencyMs for {subject_id}: {}",
                self.median_latency_ms
            )));
        }
        Ok(ScoredResult::from_persisted(
            subject_id,
            self.total_correct,
            self.total_incorrect,
            self.median_latency_ms,
            self.note,
        ))
    }
}

/// Serialize the whole collection.
///
/// # Errors
///
/// Returns `StorageError::Serialization` if encoding fails.
pub fn encode_collection(collection: &SavedCollection) -> Result<Vec<u8>, StorageError> {
    let records: Vec<_> = collection
        .entries()
        .iter()
        .map(ScoredResultRecord::from_result)
        .collect();
    serde_json::to_vec(&records).map_err(|e| StorageError::Serialization(e.to_string()))
}

/// Deserialize a collection written by [`encode_collection`].
///
/// Empty input decodes to an empty collection. Records are decoded one at a
/// time; a record that fails validation is logged and skipped so the rest of
/// the snapshot survives.
///
/// # Errors
///
/// Returns `StorageError::Serialization` if the bytes are not a JSON array.
pub fn decode_collection(bytes: &[u8]) -> Result<SavedCollection, StorageError> {
    if bytes.iter().all(u8::is_ascii_whitespace) {
        return Ok(SavedCollection::new());
    }
    let raw: Vec<serde_json::Value> =
        serde_json::from_slice(bytes).map_err(|e| StorageError::Serialization(e.to_string()))?;

    let mut results = Vec::with_capacity(raw.len());
    for (index, value) in raw.into_iter().enumerate() {
        let subject = value
            .get("subjectId")
            .and_then(serde_json::Value::as_str)
            .unwrap_or("<missing>")
            .to_owned();
        let decoded = serde_json::from_value::<ScoredResultRecord>(value)
            .map_err(|e| StorageError::Serialization(e.to_string()))
            .and_then(ScoredResultRecord::into_result);
        match decoded {
            Ok(result) => results.push(result),
            Err(err) => {
                tracing::warn!(index, subject_id = %subject, error = %err, "skipping invalid saved record");
            }
        }
    }
    Ok(SavedCollection::from_entries(results))
}
