//! Embedding and upserting retrieval units into the vector index.

use tracing::{info, instrument, warn};

use passageforge_shared::Result;

use crate::{Embedder, EmbeddingTask, UpsertItem, VectorStore};

/// Outcome tally for one ingest run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct IngestReport {
    /// Units embedded and upserted.
    pub upserted: usize,
    /// Units skipped after an embed or upsert failure.
    pub failed: usize,
}

/// Embed every retrieval unit and upsert it under `{key}_{index}`.
///
/// A unit that fails to embed or upsert is logged and counted, and the
/// run moves on; one bad unit never aborts the batch. The report says
/// how the run went.
#[instrument(skip_all, fields(key, units = units.len()))]
pub async fn ingest_document(
    embedder: &impl Embedder,
    store: &impl VectorStore,
    key: &str,
    units: &[String],
) -> Result<IngestReport> {
    let mut report = IngestReport::default();

    for (index, unit) in units.iter().enumerate() {
        let id = format!("{key}_{index}");

        let values = match embedder.embed(unit, EmbeddingTask::Document).await {
            Ok(values) => values,
            Err(error) => {
                warn!(%id, %error, "skipping unit after embed failure");
                report.failed += 1;
                continue;
            }
        };

        let item = UpsertItem {
            id: id.clone(),
            values,
            text: unit.clone(),
        };
        match store.upsert(vec![item]).await {
            Ok(()) => report.upserted += 1,
            Err(error) => {
                warn!(%id, %error, "skipping unit after upsert failure");
                report.failed += 1;
            }
        }
    }

    info!(
        upserted = report.upserted,
        failed = report.failed,
        "ingest complete"
    );
    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mocks::{MockEmbedder, MockStore};

    fn units(texts: &[&str]) -> Vec<String> {
        texts.iter().map(|t| t.to_string()).collect()
    }

    #[tokio::test]
    async fn upserts_every_unit_with_indexed_ids() {
        let embedder = MockEmbedder::new();
        let store = MockStore::new();
        let units = units(&["first passage", "second passage", "third passage"]);

        let report = ingest_document(&embedder, &store, "museum", &units)
            .await
            .unwrap();

        assert_eq!(report, IngestReport { upserted: 3, failed: 0 });
        let upserted = store.upserted.lock().unwrap();
        let ids: Vec<&str> = upserted.iter().map(|i| i.id.as_str()).collect();
        assert_eq!(ids, ["museum_0", "museum_1", "museum_2"]);
    }

    #[tokio::test]
    async fn round_trips_unit_text_as_metadata() {
        let embedder = MockEmbedder::new();
        let store = MockStore::new();
        let units = units(&["the original passage text"]);

        ingest_document(&embedder, &store, "doc", &units)
            .await
            .unwrap();

        let upserted = store.upserted.lock().unwrap();
        assert_eq!(upserted[0].text, "the original passage text");
        assert!(!upserted[0].values.is_empty());
    }

    #[tokio::test]
    async fn embed_failure_skips_the_unit_and_continues() {
        let embedder = MockEmbedder::failing_on(1);
        let store = MockStore::new();
        let units = units(&["ok one", "bad", "ok two"]);

        let report = ingest_document(&embedder, &store, "doc", &units)
            .await
            .unwrap();

        assert_eq!(report, IngestReport { upserted: 2, failed: 1 });
        let upserted = store.upserted.lock().unwrap();
        let ids: Vec<&str> = upserted.iter().map(|i| i.id.as_str()).collect();
        assert_eq!(ids, ["doc_0", "doc_2"]);
    }

    #[tokio::test]
    async fn upsert_failure_counts_but_does_not_abort() {
        let embedder = MockEmbedder::new();
        let store = MockStore {
            fail_upserts: true,
            ..MockStore::new()
        };
        let units = units(&["one", "two"]);

        let report = ingest_document(&embedder, &store, "doc", &units)
            .await
            .unwrap();

        assert_eq!(report, IngestReport { upserted: 0, failed: 2 });
        // Every unit was still embedded before its upsert was attempted.
        assert_eq!(*embedder.calls.lock().unwrap(), 2);
    }

    #[tokio::test]
    async fn empty_batch_reports_nothing() {
        let embedder = MockEmbedder::new();
        let store = MockStore::new();

        let report = ingest_document(&embedder, &store, "doc", &[])
            .await
            .unwrap();

        assert_eq!(report, IngestReport::default());
        assert_eq!(*embedder.calls.lock().unwrap(), 0);
    }
}
