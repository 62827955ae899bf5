// Copyright 2025 LLM Bench Contributors
// SPDX-License-Identifier: Apache-2.0

//! In-memory job store.
//!
//! The store is the single source of truth for job state, read by API
//! handlers and written by runners. Every update goes through
//! [`JobStore::mutate`], which applies a synchronous closure while holding
//! the entry's write lock, so a reader sees either the whole update or none
//! of it.
//!
//! Records live until they are deleted; nothing is persisted.

use crate::error::{Error, Result};
use crate::job::{JobConfig, JobId, JobRecord};
use dashmap::DashMap;
use tracing::debug;

/// Process-wide mapping from job id to job record.
#[derive(Debug, Default)]
pub struct JobStore {
    jobs: DashMap<JobId, JobRecord>,
}

impl JobStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a new pending record and return a snapshot of it.
    pub fn create(&self, config: JobConfig) -> JobRecord {
        let record = JobRecord::new(config);
        debug!(job_id = %record.id, "job record created");
        self.jobs.insert(record.id, record.clone());
        record
    }

    /// Snapshot of one record.
    pub fn get(&self, id: &JobId) -> Result<JobRecord> {
        self.jobs
            .get(id)
            .map(|entry| entry.value().clone())
            .ok_or(Error::NotFound(*id))
    }

    /// Snapshots of every record, oldest first.
    pub fn list(&self) -> Vec<JobRecord> {
        let mut records: Vec<JobRecord> =
            self.jobs.iter().map(|entry| entry.value().clone()).collect();
        records.sort_by(|a, b| a.created_at.cmp(&b.created_at).then(a.id.cmp(&b.id)));
        records
    }

    /// Remove a record, returning its final snapshot.
    pub fn delete(&self, id: &JobId) -> Result<JobRecord> {
        self.jobs
            .remove(id)
            .map(|(_, record)| {
                debug!(job_id = %id, status = %record.status, "job record deleted");
                record
            })
            .ok_or(Error::NotFound(*id))
    }

    /// Apply `f` to a record atomically.
    ///
    /// Fails with [`Error::NotFound`] if the record is gone; a deleted record
    /// is never recreated. `f` must not block or await.
    pub fn mutate<T>(&self, id: &JobId, f: impl FnOnce(&mut JobRecord) -> T) -> Result<T> {
        match self.jobs.get_mut(id) {
            Some(mut entry) => Ok(f(entry.value_mut())),
            None => Err(Error::NotFound(*id)),
        }
    }

    /// Whether a record exists.
    pub fn contains(&self, id: &JobId) -> bool {
        self.jobs.contains_key(id)
    }

    /// Number of records.
    pub fn len(&self) -> usize {
        self.jobs.len()
    }

    /// Whether the store holds no records.
    pub fn is_empty(&self) -> bool {
        self.jobs.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::job::JobStatus;
    use crate::metrics::MetricRecord;
    use std::sync::Arc;

    #[test]
    fn test_create_and_get() {
        let store = JobStore::new();
        let created = store.create(JobConfig::default());
        let fetched = store.get(&created.id).unwrap();
        assert_eq!(fetched, created);
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_get_unknown_is_not_found() {
        let store = JobStore::new();
        let id = JobId::new();
        assert!(matches!(store.get(&id), Err(Error::NotFound(found)) if found == id));
    }

    #[test]
    fn test_delete_removes_from_list() {
        let store = JobStore::new();
        let a = store.create(JobConfig::default());
        let b = store.create(JobConfig::default());

        store.delete(&a.id).unwrap();
        let ids: Vec<JobId> = store.list().into_iter().map(|r| r.id).collect();
        assert_eq!(ids, vec![b.id]);
        assert!(store.delete(&a.id).unwrap_err().is_not_found());
    }

    #[test]
    fn test_list_is_oldest_first() {
        let store = JobStore::new();
        let first = store.create(JobConfig::default());
        std::thread::sleep(std::time::Duration::from_millis(2));
        let second = store.create(JobConfig::default());

        let ids: Vec<JobId> = store.list().into_iter().map(|r| r.id).collect();
        assert_eq!(ids, vec![first.id, second.id]);
    }

    #[test]
    fn test_mutate_applies_and_returns_value() {
        let store = JobStore::new();
        let job = store.create(JobConfig::default());

        let status = store
            .mutate(&job.id, |record| {
                record.start();
                record.status
            })
            .unwrap();

        assert_eq!(status, JobStatus::Running);
        assert_eq!(store.get(&job.id).unwrap().status, JobStatus::Running);
    }

    #[test]
    fn test_mutate_after_delete_does_not_recreate() {
        let store = JobStore::new();
        let job = store.create(JobConfig::default());
        store.delete(&job.id).unwrap();

        let result = store.mutate(&job.id, |record| record.start());
        assert!(result.unwrap_err().is_not_found());
        assert!(store.is_empty());
    }

    #[test]
    fn test_snapshots_are_detached() {
        let store = JobStore::new();
        let mut snapshot = store.create(JobConfig::default());
        snapshot.start();
        assert_eq!(store.get(&snapshot.id).unwrap().status, JobStatus::Pending);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_readers_never_see_partial_updates() {
        let store = Arc::new(JobStore::new());
        let job = store.create(JobConfig::new(["p"]));
        store.mutate(&job.id, |r| r.start()).unwrap();

        let writer = {
            let store = Arc::clone(&store);
            let id = job.id;
            tokio::spawn(async move {
                for i in 1..=200u64 {
                    store
                        .mutate(&id, |r| {
                            r.push_metric(MetricRecord::from_parts("m", i, i, 0.0, 1.0, 1.0, 2.0));
                            r.advance_progress(i as f64 / 1000.0);
                        })
                        .unwrap();
                    tokio::task::yield_now().await;
                }
            })
        };

        let reader = {
            let store = Arc::clone(&store);
            let id = job.id;
            tokio::spawn(async move {
                for _ in 0..200 {
                    let snap = store.get(&id).unwrap();
                    let expected = snap.measurement_count() as f64 / 1000.0;
                    assert!((snap.progress - expected).abs() < 1e-12);
                    tokio::task::yield_now().await;
                }
            })
        };

        writer.await.unwrap();
        reader.await.unwrap();
        assert_eq!(store.get(&job.id).unwrap().measurement_count(), 200);
    }
}
