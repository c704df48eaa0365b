//! In-memory store and index.
//!
//! Used by tests and by dry runs of the ingester, where nothing should reach
//! a database.

use std::collections::{BTreeMap, HashSet};
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;
use uuid::Uuid;

use argo_common::ProfileRecord;

use crate::catalog::{DuplicateGroup, ProfileStore, StoredProfile};
use crate::error::{PersistenceError, PersistenceResult};
use crate::search::{SearchDocument, SearchHit, SearchIndex};

/// Profile store holding records in insertion order.
#[derive(Clone, Default)]
pub struct MemoryProfileStore {
    records: Arc<RwLock<Vec<(Uuid, ProfileRecord)>>>,
}

impl MemoryProfileStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of all stored records.
    pub async fn records(&self) -> Vec<(Uuid, ProfileRecord)> {
        self.records.read().await.clone()
    }

    pub async fn get(&self, id: Uuid) -> Option<ProfileRecord> {
        self.records
            .read()
            .await
            .iter()
            .find(|(stored, _)| *stored == id)
            .map(|(_, record)| record.clone())
    }
}

#[async_trait]
impl ProfileStore for MemoryProfileStore {
    async fn insert_profile(&self, record: &ProfileRecord) -> PersistenceResult<Uuid> {
        let id = Uuid::new_v4();
        self.records.write().await.push((id, record.clone()));
        Ok(id)
    }

    async fn count_profiles(&self) -> PersistenceResult<u64> {
        Ok(self.records.read().await.len() as u64)
    }

    async fn regional_distribution(&self) -> PersistenceResult<BTreeMap<String, u64>> {
        let mut distribution = BTreeMap::new();
        for (_, record) in self.records.read().await.iter() {
            *distribution
                .entry(record.ocean_region.as_str().to_string())
                .or_insert(0) += 1;
        }
        Ok(distribution)
    }

    async fn duplicate_groups(&self) -> PersistenceResult<Vec<DuplicateGroup>> {
        let mut counts: BTreeMap<(String, i32), u64> = BTreeMap::new();
        for (_, record) in self.records.read().await.iter() {
            *counts
                .entry((record.platform_number.clone(), record.cycle_number))
                .or_insert(0) += 1;
        }

        Ok(counts
            .into_iter()
            .filter(|(_, count)| *count > 1)
            .map(|((platform_number, cycle_number), count)| DuplicateGroup {
                platform_number,
                cycle_number,
                count,
            })
            .collect())
    }

    async fn profiles_for(
        &self,
        platform_number: &str,
        cycle_number: i32,
    ) -> PersistenceResult<Vec<StoredProfile>> {
        let mut matches: Vec<StoredProfile> = self
            .records
            .read()
            .await
            .iter()
            .filter(|(_, r)| r.platform_number == platform_number && r.cycle_number == cycle_number)
            .map(|(id, r)| StoredProfile {
                id: *id,
                platform_number: r.platform_number.clone(),
                cycle_number: r.cycle_number,
                measurement_date: r.measurement_date,
            })
            .collect();

        // Stable sort: equal dates keep insertion order.
        matches.sort_by(|a, b| b.measurement_date.cmp(&a.measurement_date));
        Ok(matches)
    }

    async fn delete_profiles(&self, ids: &[Uuid]) -> PersistenceResult<u64> {
        let mut records = self.records.write().await;
        if let Some(&missing) = ids
            .iter()
            .find(|id| !records.iter().any(|(stored, _)| stored == *id))
        {
            return Err(PersistenceError::NotFound(missing));
        }

        let before = records.len();
        records.retain(|(stored, _)| !ids.contains(stored));
        Ok((before - records.len()) as u64)
    }
}

/// Search index ranking documents by the share of query terms they contain.
#[derive(Clone, Default)]
pub struct MemorySearchIndex {
    documents: Arc<RwLock<Vec<SearchDocument>>>,
}

impl MemorySearchIndex {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn documents(&self) -> Vec<SearchDocument> {
        self.documents.read().await.clone()
    }
}

fn terms(text: &str) -> impl Iterator<Item = String> + '_ {
    text.split(|c: char| !c.is_alphanumeric())
        .filter(|t| !t.is_empty())
        .map(str::to_lowercase)
}

#[async_trait]
impl SearchIndex for MemorySearchIndex {
    async fn add_document(&self, document: SearchDocument) -> PersistenceResult<()> {
        let mut documents = self.documents.write().await;
        match documents.iter_mut().find(|d| d.id == document.id) {
            Some(existing) => *existing = document,
            None => documents.push(document),
        }
        Ok(())
    }

    async fn remove_document(&self, id: Uuid) -> PersistenceResult<()> {
        self.documents.write().await.retain(|d| d.id != id);
        Ok(())
    }

    async fn count(&self) -> PersistenceResult<u64> {
        Ok(self.documents.read().await.len() as u64)
    }

    async fn search(&self, query: &str, limit: usize) -> PersistenceResult<Vec<SearchHit>> {
        let query_terms: HashSet<String> = terms(query).collect();
        if query_terms.is_empty() {
            return Ok(Vec::new());
        }

        let mut hits: Vec<SearchHit> = self
            .documents
            .read()
            .await
            .iter()
            .filter_map(|doc| {
                let doc_terms: HashSet<String> = terms(&doc.text).collect();
                let matched = query_terms.intersection(&doc_terms).count();
                (matched > 0).then(|| SearchHit {
                    id: doc.id,
                    text: doc.text.clone(),
                    metadata: doc.metadata.clone(),
                    score: matched as f64 / query_terms.len() as f64,
                })
            })
            .collect();

        hits.sort_by(|a, b| b.score.total_cmp(&a.score));
        hits.truncate(limit);
        Ok(hits)
    }

    fn backend_name(&self) -> &'static str {
        "memory-terms"
    }
}
