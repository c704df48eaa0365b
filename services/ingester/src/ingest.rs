//! Wiring of the ingestion pipeline to its collaborators.

use anyhow::Result;
use std::sync::Arc;
use tracing::info;

use argo_common::ProfileRecord;
use ingestion::Ingester;
use netcdf_parser::NetcdfReader;
use storage::{MemoryProfileStore, MemorySearchIndex, PgProfileStore, PgSearchIndex};

use crate::config::IngesterConfig;

/// An [`Ingester`] bound to either PostgreSQL or in-memory storage.
pub struct IngestionPipeline {
    ingester: Ingester,
    /// Set for dry runs, where records are kept in memory and printed.
    dry_run_store: Option<MemoryProfileStore>,
}

impl IngestionPipeline {
    /// Connect to the database and run migrations.
    pub async fn connect(config: &IngesterConfig) -> Result<Self> {
        let store = PgProfileStore::connect(&config.database_url, config.db_max_connections).await?;
        store.migrate().await?;

        let index = PgSearchIndex::new(store.pool().clone());
        index.migrate().await?;

        info!(
            max_connections = config.db_max_connections,
            "Connected to profile store"
        );

        let ingester = Ingester::new(
            Arc::new(NetcdfReader),
            Arc::new(store),
            Arc::new(index),
            config.ingestion.clone(),
        );

        Ok(Self {
            ingester,
            dry_run_store: None,
        })
    }

    /// Pipeline that never touches the database.
    pub fn dry_run(config: &IngesterConfig) -> Self {
        let store = MemoryProfileStore::new();
        let ingester = Ingester::new(
            Arc::new(NetcdfReader),
            Arc::new(store.clone()),
            Arc::new(MemorySearchIndex::new()),
            config.ingestion.clone(),
        );

        info!("Dry run: using in-memory storage");

        Self {
            ingester,
            dry_run_store: Some(store),
        }
    }

    pub fn ingester(&self) -> &Ingester {
        &self.ingester
    }

    pub fn is_dry_run(&self) -> bool {
        self.dry_run_store.is_some()
    }

    /// Records stored during a dry run, in ingestion order.
    pub async fn dry_run_records(&self) -> Vec<ProfileRecord> {
        match &self.dry_run_store {
            Some(store) => store
                .records()
                .await
                .into_iter()
                .map(|(_, record)| record)
                .collect(),
            None => Vec::new(),
        }
    }
}
