//! Round trips against a live PostgreSQL instance.
//!
//! Skipped unless `TEST_DATABASE_URL` points at a disposable database.

use chrono::{TimeZone, Utc};
use storage::{PgProfileStore, PgSearchIndex, ProfileStore, SearchDocument, SearchIndex};
use uuid::Uuid;

use argo_common::{OceanRegion, ProfileRecord, QcFlag};

macro_rules! require_database {
    () => {{
        match std::env::var("TEST_DATABASE_URL") {
            Ok(url) => url,
            Err(_) => {
                eprintln!("SKIPPED: TEST_DATABASE_URL not set");
                return;
            }
        }
    }};
}

fn record(platform: &str, cycle: i32, day: u32) -> ProfileRecord {
    ProfileRecord {
        platform_number: platform.to_string(),
        cycle_number: cycle,
        latitude: 2.5,
        longitude: 87.3,
        measurement_date: Utc.with_ymd_and_hms(2023, 6, day, 12, 0, 0).unwrap(),
        pressure_levels: vec![Some(2.5), Some(10.0), None],
        temperature: vec![Some(28.0), Some(27.9), None],
        salinity: vec![Some(34.2), None, Some(34.8)],
        temp_qc: vec![Some(QcFlag::Good), Some(QcFlag::Good), None],
        psal_qc: vec![],
        absolute_salinity: vec![Some(34.36)],
        conservative_temperature: vec![Some(27.9)],
        potential_density: vec![Some(21.5)],
        mixed_layer_depth: Some(10.0),
        max_depth: None,
        ocean_region: OceanRegion::Indian,
        data_source: "ARGO".to_string(),
        metadata: serde_json::json!({ "source_file": "R1_001.nc" }),
    }
}

#[tokio::test]
async fn test_insert_group_and_delete() {
    let url = require_database!();
    let store = PgProfileStore::connect(&url, 2).await.unwrap();
    store.migrate().await.unwrap();
    store.migrate().await.unwrap();

    let platform = format!("T{}", &Uuid::new_v4().simple().to_string()[..8]);
    let older = store.insert_profile(&record(&platform, 1, 1)).await.unwrap();
    let newer = store.insert_profile(&record(&platform, 1, 2)).await.unwrap();

    let groups = store.duplicate_groups().await.unwrap();
    assert!(groups
        .iter()
        .any(|g| g.platform_number == platform && g.count == 2));

    let ordered = store.profiles_for(&platform, 1).await.unwrap();
    assert_eq!(ordered[0].id, newer);
    assert_eq!(ordered[1].id, older);

    // An unknown id rolls back the whole batch.
    assert!(store
        .delete_profiles(&[older, Uuid::new_v4()])
        .await
        .is_err());
    assert_eq!(store.profiles_for(&platform, 1).await.unwrap().len(), 2);

    assert_eq!(store.delete_profiles(&[older, newer]).await.unwrap(), 2);
    assert!(store.profiles_for(&platform, 1).await.unwrap().is_empty());
}

#[tokio::test]
async fn test_fulltext_search() {
    let url = require_database!();
    let store = PgProfileStore::connect(&url, 2).await.unwrap();
    let index = PgSearchIndex::new(store.pool().clone());
    index.migrate().await.unwrap();

    let id = Uuid::new_v4();
    index
        .add_document(SearchDocument {
            id,
            text: "ARGO Float 2900123 in the Indian Ocean with warm water".to_string(),
            metadata: serde_json::json!({}),
        })
        .await
        .unwrap();

    let hits = index.search("warm indian", 50).await.unwrap();
    assert!(hits.iter().any(|h| h.id == id));

    index.remove_document(id).await.unwrap();
}
