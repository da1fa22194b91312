//! End-to-end tests for seeding a directory-backed document store.

use chrono::{NaiveDate, NaiveDateTime};
use docseed::batch::{self, BatchConfig, RecordCount};
use docseed::config::{SeedOverrides, SeedSettings, SeedYamlConfig};
use docseed::record_gen::{Entity, DATETIME_FORMAT};
use docseed::store::JsonlStore;
use serde_json::Value;
use std::collections::HashSet;
use std::fs;
use tempfile::TempDir;

fn fixed_now() -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2025, 11, 20)
        .unwrap()
        .and_hms_opt(8, 15, 0)
        .unwrap()
}

fn read_collection(store: &JsonlStore, collection: &str) -> Vec<Value> {
    let content = fs::read_to_string(store.collection_path(collection)).unwrap_or_default();
    content
        .lines()
        .map(|line| serde_json::from_str(line).unwrap())
        .collect()
}

fn timestamp(doc: &Value, field: &str) -> NaiveDateTime {
    NaiveDateTime::parse_from_str(doc[field].as_str().unwrap(), DATETIME_FORMAT).unwrap()
}

fn seed_store(temp_dir: &TempDir, records: usize, seed: u64) -> JsonlStore {
    let mut store = JsonlStore::new(temp_dir.path().to_path_buf(), "etl_database");
    let config = BatchConfig {
        seed,
        count: RecordCount::Fixed(records),
        now: Some(fixed_now()),
        ..Default::default()
    };
    let stats = batch::run(&config, &mut store).unwrap();
    assert_eq!(stats.total_documents, records * Entity::ALL.len());
    store
}

#[test]
fn test_seed_writes_every_collection() {
    let temp_dir = TempDir::new().unwrap();
    let store = seed_store(&temp_dir, 40, 42);

    for entity in Entity::ALL {
        let docs = read_collection(&store, entity.collection());
        assert_eq!(docs.len(), 40, "{}", entity.collection());
    }
}

#[test]
fn test_seeded_documents_hold_invariants() {
    let temp_dir = TempDir::new().unwrap();
    let store = seed_store(&temp_dir, 100, 7);

    for session in read_collection(&store, "user_sessions") {
        assert!(timestamp(&session, "end_time") > timestamp(&session, "start_time"));
        let pages = session["pages_visited"].as_array().unwrap().len();
        assert!((1..=10).contains(&pages));
    }

    for ticket in read_collection(&store, "support_tickets") {
        assert!(timestamp(&ticket, "updated_at") >= timestamp(&ticket, "created_at"));
    }

    for history in read_collection(&store, "product_price_history") {
        let mut prices: Vec<f64> = history["price_changes"]
            .as_array()
            .unwrap()
            .iter()
            .map(|p| p.as_f64().unwrap())
            .collect();
        prices.push(history["current_price"].as_f64().unwrap());
        for price in prices {
            assert!((10.0..=1000.0).contains(&price));
            assert_eq!(price, (price * 100.0).round() / 100.0);
        }
    }

    for entry in read_collection(&store, "moderation_queue") {
        let rating = entry["rating"].as_i64().unwrap();
        assert!((1..=10).contains(&rating));
        let status = entry["moderation_status"].as_str().unwrap();
        assert!(["under_consideration", "approved", "rejected"].contains(&status));
    }

    for query in read_collection(&store, "search_queries") {
        let count = query["result_count"].as_i64().unwrap();
        assert!((1..=50).contains(&count));
        let filters = query["filters"].as_array().unwrap().len();
        assert!((1..=10).contains(&filters));
    }

    for rec in read_collection(&store, "user_recommendations") {
        let products = rec["recommended_products"].as_array().unwrap().len();
        assert!((3..=10).contains(&products));
    }
}

#[test]
fn test_identity_tokens_unique_in_store() {
    let temp_dir = TempDir::new().unwrap();
    let store = seed_store(&temp_dir, 200, 11);

    let ids: HashSet<String> = read_collection(&store, "event_logs")
        .iter()
        .map(|doc| doc["event_id"].as_str().unwrap().to_string())
        .collect();
    assert_eq!(ids.len(), 200);
}

#[test]
fn test_rerun_appends_fresh_batch() {
    let temp_dir = TempDir::new().unwrap();
    let first = seed_store(&temp_dir, 5, 1);
    drop(first);
    let store = seed_store(&temp_dir, 5, 2);

    let sessions = read_collection(&store, "user_sessions");
    assert_eq!(sessions.len(), 10);

    let ids: HashSet<&str> = sessions
        .iter()
        .map(|doc| doc["session_id"].as_str().unwrap())
        .collect();
    assert_eq!(ids.len(), 10);
}

#[test]
fn test_same_seed_same_documents() {
    let dir_a = TempDir::new().unwrap();
    let dir_b = TempDir::new().unwrap();
    let a = seed_store(&dir_a, 10, 99);
    let b = seed_store(&dir_b, 10, 99);

    for entity in Entity::ALL {
        assert_eq!(
            read_collection(&a, entity.collection()),
            read_collection(&b, entity.collection())
        );
    }
}

#[test]
fn test_unreachable_store_aborts_batch() {
    let temp_dir = TempDir::new().unwrap();
    let mut store = JsonlStore::new(temp_dir.path().join("offline"), "etl_database");
    let config = BatchConfig {
        count: RecordCount::Fixed(10),
        ..Default::default()
    };

    let err = batch::run(&config, &mut store).unwrap_err();

    assert!(format!("{:#}", err).contains("unreachable"));
    assert!(!temp_dir.path().join("offline").exists());
}

#[test]
fn test_skip_leaves_collection_absent() {
    let temp_dir = TempDir::new().unwrap();
    let mut store = JsonlStore::new(temp_dir.path().to_path_buf(), "etl_database");
    let config = BatchConfig {
        count: RecordCount::Fixed(4),
        skip: vec![Entity::UserRecommendation],
        ..Default::default()
    };

    let stats = batch::run(&config, &mut store).unwrap();

    assert_eq!(stats.documents_in(Entity::UserRecommendation), 0);
    assert!(!store.collection_path("user_recommendations").exists());
    assert_eq!(read_collection(&store, "user_sessions").len(), 4);
}

#[test]
fn test_yaml_config_drives_batch() {
    let temp_dir = TempDir::new().unwrap();
    let config_path = temp_dir.path().join("seed.yaml");
    fs::write(
        &config_path,
        format!(
            "store:\n  uri: file://{}\n  database: staging\nrecords:\n  count: 6\nseed: 3\ncollections:\n  search_queries:\n    skip: true\n",
            temp_dir.path().display()
        ),
    )
    .unwrap();

    let yaml = SeedYamlConfig::load(&config_path).unwrap();
    let settings = SeedSettings::resolve(SeedOverrides::default(), Some(&yaml)).unwrap();
    assert_eq!(settings.count, RecordCount::Fixed(6));
    assert_eq!(settings.skip, vec![Entity::SearchQuery]);

    let mut store = JsonlStore::from_uri(&settings.store, settings.database.clone()).unwrap();
    let config = BatchConfig {
        seed: settings.seed,
        count: settings.count,
        skip: settings.skip.clone(),
        ..Default::default()
    };
    batch::run(&config, &mut store).unwrap();

    assert!(temp_dir.path().join("staging").is_dir());
    assert_eq!(read_collection(&store, "event_logs").len(), 6);
    assert!(!store.collection_path("search_queries").exists());
}

#[test]
fn test_missing_config_file_is_an_error() {
    let temp_dir = TempDir::new().unwrap();
    let err = SeedYamlConfig::load(&temp_dir.path().join("absent.yaml")).unwrap_err();
    assert!(err.to_string().contains("failed to read config file"));
}
