//! YAML configuration for the seed command.
//!
//! Settings resolve in order: command-line flag, environment variable, YAML
//! file, built-in default.

use crate::batch::{RecordCount, DEFAULT_RECORD_MEAN, DEFAULT_RECORD_STD_DEV};
use anyhow::Context;
use record_gen::Entity;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::path::Path;

pub const DEFAULT_STORE: &str = "./data";
pub const DEFAULT_DATABASE: &str = "etl_database";

/// Document store location
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    /// Directory path or file:// URI of the store root
    pub uri: Option<String>,
    /// Database (subdirectory) name
    pub database: Option<String>,
}

/// Batch size settings
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RecordsConfig {
    /// Fixed number of records per collection
    pub count: Option<usize>,
    /// Mean of the normally distributed record count
    pub mean: Option<f64>,
    /// Standard deviation of the normally distributed record count
    pub std_dev: Option<f64>,
}

/// Per-collection settings
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct CollectionConfig {
    /// Leave this collection out of the batch
    pub skip: bool,
}

/// Complete YAML configuration for the seed command
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SeedYamlConfig {
    pub store: StoreConfig,
    pub records: RecordsConfig,
    /// Random seed for reproducibility
    pub seed: Option<u64>,
    /// Per-collection settings, keyed by entity or collection name
    #[serde(default)]
    pub collections: HashMap<String, CollectionConfig>,
}

impl SeedYamlConfig {
    /// Load configuration from a YAML file
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("failed to read config file {}", path.display()))?;
        Self::parse(&content)
            .with_context(|| format!("invalid config file {}", path.display()))
    }

    pub fn parse(content: &str) -> anyhow::Result<Self> {
        let config: SeedYamlConfig = serde_yaml_ng::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Reject unknown collection keys and keys naming the same entity twice
    pub fn validate(&self) -> anyhow::Result<()> {
        let mut seen: HashMap<Entity, &str> = HashMap::new();
        for name in self.collections.keys() {
            let entity = name.parse::<Entity>().map_err(|e| anyhow::anyhow!(e))?;
            if let Some(previous) = seen.insert(entity, name) {
                anyhow::bail!(
                    "collections '{}' and '{}' both configure {}",
                    previous,
                    name,
                    entity.collection()
                );
            }
        }
        Ok(())
    }

    /// Get configuration for an entity, by entity or collection name
    pub fn get_collection_config(&self, entity: Entity) -> Option<&CollectionConfig> {
        self.collections
            .iter()
            .find(|(key, _)| key.parse::<Entity>().ok() == Some(entity))
            .map(|(_, v)| v)
    }

    pub fn should_skip(&self, entity: Entity) -> bool {
        self.get_collection_config(entity)
            .map(|c| c.skip)
            .unwrap_or(false)
    }

    /// Entities marked `skip: true`, in insertion order
    pub fn skipped_entities(&self) -> Vec<Entity> {
        Entity::ALL
            .iter()
            .copied()
            .filter(|&e| self.should_skip(e))
            .collect()
    }
}

/// Values supplied on the command line or through the environment
#[derive(Debug, Clone, Default)]
pub struct SeedOverrides {
    pub store: Option<String>,
    pub database: Option<String>,
    pub records: Option<usize>,
    pub mean: Option<f64>,
    pub std_dev: Option<f64>,
    pub seed: Option<u64>,
    /// Replaces the YAML skip list when present
    pub skip: Option<Vec<Entity>>,
}

/// Fully resolved seed settings
#[derive(Debug, Clone, PartialEq)]
pub struct SeedSettings {
    pub store: String,
    pub database: String,
    pub count: RecordCount,
    pub seed: u64,
    pub skip: Vec<Entity>,
}

impl SeedSettings {
    pub fn resolve(
        overrides: SeedOverrides,
        yaml: Option<&SeedYamlConfig>,
    ) -> anyhow::Result<Self> {
        let defaults = SeedYamlConfig::default();
        let yaml = yaml.unwrap_or(&defaults);

        let store = overrides
            .store
            .or_else(|| yaml.store.uri.clone())
            .unwrap_or_else(|| DEFAULT_STORE.to_string());
        let database = overrides
            .database
            .or_else(|| yaml.store.database.clone())
            .unwrap_or_else(|| DEFAULT_DATABASE.to_string());

        // Distribution flags on the command line outrank a fixed count from YAML
        let cli_distribution = overrides.mean.is_some() || overrides.std_dev.is_some();
        let fixed = match overrides.records {
            Some(n) => Some(n),
            None if cli_distribution => None,
            None => yaml.records.count,
        };
        let count = match fixed {
            Some(n) => RecordCount::Fixed(n),
            None => {
                let mean = overrides
                    .mean
                    .or(yaml.records.mean)
                    .unwrap_or(DEFAULT_RECORD_MEAN);
                let std_dev = overrides
                    .std_dev
                    .or(yaml.records.std_dev)
                    .unwrap_or(DEFAULT_RECORD_STD_DEV);
                if !mean.is_finite() {
                    anyhow::bail!("record mean must be a finite number, got {}", mean);
                }
                if !std_dev.is_finite() || std_dev < 0.0 {
                    anyhow::bail!(
                        "record standard deviation must be finite and non-negative, got {}",
                        std_dev
                    );
                }
                RecordCount::Normal { mean, std_dev }
            }
        };

        let seed = overrides
            .seed
            .or(yaml.seed)
            .unwrap_or_else(rand::random);

        let skip = overrides
            .skip
            .unwrap_or_else(|| yaml.skipped_entities());

        Ok(Self {
            store,
            database,
            count,
            seed,
            skip,
        })
    }
}

/// Parse a comma-separated entity list
pub fn parse_entity_list(list: &str) -> anyhow::Result<Vec<Entity>> {
    let mut entities = Vec::new();
    for name in list.split(',').map(str::trim).filter(|s| !s.is_empty()) {
        let entity = name.parse::<Entity>().map_err(|e| anyhow::anyhow!(e))?;
        if !entities.contains(&entity) {
            entities.push(entity);
        }
    }
    Ok(entities)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_yaml_config() {
        let yaml = r#"
store:
  uri: file:///var/lib/docseed
  database: staging

records:
  mean: 500
  std_dev: 50

seed: 42

collections:
  event_logs:
    skip: true
  search_query:
    skip: false
"#;

        let config = SeedYamlConfig::parse(yaml).unwrap();

        assert_eq!(config.store.uri.as_deref(), Some("file:///var/lib/docseed"));
        assert_eq!(config.store.database.as_deref(), Some("staging"));
        assert_eq!(config.records.mean, Some(500.0));
        assert_eq!(config.seed, Some(42));
        assert!(config.should_skip(Entity::EventLog));
        assert!(!config.should_skip(Entity::SearchQuery));
        assert!(!config.should_skip(Entity::UserSession));
        assert_eq!(config.skipped_entities(), vec![Entity::EventLog]);
    }

    #[test]
    fn test_unknown_collection_rejected() {
        let yaml = r#"
collections:
  orders:
    skip: true
"#;
        let err = SeedYamlConfig::parse(yaml).unwrap_err();
        assert!(err.to_string().contains("Unknown entity"));
    }

    #[test]
    fn test_defaults_without_config() {
        let settings = SeedSettings::resolve(
            SeedOverrides {
                seed: Some(1),
                ..Default::default()
            },
            None,
        )
        .unwrap();

        assert_eq!(settings.store, DEFAULT_STORE);
        assert_eq!(settings.database, DEFAULT_DATABASE);
        assert_eq!(settings.count, RecordCount::default());
        assert_eq!(settings.seed, 1);
        assert!(settings.skip.is_empty());
    }

    #[test]
    fn test_overrides_take_precedence() {
        let yaml = SeedYamlConfig::parse(
            r#"
store:
  uri: /from/yaml
  database: yaml_db
records:
  count: 10
seed: 5
collections:
  moderation_queue:
    skip: true
"#,
        )
        .unwrap();

        let settings = SeedSettings::resolve(
            SeedOverrides {
                store: Some("/from/cli".to_string()),
                seed: Some(9),
                skip: Some(vec![Entity::EventLog]),
                ..Default::default()
            },
            Some(&yaml),
        )
        .unwrap();

        assert_eq!(settings.store, "/from/cli");
        assert_eq!(settings.database, "yaml_db");
        assert_eq!(settings.count, RecordCount::Fixed(10));
        assert_eq!(settings.seed, 9);
        assert_eq!(settings.skip, vec![Entity::EventLog]);
    }

    #[test]
    fn test_skip_list_falls_back_to_yaml() {
        let yaml = SeedYamlConfig::parse(
            "collections:\n  moderation_queue:\n    skip: true\n  events:\n    skip: true\n",
        )
        .unwrap();

        let settings = SeedSettings::resolve(SeedOverrides::default(), Some(&yaml)).unwrap();
        assert_eq!(
            settings.skip,
            vec![Entity::EventLog, Entity::ModerationQueue]
        );

        // An empty list on the command line re-includes everything
        let settings = SeedSettings::resolve(
            SeedOverrides {
                skip: Some(Vec::new()),
                ..Default::default()
            },
            Some(&yaml),
        )
        .unwrap();
        assert!(settings.skip.is_empty());
    }

    #[test]
    fn test_aliased_collection_keys_rejected() {
        let yaml = r#"
collections:
  event_logs:
    skip: true
  events:
    skip: false
"#;
        let err = SeedYamlConfig::parse(yaml).unwrap_err();
        assert!(err.to_string().contains("both configure event_logs"));

        let yaml = "collections:\n  sessions:\n    skip: true\n  search:\n    skip: false\n";
        assert!(SeedYamlConfig::parse(yaml).is_ok());
    }

    #[test]
    fn test_cli_distribution_beats_yaml_count() {
        let yaml = SeedYamlConfig::parse("records:\n  count: 10\n").unwrap();
        let settings = SeedSettings::resolve(
            SeedOverrides {
                mean: Some(50.0),
                ..Default::default()
            },
            Some(&yaml),
        )
        .unwrap();

        assert_eq!(
            settings.count,
            RecordCount::Normal {
                mean: 50.0,
                std_dev: DEFAULT_RECORD_STD_DEV
            }
        );
    }

    #[test]
    fn test_negative_std_dev_rejected() {
        let result = SeedSettings::resolve(
            SeedOverrides {
                std_dev: Some(-3.0),
                ..Default::default()
            },
            None,
        );
        assert!(result.is_err());
    }

    #[test]
    fn test_parse_entity_list() {
        let entities = parse_entity_list("sessions, event_logs,sessions,").unwrap();
        assert_eq!(entities, vec![Entity::UserSession, Entity::EventLog]);
        assert!(parse_entity_list("sessions,orders").is_err());
    }
}
