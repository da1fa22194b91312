//! Seed command CLI handler.

use crate::batch::{self, BatchConfig, BatchStats};
use crate::config::{parse_entity_list, SeedOverrides, SeedSettings, SeedYamlConfig};
use crate::store::{JsonlStore, MemoryStore};
use std::path::PathBuf;

#[allow(clippy::too_many_arguments)]
pub fn run(
    store: Option<String>,
    database: Option<String>,
    records: Option<usize>,
    mean: Option<f64>,
    std_dev: Option<f64>,
    seed: Option<u64>,
    skip: Option<String>,
    config: Option<PathBuf>,
    progress: bool,
    dry_run: bool,
) -> anyhow::Result<()> {
    let yaml_config = if let Some(ref path) = config {
        Some(SeedYamlConfig::load(path)?)
    } else {
        None
    };

    let skip = skip.as_deref().map(parse_entity_list).transpose()?;

    let overrides = SeedOverrides {
        store,
        database,
        records,
        mean,
        std_dev,
        seed,
        skip,
    };
    let settings = SeedSettings::resolve(overrides, yaml_config.as_ref())?;

    let batch_config = BatchConfig {
        seed: settings.seed,
        count: settings.count,
        skip: settings.skip.clone(),
        progress,
        now: None,
    };

    let stats = if dry_run {
        let mut sink = MemoryStore::new();
        batch::run(&batch_config, &mut sink)?
    } else {
        let mut sink = JsonlStore::from_uri(&settings.store, settings.database.clone())?;
        let stats = batch::run(&batch_config, &mut sink)?;
        if progress {
            eprintln!("Store: {}", sink.database_dir().display());
        }
        stats
    };

    print_stats(&settings, &stats, progress || dry_run);
    Ok(())
}

fn print_stats(settings: &SeedSettings, stats: &BatchStats, detailed: bool) {
    eprintln!(
        "Inserted {} documents into {} collections ({} iterations, seed {})",
        stats.total_documents,
        stats.collections.len(),
        stats.iterations,
        settings.seed
    );

    if detailed {
        eprintln!();
        eprintln!("Seed Statistics:");
        eprintln!("  Database: {}", settings.database);
        eprintln!("  Record count: {}", settings.count);
        for c in &stats.collections {
            eprintln!("  {}: {} documents", c.entity.collection(), c.documents);
        }
        for skipped in &settings.skip {
            eprintln!("  {}: skipped", skipped.collection());
        }
        eprintln!("  Elapsed: {:.2?}", stats.elapsed);
    }
}
