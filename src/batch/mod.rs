//! Batch driver for seeding a document store.
//!
//! A batch checks store connectivity once, resolves how many iterations to
//! run, then inserts one freshly generated record per entity per iteration
//! into the entity's collection. Insert failures abort the batch; documents
//! already written stay in the store.

use crate::progress::batch_progress_bar;
use crate::store::DocumentSink;
use anyhow::Context;
use chrono::NaiveDateTime;
use record_gen::{Entity, Generator};
use std::fmt;
use std::time::{Duration, Instant};

pub const DEFAULT_RECORD_MEAN: f64 = 1000.0;
pub const DEFAULT_RECORD_STD_DEV: f64 = 200.0;

/// How many iterations a batch runs
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum RecordCount {
    /// Exactly this many records per entity
    Fixed(usize),
    /// Sampled once per batch from a normal distribution, clamped at zero
    Normal { mean: f64, std_dev: f64 },
}

impl Default for RecordCount {
    fn default() -> Self {
        RecordCount::Normal {
            mean: DEFAULT_RECORD_MEAN,
            std_dev: DEFAULT_RECORD_STD_DEV,
        }
    }
}

impl fmt::Display for RecordCount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RecordCount::Fixed(n) => write!(f, "{}", n),
            RecordCount::Normal { mean, std_dev } => write!(f, "N({}, {})", mean, std_dev),
        }
    }
}

/// Configuration for one seeding batch
#[derive(Debug, Clone)]
pub struct BatchConfig {
    /// Random seed for reproducibility
    pub seed: u64,
    /// Iteration count rule
    pub count: RecordCount,
    /// Entities left out of the batch
    pub skip: Vec<Entity>,
    /// Show progress
    pub progress: bool,
    /// Reference time for generated timestamps (wall clock if unset)
    pub now: Option<NaiveDateTime>,
}

impl Default for BatchConfig {
    fn default() -> Self {
        Self {
            seed: 0,
            count: RecordCount::default(),
            skip: Vec::new(),
            progress: false,
            now: None,
        }
    }
}

impl BatchConfig {
    /// Entities included in the batch, in insertion order
    pub fn entities(&self) -> Vec<Entity> {
        Entity::ALL
            .iter()
            .copied()
            .filter(|e| !self.skip.contains(e))
            .collect()
    }
}

/// Per-collection result
#[derive(Debug, Clone, PartialEq)]
pub struct CollectionStats {
    pub entity: Entity,
    pub documents: usize,
}

/// Statistics from a batch run
#[derive(Debug, Clone, Default)]
pub struct BatchStats {
    /// Iterations completed
    pub iterations: usize,
    /// Documents inserted per collection, in insertion order
    pub collections: Vec<CollectionStats>,
    /// Documents inserted across all collections
    pub total_documents: usize,
    /// Wall time spent generating and inserting
    pub elapsed: Duration,
}

impl BatchStats {
    pub fn documents_in(&self, entity: Entity) -> usize {
        self.collections
            .iter()
            .find(|c| c.entity == entity)
            .map(|c| c.documents)
            .unwrap_or(0)
    }
}

/// Run one batch against `sink`
pub fn run(config: &BatchConfig, sink: &mut dyn DocumentSink) -> anyhow::Result<BatchStats> {
    sink.ping().context("document store connectivity check failed")?;
    tracing::info!("document store connected");

    let mut generator = Generator::new(config.seed);
    if let Some(now) = config.now {
        generator = generator.with_now(now);
    }

    let iterations = match config.count {
        RecordCount::Fixed(n) => n,
        RecordCount::Normal { mean, std_dev } => generator.record_count(mean, std_dev),
    };

    let entities = config.entities();
    for skipped in &config.skip {
        tracing::warn!(collection = skipped.collection(), "collection skipped");
    }
    tracing::info!(
        seed = config.seed,
        iterations,
        collections = entities.len(),
        "starting batch"
    );

    let mut collections: Vec<CollectionStats> = entities
        .iter()
        .map(|&entity| CollectionStats {
            entity,
            documents: 0,
        })
        .collect();

    let started = Instant::now();
    let pb = batch_progress_bar(iterations as u64, config.progress);

    for iteration in 0..iterations {
        for (slot, &entity) in collections.iter_mut().zip(&entities) {
            let record = generator.generate_entity(entity);
            sink.insert_one(entity.collection(), &record)
                .with_context(|| {
                    format!(
                        "failed to insert into '{}' at iteration {}",
                        entity.collection(),
                        iteration + 1
                    )
                })?;
            slot.documents += 1;
        }
        pb.inc(1);
    }

    sink.flush().context("failed to flush document store")?;
    pb.finish_and_clear();

    let total_documents = collections.iter().map(|c| c.documents).sum();
    let stats = BatchStats {
        iterations,
        collections,
        total_documents,
        elapsed: started.elapsed(),
    };

    for c in &stats.collections {
        tracing::debug!(
            collection = c.entity.collection(),
            documents = c.documents,
            "collection seeded"
        );
    }
    tracing::info!(
        documents = stats.total_documents,
        elapsed_ms = stats.elapsed.as_millis() as u64,
        "batch complete"
    );

    Ok(stats)
}
