//! Preview command CLI handler.

use anyhow::Context;
use record_gen::{Entity, Generator};
use std::io::{self, BufWriter, Write};

pub fn run(entity: String, count: usize, seed: Option<u64>, pretty: bool) -> anyhow::Result<()> {
    let entities = if entity.eq_ignore_ascii_case("all") {
        Entity::ALL.to_vec()
    } else {
        vec![entity.parse::<Entity>().map_err(|e| anyhow::anyhow!(e))?]
    };

    let seed = seed.unwrap_or_else(rand::random);
    let mut generator = Generator::new(seed);
    tracing::debug!(seed, count, "previewing records");

    let stdout = io::stdout();
    let mut out = BufWriter::new(stdout.lock());

    for _ in 0..count {
        for &entity in &entities {
            let record = generator.generate_entity(entity);
            let line = if pretty {
                serde_json::to_string_pretty(&record)
            } else {
                serde_json::to_string(&record)
            }
            .with_context(|| format!("failed to encode {}", entity))?;
            writeln!(out, "{}", line)?;
        }
    }

    out.flush()?;
    Ok(())
}
