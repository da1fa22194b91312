//! Describe command CLI handler.

use record_gen::{Catalog, Entity};

pub fn run(entity: Option<String>) -> anyhow::Result<()> {
    let filter = entity
        .map(|e| e.parse::<Entity>().map_err(|e| anyhow::anyhow!(e)))
        .transpose()?;

    let catalog = Catalog::standard();
    for schema in &catalog.schemas {
        if filter.is_some_and(|f| f != schema.entity) {
            continue;
        }

        println!("{} -> {}", schema.entity, schema.collection());
        let width = schema.fields.iter().map(|f| f.name.len()).max().unwrap_or(0);
        for field in &schema.fields {
            println!("  {:width$}  {}", field.name, field.rule, width = width);
        }
        println!();
    }

    Ok(())
}
