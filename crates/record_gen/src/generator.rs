//! Record generator that evaluates entity schemas.
//!
//! Every entity goes through the same routine: fields are produced in
//! schema order, list lengths are sampled before their items, and anchored
//! timestamps are derived from values already generated for the record.

use crate::fake::FakeData;
use crate::schema::{Catalog, Count, Entity, EntitySchema, Rule};
use crate::vocab::{Device, DEVICES};
use chrono::NaiveDateTime;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use serde::ser::{SerializeMap, SerializeSeq};
use serde::{Serialize, Serializer};

/// Timestamp layout used in stored documents
pub const DATETIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Generated field value
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    Int(i64),
    Float(f64),
    String(String),
    DateTime(NaiveDateTime),
    Device(Device),
    List(Vec<FieldValue>),
}

impl FieldValue {
    pub fn as_int(&self) -> Option<i64> {
        match self {
            FieldValue::Int(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_float(&self) -> Option<f64> {
        match self {
            FieldValue::Float(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            FieldValue::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_datetime(&self) -> Option<NaiveDateTime> {
        match self {
            FieldValue::DateTime(dt) => Some(*dt),
            _ => None,
        }
    }

    pub fn as_device(&self) -> Option<&Device> {
        match self {
            FieldValue::Device(d) => Some(d),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&[FieldValue]> {
        match self {
            FieldValue::List(items) => Some(items),
            _ => None,
        }
    }
}

impl Serialize for FieldValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            FieldValue::Int(n) => serializer.serialize_i64(*n),
            FieldValue::Float(n) => serializer.serialize_f64(*n),
            FieldValue::String(s) => serializer.serialize_str(s),
            FieldValue::DateTime(dt) => {
                serializer.collect_str(&dt.format(DATETIME_FORMAT))
            }
            FieldValue::Device(device) => {
                let mut map = serializer.serialize_map(Some(2))?;
                map.serialize_entry("type", device.kind)?;
                map.serialize_entry("os", device.os)?;
                map.end()
            }
            FieldValue::List(items) => {
                let mut seq = serializer.serialize_seq(Some(items.len()))?;
                for item in items {
                    seq.serialize_element(item)?;
                }
                seq.end()
            }
        }
    }
}

/// One generated document
#[derive(Debug, Clone, PartialEq)]
pub struct Record {
    pub entity: Entity,
    pub fields: Vec<(&'static str, FieldValue)>,
}

impl Record {
    pub fn get(&self, name: &str) -> Option<&FieldValue> {
        self.fields
            .iter()
            .find(|(field, _)| *field == name)
            .map(|(_, value)| value)
    }

    pub fn collection(&self) -> &'static str {
        self.entity.collection()
    }
}

impl Serialize for Record {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.fields.len()))?;
        for (name, value) in &self.fields {
            map.serialize_entry(name, value)?;
        }
        map.end()
    }
}

/// Main record generator
pub struct Generator {
    fake: FakeData<ChaCha8Rng>,
    catalog: Catalog,
}

impl Generator {
    pub fn new(seed: u64) -> Self {
        Self {
            fake: FakeData::new(ChaCha8Rng::seed_from_u64(seed)),
            catalog: Catalog::standard(),
        }
    }

    /// Pin the reference time used for "this year" and "until now" timestamps
    pub fn with_now(mut self, now: NaiveDateTime) -> Self {
        self.fake.set_now(now);
        self
    }

    pub fn now(&self) -> NaiveDateTime {
        self.fake.now()
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    /// Generate one record from an arbitrary schema.
    ///
    /// # Panics
    ///
    /// Panics on schemas rejected by [`EntitySchema::validate`], such as an
    /// empty integer range. Use [`Generator::try_generate`] for schemas built
    /// at runtime.
    pub fn generate(&mut self, schema: &EntitySchema) -> Record {
        debug_assert!(schema.validate().is_ok(), "invalid schema for {}", schema.entity);
        build_record(&mut self.fake, schema)
    }

    /// Validate `schema`, then generate one record from it
    pub fn try_generate(&mut self, schema: &EntitySchema) -> Result<Record, String> {
        schema.validate()?;
        Ok(build_record(&mut self.fake, schema))
    }

    /// Generate one record for an entity
    pub fn generate_entity(&mut self, entity: Entity) -> Record {
        build_record(&mut self.fake, self.catalog.get(entity))
    }

    /// Generate one record per entity, in [`Entity::ALL`] order
    pub fn generate_all(&mut self) -> Vec<Record> {
        Entity::ALL
            .iter()
            .map(|&entity| self.generate_entity(entity))
            .collect()
    }

    pub fn user_session(&mut self) -> Record {
        self.generate_entity(Entity::UserSession)
    }

    pub fn product_price_history(&mut self) -> Record {
        self.generate_entity(Entity::ProductPriceHistory)
    }

    pub fn event_log(&mut self) -> Record {
        self.generate_entity(Entity::EventLog)
    }

    pub fn support_ticket(&mut self) -> Record {
        self.generate_entity(Entity::SupportTicket)
    }

    pub fn user_recommendation(&mut self) -> Record {
        self.generate_entity(Entity::UserRecommendation)
    }

    pub fn moderation_queue_entry(&mut self) -> Record {
        self.generate_entity(Entity::ModerationQueue)
    }

    pub fn search_query(&mut self) -> Record {
        self.generate_entity(Entity::SearchQuery)
    }

    /// Sample a batch size from a normal distribution (clamped at zero)
    pub fn record_count(&mut self, mean: f64, std_dev: f64) -> usize {
        self.fake.normal_count(mean, std_dev)
    }
}

fn build_record<R: Rng>(fake: &mut FakeData<R>, schema: &EntitySchema) -> Record {
    let mut fields: Vec<(&'static str, FieldValue)> = Vec::with_capacity(schema.fields.len());
    for field in &schema.fields {
        let value = eval_rule(fake, &field.rule, &fields);
        fields.push((field.name, value));
    }
    Record {
        entity: schema.entity,
        fields,
    }
}

fn eval_rule<R: Rng>(
    fake: &mut FakeData<R>,
    rule: &Rule,
    done: &[(&'static str, FieldValue)],
) -> FieldValue {
    match rule {
        Rule::Uuid => FieldValue::String(fake.uuid()),
        Rule::IntRange(min, max) => FieldValue::Int(fake.int_range(*min, *max)),
        Rule::Decimal { min, max, places } => FieldValue::Float(fake.decimal(*min, *max, *places)),
        Rule::Choice(values) => FieldValue::String(fake.pick(values).to_string()),
        Rule::Device => FieldValue::Device(*fake.pick(DEVICES)),
        Rule::DateTimeThisYear => FieldValue::DateTime(fake.datetime_this_year()),
        Rule::DateTimeAfter(anchor) => {
            let base = anchor_value(fake, anchor, done);
            FieldValue::DateTime(fake.datetime_after(base))
        }
        Rule::Offset {
            anchor,
            minutes,
            seconds,
        } => {
            let base = anchor_value(fake, anchor, done);
            FieldValue::DateTime(fake.offset(base, *minutes, *seconds))
        }
        Rule::Text(max) => FieldValue::String(fake.text(*max)),
        Rule::Word => FieldValue::String(fake.word()),
        Rule::List { count, item } => {
            let len = match count {
                Count::Uniform(min, max) => fake.int_range(*min as i64, *max as i64) as usize,
                Count::Normal { mean, std_dev } => fake.normal_count(*mean, *std_dev),
            };
            FieldValue::List((0..len).map(|_| eval_rule(fake, item, done)).collect())
        }
    }
}

/// Resolve an anchor against the fields generated so far.
///
/// Schemas that pass `EntitySchema::validate` always resolve; otherwise a
/// fresh timestamp from this year stands in.
fn anchor_value<R: Rng>(
    fake: &mut FakeData<R>,
    anchor: &str,
    done: &[(&'static str, FieldValue)],
) -> NaiveDateTime {
    done.iter()
        .find(|(name, _)| *name == anchor)
        .and_then(|(_, value)| value.as_datetime())
        .unwrap_or_else(|| fake.datetime_this_year())
}
