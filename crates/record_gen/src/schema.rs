//! Schema model for the generated document collections.
//!
//! Each entity is described by an ordered list of fields, each paired with
//! the rule that produces its value. One generic routine in
//! [`crate::generator`] evaluates any schema, so per-entity ranges and
//! invariants live here and nowhere else.

use crate::vocab::{
    ACTIONS, CURRENCIES, EVENT_TYPES, ISSUE_TYPES, MODERATION_STATUSES, PAGES, PRODUCT_IDS,
    TICKET_STATUSES, USER_IDS,
};
use std::fmt;

/// Longest free-text field, matching the default prose length
pub const DEFAULT_TEXT_CHARS: usize = 200;

/// Longest search query text
pub const QUERY_TEXT_CHARS: usize = 100;

/// Shortest text limit a schema may declare
pub const MIN_TEXT_CHARS: usize = 5;

/// How many items a list field holds
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Count {
    /// Uniform integer in a closed range
    Uniform(usize, usize),
    /// Rounded normal sample, clamped at zero
    Normal { mean: f64, std_dev: f64 },
}

impl fmt::Display for Count {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Count::Uniform(min, max) => write!(f, "{}..={}", min, max),
            Count::Normal { mean, std_dev } => write!(f, "N({}, {})", mean, std_dev),
        }
    }
}

/// Generation rule for a single field
#[derive(Debug, Clone, PartialEq)]
pub enum Rule {
    /// Fresh version 4 UUID string
    Uuid,
    /// Uniform integer in a closed range
    IntRange(i64, i64),
    /// Uniform decimal in a closed range, rounded
    Decimal { min: f64, max: f64, places: u32 },
    /// Uniform pick from a vocabulary
    Choice(&'static [&'static str]),
    /// Uniform pick from the device profiles, stored as `{type, os}`
    Device,
    /// Timestamp between January 1st and now
    DateTimeThisYear,
    /// Timestamp between an earlier field's value and now
    DateTimeAfter(&'static str),
    /// Earlier field's value plus random minutes and seconds
    Offset {
        anchor: &'static str,
        minutes: (i64, i64),
        seconds: (i64, i64),
    },
    /// Prose of at most this many characters
    Text(usize),
    /// Single lorem word
    Word,
    /// List whose length is sampled first, then filled item by item
    List { count: Count, item: Box<Rule> },
}

impl Rule {
    pub fn list(count: Count, item: Rule) -> Self {
        Rule::List {
            count,
            item: Box::new(item),
        }
    }

    /// Whether values produced by this rule are timestamps
    pub fn is_datetime(&self) -> bool {
        matches!(
            self,
            Rule::DateTimeThisYear | Rule::DateTimeAfter(_) | Rule::Offset { .. }
        )
    }

    /// Field this rule reads from, if any
    pub fn anchor(&self) -> Option<&'static str> {
        match self {
            Rule::DateTimeAfter(anchor) => Some(*anchor),
            Rule::Offset { anchor, .. } => Some(*anchor),
            _ => None,
        }
    }
}

impl fmt::Display for Rule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Rule::Uuid => write!(f, "uuid"),
            Rule::IntRange(min, max) => write!(f, "int {}..={}", min, max),
            Rule::Decimal { min, max, places } => {
                write!(f, "decimal {}..={} ({} places)", min, max, places)
            }
            Rule::Choice(values) => write!(f, "one of [{}]", values.join(", ")),
            Rule::Device => write!(f, "device profile"),
            Rule::DateTimeThisYear => write!(f, "datetime this year"),
            Rule::DateTimeAfter(anchor) => write!(f, "datetime after {}", anchor),
            Rule::Offset {
                anchor,
                minutes,
                seconds,
            } => write!(
                f,
                "{} + {}..={} min + {}..={} s",
                anchor, minutes.0, minutes.1, seconds.0, seconds.1
            ),
            Rule::Text(max) => write!(f, "text (<= {} chars)", max),
            Rule::Word => write!(f, "word"),
            Rule::List { count, item } => write!(f, "list[{}] of {}", count, item),
        }
    }
}

/// Field definition
#[derive(Debug, Clone, PartialEq)]
pub struct Field {
    pub name: &'static str,
    pub rule: Rule,
}

impl Field {
    pub fn new(name: &'static str, rule: Rule) -> Self {
        Self { name, rule }
    }
}

/// The seven generated entities
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Entity {
    UserSession,
    ProductPriceHistory,
    EventLog,
    SupportTicket,
    UserRecommendation,
    ModerationQueue,
    SearchQuery,
}

impl Entity {
    /// All entities in batch insertion order
    pub const ALL: [Entity; 7] = [
        Entity::UserSession,
        Entity::ProductPriceHistory,
        Entity::EventLog,
        Entity::SupportTicket,
        Entity::UserRecommendation,
        Entity::ModerationQueue,
        Entity::SearchQuery,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Entity::UserSession => "user_session",
            Entity::ProductPriceHistory => "product_price_history",
            Entity::EventLog => "event_log",
            Entity::SupportTicket => "support_ticket",
            Entity::UserRecommendation => "user_recommendation",
            Entity::ModerationQueue => "moderation_queue",
            Entity::SearchQuery => "search_query",
        }
    }

    /// Collection the entity's documents are stored in
    pub fn collection(&self) -> &'static str {
        match self {
            Entity::UserSession => "user_sessions",
            Entity::ProductPriceHistory => "product_price_history",
            Entity::EventLog => "event_logs",
            Entity::SupportTicket => "support_tickets",
            Entity::UserRecommendation => "user_recommendations",
            Entity::ModerationQueue => "moderation_queue",
            Entity::SearchQuery => "search_queries",
        }
    }

    /// Position in [`Entity::ALL`]
    pub fn index(&self) -> usize {
        *self as usize
    }

    /// Build the schema describing this entity's documents
    pub fn schema(&self) -> EntitySchema {
        match self {
            Entity::UserSession => EntitySchema::new(*self)
                .field(Field::new("session_id", Rule::Uuid))
                .field(Field::new("user_id", Rule::IntRange(USER_IDS.0, USER_IDS.1)))
                .field(Field::new("start_time", Rule::DateTimeThisYear))
                .field(Field::new(
                    "end_time",
                    Rule::Offset {
                        anchor: "start_time",
                        minutes: (1, 60),
                        seconds: (1, 60),
                    },
                ))
                .field(Field::new(
                    "pages_visited",
                    Rule::list(Count::Uniform(1, 10), Rule::Choice(PAGES)),
                ))
                .field(Field::new("device", Rule::Device))
                .field(Field::new(
                    "actions",
                    Rule::list(
                        Count::Normal {
                            mean: 7.0,
                            std_dev: 4.0,
                        },
                        Rule::Choice(ACTIONS),
                    ),
                )),
            Entity::ProductPriceHistory => EntitySchema::new(*self)
                .field(Field::new(
                    "product_id",
                    Rule::IntRange(PRODUCT_IDS.0, PRODUCT_IDS.1),
                ))
                .field(Field::new(
                    "price_changes",
                    Rule::list(Count::Uniform(1, 10), price()),
                ))
                .field(Field::new("current_price", price()))
                .field(Field::new("currency", Rule::Choice(CURRENCIES))),
            Entity::EventLog => EntitySchema::new(*self)
                .field(Field::new("event_id", Rule::Uuid))
                .field(Field::new("timestamp", Rule::DateTimeThisYear))
                .field(Field::new("event_type", Rule::Choice(EVENT_TYPES)))
                .field(Field::new("details", Rule::Text(DEFAULT_TEXT_CHARS))),
            Entity::SupportTicket => EntitySchema::new(*self)
                .field(Field::new("ticket_id", Rule::Uuid))
                .field(Field::new("user_id", Rule::IntRange(USER_IDS.0, USER_IDS.1)))
                .field(Field::new("status", Rule::Choice(TICKET_STATUSES)))
                .field(Field::new("issue_type", Rule::Choice(ISSUE_TYPES)))
                .field(Field::new(
                    "message",
                    Rule::list(Count::Uniform(1, 10), Rule::Text(DEFAULT_TEXT_CHARS)),
                ))
                .field(Field::new("created_at", Rule::DateTimeThisYear))
                .field(Field::new("updated_at", Rule::DateTimeAfter("created_at"))),
            Entity::UserRecommendation => EntitySchema::new(*self)
                .field(Field::new("user_id", Rule::IntRange(USER_IDS.0, USER_IDS.1)))
                .field(Field::new(
                    "recommended_products",
                    Rule::list(
                        Count::Uniform(3, 10),
                        Rule::IntRange(PRODUCT_IDS.0, PRODUCT_IDS.1),
                    ),
                ))
                .field(Field::new("last_updated", Rule::DateTimeThisYear)),
            Entity::ModerationQueue => EntitySchema::new(*self)
                .field(Field::new("review_id", Rule::Uuid))
                .field(Field::new("user_id", Rule::IntRange(USER_IDS.0, USER_IDS.1)))
                .field(Field::new(
                    "product_id",
                    Rule::IntRange(PRODUCT_IDS.0, PRODUCT_IDS.1),
                ))
                .field(Field::new("review_text", Rule::Text(DEFAULT_TEXT_CHARS)))
                .field(Field::new("rating", Rule::IntRange(1, 10)))
                .field(Field::new(
                    "moderation_status",
                    Rule::Choice(MODERATION_STATUSES),
                ))
                .field(Field::new(
                    "flags",
                    Rule::list(Count::Uniform(1, 10), Rule::Word),
                ))
                .field(Field::new("submitted_at", Rule::DateTimeThisYear)),
            Entity::SearchQuery => EntitySchema::new(*self)
                .field(Field::new("query_id", Rule::Uuid))
                .field(Field::new("user_id", Rule::IntRange(USER_IDS.0, USER_IDS.1)))
                .field(Field::new("query_text", Rule::Text(QUERY_TEXT_CHARS)))
                .field(Field::new("timestamp", Rule::DateTimeThisYear))
                .field(Field::new(
                    "filters",
                    Rule::list(Count::Uniform(1, 10), Rule::Word),
                ))
                .field(Field::new("result_count", Rule::IntRange(1, 50))),
        }
    }
}

fn price() -> Rule {
    Rule::Decimal {
        min: 10.0,
        max: 1000.0,
        places: 2,
    }
}

impl fmt::Display for Entity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl std::str::FromStr for Entity {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lower = s.trim().to_lowercase().replace('-', "_");
        match lower.as_str() {
            "user_session" | "user_sessions" | "session" | "sessions" => Ok(Entity::UserSession),
            "product_price_history" | "price_history" | "prices" => {
                Ok(Entity::ProductPriceHistory)
            }
            "event_log" | "event_logs" | "event" | "events" => Ok(Entity::EventLog),
            "support_ticket" | "support_tickets" | "ticket" | "tickets" => {
                Ok(Entity::SupportTicket)
            }
            "user_recommendation" | "user_recommendations" | "recommendation"
            | "recommendations" => Ok(Entity::UserRecommendation),
            "moderation_queue" | "moderation" | "review" | "reviews" => {
                Ok(Entity::ModerationQueue)
            }
            "search_query" | "search_queries" | "search" | "query" | "queries" => {
                Ok(Entity::SearchQuery)
            }
            _ => Err(format!(
                "Unknown entity: {}. Valid options: {}",
                s,
                Entity::ALL
                    .iter()
                    .map(|e| e.name())
                    .collect::<Vec<_>>()
                    .join(", ")
            )),
        }
    }
}

/// Document layout for one entity
#[derive(Debug, Clone, PartialEq)]
pub struct EntitySchema {
    pub entity: Entity,
    pub fields: Vec<Field>,
}

impl EntitySchema {
    pub fn new(entity: Entity) -> Self {
        Self {
            entity,
            fields: Vec::new(),
        }
    }

    pub fn field(mut self, field: Field) -> Self {
        self.fields.push(field);
        self
    }

    pub fn collection(&self) -> &'static str {
        self.entity.collection()
    }

    pub fn get_field(&self, name: &str) -> Option<&Field> {
        self.fields.iter().find(|f| f.name == name)
    }

    /// Get all field names in document order
    pub fn field_names(&self) -> Vec<&'static str> {
        self.fields.iter().map(|f| f.name).collect()
    }

    /// Check that every rule can be evaluated.
    ///
    /// Anchored rules must reference an earlier timestamp field, ranges must
    /// be non-empty and normal parameters finite.
    pub fn validate(&self) -> Result<(), String> {
        for (idx, field) in self.fields.iter().enumerate() {
            if self.fields[..idx].iter().any(|f| f.name == field.name) {
                return Err(format!("{}: duplicate field '{}'", self.entity, field.name));
            }
            validate_rule(&field.rule)
                .map_err(|e| format!("{}.{}: {}", self.entity, field.name, e))?;

            if let Some(anchor) = field.rule.anchor() {
                let earlier = self.fields[..idx].iter().find(|f| f.name == anchor);
                match earlier {
                    Some(f) if f.rule.is_datetime() => {}
                    Some(_) => {
                        return Err(format!(
                            "{}.{}: anchor '{}' is not a timestamp",
                            self.entity, field.name, anchor
                        ))
                    }
                    None => {
                        return Err(format!(
                            "{}.{}: anchor '{}' must precede it",
                            self.entity, field.name, anchor
                        ))
                    }
                }
            }
        }
        Ok(())
    }
}

fn validate_rule(rule: &Rule) -> Result<(), String> {
    match rule {
        Rule::IntRange(min, max) if min > max => Err(format!("empty range {}..={}", min, max)),
        Rule::Decimal { min, max, .. } if !(min.is_finite() && max.is_finite() && min <= max) => {
            Err(format!("invalid decimal range {}..={}", min, max))
        }
        Rule::Choice(values) if values.is_empty() => Err("empty vocabulary".to_string()),
        Rule::Offset {
            minutes, seconds, ..
        } if minutes.0 < 0 || seconds.0 < 0 || minutes.0 > minutes.1 || seconds.0 > seconds.1 => {
            Err("offset ranges must be non-negative and non-empty".to_string())
        }
        Rule::Text(max) if *max < MIN_TEXT_CHARS => {
            Err(format!("text limit {} is below {}", max, MIN_TEXT_CHARS))
        }
        Rule::List { count, item } => {
            match count {
                Count::Uniform(min, max) if min > max => {
                    return Err(format!("empty count range {}..={}", min, max))
                }
                Count::Normal { mean, std_dev }
                    if !(mean.is_finite() && std_dev.is_finite() && *std_dev >= 0.0) =>
                {
                    return Err(format!("invalid normal count N({}, {})", mean, std_dev))
                }
                _ => {}
            }
            if item.anchor().is_some() {
                return Err("list items cannot be anchored".to_string());
            }
            validate_rule(item)
        }
        _ => Ok(()),
    }
}

/// The full set of entity schemas
#[derive(Debug, Clone)]
pub struct Catalog {
    pub schemas: Vec<EntitySchema>,
}

impl Catalog {
    /// Schemas for every entity, in [`Entity::ALL`] order
    pub fn standard() -> Self {
        Self {
            schemas: Entity::ALL.iter().map(|e| e.schema()).collect(),
        }
    }

    pub fn get(&self, entity: Entity) -> &EntitySchema {
        &self.schemas[entity.index()]
    }
}

impl Default for Catalog {
    fn default() -> Self {
        Self::standard()
    }
}
