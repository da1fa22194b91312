//! Synthetic document generator for docseed.
//!
//! Produces pseudo-realistic records for seven independent entities (user
//! sessions, price histories, event logs, support tickets, recommendations,
//! moderation queue entries and search queries) from declarative schemas.
//!
//! # Example
//!
//! ```rust
//! use record_gen::{Entity, Generator};
//!
//! // Seeded generators are reproducible
//! let mut gen = Generator::new(42);
//! let session = gen.user_session();
//! assert_eq!(session.entity, Entity::UserSession);
//!
//! let pages = session.get("pages_visited").and_then(|v| v.as_list()).unwrap();
//! assert!((1..=10).contains(&pages.len()));
//! ```

pub mod fake;
pub mod generator;
pub mod schema;
pub mod vocab;

pub use generator::{FieldValue, Generator, Record, DATETIME_FORMAT};
pub use schema::{Catalog, Count, Entity, EntitySchema, Field, Rule};
pub use vocab::Device;
