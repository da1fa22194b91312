// Allow dead code for items that are part of the public API but only used in tests
#![allow(dead_code)]

pub mod batch;
pub mod config;
pub mod progress;
pub mod store;

pub use record_gen;
