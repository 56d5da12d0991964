//! # Contracts
//!
//! Frozen interface contracts shared by every router crate: the inbound
//! message envelope, routing types, the columnar row, collaborator traits
//! and errors. Business crates depend on this crate, never the reverse.
//!
//! ## Attribute policy
//! - Destination resolution reads attributes and falls back on any failure
//! - Columnar encoding reads attributes and refuses to proceed on any failure
//!
//! Both go through [`InboundMessage::extract`], so the policy difference is
//! entirely in how callers treat [`AttributeError`].

mod batch;
mod config;
mod error;
mod message;
mod record;
mod routing;
mod services;

pub use batch::InboundBatch;
pub use config::*;
pub use error::*;
pub use message::{AttributeName, InboundMessage};
pub use record::ColumnarRecord;
pub use routing::{ApplicationRecord, LookupKey, ResolvedSink};
pub use services::{
    LocalLookupTable, LocalObjectStore, LocalQueueClient, LookupTable, ObjectStore, QueueClient,
};
