//! # Columnar
//!
//! Converts one inbound message into a fixed-schema parquet object for the
//! object-store sink.
//!
//! Unlike destination resolution, encoding fails closed: a record with a
//! missing column is never written.

mod decoder;
mod encoder;
mod error;
pub mod schema;

pub use decoder::decode;
pub use encoder::{ColumnarEncoder, EncodedObject};
pub use error::EncodeError;
pub use schema::record_schema;
