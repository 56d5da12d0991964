//! # Router
//!
//! Destination resolution and batch orchestration.
//!
//! - [`DestinationResolver`]: (application, version) -> sink, falling back to
//!   the object store on any problem
//! - [`BatchRouter`]: resolve, deliver, delete for each message of a batch,
//!   with per-message failure isolation
//!
//! # Example
//!
//! ```ignore
//! let router = BatchRouter::new(&config, table, queues, store)?;
//! let report = router.process_batch(&batch).await;
//! println!("{} of {} deleted", report.deleted(), report.len());
//! ```

mod error;
mod orchestrator;
mod report;
mod resolver;

pub use error::RouterError;
pub use orchestrator::BatchRouter;
pub use report::{BatchReport, MessageOutcome, MessageReport};
pub use resolver::{DestinationResolver, FallbackReason, Resolution};
