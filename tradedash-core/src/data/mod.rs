//! Snapshot sources and raw row decoding.
//!
//! Everything here is I/O plumbing around the pipeline: fetching a snapshot's
//! bytes (local file or HTTP object) and decoding a headered CSV feed into
//! untyped [`RawRow`]s. The pipeline itself never touches a source.

pub mod csv_feed;
pub mod http;
pub mod raw;
pub mod source;

pub use csv_feed::parse_csv;
pub use http::{HttpOptions, HttpSource};
pub use raw::{RawRow, RawValue};
pub use source::{FileSource, SnapshotSource, SourceError};
