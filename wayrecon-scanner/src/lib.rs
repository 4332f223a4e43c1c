pub mod client;
pub mod error;
pub mod page;
pub mod query;

pub use client::{ArchiveTransport, CdxClient};
pub use error::ScanError;
pub use page::{ArchivePage, ArchiveRow, Cursor, PageParse, parse_page};
pub use query::{CdxQuery, DEFAULT_CDX_ENDPOINT};
