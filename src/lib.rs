//! # diskzip
//!
//! A small web front-end for public cloud-disk folders. Paste a public link,
//! see what is inside, tick the files you want, and get them back as one zip
//! archive.
//!
//! ## Pipeline
//!
//! - Listing: the public link is resolved through the listing API once per
//!   process, then served from [`ListingCache`]. Empty listings are never
//!   cached.
//! - Filtering: listings narrow to one raw kind tag (`"file"`, `"dir"`).
//! - Download: selected files are fetched one at a time, in the order
//!   submitted. The first failure aborts the batch; otherwise everything is
//!   deflated into one in-memory archive by [`ArchiveBuilder`].
//!
//! ## Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use std::time::Duration;
//! use diskzip::{HttpClient, ListingCache, ListingService};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let timeout = Duration::from_secs(30);
//!     let client = HttpClient::new(diskzip::io::DEFAULT_LISTING_URL, 1000, timeout)?;
//!     let listings = ListingService::new(Arc::new(client), Arc::new(ListingCache::new()));
//!
//!     for file in listings.list("https://disk.yandex.ru/d/abc", Some("file")).await? {
//!         println!("{}", file.name);
//!     }
//!
//!     Ok(())
//! }
//! ```

pub mod cache;
pub mod cli;
pub mod error;
pub mod io;
pub mod listing;
pub mod service;
pub mod web;
pub mod zip;

pub use cache::ListingCache;
pub use cli::Cli;
pub use error::Error;
pub use io::{FetchError, FileSource, HttpClient, ListingSource};
pub use listing::{FileDescriptor, ResourceKind};
pub use service::{ListingService, SelectionItem, build_download, parse_selection};
pub use zip::{ArchiveBuilder, ArchiveError, ArchiveReader, build_archive};
