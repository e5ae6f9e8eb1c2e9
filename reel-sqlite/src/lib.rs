//! # reel-sqlite
//!
//! SQLite executor and video store for the reel media catalog.
//!
//! This crate runs the statements `reel-query` compiles. The pieces:
//!
//! - [`SqliteConnection`], a cheaply-cloneable async handle over
//!   `tokio-rusqlite`, passed explicitly into every store;
//! - [`FromRow`], row-to-entity mapping;
//! - [`VideoStore`], the repository boundary exposed to the API layer:
//!   writes with read-back, unique-key and relation lookups, and the
//!   two-phase filtered query (distinct-id selection, count, one batched
//!   point lookup) that keeps fan-out joins from duplicating rows or
//!   inflating counts.
//!
//! # Example
//!
//! ```rust,no_run
//! use reel_query::FindOptions;
//! use reel_sqlite::{SqliteConnection, VideoFilter, VideoStore};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let conn = SqliteConnection::open("./catalog.db").await?;
//!     let store = VideoStore::new(conn);
//!
//!     let filter = VideoFilter {
//!         tag_ids: vec![5, 9],
//!         ..Default::default()
//!     };
//!     let (videos, total) = store.query(&filter, &FindOptions::default()).await?;
//!     println!("{} of {total} videos", videos.len());
//!     Ok(())
//! }
//! ```

pub mod connection;
pub mod error;
pub mod row;
pub mod store;
pub mod types;
pub mod video;

pub use connection::SqliteConnection;
pub use error::{StoreError, StoreResult};
pub use row::FromRow;
pub use store::VideoStore;
pub use video::{NewVideo, Video, VideoFilter};
