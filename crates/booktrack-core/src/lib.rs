//! BookTrack Core Library
//!
//! This crate provides the core functionality for BookTrack, a client for a
//! remote book collection behind a bearer-token API.
//!
//! # Architecture
//!
//! - **Server is the source of truth**: the local list is an in-memory
//!   mirror, rebuilt by a full fetch and patched by each successful
//!   create, update or delete response.
//!
//! Operations on one collection take `&mut self` and therefore never
//! interleave; use [`sync::SharedSync`] to share a collection between tasks.
//!
//! # Quick Start
//!
//! ```text
//! let session = Session::open()?;
//! let mut books = session.books();
//!
//! books.list_all().await?;
//! books.upsert(&BookFields::new("Dune", "Herbert", "SciFi", "desert planet"), None).await?;
//! ```
//!
//! # Modules
//!
//! - `session`: Configured entry point (main entry point)
//! - `sync`: Authenticated collection sync
//! - `account`: Registration, login and profile
//! - `models`: Books, users and the `Resource` trait
//! - `token`: Bearer token storage
//! - `transport`: HTTP transport
//! - `screen`: Top-level screens
//! - `config`: Application configuration

pub mod account;
pub mod config;
pub mod error;
pub mod models;
pub mod screen;
pub mod session;
pub mod sync;
pub mod token;
pub mod transport;

pub use account::AccountClient;
pub use config::Config;
pub use error::{AccountError, ApiError, SyncError};
pub use models::{Book, BookFields, Credentials, Registration, Resource, User};
pub use screen::{Icon, Screen};
pub use session::Session;
pub use sync::{EditForm, ResourceSync, SyncStatus};
pub use token::{AuthToken, FileTokenStore, MemoryTokenStore, TokenStore};
