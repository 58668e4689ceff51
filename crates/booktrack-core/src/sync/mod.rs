//! Authenticated resource sync
//!
//! Mirrors a remote JSON collection in memory.
//!
//! ## Protocol
//!
//! | Operation | Request              | Success body                 |
//! |-----------|----------------------|------------------------------|
//! | list      | `GET /books`         | `{ "data": [Book] }`         |
//! | create    | `POST /books`        | `{ "data": Book }` with `_id`|
//! | update    | `PUT /books/:id`     | `{ "data": Book }` with `_id`|
//! | delete    | `DELETE /books/:id`  | anything                     |
//!
//! ## Usage
//!
//! ```ignore
//! let mut books: ResourceSync<Book> = ResourceSync::new(transport, tokens);
//! books.list_all().await?;
//! books.upsert(&BookFields::new("Dune", "Herbert", "SciFi", "desert planet"), None).await?;
//! ```

mod client;
mod collection;
mod form;

pub use client::{DeleteMode, ResourceSync, SharedSync, SyncStatus};
pub use collection::{LocalCollection, Merge};
pub use form::EditForm;
