//! Blocking client for the forumlib JSON API.
//!
//! Three read operations are exposed on [`ForumLib`]: category listings,
//! a single discussion, and paginated comments. Responses are decoded by
//! walking a static schema per model (see [`internal::schema`]) rather than
//! by derive, so every field can be absent and every mismatch is reported
//! with the JSON path of the offending value.
//!
//! ```no_run
//! use forumlib::{Category, ForumLib, Sort};
//!
//! let client = ForumLib::new()?;
//! let page = client.list_category(Category::All, 1, Sort::Newest)?;
//! for discussion in page.data.unwrap_or_default() {
//!     println!("{:?}", discussion.title);
//! }
//! # Ok::<(), forumlib::ClientError>(())
//! ```

pub mod api;
pub mod config;
pub mod error;
pub mod internal;
pub mod utils;

pub use api::{Category, ForumLib, Sort};
pub use config::{ClientConfig, USER_AGENT};
pub use error::{ClientError, ConfigError, DecodeError};
pub use internal::decode::{Decoder, decode, decode_many};
pub use internal::models::{
    Body, CategoryPage, Comment, CommentPage, Discussion, DiscussionDetail, Envelope, Post, User,
};
pub use internal::schema::{Model, Record, Schema, Value};
