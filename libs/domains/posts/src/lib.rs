//! Posts Domain
//!
//! Blog posts, their images, and the ownership rules that gate mutation.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────┐
//! │   Service   │  ← Validation, ownership checks, pagination
//! └──┬───────┬──┘
//!    │       │
//! ┌──▼───┐ ┌─▼──────────┐
//! │ Repo │ │ ImageStore │  ← MongoDB / in-memory, local disk
//! └──────┘ └────────────┘
//! ```
//!
//! # Usage
//!
//! ```rust,ignore
//! use domain_posts::{LocalImageStore, MongoPostRepository, PostService};
//!
//! let images = Arc::new(LocalImageStore::new("images"));
//! let service = PostService::new(MongoPostRepository::new(db), user_service, images)
//!     .with_per_page(2);
//! ```

pub mod error;
pub mod images;
pub mod models;
pub mod mongodb;
pub mod repository;
pub mod service;

pub use error::{PostError, PostResult};
pub use images::{ImageStore, LocalImageStore};
pub use models::{Post, PostInput, PostPage};
pub use mongodb::MongoPostRepository;
pub use repository::{InMemoryPostRepository, PostRepository};
pub use service::{DEFAULT_POSTS_PER_PAGE, PostService};
