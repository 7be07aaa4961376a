//! MongoDB implementation of PostRepository

use async_trait::async_trait;
use futures_util::TryStreamExt;
use mongodb::{
    Collection, Database, IndexModel,
    bson::{self, Document, doc},
    options::FindOptions,
};
use tracing::instrument;
use uuid::Uuid;

use crate::error::{PostError, PostResult};
use crate::models::Post;
use crate::repository::PostRepository;

/// MongoDB implementation of the PostRepository
#[derive(Clone)]
pub struct MongoPostRepository {
    collection: Collection<Post>,
}

impl MongoPostRepository {
    pub fn new(db: Database) -> Self {
        let collection = db.collection::<Post>("posts");
        Self { collection }
    }

    /// Create a new MongoPostRepository with a custom collection name
    pub fn with_collection(db: Database, collection_name: &str) -> Self {
        let collection = db.collection::<Post>(collection_name);
        Self { collection }
    }

    /// Ensure indexes for the feed ordering and per-creator lookups
    pub async fn create_indexes(&self) -> PostResult<()> {
        let indexes = vec![
            IndexModel::builder()
                .keys(doc! { "created_at": -1, "_id": -1 })
                .build(),
            IndexModel::builder().keys(doc! { "creator": 1 }).build(),
        ];

        self.collection.create_indexes(indexes).await?;
        tracing::info!("Post indexes ensured");
        Ok(())
    }

    // Filters must encode ids exactly as `Post` stores them: binary UUIDs
    fn by_id(id: Uuid) -> Document {
        doc! { "_id": bson::Uuid::from(id) }
    }

    fn by_creator(creator: Uuid) -> Document {
        doc! { "creator": bson::Uuid::from(creator) }
    }

    fn newest_first() -> Document {
        doc! { "created_at": -1, "_id": -1 }
    }
}

#[async_trait]
impl PostRepository for MongoPostRepository {
    #[instrument(skip(self, post), fields(post_id = %post.id))]
    async fn create(&self, post: Post) -> PostResult<Post> {
        self.collection.insert_one(&post).await?;
        tracing::info!("Post created successfully");
        Ok(post)
    }

    #[instrument(skip(self))]
    async fn get_by_id(&self, id: Uuid) -> PostResult<Option<Post>> {
        Ok(self.collection.find_one(Self::by_id(id)).await?)
    }

    #[instrument(skip(self))]
    async fn list(&self, offset: u64, limit: u64) -> PostResult<Vec<Post>> {
        let options = FindOptions::builder()
            .sort(Self::newest_first())
            .skip(offset)
            .limit(i64::try_from(limit).unwrap_or(i64::MAX))
            .build();

        let cursor = self.collection.find(doc! {}).with_options(options).await?;
        Ok(cursor.try_collect().await?)
    }

    #[instrument(skip(self))]
    async fn count(&self) -> PostResult<u64> {
        Ok(self.collection.count_documents(doc! {}).await?)
    }

    #[instrument(skip(self))]
    async fn list_by_creator(&self, creator: Uuid) -> PostResult<Vec<Post>> {
        let cursor = self
            .collection
            .find(Self::by_creator(creator))
            .sort(Self::newest_first())
            .await?;
        Ok(cursor.try_collect().await?)
    }

    #[instrument(skip(self, post), fields(post_id = %post.id))]
    async fn update(&self, post: Post) -> PostResult<Post> {
        let result = self
            .collection
            .replace_one(Self::by_id(post.id), &post)
            .await?;

        if result.matched_count == 0 {
            return Err(PostError::NotFound(post.id));
        }

        tracing::info!("Post updated successfully");
        Ok(post)
    }

    #[instrument(skip(self))]
    async fn delete(&self, id: Uuid) -> PostResult<bool> {
        let result = self.collection.delete_one(Self::by_id(id)).await?;
        Ok(result.deleted_count > 0)
    }
}
