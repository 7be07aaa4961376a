//! MongoDB implementation of UserRepository

use async_trait::async_trait;
use mongodb::{
    Collection, Database, IndexModel,
    bson::{self, Bson, DateTime, Document, doc},
    error::{ErrorKind, WriteFailure},
    options::IndexOptions,
};
use tracing::instrument;
use uuid::Uuid;

use crate::error::{UserError, UserResult};
use crate::models::User;
use crate::repository::UserRepository;

const DUPLICATE_KEY: i32 = 11000;

/// MongoDB implementation of the UserRepository
#[derive(Clone)]
pub struct MongoUserRepository {
    collection: Collection<User>,
}

impl MongoUserRepository {
    pub fn new(db: Database) -> Self {
        let collection = db.collection::<User>("users");
        Self { collection }
    }

    /// Create a new MongoUserRepository with a custom collection name
    pub fn with_collection(db: Database, collection_name: &str) -> Self {
        let collection = db.collection::<User>(collection_name);
        Self { collection }
    }

    /// Ensure the unique email index exists
    pub async fn create_indexes(&self) -> UserResult<()> {
        let index = IndexModel::builder()
            .keys(doc! { "email": 1 })
            .options(IndexOptions::builder().unique(true).build())
            .build();

        self.collection.create_index(index).await?;
        tracing::info!("User indexes ensured");
        Ok(())
    }

    // Ids are matched in the binary form `User` is stored with
    fn by_id(id: Uuid) -> Document {
        doc! { "_id": bson::Uuid::from(id) }
    }

    /// An entry of the `posts` array
    fn post_ref(post_id: Uuid) -> Bson {
        Bson::from(bson::Uuid::from(post_id))
    }

    fn is_duplicate_key(err: &mongodb::error::Error) -> bool {
        matches!(
            err.kind.as_ref(),
            ErrorKind::Write(WriteFailure::WriteError(e)) if e.code == DUPLICATE_KEY
        )
    }
}

#[async_trait]
impl UserRepository for MongoUserRepository {
    #[instrument(skip(self, user), fields(user_id = %user.id))]
    async fn create(&self, user: User) -> UserResult<User> {
        match self.collection.insert_one(&user).await {
            Ok(_) => {
                tracing::info!("User created successfully");
                Ok(user)
            }
            Err(e) if Self::is_duplicate_key(&e) => Err(UserError::DuplicateEmail(user.email)),
            Err(e) => Err(e.into()),
        }
    }

    #[instrument(skip(self))]
    async fn get_by_id(&self, id: Uuid) -> UserResult<Option<User>> {
        Ok(self.collection.find_one(Self::by_id(id)).await?)
    }

    #[instrument(skip(self, email))]
    async fn get_by_email(&self, email: &str) -> UserResult<Option<User>> {
        Ok(self.collection.find_one(doc! { "email": email }).await?)
    }

    #[instrument(skip(self, email))]
    async fn email_exists(&self, email: &str) -> UserResult<bool> {
        let count = self
            .collection
            .count_documents(doc! { "email": email })
            .await?;
        Ok(count > 0)
    }

    #[instrument(skip(self, user), fields(user_id = %user.id))]
    async fn update(&self, user: User) -> UserResult<User> {
        let result = self
            .collection
            .replace_one(Self::by_id(user.id), &user)
            .await?;

        if result.matched_count == 0 {
            return Err(UserError::NotFound(user.id));
        }

        Ok(user)
    }

    #[instrument(skip(self))]
    async fn push_post(&self, user_id: Uuid, post_id: Uuid) -> UserResult<bool> {
        let update = doc! {
            "$push": { "posts": Self::post_ref(post_id) },
            "$set": { "updated_at": DateTime::now() },
        };
        let result = self.collection.update_one(Self::by_id(user_id), update).await?;
        Ok(result.matched_count > 0)
    }

    #[instrument(skip(self))]
    async fn pull_post(&self, user_id: Uuid, post_id: Uuid) -> UserResult<bool> {
        let update = doc! {
            "$pull": { "posts": Self::post_ref(post_id) },
            "$set": { "updated_at": DateTime::now() },
        };
        let result = self.collection.update_one(Self::by_id(user_id), update).await?;
        Ok(result.matched_count > 0)
    }
}
