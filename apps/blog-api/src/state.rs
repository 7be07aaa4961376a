//! Shared application state.
//!
//! Cloned into every handler and into the GraphQL schema data; all members
//! are cheap `Arc` clones.

use axum_helpers::JwtAuth;
use core_config::AppInfo;
use domain_posts::{
    ImageStore, InMemoryPostRepository, LocalImageStore, MongoPostRepository, PostRepository,
    PostService,
};
use domain_users::{InMemoryUserRepository, MongoUserRepository, UserRepository, UserService};
use eyre::eyre;
use mongodb::Client;
use std::sync::Arc;

use crate::config::{BlogConfig, Config};

pub type Users = UserService<Arc<dyn UserRepository>>;
pub type Posts = PostService<Arc<dyn PostRepository>, Arc<dyn UserRepository>>;

#[derive(Clone)]
pub struct AppState {
    pub app: AppInfo,
    pub blog: BlogConfig,
    pub jwt: JwtAuth,
    pub users: Users,
    pub posts: Posts,
    pub images: Arc<dyn ImageStore>,
    /// Set when backed by MongoDB; pinged by `/ready`
    pub mongo_client: Option<Client>,
}

impl AppState {
    /// MongoDB-backed state. Ensures collection indexes exist.
    pub async fn with_mongo(config: &Config, client: Client) -> eyre::Result<Self> {
        let db = client.database(config.mongodb.database());

        let users = MongoUserRepository::new(db.clone());
        users
            .create_indexes()
            .await
            .map_err(|e| eyre!("Failed to create user indexes: {}", e))?;

        let posts = MongoPostRepository::new(db);
        posts
            .create_indexes()
            .await
            .map_err(|e| eyre!("Failed to create post indexes: {}", e))?;

        Ok(Self::assemble(
            config.app,
            config.blog.clone(),
            JwtAuth::new(&config.jwt),
            Arc::new(users),
            Arc::new(posts),
            Some(client),
        ))
    }

    /// State backed by in-process storage; nothing survives a restart
    pub fn in_memory(app: AppInfo, blog: BlogConfig, jwt: JwtAuth) -> Self {
        Self::assemble(
            app,
            blog,
            jwt,
            Arc::new(InMemoryUserRepository::new()),
            Arc::new(InMemoryPostRepository::new()),
            None,
        )
    }

    fn assemble(
        app: AppInfo,
        blog: BlogConfig,
        jwt: JwtAuth,
        user_repository: Arc<dyn UserRepository>,
        post_repository: Arc<dyn PostRepository>,
        mongo_client: Option<Client>,
    ) -> Self {
        let images: Arc<dyn ImageStore> = Arc::new(LocalImageStore::new(&blog.images_dir));
        let users = UserService::new(user_repository, jwt.clone());
        let posts = PostService::new(post_repository, users.clone(), images.clone())
            .with_per_page(blog.posts_per_page);

        Self {
            app,
            blog,
            jwt,
            users,
            posts,
            images,
            mongo_client,
        }
    }
}
