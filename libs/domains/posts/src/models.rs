use chrono::{DateTime, Utc};
use mongodb::bson::serde_helpers::{chrono_datetime_as_bson_datetime, uuid_1_as_binary};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

/// Sentinel a client sends to keep the current image on update
pub const KEEP_IMAGE: &str = "undefined";

/// Post entity - represents a post stored in MongoDB
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Post {
    #[serde(rename = "_id", alias = "id", with = "uuid_1_as_binary")]
    pub id: Uuid,
    pub title: String,
    pub content: String,
    /// Public path of the post image, e.g. `images/<file>`
    pub image_url: String,
    /// Id of the user who created the post
    #[serde(with = "uuid_1_as_binary")]
    pub creator: Uuid,
    #[serde(with = "chrono_datetime_as_bson_datetime")]
    pub created_at: DateTime<Utc>,
    #[serde(with = "chrono_datetime_as_bson_datetime")]
    pub updated_at: DateTime<Utc>,
}

impl Post {
    pub fn new(input: PostInput, creator: Uuid) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::now_v7(),
            title: input.title,
            content: input.content,
            image_url: input.image_url,
            creator,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn is_owned_by(&self, user_id: Uuid) -> bool {
        self.creator == user_id
    }

    /// Replace title and content, and the image unless the client sent `"undefined"`
    pub fn apply_update(&mut self, input: PostInput) {
        self.title = input.title;
        self.content = input.content;
        if input.image_url != KEEP_IMAGE {
            self.image_url = input.image_url;
        }
        self.updated_at = Utc::now();
    }
}

/// Create/update input
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct PostInput {
    #[validate(length(min = 5, message = "Title is too short"))]
    pub title: String,
    #[validate(length(min = 5, message = "Content is too short"))]
    pub content: String,
    pub image_url: String,
}

/// One page of posts plus the total across all pages
#[derive(Debug, Clone, PartialEq)]
pub struct PostPage {
    pub posts: Vec<Post>,
    pub total_items: u64,
}
