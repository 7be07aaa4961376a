use chrono::{DateTime, Utc};
use mongodb::bson::serde_helpers::{chrono_datetime_as_bson_datetime, uuid_1_as_binary};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

/// Status every new account starts with
pub const DEFAULT_STATUS: &str = "I am new!";

/// User entity - represents a user stored in MongoDB
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    /// Unique identifier (stored as _id in MongoDB)
    #[serde(rename = "_id", alias = "id", with = "uuid_1_as_binary")]
    pub id: Uuid,
    pub email: String,
    pub name: String,
    /// Argon2 password hash
    pub password_hash: String,
    pub status: String,
    /// Ids of the posts this user created, oldest first
    #[serde(default, with = "uuid_list_as_binary")]
    pub posts: Vec<Uuid>,
    #[serde(with = "chrono_datetime_as_bson_datetime")]
    pub created_at: DateTime<Utc>,
    #[serde(with = "chrono_datetime_as_bson_datetime")]
    pub updated_at: DateTime<Utc>,
}

impl User {
    pub fn new(email: String, name: String, password_hash: String) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::now_v7(),
            email,
            name,
            password_hash,
            status: DEFAULT_STATUS.to_string(),
            posts: Vec::new(),
            created_at: now,
            updated_at: now,
        }
    }
}

/// `Vec<Uuid>` as an array of BSON binary UUIDs, matching how single ids are stored
pub(crate) mod uuid_list_as_binary {
    use mongodb::bson;
    use serde::{Deserialize, Deserializer, Serializer};
    use uuid::Uuid;

    pub fn serialize<S: Serializer>(ids: &[Uuid], serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_seq(ids.iter().map(|id| bson::Uuid::from(*id)))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<Uuid>, D::Error> {
        let ids = Vec::<bson::Uuid>::deserialize(deserializer)?;
        Ok(ids.into_iter().map(Uuid::from).collect())
    }
}

/// Registration input
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateUser {
    #[validate(email(message = "Email is invalid"))]
    pub email: String,
    pub name: String,
    #[validate(length(min = 5, message = "Password is too short"))]
    pub password: String,
}

/// Result of a successful login
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AuthData {
    pub token: String,
    pub user_id: Uuid,
}
