use serde::{Deserialize, Serialize};

/// JWT payload. Only the user identity is carried.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Claims {
    #[serde(rename = "userId")]
    pub user_id: String, // users.id
    pub iat: i64, // issued at (unix timestamp)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exp: Option<i64>, // only present when a TTL is configured
}
