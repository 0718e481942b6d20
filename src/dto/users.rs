use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::{models::UserProfile, routes::params::Pagination};

// Fields are kept flat: `serde(flatten)` cannot parse numbers out of a query string.
#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct UserListQuery {
    /// `active`, `blocked` or `inactive`; anything else lists every user.
    pub status: Option<String>,
    pub page: Option<i64>,
    pub limit: Option<i64>,
}

impl UserListQuery {
    pub fn pagination(&self) -> Pagination {
        Pagination {
            page: self.page,
            limit: self.limit,
        }
    }
}

#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct BlockUserRequest {
    pub reason: Option<String>,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(transparent)]
pub struct UserList {
    #[schema(value_type = Vec<UserProfile>)]
    pub items: Vec<UserProfile>,
}
