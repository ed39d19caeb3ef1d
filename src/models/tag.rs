use serde::{Deserialize, Serialize};
use sqlx::FromRow;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct Tag {
    pub id: i64,
    pub name: String,
}

#[derive(Debug, Clone)]
pub struct NewTag {
    pub name: String,
}

impl NewTag {
    pub fn into_tag(self, id: i64) -> Tag {
        Tag {
            id,
            name: self.name,
        }
    }
}
