use serde::{Deserialize, Serialize};
use sqlx::FromRow;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct Organization {
    pub id: i64,
    pub name: String,
    pub description: Option<String>,
}

#[derive(Debug, Clone)]
pub struct NewOrganization {
    pub name: String,
    pub description: Option<String>,
}

impl NewOrganization {
    pub fn into_organization(self, id: i64) -> Organization {
        Organization {
            id,
            name: self.name,
            description: self.description,
        }
    }
}
