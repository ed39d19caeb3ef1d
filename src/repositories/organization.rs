use std::sync::Arc;

use async_trait::async_trait;
use sqlx::PgPool;
use tokio::sync::RwLock;

use super::{MemoryTable, RepositoryResult};
use crate::models::{NewOrganization, Organization};

#[async_trait]
pub trait OrganizationRepository: Send + Sync {
    async fn save(&self, organization: NewOrganization) -> RepositoryResult<Organization>;

    async fn find_by_id(&self, id: i64) -> RepositoryResult<Option<Organization>>;

    async fn find_all(&self) -> RepositoryResult<Vec<Organization>>;
}

#[derive(Clone)]
pub struct PgOrganizationRepository {
    pool: PgPool,
}

impl PgOrganizationRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl OrganizationRepository for PgOrganizationRepository {
    async fn save(&self, organization: NewOrganization) -> RepositoryResult<Organization> {
        sqlx::query_as::<_, Organization>(
            r#"
            INSERT INTO organizations (name, description)
            VALUES ($1, $2)
            RETURNING id, name, description
            "#,
        )
        .bind(organization.name)
        .bind(organization.description)
        .fetch_one(&self.pool)
        .await
    }

    async fn find_by_id(&self, id: i64) -> RepositoryResult<Option<Organization>> {
        sqlx::query_as::<_, Organization>(
            "SELECT id, name, description FROM organizations WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
    }

    async fn find_all(&self) -> RepositoryResult<Vec<Organization>> {
        sqlx::query_as::<_, Organization>(
            "SELECT id, name, description FROM organizations ORDER BY id",
        )
        .fetch_all(&self.pool)
        .await
    }
}

#[derive(Debug, Default, Clone)]
pub struct InMemoryOrganizationRepository {
    organizations: Arc<RwLock<MemoryTable<Organization>>>,
}

impl InMemoryOrganizationRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl OrganizationRepository for InMemoryOrganizationRepository {
    async fn save(&self, organization: NewOrganization) -> RepositoryResult<Organization> {
        let mut organizations = self.organizations.write().await;
        Ok(organizations.insert_with(|id| organization.into_organization(id)))
    }

    async fn find_by_id(&self, id: i64) -> RepositoryResult<Option<Organization>> {
        Ok(self.organizations.read().await.get(id))
    }

    async fn find_all(&self) -> RepositoryResult<Vec<Organization>> {
        Ok(self.organizations.read().await.all())
    }
}
