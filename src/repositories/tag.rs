use std::sync::Arc;

use async_trait::async_trait;
use sqlx::PgPool;
use tokio::sync::RwLock;

use super::{MemoryTable, RepositoryResult};
use crate::models::{NewTag, Tag};

#[async_trait]
pub trait TagRepository: Send + Sync {
    async fn save(&self, tag: NewTag) -> RepositoryResult<Tag>;

    async fn find_by_id(&self, id: i64) -> RepositoryResult<Option<Tag>>;

    async fn find_all(&self) -> RepositoryResult<Vec<Tag>>;
}

#[derive(Clone)]
pub struct PgTagRepository {
    pool: PgPool,
}

impl PgTagRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl TagRepository for PgTagRepository {
    async fn save(&self, tag: NewTag) -> RepositoryResult<Tag> {
        sqlx::query_as::<_, Tag>("INSERT INTO tags (name) VALUES ($1) RETURNING id, name")
            .bind(tag.name)
            .fetch_one(&self.pool)
            .await
    }

    async fn find_by_id(&self, id: i64) -> RepositoryResult<Option<Tag>> {
        sqlx::query_as::<_, Tag>("SELECT id, name FROM tags WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
    }

    async fn find_all(&self) -> RepositoryResult<Vec<Tag>> {
        sqlx::query_as::<_, Tag>("SELECT id, name FROM tags ORDER BY id")
            .fetch_all(&self.pool)
            .await
    }
}

#[derive(Debug, Default, Clone)]
pub struct InMemoryTagRepository {
    tags: Arc<RwLock<MemoryTable<Tag>>>,
}

impl InMemoryTagRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl TagRepository for InMemoryTagRepository {
    async fn save(&self, tag: NewTag) -> RepositoryResult<Tag> {
        let mut tags = self.tags.write().await;
        Ok(tags.insert_with(|id| tag.into_tag(id)))
    }

    async fn find_by_id(&self, id: i64) -> RepositoryResult<Option<Tag>> {
        Ok(self.tags.read().await.get(id))
    }

    async fn find_all(&self) -> RepositoryResult<Vec<Tag>> {
        Ok(self.tags.read().await.all())
    }
}
