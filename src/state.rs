use std::sync::Arc;

use sqlx::PgPool;

use crate::repositories::{
    EventRepository, InMemoryEventRepository, InMemoryOrganizationRepository,
    InMemoryTagRepository, OrganizationRepository, PgEventRepository, PgOrganizationRepository,
    PgTagRepository, TagRepository,
};

/// Repository handles shared by every request.
#[derive(Clone)]
pub struct AppState {
    pub events: Arc<dyn EventRepository>,
    pub organizations: Arc<dyn OrganizationRepository>,
    pub tags: Arc<dyn TagRepository>,
}

impl AppState {
    pub fn postgres(pool: PgPool) -> Self {
        Self {
            events: Arc::new(PgEventRepository::new(pool.clone())),
            organizations: Arc::new(PgOrganizationRepository::new(pool.clone())),
            tags: Arc::new(PgTagRepository::new(pool)),
        }
    }

    pub fn in_memory() -> Self {
        Self {
            events: Arc::new(InMemoryEventRepository::new()),
            organizations: Arc::new(InMemoryOrganizationRepository::new()),
            tags: Arc::new(InMemoryTagRepository::new()),
        }
    }
}
