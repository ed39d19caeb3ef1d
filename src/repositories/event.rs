use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{NaiveDate, NaiveTime};
use sqlx::{FromRow, PgPool, Postgres, QueryBuilder};
use tokio::sync::RwLock;

use super::{MemoryTable, RepositoryResult};
use crate::models::{Event, NewEvent, Organization, Tag};

/// Date bounds of an event search. Both ends are inclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DateRange {
    Any,
    From(NaiveDate),
    Until(NaiveDate),
    Between(NaiveDate, NaiveDate),
}

impl DateRange {
    pub fn new(start: Option<NaiveDate>, end: Option<NaiveDate>) -> Self {
        match (start, end) {
            (Some(start), Some(end)) => DateRange::Between(start, end),
            (Some(start), None) => DateRange::From(start),
            (None, Some(end)) => DateRange::Until(end),
            (None, None) => DateRange::Any,
        }
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        match *self {
            DateRange::Any => true,
            DateRange::From(start) => date >= start,
            DateRange::Until(end) => date <= end,
            DateRange::Between(start, end) => start <= date && date <= end,
        }
    }
}

/// Case-sensitive containment filters on title and location; an empty
/// string matches every event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EventSearch {
    pub title: String,
    pub location: String,
    pub dates: DateRange,
}

impl EventSearch {
    pub fn matches(&self, event: &Event) -> bool {
        event.title.contains(&self.title)
            && event.location.contains(&self.location)
            && self.dates.contains(event.date)
    }
}

#[async_trait]
pub trait EventRepository: Send + Sync {
    /// Persist an event together with its tag links.
    async fn save(&self, event: NewEvent) -> RepositoryResult<Event>;

    async fn find_by_id(&self, id: i64) -> RepositoryResult<Option<Event>>;

    async fn find_all(&self) -> RepositoryResult<Vec<Event>>;

    /// Delete an event by id. Returns `false` when nothing was removed.
    async fn delete(&self, id: i64) -> RepositoryResult<bool>;

    async fn search(&self, search: &EventSearch) -> RepositoryResult<Vec<Event>>;
}

const EVENT_SELECT: &str = r#"
SELECT e.id, e.title, e.description, e.event_date, e.event_time, e.location,
       o.id AS organization_id, o.name AS organization_name,
       o.description AS organization_description
FROM events e
JOIN organizations o ON o.id = e.organization_id
"#;

#[derive(FromRow)]
struct EventRow {
    id: i64,
    title: String,
    description: Option<String>,
    event_date: NaiveDate,
    event_time: NaiveTime,
    location: String,
    organization_id: i64,
    organization_name: String,
    organization_description: Option<String>,
}

impl EventRow {
    fn into_event(self, tags: Vec<Tag>) -> Event {
        Event {
            id: self.id,
            title: self.title,
            description: self.description,
            date: self.event_date,
            time: self.event_time,
            location: self.location,
            organization: Organization {
                id: self.organization_id,
                name: self.organization_name,
                description: self.organization_description,
            },
            tags,
        }
    }
}

#[derive(FromRow)]
struct EventTagRow {
    event_id: i64,
    id: i64,
    name: String,
}

#[derive(Clone)]
pub struct PgEventRepository {
    pool: PgPool,
}

impl PgEventRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Load the tags of every row in one query and assemble the events.
    async fn with_tags(&self, rows: Vec<EventRow>) -> RepositoryResult<Vec<Event>> {
        if rows.is_empty() {
            return Ok(Vec::new());
        }

        let event_ids: Vec<i64> = rows.iter().map(|row| row.id).collect();
        let links = sqlx::query_as::<_, EventTagRow>(
            r#"
            SELECT et.event_id, t.id, t.name
            FROM event_tags et
            JOIN tags t ON t.id = et.tag_id
            WHERE et.event_id = ANY($1)
            ORDER BY t.id
            "#,
        )
        .bind(&event_ids[..])
        .fetch_all(&self.pool)
        .await?;

        let mut tags_by_event: HashMap<i64, Vec<Tag>> = HashMap::new();
        for link in links {
            tags_by_event.entry(link.event_id).or_default().push(Tag {
                id: link.id,
                name: link.name,
            });
        }

        Ok(rows
            .into_iter()
            .map(|row| {
                let tags = tags_by_event.remove(&row.id).unwrap_or_default();
                row.into_event(tags)
            })
            .collect())
    }
}

#[async_trait]
impl EventRepository for PgEventRepository {
    async fn save(&self, mut event: NewEvent) -> RepositoryResult<Event> {
        let mut tx = self.pool.begin().await?;

        let id: i64 = sqlx::query_scalar(
            r#"
            INSERT INTO events (title, description, event_date, event_time, location, organization_id)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING id
            "#,
        )
        .bind(&event.title)
        .bind(&event.description)
        .bind(event.date)
        .bind(event.time)
        .bind(&event.location)
        .bind(event.organization.id)
        .fetch_one(&mut *tx)
        .await?;

        if !event.tags.is_empty() {
            let tag_ids: Vec<i64> = event.tags.iter().map(|tag| tag.id).collect();
            // Tags deleted since they were resolved simply drop out here.
            let linked: Vec<i64> = sqlx::query_scalar(
                r#"
                INSERT INTO event_tags (event_id, tag_id)
                SELECT $1, id FROM tags WHERE id = ANY($2)
                RETURNING tag_id
                "#,
            )
            .bind(id)
            .bind(&tag_ids[..])
            .fetch_all(&mut *tx)
            .await?;
            event.tags.retain(|tag| linked.contains(&tag.id));
        }

        tx.commit().await?;

        tracing::debug!(event_id = id, tags = event.tags.len(), "Inserted event");
        Ok(event.into_event(id))
    }

    async fn find_by_id(&self, id: i64) -> RepositoryResult<Option<Event>> {
        let row = sqlx::query_as::<_, EventRow>(&format!("{EVENT_SELECT} WHERE e.id = $1"))
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        match row {
            Some(row) => Ok(self.with_tags(vec![row]).await?.pop()),
            None => Ok(None),
        }
    }

    async fn find_all(&self) -> RepositoryResult<Vec<Event>> {
        let rows = sqlx::query_as::<_, EventRow>(&format!("{EVENT_SELECT} ORDER BY e.id"))
            .fetch_all(&self.pool)
            .await?;
        self.with_tags(rows).await
    }

    async fn delete(&self, id: i64) -> RepositoryResult<bool> {
        let result = sqlx::query("DELETE FROM events WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn search(&self, search: &EventSearch) -> RepositoryResult<Vec<Event>> {
        // strpos keeps `%` and `_` in the filters literal, unlike LIKE.
        let mut query = QueryBuilder::<Postgres>::new(EVENT_SELECT);
        query
            .push(" WHERE strpos(e.title, ")
            .push_bind(search.title.clone())
            .push(") > 0 AND strpos(e.location, ")
            .push_bind(search.location.clone())
            .push(") > 0");

        match search.dates {
            DateRange::Between(start, end) => {
                query
                    .push(" AND e.event_date BETWEEN ")
                    .push_bind(start)
                    .push(" AND ")
                    .push_bind(end);
            }
            DateRange::From(start) => {
                query.push(" AND e.event_date >= ").push_bind(start);
            }
            DateRange::Until(end) => {
                query.push(" AND e.event_date <= ").push_bind(end);
            }
            DateRange::Any => {}
        }
        query.push(" ORDER BY e.id");

        let rows = query
            .build_query_as::<EventRow>()
            .fetch_all(&self.pool)
            .await?;
        self.with_tags(rows).await
    }
}

#[derive(Debug, Default, Clone)]
pub struct InMemoryEventRepository {
    events: Arc<RwLock<MemoryTable<Event>>>,
}

impl InMemoryEventRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl EventRepository for InMemoryEventRepository {
    async fn save(&self, event: NewEvent) -> RepositoryResult<Event> {
        let mut events = self.events.write().await;
        Ok(events.insert_with(|id| event.into_event(id)))
    }

    async fn find_by_id(&self, id: i64) -> RepositoryResult<Option<Event>> {
        Ok(self.events.read().await.get(id))
    }

    async fn find_all(&self) -> RepositoryResult<Vec<Event>> {
        Ok(self.events.read().await.all())
    }

    async fn delete(&self, id: i64) -> RepositoryResult<bool> {
        Ok(self.events.write().await.remove(id))
    }

    async fn search(&self, search: &EventSearch) -> RepositoryResult<Vec<Event>> {
        let events = self.events.read().await;
        Ok(events
            .values()
            .filter(|event| search.matches(event))
            .cloned()
            .collect())
    }
}
