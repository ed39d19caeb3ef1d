use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};

use crate::models::{Organization, Tag};
use crate::utils::datetime::time_format;

/// An event as returned by the API, with its organization and tags resolved.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Event {
    pub id: i64,
    pub title: String,
    pub description: Option<String>,
    pub date: NaiveDate,
    #[serde(with = "time_format")]
    pub time: NaiveTime,
    pub location: String,
    pub organization: Organization,
    pub tags: Vec<Tag>,
}

/// A validated event that has not been persisted yet.
#[derive(Debug, Clone)]
pub struct NewEvent {
    pub title: String,
    pub description: Option<String>,
    pub date: NaiveDate,
    pub time: NaiveTime,
    pub location: String,
    pub organization: Organization,
    pub tags: Vec<Tag>,
}

impl NewEvent {
    pub fn into_event(self, id: i64) -> Event {
        Event {
            id,
            title: self.title,
            description: self.description,
            date: self.date,
            time: self.time,
            location: self.location,
            organization: self.organization,
            tags: self.tags,
        }
    }
}
