pub mod event;
pub mod organization;
pub mod tag;

pub use event::{Event, NewEvent};
pub use organization::{NewOrganization, Organization};
pub use tag::{NewTag, Tag};
