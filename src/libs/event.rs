use super::record::{require, EmptyField, Record, RecordKind};
use chrono::{DateTime, FixedOffset, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CalendarEvent {
    pub id: String,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub all_day: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewEvent {
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub all_day: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
}

impl NewEvent {
    pub fn new(title: &str, start: DateTime<Utc>, end: DateTime<Utc>) -> Self {
        Self {
            title: title.to_string(),
            description: None,
            start,
            end,
            all_day: None,
            location: None,
            category: None,
            color: None,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EventPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub all_day: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
}

impl Record for CalendarEvent {
    type Draft = NewEvent;
    type Patch = EventPatch;

    const KIND: RecordKind = RecordKind::Event;

    fn id(&self) -> &str {
        &self.id
    }

    fn set_id(&mut self, id: String) {
        self.id = id;
    }

    fn validate(draft: &NewEvent) -> Result<(), EmptyField> {
        require(Self::KIND, "title", &draft.title)
    }

    fn from_draft(id: String, draft: &NewEvent, _now: DateTime<Utc>) -> Self {
        CalendarEvent {
            id,
            title: draft.title.clone(),
            description: draft.description.clone(),
            start: draft.start,
            end: draft.end,
            all_day: draft.all_day,
            location: draft.location.clone(),
            category: draft.category.clone(),
            color: draft.color.clone(),
        }
    }

    fn apply(&mut self, patch: &EventPatch, _now: DateTime<Utc>) {
        if let Some(title) = &patch.title {
            self.title = title.clone();
        }
        if let Some(description) = &patch.description {
            self.description = Some(description.clone());
        }
        if let Some(start) = patch.start {
            self.start = start;
        }
        if let Some(end) = patch.end {
            self.end = end;
        }
        if let Some(all_day) = patch.all_day {
            self.all_day = Some(all_day);
        }
        if let Some(location) = &patch.location {
            self.location = Some(location.clone());
        }
        if let Some(category) = &patch.category {
            self.category = Some(category.clone());
        }
        if let Some(color) = &patch.color {
            self.color = Some(color.clone());
        }
    }
}

impl CalendarEvent {
    pub fn is_all_day(&self) -> bool {
        self.all_day.unwrap_or(false)
    }

    /// Calendar day the event starts on, in the viewer's time zone.
    pub fn start_date(&self, offset: &FixedOffset) -> NaiveDate {
        self.start.with_timezone(offset).date_naive()
    }

    pub fn end_date(&self, offset: &FixedOffset) -> NaiveDate {
        self.end.with_timezone(offset).date_naive()
    }
}
