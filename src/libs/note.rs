use super::record::{require, EmptyField, Record, RecordKind};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Note {
    pub id: String,
    pub title: String,
    pub content: String,
    #[serde(default = "Utc::now")]
    pub created_at: DateTime<Utc>,
    #[serde(default = "Utc::now")]
    pub updated_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tags: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewNote {
    pub title: String,
    pub content: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tags: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
}

impl NewNote {
    pub fn new(title: &str, content: &str) -> Self {
        Self {
            title: title.to_string(),
            content: content.to_string(),
            ..Default::default()
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NotePatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tags: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
}

impl Record for Note {
    type Draft = NewNote;
    type Patch = NotePatch;

    const KIND: RecordKind = RecordKind::Note;

    fn id(&self) -> &str {
        &self.id
    }

    fn set_id(&mut self, id: String) {
        self.id = id;
    }

    fn validate(draft: &NewNote) -> Result<(), EmptyField> {
        require(Self::KIND, "title", &draft.title)?;
        require(Self::KIND, "content", &draft.content)
    }

    fn from_draft(id: String, draft: &NewNote, now: DateTime<Utc>) -> Self {
        Note {
            id,
            title: draft.title.clone(),
            content: draft.content.clone(),
            created_at: now,
            updated_at: now,
            tags: draft.tags.clone(),
            category: draft.category.clone(),
        }
    }

    /// Notes are the only kind that stamp a modification time on edit.
    fn apply(&mut self, patch: &NotePatch, now: DateTime<Utc>) {
        if let Some(title) = &patch.title {
            self.title = title.clone();
        }
        if let Some(content) = &patch.content {
            self.content = content.clone();
        }
        if let Some(tags) = &patch.tags {
            self.tags = Some(tags.clone());
        }
        if let Some(category) = &patch.category {
            self.category = Some(category.clone());
        }
        self.updated_at = now;
    }
}

/// Notes matching `query` (case-insensitive, title or content) and the
/// optional category, most recently edited first.
pub fn search_notes(notes: &[Note], query: &str, category: Option<&str>) -> Vec<Note> {
    let needle = query.trim().to_lowercase();
    let mut found: Vec<Note> = notes
        .iter()
        .filter(|note| needle.is_empty() || note.title.to_lowercase().contains(&needle) || note.content.to_lowercase().contains(&needle))
        .filter(|note| category.map_or(true, |c| note.category.as_deref() == Some(c)))
        .cloned()
        .collect();
    found.sort_by(|a, b| b.updated_at.cmp(&a.updated_at));
    found
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    #[test]
    fn test_validate_requires_content() {
        assert!(Note::validate(&NewNote::new("Title", "")).is_err());
        assert!(Note::validate(&NewNote::new("", "Body")).is_err());
        assert!(Note::validate(&NewNote::new("Title", "Body")).is_ok());
    }

    #[test]
    fn test_apply_stamps_updated_at() {
        let created = Utc::now() - Duration::hours(1);
        let mut note = Note::from_draft("n1".to_string(), &NewNote::new("a", "b"), created);
        assert_eq!(note.updated_at, note.created_at);

        let now = Utc::now();
        note.apply(
            &NotePatch {
                content: Some("c".to_string()),
                ..Default::default()
            },
            now,
        );
        assert_eq!(note.content, "c");
        assert_eq!(note.title, "a");
        assert_eq!(note.updated_at, now);
        assert_eq!(note.created_at, created);
    }

    #[test]
    fn test_search_notes() {
        let now = Utc::now();
        let older = Note::from_draft("1".to_string(), &NewNote::new("Groceries", "milk, eggs"), now - Duration::days(1));
        let newer = Note::from_draft("2".to_string(), &NewNote::new("Ideas", "Buy a MILK frother"), now);
        let notes = vec![older, newer];

        let ids: Vec<String> = search_notes(&notes, "milk", None).into_iter().map(|n| n.id).collect();
        assert_eq!(ids, vec!["2", "1"]);
        assert_eq!(search_notes(&notes, "ideas", None).len(), 1);
        assert!(search_notes(&notes, "", Some("work")).is_empty());
    }
}
