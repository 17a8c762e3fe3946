use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
#[cfg(feature = "ts")]
use ts_rs::TS;

/// A journal entry as stored by the server
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "ts", derive(TS), ts(export))]
#[serde(rename_all = "camelCase")]
pub struct GratitudeEntry {
    #[serde(rename = "_id")]
    pub id: String,
    pub date: String,
    #[serde(default)]
    pub main_story: String,
    pub day_rating: u8,
    #[serde(default)]
    pub emotions: Vec<String>,
    #[serde(default)]
    pub learnings: String,
    #[serde(default)]
    pub gratitude_list: String,
    #[serde(default)]
    pub mistakes: String,
    #[serde(default)]
    pub people_in_mind: Vec<String>,
    #[serde(default)]
    pub good_habits: Vec<String>,
    #[serde(default)]
    pub bad_habits: Vec<String>,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
    #[serde(rename = "__v", default)]
    pub version: i64,
}

impl GratitudeEntry {
    /// Calendar day of the entry.
    ///
    /// The server sends either a bare `YYYY-MM-DD` or a full ISO timestamp.
    pub fn day(&self) -> Option<NaiveDate> {
        let prefix = self.date.get(..10)?;
        NaiveDate::parse_from_str(prefix, "%Y-%m-%d").ok()
    }

    /// Rating rendered as filled and empty stars
    pub fn rating_display(&self) -> String {
        let filled = usize::from(self.day_rating.min(10));
        format!("{}{}", "★".repeat(filled), "☆".repeat(10 - filled))
    }
}

/// Payload for creating an entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "ts", derive(TS), ts(export))]
#[serde(rename_all = "camelCase")]
pub struct CreateGratitudeEntryDto {
    pub date: NaiveDate,
    pub main_story: String,
    pub day_rating: u8,
    pub emotions: Vec<String>,
    pub learnings: String,
    pub gratitude_list: String,
    pub mistakes: String,
    pub people_in_mind: Vec<String>,
    pub good_habits: Vec<String>,
    pub bad_habits: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_entry_with_missing_lists() {
        let json = r#"{"_id":"65f1","date":"2024-03-01T00:00:00.000Z","mainStory":"Quiet day","dayRating":6,"createdAt":"2024-03-01T20:15:00.000Z","updatedAt":"2024-03-01T20:15:00.000Z","__v":0}"#;
        let entry: GratitudeEntry = serde_json::from_str(json).expect("Failed to parse entry JSON");

        assert_eq!(entry.id, "65f1");
        assert!(entry.emotions.is_empty());
        assert!(entry.bad_habits.is_empty());
        assert_eq!(entry.day(), NaiveDate::from_ymd_opt(2024, 3, 1));
        assert!(entry.created_at.is_some());
    }

    #[test]
    fn test_day_from_bare_date_and_garbage() {
        let mut entry: GratitudeEntry =
            serde_json::from_str(r#"{"_id":"1","date":"2024-12-31","dayRating":1}"#).expect("parse");
        assert_eq!(entry.day(), NaiveDate::from_ymd_opt(2024, 12, 31));

        entry.date = "yesterday".to_string();
        assert_eq!(entry.day(), None);
    }

    #[test]
    fn test_rating_display() {
        let entry: GratitudeEntry =
            serde_json::from_str(r#"{"_id":"1","date":"2024-12-31","dayRating":3}"#).expect("parse");
        assert_eq!(entry.rating_display(), "★★★☆☆☆☆☆☆☆");
    }

    #[test]
    fn test_dto_serializes_date_only() {
        let dto = CreateGratitudeEntryDto {
            date: NaiveDate::from_ymd_opt(2024, 3, 1).expect("valid date"),
            main_story: String::new(),
            day_rating: 5,
            emotions: vec![],
            learnings: String::new(),
            gratitude_list: String::new(),
            mistakes: String::new(),
            people_in_mind: vec![],
            good_habits: vec![],
            bad_habits: vec![],
        };
        let json = serde_json::to_value(&dto).expect("serialize dto");
        assert_eq!(json["date"], "2024-03-01");
        assert_eq!(json["dayRating"], 5);
        assert!(json.get("peopleInMind").is_some());
    }
}
