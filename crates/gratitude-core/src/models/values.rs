use serde::{Deserialize, Serialize};
#[cfg(feature = "ts")]
use ts_rs::TS;

pub const EMOTIONS_CATEGORY: &str = "emotions";
pub const GOOD_HABITS_CATEGORY: &str = "goodHabits";
pub const BAD_HABITS_CATEGORY: &str = "badHabits";

/// One configurable value list, e.g. the emotions offered in the entry form
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "ts", derive(TS), ts(export))]
pub struct GeneralValues {
    pub category: String,
    #[serde(default)]
    pub values: Vec<String>,
}

/// The value lists the entry form chooses from
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValueOptions {
    pub emotions: Vec<String>,
    pub good_habits: Vec<String>,
    pub bad_habits: Vec<String>,
}

impl ValueOptions {
    /// Pick out the known categories. A missing category yields an empty list.
    pub fn from_general_values(values: &[GeneralValues]) -> Self {
        let find = |category: &str| {
            values
                .iter()
                .find(|v| v.category == category)
                .map(|v| v.values.clone())
                .unwrap_or_default()
        };
        Self {
            emotions: find(EMOTIONS_CATEGORY),
            good_habits: find(GOOD_HABITS_CATEGORY),
            bad_habits: find(BAD_HABITS_CATEGORY),
        }
    }

    /// Options for a category by its wire name
    pub fn for_category(&self, category: &str) -> Option<&[String]> {
        match category {
            EMOTIONS_CATEGORY => Some(self.emotions.as_slice()),
            GOOD_HABITS_CATEGORY => Some(self.good_habits.as_slice()),
            BAD_HABITS_CATEGORY => Some(self.bad_habits.as_slice()),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_general_values() {
        let json = r#"[{"category":"badHabits","values":["doomscrolling"]},{"category":"emotions","values":["calm","grateful"]},{"category":"colors","values":["red"]}]"#;
        let values: Vec<GeneralValues> = serde_json::from_str(json).expect("parse general values");
        let options = ValueOptions::from_general_values(&values);

        assert_eq!(options.emotions, vec!["calm", "grateful"]);
        assert!(options.good_habits.is_empty());
        assert_eq!(options.bad_habits, vec!["doomscrolling"]);
        assert_eq!(options.for_category("colors"), None);
        assert_eq!(options.for_category("emotions").map(<[String]>::len), Some(2));
    }

    #[test]
    fn test_first_duplicate_category_wins() {
        let values = vec![
            GeneralValues { category: "emotions".to_string(), values: vec!["a".to_string()] },
            GeneralValues { category: "emotions".to_string(), values: vec!["b".to_string()] },
        ];
        assert_eq!(ValueOptions::from_general_values(&values).emotions, vec!["a"]);
    }
}
