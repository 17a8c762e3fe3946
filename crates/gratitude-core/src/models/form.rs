use chrono::{NaiveDate, Utc};
use thiserror::Error;

use super::entry::CreateGratitudeEntryDto;
use super::values::{ValueOptions, BAD_HABITS_CATEGORY, EMOTIONS_CATEGORY, GOOD_HABITS_CATEGORY};

pub const MIN_RATING: u8 = 1;
pub const MAX_RATING: u8 = 10;
pub const DEFAULT_RATING: u8 = 5;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum FormError {
    #[error("Main story is required")]
    MissingStory,

    #[error("Day rating must be between 1 and 10, got {0}")]
    RatingOutOfRange(u8),

    #[error("'{value}' is not one of the configured {category}")]
    UnknownValue { category: &'static str, value: String },
}

/// State of the new-entry form
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntryForm {
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

impl Default for EntryForm {
    fn default() -> Self {
        Self::for_date(Utc::now().date_naive())
    }
}

impl EntryForm {
    pub fn for_date(date: NaiveDate) -> Self {
        Self {
            date,
            main_story: String::new(),
            day_rating: DEFAULT_RATING,
            emotions: Vec::new(),
            learnings: String::new(),
            gratitude_list: String::new(),
            mistakes: String::new(),
            people_in_mind: Vec::new(),
            good_habits: Vec::new(),
            bad_habits: Vec::new(),
        }
    }

    /// Set people from comma-separated input, e.g. "Sam, Alex"
    pub fn set_people_in_mind(&mut self, input: &str) {
        self.people_in_mind = split_list(input);
    }

    /// Back to a blank form for today
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// Check the form and build the create payload.
    ///
    /// Tags must come from the configured lists when the server sent any
    /// for that category; an empty list accepts anything.
    pub fn validate(&self, options: &ValueOptions) -> Result<CreateGratitudeEntryDto, FormError> {
        if self.main_story.trim().is_empty() {
            return Err(FormError::MissingStory);
        }
        if !(MIN_RATING..=MAX_RATING).contains(&self.day_rating) {
            return Err(FormError::RatingOutOfRange(self.day_rating));
        }
        check_selection(EMOTIONS_CATEGORY, &self.emotions, &options.emotions)?;
        check_selection(GOOD_HABITS_CATEGORY, &self.good_habits, &options.good_habits)?;
        check_selection(BAD_HABITS_CATEGORY, &self.bad_habits, &options.bad_habits)?;

        Ok(CreateGratitudeEntryDto {
            date: self.date,
            main_story: self.main_story.clone(),
            day_rating: self.day_rating,
            emotions: self.emotions.clone(),
            learnings: self.learnings.clone(),
            gratitude_list: self.gratitude_list.clone(),
            mistakes: self.mistakes.clone(),
            people_in_mind: self.people_in_mind.clone(),
            good_habits: self.good_habits.clone(),
            bad_habits: self.bad_habits.clone(),
        })
    }
}

/// Split comma-separated input, trimming items and dropping empty ones
pub fn split_list(input: &str) -> Vec<String> {
    input
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

fn check_selection(
    category: &'static str,
    selected: &[String],
    allowed: &[String],
) -> Result<(), FormError> {
    if allowed.is_empty() {
        return Ok(());
    }
    match selected.iter().find(|value| !allowed.contains(value)) {
        Some(value) => Err(FormError::UnknownValue {
            category,
            value: value.clone(),
        }),
        None => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn options() -> ValueOptions {
        ValueOptions {
            emotions: vec!["calm".to_string(), "joy".to_string()],
            good_habits: vec!["walk".to_string()],
            bad_habits: vec![],
        }
    }

    #[test]
    fn test_defaults() {
        let form = EntryForm::default();
        assert_eq!(form.date, Utc::now().date_naive());
        assert_eq!(form.day_rating, DEFAULT_RATING);
        assert!(form.main_story.is_empty());
        assert!(form.emotions.is_empty());
    }

    #[test]
    fn test_split_people() {
        let mut form = EntryForm::default();
        form.set_people_in_mind(" Sam,Alex , ,Jo ");
        assert_eq!(form.people_in_mind, vec!["Sam", "Alex", "Jo"]);

        form.set_people_in_mind("");
        assert!(form.people_in_mind.is_empty());
    }

    fn story_form() -> EntryForm {
        let mut form = EntryForm::default();
        form.main_story = "Coffee with Sam".to_string();
        form
    }

    #[test]
    fn test_story_is_required() {
        let mut form = EntryForm::default();
        assert_eq!(form.validate(&ValueOptions::default()), Err(FormError::MissingStory));

        form.main_story = " \n\t".to_string();
        assert_eq!(form.validate(&ValueOptions::default()), Err(FormError::MissingStory));

        form.main_story = "Coffee with Sam".to_string();
        assert!(form.validate(&ValueOptions::default()).is_ok());
    }

    #[test]
    fn test_rating_bounds() {
        let mut form = story_form();
        for rating in [MIN_RATING, MAX_RATING] {
            form.day_rating = rating;
            assert!(form.validate(&options()).is_ok());
        }
        for rating in [0, 11] {
            form.day_rating = rating;
            assert_eq!(form.validate(&options()), Err(FormError::RatingOutOfRange(rating)));
        }
    }

    #[test]
    fn test_selection_must_match_options() {
        let mut form = story_form();
        form.emotions = vec!["joy".to_string()];
        form.bad_habits = vec!["anything goes".to_string()];
        assert!(form.validate(&options()).is_ok());

        form.good_habits = vec!["run".to_string()];
        assert_eq!(
            form.validate(&options()),
            Err(FormError::UnknownValue {
                category: GOOD_HABITS_CATEGORY,
                value: "run".to_string()
            })
        );
    }

    #[test]
    fn test_validate_builds_dto_and_reset_clears() {
        let date = NaiveDate::from_ymd_opt(2024, 3, 1).expect("valid date");
        let mut form = EntryForm::for_date(date);
        form.main_story = "Walked by the river".to_string();
        form.day_rating = 9;
        form.set_people_in_mind("Sam");

        let dto = form.validate(&ValueOptions::default()).expect("valid form");
        assert_eq!(dto.date, date);
        assert_eq!(dto.day_rating, 9);
        assert_eq!(dto.people_in_mind, vec!["Sam"]);

        form.reset();
        assert_eq!(form, EntryForm::default());
    }
}
