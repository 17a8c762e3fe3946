//! Plain-text rendering of entries and value lists.

use gratitude_core::models::{GratitudeEntry, ValueOptions};

/// Width of the story preview in the entry list
const PREVIEW_LEN: usize = 60;

/// Truncate a string to a maximum length, adding ellipsis if needed
pub fn truncate(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else if max_len <= 3 {
        s.chars().take(max_len).collect()
    } else {
        let truncated: String = s.chars().take(max_len - 3).collect();
        format!("{}...", truncated)
    }
}

fn day_label(entry: &GratitudeEntry) -> String {
    entry
        .day()
        .map(|d| d.format("%b %d, %Y").to_string())
        .unwrap_or_else(|| entry.date.clone())
}

/// One line per entry, newest first
pub fn entry_list(entries: &[GratitudeEntry]) -> String {
    if entries.is_empty() {
        return "No entries yet".to_string();
    }
    let mut sorted: Vec<&GratitudeEntry> = entries.iter().collect();
    sorted.sort_by(|a, b| b.date.cmp(&a.date));

    sorted
        .iter()
        .map(|e| {
            format!(
                "{:<14} {:>2}/10  {}  [{}]",
                day_label(e),
                e.day_rating,
                truncate(&e.main_story, PREVIEW_LEN),
                e.id
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

fn push_field(out: &mut Vec<String>, label: &str, value: &str) {
    if !value.trim().is_empty() {
        out.push(format!("{}: {}", label, value));
    }
}

fn push_tags(out: &mut Vec<String>, label: &str, values: &[String]) {
    if !values.is_empty() {
        out.push(format!("{}: {}", label, values.join(", ")));
    }
}

/// Full view of one entry
pub fn entry_detail(entry: &GratitudeEntry) -> String {
    let mut out = vec![
        day_label(entry),
        format!("Rating: {} ({}/10)", entry.rating_display(), entry.day_rating),
    ];
    push_field(&mut out, "Story", &entry.main_story);
    push_field(&mut out, "Grateful for", &entry.gratitude_list);
    push_field(&mut out, "Learnings", &entry.learnings);
    push_field(&mut out, "Mistakes", &entry.mistakes);
    push_tags(&mut out, "Emotions", &entry.emotions);
    push_tags(&mut out, "People in mind", &entry.people_in_mind);
    push_tags(&mut out, "Good habits", &entry.good_habits);
    push_tags(&mut out, "Bad habits", &entry.bad_habits);
    out.join("\n")
}

pub fn value_options(options: &ValueOptions) -> String {
    let line = |label: &str, values: &[String]| {
        if values.is_empty() {
            format!("{}: (none)", label)
        } else {
            format!("{}: {}", label, values.join(", "))
        }
    };
    [
        line("Emotions", &options.emotions),
        line("Good habits", &options.good_habits),
        line("Bad habits", &options.bad_habits),
    ]
    .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(id: &str, date: &str, story: &str) -> GratitudeEntry {
        serde_json::from_value(serde_json::json!({
            "_id": id,
            "date": date,
            "mainStory": story,
            "dayRating": 7,
            "emotions": ["calm"],
        }))
        .expect("valid entry")
    }

    #[test]
    fn test_truncate() {
        assert_eq!(truncate("short", 10), "short");
        assert_eq!(truncate("a longer story", 8), "a lon...");
        assert_eq!(truncate("abcdef", 2), "ab");
        assert_eq!(truncate("ééééé", 4), "é...");
    }

    #[test]
    fn test_entry_list_newest_first() {
        let entries = vec![
            entry("1", "2024-03-01T00:00:00.000Z", "first"),
            entry("2", "2024-03-05T00:00:00.000Z", "second"),
        ];
        let out = entry_list(&entries);
        let lines: Vec<&str> = out.lines().collect();
        assert!(lines[0].starts_with("Mar 05, 2024"));
        assert!(lines[0].ends_with("[2]"));
        assert!(lines[1].contains("first"));

        assert_eq!(entry_list(&[]), "No entries yet");
    }

    #[test]
    fn test_entry_detail_skips_empty_fields() {
        let out = entry_detail(&entry("1", "2024-03-01", "Walked"));
        assert!(out.contains("Story: Walked"));
        assert!(out.contains("Emotions: calm"));
        assert!(!out.contains("Mistakes"));
        assert!(out.contains("(7/10)"));
    }
}
