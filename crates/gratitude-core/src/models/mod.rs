//! Data models for journal entities.
//!
//! - `GratitudeEntry`, `CreateGratitudeEntryDto`: entries as read from and
//!   sent to the server
//! - `GeneralValues`, `ValueOptions`: the configurable emotion/habit lists
//! - `EntryForm`: state and validation of the new-entry form

pub mod entry;
pub mod form;
pub mod values;

pub use entry::{CreateGratitudeEntryDto, GratitudeEntry};
pub use form::{split_list, EntryForm, FormError, DEFAULT_RATING, MAX_RATING, MIN_RATING};
pub use values::{GeneralValues, ValueOptions};
