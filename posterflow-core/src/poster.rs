//! The poster field record.
//!
//! `PosterState` is a flat, plain-data snapshot of one poster's editable
//! content. Serde field names match the stored document shape (`type`,
//! `themeColor`), so a serialized state is directly usable as the `details`
//! payload of a shared poster document.

use serde::{Deserialize, Serialize};

use crate::sanitize::strip_html;

/// Kind of event the poster advertises. Drives layout and AI prompts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EventType {
    Church,
    Party,
    Business,
    Funeral,
}

impl EventType {
    pub const ALL: [EventType; 4] = [
        EventType::Church,
        EventType::Party,
        EventType::Business,
        EventType::Funeral,
    ];

    /// Human-readable label as shown in the type picker.
    pub fn label(&self) -> &'static str {
        match self {
            EventType::Church => "Church",
            EventType::Party => "Party / Club",
            EventType::Business => "Seminar",
            EventType::Funeral => "Funeral",
        }
    }
}

/// Color theme applied to the composed poster.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ThemeColor {
    /// Auto-match the event type.
    Default,
    Gold,
    Blue,
    Red,
    Neon,
}

/// Textual poster fields addressable by name.
///
/// `image` is deliberately absent: it is a URI, never sanitized, and is set
/// through [`PosterState::set_image`] instead.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Field {
    Title,
    Date,
    Time,
    Venue,
    Description,
}

impl Field {
    /// Stable field name, matching the stored document keys.
    pub fn name(&self) -> &'static str {
        match self {
            Field::Title => "title",
            Field::Date => "date",
            Field::Time => "time",
            Field::Venue => "venue",
            Field::Description => "description",
        }
    }
}

/// One poster's editable content.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PosterState {
    #[serde(rename = "type")]
    pub event_type: EventType,
    pub title: String,
    pub date: String,
    pub time: String,
    pub venue: String,
    pub description: String,
    #[serde(rename = "themeColor")]
    pub theme_color: ThemeColor,
    /// Background image reference: URL or data URI. Never sanitized.
    pub image: Option<String>,
}

impl Default for PosterState {
    fn default() -> Self {
        Self {
            event_type: EventType::Church,
            title: String::new(),
            date: String::new(),
            time: String::new(),
            venue: String::new(),
            description: String::new(),
            theme_color: ThemeColor::Default,
            image: None,
        }
    }
}

impl PosterState {
    /// Seed a new session from a per-event-type starter template.
    pub fn template(event_type: EventType) -> Self {
        let (title, time, theme_color) = match event_type {
            EventType::Church => ("Sunday Service", "10:00 AM", ThemeColor::Gold),
            EventType::Party => ("All White Party", "9:00 PM", ThemeColor::Neon),
            EventType::Business => ("Business Seminar", "2:00 PM", ThemeColor::Blue),
            EventType::Funeral => ("In Loving Memory", "8:00 AM", ThemeColor::Red),
        };

        Self {
            event_type,
            title: title.to_string(),
            time: time.to_string(),
            theme_color,
            ..Self::default()
        }
    }

    /// Write a textual field, stripping HTML at intake.
    pub fn set_field(&mut self, field: Field, value: &str) {
        let clean = strip_html(value);
        match field {
            Field::Title => self.title = clean,
            Field::Date => self.date = clean,
            Field::Time => self.time = clean,
            Field::Venue => self.venue = clean,
            Field::Description => self.description = clean,
        }
    }

    /// Read a textual field.
    pub fn field(&self, field: Field) -> &str {
        match field {
            Field::Title => &self.title,
            Field::Date => &self.date,
            Field::Time => &self.time,
            Field::Venue => &self.venue,
            Field::Description => &self.description,
        }
    }

    /// Set the background image reference (URI, exempt from sanitization).
    pub fn set_image(&mut self, uri: Option<String>) {
        self.image = uri;
    }
}
