use chrono::{DateTime, FixedOffset, Local};

use crate::error::Error;

/// Layout height of text and date-label rows, in layout units.
pub const DEFAULT_ROW_HEIGHT: u16 = 40;

/// Layout height of an expanded date-picker row, in layout units.
pub const DATE_PICKER_ROW_HEIGHT: u16 = 157;

/// Format accepted for date defaults handed to registration,
/// e.g. `2018-08-06 11:00:00 +0000`.
const DATE_DEFAULT_FORMAT: &str = "%Y-%m-%d %H:%M:%S %z";

/// Format used to display a date on its label row.
const DATE_DISPLAY_FORMAT: &str = "%m/%d/%Y";

/// Titles available for text field registration.
///
/// Input behavior is keyed by the exact title string (see [`InputMode`]),
/// so the set of titles is closed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextFieldTitle {
    FirstName,
    LastName,
    ZipCode,
    PhoneNumber,
}

impl TextFieldTitle {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::FirstName => "First Name",
            Self::LastName => "Last Name",
            Self::ZipCode => "Zip Code",
            Self::PhoneNumber => "Phone Number",
        }
    }
}

/// Titles available for date field registration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DateFieldTitle {
    DateOfBirth,
}

impl DateFieldTitle {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::DateOfBirth => "Date of Birth",
        }
    }
}

/// Input handling applied to a text row.
///
/// Selected by exact title match, not by an explicit mode parameter:
/// "Zip Code" gets digit-only input, "Phone Number" gets live masking.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputMode {
    Text,
    Numeric,
    Phone,
}

impl InputMode {
    /// Pick the input mode for a registration title.
    pub fn for_title(title: &str) -> Self {
        if title == TextFieldTitle::ZipCode.as_str() {
            Self::Numeric
        } else if title == TextFieldTitle::PhoneNumber.as_str() {
            Self::Phone
        } else {
            Self::Text
        }
    }
}

/// The three row kinds a form can contain.
///
/// A date registration produces a `DateLabel` row immediately followed by its
/// `DatePicker` accessory row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    TextInput,
    DateLabel,
    DatePicker,
}

/// Current value of a row.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    Text(String),
    Date(DateTime<FixedOffset>),
}

/// One row's data and metadata.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldDescriptor {
    /// Stable ordinal position: row index at registration time, never reused.
    pub id: usize,

    pub kind: FieldKind,

    /// Display label and submission map key.
    pub title: String,

    pub value: FieldValue,

    /// Shown on empty text rows; equal to the title.
    pub placeholder: String,

    pub input_mode: InputMode,

    /// Fixed per kind: 40 for text and label rows, 157 for the picker.
    pub row_height: u16,

    /// True only for a `DateLabel`; marks that the following row is its
    /// paired `DatePicker`.
    pub has_accessory_row: bool,

    /// Whether the row currently renders at non-zero height.
    pub is_visible: bool,

    /// Whether user input is accepted; toggled globally.
    pub is_editable: bool,
}

impl FieldDescriptor {
    /// Build a text input row.
    pub fn text_input(id: usize, title: &str, default_value: &str) -> Self {
        Self {
            id,
            kind: FieldKind::TextInput,
            title: title.to_string(),
            value: FieldValue::Text(default_value.to_string()),
            placeholder: title.to_string(),
            input_mode: InputMode::for_title(title),
            row_height: DEFAULT_ROW_HEIGHT,
            has_accessory_row: false,
            is_visible: true,
            is_editable: true,
        }
    }

    /// Build a date label row; `text` is the reformatted default or the raw
    /// title when no default was given.
    pub fn date_label(id: usize, title: &str, text: String) -> Self {
        Self {
            id,
            kind: FieldKind::DateLabel,
            title: title.to_string(),
            value: FieldValue::Text(text),
            placeholder: title.to_string(),
            input_mode: InputMode::Text,
            row_height: DEFAULT_ROW_HEIGHT,
            has_accessory_row: true,
            is_visible: true,
            is_editable: true,
        }
    }

    /// Build the picker row paired with a date label. Starts hidden.
    pub fn date_picker(id: usize, title: &str, date: DateTime<FixedOffset>) -> Self {
        Self {
            id,
            kind: FieldKind::DatePicker,
            title: title.to_string(),
            value: FieldValue::Date(date),
            placeholder: title.to_string(),
            input_mode: InputMode::Text,
            row_height: DATE_PICKER_ROW_HEIGHT,
            has_accessory_row: false,
            is_visible: false,
            is_editable: true,
        }
    }

    /// Text content of the row, empty for a picker.
    pub fn text(&self) -> &str {
        match &self.value {
            FieldValue::Text(text) => text,
            FieldValue::Date(_) => "",
        }
    }

    /// Date content of the row, `None` for text rows.
    pub fn date(&self) -> Option<DateTime<FixedOffset>> {
        match &self.value {
            FieldValue::Text(_) => None,
            FieldValue::Date(date) => Some(*date),
        }
    }

    /// The value this row contributes to a submission.
    ///
    /// Text rows contribute their literal text and pickers the default
    /// `Display` rendering of their date; label rows contribute nothing,
    /// since the paired picker carries the date under the same title.
    pub fn submission_value(&self) -> Option<String> {
        match self.kind {
            FieldKind::TextInput => Some(self.text().to_string()),
            FieldKind::DatePicker => self.date().map(|date| date.to_string()),
            FieldKind::DateLabel => None,
        }
    }
}

/// Parse a registration date default.
///
/// Accepts `%Y-%m-%d %H:%M:%S %z` only. Note the asymmetry with submission:
/// submitted picker values are emitted as chrono's default `Display`
/// rendering (`2018-08-06 11:00:00 +00:00`), which is not re-parseable by
/// this function.
pub fn parse_date_default(value: &str) -> Result<DateTime<FixedOffset>, Error> {
    DateTime::parse_from_str(value, DATE_DEFAULT_FORMAT).map_err(|_| Error::InvalidDateFormat {
        value: value.to_string(),
    })
}

/// Render a date the way label rows display it, e.g. `08/06/2018`.
pub fn pretty_date(date: &DateTime<FixedOffset>) -> String {
    date.format(DATE_DISPLAY_FORMAT).to_string()
}

/// Initial picker value when no default was registered.
pub fn default_picker_date() -> DateTime<FixedOffset> {
    Local::now().fixed_offset()
}
