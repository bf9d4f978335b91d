use std::collections::HashMap;

use tracing::debug;

use crate::error::Error;
use crate::field::{
    default_picker_date, parse_date_default, pretty_date, DateFieldTitle, FieldDescriptor,
    TextFieldTitle,
};

/// Ordered collection of form-field descriptors.
///
/// Ids are assigned densely in registration order and registration order is
/// display order; there is no removal or reordering. A date registration
/// appends two descriptors: the label row, then its picker accessory row at
/// the next id.
///
/// Titles double as submission map keys, so a secondary title-to-id index is
/// kept and duplicate titles are rejected at registration.
#[derive(Debug, Default)]
pub struct FieldRegistry {
    fields: Vec<FieldDescriptor>,
    title_index: HashMap<String, usize>,
}

impl FieldRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a text input row, returning its id.
    pub fn register_text(
        &mut self,
        title: TextFieldTitle,
        default_value: &str,
    ) -> Result<usize, Error> {
        self.claim_title(title.as_str())?;
        let id = self.fields.len();
        self.fields
            .push(FieldDescriptor::text_input(id, title.as_str(), default_value));
        debug!(id, title = title.as_str(), "registered text field");
        Ok(id)
    }

    /// Append a date label row followed by its picker row, returning the
    /// label's id; the picker always sits at label id + 1.
    ///
    /// An empty default leaves the label showing the raw title and the picker
    /// on today's date; otherwise the default must parse as
    /// `%Y-%m-%d %H:%M:%S %z` and the label shows its `%m/%d/%Y` rendering.
    pub fn register_date(
        &mut self,
        title: DateFieldTitle,
        default_value: &str,
    ) -> Result<usize, Error> {
        let (date, label_text) = if default_value.is_empty() {
            (default_picker_date(), title.as_str().to_string())
        } else {
            let date = parse_date_default(default_value)?;
            (date, pretty_date(&date))
        };

        self.claim_title(title.as_str())?;
        let label_id = self.fields.len();
        self.fields
            .push(FieldDescriptor::date_label(label_id, title.as_str(), label_text));
        self.fields
            .push(FieldDescriptor::date_picker(label_id + 1, title.as_str(), date));
        debug!(label_id, title = title.as_str(), "registered date field");
        Ok(label_id)
    }

    /// Number of descriptors; also the id the next registration will take.
    pub fn count(&self) -> usize {
        self.fields.len()
    }

    pub fn field(&self, id: usize) -> Result<&FieldDescriptor, Error> {
        self.fields.get(id).ok_or(Error::InvalidIndex {
            index: id,
            count: self.fields.len(),
        })
    }

    pub fn field_mut(&mut self, id: usize) -> Result<&mut FieldDescriptor, Error> {
        let count = self.fields.len();
        self.fields
            .get_mut(id)
            .ok_or(Error::InvalidIndex { index: id, count })
    }

    pub fn iter(&self) -> impl Iterator<Item = &FieldDescriptor> {
        self.fields.iter()
    }

    pub(crate) fn iter_mut(&mut self) -> impl Iterator<Item = &mut FieldDescriptor> {
        self.fields.iter_mut()
    }

    /// Id of the row registered under `title`; for a date field this is the
    /// label row.
    pub fn id_for_title(&self, title: &str) -> Option<usize> {
        self.title_index.get(title).copied()
    }

    /// Every descriptor's title in id order. A date pair contributes its
    /// shared title twice.
    pub fn titles_in_order(&self) -> Vec<&str> {
        self.fields.iter().map(|field| field.title.as_str()).collect()
    }

    fn claim_title(&mut self, title: &str) -> Result<(), Error> {
        if self.title_index.contains_key(title) {
            return Err(Error::DuplicateTitle {
                title: title.to_string(),
            });
        }
        self.title_index.insert(title.to_string(), self.fields.len());
        Ok(())
    }
}
