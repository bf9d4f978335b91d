use std::collections::HashMap;

use chrono::{DateTime, FixedOffset};
use tracing::debug;

use crate::error::Error;
use crate::field::{
    pretty_date, DateFieldTitle, FieldDescriptor, FieldKind, FieldValue, InputMode, TextFieldTitle,
};
use crate::format::{digit_validator, format_phone_number};
use crate::registry::FieldRegistry;
use crate::visibility::{RowUpdate, RowVisibility};

/// Receives the collected field values when the form is submitted.
///
/// Invoked once per [`Form::submit_form_data`] call, synchronously, with one
/// entry per text and picker row keyed by registration title.
pub trait FormDelegate {
    fn handle_form_values(&mut self, values: &HashMap<String, String>);
}

/// A labeled item shown at the edge of the navigation bar.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ButtonItem {
    pub label: String,
}

impl ButtonItem {
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
        }
    }
}

/// Title and button chrome above the row list.
///
/// Only present when the form was embedded in a navigation bar; the title
/// and button setters fail without one.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NavigationBar {
    pub title: Option<String>,
    pub left_button: Option<ButtonItem>,
    pub right_button: Option<ButtonItem>,
}

/// A raw text edit delivered by the hosting input loop.
///
/// The form, not the host, owns the resulting text: phone rows reformat the
/// candidate string through the mask and hand back the final display value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextEdit {
    Insert(char),
    DeleteBackward,
}

/// Scrollable list of labeled input rows bound into a map of field values.
///
/// Owns one [`FieldRegistry`] and one [`RowVisibility`]; neither is shared
/// across forms or threads, and every mutation happens synchronously in
/// response to a host event. Mutating calls report a [`RowUpdate`] the host
/// applies in a single layout pass.
pub struct Form {
    registry: FieldRegistry,
    visibility: RowVisibility,
    navigation: Option<NavigationBar>,
    footer: Option<String>,
    delegate: Option<Box<dyn FormDelegate>>,
}

impl Default for Form {
    fn default() -> Self {
        Self::new()
    }
}

impl Form {
    pub fn new() -> Self {
        Self {
            registry: FieldRegistry::new(),
            visibility: RowVisibility::new(),
            navigation: None,
            footer: None,
            delegate: None,
        }
    }

    /// Embed the form in a navigation bar, enabling the title and button
    /// setters.
    pub fn with_navigation(mut self) -> Self {
        self.navigation = Some(NavigationBar::default());
        self
    }

    pub fn set_delegate(&mut self, delegate: impl FormDelegate + 'static) {
        self.delegate = Some(Box::new(delegate));
    }

    /// Append a text input row, returning its id.
    pub fn register_text_field(
        &mut self,
        title: TextFieldTitle,
        default_value: &str,
    ) -> Result<usize, Error> {
        self.registry.register_text(title, default_value)
    }

    /// Append a date label row plus its hidden picker row, returning the
    /// label's id.
    pub fn register_date_field(
        &mut self,
        title: DateFieldTitle,
        default_value: &str,
    ) -> Result<usize, Error> {
        self.registry.register_date(title, default_value)
    }

    pub fn number_of_fields(&self) -> usize {
        self.registry.count()
    }

    /// Every descriptor's title in id order, for inspection.
    pub fn titles_in_order(&self) -> Vec<&str> {
        self.registry.titles_in_order()
    }

    /// Flip edit mode for every row. Re-enabling asks the host to focus
    /// field 0.
    pub fn toggle_editable(&mut self) -> RowUpdate {
        self.visibility.toggle_editable(&mut self.registry)
    }

    pub fn edits_enabled(&self) -> bool {
        self.visibility.edits_enabled()
    }

    pub fn set_title(&mut self, title: &str) -> Result<(), Error> {
        self.navigation_mut("set its title")?.title = Some(title.to_string());
        Ok(())
    }

    pub fn set_left_button_item(&mut self, item: ButtonItem) -> Result<(), Error> {
        self.navigation_mut("set its left button item")?.left_button = Some(item);
        Ok(())
    }

    pub fn set_right_button_item(&mut self, item: ButtonItem) -> Result<(), Error> {
        self.navigation_mut("set its right button item")?.right_button = Some(item);
        Ok(())
    }

    pub fn navigation(&self) -> Option<&NavigationBar> {
        self.navigation.as_ref()
    }

    /// Attach a trailing decorative line below the row list.
    pub fn set_footer(&mut self, footer: impl Into<String>) {
        self.footer = Some(footer.into());
    }

    pub fn footer(&self) -> Option<&str> {
        self.footer.as_deref()
    }

    /// Collect current values in id order and hand them to the delegate.
    ///
    /// Text rows contribute their literal text; picker rows the default
    /// `Display` rendering of their date, keyed by the title shared with
    /// their label row. Without a delegate this is a silent no-op.
    pub fn submit_form_data(&mut self) {
        let mut values = HashMap::new();
        for field in self.registry.iter() {
            if let Some(value) = field.submission_value() {
                values.insert(field.title.clone(), value);
            }
        }

        if let Some(delegate) = self.delegate.as_mut() {
            debug!(fields = values.len(), "submitting form values");
            delegate.handle_form_values(&values);
        }
    }

    // Row-list query surface.

    pub fn row_count(&self) -> usize {
        self.registry.count()
    }

    pub fn row_height(&self, id: usize) -> Result<u16, Error> {
        self.visibility.height_for(&self.registry, id)
    }

    pub fn row_content(&self, id: usize) -> Result<&FieldDescriptor, Error> {
        self.registry.field(id)
    }

    /// Apply a keystroke to a text row.
    ///
    /// Phone rows intercept the raw edit: the candidate string is run through
    /// the mask (dropping the last logical digit on deletion) and the masked
    /// result becomes the display value. Numeric rows accept ASCII digits
    /// only. Ignored while editing is disabled or on non-text rows.
    pub fn handle_text_edit(&mut self, id: usize, edit: TextEdit) -> Result<RowUpdate, Error> {
        let field = self.registry.field(id)?;
        if field.kind != FieldKind::TextInput || !field.is_editable {
            return Ok(RowUpdate::None);
        }

        let mut value = field.text().to_string();
        let new_value = match (field.input_mode, edit) {
            (InputMode::Phone, TextEdit::Insert(c)) => {
                value.push(c);
                format_phone_number(&value, false)
            }
            (InputMode::Phone, TextEdit::DeleteBackward) => format_phone_number(&value, true),
            (InputMode::Numeric, TextEdit::Insert(c)) => {
                if !digit_validator(c) {
                    return Ok(RowUpdate::None);
                }
                value.push(c);
                value
            }
            (_, TextEdit::Insert(c)) => {
                value.push(c);
                value
            }
            (_, TextEdit::DeleteBackward) => {
                value.pop();
                value
            }
        };

        self.registry.field_mut(id)?.value = FieldValue::Text(new_value);
        Ok(RowUpdate::Row(id))
    }

    /// Store a new picker date and rewrite the paired label row.
    pub fn handle_date_changed(
        &mut self,
        id: usize,
        date: DateTime<FixedOffset>,
    ) -> Result<RowUpdate, Error> {
        let field = self.registry.field(id)?;
        if field.kind != FieldKind::DatePicker || !field.is_editable {
            return Ok(RowUpdate::None);
        }

        self.registry.field_mut(id)?.value = FieldValue::Date(date);

        // The paired label always sits directly above the picker.
        let label_id = id - 1;
        self.registry.field_mut(label_id)?.value = FieldValue::Text(pretty_date(&date));
        Ok(RowUpdate::Row(label_id))
    }

    /// A tap on a label row toggles its accessory picker. Ignored while
    /// editing is disabled.
    pub fn handle_tap(&mut self, id: usize) -> Result<RowUpdate, Error> {
        if !self.registry.field(id)?.is_editable {
            return Ok(RowUpdate::None);
        }
        self.visibility.toggle_accessory(&mut self.registry, id)
    }

    fn navigation_mut(&mut self, operation: &'static str) -> Result<&mut NavigationBar, Error> {
        self.navigation
            .as_mut()
            .ok_or(Error::NotEmbeddedInNavigation { operation })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::field::parse_date_default;
    use std::cell::RefCell;
    use std::rc::Rc;

    /// Records every delegate invocation for inspection.
    struct RecordingDelegate {
        calls: Rc<RefCell<Vec<HashMap<String, String>>>>,
    }

    fn recording_delegate() -> (RecordingDelegate, Rc<RefCell<Vec<HashMap<String, String>>>>) {
        let calls = Rc::new(RefCell::new(Vec::new()));
        (
            RecordingDelegate {
                calls: Rc::clone(&calls),
            },
            calls,
        )
    }

    impl FormDelegate for RecordingDelegate {
        fn handle_form_values(&mut self, values: &HashMap<String, String>) {
            self.calls.borrow_mut().push(values.clone());
        }
    }

    fn type_string(form: &mut Form, id: usize, text: &str) {
        for c in text.chars() {
            form.handle_text_edit(id, TextEdit::Insert(c)).unwrap();
        }
    }

    #[test]
    fn test_each_date_registration_contributes_two_fields() {
        let mut form = Form::new();
        form.register_text_field(TextFieldTitle::FirstName, "").unwrap();
        form.register_text_field(TextFieldTitle::LastName, "").unwrap();
        form.register_date_field(DateFieldTitle::DateOfBirth, "").unwrap();
        assert_eq!(form.number_of_fields(), 4);
        assert_eq!(form.row_count(), 4);
    }

    #[test]
    fn test_submit_invokes_delegate_exactly_once() {
        let (delegate, calls) = recording_delegate();
        let mut form = Form::new();
        form.register_text_field(TextFieldTitle::FirstName, "Blu").unwrap();
        form.set_delegate(delegate);

        form.submit_form_data();

        let calls = calls.borrow();
        assert_eq!(calls.len(), 1);
        assert_eq!(
            calls[0],
            HashMap::from([("First Name".to_string(), "Blu".to_string())])
        );
    }

    #[test]
    fn test_submit_emits_picker_value_under_date_title() {
        let (delegate, calls) = recording_delegate();
        let mut form = Form::new();
        form.register_text_field(TextFieldTitle::FirstName, "Blu").unwrap();
        form.register_date_field(DateFieldTitle::DateOfBirth, "2018-08-06 11:00:00 +0000")
            .unwrap();
        form.set_delegate(delegate);

        form.submit_form_data();

        let calls = calls.borrow();
        assert_eq!(calls.len(), 1);
        // One entry per text/picker row; the label row contributes nothing.
        assert_eq!(calls[0].len(), 2);
        assert_eq!(
            calls[0]["Date of Birth"],
            "2018-08-06 11:00:00 +00:00".to_string()
        );
    }

    #[test]
    fn test_submit_without_delegate_is_a_no_op() {
        let mut form = Form::new();
        form.register_text_field(TextFieldTitle::FirstName, "Blu").unwrap();
        form.submit_form_data();
    }

    #[test]
    fn test_phone_row_masks_while_typing() {
        let mut form = Form::new();
        let id = form
            .register_text_field(TextFieldTitle::PhoneNumber, "")
            .unwrap();

        type_string(&mut form, id, "7731234567");
        assert_eq!(form.row_content(id).unwrap().text(), "(773) 123-4567");
    }

    #[test]
    fn test_phone_row_deletion_drops_a_logical_digit() {
        let mut form = Form::new();
        let id = form
            .register_text_field(TextFieldTitle::PhoneNumber, "")
            .unwrap();

        type_string(&mut form, id, "77312345");
        assert_eq!(form.row_content(id).unwrap().text(), "(773) 123-45");

        form.handle_text_edit(id, TextEdit::DeleteBackward).unwrap();
        assert_eq!(form.row_content(id).unwrap().text(), "(773) 123-4");
    }

    #[test]
    fn test_numeric_row_rejects_non_digits() {
        let mut form = Form::new();
        let id = form.register_text_field(TextFieldTitle::ZipCode, "").unwrap();

        let update = form.handle_text_edit(id, TextEdit::Insert('x')).unwrap();
        assert_eq!(update, RowUpdate::None);
        assert_eq!(form.row_content(id).unwrap().text(), "");

        type_string(&mut form, id, "60614");
        assert_eq!(form.row_content(id).unwrap().text(), "60614");
    }

    #[test]
    fn test_text_edit_ignored_while_editing_disabled() {
        let mut form = Form::new();
        let id = form
            .register_text_field(TextFieldTitle::FirstName, "Blu")
            .unwrap();
        form.toggle_editable();

        let update = form.handle_text_edit(id, TextEdit::Insert('e')).unwrap();
        assert_eq!(update, RowUpdate::None);
        assert_eq!(form.row_content(id).unwrap().text(), "Blu");
    }

    #[test]
    fn test_tap_toggles_the_paired_picker() {
        let mut form = Form::new();
        let label_id = form
            .register_date_field(DateFieldTitle::DateOfBirth, "")
            .unwrap();

        assert_eq!(form.handle_tap(label_id).unwrap(), RowUpdate::Row(label_id + 1));
        assert!(form.row_content(label_id + 1).unwrap().is_visible);

        assert_eq!(form.handle_tap(label_id).unwrap(), RowUpdate::Row(label_id + 1));
        assert!(!form.row_content(label_id + 1).unwrap().is_visible);
    }

    #[test]
    fn test_tap_ignored_while_editing_disabled() {
        let mut form = Form::new();
        let label_id = form
            .register_date_field(DateFieldTitle::DateOfBirth, "")
            .unwrap();
        form.toggle_editable();

        assert_eq!(form.handle_tap(label_id).unwrap(), RowUpdate::None);
        assert!(!form.row_content(label_id + 1).unwrap().is_visible);
    }

    #[test]
    fn test_date_change_rewrites_the_label() {
        let mut form = Form::new();
        let label_id = form
            .register_date_field(DateFieldTitle::DateOfBirth, "2018-08-06 11:00:00 +0000")
            .unwrap();
        let picker_id = label_id + 1;

        let date = parse_date_default("1990-01-02 00:00:00 +0000").unwrap();
        let update = form.handle_date_changed(picker_id, date).unwrap();

        assert_eq!(update, RowUpdate::Row(label_id));
        assert_eq!(form.row_content(label_id).unwrap().text(), "01/02/1990");
        assert_eq!(form.row_content(picker_id).unwrap().date(), Some(date));
    }

    #[test]
    fn test_title_requires_navigation_bar() {
        let mut form = Form::new();
        let err = form.set_title("Contacts").unwrap_err();
        assert!(matches!(err, Error::NotEmbeddedInNavigation { .. }));

        let mut form = Form::new().with_navigation();
        form.set_title("Contacts").unwrap();
        form.set_left_button_item(ButtonItem::new("Edit")).unwrap();
        form.set_right_button_item(ButtonItem::new("Submit")).unwrap();

        let nav = form.navigation().unwrap();
        assert_eq!(nav.title.as_deref(), Some("Contacts"));
        assert_eq!(nav.left_button.as_ref().unwrap().label, "Edit");
        assert_eq!(nav.right_button.as_ref().unwrap().label, "Submit");
    }

    #[test]
    fn test_footer_is_attached() {
        let mut form = Form::new();
        assert_eq!(form.footer(), None);
        form.set_footer("A Button");
        assert_eq!(form.footer(), Some("A Button"));
    }
}
