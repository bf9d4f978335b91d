use tracing::debug;

use crate::error::Error;
use crate::registry::FieldRegistry;

/// Re-render request reported back to the hosting row list.
///
/// Mutating operations return one of these instead of reaching into the
/// renderer, so a single logical change produces a single layout pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RowUpdate {
    /// Nothing changed.
    None,

    /// Reload exactly this row.
    Row(usize),

    /// Reload every row.
    All,

    /// Reload every row and give input focus to this one.
    AllAndFocus(usize),
}

/// Tracks the global edit flag and drives per-row visibility.
///
/// Each date pair is a two-state machine, Collapsed (picker hidden, the
/// initial state) and Expanded; [`RowVisibility::toggle_accessory`] is the
/// only transition and flips between them for the lifetime of the form.
#[derive(Debug)]
pub struct RowVisibility {
    edits_enabled: bool,
}

impl Default for RowVisibility {
    fn default() -> Self {
        Self { edits_enabled: true }
    }
}

impl RowVisibility {
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether user input is currently accepted anywhere in the form.
    pub fn edits_enabled(&self) -> bool {
        self.edits_enabled
    }

    /// Layout height of a row: its fixed height while visible, 0 while hidden.
    pub fn height_for(&self, registry: &FieldRegistry, id: usize) -> Result<u16, Error> {
        let field = registry.field(id)?;
        Ok(if field.is_visible { field.row_height } else { 0 })
    }

    /// Flip the visibility of the accessory row paired with `label_id`.
    ///
    /// Only label rows with an accessory row toggle anything; on other rows
    /// this reports `RowUpdate::None`. The paired picker always sits at
    /// `label_id + 1`, and only that row is reloaded.
    pub fn toggle_accessory(
        &self,
        registry: &mut FieldRegistry,
        label_id: usize,
    ) -> Result<RowUpdate, Error> {
        if !registry.field(label_id)?.has_accessory_row {
            return Ok(RowUpdate::None);
        }

        let picker = registry.field_mut(label_id + 1)?;
        picker.is_visible = !picker.is_visible;
        debug!(
            row = label_id + 1,
            visible = picker.is_visible,
            "toggled accessory row"
        );
        Ok(RowUpdate::Row(label_id + 1))
    }

    /// Set `is_editable` on every descriptor.
    pub fn set_all_editable(&mut self, registry: &mut FieldRegistry, enabled: bool) {
        self.edits_enabled = enabled;
        for field in registry.iter_mut() {
            field.is_editable = enabled;
        }
    }

    /// Flip the global edit flag.
    ///
    /// Re-enabling asks the host to focus field 0 so the user can see that
    /// editing is back on.
    pub fn toggle_editable(&mut self, registry: &mut FieldRegistry) -> RowUpdate {
        let enabled = !self.edits_enabled;
        self.set_all_editable(registry, enabled);
        debug!(enabled, "toggled edit mode");
        if enabled {
            RowUpdate::AllAndFocus(0)
        } else {
            RowUpdate::All
        }
    }
}
