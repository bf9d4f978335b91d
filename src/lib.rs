pub mod error;
pub mod field;
pub mod form;
pub mod format;
pub mod registry;
pub mod view;
pub mod visibility;


pub use error::Error;
pub use field::{DateFieldTitle, FieldDescriptor, FieldKind, FieldValue, InputMode, TextFieldTitle};
pub use form::{ButtonItem, Form, FormDelegate, NavigationBar, TextEdit};
pub use format::format_phone_number;
pub use registry::FieldRegistry;
pub use view::{FormView, MessagePopup};
pub use visibility::{RowUpdate, RowVisibility};
