use anyhow::Result;
use crossterm::event::{self, Event, KeyCode, KeyEventKind, KeyModifiers};
use dotenvy::dotenv;
use ratatui::DefaultTerminal;
use simple_form::{
    ButtonItem, DateFieldTitle, Form, FormDelegate, FormView, MessagePopup, TextFieldTitle,
};
use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;
use std::time::Duration;

/// Demo configuration, read from the environment.
#[derive(Debug, Clone)]
struct DemoConfig {
    /// Navigation bar title (FORM_TITLE).
    title: String,

    /// Date-of-birth default in `%Y-%m-%d %H:%M:%S %z` form (FORM_DOB_DEFAULT);
    /// empty leaves the picker on today's date.
    dob_default: String,
}

impl DemoConfig {
    fn from_env() -> Self {
        let title = std::env::var("FORM_TITLE").unwrap_or_else(|_| "Contacts".to_string());
        let dob_default = std::env::var("FORM_DOB_DEFAULT").unwrap_or_default();
        Self { title, dob_default }
    }
}

/// Keeps the most recent submission where the app loop can reach it.
struct CapturingDelegate {
    last: Rc<RefCell<Option<HashMap<String, String>>>>,
}

impl FormDelegate for CapturingDelegate {
    fn handle_form_values(&mut self, values: &HashMap<String, String>) {
        tracing::info!(fields = values.len(), "form submitted");
        *self.last.borrow_mut() = Some(values.clone());
    }
}

fn main() -> Result<()> {
    // Load environment variables
    dotenv().ok();

    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    // Load configuration
    let cfg = DemoConfig::from_env();

    // Build the contact form
    let mut form = Form::new().with_navigation();
    form.set_title(&cfg.title)?;
    form.set_left_button_item(ButtonItem::new("Ctrl+E Edit"))?;
    form.set_right_button_item(ButtonItem::new("Ctrl+S Submit"))?;
    form.register_text_field(TextFieldTitle::FirstName, "")?;
    form.register_text_field(TextFieldTitle::LastName, "")?;
    form.register_text_field(TextFieldTitle::PhoneNumber, "")?;
    form.register_text_field(TextFieldTitle::ZipCode, "")?;
    form.register_date_field(DateFieldTitle::DateOfBirth, &cfg.dob_default)?;
    form.set_footer("[Tab] Next field  [Enter] Toggle date picker  [Esc] Quit");

    let submitted = Rc::new(RefCell::new(None));
    form.set_delegate(CapturingDelegate {
        last: Rc::clone(&submitted),
    });

    // Initialize terminal
    let mut terminal = ratatui::init();
    terminal.clear()?;

    let result = run(&mut terminal, &mut form, &submitted);

    // Restore terminal
    ratatui::restore();

    // Print the last submission as JSON once the terminal is back to normal.
    if let Some(values) = submitted.borrow().as_ref() {
        println!("{}", serde_json::to_string_pretty(values)?);
    }

    result
}

fn run(
    terminal: &mut DefaultTerminal,
    form: &mut Form,
    submitted: &Rc<RefCell<Option<HashMap<String, String>>>>,
) -> Result<()> {
    let mut view = FormView::new();
    let mut popup: Option<MessagePopup> = None;

    loop {
        terminal.draw(|frame| {
            let area = frame.area();
            view.render(frame, area, form);
            if let Some(popup) = &popup {
                popup.render(frame, area);
            }
        })?;

        // Handle input with timeout
        if event::poll(Duration::from_millis(100))? {
            if let Event::Key(key) = event::read()? {
                if key.kind != KeyEventKind::Press {
                    continue;
                }

                // Any key dismisses an open popup.
                if popup.take().is_some() {
                    continue;
                }

                match key.code {
                    KeyCode::Esc => return Ok(()),
                    KeyCode::Char('e') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                        let update = form.toggle_editable();
                        view.apply(form, update);
                    }
                    KeyCode::Char('s') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                        form.submit_form_data();
                        popup = submitted.borrow().as_ref().map(submission_popup);
                    }
                    _ => {
                        view.handle_key(form, key)?;
                    }
                }
            }
        }
    }
}

fn submission_popup(values: &HashMap<String, String>) -> MessagePopup {
    let mut lines: Vec<String> = values
        .iter()
        .map(|(title, value)| format!("{title}: {value}"))
        .collect();
    lines.sort();
    MessagePopup::new("Form Submitted", lines)
}
