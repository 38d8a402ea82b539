//! @acp:module "Form Engine"
//! @acp:summary "Abstract interactive form the metadata collector talks to"
//! @acp:domain cli
//! @acp:layer api

use crate::error::Result;

/// Field-level validator, called on every submission.
/// The `Err` string is shown to the user and the field is asked again.
pub type FieldValidator<'a> = &'a dyn Fn(&str) -> std::result::Result<(), String>;

/// Presentation of one question
#[derive(Debug, Clone, Copy, Default)]
pub struct Field<'a> {
    pub title: &'a str,
    pub description: &'a str,
    pub placeholder: &'a str,
    /// Pre-filled answer
    pub initial: &'a str,
}

impl<'a> Field<'a> {
    pub fn new(title: &'a str) -> Self {
        Self {
            title,
            ..Default::default()
        }
    }

    pub fn description(mut self, description: &'a str) -> Self {
        self.description = description;
        self
    }

    pub fn placeholder(mut self, placeholder: &'a str) -> Self {
        self.placeholder = placeholder;
        self
    }

    pub fn initial(mut self, initial: &'a str) -> Self {
        self.initial = initial;
        self
    }
}

/// @acp:summary "Blocking question/answer surface (terminal, scripted, ...)"
///
/// Every method blocks until the user answered. A cancelled question returns
/// [`crate::error::ScaffoldError::Aborted`].
pub trait FormEngine {
    /// Single-line text. `validate` runs on every submission.
    fn input(&mut self, field: &Field<'_>, validate: Option<FieldValidator<'_>>) -> Result<String>;

    /// Multi-line text, lines joined with `\n`
    fn text(&mut self, field: &Field<'_>) -> Result<String>;

    /// One of `options` (labels); returns the chosen index
    fn select(&mut self, field: &Field<'_>, options: &[&str], default: usize) -> Result<usize>;

    /// Yes/no question
    fn confirm(&mut self, prompt: &str, default: bool) -> Result<bool>;

    /// Informational line shown before a group of questions
    fn note(&mut self, _message: &str) {}
}

/// Typed single-select over `(label, value)` pairs
pub fn choose<T: Copy + PartialEq>(
    form: &mut dyn FormEngine,
    field: &Field<'_>,
    options: &[(&str, T)],
    current: T,
) -> Result<T> {
    let labels: Vec<&str> = options.iter().map(|(label, _)| *label).collect();
    let default = options
        .iter()
        .position(|(_, value)| *value == current)
        .unwrap_or(0);
    let index = form.select(field, &labels, default)?;
    Ok(options
        .get(index)
        .map(|(_, value)| *value)
        .unwrap_or(current))
}
