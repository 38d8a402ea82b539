//! @acp:module "Terminal Form"
//! @acp:summary "dialoguer-backed form engine for interactive terminals"
//! @acp:domain cli
//! @acp:layer handler

use console::style;
use dialoguer::{theme::ColorfulTheme, Confirm, Input, Select};

use super::form::{Field, FieldValidator, FormEngine};
use crate::error::{Result, ScaffoldError};

/// Form engine asking questions on the controlling terminal
pub struct TerminalForm {
    theme: ColorfulTheme,
}

impl TerminalForm {
    pub fn new() -> Self {
        Self {
            theme: ColorfulTheme::default(),
        }
    }

    fn describe(field: &Field<'_>) {
        if !field.description.is_empty() {
            println!("{}", style(field.description).dim());
        }
    }

    fn prompt(field: &Field<'_>) -> String {
        if field.placeholder.is_empty() {
            field.title.to_string()
        } else {
            format!("{} (e.g. {})", field.title, field.placeholder)
        }
    }
}

/// No lines typed keeps the pre-filled value
fn multi_line_answer(lines: &[String], initial: &str) -> String {
    if lines.is_empty() {
        initial.to_string()
    } else {
        lines.join("\n")
    }
}

impl Default for TerminalForm {
    fn default() -> Self {
        Self::new()
    }
}

impl FormEngine for TerminalForm {
    fn input(&mut self, field: &Field<'_>, validate: Option<FieldValidator<'_>>) -> Result<String> {
        Self::describe(field);
        let mut input = Input::<String>::with_theme(&self.theme)
            .with_prompt(Self::prompt(field))
            .allow_empty(true);
        if !field.initial.is_empty() {
            input = input.with_initial_text(field.initial);
        }
        if let Some(validate) = validate {
            input = input.validate_with(move |value: &String| validate(value.as_str()));
        }
        Ok(input.interact_text()?)
    }

    fn text(&mut self, field: &Field<'_>) -> Result<String> {
        Self::describe(field);
        if field.initial.is_empty() {
            println!("{}", style("Enter an empty line to finish").dim());
        } else {
            println!("{}", style("Current value:").dim());
            for line in field.initial.lines() {
                println!("  {}", style(line).dim());
            }
            println!(
                "{}",
                style("Enter an empty first line to keep it, or type the new lines").dim()
            );
        }

        let mut lines = Vec::new();
        loop {
            let line: String = Input::with_theme(&self.theme)
                .with_prompt(format!("{} [{}]", field.title, lines.len() + 1))
                .allow_empty(true)
                .interact_text()?;
            if line.trim().is_empty() {
                break;
            }
            lines.push(line);
        }
        Ok(multi_line_answer(&lines, field.initial))
    }

    fn select(&mut self, field: &Field<'_>, options: &[&str], default: usize) -> Result<usize> {
        Self::describe(field);
        Select::with_theme(&self.theme)
            .with_prompt(field.title)
            .items(options)
            .default(default)
            .interact_opt()?
            .ok_or(ScaffoldError::Aborted)
    }

    fn confirm(&mut self, prompt: &str, default: bool) -> Result<bool> {
        Confirm::with_theme(&self.theme)
            .with_prompt(prompt)
            .default(default)
            .interact_opt()?
            .ok_or(ScaffoldError::Aborted)
    }

    fn note(&mut self, message: &str) {
        println!("{} {}", style("→").cyan(), message);
    }
}
