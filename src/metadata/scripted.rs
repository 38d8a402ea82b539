//! @acp:module "Scripted Form"
//! @acp:summary "Queue-driven form engine for tests and non-terminal callers"
//! @acp:domain cli
//! @acp:layer utility

use std::collections::VecDeque;

use super::form::{Field, FieldValidator, FormEngine};
use crate::error::{Result, ScaffoldError};

/// A queued answer
#[derive(Debug, Clone, PartialEq)]
pub enum Answer {
    Text(String),
    /// Pick the option with this label
    Choice(String),
    Confirm(bool),
    /// Keep the initial value / default
    Default,
    /// Cancel the question
    Abort,
}

impl Answer {
    pub fn text(s: impl Into<String>) -> Self {
        Answer::Text(s.into())
    }

    pub fn choice(label: impl Into<String>) -> Self {
        Answer::Choice(label.into())
    }
}

/// @acp:summary "Answers questions from a queue, like a user typing them"
///
/// Answers rejected by a field validator are recorded and the next queued
/// answer is tried, the way a terminal asks again. Running out of answers
/// aborts.
#[derive(Debug, Default)]
pub struct ScriptedForm {
    answers: VecDeque<Answer>,
    asked: Vec<String>,
    rejected: Vec<(String, String)>,
}

impl ScriptedForm {
    pub fn new(answers: impl IntoIterator<Item = Answer>) -> Self {
        Self {
            answers: answers.into_iter().collect(),
            ..Default::default()
        }
    }

    /// Titles of every question asked, in order
    pub fn asked(&self) -> &[String] {
        &self.asked
    }

    /// `(rejected answer, validator message)` pairs
    pub fn rejected(&self) -> &[(String, String)] {
        &self.rejected
    }

    /// Answers left unused
    pub fn remaining(&self) -> usize {
        self.answers.len()
    }

    fn next(&mut self, title: &str) -> Result<Answer> {
        match self.answers.pop_front() {
            Some(Answer::Abort) | None => Err(ScaffoldError::Aborted),
            Some(answer) => {
                tracing::trace!("{} <- {:?}", title, answer);
                Ok(answer)
            }
        }
    }

    fn mismatch(title: &str, answer: &Answer) -> ScaffoldError {
        ScaffoldError::Other(format!(
            "scripted answer {:?} does not fit question '{}'",
            answer, title
        ))
    }
}

impl FormEngine for ScriptedForm {
    fn input(&mut self, field: &Field<'_>, validate: Option<FieldValidator<'_>>) -> Result<String> {
        self.asked.push(field.title.to_string());
        loop {
            let value = match self.next(field.title)? {
                Answer::Text(s) => s,
                Answer::Default => field.initial.to_string(),
                other => return Err(Self::mismatch(field.title, &other)),
            };
            match validate.map(|v| v(value.as_str())) {
                Some(Err(msg)) => self.rejected.push((value, msg)),
                _ => return Ok(value),
            }
        }
    }

    fn text(&mut self, field: &Field<'_>) -> Result<String> {
        self.asked.push(field.title.to_string());
        match self.next(field.title)? {
            Answer::Text(s) => Ok(s),
            Answer::Default => Ok(field.initial.to_string()),
            other => Err(Self::mismatch(field.title, &other)),
        }
    }

    fn select(&mut self, field: &Field<'_>, options: &[&str], default: usize) -> Result<usize> {
        self.asked.push(field.title.to_string());
        match self.next(field.title)? {
            Answer::Choice(label) | Answer::Text(label) => options
                .iter()
                .position(|o| o.eq_ignore_ascii_case(&label))
                .ok_or_else(|| {
                    ScaffoldError::Other(format!(
                        "'{}' is not an option of '{}'",
                        label, field.title
                    ))
                }),
            Answer::Default => Ok(default),
            other => Err(Self::mismatch(field.title, &other)),
        }
    }

    fn confirm(&mut self, prompt: &str, default: bool) -> Result<bool> {
        self.asked.push(prompt.to_string());
        match self.next(prompt)? {
            Answer::Confirm(b) => Ok(b),
            Answer::Default => Ok(default),
            other => Err(Self::mismatch(prompt, &other)),
        }
    }
}
