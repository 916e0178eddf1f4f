//! Draft editing with field-level validation.
//!
//! A [`FormBinder`] owns the draft, runs each field's validators when the
//! field changes and again on submit, and calls the submit callback only
//! when every validator passes.

mod validators;

pub(crate) use validators::{FutureWeekdayAndRequired, Max, Min, NotBlank, Required, Validator};

use crate::models::{Contact, Todo};
use chrono::NaiveDate;
use std::collections::BTreeSet;
use std::sync::Arc;
use thiserror::Error;

#[derive(Clone, Debug, PartialEq)]
pub(crate) enum FieldValue {
    Text(String),
    Number(Option<i32>),
    Date(Option<NaiveDate>),
    Contact(Option<Contact>),
}

impl FieldValue {
    pub fn is_empty(&self) -> bool {
        match self {
            FieldValue::Text(s) => s.is_empty(),
            FieldValue::Number(n) => n.is_none(),
            FieldValue::Date(d) => d.is_none(),
            FieldValue::Contact(c) => c.is_none(),
        }
    }
}

/// A value the form can read and write by field name.
pub(crate) trait FormModel: Clone + Default + PartialEq {
    fn field(&self, name: &str) -> Option<FieldValue>;

    /// Returns false for unknown names or mismatched value kinds.
    fn set_field(&mut self, name: &str, value: FieldValue) -> bool;
}

impl FormModel for Todo {
    fn field(&self, name: &str) -> Option<FieldValue> {
        Some(match name {
            "task" => FieldValue::Text(self.task.clone()),
            "description" => FieldValue::Text(self.description.clone()),
            "priority" => FieldValue::Number(self.priority),
            "deadline" => FieldValue::Date(self.deadline),
            "assigned" => FieldValue::Contact(self.assigned.clone()),
            _ => return None,
        })
    }

    fn set_field(&mut self, name: &str, value: FieldValue) -> bool {
        match (name, value) {
            ("task", FieldValue::Text(s)) => self.task = s,
            ("description", FieldValue::Text(s)) => self.description = s,
            ("priority", FieldValue::Number(n)) => self.priority = n,
            ("deadline", FieldValue::Date(d)) => self.deadline = d,
            ("assigned", FieldValue::Contact(c)) => self.assigned = c,
            _ => return false,
        }
        true
    }
}

#[derive(Clone)]
pub(crate) struct FieldDef {
    pub name: &'static str,
    pub validators: Vec<Arc<dyn Validator>>,
}

impl FieldDef {
    pub fn new(name: &'static str) -> Self {
        Self {
            name,
            validators: vec![],
        }
    }

    pub fn with(mut self, validator: impl Validator + 'static) -> Self {
        self.validators.push(Arc::new(validator));
        self
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Error)]
#[error("{field}: {message}")]
pub(crate) struct FieldError {
    pub field: &'static str,
    pub validator: &'static str,
    pub message: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub(crate) enum FormError {
    #[error("{} field(s) failed validation", .0.len())]
    Invalid(Vec<FieldError>),
}

#[derive(Clone)]
pub(crate) struct FormBinder<T: FormModel> {
    fields: Vec<FieldDef>,
    value: T,
    dirty: BTreeSet<&'static str>,
    errors: Vec<FieldError>,
}

impl<T: FormModel> FormBinder<T> {
    pub fn new(fields: Vec<FieldDef>) -> Self {
        Self {
            fields,
            value: T::default(),
            dirty: BTreeSet::new(),
            errors: vec![],
        }
    }

    pub fn value(&self) -> &T {
        &self.value
    }

    /// Load `item` as the draft, forgetting edits and shown errors.
    pub fn read(&mut self, item: T) {
        self.value = item;
        self.dirty.clear();
        self.errors.clear();
    }

    pub fn clear(&mut self) {
        self.read(T::default());
    }

    pub fn set_field(&mut self, name: &'static str, value: FieldValue) {
        if !self.value.set_field(name, value) {
            tracing::warn!(field = name, "ignored write to unknown form field");
            return;
        }
        self.dirty.insert(name);
        self.validate_field(name);
    }

    fn check(&self, def: &FieldDef) -> Option<FieldError> {
        let value = self.value.field(def.name)?;
        def.validators
            .iter()
            .find(|v| !v.validate(&value))
            .map(|v| FieldError {
                field: def.name,
                validator: v.name(),
                message: v.message(),
            })
    }

    /// Re-run one field's validators and update its shown error.
    pub fn validate_field(&mut self, name: &str) -> Option<FieldError> {
        let def = self.fields.iter().find(|d| d.name == name)?.clone();
        let error = self.check(&def);
        self.errors.retain(|e| e.field != name);
        if let Some(e) = &error {
            self.errors.push(e.clone());
        }
        error
    }

    pub fn validate(&mut self) -> Result<(), FormError> {
        self.errors = self.fields.iter().filter_map(|d| self.check(d)).collect();
        if self.errors.is_empty() {
            Ok(())
        } else {
            Err(FormError::Invalid(self.errors.clone()))
        }
    }

    /// Errors currently shown, in the order they were found.
    pub fn errors(&self) -> &[FieldError] {
        &self.errors
    }

    pub fn field_error(&self, name: &str) -> Option<&FieldError> {
        self.errors.iter().find(|e| e.field == name)
    }

    pub fn is_dirty(&self, name: &str) -> bool {
        self.dirty.contains(name)
    }

    /// Whether any field currently fails a validator, shown or not.
    pub fn invalid(&self) -> bool {
        self.fields.iter().any(|d| self.check(d).is_some())
    }

    /// Validate everything and hand the draft to `on_submit` only if it passes.
    pub fn submit<R>(&mut self, on_submit: impl FnOnce(T) -> R) -> Result<R, FormError> {
        if let Err(e) = self.validate() {
            tracing::debug!(error = %e, "submit blocked");
            return Err(e);
        }
        Ok(on_submit(self.value.clone()))
    }
}

/// Field names as the todo form binds them.
pub(crate) mod todo_fields {
    pub const TASK: &str = "task";
    pub const DESCRIPTION: &str = "description";
    pub const PRIORITY: &str = "priority";
    pub const DEADLINE: &str = "deadline";
    pub const ASSIGNED: &str = "assigned";
}

pub(crate) fn todo_form_fields(deadline: FutureWeekdayAndRequired) -> Vec<FieldDef> {
    use todo_fields::*;
    vec![
        FieldDef::new(TASK).with(Required).with(NotBlank),
        FieldDef::new(DESCRIPTION).with(NotBlank),
        FieldDef::new(PRIORITY).with(Min(1)).with(Max(5)),
        FieldDef::new(DEADLINE).with(deadline),
        FieldDef::new(ASSIGNED),
    ]
}

pub(crate) fn todo_form() -> FormBinder<Todo> {
    FormBinder::new(todo_form_fields(FutureWeekdayAndRequired::new()))
}

#[cfg(test)]
mod tests {
    use super::todo_fields::*;
    use super::validators::DEADLINE_MESSAGE;
    use super::*;
    use std::cell::Cell;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 10, 19).expect("valid date")
    }

    fn form() -> FormBinder<Todo> {
        FormBinder::new(todo_form_fields(FutureWeekdayAndRequired::at(today())))
    }

    fn valid_todo() -> Todo {
        Todo {
            task: "Buy milk".to_string(),
            description: "two liters".to_string(),
            priority: Some(3),
            deadline: NaiveDate::from_ymd_opt(2026, 10, 21),
            ..Default::default()
        }
    }

    #[test]
    fn empty_form_is_invalid_but_shows_nothing_yet() {
        let f = form();
        assert!(f.invalid());
        assert!(f.errors().is_empty());
    }

    #[test]
    fn invalid_submit_never_calls_back() {
        let mut f = form();
        let called = Cell::new(false);
        assert!(f.invalid());

        let out = f.submit(|_| called.set(true));

        let Err(FormError::Invalid(errors)) = out else {
            panic!("expected validation failure");
        };
        assert_eq!(errors.len(), 3);
        assert!(!called.get());
        assert_eq!(
            f.field_error(DEADLINE).map(|e| e.message.as_str()),
            Some(DEADLINE_MESSAGE)
        );
        assert_eq!(f.field_error(TASK).map(|e| e.validator), Some("Required"));
    }

    #[test]
    fn valid_submit_hands_over_the_draft() {
        let mut f = form();
        f.read(valid_todo());
        assert!(!f.invalid());
        assert_eq!(f.submit(|t| t.task), Ok("Buy milk".to_string()));
    }

    #[test]
    fn set_field_validates_only_that_field() {
        let mut f = form();
        f.set_field(PRIORITY, FieldValue::Number(Some(9)));

        assert!(f.is_dirty(PRIORITY));
        assert!(!f.is_dirty(TASK));
        assert_eq!(f.errors().len(), 1);
        assert_eq!(f.field_error(PRIORITY).map(|e| e.validator), Some("Max"));

        f.set_field(PRIORITY, FieldValue::Number(Some(5)));
        assert!(f.errors().is_empty());
    }

    #[test]
    fn weekend_deadline_is_rejected() {
        let mut f = form();
        f.read(valid_todo());
        f.set_field(DEADLINE, FieldValue::Date(NaiveDate::from_ymd_opt(2026, 10, 24)));
        assert!(f.invalid());
        assert!(f.field_error(DEADLINE).is_some());
    }

    #[test]
    fn read_and_clear_reset_state() {
        let mut f = form();
        f.set_field(TASK, FieldValue::Text(" ".to_string()));
        assert_eq!(f.field_error(TASK).map(|e| e.validator), Some("NotBlank"));

        f.read(valid_todo());
        assert!(f.errors().is_empty());
        assert!(!f.is_dirty(TASK));
        assert_eq!(f.value(), &valid_todo());

        f.clear();
        assert_eq!(f.value(), &Todo::default());
    }

    #[test]
    fn mismatched_writes_are_ignored() {
        let mut f = form();
        f.set_field(PRIORITY, FieldValue::Text("high".to_string()));
        assert!(!f.is_dirty(PRIORITY));
        assert_eq!(f.value().priority, None);
    }
}
