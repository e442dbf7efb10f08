//! Ordered, growable list of form rows.
//!
//! A group always holds at least one row. Editing the trailing blank row
//! appends a fresh blank row, once per row; deleting rows keeps a blank row
//! available at the end.

use super::FormError;
use super::rows::{FieldError, FieldErrors, FormRow, ROW_ERROR, Validation};
use log::debug;

/// One row plus its form state
#[derive(Debug, Clone, PartialEq)]
pub struct Row<R> {
    pub value: R,
    dirty: bool,
    touched: bool,
    /// Armed one-shot watch: the first edit that leaves the row dirty appends a blank row
    watched: bool,
    errors: FieldErrors,
}

impl<R: FormRow> Row<R> {
    fn blank() -> Self {
        Self { value: R::default(), dirty: false, touched: false, watched: false, errors: FieldErrors::new() }
    }

    fn prefilled(value: R) -> Self {
        let mut row = Self { value, dirty: true, touched: false, watched: false, errors: FieldErrors::new() };
        // Errors only; a supplied row stays dirty even when blank
        row.value.validate(&mut row.errors);
        row
    }

    pub fn is_pristine(&self) -> bool {
        !self.dirty
    }

    pub fn is_touched(&self) -> bool {
        self.touched
    }

    pub fn is_watched(&self) -> bool {
        self.watched
    }

    pub fn errors(&self) -> &FieldErrors {
        &self.errors
    }

    pub fn error(&self, field: &str) -> Option<&FieldError> {
        self.errors.get(field)
    }

    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    fn run_validator(&mut self) {
        if self.value.validate(&mut self.errors) == Validation::Cleared {
            self.dirty = false;
            self.touched = false;
        }
    }

    fn reset(&mut self) {
        self.value = R::default();
        self.dirty = false;
        self.touched = false;
        self.errors.clear();
    }
}

/// Which row(s) to delete
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RowTarget {
    All,
    Index(usize),
}

/// What a deletion did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeleteOutcome {
    /// Every row was removed and one blank row put back
    Cleared,
    /// The row could not be removed and was blanked instead
    Reset { index: usize },
    /// The row was removed; `focus` is the row whose delete control gets focus
    Removed { focus: usize },
}

#[derive(Debug, Clone, PartialEq)]
pub struct RepeatingGroup<R> {
    rows: Vec<Row<R>>,
    disabled: bool,
}

impl<R: FormRow> Default for RepeatingGroup<R> {
    fn default() -> Self {
        Self::new()
    }
}

impl<R: FormRow> RepeatingGroup<R> {
    /// A group with one pristine, watched blank row
    pub fn new() -> Self {
        let mut group = Self { rows: Vec::new(), disabled: false };
        group.add_row(None);
        group
    }

    pub fn rows(&self) -> &[Row<R>] {
        &self.rows
    }

    pub fn row(&self, index: usize) -> Option<&Row<R>> {
        self.rows.get(index)
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn values(&self) -> impl Iterator<Item = &R> {
        self.rows.iter().map(|r| &r.value)
    }

    pub fn is_disabled(&self) -> bool {
        self.disabled
    }

    pub fn set_disabled(&mut self, disabled: bool) {
        self.disabled = disabled;
    }

    pub fn is_valid(&self) -> bool {
        self.rows.iter().all(Row::is_valid)
    }

    /// Append a row.
    ///
    /// Without a value a blank row is appended and watched. With a value the
    /// row is appended dirty and unwatched; after a batch the caller appends
    /// one blank row itself.
    pub fn add_row(&mut self, value: Option<R>) {
        match value {
            Some(value) => self.rows.push(Row::prefilled(value)),
            None => {
                self.rows.push(Row::blank());
                self.arm_last();
            }
        }
    }

    /// Change the value of a row as the user would.
    ///
    /// The row becomes dirty and touched, its errors are recomputed, and a
    /// watched row that is still dirty afterwards fires its watch once.
    pub fn edit_row<F: FnOnce(&mut R)>(&mut self, index: usize, edit: F) -> Result<(), FormError> {
        if self.disabled {
            return Err(FormError::Disabled);
        }
        let len = self.rows.len();
        let row = self.rows.get_mut(index).ok_or(FormError::RowOutOfRange { index, len })?;

        edit(&mut row.value);
        row.dirty = true;
        row.touched = true;
        row.errors.clear();
        row.run_validator();

        if row.watched && row.dirty {
            row.watched = false;
            debug!("row {} edited for the first time, appending a blank row", index);
            self.add_row(None);
        }

        Ok(())
    }

    /// Mark a row as visited without changing it
    pub fn touch_row(&mut self, index: usize) -> Result<(), FormError> {
        let len = self.rows.len();
        let row = self.rows.get_mut(index).ok_or(FormError::RowOutOfRange { index, len })?;
        row.touched = true;
        Ok(())
    }

    pub(crate) fn touch_all(&mut self) {
        for row in &mut self.rows {
            row.touched = true;
        }
    }

    /// Delete one row, or all of them.
    ///
    /// The only row, or a last row whose predecessor has been edited, is
    /// blanked instead of removed. Deleting all rows leaves one blank row.
    pub fn delete_row(&mut self, target: RowTarget) -> Result<DeleteOutcome, FormError> {
        if self.disabled {
            return Err(FormError::Disabled);
        }

        let outcome = match target {
            RowTarget::All => {
                self.clear();
                self.add_row(None);
                DeleteOutcome::Cleared
            }
            RowTarget::Index(index) => {
                let len = self.rows.len();
                if index >= len {
                    return Err(FormError::RowOutOfRange { index, len });
                }

                if len == 1 || (index == len - 1 && !self.rows[index - 1].is_pristine()) {
                    self.rows[index].reset();
                    DeleteOutcome::Reset { index }
                } else {
                    self.rows.remove(index);
                    let focus = if index < len - 1 { index } else { index - 1 };
                    DeleteOutcome::Removed { focus }
                }
            }
        };

        self.arm_last();
        Ok(outcome)
    }

    /// Replace every row with `values` followed by one blank row.
    ///
    /// Returns the number of rows loaded.
    pub fn replace_with(&mut self, values: Vec<R>) -> usize {
        self.clear();
        let count = values.len();
        for value in values {
            self.add_row(Some(value));
        }
        self.add_row(None);
        count
    }

    /// Attach an error to a field (or to the whole row with `ROW_ERROR`)
    pub fn set_error(&mut self, index: usize, field: Option<&str>, error: FieldError) -> Result<(), FormError> {
        let len = self.rows.len();
        let row = self.rows.get_mut(index).ok_or(FormError::RowOutOfRange { index, len })?;
        let key = match field {
            None => ROW_ERROR,
            Some(name) => R::field_name(name).ok_or_else(|| FormError::UnknownField(name.to_string()))?,
        };
        row.errors.insert(key, error);
        Ok(())
    }

    /// Remove all rows from the end backwards
    fn clear(&mut self) {
        while self.rows.pop().is_some() {}
    }

    /// Watch the last row if it is pristine and not yet watched
    fn arm_last(&mut self) {
        if let Some(last) = self.rows.last_mut()
            && last.is_pristine()
            && !last.watched
        {
            last.watched = true;
        }
    }
}

#[cfg(test)]
#[path = "group_test.rs"]
mod group_test;
