//! Dynamic formset controller
//!
//! Owns the row registry and the management counters and keeps them in
//! agreement: after every mutation `rows().len() == counters().total_forms()`.
//! Rows are never removed or renumbered; deleting is a flag on the row.

use crate::counters::{ManagementConfig, ManagementCounters};
use crate::error::FormsetError;
use crate::row::Row;
use crate::submission::Submission;
use crate::value::{FieldValue, RowData};

/// Rows of one formset plus its management counters
#[derive(Debug, Clone)]
pub struct Formset {
    prefix: String,
    counters: ManagementCounters,
    rows: Vec<Row>,
}

impl Formset {
    /// Mount from the host page's configuration and `formdata` blocks
    ///
    /// `form_data` becomes rows `0..n` with `is_extra == false`. When
    /// `TOTAL_FORMS` asks for more rows than `form_data` holds, blank extra
    /// rows are appended to match.
    ///
    /// # Errors
    /// - `FormsetError::InvalidCounters` if the counters are inconsistent or
    ///   `form_data` holds more rows than `TOTAL_FORMS`
    pub fn mount(config: &ManagementConfig, form_data: Vec<RowData>) -> Result<Self, FormsetError> {
        let counters = ManagementCounters::from_config(config)?;
        let total = counters.total_forms();

        if form_data.len() > total {
            return Err(FormsetError::InvalidCounters(format!(
                "formdata holds {} rows but TOTAL_FORMS is {total}",
                form_data.len()
            )));
        }

        let mut rows: Vec<Row> = form_data
            .into_iter()
            .enumerate()
            .map(|(index, data)| Row::from_data(&config.prefix, index, data))
            .collect();
        let seeded = rows.len();
        rows.extend((seeded..total).map(|index| Row::extra(&config.prefix, index)));

        tracing::debug!(
            prefix = %config.prefix,
            seeded,
            total,
            initial = counters.initial_forms(),
            "mounted formset"
        );

        Ok(Self {
            prefix: config.prefix.clone(),
            counters,
            rows,
        })
    }

    /// Append a blank row
    ///
    /// The new row takes the next index and `TOTAL_FORMS` grows by one.
    ///
    /// # Errors
    /// - `FormsetError::LimitExceeded` if `MAX_NUM_FORMS` rows already exist;
    ///   nothing changes in that case
    pub fn add_row(&mut self) -> Result<&Row, FormsetError> {
        let index = self.rows.len();
        if let Err(err) = self.counters.grow() {
            tracing::warn!(prefix = %self.prefix, rows = index, "cannot add row: {err}");
            return Err(err);
        }

        self.rows.push(Row::extra(&self.prefix, index));
        debug_assert_eq!(self.rows.len(), self.counters.total_forms());
        tracing::debug!(prefix = %self.prefix, index, "added row");

        Ok(&self.rows[index])
    }

    /// Whether another row may be added
    #[inline]
    #[must_use]
    pub fn can_add_row(&self) -> bool {
        self.counters.can_grow()
    }

    /// Formset prefix
    #[inline]
    #[must_use]
    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    /// Management counters
    #[inline]
    #[must_use]
    pub fn counters(&self) -> &ManagementCounters {
        &self.counters
    }

    /// All rows in index order
    #[inline]
    #[must_use]
    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    /// Number of rows
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Check if there are no rows
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Row by index
    #[inline]
    #[must_use]
    pub fn row(&self, index: usize) -> Option<&Row> {
        self.rows.get(index)
    }

    /// Mutable row by index
    ///
    /// # Errors
    /// - `FormsetError::UnknownRow` if no row has this index
    pub fn row_mut(&mut self, index: usize) -> Result<&mut Row, FormsetError> {
        self.rows.get_mut(index).ok_or(FormsetError::UnknownRow(index))
    }

    /// Set a field on a row, returning the previous value
    ///
    /// # Errors
    /// - `FormsetError::UnknownRow` if no row has this index
    pub fn set_field(
        &mut self,
        index: usize,
        field: &str,
        value: impl Into<FieldValue>,
    ) -> Result<Option<FieldValue>, FormsetError> {
        Ok(self.row_mut(index)?.set(field, value))
    }

    /// Mark or unmark a row for deletion
    ///
    /// # Errors
    /// - `FormsetError::UnknownRow` if no row has this index
    pub fn mark_deleted(&mut self, index: usize, deleted: bool) -> Result<(), FormsetError> {
        self.row_mut(index)?.mark_deleted(deleted);
        Ok(())
    }

    /// Rows not marked for deletion
    pub fn active_rows(&self) -> impl Iterator<Item = &Row> {
        self.rows.iter().filter(|row| !row.is_marked_deleted())
    }

    /// Encode management fields and every row for posting
    #[must_use]
    pub fn submission(&self) -> Submission {
        let mut submission = Submission::new();
        for (name, value) in self.counters.to_pairs(&self.prefix) {
            submission.push(name, value);
        }
        for row in &self.rows {
            submission.push_row(row);
        }
        submission
    }
}
