//! Consolidation of trip fragments into one row per date.
//!
//! Records are folded in arrival order. The first record for a date seeds a
//! row; later records for the same date only fill fields that are still
//! empty (first-non-empty-wins, per field). Once every record is in, rows
//! are sorted by date and re-indexed contiguously from `start_row`.
//!
//! Arrival order matters: when two records carry different non-empty values
//! for the same field, the one pushed first is kept.

use indexmap::IndexMap;

use crate::date_order::DateOrdering;
use crate::types::{ConsolidatedRow, Scalar, TripRecord, Visits};
use crate::DEFAULT_START_ROW;

/// What counts as "empty" when deciding whether a later value may fill a field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Emptiness {
    /// Empty strings and numeric zero are empty. The text `"0"` is not.
    #[default]
    Falsy,
    /// Only empty strings are empty; numeric zero is a value.
    Strict,
}

impl Emptiness {
    /// Parses `falsy` or `strict` (case-insensitive).
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "falsy" => Some(Emptiness::Falsy),
            "strict" => Some(Emptiness::Strict),
            _ => None,
        }
    }

    fn is_empty_scalar(self, value: &Scalar) -> bool {
        match self {
            Emptiness::Falsy => value.is_empty_text() || value.is_zero_number(),
            Emptiness::Strict => value.is_empty_text(),
        }
    }

    fn is_empty_visits(self, value: Option<&Scalar>) -> bool {
        value.is_none_or(|v| self.is_empty_scalar(v))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConsolidateOptions {
    /// Spreadsheet row of the first output row.
    pub start_row: u32,
    pub emptiness: Emptiness,
    pub ordering: DateOrdering,
}

impl Default for ConsolidateOptions {
    fn default() -> Self {
        Self {
            start_row: DEFAULT_START_ROW,
            emptiness: Emptiness::default(),
            ordering: DateOrdering::default(),
        }
    }
}

/// A row being assembled. `provisional_row` is discarded by [`Consolidator::finish`].
#[derive(Debug)]
struct PendingRow {
    provisional_row: u32,
    record: TripRecord,
}

/// Streaming consolidation engine: `push` records, then `finish`.
#[derive(Debug)]
pub struct Consolidator {
    options: ConsolidateOptions,
    rows: IndexMap<String, PendingRow>,
    next_row: u32,
    pushed: usize,
}

impl Consolidator {
    #[must_use]
    pub fn new(options: ConsolidateOptions) -> Self {
        let next_row = options.start_row;
        Self {
            options,
            rows: IndexMap::new(),
            next_row,
            pushed: 0,
        }
    }

    /// Folds one record into the table.
    pub fn push(&mut self, record: TripRecord) {
        self.pushed += 1;
        let item = self.pushed;

        if let Some(pending) = self.rows.get_mut(&record.date) {
            tracing::debug!(
                date = %record.date,
                provisional_row = pending.provisional_row,
                item,
                "merging record into existing row"
            );
            merge_into(&mut pending.record, record, self.options.emptiness);
            return;
        }

        let provisional_row = self.next_row;
        self.next_row = self.next_row.saturating_add(1);
        tracing::debug!(
            date = %record.date,
            provisional_row,
            item,
            "allocated new row"
        );
        self.rows.insert(
            record.date.clone(),
            PendingRow {
                provisional_row,
                record,
            },
        );
    }

    /// Number of distinct dates seen so far.
    #[must_use]
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Sorts rows by date and assigns contiguous `row_index` / `sheet_row`.
    #[must_use]
    pub fn finish(self) -> Vec<ConsolidatedRow> {
        let Self { options, rows, .. } = self;

        let mut records: Vec<TripRecord> = rows.into_values().map(|p| p.record).collect();
        options
            .ordering
            .sort_by_date(&mut records, |r| r.date.as_str());

        let mut out = Vec::with_capacity(records.len());
        let mut row_index: u32 = 0;
        for record in records {
            row_index = row_index.saturating_add(1);
            out.push(render_row(
                record,
                row_index,
                options.start_row.saturating_add(row_index - 1),
            ));
        }
        out
    }
}

/// Consolidates `records` in iteration order.
#[must_use]
pub fn consolidate<I>(records: I, options: ConsolidateOptions) -> Vec<ConsolidatedRow>
where
    I: IntoIterator<Item = TripRecord>,
{
    let mut consolidator = Consolidator::new(options);
    for record in records {
        consolidator.push(record);
    }
    consolidator.finish()
}

fn merge_into(existing: &mut TripRecord, new: TripRecord, emptiness: Emptiness) {
    fill_text(&mut existing.inward_from, new.inward_from);
    fill_text(&mut existing.inward_to, new.inward_to);
    fill_scalar(&mut existing.inward_charges, new.inward_charges, emptiness);
    fill_text(&mut existing.outward_from, new.outward_from);
    fill_text(&mut existing.outward_to, new.outward_to);
    fill_scalar(&mut existing.outward_charges, new.outward_charges, emptiness);
    fill_text(&mut existing.vendor, new.vendor);

    if emptiness.is_empty_visits(existing.visits.as_ref())
        && !emptiness.is_empty_visits(new.visits.as_ref())
    {
        existing.visits = new.visits;
    }
}

fn fill_text(current: &mut String, new: String) {
    if current.is_empty() && !new.is_empty() {
        *current = new;
    }
}

fn fill_scalar(current: &mut Scalar, new: Scalar, emptiness: Emptiness) {
    if emptiness.is_empty_scalar(current) && !emptiness.is_empty_scalar(&new) {
        *current = new;
    }
}

fn render_row(record: TripRecord, row_index: u32, sheet_row: u32) -> ConsolidatedRow {
    ConsolidatedRow {
        row_index,
        sheet_row,
        visits: Visits::from_scalar(record.visits.as_ref()),
        inward_charges: record.inward_charges.to_text(),
        outward_charges: record.outward_charges.to_text(),
        date: record.date,
        inward_from: record.inward_from,
        inward_to: record.inward_to,
        outward_from: record.outward_from,
        outward_to: record.outward_to,
        vendor: record.vendor,
    }
}

#[cfg(test)]
#[path = "consolidate_test.rs"]
mod tests;
