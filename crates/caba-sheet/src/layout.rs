//! Fixed cell layout of the `Cab-Usage` template.
//!
//! Existing templates depend on these positions; changing a column number
//! breaks every workbook produced before the change.

use caba_core::ConsolidatedRow;

/// Worksheet the rows are written to.
pub const DEFAULT_SHEET_NAME: &str = "Cab-Usage";

/// Output columns, in template order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Column {
    Idx,
    Date,
    InwardFrom,
    InwardTo,
    OutwardFrom,
    OutwardTo,
    Visits,
    Vendor,
    InwardCharges,
    OutwardCharges,
}

impl Column {
    pub const ALL: [Column; 10] = [
        Column::Idx,
        Column::Date,
        Column::InwardFrom,
        Column::InwardTo,
        Column::OutwardFrom,
        Column::OutwardTo,
        Column::Visits,
        Column::Vendor,
        Column::InwardCharges,
        Column::OutwardCharges,
    ];

    /// 1-based spreadsheet column number.
    #[must_use]
    pub fn number(self) -> u32 {
        match self {
            Column::Idx => 1,
            Column::Date => 2,
            Column::InwardFrom => 3,
            Column::InwardTo => 4,
            Column::OutwardFrom => 5,
            Column::OutwardTo => 6,
            Column::Visits => 7,
            Column::Vendor => 8,
            Column::InwardCharges => 9,
            Column::OutwardCharges => 10,
        }
    }

    #[cfg(test)]
    fn name(self) -> &'static str {
        match self {
            Column::Idx => "idx",
            Column::Date => "date",
            Column::InwardFrom => "inward_from",
            Column::InwardTo => "inward_to",
            Column::OutwardFrom => "outward_from",
            Column::OutwardTo => "outward_to",
            Column::Visits => "visits",
            Column::Vendor => "vendor",
            Column::InwardCharges => "inward_charges",
            Column::OutwardCharges => "outward_charges",
        }
    }
}

/// Value to place in a cell.
#[derive(Debug, Clone, PartialEq)]
pub enum CellValue<'a> {
    Number(f64),
    Text(&'a str),
}

/// The value `row` contributes to `column`.
///
/// `idx` and integer `visits` are numbers; everything else is text.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn cell_value(row: &ConsolidatedRow, column: Column) -> CellValue<'_> {
    match column {
        Column::Idx => CellValue::Number(f64::from(row.row_index)),
        Column::Date => CellValue::Text(&row.date),
        Column::InwardFrom => CellValue::Text(&row.inward_from),
        Column::InwardTo => CellValue::Text(&row.inward_to),
        Column::OutwardFrom => CellValue::Text(&row.outward_from),
        Column::OutwardTo => CellValue::Text(&row.outward_to),
        Column::Visits => match &row.visits {
            caba_core::Visits::Count(n) => CellValue::Number(*n as f64),
            caba_core::Visits::Text(s) => CellValue::Text(s),
        },
        Column::Vendor => CellValue::Text(&row.vendor),
        Column::InwardCharges => CellValue::Text(&row.inward_charges),
        Column::OutwardCharges => CellValue::Text(&row.outward_charges),
    }
}
