//! Spreadsheet sink for consolidated trip rows.
//!
//! Rows land in an existing `.xlsx` template at fixed coordinates
//! ([`layout`]); the filled workbook is saved to a separate output path in
//! one atomic step ([`sink`]).

pub mod error;
pub mod layout;
pub mod sink;

pub use error::SinkError;
pub use layout::{cell_value, CellValue, Column, DEFAULT_SHEET_NAME};
pub use sink::{RowSink, TemplateSink};
