//! Mapping of cleaned grids to the structured report.
//!
//! Each catalog sheet is decoded into a [`SheetKind`] and handed to the mapper
//! for that kind. Mappers are total: a grid that does not look as expected gives
//! empty fields, never an error.

pub mod aggregate;
pub mod assemble;
pub mod foods;
pub mod header;
pub mod model;
pub mod roster;
pub mod rows;
pub mod sheet;
pub mod shift;

pub use aggregate::map_totals;
pub use assemble::{DEFAULT_HEADER_FIELDS, ReportBuilder};
pub use foods::map_foods;
pub use header::map_header;
pub use model::{
    CounterSet, DrillingSection, EmployerSection, FoodsRecord, HeaderRecord, OrderedMap, PersonRecord,
    ReportDocument, RosterKind, ShiftEntry, ShiftLetter, ShiftSection, ShiftSectionKind, TotalsRecord, TotalsRow,
};
pub use roster::{map_roster, map_supervisor};
pub use rows::{CounterColumns, RosterRowShape, ShiftRowShape};
pub use sheet::SheetKind;
pub use shift::{ShiftTable, map_counter_total, map_shift};
