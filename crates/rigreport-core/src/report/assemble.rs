//! Collects mapped sheets into a [`ReportDocument`].

use super::aggregate::map_totals;
use super::foods::map_foods;
use super::header::{DATE_KEY, map_header};
use super::model::{
    DrillingSection, EmployerSection, FoodsRecord, HeaderRecord, OrderedMap, ReportDocument, RosterKind,
    ShiftSection, ShiftSectionKind, TotalsRecord,
};
use super::roster::{map_roster, map_supervisor};
use super::sheet::SheetKind;
use super::shift::{map_counter_total, map_shift};
use crate::grid::RawGrid;

/// Header fields filled with `""` when the catalog has no header sheet.
pub const DEFAULT_HEADER_FIELDS: [&str; 5] = [DATE_KEY, "روز هفته", "مسوول اردوگاه", "رییس دستگاه", "دستگاه حفاری"];

/// Accumulates mapped sheets; [`ReportBuilder::finish`] fills in the defaults.
///
/// A sheet seen twice replaces what the first one produced.
#[derive(Debug, Clone)]
pub struct ReportBuilder {
    header: Option<HeaderRecord>,
    operation: ShiftSection,
    herasat: ShiftSection,
    ordogahi: ShiftSection,
    employer: EmployerSection,
    drilling: DrillingSection,
    foods: Option<FoodsRecord>,
    total: TotalsRecord,
    unmapped: OrderedMap<RawGrid>,
}

impl Default for ReportBuilder {
    fn default() -> Self {
        Self {
            header: None,
            operation: ShiftSection::new(ShiftSectionKind::Operation),
            herasat: ShiftSection::new(ShiftSectionKind::Herasat),
            ordogahi: ShiftSection::new(ShiftSectionKind::Ordogahi),
            employer: EmployerSection::default(),
            drilling: DrillingSection::default(),
            foods: None,
            total: TotalsRecord::new(),
            unmapped: OrderedMap::new(),
        }
    }
}

impl ReportBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    fn shift_section_mut(&mut self, kind: ShiftSectionKind) -> &mut ShiftSection {
        match kind {
            ShiftSectionKind::Operation => &mut self.operation,
            ShiftSectionKind::Herasat => &mut self.herasat,
            ShiftSectionKind::Ordogahi => &mut self.ordogahi,
        }
    }

    /// Map `grid` according to the sheet kind and store the result.
    pub fn apply(&mut self, kind: &SheetKind, grid: &RawGrid) {
        match kind {
            SheetKind::Header => self.header = Some(map_header(grid)),
            SheetKind::Shift(section, letter) => {
                self.shift_section_mut(*section).shifts[letter.index()] = map_shift(grid, *letter);
            }
            SheetKind::ShiftTotal(section) => {
                self.shift_section_mut(*section).total = map_counter_total(grid);
            }
            SheetKind::Roster(RosterKind::Employer) => self.employer.roster = map_roster(grid),
            SheetKind::Roster(RosterKind::Drilling) => self.drilling.roster = map_roster(grid),
            SheetKind::RosterTotal(RosterKind::Employer) => self.employer.total = map_counter_total(grid),
            SheetKind::RosterTotal(RosterKind::Drilling) => self.drilling.total = map_counter_total(grid),
            SheetKind::Supervisor => self.employer.supervisor = map_supervisor(grid),
            SheetKind::Foods => self.foods = Some(map_foods(grid)),
            SheetKind::Totals => self.total = map_totals(grid),
            SheetKind::Unknown(name) => self.unmapped.insert(name.clone(), grid.clone()),
        }
    }

    /// Decode `sheet_name` and apply it.
    pub fn apply_named(&mut self, sheet_name: &str, grid: &RawGrid) -> SheetKind {
        let kind = SheetKind::from_name(sheet_name);
        self.apply(&kind, grid);
        kind
    }

    /// Build the document, filling absent parts with their empty values.
    pub fn finish(self) -> ReportDocument {
        let header = self.header.unwrap_or_else(default_header);
        ReportDocument {
            header,
            operation: self.operation,
            herasat: self.herasat,
            ordogahi: self.ordogahi,
            employer: self.employer,
            drilling: self.drilling,
            foods: self.foods.unwrap_or_default(),
            total: self.total,
            unmapped: self.unmapped,
        }
    }
}

fn default_header() -> HeaderRecord {
    DEFAULT_HEADER_FIELDS
        .iter()
        .map(|field| (*field, String::new()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::report::model::{ShiftEntry, ShiftLetter};

    fn grid(rows: &[&[&str]]) -> RawGrid {
        let table: Vec<Vec<Option<String>>> = rows
            .iter()
            .map(|r| r.iter().map(|v| Some(v.to_string())).collect())
            .collect();
        RawGrid::from_extracted(&table)
    }

    #[test]
    fn empty_builder_has_defaults() {
        let doc = ReportBuilder::new().finish();
        let keys: Vec<&str> = doc.header.keys().collect();
        assert_eq!(keys, DEFAULT_HEADER_FIELDS.to_vec());
        assert!(doc.header.iter().all(|(_, v)| v.is_empty()));
        assert!(doc.operation.shifts.iter().all(Vec::is_empty));
        assert_eq!(doc.herasat.total, None);
        assert_eq!(doc.foods, FoodsRecord::default());
        assert!(doc.total.is_empty());
        assert!(doc.employer.supervisor.is_empty());
    }

    #[test]
    fn mapped_empty_header_is_kept() {
        let mut builder = ReportBuilder::new();
        builder.apply_named("Header", &RawGrid::default());
        assert!(builder.finish().header.is_empty());
    }

    #[test]
    fn shift_goes_to_its_section_and_letter() {
        let mut builder = ReportBuilder::new();
        let g = grid(&[
            &["", "", "", "", "", "", "شیفت"],
            &["خ", "پ", "ش", "ن", "ص", "سمت", "نام"],
            &["1", "1", "1", "1", "1", "نگهبان", "مهدی"],
        ]);
        builder.apply_named("HerasatShiftB", &g);
        let doc = builder.finish();
        let shift = doc.herasat.shift(ShiftLetter::B);
        assert_eq!(shift.len(), 1);
        assert!(matches!(&shift[0], ShiftEntry::Person(p) if p.name == "مهدی"));
        assert!(doc.operation.shift(ShiftLetter::B).is_empty());
    }

    #[test]
    fn unknown_sheet_never_replaces_a_section() {
        let mut builder = ReportBuilder::new();
        let kind = builder.apply_named("Operation", &grid(&[&["x"]]));
        assert_eq!(kind, SheetKind::Unknown("Operation".into()));
        let doc = builder.finish();
        assert!(doc.operation.shifts.iter().all(Vec::is_empty));
        assert!(doc.unmapped.contains_key("Operation"));
    }

    #[test]
    fn later_sheet_replaces_earlier() {
        let mut builder = ReportBuilder::new();
        builder.apply_named("EmployerTotal", &grid(&[&["1"]]));
        builder.apply_named("EmployerTotal", &grid(&[&["2"]]));
        assert_eq!(builder.finish().employer.total.map(|c| c.lodging), Some(2));
    }
}
