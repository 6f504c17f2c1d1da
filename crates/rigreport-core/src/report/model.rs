//! The structured report document and its parts.

#[cfg(feature = "serde")]
use serde::ser::{Serialize, SerializeMap, Serializer};

use crate::grid::RawGrid;

/// String-keyed map that keeps insertion order.
///
/// Inserting an existing key replaces its value without moving it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderedMap<V> {
    entries: Vec<(String, V)>,
}

impl<V> Default for OrderedMap<V> {
    fn default() -> Self {
        Self {
            entries: Vec::new(),
        }
    }
}

impl<V> OrderedMap<V> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, key: impl Into<String>, value: V) {
        let key = key.into();
        match self.entries.iter_mut().find(|(k, _)| *k == key) {
            Some(slot) => slot.1 = value,
            None => self.entries.push((key, value)),
        }
    }

    pub fn get(&self, key: &str) -> Option<&V> {
        self.entries.iter().find(|(k, _)| k == key).map(|(_, v)| v)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &V)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(k, _)| k.as_str())
    }
}

impl<K: Into<String>, V> FromIterator<(K, V)> for OrderedMap<V> {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut map = Self::new();
        for (k, v) in iter {
            map.insert(k, v);
        }
        map
    }
}

#[cfg(feature = "serde")]
impl<V: Serialize> Serialize for OrderedMap<V> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (k, v) in &self.entries {
            map.serialize_entry(k, v)?;
        }
        map.end()
    }
}

/// Meal and lodging headcounts attached to a person or a total row.
///
/// On the forms these are the five right-most columns, read from column 4
/// down to column 0.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CounterSet {
    #[cfg_attr(feature = "serde", serde(rename = "ص"))]
    pub breakfast: i64,
    #[cfg_attr(feature = "serde", serde(rename = "ن"))]
    pub lunch: i64,
    #[cfg_attr(feature = "serde", serde(rename = "ش"))]
    pub dinner: i64,
    #[cfg_attr(feature = "serde", serde(rename = "پ"))]
    pub late_snack: i64,
    #[cfg_attr(feature = "serde", serde(rename = "خ"))]
    pub lodging: i64,
}

/// Serializes a missing counter set as `{}`.
#[cfg(feature = "serde")]
struct CountersOrEmpty<'a>(&'a Option<CounterSet>);

#[cfg(feature = "serde")]
impl Serialize for CountersOrEmpty<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self.0 {
            Some(counters) => counters.serialize(serializer),
            None => serializer.serialize_map(Some(0))?.end(),
        }
    }
}

#[cfg(feature = "serde")]
fn counters_or_empty<S: Serializer>(value: &Option<CounterSet>, serializer: S) -> Result<S::Ok, S::Error> {
    CountersOrEmpty(value).serialize(serializer)
}

/// One person on a shift or roster.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PersonRecord {
    pub name: String,
    pub position: String,
    /// Only employer and drilling rosters carry a company column.
    #[cfg_attr(feature = "serde", serde(default, skip_serializing_if = "Option::is_none"))]
    pub company: Option<String>,
    #[cfg_attr(feature = "serde", serde(flatten))]
    pub counters: CounterSet,
}

/// Entry of a shift list: a person, or the trailing shift total.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ShiftEntry {
    Person(PersonRecord),
    /// Serialized as `{"<label>": counters}`, e.g. `{"TotalShiftA": {...}}`.
    Total { label: String, counters: CounterSet },
}

#[cfg(feature = "serde")]
impl Serialize for ShiftEntry {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            ShiftEntry::Person(person) => person.serialize(serializer),
            ShiftEntry::Total { label, counters } => {
                let mut map = serializer.serialize_map(Some(1))?;
                map.serialize_entry(label, counters)?;
                map.end()
            }
        }
    }
}

/// The four lettered work shifts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ShiftLetter {
    A,
    B,
    C,
    D,
}

impl ShiftLetter {
    pub const ALL: [ShiftLetter; 4] = [ShiftLetter::A, ShiftLetter::B, ShiftLetter::C, ShiftLetter::D];

    pub fn from_char(c: char) -> Option<Self> {
        match c {
            'A' => Some(ShiftLetter::A),
            'B' => Some(ShiftLetter::B),
            'C' => Some(ShiftLetter::C),
            'D' => Some(ShiftLetter::D),
            _ => None,
        }
    }

    pub fn index(self) -> usize {
        self as usize
    }

    /// Output key of the shift, `ShiftA`..`ShiftD`.
    pub fn key(self) -> &'static str {
        match self {
            ShiftLetter::A => "ShiftA",
            ShiftLetter::B => "ShiftB",
            ShiftLetter::C => "ShiftC",
            ShiftLetter::D => "ShiftD",
        }
    }
}

/// Sections that hold four shifts and a grand total.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ShiftSectionKind {
    Operation,
    Herasat,
    Ordogahi,
}

impl ShiftSectionKind {
    pub fn key(self) -> &'static str {
        match self {
            ShiftSectionKind::Operation => "Operation",
            ShiftSectionKind::Herasat => "Herasat",
            ShiftSectionKind::Ordogahi => "Ordogahi",
        }
    }

    /// Key of the section's grand total, which is also its catalog sheet name.
    pub fn total_key(self) -> &'static str {
        match self {
            ShiftSectionKind::Operation => "ShiftTotalPage1",
            ShiftSectionKind::Herasat => "ShiftTotalHerasat",
            ShiftSectionKind::Ordogahi => "ShiftTotalOrdogahi",
        }
    }
}

/// A section of four shift lists plus a grand total.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShiftSection {
    pub kind: ShiftSectionKind,
    pub shifts: [Vec<ShiftEntry>; 4],
    pub total: Option<CounterSet>,
}

impl ShiftSection {
    pub fn new(kind: ShiftSectionKind) -> Self {
        Self {
            kind,
            shifts: Default::default(),
            total: None,
        }
    }

    pub fn shift(&self, letter: ShiftLetter) -> &[ShiftEntry] {
        &self.shifts[letter.index()]
    }
}

#[cfg(feature = "serde")]
impl Serialize for ShiftSection {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(5))?;
        for letter in ShiftLetter::ALL {
            map.serialize_entry(letter.key(), self.shift(letter))?;
        }
        map.serialize_entry(self.kind.total_key(), &CountersOrEmpty(&self.total))?;
        map.end()
    }
}

/// Rosters of personnel listed with their company.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RosterKind {
    Employer,
    Drilling,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct EmployerSection {
    #[cfg_attr(feature = "serde", serde(rename = "EmployerPage3"))]
    pub roster: Vec<PersonRecord>,
    #[cfg_attr(feature = "serde", serde(rename = "EmployerTotal", serialize_with = "counters_or_empty"))]
    pub total: Option<CounterSet>,
    /// Column index (as a string) → value.
    #[cfg_attr(feature = "serde", serde(rename = "EmployerSupervisor"))]
    pub supervisor: OrderedMap<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct DrillingSection {
    #[cfg_attr(feature = "serde", serde(rename = "DrillingPage4"))]
    pub roster: Vec<PersonRecord>,
    #[cfg_attr(feature = "serde", serde(rename = "DrillingTotal", serialize_with = "counters_or_empty"))]
    pub total: Option<CounterSet>,
}

/// Meals served and free-text notes.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct FoodsRecord {
    #[cfg_attr(feature = "serde", serde(rename = "صبحانه"))]
    pub breakfast: String,
    #[cfg_attr(feature = "serde", serde(rename = "ناهار"))]
    pub lunch: String,
    #[cfg_attr(feature = "serde", serde(rename = "شام"))]
    pub dinner: String,
    #[cfg_attr(feature = "serde", serde(rename = "پس شام"))]
    pub late_snack: String,
    #[cfg_attr(feature = "serde", serde(rename = "توضیحات"))]
    pub notes: String,
}

/// Per-category counts of one labelled row of the aggregate totals table.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TotalsRow {
    #[cfg_attr(feature = "serde", serde(rename = "صبحانه"))]
    pub breakfast: i64,
    #[cfg_attr(feature = "serde", serde(rename = "ناهار"))]
    pub lunch: i64,
    #[cfg_attr(feature = "serde", serde(rename = "شام"))]
    pub dinner: i64,
    #[cfg_attr(feature = "serde", serde(rename = "پس شام"))]
    pub late_snack: i64,
    #[cfg_attr(feature = "serde", serde(rename = "خدمات"))]
    pub services: i64,
}

pub type HeaderRecord = OrderedMap<String>;
pub type TotalsRecord = OrderedMap<TotalsRow>;

/// The assembled report for one PDF.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct ReportDocument {
    #[cfg_attr(feature = "serde", serde(rename = "Header"))]
    pub header: HeaderRecord,
    #[cfg_attr(feature = "serde", serde(rename = "Operation"))]
    pub operation: ShiftSection,
    #[cfg_attr(feature = "serde", serde(rename = "Herasat"))]
    pub herasat: ShiftSection,
    #[cfg_attr(feature = "serde", serde(rename = "Ordogahi"))]
    pub ordogahi: ShiftSection,
    pub employer: EmployerSection,
    #[cfg_attr(feature = "serde", serde(rename = "Drilling"))]
    pub drilling: DrillingSection,
    #[cfg_attr(feature = "serde", serde(rename = "Foods"))]
    pub foods: FoodsRecord,
    pub total: TotalsRecord,
    /// Sheets with no section of their own, kept for inspection only.
    #[cfg_attr(feature = "serde", serde(skip))]
    pub unmapped: OrderedMap<RawGrid>,
}

impl ReportDocument {
    pub fn shift_section(&self, kind: ShiftSectionKind) -> &ShiftSection {
        match kind {
            ShiftSectionKind::Operation => &self.operation,
            ShiftSectionKind::Herasat => &self.herasat,
            ShiftSectionKind::Ordogahi => &self.ordogahi,
        }
    }
}
