use super::model::{RosterKind, ShiftLetter, ShiftSectionKind};

/// What a catalog sheet name refers to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SheetKind {
    Header,
    Shift(ShiftSectionKind, ShiftLetter),
    ShiftTotal(ShiftSectionKind),
    Roster(RosterKind),
    RosterTotal(RosterKind),
    Supervisor,
    Foods,
    Totals,
    Unknown(String),
}

impl SheetKind {
    /// Decode a catalog sheet name. Names are matched exactly.
    pub fn from_name(name: &str) -> Self {
        match name {
            "Header" => return SheetKind::Header,
            "ShiftTotalPage1" => return SheetKind::ShiftTotal(ShiftSectionKind::Operation),
            "ShiftTotalHerasat" => return SheetKind::ShiftTotal(ShiftSectionKind::Herasat),
            "ShiftTotalOrdogahi" => return SheetKind::ShiftTotal(ShiftSectionKind::Ordogahi),
            "EmployerPage3" => return SheetKind::Roster(RosterKind::Employer),
            "DrillingPage4" => return SheetKind::Roster(RosterKind::Drilling),
            "EmployerTotal" => return SheetKind::RosterTotal(RosterKind::Employer),
            "DrillingTotal" => return SheetKind::RosterTotal(RosterKind::Drilling),
            "EmployerSupervisor" => return SheetKind::Supervisor,
            "Foods" => return SheetKind::Foods,
            "Total" => return SheetKind::Totals,
            _ => {}
        }

        let shift = name
            .strip_prefix("Shift")
            .and_then(|rest| rest.strip_suffix("Page1"))
            .map(|letter| (ShiftSectionKind::Operation, letter))
            .or_else(|| {
                name.strip_prefix("HerasatShift")
                    .map(|letter| (ShiftSectionKind::Herasat, letter))
            })
            .or_else(|| {
                name.strip_prefix("OrdogahiShift")
                    .map(|letter| (ShiftSectionKind::Ordogahi, letter))
            })
            .and_then(|(section, letter)| Some((section, single_letter(letter)?)));

        match shift {
            Some((section, letter)) => SheetKind::Shift(section, letter),
            None => SheetKind::Unknown(name.to_string()),
        }
    }

    /// Top-level output key the sheet lands in, `None` for unknown sheets.
    pub fn section_key(&self) -> Option<&'static str> {
        match self {
            SheetKind::Header => Some("Header"),
            SheetKind::Shift(section, _) | SheetKind::ShiftTotal(section) => Some(section.key()),
            SheetKind::Roster(RosterKind::Employer)
            | SheetKind::RosterTotal(RosterKind::Employer)
            | SheetKind::Supervisor => Some("employer"),
            SheetKind::Roster(RosterKind::Drilling) | SheetKind::RosterTotal(RosterKind::Drilling) => {
                Some("Drilling")
            }
            SheetKind::Foods => Some("Foods"),
            SheetKind::Totals => Some("total"),
            SheetKind::Unknown(_) => None,
        }
    }
}

fn single_letter(s: &str) -> Option<ShiftLetter> {
    let mut chars = s.chars();
    let letter = ShiftLetter::from_char(chars.next()?)?;
    chars.next().is_none().then_some(letter)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn operation_shifts() {
        assert_eq!(
            SheetKind::from_name("ShiftBPage1"),
            SheetKind::Shift(ShiftSectionKind::Operation, ShiftLetter::B)
        );
        assert_eq!(
            SheetKind::from_name("ShiftEPage1"),
            SheetKind::Unknown("ShiftEPage1".into())
        );
    }

    #[test]
    fn guard_and_camp_shifts() {
        assert_eq!(
            SheetKind::from_name("HerasatShiftD"),
            SheetKind::Shift(ShiftSectionKind::Herasat, ShiftLetter::D)
        );
        assert_eq!(
            SheetKind::from_name("OrdogahiShiftA"),
            SheetKind::Shift(ShiftSectionKind::Ordogahi, ShiftLetter::A)
        );
        assert_eq!(
            SheetKind::from_name("OrdogahiShiftAB"),
            SheetKind::Unknown("OrdogahiShiftAB".into())
        );
    }

    #[test]
    fn fixed_names() {
        assert_eq!(
            SheetKind::from_name("ShiftTotalPage1"),
            SheetKind::ShiftTotal(ShiftSectionKind::Operation)
        );
        assert_eq!(
            SheetKind::from_name("DrillingTotal"),
            SheetKind::RosterTotal(RosterKind::Drilling)
        );
        assert_eq!(SheetKind::from_name("Total"), SheetKind::Totals);
        assert_eq!(SheetKind::from_name("header"), SheetKind::Unknown("header".into()));
    }

    #[test]
    fn section_keys() {
        assert_eq!(SheetKind::Supervisor.section_key(), Some("employer"));
        assert_eq!(SheetKind::from_name("HerasatShiftC").section_key(), Some("Herasat"));
        assert_eq!(SheetKind::Unknown("x".into()).section_key(), None);
    }
}
