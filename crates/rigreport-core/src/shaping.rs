//! Contextual shaping for Arabic-script text.
//!
//! Letters are replaced by their presentation forms (isolated, initial, medial,
//! final) according to how they join with their neighbours. Lam followed by an
//! alef becomes a ligature and harakat are dropped.

const ISOLATED: usize = 0;
const INITIAL: usize = 1;
const MEDIAL: usize = 2;
const FINAL: usize = 3;

/// `(letter, [isolated, initial, medial, final])`; `0` marks a missing form.
/// Sorted by letter.
const LETTERS: &[(char, [u32; 4])] = &[
    ('\u{0621}', [0xFE80, 0, 0, 0]),
    ('\u{0622}', [0xFE81, 0, 0, 0xFE82]),
    ('\u{0623}', [0xFE83, 0, 0, 0xFE84]),
    ('\u{0624}', [0xFE85, 0, 0, 0xFE86]),
    ('\u{0625}', [0xFE87, 0, 0, 0xFE88]),
    ('\u{0626}', [0xFE89, 0xFE8B, 0xFE8C, 0xFE8A]),
    ('\u{0627}', [0xFE8D, 0, 0, 0xFE8E]),
    ('\u{0628}', [0xFE8F, 0xFE91, 0xFE92, 0xFE90]),
    ('\u{0629}', [0xFE93, 0, 0, 0xFE94]),
    ('\u{062A}', [0xFE95, 0xFE97, 0xFE98, 0xFE96]),
    ('\u{062B}', [0xFE99, 0xFE9B, 0xFE9C, 0xFE9A]),
    ('\u{062C}', [0xFE9D, 0xFE9F, 0xFEA0, 0xFE9E]),
    ('\u{062D}', [0xFEA1, 0xFEA3, 0xFEA4, 0xFEA2]),
    ('\u{062E}', [0xFEA5, 0xFEA7, 0xFEA8, 0xFEA6]),
    ('\u{062F}', [0xFEA9, 0, 0, 0xFEAA]),
    ('\u{0630}', [0xFEAB, 0, 0, 0xFEAC]),
    ('\u{0631}', [0xFEAD, 0, 0, 0xFEAE]),
    ('\u{0632}', [0xFEAF, 0, 0, 0xFEB0]),
    ('\u{0633}', [0xFEB1, 0xFEB3, 0xFEB4, 0xFEB2]),
    ('\u{0634}', [0xFEB5, 0xFEB7, 0xFEB8, 0xFEB6]),
    ('\u{0635}', [0xFEB9, 0xFEBB, 0xFEBC, 0xFEBA]),
    ('\u{0636}', [0xFEBD, 0xFEBF, 0xFEC0, 0xFEBE]),
    ('\u{0637}', [0xFEC1, 0xFEC3, 0xFEC4, 0xFEC2]),
    ('\u{0638}', [0xFEC5, 0xFEC7, 0xFEC8, 0xFEC6]),
    ('\u{0639}', [0xFEC9, 0xFECB, 0xFECC, 0xFECA]),
    ('\u{063A}', [0xFECD, 0xFECF, 0xFED0, 0xFECE]),
    ('\u{0640}', [0x0640, 0x0640, 0x0640, 0x0640]),
    ('\u{0641}', [0xFED1, 0xFED3, 0xFED4, 0xFED2]),
    ('\u{0642}', [0xFED5, 0xFED7, 0xFED8, 0xFED6]),
    ('\u{0643}', [0xFED9, 0xFEDB, 0xFEDC, 0xFEDA]),
    ('\u{0644}', [0xFEDD, 0xFEDF, 0xFEE0, 0xFEDE]),
    ('\u{0645}', [0xFEE1, 0xFEE3, 0xFEE4, 0xFEE2]),
    ('\u{0646}', [0xFEE5, 0xFEE7, 0xFEE8, 0xFEE6]),
    ('\u{0647}', [0xFEE9, 0xFEEB, 0xFEEC, 0xFEEA]),
    ('\u{0648}', [0xFEED, 0, 0, 0xFEEE]),
    ('\u{0649}', [0xFEEF, 0xFBE8, 0xFBE9, 0xFEF0]),
    ('\u{064A}', [0xFEF1, 0xFEF3, 0xFEF4, 0xFEF2]),
    ('\u{067E}', [0xFB56, 0xFB58, 0xFB59, 0xFB57]),
    ('\u{0686}', [0xFB7A, 0xFB7C, 0xFB7D, 0xFB7B]),
    ('\u{0698}', [0xFB8A, 0, 0, 0xFB8B]),
    ('\u{06A9}', [0xFB8E, 0xFB90, 0xFB91, 0xFB8F]),
    ('\u{06AF}', [0xFB92, 0xFB94, 0xFB95, 0xFB93]),
    ('\u{06CC}', [0xFBFC, 0xFBFE, 0xFBFF, 0xFBFD]),
];

/// Lam-alef ligatures: `(alef, isolated, final)`.
const LAM_ALEF: &[(char, char, char)] = &[
    ('\u{0622}', '\u{FEF5}', '\u{FEF6}'),
    ('\u{0623}', '\u{FEF7}', '\u{FEF8}'),
    ('\u{0625}', '\u{FEF9}', '\u{FEFA}'),
    ('\u{0627}', '\u{FEFB}', '\u{FEFC}'),
];

const LAM: char = '\u{0644}';

fn forms(c: char) -> Option<&'static [u32; 4]> {
    LETTERS
        .binary_search_by(|(letter, _)| letter.cmp(&c))
        .ok()
        .map(|i| &LETTERS[i].1)
}

fn has_form(c: char, form: usize) -> bool {
    forms(c).is_some_and(|f| f[form] != 0)
}

fn is_harakah(c: char) -> bool {
    matches!(c,
        '\u{0610}'..='\u{061A}'
        | '\u{064B}'..='\u{065F}'
        | '\u{0670}'
        | '\u{06D6}'..='\u{06DC}'
        | '\u{06DF}'..='\u{06E8}'
        | '\u{06EA}'..='\u{06ED}'
        | '\u{08D4}'..='\u{08E1}'
        | '\u{08E3}'..='\u{08FF}')
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum Shaped {
    /// Passed through untouched.
    Plain(char),
    Letter(char, usize),
    /// Ligature glyph that absorbed the following letter.
    Ligature(char),
}

/// Replace letters with their contextual presentation forms.
pub fn reshape(text: &str) -> String {
    let mut out: Vec<Shaped> = Vec::with_capacity(text.len());

    for c in text.chars().filter(|&c| !is_harakah(c)) {
        if forms(c).is_none() {
            out.push(Shaped::Plain(c));
            continue;
        }
        let next = match out.last_mut() {
            Some(Shaped::Letter(prev, prev_form)) => {
                let (prev, form) = (*prev, *prev_form);
                if !has_form(c, FINAL)
                    || !has_form(prev, INITIAL)
                    || (form == FINAL && !has_form(prev, MEDIAL))
                {
                    Shaped::Letter(c, ISOLATED)
                } else {
                    *prev_form = if form == ISOLATED { INITIAL } else { MEDIAL };
                    Shaped::Letter(c, FINAL)
                }
            }
            _ => Shaped::Letter(c, ISOLATED),
        };
        out.push(next);
    }

    join_lam_alef(&mut out);

    out.into_iter()
        .map(|s| match s {
            Shaped::Plain(c) | Shaped::Ligature(c) => c,
            Shaped::Letter(c, form) => forms(c)
                .and_then(|f| char::from_u32(f[form]))
                .unwrap_or(c),
        })
        .collect()
}

fn join_lam_alef(out: &mut Vec<Shaped>) {
    let mut i = 0;
    while i + 1 < out.len() {
        if let (Shaped::Letter(LAM, lam_form), Shaped::Letter(alef, _)) = (out[i], out[i + 1]) {
            if let Some(&(_, isolated, fin)) = LAM_ALEF.iter().find(|(a, _, _)| *a == alef) {
                let glyph = if lam_form == ISOLATED || lam_form == INITIAL {
                    isolated
                } else {
                    fin
                };
                out[i] = Shaped::Ligature(glyph);
                out.remove(i + 1);
            }
        }
        i += 1;
    }
}
