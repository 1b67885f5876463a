//! Visual identity for a booth: section letter, exhibitor initials and a
//! neutral color scheme picked by section.

use std::sync::LazyLock;

use regex::Regex;
use serde::Serialize;

const DEFAULT_SECTION: char = 'A';
const DEFAULT_NUMBER: u32 = 100;

/// `<letters><optional dash><digits>`, e.g. `B-205` or `AB12`.
static BOOTH_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^([A-Za-z]+)-?(\d+)$").expect("Invalid regex pattern for booth number")
});

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ColorScheme {
    pub background: &'static str,
    pub text: &'static str,
    pub border: &'static str,
}

/// Hall sections with a dedicated color scheme.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Section {
    A,
    B,
    C,
    D,
    E,
    F,
    G,
    H,
    I,
    J,
}

impl Section {
    /// Letters outside A-J share section A's scheme.
    pub fn from_letter(letter: char) -> Self {
        match letter.to_ascii_uppercase() {
            'B' => Section::B,
            'C' => Section::C,
            'D' => Section::D,
            'E' => Section::E,
            'F' => Section::F,
            'G' => Section::G,
            'H' => Section::H,
            'I' => Section::I,
            'J' => Section::J,
            _ => Section::A,
        }
    }

    pub fn color_scheme(self) -> ColorScheme {
        let (background, text, border) = match self {
            Section::A => ("from-slate-50 to-slate-100", "text-slate-700", "border-slate-300"),
            Section::B => ("from-gray-50 to-gray-100", "text-gray-700", "border-gray-300"),
            Section::C => ("from-zinc-50 to-zinc-100", "text-zinc-700", "border-zinc-300"),
            Section::D => ("from-neutral-50 to-neutral-100", "text-neutral-700", "border-neutral-300"),
            Section::E => ("from-stone-50 to-stone-100", "text-stone-700", "border-stone-300"),
            Section::F => ("from-slate-100 to-gray-200", "text-slate-800", "border-slate-400"),
            Section::G => ("from-gray-100 to-zinc-200", "text-gray-800", "border-gray-400"),
            Section::H => ("from-zinc-100 to-neutral-200", "text-zinc-800", "border-zinc-400"),
            Section::I => ("from-neutral-100 to-stone-200", "text-neutral-800", "border-neutral-400"),
            Section::J => ("from-stone-100 to-slate-200", "text-stone-800", "border-stone-400"),
        };
        ColorScheme {
            background,
            text,
            border,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BoothIdentity {
    pub section_letter: char,
    pub booth_number: String,
    pub number: u32,
    pub initials: String,
    pub color_scheme: ColorScheme,
}

impl BoothIdentity {
    pub fn derive(exhibitor_name: &str, booth_number: &str) -> Self {
        let booth_number = booth_number.trim();
        let (section_letter, number) = parse_booth_number(booth_number);

        BoothIdentity {
            section_letter,
            booth_number: booth_number.to_string(),
            number,
            initials: initials(exhibitor_name),
            color_scheme: Section::from_letter(section_letter).color_scheme(),
        }
    }
}

/// Section letter and numeric part; `('A', 100)` when the input does not
/// look like a booth number. A digit group too large for `u32` keeps the
/// letter and uses the default number.
fn parse_booth_number(booth_number: &str) -> (char, u32) {
    let Some(caps) = BOOTH_PATTERN.captures(booth_number) else {
        return (DEFAULT_SECTION, DEFAULT_NUMBER);
    };

    let section_letter = caps[1]
        .chars()
        .next()
        .map(|c| c.to_ascii_uppercase())
        .unwrap_or(DEFAULT_SECTION);
    let number = caps[2].parse().unwrap_or(DEFAULT_NUMBER);
    (section_letter, number)
}

/// Tokens of two characters or fewer ("Co", "of", "&") are skipped.
fn initials(exhibitor_name: &str) -> String {
    let tokens: Vec<&str> = exhibitor_name
        .split_whitespace()
        .filter(|token| token.chars().count() > 2)
        .collect();

    let raw: String = match tokens.as_slice() {
        [first, second, ..] => first.chars().take(1).chain(second.chars().take(1)).collect(),
        [only] => only.chars().take(2).collect(),
        [] => exhibitor_name.trim().chars().take(2).collect(),
    };
    raw.to_uppercase()
}
