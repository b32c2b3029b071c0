//! Text and category normalization: whitespace cleanup, color cleanup,
//! drivetrain resolution and folding, and stock-status vocabulary.

use std::collections::BTreeMap;
use std::sync::LazyLock;

use carinv_core::Drivetrain;
use regex::Regex;

static BRACKETED_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\[[^\]]*\]").expect("valid regex"));

/// Verbose drivetrain names (uppercase) in match priority order. Short tokens
/// are included so an exact `"AWD"` resolves through the same table.
const VERBOSE_DRIVETRAINS: [(&str, Drivetrain); 13] = [
    ("ALL WHEEL DRIVE", Drivetrain::Awd),
    ("ALL-WHEEL DRIVE", Drivetrain::Awd),
    ("AWD", Drivetrain::Awd),
    ("FOUR WHEEL DRIVE", Drivetrain::FourWd),
    ("FOUR-WHEEL DRIVE", Drivetrain::FourWd),
    ("4WD", Drivetrain::FourWd),
    ("4X4", Drivetrain::FourByFour),
    ("FRONT WHEEL DRIVE", Drivetrain::Fwd),
    ("FRONT-WHEEL DRIVE", Drivetrain::Fwd),
    ("FWD", Drivetrain::Fwd),
    ("REAR WHEEL DRIVE", Drivetrain::Rwd),
    ("REAR-WHEEL DRIVE", Drivetrain::Rwd),
    ("RWD", Drivetrain::Rwd),
];

/// Collapses every run of whitespace to one space and trims the ends.
#[must_use]
pub fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Whitespace-collapsed text, or `None` when nothing is left.
#[must_use]
pub fn clean_text(text: Option<&str>) -> Option<String> {
    text.map(collapse_whitespace).filter(|s| !s.is_empty())
}

/// Cleans a color name: drops `[bracketed]` annotations and registered-mark
/// glyphs (raw or HTML-escaped), then collapses whitespace.
#[must_use]
pub fn normalize_color(raw: Option<&str>) -> Option<String> {
    let raw = raw?;
    let without_brackets = BRACKETED_RE.replace_all(raw, "");
    let without_marks = without_brackets
        .replace("&#xAE;", "")
        .replace("&reg;", "")
        .replace('\u{ae}', "");
    clean_text(Some(&without_marks))
}

/// Resolves a drivetrain token from candidate strings (raw drivetrain field,
/// trim, title...). For each candidate in order:
///
/// 1. exact match of the uppercased string against the verbose-name table;
/// 2. any verbose name embedded in the string;
/// 3. any short token embedded in the string.
///
/// The first candidate yielding a match wins. Nothing is guessed: no match
/// means `None`.
#[must_use]
pub fn resolve_drivetrain(sources: &[Option<&str>]) -> Option<Drivetrain> {
    sources
        .iter()
        .flatten()
        .filter(|s| !s.trim().is_empty())
        .find_map(|raw| resolve_one(raw))
}

fn resolve_one(raw: &str) -> Option<Drivetrain> {
    let upper = collapse_whitespace(raw).to_uppercase();

    if let Some((_, token)) = VERBOSE_DRIVETRAINS.iter().find(|(name, _)| *name == upper) {
        return Some(*token);
    }
    if let Some((_, token)) = VERBOSE_DRIVETRAINS
        .iter()
        .find(|(name, _)| upper.contains(name))
    {
        return Some(*token);
    }
    Drivetrain::TOKENS
        .into_iter()
        .find(|token| upper.contains(token.as_str()))
}

/// Folding table applied after resolution, e.g. `4WD -> AWD`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DrivetrainAliases {
    table: BTreeMap<Drivetrain, Drivetrain>,
}

impl DrivetrainAliases {
    /// A table that folds nothing.
    #[must_use]
    pub fn none() -> Self {
        Self {
            table: BTreeMap::new(),
        }
    }

    #[must_use]
    pub fn from_table(table: BTreeMap<Drivetrain, Drivetrain>) -> Self {
        Self { table }
    }

    #[must_use]
    pub fn fold(&self, drivetrain: Drivetrain) -> Drivetrain {
        self.table.get(&drivetrain).copied().unwrap_or(drivetrain)
    }
}

impl Default for DrivetrainAliases {
    /// Four-wheel-drive variants report as `AWD`.
    fn default() -> Self {
        Self::from_table(BTreeMap::from([
            (Drivetrain::FourWd, Drivetrain::Awd),
            (Drivetrain::FourByFour, Drivetrain::Awd),
        ]))
    }
}

/// Folds a stock-status label into the report vocabulary (`In Stock`,
/// `In Transit`, `In Production`, `Ordered`, optionally prefixed with
/// `Sale Pending - `). Unrecognized labels pass through cleaned. Bare
/// condition words (`New`, `Used`) are not a status and resolve to `None`.
#[must_use]
pub fn normalize_status(raw: Option<&str>) -> Option<String> {
    let cleaned = clean_text(raw)?;
    let lower = collapse_whitespace(&cleaned.to_lowercase().replace(['-', '_'], " "));

    if matches!(lower.as_str(), "new" | "used") {
        return None;
    }

    let sale_pending = lower.contains("sale pending");
    let rest = lower.replace("sale pending", "");

    let base = if rest.contains("transit") {
        Some("In Transit")
    } else if rest.contains("production") || rest.contains("build") {
        Some("In Production")
    } else if rest.contains("stock") {
        Some("In Stock")
    } else if rest.contains("ordered") {
        Some("Ordered")
    } else {
        None
    };

    match (sale_pending, base) {
        (true, Some(base)) => Some(format!("Sale Pending - {base}")),
        (true, None) => Some("Sale Pending".to_string()),
        (false, Some(base)) => Some(base.to_string()),
        (false, None) => Some(cleaned),
    }
}

#[cfg(test)]
#[path = "text_test.rs"]
mod tests;
