// 🪧 Banner Composer
// Renders a Profile and its score statistics into the multi-line byline.
//
// Layout is fixed: rule, title, rule, one "Label: value" row per field, rule.
// Values follow the reference formatting (True/False, ['a', 'b'], 5.0, 1e-05).

use crate::profile::{Profile, BATYROV};
use crate::stats::StatsError;
use std::fmt;
use std::sync::OnceLock;

// ============================================================================
// LAYOUT
// ============================================================================

/// Horizontal rule framing the banner (58 asterisks)
pub const RULE: &str = "**********************************************************";

/// Width of the label column, including the trailing padding
pub const LABEL_WIDTH: usize = 28;

/// Row labels in render order
pub const BANNER_LABELS: [&str; 15] = [
    "Author:",
    "Motto:",
    "Location:",
    "Years Active:",
    "Number of Employees:",
    "Accepting New Clients?:",
    "Hiring?:",
    "Remote Workshops?:",
    "Services:",
    "Office Locations:",
    "Client Satisfaction Scores:",
    "Minimum Satisfaction Score:",
    "Maximum Satisfaction Score:",
    "Mean Satisfaction Score:",
    "     Standard Deviation:",
];

// ============================================================================
// BANNER
// ============================================================================

/// Rendered byline. Immutable once built.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Banner {
    text: String,
}

impl Banner {
    /// Render a profile. Fails only if the scores can't be summarized
    /// (fewer than two values).
    pub fn new(profile: &Profile) -> Result<Self, StatsError> {
        let summary = profile.score_summary()?;

        let values = [
            profile.author.to_string(),
            profile.motto.to_string(),
            profile.location.to_string(),
            profile.years_active().to_string(),
            profile.number_of_employees.to_string(),
            bool_text(profile.is_accepting_clients).to_string(),
            bool_text(profile.is_hiring).to_string(),
            bool_text(profile.offers_remote_workshops).to_string(),
            str_list(profile.services),
            str_list(profile.office_locations),
            float_list(profile.satisfaction_scores),
            float_text(summary.min),
            float_text(summary.max),
            format!("{:.2}", summary.mean),
            format!("{:.2}", summary.std_dev),
        ];

        let mut text = String::new();
        text.push('\n');
        text.push_str(RULE);
        text.push('\n');
        text.push_str(&format!("{} — Project Header\n", profile.organization));
        text.push_str(RULE);
        text.push('\n');
        for (label, value) in BANNER_LABELS.iter().zip(values.iter()) {
            text.push_str(&format!("{:<width$}{}\n", label, value, width = LABEL_WIDTH));
        }
        text.push_str(RULE);
        text.push('\n');

        Ok(Banner { text })
    }

    pub fn as_str(&self) -> &str {
        &self.text
    }

    pub fn into_string(self) -> String {
        self.text
    }
}

impl fmt::Display for Banner {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}

// ============================================================================
// CACHED ACCESSOR
// ============================================================================

static BANNER: OnceLock<Banner> = OnceLock::new();

/// Banner for the reference profile, rendered on first call and reused after.
pub fn get_banner() -> &'static str {
    BANNER
        .get_or_init(|| Banner::new(&BATYROV).expect("reference profile has five scores"))
        .as_str()
}

// ============================================================================
// VALUE FORMATTING
// ============================================================================

fn bool_text(value: bool) -> &'static str {
    if value {
        "True"
    } else {
        "False"
    }
}

/// Shortest round-trip form that always reads as a float: `5.0`, `4.8`.
/// Below 1e-4 or from 1e16 up it switches to exponent form with a signed,
/// two-digit exponent (`1e-05`, `1.5e+16`).
fn float_text(value: f64) -> String {
    if value.is_nan() {
        return "nan".to_string();
    }
    if value.is_infinite() {
        return if value > 0.0 { "inf" } else { "-inf" }.to_string();
    }

    let scientific = format!("{:e}", value);
    let (mantissa, exponent) = match scientific.split_once('e') {
        Some((m, e)) => (m, e.parse::<i32>().unwrap_or(0)),
        None => (scientific.as_str(), 0),
    };

    if value != 0.0 && !(-4..16).contains(&exponent) {
        let sign = if exponent < 0 { '-' } else { '+' };
        format!("{}e{}{:02}", mantissa, sign, exponent.abs())
    } else {
        let plain = value.to_string();
        if plain.contains('.') {
            plain
        } else {
            format!("{}.0", plain)
        }
    }
}

fn float_list(values: &[f64]) -> String {
    let items: Vec<String> = values.iter().map(|v| float_text(*v)).collect();
    format!("[{}]", items.join(", "))
}

fn str_list(values: &[&str]) -> String {
    let items: Vec<String> = values.iter().map(|v| format!("'{}'", v)).collect();
    format!("[{}]", items.join(", "))
}
