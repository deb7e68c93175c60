// 🏢 Organization Profile
// Fixed descriptive values the byline is built from.
// Everything here is a literal; derived values are computed on demand.

use crate::stats::{ScoreSummary, StatsError};

// ============================================================================
// PROFILE
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Profile {
    // Flags
    pub is_accepting_clients: bool,
    pub offers_remote_workshops: bool,
    pub is_hiring: bool,

    // Numbers
    pub current_year: i32,
    pub year_started: i32,
    pub number_of_employees: u32,

    // Identity
    pub author: &'static str,
    pub organization: &'static str,
    pub motto: &'static str,
    pub location: &'static str,

    // Lists (order is preserved in the banner)
    pub services: &'static [&'static str],
    pub satisfaction_scores: &'static [f64],
    pub office_locations: &'static [&'static str],
}

/// Reference profile rendered by `get_banner()`
pub const BATYROV: Profile = Profile {
    is_accepting_clients: true,
    offers_remote_workshops: true,
    is_hiring: false,

    current_year: 2025,
    year_started: 2020,
    number_of_employees: 25,

    author: "Bakhrom Botirov",
    organization: "Batyrov Analytics",
    motto: "Clear. Precise. Reliable.",
    location: "Tashkent, Uzbekistan",

    services: &["Data Analysis", "Machine Learning", "Business Intelligence"],
    satisfaction_scores: &[4.8, 4.6, 4.9, 5.0, 4.7],
    office_locations: &["Tashkent", "Samarkand", "Bukhara"],
};

impl Profile {
    pub fn years_active(&self) -> i32 {
        self.current_year - self.year_started
    }

    pub fn count_of_services(&self) -> usize {
        self.services.len()
    }

    pub fn count_of_locations(&self) -> usize {
        self.office_locations.len()
    }

    pub fn count_of_scores(&self) -> usize {
        self.satisfaction_scores.len()
    }

    /// Min/max/mean/std-dev over the satisfaction scores
    pub fn score_summary(&self) -> Result<ScoreSummary, StatsError> {
        ScoreSummary::from_scores(self.satisfaction_scores)
    }
}
