// Batyrov Byline - Core Library
// Organization header banner, score statistics, speech readout and logging

pub mod stats;
pub mod profile;
pub mod banner;
pub mod speech;
pub mod logging;

// Re-export commonly used types
pub use stats::{ScoreSummary, StatsError, min, max, mean, sample_std_dev};
pub use profile::{Profile, BATYROV};
pub use banner::{Banner, get_banner, BANNER_LABELS, RULE};
pub use speech::{
    SpeechEngine, CommandEngine, SpeechError, SpeechOutcome,
    speak_banner, speak_with,
};
pub use logging::{LogConfig, LineFormat, RotatingFile};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
