//! In-memory request cache
//!
//! Short-circuits GET requests inside their freshness window. The cache is
//! owned by the data service, never a global, and is not persisted.

pub mod key;
pub mod memory;

use std::time::Duration;

/// Freshness classes for cached responses.
///
/// Callers pick a class by how volatile an endpoint's data is.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TtlClass {
    /// Live-ish data (region detail, reports)
    Short,
    /// Lists edited from the config manager (regions, markers, news)
    Medium,
    /// Rarely-changing data (buttons, pages, settings)
    Long,
}

impl TtlClass {
    pub const SHORT: Duration = Duration::from_secs(30); // 30 sec
    pub const MEDIUM: Duration = Duration::from_secs(5 * 60); // 5 min
    pub const LONG: Duration = Duration::from_secs(60 * 60); // 1 hr

    pub fn duration(self) -> Duration {
        match self {
            TtlClass::Short => Self::SHORT,
            TtlClass::Medium => Self::MEDIUM,
            TtlClass::Long => Self::LONG,
        }
    }
}

pub use key::request_key;
pub use memory::RequestCache;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ttl_durations() {
        assert_eq!(TtlClass::Short.duration(), Duration::from_secs(30));
        assert_eq!(TtlClass::Medium.duration(), Duration::from_secs(300));
        assert_eq!(TtlClass::Long.duration(), Duration::from_secs(3600));
    }
}
