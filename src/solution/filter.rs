//! Completion classification and `cycles-reactors-symbols` filters

use std::fmt;
use std::str::FromStr;

use thiserror::Error;

const INCOMPLETE: &str = "INCOMPLETE";

#[derive(Error, Debug, PartialEq, Eq)]
pub enum FilterError {
    #[error("Invalid filter '{0}' - should be of form [cycles]-[reactors]-[symbols]")]
    Shape(String),
    #[error("Invalid filter '{filter}' - '{token}' is not a number or '*'")]
    Token { filter: String, token: String },
}

/// Stats the game recorded for the last run of a level.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CompletionStats {
    pub passed: bool,
    pub cycles: i64,
    pub reactors: i64,
    pub symbols: i64,
}

/// Counts taken from the solution as it is stored now.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LiveCounts {
    pub reactors: i64,
    pub symbols: i64,
}

impl CompletionStats {
    /// A passed level that has been edited since no longer matches its
    /// recorded counts and is treated as incomplete.
    pub fn is_complete(&self, live: &LiveCounts) -> bool {
        self.passed && self.reactors == live.reactors && self.symbols == live.symbols
    }

    /// `cycles-reactors-symbols` for complete solutions,
    /// `Incomplete-reactors-symbols` otherwise.
    pub fn label(&self, live: &LiveCounts) -> String {
        if self.is_complete(live) {
            format!("{}-{}-{}", self.cycles, live.reactors, live.symbols)
        } else {
            format!("Incomplete-{}-{}", live.reactors, live.symbols)
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatFilter {
    Any,
    Exactly(i64),
}

impl StatFilter {
    pub fn matches(&self, value: i64) -> bool {
        match self {
            StatFilter::Any => true,
            StatFilter::Exactly(expected) => *expected == value,
        }
    }

    fn parse(filter: &str, token: &str) -> Result<Self, FilterError> {
        if token == "*" {
            return Ok(StatFilter::Any);
        }
        token
            .parse()
            .map(StatFilter::Exactly)
            .map_err(|_| FilterError::Token {
                filter: filter.to_string(),
                token: token.to_string(),
            })
    }
}

impl fmt::Display for StatFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StatFilter::Any => write!(f, "*"),
            StatFilter::Exactly(value) => write!(f, "{}", value),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CyclesFilter {
    Stat(StatFilter),
    Incomplete,
}

/// Outcome of running a filter over one stored solution.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Selection {
    Selected,
    Skipped,
    /// Passed, and the filter matches the recorded stats, but the solution
    /// has been edited since it last ran.
    SkippedStale,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StatsFilter {
    pub cycles: CyclesFilter,
    pub reactors: StatFilter,
    pub symbols: StatFilter,
}

impl StatsFilter {
    pub fn any() -> Self {
        Self {
            cycles: CyclesFilter::Stat(StatFilter::Any),
            reactors: StatFilter::Any,
            symbols: StatFilter::Any,
        }
    }

    pub fn wants_incomplete(&self) -> bool {
        self.cycles == CyclesFilter::Incomplete
    }

    /// Complete solutions are matched on their recorded stats, incomplete
    /// ones (only by an `INCOMPLETE` filter) on their live counts.
    pub fn select(&self, recorded: &CompletionStats, live: &LiveCounts) -> Selection {
        let matches_recorded = || match self.cycles {
            CyclesFilter::Stat(cycles) => {
                cycles.matches(recorded.cycles)
                    && self.reactors.matches(recorded.reactors)
                    && self.symbols.matches(recorded.symbols)
            }
            CyclesFilter::Incomplete => false,
        };

        if recorded.is_complete(live) {
            if matches_recorded() {
                Selection::Selected
            } else {
                Selection::Skipped
            }
        } else if self.wants_incomplete() {
            if self.reactors.matches(live.reactors) && self.symbols.matches(live.symbols) {
                Selection::Selected
            } else {
                Selection::Skipped
            }
        } else if recorded.passed && matches_recorded() {
            Selection::SkippedStale
        } else {
            Selection::Skipped
        }
    }
}

impl Default for StatsFilter {
    fn default() -> Self {
        Self::any()
    }
}

impl FromStr for StatsFilter {
    type Err = FilterError;

    fn from_str(filter: &str) -> Result<Self, Self::Err> {
        let tokens: Vec<&str> = filter.split('-').collect();
        let [cycles, reactors, symbols] = tokens.as_slice() else {
            return Err(FilterError::Shape(filter.to_string()));
        };

        let cycles = if cycles.eq_ignore_ascii_case(INCOMPLETE) {
            CyclesFilter::Incomplete
        } else {
            CyclesFilter::Stat(StatFilter::parse(filter, cycles)?)
        };

        Ok(Self {
            cycles,
            reactors: StatFilter::parse(filter, reactors)?,
            symbols: StatFilter::parse(filter, symbols)?,
        })
    }
}

impl fmt::Display for StatsFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.cycles {
            CyclesFilter::Stat(cycles) => write!(f, "{}", cycles)?,
            CyclesFilter::Incomplete => write!(f, "{}", INCOMPLETE)?,
        }
        write!(f, "-{}-{}", self.reactors, self.symbols)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn complete(cycles: i64, reactors: i64, symbols: i64) -> (CompletionStats, LiveCounts) {
        (
            CompletionStats {
                passed: true,
                cycles,
                reactors,
                symbols,
            },
            LiveCounts { reactors, symbols },
        )
    }

    fn filter(text: &str) -> StatsFilter {
        text.parse().unwrap()
    }

    #[test]
    fn test_exact_filter_selects_only_matching_complete_solution() {
        let f = filter("5-2-10");
        let (stats, live) = complete(5, 2, 10);
        assert_eq!(f.select(&stats, &live), Selection::Selected);

        let (stats, live) = complete(6, 2, 10);
        assert_eq!(f.select(&stats, &live), Selection::Skipped);

        let (stats, live) = complete(5, 2, 11);
        assert_eq!(f.select(&stats, &live), Selection::Skipped);
    }

    #[test]
    fn test_wildcards_select_every_complete_solution() {
        let f = filter("*-*-*");
        for (cycles, reactors, symbols) in [(1, 1, 1), (500, 3, 80), (45, 1, 20)] {
            let (stats, live) = complete(cycles, reactors, symbols);
            assert_eq!(f.select(&stats, &live), Selection::Selected);
        }
    }

    #[test]
    fn test_wildcards_skip_incomplete_solutions() {
        let f = filter("*-*-*");
        let stats = CompletionStats {
            passed: false,
            cycles: 0,
            reactors: 0,
            symbols: 0,
        };
        let live = LiveCounts {
            reactors: 1,
            symbols: 12,
        };
        assert_eq!(f.select(&stats, &live), Selection::Skipped);
    }

    #[test]
    fn test_incomplete_filter_selects_every_incomplete_solution() {
        let f = filter("INCOMPLETE-*-*");
        let never_passed = CompletionStats {
            passed: false,
            cycles: 0,
            reactors: 0,
            symbols: 0,
        };
        let live = LiveCounts {
            reactors: 2,
            symbols: 30,
        };
        assert_eq!(f.select(&never_passed, &live), Selection::Selected);

        let (complete_stats, complete_live) = complete(5, 2, 10);
        assert_eq!(f.select(&complete_stats, &complete_live), Selection::Skipped);
    }

    #[test]
    fn test_incomplete_filter_uses_live_counts() {
        let f = filter("incomplete-1-12");
        let edited = CompletionStats {
            passed: true,
            cycles: 80,
            reactors: 1,
            symbols: 10,
        };
        let live = LiveCounts {
            reactors: 1,
            symbols: 12,
        };
        assert_eq!(f.select(&edited, &live), Selection::Selected);
        assert_eq!(
            filter("INCOMPLETE-1-10").select(&edited, &live),
            Selection::Skipped
        );
    }

    #[test]
    fn test_edited_solution_is_stale() {
        let edited = CompletionStats {
            passed: true,
            cycles: 80,
            reactors: 1,
            symbols: 10,
        };
        let live = LiveCounts {
            reactors: 1,
            symbols: 12,
        };
        assert!(!edited.is_complete(&live));
        assert_eq!(
            filter("80-1-10").select(&edited, &live),
            Selection::SkippedStale
        );
        assert_eq!(edited.label(&live), "Incomplete-1-12");
    }

    #[test]
    fn test_label_for_complete_solution() {
        let (stats, live) = complete(45, 1, 20);
        assert_eq!(stats.label(&live), "45-1-20");
    }

    #[test]
    fn test_malformed_filters() {
        assert_eq!(
            "5-2".parse::<StatsFilter>(),
            Err(FilterError::Shape("5-2".into()))
        );
        assert!(matches!(
            "5-2-10-1".parse::<StatsFilter>(),
            Err(FilterError::Shape(_))
        ));
        assert!(matches!(
            "5-x-10".parse::<StatsFilter>(),
            Err(FilterError::Token { .. })
        ));
        assert!(matches!(
            "*-INCOMPLETE-*".parse::<StatsFilter>(),
            Err(FilterError::Token { .. })
        ));
    }

    #[test]
    fn test_default_is_wildcard() {
        assert_eq!(StatsFilter::default().to_string(), "*-*-*");
        assert_eq!(filter("Incomplete-*-3").to_string(), "INCOMPLETE-*-3");
    }

    proptest! {
        #[test]
        fn wildcard_selects_any_complete_solution(
            cycles in 1i64..100_000,
            reactors in 1i64..7,
            symbols in 0i64..400,
        ) {
            let (stats, live) = complete(cycles, reactors, symbols);
            prop_assert_eq!(StatsFilter::any().select(&stats, &live), Selection::Selected);
            prop_assert_eq!(
                filter("INCOMPLETE-*-*").select(&stats, &live),
                Selection::Skipped
            );
        }
    }
}
