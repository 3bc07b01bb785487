//! Source locations and their execution hit counts.
//!
//! A [`Location`] is a span of source text with a 1-based inclusive start and
//! an exclusive end column. Locations of one file never overlap, so the
//! derived ordering on `(start_line, start_col, end_line, end_col)` is also
//! left-to-right textual order.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A 2-D span of source text
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Location {
    /// First line of the span (1-based)
    pub start_line: u32,
    /// First column of the span (1-based, inclusive)
    pub start_col: u32,
    /// Last line of the span (1-based)
    pub end_line: u32,
    /// Column after the span on `end_line` (exclusive)
    pub end_col: u32,
}

impl Location {
    /// Create a new location
    #[must_use]
    pub const fn new(start_line: u32, start_col: u32, end_line: u32, end_col: u32) -> Self {
        Self {
            start_line,
            start_col,
            end_line,
            end_col,
        }
    }

    /// Start position as `(line, col)`
    #[must_use]
    pub const fn start(&self) -> (u32, u32) {
        (self.start_line, self.start_col)
    }

    /// End position as `(line, col)`
    #[must_use]
    pub const fn end(&self) -> (u32, u32) {
        (self.end_line, self.end_col)
    }

    /// Whether the span covers more than one line
    #[must_use]
    pub const fn is_multiline(&self) -> bool {
        self.start_line != self.end_line
    }

    /// Whether this location starts before the given position
    #[must_use]
    pub fn starts_before(&self, line: u32, col: u32) -> bool {
        self.start() < (line, col)
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}:{}-{}:{}",
            self.start_line, self.start_col, self.end_line, self.end_col
        )
    }
}

/// A location paired with the number of times it was evaluated
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct LocationHit {
    /// The covered span
    #[serde(flatten)]
    pub location: Location,
    /// Number of evaluations
    #[serde(default)]
    pub hits: u64,
}

impl LocationHit {
    /// Create a new location hit
    #[must_use]
    pub const fn new(location: Location, hits: u64) -> Self {
        Self { location, hits }
    }

    /// Whether the location was evaluated at least once
    #[must_use]
    pub const fn is_covered(&self) -> bool {
        self.hits > 0
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_ordering_is_lexicographic() {
        let mut locations = vec![
            Location::new(2, 1, 2, 4),
            Location::new(1, 7, 1, 9),
            Location::new(1, 1, 1, 3),
            Location::new(1, 1, 1, 2),
        ];
        locations.sort();
        assert_eq!(
            locations,
            vec![
                Location::new(1, 1, 1, 2),
                Location::new(1, 1, 1, 3),
                Location::new(1, 7, 1, 9),
                Location::new(2, 1, 2, 4),
            ]
        );
    }

    #[test]
    fn test_starts_before() {
        let loc = Location::new(3, 5, 3, 8);
        assert!(loc.starts_before(3, 6));
        assert!(loc.starts_before(4, 1));
        assert!(!loc.starts_before(3, 5));
        assert!(!loc.starts_before(2, 40));
    }

    #[test]
    fn test_multiline() {
        assert!(Location::new(1, 1, 2, 1).is_multiline());
        assert!(!Location::new(1, 1, 1, 9).is_multiline());
    }

    #[test]
    fn test_display() {
        assert_eq!(Location::new(1, 2, 3, 4).to_string(), "1:2-3:4");
    }

    #[test]
    fn test_hit_deserializes_flat() {
        let hit: LocationHit = serde_json::from_str(
            r#"{"start_line":1,"start_col":2,"end_line":1,"end_col":6,"hits":3}"#,
        )
        .unwrap();
        assert_eq!(hit.location, Location::new(1, 2, 1, 6));
        assert!(hit.is_covered());
    }

    #[test]
    fn test_hit_defaults_to_uncovered() {
        let hit: LocationHit =
            serde_json::from_str(r#"{"start_line":1,"start_col":2,"end_line":1,"end_col":6}"#)
                .unwrap();
        assert_eq!(hit.hits, 0);
        assert!(!hit.is_covered());
    }
}
