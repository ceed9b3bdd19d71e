//! Itinerary document type
//!
//! The planner's markdown is kept verbatim; the day structure is parsed out
//! of it so callers (and tests) can reason about day count and pace without
//! trusting the generation backend.

use std::fmt;
use std::path::Path;
use std::sync::LazyLock;

use regex::Regex;
use serde::Serialize;
use tracing::{debug, warn};

use super::request::{Pace, Request};

/// Default file name for the plain-text export
pub const DEFAULT_EXPORT_FILE: &str = "travel_itinerary.txt";

/// Heading date format, e.g. "April 10"
const HEADING_DATE_FORMAT: &str = "%B %-d";

/// Markdown heading (up to h4) whose text starts with `Day <n>`
static DAY_HEADING: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^\s{0,3}#{1,4}\s*\**\s*Day\s+(\d+)\b\s*[-–—:.]?\s*(.*?)\s*\**\s*$")
        .expect("day heading pattern is valid")
});

/// Top-level markdown bullet
static BULLET: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[-*+]\s+(\S.*)$").expect("bullet pattern is valid"));

/// Observations attached to a document that was still returned to the caller
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum ItineraryWarning {
    /// No recognizable day heading; text is the planner's raw output
    MalformedOutput,
    /// Research found no sources; the document is a skeleton
    DegradedInput,
    /// Number of day-sections differs from the trip length
    DayCountMismatch { expected: usize, found: usize },
    /// A day's activity count falls outside the pace range
    PaceMismatch { day: u32, activities: usize, pace: Pace },
}

impl ItineraryWarning {
    /// Stable machine-readable code
    pub fn code(&self) -> &'static str {
        match self {
            Self::MalformedOutput => "MALFORMED_OUTPUT",
            Self::DegradedInput => "DEGRADED_INPUT",
            Self::DayCountMismatch { .. } => "DAY_COUNT_MISMATCH",
            Self::PaceMismatch { .. } => "PACE_MISMATCH",
        }
    }
}

impl fmt::Display for ItineraryWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MalformedOutput => write!(
                f,
                "{}: planner output has no recognizable day headings, showing it unmodified",
                self.code()
            ),
            Self::DegradedInput => write!(
                f,
                "{}: research returned no sources, itinerary contains no specific activities",
                self.code()
            ),
            Self::DayCountMismatch { expected, found } => {
                write!(f, "{}: expected {} day sections, found {}", self.code(), expected, found)
            }
            Self::PaceMismatch { day, activities, pace } => {
                let range = pace.activities_per_day();
                write!(
                    f,
                    "{}: day {} has {} activities, {} pace expects {}–{}",
                    self.code(),
                    day,
                    activities,
                    pace.name().to_lowercase(),
                    range.start(),
                    range.end()
                )
            }
        }
    }
}

/// One day of the itinerary
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DaySection {
    /// Day number as written in the heading
    pub index: u32,
    /// Heading text after the day number ("April 10: Arrival & Gion")
    pub title: String,
    /// Top-level bullet items under the heading
    pub activities: Vec<String>,
}

/// The formatted itinerary returned by a pipeline run
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ItineraryDocument {
    text: String,
    days: Vec<DaySection>,
    warnings: Vec<ItineraryWarning>,
}

impl ItineraryDocument {
    /// Wrap planner output and check it against the request
    ///
    /// Zero day headings marks the document `MalformedOutput`; the text is
    /// never altered. Day count and pace are only checked on well-formed
    /// output.
    pub fn assess(text: String, request: &Request) -> Self {
        debug!(text_len = text.len(), "ItineraryDocument::assess: called");
        let days = parse_days(&text);
        let mut warnings = Vec::new();

        if days.is_empty() {
            warn!("planner output has no day headings");
            warnings.push(ItineraryWarning::MalformedOutput);
        } else {
            let expected = request.trip_days();
            if days.len() != expected {
                debug!(expected, found = days.len(), "ItineraryDocument::assess: day count mismatch");
                warnings.push(ItineraryWarning::DayCountMismatch {
                    expected,
                    found: days.len(),
                });
            }

            let pace = request.pace();
            let range = pace.activities_per_day();
            for day in &days {
                if !range.contains(&day.activities.len()) {
                    debug!(day = day.index, count = day.activities.len(), "ItineraryDocument::assess: pace mismatch");
                    warnings.push(ItineraryWarning::PaceMismatch {
                        day: day.index,
                        activities: day.activities.len(),
                        pace,
                    });
                }
            }
        }

        Self { text, days, warnings }
    }

    /// Skeleton itinerary for a run whose research produced no sources
    ///
    /// Every trip day gets a heading and a neutral notice; no venue or link
    /// is invented.
    pub fn degraded(request: &Request) -> Self {
        debug!(destination = %request.destination(), days = request.trip_days(), "ItineraryDocument::degraded: called");
        let mut text = String::new();
        for (i, date) in request.trip_dates().iter().enumerate() {
            if i > 0 {
                text.push('\n');
            }
            text.push_str(&format!(
                "### Day {} – {}: Open day in {}\n",
                i + 1,
                date.format(HEADING_DATE_FORMAT),
                request.destination()
            ));
            text.push_str(
                "- No researched sources were available for this trip, so no specific activities are suggested for this day.\n",
            );
        }

        let days = parse_days(&text);
        Self {
            text,
            days,
            warnings: vec![ItineraryWarning::DegradedInput],
        }
    }

    /// The document exactly as it is displayed and exported
    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn days(&self) -> &[DaySection] {
        &self.days
    }

    pub fn warnings(&self) -> &[ItineraryWarning] {
        &self.warnings
    }

    pub fn is_malformed(&self) -> bool {
        self.warnings.contains(&ItineraryWarning::MalformedOutput)
    }

    pub fn is_degraded(&self) -> bool {
        self.warnings.contains(&ItineraryWarning::DegradedInput)
    }

    /// Day numbers in heading order
    pub fn heading_pattern(&self) -> Vec<u32> {
        self.days.iter().map(|d| d.index).collect()
    }

    /// Write the plain-text export
    pub fn export(&self, path: &Path) -> std::io::Result<()> {
        debug!(?path, "ItineraryDocument::export: called");
        std::fs::write(path, &self.text)
    }
}

impl fmt::Display for ItineraryDocument {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}

/// Split markdown into day sections
fn parse_days(text: &str) -> Vec<DaySection> {
    let mut days: Vec<DaySection> = Vec::new();

    for line in text.lines() {
        if let Some(caps) = DAY_HEADING.captures(line) {
            let Ok(index) = caps[1].parse::<u32>() else {
                continue;
            };
            days.push(DaySection {
                index,
                title: caps[2].trim().to_string(),
                activities: Vec::new(),
            });
            continue;
        }

        if let Some(current) = days.last_mut()
            && let Some(caps) = BULLET.captures(line)
        {
            current.activities.push(caps[1].trim().to_string());
        }
    }

    days
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::RequestDraft;
    use chrono::NaiveDate;
    use tempfile::tempdir;

    fn request(days: i64, pace: Pace) -> Request {
        let start = NaiveDate::from_ymd_opt(2025, 4, 10).unwrap();
        let end = start + chrono::Duration::days(days - 1);
        Request::new(RequestDraft::new("Kyoto", start, end, pace)).unwrap()
    }

    const TWO_DAYS: &str = "\
### Day 1 – April 10: Arrival & Higashiyama Charm
- Walk through [Gion](https://example.com/gion)
- Dinner at [Pontocho](https://example.com/pontocho)
- Evening at [Yasaka Shrine](https://example.com/yasaka)

### Day 2 – April 11: Temples
- [Fushimi Inari Shrine](https://example.com/inari)
  - go early, sub-bullet ignored
- [Tofuku-ji](https://example.com/tofukuji)
- Lunch at [Nishiki Market](https://example.com/nishiki)
";

    #[test]
    fn test_parse_days() {
        let days = parse_days(TWO_DAYS);
        assert_eq!(days.len(), 2);
        assert_eq!(days[0].index, 1);
        assert_eq!(days[0].title, "April 10: Arrival & Higashiyama Charm");
        assert_eq!(days[0].activities.len(), 3);
        assert_eq!(days[1].activities.len(), 3);
    }

    #[test]
    fn test_heading_variants() {
        let text = "## Day 1: Arrival\n- a\n#### **Day 2 - Hills**\n- b\nDay 3 is not a heading\n";
        let days = parse_days(text);
        assert_eq!(days.iter().map(|d| d.index).collect::<Vec<_>>(), vec![1, 2]);
        assert_eq!(days[1].title, "Hills");
    }

    #[test]
    fn test_assess_well_formed() {
        let doc = ItineraryDocument::assess(TWO_DAYS.to_string(), &request(2, Pace::Balanced));
        assert!(doc.warnings().is_empty());
        assert_eq!(doc.heading_pattern(), vec![1, 2]);
        assert_eq!(doc.text(), TWO_DAYS);
    }

    #[test]
    fn test_assess_malformed_keeps_text() {
        let raw = "Here are some ideas for Kyoto: visit temples and eat ramen.";
        let doc = ItineraryDocument::assess(raw.to_string(), &request(2, Pace::Balanced));
        assert!(doc.is_malformed());
        assert_eq!(doc.text(), raw);
        assert!(doc.days().is_empty());
    }

    #[test]
    fn test_assess_day_count_mismatch() {
        let doc = ItineraryDocument::assess(TWO_DAYS.to_string(), &request(3, Pace::Balanced));
        assert_eq!(
            doc.warnings(),
            &[ItineraryWarning::DayCountMismatch { expected: 3, found: 2 }]
        );
    }

    #[test]
    fn test_assess_pace_mismatch() {
        let doc = ItineraryDocument::assess(TWO_DAYS.to_string(), &request(2, Pace::Relaxed));
        assert_eq!(doc.warnings().len(), 2);
        assert!(
            doc.warnings()
                .iter()
                .all(|w| matches!(w, ItineraryWarning::PaceMismatch { activities: 3, .. }))
        );
    }

    #[test]
    fn test_degraded_has_one_section_per_day() {
        let doc = ItineraryDocument::degraded(&request(3, Pace::Balanced));
        assert!(doc.is_degraded());
        assert_eq!(doc.heading_pattern(), vec![1, 2, 3]);
        assert!(doc.text().starts_with("### Day 1 – April 10: Open day in Kyoto"));
        assert!(doc.text().contains("### Day 3 – April 12:"));
        assert!(!doc.text().contains("]("));
        assert!(!doc.text().contains("http"));
    }

    #[test]
    fn test_warning_codes() {
        assert_eq!(ItineraryWarning::MalformedOutput.code(), "MALFORMED_OUTPUT");
        assert!(ItineraryWarning::DegradedInput.to_string().starts_with("DEGRADED_INPUT"));
    }

    #[test]
    fn test_export_writes_text_verbatim() {
        let dir = tempdir().unwrap();
        let path = dir.path().join(DEFAULT_EXPORT_FILE);
        let doc = ItineraryDocument::assess(TWO_DAYS.to_string(), &request(2, Pace::Balanced));
        doc.export(&path).unwrap();
        assert_eq!(std::fs::read_to_string(&path).unwrap(), TWO_DAYS);
    }
}
