//! Trip request domain type
//!
//! A [`Request`] is the validated, immutable form of the traveller's trip
//! requirements. It can only be obtained through [`Request::new`] (or the
//! YAML/serde paths that delegate to it), so every `Request` in the system
//! already satisfies its invariants.

use std::collections::BTreeSet;
use std::fmt;
use std::ops::RangeInclusive;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

/// Date format used in the prompt summary (e.g. "10 Apr 2025")
const SUMMARY_DATE_FORMAT: &str = "%d %b %Y";

/// Reasons a request is rejected at construction
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RequestError {
    #[error("destination must not be empty")]
    EmptyDestination,

    #[error("end date {end} is before start date {start}")]
    EndBeforeStart { start: NaiveDate, end: NaiveDate },

    #[error("party size must be at least 1")]
    EmptyParty,

    #[error("malformed request: {0}")]
    Malformed(String),
}

/// Preferred type of accommodation
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Accommodation {
    #[default]
    NoPreference,
    Hotel,
    Hostel,
    Resort,
    Airbnb,
}

impl Accommodation {
    pub fn label(&self) -> &'static str {
        match self {
            Self::NoPreference => "No preference",
            Self::Hotel => "Hotel",
            Self::Hostel => "Hostel",
            Self::Resort => "Resort",
            Self::Airbnb => "Airbnb",
        }
    }
}

/// Preferred way of getting around at the destination
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Transport {
    PublicTransport,
    RentalCar,
    Taxi,
    Walking,
    #[default]
    NoPreference,
}

impl Transport {
    pub fn label(&self) -> &'static str {
        match self {
            Self::PublicTransport => "Public transport",
            Self::RentalCar => "Rental car",
            Self::Taxi => "Taxi/Uber",
            Self::Walking => "Walking",
            Self::NoPreference => "No preference",
        }
    }
}

/// Interest tags; ordering is the declaration order and drives summary output
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Interest {
    Adventure,
    Culture,
    Nature,
    CityLife,
    Food,
    History,
    Relaxation,
}

impl Interest {
    pub fn label(&self) -> &'static str {
        match self {
            Self::Adventure => "Adventure",
            Self::Culture => "Culture",
            Self::Nature => "Nature",
            Self::CityLife => "City life",
            Self::Food => "Food",
            Self::History => "History",
            Self::Relaxation => "Relaxation",
        }
    }
}

/// Itinerary pace
///
/// Each pace maps to a fixed activities-per-day range. The planner is told
/// this table verbatim and the parsed itinerary is checked against it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Pace {
    Relaxed,
    Balanced,
    Active,
}

impl Pace {
    pub const ALL: [Pace; 3] = [Pace::Relaxed, Pace::Balanced, Pace::Active];

    /// Allowed number of activities per day for this pace
    pub fn activities_per_day(&self) -> RangeInclusive<usize> {
        match self {
            Self::Relaxed => 1..=2,
            Self::Balanced => 3..=4,
            Self::Active => 5..=6,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::Relaxed => "Relaxed",
            Self::Balanced => "Balanced",
            Self::Active => "Active",
        }
    }

    /// Label including the density, e.g. "Balanced (3–4 activities/day)"
    pub fn label(&self) -> String {
        let range = self.activities_per_day();
        format!("{} ({}–{} activities/day)", self.name(), range.start(), range.end())
    }
}

macro_rules! display_via_label {
    ($($ty:ty),*) => {
        $(impl fmt::Display for $ty {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.label())
            }
        })*
    };
}

display_via_label!(Accommodation, Transport, Interest, Pace);

/// Unvalidated request fields as supplied by the input collaborator
///
/// This is the serde shape of a request file. Turn it into a [`Request`]
/// with [`Request::new`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct RequestDraft {
    pub destination: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub party_size: u32,
    #[serde(default)]
    pub accommodation: Accommodation,
    #[serde(default)]
    pub transport: Transport,
    #[serde(default)]
    pub budget: Option<String>,
    #[serde(default)]
    pub interests: Vec<Interest>,
    pub pace: Pace,
    #[serde(default)]
    pub dietary: Option<String>,
    #[serde(default)]
    pub notes: Option<String>,
}

impl RequestDraft {
    /// Minimal draft with defaults for every optional field
    pub fn new(destination: impl Into<String>, start_date: NaiveDate, end_date: NaiveDate, pace: Pace) -> Self {
        Self {
            destination: destination.into(),
            start_date,
            end_date,
            party_size: 1,
            accommodation: Accommodation::default(),
            transport: Transport::default(),
            budget: None,
            interests: Vec::new(),
            pace,
            dietary: None,
            notes: None,
        }
    }
}

/// Validated trip requirements
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(try_from = "RequestDraft")]
pub struct Request {
    destination: String,
    start_date: NaiveDate,
    end_date: NaiveDate,
    party_size: u32,
    accommodation: Accommodation,
    transport: Transport,
    budget: Option<String>,
    interests: BTreeSet<Interest>,
    pace: Pace,
    dietary: Option<String>,
    notes: Option<String>,
}

impl Request {
    /// Validate a draft; rejects rather than coerces
    pub fn new(draft: RequestDraft) -> Result<Self, RequestError> {
        debug!(destination = %draft.destination, start = %draft.start_date, end = %draft.end_date, "Request::new: called");
        let destination = draft.destination.trim().to_string();
        if destination.is_empty() {
            debug!("Request::new: empty destination");
            return Err(RequestError::EmptyDestination);
        }

        if draft.end_date < draft.start_date {
            debug!("Request::new: end before start");
            return Err(RequestError::EndBeforeStart {
                start: draft.start_date,
                end: draft.end_date,
            });
        }

        if draft.party_size == 0 {
            debug!("Request::new: empty party");
            return Err(RequestError::EmptyParty);
        }

        Ok(Self {
            destination,
            start_date: draft.start_date,
            end_date: draft.end_date,
            party_size: draft.party_size,
            accommodation: draft.accommodation,
            transport: draft.transport,
            budget: non_blank(draft.budget),
            interests: draft.interests.into_iter().collect(),
            pace: draft.pace,
            dietary: non_blank(draft.dietary),
            notes: non_blank(draft.notes),
        })
    }

    /// Parse and validate a YAML request document
    pub fn from_yaml(yaml: &str) -> Result<Self, RequestError> {
        debug!(yaml_len = yaml.len(), "Request::from_yaml: called");
        let draft: RequestDraft = serde_yaml::from_str(yaml).map_err(|e| RequestError::Malformed(e.to_string()))?;
        Self::new(draft)
    }

    pub fn destination(&self) -> &str {
        &self.destination
    }

    pub fn start_date(&self) -> NaiveDate {
        self.start_date
    }

    pub fn end_date(&self) -> NaiveDate {
        self.end_date
    }

    pub fn party_size(&self) -> u32 {
        self.party_size
    }

    pub fn accommodation(&self) -> Accommodation {
        self.accommodation
    }

    pub fn transport(&self) -> Transport {
        self.transport
    }

    pub fn budget(&self) -> Option<&str> {
        self.budget.as_deref()
    }

    pub fn interests(&self) -> &BTreeSet<Interest> {
        &self.interests
    }

    pub fn pace(&self) -> Pace {
        self.pace
    }

    pub fn dietary(&self) -> Option<&str> {
        self.dietary.as_deref()
    }

    pub fn notes(&self) -> Option<&str> {
        self.notes.as_deref()
    }

    /// Number of day-sections the itinerary must have (inclusive date range)
    pub fn trip_days(&self) -> usize {
        (self.end_date - self.start_date).num_days() as usize + 1
    }

    /// Calendar date of every trip day, in order
    pub fn trip_dates(&self) -> Vec<NaiveDate> {
        self.start_date.iter_days().take(self.trip_days()).collect()
    }

    /// Render the request as the structured text block both stages consume
    ///
    /// The output depends only on the request's fields, never on the caller.
    pub fn to_prompt_summary(&self) -> String {
        debug!(destination = %self.destination, "Request::to_prompt_summary: called");
        let interests = if self.interests.is_empty() {
            "Not specified".to_string()
        } else {
            self.interests.iter().map(Interest::label).collect::<Vec<_>>().join(", ")
        };

        let mut out = String::new();
        out.push_str("**Trip Overview:**\n");
        out.push_str(&format!("- Destination: {}\n", self.destination));
        out.push_str(&format!(
            "- Dates: {} to {} ({} days)\n",
            self.start_date.format(SUMMARY_DATE_FORMAT),
            self.end_date.format(SUMMARY_DATE_FORMAT),
            self.trip_days()
        ));
        out.push_str(&format!("- Travelers: {}\n", self.party_size));
        out.push_str(&format!("- Accommodation: {}\n", self.accommodation));
        out.push_str(&format!("- Budget: {}\n", self.budget().unwrap_or("Not specified")));
        out.push('\n');
        out.push_str("**Preferences:**\n");
        out.push_str(&format!("- Interests: {}\n", interests));
        out.push_str(&format!("- Itinerary Pace: {}\n", self.pace.label()));
        out.push_str(&format!("- Local Transport: {}\n", self.transport));
        out.push_str(&format!("- Dietary Needs: {}\n", self.dietary().unwrap_or("None")));
        out.push_str(&format!("- Notes: {}\n", self.notes().unwrap_or("None")));
        out
    }
}

impl TryFrom<RequestDraft> for Request {
    type Error = RequestError;

    fn try_from(draft: RequestDraft) -> Result<Self, Self::Error> {
        Self::new(draft)
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.map(|v| v.trim().to_string()).filter(|v| !v.is_empty())
}
