// crates/campus-services/src/events.rs

use std::fmt;
use std::str::FromStr;

use campus_core::CampusError;
use chrono::{Days, NaiveDateTime};
use serde::{Deserialize, Serialize};

/// Identifier of a campus event (RSVP key)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct EventId(pub u32);

impl fmt::Display for EventId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "event-{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EventCategory {
    Social,
    Career,
    Academic,
    Sports,
    Tech,
    Cultural,
    Arts,
    Business,
    Food,
}

impl EventCategory {
    pub fn label(&self) -> &'static str {
        match self {
            EventCategory::Social => "Social",
            EventCategory::Career => "Career",
            EventCategory::Academic => "Academic",
            EventCategory::Sports => "Sports",
            EventCategory::Tech => "Tech",
            EventCategory::Cultural => "Cultural",
            EventCategory::Arts => "Arts",
            EventCategory::Business => "Business",
            EventCategory::Food => "Food",
        }
    }

    pub fn glyph(&self) -> &'static str {
        match self {
            EventCategory::Tech => "💻",
            EventCategory::Arts => "🎨",
            EventCategory::Sports => "🏀",
            EventCategory::Business => "💼",
            EventCategory::Food => "🍴",
            _ => "📅",
        }
    }
}

/// An on-campus event listed on the events page
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CampusEvent {
    pub id: EventId,
    pub title: String,
    pub days_from_now: u32,
    pub category: EventCategory,
    pub description: String,
}

/// A partner event shown in the community events panel
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExternalEvent {
    pub title: String,
    pub category: EventCategory,
    pub days_from_now: u32,
    /// "Sat, Oct 24"
    pub date_label: String,
    pub icon_glyph: String,
}

/// Anything the search box can match against
pub trait Searchable {
    fn search_text(&self) -> String;
}

impl Searchable for CampusEvent {
    fn search_text(&self) -> String {
        format!("{} {} {}", self.title, self.category.label(), self.description)
    }
}

impl Searchable for ExternalEvent {
    fn search_text(&self) -> String {
        format!("{} {} {}", self.title, self.category.label(), self.date_label)
    }
}

fn campus_event(
    id: u32,
    title: &str,
    days_from_now: u32,
    category: EventCategory,
    description: &str,
) -> CampusEvent {
    CampusEvent {
        id: EventId(id),
        title: title.to_string(),
        days_from_now,
        category,
        description: description.to_string(),
    }
}

/// Built-in campus event listing
pub fn campus_events() -> Vec<CampusEvent> {
    vec![
        campus_event(
            1,
            "Campus Welcome Mixer",
            3,
            EventCategory::Social,
            "Meet new classmates and student organizations on the main quad.",
        ),
        campus_event(
            2,
            "Spring Career Fair",
            10,
            EventCategory::Career,
            "Talk with employers about internships and full-time job openings.",
        ),
        campus_event(
            3,
            "Student Research Symposium",
            14,
            EventCategory::Academic,
            "Undergraduate and graduate posters and talks across departments.",
        ),
        campus_event(
            4,
            "Campus Sports Day",
            7,
            EventCategory::Sports,
            "Intramural tournaments, relay races and a closing barbecue.",
        ),
        campus_event(
            5,
            "Tech Workshop Series",
            5,
            EventCategory::Tech,
            "Hands-on sessions on web development, data science and cloud tools.",
        ),
        campus_event(
            6,
            "Cultural Festival",
            21,
            EventCategory::Cultural,
            "Food, music and performances from student cultural clubs.",
        ),
    ]
}

/// "Today", "Tomorrow" or "In N days"
pub fn relative_day_label(days_from_now: u32) -> String {
    match days_from_now {
        0 => "Today".to_string(),
        1 => "Tomorrow".to_string(),
        n => format!("In {} days", n),
    }
}

/// "October 21, 2026"
pub fn event_date(now: NaiveDateTime, days_from_now: u32) -> String {
    now.checked_add_days(Days::new(u64::from(days_from_now)))
        .unwrap_or(now)
        .format("%B %-d, %Y")
        .to_string()
}

/// Partner events dated relative to `now`
pub fn community_events(now: NaiveDateTime) -> Vec<ExternalEvent> {
    [
        ("Community Tech Talk", 5, EventCategory::Tech),
        ("Art Gallery Opening", 12, EventCategory::Arts),
        ("City Basketball Tournament", 19, EventCategory::Sports),
        ("Startup Pitch Night", 8, EventCategory::Business),
        ("Local Food Festival", 15, EventCategory::Food),
    ]
    .into_iter()
    .map(|(title, days_from_now, category)| ExternalEvent {
        title: title.to_string(),
        category,
        days_from_now,
        date_label: now
            .checked_add_days(Days::new(u64::from(days_from_now)))
            .unwrap_or(now)
            .format("%a, %b %-d")
            .to_string(),
        icon_glyph: category.glyph().to_string(),
    })
    .collect()
}

/// Outcome of a search over event records
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SearchResult<T> {
    pub matches: Vec<T>,
    pub any_match: bool,
}

/// Case-insensitive substring search preserving input order.
///
/// A blank term matches everything.
pub fn search<T: Searchable + Clone>(term: &str, records: &[T]) -> SearchResult<T> {
    let needle = term.trim().to_lowercase();
    if needle.is_empty() {
        return SearchResult {
            matches: records.to_vec(),
            any_match: true,
        };
    }

    let matches: Vec<T> = records
        .iter()
        .filter(|r| r.search_text().to_lowercase().contains(&needle))
        .cloned()
        .collect();

    tracing::debug!("Search \"{}\" matched {} of {}", needle, matches.len(), records.len());

    SearchResult {
        any_match: !matches.is_empty(),
        matches,
    }
}

/// Quick filters above the events list.
///
/// `Week` and `Month` narrow by `days_from_now` (at most 7 and 31 days out)
/// instead of listing every event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EventFilter {
    #[default]
    All,
    Week,
    Month,
    Career,
}

impl FromStr for EventFilter {
    type Err = CampusError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "all" => Ok(EventFilter::All),
            "week" => Ok(EventFilter::Week),
            "month" => Ok(EventFilter::Month),
            "career" => Ok(EventFilter::Career),
            other => Err(CampusError::UnknownFilter(other.to_string())),
        }
    }
}

impl EventFilter {
    pub fn matches(&self, event: &CampusEvent) -> bool {
        match self {
            EventFilter::All => true,
            EventFilter::Week => event.days_from_now <= 7,
            EventFilter::Month => event.days_from_now <= 31,
            EventFilter::Career => {
                let title = event.title.to_lowercase();
                ["career", "job", "internship"]
                    .iter()
                    .any(|word| title.contains(word))
            }
        }
    }
}

pub fn filter_events(filter: EventFilter, events: &[CampusEvent]) -> Vec<CampusEvent> {
    events.iter().filter(|e| filter.matches(e)).cloned().collect()
}
