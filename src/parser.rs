use crate::models::{Clipping, ParsedInfo};
use chrono::NaiveDateTime;
use once_cell::sync::Lazy;
use regex::Regex;

pub const CLIPPING_DELIMITER: &str = "==========";
pub const FIELD_DELIMITER: char = '|';

const BYTE_ORDER_MARK: char = '\u{feff}';
const ADDED_PREFIX: &str = "Added on";
const ADDED_FORMAT: &str = "%A, %B %d, %Y %I:%M:%S %p";

static NUMBER_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\d+").unwrap());

#[derive(Debug, PartialEq)]
pub enum LocationError {
    Missing(String),
    Invalid(String),
}

impl std::fmt::Display for LocationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LocationError::Missing(text) => {
                write!(f, "No location number in '{}'", text)
            }
            LocationError::Invalid(text) => {
                write!(f, "Location number out of range in '{}'", text)
            }
        }
    }
}

impl std::error::Error for LocationError {}

/// Position of a highlight in its book. `None` sorts before any number.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct SortKey {
    pub page: Option<u64>,
    pub location: Option<u64>,
}

pub fn split_clippings(content: &str) -> Vec<Clipping> {
    content
        .split(CLIPPING_DELIMITER)
        .filter_map(parse_clipping)
        .collect()
}

/// Title, info, a blank line, then the quote. Anything shorter is dropped.
pub fn parse_clipping(raw: &str) -> Option<Clipping> {
    let mut lines = raw.trim().lines();

    let title = lines.next().unwrap_or_default();
    let info = lines.next().unwrap_or_default();
    let _separator = lines.next()?;
    let quote = lines.next().unwrap_or_default();

    let clipping = Clipping {
        title: title.trim_start_matches(BYTE_ORDER_MARK).to_string(),
        info: info.to_string(),
        quote: quote.to_string(),
    };

    clipping.is_valid().then_some(clipping)
}

/// Page, locations and time, in that order. Books without pages get a
/// two-field line ("... at location 1234-1236 | Added on ..."), which is
/// read as locations and time with no page.
pub fn parse_info(info: &str) -> ParsedInfo {
    let fields: Vec<&str> = info.split(FIELD_DELIMITER).map(str::trim).collect();
    let field = |i: usize| fields.get(i).copied().unwrap_or_default();

    let (page_text, locations_text, time_text) = match fields.as_slice() {
        [head, time] if mentions_location(head) => ("", *head, *time),
        _ => (field(0), field(1), field(2)),
    };

    ParsedInfo {
        page: head_numbers(page_text).next(),
        page_text: page_text.to_string(),
        locations_text: locations_text.to_string(),
        time_text: time_text.to_string(),
    }
}

/// First number is the start, second the end. A lone number covers itself.
pub fn parse_locations(text: &str) -> Result<(u64, u64), LocationError> {
    let mut numbers = NUMBER_RE.find_iter(text).map(|m| {
        m.as_str()
            .parse::<u64>()
            .map_err(|_| LocationError::Invalid(text.to_string()))
    });

    let start = numbers
        .next()
        .ok_or_else(|| LocationError::Missing(text.to_string()))??;
    let end = numbers.next().transpose()?.unwrap_or(start);

    Ok((start, end))
}

/// A compact "12 150-152" page field carries its own location; otherwise
/// the start of the locations field is used.
pub fn sort_key(info: &str) -> SortKey {
    let parsed = parse_info(info);

    let location = head_numbers(&parsed.page_text).nth(1).or_else(|| {
        parse_locations(&parsed.locations_text)
            .ok()
            .map(|(start, _)| start)
    });

    SortKey {
        page: parsed.page,
        location,
    }
}

/// Parses the "Added on Monday, March 14, 2024 10:15:32 PM" timestamp.
pub fn parse_added_at(time_text: &str) -> Option<NaiveDateTime> {
    let text = time_text.trim();
    let text = text.strip_prefix(ADDED_PREFIX).unwrap_or(text).trim();
    NaiveDateTime::parse_from_str(text, ADDED_FORMAT).ok()
}

fn mentions_location(text: &str) -> bool {
    text.to_ascii_lowercase().contains("location")
}

/// Leading numbers of the tokens that start with a digit ("150-152" gives 150).
fn head_numbers(text: &str) -> impl Iterator<Item = u64> + '_ {
    text.split_whitespace()
        .filter(|token| token.starts_with(|c: char| c.is_ascii_digit()))
        .filter_map(|token| token.split('-').next().and_then(|n| n.parse().ok()))
}
