use crate::models::{Book, CombinedRange, Highlight, ParsedInfo};
use crate::parser::{parse_info, parse_locations, sort_key};
use tracing::warn;

const BULLET: &str = "-";
const RANGE_RULE: &str = "===================";

/// Renders a deduplicated book. Highlights are ordered by (page, location);
/// each closed run of touching locations is written as soon as the next
/// highlight falls outside it, so range blocks trail the quotes they cover.
pub fn render_book(book: &Book) -> String {
    let mut highlights: Vec<&Highlight> = book.highlights.iter().collect();
    highlights.sort_by_key(|h| sort_key(&h.info));

    let mut out = format!("# {}\n\n", book.title);
    let mut current: Option<CombinedRange> = None;

    for highlight in highlights {
        let info = parse_info(&highlight.info);

        match parse_locations(&info.locations_text) {
            Ok((start, end)) => {
                let next = CombinedRange::new(start, end);
                current = match current {
                    Some(mut range) if range.absorbs(start) => {
                        range.extend_to(end);
                        Some(range)
                    }
                    Some(range) => {
                        push_range(&mut out, &range);
                        Some(next)
                    }
                    None => Some(next),
                };
            }
            Err(e) => {
                warn!(book = %book.title, info = %highlight.info, "skipping location: {}", e);
            }
        }

        if !highlight.quote.trim().is_empty() {
            push_quote(&mut out, &highlight.quote, &info);
        }
    }

    if let Some(range) = current {
        push_range(&mut out, &range);
    }

    out
}

fn push_range(out: &mut String, range: &CombinedRange) {
    out.push_str(&format!("{} Location Start: {}\n", BULLET, range.start));
    out.push_str(&format!("{} Location End: {}\n", BULLET, range.end));
    out.push_str(RANGE_RULE);
    out.push('\n');
}

fn push_quote(out: &mut String, quote: &str, info: &ParsedInfo) {
    out.push_str(&format!("{} **{}** \n", BULLET, capitalize(quote)));
    out.push_str(&format!("{} Page Number: {}\n", BULLET, info.page_text));
    out.push_str(&format!("{} Time: {}\n", BULLET, info.time_text));
}

fn capitalize(text: &str) -> String {
    let mut chars = text.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
