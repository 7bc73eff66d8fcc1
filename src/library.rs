use crate::models::{Book, Clipping, Highlight};
use crate::parser::{parse_added_at, parse_info};
use chrono::NaiveDate;
use std::collections::{HashMap, HashSet};

/// Books in first-seen order, with a title index for appends.
#[derive(Debug, Default)]
pub struct Library {
    books: Vec<Book>,
    by_title: HashMap<String, usize>,
}

impl Library {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_clippings(clippings: impl IntoIterator<Item = Clipping>) -> Self {
        let mut library = Self::new();
        library.extend(clippings);
        library
    }

    pub fn add(&mut self, clipping: Clipping) {
        let highlight = Highlight {
            info: clipping.info,
            quote: clipping.quote,
        };

        match self.by_title.get(&clipping.title) {
            Some(&index) => self.books[index].highlights.push(highlight),
            None => {
                self.by_title.insert(clipping.title.clone(), self.books.len());
                self.books.push(Book::new(clipping.title, highlight));
            }
        }
    }

    pub fn books(&self) -> &[Book] {
        &self.books
    }

    pub fn len(&self) -> usize {
        self.books.len()
    }

    pub fn is_empty(&self) -> bool {
        self.books.is_empty()
    }

    /// Keeps highlights added within `range`; books left empty are dropped.
    pub fn retain_added_within(&mut self, range: &DateRange) {
        for book in &mut self.books {
            book.highlights.retain(|h| added_within(&h.info, range));
        }
        self.books.retain(|book| !book.highlights.is_empty());
        self.by_title = self
            .books
            .iter()
            .enumerate()
            .map(|(index, book)| (book.title.clone(), index))
            .collect();
    }

    pub fn into_books(self) -> Vec<Book> {
        self.books
    }
}

impl Extend<Clipping> for Library {
    fn extend<T: IntoIterator<Item = Clipping>>(&mut self, clippings: T) {
        for clipping in clippings {
            self.add(clipping);
        }
    }
}

/// Inclusive date bounds; an open end has no upper limit.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DateRange {
    pub from: NaiveDate,
    pub to: Option<NaiveDate>,
}

impl DateRange {
    pub fn contains(&self, date: NaiveDate) -> bool {
        date >= self.from && self.to.map_or(true, |to| date <= to)
    }
}

fn added_within(info: &str, range: &DateRange) -> bool {
    let time_text = parse_info(info).time_text;
    parse_added_at(&time_text).is_some_and(|added| range.contains(added.date()))
}

/// First occurrence of each quote wins; order is otherwise untouched.
pub fn dedupe_highlights(highlights: Vec<Highlight>) -> Vec<Highlight> {
    let mut seen = HashSet::new();
    highlights
        .into_iter()
        .filter(|h| seen.insert(h.quote.clone()))
        .collect()
}

pub fn remove_duplicate_highlights(book: &mut Book) {
    let highlights = std::mem::take(&mut book.highlights);
    book.highlights = dedupe_highlights(highlights);
}
