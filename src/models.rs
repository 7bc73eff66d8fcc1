/// One record cut out of the clippings log, before it is attached to a book.
#[derive(Debug, Clone, PartialEq)]
pub struct Clipping {
    pub title: String,
    pub info: String,
    pub quote: String,
}

impl Clipping {
    /// A clipping only counts when title, info and quote all carry text.
    pub fn is_valid(&self) -> bool {
        !self.title.is_empty() && !self.info.is_empty() && !self.quote.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Highlight {
    pub info: String,
    pub quote: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Book {
    pub title: String,
    pub highlights: Vec<Highlight>,
}

impl Book {
    pub fn new(title: String, first: Highlight) -> Self {
        Book {
            title,
            highlights: vec![first],
        }
    }
}

/// Fields of an info line, derived on demand and never stored.
#[derive(Debug, Clone, PartialEq)]
pub struct ParsedInfo {
    pub page: Option<u64>,
    pub page_text: String,
    pub locations_text: String,
    pub time_text: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CombinedRange {
    pub start: u64,
    pub end: u64,
}

impl CombinedRange {
    pub fn new(start: u64, end: u64) -> Self {
        CombinedRange { start, end }
    }

    /// Overlapping, or starting right where the range ends (10-12 then 13).
    pub fn absorbs(&self, start: u64) -> bool {
        start <= self.end.saturating_add(1)
    }

    pub fn extend_to(&mut self, end: u64) {
        self.end = self.end.max(end);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clipping_validity() {
        let clipping = Clipping {
            title: "Book".to_string(),
            info: "Page 1 | Location 1-2 | Added".to_string(),
            quote: String::new(),
        };

        assert!(!clipping.is_valid());
    }

    #[test]
    fn test_combined_range_extends_but_never_shrinks() {
        let mut range = CombinedRange::new(10, 20);

        assert!(range.absorbs(20));
        assert!(range.absorbs(21));
        assert!(!range.absorbs(22));

        range.extend_to(15);
        assert_eq!(range, CombinedRange::new(10, 20));

        range.extend_to(30);
        assert_eq!(range, CombinedRange::new(10, 30));
    }
}
