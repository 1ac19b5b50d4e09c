//! Rendering options and configuration.

use std::ops::RangeInclusive;

/// Heading used at the top of rendered Markdown.
pub const DEFAULT_TITLE: &str = "Document Analysis";

/// Options for rendering document content.
#[derive(Debug, Clone)]
pub struct RenderOptions {
    /// Top-level heading text
    pub title: String,

    /// Emit the "Form Data" section
    pub include_forms: bool,

    /// Emit the "Tables" section
    pub include_tables: bool,

    /// Escape `\` and `|` inside cell and form text
    pub escape_special_chars: bool,

    /// Page selection
    pub page_selection: PageSelection,

    /// Collect extraction statistics during rendering
    pub collect_stats: bool,
}

impl RenderOptions {
    /// Create new render options with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the top-level heading.
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    /// Enable or disable the form section.
    pub fn with_forms(mut self, include: bool) -> Self {
        self.include_forms = include;
        self
    }

    /// Enable or disable the table section.
    pub fn with_tables(mut self, include: bool) -> Self {
        self.include_tables = include;
        self
    }

    /// Enable or disable escaping of Markdown table syntax in text.
    pub fn with_escaping(mut self, escape: bool) -> Self {
        self.escape_special_chars = escape;
        self
    }

    /// Set page selection.
    pub fn with_pages(mut self, selection: PageSelection) -> Self {
        self.page_selection = selection;
        self
    }

    /// Set specific page range.
    pub fn with_page_range(mut self, range: RangeInclusive<u32>) -> Self {
        self.page_selection = PageSelection::Range(range);
        self
    }

    /// Enable statistics collection during rendering.
    pub fn with_stats(mut self, collect: bool) -> Self {
        self.collect_stats = collect;
        self
    }
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            title: DEFAULT_TITLE.to_string(),
            include_forms: true,
            include_tables: true,
            escape_special_chars: false,
            page_selection: PageSelection::All,
            collect_stats: false,
        }
    }
}

/// Page selection for rendering.
#[derive(Debug, Clone, Default)]
pub enum PageSelection {
    /// Render all pages
    #[default]
    All,
    /// Render a range of pages (inclusive, 1-indexed)
    Range(RangeInclusive<u32>),
    /// Render specific pages (1-indexed)
    Pages(Vec<u32>),
    /// Render a union of page ranges, kept unexpanded (1-indexed)
    Ranges(Vec<RangeInclusive<u32>>),
}

impl PageSelection {
    /// Check if a page number should be included.
    pub fn includes(&self, page: u32) -> bool {
        match self {
            PageSelection::All => true,
            PageSelection::Range(range) => range.contains(&page),
            PageSelection::Pages(pages) => pages.contains(&page),
            PageSelection::Ranges(ranges) => ranges.iter().any(|r| r.contains(&page)),
        }
    }

    /// Check an optional page. Content without a page is only kept by `All`.
    pub fn includes_opt(&self, page: Option<u32>) -> bool {
        match page {
            Some(p) => self.includes(p),
            None => matches!(self, PageSelection::All),
        }
    }

    /// Parse a page selection string (e.g., "1-10", "1,3,5,7-10").
    ///
    /// A plain list becomes [`PageSelection::Pages`]; a list containing a
    /// range becomes [`PageSelection::Ranges`] so wide ranges are never
    /// expanded page by page.
    pub fn parse(s: &str) -> Result<Self, String> {
        let s = s.trim();

        if s.is_empty() || s == "all" {
            return Ok(PageSelection::All);
        }

        if !s.contains(',') && s.contains('-') {
            return parse_range(s, "Invalid start page", "Invalid end page").map(PageSelection::Range);
        }

        let mut ranges = Vec::new();
        for part in s.split(',') {
            let part = part.trim();
            if part.contains('-') {
                ranges.push(parse_range(part, "Invalid page number", "Invalid page number")?);
            } else {
                let p: u32 = part.parse().map_err(|_| "Invalid page number")?;
                ranges.push(p..=p);
            }
        }

        ranges.sort_unstable_by_key(|r| (*r.start(), *r.end()));
        if ranges.iter().all(|r| r.start() == r.end()) {
            let mut pages: Vec<u32> = ranges.iter().map(|r| *r.start()).collect();
            pages.dedup();
            return Ok(PageSelection::Pages(pages));
        }
        Ok(PageSelection::Ranges(ranges))
    }
}

fn parse_range(part: &str, start_err: &str, end_err: &str) -> Result<RangeInclusive<u32>, String> {
    let (start, end) = part.split_once('-').ok_or_else(|| start_err.to_string())?;
    let start: u32 = start.trim().parse().map_err(|_| start_err.to_string())?;
    let end: u32 = end.trim().parse().map_err(|_| end_err.to_string())?;
    if start > end {
        return Err(format!("Range {}-{} ends before it starts", start, end));
    }
    Ok(start..=end)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_options_builder() {
        let options = RenderOptions::new()
            .with_title("Lab Results")
            .with_forms(false)
            .with_escaping(true)
            .with_stats(true);

        assert_eq!(options.title, "Lab Results");
        assert!(!options.include_forms);
        assert!(options.include_tables);
        assert!(options.escape_special_chars);
        assert!(options.collect_stats);
    }

    #[test]
    fn test_defaults_match_reference_output() {
        let options = RenderOptions::default();
        assert_eq!(options.title, "Document Analysis");
        assert!(!options.escape_special_chars);
        assert!(matches!(options.page_selection, PageSelection::All));
    }

    #[test]
    fn test_page_selection_includes() {
        let range = PageSelection::Range(5..=10);
        assert!(!range.includes(4));
        assert!(range.includes(5));
        assert!(range.includes(10));
        assert!(!range.includes(11));

        let pages = PageSelection::Pages(vec![1, 3]);
        assert!(pages.includes(3));
        assert!(!pages.includes(2));
        assert!(!pages.includes_opt(None));
        assert!(PageSelection::All.includes_opt(None));
    }

    #[test]
    fn test_page_selection_parse() {
        assert!(matches!(PageSelection::parse("all").unwrap(), PageSelection::All));
        assert!(matches!(PageSelection::parse("1-10").unwrap(), PageSelection::Range(_)));

        let list = PageSelection::parse("3,1,3").unwrap();
        if let PageSelection::Pages(pages) = list {
            assert_eq!(pages, vec![1, 3]);
        } else {
            panic!("Expected Pages variant");
        }

        let mixed = PageSelection::parse("5-7,1,3,6").unwrap();
        assert!(matches!(mixed, PageSelection::Ranges(_)));
        for page in [1, 3, 5, 6, 7] {
            assert!(mixed.includes(page));
        }
        assert!(!mixed.includes(2));
        assert!(!mixed.includes(8));

        assert!(PageSelection::parse("x-2").is_err());
        assert!(PageSelection::parse("9-2").is_err());
    }

    #[test]
    fn test_wide_ranges_are_not_expanded() {
        let selection = PageSelection::parse("1-4000000000,2").unwrap();
        if let PageSelection::Ranges(ranges) = &selection {
            assert_eq!(ranges.len(), 2);
        } else {
            panic!("Expected Ranges variant");
        }
        assert!(selection.includes(3_999_999_999));
        assert!(!selection.includes(4_000_000_001));
    }
}
