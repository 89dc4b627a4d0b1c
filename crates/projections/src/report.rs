//! Paginated plain-text export of the dashboard.
//!
//! Content runs in a fixed order: summary, exhibit table, vote chart, then
//! one entry per review in listing order. Each section is made of blocks
//! that are never split across a page break unless a single block is taller
//! than a page.

use serde::Serialize;

use crate::dashboard::Dashboard;
use crate::listing::ReviewListing;

/// Lines taken by the page header.
const HEADER_LINES: usize = 2;

/// Indent of continuation lines inside a review entry.
const ENTRY_INDENT: &str = "   ";

/// Layout settings for a report.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportOptions {
    /// Lines per page, header included.
    pub lines_per_page: usize,
    /// Maximum line width in characters.
    pub width: usize,
    pub title: String,
}

impl Default for ReportOptions {
    fn default() -> Self {
        Self {
            lines_per_page: 60,
            width: 78,
            title: "Chemistry Expo Results".to_string(),
        }
    }
}

impl ReportOptions {
    pub fn with_lines_per_page(mut self, lines_per_page: usize) -> Self {
        self.lines_per_page = lines_per_page;
        self
    }

    pub fn with_width(mut self, width: usize) -> Self {
        self.width = width;
        self
    }
}

/// One page of the report, header included.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Page {
    pub number: usize,
    pub lines: Vec<String>,
}

/// A rendered report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Report {
    pages: Vec<Page>,
}

impl Report {
    /// Lays the dashboard out into pages.
    pub fn render(dashboard: &Dashboard, options: &ReportOptions) -> Self {
        let width = options.width.max(20);
        let body_lines = options.lines_per_page.max(HEADER_LINES + 1) - HEADER_LINES;
        let mut paginator = Paginator::new(body_lines);

        paginator.push(summary_block(dashboard, width));
        for block in exhibit_table(dashboard, width) {
            paginator.push(block);
        }
        for block in vote_chart(dashboard, width) {
            paginator.push(block);
        }
        paginator.push(vec![format!("REVIEWS ({})", dashboard.reviews.len())]);
        if dashboard.reviews.is_empty() {
            paginator.push(vec!["(no reviews)".to_string()]);
        }
        for (index, listing) in dashboard.reviews.iter().enumerate() {
            paginator.push(review_entry(index + 1, listing, width));
        }

        let pages = paginator
            .finish()
            .into_iter()
            .enumerate()
            .map(|(index, body)| {
                let number = index + 1;
                let mut lines = Vec::with_capacity(body.len() + HEADER_LINES);
                lines.push(truncate(&format!("{} - Page {number}", options.title), width));
                lines.push("=".repeat(width));
                lines.extend(body);
                Page { number, lines }
            })
            .collect();

        Self { pages }
    }

    pub fn pages(&self) -> &[Page] {
        &self.pages
    }

    pub fn page_count(&self) -> usize {
        self.pages.len()
    }

    /// Joins the pages into one document, separated by form feeds.
    pub fn to_text(&self) -> String {
        self.pages
            .iter()
            .map(|page| page.lines.join("\n"))
            .collect::<Vec<_>>()
            .join("\n\u{c}\n")
    }
}

impl std::fmt::Display for Report {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.to_text())
    }
}

/// Packs blocks of lines into page bodies of a fixed height.
struct Paginator {
    body_lines: usize,
    pages: Vec<Vec<String>>,
    current: Vec<String>,
}

impl Paginator {
    fn new(body_lines: usize) -> Self {
        Self {
            body_lines,
            pages: Vec::new(),
            current: Vec::new(),
        }
    }

    fn push(&mut self, block: Vec<String>) {
        if !self.current.is_empty() && self.current.len() + block.len() > self.body_lines {
            self.break_page();
        }
        for line in block {
            if self.current.len() == self.body_lines {
                self.break_page();
            }
            self.current.push(line);
        }
    }

    fn break_page(&mut self) {
        self.pages.push(std::mem::take(&mut self.current));
    }

    fn finish(mut self) -> Vec<Vec<String>> {
        if !self.current.is_empty() || self.pages.is_empty() {
            self.break_page();
        }
        self.pages
    }
}

fn summary_block(dashboard: &Dashboard, width: usize) -> Vec<String> {
    let summary = &dashboard.summary;
    let rows = [
        ("Exhibits", dashboard.exhibit_count.to_string()),
        ("Reviews", dashboard.review_count.to_string()),
        ("Average rating", dashboard.average_rating.clone()),
        ("Total votes", summary.total_votes.to_string()),
        ("Avg votes per exhibit", summary.avg_votes_per_exhibit.clone()),
        ("Most voted", summary.most_voted_exhibit_name.clone()),
        ("Most common rating", summary.most_common_rating_label.clone()),
    ];

    let mut lines = vec!["SUMMARY".to_string()];
    lines.extend(
        rows.into_iter()
            .map(|(label, value)| truncate(&format!("  {:<24}{value}", format!("{label}:")), width)),
    );
    lines.push(String::new());
    lines
}

fn exhibit_table(dashboard: &Dashboard, width: usize) -> Vec<Vec<String>> {
    let name_width = width - 16;
    let mut blocks = vec![vec![
        "EXHIBITS".to_string(),
        format!("{:<name_width$} {:>6} {:>8}", "Name", "Votes", "Avg"),
        "-".repeat(width),
    ]];

    if dashboard.vote_data.is_empty() {
        blocks.push(vec!["(no exhibits)".to_string()]);
    }
    blocks.extend(dashboard.vote_data.iter().map(|row| {
        vec![format!(
            "{:<name_width$} {:>6} {:>8}",
            truncate(&row.name, name_width),
            row.votes,
            row.average_rating
        )]
    }));
    blocks.push(vec![String::new()]);
    blocks
}

fn vote_chart(dashboard: &Dashboard, width: usize) -> Vec<Vec<String>> {
    let label_width = (width / 4).max(8);
    let bar_width = width - label_width - 8;
    let max_votes = dashboard
        .vote_data
        .iter()
        .map(|row| row.votes)
        .max()
        .unwrap_or(0);

    let mut blocks = vec![vec!["VOTES".to_string()]];
    blocks.extend(dashboard.vote_data.iter().map(|row| {
        let bar = if max_votes == 0 {
            0
        } else {
            row.votes * bar_width / max_votes
        };
        vec![format!(
            "{:<label_width$} |{:<bar_width$} {}",
            truncate(&row.name, label_width),
            "#".repeat(bar),
            row.votes
        )]
    }));
    blocks.push(vec![String::new()]);
    blocks
}

fn review_entry(number: usize, listing: &ReviewListing, width: usize) -> Vec<String> {
    let review = &listing.review;
    let mut lines = vec![truncate(
        &format!(
            "#{number} {}  {} ({}/5)",
            review.display_name(),
            review.rating.stars(),
            review.rating
        ),
        width,
    )];
    lines.push(truncate(
        &format!("{ENTRY_INDENT}Exhibit: {}", listing.exhibit_name),
        width,
    ));
    if let Some(timestamp) = review.timestamp {
        lines.push(truncate(
            &format!(
                "{ENTRY_INDENT}Submitted: {}",
                timestamp.format("%Y-%m-%d %H:%M UTC")
            ),
            width,
        ));
    }

    let text = review.review.trim();
    if text.is_empty() {
        lines.push(format!("{ENTRY_INDENT}(no comment)"));
    } else {
        let text_width = width - ENTRY_INDENT.len();
        lines.extend(
            wrap(text, text_width)
                .into_iter()
                .map(|line| format!("{ENTRY_INDENT}{line}")),
        );
    }
    lines.push(String::new());
    lines
}

/// Greedy word wrap. Words longer than `width` are hard-split.
fn wrap(text: &str, width: usize) -> Vec<String> {
    let mut lines = Vec::new();
    let mut current = String::new();
    let mut current_len = 0;

    for word in text.split_whitespace() {
        let mut word: Vec<char> = word.chars().collect();
        while word.len() > width {
            if current_len > 0 {
                lines.push(std::mem::take(&mut current));
                current_len = 0;
            }
            lines.push(word.drain(..width).collect());
        }
        if word.is_empty() {
            continue;
        }

        let needed = if current_len == 0 { word.len() } else { current_len + 1 + word.len() };
        if needed > width {
            lines.push(std::mem::take(&mut current));
            current_len = 0;
        }
        if current_len > 0 {
            current.push(' ');
            current_len += 1;
        }
        current.extend(word.iter());
        current_len += word.len();
    }
    if current_len > 0 {
        lines.push(current);
    }
    lines
}

fn truncate(text: &str, width: usize) -> String {
    if text.chars().count() <= width {
        return text.to_string();
    }
    let keep = width.saturating_sub(3);
    let mut truncated: String = text.chars().take(keep).collect();
    truncated.push_str(&"...".chars().take(width - keep).collect::<String>());
    truncated
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::{expo, review};
    use domain::Review;

    fn position(text: &str, needle: &str) -> usize {
        text.find(needle)
            .unwrap_or_else(|| panic!("{needle:?} not in report"))
    }

    fn crowded() -> Dashboard {
        let (exhibits, _) = expo();
        let reviews: Vec<Review> = (0..25)
            .map(|i| {
                let mut r = review(&format!("r{i}"), (i % 5 + 1) as u8, Some("a"));
                r.review = "Loved the colour change and the explanation of the reaction. "
                    .repeat(i % 3 + 1);
                r
            })
            .collect();
        Dashboard::build(&exhibits, &reviews)
    }

    #[test]
    fn test_sections_in_order() {
        let (exhibits, reviews) = expo();
        let text = Report::render(&Dashboard::build(&exhibits, &reviews), &ReportOptions::default())
            .to_text();

        let summary = position(&text, "SUMMARY");
        let table = position(&text, "EXHIBITS");
        let chart = position(&text, "VOTES\n");
        let entries = position(&text, "REVIEWS (3)");
        assert!(summary < table && table < chart && chart < entries);

        let first = position(&text, "#1 Reviewer r1");
        let second = position(&text, "#2 Reviewer r2");
        let third = position(&text, "#3 Reviewer r3");
        assert!(entries < first && first < second && second < third);
        assert!(text.contains("Most voted:             Volcano"));
    }

    #[test]
    fn test_pages_respect_height_and_carry_headers() {
        let options = ReportOptions::default().with_lines_per_page(15);
        let report = Report::render(&crowded(), &options);

        assert!(report.page_count() > 1);
        for (index, page) in report.pages().iter().enumerate() {
            assert_eq!(page.number, index + 1);
            assert!(page.lines.len() <= 15);
            assert_eq!(
                page.lines[0],
                format!("Chemistry Expo Results - Page {}", index + 1)
            );
        }
    }

    #[test]
    fn test_entries_never_split() {
        let options = ReportOptions::default().with_lines_per_page(12);
        let report = Report::render(&crowded(), &options);

        for page in report.pages() {
            let body = &page.lines[HEADER_LINES..];
            assert!(
                !body[0].starts_with(ENTRY_INDENT),
                "page {} starts mid-entry",
                page.number
            );
        }
        let entries = report
            .pages()
            .iter()
            .flat_map(|p| p.lines.iter())
            .filter(|line| line.starts_with('#'))
            .count();
        assert_eq!(entries, 25);
    }

    #[test]
    fn test_lines_fit_width() {
        let options = ReportOptions::default().with_width(40);
        let mut dashboard = crowded();
        dashboard.reviews[0].review.review = format!("{} tail", "x".repeat(100));

        let report = Report::render(&dashboard, &options);
        for line in report.pages().iter().flat_map(|p| p.lines.iter()) {
            assert!(line.chars().count() <= 40, "{line:?}");
        }
    }

    #[test]
    fn test_empty_dashboard() {
        let report = Report::render(&Dashboard::build(&[], &[]), &ReportOptions::default());
        assert_eq!(report.page_count(), 1);
        let text = report.to_text();
        assert!(text.contains("(no exhibits)"));
        assert!(text.contains("(no reviews)"));
        assert!(text.contains("Most voted:             N/A"));
    }

    #[test]
    fn test_wrap() {
        assert_eq!(wrap("a bb ccc dddd", 6), vec!["a bb", "ccc", "dddd"]);
        assert_eq!(wrap("abcdefgh", 3), vec!["abc", "def", "gh"]);
        assert!(wrap("   ", 5).is_empty());
    }

    #[test]
    fn test_truncate() {
        assert_eq!(truncate("Volcano", 10), "Volcano");
        assert_eq!(truncate("Electrolysis of water", 10), "Electro...");
    }
}
