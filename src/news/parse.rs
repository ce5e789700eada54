//! Listing-page scraper.
//!
//! The front page is a nested table whose story rows come in pairs: a title
//! row (rank, title link, site) followed by a metadata row (points, comments).
//! Spacer rows carry an inline `style` and are excluded by the row selector.
//! Everything here is tied to that markup; a template change shows up as
//! missing or wrong entries, not as an error.

use super::error::ParseError;
use super::model::{Entry, EntryList};
use once_cell::sync::Lazy;
use scraper::{ElementRef, Html, Selector};
use std::num::NonZeroU64;
use tracing::{debug, warn};

static ROWS: Lazy<Selector> = Lazy::new(|| {
    Selector::parse("body center table tr td table tbody tr:not([style])").expect("valid selector")
});
static RANK_CELL: Lazy<Selector> =
    Lazy::new(|| Selector::parse("td.title:first-child").expect("valid selector"));
static TITLE_LINK: Lazy<Selector> =
    Lazy::new(|| Selector::parse("td.title a").expect("valid selector"));
static PAGE_LINKS: Lazy<Selector> =
    Lazy::new(|| Selector::parse("body table table td.title a").expect("valid selector"));
static SITE_STR: Lazy<Selector> =
    Lazy::new(|| Selector::parse("span.sitestr").expect("valid selector"));
static SPAN: Lazy<Selector> = Lazy::new(|| Selector::parse("span").expect("valid selector"));

/// Where story rows sit among the rows matched on a page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RowLayout {
    /// Banner rows before the first story.
    pub leading_rows: usize,
    /// Footer rows after the last story.
    pub trailing_rows: usize,
    /// Rows making up one story; only the first is read.
    pub rows_per_entry: usize,
}

/// Layout of the front page and its numbered continuations.
pub const FRONT_PAGE_LAYOUT: RowLayout = RowLayout {
    leading_rows: 1,
    trailing_rows: 2,
    rows_per_entry: 2,
};

#[derive(Debug, Clone, Copy)]
pub struct ParsePolicy {
    pub layout: RowLayout,
    /// Fail with [`ParseError::NoEntries`] instead of returning an empty list.
    pub require_entries: bool,
}

impl Default for ParsePolicy {
    fn default() -> Self {
        ParsePolicy {
            layout: FRONT_PAGE_LAYOUT,
            require_entries: false,
        }
    }
}

pub fn parse_entries(source: &[u8], policy: &ParsePolicy) -> Result<EntryList, ParseError> {
    let html = std::str::from_utf8(source)?;
    let doc = Html::parse_document(html);
    entries_from_document(&doc, policy)
}

pub fn entries_from_document(doc: &Html, policy: &ParsePolicy) -> Result<EntryList, ParseError> {
    let rows: Vec<ElementRef> = doc.select(&ROWS).collect();
    let layout = policy.layout;
    let end = rows.len().saturating_sub(layout.trailing_rows);
    let story_rows = rows.get(layout.leading_rows..end).unwrap_or_default();

    let mut entries = Vec::new();
    for row in story_rows.iter().step_by(layout.rows_per_entry.max(1)) {
        if let Some(entry) = parse_title_row(*row) {
            entries.push(entry);
        }
    }
    debug!(rows = rows.len(), entries = entries.len(), "parsed listing");

    if policy.require_entries && entries.is_empty() {
        return Err(ParseError::NoEntries);
    }

    let next_page_ref = doc
        .select(&PAGE_LINKS)
        .last()
        .and_then(|a| a.value().attr("href"))
        .ok_or(ParseError::MissingNextPage)?
        .to_string();

    Ok(EntryList {
        entries,
        next_page_ref,
    })
}

fn parse_title_row(row: ElementRef) -> Option<Entry> {
    let rank_text: String = row
        .select(&RANK_CELL)
        .next()
        .map(|cell| cell.text().collect())
        .unwrap_or_default();
    let id = match parse_rank(&rank_text) {
        Ok(id) => id,
        Err(err) => {
            warn!(rank = %rank_text.trim(), error = %err, "skipping entry with unreadable id");
            return None;
        }
    };

    let Some(link) = row.select(&TITLE_LINK).next() else {
        warn!(id, "skipping entry without a title link");
        return None;
    };

    Some(Entry {
        id,
        title: link.text().collect::<String>().trim().to_string(),
        link: link.value().attr("href").unwrap_or_default().to_string(),
        site: site_label(link),
    })
}

// Ranks start at 1; "0." is as unreadable as "x.".
fn parse_rank(text: &str) -> Result<u64, std::num::ParseIntError> {
    let rank: NonZeroU64 = text.trim().trim_end_matches('.').parse()?;
    Ok(rank.get())
}

// The site sits in a span beside the title anchor: `span.sitestr` on the
// current markup, a bare `span.comhead` with "(site)" on older pages.
fn site_label(link: ElementRef) -> String {
    let Some(parent) = link.parent().and_then(ElementRef::wrap) else {
        return String::new();
    };
    let span = parent
        .select(&SITE_STR)
        .next()
        .or_else(|| parent.select(&SPAN).next());
    match span {
        Some(span) => span
            .text()
            .collect::<String>()
            .trim()
            .trim_start_matches('(')
            .trim_end_matches(')')
            .trim()
            .to_string(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const FRONT_PAGE: &str = include_str!("../../test-pages/front_page.html");

    /// Builds a minimal listing with one banner row, the given story rows and
    /// a "More" row plus footer row when `more` is set.
    fn page(stories: &[String], more: Option<&str>) -> String {
        let mut rows = String::new();
        for s in stories {
            rows.push_str(s);
            rows.push_str(r#"<tr><td colspan="2"></td><td class="subtext">1 point</td></tr>"#);
            rows.push_str(r#"<tr class="spacer" style="height:5px"></tr>"#);
        }
        if let Some(href) = more {
            rows.push_str(&format!(
                r#"<tr><td colspan="2"></td><td class="title"><a href="{href}" class="morelink">More</a></td></tr>"#
            ));
        }
        format!(
            r#"<html><body><center><table id="hnmain">
<tr><td><table><tr><td><b class="hnname"><a href="news">Hacker News</a></b></td></tr></table></td></tr>
<tr><td><table>{rows}</table></td></tr>
<tr><td><table><tr><td>footer</td></tr></table></td></tr>
</table></center></body></html>"#
        )
    }

    fn story(rank: &str, title: &str, href: &str, site: Option<&str>) -> String {
        let sitebit = site
            .map(|s| format!(r#"<span class="sitebit comhead"> (<a href="from?site={s}"><span class="sitestr">{s}</span></a>)</span>"#))
            .unwrap_or_default();
        format!(
            r#"<tr class="athing"><td align="right" class="title"><span class="rank">{rank}</span></td><td class="votelinks"></td><td class="title"><span class="titleline"><a href="{href}">{title}</a>{sitebit}</span></td></tr>"#
        )
    }

    #[test]
    fn parses_front_page_fixture() {
        let list = parse_entries(FRONT_PAGE.as_bytes(), &ParsePolicy::default()).unwrap();

        assert_eq!(
            list.entries,
            vec![
                Entry {
                    id: 1,
                    title: "A".into(),
                    link: "https://a.example/post".into(),
                    site: "a.example".into(),
                },
                Entry {
                    id: 2,
                    title: "B".into(),
                    link: "https://b.example/".into(),
                    site: "b.example".into(),
                },
                Entry {
                    id: 3,
                    title: "C".into(),
                    link: "item?id=41000003".into(),
                    site: "".into(),
                },
            ]
        );
        assert_eq!(list.next_page_ref, "?p=2");
    }

    #[test]
    fn keeps_source_order_for_many_rows() {
        let stories: Vec<String> = (1..=30)
            .map(|n| story(&format!("{n}."), &format!("Story {n}"), &format!("https://s{n}.example/"), Some("s.example")))
            .collect();
        let html = page(&stories, Some("news?p=2"));

        let list = parse_entries(html.as_bytes(), &ParsePolicy::default()).unwrap();

        assert_eq!(list.entries.len(), 30);
        let ids: Vec<u64> = list.entries.iter().map(|e| e.id).collect();
        assert_eq!(ids, (1..=30).collect::<Vec<u64>>());
        assert_eq!(list.entries[29].title, "Story 30");
        assert_eq!(list.next_page_ref, "news?p=2");
    }

    #[test]
    fn skips_entry_with_non_numeric_rank() {
        let html = page(
            &[
                story("1.", "First", "https://one.example/", None),
                story("x.", "Broken", "https://broken.example/", None),
                story("3.", "Third", "https://three.example/", None),
            ],
            Some("?p=2"),
        );

        let list = parse_entries(html.as_bytes(), &ParsePolicy::default()).unwrap();

        let titles: Vec<&str> = list.entries.iter().map(|e| e.title.as_str()).collect();
        assert_eq!(titles, vec!["First", "Third"]);
    }

    #[test]
    fn skips_entry_with_zero_rank() {
        let html = page(
            &[
                story("0.", "Zero", "https://zero.example/", None),
                story("2.", "Second", "https://two.example/", None),
            ],
            Some("?p=2"),
        );

        let list = parse_entries(html.as_bytes(), &ParsePolicy::default()).unwrap();

        let ids: Vec<u64> = list.entries.iter().map(|e| e.id).collect();
        assert_eq!(ids, vec![2]);
    }

    #[test]
    fn missing_site_is_empty() {
        let html = page(&[story("1.", "Ask: anything?", "item?id=7", None)], Some("?p=2"));
        let list = parse_entries(html.as_bytes(), &ParsePolicy::default()).unwrap();
        assert_eq!(list.entries[0].site, "");
        assert_eq!(list.entries[0].link, "item?id=7");
    }

    #[test]
    fn reads_legacy_comhead_site() {
        let row = r#"<tr><td align="right" class="title">1.</td><td><center><a id="up_1" href="vote?for=1"></a></center></td><td class="title"><a href="http://old.example/">Old style</a><span class="comhead"> (old.example) </span></td></tr>"#;
        let html = page(&[row.to_string()], Some("news2"));

        let list = parse_entries(html.as_bytes(), &ParsePolicy::default()).unwrap();

        assert_eq!(list.entries[0].id, 1);
        assert_eq!(list.entries[0].title, "Old style");
        assert_eq!(list.entries[0].site, "old.example");
        assert_eq!(list.next_page_ref, "news2");
    }

    #[test]
    fn missing_more_link_is_a_typed_error() {
        let html = r#"<html><body><center><table><tr><td>nothing here</td></tr></table></center></body></html>"#;
        let err = parse_entries(html.as_bytes(), &ParsePolicy::default()).unwrap_err();
        assert!(matches!(err, ParseError::MissingNextPage));
    }

    #[test]
    fn empty_listing_is_fine_unless_strict() {
        let html = page(&[], Some("?p=2"));

        let lenient = parse_entries(html.as_bytes(), &ParsePolicy::default()).unwrap();
        assert!(lenient.entries.is_empty());

        let strict = ParsePolicy {
            require_entries: true,
            ..ParsePolicy::default()
        };
        let err = parse_entries(html.as_bytes(), &strict).unwrap_err();
        assert!(matches!(err, ParseError::NoEntries));
    }

    #[test]
    fn invalid_utf8_fails_the_document() {
        let err = parse_entries(&[0x3c, 0xff, 0xfe, 0x3e], &ParsePolicy::default()).unwrap_err();
        assert!(matches!(err, ParseError::Encoding(_)));
    }
}
