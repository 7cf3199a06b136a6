//! Row extraction for ranking list pages
//!
//! A row yields a record only when its info block splits into exactly
//! [`EXPECTED_INFO_TOKENS`] tokens, laid out as
//!
//! ```text
//! [0]  [1]   [2]   [3] [4]  [5] [6] [7]  [8]        [9]
//! TV   (64   eps)  Apr 2009 -   Jul 2010 3,112,480  members
//! ```
//!
//! Anything else is skipped without an error reaching the caller.

use scraper::ElementRef;
use tracing::trace;

use super::config::CompiledSelectors;
use super::listing_page::ListingPage;
use super::{ParsingError, ParsingResult};
use crate::domain::item_record::{EpisodeCount, ItemRecord};

/// Number of whitespace-separated tokens in a well-formed info block
pub const EXPECTED_INFO_TOKENS: usize = 10;

/// Placeholder the site shows for an unannounced episode count
pub const UNKNOWN_EPISODES_PLACEHOLDER: &str = "?";

/// Why a row produced no record
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SkipReason {
    RowShapeMismatch { token_count: usize },
    FieldParseFailure(ParsingError),
}

/// Result of extracting one row
#[derive(Debug, Clone, PartialEq)]
pub enum Extraction {
    Record(ItemRecord),
    Skip(SkipReason),
}

impl Extraction {
    pub fn record(self) -> Option<ItemRecord> {
        match self {
            Self::Record(record) => Some(record),
            Self::Skip(_) => None,
        }
    }

    pub fn is_skip(&self) -> bool {
        matches!(self, Self::Skip(_))
    }
}

/// Records of one page plus what was dropped
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PageExtraction {
    pub records: Vec<ItemRecord>,
    pub rows_seen: usize,
    pub shape_mismatches: usize,
    pub field_failures: Vec<ParsingError>,
}

impl PageExtraction {
    pub fn rows_skipped(&self) -> usize {
        self.shape_mismatches + self.field_failures.len()
    }
}

/// Extracts [`ItemRecord`]s from listing rows
#[derive(Debug, Clone)]
pub struct ItemRecordExtractor {
    selectors: CompiledSelectors,
}

impl ItemRecordExtractor {
    pub fn new(selectors: CompiledSelectors) -> Self {
        Self { selectors }
    }

    pub fn selectors(&self) -> &CompiledSelectors {
        &self.selectors
    }

    /// Extract every row of a page, in document order
    pub fn extract_page(&self, page: &ListingPage<'_>) -> PageExtraction {
        let mut result = PageExtraction::default();

        for row in page.rows() {
            result.rows_seen += 1;
            match self.extract(row) {
                Extraction::Record(record) => result.records.push(record),
                Extraction::Skip(SkipReason::RowShapeMismatch { token_count }) => {
                    trace!("Skipping row {} with {} info tokens", result.rows_seen, token_count);
                    result.shape_mismatches += 1;
                }
                Extraction::Skip(SkipReason::FieldParseFailure(err)) => {
                    result.field_failures.push(err);
                }
            }
        }

        result
    }

    /// Extract a single row. The row is only read.
    pub fn extract(&self, row: ElementRef<'_>) -> Extraction {
        let info_text = row
            .select(&self.selectors.info)
            .next()
            .map(|e| e.text().collect::<String>())
            .unwrap_or_default();
        let tokens: Vec<&str> = info_text.split_whitespace().collect();

        if tokens.len() != EXPECTED_INFO_TOKENS {
            return Extraction::Skip(SkipReason::RowShapeMismatch {
                token_count: tokens.len(),
            });
        }

        match self.record_from_tokens(row, &tokens) {
            Ok(record) => Extraction::Record(record),
            Err(err) => Extraction::Skip(SkipReason::FieldParseFailure(err)),
        }
    }

    fn record_from_tokens(&self, row: ElementRef<'_>, tokens: &[&str]) -> ParsingResult<ItemRecord> {
        Ok(ItemRecord {
            name: self.extract_text(row, &self.selectors.title),
            score: self.extract_text(row, &self.selectors.score),
            popularity: parse_popularity(tokens[EXPECTED_INFO_TOKENS - 2])?,
            season_start: tokens[3].to_string(),
            year_start: parse_year("year_start", tokens[4])?,
            season_end: tokens[6].to_string(),
            year_end: parse_year("year_end", tokens[7])?,
            num_episodes: parse_episode_count(tokens[1])?,
            category: tokens[0].to_string(),
        })
    }

    /// Trimmed text of the first match inside `row`; empty text counts as absent
    fn extract_text(&self, row: ElementRef<'_>, selector: &scraper::Selector) -> Option<String> {
        row.select(selector)
            .next()
            .map(|e| e.text().collect::<String>().trim().to_string())
            .filter(|text| !text.is_empty())
    }
}

/// `(64` → 64, `(?` → unknown. Only the part after the last `(` is considered.
pub fn parse_episode_count(token: &str) -> ParsingResult<EpisodeCount> {
    let count = token.rsplit('(').next().unwrap_or(token);
    if count == UNKNOWN_EPISODES_PLACEHOLDER {
        return Ok(EpisodeCount::Unknown);
    }
    count
        .parse::<u32>()
        .map(EpisodeCount::Known)
        .map_err(|e| ParsingError::malformed_field("num_episodes", token, e))
}

/// `3,112,480` → 3112480
pub fn parse_popularity(token: &str) -> ParsingResult<i64> {
    token
        .replace(',', "")
        .parse::<i64>()
        .map_err(|e| ParsingError::malformed_field("popularity", token, e))
}

fn parse_year(field: &str, token: &str) -> ParsingResult<i32> {
    token
        .parse::<i32>()
        .map_err(|e| ParsingError::malformed_field(field, token, e))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::parsing::config::ListingSelectors;
    use rstest::rstest;

    fn extractor() -> ItemRecordExtractor {
        ItemRecordExtractor::new(CompiledSelectors::compile(&ListingSelectors::default()).unwrap())
    }

    fn row_html(title: Option<&str>, score: Option<&str>, info: &str) -> String {
        let title = title
            .map(|t| format!(r#"<a class="hoverinfo_trigger fl-l fs14 fw-b" href="/anime/1">{t}</a>"#))
            .unwrap_or_default();
        let score = score
            .map(|s| format!(r#"<span class="text on score-label">{s}</span>"#))
            .unwrap_or_default();
        format!(
            r#"<html><body><table><tr class="ranking-list">
                <td class="title">{title}<div class="detail"><div class="information di-ib mt4">{info}</div></div></td>
                <td class="score">{score}</td>
            </tr></table></body></html>"#
        )
    }

    fn extract_one(html: &str) -> Extraction {
        let extractor = extractor();
        let page = ListingPage::parse(html, extractor.selectors()).unwrap();
        let row = page.rows().next().unwrap();
        extractor.extract(row)
    }

    #[test]
    fn test_well_formed_row_maps_positionally() {
        let html = row_html(
            Some("Fullmetal Alchemist: Brotherhood"),
            Some("9.10"),
            "TV (64 eps)<br>\n        Apr 2009 - Jul 2010<br>\n        3,112,480 members",
        );

        let record = extract_one(&html).record().unwrap();
        assert_eq!(record.name.as_deref(), Some("Fullmetal Alchemist: Brotherhood"));
        assert_eq!(record.score.as_deref(), Some("9.10"));
        assert_eq!(record.category, "TV");
        assert_eq!(record.num_episodes, EpisodeCount::Known(64));
        assert_eq!(record.season_start, "Apr");
        assert_eq!(record.year_start, 2009);
        assert_eq!(record.season_end, "Jul");
        assert_eq!(record.year_end, 2010);
        assert_eq!(record.popularity, 3_112_480);
    }

    #[test]
    fn test_missing_title_and_score_are_absent_not_skipped() {
        let html = row_html(None, None, "Movie (1 eps) Aug 2016 - Aug 2016 2,345 members");
        let record = extract_one(&html).record().unwrap();
        assert_eq!(record.name, None);
        assert_eq!(record.score, None);
        assert_eq!(record.category, "Movie");
    }

    #[rstest]
    #[case("TV (24 eps) Apr 2006 - Sep 2006 members", 9)]
    #[case("Music (1 eps) 2019 - 2019 1,204 members", 8)]
    #[case("TV (13 eps) Jan 2020 - Mar 2020 1,000 members extra", 11)]
    #[case("", 0)]
    fn test_shape_mismatch_is_skipped(#[case] info: &str, #[case] token_count: usize) {
        let html = row_html(Some("x"), Some("7.00"), info);
        assert_eq!(
            extract_one(&html),
            Extraction::Skip(SkipReason::RowShapeMismatch { token_count })
        );
    }

    #[test]
    fn test_ten_tokens_with_placeholder_year_is_field_failure() {
        let html = row_html(Some("x"), Some("N/A"), "TV (? eps) Oct 2023 - ? ? 12,000 members");
        assert!(matches!(
            extract_one(&html),
            Extraction::Skip(SkipReason::FieldParseFailure(ParsingError::MalformedField { ref field, .. }))
                if field == "year_end"
        ));
    }

    #[test]
    fn test_row_without_info_block_is_skipped() {
        let html = r#"<table><tr class="ranking-list"><td>no info</td></tr></table>"#;
        assert_eq!(
            extract_one(html),
            Extraction::Skip(SkipReason::RowShapeMismatch { token_count: 0 })
        );
    }

    #[rstest]
    #[case("(24", EpisodeCount::Known(24))]
    #[case("(?", EpisodeCount::Unknown)]
    #[case("(1", EpisodeCount::Known(1))]
    #[case("12", EpisodeCount::Known(12))]
    fn test_parse_episode_count(#[case] token: &str, #[case] expected: EpisodeCount) {
        assert_eq!(parse_episode_count(token).unwrap(), expected);
    }

    #[test]
    fn test_unknown_episodes_use_legacy_sentinel() {
        assert_eq!(parse_episode_count("(?").unwrap().legacy_value(), -500);
    }

    #[rstest]
    #[case("(x")]
    #[case("(1?")]
    #[case("(-3")]
    fn test_malformed_episode_count(#[case] token: &str) {
        let err = parse_episode_count(token).unwrap_err();
        assert!(matches!(err, ParsingError::MalformedField { ref field, .. } if field == "num_episodes"));
    }

    #[rstest]
    #[case("12,345", 12_345)]
    #[case("3,112,480", 3_112_480)]
    #[case("987", 987)]
    fn test_parse_popularity(#[case] token: &str, #[case] expected: i64) {
        assert_eq!(parse_popularity(token).unwrap(), expected);
    }

    #[test]
    fn test_bad_numeric_field_skips_row() {
        let html = row_html(Some("x"), Some("7.00"), "TV (12 eps) Jan 20X9 - Mar 2019 1,000 members");
        assert!(matches!(
            extract_one(&html),
            Extraction::Skip(SkipReason::FieldParseFailure(ParsingError::MalformedField { ref field, .. }))
                if field == "year_start"
        ));
    }

    #[test]
    fn test_extract_page_counts_skips() {
        let extractor = extractor();
        let html = r#"<table>
            <tr class="ranking-list"><td><div class="information di-ib mt4">TV (12 eps) Jan 2019 - Mar 2019 1,000 members</div></td></tr>
            <tr class="ranking-list"><td><div class="information di-ib mt4">TV (12 eps) 2019 - 2019 1,000 members</div></td></tr>
            <tr class="ranking-list"><td><div class="information di-ib mt4">TV (12 eps) Jan 2019 - Mar 2019 lots members</div></td></tr>
        </table>"#;
        let page = ListingPage::parse(html, extractor.selectors()).unwrap();

        let result = extractor.extract_page(&page);
        assert_eq!(result.rows_seen, 3);
        assert_eq!(result.records.len(), 1);
        assert_eq!(result.shape_mismatches, 1);
        assert_eq!(result.field_failures.len(), 1);
        assert_eq!(result.rows_skipped(), 2);
    }

    #[test]
    fn test_extraction_is_idempotent() {
        let extractor = extractor();
        let html = row_html(Some("Steins;Gate"), Some("9.07"), "TV (24 eps) Apr 2011 - Sep 2011 2,500,000 members");
        let page = ListingPage::parse(&html, extractor.selectors()).unwrap();
        let row = page.rows().next().unwrap();

        assert_eq!(extractor.extract(row), extractor.extract(row));
    }
}
