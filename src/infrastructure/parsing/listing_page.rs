//! Parsed ranking list page
//!
//! Thin wrapper over `scraper::Html` exposing the two queries the crawl loop
//! needs: the entry rows and the next-page anchor.

use scraper::{ElementRef, Html};
use tracing::debug;

use super::config::CompiledSelectors;
use super::{ParsingError, ParsingResult};

/// Outcome of looking up the next-page anchor
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NextLink {
    /// No anchor on the page
    Absent,
    /// Anchor present but carries no `href`
    MissingHref,
    Href(String),
}

/// One fetched listing page
pub struct ListingPage<'s> {
    document: Html,
    selectors: &'s CompiledSelectors,
}

impl<'s> ListingPage<'s> {
    /// Parse raw page text. Blank input is rejected; anything else is accepted
    /// the way a browser would accept it.
    pub fn parse(raw: &str, selectors: &'s CompiledSelectors) -> ParsingResult<Self> {
        if raw.trim().is_empty() {
            return Err(ParsingError::HtmlParsingFailed {
                message: "document is empty".to_string(),
            });
        }

        let document = Html::parse_document(raw);
        if !document.errors.is_empty() {
            debug!("HTML parsed with {} recoverable errors", document.errors.len());
        }

        Ok(Self { document, selectors })
    }

    /// Entry rows in document order
    pub fn rows(&self) -> impl Iterator<Item = ElementRef<'_>> + '_ {
        self.document.select(&self.selectors.row)
    }

    pub fn row_count(&self) -> usize {
        self.rows().count()
    }

    /// First next-page anchor on the page
    pub fn next_link(&self) -> NextLink {
        match self.document.select(&self.selectors.next_link).next() {
            None => NextLink::Absent,
            Some(anchor) => anchor
                .value()
                .attr("href")
                .map_or(NextLink::MissingHref, |href| NextLink::Href(href.to_string())),
        }
    }
}
