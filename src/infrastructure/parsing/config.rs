//! Parsing configuration for HTML extraction
//!
//! Centralized configuration for the CSS selectors of the ranking list.

use scraper::Selector;
use serde::{Deserialize, Serialize};

use super::{ParsingError, ParsingResult};

/// CSS selectors for ranking list pages
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ListingSelectors {
    /// One match per ranked entry
    pub row: String,

    /// Inside a row: the whitespace-separated info block
    /// (`TV (64 eps) Apr 2009 - Jul 2010 3,112,480 members`)
    pub info: String,

    /// Inside a row: the title anchor
    pub title: String,

    /// Inside a row: the score element
    pub score: String,

    /// On the page: the anchor to the following page
    pub next_link: String,
}

impl Default for ListingSelectors {
    fn default() -> Self {
        Self {
            row: "tr.ranking-list".to_string(),
            info: "div.information.di-ib.mt4".to_string(),
            title: "a.hoverinfo_trigger.fl-l.fs14.fw-b".to_string(),
            score: "span.text.on".to_string(),
            next_link: "a.link-blue-box.next".to_string(),
        }
    }
}

/// [`ListingSelectors`] compiled once per crawl
#[derive(Debug, Clone)]
pub struct CompiledSelectors {
    pub row: Selector,
    pub info: Selector,
    pub title: Selector,
    pub score: Selector,
    pub next_link: Selector,
}

impl CompiledSelectors {
    pub fn compile(selectors: &ListingSelectors) -> ParsingResult<Self> {
        Ok(Self {
            row: compile_selector(&selectors.row)?,
            info: compile_selector(&selectors.info)?,
            title: compile_selector(&selectors.title)?,
            score: compile_selector(&selectors.score)?,
            next_link: compile_selector(&selectors.next_link)?,
        })
    }
}

fn compile_selector(selector: &str) -> ParsingResult<Selector> {
    Selector::parse(selector).map_err(|e| ParsingError::invalid_selector(selector, e))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_selectors_compile() {
        assert!(CompiledSelectors::compile(&ListingSelectors::default()).is_ok());
    }

    #[test]
    fn test_invalid_selector_is_reported() {
        let selectors = ListingSelectors {
            next_link: "a[".to_string(),
            ..Default::default()
        };
        let err = CompiledSelectors::compile(&selectors).unwrap_err();
        assert!(matches!(err, ParsingError::InvalidSelector { ref selector, .. } if selector == "a["));
    }
}
