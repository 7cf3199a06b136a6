//! Property tests for row extraction

use proptest::prelude::*;

use anime_rank_harvester::domain::EpisodeCount;
use anime_rank_harvester::infrastructure::parsing::EXPECTED_INFO_TOKENS;
use anime_rank_harvester::infrastructure::{
    CompiledSelectors, Extraction, ItemRecordExtractor, ListingPage, ListingSelectors, SkipReason,
};

fn extractor() -> ItemRecordExtractor {
    ItemRecordExtractor::new(CompiledSelectors::compile(&ListingSelectors::default()).unwrap())
}

fn page_with_info(info: &str) -> String {
    format!(
        r#"<html><body><table><tr class="ranking-list"><td>
            <a class="hoverinfo_trigger fl-l fs14 fw-b" href="/anime/1">Title</a>
            <div class="information di-ib mt4">{info}</div>
            <span class="text on">8.00</span>
        </td></tr></table></body></html>"#
    )
}

proptest! {
    #[test]
    fn rows_without_ten_tokens_never_yield_records(
        tokens in prop::collection::vec("[A-Za-z0-9,()?]{1,8}", 0..20)
    ) {
        prop_assume!(tokens.len() != EXPECTED_INFO_TOKENS);

        let extractor = extractor();
        let html = page_with_info(&tokens.join(" "));
        let page = ListingPage::parse(&html, extractor.selectors()).unwrap();
        let row = page.rows().next().unwrap();

        prop_assert_eq!(
            extractor.extract(row),
            Extraction::Skip(SkipReason::RowShapeMismatch { token_count: tokens.len() })
        );
    }

    #[test]
    fn well_formed_rows_map_every_field(
        episodes in prop::option::of(1u32..2000),
        year_start in 1917i32..2030,
        span in 0i32..30,
        popularity in 0i64..5_000_000,
        category in prop::sample::select(vec!["TV", "Movie", "OVA", "ONA", "Special", "Music"]),
    ) {
        let episode_token = episodes.map_or_else(|| "?".to_string(), |n| n.to_string());
        let year_end = year_start + span;
        let info = format!(
            "{category} ({episode_token} eps)<br>\n Oct {year_start} - Mar {year_end}<br>\n {popularity} members"
        );

        let extractor = extractor();
        let html = page_with_info(&info);
        let page = ListingPage::parse(&html, extractor.selectors()).unwrap();
        let row = page.rows().next().unwrap();

        let first = extractor.extract(row);
        prop_assert_eq!(&first, &extractor.extract(row));

        let record = first.record().unwrap();
        prop_assert_eq!(record.category, category);
        prop_assert_eq!(record.year_start, year_start);
        prop_assert_eq!(record.year_end, year_end);
        prop_assert_eq!(record.popularity, popularity);
        prop_assert_eq!(record.num_episodes, episodes.map_or(EpisodeCount::Unknown, EpisodeCount::Known));
    }
}
