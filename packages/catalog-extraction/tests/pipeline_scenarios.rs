//! End-to-end pipeline scenarios against the mock collaborators.

use proptest::prelude::*;
use tokio_util::sync::CancellationToken;

use catalog_extraction::fetchers::MockSectionFetcher;
use catalog_extraction::testing::{
    grout_bundle, tile_bundle, tool_main_markup, MockLinkChecker,
};
use catalog_extraction::types::sections::{PageSections, SECTION_MAIN, SECTION_SPECIFICATIONS};
use catalog_extraction::{canonical_key, ExtractionError, Family, MemoryStore, Pipeline};

fn pipeline(
    fetcher: MockSectionFetcher,
    checker: MockLinkChecker,
) -> Pipeline<MockSectionFetcher, MemoryStore, MockLinkChecker> {
    Pipeline::new(fetcher, MemoryStore::new(), checker)
}

#[tokio::test]
async fn scenario_a_tile_page_with_structured_price() {
    let url = "https://catalog.example/p/100456789";
    let fetcher = MockSectionFetcher::new().with_bundle(tile_bundle(url));
    let pipeline = pipeline(fetcher, MockLinkChecker::new());

    let outcome = pipeline.run(url).await.unwrap();
    let record = &outcome.record;

    assert_eq!(record.family, Family::Tile);
    assert_eq!(record.prices.per_container, Some(287.04));
    let coverage = record.core.coverage_sqft.unwrap();
    assert!((coverage - 10.98).abs() < 0.001);
    assert_eq!(record.sku.as_deref(), Some("100456789"));
    assert!(!record.incomplete);
}

#[tokio::test]
async fn scenario_b_grout_page_color_in_open_map() {
    let url = "https://catalog.example/p/100998877";
    let fetcher = MockSectionFetcher::new().with_bundle(grout_bundle(url));
    let pipeline = pipeline(fetcher, MockLinkChecker::new());

    let outcome = pipeline.run(url).await.unwrap();
    let record = &outcome.record;

    assert_eq!(record.family, Family::Grout);
    assert_eq!(record.attributes.get("color").map(String::as_str), Some("Grey"));
    assert_eq!(record.core.box_weight_lbs, Some(25.0));
    assert!(record.core.coverage_sqft.is_none());
}

#[tokio::test]
async fn scenario_c_total_fetch_failure_still_yields_record() {
    let url = "https://catalog.example/p/unreachable";
    let fetcher = MockSectionFetcher::new().failing();
    let store = MemoryStore::new();
    let pipeline = Pipeline::new(fetcher, store, MockLinkChecker::new());

    let outcome = pipeline.run(url).await.unwrap();
    let record = &outcome.record;

    assert_eq!(record.family, Family::Unknown);
    assert!(record.incomplete);
    // every mandatory field of the default parser is unresolved
    assert!(outcome.report.unresolved.contains(&"title".to_string()));
    assert!(outcome.report.unresolved.contains(&"sku".to_string()));
    assert!(outcome
        .report
        .diagnostics
        .iter()
        .any(|d| d.contains("classification failed")));
}

#[tokio::test]
async fn scenario_d_spelling_variants_collapse() {
    let url = "https://catalog.example/p/100667788";
    // spec table spells the field one way, display text feeds the
    // pattern pass another way; exactly one canonical field must remain
    let bundle = PageSections::new(url)
        .with_fetched(
            SECTION_MAIN,
            r#"<h1>Unsanded Grout</h1><p>22.9 lbs</p><p>Coverage varies by joint width.</p>"#,
        )
        .with_fetched(
            SECTION_SPECIFICATIONS,
            r#"<table><tr><th>Box Weight</th><td>22.9 lbs</td></tr></table>"#,
        );
    let fetcher = MockSectionFetcher::new().with_bundle(bundle);
    let pipeline = pipeline(fetcher, MockLinkChecker::new());

    let outcome = pipeline.run(url).await.unwrap();

    let weight_fields: Vec<_> = outcome
        .report
        .fields
        .keys()
        .filter(|k| k.contains("weight"))
        .collect();
    assert_eq!(weight_fields, vec!["box_weight"]);
    assert_eq!(outcome.record.core.box_weight_lbs, Some(22.9));
}

#[tokio::test]
async fn rerun_on_identical_content_is_byte_identical() {
    let url = "https://catalog.example/p/100456789";
    let fetcher = MockSectionFetcher::new().with_bundle(tile_bundle(url));
    let pipeline = pipeline(fetcher, MockLinkChecker::new());

    let first = pipeline.run(url).await.unwrap();
    let second = pipeline.run(url).await.unwrap();

    let a = serde_json::to_string(&first.record).unwrap();
    let b = serde_json::to_string(&second.record).unwrap();
    assert_eq!(a, b);
}

#[tokio::test]
async fn reextraction_replaces_rather_than_merges() {
    let url = "https://catalog.example/p/100456789";
    let fetcher = MockSectionFetcher::new().with_bundle(tile_bundle(url));
    let pipeline = Pipeline::new(fetcher.clone(), MemoryStore::new(), MockLinkChecker::new());

    let first = pipeline.run(url).await.unwrap();
    assert!(first.record.attributes.contains_key("shade_variation"));

    // the catalog page shrinks; the new record must carry no stale fields
    fetcher.add_bundle(PageSections::new(url).with_fetched(SECTION_MAIN, "<h1>Tile</h1>"));
    let second = pipeline.run(url).await.unwrap();

    assert!(!second.record.attributes.contains_key("shade_variation"));
    assert!(second.record.incomplete);
}

#[tokio::test]
async fn registry_registration_is_append_only_and_idempotent() {
    let url = "https://catalog.example/p/100456789";
    let fetcher = MockSectionFetcher::new().with_bundle(tile_bundle(url));
    let pipeline = pipeline(fetcher, MockLinkChecker::new());

    pipeline.run(url).await.unwrap();
    let registry = pipeline.registry();
    assert!(registry.is_registered("shade_variation"));

    let before = registry.names();
    pipeline.run(url).await.unwrap();
    assert_eq!(registry.names(), before);
}

#[tokio::test]
async fn only_verified_resources_attach() {
    let url = "https://catalog.example/p/100998877";
    let fetcher = MockSectionFetcher::new().with_bundle(grout_bundle(url));

    // only the safety sheet exists; data sheet and sell sheet do not
    let checker = MockLinkChecker::new()
        .with_existing("https://catalog.example/resources/sds/100998877.pdf");
    let pipeline = pipeline(fetcher, checker);

    let outcome = pipeline.run(url).await.unwrap();
    let resources = &outcome.record.resources;

    assert_eq!(resources.len(), 1);
    assert!(resources.iter().all(|r| r.verified));
    assert_eq!(
        resources[0].url,
        "https://catalog.example/resources/sds/100998877.pdf"
    );
}

#[tokio::test]
async fn cancelled_run_has_no_side_effects() {
    let url = "https://catalog.example/p/100456789";
    let fetcher = MockSectionFetcher::new().with_bundle(tile_bundle(url));
    let store = MemoryStore::new();
    let pipeline = Pipeline::new(fetcher, store, MockLinkChecker::new());

    let cancel = CancellationToken::new();
    cancel.cancel();

    let result = pipeline.run_with_cancel(url, &cancel).await;
    assert!(matches!(result, Err(ExtractionError::Cancelled)));
}

#[tokio::test]
async fn run_many_preserves_order_and_isolates_failures() {
    let tile_url = "https://catalog.example/p/100456789".to_string();
    let tool_url = "https://catalog.example/p/100777888".to_string();
    let missing_url = "https://catalog.example/p/missing".to_string();

    let fetcher = MockSectionFetcher::new()
        .with_bundle(tile_bundle(&tile_url))
        .with_bundle(
            PageSections::new(&tool_url).with_fetched(SECTION_MAIN, tool_main_markup()),
        );
    let store = MemoryStore::new();
    let pipeline = Pipeline::new(fetcher, store, MockLinkChecker::new());

    let urls = vec![tile_url.clone(), missing_url, tool_url.clone()];
    let results = pipeline.run_many(&urls).await;

    assert_eq!(results.len(), 3);
    let first = results[0].as_ref().unwrap();
    assert_eq!(first.record.family, Family::Tile);

    // the unknown URL still produced an (incomplete) record
    let middle = results[1].as_ref().unwrap();
    assert_eq!(middle.record.family, Family::Unknown);
    assert!(middle.record.incomplete);

    let last = results[2].as_ref().unwrap();
    assert_eq!(last.record.family, Family::InstallationTool);
    assert_eq!(last.record.prices.per_unit, Some(89.0));
}

#[tokio::test]
async fn records_are_retrievable_by_sku_and_url() {
    let url = "https://catalog.example/p/100456789";
    let fetcher = MockSectionFetcher::new().with_bundle(tile_bundle(url));
    let pipeline = pipeline(fetcher, MockLinkChecker::new());

    pipeline.run(url).await.unwrap();

    let by_url = pipeline.record_by_url(url).await.unwrap().unwrap();
    assert_eq!(by_url.sku.as_deref(), Some("100456789"));

    let by_sku = pipeline.record_by_sku("100456789").await.unwrap().unwrap();
    assert_eq!(by_sku.url, url);

    assert!(pipeline.record_by_sku("000").await.unwrap().is_none());
}

proptest! {
    #[test]
    fn canonical_key_collapses_spelling_variants(
        tokens in proptest::collection::vec("[a-z]{2,8}", 1..4)
    ) {
        let snake = tokens.join("_");
        let spaced = tokens.join(" ");
        let camel: String = tokens
            .iter()
            .enumerate()
            .map(|(i, t)| {
                if i == 0 {
                    t.clone()
                } else {
                    let mut chars = t.chars();
                    let head = chars.next().unwrap().to_uppercase().to_string();
                    format!("{head}{}", chars.as_str())
                }
            })
            .collect();

        let key = canonical_key(&snake);
        prop_assert_eq!(&canonical_key(&spaced), &key);
        prop_assert_eq!(&canonical_key(&camel), &key);
        prop_assert_eq!(&canonical_key(&snake.to_uppercase()), &key);
    }
}
