//! End-to-end pipeline tests: registry -> aggregator -> table engine ->
//! export, over an in-memory blob store.

use hydroview::data::{columns, FileKind, MemoryBlobStore, ParsedUpload, Row};
use hydroview::{Aggregator, ExportAdapter, FileRegistry, QueryState, TableEngine};

fn loss_upload() -> ParsedUpload {
    ParsedUpload {
        name: "perdas_marco.csv".into(),
        kind: FileKind::NegativeLoss,
        rows: vec![Row::from_pairs([
            ("Municipios", "A"),
            ("Perda", "-10,00"),
            ("VD", "100,00"),
            ("Diretoria", "D1"),
        ])],
    }
}

#[test]
fn negative_loss_file_drives_the_dashboard() {
    let mut registry = FileRegistry::load(MemoryBlobStore::default()).unwrap();
    registry.ingest(loss_upload()).unwrap();

    let metrics = Aggregator::aggregate(registry.files());
    assert_eq!(metrics.total_negative_loss, -10.0);
    assert_eq!(metrics.total_distributed_volume, 100.0);
    assert_eq!(metrics.average_loss_index_pct, "-10.00%");
    assert_eq!(metrics.municipality_count, 1);
    assert!(metrics.directorates_with_issues.contains("D1"));
    assert_eq!(metrics.loss_time_series.len(), 1);
    assert_eq!(metrics.loss_time_series[0].total_loss, -10.0);
}

#[test]
fn deviation_report_surfaces_only_negative_rows_most_negative_first() {
    let mut registry = FileRegistry::load(MemoryBlobStore::default()).unwrap();
    registry
        .ingest(ParsedUpload {
            name: "desvios.csv".into(),
            kind: FileKind::DeviationReport,
            rows: vec![
                Row::from_pairs([("Localidade", "L1"), ("IPDDesvio", "-5,00")]),
                Row::from_pairs([("Localidade", "L2"), ("IPDDesvio", "-20,00")]),
                Row::from_pairs([("Localidade", "L3"), ("IPDDesvio", "3,00")]),
            ],
        })
        .unwrap();

    let metrics = Aggregator::aggregate(registry.files());
    let deviations: Vec<_> = metrics
        .top_deviations
        .iter()
        .map(|e| (e.locality.as_str(), e.deviation.as_str()))
        .collect();
    assert_eq!(deviations, vec![("L2", "-20,00"), ("L1", "-5,00")]);
}

#[test]
fn detail_view_pages_through_an_ingested_report() {
    let mut registry = FileRegistry::load(MemoryBlobStore::default()).unwrap();
    let rows: Vec<Row> = (0..120)
        .map(|i| {
            Row::from_pairs([
                ("Municipios", format!("M{i:03}")),
                ("Perda", format!("{i},00")),
            ])
        })
        .collect();
    let id = registry
        .ingest(ParsedUpload {
            name: "grande.csv".into(),
            kind: FileKind::NegativeLoss,
            rows,
        })
        .unwrap()
        .id
        .clone();

    let file = registry.get(&id).unwrap();
    let mut state = QueryState::default();
    assert_eq!(state.page_size, 50);

    let first = TableEngine::query(&file.rows, &state);
    assert_eq!(first.total_pages, 3);
    assert_eq!(first.rows.len(), 50);

    state.page = 3;
    let last = TableEngine::query(&file.rows, &state);
    assert_eq!(last.rows.len(), 20);
    assert_eq!(last.rows[0].1.get(columns::MUNICIPALITY), Some("M100"));
}

#[test]
fn exports_cover_the_full_row_set_not_the_visible_page() {
    let mut registry = FileRegistry::load(MemoryBlobStore::default()).unwrap();
    let rows: Vec<Row> = (0..75)
        .map(|i| Row::from_pairs([("Municipios", format!("M{i}")), ("Perda", "0,00".into())]))
        .collect();
    let id = registry
        .ingest(ParsedUpload {
            name: "grande.csv".into(),
            kind: FileKind::NegativeLoss,
            rows,
        })
        .unwrap()
        .id
        .clone();

    let file = registry.get(&id);
    let csv_bytes = ExportAdapter::export_csv(file).unwrap().unwrap();
    let text = String::from_utf8(csv_bytes).unwrap();
    // Header plus all 75 rows, even though a default page shows only 50.
    assert_eq!(text.lines().count(), 76);

    let pdf_bytes = ExportAdapter::export_pdf(file).unwrap().unwrap();
    assert!(pdf_bytes.starts_with(b"%PDF"));
}

#[test]
fn registry_snapshot_survives_a_reload() {
    use hydroview::data::BlobStore;

    let mut registry = FileRegistry::load(MemoryBlobStore::default()).unwrap();
    registry.ingest(loss_upload()).unwrap();
    let blob = serde_json::to_vec(registry.files()).unwrap();

    // A new session over the same persisted blob.
    let store = MemoryBlobStore::default();
    store.save(&blob).unwrap();
    let reloaded = FileRegistry::load(store).unwrap();

    assert_eq!(reloaded.len(), 1);
    let metrics = Aggregator::aggregate(reloaded.files());
    assert_eq!(metrics.average_loss_index_pct, "-10.00%");
}
