use catalog_engine::*;

#[tokio::test]
async fn test_options_round_trip_through_json_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("catalog.json");

    let mut options = CatalogOptions {
        paper_size: PaperSize::Letter,
        orientation: Orientation::Landscape,
        columns: 4,
        rows: 2,
        group_by_category: false,
        fetch_timeout_ms: 3000,
        ..Default::default()
    };
    options.branding.subtitle = "Bike parts".to_string();

    options.save(&path).await.unwrap();
    let loaded = CatalogOptions::load(&path).await.unwrap();

    assert_eq!(loaded, options);
    assert!(loaded.validate().is_ok());
}

#[tokio::test]
async fn test_partial_json_uses_defaults() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("catalog.json");
    tokio::fs::write(&path, r#"{ "columns": 2, "branding": { "title": "LOJA" } }"#)
        .await
        .unwrap();

    let loaded = CatalogOptions::load(&path).await.unwrap();
    assert_eq!(loaded.columns, 2);
    assert_eq!(loaded.rows, 4);
    assert_eq!(loaded.items_per_page(), 8);
    assert_eq!(loaded.branding.title, "LOJA");
    assert_eq!(loaded.branding.footer, Branding::default().footer);
}

#[tokio::test]
async fn test_malformed_json_is_config_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("catalog.json");
    tokio::fs::write(&path, "{ not json").await.unwrap();

    let result = CatalogOptions::load(&path).await;
    assert!(matches!(result, Err(CatalogError::Config(_))));
}

#[test]
fn test_plan_config_follows_options() {
    let options = CatalogOptions {
        group_by_category: false,
        ..Default::default()
    };
    let config = options.plan_config();

    assert!(!config.group_by_category);
    assert_eq!(config.items_per_page, 12);
    assert_eq!(config.order, ItemOrder::ByName);
    assert_eq!(config.index_entries_per_page, 24);
}

#[test]
fn test_a4_grid_geometry() {
    let grid = CatalogOptions::default().grid().unwrap();
    assert_eq!(grid.capacity(), 12);
    assert!((grid.cell_width - 62.0).abs() < 1e-3);
    assert!((grid.cell_height - 61.0).abs() < 1e-3);
}
