use sheet_layout::{SheetError, SheetOptions};

#[test]
fn test_default_options_are_canonical() {
    let options = SheetOptions::default();
    assert_eq!(options.dpi, 300);
    assert_eq!(options.page_width_in, 19.0);
    assert_eq!(options.page_height_in, 13.0);
    assert_eq!(options.cell_width_cm, 6.35);
    assert_eq!(options.cell_height_cm, 8.8);
    assert_eq!(options.spacing_mm, 0.4);
    assert_eq!(options.columns_per_page, 7);
    assert_eq!(options.rows_per_page, 3);
    assert!(!options.allow_upscale);
    options.validate().unwrap();
}

#[test]
fn test_validate_rejects_bad_values() {
    let bad = SheetOptions {
        spacing_mm: -0.5,
        ..Default::default()
    };
    assert!(matches!(bad.validate(), Err(SheetError::Config(_))));

    let bad = SheetOptions {
        dpi: 0,
        ..Default::default()
    };
    assert!(matches!(bad.validate(), Err(SheetError::Config(_))));
}

#[cfg(feature = "serde")]
#[tokio::test]
async fn test_options_json_round_trip() {
    use tempfile::NamedTempFile;

    let options = SheetOptions {
        dpi: 150,
        columns_per_page: 4,
        rows_per_page: 2,
        allow_upscale: true,
        ..Default::default()
    };

    let temp = NamedTempFile::new().unwrap();
    options.save(temp.path()).await.unwrap();
    let loaded = SheetOptions::load(temp.path()).await.unwrap();
    assert_eq!(loaded, options);
}

#[cfg(feature = "serde")]
#[tokio::test]
async fn test_load_rejects_malformed_json() {
    use tempfile::NamedTempFile;

    let temp = NamedTempFile::new().unwrap();
    std::fs::write(temp.path(), b"{ not json").unwrap();
    let err = SheetOptions::load(temp.path()).await.unwrap_err();
    assert!(matches!(err, SheetError::Config(_)));
}
