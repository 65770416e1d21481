use album_layout::*;

#[test]
fn test_default_config_is_valid() {
    assert!(LayoutConfig::default().validate().is_ok());
}

#[test]
fn test_validation_margins_leave_no_room() {
    let config = LayoutConfig {
        margins: PageMargins::uniform(11.0),
        ..Default::default()
    };
    match config.validate() {
        Err(LayoutError::Config(msg)) => assert!(msg.contains("no usable area")),
        _ => panic!("Expected Config error"),
    }
}

#[test]
fn test_validation_negative_margin() {
    let mut config = LayoutConfig::default();
    config.margins.left_cm = -1.0;
    assert!(matches!(config.validate(), Err(LayoutError::Config(_))));
}

#[test]
fn test_validation_grid_fractions() {
    let mut config = LayoutConfig::default();

    config.grid_width_fraction = 1.0;
    assert!(config.validate().is_ok());

    config.grid_width_fraction = 0.0;
    assert!(config.validate().is_err());

    config.grid_width_fraction = 1.5;
    assert!(config.validate().is_err());

    config.grid_width_fraction = f32::NAN;
    assert!(config.validate().is_err());
}

#[test]
fn test_validation_thresholds() {
    let config = LayoutConfig {
        tall_ratio: 0.0,
        ..Default::default()
    };
    assert!(config.validate().is_err());

    let config = LayoutConfig {
        default_dpi: -96.0,
        ..Default::default()
    };
    assert!(config.validate().is_err());

    let config = LayoutConfig {
        image_gap_cm: 9.0,
        ..Default::default()
    };
    match config.validate() {
        Err(LayoutError::Config(msg)) => assert!(msg.contains("four-image")),
        _ => panic!("Expected Config error"),
    }
}

#[test]
fn test_custom_paper_size() {
    let config = LayoutConfig {
        paper_size: PaperSize::Custom {
            width_cm: 15.0,
            height_cm: 20.0,
        },
        margins: PageMargins::uniform(1.0),
        heading_reserve_cm: 2.0,
        ..Default::default()
    };
    assert!(config.validate().is_ok());
    assert!((config.usable_width_cm() - 13.0).abs() < 1e-4);
    assert!((config.usable_height_cm() - 16.0).abs() < 1e-4);
}

#[tokio::test]
async fn test_save_and_load_config() {
    use tempfile::NamedTempFile;

    let config = LayoutConfig {
        paper_size: PaperSize::Letter,
        orientation: Orientation::Landscape,
        margins: PageMargins::uniform(1.5),
        min_image_width_cm: 5.0,
        ..Default::default()
    };

    let temp_file = NamedTempFile::new().unwrap();
    let path = temp_file.path();

    config.save(path).await.unwrap();
    let loaded = LayoutConfig::load(path).await.unwrap();

    assert_eq!(loaded, config);
}

#[tokio::test]
async fn test_load_partial_config_fills_defaults() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("layout.json");
    tokio::fs::write(&path, r#"{ "tall_ratio": 1.5 }"#)
        .await
        .unwrap();

    let loaded = LayoutConfig::load(&path).await.unwrap();
    assert_eq!(loaded.tall_ratio, 1.5);
    assert_eq!(loaded.paper_size, PaperSize::A4);
    assert_eq!(loaded.margins, PageMargins::uniform(2.5));
}

#[tokio::test]
async fn test_load_rejects_invalid_config() {
    let dir = tempfile::tempdir().unwrap();

    let garbage = dir.path().join("garbage.json");
    tokio::fs::write(&garbage, "not json").await.unwrap();
    match LayoutConfig::load(&garbage).await {
        Err(LayoutError::Config(msg)) => assert!(msg.contains("parse")),
        _ => panic!("Expected Config error"),
    }

    let invalid = dir.path().join("invalid.json");
    tokio::fs::write(&invalid, r#"{ "grid_height_fraction": 2.0 }"#)
        .await
        .unwrap();
    assert!(LayoutConfig::load(&invalid).await.is_err());

    let missing = dir.path().join("missing.json");
    assert!(matches!(
        LayoutConfig::load(&missing).await,
        Err(LayoutError::Io(_))
    ));
}
