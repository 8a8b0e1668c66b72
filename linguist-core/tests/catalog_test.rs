use std::fs;
use std::path::PathBuf;

use linguist_core::{Catalog, Error, LoadOptions, ParseError, Translation};

fn fixture() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests/data/deepin-image-viewer_zh_HK.ts")
}

fn load_fixture() -> Catalog {
    Catalog::load_file(fixture(), LoadOptions::default()).unwrap()
}

#[test]
fn test_load_image_viewer_catalog() {
    let catalog = load_fixture();
    assert_eq!(catalog.language(), Some("zh_HK"));
    assert_eq!(catalog.info().version.as_deref(), Some("2.1"));
    assert_eq!(catalog.contexts().len(), 27);
    assert_eq!(catalog.len(), 178);
    assert_eq!(catalog.translated_count(), 178);
}

#[test]
fn test_lookup_examples() {
    let catalog = load_fixture();
    assert_eq!(catalog.lookup("MainWindow", "Cancel"), "取消");
    assert_eq!(catalog.lookup("MainWindow", "NotPresent"), "NotPresent");
    assert_eq!(catalog.lookup("Application", "Image Viewer"), "看圖");
    assert_eq!(catalog.lookup("ScanPathsItem", "Cancel sync"), "取消同步");
    assert_eq!(catalog.lookup("CountingThread", "Images"), "張圖片");
    // 译文与原文相同的条目
    assert_eq!(catalog.lookup("ExtensionPanel", "Alt+Return"), "Alt+Return");
    assert_eq!(
        catalog.lookup("QObject", "yyyy/MM/dd HH:mm:dd"),
        "yyyy/MM/dd HH:mm:dd"
    );
    // 上下文决定查询结果
    assert_eq!(catalog.lookup("NoSuchContext", "Cancel"), "Cancel");
}

#[test]
fn test_every_entry_maps_to_its_translation() {
    let catalog = load_fixture();
    for context in catalog.contexts() {
        for message in &context.messages {
            let Translation::Text(expected) = &message.translation else {
                panic!("unexpected numerus message {:?}", message.source);
            };
            assert_eq!(
                catalog.lookup(&context.name, &message.source),
                expected,
                "context {} source {}",
                context.name,
                message.source
            );
        }
    }
}

#[test]
fn test_round_trip_yields_identical_mappings() {
    let catalog = load_fixture();
    let serialized = catalog.to_ts_string().unwrap();
    let reloaded = Catalog::load(serialized.as_bytes()).unwrap();

    assert_eq!(catalog.info(), reloaded.info());
    assert_eq!(catalog.contexts(), reloaded.contexts());
    for context in catalog.contexts() {
        for message in &context.messages {
            assert_eq!(
                catalog.lookup(&context.name, &message.source),
                reloaded.lookup(&context.name, &message.source)
            );
        }
    }
}

#[test]
fn test_malformed_input_fails() {
    let original = fs::read(fixture()).unwrap();

    // 截断
    let truncated = &original[..original.len() / 2];
    assert!(Catalog::load(truncated).is_err());

    // 标签不匹配
    let text = String::from_utf8(original.clone()).unwrap();
    let mismatched = text.replacen("</source>", "</sauce>", 1);
    assert!(matches!(
        Catalog::load(mismatched.as_bytes()),
        Err(ParseError::Xml { .. })
    ));

    // 非 UTF-8
    let mut invalid = original.clone();
    invalid.insert(200, 0xff);
    assert!(matches!(
        Catalog::load(&invalid),
        Err(ParseError::Encoding(_))
    ));
}

#[test]
fn test_load_file_reports_io_separately() {
    let missing = std::env::temp_dir().join("linguist_core_missing_catalog.ts");
    let err = Catalog::load_file(&missing, LoadOptions::default()).unwrap_err();
    assert!(matches!(err, Error::Io { .. }));
}

#[test]
fn test_bom_is_accepted() {
    let mut bytes = "\u{feff}".as_bytes().to_vec();
    bytes.extend(fs::read(fixture()).unwrap());
    let catalog = Catalog::load(&bytes).unwrap();
    assert_eq!(catalog.lookup("MainWindow", "Cancel"), "取消");
}
