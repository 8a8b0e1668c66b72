use linguist_core::{I18nConfig, Translator, embedded};
use linguist_macro::include_catalogs;

// 路径相对于 CARGO_MANIFEST_DIR（linguist-macro）
include_catalogs!("tests/translations");

#[test]
fn test_catalogs_registered_before_main() {
    let stems = embedded::stems();
    assert!(stems.contains(&"viewer_zh_HK"));
    assert!(stems.contains(&"viewer_en"));
    assert!(embedded::get("viewer_zh_HK").unwrap().contains("取消"));
}

#[test]
fn test_switch_between_embedded_locales() {
    let translator = Translator::untranslated();

    translator
        .switch_locale(&I18nConfig::new("viewer", "zh_HK.UTF-8"))
        .unwrap();
    assert_eq!(translator.tr("MainWindow", "Cancel"), "取消");
    assert_eq!(translator.tr_disambiguated("MainWindow", "Open", "menu"), "打開圖片");
    assert_eq!(translator.tr("MainWindow", "Open"), "Open");
    assert_eq!(
        translator.tr_plural("ThumbnailWidget", "%n image(s)", "", 5),
        "5 張圖片"
    );

    translator.switch_locale(&I18nConfig::new("viewer", "en_GB")).unwrap();
    assert_eq!(
        translator.tr_plural("ThumbnailWidget", "%n image(s)", "", 1),
        "1 image"
    );
    assert_eq!(
        translator.tr_plural("ThumbnailWidget", "%n image(s)", "", 7),
        "7 images"
    );
    assert_eq!(translator.tr("MainWindow", "Cancel"), "Cancel");

    // 没有对应目录时退回原文
    assert!(translator.switch_locale(&I18nConfig::new("viewer", "fr")).is_err());
    assert_eq!(translator.tr("MainWindow", "Cancel"), "Cancel");
}
