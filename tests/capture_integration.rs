use page_tags::{DecorationEngine, LaunchOptions, PageCapture, TagMeta, locator};

const PAGE: &str = "data:text/html,<html><head><script>var x = 1;</script></head><body><div id='intro'><p>Hello <b>bold</b> world</p></div><p>Second</p></body></html>";

#[test]
#[ignore] // Requires Chrome to be installed
fn test_capture_builds_page_model() {
    let capture = PageCapture::launch(LaunchOptions::new().headless(true).settle_ms(200))
        .expect("Failed to launch browser");

    let doc = capture.capture(PAGE).expect("Failed to capture page");

    let body = doc.body().expect("No body");
    assert_eq!(doc.text_content(body), "Hello bold worldSecond");
    // Scripts are dropped from the snapshot
    assert!(!doc.to_html().contains("var x"));
}

#[test]
#[ignore]
fn test_captured_page_round_trips_locators() {
    let capture = PageCapture::launch(LaunchOptions::new().headless(true).settle_ms(200))
        .expect("Failed to launch browser");
    let doc = capture.capture(PAGE).expect("Failed to capture page");

    for node in doc.descendants(doc.document_element()) {
        let path = locator::locate(&doc, node).expect("Failed to locate").to_string();
        assert_eq!(locator::resolve(&doc, &path), Some(node), "round trip failed for {}", path);
    }
}

#[test]
#[ignore]
fn test_highlight_on_captured_page() {
    let capture = PageCapture::launch(LaunchOptions::new().headless(true).settle_ms(200))
        .expect("Failed to launch browser");
    let mut doc = capture.capture(PAGE).expect("Failed to capture page");
    let mut engine = DecorationEngine::new();

    let outcome = engine
        .apply_highlight(&mut doc, r#"//DIV[@id="intro"]/P[1]/text()[1]"#, 0, Some(5), TagMeta::new())
        .expect("Highlight failed");

    let wrapper = outcome.applied().expect("Nothing applied");
    assert_eq!(doc.text_content(wrapper), "Hello");
}
