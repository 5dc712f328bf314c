use crate::{export, ExportFormat};
use easel_editor::ElementOverride;
use easel_parser::parse;

const PAGE_MARKUP: &str = "<style>.card { padding: 16px; }</style>\
    <div class=\"card\"><h2>Title</h2><p class=\"body\">Original copy</p></div>\
    <script>console.log('ready');</script>";

#[test]
fn test_separate_round_trip_with_no_overrides() {
    let baseline = parse(PAGE_MARKUP).unwrap();
    let result = export(&baseline, &[], ExportFormat::Separate).unwrap();

    assert_eq!(result.css.as_deref(), Some(baseline.styles.as_str()));
    assert_eq!(result.js.as_deref(), Some(baseline.scripts.as_str()));

    // No document wrapper, baseline structure preserved
    assert!(!result.html.contains("<!DOCTYPE"));
    assert!(result.html.contains("<div class=\"card\">"));
    assert!(result.html.contains("</div>"));
    assert!(result.html.contains("Original copy"));
}

#[test]
fn test_single_embeds_styles_and_scripts() {
    let baseline = parse(PAGE_MARKUP).unwrap();
    let result = export(&baseline, &[], ExportFormat::Single).unwrap();

    assert!(result.css.is_none());
    assert!(result.js.is_none());

    assert!(result.html.contains("<!DOCTYPE html>"));
    assert!(result.html.contains("<meta charset=\"UTF-8\">"));
    assert!(result.html.contains(&baseline.styles));
    assert!(result.html.contains(&baseline.scripts));

    // Root open/close pair from the baseline tree
    assert!(result.html.contains("<body>"));
    assert!(result.html.contains("</body>"));
}

#[test]
fn test_overrides_are_applied_before_assembly() {
    let baseline = parse(PAGE_MARKUP).unwrap();
    let history = vec![
        ElementOverride::new(".body", 1).with_text("Edited copy"),
        ElementOverride::new(".card", 2).with_style("background", "#eee"),
    ];

    for format in [ExportFormat::Separate, ExportFormat::Single] {
        let result = export(&baseline, &history, format).unwrap();
        assert!(result.html.contains("Edited copy"));
        assert!(!result.html.contains("Original copy"));
        assert!(result.html.contains("background: #eee;"));
    }
}

#[test]
fn test_empty_styles_and_scripts_omit_blocks() {
    let baseline = parse("<div>bare</div>").unwrap();
    let result = export(&baseline, &[], ExportFormat::Single).unwrap();

    assert!(!result.html.contains("<style>"));
    assert!(!result.html.contains("<script>"));
    assert!(result.html.contains("<div>bare</div>"));
}

#[test]
fn test_export_format_serde_names() {
    assert_eq!(
        serde_json::to_string(&ExportFormat::Single).unwrap(),
        "\"single\""
    );
    assert_eq!(
        serde_json::to_string(&ExportFormat::Separate).unwrap(),
        "\"separate\""
    );
}
