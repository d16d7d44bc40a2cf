use super::*;

#[test]
fn empty_object_gives_defaults() {
    let cfg = ThreadcardsConfig::from_json_str("{}").unwrap();
    assert_eq!(cfg, ThreadcardsConfig::default());
    assert_eq!(cfg.seed, 0x5EED);
    assert_eq!(cfg.screenshots.count, 5);
    assert_eq!(cfg.slideshow.comment_duration_sec, 5.0);
    assert_eq!(cfg.slideshow.screenshot_duration_sec, 3.0);
    assert_eq!(cfg.slideshow.fps, 30);
    assert!(cfg.parallel);
}

#[test]
fn fields_are_read() {
    let cfg = ThreadcardsConfig::from_json_str(
        r#"{
            "escape": "legacy",
            "background": {"mode": "solid", "rgba": [1, 2, 3, 255]},
            "seed": 9,
            "parallel": false,
            "threads": 3,
            "font_dirs": ["fonts"],
            "screenshots": {"mode": "random", "count": 2},
            "slideshow": {"comment_duration_sec": 4.0}
        }"#,
    )
    .unwrap();
    assert_eq!(cfg.escape, EscapeMode::Legacy);
    assert_eq!(cfg.background, BackgroundChoice::Solid { rgba: [1, 2, 3, 255] });
    assert_eq!(cfg.font_dirs, vec![PathBuf::from("fonts")]);
    assert_eq!(cfg.slideshow.comment_duration_sec, 4.0);
    assert_eq!(cfg.slideshow.fps, 30);

    let card = cfg.card_opts();
    assert_eq!(card.scene.escape, EscapeMode::Legacy);
    assert_eq!(card.seed, 9);
    assert_eq!(
        card.threading,
        Threading {
            parallel: false,
            threads: Some(3)
        }
    );
    let shots = cfg.screenshot_opts();
    assert_eq!(shots.mode, TimestampMode::Random);
    assert_eq!(shots.count, 2);
}

#[test]
fn unknown_fields_are_rejected() {
    let err = ThreadcardsConfig::from_json_str(r#"{"colour": "red"}"#).unwrap_err();
    assert!(matches!(err, CardError::InvalidArgument(_)));
    let err =
        ThreadcardsConfig::from_json_str(r#"{"slideshow": {"transition": "fade"}}"#).unwrap_err();
    assert!(matches!(err, CardError::InvalidArgument(_)));
}

#[test]
fn invalid_values_are_rejected() {
    for text in [
        r#"{"threads": 0}"#,
        r#"{"background": {"mode": "fixed", "index": 9}}"#,
        r#"{"slideshow": {"fps": 0}}"#,
        r#"{"slideshow": {"screenshot_duration_sec": -1.0}}"#,
    ] {
        let err = ThreadcardsConfig::from_json_str(text).unwrap_err();
        assert!(matches!(err, CardError::InvalidArgument(_)), "{text}");
    }
}

#[test]
fn missing_file_is_a_resource_error() {
    let err = ThreadcardsConfig::from_path(Path::new("/no/such/threadcards.json")).unwrap_err();
    assert!(matches!(err, CardError::ResourceLoad(_)));
}
