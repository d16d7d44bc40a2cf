use super::*;

#[test]
fn gradient_svg_runs_corner_to_corner() {
    let svg = PALETTE[0].to_svg(Canvas::SQUARE_1080);
    assert!(svg.contains(r#"x1="0%" y1="0%" x2="100%" y2="100%""#));
    assert!(svg.contains(r##"stop-color="#fff1f2""##));
    assert!(svg.contains(r##"stop-color="#ffe4e6""##));
    assert!(svg.contains(r#"width="1080" height="1080""#));
}

#[test]
fn solid_svg_uses_flat_fill() {
    let svg = PALETTE[3].to_svg(Canvas::SQUARE_1080);
    assert!(svg.contains(r##"fill="#fffbeb""##));
    assert!(!svg.contains("linearGradient"));
}

#[test]
fn random_choice_is_deterministic_per_page() {
    let a = BackgroundPlan::resolve(&BackgroundChoice::Random, Canvas::SQUARE_1080, 7).unwrap();
    let b = BackgroundPlan::resolve(&BackgroundChoice::Random, Canvas::SQUARE_1080, 7).unwrap();
    for page in 0..16 {
        assert_eq!(a.for_page(page), b.for_page(page));
    }
}

#[test]
fn random_choice_draws_from_the_palette() {
    let plan = BackgroundPlan::resolve(&BackgroundChoice::Random, Canvas::SQUARE_1080, 1).unwrap();
    let known: Vec<String> = PALETTE
        .iter()
        .map(|b| b.to_svg(Canvas::SQUARE_1080))
        .collect();
    for page in 0..32 {
        let Background::Svg(svg) = plan.for_page(page) else {
            panic!("palette backgrounds are svg");
        };
        assert!(known.iter().any(|k| k.as_str() == &*svg));
    }
}

#[test]
fn fixed_choice_validates_index() {
    let err = BackgroundPlan::resolve(
        &BackgroundChoice::Fixed { index: 5 },
        Canvas::SQUARE_1080,
        0,
    )
    .unwrap_err();
    assert!(matches!(err, CardError::InvalidArgument(_)));

    let plan = BackgroundPlan::resolve(
        &BackgroundChoice::Fixed { index: 4 },
        Canvas::SQUARE_1080,
        0,
    )
    .unwrap();
    assert_eq!(plan.for_page(0), plan.for_page(9));
}

#[test]
fn solid_choice_passes_color_through() {
    let plan = BackgroundPlan::resolve(
        &BackgroundChoice::Solid {
            rgba: [1, 2, 3, 255],
        },
        Canvas::SQUARE_1080,
        0,
    )
    .unwrap();
    assert_eq!(plan.for_page(3), Background::Solid([1, 2, 3, 255]));
}

#[test]
fn missing_file_is_a_resource_error() {
    let err = BackgroundPlan::resolve(
        &BackgroundChoice::File {
            path: PathBuf::from("/definitely/not/here.png"),
        },
        Canvas::SQUARE_1080,
        0,
    )
    .unwrap_err();
    assert!(matches!(err, CardError::ResourceLoad(_)));
}

#[test]
fn choice_parses_from_tagged_json() {
    let c: BackgroundChoice = serde_json::from_str(r#"{"mode":"fixed","index":2}"#).unwrap();
    assert_eq!(c, BackgroundChoice::Fixed { index: 2 });
    let c: BackgroundChoice = serde_json::from_str(r#"{"mode":"random"}"#).unwrap();
    assert_eq!(c, BackgroundChoice::Random);
}
