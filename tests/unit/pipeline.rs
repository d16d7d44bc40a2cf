use std::path::PathBuf;

use super::*;
use crate::assets::backgrounds::Background;
use crate::media::frames::VideoSourceInfo;
use crate::scene::model::StyleClass;

/// Paints a 1x1 pixel whose red channel is the length of the first nickname on the page.
struct StubRasterizer;

impl Rasterizer for StubRasterizer {
    fn rasterize(&self, scene: &Scene, _background: &Background) -> CardResult<RasterImage> {
        let first = scene
            .text_runs()
            .into_iter()
            .find(|r| r.class == StyleClass::Nickname)
            .map(|r| r.raw_text())
            .unwrap_or_default();
        if first == "@boom" {
            return Err(CardError::decode("stub refused page"));
        }
        RasterImage::from_rgba8(1, 1, vec![first.len() as u8, 0, 0, 255], true)
    }
}

struct StubFrames {
    info: VideoSourceInfo,
    fail_at: Option<f64>,
}

impl StubFrames {
    fn new(duration_sec: f64, fail_at: Option<f64>) -> Self {
        Self {
            info: VideoSourceInfo {
                source_path: PathBuf::from("stub.mp4"),
                width: 16,
                height: 9,
                duration_sec,
            },
            fail_at,
        }
    }
}

impl VideoFrameSource for StubFrames {
    fn info(&self) -> &VideoSourceInfo {
        &self.info
    }

    fn capture_frame(&self, timestamp_sec: f64) -> CardResult<RasterImage> {
        if self.fail_at == Some(timestamp_sec) {
            return Err(CardError::seek("stub seek failure"));
        }
        RasterImage::from_rgba8(1, 1, vec![timestamp_sec as u8, 0, 0, 255], false)
    }
}

fn comment_json(author: &str, text: &str) -> serde_json::Value {
    serde_json::json!({ "author": author, "text": text })
}

/// One oversized comment by `big` alone on page 1, then `small` on page 2.
fn two_page_thread(big: &str, small: &[&str]) -> String {
    let mut items = vec![comment_json(big, &"x".repeat(3500))];
    items.extend(small.iter().map(|a| comment_json(a, "short")));
    serde_json::Value::Array(items).to_string()
}

fn opts(parallel: bool) -> CardOpts {
    CardOpts {
        threading: Threading {
            parallel,
            threads: Some(2),
        },
        ..CardOpts::default()
    }
}

#[test]
fn empty_thread_is_rejected() {
    for input in ["[]", "{}", r#"{"comments":[]}"#] {
        let err = prepare_pages(input, &LayoutParams::DEFAULT).unwrap_err();
        assert!(matches!(err, CardError::InvalidArgument(_)), "{input}: {err}");
    }
    let err = prepare_pages("hello", &LayoutParams::DEFAULT).unwrap_err();
    assert!(matches!(err, CardError::Parse(_)));
}

#[test]
fn pages_and_scenes_line_up() {
    let json = two_page_thread("big", &["a", "b", "c"]);
    let pages = prepare_pages(&json, &LayoutParams::DEFAULT).unwrap();
    assert_eq!(pages.iter().map(Page::len).collect::<Vec<_>>(), vec![1, 3]);
    let scenes = render_scenes(&pages, &SceneOpts::default());
    assert_eq!(scenes.len(), 2);
}

#[test]
fn cards_come_back_in_page_order() {
    for parallel in [false, true] {
        let json = two_page_thread("bigger", &["a", "b", "c"]);
        let batch = generate_cards(&json, &StubRasterizer, &opts(parallel)).unwrap();

        assert_eq!(batch.title, "Comment cards (2 images)");
        assert!(batch.failures.is_empty());
        let captions: Vec<_> = batch.images.iter().map(|n| n.caption.as_str()).collect();
        assert_eq!(
            captions,
            vec!["Comment card 1 (1 comments)", "Comment card 2 (3 comments)"]
        );
        assert_eq!(batch.images[0].image.pixel(0, 0).unwrap()[0], 7);
        assert_eq!(batch.images[1].image.pixel(0, 0).unwrap()[0], 2);
        assert!(batch.images.iter().all(|n| n.group == ImageGroup::CommentCard));
    }
}

#[test]
fn one_failing_page_does_not_sink_the_batch() {
    let json = two_page_thread("ok", &["boom"]);
    let batch = generate_cards(&json, &StubRasterizer, &opts(true)).unwrap();
    assert_eq!(batch.images.len(), 1);
    assert_eq!(batch.title, "Comment cards (1 images)");
    assert_eq!(batch.failures.len(), 1);
    let failure = &batch.failures[0];
    assert_eq!(failure.index, 1);
    assert!(matches!(failure.error, CardError::Decode(_)));
    assert_eq!(
        failure.to_string(),
        "comment card 2: decode error: stub refused page"
    );
}

#[test]
fn all_failing_pages_aggregate() {
    let json = serde_json::Value::Array(vec![comment_json("boom", "x")]).to_string();
    let err = generate_cards(&json, &StubRasterizer, &opts(false)).unwrap_err();
    let CardError::Batch(msg) = err else {
        panic!("expected batch error, got {err}");
    };
    assert!(msg.contains("comment card 1"));
}

#[test]
fn bad_thread_count_is_rejected() {
    let json = two_page_thread("a", &["b"]);
    let mut o = opts(true);
    o.threading.threads = Some(0);
    let err = generate_cards(&json, &StubRasterizer, &o).unwrap_err();
    assert!(matches!(err, CardError::InvalidArgument(_)));
}

#[test]
fn screenshots_follow_timestamp_order() {
    let source = StubFrames::new(40.0, None);
    let batch = capture_screenshots(
        &source,
        &ScreenshotOpts {
            count: 3,
            ..ScreenshotOpts::default()
        },
    )
    .unwrap();
    let reds: Vec<u8> = batch
        .images
        .iter()
        .map(|n| n.image.pixel(0, 0).unwrap()[0])
        .collect();
    assert_eq!(reds, vec![10, 20, 30]);
    assert_eq!(batch.images[2].caption, "Video frame 3");
    assert!(batch.images.iter().all(|n| n.group == ImageGroup::VideoFrame));
}

#[test]
fn failed_frame_is_reported_by_position() {
    let source = StubFrames::new(40.0, Some(20.0));
    let batch = capture_screenshots(
        &source,
        &ScreenshotOpts {
            count: 3,
            ..ScreenshotOpts::default()
        },
    )
    .unwrap();
    assert_eq!(batch.images.len(), 2);
    assert_eq!(batch.failures[0].label, "video frame 2");
    assert!(matches!(batch.failures[0].error, CardError::Seek(_)));
}

#[test]
fn zero_screenshots_is_an_empty_batch() {
    let source = StubFrames::new(40.0, None);
    let batch = capture_screenshots(&source, &ScreenshotOpts::default()).unwrap();
    assert!(batch.images.is_empty());
    assert!(batch.failures.is_empty());
}
