use super::*;

fn tmp_dir(tag: &str) -> PathBuf {
    std::env::temp_dir().join(format!("threadcards_archive_{tag}_{}", std::process::id()))
}

fn pixel(rgba: [u8; 4], group: ImageGroup, caption: &str) -> NamedImage {
    NamedImage {
        caption: caption.to_owned(),
        group,
        image: RasterImage::from_rgba8(1, 1, rgba.to_vec(), true).unwrap(),
    }
}

#[test]
fn captions_are_one_based() {
    assert_eq!(comment_card_caption(0, 4), "Comment card 1 (4 comments)");
    assert_eq!(video_frame_caption(2), "Video frame 3");
    assert_eq!(comment_batch_title(7), "Comment cards (7 images)");
    assert_eq!(image_file_name(0), "image_1.png");
}

#[test]
fn batch_writes_images_and_manifest_in_order() {
    let dir = tmp_dir("order");
    let images = vec![
        pixel([255, 0, 0, 255], ImageGroup::CommentCard, "Comment card 1 (2 comments)"),
        pixel([0, 255, 0, 255], ImageGroup::VideoFrame, "Video frame 1"),
    ];
    let paths = write_batch(&dir, "mixed", &images).unwrap();
    assert_eq!(paths, vec![dir.join("image_1.png"), dir.join("image_2.png")]);
    assert!(paths.iter().all(|p| p.is_file()));

    let manifest: Manifest =
        serde_json::from_slice(&std::fs::read(dir.join("manifest.json")).unwrap()).unwrap();
    assert_eq!(manifest.title, "mixed");
    assert_eq!(
        manifest.images,
        vec![
            ManifestEntry {
                file: "image_1.png".into(),
                caption: "Comment card 1 (2 comments)".into(),
                group: ImageGroup::CommentCard,
            },
            ManifestEntry {
                file: "image_2.png".into(),
                caption: "Video frame 1".into(),
                group: ImageGroup::VideoFrame,
            },
        ]
    );

    let _ = std::fs::remove_dir_all(&dir);
}

#[test]
fn group_serializes_snake_case() {
    assert_eq!(
        serde_json::to_string(&ImageGroup::VideoFrame).unwrap(),
        "\"video_frame\""
    );
}
