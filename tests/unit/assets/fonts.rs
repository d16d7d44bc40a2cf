use super::*;

#[test]
fn database_is_built_once() {
    let lib = FontLibrary::isolated(Vec::new());
    assert!(!lib.is_loaded());
    let a = lib.acquire();
    assert!(lib.is_loaded());
    let b = lib.acquire();
    assert!(Arc::ptr_eq(&a, &b));
}

#[test]
fn isolated_library_without_dirs_is_empty() {
    let lib = FontLibrary::isolated(Vec::new());
    assert_eq!(lib.acquire().len(), 0);
}

#[test]
fn missing_font_dir_is_tolerated() {
    let lib = FontLibrary::isolated(vec![PathBuf::from("/no/such/font/dir")]);
    assert_eq!(lib.acquire().len(), 0);
}

#[test]
fn options_share_the_database() {
    let lib = FontLibrary::isolated(Vec::new());
    let opts = lib.usvg_options();
    assert!(Arc::ptr_eq(&opts.fontdb, &lib.acquire()));
}
