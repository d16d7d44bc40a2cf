use std::path::{Path, PathBuf};
use std::sync::{Arc, OnceLock};

/// Lazily-built font database shared by every SVG parse.
///
/// Loading system fonts is the most expensive step of rasterizing a card, so the database is
/// built on first [`acquire`](Self::acquire) and reused afterwards.
#[derive(Debug, Default)]
pub struct FontLibrary {
    font_dirs: Vec<PathBuf>,
    skip_system_fonts: bool,
    db: OnceLock<Arc<usvg::fontdb::Database>>,
}

impl FontLibrary {
    /// Library that loads system fonts plus every `.ttf`/`.otf`/`.ttc` in `font_dirs`.
    pub fn new(font_dirs: Vec<PathBuf>) -> Self {
        Self {
            font_dirs,
            skip_system_fonts: false,
            db: OnceLock::new(),
        }
    }

    /// Library restricted to `font_dirs`, ignoring installed system fonts.
    pub fn isolated(font_dirs: Vec<PathBuf>) -> Self {
        Self {
            font_dirs,
            skip_system_fonts: true,
            db: OnceLock::new(),
        }
    }

    /// Whether the database has been built yet.
    pub fn is_loaded(&self) -> bool {
        self.db.get().is_some()
    }

    /// The font database, built on first call.
    pub fn acquire(&self) -> Arc<usvg::fontdb::Database> {
        self.db
            .get_or_init(|| {
                let mut db = usvg::fontdb::Database::new();
                if !self.skip_system_fonts {
                    db.load_system_fonts();
                }
                for dir in &self.font_dirs {
                    load_fonts_from_dir(&mut db, dir);
                }
                tracing::debug!(faces = db.len(), dirs = self.font_dirs.len(), "font database ready");
                Arc::new(db)
            })
            .clone()
    }

    /// `usvg` options wired to this library's database and family fallback.
    pub fn usvg_options(&self) -> usvg::Options<'static> {
        usvg::Options {
            fontdb: self.acquire(),
            font_resolver: make_font_resolver(),
            ..Default::default()
        }
    }
}

/// Process-wide library with system fonts only.
pub fn shared_fonts() -> Arc<FontLibrary> {
    static SHARED: OnceLock<Arc<FontLibrary>> = OnceLock::new();
    SHARED
        .get_or_init(|| Arc::new(FontLibrary::new(Vec::new())))
        .clone()
}

fn load_fonts_from_dir(db: &mut usvg::fontdb::Database, dir: &Path) {
    let Ok(rd) = std::fs::read_dir(dir) else {
        tracing::warn!(dir = %dir.display(), "font directory not readable");
        return;
    };

    for entry in rd.flatten() {
        let path = entry.path();
        if !path.is_file() {
            continue;
        }
        let Some(ext) = path.extension().and_then(|s| s.to_str()) else {
            continue;
        };
        let ext = ext.to_ascii_lowercase();
        if ext != "ttf" && ext != "otf" && ext != "ttc" {
            continue;
        }
        if let Err(e) = db.load_font_file(&path) {
            tracing::warn!(path = %path.display(), error = %e, "skipping unreadable font");
        }
    }
}

// Requested families first, then generic ones, then the first face in the database.
fn make_font_resolver() -> usvg::FontResolver<'static> {
    use usvg::FontResolver;

    FontResolver {
        select_font: Box::new(|font, fontdb| {
            let mut families = Vec::<usvg::fontdb::Family<'_>>::new();
            for family in font.families() {
                families.push(match family {
                    usvg::FontFamily::Serif => usvg::fontdb::Family::Serif,
                    usvg::FontFamily::SansSerif => usvg::fontdb::Family::SansSerif,
                    usvg::FontFamily::Cursive => usvg::fontdb::Family::Cursive,
                    usvg::FontFamily::Fantasy => usvg::fontdb::Family::Fantasy,
                    usvg::FontFamily::Monospace => usvg::fontdb::Family::Monospace,
                    usvg::FontFamily::Named(s) => usvg::fontdb::Family::Name(s),
                });
            }
            families.push(usvg::fontdb::Family::SansSerif);
            families.push(usvg::fontdb::Family::Serif);

            let style = match font.style() {
                usvg::FontStyle::Normal => usvg::fontdb::Style::Normal,
                usvg::FontStyle::Italic => usvg::fontdb::Style::Italic,
                usvg::FontStyle::Oblique => usvg::fontdb::Style::Oblique,
            };

            let query = usvg::fontdb::Query {
                families: &families,
                weight: usvg::fontdb::Weight(font.weight()),
                stretch: usvg::fontdb::Stretch::Normal,
                style,
            };

            if let Some(id) = fontdb.query(&query) {
                return Some(id);
            }
            fontdb.faces().next().map(|f| f.id)
        }),
        select_fallback: FontResolver::default_fallback_selector(),
    }
}

#[cfg(test)]
#[path = "../../tests/unit/assets/fonts.rs"]
mod tests;
