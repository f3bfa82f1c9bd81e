//! Resources the engine creates or finds at startup.
//! Neither the font nor the icon is shipped with the game.

use std::ffi::OsString;
use std::path::PathBuf;

use speedy2d::font::Font;

/// Overrides where the font is loaded from.
pub const FONT_ENV: &str = "SLINGSHOT_FONT";

/// Common locations of a bold sans-serif font.
#[cfg_attr(target_arch="wasm32", allow(dead_code))]
const SYSTEM_FONTS: &[&str] = &[
    "/usr/share/fonts/truetype/dejavu/DejaVuSans-Bold.ttf",
    "/usr/share/fonts/TTF/DejaVuSans-Bold.ttf",
    "/usr/share/fonts/dejavu/DejaVuSans-Bold.ttf",
    "/usr/share/fonts/dejavu-sans-fonts/DejaVuSans-Bold.ttf",
    "/usr/share/fonts/truetype/liberation/LiberationSans-Bold.ttf",
    "/usr/share/fonts/liberation/LiberationSans-Bold.ttf",
    "/System/Library/Fonts/Supplemental/Arial Bold.ttf",
    "/Library/Fonts/Arial Bold.ttf",
    "C:\\Windows\\Fonts\\arialbd.ttf",
];

/// Paths to try in order, the environment variable first.
#[cfg_attr(target_arch="wasm32", allow(dead_code))]
fn font_candidates(from_env: Option<OsString>) -> Vec<PathBuf> {
    from_env.into_iter()
        .filter(|path| !path.is_empty())
        .map(PathBuf::from)
        .chain(SYSTEM_FONTS.iter().map(PathBuf::from))
        .collect()
}

/// Returns the first font that can be read and parsed.
#[cfg(not(target_arch="wasm32"))]
pub fn load_font() -> Option<Font> {
    for path in font_candidates(std::env::var_os(FONT_ENV)) {
        let bytes = match std::fs::read(&path) {
            Ok(bytes) => bytes,
            Err(e) => {
                log::debug!("cannot read font {:?}: {}", path, e);
                continue;
            }
        };
        match Font::new(&bytes) {
            Ok(font) => {
                log::info!("using font {:?}", path);
                return Some(font);
            }
            Err(e) => log::warn!("cannot parse font {:?}: {:?}", path, e),
        }
    }
    log::warn!("found no usable font, text will not be drawn. Set {} to a .ttf file", FONT_ENV);
    None
}

/// There is no file system to search.
#[cfg(target_arch="wasm32")]
pub fn load_font() -> Option<Font> {
    log::warn!("no font available in the browser, text will not be drawn");
    None
}

/// A black ball on a transparent background.
#[cfg(not(target_arch="wasm32"))]
pub fn icon(size: u32) -> image::RgbaImage {
    let center = (size as f32 - 1.0) / 2.0;
    let radius = size as f32 / 2.0 - 1.0;
    image::RgbaImage::from_fn(size, size, |x, y| {
        let distance = (x as f32 - center).hypot(y as f32 - center);
        if distance <= radius {
            image::Rgba([0, 0, 0, 255])
        } else {
            image::Rgba([0xcc, 0xcc, 0xcc, 0])
        }
    })
}
