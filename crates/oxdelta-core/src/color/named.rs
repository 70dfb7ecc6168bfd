//! Named colors
//!
//! CSS basic keywords plus the extended names most often typed by hand.

use crate::color::RgbColor;

const NAMED_COLORS: &[(&str, RgbColor)] = &[
    ("black", RgbColor::new(0, 0, 0)),
    ("silver", RgbColor::new(192, 192, 192)),
    ("gray", RgbColor::new(128, 128, 128)),
    ("grey", RgbColor::new(128, 128, 128)),
    ("white", RgbColor::new(255, 255, 255)),
    ("maroon", RgbColor::new(128, 0, 0)),
    ("red", RgbColor::new(255, 0, 0)),
    ("purple", RgbColor::new(128, 0, 128)),
    ("fuchsia", RgbColor::new(255, 0, 255)),
    ("magenta", RgbColor::new(255, 0, 255)),
    ("green", RgbColor::new(0, 128, 0)),
    ("lime", RgbColor::new(0, 255, 0)),
    ("olive", RgbColor::new(128, 128, 0)),
    ("yellow", RgbColor::new(255, 255, 0)),
    ("navy", RgbColor::new(0, 0, 128)),
    ("blue", RgbColor::new(0, 0, 255)),
    ("teal", RgbColor::new(0, 128, 128)),
    ("aqua", RgbColor::new(0, 255, 255)),
    ("cyan", RgbColor::new(0, 255, 255)),
    ("orange", RgbColor::new(255, 165, 0)),
    ("pink", RgbColor::new(255, 192, 203)),
    ("brown", RgbColor::new(165, 42, 42)),
    ("gold", RgbColor::new(255, 215, 0)),
    ("beige", RgbColor::new(245, 245, 220)),
    ("coral", RgbColor::new(255, 127, 80)),
    ("crimson", RgbColor::new(220, 20, 60)),
    ("indigo", RgbColor::new(75, 0, 130)),
    ("ivory", RgbColor::new(255, 255, 240)),
    ("khaki", RgbColor::new(240, 230, 140)),
    ("lavender", RgbColor::new(230, 230, 250)),
    ("salmon", RgbColor::new(250, 128, 114)),
    ("tan", RgbColor::new(210, 180, 140)),
    ("turquoise", RgbColor::new(64, 224, 208)),
    ("violet", RgbColor::new(238, 130, 238)),
];

/// Look up a color by name, ignoring ASCII case and surrounding whitespace
pub fn lookup(name: &str) -> Option<RgbColor> {
    let name = name.trim();
    NAMED_COLORS
        .iter()
        .find(|(known, _)| known.eq_ignore_ascii_case(name))
        .map(|&(_, rgb)| rgb)
}

/// Iterate over every known name and its color
pub fn all() -> impl Iterator<Item = (&'static str, RgbColor)> {
    NAMED_COLORS.iter().copied()
}
