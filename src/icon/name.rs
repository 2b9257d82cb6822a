//! Display names derived from icon file names.

/// Background-variant markers dropped from display names.
const BACKGROUND_MARKERS: [&str; 2] = ["light-bg", "dark-bg"];

/// Turn a file name into a human-readable icon name.
///
/// Drops the extension and the `light-bg` / `dark-bg` markers, turns `-`
/// and `_` into spaces and trims the result:
/// `my-icon_dark-bg.svg` → `my icon`.
pub fn readable_name(file_name: &str) -> String {
    let stem = file_name
        .rfind('.')
        .map_or(file_name, |dot| &file_name[..dot]);

    let mut name = stem.to_string();
    for marker in BACKGROUND_MARKERS {
        name = name.replace(marker, "");
    }

    name.replace(['-', '_'], " ").trim().to_string()
}
