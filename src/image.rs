//! Image reference helpers.

/// Split `name[:tag]` into its name and optional tag.
///
/// A colon followed by something containing `/` belongs to a registry port
/// (`localhost:5000/app`), not a tag.
pub fn split_image_tag(image: &str) -> (&str, Option<&str>) {
    match image.rsplit_once(':') {
        Some((name, tag)) if !tag.contains('/') => (name, Some(tag)),
        _ => (image, None),
    }
}
