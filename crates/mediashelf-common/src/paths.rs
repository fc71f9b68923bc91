//! Extension tables and extension-based classification.
//!
//! Classification is a pure lookup: unknown extensions map to
//! [`MediaKind::File`], which is the default case rather than a failure.

use std::path::Path;

use crate::types::MediaKind;

/// Video file extensions.
const VIDEO_EXTENSIONS: &[&str] = &[
    "mkv", "mp4", "avi", "mpg", "mpeg", "m4v", "ts", "webm", "mov", "wmv", "flv",
];

/// Audio file extensions.
const MUSIC_EXTENSIONS: &[&str] = &["mp3", "flac", "m4a", "aac", "ogg", "opus", "wav"];

/// Image file extensions.
const IMAGE_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png", "gif", "webp", "bmp"];

/// Application package extensions.
const PACKAGE_EXTENSIONS: &[&str] = &["apk"];

/// Classify a bare extension. A leading dot is accepted and case is ignored.
///
/// # Examples
///
/// ```
/// use mediashelf_common::{paths::classify, MediaKind};
///
/// assert_eq!(classify(".MKV"), MediaKind::Video);
/// assert_eq!(classify("flac"), MediaKind::Music);
/// assert_eq!(classify(""), MediaKind::File);
/// ```
pub fn classify(extension: &str) -> MediaKind {
    let ext = extension.trim_start_matches('.').to_ascii_lowercase();
    if VIDEO_EXTENSIONS.contains(&ext.as_str()) {
        MediaKind::Video
    } else if MUSIC_EXTENSIONS.contains(&ext.as_str()) {
        MediaKind::Music
    } else if IMAGE_EXTENSIONS.contains(&ext.as_str()) {
        MediaKind::Image
    } else if PACKAGE_EXTENSIONS.contains(&ext.as_str()) {
        MediaKind::Package
    } else {
        MediaKind::File
    }
}

/// Classify a path by its extension.
///
/// Dotfiles such as `.env` have no extension and classify as
/// [`MediaKind::File`].
pub fn classify_path(path: &Path) -> MediaKind {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(classify)
        .unwrap_or(MediaKind::File)
}

/// Lowercased extension of a file name including the leading dot, or an
/// empty string when there is none.
///
/// ```
/// use mediashelf_common::paths::dotted_extension;
///
/// assert_eq!(dotted_extension("Movie.2010.MKV"), ".mkv");
/// assert_eq!(dotted_extension(".env"), "");
/// ```
pub fn dotted_extension(file_name: &str) -> String {
    Path::new(file_name)
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| format!(".{}", ext.to_ascii_lowercase()))
        .unwrap_or_default()
}

/// Whether a file name is hidden by the leading-dot convention.
pub fn is_hidden(file_name: &str) -> bool {
    file_name.starts_with('.')
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify_video() {
        for ext in ["mp4", "mkv", "avi", "mpg", "MKV", ".Mp4"] {
            assert_eq!(classify(ext), MediaKind::Video, "{ext}");
        }
    }

    #[test]
    fn test_classify_music_image_package() {
        assert_eq!(classify("mp3"), MediaKind::Music);
        assert_eq!(classify(".flac"), MediaKind::Music);
        assert_eq!(classify("JPEG"), MediaKind::Image);
        assert_eq!(classify("png"), MediaKind::Image);
        assert_eq!(classify("apk"), MediaKind::Package);
    }

    #[test]
    fn test_classify_unknown_is_file() {
        assert_eq!(classify("xyz"), MediaKind::File);
        assert_eq!(classify(".xyz"), MediaKind::File);
        assert_eq!(classify(""), MediaKind::File);
        assert_eq!(classify("."), MediaKind::File);
    }

    #[test]
    fn test_classify_path() {
        assert_eq!(classify_path(Path::new("/a/b/movie.mp4")), MediaKind::Video);
        assert_eq!(classify_path(Path::new("song.1.FLAC")), MediaKind::Music);
        assert_eq!(classify_path(Path::new(".env")), MediaKind::File);
        assert_eq!(classify_path(Path::new("README")), MediaKind::File);
        assert_eq!(classify_path(Path::new(".hidden.mkv")), MediaKind::Video);
    }

    #[test]
    fn test_dotted_extension() {
        assert_eq!(dotted_extension("a.mp4"), ".mp4");
        assert_eq!(dotted_extension("a.tar.GZ"), ".gz");
        assert_eq!(dotted_extension("noext"), "");
        assert_eq!(dotted_extension(".bashrc"), "");
    }

    #[test]
    fn test_is_hidden() {
        assert!(is_hidden(".env"));
        assert!(is_hidden(".hidden.mkv"));
        assert!(!is_hidden("movie.mp4"));
        assert!(!is_hidden("a.b"));
    }

    #[test]
    fn test_tables_are_disjoint() {
        for ext in VIDEO_EXTENSIONS {
            assert!(!MUSIC_EXTENSIONS.contains(ext));
            assert!(!IMAGE_EXTENSIONS.contains(ext));
        }
        for ext in MUSIC_EXTENSIONS {
            assert!(!IMAGE_EXTENSIONS.contains(ext));
        }
    }
}
