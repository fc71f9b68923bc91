//! Release-name parsing.
//!
//! Turns a raw filename such as `Breaking.Bad.S01E02.720p.mkv` into a
//! search title plus optional season and episode markers. The parser is
//! heuristic and deterministic; absence of markers is not an error.

use std::path::Path;
use std::sync::OnceLock;

use regex::Regex;

/// Outcome of parsing one filename.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParsedName {
    /// Cleaned title ready for metadata lookup.
    pub title: String,
    /// Season number, if the name carries one.
    pub season: Option<u32>,
    /// Episode number, if the name carries one.
    pub episode: Option<u32>,
}

impl ParsedName {
    /// `(season, episode)` when both markers are present.
    pub fn episode_marker(&self) -> Option<(u32, u32)> {
        self.season.zip(self.episode)
    }
}

/// Extracts a best-guess title and episode markers from a filename.
pub trait FilenameParser: Send + Sync {
    fn parse(&self, file_name: &str) -> ParsedName;
}

/// Regex-based parser for scene-style and loosely named media files.
#[derive(Debug, Default)]
pub struct ReleaseNameParser;

impl ReleaseNameParser {
    pub fn new() -> Self {
        Self
    }
}

fn episode_pattern() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"(?i)(?:^|[\s._\-\[(])(?:s(\d{1,2})[\s._\-]?e(\d{1,3})|(\d{1,2})x(\d{2,3}))(?:$|[\s._\-\])])")
            .unwrap_or_else(|e| panic!("episode marker regex is invalid: {e}"))
    })
}

/// Token that ends the title of a movie release: a year or a well-known
/// quality/source tag.
fn title_terminator() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(
            r"(?i)^(?:(?:19|20)\d{2}|2160p|1080p|1080i|720p|576p|480p|4k|uhd|bluray|bdrip|brrip|webdl|webrip|web|hdtv|dvdrip|dvd|remux|x264|x265|h264|h265|hevc|xvid|proper|repack|extended|unrated)$",
        )
        .unwrap_or_else(|e| panic!("title terminator regex is invalid: {e}"))
    })
}

fn leading_group() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"^\s*\[[^\]]*\]\s*")
            .unwrap_or_else(|e| panic!("leading group regex is invalid: {e}"))
    })
}

fn clean_title(raw: &str) -> String {
    let spaced: String = raw
        .chars()
        .map(|c| if c == '.' || c == '_' { ' ' } else { c })
        .collect();
    spaced
        .trim_matches(|c: char| c.is_whitespace() || c == '-' || c == '(' || c == '[')
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

impl FilenameParser for ReleaseNameParser {
    fn parse(&self, file_name: &str) -> ParsedName {
        let stem = Path::new(file_name)
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or(file_name);
        let stem = leading_group().replace(stem, "");

        if let Some(caps) = episode_pattern().captures(&stem) {
            let season = caps.get(1).or_else(|| caps.get(3));
            let episode = caps.get(2).or_else(|| caps.get(4));
            let start = caps.get(0).map(|m| m.start()).unwrap_or(0);
            return ParsedName {
                title: clean_title(&stem[..start]),
                season: season.and_then(|m| m.as_str().parse().ok()),
                episode: episode.and_then(|m| m.as_str().parse().ok()),
            };
        }

        // A year or tag in first position is part of the title ("2012", "1917").
        let tokens: Vec<&str> = stem
            .split(|c: char| c.is_whitespace() || "._-[]()".contains(c))
            .filter(|t| !t.is_empty())
            .collect();
        let cut = tokens
            .iter()
            .skip(1)
            .position(|t| title_terminator().is_match(t))
            .map(|i| i + 1)
            .unwrap_or(tokens.len());

        ParsedName {
            title: tokens[..cut].join(" "),
            season: None,
            episode: None,
        }
    }
}
