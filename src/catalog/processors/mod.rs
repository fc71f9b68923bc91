//! Built-in [`Processor`](super::Processor) implementations, in dispatch
//! order.

mod fallback;
mod image;
mod music;
mod package;
mod video;

pub use self::fallback::FallbackProcessor;
pub use self::image::{raw_url, ImageProcessor};
pub use self::music::MusicProcessor;
pub use self::package::{PackageInfo, PackageProcessor};
pub use self::video::{VideoMatch, VideoProcessor};

#[cfg(test)]
pub(crate) mod testing {
    //! Stub collaborators with call counters.

    use std::collections::BTreeMap;
    use std::path::{Path, PathBuf};
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    use async_trait::async_trait;
    use image::DynamicImage;
    use mediashelf_common::paths::dotted_extension;
    use mediashelf_common::MediaType;

    use crate::catalog::entry::CatalogEntry;
    use crate::metadata::{FilenameParser, MetadataProvider, MovieMatch, ParsedName, TvMatch};
    use crate::package::{IconExtractor, PackageHandle};

    /// Unenriched file entry; paths under `/lib/` become relative to it.
    pub fn entry_for(path: &str) -> CatalogEntry {
        let absolute = PathBuf::from(path);
        let name = absolute
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        let relative = path.strip_prefix("/lib/").unwrap_or(&name).to_string();
        CatalogEntry {
            library_id: 0,
            extension: dotted_extension(&name),
            name,
            relative_path: relative,
            absolute_path: absolute,
            is_directory: false,
            size_bytes: 42,
            permissions: 0o644,
            modified: 0,
            media_type: MediaType::File,
            icon: "file.png".to_string(),
            line1: "42 bytes".to_string(),
            line2: String::new(),
            line3: String::new(),
            extras: BTreeMap::new(),
        }
    }

    pub struct StubParser(ParsedName);

    impl StubParser {
        pub fn title(title: &str) -> Self {
            Self(ParsedName {
                title: title.to_string(),
                season: None,
                episode: None,
            })
        }

        pub fn episode(title: &str, season: u32, episode: u32) -> Self {
            Self(ParsedName {
                title: title.to_string(),
                season: Some(season),
                episode: Some(episode),
            })
        }
    }

    impl FilenameParser for StubParser {
        fn parse(&self, _file_name: &str) -> ParsedName {
            self.0.clone()
        }
    }

    #[derive(Default)]
    pub struct StubProvider {
        movies: Vec<MovieMatch>,
        shows: Vec<TvMatch>,
        fail: bool,
        delay: Option<Duration>,
        movie_calls: AtomicUsize,
        tv_calls: AtomicUsize,
    }

    impl StubProvider {
        pub fn empty() -> Self {
            Self::default()
        }

        pub fn failing() -> Self {
            Self {
                fail: true,
                ..Self::default()
            }
        }

        pub fn with_movie(title: &str, rating: f64) -> Self {
            Self {
                movies: vec![MovieMatch {
                    id: 27205,
                    title: title.to_string(),
                    release_date: Some("2010-07-16".to_string()),
                    vote_average: rating,
                    poster_path: Some(format!("/{}.jpg", title.to_lowercase())),
                    overview: Some("A thief who steals corporate secrets.".to_string()),
                }],
                ..Self::default()
            }
        }

        pub fn with_show(name: &str) -> Self {
            Self {
                shows: vec![TvMatch {
                    id: 1399,
                    name: name.to_string(),
                    poster_path: Some("/show.jpg".to_string()),
                }],
                ..Self::default()
            }
        }

        pub fn delayed(mut self, delay: Duration) -> Self {
            self.delay = Some(delay);
            self
        }

        pub fn movie_calls(&self) -> usize {
            self.movie_calls.load(Ordering::SeqCst)
        }

        pub fn tv_calls(&self) -> usize {
            self.tv_calls.load(Ordering::SeqCst)
        }

        async fn respond<T: Clone>(&self, results: &[T]) -> anyhow::Result<Vec<T>> {
            if let Some(delay) = self.delay {
                tokio::time::sleep(delay).await;
            }
            if self.fail {
                anyhow::bail!("TMDB request returned 401 Unauthorized");
            }
            Ok(results.to_vec())
        }
    }

    #[async_trait]
    impl MetadataProvider for StubProvider {
        fn name(&self) -> &'static str {
            "stub"
        }

        fn is_available(&self) -> bool {
            true
        }

        async fn search_movie(&self, _title: &str) -> anyhow::Result<Vec<MovieMatch>> {
            self.movie_calls.fetch_add(1, Ordering::SeqCst);
            self.respond(&self.movies).await
        }

        async fn search_tv(&self, _title: &str) -> anyhow::Result<Vec<TvMatch>> {
            self.tv_calls.fetch_add(1, Ordering::SeqCst);
            self.respond(&self.shows).await
        }

        fn image_url(&self, poster_path: &str, size: Option<&str>) -> String {
            format!("https://img.test/{}{}", size.unwrap_or("original"), poster_path)
        }
    }

    /// Extractor that hands out a fixed 2x2 icon and counts opens.
    #[derive(Default)]
    pub struct CountingExtractor {
        opens: AtomicUsize,
        delay: Option<Duration>,
        missing_icon: bool,
    }

    impl CountingExtractor {
        /// Opens fine but has no icon to decode.
        pub fn without_icon() -> Self {
            Self {
                missing_icon: true,
                ..Self::default()
            }
        }

        pub fn delayed(delay: Duration) -> Self {
            Self {
                delay: Some(delay),
                ..Self::default()
            }
        }

        pub fn opens(&self) -> usize {
            self.opens.load(Ordering::SeqCst)
        }
    }

    struct StubPackage {
        missing_icon: bool,
    }

    impl PackageHandle for StubPackage {
        fn icon(&mut self) -> mediashelf_common::Result<DynamicImage> {
            if self.missing_icon {
                return Err(mediashelf_common::Error::IconNotFound(PathBuf::from("stub.apk")));
            }
            Ok(DynamicImage::ImageRgba8(image::RgbaImage::new(2, 2)))
        }

        fn label(&self) -> String {
            "Stub".to_string()
        }

        fn package_identifier(&self) -> String {
            "com.example.stub".to_string()
        }
    }

    impl IconExtractor for CountingExtractor {
        fn name(&self) -> &'static str {
            "counting"
        }

        fn open(&self, _path: &Path) -> mediashelf_common::Result<Box<dyn PackageHandle>> {
            self.opens.fetch_add(1, Ordering::SeqCst);
            if let Some(delay) = self.delay {
                std::thread::sleep(delay);
            }
            Ok(Box::new(StubPackage {
                missing_icon: self.missing_icon,
            }))
        }
    }
}
