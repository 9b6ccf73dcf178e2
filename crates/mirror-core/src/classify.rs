//! Path classification and include/exclude filtering

use regex::Regex;

use crate::config::MirrorConfig;

/// What kind of media a source file is, judged by its extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MediaClass {
    Audio,
    Image,
    /// Not handled at all: neither copied nor recorded
    Neither,
}

impl std::fmt::Display for MediaClass {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::Audio => "audio",
            Self::Image => "image",
            Self::Neither => "other",
        };
        f.write_str(name)
    }
}

/// Extension-based classifier.
#[derive(Debug, Clone, Default)]
pub struct Classifier {
    audio: Vec<String>,
    image: Vec<String>,
}

impl Classifier {
    pub fn new(audio: Vec<String>, image: Vec<String>) -> Self {
        let fold = |list: Vec<String>| -> Vec<String> {
            list.iter().map(|e| e.to_lowercase()).collect()
        };
        Self {
            audio: fold(audio),
            image: fold(image),
        }
    }

    pub fn from_config(config: &MirrorConfig) -> Self {
        Self::new(
            config.audio.normalized_extensions(),
            config.image.normalized_extensions(),
        )
    }

    /// Classify by case-insensitive extension match. Case folding covers
    /// non-ASCII letters too.
    ///
    /// An extension listed for both classes is treated as an image.
    pub fn classify(&self, extension: &str) -> MediaClass {
        let extension = extension.to_lowercase();
        let listed = |list: &[String]| list.contains(&extension);
        if listed(&self.image) {
            MediaClass::Image
        } else if listed(&self.audio) {
            MediaClass::Audio
        } else {
            MediaClass::Neither
        }
    }
}

/// Include/exclude filter over paths relative to the source root.
///
/// An include match admits a path even when an exclude also matches.
/// Otherwise any exclude match rejects it, and everything else is admitted.
#[derive(Debug, Clone, Default)]
pub struct PathFilter {
    include: Vec<Regex>,
    exclude: Vec<Regex>,
}

impl PathFilter {
    /// Compile the given patterns.
    ///
    /// A pattern that fails to compile can never match and is dropped.
    pub fn new<S: AsRef<str>>(include: &[S], exclude: &[S]) -> Self {
        Self {
            include: compile_all(include),
            exclude: compile_all(exclude),
        }
    }

    pub fn from_config(config: &MirrorConfig) -> Self {
        Self::new(&config.include, &config.exclude)
    }

    pub fn admit(&self, relative_path: &str) -> bool {
        if self.include.iter().any(|re| re.is_match(relative_path)) {
            return true;
        }
        !self.exclude.iter().any(|re| re.is_match(relative_path))
    }
}

fn compile_all<S: AsRef<str>>(patterns: &[S]) -> Vec<Regex> {
    patterns
        .iter()
        .filter_map(|pattern| match Regex::new(pattern.as_ref()) {
            Ok(re) => Some(re),
            Err(e) => {
                tracing::debug!(pattern = pattern.as_ref(), error = %e, "Dropping malformed pattern");
                None
            }
        })
        .collect()
}
