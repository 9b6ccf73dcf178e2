//! Run configuration
//!
//! A [`MirrorConfig`] is the effective configuration handed to
//! [`SyncEngine::new`](crate::SyncEngine::new). It starts from built-in
//! defaults and has any number of [`ConfigLayer`]s applied on top, later
//! layers overriding earlier ones (config file first, then command-line
//! flags). Nothing here is global.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Per-class settings: which source extensions belong to the class, what
/// extension the produced file gets, and the command that produces it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MediaProfile {
    /// Source extensions (without the dot) that belong to this class
    pub extensions: Vec<String>,
    /// Extension given to produced files; empty keeps the source extension
    pub target_extension: String,
    /// Command template with `$INPUT` / `$OUTPUT` placeholders; empty means copy
    pub command: String,
}

impl MediaProfile {
    fn new(extensions: &[&str], target_extension: &str) -> Self {
        Self {
            extensions: extensions.iter().map(|e| e.to_string()).collect(),
            target_extension: target_extension.to_string(),
            command: String::new(),
        }
    }

    /// Default audio profile: mp3/flac/opus sources produce `.opus`
    pub fn audio() -> Self {
        Self::new(&["mp3", "flac", "opus"], "opus")
    }

    /// Default image profile: jpg/jpeg/png/gif sources produce `.jpeg`
    pub fn image() -> Self {
        Self::new(&["jpg", "jpeg", "png", "gif"], "jpeg")
    }

    /// Extensions with surrounding whitespace and a leading dot removed.
    pub fn normalized_extensions(&self) -> Vec<String> {
        self.extensions
            .iter()
            .map(|e| e.trim().trim_start_matches('.').to_string())
            .filter(|e| !e.is_empty())
            .collect()
    }

    /// Whether this profile transforms files rather than copying them
    pub fn has_command(&self) -> bool {
        !self.command.is_empty()
    }

    fn apply(&mut self, layer: ProfileLayer) {
        if let Some(extensions) = layer.extensions {
            self.extensions = extensions;
        }
        if let Some(target_extension) = layer.target_extension {
            self.target_extension = target_extension;
        }
        if let Some(command) = layer.command {
            self.command = command;
        }
    }
}

/// The effective configuration of one run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MirrorConfig {
    /// Root of the tree being mirrored
    pub source: Option<PathBuf>,
    /// Root of the mirror
    pub target: Option<PathBuf>,
    /// Audio class settings
    pub audio: MediaProfile,
    /// Image class settings
    pub image: MediaProfile,
    /// Delete target files that the run did not account for
    pub delete_removed: bool,
    /// Regular expressions that admit a relative path regardless of excludes
    pub include: Vec<String>,
    /// Regular expressions that reject a relative path
    pub exclude: Vec<String>,
}

impl Default for MirrorConfig {
    fn default() -> Self {
        Self {
            source: None,
            target: None,
            audio: MediaProfile::audio(),
            image: MediaProfile::image(),
            delete_removed: false,
            include: Vec::new(),
            exclude: Vec::new(),
        }
    }
}

impl MirrorConfig {
    /// Create a config for the given roots with default profiles
    pub fn new(source: impl Into<PathBuf>, target: impl Into<PathBuf>) -> Self {
        Self {
            source: Some(source.into()),
            target: Some(target.into()),
            ..Self::default()
        }
    }

    /// Apply a layer on top of this config. Fields the layer leaves unset
    /// keep their current value.
    pub fn apply(mut self, layer: ConfigLayer) -> Self {
        if layer.source.is_some() {
            self.source = layer.source;
        }
        if layer.target.is_some() {
            self.target = layer.target;
        }
        if let Some(audio) = layer.audio {
            self.audio.apply(audio);
        }
        if let Some(image) = layer.image {
            self.image.apply(image);
        }
        if let Some(delete_removed) = layer.delete_removed {
            self.delete_removed = delete_removed;
        }
        if let Some(include) = layer.include {
            self.include = include;
        }
        if let Some(exclude) = layer.exclude {
            self.exclude = exclude;
        }
        self
    }
}

/// A partial profile as found in a config file or on the command line.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ProfileLayer {
    pub extensions: Option<Vec<String>>,
    pub target_extension: Option<String>,
    pub command: Option<String>,
}

/// A partial configuration. Every field is optional so that a file or a set
/// of flags only overrides what it mentions.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ConfigLayer {
    pub source: Option<PathBuf>,
    pub target: Option<PathBuf>,
    pub audio: Option<ProfileLayer>,
    pub image: Option<ProfileLayer>,
    pub delete_removed: Option<bool>,
    pub include: Option<Vec<String>>,
    pub exclude: Option<Vec<String>>,
}
