//! [`TestTree`] builder for mirror scenarios.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::{Duration, SystemTime};

use tempfile::TempDir;

/// A temporary directory holding a `source/` tree and a `target/` tree.
///
/// # Example
///
/// ```rust,no_run
/// use mirror_test_utils::TestTree;
///
/// let tree = TestTree::new();
/// tree.write_source("artist/song.mp3", b"0123456789");
/// tree.assert_target_missing("artist/song.mp3");
/// ```
pub struct TestTree {
    temp_dir: TempDir,
}

impl Default for TestTree {
    fn default() -> Self {
        Self::new()
    }
}

impl TestTree {
    /// Create an empty source tree; the target directory is not created.
    pub fn new() -> Self {
        let temp_dir = TempDir::new().unwrap();
        fs::create_dir_all(temp_dir.path().join("source")).unwrap();
        Self { temp_dir }
    }

    pub fn root(&self) -> &Path {
        self.temp_dir.path()
    }

    pub fn source(&self) -> PathBuf {
        self.root().join("source")
    }

    pub fn target(&self) -> PathBuf {
        self.root().join("target")
    }

    pub fn source_file(&self, rel: &str) -> PathBuf {
        self.source().join(rel)
    }

    pub fn target_file(&self, rel: &str) -> PathBuf {
        self.target().join(rel)
    }

    /// Write a file under the source root, creating parent directories.
    ///
    /// The modification time is pinned to a fixed instant so that rewrites
    /// only look changed when the test changes the time explicitly.
    pub fn write_source(&self, rel: &str, content: &[u8]) -> PathBuf {
        let path = self.source_file(rel);
        write_file(&path, content);
        self.set_source_mtime(rel, Self::base_time());
        path
    }

    /// Write a file under the target root, creating parent directories.
    pub fn write_target(&self, rel: &str, content: &[u8]) -> PathBuf {
        let path = self.target_file(rel);
        write_file(&path, content);
        path
    }

    pub fn remove_source(&self, rel: &str) {
        fs::remove_file(self.source_file(rel)).unwrap();
    }

    pub fn remove_target(&self, rel: &str) {
        fs::remove_file(self.target_file(rel)).unwrap();
    }

    /// A fixed instant used for every source file written by this tree
    pub fn base_time() -> SystemTime {
        SystemTime::UNIX_EPOCH + Duration::from_secs(1_700_000_000)
    }

    pub fn set_source_mtime(&self, rel: &str, time: SystemTime) {
        let file = fs::File::options()
            .write(true)
            .open(self.source_file(rel))
            .unwrap();
        file.set_modified(time).unwrap();
    }

    /// Shift a source file's modification time forward by `secs`.
    pub fn touch_source(&self, rel: &str, secs: u64) {
        let current = fs::metadata(self.source_file(rel))
            .unwrap()
            .modified()
            .unwrap();
        self.set_source_mtime(rel, current + Duration::from_secs(secs));
    }

    pub fn read_target(&self, rel: &str) -> Vec<u8> {
        fs::read(self.target_file(rel)).unwrap()
    }

    /// Raw bytes of the stored record file, if any
    pub fn record_bytes(&self) -> Option<Vec<u8>> {
        fs::read(self.target().join(".syncdb.json")).ok()
    }

    /// The stored record file parsed as JSON
    pub fn record_json(&self) -> serde_json::Value {
        let bytes = self.record_bytes().expect("record file should exist");
        serde_json::from_slice(&bytes).unwrap()
    }

    /// All files under the target root, relative and `/`-separated, sorted.
    pub fn target_files(&self) -> Vec<String> {
        let mut files = Vec::new();
        collect_files(&self.target(), &self.target(), &mut files);
        files.sort();
        files
    }

    pub fn assert_target_exists(&self, rel: &str) {
        assert!(
            self.target_file(rel).exists(),
            "expected target file {rel} to exist"
        );
    }

    pub fn assert_target_missing(&self, rel: &str) {
        assert!(
            !self.target_file(rel).exists(),
            "expected target file {rel} to be absent"
        );
    }
}

fn write_file(path: &Path, content: &[u8]) {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).unwrap();
    }
    fs::write(path, content).unwrap();
}

fn collect_files(root: &Path, dir: &Path, out: &mut Vec<String>) {
    let Ok(entries) = fs::read_dir(dir) else {
        return;
    };
    for entry in entries {
        let path = entry.unwrap().path();
        if path.is_dir() {
            collect_files(root, &path, out);
        } else {
            let rel = path.strip_prefix(root).unwrap();
            out.push(rel.to_string_lossy().replace('\\', "/"));
        }
    }
}
