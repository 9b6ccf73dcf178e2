//! SyncEngine implementation
//!
//! One run walks the source tree, decides per file whether it needs work,
//! copies or transforms what does, records every handled file into a fresh
//! record set, persists that set, and optionally removes target files the
//! fresh set no longer accounts for.

use std::fs;
use std::path::{Path, PathBuf};

use mirror_fs::{NormalizedPath, WalkEntry, walk_files};
use tracing::{debug, error, info, warn};

use crate::classify::{Classifier, MediaClass, PathFilter};
use crate::command::{CommandRunner, CommandTemplate, SystemRunner};
use crate::config::{MediaProfile, MirrorConfig};
use crate::record::{RECORD_FILE_NAME, SyncRecordEntry, SyncRecordSet};
use crate::{Error, Result};

use super::decision::{ProcessingDecision, SourceState, decide};
use super::report::{ActionKind, FileFailure, SyncReport};

/// Options for a sync run
#[derive(Debug, Clone, Copy, Default)]
pub struct SyncOptions {
    /// Decide and report, but copy, run, delete and save nothing
    pub dry_run: bool,
}

/// A media class's settings, with its template split once up front.
#[derive(Debug, Clone)]
struct ClassPlan {
    target_extension: String,
    template: CommandTemplate,
}

impl ClassPlan {
    fn new(profile: &MediaProfile) -> Self {
        Self {
            target_extension: profile.target_extension.trim().trim_start_matches('.').to_string(),
            template: CommandTemplate::parse(&profile.command),
        }
    }

    fn target_path(&self, source: &NormalizedPath) -> NormalizedPath {
        if self.target_extension.is_empty() {
            source.clone()
        } else {
            source.with_extension(&self.target_extension)
        }
    }
}

/// Engine for mirroring a source tree into a target tree
pub struct SyncEngine {
    source_root: PathBuf,
    target_root: PathBuf,
    classifier: Classifier,
    filter: PathFilter,
    audio: ClassPlan,
    image: ClassPlan,
    delete_removed: bool,
    runner: Box<dyn CommandRunner>,
}

impl std::fmt::Debug for SyncEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SyncEngine")
            .field("source_root", &self.source_root)
            .field("target_root", &self.target_root)
            .field("delete_removed", &self.delete_removed)
            .finish_non_exhaustive()
    }
}

impl SyncEngine {
    /// Create a new SyncEngine
    ///
    /// Resolves both roots to absolute paths. The target root does not have
    /// to exist yet.
    ///
    /// # Errors
    ///
    /// Returns an error if a root is not configured or the source root
    /// cannot be resolved.
    pub fn new(config: &MirrorConfig) -> Result<Self> {
        let source = config
            .source
            .as_deref()
            .filter(|p| !p.as_os_str().is_empty())
            .ok_or(Error::MissingRoot { which: "Source" })?;
        let target = config
            .target
            .as_deref()
            .filter(|p| !p.as_os_str().is_empty())
            .ok_or(Error::MissingRoot { which: "Target" })?;

        let source_root = dunce::canonicalize(source).map_err(|e| Error::SourceNotFound {
            path: source.to_path_buf(),
            source: e,
        })?;
        let target_root = match dunce::canonicalize(target) {
            Ok(path) => path,
            Err(_) => std::path::absolute(target).map_err(|e| mirror_fs::Error::io(target, e))?,
        };

        Ok(Self {
            source_root,
            target_root,
            classifier: Classifier::from_config(config),
            filter: PathFilter::from_config(config),
            audio: ClassPlan::new(&config.audio),
            image: ClassPlan::new(&config.image),
            delete_removed: config.delete_removed,
            runner: Box::new(SystemRunner),
        })
    }

    /// Replace the process runner used for command templates
    pub fn with_runner(mut self, runner: impl CommandRunner + 'static) -> Self {
        self.runner = Box::new(runner);
        self
    }

    /// Absolute source root
    pub fn source_root(&self) -> &Path {
        &self.source_root
    }

    /// Absolute target root
    pub fn target_root(&self) -> &Path {
        &self.target_root
    }

    /// Get the path to the record file
    pub fn record_path(&self) -> PathBuf {
        self.target_root.join(RECORD_FILE_NAME)
    }

    /// Run a sync
    pub fn sync(&self) -> Result<SyncReport> {
        self.sync_with_options(SyncOptions::default())
    }

    /// Run a sync with options
    ///
    /// Per-file failures are collected in the report and never abort the
    /// walk. The record set is saved even when some files failed, so the
    /// files that did succeed are not redone next time.
    ///
    /// # Errors
    ///
    /// Returns an error if the target root cannot be created or the source
    /// tree cannot be walked. Nothing is saved in that case.
    pub fn sync_with_options(&self, options: SyncOptions) -> Result<SyncReport> {
        let record_path = self.record_path();
        let previous = SyncRecordSet::load(&record_path);
        debug!(entries = previous.len(), "Loaded previous sync record");

        if !options.dry_run {
            fs::create_dir_all(&self.target_root)
                .map_err(|e| mirror_fs::Error::io(&self.target_root, e))?;
        }

        let mut current = SyncRecordSet::new();
        let mut report = SyncReport::new(options.dry_run);

        for entry in walk_files(&self.source_root) {
            let entry = entry.map_err(|source| Error::Traversal {
                root: self.source_root.clone(),
                source,
            })?;
            if let Some(recorded) = self.visit(&entry, &previous, &mut report, options) {
                current.push(recorded);
            }
        }

        if options.dry_run {
            debug!("Dry run, sync record left untouched");
        } else if let Err(e) = current.save(&record_path) {
            error!(path = %record_path.display(), error = %e, "Failed to save sync record");
            report.fail(FileFailure::new(RECORD_FILE_NAME, e.to_string()));
        }

        if self.delete_removed {
            self.remove_orphans(&current, &mut report, options);
        }

        Ok(report)
    }

    /// Handle one walked source file.
    ///
    /// Returns the record entry to keep, or `None` when the file is not ours
    /// or failed.
    fn visit(
        &self,
        entry: &WalkEntry,
        previous: &SyncRecordSet,
        report: &mut SyncReport,
        options: SyncOptions,
    ) -> Option<SyncRecordEntry> {
        let relative = NormalizedPath::relative(&self.source_root, &entry.path)?;

        let class = self.classifier.classify(relative.extension().unwrap_or(""));
        let plan = match class {
            MediaClass::Audio => &self.audio,
            MediaClass::Image => &self.image,
            MediaClass::Neither => return None,
        };

        if !self.filter.admit(relative.as_str()) {
            debug!(path = %relative, "Filtered out");
            return None;
        }

        let target_relative = plan.target_path(&relative);
        let target = target_relative.under(&self.target_root);
        let state = SourceState::from(entry);
        let command = plan.template.as_str();

        match decide(previous.find(relative.as_str()), &state, command, target.exists()) {
            ProcessingDecision::Skip => {
                info!(path = %relative, "skip");
                report.record(ActionKind::Skipped, relative.as_str());
            }
            ProcessingDecision::Process(reason) => {
                debug!(path = %relative, %class, %reason, "Processing");
                match self.produce(&relative, &entry.path, &target, plan, options) {
                    Ok(kind) => {
                        info!(path = %relative, target = %target_relative, "{kind}");
                        report.record(kind, relative.as_str());
                    }
                    Err(failure) => {
                        error!(path = %relative, "{}", failure.message);
                        report.fail(failure);
                        return None;
                    }
                }
            }
        }

        Some(SyncRecordEntry {
            source_path: relative.as_str().to_string(),
            target_path: target_relative.as_str().to_string(),
            size: state.size,
            mod_time: state.mod_time,
            command: command.to_string(),
        })
    }

    /// Copy or transform one source file into place.
    fn produce(
        &self,
        relative: &NormalizedPath,
        source: &Path,
        target: &Path,
        plan: &ClassPlan,
        options: SyncOptions,
    ) -> std::result::Result<ActionKind, FileFailure> {
        if plan.template.is_copy() {
            if !options.dry_run {
                mirror_fs::io::copy_file(source, target)
                    .map_err(|e| FileFailure::new(relative.as_str(), e.to_string()))?;
            }
            return Ok(ActionKind::Copied);
        }

        let argv = plan.template.render(source, target);
        if argv.is_empty() {
            return Err(FileFailure::new(
                relative.as_str(),
                format!("Command template {:?} has no program", plan.template.as_str()),
            ));
        }
        if options.dry_run {
            return Ok(ActionKind::Transcoded);
        }

        if let Some(parent) = target.parent() {
            fs::create_dir_all(parent).map_err(|e| {
                FileFailure::new(
                    relative.as_str(),
                    format!("Failed to create {}: {e}", parent.display()),
                )
            })?;
        }

        let output = self.runner.run(&argv).map_err(|e| {
            FileFailure::new(relative.as_str(), format!("Failed to run {}: {e}", argv[0]))
                .with_command(argv.clone())
        })?;

        if !output.success() {
            let status = output
                .code
                .map_or_else(|| "terminated by signal".to_string(), |c| format!("exit code {c}"));
            return Err(
                FileFailure::new(relative.as_str(), format!("Command failed with {status}"))
                    .with_command(argv)
                    .with_output(output.output),
            );
        }

        Ok(ActionKind::Transcoded)
    }

    /// Delete target files that `current` does not account for.
    ///
    /// The record file itself is always kept. Failures are reported as
    /// warnings and the scan carries on.
    fn remove_orphans(
        &self,
        current: &SyncRecordSet,
        report: &mut SyncReport,
        options: SyncOptions,
    ) {
        if !self.target_root.is_dir() {
            return;
        }

        let expected = current.target_paths();

        for entry in walk_files(&self.target_root) {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) => {
                    warn!(error = %e, "Skipping unreadable target entry");
                    report.warn(FileFailure::new(
                        self.target_root.display().to_string(),
                        e.to_string(),
                    ));
                    continue;
                }
            };

            let Some(relative) = NormalizedPath::relative(&self.target_root, &entry.path) else {
                continue;
            };
            if relative.as_str() == RECORD_FILE_NAME || expected.contains(relative.as_str()) {
                continue;
            }

            if options.dry_run {
                report.record(ActionKind::Deleted, relative.as_str());
                continue;
            }

            match mirror_fs::io::remove_file(&entry.path) {
                Ok(()) => {
                    info!(path = %relative, "delete");
                    report.record(ActionKind::Deleted, relative.as_str());
                }
                Err(e) => {
                    warn!(path = %relative, error = %e, "Failed to delete");
                    report.warn(FileFailure::new(relative.as_str(), e.to_string()));
                }
            }
        }
    }
}
