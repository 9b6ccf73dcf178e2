//! Sync command implementation
//!
//! Resolves the effective configuration (defaults, then config file, then
//! flags), runs the engine and prints a summary.

use colored::Colorize;

use mirror_core::{
    ActionKind, ConfigLayer, MirrorConfig, ProfileLayer, SyncEngine, SyncOptions, SyncReport,
};
use mirror_fs::ConfigStore;

use crate::cli::SyncArgs;
use crate::error::{CliError, Result};

impl SyncArgs {
    /// The flags given on the command line as a config layer.
    ///
    /// Flags that were not given stay `None` so they do not mask the
    /// config file.
    pub fn to_layer(&self) -> ConfigLayer {
        let audio = ProfileLayer {
            extensions: self.source_audio_extensions.clone(),
            target_extension: self.target_audio_extension.clone(),
            command: self.audio_command.clone(),
        };
        let image = ProfileLayer {
            extensions: self.source_image_extensions.clone(),
            target_extension: self.target_image_extension.clone(),
            command: self.image_command.clone(),
        };

        ConfigLayer {
            source: self.source.clone(),
            target: self.target.clone(),
            audio: Some(audio),
            image: Some(image),
            delete_removed: match (self.delete_removed, self.no_delete_removed) {
                (true, _) => Some(true),
                (false, true) => Some(false),
                (false, false) => None,
            },
            include: (!self.include.is_empty()).then(|| self.include.clone()),
            exclude: (!self.exclude.is_empty()).then(|| self.exclude.clone()),
        }
    }
}

/// Build the effective configuration for a sync run
pub fn resolve_config(args: &SyncArgs) -> Result<MirrorConfig> {
    let mut config = MirrorConfig::default();

    if let Some(path) = &args.config {
        let layer: ConfigLayer = ConfigStore::new().load(path)?;
        tracing::debug!(path = %path.display(), "Loaded config file");
        config = config.apply(layer);
    }

    Ok(config.apply(args.to_layer()))
}

/// Run the sync command
pub fn run_sync(args: &SyncArgs) -> Result<()> {
    let config = resolve_config(args)?;
    let engine = SyncEngine::new(&config)?;

    if !args.json {
        println!(
            "{} Mirroring {} -> {}{}",
            "=>".blue().bold(),
            engine.source_root().display().to_string().cyan(),
            engine.target_root().display().to_string().cyan(),
            if args.dry_run { " (dry run)" } else { "" }
        );
    }

    let report = engine.sync_with_options(SyncOptions {
        dry_run: args.dry_run,
    })?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print_report(&report);
    }

    if report.success {
        Ok(())
    } else {
        Err(CliError::user("Synchronization failed"))
    }
}

fn print_report(report: &SyncReport) {
    for failure in &report.errors {
        println!("{} {}: {}", "ERROR".red().bold(), failure.path, failure.message);
        if let Some(argv) = &failure.command {
            println!("   {} {}", "command:".dimmed(), argv.join(" "));
        }
        if let Some(output) = &failure.output {
            for line in output.lines() {
                println!("   {} {}", "|".dimmed(), line);
            }
        }
    }

    for warning in &report.warnings {
        println!("{} {}: {}", "WARN".yellow().bold(), warning.path, warning.message);
    }

    let summary = format!(
        "{} copied, {} transcoded, {} skipped, {} deleted",
        report.count(ActionKind::Copied),
        report.count(ActionKind::Transcoded),
        report.count(ActionKind::Skipped),
        report.count(ActionKind::Deleted),
    );

    if !report.success {
        println!(
            "{} Synchronization finished with {} failed file(s): {}",
            "ERROR".red().bold(),
            report.errors.len(),
            summary
        );
    } else if report.dry_run {
        println!("{} Dry run complete: {}", "OK".green().bold(), summary);
    } else {
        println!("{} Sync complete: {}", "OK".green().bold(), summary);
    }
}
