//! CLI argument parsing using clap derive

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

/// media-mirror - Incrementally mirror a media library, transcoding on the way
#[derive(Parser, Debug)]
#[command(name = "media-mirror")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// The command to run
    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands
#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Commands {
    /// Mirror the source tree into the target tree
    ///
    /// Files whose size, modification time and command are unchanged since
    /// the last run, and whose output still exists, are skipped.
    ///
    /// Examples:
    ///   media-mirror sync --source ~/Music --target /media/player/Music
    ///   media-mirror sync --config mirror.toml --dry-run
    ///   media-mirror sync -s ~/Music -t /mnt/sd \
    ///       --audio-command 'ffmpeg -y -i $INPUT -c:a libopus -b:a 96k $OUTPUT'
    Sync(SyncArgs),

    /// Show the sync record stored in a target directory
    Records {
        /// Target directory holding the record
        #[arg(short, long)]
        target: PathBuf,

        /// Output as JSON for scripting
        #[arg(long)]
        json: bool,
    },
}

/// Flags for the sync command. Every setting is optional here so that a
/// config file can supply it instead.
#[derive(Args, Debug, Clone, Default, PartialEq, Eq)]
pub struct SyncArgs {
    /// Config file (.toml or .json); flags override its values
    #[arg(short, long, env = "MEDIA_MIRROR_CONFIG")]
    pub config: Option<PathBuf>,

    /// Source directory
    #[arg(short, long)]
    pub source: Option<PathBuf>,

    /// Target directory
    #[arg(short, long)]
    pub target: Option<PathBuf>,

    /// Comma-separated audio source extensions [default: mp3,flac,opus]
    #[arg(long, value_delimiter = ',')]
    pub source_audio_extensions: Option<Vec<String>>,

    /// Comma-separated image source extensions [default: jpg,jpeg,png,gif]
    #[arg(long, value_delimiter = ',')]
    pub source_image_extensions: Option<Vec<String>>,

    /// Extension for produced audio files [default: opus]
    #[arg(long)]
    pub target_audio_extension: Option<String>,

    /// Extension for produced image files [default: jpeg]
    #[arg(long)]
    pub target_image_extension: Option<String>,

    /// Command template for audio, with $INPUT and $OUTPUT placeholders
    #[arg(long, visible_alias = "ffmpeg-audio")]
    pub audio_command: Option<String>,

    /// Command template for images, with $INPUT and $OUTPUT placeholders
    #[arg(long, visible_alias = "ffmpeg-image")]
    pub image_command: Option<String>,

    /// Delete target files no longer produced from the source
    #[arg(long, overrides_with = "no_delete_removed")]
    pub delete_removed: bool,

    /// Keep orphaned target files even if the config file enables deletion
    #[arg(long, overrides_with = "delete_removed")]
    pub no_delete_removed: bool,

    /// Regex of source-relative paths to always include (repeatable)
    #[arg(long)]
    pub include: Vec<String>,

    /// Regex of source-relative paths to exclude (repeatable)
    #[arg(long)]
    pub exclude: Vec<String>,

    /// Show what would happen without changing anything
    #[arg(long)]
    pub dry_run: bool,

    /// Output the run report as JSON
    #[arg(long)]
    pub json: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn verify_cli() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }

    #[test]
    fn parses_original_flag_aliases() {
        let cli = Cli::try_parse_from([
            "media-mirror",
            "sync",
            "--source",
            "/music",
            "--target",
            "/sd",
            "--ffmpeg-audio",
            "ffmpeg -i $INPUT $OUTPUT",
            "--source-audio-extensions",
            "mp3,flac",
            "--delete-removed",
        ])
        .unwrap();

        let Commands::Sync(args) = cli.command else {
            panic!("expected sync");
        };
        assert_eq!(args.audio_command.as_deref(), Some("ffmpeg -i $INPUT $OUTPUT"));
        assert_eq!(
            args.source_audio_extensions,
            Some(vec!["mp3".to_string(), "flac".to_string()])
        );
        assert!(args.delete_removed);
    }

    #[test]
    fn last_deletion_flag_wins() {
        let parse = |flags: &[&str]| {
            let cli = Cli::try_parse_from(["media-mirror", "sync"].iter().chain(flags)).unwrap();
            let Commands::Sync(args) = cli.command else {
                panic!("expected sync");
            };
            (args.delete_removed, args.no_delete_removed)
        };

        assert_eq!(parse(&["--delete-removed", "--no-delete-removed"]), (false, true));
        assert_eq!(parse(&["--no-delete-removed", "--delete-removed"]), (true, false));
        assert_eq!(parse(&[]), (false, false));
    }

    #[test]
    fn include_and_exclude_repeat() {
        let cli = Cli::try_parse_from([
            "media-mirror",
            "sync",
            "--exclude",
            "a",
            "--exclude",
            "b",
            "--include",
            "c",
        ])
        .unwrap();

        let Commands::Sync(args) = cli.command else {
            panic!("expected sync");
        };
        assert_eq!(args.exclude, vec!["a", "b"]);
        assert_eq!(args.include, vec!["c"]);
    }

    #[test]
    fn subcommand_is_required() {
        assert!(Cli::try_parse_from(["media-mirror"]).is_err());
    }
}
