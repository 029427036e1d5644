use super::app_config::LogLevel;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Command-line arguments.
#[derive(Debug, Parser)]
#[command(
    name = "dbthumb",
    version,
    about = "Tiny inline thumbnails for CMS featured images",
    long_about = None
)]
pub struct CliArgs {
    /// Configuration file path.
    #[arg(short, long, value_name = "PATH", global = true)]
    pub config: Option<PathBuf>,

    /// Log file path.
    #[arg(long, value_name = "PATH", global = true)]
    pub log_path: Option<PathBuf>,

    /// Log verbosity level.
    #[arg(long, value_enum, global = true)]
    pub log_level: Option<LogLevel>,

    /// Directory of payload files.
    #[arg(long, value_name = "DIR", global = true)]
    pub cache_dir: Option<PathBuf>,

    /// Options file path.
    #[arg(long, value_name = "PATH", global = true)]
    pub state_path: Option<PathBuf>,

    /// Thumbnail edge in pixels.
    #[arg(long, global = true)]
    pub image_size: Option<u32>,

    /// JPEG quality (0-100).
    #[arg(long, global = true)]
    pub jpeg_quality: Option<u8>,

    /// Substitute well-known prefixes in stored payloads.
    #[arg(long, global = true)]
    pub compress: Option<bool>,

    /// Store payloads as files instead of metadata.
    #[arg(long, global = true)]
    pub cache_in_file: Option<bool>,

    /// Store the dominant color of each source image.
    #[arg(long, global = true)]
    pub store_color: Option<bool>,

    /// Action to run.
    #[command(subcommand)]
    pub command: Command,
}

/// CLI subcommands.
#[derive(Debug, Clone, PartialEq, Eq, Subcommand)]
pub enum Command {
    /// Render a thumbnail and print its data URI, stored size, and color.
    Render {
        /// Source image.
        image: PathBuf,
    },
    /// Compare the settings fingerprint with the persisted one.
    Check,
    /// Delete every cached thumbnail.
    ClearCache,
    /// Remove all persisted options and cached thumbnails.
    Uninstall,
}
