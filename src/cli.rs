use std::path::PathBuf;

use clap::{Parser, Subcommand};

#[derive(Debug, Parser)]
#[command(name = "videograb", version, about = "Cliente para el servicio de descarga de videos")]
pub struct Cli {
    /// Base URL of the downloader service
    #[arg(long, global = true)]
    pub api_base: Option<String>,

    /// Directory where downloads are saved
    #[arg(long, global = true)]
    pub output_dir: Option<PathBuf>,

    /// Proxy URL for all requests
    #[arg(long, global = true)]
    pub proxy: Option<String>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// List the formats available for a video URL
    Info { url: String },

    /// Download a video in the chosen format
    Download {
        url: String,

        /// Format id as listed by `info`
        #[arg(short, long)]
        format_id: String,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn download_takes_a_format_id() {
        let cli = Cli::parse_from(["videograb", "download", "http://example.com/v", "-f", "22"]);
        match cli.command {
            Command::Download { url, format_id } => {
                assert_eq!(url, "http://example.com/v");
                assert_eq!(format_id, "22");
            }
            _ => panic!("expected download command"),
        }
    }

    #[test]
    fn global_flags_apply_to_subcommands() {
        let cli = Cli::parse_from([
            "videograb",
            "info",
            "http://example.com/v",
            "--api-base",
            "http://10.0.0.2:9000",
        ]);
        assert_eq!(cli.api_base.as_deref(), Some("http://10.0.0.2:9000"));
    }
}
