use std::path::PathBuf;

use clap::Parser;

/// Terminal kanban board with local project storage
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Directory holding the board and project documents
    #[arg(short, long)]
    pub data_dir: Option<PathBuf>,

    /// Log destination: "off" or a file path (default: kanboard.log in the data directory)
    #[arg(short, long)]
    pub log: Option<String>,

    /// Enable debug logging
    #[arg(short, long)]
    pub verbose: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LogTarget {
    Off,
    File(PathBuf),
}

impl Cli {
    pub fn data_dir(&self) -> PathBuf {
        self.data_dir.clone().unwrap_or_else(default_data_dir)
    }

    pub fn log_target(&self) -> LogTarget {
        match self.log.as_deref() {
            Some("off") | Some("0") => LogTarget::Off,
            Some(path) => LogTarget::File(PathBuf::from(path)),
            None => LogTarget::File(self.data_dir().join("kanboard.log")),
        }
    }
}

fn default_data_dir() -> PathBuf {
    dirs::data_dir()
        .map(|dir| dir.join("kanboard"))
        .unwrap_or_else(|| PathBuf::from(".kanboard"))
}
