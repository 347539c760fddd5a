use std::path::PathBuf;

use clap::Parser;
use studydesk_types::Accent;

use crate::state::SessionOverrides;

#[derive(Parser, Debug, Default)]
#[command(name = "studydesk", about = "Always-on-top vocabulary overlay")]
pub struct Cli {
    /// Keep config, review data and audio cache under this directory
    #[arg(long, value_name = "DIR")]
    pub home: Option<PathBuf>,

    /// Directory holding dicts/index.json
    #[arg(long, value_name = "DIR")]
    pub assets: Option<PathBuf>,

    /// Dictionary to open, relative to the assets directory or absolute
    #[arg(long, value_name = "PATH")]
    pub dict: Option<String>,

    /// Start in shuffle mode
    #[arg(long)]
    pub shuffle: bool,

    /// Pronunciation accent
    #[arg(long, value_name = "uk|us")]
    pub accent: Option<Accent>,

    /// Emit logs as JSON lines
    #[arg(long)]
    pub log_json: bool,
}

impl Cli {
    pub fn overrides(&self) -> SessionOverrides {
        SessionOverrides {
            dict: self.dict.clone(),
            shuffle: self.shuffle,
            accent: self.accent,
        }
    }
}
