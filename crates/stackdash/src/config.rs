//! Application configuration from CLI flags and environment.

use std::path::PathBuf;

use clap::{Parser, ValueEnum};

use stackdash_tui::PageKind;

/// stackdash: a terminal dashboard for infrastructure modules.
#[derive(Parser, Debug)]
#[command(name = "stackdash", version, about)]
pub struct AppConfig {
    /// Directory searched for modules.
    #[arg(short, long, default_value = ".", env = "STACKDASH_WORKDIR")]
    pub workdir: PathBuf,

    /// Page shown on startup.
    #[arg(short, long, value_enum, default_value_t = FirstPage::Modules)]
    pub first_page: FirstPage,

    /// Log level or filter directives. RUST_LOG takes precedence.
    #[arg(short, long, default_value = "info", env = "STACKDASH_LOG_LEVEL")]
    pub log_level: String,

    /// Also write logs to this file.
    #[arg(long)]
    pub log_file: Option<PathBuf>,

    /// Dump every processed message to messages.log.
    #[arg(long)]
    pub debug: bool,

    /// JSON file overriding the default colors.
    #[arg(long)]
    pub theme: Option<PathBuf>,

    /// Generate shell completion.
    #[arg(long, value_enum)]
    pub completion: Option<clap_complete::Shell>,
}

impl AppConfig {
    /// Parse CLI arguments.
    #[must_use]
    pub fn parse() -> Self {
        <Self as Parser>::parse()
    }
}

/// Pages that can be shown on startup.
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum FirstPage {
    Modules,
    Workspaces,
    Runs,
    Tasks,
    Logs,
}

impl FirstPage {
    #[must_use]
    pub fn kind(self) -> PageKind {
        match self {
            Self::Modules => PageKind::ModuleList,
            Self::Workspaces => PageKind::WorkspaceList,
            Self::Runs => PageKind::RunList,
            Self::Tasks => PageKind::TaskList,
            Self::Logs => PageKind::LogList,
        }
    }
}
