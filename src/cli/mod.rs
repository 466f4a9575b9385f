//! CLI module - argument parsing, the interactive wizard and its file browser

mod args;
pub mod browser;
pub mod wizard;

pub use args::Cli;
pub use browser::FileBrowser;
pub use wizard::{run_wizard, WizardResult};
