//! Pipeline module - option preparation, conversion, output and watching

pub mod config;
pub mod convert;
pub mod converter;
pub mod docx;
pub mod error;
pub mod flags;
pub mod output;
pub mod session;
pub mod style;
pub mod toc;
pub mod watch;

pub use config::{load_project_config, load_style_file, ProjectConfig, PROJECT_CONFIG_FILE};
pub use convert::*;
pub use converter::*;
pub use docx::DocxConverter;
pub use error::*;
pub use flags::*;
pub use output::*;
pub use session::*;
pub use style::{sanitize, MergedStyle, Sanitized, StyleValue};
pub use toc::*;
pub use watch::*;
