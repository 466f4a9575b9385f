//! mdocx: Markdown to Word conversion
//!
//! A library and terminal front-end for turning markdown files into `.docx`
//! documents, with style sanitizing, output path resolution, watch mode and
//! a step-by-step wizard.

pub mod cli;
pub mod pipeline;
pub mod report;
pub mod utils;
