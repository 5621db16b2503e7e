//! Converters from GO/OBO, GAF and GFF3 flat files to simplified TSV tables.

pub mod annotation;
pub mod cli;
pub mod config;
pub mod diagnostics;
pub mod domain;
pub mod error;
pub mod fs_util;
pub mod gaf;
pub mod gff;
pub mod logging;
pub mod obo;
pub mod output;
