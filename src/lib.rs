#![doc = include_str!("../README.md")]

pub mod cli;
pub mod conversion;
pub mod gwas;
pub mod plot;
pub mod report;
pub mod smart_reader;
pub mod transform;

pub use conversion::{ConversionConfig, ConversionSummary, convert_gwas_file};
