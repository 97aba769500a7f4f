//! # lxbread - Luminex LXB to Flat Table Conversion
//!
//! `lxbread` reads a directory of Luminex bead-array well files (`.lxb`, one
//! FCS 3.0 list-mode file per microplate well) and produces a single row-per-bead
//! table annotated with the originating well.
//!
//! ## Pipeline
//!
//! 1. **Decode**: [`fcs::FcsFile`] parses the HEADER, TEXT and DATA segments and
//!    exposes a flat event buffer plus the channel metadata dictionary through the
//!    [`source::RawEventSource`] trait.
//!
//! 2. **Resolve**: [`channels::resolve_channels`] sorts the channel dictionary by
//!    its 1-based index and produces one [`channels::ChannelMapping`] per channel.
//!
//! 3. **Assemble**: [`table::EventTable`] reshapes the buffer into an
//!    events x channels matrix, labels each column with its marker and attaches the
//!    well identifier parsed from the file name.
//!
//! 4. **Aggregate**: [`dataset::aggregate_directory`] stacks every well table of a
//!    plate into a [`dataset::Dataset`], which [`dataset::write_csv`] writes out.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use lxbread::config::ConversionConfig;
//! use lxbread::dataset::{aggregate_directory, write_csv, CsvOptions};
//!
//! let config = ConversionConfig::default();
//! let dataset = aggregate_directory("plate_01/", &config)?;
//! write_csv(&dataset, "luminex_data.csv", &CsvOptions::from(&config))?;
//! # Ok::<(), lxbread::error::LxbError>(())
//! ```
//!
//! Every failure is fatal to the run: a single undecodable or badly named file
//! aborts the aggregation and no output file is produced.

pub mod channels;
pub mod config;
pub mod dataset;
pub mod error;
pub mod fcs;
pub mod source;
pub mod table;

pub use error::LxbError;

/// Version string embedded in the `info` report
pub const LXBREAD_VERSION: &str = env!("CARGO_PKG_VERSION");
