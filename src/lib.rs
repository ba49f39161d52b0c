//! Boot-loader modules list library.
//!
//! This library provides the components of the `bl-modules` tool, which packs
//! module files into one blob for the boot loader.
//! It is organized into several modules:
//! - `config`: CLI configuration.
//! - `format`: On-disk headers and magic constants.
//! - `packer`: Serialization of modules into a modules list.
//! - `reader`: Walking and validating a packed modules list.
//! - `source`: Loading module payload files.
//! - `writer`: Output destinations.

pub mod config;
pub mod format;
pub mod packer;
pub mod reader;
pub mod source;
pub mod utils;
pub mod writer;

pub use packer::{pack, Packer};
pub use reader::{Module, ModuleList};
