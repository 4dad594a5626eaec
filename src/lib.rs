//! OnlyR - simple audio recorder
//!
//! Records from an input device to MP3 or WAV files, one numbered track per
//! recording, filed in dated folders under a configurable root.
//!
//! # Architecture
//!
//! The crate follows hexagonal (ports & adapters) architecture:
//!
//! - **Domain**: Options, recording session state, folder layout and errors
//! - **Application**: Ports, the options service, the two pages and the shell
//!   that coordinates navigation and shutdown
//! - **Infrastructure**: Adapter implementations (cpal capture, TOML options,
//!   platform file manager, logging)
//! - **CLI**: Argument parsing, subcommands and the interactive session

pub mod application;
pub mod cli;
pub mod domain;
pub mod infrastructure;
