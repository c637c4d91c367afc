//! Command line interface for the `meshconfig` binary.
//!
//! The binary decodes captured access-layer payloads, which is handy when
//! reading daemon logs or packet traces.

use clap::{Parser, Subcommand};

/// Command line arguments for the `meshconfig` binary.
#[derive(Debug, Parser)]
#[command(
    name = "meshconfig",
    version,
    about = "Decode Bluetooth Mesh configuration messages"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

/// Decoding operations.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Decode the opcode at the start of a hex-encoded access payload.
    Opcode {
        /// Payload as hexadecimal digits, e.g. `800801`.
        payload: String,
    },
    /// Decode hex-encoded composition data, starting with the page byte.
    Composition {
        /// Parameters of a composition data status message.
        payload: String,
        /// Fail instead of ignoring trailing bytes after the last element.
        #[arg(long)]
        strict: bool,
    },
}

#[cfg(test)]
mod tests {
    use clap::Parser;

    use super::{Cli, Command};

    #[test]
    fn parses_opcode_subcommand() {
        let cli = Cli::parse_from(["meshconfig", "opcode", "8008"]);
        assert!(matches!(cli.command, Command::Opcode { payload } if payload == "8008"));
    }

    #[test]
    fn parses_strict_composition() {
        let cli = Cli::parse_from(["meshconfig", "composition", "--strict", "00"]);
        assert!(matches!(
            cli.command,
            Command::Composition { strict: true, .. }
        ));
    }
}
