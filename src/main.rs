//! `meshconfig` binary: decodes captured configuration messages.

mod cli;

use std::process::ExitCode;

use clap::Parser;
use meshconfig::{Command, Response, composition, opcode};
use tracing::error;

fn main() -> ExitCode {
    // Applications embedding the library should install their own subscriber.
    tracing_subscriber::fmt::init();

    let cli = cli::Cli::parse();
    match run(cli.command) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!(error = %err, "decoding failed");
            ExitCode::FAILURE
        }
    }
}

fn run(command: cli::Command) -> Result<(), Box<dyn std::error::Error>> {
    match command {
        cli::Command::Opcode { payload } => {
            let bytes = hex::decode(payload.trim())?;
            let (opcode, len) = opcode::decode(&bytes)?;
            let name = match (Response::from_opcode(opcode), Command::from_opcode(opcode)) {
                (Some(response), _) => response.to_string(),
                (None, Some(command)) => command.to_string(),
                (None, None) => "unknown".to_owned(),
            };
            println!("opcode {opcode} ({len} bytes): {name}");
            if opcode.get() != opcode.reliable().get() {
                println!("unreliable flag set");
            }
        }
        cli::Command::Composition { payload, strict } => {
            let bytes = hex::decode(payload.trim())?;
            let (data, remainder) = composition::decode_with_remainder(&bytes)?;
            if strict && remainder > 0 {
                return Err(format!("{remainder} trailing bytes after the last element").into());
            }
            println!(
                "company {:#06x} product {:#06x} version {:#06x} replay cache {}",
                data.company_id, data.product_id, data.version_id, data.crpl
            );
            println!("features {:?}", data.features);
            for (index, element) in data.elements.iter().enumerate() {
                println!("element {index} location {:#06x}", element.location);
                for model in &element.sig_models {
                    println!("  sig model {model:#06x}");
                }
                for model in &element.vendor_models {
                    println!("  vendor model {model:#010x}");
                }
            }
        }
    }
    Ok(())
}
