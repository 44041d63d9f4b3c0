use clap::{value_parser, Arg, ArgAction, Command as ClapCommand};
use log::{error, LevelFilter};
use std::process;

use volumetiff::commands::{CommandFactory, VolumeCommandFactory};
use volumetiff::utils::logger::Logger;

fn main() {
    let matches = ClapCommand::new("volumetiff")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Decode scientific TIFF stacks (OME-TIFF, ImageJ) into 3D volumes")
        .arg(
            Arg::new("input")
                .help("Input TIFF file")
                .required(true)
                .index(1),
        )
        .arg(
            Arg::new("verbose")
                .short('v')
                .long("verbose")
                .help("Enable verbose output")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("inspect")
                .short('i')
                .long("inspect")
                .help("Show header and IFD structure without decoding pixels")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("config")
                .long("config")
                .help("TOML file with a [decoder] table")
                .value_name("FILE")
                .required(false),
        )
        .arg(
            Arg::new("sequential")
                .long("sequential")
                .help("Decode planes one after another")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("progress")
                .long("progress")
                .help("Show a progress bar")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("slice")
                .long("slice")
                .help("Index of a slice to export")
                .value_name("Z")
                .value_parser(value_parser!(usize))
                .required(false),
        )
        .arg(
            Arg::new("slice-out")
                .long("slice-out")
                .help("Output image file for the exported slice")
                .value_name("FILE")
                .required(false),
        )
        .arg(
            Arg::new("log-file")
                .long("log-file")
                .help("Write log output to this file")
                .value_name("FILE")
                .required(false),
        )
        .get_matches();

    let level = if matches.get_flag("verbose") { LevelFilter::Debug } else { LevelFilter::Info };
    match matches.get_one::<String>("log-file") {
        Some(path) => {
            if let Err(e) = Logger::init_global_logger(path, level) {
                eprintln!("Error setting up global logger: {}", e);
                process::exit(1);
            }
        }
        None => {
            env_logger::Builder::new()
                .filter_level(level)
                .parse_default_env()
                .init();
        }
    }

    let factory = VolumeCommandFactory::new();

    match factory.create_command(&matches) {
        Ok(command) => {
            if let Err(e) = command.execute() {
                error!("Command execution error ({} phase): {}", e.phase(), e);
                eprintln!("Error: {}", e);
                process::exit(1);
            }
        }
        Err(e) => {
            error!("Failed to create command: {}", e);
            eprintln!("Error: {}", e);
            process::exit(1);
        }
    };
}
