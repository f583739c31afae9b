// Copyright 2025 osdet contributors
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use osdet::commands::classifier::ClassifierCommand;
use osdet::commands::detect::DetectCommand;
use osdet::config::DetectorConfig;
use osdet::detector::RawPlatformInfo;
use osdet::error::{Result, get_exit_code};
use osdet::logging;

#[derive(Parser)]
#[command(name = "osdet")]
#[command(author, version, about = "Operating system and CPU architecture detection", long_about = None)]
struct Cli {
    /// Increase verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Args, Default)]
struct DetectionArgs {
    /// Load detection settings from a TOML file
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Publish this classifier verbatim instead of the detected one
    #[arg(long)]
    classifier: Option<String>,

    /// Fail when the OS or architecture is not recognized
    #[arg(long)]
    fail_on_unknown: bool,

    /// Release file consulted before the standard Linux sources
    #[arg(long, value_name = "FILE")]
    release_file: Option<PathBuf>,

    /// Classify this OS name instead of the current one
    #[arg(long, value_name = "NAME")]
    os_name: Option<String>,

    /// Classify this architecture instead of the current one
    #[arg(long, value_name = "ARCH")]
    os_arch: Option<String>,

    /// Use this OS version instead of the current one
    #[arg(long, value_name = "VERSION")]
    os_version: Option<String>,
}

#[derive(Subcommand)]
enum Commands {
    /// Detect the platform and print the property mapping
    Detect {
        #[command(flatten)]
        args: DetectionArgs,

        /// Print the properties as JSON
        #[arg(long)]
        json: bool,
    },

    /// Print only the detected classifier
    Classifier {
        #[command(flatten)]
        args: DetectionArgs,

        /// Prefer the release-qualified classifier when available
        #[arg(long)]
        release: bool,
    },
}

fn build_config(args: &DetectionArgs) -> Result<DetectorConfig> {
    let mut config = match &args.config {
        Some(path) => DetectorConfig::load(path)?,
        None => DetectorConfig::default(),
    };

    // Flags win over the configuration file.
    if args.classifier.is_some() {
        config.classifier = args.classifier.clone();
    }
    if args.fail_on_unknown {
        config.fail_on_unknown = true;
    }
    if args.release_file.is_some() {
        config.release_file = args.release_file.clone();
    }

    Ok(config)
}

fn build_raw(args: &DetectionArgs) -> RawPlatformInfo {
    let mut raw = RawPlatformInfo::from_env();
    if let Some(os_name) = &args.os_name {
        raw.os_name = os_name.clone();
    }
    if let Some(os_arch) = &args.os_arch {
        raw.os_arch = os_arch.clone();
    }
    if let Some(os_version) = &args.os_version {
        raw.os_version = os_version.clone();
    }
    raw
}

fn main() {
    let cli = Cli::parse();

    logging::setup_logger(cli.verbose);

    let result: Result<()> = (|| {
        match cli.command.unwrap_or(Commands::Detect {
            args: DetectionArgs::default(),
            json: false,
        }) {
            Commands::Detect { args, json } => {
                let config = build_config(&args)?;
                let raw = build_raw(&args);
                let command = DetectCommand::new(&config)?;
                command.execute(&raw, json)
            }
            Commands::Classifier { args, release } => {
                let config = build_config(&args)?;
                let raw = build_raw(&args);
                let command = ClassifierCommand::new(&config)?;
                command.execute(&raw, release)
            }
        }
    })();

    if let Err(e) = result {
        eprintln!("Error: {e}");
        std::process::exit(get_exit_code(&e));
    }
}
