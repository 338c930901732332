// SPDX-License-Identifier: Apache-2.0
// Copyright (C) 2025 chatmark contributors

//! Drives the command-line program.

use crate::claims::strip_unproven_community_claims;
use crate::community::parse_community_inspiration;
use crate::conf;
use crate::inline::Theme;
use crate::markdown::{Block, parse_blocks, render_html, render_terminal, repair_planning_markdown};
use crate::message::{MessageKind, parse_message};
use crate::script::parse_script;
use clap::{Args, Parser, Subcommand};
use clap_verbosity_flag::Verbosity;
use log::debug;
use serde::Serialize;
use std::path::PathBuf;
use std::{fs, io, process};
use thiserror::Error;

/// Things that can go wrong while running the program.
#[derive(Debug, Error)]
pub enum Error {
    /// The message could not be read.
    #[error("could not read message: {0}")]
    Io(#[from] io::Error),

    /// The parsed message could not be written as JSON.
    #[error("could not write JSON: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, Error>;

/// Prints `message` to stderr and exits with `error_code`.
pub fn die(error_code: i32, message: &str) -> ! {
    eprintln!("{message}");
    process::exit(error_code);
}

/// Program configuration.
#[derive(Debug, Parser)]
#[command(version)]
#[command(about = "Parses assistant chat messages into structured content", long_about = None)]
pub struct Config {
    #[command(flatten)]
    verbosity: Verbosity,

    #[command(subcommand)]
    command: Command,
}

impl Config {
    pub fn verbosity(&self) -> Verbosity {
        self.verbosity
    }
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Parse a message into Markdown blocks, printed as JSON
    Blocks(PlanningInput),

    /// Render a message as an HTML fragment
    Html {
        #[command(flatten)]
        input: PlanningInput,

        /// Color theme for inline spans [default: $CHATMARK_THEME]
        #[arg(long, value_enum)]
        theme: Option<Theme>,
    },

    /// Render a message for the terminal
    Show {
        #[command(flatten)]
        input: PlanningInput,

        /// Wrap text to this many columns [default: $CHATMARK_WIDTH or terminal width]
        #[arg(short, long)]
        width: Option<usize>,
    },

    /// Parse a tagged video script, printed as JSON
    Script(Input),

    /// Parse community inspiration cards, printed as JSON
    Cards(Input),

    /// Remove unproven claims about community posts
    Sanitize {
        #[command(flatten)]
        input: Input,

        /// The message is shown alongside real community posts
        #[arg(long, default_value_t = false)]
        evidence: bool,
    },

    /// Parse a message with whichever parser recognizes it, printed as JSON
    #[clap(alias = "p")]
    Parse(PlanningInput),

    /// Repair a planning message and print the repaired Markdown
    Repair(Input),
}

impl Command {
    fn input(&self) -> &Input {
        match self {
            Command::Blocks(planning) | Command::Parse(planning) => &planning.input,
            Command::Html { input, .. } | Command::Show { input, .. } => &input.input,
            Command::Script(input) | Command::Cards(input) | Command::Repair(input) => input,
            Command::Sanitize { input, .. } => input,
        }
    }

    /// Produces this command's output for the message `text`.
    fn render(&self, text: &str) -> Result<String> {
        match self {
            Command::Blocks(planning) => to_json(&planning.blocks(text)),
            Command::Html { input, theme } => {
                let theme = theme.unwrap_or_else(conf::default_theme);
                Ok(render_html(&input.blocks(text), theme))
            }
            Command::Show { input, width } => {
                let width = width.filter(|width| *width > 0).unwrap_or_else(conf::text_width);
                Ok(render_terminal(&input.blocks(text), width))
            }
            Command::Script(_) => to_json(&parse_script(text)),
            Command::Cards(_) => to_json(&parse_community_inspiration(text)),
            Command::Sanitize { evidence, .. } => Ok(strip_unproven_community_claims(text, *evidence)),
            Command::Parse(planning) => to_json(&parse_message(text, planning.kind())),
            Command::Repair(_) => Ok(repair_planning_markdown(text)),
        }
    }
}

/// Where to read the message from.
#[derive(Args, Debug)]
struct Input {
    /// Message file; reads stdin if omitted or "-"
    file: Option<PathBuf>,
}

impl Input {
    fn read(&self) -> Result<String> {
        match &self.file {
            Some(path) if path.as_os_str() != "-" => {
                debug!("reading message from {}", path.display());
                Ok(fs::read_to_string(path)?)
            }
            _ => {
                debug!("reading message from stdin");
                Ok(io::read_to_string(io::stdin())?)
            }
        }
    }
}

#[derive(Args, Debug)]
struct PlanningInput {
    #[command(flatten)]
    input: Input,

    /// Treat the message as a content plan and repair it before parsing
    #[arg(long, default_value_t = false)]
    planning: bool,
}

impl PlanningInput {
    fn kind(&self) -> MessageKind {
        if self.planning {
            MessageKind::Planning
        } else {
            MessageKind::General
        }
    }

    fn blocks(&self, text: &str) -> Vec<Block> {
        match self.kind() {
            MessageKind::Planning => parse_blocks(&repair_planning_markdown(text)),
            MessageKind::General => parse_blocks(text),
        }
    }
}

fn to_json(value: &impl Serialize) -> Result<String> {
    Ok(serde_json::to_string_pretty(value)?)
}

/// Runs the command-line program.
#[derive(Debug)]
pub struct Runner {
    config: Config,
}

impl Runner {
    /// Create a new program runner using the given `config`.
    pub fn new(config: Config) -> Self {
        Self { config }
    }

    /// Reads the message and returns the command's output.
    pub fn run(&self) -> Result<String> {
        let command = &self.config.command;
        let text = command.input().read()?;
        command.render(&text)
    }
}

/// Runs the program described by `config`, printing its output or dying
/// with an error message.
pub fn run(config: Config) {
    match Runner::new(config).run() {
        Ok(output) => println!("{}", output.trim_end_matches('\n')),
        Err(err) => die(1, &err.to_string()),
    }
}
