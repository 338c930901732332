// SPDX-License-Identifier: Apache-2.0
// Copyright (C) 2025 chatmark contributors

use chatmark::cli::Config;
use clap::Parser;

fn main() {
    let config = Config::parse();
    env_logger::Builder::new()
        .filter_level(config.verbosity().log_level_filter())
        .init();
    chatmark::cli::run(config)
}
