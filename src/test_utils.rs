// SPDX-License-Identifier: Apache-2.0
// Copyright (C) 2025 chatmark contributors

use std::fs;

pub fn do_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

pub fn load_message(name: &str) -> String {
    let file = format!("tests/messages/{name}.md");
    fs::read_to_string(&file).unwrap_or_else(|err| panic!("could not load {file}: {err}"))
}
