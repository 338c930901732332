// SPDX-License-Identifier: Apache-2.0
// Copyright (C) 2025 chatmark contributors

//! Environment and configuration utilities.

use crate::inline::Theme;
use clap::ValueEnum;
use log::debug;
use std::env;

/// Names the color theme used when none is given on the command line.
pub const THEME_VAR: &str = "CHATMARK_THEME";

/// Overrides the terminal width when rendering to the terminal.
pub const WIDTH_VAR: &str = "CHATMARK_WIDTH";

/// Returns the color theme named by `$CHATMARK_THEME`.
///
/// The value is matched case-insensitively. If the variable is unset or
/// names no known theme, the default theme is used.
///
/// # Examples
///
/// ```
/// use chatmark::conf::default_theme;
/// use chatmark::inline::Theme;
/// # use temp_env::with_var;
/// # with_var("CHATMARK_THEME", Some("Inverse"), || {
/// assert_eq!(default_theme(), Theme::Inverse);
/// # });
/// ```
///
/// Unknown themes fall back to the default:
///
/// ```
/// use chatmark::conf::default_theme;
/// use chatmark::inline::Theme;
/// # use temp_env::with_var;
/// # with_var("CHATMARK_THEME", Some("solarized"), || {
/// assert_eq!(default_theme(), Theme::Default);
/// # });
/// ```
pub fn default_theme() -> Theme {
    let Ok(name) = env::var(THEME_VAR) else {
        return Theme::default();
    };

    Theme::from_str(name.trim(), true).unwrap_or_else(|_| {
        debug!("ignoring unknown theme in ${THEME_VAR}: {name:?}");
        Theme::default()
    })
}

/// Returns the width to wrap terminal output to.
///
/// This is `$CHATMARK_WIDTH` if it holds a positive integer, and the
/// width of the terminal otherwise.
///
/// # Examples
///
/// ```
/// use chatmark::conf::text_width;
/// # use temp_env::with_var;
/// # with_var("CHATMARK_WIDTH", Some("72"), || {
/// assert_eq!(text_width(), 72);
/// # });
/// ```
///
/// Zero is not a usable width, so the terminal's width is used instead:
///
/// ```
/// use chatmark::conf::text_width;
/// # use temp_env::with_var;
/// # with_var("CHATMARK_WIDTH", Some("0"), || {
/// assert_eq!(text_width(), textwrap::termwidth());
/// # });
/// ```
pub fn text_width() -> usize {
    env::var(WIDTH_VAR)
        .ok()
        .and_then(|width| width.trim().parse::<usize>().ok())
        .filter(|width| *width > 0)
        .unwrap_or_else(textwrap::termwidth)
}
