//! Numbered text menus, one per application.
//!
//! Each menu loops until its Quit option is chosen. Business outcomes are
//! printed and the menu continues; storage errors end the session.

mod inventory;
mod library;
mod school;

use std::io::{BufRead, Write};

use anyhow::{Context, Result};
use stockroom_core::{App, Inventory, Library, School, StorageConfig};

use crate::prompt::Prompt;

/// Open the services for `app` and run its menu.
pub fn run<R: BufRead, W: Write>(
    app: App,
    config: &StorageConfig,
    prompt: &mut Prompt<R, W>,
) -> Result<()> {
    let dir = config.data_dir().display().to_string();
    match app {
        App::Inventory => {
            let user = prompt.text("User name:")?;
            let inventory = Inventory::open(config)
                .with_context(|| format!("Failed to open inventory data in {}", dir))?;
            inventory::run(inventory, &user, prompt)
        }
        App::Library => {
            let library = Library::open(config)
                .with_context(|| format!("Failed to open library data in {}", dir))?;
            library::run(library, prompt)
        }
        App::School => {
            let school =
                School::open(config).with_context(|| format!("Failed to open school data in {}", dir))?;
            school::run(school, prompt)
        }
    }
}

/// Print a numbered menu and read the chosen option (1-based).
fn select<R: BufRead, W: Write>(
    prompt: &mut Prompt<R, W>,
    title: &str,
    options: &[&str],
) -> Result<usize> {
    let out = prompt.out();
    writeln!(out)?;
    writeln!(out, "========== {} ==========", title)?;
    for (i, option) in options.iter().enumerate() {
        writeln!(out, "{}. {}", i + 1, option)?;
    }
    prompt.number("Choose an option:")
}

/// Print each item or `empty` when there are none.
fn print_all<W: Write, T: std::fmt::Display>(out: &mut W, items: &[T], empty: &str) -> Result<()> {
    if items.is_empty() {
        writeln!(out, "{}", empty)?;
    }
    for item in items {
        writeln!(out, "{}", item)?;
    }
    Ok(())
}

fn invalid_option<W: Write>(out: &mut W) -> Result<()> {
    writeln!(out, "Invalid option. Try again.")?;
    Ok(())
}
