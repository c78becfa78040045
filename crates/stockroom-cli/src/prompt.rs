//! Line-oriented input helpers.
//!
//! `Prompt` reads from any `BufRead` and writes prompts to any `Write`, so
//! menus run the same against a terminal or an in-memory script. Invalid
//! input is reported and asked again; end of input is an error.

use std::io::{BufRead, Write};
use std::str::FromStr;

use anyhow::{bail, Context, Result};

pub struct Prompt<R, W> {
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> Prompt<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }

    /// Writer for menu output.
    pub fn out(&mut self) -> &mut W {
        &mut self.output
    }

    /// Raw trimmed line, or `None` at end of input.
    fn line(&mut self, message: &str) -> Result<Option<String>> {
        write!(self.output, "{} ", message).context("Failed to write prompt")?;
        self.output.flush().context("Failed to flush prompt")?;

        let mut buf = String::new();
        let read = self.input.read_line(&mut buf).context("Failed to read input")?;
        if read == 0 {
            return Ok(None);
        }
        Ok(Some(buf.trim().to_string()))
    }

    fn required_line(&mut self, message: &str) -> Result<String> {
        match self.line(message)? {
            Some(line) => Ok(line),
            None => bail!("Input closed"),
        }
    }

    /// Non-empty text.
    pub fn text(&mut self, message: &str) -> Result<String> {
        loop {
            let line = self.required_line(message)?;
            if !line.is_empty() {
                return Ok(line);
            }
            writeln!(self.output, "A value is required.")?;
        }
    }

    /// Text, or `None` when left blank.
    pub fn optional_text(&mut self, message: &str) -> Result<Option<String>> {
        let line = self.required_line(message)?;
        Ok((!line.is_empty()).then_some(line))
    }

    /// Any value parsed with `FromStr`, asked again until it parses.
    pub fn number<T: FromStr>(&mut self, message: &str) -> Result<T> {
        loop {
            match self.required_line(message)?.parse() {
                Ok(value) => return Ok(value),
                Err(_) => writeln!(self.output, "Please enter a valid number.")?,
            }
        }
    }

    /// Parsed value, or `None` when left blank.
    pub fn optional_number<T: FromStr>(&mut self, message: &str) -> Result<Option<T>> {
        loop {
            let line = self.required_line(message)?;
            if line.is_empty() {
                return Ok(None);
            }
            match line.parse() {
                Ok(value) => return Ok(Some(value)),
                Err(_) => writeln!(self.output, "Please enter a valid number or leave it blank.")?,
            }
        }
    }

    /// Yes/no question.
    pub fn confirm(&mut self, message: &str) -> Result<bool> {
        loop {
            let line = self.required_line(&format!("{} (y/n):", message))?;
            match line.to_lowercase().as_str() {
                "y" | "yes" => return Ok(true),
                "n" | "no" => return Ok(false),
                _ => writeln!(self.output, "Please answer y or n.")?,
            }
        }
    }

    /// Yes/no question that may be skipped with a blank line.
    pub fn optional_flag(&mut self, message: &str) -> Result<Option<bool>> {
        loop {
            let line = self.required_line(&format!("{} (y/n, blank to skip):", message))?;
            match line.to_lowercase().as_str() {
                "" => return Ok(None),
                "y" | "yes" => return Ok(Some(true)),
                "n" | "no" => return Ok(Some(false)),
                _ => writeln!(self.output, "Please answer y, n or leave it blank.")?,
            }
        }
    }
}
