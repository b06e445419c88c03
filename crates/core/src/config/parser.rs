use crate::config::directives::{Directive, parse_directive};
use crate::error::{HeraldError, Result};
use std::io::{BufRead, BufReader};
use std::path::Path;

/// Project profile parser
#[derive(Debug)]
pub struct ConfigParser;

impl ConfigParser {
    /// Parse a profile file
    pub fn parse_file<P: AsRef<Path>>(path: P) -> Result<Vec<Directive>> {
        let file = std::fs::File::open(&path)
            .map_err(|e| HeraldError::ConfigError(format!("Cannot open file {}: {}", path.as_ref().display(), e)))?;

        Self::parse_reader(BufReader::new(file))
    }

    /// Parse a profile from a reader
    pub fn parse_reader<R: BufRead>(reader: R) -> Result<Vec<Directive>> {
        let mut directives = Vec::new();

        for (index, line) in reader.lines().enumerate() {
            let line_number = index + 1;
            let line =
                line.map_err(|e| HeraldError::ConfigError(format!("Read error at line {}: {}", line_number, e)))?;

            if let Some(directive) = Self::parse_line(&line, line_number)? {
                directives.push(directive);
            }
        }

        Ok(directives)
    }

    /// Parse a profile from a string
    pub fn parse_string(content: &str) -> Result<Vec<Directive>> {
        let mut directives = Vec::new();

        for (index, line) in content.lines().enumerate() {
            if let Some(directive) = Self::parse_line(line, index + 1)? {
                directives.push(directive);
            }
        }

        Ok(directives)
    }

    fn parse_line(line: &str, line_number: usize) -> Result<Option<Directive>> {
        let line = line.trim();

        if line.is_empty() || line.starts_with('#') {
            return Ok(None);
        }

        match parse_directive(line) {
            Ok(directive) => Ok(Some(directive)),
            Err(HeraldError::ConfigError(message)) => Err(HeraldError::ConfigError(format!(
                "Parse error at line {}: {}",
                line_number, message
            ))),
            Err(e) => Err(e),
        }
    }
}
