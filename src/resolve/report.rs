use std::fmt;
use std::io::{self, Write};

use super::Binding;

pub const REPORT_HEADER: &str = "Error! Could not resolve the following injections:";

impl fmt::Display for Binding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.named {
            Some(tag) => write!(f, "Named({}) {}", tag, self.class),
            None => write!(f, "{}", self.class),
        }
    }
}

/// Emits the failure report: header, then one indented line per demand,
/// sorted by `(class, tag)`.
pub fn write_report(out: &mut impl Write, unsatisfied: &[Binding]) -> io::Result<()> {
    let mut sorted: Vec<&Binding> = unsatisfied.iter().collect();
    sorted.sort();
    writeln!(out, "{}", REPORT_HEADER)?;
    for binding in sorted {
        writeln!(out, "  {}", binding)?;
    }
    Ok(())
}
