//! Interactive fallbacks for values not given on the command line.

use std::io::{self, BufRead, Write};

use anyhow::{Context as _, Result, bail};

/// Use `value` if given, otherwise ask for `label` on the terminal.
pub fn or_prompt(value: Option<String>, label: &str) -> Result<String> {
  match value {
    Some(v) => Ok(v),
    None => prompt(label),
  }
}

pub fn prompt(label: &str) -> Result<String> {
  read_field(&mut io::stdin().lock(), &mut io::stdout().lock(), label)
}

/// Write `"{label}: "` to `output` and read one answer line from `input`.
///
/// The line terminator (`\n` or `\r\n`) is dropped. End of input before any
/// answer is an error rather than an empty value.
fn read_field(
  input: &mut impl BufRead,
  output: &mut impl Write,
  label: &str,
) -> Result<String> {
  write!(output, "{label}: ")?;
  output.flush()?;

  let mut line = String::new();
  let read = input
    .read_line(&mut line)
    .with_context(|| format!("reading {label}"))?;
  if read == 0 {
    bail!("input closed before {label} was entered");
  }

  let answer = line.strip_suffix('\n').unwrap_or(&line);
  Ok(answer.strip_suffix('\r').unwrap_or(answer).to_owned())
}
