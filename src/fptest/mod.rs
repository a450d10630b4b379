//! A harness for the test vectors in `testdata/*.fptest`.
//!
//! Each non-directive line is a case:
//!
//! ```text
//! name parse "input" -> 0xBITS
//! name parse "input" -> error
//! name render 0xBITS -> "output"
//! ```

#![cfg(test)]

use std::{error, fmt};

use anyhow::{anyhow, bail, Context, Result};

use crate::{
    atof::parse_number_f64,
    conv::Buffer,
    ctx::{ParseOptions, RenderOptions},
};

mod parse;

#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub struct Case<'a> {
    pub line: usize,
    pub name: &'a str,
    pub precision: u32,
    pub parse_options: ParseOptions,
    pub render_options: RenderOptions,
    pub op: Op<'a>,
}

impl Case<'_> {
    pub fn run(&self) -> Result<(), Failure<'_>> {
        self.try_run().map_err(|err| Failure { case: self, err })
    }

    fn try_run(&self) -> Result<()> {
        match self.op {
            Op::Parse { input, output } => {
                let got = parse_number_f64(input.as_bytes(), self.parse_options);
                match (got, output) {
                    (Ok(got), Some(want)) if got.to_bits() == want => Ok(()),
                    (Ok(got), Some(want)) => {
                        Err(anyhow!("got {:#018X}, expected {want:#018X}", got.to_bits()))
                    }
                    (Ok(got), None) => Err(anyhow!("got {:#018X}, expected error", got.to_bits())),
                    (Err(_), None) => Ok(()),
                    (Err(err), Some(_)) => Err(anyhow!("unexpected error: {err}")),
                }
            }
            Op::Render { input, output } => {
                let x = f64::from_bits(input);
                let mut buf = Buffer::new();
                let got = buf.format(x, self.precision, self.render_options);
                if got != output {
                    bail!("got \"{got}\", expected \"{output}\"");
                }
                Ok(())
            }
        }
    }
}

impl fmt::Display for Case<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} (line {}) {}", self.name, self.line, self.op)
    }
}

#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum Op<'a> {
    /// Parse text. `None` means it should fail.
    Parse { input: &'a str, output: Option<u64> },
    /// Render the bits of an `f64`.
    Render { input: u64, output: &'a str },
}

impl<'a> Op<'a> {
    fn parse(s: &'a str) -> Result<Self> {
        let (name, s) = s.split_once(' ').context("unable to split op name")?;
        let (input, output) = s
            .rsplit_once("->")
            .with_context(|| format!("unable to parse `{name}`"))?;
        let (input, output) = (input.trim(), output.trim());
        let op = match name {
            "parse" => Self::Parse {
                input: parse::unquote(input)?,
                output: match output {
                    "error" => None,
                    _ => Some(parse::parse_bits(output)?),
                },
            },
            "render" => Self::Render {
                input: parse::parse_bits(input)?,
                output: parse::unquote(output)?,
            },
            _ => bail!("unknown op: `{name}`"),
        };
        Ok(op)
    }
}

impl fmt::Display for Op<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Parse {
                input,
                output: Some(bits),
            } => write!(f, "parse \"{input}\" -> {bits:#018X}"),
            Self::Parse {
                input,
                output: None,
            } => write!(f, "parse \"{input}\" -> error"),
            Self::Render { input, output } => {
                write!(f, "render {input:#018X} -> \"{output}\"")
            }
        }
    }
}

/// A test case failure.
pub struct Failure<'a> {
    case: &'a Case<'a>,
    err: anyhow::Error,
}

impl error::Error for Failure<'_> {}

impl fmt::Display for Failure<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "test failure for `{}`: {:#}", self.case, self.err)
    }
}

impl fmt::Debug for Failure<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(self, f)
    }
}

fn run_file(s: &str) {
    let cases = parse::parse(s).unwrap();
    let failures: Vec<_> = cases.iter().filter_map(|c| c.run().err()).collect();
    for failure in &failures {
        println!("{failure}");
    }
    assert!(
        failures.is_empty(),
        "{} of {} cases failed",
        failures.len(),
        cases.len()
    );
}

#[test]
fn test_parse_vectors() {
    run_file(include_str!("../../testdata/parse.fptest"));
}

#[test]
fn test_render_vectors() {
    run_file(include_str!("../../testdata/render.fptest"));
}
