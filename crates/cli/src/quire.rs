//! quire - convert text across the UTF-8 / wide-string boundary
//!
//! A command line tool for inspecting how text crosses into the PDF
//! library's UTF-16 representation, validating UTF-8 input, and listing
//! the exported constant tables.

use anyhow::{Context, Result, bail};
use clap::{ArgAction, Parser, Subcommand, ValueEnum};
use quire_core::{Registry, UString, to_internal};
use serde::Serialize;
use std::fs;
use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

/// Byte order mark at the start of a PDF text string.
const UTF16_BOM: u16 = 0xFEFF;

/// How `encode` prints code units.
#[derive(Debug, Clone, Copy, ValueEnum, Default)]
enum UnitFormat {
    /// Four hex digits per unit (default)
    #[default]
    Hex,
    /// Decimal unit values
    Units,
    /// JSON object with the text and its units
    Json,
}

#[derive(Parser, Debug)]
#[command(name = "quire")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Use debug logging level
    #[arg(short = 'd', long, action = ArgAction::SetTrue, global = true)]
    debug: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Show the UTF-16 code units of TEXT
    Encode {
        text: String,

        /// Output format
        #[arg(short = 'f', long, value_enum, default_value = "hex")]
        format: UnitFormat,

        /// Prefix the units with a byte order mark, as in a PDF text string
        #[arg(long, action = ArgAction::SetTrue)]
        bom: bool,
    },
    /// Decode big-endian UTF-16 hex (whitespace ignored) to UTF-8 text
    Decode {
        hex: Vec<String>,

        /// Drop a leading byte order mark instead of decoding it as U+FEFF
        #[arg(long, action = ArgAction::SetTrue)]
        bom: bool,
    },
    /// Check that FILE (or stdin, with "-") is well-formed UTF-8
    Check {
        #[arg(default_value = "-")]
        file: PathBuf,
    },
    /// List the exported enum tables and functions
    Constants {
        /// Emit JSON instead of text
        #[arg(long, action = ArgAction::SetTrue)]
        json: bool,

        /// Only list this table
        #[arg(short = 't', long)]
        table: Option<String>,
    },
}

fn init_logging(debug: bool) {
    let filter = if debug {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_env("QUIRE_LOG").unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

#[derive(Serialize)]
struct Encoded<'a> {
    text: &'a str,
    units: &'a [u16],
}

fn format_units(units: &[u16], format: UnitFormat, text: &str) -> Result<String> {
    Ok(match format {
        UnitFormat::Hex => units
            .iter()
            .map(|u| format!("{u:04x}"))
            .collect::<Vec<_>>()
            .join(" "),
        UnitFormat::Units => units
            .iter()
            .map(u16::to_string)
            .collect::<Vec<_>>()
            .join(" "),
        UnitFormat::Json => serde_json::to_string(&Encoded { text, units })?,
    })
}

fn encode(text: &str, format: UnitFormat, bom: bool) -> Result<String> {
    let internal = UString::from(text);
    let mut units = Vec::with_capacity(internal.len() + 1);
    if bom {
        units.push(UTF16_BOM);
    }
    units.extend_from_slice(internal.as_units());
    tracing::debug!(units = units.len(), "encoded");
    format_units(&units, format, text)
}

fn decode(hex_parts: &[String], strip_bom: bool) -> Result<UString> {
    let digits: String = hex_parts
        .iter()
        .flat_map(|part| part.chars())
        .filter(|c| !c.is_whitespace())
        .collect();
    if digits.len() % 4 != 0 {
        bail!(
            "expected a whole number of 16-bit units, got {} hex digits",
            digits.len()
        );
    }
    let bytes = hex::decode(&digits).context("invalid hex input")?;
    let mut units: Vec<u16> = bytes
        .chunks_exact(2)
        .map(|pair| u16::from_be_bytes([pair[0], pair[1]]))
        .collect();
    if strip_bom && units.first() == Some(&UTF16_BOM) {
        units.remove(0);
    }
    Ok(UString::from_utf16(&units)?)
}

fn read_input(file: &Path) -> Result<Vec<u8>> {
    if file.as_os_str() == "-" {
        let mut buf = Vec::new();
        io::stdin()
            .read_to_end(&mut buf)
            .context("failed to read stdin")?;
        Ok(buf)
    } else {
        fs::read(file).with_context(|| format!("failed to read {}", file.display()))
    }
}

fn check(bytes: &[u8]) -> Result<String> {
    let internal = to_internal(bytes)?;
    Ok(format!(
        "ok: {} bytes, {} characters, {} code units",
        bytes.len(),
        internal.char_count(),
        internal.len()
    ))
}

fn write_constants<W: Write>(out: &mut W, registry: &Registry, table: Option<&str>) -> Result<()> {
    let mut matched = false;
    for t in registry.enums() {
        if table.is_some_and(|name| name != t.name) {
            continue;
        }
        matched = true;
        writeln!(out, "{}", t.name)?;
        for c in &t.constants {
            writeln!(out, "  {} = {}", c.name, c.value)?;
        }
    }
    if let Some(name) = table {
        if !matched {
            bail!("unknown table: {name}");
        }
        return Ok(());
    }
    writeln!(out, "functions")?;
    for f in registry.functions() {
        writeln!(out, "  {}{}  {}", f.name, f.signature, f.summary)?;
    }
    writeln!(out, "deprecated aliases")?;
    for a in registry.aliases() {
        writeln!(out, "  {} -> {}.{}", a.name, a.table, a.target)?;
    }
    Ok(())
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_logging(args.debug);

    let stdout = io::stdout();
    let mut out = stdout.lock();

    match args.command {
        Command::Encode { text, format, bom } => {
            writeln!(out, "{}", encode(&text, format, bom)?)?;
        }
        Command::Decode { hex, bom } => {
            writeln!(out, "{}", decode(&hex, bom)?)?;
        }
        Command::Check { file } => {
            let bytes = read_input(&file)?;
            let summary =
                check(&bytes).with_context(|| format!("{} is not valid UTF-8", file.display()))?;
            writeln!(out, "{summary}")?;
        }
        Command::Constants { json, table } => {
            let registry = quire_core::init();
            registry.validate()?;
            if json {
                match table.as_deref() {
                    Some(name) => {
                        let t = registry
                            .table(name)
                            .with_context(|| format!("unknown table: {name}"))?;
                        serde_json::to_writer_pretty(&mut out, t)?;
                    }
                    None => serde_json::to_writer_pretty(&mut out, &registry)?,
                }
                writeln!(out)?;
            } else {
                write_constants(&mut out, &registry, table.as_deref())?;
            }
        }
    }

    Ok(())
}
