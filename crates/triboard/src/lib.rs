use std::io::Write;

use anyhow::{Context, Result};
use clap::Subcommand;
use triboard_common::ExiDevice;
use triboard_exi::{AmBaseboard, BaseboardConfig};

mod host;

pub use host::Host;

const DUMP_WIDTH: usize = 16;

#[derive(Debug, Clone, PartialEq, Eq, Subcommand)]
pub enum Action {
    /// Read the board identification bytes.
    Id,
    /// Hex dump part of the backup store.
    Read {
        #[arg(long, value_parser = parse_u16)]
        offset: u16,
        #[arg(long, default_value_t = 16)]
        len: usize,
    },
    /// Write bytes into the backup store.
    Write {
        #[arg(long, value_parser = parse_u16)]
        offset: u16,
        /// Hex bytes, e.g. `de ad be ef`.
        #[arg(required = true, value_parser = parse_byte)]
        bytes: Vec<u8>,
    },
    /// Raise the interrupt and report how long the line stays up.
    Irq,
}

pub fn run(config: &BaseboardConfig, action: Action) -> Result<()> {
    let path = config.backup_path();
    let device = AmBaseboard::open(config)
        .with_context(|| format!("session '{}'", config.session_id))?;
    log::info!("Backup store: '{}'", path.display());

    let mut host = Host::new(device);
    let stdout = std::io::stdout();
    execute(&mut host, action, &mut stdout.lock())?;
    host.into_device()
        .close()
        .with_context(|| format!("closing '{}'", path.display()))?;
    Ok(())
}

pub fn execute<D, W>(host: &mut Host<D>, action: Action, out: &mut W) -> Result<()>
where
    D: ExiDevice,
    D::Error: std::error::Error + Send + Sync + 'static,
    W: Write,
{
    match action {
        Action::Id => {
            let id = host.identify()?;
            writeln!(out, "{}", hex(&id))?;
        }
        Action::Read { offset, len } => {
            let bytes = host.read_at(offset, len)?;
            for (row, chunk) in bytes.chunks(DUMP_WIDTH).enumerate() {
                let address = usize::from(offset) + row * DUMP_WIDTH;
                writeln!(out, "{:04x}: {}", address, hex(chunk))?;
            }
        }
        Action::Write { offset, bytes } => {
            host.write_at(offset, &bytes)?;
            writeln!(out, "wrote {} bytes at {:04x}", bytes.len(), offset)?;
        }
        Action::Irq => {
            host.raise_interrupt()?;
            let mut polls = 0;
            while host.poll_interrupt() {
                polls += 1;
            }
            let status = host.interrupt_status()?;
            host.clear_interrupt_status()?;
            writeln!(out, "irq held for {} polls, status {:02x}", polls, status)?;
        }
    }
    Ok(())
}

fn hex(bytes: &[u8]) -> String {
    bytes
        .iter()
        .map(|b| format!("{:02x}", b))
        .collect::<Vec<_>>()
        .join(" ")
}

/// Decimal, or hexadecimal with a `0x` prefix.
pub fn parse_u16(s: &str) -> Result<u16, String> {
    let parsed = match s.strip_prefix("0x").or_else(|| s.strip_prefix("0X")) {
        Some(digits) => u16::from_str_radix(digits, 16),
        None => s.parse(),
    };
    parsed.map_err(|e| format!("invalid offset '{}': {}", s, e))
}

pub fn parse_byte(s: &str) -> Result<u8, String> {
    let digits = s.trim_start_matches("0x");
    u8::from_str_radix(digits, 16).map_err(|e| format!("invalid byte '{}': {}", s, e))
}
