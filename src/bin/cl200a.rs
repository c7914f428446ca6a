// src/bin/cl200a.rs

use anyhow::Context;
use clap::Parser;
use log::warn;

use cl200a::{detect_meter, Cl200Session, SerialPortChannel};

/// Read a Konica Minolta CL-200A chroma meter.
#[derive(Parser, Debug)]
#[command(version, about)]
struct Cli {
    /// Take a single illuminance reading and print it in lux.
    #[arg(long)]
    lux: bool,

    /// Serial port to use. Autodetects an FTDI-bridged meter when omitted.
    #[arg(long)]
    port: Option<String>,

    /// Increase log verbosity (-v debug, -vv trace).
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let level = match cli.verbose {
        0 => "info",
        1 => "debug",
        _ => "trace",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level)).init();

    let mut session = match &cli.port {
        Some(path) => {
            let channel = SerialPortChannel::open_meter(path)
                .with_context(|| format!("failed to open {path}"))?;
            Cl200Session::new(channel)
        }
        None => detect_meter().context("no CL-200A found on any serial port")?,
    };

    session.connect().context("handshake with the meter failed")?;

    if cli.lux {
        let reading = session.measure().context("measurement failed")?;
        if let Some(warning) = reading.warning {
            warn!("{warning}");
        }
        println!("{:.3}", reading.lux);
    }

    Ok(())
}
