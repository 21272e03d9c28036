use anyhow::{bail, Context};
use clap::{ArgAction, Parser};
use sunnyboy_rs::{
    constants::{DEFAULT_MAX_WAIT_ATTEMPTS, DEFAULT_READ_TIMEOUT_SECS, DEFAULT_SCRIPT_PATH},
    init_logger_with_verbosity, log_info, BtAddress, DisplayMode, InverterLink, LinkConfig,
    Readings, Script, SerialNumber, SessionConfig,
};
use std::path::PathBuf;
use std::time::Duration;

/// Read power production data from an SMA Sunny Boy solar inverter.
#[derive(Parser)]
#[command(name = "sbread")]
#[command(about = "Read power production data from an SMA Sunny Boy inverter over Bluetooth")]
struct Cli {
    /// Bluetooth address of the inverter, e.g. 00:80:25:A6:77:60
    #[arg(short, long)]
    address: BtAddress,

    /// Serial number of the inverter as hex bytes, e.g. s/n 2130248863 is 7E:F9:04:9F
    #[arg(short, long)]
    serial: SerialNumber,

    /// Path to the directive script file
    #[arg(long, default_value = DEFAULT_SCRIPT_PATH)]
    script: PathBuf,

    /// RFCOMM tty bound to the inverter (see rfcomm(1)), or host:port with --tcp
    #[arg(short = 'D', long, default_value = "/dev/rfcomm0")]
    device: String,

    /// Treat the device argument as a host:port TCP bridge address
    #[arg(long)]
    tcp: bool,

    /// Display total energy produced so far today (kWh) instead of current power
    #[arg(short = 'd', long)]
    energy: bool,

    /// Display both current power and energy today, e.g. 3077,13.40
    #[arg(short = 'b', long, conflicts_with = "energy")]
    both: bool,

    /// Per-read timeout on the transport, in seconds
    #[arg(short = 't', long, default_value_t = DEFAULT_READ_TIMEOUT_SECS)]
    timeout: u64,

    /// Poll attempts allowed per wait directive (0 = unbounded)
    #[arg(long, default_value_t = DEFAULT_MAX_WAIT_ATTEMPTS)]
    max_attempts: usize,

    /// Verbose messages; -vv for debug output
    #[arg(short, long, action = ArgAction::Count)]
    verbose: u8,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_logger_with_verbosity(cli.verbose);

    let display = if cli.both {
        DisplayMode::Both
    } else if cli.energy {
        DisplayMode::Energy
    } else {
        DisplayMode::Power
    };

    log_info(&format!("Inverter address:       {}", cli.address));
    log_info(&format!("Inverter serial number: {}", cli.serial));
    log_info(&format!("Reading script from:    {}", cli.script.display()));

    let text = tokio::fs::read_to_string(&cli.script)
        .await
        .with_context(|| format!("could not open script file {}", cli.script.display()))?;
    let script = Script::parse(&text)?;

    let link_config = LinkConfig {
        read_timeout: Duration::from_secs(cli.timeout),
    };
    let session_config = SessionConfig {
        display,
        max_wait_attempts: cli.max_attempts,
    };

    let readings = if cli.tcp {
        let link = InverterLink::connect_tcp(&cli.device, link_config).await?;
        sunnyboy_rs::read_inverter(link, &script, cli.address, cli.serial, session_config).await?
    } else {
        let link = InverterLink::open(&cli.device, link_config)?;
        sunnyboy_rs::read_inverter(link, &script, cli.address, cli.serial, session_config).await?
    };

    print_readings(display, &readings)
}

fn print_readings(display: DisplayMode, readings: &Readings) -> anyhow::Result<()> {
    match display {
        DisplayMode::Power => match readings.power_watts {
            Some(watts) => println!("{watts}"),
            None => bail!("script completed without extracting a power reading"),
        },
        DisplayMode::Energy => match readings.energy_today_kwh {
            Some(kwh) => println!("{kwh:.2}"),
            None => bail!("script completed without extracting an energy reading"),
        },
        DisplayMode::Both => match (readings.power_watts, readings.energy_today_kwh) {
            (Some(watts), Some(kwh)) => println!("{watts},{kwh:.2}"),
            _ => bail!("script completed without extracting both readings"),
        },
    }
    Ok(())
}
