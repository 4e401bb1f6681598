mod data_aquisition;
mod error;
mod nxos;
mod topology;

use std::process::ExitCode;

use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

use data_aquisition::{
    core::{ConnectionTarget, DEFAULT_SSH_PORT},
    ssh::SshConnector,
};
use error::ReaderError;
use nxos::Nexus;

const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Cisco NXOS configuration reader
#[derive(Debug, Parser)]
#[command(name = "nxos-reader", about = "Cisco NXOS configuration reader")]
#[command(disable_version_flag = true)]
struct Cli {
    /// show script version
    #[arg(long)]
    version: bool,

    /// specify a connection string user@device for the HSRP active switch
    #[arg(
        short = 'm',
        long = "connect-master",
        value_name = "USER@DEVICE",
        required_unless_present = "version"
    )]
    master: Option<String>,

    /// specify a connection string user@device for the HSRP standby switch
    #[arg(
        short = 's',
        long = "connect-slave",
        value_name = "USER@DEVICE",
        required_unless_present = "version"
    )]
    slave: Option<String>,

    /// SSH port of both switches
    #[arg(short, long, default_value_t = DEFAULT_SSH_PORT)]
    port: u16,

    /// SSH password; the SSH agent is used when unset
    #[arg(long, env = "NXOS_READER_PASSWORD", hide_env_values = true)]
    password: Option<String>,

    /// Enable debug logging on stderr
    #[arg(long, default_value_t = false)]
    log: bool,
}

impl Cli {
    fn target(
        &self,
        descriptor: Option<&str>,
        option: &str,
    ) -> Result<ConnectionTarget, ReaderError> {
        let descriptor = descriptor.ok_or_else(|| {
            ReaderError::Config(format!("connection string not provided for {option}"))
        })?;
        Ok(ConnectionTarget::parse(descriptor)?
            .with_port(self.port)
            .with_password(self.password.clone()))
    }
}

fn init_logging(debug: bool) {
    let filter = if debug {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn run(cli: &Cli) -> Result<(), ReaderError> {
    let mut primary = Nexus::new(
        cli.target(cli.master.as_deref(), "--connect-master")?,
        SshConnector,
    );
    let mut secondary = Nexus::new(
        cli.target(cli.slave.as_deref(), "--connect-slave")?,
        SshConnector,
    );

    let summaries = topology::correlate(&mut primary, &mut secondary)?;
    info!("{} vlans summarized", summaries.len());
    if !secondary.is_connected() {
        info!("{} was not queried, no SVI fallback was needed", secondary.target());
    }
    topology::audit_vrfs(&mut primary, &summaries)?;

    let stdout = std::io::stdout();
    topology::write_report(&mut stdout.lock(), &summaries)?;
    Ok(())
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    if cli.version {
        println!("Script version: {}", VERSION);
        return ExitCode::SUCCESS;
    }

    init_logging(cli.log);

    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}
