mod checksum;
mod codec;
mod errors;
mod lifecycle;
mod messages;
mod resolver;
mod session;
mod stats;
mod transport;

use clap::error::ErrorKind;
use clap::{ArgAction, Parser};
use errors::PingError;
use lifecycle::Lifecycle;
use log::warn;
use session::{Session, SessionConfig};
use stats::Report;
use std::io;
use std::process::{self, ExitCode};
use transport::RawSocketTransport;

#[derive(Parser, Debug)]
#[command(version, about = "Send ICMP echo requests to a host", long_about = None)]
#[command(disable_help_flag = true)]
struct Args {
    /// Verbose output (adds icmp_seq and ttl to every reply)
    #[arg(short, long)]
    verbose: bool,

    /// Display this help message
    #[arg(short = '?', long, action = ArgAction::Help)]
    help: Option<bool>,

    /// IP address or hostname to ping
    destination: String,
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let args = match Args::try_parse() {
        Ok(args) => args,
        Err(e) => {
            let _ = e.print();
            return match e.kind() {
                ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => ExitCode::SUCCESS,
                _ => ExitCode::FAILURE,
            };
        }
    };

    match ping(&args) {
        Ok(_) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{}", e);
            ExitCode::FAILURE
        }
    }
}

fn ping(args: &Args) -> Result<Report, PingError> {
    let lifecycle = Lifecycle::init();
    if let Err(e) = lifecycle.install_interrupt_handler() {
        warn!("unable to install interrupt handler: {}", e);
    }

    let destination = resolver::resolve(&args.destination)?;
    let transport = RawSocketTransport::open(destination)?;

    // replies are matched on the low 16 bits of the pid
    let identifier = process::id() as u16;
    let config = SessionConfig { verbose: args.verbose, ..SessionConfig::default() };

    let mut session = Session::new(args.destination.clone(), destination, identifier, transport,
                                   lifecycle, config, io::stdout());
    session.run()
}
