use clap::{Parser, Subcommand};
use testread_core::cli;
use testread_core::cli::conf::ConfigCmd;
use testread_core::cli::read::ReadArgs;
use testread_core::logging::init_logging;

#[derive(Parser, Debug)]
#[command(
    name = "testread",
    version,
    about = "testread: group a connector's test-read messages into slices and pages"
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Group a protocol message stream into a stream read result
    Read(ReadArgs),

    /// Reader configuration tooling
    Config {
        #[command(subcommand)]
        cmd: ConfigCmd,
    },
}

fn main() {
    let cli = Cli::parse();
    init_logging();

    let result = match cli.command {
        Command::Read(args) => cli::read::run_read(args),
        Command::Config { cmd } => match cmd {
            ConfigCmd::Check { path, plain } => cli::conf::check(path, plain),
            ConfigCmd::Dump { path, json } => cli::conf::dump(path, json),
        },
    };

    if let Err(e) = result {
        eprintln!("testread error: {e:#}");
        std::process::exit(1);
    }
}
