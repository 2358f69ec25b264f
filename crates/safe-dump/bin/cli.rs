use clap::{
    builder::{styling::AnsiColor, Styles},
    ArgAction, Parser, Subcommand,
};
use safe_dump::cmd::{dump::DumpCommand, list::ListCommand};
use safe_dump_cli_runner::CliRunner;
use safe_dump_version::{version_with_platform, SHORT_VERSION};
use tracing_subscriber::EnvFilter;

/// The verbosity level.
pub type Verbosity = u8;

#[derive(Debug, Parser)]
#[command(
    name = "safe-dump",
    about = "Remove yourself from your 1/1 Safe accounts in a single batched transaction.",
    version = SHORT_VERSION.as_str(),
    term_width = 80,
    styles = get_color_style()
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    #[arg(long, global = true, help = "Enable debug logging")]
    pub debug: bool,

    /// Verbosity level of the log messages.
    ///
    /// Pass multiple times to increase the verbosity (e.g. -v, -vv, -vvv).
    /// Ignored when `RUST_LOG` is set.
    #[arg(help_heading = "Display options", global = true, short, long, verbatim_doc_comment, action = ArgAction::Count)]
    verbosity: Verbosity,
}

impl Cli {
    pub fn run(self) -> eyre::Result<()> {
        self.init_tracing();

        let runner = CliRunner::default();
        match self.command {
            Commands::List(list) => runner.run_command_until_exit(|ctx| list.execute(ctx)),
            Commands::Dump(dump) => runner.run_command_until_exit(|ctx| dump.execute(ctx)),
        }
    }

    fn init_tracing(&self) {
        let level = match (self.debug, self.verbosity) {
            (true, _) => "debug",
            (false, 0) => "warn",
            (false, 1) => "info",
            (false, 2) => "debug",
            _ => "trace",
        };

        let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("warn,safe_dump={level},safe_multisig={level},multisend={level}"))
        });

        let _ = tracing_subscriber::fmt().with_env_filter(filter).with_writer(std::io::stderr).try_init();
        tracing::debug!(version = %version_with_platform(), "starting");
    }
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    #[command(name = "list")]
    List(ListCommand),

    #[command(name = "dump")]
    Dump(DumpCommand),
}

fn get_color_style() -> Styles {
    Styles::styled()
        .usage(AnsiColor::Green.on_default().bold().underline())
        .header(AnsiColor::Yellow.on_default().bold().underline())
        .literal(AnsiColor::Green.on_default())
        .placeholder(AnsiColor::Green.on_default())
}
