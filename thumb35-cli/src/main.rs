mod layout;
mod script;
mod simulate;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use std::fs;

#[derive(Parser)]
#[command(name = "thumb35-cli")]
#[command(about = "Thumb35 keyboard layout and firmware simulator")]
struct Cli {
    /// More logging (-v debug, -vv trace); RUST_LOG overrides
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Command,
}

#[derive(Clone, Copy, ValueEnum)]
enum Transport {
    Wired,
    Wireless,
}

#[derive(Subcommand)]
enum Command {
    /// Render the keymap as an HTML page
    Layout {
        /// Output file, stdout if omitted
        #[arg(short, long)]
        output: Option<String>,
    },
    /// Run the firmware core against a switch script
    Simulate {
        /// Path to the script file
        script: String,
        /// Transport the simulated board uses
        #[arg(short, long, value_enum, default_value = "wired")]
        transport: Transport,
        /// How long to run from power-on, in milliseconds
        #[arg(short, long, default_value_t = 3000)]
        duration: u32,
    },
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => log::LevelFilter::Warn,
        1 => log::LevelFilter::Debug,
        _ => log::LevelFilter::Trace,
    };
    env_logger::Builder::new()
        .filter_level(level)
        .parse_default_env()
        .init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match cli.command {
        Command::Layout { output } => {
            let html = layout::generate_html();
            match output {
                Some(path) => {
                    fs::write(&path, html).with_context(|| format!("writing {}", path))?;
                    println!("Layout written to {}", path);
                }
                None => print!("{}", html),
            }
        }
        Command::Simulate {
            script,
            transport,
            duration,
        } => {
            let contents =
                fs::read_to_string(&script).with_context(|| format!("reading {}", script))?;
            let steps = script::parse_script(&contents)
                .with_context(|| format!("parsing {}", script))?;

            let link = match transport {
                Transport::Wired => simulate::Link::Wired,
                Transport::Wireless => simulate::Link::Wireless,
            };
            log::info!("{} events over {} ms", steps.len(), duration);

            for line in simulate::simulate(&steps, link, duration) {
                println!("{}", line);
            }
        }
    }

    Ok(())
}
