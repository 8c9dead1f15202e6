use clap::{Parser, Subcommand};

mod analyze;
mod auto_play;

#[derive(Debug, Clone, Parser)]
#[command(author, version, about, long_about = None)]
pub struct CommandArgs {
    /// What mode to run the program in
    #[command(subcommand)]
    mode: Mode,
}

#[derive(Debug, Clone, Subcommand)]
enum Mode {
    /// Let the AI play full games and report the results
    AutoPlay(#[clap(flatten)] auto_play::AutoPlayArg),
    /// Score a board position from a JSON file
    Analyze(#[clap(flatten)] analyze::AnalyzeArg),
}

pub fn run() -> anyhow::Result<()> {
    flexi_logger::Logger::try_with_env_or_str("info")?
        .format(flexi_logger::colored_default_format)
        .start()?;

    let args = CommandArgs::parse();
    match args.mode {
        Mode::AutoPlay(arg) => auto_play::run(&arg),
        Mode::Analyze(arg) => analyze::run(&arg),
    }
}
