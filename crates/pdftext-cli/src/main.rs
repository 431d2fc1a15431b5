mod cli;
mod shared;
mod text_cmd;
mod tokens_cmd;

use clap::Parser;
use cli::Cli;

fn main() {
    let cli = Cli::parse();
    shared::init_logging(cli.verbose);

    let result = match cli.command {
        cli::Commands::Text {
            ref files,
            ref format,
            two_byte,
            ref limits,
        } => text_cmd::run(files, format, two_byte, limits.to_options()),
        cli::Commands::Tokens {
            ref file,
            commands,
            ref limits,
        } => tokens_cmd::run(file, commands, limits.to_options()),
    };

    if let Err(code) = result {
        std::process::exit(code);
    }
}
