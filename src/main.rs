use clap::Parser;
use sharelock::cli::{Cli, Commands};

fn main() {
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Create {
            ref title,
            ref file,
            shares,
            threshold,
        } => sharelock::cli::commands::create::execute(
            &cli,
            title,
            file.as_deref(),
            shares,
            threshold,
        ),
        Commands::Open { ref id } => sharelock::cli::commands::open::execute(&cli, id),
        Commands::Unlock { ref id, ref shares } => {
            sharelock::cli::commands::unlock::execute(&cli, id, shares)
        }
        Commands::Reshare { ref id } => sharelock::cli::commands::reshare::execute(&cli, id),
        Commands::List => sharelock::cli::commands::list::execute(&cli),
        #[cfg(feature = "audit-log")]
        Commands::Audit { last, ref since } => {
            sharelock::cli::commands::audit_cmd::execute(&cli, last, since.as_deref())
        }
        Commands::Version => sharelock::cli::commands::version::execute(),
        Commands::Completions { shell } => sharelock::cli::commands::completions::execute(shell),
    };

    if let Err(e) = result {
        sharelock::cli::output::error(&e.to_string());
        std::process::exit(1);
    }
}
