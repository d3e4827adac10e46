use clap::Parser;
use miette::Result;
use tsp::cli::{Cli, Commands};

fn main() -> Result<()> {
    // Reset SIGPIPE to default behavior so piping to `head` exits quietly.
    #[cfg(unix)]
    {
        unsafe {
            libc::signal(libc::SIGPIPE, libc::SIG_DFL);
        }
    }
    miette::set_hook(Box::new(|_| {
        Box::new(
            miette::MietteHandlerOpts::new()
                .terminal_links(true)
                .unicode(true)
                .context_lines(2)
                .tab_width(4)
                .build(),
        )
    }))?;

    let cli = Cli::parse();
    let global = cli.global;
    tsp::core::logging::init(global.verbose, global.quiet);

    match cli.command {
        Commands::Init(args) => tsp::cli::commands::init::run(args),
        Commands::Plan(args) => tsp::cli::commands::plan::run(args, &global),
        Commands::Verdict(args) => tsp::cli::commands::verdict::run(args, &global),
        Commands::Sync(args) => tsp::cli::commands::sync::run(args, &global),
        Commands::Table(cmd) => tsp::cli::commands::tables::run(cmd, &global),
        Commands::Config(cmd) => tsp::cli::commands::config::run(cmd, &global),
        Commands::Completions(args) => tsp::cli::commands::completions::run(args),
    }
}
