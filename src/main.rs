//! riskop CLI - Risk Index data client with offline support

use clap::Parser;
use log::LevelFilter;

use riskop::cli::{
    self, Cli, CommandContext, Commands, ConfigCommands, GlobalOptions, OfflineCommands,
};
use riskop::error::Result;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    init_logging(cli.debug);

    if let Err(err) = run(cli).await {
        eprintln!("Error: {}", err);
        std::process::exit(1);
    }
}

/// `--debug` forces debug level; otherwise RUST_LOG, defaulting to warn
fn init_logging(debug: bool) {
    let mut builder =
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn"));
    if debug {
        builder.filter_level(LevelFilter::Debug);
    }
    builder.format_timestamp(None).init();
}

async fn run(cli: Cli) -> Result<()> {
    let opts = GlobalOptions::from_cli(&cli);

    // Commands that never touch the backend or the store
    match cli.command {
        Commands::Version => {
            println!("riskop version {}", env!("CARGO_PKG_VERSION"));
            return Ok(());
        }
        Commands::Config(ConfigCommands::Show) => return cli::config::show(&opts),
        Commands::Config(ConfigCommands::Path) => return cli::config::path(&opts),
        Commands::Offline(OfflineCommands::Path) => return cli::offline::path(&opts),
        _ => {}
    }

    let ctx = CommandContext::new(&opts)?;

    match cli.command {
        Commands::Regions(cmd) => cli::regions::run(&ctx, cmd).await,
        Commands::Get { resource } => cli::records::get(&ctx, resource).await,
        Commands::Create { resource, data } => cli::records::create(&ctx, resource, data.0).await,
        Commands::Delete { resource, id } => cli::records::delete(&ctx, resource, id).await,
        Commands::Conscience(cmd) => cli::records::conscience(&ctx, cmd).await,
        Commands::Settings(cmd) => cli::records::settings(&ctx, cmd).await,
        Commands::Notify { data } => cli::records::notify(&ctx, data.0).await,
        Commands::Layout(cmd) => cli::records::layout(&ctx, cmd).await,
        Commands::Sync(cmd) => cli::sync::run(&ctx, cmd).await,
        Commands::Offline(OfflineCommands::Stats) => cli::offline::stats(&ctx),
        Commands::Offline(OfflineCommands::Clear { yes }) => cli::offline::clear(&ctx, yes),
        Commands::Version | Commands::Config(_) | Commands::Offline(OfflineCommands::Path) => {
            Ok(())
        }
    }
}
