use alertdesk::cli::{self, Cli, Commands};
use alertdesk::cli::context::{Console, GlobalOpts};
use alertdesk::cli::render;
use alertdesk::config;
use alertdesk::errors::AlertDeskError;
use clap::Parser;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    // Initialize logging
    let log_level = match cli.verbose {
        0 if cli.quiet => "error",
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(log_level));

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr);
    if cli.log_json {
        builder.json().init();
    } else {
        builder.with_ansi(!cli.no_color).init();
    }
    if cli.no_color {
        console::set_colors_enabled(false);
    }

    let opts = GlobalOpts::from(&cli);
    let result = run(cli.command, &opts).await;

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(e.exit_code());
    }
}

async fn run(command: Commands, opts: &GlobalOpts) -> Result<(), AlertDeskError> {
    match command {
        Commands::Serve(args) => return cli::serve::handle_serve(opts, args).await,
        Commands::Login(args) => return cli::session::handle_login(opts, args).await,
        Commands::Logout => return cli::session::handle_logout(opts).await,
        Commands::Validate(args) => return handle_validate(args).await,
        _ => {}
    }

    let console = Console::connect(opts).await?;
    let result = match command {
        Commands::Pending(args) => cli::alerts::handle_pending(&console, args).await,
        Commands::Completed(args) => cli::alerts::handle_completed(&console, args).await,
        Commands::Show(args) => cli::alerts::handle_show(&console, args).await,
        Commands::Process(args) => cli::alerts::handle_process(&console, args).await,
        Commands::Exception(args) => cli::alerts::handle_exception(&console, args).await,
        Commands::Summary => cli::alerts::handle_summary(&console).await,
        Commands::Policies(args) => cli::policies::handle_policies(&console, args).await,
        Commands::Move(args) => cli::policies::handle_move(&console, args).await,
        Commands::Remove(args) => cli::policies::handle_remove(&console, args).await,
        Commands::Servers => cli::servers::handle_servers(&console).await,
        Commands::Assign(args) => cli::servers::handle_assign(&console, args).await,
        Commands::Serve(_)
        | Commands::Login(_)
        | Commands::Logout
        | Commands::Validate(_) => Ok(()),
    };

    let notifications = console.store.notifications().drain();
    if !console.json && !console.quiet {
        render::print_notifications(&notifications);
    }
    result
}

async fn handle_validate(args: cli::commands::ValidateArgs) -> Result<(), AlertDeskError> {
    let path = std::path::PathBuf::from(&args.config);
    let config = config::parse_config(&path).await?;
    println!("Configuration is valid: {} (gateway: {})", args.config, config.gateway.mode);
    Ok(())
}
