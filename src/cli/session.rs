use console::style;
use crate::cli::commands::LoginArgs;
use crate::cli::context::{load_config, GlobalOpts};
use crate::cli::render;
use crate::errors::AlertDeskError;
use crate::session::SessionManager;

async fn manager(opts: &GlobalOpts) -> Result<SessionManager, AlertDeskError> {
    let config = load_config(opts).await?;
    Ok(SessionManager::new(&config.session.path))
}

pub async fn handle_login(opts: &GlobalOpts, args: LoginArgs) -> Result<(), AlertDeskError> {
    let state = manager(opts).await?.login(&args.user_id).await?;
    if opts.json {
        return render::print_json(&state);
    }
    if !opts.quiet {
        println!("{} logged in as {}", style("\u{2714}").green().bold(), args.user_id.trim());
    }
    Ok(())
}

pub async fn handle_logout(opts: &GlobalOpts) -> Result<(), AlertDeskError> {
    let state = manager(opts).await?.logout().await?;
    if opts.json {
        return render::print_json(&state);
    }
    if !opts.quiet {
        println!("{} logged out", style("\u{2714}").green().bold());
    }
    Ok(())
}
