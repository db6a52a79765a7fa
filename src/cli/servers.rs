use crate::cli::commands::AssignArgs;
use crate::cli::context::{loaded, Console};
use crate::cli::render;
use crate::errors::AlertDeskError;

pub async fn handle_servers(console: &Console) -> Result<(), AlertDeskError> {
    let servers = loaded(console.store.load_servers().await)?;
    if console.json {
        return render::print_json(&servers);
    }
    render::print_servers(&servers);
    Ok(())
}

pub async fn handle_assign(console: &Console, args: AssignArgs) -> Result<(), AlertDeskError> {
    let outcome = console
        .coordinator
        .assign_servers(args.ids, args.cluster, args.manager)
        .await?;
    if console.json {
        return render::print_json(&outcome);
    }
    if !console.quiet {
        println!("{} server(s) assigned", outcome.updated);
    }
    Ok(())
}
