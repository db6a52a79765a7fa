use crate::cli::commands::{IdsArgs, MoveArgs, PoliciesArgs};
use crate::cli::context::{loaded, Console};
use crate::cli::render;
use crate::errors::AlertDeskError;
use crate::models::PageRequest;

pub async fn handle_policies(console: &Console, args: PoliciesArgs) -> Result<(), AlertDeskError> {
    let page = PageRequest::new(args.page, console.page_size(args.page_size));
    let result = loaded(console.store.load_policies(args.list, page).await)?;
    if console.json {
        return render::print_json(&result);
    }
    render::print_policy_page(&format!("File policies: {}", args.list), &result);
    Ok(())
}

pub async fn handle_move(console: &Console, args: MoveArgs) -> Result<(), AlertDeskError> {
    let outcome = console.coordinator.bulk_move(args.ids, args.to).await?;
    if console.json {
        return render::print_json(&outcome);
    }
    if !console.quiet {
        println!("{} policy record(s) moved to {}", outcome.updated, args.to);
    }
    Ok(())
}

pub async fn handle_remove(console: &Console, args: IdsArgs) -> Result<(), AlertDeskError> {
    let outcome = console.coordinator.bulk_remove(args.ids).await?;
    if console.json {
        return render::print_json(&outcome);
    }
    if !console.quiet {
        println!("{} policy record(s) removed", outcome.updated);
    }
    Ok(())
}
