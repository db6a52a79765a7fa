use serde_json::json;
use tracing::info;
use crate::cli::commands::{ExceptionArgs, ListArgs, ProcessArgs, ShowArgs};
use crate::cli::context::{loaded, Console};
use crate::cli::render;
use crate::errors::AlertDeskError;
use crate::models::{AlertFilters, AlertRecord, BulkActionRequest, Page, PageRequest};
use crate::selectors;

const SUMMARY_PAGE_SIZE: usize = 500;

fn filters_from(args: &ListArgs) -> AlertFilters {
    AlertFilters {
        risk: args.risk,
        verdict: args.verdict,
        server_ip: args.server_ip.clone(),
    }
}

pub async fn handle_pending(console: &Console, args: ListArgs) -> Result<(), AlertDeskError> {
    let page = PageRequest::new(args.page, console.page_size(args.page_size));
    let result = loaded(console.store.get_pending_list(filters_from(&args), page).await)?;
    if console.json {
        return render::print_json(&result);
    }
    render::print_alert_page("Pending alerts", &result);
    Ok(())
}

pub async fn handle_completed(console: &Console, args: ListArgs) -> Result<(), AlertDeskError> {
    let page = PageRequest::new(args.page, console.page_size(args.page_size));
    console.store.set_filters(filters_from(&args)).await;
    let result = loaded(console.store.get_completed_list(page).await)?;
    if console.json {
        return render::print_json(&result);
    }
    render::print_alert_page("Completed alerts", &result);
    Ok(())
}

pub async fn handle_show(console: &Console, args: ShowArgs) -> Result<(), AlertDeskError> {
    let record = loaded(console.store.get_detection(&args.id).await)?;
    if console.json {
        return render::print_json(&record);
    }
    render::print_detection(&record);
    Ok(())
}

pub async fn handle_process(console: &Console, args: ProcessArgs) -> Result<(), AlertDeskError> {
    let user_id = match args.user {
        Some(user) => user,
        None => console.session.load().await?.acting_user().to_string(),
    };

    // Load the records first so already-processed ids are caught locally.
    console.store.preload_records(&args.ids).await;
    console.store.set_selected_row_keys(args.ids.clone()).await;

    let request = BulkActionRequest::new(args.ids, args.action, args.memo, user_id);
    info!(count = request.selected_ids.len(), action = %request.action, "Processing alerts");
    let outcome = console.coordinator.bulk_process(request).await?;

    if console.json {
        return render::print_json(&outcome);
    }
    if !console.quiet {
        println!("{} alert(s) updated", outcome.updated);
    }
    Ok(())
}

pub async fn handle_exception(console: &Console, args: ExceptionArgs) -> Result<(), AlertDeskError> {
    let records = console.coordinator.apply_exception(args.ids, args.kind).await?;
    if console.json {
        return render::print_json(&records);
    }
    if !console.quiet {
        println!("{} policy record(s) now on the {} list", records.len(), args.kind);
    }
    Ok(())
}

async fn collect_all(
    console: &Console,
    pending: bool,
) -> Result<Vec<AlertRecord>, AlertDeskError> {
    let mut all = Vec::new();
    let mut current = 1;
    loop {
        let page = PageRequest::new(current, SUMMARY_PAGE_SIZE);
        let result: Page<AlertRecord> = if pending {
            loaded(console.store.get_pending_list(AlertFilters::default(), page).await)?
        } else {
            loaded(console.store.get_completed_list(page).await)?
        };
        let fetched = result.data.len();
        all.extend(result.data);
        if fetched == 0 || all.len() >= result.total {
            break;
        }
        current += 1;
    }
    Ok(all)
}

pub async fn handle_summary(console: &Console) -> Result<(), AlertDeskError> {
    let mut records = collect_all(console, true).await?;
    records.extend(collect_all(console, false).await?);
    let summary = selectors::summarize(&records);

    if console.json {
        return render::print_json(&json!({
            "summary": summary,
            "total": summary.total(),
        }));
    }
    render::print_summary(&summary);
    Ok(())
}
