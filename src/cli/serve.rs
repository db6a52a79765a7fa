use crate::cli::commands::ServeArgs;
use crate::cli::context::{load_config, GlobalOpts};
use crate::errors::AlertDeskError;
use crate::api;
use tracing::info;

pub async fn handle_serve(opts: &GlobalOpts, args: ServeArgs) -> Result<(), AlertDeskError> {
    let config = load_config(opts).await?;
    let host = args.host.unwrap_or(config.server.host);
    let port = args.port.unwrap_or(config.server.port);
    let db_path = args.db.unwrap_or(config.server.db);

    info!(host = %host, port, db = %db_path, "Starting API server");

    let state = api::create_app_state(&db_path).await?;
    if let Some(count) = args.seed {
        let seed = config.mock.seed.unwrap_or(42);
        state.db.seed_demo(count, seed)?;
    }
    let app = api::build_router(state);

    let addr = format!("{}:{}", host, port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!("Listening on {}", addr);

    axum::serve(listener, app)
        .await
        .map_err(|e| AlertDeskError::Internal(format!("Server error: {}", e)))?;

    Ok(())
}
