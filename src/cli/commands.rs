use clap::{Parser, Subcommand, Args};
use crate::config::GatewayMode;
use crate::models::{ExceptionKind, Policy, ProcessStatus, RiskBucket, Verdict};

#[derive(Parser)]
#[command(name = "alertdesk", version, about = "Malware alert triage console")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// YAML configuration file
    #[arg(short, long, global = true)]
    pub config: Option<String>,

    /// Override the configured gateway: mock or http
    #[arg(long, global = true, value_parser = parse_gateway_mode)]
    pub gateway: Option<GatewayMode>,

    /// Backend base URL (implies --gateway http)
    #[arg(long, global = true)]
    pub base_url: Option<String>,

    /// Print machine-readable JSON instead of tables
    #[arg(long, global = true)]
    pub json: bool,

    /// Increase log verbosity (repeat for more)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress non-essential output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Emit logs as JSON lines
    #[arg(long, global = true)]
    pub log_json: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Start the HTTP REST backend
    Serve(ServeArgs),
    /// List alerts waiting for triage
    Pending(ListArgs),
    /// List alerts that have been processed
    Completed(ListArgs),
    /// Show one detection
    Show(ShowArgs),
    /// Apply a process status to pending alerts
    Process(ProcessArgs),
    /// Put alerts on the blacklist/whitelist, or take them off
    Exception(ExceptionArgs),
    /// List file policies
    Policies(PoliciesArgs),
    /// Move file policies to the other list
    Move(MoveArgs),
    /// Remove file policies
    Remove(IdsArgs),
    /// List monitored servers
    Servers,
    /// Assign servers to a cluster and/or manager
    Assign(AssignArgs),
    /// Count alerts by status, exception and verdict
    Summary,
    /// Record the acting analyst
    Login(LoginArgs),
    /// End the current session
    Logout,
    /// Validate a configuration file
    Validate(ValidateArgs),
}

#[derive(Args, Clone)]
pub struct ServeArgs {
    /// Listen port
    #[arg(long)]
    pub port: Option<u16>,

    /// Listen address
    #[arg(long)]
    pub host: Option<String>,

    /// SQLite database path
    #[arg(long)]
    pub db: Option<String>,

    /// Insert this many demo alerts into an empty database
    #[arg(long)]
    pub seed: Option<usize>,
}

#[derive(Args, Clone, Default)]
pub struct ListArgs {
    /// Risk band: high, medium, low
    #[arg(long)]
    pub risk: Option<RiskBucket>,

    /// Verdict: Malware, Benign, Suspicious, Unknown
    #[arg(long)]
    pub verdict: Option<Verdict>,

    /// Exact server IP
    #[arg(long)]
    pub server_ip: Option<String>,

    /// Page number, starting at 1
    #[arg(long, default_value = "1")]
    pub page: usize,

    /// Rows per page (defaults to the configured page size)
    #[arg(long)]
    pub page_size: Option<usize>,
}

#[derive(Args, Clone)]
pub struct ShowArgs {
    /// Alert id
    pub id: String,
}

#[derive(Args, Clone)]
pub struct ProcessArgs {
    /// Alert ids
    #[arg(required = true, num_args = 1..)]
    pub ids: Vec<String>,

    /// Target status: no_action, quarantine, delete, pending
    #[arg(short, long)]
    pub action: ProcessStatus,

    /// Comment stored with the alerts
    #[arg(short, long, default_value = "")]
    pub memo: String,

    /// Acting user (defaults to the logged-in user)
    #[arg(long)]
    pub user: Option<String>,
}

#[derive(Args, Clone)]
pub struct ExceptionArgs {
    /// Alert ids
    #[arg(required = true, num_args = 1..)]
    pub ids: Vec<String>,

    /// none, blacklist or whitelist
    #[arg(short, long)]
    pub kind: ExceptionKind,
}

#[derive(Args, Clone)]
pub struct PoliciesArgs {
    /// blacklist or whitelist
    #[arg(short, long, default_value = "blacklist")]
    pub list: Policy,

    /// Page number, starting at 1
    #[arg(long, default_value = "1")]
    pub page: usize,

    /// Rows per page (defaults to the configured page size)
    #[arg(long)]
    pub page_size: Option<usize>,
}

#[derive(Args, Clone)]
pub struct MoveArgs {
    /// Alert ids of the policy records
    #[arg(required = true, num_args = 1..)]
    pub ids: Vec<String>,

    /// Destination list
    #[arg(short, long)]
    pub to: Policy,
}

#[derive(Args, Clone)]
pub struct IdsArgs {
    #[arg(required = true, num_args = 1..)]
    pub ids: Vec<String>,
}

#[derive(Args, Clone)]
pub struct AssignArgs {
    /// Server ids
    #[arg(required = true, num_args = 1..)]
    pub ids: Vec<String>,

    #[arg(long)]
    pub cluster: Option<String>,

    #[arg(long)]
    pub manager: Option<String>,
}

#[derive(Args, Clone)]
pub struct LoginArgs {
    /// Analyst user id
    pub user_id: String,
}

#[derive(Args, Clone)]
pub struct ValidateArgs {
    /// Config file to validate
    pub config: String,
}

fn parse_gateway_mode(s: &str) -> Result<GatewayMode, String> {
    match s.to_ascii_lowercase().as_str() {
        "mock" => Ok(GatewayMode::Mock),
        "http" => Ok(GatewayMode::Http),
        other => Err(format!("unknown gateway '{}', expected mock or http", other)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_process_command() {
        let cli = Cli::parse_from([
            "alertdesk", "process", "req-0001", "req-0002", "--action", "quarantine", "--memo", "dropper",
        ]);
        match cli.command {
            Commands::Process(args) => {
                assert_eq!(args.ids, vec!["req-0001", "req-0002"]);
                assert_eq!(args.action, ProcessStatus::Quarantine);
                assert_eq!(args.memo, "dropper");
            }
            _ => panic!("expected process"),
        }
    }

    #[test]
    fn test_parse_global_flags_after_subcommand() {
        let cli = Cli::parse_from(["alertdesk", "pending", "--risk", "high", "--json", "--gateway", "http", "-vv"]);
        assert!(cli.json);
        assert_eq!(cli.gateway, Some(GatewayMode::Http));
        assert_eq!(cli.verbose, 2);
        match cli.command {
            Commands::Pending(args) => assert_eq!(args.risk, Some(RiskBucket::High)),
            _ => panic!("expected pending"),
        }
    }

    #[test]
    fn test_process_requires_ids() {
        assert!(Cli::try_parse_from(["alertdesk", "process", "--action", "delete"]).is_err());
    }
}
