//! The commands behind each subcommand. `bootstrap` sequences the whole
//! draft preparation; the rest are single-request passthroughs.

use std::time::Duration;

use serde::Serialize;
use tracing::info;

use crate::api::{ApiClient, ApiError, DraftStatus};
use crate::cli::{AdminAction, BootstrapArgs, Cli, Commands};
use crate::config::Settings;
use crate::draft::{voter_list, AuthMode, Draft};
use crate::poller::wait_until_ready_with;
use crate::session::{resolve_token, TokenSource, WebLogin};
use crate::ui;

/// Outcome of a successful bootstrap, printed as the final summary.
#[derive(Debug, Clone, Serialize)]
pub struct BootstrapReport {
    pub uuid: String,
    pub draft_status: DraftStatus,
}

/// Resolve the token, build the client and dispatch the parsed command.
pub fn run(cli: Cli) -> Result<(), ApiError> {
    let settings = Settings::from_args(&cli.global);
    let login = WebLogin::new(
        &settings.base_url,
        &settings.login_path,
        &settings.token_path,
        settings.http_timeout,
    )?;
    // Only bother with (possibly interactive) credentials when they can matter.
    let credentials = match settings.token.as_deref().filter(|t| !t.is_empty()) {
        Some(_) => None,
        None => settings.credentials(),
    };
    let token = resolve_token(
        settings.token.as_deref(),
        credentials.as_ref(),
        &login,
        &settings.fallback_token,
    );
    let source = token.source;
    let api = ApiClient::new(&settings.base_url, token.value, settings.http_timeout)?;
    info!(api_root = %api.api_root(), ?source, "client ready");

    match cli.command {
        Commands::Bootstrap(args) => {
            ui::ok(match source {
                TokenSource::Explicit => "Using the supplied API token",
                TokenSource::Login => "API token obtained through web login",
                TokenSource::Fallback => "Using the fallback API token",
            });
            let report = bootstrap(&api, &args)?;
            println!("\nSummary:");
            ui::print_json(&report)?;
        }
        Commands::List => list_elections(&api)?,
        Commands::Status { uuid } => election_status(&api, &uuid)?,
        Commands::Action { uuid, action } => admin_action(&api, &uuid, action)?,
        Commands::Delete { uuid } => delete_election(&api, &uuid)?,
        Commands::Whoami => whoami(&api)?,
    }
    Ok(())
}

/// Create a draft, register voters, have the server prepare passwords and
/// credentials, wait for it, validate and optionally open the election.
///
/// Any failure aborts the remaining steps; whatever the server already did
/// stays in place.
pub fn bootstrap(api: &ApiClient, args: &BootstrapArgs) -> Result<BootstrapReport, ApiError> {
    let admin_id = match args.admin_id {
        Some(id) => id,
        None => {
            let id = api.account_id()?;
            ui::ok(format!("Admin account discovered: id {id}"));
            id
        }
    };

    let draft = Draft::new(admin_id, &args.group, args.auth);
    let uuid = api.create_election(&draft)?;
    ui::ok(format!("Draft created: {uuid}"));

    let voters = voter_list(args.voters as usize, &args.domain);
    api.put(&format!("elections/{uuid}/draft/voters"), &voters)?;
    ui::ok(format!("{} voters registered", voters.len()));

    if args.auth == AuthMode::Password {
        api.post(&format!("elections/{uuid}/draft/passwords"), &voters)?;
        ui::ok("Passwords generated for the voters");
    }

    api.post(&format!("elections/{uuid}/draft/credentials/public"), &[] as &[String])?;
    ui::ok("Public credential generation requested");

    let spinner = ui::PollSpinner::start(&uuid);
    let status = wait_until_ready_with(
        api,
        &uuid,
        Duration::from_secs(args.ready_timeout),
        Duration::from_secs(args.poll_interval),
        |poll, status| spinner.update(poll, status),
    );
    spinner.finish();
    let status = status?;
    ui::ok(format!(
        "Draft ready: credentials_ready={}, trustees_ready={}",
        status.credentials_ready(),
        status.trustees_ready()
    ));

    api.post(&format!("elections/{uuid}/draft"), "ValidateElection")?;
    ui::ok("Election validated");

    if args.open {
        api.post(&format!("elections/{uuid}"), AdminAction::Open.as_str())?;
        ui::ok("Election opened");
    }

    Ok(BootstrapReport {
        uuid,
        draft_status: status,
    })
}

pub fn list_elections(api: &ApiClient) -> Result<(), ApiError> {
    ui::print_json(&api.get("elections")?)
}

pub fn election_status(api: &ApiClient, uuid: &str) -> Result<(), ApiError> {
    ui::print_json(&api.get(&format!("elections/{uuid}"))?)
}

pub fn admin_action(api: &ApiClient, uuid: &str, action: AdminAction) -> Result<(), ApiError> {
    api.post(&format!("elections/{uuid}"), action.as_str())?;
    ui::ok(format!("Action {} executed for {uuid}", action.as_str()));
    Ok(())
}

pub fn delete_election(api: &ApiClient, uuid: &str) -> Result<(), ApiError> {
    api.delete(&format!("elections/{uuid}"))?;
    ui::ok(format!("Election {uuid} deleted"));
    Ok(())
}

pub fn whoami(api: &ApiClient) -> Result<(), ApiError> {
    ui::print_json(&api.get("account")?)
}
