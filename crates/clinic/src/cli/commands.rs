//! # CLI Layer
//!
//! This module is **one possible UI client** for the clinic records; it is not
//! the application itself.
//!
//! The CLI layer is the **only** place in the codebase that:
//! - Knows about terminal I/O (stdout, stderr)
//! - Installs a `tracing` subscriber
//! - Handles argument parsing
//! - Formats output for human consumption
//!
//! ## Sessions
//!
//! There is no persistent login. A command that needs a signed-in user gets
//! `--login EMAIL --login-password PASSWORD`; the credentials are checked and
//! the resulting session lives for that one invocation. Commands that allow
//! anonymous callers run unrestricted when no credentials are given.

use super::render::{print_messages, print_result, CaseView};
use super::setup::{CaseCommands, CenterCommands, Cli, Commands, OutputMode, UserCommands};
use clap::Parser;
use clinicapp::api::ClinicApi;
use clinicapp::commands::users::NewUser;
use clinicapp::commands::{CenterUpdate, UserUpdate};
use clinicapp::config::CONFIG_FILE;
use clinicapp::error::{ClinicError, Result};
use clinicapp::init::{initialize, ClinicContext};
use clinicapp::session::Session;
use clinicapp::store::fs_backend::FsBackend;
use tracing::debug;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter};

pub fn run() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let ctx = initialize(cli.data.clone())?;
    debug!(command = ?cli.command, "dispatching");

    let session = sign_in(&ctx.api, &cli)?;

    match cli.command {
        Commands::Center { action } => {
            handle_center(&ctx.api, session.as_ref(), action, cli.output)
        }
        Commands::User { action } => handle_user(&ctx.api, session.as_ref(), action, cli.output),
        Commands::Case { action } => handle_case(&ctx.api, session.as_ref(), action, cli.output),
        Commands::Login => handle_login(
            &ctx.api,
            cli.login.as_deref(),
            cli.login_password.as_deref(),
            cli.output,
        ),
        Commands::Stats { center } => {
            let result = ctx.api.center_stats(session.as_ref(), center)?;
            print_result(&result, cli.output, CaseView::Summary)
        }
        Commands::Config => handle_config(&ctx, cli.output),
    }
}

/// Log to stderr. `RUST_LOG` is honored unless `--verbose` asks for debug output.
fn init_logging(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("clinicapp=debug,clinic=debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };

    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(std::io::stderr).with_target(false))
        .try_init();
}

fn sign_in(api: &ClinicApi<FsBackend>, cli: &Cli) -> Result<Option<Session>> {
    // the login command reports the welcome itself
    if matches!(cli.command, Commands::Login) {
        return Ok(None);
    }
    match (&cli.login, &cli.login_password) {
        (Some(email), Some(password)) => {
            let (session, _) = api.login(email, password)?;
            debug!(user = session.user_id(), "signed in");
            Ok(Some(session))
        }
        _ => Ok(None),
    }
}

fn require_session(session: Option<&Session>) -> Result<&Session> {
    session.ok_or_else(|| {
        ClinicError::Auth("sign in with --login and --login-password".to_string())
    })
}

fn handle_login(
    api: &ClinicApi<FsBackend>,
    email: Option<&str>,
    password: Option<&str>,
    output: OutputMode,
) -> Result<()> {
    let (Some(email), Some(password)) = (email, password) else {
        return Err(ClinicError::Api("login needs --login and --login-password".into()));
    };
    let (session, result) = api.login(email, password)?;
    match output {
        OutputMode::Text => print_messages(&result.messages),
        OutputMode::Json => println!("{}", to_json(&session)?),
    }
    Ok(())
}

fn handle_center(
    api: &ClinicApi<FsBackend>,
    session: Option<&Session>,
    action: CenterCommands,
    output: OutputMode,
) -> Result<()> {
    let result = match action {
        CenterCommands::Create {
            name,
            address,
            phone,
        } => api.create_center(name, address, phone)?,
        CenterCommands::List => api.list_centers()?,
        CenterCommands::Search { term } => api.search_centers(&term)?,
        CenterCommands::Show { id } => api.get_center(id)?,
        CenterCommands::Edit {
            id,
            name,
            address,
            phone,
        } => api.update_center(
            session,
            id,
            CenterUpdate {
                name,
                address,
                phone,
            },
        )?,
        CenterCommands::Delete { id } => api.archive_center(session, id)?,
    };
    print_result(&result, output, CaseView::Summary)
}

fn handle_user(
    api: &ClinicApi<FsBackend>,
    session: Option<&Session>,
    action: UserCommands,
    output: OutputMode,
) -> Result<()> {
    let result = match action {
        UserCommands::Create {
            first_name,
            last_name,
            email,
            role,
            password,
            center,
        } => api.create_user(NewUser {
            first_name,
            last_name,
            email,
            role: role.into(),
            password,
            center_id: center,
        })?,
        UserCommands::List => api.list_users(session)?,
        UserCommands::Search { term } => api.search_users(session, &term)?,
        UserCommands::Show { id } => api.get_user(session, id)?,
        UserCommands::Edit {
            id,
            first_name,
            last_name,
            email,
            password,
        } => api.update_user(
            session,
            id,
            UserUpdate {
                first_name,
                last_name,
                email,
                password,
            },
        )?,
        UserCommands::Delete { id } => api.archive_user(session, id)?,
        UserCommands::Doctors => api.list_doctors(session)?,
        UserCommands::Patients => api.list_patients(session)?,
    };
    print_result(&result, output, CaseView::Summary)
}

fn handle_case(
    api: &ClinicApi<FsBackend>,
    session: Option<&Session>,
    action: CaseCommands,
    output: OutputMode,
) -> Result<()> {
    let view = match action {
        CaseCommands::Create { .. } | CaseCommands::Show { .. } | CaseCommands::Edit { .. } => {
            CaseView::Full
        }
        _ => CaseView::Summary,
    };

    let result = match action {
        CaseCommands::Create { patient, fields } => {
            api.create_case_file(require_session(session)?, patient, &fields)?
        }
        CaseCommands::List => api.list_case_files(session)?,
        CaseCommands::Search { term } => api.search_case_files(session, &term)?,
        CaseCommands::Show { id } => api.get_case_file(session, id)?,
        CaseCommands::Edit { id, fields } => {
            api.update_case_file(require_session(session)?, id, &fields)?
        }
        CaseCommands::Delete { id } => api.archive_case_file(require_session(session)?, id)?,
        CaseCommands::ByPatient { id } => api.case_files_by_patient(session, id)?,
        CaseCommands::ByDoctor { id } => api.case_files_by_doctor(session, id)?,
        CaseCommands::ByCenter { id } => api.case_files_by_center(session, id)?,
        CaseCommands::Mine => api.my_case_files(require_session(session)?)?,
    };
    print_result(&result, output, view)
}

fn handle_config(ctx: &ClinicContext, output: OutputMode) -> Result<()> {
    let config_file = ctx.config_dir.join(CONFIG_FILE);
    match output {
        OutputMode::Json => {
            let value = serde_json::json!({
                "data_dir": ctx.data_dir,
                "config_file": config_file,
                "file_ext": ctx.config.file_ext(),
            });
            println!("{}", to_json(&value)?);
        }
        OutputMode::Text => {
            println!("data_dir    = {}", ctx.data_dir.display());
            println!("config_file = {}", config_file.display());
            println!("file_ext    = {}", ctx.config.file_ext());
        }
    }
    Ok(())
}

fn to_json<T: serde::Serialize>(value: &T) -> Result<String> {
    serde_json::to_string_pretty(value).map_err(|e| ClinicError::Api(e.to_string()))
}
