use std::path::PathBuf;
use std::sync::Arc;

use clap::{Args, Parser, Subcommand};
use quickleave::components::toast::{ToastKind, ToastQueue};
use quickleave::config::{ClientConfig, ConfigError, normalize_base_url};
use quickleave::net::{ApiClient, ApiError};
use quickleave::net::types::{ApplicationId, LeaveStatus};
use quickleave::pages::{
    EmployeePage, HomePage, ManagerPage, NavbarLayout, SignInPage, SignUpPage, StatusOutcome, SubmitOutcome,
    WithdrawOutcome,
};
use quickleave::routes::{GuardDecision, Navigator, ProtectedRoutes, ReverseProtectedRoutes, Route};
use quickleave::services::{SessionCheck, SessionManager};
use quickleave::state::{FileSessionStore, SessionContext};
use quickleave::validation::FieldErrors;
use quickleave::validation::leave::{FIELD_END_DATE, FIELD_LEAVE_TYPE, FIELD_MANAGER, FIELD_REASON, FIELD_START_DATE};
use quickleave::validation::signup::{FIELD_EMAIL, FIELD_NAME, FIELD_PASSWORD, FIELD_USERNAME};
use serde_json::Value;
use tracing::info;

#[derive(Debug, thiserror::Error)]
enum CliError {
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),
    #[error("api request failed: {0}")]
    Api(#[from] ApiError),
    #[error("not signed in; run `quickleave-cli signin` first")]
    NotSignedIn,
    #[error("{0}")]
    Rejected(String),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid JSON payload: {0}")]
    InvalidJson(#[from] serde_json::Error),
}

#[derive(Parser, Debug)]
#[command(name = "quickleave-cli", about = "QuickLeave leave-management client")]
struct Cli {
    #[arg(long, env = "QUICKLEAVE_API_URL")]
    api_url: Option<String>,

    #[arg(long, env = "QUICKLEAVE_SESSION_FILE")]
    session_file: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Sign in and store the session.
    Signin {
        username: String,
        #[arg(long, env = "QUICKLEAVE_PASSWORD", hide_env_values = true)]
        password: String,
    },
    /// Create an account.
    Signup {
        #[arg(long)]
        name: String,
        #[arg(long)]
        email: String,
        #[arg(long)]
        username: String,
        #[arg(long, env = "QUICKLEAVE_PASSWORD", hide_env_values = true)]
        password: String,
    },
    /// Clear the stored session.
    Signout,
    /// Show the signed-in user.
    Whoami,
    /// Verify the stored tokens, refreshing them if needed.
    Check,
    /// Keep the session fresh until interrupted.
    Keepalive,
    Leave(LeaveCommand),
    /// List users available as managers.
    Managers,
    Team(TeamCommand),
    /// Total-leaves report, summed per employee.
    Report {
        #[arg(long, default_value_t = false, help = "Print raw report rows as JSON")]
        raw: bool,
    },
}

#[derive(Args, Debug)]
struct LeaveCommand {
    #[command(subcommand)]
    command: LeaveSubcommand,
}

#[derive(Subcommand, Debug)]
enum LeaveSubcommand {
    List,
    Apply {
        #[arg(long)]
        start: String,
        #[arg(long)]
        end: String,
        #[arg(long = "type")]
        leave_type: String,
        #[arg(long)]
        reason: String,
        #[arg(long)]
        manager: String,
    },
    Withdraw {
        id: ApplicationId,
    },
}

#[derive(Args, Debug)]
struct TeamCommand {
    #[command(subcommand)]
    command: TeamSubcommand,
}

#[derive(Subcommand, Debug)]
enum TeamSubcommand {
    List,
    Pending,
    Approve { id: ApplicationId },
    Reject { id: ApplicationId },
    Reset { id: ApplicationId },
}

/// Navigation has nowhere to go in a terminal; it is logged.
struct LogNavigator;

impl Navigator for LogNavigator {
    fn navigate(&self, route: Route) {
        info!(%route, "navigate");
    }
}

struct App {
    config: ClientConfig,
    api: ApiClient,
    ctx: SessionContext,
    navigator: Arc<dyn Navigator>,
    manager: Arc<SessionManager>,
}

impl App {
    fn new(cli: &Cli) -> Result<Self, CliError> {
        let mut config = ClientConfig::from_env()?;
        if let Some(url) = &cli.api_url {
            config.api_base_url = normalize_base_url(url)?;
        }
        if let Some(path) = &cli.session_file {
            config.session_path.clone_from(path);
        }

        let api = ApiClient::new(&config)?;
        let ctx = SessionContext::new(Arc::new(FileSessionStore::new(config.session_path.clone())));
        let navigator: Arc<dyn Navigator> = Arc::new(LogNavigator);
        let manager = Arc::new(SessionManager::new(ctx.clone(), Arc::new(api.clone()), Arc::clone(&navigator)));
        Ok(Self { config, api, ctx, navigator, manager })
    }

    /// Mount the protected layout; fails when no session survives the check.
    async fn protected(&self) -> Result<ProtectedRoutes, CliError> {
        let guard = ProtectedRoutes::mount(Arc::clone(&self.manager), self.config.refresh_interval).await;
        match guard.decision() {
            GuardDecision::Render => Ok(guard),
            GuardDecision::Redirect(_) => Err(CliError::NotSignedIn),
        }
    }

    /// Mount the sign-in/sign-up wrapper; `false` when already signed in.
    fn reverse_protected(&self) -> bool {
        let guard = ReverseProtectedRoutes::mount(&self.ctx, self.navigator.as_ref());
        if guard.decision() == GuardDecision::Render {
            return true;
        }
        println!("{}", HomePage::for_session(&self.ctx.snapshot()).greeting);
        false
    }
}

#[tokio::main]
async fn main() -> Result<(), CliError> {
    tracing_subscriber::fmt().with_writer(std::io::stderr).init();

    let cli = Cli::parse();
    let app = App::new(&cli)?;

    match cli.command {
        Command::Signin { username, password } => run_signin(&app, username, password).await,
        Command::Signup { name, email, username, password } => run_signup(&app, name, email, username, password).await,
        Command::Signout => {
            NavbarLayout::new(app.ctx.clone(), Arc::clone(&app.navigator)).logout();
            println!("signed out");
            Ok(())
        }
        Command::Whoami => run_whoami(&app).await,
        Command::Check => run_check(&app).await,
        Command::Keepalive => run_keepalive(&app).await,
        Command::Leave(leave) => run_leave(&app, leave).await,
        Command::Managers => run_managers(&app).await,
        Command::Team(team) => run_team(&app, team).await,
        Command::Report { raw } => run_report(&app, raw).await,
    }
}

// =============================================================================
// AUTH
// =============================================================================

async fn run_signin(app: &App, username: String, password: String) -> Result<(), CliError> {
    if !app.reverse_protected() {
        return Ok(());
    }
    let mut page = SignInPage::new(app.api.clone(), app.ctx.clone(), Arc::clone(&app.navigator));
    page.form.username = username;
    page.form.password = password;
    let outcome = page.submit().await;
    print_field_errors(page.errors());
    match outcome {
        SubmitOutcome::Submitted => {
            println!("{}", HomePage::for_session(&app.ctx.snapshot()).greeting);
            Ok(())
        }
        _ => Err(CliError::Rejected(page.error().unwrap_or("sign in failed").to_owned())),
    }
}

async fn run_signup(app: &App, name: String, email: String, username: String, password: String) -> Result<(), CliError> {
    if !app.reverse_protected() {
        return Ok(());
    }
    let mut page = SignUpPage::new(app.api.clone(), Arc::clone(&app.navigator));
    for (field, value) in [(FIELD_NAME, name), (FIELD_EMAIL, email), (FIELD_USERNAME, username), (FIELD_PASSWORD, password)] {
        page.set_field(field, value);
    }
    let outcome = page.submit().await;
    print_field_errors(page.errors());
    match outcome {
        SubmitOutcome::Submitted => {
            println!("account created; sign in with `quickleave-cli signin {}`", page.form().username);
            Ok(())
        }
        _ => Err(CliError::Rejected("sign up failed".to_owned())),
    }
}

async fn run_whoami(app: &App) -> Result<(), CliError> {
    let _guard = app.protected().await?;
    print_json(&serde_json::to_value(app.ctx.user())?)
}

async fn run_check(app: &App) -> Result<(), CliError> {
    let guard = app.protected().await?;
    let label = match guard.check() {
        SessionCheck::Verified => "session valid",
        SessionCheck::Refreshed => "session refreshed",
        SessionCheck::Unauthenticated | SessionCheck::Expired => "session expired",
    };
    println!("{label}");
    Ok(())
}

async fn run_keepalive(app: &App) -> Result<(), CliError> {
    let guard = app.protected().await?;
    let mut changes = app.ctx.subscribe();
    println!("refreshing every {}s; press Ctrl-C to stop", app.config.refresh_interval.as_secs());
    loop {
        tokio::select! {
            signal = tokio::signal::ctrl_c() => {
                signal?;
                guard.unmount();
                return Ok(());
            }
            changed = changes.changed() => {
                if changed.is_err() || !changes.borrow_and_update().is_authenticated {
                    return Err(CliError::NotSignedIn);
                }
            }
        }
    }
}

// =============================================================================
// EMPLOYEE
// =============================================================================

async fn run_leave(app: &App, leave: LeaveCommand) -> Result<(), CliError> {
    let _guard = app.protected().await?;
    let mut page = EmployeePage::new(app.api.clone(), app.ctx.clone());
    let loaded = page.load().await;
    flush_toasts(page.toasts_mut());

    match leave.command {
        LeaveSubcommand::List => {
            loaded?;
            print_json(&serde_json::to_value(page.applications())?)
        }
        LeaveSubcommand::Apply { start, end, leave_type, reason, manager } => {
            loaded?;
            for (field, value) in [
                (FIELD_START_DATE, start),
                (FIELD_END_DATE, end),
                (FIELD_LEAVE_TYPE, leave_type),
                (FIELD_REASON, reason),
                (FIELD_MANAGER, manager),
            ] {
                page.set_field(field, value);
            }
            let outcome = page.submit(chrono::Local::now().date_naive()).await;
            print_field_errors(page.errors());
            flush_toasts(page.toasts_mut());
            match outcome {
                SubmitOutcome::Submitted => match page.applications().last() {
                    Some(created) => print_json(&serde_json::to_value(created)?),
                    None => Ok(()),
                },
                SubmitOutcome::Invalid => Err(CliError::Rejected("leave application is invalid".to_owned())),
                SubmitOutcome::Failed | SubmitOutcome::Busy => {
                    Err(CliError::Rejected("leave application was not submitted".to_owned()))
                }
            }
        }
        LeaveSubcommand::Withdraw { id } => {
            loaded?;
            let outcome = page.withdraw(id).await;
            flush_toasts(page.toasts_mut());
            match outcome {
                WithdrawOutcome::Withdrawn => Ok(()),
                other => Err(CliError::Rejected(format!("withdraw {id}: {other:?}"))),
            }
        }
    }
}

async fn run_managers(app: &App) -> Result<(), CliError> {
    let _guard = app.protected().await?;
    let mut page = EmployeePage::new(app.api.clone(), app.ctx.clone());
    let loaded = page.load().await;
    flush_toasts(page.toasts_mut());
    if page.managers().is_empty() {
        loaded?;
    }
    print_json(&serde_json::to_value(page.managers())?)
}

// =============================================================================
// MANAGER
// =============================================================================

async fn load_team(app: &App) -> Result<ManagerPage, CliError> {
    let mut page = ManagerPage::new(app.api.clone(), app.ctx.clone());
    let loaded = page.load().await;
    flush_toasts(page.toasts_mut());
    loaded?;
    Ok(page)
}

async fn run_team(app: &App, team: TeamCommand) -> Result<(), CliError> {
    let _guard = app.protected().await?;
    let mut page = load_team(app).await?;

    let (id, status) = match team.command {
        TeamSubcommand::List => return print_json(&serde_json::to_value(page.applications())?),
        TeamSubcommand::Pending => {
            let pending: Vec<_> = page.pending().collect();
            return print_json(&serde_json::to_value(pending)?);
        }
        TeamSubcommand::Approve { id } => (id, LeaveStatus::Approved),
        TeamSubcommand::Reject { id } => (id, LeaveStatus::Rejected),
        TeamSubcommand::Reset { id } => (id, LeaveStatus::Pending),
    };

    let outcome = page.set_status(id, status).await;
    flush_toasts(page.toasts_mut());
    match outcome {
        StatusOutcome::Updated => Ok(()),
        StatusOutcome::Unchanged => {
            println!("application {id} is already {status}");
            Ok(())
        }
        other => Err(CliError::Rejected(format!("set status {id}: {other:?}"))),
    }
}

async fn run_report(app: &App, raw: bool) -> Result<(), CliError> {
    let _guard = app.protected().await?;
    let page = load_team(app).await?;
    if raw {
        return print_json(&serde_json::to_value(page.report())?);
    }
    for totals in page.report_totals() {
        println!(
            "{}: {} days (pending {}, approved {}, rejected {})",
            totals.employee_name, totals.total_days, totals.pending_days, totals.approved_days, totals.rejected_days
        );
    }
    Ok(())
}

// =============================================================================
// OUTPUT
// =============================================================================

fn print_json(value: &Value) -> Result<(), CliError> {
    let rendered = serde_json::to_string_pretty(value)?;
    println!("{rendered}");
    Ok(())
}

fn print_field_errors(errors: &FieldErrors) {
    for (field, message) in errors.iter() {
        eprintln!("{field}: {message}");
    }
}

fn flush_toasts(queue: &mut ToastQueue) {
    for toast in queue.drain() {
        let tag = match toast.kind {
            ToastKind::Success => "ok",
            ToastKind::Error => "error",
        };
        eprintln!("[{tag}] {}", toast.message);
    }
}
