//! Command dispatch: maps parsed commands onto the domain controllers and
//! writes rendered output.

use std::io::Write;
use std::sync::Arc;

use super::args::{Command, ComplaintCommand, LoginArgs, RegisterArgs};
use super::render;
use crate::domain::ports::{PortalApi, SessionStore};
use crate::domain::{
    Access, AuthController, AuthMode, Complaint, ComplaintId, Dashboard, DashboardBootstrap,
    DashboardEntry, Error, ExpiryPolicy, Route, Session,
};

/// Failures surfaced to the person at the terminal.
#[derive(Debug, thiserror::Error)]
pub enum CliError {
    /// No session is stored.
    #[error("not logged in; run `portal login` first")]
    NotLoggedIn,
    /// The stored session was rejected and has been cleared. The message
    /// was already written to the output before the eviction ran.
    #[error("session cleared; please log in again")]
    SessionExpired {
        /// Server or transport message.
        message: String,
    },
    /// A domain operation failed.
    #[error("{0}")]
    Domain(#[from] Error),
    /// Output could not be written.
    #[error("failed to write output: {0}")]
    Output(#[from] std::io::Error),
    /// JSON output could not be encoded.
    #[error("failed to encode output: {0}")]
    Encode(#[from] serde_json::Error),
}

/// Ports and policy a command runs against.
pub struct CliContext<A, S> {
    api: Arc<A>,
    sessions: Arc<S>,
    policy: ExpiryPolicy,
}

impl<A, S> CliContext<A, S> {
    /// Bundle the adapters chosen by the caller.
    pub fn new(api: Arc<A>, sessions: Arc<S>, policy: ExpiryPolicy) -> Self {
        Self {
            api,
            sessions,
            policy,
        }
    }

    fn bootstrap(&self) -> DashboardBootstrap<A, S> {
        DashboardBootstrap::new(Arc::clone(&self.api), Arc::clone(&self.sessions), self.policy)
    }
}

/// Execute `command`, writing human-readable output to `out`.
///
/// # Errors
///
/// Returns [`CliError`] when the command fails; nothing partial is written
/// for failed mutations.
pub async fn run<A, S, W>(
    command: Command,
    ctx: &CliContext<A, S>,
    out: &mut W,
) -> Result<(), CliError>
where
    A: PortalApi,
    S: SessionStore,
    W: Write,
{
    match command {
        Command::Login(args) => login(ctx, args, out).await,
        Command::Register(args) => register(ctx, args, out).await,
        Command::Logout => {
            ctx.bootstrap().logout()?;
            writeln!(out, "Logged out.")?;
            Ok(())
        }
        Command::Whoami => {
            let dashboard = enter(ctx, out).await?;
            writeln!(out, "{}", render::profile(dashboard.profile()))?;
            Ok(())
        }
        Command::Complaints(action) => complaints(ctx, action, out).await,
        Command::Users => users(ctx, out).await,
    }
}

async fn login<A, S, W>(ctx: &CliContext<A, S>, args: LoginArgs, out: &mut W) -> Result<(), CliError>
where
    A: PortalApi,
    S: SessionStore,
    W: Write,
{
    let mut auth = AuthController::new(Arc::clone(&ctx.api), Arc::clone(&ctx.sessions));
    auth.form_mut().email = args.email;
    auth.form_mut().password = args.password;
    match auth.submit().await {
        Some(Route::Dashboard) => {
            let role = match ctx.bootstrap().require_session()? {
                Access::Granted(session) => session.role().as_str(),
                Access::Redirect(_) => return Err(CliError::NotLoggedIn),
            };
            writeln!(out, "Logged in as {role}.")?;
            Ok(())
        }
        _ => Err(rejected(auth.error())),
    }
}

async fn register<A, S, W>(
    ctx: &CliContext<A, S>,
    args: RegisterArgs,
    out: &mut W,
) -> Result<(), CliError>
where
    A: PortalApi,
    S: SessionStore,
    W: Write,
{
    let mut auth = AuthController::new(Arc::clone(&ctx.api), Arc::clone(&ctx.sessions));
    auth.toggle_mode();
    let form = auth.form_mut();
    form.name = args.name;
    form.email = args.email;
    form.roll_number = args.roll_number;
    form.password = args.password;
    form.hostel = args.hostel.unwrap_or_default();
    form.room_number = args.room_number.unwrap_or_default();
    auth.submit().await;
    match (auth.mode(), auth.notice()) {
        (AuthMode::Login, Some(notice)) => {
            writeln!(out, "{notice}")?;
            Ok(())
        }
        _ => Err(rejected(auth.error())),
    }
}

fn rejected(error: Option<&Error>) -> CliError {
    error.cloned().map_or_else(
        || CliError::Domain(Error::internal("the form was rejected without a reason")),
        CliError::Domain,
    )
}

async fn enter<A, S, W>(ctx: &CliContext<A, S>, out: &mut W) -> Result<Dashboard<A>, CliError>
where
    A: PortalApi,
    S: SessionStore,
    W: Write,
{
    match ctx.bootstrap().enter().await? {
        DashboardEntry::Ready(dashboard) => Ok(dashboard),
        DashboardEntry::RedirectToLogin => Err(CliError::NotLoggedIn),
        DashboardEntry::Expiring { message, eviction } => {
            writeln!(out, "{message}")?;
            out.flush()?;
            eviction.complete().await?;
            Err(CliError::SessionExpired { message })
        }
        DashboardEntry::Unavailable { message } => Err(CliError::Domain(Error::fetch(message))),
    }
}

async fn complaints<A, S, W>(
    ctx: &CliContext<A, S>,
    action: ComplaintCommand,
    out: &mut W,
) -> Result<(), CliError>
where
    A: PortalApi,
    S: SessionStore,
    W: Write,
{
    let mut dashboard = enter(ctx, out).await?;
    let list = dashboard.complaints_mut();
    match action {
        ComplaintCommand::List {
            search,
            status,
            json,
        } => {
            list.set_search(search);
            list.set_status_filter(status);
            let view = list.view();
            if json {
                serde_json::to_writer_pretty(&mut *out, &view)?;
                writeln!(out)?;
            } else {
                let table = render::complaint_table(
                    list.heading(),
                    &view,
                    list.complaints().len(),
                    list.empty_state_message(),
                );
                writeln!(out, "{table}")?;
            }
        }
        ComplaintCommand::Submit {
            category,
            title,
            description,
        } => {
            if !list.open_panel() {
                return Err(Error::forbidden("Only students can submit complaints").into());
            }
            let draft = list.draft_mut();
            draft.category = Some(category);
            draft.title = title;
            draft.description = description;
            let created = list.submit().await?;
            writeln!(out, "Submitted complaint #{}.", created.id())?;
            writeln!(out, "{}", render::complaint_row(&created))?;
        }
        ComplaintCommand::SetStatus { id, status } => {
            let updated = list.change_status(id, status).await?;
            writeln!(out, "{}", render::complaint_row(&updated))?;
        }
        ComplaintCommand::Show { id } => {
            let complaint = match list.find(id) {
                Some(found) => found.clone(),
                None => fetch_one(ctx, list.session(), id).await?,
            };
            writeln!(out, "{}", render::complaint_detail(&complaint))?;
        }
        ComplaintCommand::Withdraw { id } => {
            list.withdraw(id).await?;
            writeln!(out, "Withdrew complaint #{id}.")?;
        }
    }
    Ok(())
}

async fn fetch_one<A, S>(
    ctx: &CliContext<A, S>,
    session: &Session,
    id: ComplaintId,
) -> Result<Complaint, Error>
where
    A: PortalApi,
{
    ctx.api.fetch_complaint(session.token(), id).await
}

async fn users<A, S, W>(ctx: &CliContext<A, S>, out: &mut W) -> Result<(), CliError>
where
    A: PortalApi,
    S: SessionStore,
    W: Write,
{
    let session = match ctx.bootstrap().require_admin()? {
        Access::Granted(session) => session,
        Access::Redirect(Route::Login) => return Err(CliError::NotLoggedIn),
        Access::Redirect(Route::Dashboard) => return Err(Error::forbidden("Access denied").into()),
    };
    let users = ctx.api.list_users(session.token()).await?;
    writeln!(out, "{}", render::user_table(&users))?;
    Ok(())
}

#[cfg(test)]
mod tests;
