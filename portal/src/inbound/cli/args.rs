//! Command-line surface of the `portal` binary.

use clap::{Args, Parser, Subcommand};

use crate::domain::{Category, ComplaintId, ComplaintStatus, StatusFilter};

/// `portal` command arguments.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "portal",
    about = "Submit and triage hostel maintenance complaints",
    version
)]
pub struct Cli {
    /// Backend API base URL. Overrides `PORTAL_API_URL`.
    #[arg(long = "api-url", value_name = "url", global = true)]
    pub api_url: Option<String>,
    /// Session file path. Overrides `PORTAL_SESSION_FILE`.
    #[arg(long = "session-file", value_name = "path", global = true)]
    pub session_file: Option<String>,
    /// Action to perform.
    #[command(subcommand)]
    pub command: Command,
}

/// Top-level actions.
#[derive(Debug, Clone, Subcommand)]
pub enum Command {
    /// Log in and store the session.
    Login(LoginArgs),
    /// Create a student account.
    Register(RegisterArgs),
    /// Forget the stored session.
    Logout,
    /// Show the logged-in profile.
    Whoami,
    /// Work with complaints.
    #[command(subcommand)]
    Complaints(ComplaintCommand),
    /// List every registered user (administrators only).
    Users,
}

/// `portal login` arguments.
#[derive(Debug, Clone, Args)]
pub struct LoginArgs {
    /// Account email.
    #[arg(long, value_name = "email")]
    pub email: String,
    /// Account password.
    #[arg(long, value_name = "password")]
    pub password: String,
}

/// `portal register` arguments.
#[derive(Debug, Clone, Args)]
pub struct RegisterArgs {
    /// Full name.
    #[arg(long, value_name = "name")]
    pub name: String,
    /// Email address.
    #[arg(long, value_name = "email")]
    pub email: String,
    /// Institute roll number.
    #[arg(long = "roll-number", value_name = "roll")]
    pub roll_number: String,
    /// Password.
    #[arg(long, value_name = "password")]
    pub password: String,
    /// Hostel of residence.
    #[arg(long, value_name = "hostel")]
    pub hostel: Option<String>,
    /// Room number.
    #[arg(long = "room", value_name = "room")]
    pub room_number: Option<String>,
}

/// `portal complaints` actions.
#[derive(Debug, Clone, Subcommand)]
pub enum ComplaintCommand {
    /// List complaints visible to the session.
    List {
        /// Case-insensitive text matched against title, description, and category.
        #[arg(long, default_value = "")]
        search: String,
        /// `all`, `Pending`, `In Progress`, `Resolved`, or `Rejected`.
        #[arg(long, default_value = "all")]
        status: StatusFilter,
        /// Emit the filtered list as JSON.
        #[arg(long)]
        json: bool,
    },
    /// Submit a new complaint (students only).
    Submit {
        /// Electrical, Plumbing, Furniture, Cleaning, or Others.
        #[arg(long)]
        category: Category,
        /// Short summary.
        #[arg(long)]
        title: String,
        /// Details.
        #[arg(long)]
        description: String,
    },
    /// Change a complaint's status (administrators only).
    SetStatus {
        /// Complaint id, with or without a leading `#`.
        id: ComplaintId,
        /// New status.
        status: ComplaintStatus,
    },
    /// Show one complaint.
    Show {
        /// Complaint id.
        id: ComplaintId,
    },
    /// Delete a complaint.
    Withdraw {
        /// Complaint id.
        id: ComplaintId,
    },
}

#[cfg(test)]
mod tests {
    //! Argument parsing for the `portal` binary.
    use super::*;
    use rstest::rstest;

    fn parse(args: &[&str]) -> Cli {
        Cli::try_parse_from(std::iter::once("portal").chain(args.iter().copied()))
            .expect("arguments parse")
    }

    #[rstest]
    fn global_overrides_parse_after_subcommand() {
        let cli = parse(&["whoami", "--api-url", "http://example.edu/api"]);
        assert_eq!(cli.api_url.as_deref(), Some("http://example.edu/api"));
        assert!(matches!(cli.command, Command::Whoami));
    }

    #[rstest]
    fn list_defaults_to_no_filter() {
        let cli = parse(&["complaints", "list"]);
        let Command::Complaints(ComplaintCommand::List { search, status, json }) = cli.command
        else {
            panic!("expected complaints list");
        };
        assert!(search.is_empty());
        assert_eq!(status, StatusFilter::All);
        assert!(!json);
    }

    #[rstest]
    fn set_status_accepts_spaced_status_and_hash_id() {
        let cli = parse(&["complaints", "set-status", "#7", "in-progress"]);
        let Command::Complaints(ComplaintCommand::SetStatus { id, status }) = cli.command else {
            panic!("expected set-status");
        };
        assert_eq!(id, ComplaintId::new(7));
        assert_eq!(status, ComplaintStatus::InProgress);
    }

    #[rstest]
    fn unknown_category_is_rejected() {
        let result = Cli::try_parse_from([
            "portal",
            "complaints",
            "submit",
            "--category",
            "Roofing",
            "--title",
            "t",
            "--description",
            "d",
        ]);
        assert!(result.is_err());
    }
}
