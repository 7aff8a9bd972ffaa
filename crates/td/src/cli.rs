//! Clap CLI definitions for the `td` command.

use clap::{ArgGroup, Args, Parser, Subcommand};

/// td -- per-user todo notifications.
///
/// Action items raised for a user when something on an issue, merge
/// request or commit needs their attention.
#[derive(Parser, Debug)]
#[command(
    name = "td",
    about = "Per-user todo notifications",
    long_about = "Action items raised for a user when something on an issue, merge request or commit needs their attention.",
    version,
    propagate_version = true
)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalArgs,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Global flags available to all subcommands.
#[derive(Args, Debug, Clone)]
pub struct GlobalArgs {
    /// Todo directory (default: auto-discover .todos/).
    #[arg(long, global = true)]
    pub db: Option<String>,

    /// Acting user id.
    #[arg(long, global = true, env = "TD_USER")]
    pub user: Option<i64>,

    /// Output in JSON format.
    #[arg(long, global = true)]
    pub json: bool,

    /// Enable verbose/debug output.
    #[arg(short = 'v', long, global = true)]
    pub verbose: bool,

    /// Suppress non-essential output (errors only).
    #[arg(short = 'q', long, global = true)]
    pub quiet: bool,
}

/// All available subcommands.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Initialize a .todos directory in the current directory.
    Init(InitArgs),

    /// Create a pending todo for the acting user.
    #[command(alias = "new")]
    Create(CreateArgs),

    /// Mark a pending todo as done.
    Done(DoneArgs),

    /// Mark several (or all) pending todos as done.
    #[command(name = "done-all")]
    DoneAll(DoneAllArgs),

    /// List the acting user's todos.
    #[command(alias = "ls")]
    List(ListArgs),

    /// Show a todo with its resolved target.
    #[command(alias = "view")]
    Show(ShowArgs),

    /// Count the acting user's todos.
    Count(CountArgs),

    /// Manage mirrored issues.
    Issue(IssueArgs),

    /// Manage mirrored merge requests.
    Mr(MrArgs),

    /// Manage mirrored notes.
    Note(NoteArgs),

    /// Manage project labels.
    Label(LabelArgs),
}

// ---------------------------------------------------------------------------
// Init
// ---------------------------------------------------------------------------

/// Arguments for `td init`.
#[derive(Args, Debug)]
pub struct InitArgs {
    /// Re-initialize even if a database already exists.
    #[arg(long)]
    pub force: bool,
}

// ---------------------------------------------------------------------------
// Create
// ---------------------------------------------------------------------------

/// Arguments for `td create`.
#[derive(Args, Debug)]
#[command(group(ArgGroup::new("target").args(["issue", "mr", "commit", "target_type"])))]
pub struct CreateArgs {
    /// Action that raised the todo (assigned, mentioned, build_failed, marked, approval_required).
    #[arg(short = 'a', long)]
    pub action: String,

    /// Project id.
    #[arg(short = 'p', long)]
    pub project: Option<i64>,

    /// Target an issue by id.
    #[arg(long)]
    pub issue: Option<i64>,

    /// Target a merge request by id.
    #[arg(long)]
    pub mr: Option<i64>,

    /// Target a commit by object id.
    #[arg(long)]
    pub commit: Option<String>,

    /// Target kind, for kinds without a dedicated flag.
    #[arg(long = "target-type", requires = "target_id")]
    pub target_type: Option<String>,

    /// Target id, used with --target-type.
    #[arg(long = "target-id")]
    pub target_id: Option<i64>,

    /// User whose event raised the todo.
    #[arg(long)]
    pub author: Option<i64>,

    /// Note that raised the todo.
    #[arg(long)]
    pub note: Option<i64>,
}

// ---------------------------------------------------------------------------
// Done
// ---------------------------------------------------------------------------

/// Arguments for `td done`.
#[derive(Args, Debug)]
pub struct DoneArgs {
    /// Todo id.
    pub id: i64,
}

/// Arguments for `td done-all`.
#[derive(Args, Debug)]
pub struct DoneAllArgs {
    /// Todo ids (default: every pending todo of the acting user).
    pub ids: Vec<i64>,
}

// ---------------------------------------------------------------------------
// List / Show / Count
// ---------------------------------------------------------------------------

/// Arguments for `td list`.
#[derive(Args, Debug)]
pub struct ListArgs {
    /// State to list (pending, done).
    #[arg(short = 's', long, default_value = "pending")]
    pub state: String,

    /// Order: recency (newest first), priority (most urgent label first),
    /// created_asc, created_desc, updated_asc or updated_desc.
    #[arg(long, default_value = "recency")]
    pub sort: String,

    /// Filter by project id.
    #[arg(short = 'p', long)]
    pub project: Option<i64>,

    /// Filter by author id.
    #[arg(long)]
    pub author: Option<i64>,

    /// Filter by action.
    #[arg(short = 'a', long)]
    pub action: Option<String>,

    /// Filter by target kind.
    #[arg(short = 't', long = "type")]
    pub target_type: Option<String>,

    /// Maximum number of todos to show.
    #[arg(short = 'n', long)]
    pub limit: Option<u32>,
}

/// Arguments for `td show`.
#[derive(Args, Debug)]
pub struct ShowArgs {
    /// Todo id.
    pub id: i64,
}

/// Arguments for `td count`.
#[derive(Args, Debug)]
pub struct CountArgs {
    /// Count only this state (default: both).
    #[arg(short = 's', long)]
    pub state: Option<String>,
}

// ---------------------------------------------------------------------------
// Issue / MR
// ---------------------------------------------------------------------------

/// Arguments for `td issue`.
#[derive(Args, Debug)]
pub struct IssueArgs {
    #[command(subcommand)]
    pub command: IssueCommands,
}

/// Issue subcommands.
#[derive(Subcommand, Debug)]
pub enum IssueCommands {
    /// Add or update an issue.
    Add(EntityAddArgs),
}

/// Arguments for `td mr`.
#[derive(Args, Debug)]
pub struct MrArgs {
    #[command(subcommand)]
    pub command: MrCommands,
}

/// Merge request subcommands.
#[derive(Subcommand, Debug)]
pub enum MrCommands {
    /// Add or update a merge request.
    Add(EntityAddArgs),
}

/// Arguments for `td issue add` and `td mr add`.
#[derive(Args, Debug)]
pub struct EntityAddArgs {
    /// Global id.
    #[arg(long)]
    pub id: i64,

    /// Project-scoped number.
    #[arg(long)]
    pub iid: i64,

    /// Project id.
    #[arg(short = 'p', long)]
    pub project: i64,

    /// Project path, used in full references.
    #[arg(long, default_value = "")]
    pub path: String,

    /// Title.
    #[arg(long)]
    pub title: String,
}

// ---------------------------------------------------------------------------
// Note
// ---------------------------------------------------------------------------

/// Arguments for `td note`.
#[derive(Args, Debug)]
pub struct NoteArgs {
    #[command(subcommand)]
    pub command: NoteCommands,
}

/// Note subcommands.
#[derive(Subcommand, Debug)]
pub enum NoteCommands {
    /// Add or update a note.
    Add(NoteAddArgs),
}

/// Arguments for `td note add`.
#[derive(Args, Debug)]
pub struct NoteAddArgs {
    /// Note id.
    #[arg(long)]
    pub id: i64,

    /// Project id.
    #[arg(short = 'p', long)]
    pub project: i64,

    /// Author id.
    #[arg(long)]
    pub author: Option<i64>,

    /// Note text.
    #[arg(long)]
    pub body: String,
}

// ---------------------------------------------------------------------------
// Label
// ---------------------------------------------------------------------------

/// Arguments for `td label`.
#[derive(Args, Debug)]
pub struct LabelArgs {
    #[command(subcommand)]
    pub command: LabelCommands,
}

/// Label subcommands.
#[derive(Subcommand, Debug)]
pub enum LabelCommands {
    /// Create a project label (or update its priority if it exists).
    Add(LabelAddArgs),
    /// Change or clear a label's priority.
    Priority(LabelPriorityArgs),
    /// Attach a label to an issue or merge request.
    Apply(LabelLinkArgs),
    /// Detach a label from an issue or merge request.
    Remove(LabelLinkArgs),
    /// List the labels on an issue or merge request.
    List(LabelTargetArgs),
}

/// Arguments for `td label add`.
#[derive(Args, Debug)]
pub struct LabelAddArgs {
    /// Project id.
    #[arg(short = 'p', long)]
    pub project: i64,

    /// Label title.
    #[arg(long)]
    pub title: String,

    /// Priority (lower is more urgent).
    #[arg(long)]
    pub priority: Option<i32>,
}

/// Arguments for `td label priority`.
#[derive(Args, Debug)]
#[command(group(ArgGroup::new("value").required(true).args(["priority", "clear"])))]
pub struct LabelPriorityArgs {
    /// Label id.
    pub label: i64,

    /// New priority.
    #[arg(long)]
    pub priority: Option<i32>,

    /// Remove the priority.
    #[arg(long)]
    pub clear: bool,
}

/// Arguments for `td label apply` and `td label remove`.
#[derive(Args, Debug)]
pub struct LabelLinkArgs {
    /// Label id.
    #[arg(long)]
    pub label: i64,

    #[command(flatten)]
    pub target: LabelTargetArgs,
}

/// An issue or merge request carrying labels.
#[derive(Args, Debug)]
#[command(group(ArgGroup::new("labelled").required(true).args(["issue", "mr"])))]
pub struct LabelTargetArgs {
    /// Issue id.
    #[arg(long)]
    pub issue: Option<i64>,

    /// Merge request id.
    #[arg(long)]
    pub mr: Option<i64>,
}
