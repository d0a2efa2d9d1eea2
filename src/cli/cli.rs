use clap::{Parser, Subcommand, ValueEnum};

const PASSCARD_LONG_VERSION: &str = concat!(
    "version: ", env!("CARGO_PKG_VERSION"), "\n",
    "git revision: ", env!("PASSCARD_GIT_REVISION"), "\n",
    "build time (UTC): ", env!("PASSCARD_BUILD_TIME"), "\n",
    "target: ", env!("PASSCARD_TARGET"), "\n",
    "profile: ", env!("PASSCARD_BUILD_PROFILE")
);

#[derive(Parser)]
#[command(
    name = "passcard",
    version = env!("CARGO_PKG_VERSION"),
    long_version = PASSCARD_LONG_VERSION,
    about = "🔑 Passcard: password cards over REST"
)]
pub struct Cli {
    /// Named profile from config.toml
    #[arg(long, global = true)]
    pub profile: Option<String>,
    /// Backend base URL (overrides profile, env and config)
    #[arg(long, global = true)]
    pub base_url: Option<String>,
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Launch the interactive Terminal UI (default)
    Tui,
    /// List records (names only by default; passwords are never printed)
    List {
        /// Filter names by substring (case-insensitive)
        #[arg(long)]
        query: Option<String>,
        /// Show URL and username alongside names
        #[arg(long)]
        show_users: bool,
        /// Output JSON array (machine-readable)
        #[arg(long)]
        json: bool,
    },
    /// Show one record by id
    Show {
        id: String,
        /// Print the password instead of a mask
        #[arg(long)]
        reveal_password: bool,
    },
    /// Add a record; missing fields are prompted for
    Add {
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        url: Option<String>,
        #[arg(long)]
        username: Option<String>,
    },
    /// Replace a record's fields; unspecified fields keep their current value
    Edit {
        id: String,
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        url: Option<String>,
        #[arg(long)]
        username: Option<String>,
        /// Prompt for a new password
        #[arg(long)]
        password_prompt: bool,
    },
    /// Delete a record by id (no confirmation)
    Rm { id: String },
    /// Copy a field of a record to the clipboard
    Copy {
        id: String,
        /// Which field to copy
        #[arg(long, value_enum, default_value = "password")]
        field: CopyFieldArg,
        /// Do not copy to clipboard
        #[arg(long)]
        no_copy: bool,
        /// Print the selected field to stdout (use with --no-copy for safe piping)
        #[arg(long)]
        echo: bool,
        /// Clipboard TTL in seconds (overrides PASSCARD_CLIP_TTL)
        #[arg(long)]
        ttl: Option<u64>,
    },
    /// Manage named backend profiles
    #[command(subcommand)]
    Profile(ProfileCommand),
}

#[derive(Copy, Clone, Debug, ValueEnum)]
pub enum CopyFieldArg {
    Password,
    Username,
}

#[derive(Subcommand)]
pub enum ProfileCommand {
    /// List profiles
    List,
    /// Show one profile
    Show { name: String },
    /// Add or update a profile
    Add {
        name: String,
        /// Backend base URL for this profile
        #[arg(long)]
        url: String,
        /// Replace an existing profile of the same name
        #[arg(long)]
        on_duplicate_override: bool,
    },
    /// Remove a profile
    Rm { name: String },
    /// Show, set or clear the default profile
    Default {
        name: Option<String>,
        #[arg(long)]
        clear: bool,
    },
}
