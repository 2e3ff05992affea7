use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

/// Trellis: frontmatter relations for markdown vaults.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Override the default vault path detection.
    #[arg(long, global = true)]
    pub vault: Option<PathBuf>,

    /// Increase verbosity (use multiple times for more).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress all output except errors.
    #[arg(short, long, global = true)]
    pub quiet: bool,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Create and initialize a new vault.
    Init(InitArgs),
    /// Open a document and print the resulting status line.
    Open(OpenArgs),
    /// Manage relation definitions.
    Relation(RelationArgs),
    /// Show information about the current vault.
    Info(InfoArgs),
}

// --- Argument Structs for each Subcommand ---

#[derive(Args, Debug)]
pub struct InitArgs {
    /// Optional path where the new vault should be created. Defaults to the
    /// current directory.
    pub path: Option<PathBuf>,
}

#[derive(Args, Debug)]
pub struct OpenArgs {
    /// Vault-relative path of the document to open (the `.md` extension may
    /// be omitted).
    #[arg(required = true)]
    pub document: PathBuf,

    /// Simulate a click on the n-th visible status slot (0-based).
    #[arg(long)]
    pub click: Option<usize>,
}

#[derive(Args, Debug)]
pub struct RelationArgs {
    #[command(subcommand)]
    pub command: RelationCommands,
}

#[derive(Subcommand, Debug)]
pub enum RelationCommands {
    /// List the configured relations in display order.
    List {},
    /// Append a relation definition.
    Add {
        /// Frontmatter key to match.
        #[arg(long)]
        key: String,
        /// Frontmatter value the key must have.
        #[arg(long)]
        value: String,
        /// Status format; `${field}` tokens reference metadata fields.
        #[arg(long, default_value = "")]
        format: String,
        /// Optional icon label prefixed to the rendered text.
        #[arg(long, default_value = "")]
        icon: String,
        /// Click behavior: 0 = none, 1 = open file, 2 = highlight in tree.
        #[arg(long, default_value = "0")]
        behavior: String,
    },
    /// Remove the relation at the given position.
    Remove {
        /// Position of the relation to remove (0-based, as shown by list).
        index: usize,
        /// Skip the confirmation prompt.
        #[arg(long, short)]
        force: bool,
    },
    /// Move the relation at the given position up or down.
    Move {
        /// Position of the relation to move (0-based, as shown by list).
        index: usize,
        #[arg(long, conflicts_with = "down")]
        up: bool,
        #[arg(long)]
        down: bool,
    },
}

#[derive(Args, Debug)]
pub struct InfoArgs {}
