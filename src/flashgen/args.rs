use clap::{Args, Parser, Subcommand};
use flashgen::model::Difficulty;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "flashgen", version)]
#[command(about = "Generate study flashcards from text and PDF documents", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Use the offline demo backend instead of the configured one
    #[arg(long, global = true)]
    pub demo: bool,

    /// Verbose output (debug logging on stderr)
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Generate a collection of flashcards from a document
    #[command(alias = "g")]
    Generate(GenerateArgs),

    /// List collections
    #[command(alias = "ls")]
    List {
        /// Only collections of this subject
        #[arg(short, long)]
        subject: Option<String>,

        /// Search titles and subjects
        #[arg(long)]
        search: Option<String>,
    },

    /// Show the cards of one or more collections
    #[command(alias = "v")]
    Show {
        /// Indexes or ids of the collections (e.g. 1 3 5)
        #[arg(required = true, num_args = 1..)]
        indexes: Vec<String>,
    },

    /// Delete one or more collections
    #[command(alias = "rm")]
    Delete {
        /// Indexes or ids of the collections (e.g. 1 3 5)
        #[arg(required = true, num_args = 1..)]
        indexes: Vec<String>,
    },

    /// Export a collection as csv, json or anki
    Export {
        /// Index or id of the collection
        index: String,

        /// Export format: csv, json or anki
        #[arg(short, long, default_value = "csv")]
        format: String,

        /// Output file ("-" for stdout); defaults to a name based on the title
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Show totals across all collections
    Stats,

    /// Add, remove, edit or enhance single cards
    #[command(subcommand)]
    Card(CardCommands),

    /// Get or set configuration
    Config {
        /// Configuration key (e.g. backend, model, default_count)
        key: Option<String>,

        /// Value to set (if omitted, prints current value)
        value: Option<String>,
    },

    /// Check that the backend is reachable with the current settings
    Check,
}

#[derive(Args, Debug)]
pub struct GenerateArgs {
    /// Source document (.txt, .md or .pdf); "-" or nothing reads stdin
    pub file: Option<PathBuf>,

    /// Use this text instead of a file
    #[arg(long, conflicts_with = "file")]
    pub text: Option<String>,

    /// Subject area (e.g. Biology, History)
    #[arg(short, long)]
    pub subject: Option<String>,

    /// Difficulty: easy, medium, hard or mixed
    #[arg(short, long)]
    pub level: Option<String>,

    /// Number of cards (10 to 25)
    #[arg(short = 'n', long)]
    pub count: Option<usize>,

    /// Collection title
    #[arg(short, long)]
    pub title: Option<String>,

    /// Do not store the collection
    #[arg(long)]
    pub no_save: bool,

    /// Also export the cards: csv, json or anki
    #[arg(short, long)]
    pub export: Option<String>,

    /// Export destination ("-" for stdout)
    #[arg(short, long, requires = "export")]
    pub output: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
pub enum CardCommands {
    /// Add a card to a collection
    Add {
        /// Index or id of the collection
        index: String,
        /// Question
        front: String,
        /// Answer
        back: String,
        #[arg(short, long)]
        difficulty: Option<Difficulty>,
        #[arg(long)]
        topic: Option<String>,
    },

    /// Remove a card from a collection
    #[command(alias = "rm")]
    Remove {
        /// Index or id of the collection
        index: String,
        /// Position or id of the card
        card: String,
    },

    /// Change a card's text, difficulty or topic
    Edit {
        /// Index or id of the collection
        index: String,
        /// Position or id of the card
        card: String,
        #[arg(long)]
        front: Option<String>,
        #[arg(long)]
        back: Option<String>,
        #[arg(short, long)]
        difficulty: Option<Difficulty>,
        #[arg(long)]
        topic: Option<String>,
    },

    /// Ask the backend to improve a card's wording
    Enhance {
        /// Index or id of the collection
        index: String,
        /// Position or id of the card
        card: String,
        /// Store the suggestion instead of only printing it
        #[arg(long)]
        apply: bool,
    },
}
