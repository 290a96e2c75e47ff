use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[clap(author, version, about, long_about = None)]
pub struct Cli {
    /// Configuration file to use instead of the default locations.
    #[clap(long, value_parser, global = true)]
    pub config: Option<PathBuf>,

    /// Directory holding module files and indexes.
    #[clap(long, value_parser, global = true)]
    pub data_dir: Option<PathBuf>,

    /// Bible module to search and display.
    #[clap(long, value_parser, global = true)]
    pub module: Option<String>,

    /// Color level: 0 references, 1 +italics, 2 +attributes, 3 +search terms.
    #[clap(long, value_parser, global = true)]
    pub color_level: Option<i64>,

    /// Verbosity level 0-4.
    #[clap(long, value_parser, global = true)]
    pub verbose: Option<i64>,

    /// Write the log to a file instead of stderr.
    #[clap(long, value_parser, global = true)]
    pub log: Option<PathBuf>,

    #[clap(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Search the indexed module.
    Search {
        /// Terms to search for; quote multi-word terms for the mixed
        /// search.
        #[clap(required = true)]
        terms: Vec<String>,

        /// One of: phrase, multiword, anyword, eitheror, partial_word,
        /// mixed, mixed_phrase, ordered_multiword, regex, combined,
        /// combined_phrase, sword, sword_lucene, sword_phrase,
        /// sword_multiword, sword_entryattrib.
        #[clap(short = 's', long, value_parser, default_value = "phrase")]
        search_type: String,

        /// Search for Strong's numbers.
        #[clap(short = 'S', long, value_parser, default_value_t = false)]
        strongs: bool,

        /// Search for morphological tags.
        #[clap(short = 'M', long, value_parser, default_value_t = false)]
        morph: bool,

        /// Case sensitive search (ignored by regex highlighting only when
        /// requested).
        #[clap(short = 'C', long = "case", value_parser, default_value_t = false)]
        case_sensitive: bool,

        /// Do not search the added (italicized) text.
        #[clap(long, value_parser, default_value_t = false)]
        no_added: bool,

        /// Range to restrict the search to (e.g. 'Matthew-John').
        #[clap(short = 'R', long, value_parser, default_value = "")]
        range: String,

        #[clap(flatten)]
        output: OutputArgs,
    },

    /// Look up verses by reference ('John 3:16-18, Ps 23').
    Lookup {
        /// References to display.
        #[clap(required = true)]
        references: Vec<String>,

        #[clap(flatten)]
        output: OutputArgs,
    },

    /// (Re-)build the search index for the configured module.
    Index,

    /// Look up Strong's numbers (e.g. G2316 or H430).
    Strongs {
        #[clap(required = true)]
        numbers: Vec<String>,
    },

    /// Look up morphological tags in Robinson.
    Morph {
        #[clap(required = true)]
        tags: Vec<String>,
    },

    /// Look up words in Webster's dictionary.
    Webster {
        #[clap(required = true)]
        words: Vec<String>,
    },

    /// Look up words in the KJV dictionary.
    Kjvd {
        #[clap(required = true)]
        words: Vec<String>,
    },

    /// Show the daily devotional ('today' or MM.DD).
    Daily {
        #[clap(default_value = "today")]
        day: String,
    },

    /// Generate shell completions.
    Completions {
        #[clap(value_parser)]
        shell: clap_complete::Shell,
    },
}

/// Output options shared by search and lookup.
#[derive(Args)]
pub struct OutputArgs {
    /// Include Strong's numbers in the verse output.
    #[clap(short = 'n', long = "numbers", value_parser, default_value_t = false)]
    pub show_numbers: bool,

    /// Include morphological tags in the verse output.
    #[clap(short = 't', long = "tags", value_parser, default_value_t = false)]
    pub show_tags: bool,

    /// Include study notes in the verse output.
    #[clap(long, value_parser, default_value_t = false)]
    pub notes: bool,

    /// Strip the added (italicized) text from the output.
    #[clap(long, value_parser, default_value_t = false)]
    pub hide_added: bool,

    /// Verses of context to show before and after each hit.
    #[clap(long, value_parser, default_value_t = 0)]
    pub context: u32,

    /// Print all verses on one line.
    #[clap(long, value_parser, default_value_t = false)]
    pub one_line: bool,

    /// Show only a sorted list of references.
    #[clap(short = 'r', long = "verse-ref", value_parser, default_value_t = false)]
    pub list_only: bool,

    /// Only print the number of verses found.
    #[clap(short = 'q', long, value_parser, default_value_t = false)]
    pub quiet: bool,
}
