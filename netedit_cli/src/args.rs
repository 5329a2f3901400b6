use clap::{Parser, Subcommand};
use netedit_common::{Config, Endpoint, MatchStyle, ObjectRef, QueryOptions};
use std::path::PathBuf;

/// Netlist editor - query and edit a placed design
#[derive(Parser, Debug)]
#[command(name = "netedit")]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Path to the design (JSON)
    #[arg(short = 'd', long)]
    pub design: PathBuf,

    /// Session configuration (JSON)
    #[arg(short = 'c', long)]
    pub config: Option<PathBuf>,

    /// Write the design back after a mutating command
    #[arg(short = 'w', long, default_value_t = false)]
    pub write: bool,

    /// Override the hierarchy separator
    #[arg(long)]
    pub hsc: Option<char>,

    #[command(subcommand)]
    pub command: Command,
}

impl Args {
    /// Loads the configuration file, if any, and applies overrides.
    pub fn to_config(&self) -> Result<Config, netedit_common::CommonError> {
        let mut config = match &self.config {
            Some(path) => Config::from_json_file(path)?,
            None => Config::default(),
        };
        if let Some(hsc) = self.hsc {
            config.hierarchy_separator = hsc;
        }
        Ok(config)
    }
}

/// Editor commands
#[derive(Subcommand, Debug)]
pub enum Command {
    /// List cells matching a query
    Cells(QueryArgs),
    /// List nets matching a query
    Nets(QueryArgs),
    /// Show name, type, placement and primitives of a cell
    Info { cell: String },
    /// Create a cell, a black box when the template is unknown
    New {
        name: String,
        #[arg(short, long)]
        template: Option<String>,
    },
    /// Remove cells
    Delete { cells: Vec<String> },
    /// Rename a cell
    Rename { cell: String, new_name: String },
    /// Copy a cell and its properties
    Duplicate { reference: String, new_name: String },
    /// Place a cell on a BEL or site (`bel:SITE/BEL`, `site:SITE`)
    Place { cell: String, location: ObjectRef },
    /// Clear a cell's placement
    Unplace { cell: String },
    /// Check whether a placement would be accepted
    Legal { cell: String, location: ObjectRef },
    /// Check whether a cell type fits a location
    Compatible { cell: String, location: ObjectRef },
    /// Insert a cell between a net and some of its sinks
    Insert {
        net: String,
        /// Existing cell to insert; a buffer is created when absent
        #[arg(long)]
        cell: Option<String>,
        /// Sinks to move (`cell/pin` or `port:name`); all sinks when absent
        #[arg(long, num_args = 1..)]
        sinks: Vec<Endpoint>,
        #[arg(long)]
        in_pin: Option<String>,
        #[arg(long)]
        out_pin: Option<String>,
        /// Name of the new downhill net
        #[arg(long)]
        downhill_net: Option<String>,
    },
    /// Tie unconnected inputs of cells to constants
    Tie { cells: Vec<String> },
}

impl Command {
    /// Returns true for commands that change the design.
    pub const fn mutates(&self) -> bool {
        !matches!(
            self,
            Self::Cells(_) | Self::Nets(_) | Self::Info { .. } | Self::Legal { .. } | Self::Compatible { .. }
        )
    }
}

/// Query flags shared by `cells` and `nets`
#[derive(clap::Args, Debug)]
pub struct QueryArgs {
    /// Name patterns; `*` when absent
    pub patterns: Vec<String>,
    /// Also match leaf names below the top level
    #[arg(long)]
    pub hierarchical: bool,
    /// Patterns are regular expressions
    #[arg(long)]
    pub regexp: bool,
    #[arg(long)]
    pub nocase: bool,
    /// Return nothing instead of failing on no match
    #[arg(short, long)]
    pub quiet: bool,
    #[arg(short, long)]
    pub verbose: bool,
    /// Property filter, e.g. `REF_NAME == FDRE && !IS_BEL_FIXED`
    #[arg(long)]
    pub filter: Option<String>,
    /// Related objects (`cell:`, `net:`, `pin:`, `port:`, `bel:`, `site:`, `tile:`)
    #[arg(long = "of", num_args = 1..)]
    pub of_objects: Vec<ObjectRef>,
    /// Let wildcards cross hierarchy levels
    #[arg(long)]
    pub ucf: bool,
}

impl From<&QueryArgs> for QueryOptions {
    fn from(args: &QueryArgs) -> Self {
        let mut query = Self::with_patterns(args.patterns.iter().cloned())
            .hierarchical(args.hierarchical)
            .regexp(args.regexp)
            .nocase(args.nocase)
            .quiet(args.quiet)
            .verbose(args.verbose);
        if let Some(filter) = &args.filter {
            query = query.filter(filter.as_str());
        }
        if args.ucf {
            query = query.match_style(MatchStyle::Ucf);
        }
        query.of_objects.extend(args.of_objects.iter().cloned());
        query
    }
}
