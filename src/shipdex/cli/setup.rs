use clap::{Args, CommandFactory, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "shipdex",
    bin_name = "shipdex",
    version,
    disable_help_flag = true,
    disable_help_subcommand = true
)]
#[command(about = "Catalog your favorite fictional pairings", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Don't fetch the remote snapshot on startup
    #[arg(long, global = true, help_heading = "Options")]
    pub offline: bool,

    /// Verbose output
    #[arg(short, long, global = true, help_heading = "Options")]
    pub verbose: bool,

    /// Print help
    #[arg(short, long, global = true)]
    pub help: bool,
}

/// Command group definitions for help output
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommandGroup {
    Core,
    Pairing,
    Data,
    Misc,
}

impl CommandGroup {
    pub fn heading(&self) -> &'static str {
        match self {
            CommandGroup::Core => "Core Commands:",
            CommandGroup::Pairing => "Per-Pairing Commands:",
            CommandGroup::Data => "Data Commands:",
            CommandGroup::Misc => "Miscellaneous:",
        }
    }

    pub fn for_command(name: &str) -> Option<Self> {
        match name {
            "add" | "list" | "search" => Some(CommandGroup::Core),
            "view" | "edit" | "fav" | "delete" => Some(CommandGroup::Pairing),
            "export" | "import" | "stats" | "fandoms" | "doctor" => Some(CommandGroup::Data),
            "path" | "config" | "help" => Some(CommandGroup::Misc),
            _ => None,
        }
    }

    pub fn all() -> &'static [CommandGroup] {
        &[
            CommandGroup::Core,
            CommandGroup::Pairing,
            CommandGroup::Data,
            CommandGroup::Misc,
        ]
    }
}

pub fn get_grouped_help() -> String {
    let mut cmd = Cli::command();
    cmd.build();
    let version = cmd.get_version().unwrap_or("unknown");

    let mut output = String::new();
    output.push_str(&format!("shipdex {version}\n"));
    output.push_str("Catalog your favorite fictional pairings\n");
    output.push('\n');
    output.push_str("Usage: shipdex [OPTIONS] [COMMAND]\n");

    let subcommands: Vec<_> = cmd.get_subcommands().collect();

    for group in CommandGroup::all() {
        let group_cmds: Vec<_> = subcommands
            .iter()
            .filter(|sc| {
                !sc.is_hide_set() && CommandGroup::for_command(sc.get_name()) == Some(*group)
            })
            .collect();

        if !group_cmds.is_empty() {
            output.push('\n');
            output.push_str(&format!("{}\n", group.heading()));
            for sc in group_cmds {
                let name = sc.get_name();
                let about = sc.get_about().map(|s| s.to_string()).unwrap_or_default();
                output.push_str(&format!("  {:<12} {}\n", name, about));
            }
        }
    }

    output.push('\n');
    output.push_str("Options:\n");
    for arg in cmd.get_arguments().filter(|a| !a.is_positional() && !a.is_hide_set()) {
        let short = arg
            .get_short()
            .map(|c| format!("-{c}, "))
            .unwrap_or_else(|| "    ".to_string());
        let long = arg.get_long().map(|l| format!("--{l}")).unwrap_or_default();
        let help = arg.get_help().map(|h| h.to_string()).unwrap_or_default();
        output.push_str(&format!("  {short}{long:<12} {help}\n"));
    }

    output
}

pub fn print_grouped_help() {
    print!("{}", get_grouped_help());
}

pub fn command_name(command: &Commands) -> &'static str {
    match command {
        Commands::Core(c) => match c {
            CoreCommands::Add { .. } => "add",
            CoreCommands::List { .. } => "list",
            CoreCommands::Search { .. } => "search",
        },
        Commands::Pairing(c) => match c {
            PairingCommands::View { .. } => "view",
            PairingCommands::Edit { .. } => "edit",
            PairingCommands::Fav { .. } => "fav",
            PairingCommands::Delete { .. } => "delete",
        },
        Commands::Data(c) => match c {
            DataCommands::Export { .. } => "export",
            DataCommands::Import { .. } => "import",
            DataCommands::Stats => "stats",
            DataCommands::Fandoms => "fandoms",
            DataCommands::Doctor => "doctor",
        },
        Commands::Misc(c) => match c {
            MiscCommands::Path => "path",
            MiscCommands::Config { .. } => "config",
            MiscCommands::Help { .. } => "help",
        },
    }
}

/// Prints help for a command by name, falling back to the grouped overview
pub fn print_help_for_command(name: &str) {
    let mut cmd = Cli::command();

    for subcmd in cmd.get_subcommands_mut() {
        if subcmd.get_name() == name || subcmd.get_all_aliases().any(|a| a == name) {
            let help = subcmd.render_help();
            print!("{}", help);
            return;
        }
    }

    eprintln!("Unknown command: {}", name);
    eprintln!();
    print_grouped_help();
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    #[command(flatten)]
    Core(CoreCommands),

    #[command(flatten)]
    Pairing(PairingCommands),

    #[command(flatten)]
    Data(DataCommands),

    #[command(flatten)]
    Misc(MiscCommands),
}

#[derive(Subcommand, Debug)]
pub enum CoreCommands {
    /// Add a pairing
    #[command(alias = "a", display_order = 1)]
    Add {
        #[command(flatten)]
        fields: PairingArgs,
    },

    /// List pairings
    #[command(alias = "ls", display_order = 2)]
    List {
        #[command(flatten)]
        filters: ListArgs,
    },

    /// Search pairings by name, characters or fandom
    #[command(display_order = 3)]
    Search {
        /// Search words (joined with spaces)
        #[arg(required = true, num_args = 1..)]
        term: Vec<String>,

        /// Also search tags, notes, trope and dynamic
        #[arg(long)]
        extended: bool,
    },
}

#[derive(Subcommand, Debug)]
pub enum PairingCommands {
    /// Show every field of one or more pairings
    #[command(alias = "v", display_order = 10)]
    View {
        /// Ids of the pairings, or a name
        #[arg(required = true, num_args = 1..)]
        selectors: Vec<String>,
    },

    /// Change fields of a pairing; fields not given keep their value
    #[command(alias = "e", display_order = 11)]
    Edit {
        /// Id or exact name of the pairing
        selector: String,

        #[command(flatten)]
        fields: PairingArgs,

        /// Remove the pairing's image
        #[arg(long, conflicts_with_all = ["image", "image_url"])]
        clear_image: bool,
    },

    /// Toggle favorite on one or more pairings
    #[command(alias = "f", display_order = 12)]
    Fav {
        /// Ids of the pairings, or a name
        #[arg(required = true, num_args = 1..)]
        selectors: Vec<String>,
    },

    /// Delete one or more pairings
    #[command(alias = "rm", display_order = 13)]
    Delete {
        /// Ids of the pairings, or a name
        #[arg(required = true, num_args = 1..)]
        selectors: Vec<String>,

        /// Skip confirmation
        #[arg(long, short = 'y')]
        yes: bool,
    },
}

#[derive(Subcommand, Debug)]
pub enum DataCommands {
    /// Write the catalog as a JSON snapshot
    #[command(display_order = 20)]
    Export {
        /// Output file
        #[arg(short, long, default_value = "pairings.json")]
        output: PathBuf,

        /// Print to stdout instead of writing a file
        #[arg(long, conflicts_with = "output")]
        stdout: bool,
    },

    /// Replace the catalog with a JSON snapshot
    #[command(display_order = 21)]
    Import {
        /// Snapshot file
        file: PathBuf,
    },

    /// Show catalog totals
    #[command(display_order = 22)]
    Stats,

    /// Show pairing counts per fandom
    #[command(display_order = 23)]
    Fandoms,

    /// Repair duplicate ids and out-of-range ratings
    #[command(display_order = 24)]
    Doctor,
}

#[derive(Subcommand, Debug)]
pub enum MiscCommands {
    /// Print the location of the catalog file
    #[command(display_order = 30)]
    Path,

    /// Get or set configuration
    #[command(display_order = 31)]
    Config {
        /// Configuration key (e.g. remote-url, bootstrap, sort)
        key: Option<String>,

        /// Value to set
        value: Option<String>,
    },

    /// Print help
    #[command(display_order = 32)]
    Help {
        /// Command to show help for
        command: Option<String>,
    },
}

/// Fields shared by `add` and `edit`.
#[derive(Args, Debug, Default)]
pub struct PairingArgs {
    /// Pairing name, e.g. "Stony"
    #[arg(short, long)]
    pub name: Option<String>,

    /// Characters, e.g. "Steve Rogers x Tony Stark"
    #[arg(short, long)]
    pub characters: Option<String>,

    /// Source work
    #[arg(short, long)]
    pub fandom: Option<String>,

    /// In-universe, Alternate Universe, or your own label
    #[arg(long)]
    pub universe: Option<String>,

    /// Canon, Fanon, OTP, or your own label
    #[arg(long)]
    pub status: Option<String>,

    /// e.g. "Romantic/Platonic"
    #[arg(long)]
    pub relationship: Option<String>,

    /// Year the pairing started
    #[arg(long)]
    pub year: Option<String>,

    /// Media type, e.g. "Film Series"
    #[arg(long)]
    pub media: Option<String>,

    /// Dynamic, or NA
    #[arg(long)]
    pub dynamic: Option<String>,

    /// Trope, or NA
    #[arg(long)]
    pub trope: Option<String>,

    /// Comma-separated tags
    #[arg(long)]
    pub tags: Option<String>,

    /// Number of fanfics
    #[arg(long)]
    pub fanfics: Option<u32>,

    /// Number of art pieces
    #[arg(long)]
    pub art: Option<u32>,

    /// Rating from 0 to 5
    #[arg(long, value_parser = clap::value_parser!(u8).range(0..=5))]
    pub rating: Option<u8>,

    #[arg(long)]
    pub notes: Option<String>,

    /// Mark as favorite
    #[arg(long, conflicts_with = "no_favorite")]
    pub favorite: bool,

    /// Unmark as favorite
    #[arg(long)]
    pub no_favorite: bool,

    /// Image file to embed (JPG, PNG, GIF, WebP)
    #[arg(long, conflicts_with = "image_url")]
    pub image: Option<PathBuf>,

    /// Image link (http or https)
    #[arg(long)]
    pub image_url: Option<String>,
}

/// Filters for `list`.
#[derive(Args, Debug, Default)]
pub struct ListArgs {
    /// Search term
    #[arg(short, long)]
    pub search: Option<String>,

    /// Only favorites
    #[arg(long)]
    pub favorites: bool,

    /// Canon, Fanon, OTP (or "all")
    #[arg(long)]
    pub status: Option<String>,

    /// Relationship contains, e.g. "Romantic"
    #[arg(long)]
    pub relationship: Option<String>,

    #[arg(long)]
    pub dynamic: Option<String>,

    #[arg(long)]
    pub fandom: Option<String>,

    /// Media type
    #[arg(long)]
    pub media: Option<String>,

    #[arg(long)]
    pub universe: Option<String>,

    /// Minimum rating
    #[arg(long, value_parser = clap::value_parser!(u8).range(0..=5))]
    pub min_rating: Option<u8>,

    /// Keep storage order (newest first) instead of sorting by name
    #[arg(long)]
    pub unsorted: bool,

    /// Also search tags, notes, trope and dynamic
    #[arg(long)]
    pub extended: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Cli {
        Cli::try_parse_from(args).unwrap()
    }

    #[test]
    fn cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn no_command_parses() {
        assert!(parse(&["shipdex"]).command.is_none());
    }

    #[test]
    fn add_takes_pairing_fields() {
        let cli = parse(&[
            "shipdex", "add", "-n", "Stony", "-f", "MCU", "--rating", "4", "--favorite",
        ]);
        match cli.command {
            Some(Commands::Core(CoreCommands::Add { fields })) => {
                assert_eq!(fields.name.as_deref(), Some("Stony"));
                assert_eq!(fields.fandom.as_deref(), Some("MCU"));
                assert_eq!(fields.rating, Some(4));
                assert!(fields.favorite);
            }
            other => panic!("unexpected parse: {:?}", other),
        }
    }

    #[test]
    fn rating_out_of_range_is_rejected() {
        assert!(Cli::try_parse_from(["shipdex", "add", "--rating", "6"]).is_err());
    }

    #[test]
    fn image_sources_conflict() {
        assert!(Cli::try_parse_from([
            "shipdex",
            "add",
            "--image",
            "a.png",
            "--image-url",
            "https://x.test/a.png"
        ])
        .is_err());
    }

    #[test]
    fn aliases_resolve() {
        assert!(matches!(
            parse(&["shipdex", "ls", "--favorites"]).command,
            Some(Commands::Core(CoreCommands::List { .. }))
        ));
        assert!(matches!(
            parse(&["shipdex", "rm", "1", "-y"]).command,
            Some(Commands::Pairing(PairingCommands::Delete { yes: true, .. }))
        ));
    }

    #[test]
    fn offline_is_global() {
        assert!(parse(&["shipdex", "stats", "--offline"]).offline);
    }

    #[test]
    fn grouped_help_lists_every_command() {
        let help = get_grouped_help();
        for name in ["add", "list", "view", "edit", "fav", "delete", "export", "import", "config"] {
            assert!(help.contains(name), "missing {}", name);
        }
    }

    #[test]
    fn grouped_help_options_come_from_arg_docs() {
        let help = get_grouped_help();
        let cmd = Cli::command();
        let offline = cmd
            .get_arguments()
            .find(|a| a.get_id() == "offline")
            .and_then(|a| a.get_help())
            .map(|h| h.to_string())
            .unwrap();

        let line = help.lines().find(|l| l.contains("--offline")).unwrap();
        assert!(line.trim_end().ends_with(&offline));
        assert!(help.contains("-v, --verbose"));
        assert!(help.contains("-h, --help"));
        assert!(help.contains("-V, --version"));
    }
}
