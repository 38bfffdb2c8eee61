//! # CLI Layer
//!
//! The CLI layer is the **only** place in the codebase that:
//! - Knows about terminal I/O (stdout, stderr, stdin prompts)
//! - Installs the log subscriber
//! - Handles argument parsing
//! - Formats output for human consumption
//!
//! ## Structure
//!
//! - `run()`: main dispatch logic (called by `main.rs`)
//! - `init_context()`: loads config, builds the API and bootstraps the catalog
//! - `handle_*()`: per-command handlers that call the API and print results

use super::render::{
    print_config, print_fandoms, print_full_pairings, print_messages, print_pairings, print_stats,
};
use super::setup::{
    command_name, print_grouped_help, print_help_for_command, Cli, Commands, CoreCommands,
    DataCommands, ListArgs, MiscCommands, PairingArgs, PairingCommands,
};
use clap::Parser;
use colored::Colorize;
use shipdex::api::{
    CmdMessage, ConfigAction, ImageChange, PairingFilter, PairingPatch, SearchScope, ShipdexApi,
    SortOrder,
};
use shipdex::bootstrap::BootstrapSource;
use shipdex::error::{Result, ShipdexError};
use shipdex::init::initialize;
use shipdex::model::{split_tags, Status, Universe};
use shipdex::query::{axis, PairingQuery};
use shipdex::store::fs::FileStore;
use std::io::{self, IsTerminal, Write};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

pub const LOG_ENV: &str = "SHIPDEX_LOG";

struct AppContext {
    api: ShipdexApi<FileStore>,
}

pub fn run() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    if cli.help {
        match &cli.command {
            None => print_grouped_help(),
            Some(command) => print_help_for_command(command_name(command)),
        }
        return Ok(());
    }

    if let Some(Commands::Misc(MiscCommands::Help { command })) = &cli.command {
        match command {
            Some(name) => print_help_for_command(name),
            None => print_grouped_help(),
        }
        return Ok(());
    }

    let mut ctx = init_context(&cli)?;

    match cli.command {
        Some(Commands::Core(cmd)) => match cmd {
            CoreCommands::Add { fields } => handle_add(&mut ctx, fields),
            CoreCommands::List { filters } => handle_list(&mut ctx, filters),
            CoreCommands::Search { term, extended } => {
                handle_search(&mut ctx, term.join(" "), extended)
            }
        },
        Some(Commands::Pairing(cmd)) => match cmd {
            PairingCommands::View { selectors } => handle_view(&mut ctx, selectors),
            PairingCommands::Edit {
                selector,
                fields,
                clear_image,
            } => handle_edit(&mut ctx, selector, fields, clear_image),
            PairingCommands::Fav { selectors } => handle_fav(&mut ctx, selectors),
            PairingCommands::Delete { selectors, yes } => handle_delete(&mut ctx, selectors, yes),
        },
        Some(Commands::Data(cmd)) => match cmd {
            DataCommands::Export { output, stdout } => handle_export(&mut ctx, output, stdout),
            DataCommands::Import { file } => handle_import(&mut ctx, file),
            DataCommands::Stats => handle_stats(&mut ctx),
            DataCommands::Fandoms => handle_fandoms(&mut ctx),
            DataCommands::Doctor => handle_doctor(&mut ctx),
        },
        Some(Commands::Misc(cmd)) => match cmd {
            MiscCommands::Path => handle_path(&mut ctx),
            MiscCommands::Config { key, value } => handle_config(&mut ctx, key, value),
            MiscCommands::Help { .. } => Ok(()),
        },
        None => handle_list(&mut ctx, ListArgs::default()),
    }
}

/// Logs go to stderr so they never mix with exported snapshots on stdout.
fn init_logging(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new(default_level));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .try_init();
}

fn init_context(cli: &Cli) -> Result<AppContext> {
    let ctx = initialize(cli.offline)?;

    if cli.verbose {
        let origin = match &ctx.report.source {
            BootstrapSource::LocalCache => "local cache".to_string(),
            BootstrapSource::LegacyCache(key) => format!("legacy cache '{}'", key),
            BootstrapSource::Remote => "remote snapshot".to_string(),
            BootstrapSource::Seed => "seed".to_string(),
        };
        eprintln!(
            "{}",
            format!("Loaded {} pairing(s) from {}", ctx.report.count, origin).dimmed()
        );
    }
    for note in &ctx.report.notes {
        eprintln!("{}", note.yellow());
    }

    Ok(AppContext { api: ctx.api })
}

fn handle_add(ctx: &mut AppContext, fields: PairingArgs) -> Result<()> {
    let patch = build_patch(fields, false);
    let result = ctx.api.create_pairing(patch)?;
    print_messages(&result.messages);
    Ok(())
}

fn handle_edit(
    ctx: &mut AppContext,
    selector: String,
    fields: PairingArgs,
    clear_image: bool,
) -> Result<()> {
    let patch = build_patch(fields, clear_image);
    let result = ctx.api.update_pairing(&selector, patch)?;
    print_messages(&result.messages);
    Ok(())
}

fn handle_list(ctx: &mut AppContext, args: ListArgs) -> Result<()> {
    let mut query = ctx.api.default_query();
    query.search = args.search;
    query.filter = PairingFilter {
        favorites_only: args.favorites,
        status: axis(args.status.as_deref()).map(|s| Status::parse(&s)),
        relationship: axis(args.relationship.as_deref()),
        dynamic: axis(args.dynamic.as_deref()),
        fandom: axis(args.fandom.as_deref()),
        media: axis(args.media.as_deref()),
        universe: axis(args.universe.as_deref()).map(|u| Universe::parse(&u)),
        min_rating: args.min_rating,
    };
    if args.unsorted {
        query.sort = SortOrder::Stored;
    }
    if args.extended {
        query.scope = SearchScope::Extended;
    }

    print_query(ctx, &query)
}

fn handle_search(ctx: &mut AppContext, term: String, extended: bool) -> Result<()> {
    let mut query = ctx.api.default_query();
    query.search = Some(term);
    if extended {
        query.scope = SearchScope::Extended;
    }
    print_query(ctx, &query)
}

fn print_query(ctx: &AppContext, query: &PairingQuery) -> Result<()> {
    let result = ctx.api.get_pairings(query)?;
    print_pairings(&result.listed_records);
    print_messages(&result.messages);
    Ok(())
}

fn handle_view(ctx: &mut AppContext, selectors: Vec<String>) -> Result<()> {
    let result = ctx.api.view_pairings(&selectors)?;
    print_full_pairings(&result.listed_records);
    print_messages(&result.messages);
    Ok(())
}

fn handle_fav(ctx: &mut AppContext, selectors: Vec<String>) -> Result<()> {
    let result = ctx.api.toggle_favorites(&selectors)?;
    print_messages(&result.messages);
    Ok(())
}

fn handle_delete(ctx: &mut AppContext, selectors: Vec<String>, yes: bool) -> Result<()> {
    if !yes && io::stdin().is_terminal() {
        let targets = ctx.api.view_pairings(&selectors)?.listed_records;
        for record in &targets {
            println!("  {} {}", record.id.to_string().yellow(), record.label());
        }
        print!("Delete {} pairing(s)? [y/N] ", targets.len());
        io::stdout().flush().map_err(ShipdexError::Io)?;

        let mut input = String::new();
        io::stdin().read_line(&mut input).map_err(ShipdexError::Io)?;
        if !input.trim().eq_ignore_ascii_case("y") {
            print_messages(&[CmdMessage::info("Operation cancelled.")]);
            return Ok(());
        }
    }

    let result = ctx.api.delete_pairings(&selectors)?;
    print_messages(&result.messages);
    Ok(())
}

fn handle_export(ctx: &mut AppContext, output: PathBuf, stdout: bool) -> Result<()> {
    let target = if stdout { None } else { Some(output.as_path()) };
    let result = ctx.api.export_pairings(target)?;
    if let Some(snapshot) = &result.snapshot {
        println!("{}", snapshot);
    }
    print_messages(&result.messages);
    Ok(())
}

fn handle_import(ctx: &mut AppContext, file: PathBuf) -> Result<()> {
    let result = ctx.api.import_pairings(&file)?;
    print_messages(&result.messages);
    Ok(())
}

fn handle_stats(ctx: &mut AppContext) -> Result<()> {
    let result = ctx.api.stats()?;
    if let Some(stats) = &result.stats {
        print_stats(stats);
    }
    print_messages(&result.messages);
    Ok(())
}

fn handle_fandoms(ctx: &mut AppContext) -> Result<()> {
    let result = ctx.api.fandoms()?;
    print_fandoms(&result.fandoms);
    print_messages(&result.messages);
    Ok(())
}

fn handle_doctor(ctx: &mut AppContext) -> Result<()> {
    let result = ctx.api.doctor()?;
    print_messages(&result.messages);
    Ok(())
}

fn handle_path(ctx: &mut AppContext) -> Result<()> {
    let result = ctx.api.slot_paths()?;
    for path in &result.slot_paths {
        println!("{}", path.display());
    }
    print_messages(&result.messages);
    Ok(())
}

fn handle_config(ctx: &mut AppContext, key: Option<String>, value: Option<String>) -> Result<()> {
    let action = match (key, value) {
        (None, _) => ConfigAction::ShowAll,
        (Some(key), None) => ConfigAction::ShowKey(key),
        (Some(key), Some(value)) => ConfigAction::Set(key, value),
    };
    let show_all = matches!(action, ConfigAction::ShowAll);

    let result = ctx.api.config(action)?;
    if show_all {
        if let Some(config) = &result.config {
            print_config(config);
        }
    }
    print_messages(&result.messages);
    Ok(())
}

fn build_patch(fields: PairingArgs, clear_image: bool) -> PairingPatch {
    let favorite = if fields.favorite {
        Some(true)
    } else if fields.no_favorite {
        Some(false)
    } else {
        None
    };

    let image = match (fields.image, fields.image_url) {
        (Some(path), _) => ImageChange::File(path),
        (None, Some(url)) => ImageChange::Url(url),
        (None, None) if clear_image => ImageChange::Clear,
        (None, None) => ImageChange::Keep,
    };

    PairingPatch {
        name: fields.name,
        characters: fields.characters,
        fandom: fields.fandom,
        universe: fields.universe.map(|u| Universe::parse(&u)),
        status: fields.status.map(|s| Status::parse(&s)),
        relationship: fields.relationship,
        year_started: fields.year,
        media: fields.media,
        dynamic: fields.dynamic,
        trope: fields.trope,
        tags: fields.tags.map(|t| split_tags(&t)),
        fanfic_count: fields.fanfics,
        art_count: fields.art,
        rating: fields.rating,
        notes: fields.notes,
        favorite,
        image,
    }
}
