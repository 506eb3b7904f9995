use clap::Parser;
use colored::*;
use directories::ProjectDirs;
use flashgen::api::{
    CardEdit, CmdResult, ConfigAction, ExportOutput, FlashApi, FlashPaths, GenerateInput,
};
use flashgen::config::{BackendKind, FlashgenConfig};
use flashgen::error::{FlashError, Result};
use flashgen::export::ExportFormat;
use flashgen::extract::{load_source, read_all};
use flashgen::generate::demo::DemoBackend;
use flashgen::generate::openai::OpenAiBackend;
use flashgen::generate::{Backend, UnavailableBackend};
use flashgen::model::parse_level;
use flashgen::store::fs::FileStore;
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::{debug, warn, Level};
use tracing_subscriber::EnvFilter;

mod args;
mod render;
use args::{CardCommands, Cli, Commands, GenerateArgs};

const HOME_ENV: &str = "FLASHGEN_HOME";

fn main() {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    if let Err(e) = run(cli) {
        eprintln!("{}", format!("Error: {}", e).red());
        std::process::exit(1);
    }
}

fn init_tracing(verbose: bool) {
    let default = if verbose { Level::DEBUG } else { Level::WARN };
    let filter = EnvFilter::builder()
        .with_default_directive(default.into())
        .from_env_lossy();
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

struct AppContext {
    api: FlashApi<FileStore, Box<dyn Backend>>,
    verbose: bool,
}

fn run(cli: Cli) -> Result<()> {
    let mut ctx = init_context(&cli)?;

    match cli.command {
        Some(Commands::Generate(args)) => handle_generate(&mut ctx, args),
        Some(Commands::List { subject, search }) => handle_list(&ctx, subject, search),
        Some(Commands::Show { indexes }) => handle_show(&ctx, indexes),
        Some(Commands::Delete { indexes }) => handle_delete(&mut ctx, indexes),
        Some(Commands::Export {
            index,
            format,
            output,
        }) => handle_export(&ctx, index, format, output),
        Some(Commands::Stats) => handle_stats(&ctx),
        Some(Commands::Card(command)) => handle_card(&mut ctx, command),
        Some(Commands::Config { key, value }) => handle_config(&ctx, key, value),
        Some(Commands::Check) => handle_check(&ctx),
        None => handle_list(&ctx, None, None),
    }
}

fn init_context(cli: &Cli) -> Result<AppContext> {
    let data_dir = data_dir()?;
    let config = FlashgenConfig::load(&data_dir).unwrap_or_else(|e| {
        warn!(error = %e, "ignoring unreadable config, using defaults");
        FlashgenConfig::default()
    });
    debug!(data_dir = %data_dir.display(), backend = %config.backend, "starting");

    let backend = build_backend(&config, cli.demo);
    let store = FileStore::new(data_dir.clone());
    let api = FlashApi::new(store, backend, config, FlashPaths { data_dir });

    Ok(AppContext {
        api,
        verbose: cli.verbose,
    })
}

fn data_dir() -> Result<PathBuf> {
    if let Some(home) = std::env::var_os(HOME_ENV).filter(|v| !v.is_empty()) {
        return Ok(PathBuf::from(home));
    }
    let proj_dirs = ProjectDirs::from("com", "flashgen", "flashgen").ok_or_else(|| {
        FlashError::Config(format!(
            "Could not determine a data directory; set {}",
            HOME_ENV
        ))
    })?;
    Ok(proj_dirs.data_dir().to_path_buf())
}

fn build_backend(config: &FlashgenConfig, demo: bool) -> Box<dyn Backend> {
    if demo || config.backend == BackendKind::Demo {
        return Box::new(DemoBackend::new());
    }
    match OpenAiBackend::from_config(config) {
        Ok(backend) => Box::new(backend),
        Err(e) => {
            debug!(error = %e, "openai backend unavailable");
            let reason = match e {
                FlashError::Config(msg) => msg,
                other => other.to_string(),
            };
            Box::new(UnavailableBackend::new(reason))
        }
    }
}

fn handle_generate(ctx: &mut AppContext, args: GenerateArgs) -> Result<()> {
    let text = match (args.text, args.file) {
        (Some(text), _) => text,
        (None, Some(path)) if path.as_os_str() != "-" => load_source(&path)?,
        (None, _) => read_all(std::io::stdin().lock())?,
    };
    let level = args
        .level
        .as_deref()
        .map(parse_level)
        .transpose()
        .map_err(FlashError::Api)?
        .flatten();
    let export = args
        .export
        .as_deref()
        .map(str::parse::<ExportFormat>)
        .transpose()?;

    let input = GenerateInput {
        text,
        subject: args.subject,
        level,
        count: args.count,
        title: args.title,
        save: !args.no_save,
        export,
    };

    let result = ctx.api.generate(input)?;
    if let Some(report) = &result.generation {
        render::print_report(report, ctx.verbose);
    }
    render::print_messages(&result.messages);
    write_export(&result, args.output.as_deref())
}

fn handle_list(ctx: &AppContext, subject: Option<String>, search: Option<String>) -> Result<()> {
    let result = ctx
        .api
        .list_collections(subject.as_deref(), search.as_deref())?;
    render::print_collections(&result.listed_collections);
    render::print_messages(&result.messages);
    Ok(())
}

fn handle_show(ctx: &AppContext, indexes: Vec<String>) -> Result<()> {
    let result = ctx.api.show_collections(&indexes)?;
    for (i, (listed, collection)) in result
        .listed_collections
        .iter()
        .zip(&result.affected_collections)
        .enumerate()
    {
        if i > 0 {
            println!("\n================================\n");
        }
        render::print_full_collection(Some(listed.index), collection);
    }
    render::print_messages(&result.messages);
    Ok(())
}

fn handle_delete(ctx: &mut AppContext, indexes: Vec<String>) -> Result<()> {
    let result = ctx.api.delete_collections(&indexes)?;
    render::print_messages(&result.messages);
    Ok(())
}

fn handle_export(
    ctx: &AppContext,
    index: String,
    format: String,
    output: Option<PathBuf>,
) -> Result<()> {
    let result = ctx.api.export_collection(&index, &format)?;
    render::print_messages(&result.messages);
    write_export(&result, output.as_deref())
}

fn handle_stats(ctx: &AppContext) -> Result<()> {
    let result = ctx.api.stats()?;
    if let Some(stats) = &result.stats {
        render::print_stats(stats);
    }
    render::print_messages(&result.messages);
    Ok(())
}

fn handle_card(ctx: &mut AppContext, command: CardCommands) -> Result<()> {
    let result = match command {
        CardCommands::Add {
            index,
            front,
            back,
            difficulty,
            topic,
        } => ctx.api.add_card(&index, &front, &back, difficulty, topic)?,
        CardCommands::Remove { index, card } => ctx.api.remove_card(&index, &card)?,
        CardCommands::Edit {
            index,
            card,
            front,
            back,
            difficulty,
            topic,
        } => {
            let changes = CardEdit {
                front,
                back,
                difficulty,
                topic,
            };
            ctx.api.edit_card(&index, &card, changes)?
        }
        CardCommands::Enhance { index, card, apply } => {
            let result = ctx.api.enhance_card(&index, &card, apply)?;
            for (i, suggestion) in result.affected_cards.iter().enumerate() {
                render::print_card(i + 1, suggestion);
            }
            result
        }
    };
    render::print_messages(&result.messages);
    Ok(())
}

fn handle_config(ctx: &AppContext, key: Option<String>, value: Option<String>) -> Result<()> {
    let action = match (key, value) {
        (None, _) => ConfigAction::ShowAll,
        (Some(key), None) => ConfigAction::ShowKey(key),
        (Some(key), Some(value)) => ConfigAction::Set(key, value),
    };

    let result = ctx.api.config(action)?;
    if let Some(config) = &result.config {
        if result.messages.is_empty() {
            render::print_config(config);
        }
    }
    render::print_messages(&result.messages);
    Ok(())
}

fn handle_check(ctx: &AppContext) -> Result<()> {
    debug!(backend = ctx.api.backend_name(), "checking backend");
    let result = ctx.api.check_backend()?;
    render::print_messages(&result.messages);
    Ok(())
}

/// Writes an export produced by a command to `output`, its suggested file
/// name, or stdout for "-".
fn write_export(result: &CmdResult, output: Option<&Path>) -> Result<()> {
    let Some(export) = &result.export else {
        return Ok(());
    };

    match output {
        Some(path) if path.as_os_str() == "-" => {
            let mut stdout = std::io::stdout().lock();
            stdout.write_all(&export.bytes)?;
            stdout.flush()?;
        }
        Some(path) => save_export(export, path)?,
        None => save_export(export, Path::new(&export.filename))?,
    }
    Ok(())
}

fn save_export(export: &ExportOutput, path: &Path) -> Result<()> {
    std::fs::write(path, &export.bytes)?;
    println!(
        "{}",
        format!("Exported {} to {}", export.format, path.display()).green()
    );
    Ok(())
}
