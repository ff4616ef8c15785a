use clap::Parser;
use env_logger::{Builder, Env, Target};
use fuzzrank::cli::{Cli, Commands};
use fuzzrank::output_formats::OutputFormatter;
use fuzzrank::{
    load_records, FileConfig, FuzzrankError, Result, SearchConfig, SearchEngine, SearchOptions,
    Searchable,
};
use log::info;
use serde_json::Value;
use std::fs;
use std::io::IsTerminal;
use std::time::Instant;

fn main() -> Result<()> {
    let cli = Cli::parse();
    setup_logging(&cli)?;

    let start_time = Instant::now();

    match &cli.command {
        Commands::Search {
            query,
            input,
            preset,
            fields,
            threshold,
            max_results,
            case_sensitive,
            format,
            quiet,
        } => {
            let base = match preset {
                Some(preset) => SearchConfig::preset(*preset),
                None => load_file_config(&cli)?,
            };
            let engine: SearchEngine<Value> = SearchEngine::new(base);

            let items = load_records(input)?;
            info!("Loaded {} records from {}", items.len(), input.display());

            let options = SearchOptions {
                search_fields: fields.clone(),
                fuzzy_threshold: *threshold,
                max_results: *max_results,
                case_sensitive: case_sensitive.then_some(true),
                ..Default::default()
            };
            let response = engine.instant_search(query, &items, &options);

            let formatter = OutputFormatter::new(*format)
                .with_metadata(!quiet)
                .with_color(std::io::stdout().is_terminal());
            print!("{}", formatter.format_response(&response)?);
        }
        Commands::Fields { input } => {
            let items = load_records(input)?;
            let Some(first) = items.first() else {
                return Err(FuzzrankError::InvalidRecords {
                    path: input.clone(),
                    reason: "no records".to_string(),
                });
            };
            for path in first.scalar_field_paths() {
                println!("{path}");
            }
        }
    }

    info!("Finished in {:.2?}", start_time.elapsed());
    Ok(())
}

fn load_file_config(cli: &Cli) -> Result<SearchConfig> {
    let file = match &cli.config {
        Some(path) => FileConfig::from_path(path)?,
        None => FileConfig::load()?,
    };
    file.search_config()
}

fn setup_logging(cli: &Cli) -> Result<()> {
    let default_level = if cli.verbose { "debug" } else { "warn" };
    let mut builder = Builder::from_env(Env::default().default_filter_or(default_level));

    builder.format(|buf, record| {
        use std::io::Write;
        writeln!(
            buf,
            "{} [{}] [{}] {}",
            chrono::Local::now().format("%Y-%m-%d %H:%M:%S"),
            record.level(),
            record.module_path().unwrap_or("unknown"),
            record.args()
        )
    });

    if let Some(log_path) = &cli.log {
        if let Some(parent_dir) = log_path.parent() {
            if !parent_dir.as_os_str().is_empty() && !parent_dir.exists() {
                fs::create_dir_all(parent_dir)?;
            }
        }
        let log_file = fs::File::create(log_path)?;
        builder.target(Target::Pipe(Box::new(log_file)));
    } else {
        builder.target(Target::Stderr);
    }

    builder
        .try_init()
        .map_err(|e| FuzzrankError::Other(e.to_string()))?;
    Ok(())
}
