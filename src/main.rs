use clap::{CommandFactory, Parser};
use colored::Colorize;
use env_logger::{Builder, Env, Target};
use is_terminal::IsTerminal;
use log::info;
use std::collections::HashSet;
use std::fs;
use std::str::FromStr;

use versegrep::cli::{Cli, Commands, OutputArgs};
use versegrep::config::Config;
use versegrep::error::{Result as VersegrepResult, VersegrepError};
use versegrep::modules::{mod_lookup, Module};
use versegrep::render::{RenderOptions, VerseRenderer};
use versegrep::search::{SearchMode, SearchOptions, Searcher};
use versegrep::{add_context, parse_verse_range, pattern_set, BibleIndex, IndexBuilder, VerseRef};

fn main() {
    let cli = Cli::parse();

    if let Err(err) = run(&cli) {
        eprintln!("{}", err.to_string().red());
        std::process::exit(1);
    }
}

fn run(cli: &Cli) -> VersegrepResult<()> {
    let config = load_config(cli)?;
    setup_logging(cli, &config)?;

    if !std::io::stdout().is_terminal() {
        colored::control::set_override(false);
    }

    info!("Using module {} from {}", config.module, config.data_dir().display());

    match &cli.command {
        Commands::Search {
            terms,
            search_type,
            strongs,
            morph,
            case_sensitive,
            no_added,
            range,
            output,
        } => {
            // An unknown search type aborts before any search runs.
            let mode = SearchMode::from_str(search_type)?;
            let opts = SearchOptions {
                strongs: *strongs,
                morph: *morph,
                added: !no_added,
                case_sensitive: *case_sensitive,
                range: range.clone(),
            };

            let index = BibleIndex::load(&config.data_dir(), &config.module)?;
            let searcher = Searcher::new(index);
            let results = searcher.search(mode, terms, &opts)?;

            report_count(results.len());

            let patterns = pattern_set(
                mode,
                terms,
                false,
                opts.case_sensitive,
                output.context,
                &results,
            )?;
            print_results(&config, searcher.index(), &results, patterns, &opts, output)
        }

        Commands::Lookup { references, output } => {
            let index = BibleIndex::load(&config.data_dir(), &config.module)?;
            let results: HashSet<VerseRef> = parse_verse_range(&references.join(" "))?
                .into_iter()
                .collect();

            report_count(results.len());

            // A lookup highlights exactly what the user typed.
            let patterns = pattern_set(
                SearchMode::Phrase,
                references,
                true,
                false,
                output.context,
                &results,
            )?;
            let opts = SearchOptions::default();
            print_results(&config, &index, &results, patterns, &opts, output)
        }

        Commands::Index => {
            let module = Module::load(&config.data_dir(), &config.module)?;
            println!(
                "Indexing {}, this could take a while...",
                module.name().cyan()
            );
            let total = module.len() as u64;
            let verses = module
                .entries()
                .map(|(reference, text)| (reference.to_string(), text.to_string()))
                .collect::<Vec<_>>();
            let index = IndexBuilder::new(module.name()).build(verses.into_iter(), total);
            index.save(&config.data_dir())?;
            println!("{}", "Done.".green());
            Ok(())
        }

        Commands::Strongs { numbers } => {
            for number in numbers {
                let number = number.to_uppercase();
                // Greek numbers start with a 'G', Hebrew ones with an 'H'.
                let module = if number.starts_with('G') {
                    "StrongsRealGreek"
                } else {
                    "StrongsRealHebrew"
                };
                let key = number.trim_start_matches(['G', 'H']);
                println!("{}\n", mod_lookup(&config.data_dir(), module, key)?);
            }
            Ok(())
        }

        Commands::Morph { tags } => {
            for tag in tags {
                println!(
                    "{}\n",
                    mod_lookup(&config.data_dir(), "Robinson", &tag.to_uppercase())?
                );
            }
            Ok(())
        }

        Commands::Webster { words } => {
            for word in words {
                println!("{}\n", mod_lookup(&config.data_dir(), "WebstersDict", word)?);
            }
            Ok(())
        }

        Commands::Kjvd { words } => {
            for word in words {
                println!("{}\n", mod_lookup(&config.data_dir(), "KJVD", word)?);
            }
            Ok(())
        }

        Commands::Daily { day } => {
            let day = if day.eq_ignore_ascii_case("today") {
                chrono::Local::now().format("%m.%d").to_string()
            } else {
                day.clone()
            };
            let daily = Module::load(&config.data_dir(), "Daily")?;
            println!("{}", daily.get_text(&day));
            Ok(())
        }

        Commands::Completions { shell } => {
            let mut cmd = Cli::command();
            clap_complete::generate(*shell, &mut cmd, "versegrep", &mut std::io::stdout());
            Ok(())
        }
    }
}

/// The found-verse count always goes to stderr so piped output stays
/// clean.
fn report_count(count: usize) {
    eprintln!(
        "\nFound {} verse{}.\n",
        count,
        if count == 1 { "" } else { "s" }
    );
}

fn print_results(
    config: &Config,
    index: &BibleIndex,
    results: &HashSet<VerseRef>,
    patterns: Vec<regex::Regex>,
    search_opts: &SearchOptions,
    output: &OutputArgs,
) -> VersegrepResult<()> {
    if output.quiet {
        return Ok(());
    }

    let context_results = add_context(results, output.context);

    if output.list_only {
        for reference in context_results {
            println!("{reference}");
        }
        return Ok(());
    }

    let render_opts = RenderOptions {
        wrap: !output.one_line,
        strongs: output.show_numbers || search_opts.strongs,
        morph: output.show_tags || search_opts.morph,
        added: search_opts.added && !output.hide_added,
        notes: output.notes,
        color_level: config.color_level as u8,
        color: std::io::stdout().is_terminal(),
    };

    let verse_gen = VerseRenderer::new(context_results.into_iter(), index, patterns, render_opts);

    if output.one_line {
        // One pull per verse either way; joining consumes the iterator.
        println!("{}", verse_gen.collect::<Vec<_>>().join("  "));
    } else {
        for verse_text in verse_gen {
            println!("{verse_text}");
        }
    }
    Ok(())
}

fn load_config(cli: &Cli) -> VersegrepResult<Config> {
    let mut config = match &cli.config {
        Some(path) => Config::load_from(path)?,
        None => Config::load()?,
    };

    if let Some(module) = &cli.module {
        config.module = module.clone();
    }
    if let Some(data_dir) = &cli.data_dir {
        config.data_dir = Some(data_dir.clone());
    }
    if let Some(verbose) = cli.verbose {
        config.verbose_level = verbose;
    }
    if let Some(color_level) = cli.color_level {
        config.color_level = color_level;
    }
    config.clamp_levels();

    Ok(config)
}

fn setup_logging(cli: &Cli, config: &Config) -> VersegrepResult<()> {
    let filter = match config.verbose_level {
        0 => "error",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let mut builder = Builder::from_env(Env::default().default_filter_or(filter));

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
                fs::create_dir_all(parent_dir).map_err(VersegrepError::Io)?;
            }
        }
        let log_file = fs::File::create(log_path).map_err(VersegrepError::Io)?;
        builder.target(Target::Pipe(Box::new(log_file)));
    } else {
        builder.target(Target::Stderr);
    }

    builder
        .try_init()
        .map_err(|e| VersegrepError::Other(e.to_string()))?;
    Ok(())
}
