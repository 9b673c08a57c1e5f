use anyhow::Context;
use clap::{Parser, Subcommand};
use farmseva::contacts::{parse_webhook_output, parse_webhook_response, partition_by_type};
use farmseva::ingest::{read_csv, read_json_lines};
use farmseva::prelude::*;
use farmseva::{
    parse_list, parse_measures, ApplicationStatus, Bookmarks, ContactFilters, ContactQuery,
    ContactTab, JsonFileStore,
};
use serde::Serialize;
use std::io::{self, BufReader, Read};
use std::path::PathBuf;
use tracing::info;

/// Classify and filter FarmSeva scheme, outbreak and vet-contact records
#[derive(Parser, Debug)]
#[command(name = "farmseva")]
#[command(about = "Classify and filter farm scheme, outbreak and vet-contact records")]
#[command(version)]
struct Args {
    /// YAML keyword configuration (default: built-in lists, or FARMSEVA_CONFIG env var)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(clap::Args, Debug)]
struct Input {
    /// Sheet export to read (default: stdin)
    input: Option<PathBuf>,

    /// Input is one JSON object per line instead of CSV
    #[arg(long)]
    json_lines: bool,

    /// Data rows to skip after the CSV header
    #[arg(long)]
    skip: Option<usize>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Filter, tag and search government schemes
    Schemes {
        #[command(flatten)]
        input: Input,

        /// Case-insensitive search over name, description and ministry
        #[arg(long, default_value = "")]
        search: String,

        /// Only schemes in these categories (e.g. pig-farming general-agriculture)
        #[arg(long, num_args = 0..)]
        category: Vec<String>,

        /// Domain filter: default or none
        #[arg(long, default_value = "default", value_parser = ["default", "none"])]
        filter: String,
    },

    /// List the categories present in a scheme sheet
    Categories {
        #[command(flatten)]
        input: Input,
    },

    /// Derive disease alerts flagged against a location
    Outbreaks {
        #[command(flatten)]
        input: Input,

        /// User location to flag nearby alerts
        #[arg(long)]
        location: Option<String>,

        #[arg(long, default_value = "")]
        search: String,

        /// Alert type, or "all"
        #[arg(long = "type", default_value = "all")]
        alert_type: String,

        #[arg(long, default_value = "current", value_parser = ["current", "history"])]
        tab: String,
    },

    /// Classify a single title and description
    Classify {
        #[arg(long)]
        title: Option<String>,

        #[arg(long)]
        description: Option<String>,
    },

    /// Split a free-text enumeration into items
    ParseList {
        text: String,

        /// Use the preventive-measures rules
        #[arg(long)]
        measures: bool,
    },

    /// Filter a vet directory webhook response
    Contacts {
        /// Webhook response body (default: stdin)
        input: Option<PathBuf>,

        /// Input is the bare `output` text rather than the JSON response
        #[arg(long)]
        raw: bool,

        #[arg(
            long,
            default_value = "all",
            value_parser = ["all", "saved", "contacted", "government", "local"]
        )]
        tab: String,

        #[arg(long)]
        emergency: bool,

        #[arg(long)]
        open_now: bool,

        #[arg(long)]
        high_rating: bool,

        /// Bookmark store (default: $HOME/.farmseva/bookmarks.json, or FARMSEVA_STORE env var)
        #[arg(long)]
        store: Option<PathBuf>,
    },

    /// Manage saved schemes and application status
    Bookmark {
        /// Bookmark store (default: $HOME/.farmseva/bookmarks.json, or FARMSEVA_STORE env var)
        #[arg(long)]
        store: Option<PathBuf>,

        #[command(subcommand)]
        action: BookmarkAction,
    },
}

#[derive(Subcommand, Debug)]
enum BookmarkAction {
    /// Save or unsave a scheme
    Save { name: String },
    /// Record an application status: applied, pending or not-applied
    Apply { name: String, status: String },
    /// Print saved and applied schemes
    List,
}

fn print_available_commands() {
    println!("Available commands:");
    println!("  schemes      Filter, tag and search government schemes");
    println!("  categories   List the categories present in a scheme sheet");
    println!("  outbreaks    Derive disease alerts flagged against a location");
    println!("  classify     Classify a single title and description");
    println!("  parse-list   Split a free-text enumeration into items");
    println!("  contacts     Filter a vet directory webhook response");
    println!("  bookmark     Manage saved schemes and application status");
}

fn load_config(path: Option<PathBuf>) -> anyhow::Result<Config> {
    // Check flag first, then environment variable, then built-in lists
    let path = path.or_else(|| std::env::var("FARMSEVA_CONFIG").ok().map(PathBuf::from));
    match path {
        Some(path) => {
            info!(path = %path.display(), "loading keyword configuration");
            Config::from_yaml_file(&path)
                .with_context(|| format!("Failed to load config {}", path.display()))
        }
        None => Ok(ConfigBuilder::new().build()?),
    }
}

fn store_path(store: Option<PathBuf>) -> anyhow::Result<PathBuf> {
    if let Some(store) = store {
        Ok(store)
    } else if let Ok(store) = std::env::var("FARMSEVA_STORE") {
        Ok(PathBuf::from(store))
    } else {
        let home = std::env::var("HOME").context("HOME is not set; pass --store")?;
        Ok(PathBuf::from(home).join(".farmseva").join("bookmarks.json"))
    }
}

fn open_input(path: Option<&PathBuf>) -> anyhow::Result<Box<dyn Read>> {
    Ok(match path {
        Some(path) => Box::new(
            std::fs::File::open(path)
                .with_context(|| format!("Failed to open {}", path.display()))?,
        ),
        None => Box::new(io::stdin()),
    })
}

fn read_records(input: &Input, default_skip: usize) -> anyhow::Result<Vec<Record>> {
    let reader = open_input(input.input.as_ref())?;
    let records = if input.json_lines {
        read_json_lines(BufReader::new(reader))?
    } else {
        read_csv(reader, input.skip.unwrap_or(default_skip))?
    };
    Ok(records)
}

/// Write JSON to stdout (one per line)
fn emit<T: Serialize>(items: impl IntoIterator<Item = T>) -> anyhow::Result<()> {
    for item in items {
        println!("{}", serde_json::to_string(&item)?);
    }
    Ok(())
}

fn run_schemes_command(
    config: Config,
    input: Input,
    search: String,
    category: Vec<String>,
    filter: String,
) -> anyhow::Result<()> {
    let categories = category
        .iter()
        .map(|c| c.parse::<CategoryTag>())
        .collect::<Result<Vec<_>>>()?;

    let records = read_records(&input, config.header_rows)?;
    let processor = Processor::with_filter(config, FilterAlias::from(filter.as_str()));
    let views = processor.schemes(&records);

    let query = SchemeQuery { search, categories };
    emit(query.apply(processor.classifier(), &views))
}

fn run_outbreaks_command(
    config: Config,
    input: Input,
    location: Option<String>,
    search: String,
    alert_type: String,
    tab: String,
) -> anyhow::Result<()> {
    let records = read_records(&input, 0)?;
    let processor = Processor::new(config);
    let views = processor.outbreaks(&records, location.as_deref());

    let query = OutbreakQuery {
        search,
        alert_type,
        tab: AlertTab::from(tab.as_str()),
    };
    emit(query.apply(&views))
}

#[derive(Serialize)]
struct ContactsOutput<'a> {
    government: Vec<&'a farmseva::VetContact>,
    local: Vec<&'a farmseva::VetContact>,
}

fn run_contacts_command(config: &Config, cmd: Command) -> anyhow::Result<()> {
    let Command::Contacts {
        input,
        raw,
        tab,
        emergency,
        open_now,
        high_rating,
        store,
    } = cmd
    else {
        unreachable!()
    };

    let mut body = String::new();
    open_input(input.as_ref())?.read_to_string(&mut body)?;
    let contacts = if raw {
        parse_webhook_output(&body)?
    } else {
        parse_webhook_response(&body)?
    };

    let bookmarks = Bookmarks::new(JsonFileStore::open(store_path(store)?)?);
    let saved = bookmarks.saved_contact_names()?;
    let contacted = bookmarks.contacted_names()?;

    let query = ContactQuery {
        tab: ContactTab::from(tab.as_str()),
        filters: ContactFilters {
            emergency,
            open_now,
            high_rating,
        },
        high_rating_threshold: config.high_rating_threshold,
    };
    let matched = query.apply(&contacts, &saved, &contacted);
    let (government, local) = partition_by_type(&matched);
    emit([ContactsOutput { government, local }])
}

fn run_bookmark_command(store: Option<PathBuf>, action: BookmarkAction) -> anyhow::Result<()> {
    let mut bookmarks = Bookmarks::new(JsonFileStore::open(store_path(store)?)?);

    match action {
        BookmarkAction::Save { name } => {
            let saved = bookmarks.toggle_saved_scheme(&name)?;
            emit([serde_json::json!({ "scheme": name, "saved": saved })])
        }
        BookmarkAction::Apply { name, status } => {
            let status: ApplicationStatus = status.parse()?;
            let entry = bookmarks.set_applied_status(&name, status, chrono::Utc::now())?;
            emit([entry])
        }
        BookmarkAction::List => emit([serde_json::json!({
            "saved": bookmarks.saved_schemes()?,
            "applied": bookmarks.applied_schemes()?,
        })]),
    }
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_writer(io::stderr)
        .init();

    let args = Args::parse();

    let Some(command) = args.command else {
        print_available_commands();
        return Ok(());
    };

    let config = load_config(args.config)?;

    match command {
        Command::Schemes {
            input,
            search,
            category,
            filter,
        } => run_schemes_command(config, input, search, category, filter),
        Command::Categories { input } => {
            let records = read_records(&input, config.header_rows)?;
            let processor = Processor::new(config);
            let views = processor.schemes(&records);
            let schemes = views.iter().map(|v| &v.record);
            emit(processor.classifier().available_categories(schemes))
        }
        Command::Outbreaks {
            input,
            location,
            search,
            alert_type,
            tab,
        } => run_outbreaks_command(config, input, location, search, alert_type, tab),
        Command::Classify { title, description } => {
            let classifier = KeywordClassifier::new(config);
            emit([classifier.classify(title.as_deref(), description.as_deref())])
        }
        Command::ParseList { text, measures } => {
            let items = if measures {
                parse_measures(Some(text.as_str()), config.max_preventive_measures)
            } else {
                parse_list(Some(text.as_str()))
            };
            emit([items])
        }
        cmd @ Command::Contacts { .. } => run_contacts_command(&config, cmd),
        Command::Bookmark { store, action } => run_bookmark_command(store, action),
    }
}
