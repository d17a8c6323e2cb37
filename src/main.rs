use clap::{Args, Parser, Subcommand, ValueEnum};
use colored::Colorize;
use eyre::{Result, eyre};
use rosterview::{
    Clock, EngineConfig, JsonlSource, ListViewEngine, Personnel, Record, SortDirection, Stagiaire, StatsSummary,
    SystemClock, is_active,
};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "rosterview")]
#[command(about = "RosterView CLI - search, filter and summarize personnel and intern rosters")]
#[command(version = env!("GIT_DESCRIBE"))]
struct Cli {
    /// JSONL file holding the collection
    #[arg(short, long)]
    file: PathBuf,

    /// Entity kind stored in the file
    #[arg(short, long, value_enum, default_value_t = Kind::Stagiaires)]
    kind: Kind,

    /// Config file (default: platform config directory)
    #[arg(long)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Clone, Copy, ValueEnum)]
enum Kind {
    Personnel,
    Stagiaires,
}

#[derive(Subcommand)]
enum Commands {
    /// Show one page of matching records
    List(ListArgs),

    /// Show statistics over the whole collection
    Stats,
}

#[derive(Args)]
struct ListArgs {
    /// Case-insensitive substring over names, email, category, room
    #[arg(short, long)]
    search: Option<String>,

    /// active, inactive or all
    #[arg(long)]
    status: Option<String>,

    /// Department or intern type
    #[arg(long)]
    category: Option<String>,

    /// Exact room number
    #[arg(long)]
    room: Option<String>,

    /// withAssignment, withoutAssignment or all
    #[arg(long)]
    assignment: Option<String>,

    /// Earliest start date (YYYY-MM-DD)
    #[arg(long)]
    from: Option<String>,

    /// Latest start date (YYYY-MM-DD)
    #[arg(long)]
    to: Option<String>,

    /// Extra field filter, e.g. trimestre_1=true or date_fin>=2024-06-30
    #[arg(long = "filter", value_name = "KEY=VALUE")]
    filters: Vec<String>,

    /// Field to sort by
    #[arg(long)]
    sort: Option<String>,

    /// Sort descending
    #[arg(long)]
    desc: bool,

    #[arg(short, long, default_value_t = 1)]
    page: usize,

    /// Override the configured page size
    #[arg(long)]
    page_size: Option<usize>,
}

fn main() -> Result<()> {
    // Setup tracing
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.kind {
        Kind::Personnel => run::<Personnel>(&cli),
        Kind::Stagiaires => run::<Stagiaire>(&cli),
    }
}

fn run<R: Record>(cli: &Cli) -> Result<()> {
    let mut config = EngineConfig::load(cli.config.as_deref())?;
    if let Commands::List(args) = &cli.command {
        if let Some(size) = args.page_size {
            config.page_size = size;
            config.validate()?;
        }
    }

    let mut engine: ListViewEngine<R> = ListViewEngine::with_system_clock(config);
    engine.refresh(&JsonlSource::new(&cli.file))?;

    match &cli.command {
        Commands::List(args) => list(&mut engine, args),
        Commands::Stats => {
            print_stats(engine.stats());
            Ok(())
        }
    }
}

/// Split `key=value`; `key>=value` keeps the operator on the key
fn parse_filter_arg(raw: &str) -> Result<(String, String)> {
    let (key, value) = raw
        .split_once('=')
        .ok_or_else(|| eyre!("Invalid filter: {} (expected KEY=VALUE)", raw))?;
    let key = if key.ends_with(['>', '<', '!']) {
        format!("{}=", key)
    } else {
        key.to_string()
    };
    Ok((key, value.to_string()))
}

fn list<R: Record>(engine: &mut ListViewEngine<R>, args: &ListArgs) -> Result<()> {
    let named = [
        ("status", &args.status),
        ("category", &args.category),
        ("specificValue", &args.room),
        ("assignment", &args.assignment),
        ("startDate", &args.from),
        ("endDate", &args.to),
    ];
    for (name, value) in named {
        if let Some(value) = value {
            engine.set_filter(name, value)?;
        }
    }
    for raw in &args.filters {
        let (key, value) = parse_filter_arg(raw)?;
        engine.set_filter(&key, &value)?;
    }
    if let Some(term) = &args.search {
        engine.set_search_term(term);
    }
    if let Some(field) = &args.sort {
        let direction = if args.desc { SortDirection::Desc } else { SortDirection::Asc };
        engine.set_sort(field, direction);
    } else if args.desc {
        let field = engine.query().sort.field.clone();
        engine.set_sort(&field, SortDirection::Desc);
    }
    engine.set_page(args.page);

    let today = SystemClock.today();
    let schema = R::schema();
    let view = engine.view();

    if view.items.is_empty() {
        println!("{}", "No matching records".yellow());
        return Ok(());
    }

    for record in &view.items {
        let marker = if is_active(*record, today) {
            "active".green()
        } else {
            "inactive".dimmed()
        };
        let name = match schema.full_name {
            Some((first, last)) => format!("{} {}", record.text(first), record.text(last)),
            None => record.id().to_string(),
        };
        let mut line = format!(
            "{:<10} {} {:<16} {} -> {}  {}",
            record.id(),
            format!("{:<28}", name).bold(),
            record.text(schema.category_field),
            or_dash(record.text(schema.start_date_field)),
            or_dash(record.text(schema.end_date_field)),
            marker
        );
        if let Some(field) = schema.assignment_field {
            line.push_str(&format!("  room {}", or_dash(record.text(field))));
        }
        println!("{}", line);
    }

    println!(
        "{}",
        format!("page {}/{} ({} records)", view.current_page, view.total_pages, view.total).dimmed()
    );
    Ok(())
}

fn or_dash(s: String) -> String {
    if s.is_empty() { "-".to_string() } else { s }
}

fn print_stats(stats: &StatsSummary) {
    println!("{} {}", "Total:".bold(), stats.total);
    println!(
        "{} {} ({}%)",
        "Active:".bold(),
        stats.active_count.to_string().green(),
        stats.active_rate_percent
    );
    println!("{} {}", "Inactive:".bold(), stats.inactive_count);
    if let Some(days) = stats.average_duration_days {
        println!("{} {} days", "Average duration:".bold(), days);
    }
    println!("{}", "By category:".bold());
    for (category, count) in &stats.category_breakdown {
        let label = if category.is_empty() { "(none)" } else { category.as_str() };
        println!("  {:<20} {:>5}  {:>3}%", label, count.count, count.percent);
    }
}
