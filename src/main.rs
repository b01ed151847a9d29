use std::path::PathBuf;

use anyhow::{Context, Result, bail};
use forumlib::config::{AppConfig, LoggingConfig};
use forumlib::utils::datetime::format_timestamp;
use forumlib::{Category, Envelope, ForumLib, Sort};
use serde::Serialize;
use tracing_appender::non_blocking::WorkerGuard;

const USAGE: &str = "usage: forumlib [--config <file.ron>] [--json] <command>

commands:
  categories [category] [page] [sort]   list discussions (defaults: all 1 newest)
  discussion <id>                       show a discussion and its opening post
  comments <id> [page]                  list comments of a discussion
  list-categories                       print known categories and sort orders";

fn main() -> Result<()> {
    let mut args: Vec<String> = std::env::args().skip(1).collect();

    let json = take_flag(&mut args, "--json");
    let config_path = take_option(&mut args, "--config")
        .or_else(|| std::env::var("FORUMLIB_CONFIG").ok())
        .map(PathBuf::from);

    // Config comes first so logging can be configured from it
    let config = match &config_path {
        Some(path) => AppConfig::load_from(path)
            .with_context(|| format!("failed to load config from {}", path.display()))?,
        None => AppConfig::default(),
    };

    let _guard = init_logging(&config.logging);

    let Some(command) = args.first().cloned() else {
        eprintln!("{USAGE}");
        bail!("missing command");
    };
    let rest = &args[1..];

    if command == "list-categories" {
        for category in Category::all() {
            println!("{:>4}  {}", category.as_api_str(), category);
        }
        for sort in [Sort::Newest, Sort::Updates, Sort::Popular] {
            println!("sort  {}  ({})", sort.as_api_str(), sort);
        }
        return Ok(());
    }

    let client = ForumLib::with_config(config.client).context("failed to create forum client")?;

    match command.as_str() {
        "categories" => {
            let category = match rest.first() {
                Some(raw) => Category::parse(raw)?,
                None => Category::default(),
            };
            let page = parse_page(rest.get(1))?;
            let sort = match rest.get(2) {
                Some(raw) => Sort::parse(raw)?,
                None => Sort::default(),
            };

            let listing = client
                .list_category(category, page, sort)
                .with_context(|| format!("list_category failed for {category} page {page}"))?;
            if json {
                return print_json(&listing);
            }
            for discussion in listing.items() {
                println!(
                    "#{:<8} {}  [{} views, {}]",
                    discussion.id.unwrap_or_default(),
                    discussion.title.as_deref().unwrap_or("(untitled)"),
                    discussion.views_count.unwrap_or_default(),
                    discussion
                        .created_at
                        .as_deref()
                        .map(format_timestamp)
                        .unwrap_or_default(),
                );
            }
            if let Some(next) = listing.next_page() {
                println!("-- next page: {next}");
            }
        }
        "discussion" => {
            let id = parse_id(rest.first())?;
            let detail = client
                .get_discussion(id)
                .with_context(|| format!("get_discussion failed for id {id}"))?;
            if json {
                return print_json(&detail);
            }
            if let Some(discussion) = &detail.discussion {
                println!("{}", discussion.title.as_deref().unwrap_or("(untitled)"));
            }
            if let Some(body) = detail.post.as_ref().and_then(|p| p.body.as_ref()) {
                println!("\n{}", body.to_markdown());
            }
        }
        "comments" => {
            let id = parse_id(rest.first())?;
            let page = parse_page(rest.get(1))?;
            let comments = client
                .list_comments(id, page)
                .with_context(|| format!("list_comments failed for discussion {id}"))?;
            if json {
                return print_json(&comments);
            }
            for comment in comments.items() {
                let author = comment
                    .user
                    .as_ref()
                    .and_then(|u| u.username.as_deref())
                    .unwrap_or("anonymous");
                let text = comment
                    .body
                    .as_ref()
                    .map(|b| b.to_plain_text())
                    .unwrap_or_default();
                println!("{author}: {}", text.trim_end());
            }
            if let Some(next) = comments.next_page() {
                println!("-- next page: {next}");
            }
        }
        other => {
            eprintln!("{USAGE}");
            bail!("unknown command `{other}`");
        }
    }

    client.close();
    Ok(())
}

fn init_logging(logging: &LoggingConfig) -> Option<WorkerGuard> {
    // If RUST_LOG is set, it takes precedence over the config file.
    let env_filter = match std::env::var("RUST_LOG") {
        Ok(_) => tracing_subscriber::EnvFilter::from_default_env(),
        Err(_) => tracing_subscriber::EnvFilter::new(logging.filter_directives()),
    };

    match logging.log_directory.as_deref() {
        Some(log_dir) => {
            let file_appender = tracing_appender::rolling::daily(log_dir, "forumlib.log");
            let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);
            tracing_subscriber::fmt()
                .with_env_filter(env_filter)
                .with_writer(non_blocking)
                .with_ansi(false)
                .compact()
                .init();
            Some(guard)
        }
        None => {
            tracing_subscriber::fmt()
                .with_env_filter(env_filter)
                .with_writer(std::io::stderr)
                .init();
            None
        }
    }
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    let text = serde_json::to_string_pretty(value).context("failed to serialize response")?;
    println!("{text}");
    Ok(())
}

fn parse_id(raw: Option<&String>) -> Result<i64> {
    let raw = raw.context("missing discussion id")?;
    raw.parse()
        .with_context(|| format!("discussion id must be an integer, got `{raw}`"))
}

fn parse_page(raw: Option<&String>) -> Result<i64> {
    match raw {
        Some(raw) => raw
            .parse()
            .with_context(|| format!("page must be an integer, got `{raw}`")),
        None => Ok(1),
    }
}

fn take_flag(args: &mut Vec<String>, flag: &str) -> bool {
    match args.iter().position(|a| a == flag) {
        Some(i) => {
            args.remove(i);
            true
        }
        None => false,
    }
}

fn take_option(args: &mut Vec<String>, name: &str) -> Option<String> {
    let i = args.iter().position(|a| a == name)?;
    args.remove(i);
    (i < args.len()).then(|| args.remove(i))
}
