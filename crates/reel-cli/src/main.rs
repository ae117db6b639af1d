//! # reel-cli — The "Ticket Booth" of REEL
//!
//! Command-line access to film queries.
//!
//! - `reel query /content/oscars --year 1964` — Ask a running hub.
//! - `reel local --content oscars.json /content/oscars --sort-by awards` — Run
//!   the engine in-process, no server needed.
//! - `reel containers --content oscars.json` — List queryable containers.

use std::path::{Path, PathBuf};

use clap::{Args, Parser, Subcommand};
use tabled::{Table, Tabled};

use reel_core::{fields, CancelToken, Engine, LimitMode, QueryResults, Record, RecordSource};
use reel_io::ContentTree;

/// 🎬 REEL — Oscar film queries over JSON content.
#[derive(Parser)]
#[command(name = "reel", version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Query a container on a running hub ($REEL_BASE_URL).
    Query {
        /// Container path, e.g. /content/oscars.
        container: String,

        #[command(flatten)]
        filters: Filters,

        /// Print a table instead of JSON.
        #[arg(long)]
        table: bool,
    },

    /// Query a content file in-process.
    Local {
        /// JSON content file to load.
        #[arg(long)]
        content: PathBuf,

        /// Path the content file is mounted at.
        #[arg(long, default_value = "/content/oscars")]
        mount: String,

        /// Container path, e.g. /content/oscars.
        container: String,

        #[command(flatten)]
        filters: Filters,

        /// Truncate to --limit before sorting (legacy behaviour).
        #[arg(long)]
        legacy_limit: bool,

        /// Print a table instead of JSON.
        #[arg(long)]
        table: bool,
    },

    /// List the containers in a content file.
    Containers {
        /// JSON content file to load.
        #[arg(long)]
        content: PathBuf,

        /// Path the content file is mounted at.
        #[arg(long, default_value = "/content/oscars")]
        mount: String,
    },
}

/// Query filters, sent as the hub's request parameters.
#[derive(Args, Debug, Default)]
struct Filters {
    /// Exact title (case-insensitive).
    #[arg(long)]
    title: Option<String>,

    #[arg(long)]
    year: Option<i64>,

    #[arg(long)]
    min_year: Option<i64>,

    #[arg(long)]
    max_year: Option<i64>,

    #[arg(long)]
    min_awards: Option<i64>,

    #[arg(long)]
    max_awards: Option<i64>,

    /// Exact nomination count.
    #[arg(long)]
    nominations: Option<i64>,

    /// Only "true" (any case) selects best-picture winners.
    #[arg(long)]
    best_picture: Option<String>,

    /// title, year, awards or nominations.
    #[arg(long)]
    sort_by: Option<String>,

    /// Maximum number of results; negative means no cap.
    #[arg(long, allow_hyphen_values = true)]
    limit: Option<i64>,
}

impl Filters {
    fn to_params(&self) -> Vec<(&'static str, String)> {
        let ints = [
            ("year", self.year),
            ("minYear", self.min_year),
            ("maxYear", self.max_year),
            ("minAwards", self.min_awards),
            ("maxAwards", self.max_awards),
            ("nominations", self.nominations),
            ("limit", self.limit),
        ];
        let mut params: Vec<(&'static str, String)> = Vec::new();
        if let Some(title) = &self.title {
            params.push(("title", title.clone()));
        }
        params.extend(
            ints.into_iter()
                .filter_map(|(name, value)| value.map(|v| (name, v.to_string()))),
        );
        if let Some(best) = &self.best_picture {
            params.push(("isBestPicture", best.clone()));
        }
        if let Some(sort_by) = &self.sort_by {
            params.push(("sortBy", sort_by.clone()));
        }
        params
    }
}

// =============================================================================
// Output
// =============================================================================

#[derive(Tabled)]
struct FilmRow {
    title: String,
    year: String,
    awards: String,
    nominations: String,
    #[tabled(rename = "best picture")]
    best_picture: String,
    references: String,
}

impl From<&Record> for FilmRow {
    fn from(record: &Record) -> Self {
        let cell = |key: &str| {
            record
                .get(key)
                .map(ToString::to_string)
                .unwrap_or_else(|| "-".to_string())
        };
        Self {
            title: cell(fields::TITLE),
            year: cell(fields::YEAR),
            awards: cell(fields::AWARDS),
            nominations: cell(fields::NOMINATIONS),
            best_picture: cell(fields::IS_BEST_PICTURE),
            references: cell(fields::NUMBER_OF_REFERENCES),
        }
    }
}

fn render(body: &[u8], table: bool) -> Result<String, String> {
    let parsed: QueryResults =
        serde_json::from_slice(body).map_err(|e| format!("unexpected response body: {}", e))?;
    if table {
        let rows: Vec<FilmRow> = parsed.results.iter().map(FilmRow::from).collect();
        Ok(Table::new(rows).to_string())
    } else {
        serde_json::to_string_pretty(&parsed).map_err(|e| e.to_string())
    }
}

// =============================================================================
// Commands
// =============================================================================

fn main() {
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Query {
            container,
            filters,
            table,
        } => {
            let rt = match tokio::runtime::Builder::new_current_thread()
                .enable_all()
                .build()
            {
                Ok(rt) => rt,
                Err(e) => {
                    eprintln!("Failed to build tokio runtime: {}", e);
                    std::process::exit(1);
                }
            };
            rt.block_on(remote_query(&container, &filters, table))
        }

        Commands::Local {
            content,
            mount,
            container,
            filters,
            legacy_limit,
            table,
        } => {
            let mode = if legacy_limit {
                LimitMode::BeforeSort
            } else {
                LimitMode::AfterSort
            };
            local_query(&content, &mount, &container, &filters, mode, table)
        }

        Commands::Containers { content, mount } => {
            load_tree(&content, &mount).map(|tree| tree.containers().join("\n"))
        }
    };

    match result {
        Ok(output) => println!("{}", output),
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    }
}

async fn remote_query(container: &str, filters: &Filters, table: bool) -> Result<String, String> {
    let client = reqwest::Client::new();
    let base_url =
        std::env::var("REEL_BASE_URL").unwrap_or_else(|_| "http://127.0.0.1:3000".to_string());
    let url = container_url(&base_url, container);

    let resp = get_request(&client, &url, &filters.to_params())
        .await
        .map_err(|e| format!("request to {} failed: {}", url, e))?;
    let status = resp.status();
    let body = resp
        .bytes()
        .await
        .map_err(|e| format!("reading response from {} failed: {}", url, e))?;

    if !status.is_success() {
        return Err(format!("{}: {}", status, String::from_utf8_lossy(&body)));
    }
    render(&body, table)
}

fn local_query(
    content: &Path,
    mount: &str,
    container: &str,
    filters: &Filters,
    mode: LimitMode,
    table: bool,
) -> Result<String, String> {
    let tree = load_tree(content, mount)?;
    let container = container.strip_suffix(".json").unwrap_or(container);
    let body = Engine::new(mode)
        .run(&tree, container, filters.to_params(), &CancelToken::new())
        .map_err(|e| e.to_string())?;
    render(&body, table)
}

fn load_tree(content: &Path, mount: &str) -> Result<ContentTree, String> {
    let mut tree = ContentTree::new();
    tree.mount_file(mount, content).map_err(|e| e.to_string())?;
    Ok(tree)
}

/// `http://host:3000` + `/content/oscars` → `http://host:3000/content/oscars.json`.
fn container_url(base_url: &str, container: &str) -> String {
    let container = container.trim_start_matches('/');
    let container = container.strip_suffix(".json").unwrap_or(container);
    format!("{}/{}.json", base_url.trim_end_matches('/'), container)
}

async fn get_request(
    client: &reqwest::Client,
    url: &str,
    params: &[(&'static str, String)],
) -> Result<reqwest::Response, reqwest::Error> {
    client.get(url).query(params).send().await
}
