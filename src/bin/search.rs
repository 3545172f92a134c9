//! `radar_search search`
//!
//! Loads the radar catalog once, then answers queries instantly.
//!
//! Usage (single query):
//!   cargo run --bin search -- "japan c"
//!
//! Usage (interactive REPL):
//!   cargo run --bin search
//!
//! Flags:
//!   --data <path>        catalog file (default: radars_v2.json)
//!   --band <codes>       comma-separated band facet (e.g. C,S)
//!   --status <labels>    comma-separated status facet
//!   --country <token>    country facet (ISO3 code or name)
//!   --url <querystring>  seed the query from a shareable URL query
//!                        string (e.g. "?q=tokyo")

use std::io::{self, BufRead, Write};

use tracing_subscriber::EnvFilter;

use radar_search::constants::DEFAULT_DATA_PATH;
use radar_search::normalize::{normalize_band_str, normalize_status_str};
use radar_search::record::{RadarRecord, RecordStore};
use radar_search::search::highlight;
use radar_search::state::AppState;
use radar_search::view::bounds;

const MAX_ROWS: usize = 20;
const MAX_TAGS: usize = 5;

struct Opts {
    data: String,
    band: Option<String>,
    status: Option<String>,
    country: Option<String>,
    url: Option<String>,
    query: Vec<String>,
}

fn parse_args(args: &[String]) -> Opts {
    let mut opts = Opts {
        data: DEFAULT_DATA_PATH.to_string(),
        band: None,
        status: None,
        country: None,
        url: None,
        query: Vec::new(),
    };

    let mut i = 0;
    while i < args.len() {
        let take_value = |i: usize| args.get(i + 1).cloned();
        match args[i].as_str() {
            "--data" => {
                if let Some(v) = take_value(i) {
                    opts.data = v;
                    i += 1;
                }
            }
            "--band" => {
                opts.band = take_value(i);
                i += 1;
            }
            "--status" => {
                opts.status = take_value(i);
                i += 1;
            }
            "--country" => {
                opts.country = take_value(i);
                i += 1;
            }
            "--url" => {
                opts.url = take_value(i);
                i += 1;
            }
            other => opts.query.push(other.to_string()),
        }
        i += 1;
    }
    opts
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    let opts = parse_args(&args);

    // ── Load catalog ────────────────────────────────────────────────────────
    eprint!("Loading catalog '{}'… ", opts.data);
    let store = match RecordStore::load(&opts.data) {
        Ok(store) => store,
        Err(e) => {
            eprintln!("\nFailed to load catalog: {e}");
            std::process::exit(1);
        }
    };
    eprintln!("OK ({} records)", store.len());

    let mut state = match opts.url.as_deref() {
        Some(qs) => AppState::with_initial_query(store, qs),
        None => AppState::new(store),
    };

    // Facet flags, run through the same normalizers as record fields.
    if let Some(bands) = opts.band.as_deref() {
        for band in bands.split(',').filter_map(normalize_band_str) {
            state.toggle_band(band);
        }
    }
    if let Some(statuses) = opts.status.as_deref() {
        for status in statuses.split(',').filter_map(normalize_status_str) {
            state.toggle_status(status);
        }
    }
    if let Some(country) = opts.country.clone().filter(|c| !c.is_empty()) {
        state.set_country(Some(country));
    }

    // ── Single query from CLI args ──────────────────────────────────────────
    if !opts.query.is_empty() {
        state.set_query(&opts.query.join(" "));
        print_results(&state);
        return;
    }
    if state.committed_query().is_empty() && !state.selection().is_unrestricted() {
        // Facet-only invocation: show the filtered catalog once.
        print_results(&state);
        return;
    }
    if !state.committed_query().is_empty() {
        print_results(&state);
    }

    // ── Interactive REPL ────────────────────────────────────────────────────
    println!("Type a query and press Enter. Commands: :band <code>, :status <label>,");
    println!(":country [token], :facets, :clear, :points, :jump. Ctrl-D to exit.");
    let stdin = io::stdin();
    loop {
        print!("> ");
        let _ = io::stdout().flush();

        let mut line = String::new();
        match stdin.lock().read_line(&mut line) {
            Ok(0) | Err(_) => break,
            Ok(_) => {}
        }
        let line = line.trim();
        if line.is_empty() {
            break;
        }
        if let Some(command) = line.strip_prefix(':') {
            run_command(&mut state, command);
        } else {
            state.set_query(line);
            print_results(&state);
        }
    }
}

fn run_command(state: &mut AppState, command: &str) {
    let (name, arg) = match command.split_once(char::is_whitespace) {
        Some((name, arg)) => (name, arg.trim()),
        None => (command, ""),
    };

    match name {
        "band" => match normalize_band_str(arg) {
            Some(band) => {
                state.toggle_band(band);
                print_results(state);
            }
            None => println!("  Unknown band '{arg}' (expected S, C or X)."),
        },
        "status" => match normalize_status_str(arg) {
            Some(status) => {
                state.toggle_status(status);
                print_results(state);
            }
            None => println!("  Unknown status '{arg}'."),
        },
        "country" => {
            if arg.is_empty() {
                state.set_country(None);
            } else {
                state.set_country(Some(arg.to_string()));
            }
            print_results(state);
        }
        "facets" => {
            state.clear_facets();
            print_results(state);
        }
        "clear" => {
            state.clear();
            println!("  Query cleared.");
        }
        "points" => {
            let points = state.map_points();
            println!("  {} map points", points.len());
            for p in points.iter().take(MAX_ROWS) {
                println!("    {}  {:.4}, {:.4}  {}", p.id, p.lat, p.lon, p.site);
            }
            if let Some(b) = bounds(&points) {
                println!(
                    "  bounds: [{:.4}, {:.4}] .. [{:.4}, {:.4}]",
                    b.min_lat, b.min_lon, b.max_lat, b.max_lon
                );
            }
        }
        "jump" => match state.select_first() {
            Some(p) => println!("  -> {} at {:.4}, {:.4}", p.site, p.lat, p.lon),
            None => println!("  Nothing to jump to."),
        },
        "countries" => {
            for c in state.countries() {
                println!("  {c}");
            }
        }
        _ => println!("  Unknown command ':{name}'."),
    }
}

/// Site name with the first committed token marked, mirroring the UI's
/// highlight.
fn highlighted_site(record: &RadarRecord, token: Option<&str>) -> String {
    let site = record.site_label().unwrap_or("(no name)");
    match token.and_then(|t| highlight(site, t)) {
        Some(h) => format!("{}[{}]{}", h.before, h.matched, h.after),
        None => site.to_string(),
    }
}

fn print_results(state: &AppState) {
    let results = state.results();
    println!("Hits: {}", results.len());

    for record in results.iter().take(MAX_ROWS) {
        let site = highlighted_site(record, state.first_token());
        let country = record.country_label();
        let source = record.source_label();

        let mut head = site;
        if !country.is_empty() {
            head.push_str(&format!(" ({country})"));
        }
        if !source.is_empty() {
            head.push_str(&format!(" / {source}"));
        }
        println!("  {head}");

        let spec_parts: Vec<String> = [
            ("Band", record.band_label()),
            ("Pol", record.polarization.clone().unwrap_or_default()),
            ("Tx", record.tx_type.clone().unwrap_or_default()),
            ("Rx", record.rx_type.clone().unwrap_or_default()),
            ("Status", record.status_label()),
        ]
        .into_iter()
        .filter(|(_, v)| !v.is_empty())
        .map(|(k, v)| format!("{k} {v}"))
        .collect();
        if !spec_parts.is_empty() {
            println!("    {}", spec_parts.join(" / "));
        }

        let mut info_parts: Vec<String> = Vec::new();
        let operator = record.operator_label();
        if !operator.is_empty() {
            info_parts.push(format!("Operator {operator}"));
        }
        if let Some(install) = record.install_date.as_deref() {
            info_parts.push(format!("Install {install}"));
        }
        if let Some(loc) = record.location.as_ref() {
            if let Some(elev) = loc.elevation_m {
                info_parts.push(format!("Elev {elev} m"));
            }
            if let (Some(lat), Some(lon)) = (loc.lat, loc.lon) {
                info_parts.push(format!("LatLon {lat:.4}, {lon:.4}"));
            }
        }
        if !info_parts.is_empty() {
            println!("    {}", info_parts.join(" / "));
        }

        let tags = record.tag_list();
        if !tags.is_empty() {
            let shown = tags.iter().take(MAX_TAGS).copied().collect::<Vec<_>>().join(", ");
            let more = if tags.len() > MAX_TAGS { " …" } else { "" };
            println!("    Tags: {shown}{more}");
        }
    }

    if results.len() > MAX_ROWS {
        println!("  … and {} more", results.len() - MAX_ROWS);
    }
}
