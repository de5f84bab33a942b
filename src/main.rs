use clap::Parser;
use quadra::filter::{ProximityQuery, RankedVenue, DEFAULT_RADIUS_KM};
use quadra::venue::{builtin_catalog, load_catalog, Venue};
use quadra::viewer::{PositionResolver, ViewerPosition};
use serde::Serialize;
use std::path::PathBuf;

/// Quadra — sports-venue proximity engine
///
/// Ranks venues by distance from the viewer's position. The position
/// comes from --lat/--lon, the cached last fix, or IP geolocation,
/// falling back to São Paulo centre when nothing else is available.
///
/// Examples:
///   quadra
///   quadra --lat -23.5505 --lon -46.6333 --radius 25
///   quadra --sport futsal --limit 5
///   quadra --venues courts.json --auto
///   quadra --serve --port 8787
#[derive(Parser)]
#[command(name = "quadra", version, about, long_about = None)]
struct Cli {
    /// Latitude (-90 to 90). Requires --lon.
    #[arg(long, allow_hyphen_values = true)]
    lat: Option<f64>,

    /// Longitude (-180 to 180). Requires --lat.
    #[arg(long, allow_hyphen_values = true)]
    lon: Option<f64>,

    /// Search radius in km (clamped to 50).
    #[arg(long, short = 'r', default_value_t = DEFAULT_RADIUS_KM)]
    radius: f64,

    /// Filter by sport (case-insensitive substring).
    #[arg(long, short = 's')]
    sport: Option<String>,

    /// Maximum number of results.
    #[arg(long, short = 'n')]
    limit: Option<usize>,

    /// Venue catalog (JSON array). Defaults to the built-in demo catalog.
    #[arg(long)]
    venues: Option<PathBuf>,

    /// Force a fresh IP geolocation, bypassing the cached fix.
    #[arg(long, short = 'a')]
    auto: bool,

    /// Offline mode: no network lookups.
    #[arg(long)]
    offline: bool,

    /// Hide venues with unknown location instead of including them.
    #[arg(long)]
    exclude_unknown: bool,

    /// Run the HTTP API instead of a one-shot query.
    #[arg(long)]
    serve: bool,

    /// Bind host for --serve.
    #[arg(long, default_value = "127.0.0.1")]
    host: String,

    /// Bind port for --serve.
    #[arg(long, default_value_t = 8787)]
    port: u16,
}

#[derive(Serialize)]
struct QueryOutput {
    position: ViewerPosition,
    radius_km: f64,
    count: usize,
    venues: Vec<RankedVenue>,
}

fn main() {
    let cli = Cli::parse();

    // ── Load catalog ────────────────────────────────────────────

    let venues = match &cli.venues {
        Some(path) => load_catalog(path).unwrap_or_else(|e| {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }),
        None => builtin_catalog(),
    };

    if cli.serve {
        run_server(&cli.host, cli.port, venues);
        return;
    }

    // ── Resolve viewer position ─────────────────────────────────

    let position = resolve_position(&cli);
    eprintln!("  \u{1F4CD} {}", position.display_line());

    // ── Rank ────────────────────────────────────────────────────

    let mut query = ProximityQuery::new(position.coordinates())
        .with_radius(cli.radius)
        .include_unknown(!cli.exclude_unknown);
    if let Some(ref sport) = cli.sport {
        query = query.with_sport(sport.clone());
    }
    if let Some(limit) = cli.limit {
        query = query.with_limit(limit);
    }

    let ranked = query.rank(&venues);

    // Table to stderr
    eprint!("{}", render_table(&ranked, query.radius_km()));

    // JSON to stdout
    let output = QueryOutput {
        position,
        radius_km: query.radius_km(),
        count: ranked.len(),
        venues: ranked,
    };
    println!("{}", serde_json::to_string_pretty(&output).unwrap());
}

fn resolve_position(cli: &Cli) -> ViewerPosition {
    // Priority: --lat/--lon > cached fix > IP lookup > built-in default

    if let (Some(lat), Some(lon)) = (cli.lat, cli.lon) {
        if !(-90.0..=90.0).contains(&lat) || !(-180.0..=180.0).contains(&lon) {
            eprintln!("Error: Invalid coordinates. Lat: -90..90, Lon: -180..180");
            std::process::exit(1);
        }
        return PositionResolver::from_manual(lat, lon);
    }

    if cli.lat.is_some() != cli.lon.is_some() {
        eprintln!("Error: --lat and --lon must be given together.");
        std::process::exit(1);
    }

    let mut resolver = PositionResolver::new();
    resolver.set_offline(cli.offline);

    if cli.auto {
        resolver.refresh()
    } else {
        resolver.resolve()
    }
}

fn render_table(ranked: &[RankedVenue], radius_km: f64) -> String {
    let mut out = String::new();
    out.push_str(&format!(
        "  ── Venues within {:.1} km ────────────────────────────\n",
        radius_km
    ));

    if ranked.is_empty() {
        out.push_str("  (no venues matched)\n");
        return out;
    }

    for (i, r) in ranked.iter().enumerate() {
        let price = price_tag(&r.venue);
        let rating = match r.venue.rating {
            Some(rating) => format!("\u{2605}{:.1}", rating),
            None => "     ".to_string(),
        };
        out.push_str(&format!(
            "  {:>2}. {:<28} {:<18} {:>8}  {}  {}\n",
            i + 1,
            r.venue.name,
            r.venue.sport,
            r.distance_label,
            rating,
            price,
        ));
    }
    out
}

fn price_tag(venue: &Venue) -> String {
    if venue.is_free {
        "free".to_string()
    } else {
        match venue.price_per_hour {
            Some(price) => format!("R${:.0}/h", price),
            None => String::new(),
        }
    }
}

fn run_server(host: &str, port: u16, venues: Vec<Venue>) {
    let runtime = tokio::runtime::Runtime::new().unwrap_or_else(|e| {
        eprintln!("Error: Cannot start runtime: {}", e);
        std::process::exit(1);
    });
    runtime.block_on(quadra::server::start(host, port, venues));
}
