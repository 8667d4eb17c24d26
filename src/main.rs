use std::path::PathBuf;

use chrono::{Offset, Utc};
use clap::Parser;
use geotz::{CachePolicy, Config, LocationError, Strategy, TzLookup};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "geotz")]
#[command(about = "Look up the timezone of a coordinate", long_about = None)]
struct Args {
    /// Latitude in decimal degrees
    #[arg(allow_negative_numbers = true)]
    lat: f64,

    /// Longitude in decimal degrees
    #[arg(allow_negative_numbers = true)]
    lon: f64,

    /// Boundary archive (defaults to timezones-with-oceans.geojson.zip)
    #[arg(long, env = "GEO_JSON_FILE")]
    source: Option<PathBuf>,

    /// Cache file, or `off` (defaults to the platform cache dir)
    #[arg(long, env = "GEOTZ_CACHE", value_name = "PATH")]
    cache: Option<CachePolicy>,

    /// Always parse the archive; don't read or write the cache. Overrides
    /// --cache
    #[arg(long)]
    no_cache: bool,

    /// Pre-filter rings with a winding-number test over every Nth vertex
    #[arg(long, value_name = "N")]
    coarse_stride: Option<usize>,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();

    let mut config = Config::with_source_path(args.source.as_deref());
    if args.no_cache {
        config = config.cache(CachePolicy::Disabled);
    } else if let Some(policy) = args.cache {
        config = config.cache(policy);
    }
    if let Some(stride) = args.coarse_stride {
        config = config.strategy(Strategy::CoarseFirst { stride });
    }

    let lookup = TzLookup::new(config)?;

    match lookup.location(args.lat, args.lon) {
        Ok(tz) => {
            let now = Utc::now().with_timezone(&tz);
            let offset = now.offset().fix().local_minus_utc();
            println!("{}", tz.name());
            println!("  Abbreviation: {}", now.format("%Z"));
            println!("  UTC Offset: {} ({} seconds)", format_offset(offset), offset);
            println!("  Local Time: {}", now.format("%Y-%m-%d %H:%M:%S"));
        }
        Err(LocationError::NotFound { .. }) => {
            println!("No timezone found");
        }
        Err(LocationError::UnknownZone(tzid)) => {
            println!("{}", tzid);
            println!("  (not in the IANA timezone database)");
        }
    }

    Ok(())
}

fn format_offset(seconds: i32) -> String {
    let sign = if seconds < 0 { '-' } else { '+' };
    let hours = seconds.abs() / 3600;
    let minutes = (seconds.abs() % 3600) / 60;
    if minutes == 0 {
        format!("UTC{}{}", sign, hours)
    } else {
        format!("UTC{}{}:{:02}", sign, hours, minutes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn command_is_well_formed() {
        Args::command().debug_assert();
    }

    #[test]
    fn cache_flag_accepts_off() {
        let args = Args::try_parse_from(["geotz", "-33.9", "18.4", "--cache", "off"]).unwrap();
        assert_eq!(args.cache, Some(CachePolicy::Disabled));
        assert_eq!((args.lat, args.lon), (-33.9, 18.4));
    }

    #[test]
    fn cache_flag_accepts_path() {
        let args = Args::try_parse_from(["geotz", "1", "2", "--cache", "tz.cache"]).unwrap();
        assert_eq!(args.cache, Some(CachePolicy::At(PathBuf::from("tz.cache"))));
    }

    #[test]
    fn offsets_format_with_minutes() {
        assert_eq!(format_offset(3600), "UTC+1");
        assert_eq!(format_offset(-16200), "UTC-4:30");
        assert_eq!(format_offset(0), "UTC+0");
    }
}
