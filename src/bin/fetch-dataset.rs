#[cfg(feature = "fetch")]
const RELEASE_URL: &str = "https://github.com/evansiroky/timezone-boundary-builder/releases/latest/download/timezones-with-oceans.geojson.zip";

fn main() -> Result<(), Box<dyn std::error::Error>> {
    #[cfg(not(feature = "fetch"))]
    {
        eprintln!("Error: This binary requires the 'fetch' feature.");
        eprintln!("Build with: cargo run --release --bin fetch-dataset --features fetch");
        std::process::exit(1);
    }

    #[cfg(feature = "fetch")]
    {
        use std::io::Write;
        use std::path::PathBuf;

        let output_path = std::env::args()
            .nth(1)
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(geotz::config::DEFAULT_SOURCE_FILE));

        println!("Downloading {}...", RELEASE_URL);
        let bytes = reqwest::blocking::get(RELEASE_URL)?
            .error_for_status()?
            .bytes()?;

        // Refuse to replace a good archive with something unusable.
        let document = geotz::source::extract_document(&bytes)?;
        println!(
            "Archive is {} MB, boundary document is {} MB",
            bytes.len() / 1_000_000,
            document.len() / 1_000_000
        );

        let dir = match output_path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
            _ => PathBuf::from("."),
        };
        std::fs::create_dir_all(&dir)?;
        let mut file = tempfile::NamedTempFile::new_in(&dir)?;
        file.write_all(&bytes)?;
        file.persist(&output_path)?;

        println!("Saved to: {}", output_path.display());
        Ok(())
    }
}
