use kindle_clippings::config::Config;
use kindle_clippings::library::Library;
use kindle_clippings::parser::split_clippings;
use kindle_clippings::writer::{export, find_clippings_files, read_clippings, ReadError};
use tracing::info;
use tracing_subscriber::EnvFilter;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let config = match Config::load() {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    };

    let mut library = match load_library(&config) {
        Ok(library) => library,
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    };

    if let Some(range) = &config.date_range {
        library.retain_added_within(range);
    }

    let summary = export(library.into_books(), &config.output_dir);
    info!(
        written = summary.written.len(),
        failed = summary.failed,
        "done"
    );
}

/// Every input is read before anything is written.
fn load_library(config: &Config) -> Result<Library, ReadError> {
    let mut library = Library::new();
    for path in find_clippings_files(&config.input_path)? {
        let content = read_clippings(&path)?;
        library.extend(split_clippings(&content));
    }
    Ok(library)
}
