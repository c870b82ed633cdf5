use chrono::Local;
use clap::ArgMatches;
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};
use sitegraph_core::dot::render_dot;
use sitegraph_core::{GraphDocument, LayoutOptions, RenderOptions, layout, render_svg};
use sitegraph_scanner::AssetScanner;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;
use tracing::info;
use url::Url;

// Helper functions shared by the subcommand handlers

/// True when the input names a remote document rather than a local file
pub fn looks_like_url(source: &str) -> bool {
    Url::parse(source)
        .map(|url| matches!(url.scheme(), "http" | "https"))
        .unwrap_or(false)
}

/// Load a graph document from a local path or an http(s) URL
pub async fn load_document_from_source(source: &str) -> Result<GraphDocument, String> {
    if looks_like_url(source) {
        fetch_document(source).await
    } else {
        read_document(source)
    }
}

/// Fetch and parse a graph document over HTTP
pub async fn fetch_document(url: &str) -> Result<GraphDocument, String> {
    let response = reqwest::get(url)
        .await
        .map_err(|e| format!("Failed to fetch {}: {}", url, e))?;

    if !response.status().is_success() {
        return Err(format!(
            "Failed to fetch {}: HTTP {}",
            url,
            response.status()
        ));
    }

    let body = response
        .text()
        .await
        .map_err(|e| format!("Failed to read response from {}: {}", url, e))?;

    GraphDocument::from_json(&body)
        .map_err(|e| format!("Invalid graph document from {}: {}", url, e))
}

/// Read and parse a graph document from disk
pub fn read_document(path: &str) -> Result<GraphDocument, String> {
    let expanded = shellexpand::tilde(path);
    let content = fs::read_to_string(expanded.as_ref())
        .map_err(|e| format!("Failed to read {}: {}", path, e))?;

    GraphDocument::from_json(&content)
        .map_err(|e| format!("Invalid graph document in {}: {}", path, e))
}

/// Lay out a document and render it in the requested format
pub fn render_document(
    document: &GraphDocument,
    format: &str,
    width: u32,
    height: u32,
    iterations: usize,
) -> Result<String, String> {
    match format {
        "dot" => render_dot(document).map_err(|e| format!("Failed to render DOT: {}", e)),
        _ => {
            let mut options = LayoutOptions::with_viewport(width as f32, height as f32);
            options.iterations = iterations;
            let positions =
                layout(document, &options).map_err(|e| format!("Layout failed: {}", e))?;
            render_svg(document, &positions, &RenderOptions { width, height })
                .map_err(|e| format!("Failed to render SVG: {}", e))
        }
    }
}

/// Write rendered output, creating parent directories as needed
pub fn write_output(path: &Path, contents: &str) -> Result<(), String> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        fs::create_dir_all(parent)
            .map_err(|e| format!("Failed to create {}: {}", parent.display(), e))?;
    }
    fs::write(path, contents).map_err(|e| format!("Failed to write {}: {}", path.display(), e))
}

pub async fn handle_render(sub_matches: &ArgMatches) {
    // Initialize tracing for logging
    tracing_subscriber::fmt::init();

    let input = sub_matches.get_one::<String>("input").unwrap();
    let output = sub_matches.get_one::<PathBuf>("output").unwrap();
    let format = sub_matches.get_one::<String>("format").unwrap();
    let width = *sub_matches.get_one::<u32>("width").unwrap_or(&960);
    let height = *sub_matches.get_one::<u32>("height").unwrap_or(&600);
    let iterations = *sub_matches.get_one::<usize>("iterations").unwrap_or(&300);

    let document = match load_document_from_source(input).await {
        Ok(document) => document,
        Err(e) => {
            eprintln!("✗ {}", e);
            std::process::exit(1);
        }
    };
    info!(
        "loaded {} nodes and {} links from {}",
        document.node_count(),
        document.link_count(),
        input
    );

    let rendered = match render_document(&document, format, width, height, iterations) {
        Ok(rendered) => rendered,
        Err(e) => {
            eprintln!("✗ {}", e);
            std::process::exit(1);
        }
    };

    if let Err(e) = write_output(output, &rendered) {
        eprintln!("✗ {}", e);
        std::process::exit(1);
    }

    println!(
        "{} Rendered {} nodes and {} links to {}",
        "✓".green().bold(),
        document.node_count(),
        document.link_count(),
        output.display().to_string().bright_white()
    );
}

pub async fn handle_scan(sub_matches: &ArgMatches) {
    // Initialize tracing for logging
    tracing_subscriber::fmt::init();

    let root = sub_matches.get_one::<String>("root").unwrap();
    let entry = sub_matches.get_one::<String>("entry").unwrap();
    let output = sub_matches.get_one::<PathBuf>("output").unwrap();
    let json_output = sub_matches.get_one::<PathBuf>("json");
    let threads = *sub_matches.get_one::<usize>("threads").unwrap_or(&4);
    let max_depth = sub_matches.get_one::<usize>("max-depth").copied();

    let expanded_root = shellexpand::tilde(root);
    let root_dir = PathBuf::from(expanded_root.as_ref());

    println!("\n🕸️  Scanning {}", root_dir.display());
    println!("Entry pattern: {}", entry);
    println!("Workers: {}\n", threads);

    let spinner = ProgressBar::new_spinner();
    spinner.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.cyan} {msg}")
            .unwrap(),
    );
    spinner.enable_steady_tick(Duration::from_millis(100));
    spinner.set_message("Walking the site root...");

    // Progress callback
    let counter = Arc::new(AtomicUsize::new(0));
    let spinner_clone = spinner.clone();
    let counter_clone = counter.clone();
    let progress_callback: sitegraph_scanner::ProgressCallback =
        Arc::new(move |_worker_id: usize, path: String| {
            let count = counter_clone.fetch_add(1, Ordering::SeqCst) + 1;
            spinner_clone.set_message(format!("[{}] {}", count, path));
        });

    let mut scanner = AssetScanner::new().with_progress_callback(progress_callback);
    if let Some(depth) = max_depth {
        scanner = scanner.with_max_depth(depth);
    }

    match scanner.scan(&root_dir, entry, threads).await {
        Ok(outcome) => {
            spinner.finish_and_clear();

            // Asset totals go to stderr so stdout stays scriptable
            for line in outcome.stats.stats_lines() {
                eprintln!("{}", line);
            }

            let document = outcome.to_document();
            let format = match output.extension().and_then(|ext| ext.to_str()) {
                Some("dot") => "dot",
                _ => "svg",
            };

            let rendered = match render_document(&document, format, 960, 600, 300) {
                Ok(rendered) => rendered,
                Err(e) => {
                    eprintln!("✗ {}", e);
                    std::process::exit(1);
                }
            };

            if let Err(e) = write_output(output, &rendered) {
                eprintln!("✗ {}", e);
                std::process::exit(1);
            }

            if let Some(json_path) = json_output {
                let json = match document.to_json() {
                    Ok(json) => json,
                    Err(e) => {
                        eprintln!("✗ Failed to serialize graph document: {}", e);
                        std::process::exit(1);
                    }
                };
                if let Err(e) = write_output(json_path, &json) {
                    eprintln!("✗ {}", e);
                    std::process::exit(1);
                }
            }

            println!(
                "{} [{}] Wrote {} ({} assets, {} references)",
                "✓".green().bold(),
                Local::now().format("%H:%M:%S"),
                output.display().to_string().bright_white(),
                document.node_count(),
                document.link_count()
            );

            println!("\ndone!");
        }
        Err(e) => {
            spinner.finish_and_clear();
            eprintln!("✗ Scan failed: {}", e);
            std::process::exit(1);
        }
    }
}

pub async fn handle_ui(sub_matches: &ArgMatches) {
    let input = sub_matches.get_one::<String>("input").unwrap();

    let document = match load_document_from_source(input).await {
        Ok(document) => document,
        Err(e) => {
            eprintln!("✗ {}", e);
            std::process::exit(1);
        }
    };

    if let Err(e) = sitegraph_tui::run(&document) {
        eprintln!("✗ TUI error: {}", e);
        std::process::exit(1);
    }
}
