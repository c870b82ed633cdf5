use colored::Colorize;

/// Print the startup banner. Suppressed by the `--quiet` flag upstream.
pub fn print_banner() {
    let banner = r#"
╔══════════════════════════════════════════════╗
║   s i t e g r a p h                          ║
║   force-directed graphs for static sites     ║
╚══════════════════════════════════════════════╝"#;

    for line in banner.lines() {
        println!("{}", line.bright_cyan());
    }
    println!(
        "  {} {}\n",
        "version".dimmed(),
        env!("CARGO_PKG_VERSION").bright_white()
    );
}
