use commands::command_argument_builder;
use sitegraph::handlers::{handle_render, handle_scan, handle_ui};
use sitegraph_core::print_banner;

mod commands;

#[tokio::main]
async fn main() {
    let cmd = command_argument_builder();
    let chosen_command = cmd.get_matches();
    let quiet = chosen_command.get_flag("quiet");

    // Show banner unless --quiet flag is set
    if !quiet {
        print_banner();
    }

    if chosen_command.subcommand().is_none() {
        // No subcommand provided, just show the banner
        return;
    }

    match chosen_command.subcommand() {
        Some(("render", sub_matches)) => handle_render(sub_matches).await,
        Some(("scan", sub_matches)) => handle_scan(sub_matches).await,
        Some(("ui", sub_matches)) => handle_ui(sub_matches).await,
        _ => unreachable!("clap should ensure we don't get here"),
    }
}

pub const CLAP_STYLING: clap::builder::styling::Styles = clap::builder::styling::Styles::styled()
    .header(clap_cargo::style::HEADER)
    .usage(clap_cargo::style::USAGE)
    .literal(clap_cargo::style::LITERAL)
    .placeholder(clap_cargo::style::PLACEHOLDER)
    .error(clap_cargo::style::ERROR)
    .valid(clap_cargo::style::VALID)
    .invalid(clap_cargo::style::INVALID);
