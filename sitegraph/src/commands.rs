use crate::CLAP_STYLING;
use clap::{arg, command};

pub(crate) fn command_argument_builder() -> clap::Command {
    clap::Command::new("sitegraph")
        .version(env!("CARGO_PKG_VERSION"))
        .bin_name("sitegraph")
        .styles(CLAP_STYLING)
        .arg(arg!(-q --"quiet" "Suppress banner and non-essential output").required(false))
        .subcommand_required(false)
        .subcommand(
            command!("render")
                .about("Renders a graph document to a static SVG or DOT file")
                .arg(
                    arg!(-i --"input" <SOURCE>)
                        .required(false)
                        .help("Path or URL of the graph document")
                        .default_value("data.json"),
                )
                .arg(
                    arg!(-o --"output" <PATH>)
                        .required(false)
                        .help("File to write the rendered graph to")
                        .value_parser(clap::value_parser!(std::path::PathBuf))
                        .default_value("graph.svg"),
                )
                .arg(
                    arg!(-f --"format" <FORMAT>)
                        .required(false)
                        .help("Output format")
                        .value_parser(["svg", "dot"])
                        .default_value("svg"),
                )
                .arg(
                    arg!(--"width" <PIXELS>)
                        .required(false)
                        .help("Viewport width of the rendered graph")
                        .value_parser(clap::value_parser!(u32))
                        .default_value("960"),
                )
                .arg(
                    arg!(--"height" <PIXELS>)
                        .required(false)
                        .help("Viewport height of the rendered graph")
                        .value_parser(clap::value_parser!(u32))
                        .default_value("600"),
                )
                .arg(
                    arg!(--"iterations" <STEPS>)
                        .required(false)
                        .help("Simulation steps to run before reading positions back")
                        .value_parser(clap::value_parser!(usize))
                        .default_value("300"),
                ),
        )
        .subcommand(
            command!("scan")
                .about(
                    "Scans a static site root and draws the dependency graph of every asset \
                reachable from its entry pages.",
                )
                .arg(
                    arg!(-r --"root" <DIR>)
                        .required(false)
                        .help("Site root directory to scan")
                        .default_value("www"),
                )
                .arg(
                    arg!(-e --"entry" <GLOB>)
                        .required(false)
                        .help("Glob selecting the entry assets, relative to the root")
                        .default_value("**/*.html"),
                )
                .arg(
                    arg!(-o --"output" <PATH>)
                        .required(false)
                        .help("File to write the rendered graph to (.dot switches the format)")
                        .value_parser(clap::value_parser!(std::path::PathBuf))
                        .default_value("dist/assetgraph.svg"),
                )
                .arg(
                    arg!(--"json" <PATH>)
                        .required(false)
                        .help("Also export the graph document as JSON")
                        .value_parser(clap::value_parser!(std::path::PathBuf)),
                )
                .arg(
                    arg!(-t --"threads" <NUM_WORKERS>)
                        .required(false)
                        .help("The number of async worker 'threads' in the worker pool.")
                        .value_parser(clap::value_parser!(usize))
                        .default_value("4"),
                )
                .arg(
                    arg!(--"max-depth" <DEPTH>)
                        .required(false)
                        .help("Stop following references beyond this depth")
                        .value_parser(clap::value_parser!(usize)),
                ),
        )
        .subcommand(
            command!("ui")
                .about("Explores a graph document interactively in the terminal")
                .arg(
                    arg!(-i --"input" <SOURCE>)
                        .required(false)
                        .help("Path or URL of the graph document")
                        .default_value("data.json"),
                ),
        )
}
