use std::path::PathBuf;

use anyhow::Result;
use clap::{App, Arg};
use rpmview::{LoadedPackage, NodeId, PackageError, TreeView, COLUMNS};

fn print_rows(view: &TreeView, nodes: Vec<NodeId>, max_depth: Option<usize>) {
    for (depth, id) in view.walk(nodes, max_depth) {
        let row = view.row(id);
        let cells = row.columns();
        let marker = row.file_type.map(|t| t.marker()).unwrap_or(' ');
        let dim = if row.dimmed { "?" } else { " " };
        println!(
            "{}{} {}{:<w$} {:>12} {:<8} {:<8} {:<4} {:<20} {}",
            dim,
            marker,
            "  ".repeat(depth),
            cells[0],
            cells[1],
            cells[2],
            cells[3],
            cells[4],
            cells[5],
            cells[6],
            w = 40usize.saturating_sub(2 * depth),
        );
    }
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .init();

    let matches = App::new("RpmView-Tree")
        .version("0.1.0")
        .author("chordtoll <git@chordtoll.com>")
        .about("Prints the payload tree of a package")
        .arg(
            Arg::new("package")
                .value_name("PACKAGE")
                .help("The package description to read")
                .takes_value(true)
                .required(true),
        )
        .arg(
            Arg::new("path")
                .value_name("PATH")
                .help("The payload directory to start from")
                .takes_value(true),
        )
        .arg(
            Arg::new("depth")
                .long("depth")
                .value_name("N")
                .help("How many levels to print, 0 prints nothing")
                .takes_value(true),
        )
        .get_matches();

    let loaded = LoadedPackage::open(matches.value_of("package").unwrap_or_default())?;
    let view = loaded.view();
    let depth = matches.value_of("depth").map(str::parse::<usize>).transpose()?;

    let start = match matches.value_of("path") {
        Some(path) => loaded
            .tree
            .select(PathBuf::from(path))
            .ok_or_else(|| PackageError::Enoent(path.to_string()))?,
        None => loaded.tree.root(),
    };

    println!(
        "   {:<40} {:>12} {:<8} {:<8} {:<4} {:<20} {}",
        COLUMNS[0], COLUMNS[1], COLUMNS[2], COLUMNS[3], COLUMNS[4], COLUMNS[5], COLUMNS[6]
    );
    if start == loaded.tree.root() {
        print_rows(&view, view.elements(), depth);
    } else {
        print_rows(&view, vec![start], depth);
    }
    Ok(())
}
