use anyhow::Result;
use clap::{App, Arg, ArgGroup};
use rpmview::{format_size, tag, DependencyKind, Header, HeaderKind, Package};

fn print_header(header: &Header, kind: HeaderKind) {
    println!("{:>6}  {:<20} {:>4} {:>6}  Value", "Tag", "Name", "Type", "Count");
    for row in header.rows(kind) {
        println!(
            "{:>6}  {:<20} {:>4} {:>6}  {}",
            row.tag, row.name, row.type_code, row.count, row.value
        );
        for child in row.children {
            println!("{:>42}{}", "", child);
        }
    }
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .init();

    let matches = App::new("RpmView-Info")
        .version("0.1.0")
        .author("chordtoll <git@chordtoll.com>")
        .about("Prints the lead, headers or dependencies of a package")
        .arg(
            Arg::new("package")
                .value_name("PACKAGE")
                .help("The package description to read")
                .takes_value(true)
                .required(true),
        )
        .arg(Arg::new("header").long("header").help("Print the main header"))
        .arg(Arg::new("signature").long("signature").help("Print the signature header"))
        .arg(Arg::new("deps").long("deps").help("Print the dependency lists"))
        .group(ArgGroup::new("page").args(&["header", "signature", "deps"]))
        .get_matches();

    let package = Package::open(matches.value_of("package").unwrap_or_default())?;

    if matches.is_present("header") {
        print_header(&package.header, HeaderKind::Package);
    } else if matches.is_present("signature") {
        print_header(&package.signature, HeaderKind::Signature);
    } else if matches.is_present("deps") {
        for kind in DependencyKind::ALL {
            println!("{}", kind.label());
            for dep in package.dependencies(kind) {
                println!("  {:<40} {:<2} {:<20} {}", dep.name, dep.op(), dep.version, dep.flag_names());
            }
        }
    } else {
        for (label, value) in package.lead.overview() {
            println!("{:<18} {}", label, value);
        }
        if let Some(summary) = package.header.string(tag::SUMMARY) {
            println!("{:<18} {}", "Summary", summary);
        }
        let total: u64 = package.files.iter().map(|f| f.size).sum();
        println!("{:<18} {} ({} bytes)", "Payload Files", package.files.len(), format_size(total));
    }
    Ok(())
}
