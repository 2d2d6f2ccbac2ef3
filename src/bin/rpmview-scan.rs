use anyhow::Result;
use clap::{App, Arg};
use rpmview::Package;

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .init();

    let matches = App::new("RpmView-Scan")
        .version("0.1.0")
        .author("chordtoll <git@chordtoll.com>")
        .about("Describes a staged directory as a package")
        .arg(
            Arg::new("input")
                .value_name("INPUT")
                .help("The staged directory to scan")
                .takes_value(true)
                .required(true),
        )
        .arg(
            Arg::new("output")
                .value_name("OUTPUT")
                .help("The package description to write")
                .takes_value(true)
                .required(true),
        )
        .arg(
            Arg::new("name")
                .long("name")
                .value_name("NAME")
                .help("The package name")
                .takes_value(true)
                .default_value("unnamed"),
        )
        .arg(
            Arg::new("owner")
                .long("owner")
                .value_name("USER")
                .help("Owner recorded for every file")
                .takes_value(true)
                .default_value("root"),
        )
        .arg(
            Arg::new("group")
                .long("group")
                .value_name("GROUP")
                .help("Group recorded for every file")
                .takes_value(true)
                .default_value("root"),
        )
        .get_matches();

    let package = Package::from_dir(
        matches.value_of("input").unwrap_or_default(),
        matches.value_of("name").unwrap_or_default(),
        matches.value_of("owner").unwrap_or_default(),
        matches.value_of("group").unwrap_or_default(),
    )?;
    package.save(matches.value_of("output").unwrap_or_default())?;
    Ok(())
}
