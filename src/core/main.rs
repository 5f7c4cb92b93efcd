////////////////////////////////////////////////////////////////////
//      Cellar CLI v0.2.2
////////////////////////////////////////////////////////////////////

use std::env;

use log::{error, info, LevelFilter};

use cellar::cellar::Cellar;
use cellar::cellar_config::CellarConfig;
use cellar::delimited::DelimitedReader;
use cellar::table_renderer::ShowMode;
use shared_lib::fail;

const USAGE: &str = "Usage: cellar [-t|--tabs] [-c|--config JSON_FILE] [-i|--index FIELD] [-s|--seek KEY] FILE";

/// Command line options
#[derive(Debug, Default, PartialEq)]
struct Options {
    mode: ShowMode,
    config: Option<String>,
    index: Option<String>,
    seek: Option<String>,
    path: String,
}

/// Loads a delimited file and shows it as a table
fn main() -> std::io::Result<()> {
    // set up the logger
    env_logger::builder()
        .filter_level(LevelFilter::Info)
        .init();

    // process the commandline arguments
    let args: Vec<String> = env::args().skip(1).collect();
    let options = match parse_args(&args) {
        Ok(options) => options,
        Err(err) => {
            error!("{}", err);
            return Err(err);
        }
    };
    for line in run(&options)? {
        println!("{}", line)
    }
    Ok(())
}

fn parse_args(args: &[String]) -> std::io::Result<Options> {
    let mut options = Options::default();
    let mut path = None;
    let mut it = args.iter();
    while let Some(arg) = it.next() {
        match arg.as_str() {
            "-t" | "--tabs" => options.mode = ShowMode::Tabs,
            "-c" | "--config" => match it.next() {
                Some(file) => options.config = Some(file.to_string()),
                None => return fail(format!("{arg} requires a file\n{USAGE}")),
            },
            "-i" | "--index" => match it.next() {
                Some(field) => options.index = Some(field.to_string()),
                None => return fail(format!("{arg} requires a field name\n{USAGE}")),
            },
            "-s" | "--seek" => match it.next() {
                Some(key) => options.seek = Some(key.to_string()),
                None => return fail(format!("{arg} requires a key\n{USAGE}")),
            },
            flag if flag.starts_with('-') => return fail(format!("Unrecognized option {flag}\n{USAGE}")),
            file if path.is_none() => path = Some(file.to_string()),
            extra => return fail(format!("Unexpected argument {extra}\n{USAGE}")),
        }
    }
    match path {
        Some(path) => Ok(Options { path, ..options }),
        None => fail(USAGE),
    }
}

fn run(options: &Options) -> std::io::Result<Vec<String>> {
    let mut config = match &options.config {
        Some(path) => CellarConfig::load(path)?,
        None => CellarConfig::new(),
    };
    if let Some(field) = &options.index {
        config = config.with_index(field.as_str());
    }
    let mut cellar = DelimitedReader::read_file(&options.path, &config)?;
    info!("loaded {} row(s) with {} field(s)", cellar.row_count(), cellar.fields().len());

    match &options.seek {
        Some(key) if config.get_index().is_none() =>
            fail(format!("Seeking {key:?} requires --index\n{USAGE}")),
        Some(key) if cellar.seek(key.as_str()) => Ok(describe_row(&cellar)),
        Some(key) => fail(format!("No row found for {key:?}")),
        None => Ok(cellar.show(options.mode)),
    }
}

/// Lists the fields of the live row, one "field: value" per line
fn describe_row(cellar: &Cellar) -> Vec<String> {
    let width = cellar.widest();
    cellar.fields().iter().enumerate()
        .map(|(n, field)| {
            let value = cellar.values().get(n).cloned().unwrap_or_default();
            format!("{field:<width$} : {value}")
        })
        .collect()
}
