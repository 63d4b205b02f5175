use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::Parser;
use log::{info, warn};

use rlualist::{ListingOptions, Prototype, UndumpError, undump, write_listing};

/// Command-line arguments parser
#[derive(Parser, Debug)]
#[clap(
    author,
    version,
    about = "List the contents of precompiled Lua 5.3 chunks"
)]
struct Arguments {
    /// Paths to the Lua bytecode files to list
    #[clap(
        required = true,
        help = "One or more Lua 5.3 bytecode files to list.",
        value_name = "FILE",
        value_hint = clap::ValueHint::FilePath
    )]
    files: Vec<PathBuf>,

    /// Show decoded mnemonics next to the raw instruction words
    #[clap(short, long)]
    decode: bool,

    /// Only list the main function
    #[clap(long)]
    no_children: bool,
}

impl Arguments {
    fn listing_options(&self) -> ListingOptions {
        ListingOptions {
            decode: self.decode,
            recursive: !self.no_children,
        }
    }
}

#[derive(Debug, thiserror::Error)]
enum Failure {
    #[error("cannot read: {0}")]
    Read(io::Error),
    #[error("bad binary format: {0}")]
    Undump(UndumpError),
    #[error("cannot write listing: {0}")]
    Write(io::Error),
}

fn report_debug_issues(path: &Path, proto: &Prototype) {
    proto.walk(&mut |p: &Prototype| {
        for issue in p.debug_info_issues() {
            warn!(
                "{}: function <{}:{},{}>: {issue}",
                path.display(),
                p.source,
                p.line_defined,
                p.last_line_defined
            );
        }
    });
}

fn list_file(path: &Path, options: ListingOptions) -> Result<(), Failure> {
    let bytecode = std::fs::read(path).map_err(Failure::Read)?;
    let prototype = undump(&bytecode).map_err(Failure::Undump)?;
    info!("Decoded {} ({} bytes)", path.display(), bytecode.len());

    report_debug_issues(path, &prototype);

    let mut stdout = io::stdout().lock();
    write_listing(&mut stdout, &prototype, options).map_err(Failure::Write)?;
    stdout.flush().map_err(Failure::Write)
}

fn main() -> ExitCode {
    // Initialize logging
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    // Parse command-line arguments
    let args = Arguments::parse();
    let options = args.listing_options();

    let mut failed = false;
    for path in &args.files {
        info!("Listing file: {}", path.display());
        if let Err(err) = list_file(path, options) {
            eprintln!("{}: {err}", path.display());
            failed = true;
        }
    }

    if failed {
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    }
}
