use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use mytar_format::{create_archive, ArchiveReader, ExtractOptions};
use structopt::clap::AppSettings::*;
use structopt::StructOpt;

#[derive(Debug, StructOpt)]
enum Commands {
    #[structopt(name = "c", visible_alias = "create", about = "Create a new archive")]
    Create {
        #[structopt(
            name = "archive",
            parse(from_os_str),
            help = "Path to the .mtar archive"
        )]
        path: PathBuf,

        #[structopt(
            name = "files",
            parse(from_os_str),
            help = "Files to add to the archive, in order"
        )]
        files: Vec<PathBuf>,
    },

    #[structopt(
        name = "x",
        visible_alias = "extract",
        about = "Extract files from an archive"
    )]
    Extract {
        #[structopt(
            name = "archive",
            parse(from_os_str),
            help = "Path to the .mtar archive"
        )]
        path: PathBuf,

        #[structopt(
            short = "C",
            long = "directory",
            parse(from_os_str),
            default_value = ".",
            help = "Directory to extract into"
        )]
        directory: PathBuf,

        #[structopt(
            long = "unsafe-paths",
            help = "Allow entries with absolute or `..` names to be written outside the directory"
        )]
        unsafe_paths: bool,
    },

    #[structopt(name = "l", visible_alias = "list", about = "List files of an archive")]
    List {
        #[structopt(
            name = "archive",
            parse(from_os_str),
            help = "Path to the .mtar archive"
        )]
        path: PathBuf,
    },
}

#[derive(Debug, StructOpt)]
#[structopt(
    name = "mytar",
    about = "Create, list and extract mytar archives.",
    settings = &[SubcommandRequiredElseHelp, DisableHelpSubcommand, VersionlessSubcommands]
)]
struct CliOpts {
    #[structopt(
        short,
        long,
        parse(from_occurrences),
        help = "Show verbose output (repeat for more)",
        global = true
    )]
    verbose: u8,

    #[structopt(subcommand)]
    cmd: Commands,
}

fn create(path: PathBuf, files: Vec<PathBuf>) -> Result<()> {
    if files.is_empty() {
        bail!("No files specified to add to archive");
    }

    let header = create_archive(&files, &path)
        .with_context(|| format!("Cannot create archive `{}`", path.display()))?;
    tracing::info!(count = header.file_count(), "done");
    Ok(())
}

fn extract(path: PathBuf, directory: PathBuf, unsafe_paths: bool) -> Result<()> {
    let mut reader = ArchiveReader::open(&path)?;

    let options = ExtractOptions {
        allow_unsafe_paths: unsafe_paths,
    };
    let stats = reader
        .extract_all(&directory, &options)
        .with_context(|| format!("Cannot extract archive `{}`", path.display()))?;

    tracing::info!(
        files = stats.files_extracted,
        bytes = stats.bytes_extracted,
        directory = %directory.display(),
        "done"
    );
    Ok(())
}

fn list(path: PathBuf) -> Result<()> {
    use humansize::{file_size_opts as options, FileSize};

    let reader = ArchiveReader::open(&path)?;
    let header = reader.header();

    let human = |bytes: u64| bytes.file_size(options::BINARY).unwrap_or_else(|e| e);

    println!("Length         Offset         Name");
    println!("-------------  -------------  --------");
    for (index, entry) in header.entries().iter().enumerate() {
        let offset = header.data_offset(index).unwrap_or_default();
        println!(
            "{:>12}   {:>12}   {}",
            human(entry.size() as u64),
            offset,
            entry.name()
        );
    }
    println!(
        "{} files, {} data, {} total",
        header.file_count(),
        human(header.data_size()),
        human(header.archive_size())
    );

    Ok(())
}

fn init_tracing(verbose: u8) {
    let level = match verbose {
        0 => tracing::Level::WARN,
        1 => tracing::Level::INFO,
        _ => tracing::Level::DEBUG,
    };

    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn main() {
    let opts = CliOpts::from_iter(wild::args_os());
    init_tracing(opts.verbose);

    let result = match opts.cmd {
        Commands::Create { path, files } => create(path, files),
        Commands::Extract {
            path,
            directory,
            unsafe_paths,
        } => extract(path, directory, unsafe_paths),
        Commands::List { path } => list(path),
    };

    if let Err(e) = result {
        eprintln!("{:?}", e);
        std::process::exit(1);
    }
}
