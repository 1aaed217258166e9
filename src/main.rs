use anyhow::Result;
use bitstore::areas::repository::Repository;
use bitstore::commands::plumbing::cat_file::CatFileMode;
use clap::{ArgGroup, Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(
    name = "bitstore",
    version = "0.1.0",
    author = "Sami Barbut-Dica",
    about = "A content-addressable object store",
    long_about = "This is a minimal content-addressable object store modeled on git's object database. \
    It hashes files, directory snapshots and commits into compressed, immutable objects \
    and reads them back by id.",
    help_template = r"
{name} {version} - {about}

USAGE:
    {usage}

OPTIONS:
    {all-args}
",
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    #[command(
        name = "init",
        about = "Initialize a new repository",
        long_about = "This command initializes a new repository in the current directory or at the specified path."
    )]
    Init {
        #[arg(index = 1, help = "The path to the repository")]
        path: Option<PathBuf>,
    },
    #[command(
        name = "cat-file",
        about = "Print the content, type or size of an object",
        long_about = "This command prints information about an object in the repository. \
        Exactly one of -p, -t or -s must be given along with the object SHA.",
        group(ArgGroup::new("mode").required(true).args(["pretty", "object_type", "size"]))
    )]
    CatFile {
        #[arg(short = 'p', help = "Pretty-print the object's content")]
        pretty: bool,
        #[arg(short = 't', help = "Print the object's type")]
        object_type: bool,
        #[arg(short = 's', help = "Print the object's size")]
        size: bool,
        #[arg(index = 1, help = "The object SHA")]
        sha: String,
    },
    #[command(
        name = "hash-object",
        about = "Hash a file as a blob and optionally write it to the object database",
        long_about = "This command computes the blob id of a file and can write the blob to the object database. \
        It requires the path to the file to be specified."
    )]
    HashObject {
        #[arg(short, long, required = false, help = "Write the object to the object database")]
        write: bool,
        #[arg(index = 1)]
        file: PathBuf,
    },
    #[command(
        name = "ls-tree",
        about = "List the contents of a tree object",
        long_about = "This command lists the entries of a tree object. A commit SHA lists the commit's tree."
    )]
    LsTree {
        #[arg(long, help = "Only print entry names")]
        name_only: bool,
        #[arg(index = 1, help = "The tree or commit SHA")]
        sha: String,
    },
    #[command(
        name = "write-tree",
        about = "Write the working directory as a tree object",
        long_about = "This command snapshots the working directory into blob and tree objects and prints the root tree SHA."
    )]
    WriteTree,
    #[command(
        name = "commit-tree",
        about = "Create a commit object for a tree",
        long_about = "This command records a commit for the given tree with an optional parent commit. \
        The author is read from GIT_AUTHOR_NAME, GIT_AUTHOR_EMAIL and GIT_AUTHOR_DATE."
    )]
    CommitTree {
        #[arg(index = 1, help = "The tree SHA")]
        tree: String,
        #[arg(short, long, help = "The parent commit SHA")]
        parent: Option<String>,
        #[arg(short, long, help = "The commit message")]
        message: String,
    },
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let root = match &cli.command {
        Commands::Init {
            path: Some(path), ..
        } => path.clone(),
        _ => std::env::current_dir()?,
    };
    let repository = Repository::new(root, Box::new(std::io::stdout()))?;

    match &cli.command {
        Commands::Init { .. } => repository.init()?,
        Commands::CatFile {
            pretty,
            object_type,
            size,
            sha,
        } => {
            let mode = match (pretty, object_type, size) {
                (true, _, _) => CatFileMode::Pretty,
                (_, true, _) => CatFileMode::Type,
                _ => CatFileMode::Size,
            };

            repository.cat_file(sha, mode)?
        }
        Commands::HashObject { write, file } => repository.hash_object(file, *write)?,
        Commands::LsTree { name_only, sha } => repository.ls_tree(sha, *name_only)?,
        Commands::WriteTree => repository.write_tree()?,
        Commands::CommitTree {
            tree,
            parent,
            message,
        } => repository.commit_tree(tree, parent.as_deref(), message)?,
    }

    Ok(())
}
