use anyhow::Result;
use clap::{Parser, Subcommand};
use keg::areas::repository::Repository;
use keg::artifacts::objects::object_kind::ObjectKind;

#[derive(Parser)]
#[command(
    name = "keg",
    version = "0.1.0",
    about = "A minimal content-addressable object store",
    long_about = "A minimal version-control object store modeled on Git's storage layer: \
    immutable, typed, compressed objects stored under a hash of their contents, \
    plus references, history traversal, and tree checkout built on top.",
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
        path: Option<String>,
    },
    #[command(
        name = "hash-object",
        about = "Hash a file and optionally write it to the object database"
    )]
    HashObject {
        #[arg(short, long, required = false, help = "Write the object to the object database")]
        write: bool,
        #[arg(short = 't', long = "type", default_value = "blob", help = "The object kind to hash as")]
        kind: String,
        #[arg(index = 1)]
        file: String,
    },
    #[command(
        name = "cat-file",
        about = "Print the content of an object",
        long_about = "This command prints the decoded content of the object a revision names."
    )]
    CatFile {
        #[arg(index = 1, help = "The revision or object ID to print")]
        revision: String,
    },
    #[command(name = "ls-tree", about = "List the entries of a tree object")]
    LsTree {
        #[arg(index = 1, help = "The revision or tree object ID to list")]
        revision: String,
    },
    #[command(
        name = "log",
        about = "Print the reachable history of a commit as a Graphviz digraph"
    )]
    Log {
        #[arg(index = 1, default_value = "HEAD", help = "The revision to start from")]
        revision: String,
    },
    #[command(
        name = "checkout",
        about = "Materialize the tree of a revision into an empty directory"
    )]
    Checkout {
        #[arg(index = 1, help = "The revision to check out")]
        revision: String,
        #[arg(index = 2, help = "The destination directory")]
        directory: String,
    },
    #[command(name = "show-ref", about = "List references with their resolved addresses")]
    ShowRef,
    #[command(
        name = "tag",
        about = "List tags, or create a lightweight tag pointing at a revision"
    )]
    Tag {
        #[arg(index = 1, help = "The tag name to create")]
        name: Option<String>,
        #[arg(index = 2, default_value = "HEAD", help = "The revision to tag")]
        revision: String,
    },
}

fn repository_at_pwd() -> Result<Repository> {
    let pwd = std::env::current_dir()?;
    Repository::new(&pwd.to_string_lossy(), Box::new(std::io::stdout()))
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    match &cli.command {
        Commands::Init { path } => {
            let mut repository = match path {
                Some(path) => Repository::new(path, Box::new(std::io::stdout()))?,
                None => repository_at_pwd()?,
            };

            repository.init()?
        }
        Commands::HashObject { write, kind, file } => {
            let kind = ObjectKind::try_from(kind.as_str())?;
            repository_at_pwd()?.hash_object(file, kind, *write)?
        }
        Commands::CatFile { revision } => repository_at_pwd()?.cat_file(revision)?,
        Commands::LsTree { revision } => repository_at_pwd()?.ls_tree(revision)?,
        Commands::Log { revision } => repository_at_pwd()?.log(revision)?,
        Commands::Checkout {
            revision,
            directory,
        } => repository_at_pwd()?.checkout(revision, directory)?,
        Commands::ShowRef => repository_at_pwd()?.show_ref()?,
        Commands::Tag { name, revision } => {
            let mut repository = repository_at_pwd()?;
            match name {
                Some(name) => repository.create_tag(name, revision)?,
                None => repository.list_tags()?,
            }
        }
    }

    Ok(())
}
