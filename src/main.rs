use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::process::ExitCode;
use twig::areas::repository::Repository;
use twig::artifacts::core::{PagerWriter, wants_paging};
use twig::errors::{ErrorClass, OpError};

/// Exit code for malformed command lines, after BSD's EX_USAGE
const USAGE_EXIT_CODE: u8 = 64;

#[derive(Parser)]
#[command(
    name = "twig",
    version = "0.1.0",
    author = "Sami Barbut-Dica",
    about = "A small single-user version control engine",
    long_about = "twig keeps the history of one local directory: files are staged, \
    committed, branched, and merged without any network layer. \
    It is a learning-scale engine, not a git replacement.",
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
        about = "Create an empty repository in the current directory",
        long_about = "This command creates the .twig directory with an empty object store, \
        a master branch, and a root commit shared by all repositories."
    )]
    Init,
    #[command(name = "add", about = "Stage a file for the next commit")]
    Add {
        #[arg(index = 1, help = "The file to stage")]
        file: PathBuf,
    },
    #[command(
        name = "commit",
        about = "Record the staged changes as a new commit",
        long_about = "This command creates a new commit from the staged additions and removals, \
        with the given message and the current head as its parent."
    )]
    Commit {
        #[arg(index = 1, help = "The commit message")]
        message: Option<String>,
    },
    #[command(name = "rm", about = "Unstage a file, or mark a tracked file for removal")]
    Rm {
        #[arg(index = 1, help = "The file to remove")]
        file: PathBuf,
    },
    #[command(
        name = "log",
        about = "Show the history of the current head",
        long_about = "This command walks the current head's history down to the root commit, \
        following first parents only."
    )]
    Log,
    #[command(name = "global-log", about = "Show every commit ever made")]
    GlobalLog,
    #[command(name = "find", about = "Print the ids of commits with the given message")]
    Find {
        #[arg(index = 1, help = "The exact commit message to look for")]
        message: String,
    },
    #[command(name = "status", about = "Show branches, staged changes, and the working tree")]
    Status,
    #[command(
        name = "checkout",
        about = "Restore a file from a commit, or switch branches",
        long_about = "This command takes one of three forms: `checkout -- <file>` restores the \
        head commit's version of a file, `checkout <commit> -- <file>` restores the version from \
        the named commit, and `checkout <branch>` switches to another branch."
    )]
    Checkout {
        #[arg(index = 1, help = "The branch to switch to, or the commit to restore from")]
        target: Option<String>,
        #[arg(last = true, help = "The file to restore")]
        file: Option<PathBuf>,
    },
    #[command(name = "branch", about = "Create a new branch at the current head")]
    Branch {
        #[arg(index = 1, help = "The name of the new branch")]
        name: String,
    },
    #[command(name = "rm-branch", about = "Delete a branch pointer")]
    RmBranch {
        #[arg(index = 1, help = "The branch to delete")]
        name: String,
    },
    #[command(
        name = "reset",
        about = "Move the current branch to the given commit",
        long_about = "This command checks out the named commit and moves the current branch \
        pointer onto it, like `checkout` of an arbitrary commit."
    )]
    Reset {
        #[arg(index = 1, help = "The commit to reset to")]
        commit: String,
    },
    #[command(
        name = "merge",
        about = "Merge the given branch into the current one",
        long_about = "This command three-way merges the given branch against the current one \
        using their latest common ancestor, staging the resolutions and committing the result. \
        Conflicting paths are rewritten with both versions between markers."
    )]
    Merge {
        #[arg(index = 1, help = "The branch to merge in")]
        branch: String,
    },
    #[command(name = "add-remote", about = "Record the location of a remote repository")]
    AddRemote {
        #[arg(index = 1, help = "The name of the remote")]
        name: String,
        #[arg(index = 2, help = "The path to the remote's .twig directory")]
        path: String,
    },
    #[command(name = "rm-remote", about = "Forget a recorded remote")]
    RmRemote {
        #[arg(index = 1, help = "The remote to forget")]
        name: String,
    },
}

fn main() -> ExitCode {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(error) => return report_usage_error(error),
    };

    // The two-positional checkout shapes make an empty checkout parse; it is
    // still a malformed command line
    if let Commands::Checkout {
        target: None,
        file: None,
    } = &cli.command
    {
        println!("Incorrect operands.");
        return ExitCode::from(USAGE_EXIT_CODE);
    }

    // The message is checked here so its error outranks the repository check
    if let Commands::Commit { message } = &cli.command
        && message.as_deref().is_none_or(|message| message.trim().is_empty())
    {
        return report_failure(&OpError::EmptyCommitMessage.into());
    }

    match run(cli.command) {
        Ok(()) => ExitCode::SUCCESS,
        Err(error) => report_failure(&error),
    }
}

fn run(command: Commands) -> anyhow::Result<()> {
    let pwd = std::env::current_dir()?;

    if matches!(command, Commands::Init) {
        Repository::init_at(&pwd, Box::new(std::io::stdout()))?;
        return Ok(());
    }

    // History listings go through the pager on an interactive terminal
    let paged = matches!(command, Commands::Log | Commands::GlobalLog) && wants_paging();
    let pager = minus::Pager::new();
    let writer: Box<dyn std::io::Write> = if paged {
        Box::new(PagerWriter::new(pager.clone()))
    } else {
        Box::new(std::io::stdout())
    };

    let mut repository = Repository::open(&pwd, writer)?;

    match command {
        Commands::Init => {}
        Commands::Add { file } => repository.add(&file)?,
        Commands::Commit { message } => repository.commit(&message.unwrap_or_default())?,
        Commands::Rm { file } => repository.rm(&file)?,
        Commands::Log => repository.log()?,
        Commands::GlobalLog => repository.global_log()?,
        Commands::Find { message } => repository.find(&message)?,
        Commands::Status => repository.status()?,
        Commands::Checkout { target, file } => match (target, file) {
            (None, Some(file)) => repository.checkout_file(&file)?,
            (Some(target), Some(file)) => repository.checkout_file_at(&target, &file)?,
            (Some(branch), None) => repository.checkout_branch(&branch)?,
            (None, None) => {}
        },
        Commands::Branch { name } => repository.branch(&name)?,
        Commands::RmBranch { name } => repository.rm_branch(&name)?,
        Commands::Reset { commit } => repository.reset(&commit)?,
        Commands::Merge { branch } => repository.merge(&branch)?,
        Commands::AddRemote { name, path } => repository.add_remote(&name, &path)?,
        Commands::RmRemote { name } => repository.rm_remote(&name)?,
    }

    // Release the repository lock before blocking in the pager
    drop(repository);
    if paged {
        minus::page_all(pager)?;
    }

    Ok(())
}

fn report_usage_error(error: clap::Error) -> ExitCode {
    use clap::error::ErrorKind;

    match error.kind() {
        ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => {
            print!("{error}");
            ExitCode::SUCCESS
        }
        ErrorKind::MissingSubcommand | ErrorKind::DisplayHelpOnMissingArgumentOrSubcommand => {
            println!("Please enter a command.");
            ExitCode::from(USAGE_EXIT_CODE)
        }
        ErrorKind::InvalidSubcommand => {
            println!("No command with that name exists.");
            ExitCode::from(USAGE_EXIT_CODE)
        }
        _ => {
            println!("Incorrect operands.");
            ExitCode::from(USAGE_EXIT_CODE)
        }
    }
}

/// User-facing failures go to stdout with a class-specific exit code;
/// anything else is an internal error and goes to stderr with its context
/// chain.
fn report_failure(error: &anyhow::Error) -> ExitCode {
    match error.downcast_ref::<OpError>() {
        Some(op_error) => {
            println!("{op_error}");
            let code = match op_error.class() {
                ErrorClass::Precondition => 1,
                ErrorClass::NotFound => 2,
                ErrorClass::WorkingTreeConflict => 3,
            };
            ExitCode::from(code)
        }
        None => {
            eprintln!("{error:#}");
            ExitCode::FAILURE
        }
    }
}
