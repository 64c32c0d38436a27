use crate::common::file::{FileSpec, write_file};
use crate::common::redirect_temp_dir;
use assert_cmd::Command;
use assert_fs::TempDir;
use rstest::fixture;
use std::path::Path;

#[fixture]
pub fn repository_dir() -> TempDir {
    redirect_temp_dir();
    TempDir::new().expect("Failed to create temp dir")
}

/// A repository with one commit tracking `1.txt` and `a/2.txt`
#[fixture]
pub fn init_repository_dir(repository_dir: TempDir) -> TempDir {
    run_twig_command(repository_dir.path(), &["init"])
        .assert()
        .success();

    let file1 = FileSpec::new(repository_dir.path().join("1.txt"), "one".to_string());
    write_file(file1);

    let file2 = FileSpec::new(
        repository_dir.path().join("a").join("2.txt"),
        "two".to_string(),
    );
    write_file(file2);

    run_twig_command(repository_dir.path(), &["add", "1.txt"])
        .assert()
        .success();
    run_twig_command(repository_dir.path(), &["add", "a/2.txt"])
        .assert()
        .success();

    twig_commit(repository_dir.path(), "Initial files")
        .assert()
        .success();

    repository_dir
}

pub fn run_twig_command(dir: &Path, args: &[&str]) -> Command {
    let mut cmd = Command::cargo_bin("twig").expect("Failed to find twig binary");
    cmd.envs(vec![("NO_PAGER", "1")]);
    cmd.current_dir(dir);
    for arg in args {
        cmd.arg(arg);
    }
    cmd
}

pub fn twig_commit(dir: &Path, message: &str) -> Command {
    run_twig_command(dir, &["commit", message])
}

/// Write `content` to `name` and stage it in one go
pub fn stage_file(dir: &Path, name: &str, content: &str) {
    write_file(FileSpec::new(dir.join(name), content.to_string()));
    run_twig_command(dir, &["add", name]).assert().success();
}

/// Commit ids as printed by `log`, newest first
pub fn log_commit_ids(dir: &Path) -> Vec<String> {
    let output = run_twig_command(dir, &["log"])
        .output()
        .expect("Failed to run log");

    String::from_utf8(output.stdout)
        .expect("log output is not UTF-8")
        .lines()
        .filter_map(|line| line.strip_prefix("commit "))
        .map(str::to_string)
        .collect()
}

/// The id the current head resolves to, read off the top of `log`
pub fn head_commit_id(dir: &Path) -> String {
    log_commit_ids(dir)
        .first()
        .cloned()
        .expect("history has no commits")
}
