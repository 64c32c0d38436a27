use assert_fs::TempDir;
use predicates::prelude::predicate;
use rstest::rstest;

mod common;
use common::command::{repository_dir, run_twig_command, twig_commit};

#[rstest]
fn empty_invocation_asks_for_a_command(repository_dir: TempDir) {
    run_twig_command(repository_dir.path(), &[])
        .assert()
        .code(64)
        .stdout("Please enter a command.\n");
}

#[rstest]
fn unknown_command_is_rejected(repository_dir: TempDir) {
    run_twig_command(repository_dir.path(), &["frobnicate"])
        .assert()
        .code(64)
        .stdout("No command with that name exists.\n");
}

#[rstest]
#[case::add_without_a_file(&["add"])]
#[case::find_without_a_message(&["find"])]
#[case::checkout_without_operands(&["checkout"])]
#[case::branch_with_extra_operands(&["branch", "one", "two"])]
fn malformed_operands_are_rejected(repository_dir: TempDir, #[case] args: &[&str]) {
    run_twig_command(repository_dir.path(), args)
        .assert()
        .code(64)
        .stdout("Incorrect operands.\n");
}

#[rstest]
fn commands_need_an_initialized_repository(repository_dir: TempDir) {
    run_twig_command(repository_dir.path(), &["status"])
        .assert()
        .code(1)
        .stdout("Not in an initialized twig directory.\n");
}

#[rstest]
fn init_lays_out_the_data_directory(repository_dir: TempDir) {
    run_twig_command(repository_dir.path(), &["init"])
        .assert()
        .success()
        .stdout(predicate::str::is_empty());

    for dir in ["objects", "staged", "branches"] {
        assert!(repository_dir.path().join(".twig").join(dir).is_dir());
    }
    assert!(repository_dir.path().join(".twig").join("state").is_file());
    assert!(
        repository_dir
            .path()
            .join(".twig")
            .join("branches")
            .join("master")
            .is_file()
    );
}

#[rstest]
fn init_refuses_to_clobber_an_existing_repository(repository_dir: TempDir) {
    run_twig_command(repository_dir.path(), &["init"])
        .assert()
        .success();

    run_twig_command(repository_dir.path(), &["init"])
        .assert()
        .code(1)
        .stdout("A twig version-control system already exists in the current directory.\n");
}

#[rstest]
#[case::no_message(&["commit"])]
#[case::blank_message(&["commit", "   "])]
fn commit_requires_a_message(repository_dir: TempDir, #[case] args: &[&str]) {
    run_twig_command(repository_dir.path(), &["init"])
        .assert()
        .success();

    run_twig_command(repository_dir.path(), args)
        .assert()
        .code(1)
        .stdout("Please enter a commit message.\n");
}

#[rstest]
fn the_missing_message_error_outranks_the_repository_check(repository_dir: TempDir) {
    twig_commit(repository_dir.path(), "")
        .assert()
        .code(1)
        .stdout("Please enter a commit message.\n");
}
