use crate::common::command::{
    head_commit_id, init_repository_dir, run_twig_command, twig_commit,
};
use assert_fs::TempDir;
use predicates::prelude::*;
use rstest::rstest;

/// History:
///
///        A         tracks 1.txt
///       / \
///      B   C       both sides rm 1.txt
///  master   side
///
/// Expected: every path resolves to what master already has, so nothing is
/// staged, no merge commit is made, and the command says nothing.
#[rstest]
fn agreeing_branches_produce_no_merge_commit(init_repository_dir: TempDir) {
    let dir = init_repository_dir;

    run_twig_command(dir.path(), &["branch", "side"])
        .assert()
        .success();

    run_twig_command(dir.path(), &["rm", "1.txt"])
        .assert()
        .success();
    twig_commit(dir.path(), "Master drop").assert().success();

    run_twig_command(dir.path(), &["checkout", "side"])
        .assert()
        .success();
    run_twig_command(dir.path(), &["rm", "1.txt"])
        .assert()
        .success();
    twig_commit(dir.path(), "Side drop").assert().success();

    run_twig_command(dir.path(), &["checkout", "master"])
        .assert()
        .success();
    let head_before = head_commit_id(dir.path());

    run_twig_command(dir.path(), &["merge", "side"])
        .assert()
        .success()
        .stdout("");

    assert_eq!(head_commit_id(dir.path()), head_before);
    run_twig_command(dir.path(), &["log"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Merged side into master.").not());
}
