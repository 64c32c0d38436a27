use crate::common::command::{init_repository_dir, run_twig_command, stage_file, twig_commit};
use crate::common::file::read_file;
use assert_fs::TempDir;
use predicates::prelude::predicate;
use rstest::rstest;

/// History:
///
///        A         1.txt = "one"
///       / \
///      B   C       B: 1.txt = "master version"   C: 1.txt = "side version"
///  master   side
///
/// Expected: both versions end up fenced in the working file, the fenced
/// result is committed like any other merge, and the conflict is reported
/// on stdout with a zero exit.
#[rstest]
fn conflicting_edits_write_markers_and_still_commit(init_repository_dir: TempDir) {
    let dir = init_repository_dir;

    run_twig_command(dir.path(), &["branch", "side"])
        .assert()
        .success();

    stage_file(dir.path(), "1.txt", "master version\n");
    twig_commit(dir.path(), "Master version").assert().success();

    run_twig_command(dir.path(), &["checkout", "side"])
        .assert()
        .success();
    stage_file(dir.path(), "1.txt", "side version\n");
    twig_commit(dir.path(), "Side version").assert().success();

    run_twig_command(dir.path(), &["checkout", "master"])
        .assert()
        .success();
    run_twig_command(dir.path(), &["merge", "side"])
        .assert()
        .success()
        .stdout("Encountered a merge conflict.\n");

    assert_eq!(
        read_file(&dir.path().join("1.txt")),
        "<<<<<<< HEAD\nmaster version\n=======\nside version\n>>>>>>>\n"
    );

    // The fenced file went into a real merge commit
    run_twig_command(dir.path(), &["log"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Merged side into master."));
}
