use crate::common::command::{init_repository_dir, run_twig_command, stage_file, twig_commit};
use assert_fs::TempDir;
use rstest::rstest;

/// History:
///
///        A         tracks 1.txt
///       / \
///      B   C       B: add 3.txt on master   C: rm 1.txt on side
///  master   side
///
/// Expected: the deletion carries over. 1.txt leaves the working tree and
/// the merge commit does not track it.
#[rstest]
fn a_deletion_on_the_given_side_carries_over(init_repository_dir: TempDir) {
    let dir = init_repository_dir;

    run_twig_command(dir.path(), &["branch", "side"])
        .assert()
        .success();

    stage_file(dir.path(), "3.txt", "three");
    twig_commit(dir.path(), "Unrelated master work")
        .assert()
        .success();

    run_twig_command(dir.path(), &["checkout", "side"])
        .assert()
        .success();
    run_twig_command(dir.path(), &["rm", "1.txt"])
        .assert()
        .success();
    twig_commit(dir.path(), "Drop 1.txt").assert().success();

    run_twig_command(dir.path(), &["checkout", "master"])
        .assert()
        .success();
    run_twig_command(dir.path(), &["merge", "side"])
        .assert()
        .success();

    assert!(!dir.path().join("1.txt").exists());
    run_twig_command(dir.path(), &["checkout", "--", "1.txt"])
        .assert()
        .code(2)
        .stdout("File does not exist in that commit.\n");
}
