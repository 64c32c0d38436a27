use crate::common::command::{init_repository_dir, run_twig_command, stage_file, twig_commit};
use assert_fs::TempDir;
use rstest::rstest;

#[rstest]
fn staged_changes_block_a_merge(init_repository_dir: TempDir) {
    let dir = init_repository_dir;

    run_twig_command(dir.path(), &["branch", "side"])
        .assert()
        .success();
    stage_file(dir.path(), "3.txt", "three");

    run_twig_command(dir.path(), &["merge", "side"])
        .assert()
        .code(1)
        .stdout("You have uncommitted changes.\n");
}

#[rstest]
fn a_pending_removal_also_blocks_a_merge(init_repository_dir: TempDir) {
    let dir = init_repository_dir;

    run_twig_command(dir.path(), &["branch", "side"])
        .assert()
        .success();
    run_twig_command(dir.path(), &["rm", "1.txt"])
        .assert()
        .success();

    run_twig_command(dir.path(), &["merge", "side"])
        .assert()
        .code(1)
        .stdout("You have uncommitted changes.\n");
}

#[rstest]
fn merging_an_unknown_branch_fails(init_repository_dir: TempDir) {
    run_twig_command(init_repository_dir.path(), &["merge", "ghost"])
        .assert()
        .code(2)
        .stdout("A branch with that name does not exist.\n");
}

#[rstest]
fn merging_the_current_branch_fails(init_repository_dir: TempDir) {
    run_twig_command(init_repository_dir.path(), &["merge", "master"])
        .assert()
        .code(1)
        .stdout("Cannot merge a branch with itself.\n");
}

/// History:
///
///   A - B      master
///   |
///   side
///
/// Expected: side has nothing master lacks, so the merge is refused.
#[rstest]
fn merging_an_ancestor_is_refused(init_repository_dir: TempDir) {
    let dir = init_repository_dir;

    run_twig_command(dir.path(), &["branch", "side"])
        .assert()
        .success();
    stage_file(dir.path(), "3.txt", "three");
    twig_commit(dir.path(), "Commit B").assert().success();

    run_twig_command(dir.path(), &["merge", "side"])
        .assert()
        .code(1)
        .stdout("Given branch is an ancestor of the current branch.\n");
}

#[rstest]
fn the_staging_check_runs_before_the_branch_lookup(init_repository_dir: TempDir) {
    let dir = init_repository_dir;

    stage_file(dir.path(), "3.txt", "three");

    run_twig_command(dir.path(), &["merge", "ghost"])
        .assert()
        .code(1)
        .stdout("You have uncommitted changes.\n");
}
