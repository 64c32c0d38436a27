use crate::common::command::{
    head_commit_id, init_repository_dir, run_twig_command, stage_file, twig_commit,
};
use crate::common::file::{FileSpec, read_file, write_file};
use assert_fs::TempDir;
use rstest::rstest;

/// History:
///
///        A
///       / \
///      B   C       B: add 4.txt on master   C: add 3.txt on side
///  master   side
///
/// An untracked 3.txt sits in master's working tree when the merge would
/// check out side's 3.txt.
///
/// Expected: the merge refuses before touching anything. The local file
/// keeps its content and no merge commit appears.
#[rstest]
fn an_untracked_file_in_the_way_stops_the_merge(init_repository_dir: TempDir) {
    let dir = init_repository_dir;

    run_twig_command(dir.path(), &["branch", "side"])
        .assert()
        .success();

    stage_file(dir.path(), "4.txt", "four");
    twig_commit(dir.path(), "Unrelated master work")
        .assert()
        .success();

    run_twig_command(dir.path(), &["checkout", "side"])
        .assert()
        .success();
    stage_file(dir.path(), "3.txt", "side version\n");
    twig_commit(dir.path(), "Side adds 3.txt").assert().success();

    run_twig_command(dir.path(), &["checkout", "master"])
        .assert()
        .success();
    write_file(FileSpec::new(
        dir.path().join("3.txt"),
        "local work\n".to_string(),
    ));
    let head_before = head_commit_id(dir.path());

    run_twig_command(dir.path(), &["merge", "side"])
        .assert()
        .code(3)
        .stdout("There is an untracked file in the way; delete it, or add and commit it first.\n");

    assert_eq!(read_file(&dir.path().join("3.txt")), "local work\n");
    assert_eq!(head_commit_id(dir.path()), head_before);
}
