// Tests for the collector: deletion, protection, pruning and control directories

use dvclean::cleaner::{CleanError, CollectEvent, Collector, FileFilter};
use std::cell::RefCell;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

fn dv_filter() -> FileFilter {
    FileFilter::new([".sv", ".v", ".svh"])
        .with_protected(["dvclean"])
        .with_skip_dirs([".git"])
}

fn touch(root: &Path, rel: &str, content: &str) -> PathBuf {
    let path = root.join(rel);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).unwrap();
    }
    fs::write(&path, content).unwrap();
    path
}

#[test]
fn test_disallowed_files_deleted_allowed_kept() {
    let dir = TempDir::new().unwrap();
    let root = dir.path();
    let top = touch(root, "top.sv", "module top; endmodule\n");
    let pkg = touch(root, "rtl/pkg.svh", "package p; endpackage\n");
    let legacy = touch(root, "rtl/legacy.v", "module l; endmodule\n");
    let log = touch(root, "sim.log", "log\n");
    let notes = touch(root, "rtl/notes.txt", "notes\n");
    let upper = touch(root, "rtl/shout.SV", "module s; endmodule\n");

    let filter = dv_filter();
    let collection = Collector::new(&filter).collect(root).unwrap();

    assert!(top.exists() && pkg.exists() && legacy.exists());
    assert!(!log.exists());
    assert!(!notes.exists());
    assert!(!upper.exists(), "extension match is case-sensitive");

    let mut kept = collection.kept.clone();
    kept.sort();
    let mut expected = vec![top, pkg, legacy];
    expected.sort();
    assert_eq!(kept, expected);
    assert_eq!(collection.stats.files_deleted, 3);
    assert_eq!(collection.stats.delete_failures, 0);
}

#[test]
fn test_entry_point_never_deleted() {
    let dir = TempDir::new().unwrap();
    let root = dir.path();
    let exe = touch(root, "dvclean", "binary\n");
    let nested_exe = touch(root, "bin/dvclean", "binary\n");

    let filter = dv_filter();
    let collection = Collector::new(&filter).collect(root).unwrap();

    assert!(exe.exists());
    assert!(nested_exe.exists());
    assert!(collection.kept.is_empty());
    assert_eq!(collection.stats.files_protected, 2);
}

#[test]
fn test_empty_directories_pruned_bottom_up() {
    let dir = TempDir::new().unwrap();
    let root = dir.path();
    touch(root, "a/b/c/junk.o", "obj");
    touch(root, "a/other.txt", "x");
    let keep = touch(root, "d/e/keep.sv", "module k; endmodule\n");
    touch(root, "d/e/f/drop.txt", "x");

    let filter = dv_filter();
    let collection = Collector::new(&filter).collect(root).unwrap();

    // a/b/c empties c, then b, then a
    assert!(!root.join("a").exists());
    assert!(!root.join("d/e/f").exists());
    assert!(keep.exists());
    assert!(root.exists(), "root is never removed");
    assert_eq!(collection.stats.dirs_removed, 4);
}

#[test]
fn test_untouched_empty_directories_kept() {
    let dir = TempDir::new().unwrap();
    let root = dir.path();
    touch(root, "top.sv", "module top; endmodule\n");
    fs::create_dir_all(root.join("sim/work")).unwrap();
    touch(root, "build/out.log", "x");
    fs::create_dir_all(root.join("build/cache")).unwrap();

    let filter = dv_filter();
    let collection = Collector::new(&filter).collect(root).unwrap();

    assert!(root.join("sim/work").is_dir());
    // build/ still holds the placeholder cache/ after out.log goes
    assert!(root.join("build/cache").is_dir());
    assert!(!root.join("build/out.log").exists());
    assert_eq!(collection.stats.files_deleted, 1);
    assert_eq!(collection.stats.dirs_removed, 0);
}

#[test]
fn test_control_directory_skipped_entirely() {
    let dir = TempDir::new().unwrap();
    let root = dir.path();
    let head = touch(root, ".git/HEAD", "ref: refs/heads/main\n");
    let obj = touch(root, ".git/objects/ab/cdef", "blob");
    fs::create_dir_all(root.join(".git/refs/tags")).unwrap();
    let sv_in_git = touch(root, ".git/hooks/check.sv", "// hook\n");
    touch(root, "readme.md", "# hi\n");

    let filter = dv_filter();
    let collection = Collector::new(&filter).collect(root).unwrap();

    assert!(head.exists());
    assert!(obj.exists());
    assert!(root.join(".git/refs/tags").is_dir(), "empty dirs inside .git stay");
    assert!(!collection.kept.contains(&sv_in_git));
    assert!(!root.join("readme.md").exists());
}

#[test]
fn test_empty_allow_list_deletes_everything() {
    let dir = TempDir::new().unwrap();
    let root = dir.path();
    let sv = touch(root, "top.sv", "module t; endmodule\n");
    let dotfile = touch(root, ".bashrc", "alias x=y\n");

    let filter = FileFilter::new(Vec::<String>::new());
    let collection = Collector::new(&filter).collect(root).unwrap();

    assert!(!sv.exists());
    assert!(!dotfile.exists());
    assert!(collection.kept.is_empty());
    assert_eq!(collection.stats.files_deleted, 2);
}

#[test]
fn test_callback_sees_deletions_and_removals() {
    let dir = TempDir::new().unwrap();
    let root = dir.path();
    let junk = touch(root, "build/out.bin", "x");

    let events = RefCell::new(Vec::new());
    let filter = dv_filter();
    Collector::new(&filter)
        .with_callback(|event| events.borrow_mut().push(event.clone()))
        .collect(root)
        .unwrap();

    let events = events.into_inner();
    assert_eq!(
        events,
        vec![
            CollectEvent::FileDeleted(junk),
            CollectEvent::DirRemoved(root.join("build")),
        ]
    );
}

#[cfg(unix)]
#[test]
fn test_file_symlinks_classified_like_files() {
    use std::os::unix::fs::symlink;

    let dir = TempDir::new().unwrap();
    let root = dir.path();
    let target = touch(root, "real.sv", "module r; endmodule\n");
    let rtl = root.join("rtl");
    fs::create_dir(&rtl).unwrap();

    let notes = root.join("notes.txt");
    symlink(&target, &notes).unwrap();
    let dangling = root.join("links/dangling.log");
    fs::create_dir(root.join("links")).unwrap();
    symlink(root.join("missing"), &dangling).unwrap();
    let alias = root.join("alias.sv");
    symlink(&target, &alias).unwrap();
    let dir_link = root.join("rtl_link.txt");
    symlink(&rtl, &dir_link).unwrap();

    let filter = dv_filter();
    let collection = Collector::new(&filter).collect(root).unwrap();

    assert!(fs::symlink_metadata(&notes).is_err());
    assert!(fs::symlink_metadata(&dangling).is_err());
    assert!(!root.join("links").exists(), "emptied by removing the dangling link");
    assert!(fs::symlink_metadata(&dir_link).is_ok(), "directory links are left alone");
    assert!(target.exists());

    let mut kept = collection.kept.clone();
    kept.sort();
    assert_eq!(kept, vec![alias, target]);
    assert_eq!(collection.stats.files_deleted, 2);
}

#[cfg(unix)]
#[test]
fn test_delete_failures_do_not_stop_walk() {
    use std::os::unix::fs::PermissionsExt;

    let dir = TempDir::new().unwrap();
    let root = dir.path();
    let top = touch(root, "top.sv", "module top; endmodule\n");
    let sibling = touch(root, "sibling.tmp", "x");
    let locked = root.join("locked");
    let stale = touch(root, "locked/stale.log", "x");
    let locked_sv = touch(root, "locked/keep.sv", "module k; endmodule\n");
    touch(root, "locked/inner/junk.o", "obj");

    fs::set_permissions(&locked, fs::Permissions::from_mode(0o555)).unwrap();
    // Permission bits do not bind root; nothing to observe in that case
    if fs::write(locked.join("write_check"), "x").is_ok() {
        fs::set_permissions(&locked, fs::Permissions::from_mode(0o755)).unwrap();
        return;
    }

    let filter = dv_filter();
    let collection = Collector::new(&filter).collect(root).unwrap();
    fs::set_permissions(&locked, fs::Permissions::from_mode(0o755)).unwrap();

    // stale.log cannot be unlinked from the read-only directory
    assert_eq!(collection.stats.delete_failures, 1);
    assert!(stale.exists());
    // inner/ is emptied but cannot be removed from its read-only parent
    assert_eq!(collection.stats.dir_remove_failures, 1);
    assert!(locked.join("inner").is_dir());

    assert!(!sibling.exists());
    let mut kept = collection.kept.clone();
    kept.sort();
    let mut expected = vec![top, locked_sv];
    expected.sort();
    assert_eq!(kept, expected);
}

#[test]
fn test_missing_root_is_error() {
    let dir = TempDir::new().unwrap();
    let missing = dir.path().join("nope");

    let filter = dv_filter();
    match Collector::new(&filter).collect(&missing) {
        Err(CleanError::DirectoryNotFound { path }) => assert_eq!(path, missing),
        other => panic!("Expected DirectoryNotFound error, got {:?}", other.map(|c| c.kept)),
    };
}

#[test]
fn test_file_root_is_error() {
    let dir = TempDir::new().unwrap();
    let file = touch(dir.path(), "top.sv", "x");

    let filter = dv_filter();
    let result = Collector::new(&filter).collect(&file);
    assert!(matches!(result, Err(CleanError::NotADirectory { .. })));
    assert!(file.exists());
}
