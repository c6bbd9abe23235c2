use file_explorer::Interpreter;
use file_explorer::env::Environment;
use std::env as stdenv;
use std::fs;
use std::path::PathBuf;
use std::sync::{Mutex, MutexGuard, OnceLock};
use tempfile::TempDir;

fn lock_current_dir() -> MutexGuard<'static, ()> {
    static MUTEX: OnceLock<Mutex<()>> = OnceLock::new();
    MUTEX
        .get_or_init(|| Mutex::new(()))
        .lock()
        .unwrap_or_else(|poisoned| poisoned.into_inner())
}

struct Session {
    _tmp: TempDir,
    root: PathBuf,
    interp: Interpreter,
}

impl Session {
    fn new() -> Self {
        let tmp = tempfile::tempdir().expect("failed to create temp dir");
        let root = fs::canonicalize(tmp.path()).expect("canonicalize failed");
        let interp = Interpreter::starting_in(Environment::at(&root));
        Self {
            _tmp: tmp,
            root,
            interp,
        }
    }

    /// Run one line and return everything it printed.
    fn line(&mut self, line: &str) -> String {
        let mut out = Vec::new();
        self.interp
            .execute_line(line, &mut out)
            .expect("writing to a Vec cannot fail");
        String::from_utf8(out).unwrap()
    }

    fn cwd(&self) -> PathBuf {
        self.interp.env().current_dir.clone()
    }
}

#[test]
fn mkdir_cd_and_back_restores_path() {
    let _lock = lock_current_dir();
    let orig = stdenv::current_dir().unwrap();
    let mut s = Session::new();
    let start = s.cwd();

    assert_eq!(s.line("mkdir x"), "✅ Directory created.\n");
    assert_eq!(s.line("cd x"), "");
    assert_eq!(s.cwd(), s.root.join("x"));
    assert_eq!(s.line("cd .."), "");
    assert_eq!(s.cwd().as_os_str(), start.as_os_str());

    stdenv::set_current_dir(orig).expect("failed to restore cwd");
}

#[test]
fn cd_into_file_fails_and_keeps_path() {
    let _lock = lock_current_dir();
    let orig = stdenv::current_dir().unwrap();
    let mut s = Session::new();
    fs::write(s.root.join("plain"), b"").unwrap();

    assert_eq!(s.line("cd plain"), "❌ Directory not found.\n");
    assert_eq!(s.cwd(), s.root);

    stdenv::set_current_dir(orig).expect("failed to restore cwd");
}

#[test]
fn chmod_then_perm() {
    let mut s = Session::new();
    assert_eq!(s.line("touch f"), "✅ File created.\n");
    assert_eq!(s.line("chmod 644 f"), "✅ Permissions updated.\n");
    assert_eq!(s.line("perm f"), "rw-r--r--\n");
    assert_eq!(s.line("chmod 751 f"), "✅ Permissions updated.\n");
    assert_eq!(s.line("perm f"), "rwxr-x--x\n");
}

#[test]
fn unknown_command_keeps_session_alive() {
    let mut s = Session::new();
    let before = s.cwd();

    assert_eq!(
        s.line("teleport somewhere"),
        "❓ Unknown command. Type 'help' for options.\n"
    );
    assert_eq!(s.cwd(), before);
    assert!(!s.interp.env().should_exit);

    s.line("exit");
    assert!(s.interp.env().should_exit);
}

#[test]
fn ls_on_empty_directory() {
    let mut s = Session::new();
    let out = s.line("ls");
    let lines: Vec<_> = out.lines().collect();

    assert_eq!(lines[0], "TYPE    SIZE        NAME");
    assert_eq!(lines[1], "-".repeat(40));
    let names: Vec<_> = lines[2..].iter().map(|l| &l[20..]).collect();
    assert_eq!(names, vec![".", ".."]);
}

#[test]
fn ls_shows_created_entries() {
    let mut s = Session::new();
    s.line("mkdir docs");
    s.line("touch empty.txt");
    fs::write(s.root.join("big.bin"), vec![7u8; 3 * 1024]).unwrap();

    let out = s.line("ls");
    assert!(out.lines().any(|l| l == "FILE    0 B         empty.txt"));
    assert!(out.lines().any(|l| l == "FILE    3.00 KB     big.bin"));
    assert!(out.lines().any(|l| l.starts_with("DIR ") && l.ends_with("docs")));
}

#[test]
fn search_walks_the_whole_tree() {
    let mut s = Session::new();
    fs::create_dir_all(s.root.join("a")).unwrap();
    fs::create_dir_all(s.root.join("b/c")).unwrap();
    fs::write(s.root.join("a/target.txt"), b"").unwrap();
    fs::write(s.root.join("b/other.txt"), b"").unwrap();
    fs::write(s.root.join("b/c/target.txt"), b"").unwrap();

    let out = s.line("search target.txt");
    let mut lines: Vec<_> = out.lines().map(str::to_string).collect();
    lines.sort();
    assert_eq!(
        lines,
        vec![
            format!("Found: {}", s.root.join("a/target.txt").display()),
            format!("Found: {}", s.root.join("b/c/target.txt").display()),
        ]
    );

    assert_eq!(s.line("search nothing-here"), "");
}

#[test]
fn copy_move_and_delete() {
    let mut s = Session::new();
    fs::write(s.root.join("orig"), b"0123456789").unwrap();
    fs::write(s.root.join("dest"), b"this old content is longer").unwrap();

    assert_eq!(s.line("cp orig dest"), "📋 Copy successful.\n");
    assert_eq!(fs::read(s.root.join("dest")).unwrap(), b"0123456789");

    assert_eq!(s.line("mv dest renamed"), "📦 Move successful.\n");
    assert!(!s.root.join("dest").exists());

    assert_eq!(s.line("rm renamed"), "🗑️ File deleted.\n");
    assert_eq!(s.line("rm renamed"), "❌ Could not delete file.\n");

    s.line("mkdir d");
    assert_eq!(s.line("rmdir d"), "🗑️ Directory removed.\n");
    assert_eq!(s.line("rmdir d"), "❌ Could not remove directory.\n");
}

#[test]
fn repeated_mkdir_fails_without_side_effects() {
    let mut s = Session::new();
    s.line("mkdir x");
    fs::write(s.root.join("x/inner"), b"keep").unwrap();

    assert_eq!(s.line("mkdir x"), "❌ Failed to create directory.\n");
    assert_eq!(fs::read(s.root.join("x/inner")).unwrap(), b"keep");
}

#[test]
fn missing_arguments_are_rejected() {
    let mut s = Session::new();
    let before = s.cwd();

    let out = s.line("mkdir");
    assert!(out.contains("name"), "unexpected usage output: {out}");
    let out = s.line("chmod 644");
    assert!(out.contains("file"), "unexpected usage output: {out}");

    assert_eq!(s.cwd(), before);
    assert_eq!(fs::read_dir(&s.root).unwrap().count(), 0);
}

#[test]
fn names_that_look_like_flags_are_plain_arguments() {
    let mut s = Session::new();

    assert_eq!(s.line("touch help"), "✅ File created.\n");
    assert!(s.root.join("help").is_file());
    assert_eq!(s.line("touch -x"), "✅ File created.\n");
    assert!(s.root.join("-x").is_file());
    assert_eq!(s.line("mkdir --help"), "✅ Directory created.\n");
    assert!(s.root.join("--help").is_dir());

    assert_eq!(s.line("rm -x"), "🗑️ File deleted.\n");
    assert!(!s.root.join("-x").exists());
    assert_eq!(
        s.line("search help"),
        format!("Found: {}\n", s.root.join("help").display())
    );
}

#[test]
fn rm_removes_empty_directories_only() {
    let mut s = Session::new();
    s.line("mkdir empty");
    s.line("mkdir full");
    fs::write(s.root.join("full/inner"), b"").unwrap();

    assert_eq!(s.line("rm empty"), "🗑️ File deleted.\n");
    assert!(!s.root.join("empty").exists());
    assert_eq!(s.line("rm full"), "❌ Could not delete file.\n");
    assert!(s.root.join("full/inner").exists());
}

#[test]
fn extra_tokens_are_ignored() {
    let mut s = Session::new();
    assert_eq!(s.line("touch one two three"), "✅ File created.\n");
    assert!(s.root.join("one").exists());
    assert!(!s.root.join("two").exists());
}
