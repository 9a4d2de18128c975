use knob_invaders::highscore::HighScoreStore;

#[test]
fn missing_file_reads_zero() {
    let dir = tempfile::tempdir().unwrap();
    let store = HighScoreStore::new(dir.path().join("score.txt"));
    assert_eq!(store.read(), 0);
}

#[test]
fn write_then_read() {
    let dir = tempfile::tempdir().unwrap();
    let store = HighScoreStore::new(dir.path().join("score.txt"));
    assert!(store.write(1234));
    assert_eq!(store.read(), 1234);
    assert_eq!(std::fs::read_to_string(store.path()).unwrap(), "1234");
}

#[test]
fn surrounding_whitespace_is_tolerated() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("score.txt");
    std::fs::write(&path, "  870\n").unwrap();
    assert_eq!(HighScoreStore::new(path).read(), 870);
}

#[test]
fn corrupt_file_reads_zero() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("score.txt");
    std::fs::write(&path, "lots").unwrap();
    assert_eq!(HighScoreStore::new(&path).read(), 0);
    std::fs::write(&path, "-5").unwrap();
    assert_eq!(HighScoreStore::new(&path).read(), 0);
}

#[test]
fn unwritable_path_reports_failure() {
    let dir = tempfile::tempdir().unwrap();
    let store = HighScoreStore::new(dir.path().join("no_such_dir").join("score.txt"));
    assert!(!store.write(10));
    assert_eq!(store.read(), 0);
}
