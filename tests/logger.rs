use schooldesk::logger::{get_log_file_path, Logger};

#[test]
fn test_clones_share_one_buffer() {
    let logger = Logger::new();
    let clone = logger.clone();

    clone.log("Load: Users page 1".to_string());
    logger.log("Mutation: ✅ Record created".to_string());

    let logs = logger.get_logs();
    assert_eq!(logs.len(), 2);
    assert!(logs[0].contains("Record created"));
    assert!(logs[0].starts_with('['));
}

#[test]
fn test_clear() {
    let logger = Logger::new();
    logger.log("Test message".to_string());
    logger.clear();
    assert!(logger.get_logs().is_empty());
}

#[test]
fn test_log_file_lives_in_app_dir() {
    if let Ok(path) = get_log_file_path() {
        assert!(path.ends_with("schooldesk/schooldesk.log"));
    }
}
