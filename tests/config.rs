#[cfg(test)]
mod tests {
    use parking_lot::{Mutex, MutexGuard};
    use std::path::PathBuf;
    use std::time::Duration;
    use tasklist::libs::config::{ClientConfig, Config, ServerConfig, CONFIG_FILE_NAME, DB_FILE_NAME};
    use tasklist::libs::data_storage::DataStorage;
    use tempfile::TempDir;
    use test_context::{test_context, TestContext};

    // HOME and the TASKLIST_* variables are process-wide.
    static ENV_LOCK: Mutex<()> = Mutex::new(());

    const OVERRIDES: [&str; 5] = ["TASKLIST_HOST", "TASKLIST_PORT", "TASKLIST_DB", "TASKLIST_URL", "TASKLIST_TIMEOUT"];

    struct ConfigTestContext {
        temp_dir: TempDir,
        _guard: MutexGuard<'static, ()>,
    }

    impl TestContext for ConfigTestContext {
        fn setup() -> Self {
            let guard = ENV_LOCK.lock();
            let temp_dir = tempfile::tempdir().unwrap();
            std::env::set_var("HOME", temp_dir.path());
            std::env::set_var("LOCALAPPDATA", temp_dir.path());
            for name in OVERRIDES {
                std::env::remove_var(name);
            }
            ConfigTestContext { temp_dir, _guard: guard }
        }

        fn teardown(self) {
            for name in OVERRIDES {
                std::env::remove_var(name);
            }
        }
    }

    #[test]
    fn test_defaults() {
        let server = ServerConfig::default();
        assert_eq!(server.bind_address(), "127.0.0.1:3000");
        assert!(server.database.is_none());

        let client = ClientConfig::default();
        assert_eq!(client.base_url, "http://127.0.0.1:3000");
        assert_eq!(client.timeout(), Duration::from_secs(10));
    }

    #[test_context(ConfigTestContext)]
    #[test]
    fn test_missing_file_reads_defaults(_ctx: &mut ConfigTestContext) {
        assert_eq!(Config::read().unwrap(), Config::default());
    }

    #[test_context(ConfigTestContext)]
    #[test]
    fn test_save_and_read(_ctx: &mut ConfigTestContext) {
        let mut config = Config::default();
        config.server.port = 4100;
        config.server.database = Some("/tmp/tasks.db".to_string());
        config.client.base_url = "http://tasks.local:4100".to_string();
        config.client.timeout_secs = 3;
        config.save().unwrap();

        assert_eq!(Config::read().unwrap(), config);
    }

    #[test_context(ConfigTestContext)]
    #[test]
    fn test_partial_file_fills_defaults(_ctx: &mut ConfigTestContext) {
        let path = DataStorage::new().get_path(CONFIG_FILE_NAME).unwrap();
        std::fs::write(&path, r#"{ "server": { "host": "0.0.0.0", "port": 8080 } }"#).unwrap();

        let config = Config::read().unwrap();
        assert_eq!(config.server.bind_address(), "0.0.0.0:8080");
        assert_eq!(config.client, ClientConfig::default());
    }

    #[test_context(ConfigTestContext)]
    #[test]
    fn test_environment_overrides_file(_ctx: &mut ConfigTestContext) {
        Config::default().save().unwrap();
        std::env::set_var("TASKLIST_PORT", "5050");
        std::env::set_var("TASKLIST_DB", "/var/lib/tasks.db");
        std::env::set_var("TASKLIST_URL", "http://example.test:5050");
        std::env::set_var("TASKLIST_TIMEOUT", "2");

        let config = Config::load().unwrap();
        assert_eq!(config.server.port, 5050);
        assert_eq!(config.server.database_path().unwrap(), PathBuf::from("/var/lib/tasks.db"));
        assert_eq!(config.client.base_url, "http://example.test:5050");
        assert_eq!(config.client.timeout(), Duration::from_secs(2));
    }

    #[test_context(ConfigTestContext)]
    #[test]
    fn test_bad_port_override_fails(_ctx: &mut ConfigTestContext) {
        std::env::set_var("TASKLIST_PORT", "not-a-port");
        assert!(Config::load().is_err());
    }

    #[test_context(ConfigTestContext)]
    #[test]
    fn test_database_defaults_to_data_directory(ctx: &mut ConfigTestContext) {
        let path = ServerConfig::default().database_path().unwrap();
        assert!(path.starts_with(ctx.temp_dir.path()));
        assert!(path.ends_with(DB_FILE_NAME));
    }
}
