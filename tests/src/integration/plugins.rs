//! Plugin resolution, load ordering, and failure policy across a full
//! bootstrap run.

#[cfg(test)]
mod tests {
    use crate::support::{new_log, plant_config, plant_manifest, RecordingPlugin};
    use ignition_bus::handler_fn;
    use ignition_runtime::{
        BootPayload, BootstrapError, BootstrapOptions, Bootstrapper, PluginError, PluginRegistry,
    };
    use serde_json::json;
    use std::sync::Arc;
    use tempfile::TempDir;

    fn registry_with(plugins: Vec<RecordingPlugin>) -> Arc<PluginRegistry> {
        let registry = Arc::new(PluginRegistry::new());
        for plugin in plugins {
            registry.register(Arc::new(plugin)).unwrap();
        }
        registry
    }

    #[tokio::test]
    async fn test_plugins_load_in_list_order() {
        let dir = TempDir::new().unwrap();
        plant_manifest(dir.path(), "alpha");
        plant_manifest(dir.path(), "beta");
        let config = plant_config(
            dir.path(),
            "app.json",
            r#"{"plugins": ["beta", "alpha"]}"#,
        );

        let log = new_log();
        // beta is slow; if loads overlapped, alpha would record first.
        let registry = registry_with(vec![
            RecordingPlugin::new("alpha", Arc::clone(&log)),
            RecordingPlugin::new("beta", Arc::clone(&log)).with_delay(20),
        ]);
        let bootstrapper = Bootstrapper::with_registry(
            BootstrapOptions::new()
                .with_user_conf_root(dir.path())
                .with_config_sources(vec![config])
                .with_plugin_dirs(vec![dir.path().to_path_buf()]),
            registry,
        );
        let instance = bootstrapper.bootstrap().await.unwrap();

        // Config list order governs, not registration or alphabetical order.
        assert_eq!(*log.lock(), vec!["beta", "alpha"]);
        assert_eq!(instance.plugins().loaded(), vec!["beta", "alpha"]);
    }

    #[tokio::test]
    async fn test_search_continues_to_later_directories() {
        let empty = TempDir::new().unwrap();
        let populated = TempDir::new().unwrap();
        plant_manifest(populated.path(), "alpha");
        let config = plant_config(populated.path(), "app.json", r#"{"plugins": ["alpha"]}"#);

        let log = new_log();
        let bootstrapper = Bootstrapper::with_registry(
            BootstrapOptions::new()
                .with_user_conf_root(populated.path())
                .with_config_sources(vec![config])
                .with_plugin_dirs(vec![
                    empty.path().to_path_buf(),
                    populated.path().to_path_buf(),
                ]),
            registry_with(vec![RecordingPlugin::new("alpha", Arc::clone(&log))]),
        );
        bootstrapper.bootstrap().await.unwrap();
        assert_eq!(*log.lock(), vec!["alpha"]);
    }

    #[tokio::test]
    async fn test_unregistered_plugin_is_fatal() {
        let dir = TempDir::new().unwrap();
        plant_manifest(dir.path(), "ghost");
        let config = plant_config(dir.path(), "app.json", r#"{"plugins": ["ghost"]}"#);

        let bootstrapper = Bootstrapper::new(
            BootstrapOptions::new()
                .with_user_conf_root(dir.path())
                .with_config_sources(vec![config])
                .with_plugin_dirs(vec![dir.path().to_path_buf()]),
        );
        let err = bootstrapper.bootstrap().await.unwrap_err();

        assert_eq!(err.stage(), "plugin:ghost");
        assert!(matches!(
            &*err,
            BootstrapError::Plugin {
                source: PluginError::Unregistered { .. },
                ..
            }
        ));
    }

    #[tokio::test]
    async fn test_unresolvable_plugin_is_fatal_even_in_permissive_mode() {
        let dir = TempDir::new().unwrap();
        let config = plant_config(
            dir.path(),
            "app.json",
            r#"{"plugins": ["ghost"], "plugin_fail_fast": false}"#,
        );

        let bootstrapper = Bootstrapper::new(
            BootstrapOptions::new()
                .with_user_conf_root(dir.path())
                .with_config_sources(vec![config])
                .with_plugin_dirs(vec![dir.path().to_path_buf()]),
        );
        let err = bootstrapper.bootstrap().await.unwrap_err();

        assert_eq!(err.stage(), "plugin:ghost");
        assert!(matches!(
            &*err,
            BootstrapError::Plugin {
                source: PluginError::NotFound { .. },
                ..
            }
        ));
    }

    #[tokio::test]
    async fn test_permissive_mode_continues_past_registration_failure() {
        let dir = TempDir::new().unwrap();
        plant_manifest(dir.path(), "alpha");
        plant_manifest(dir.path(), "beta");
        let config = plant_config(
            dir.path(),
            "app.json",
            r#"{"plugins": ["alpha", "beta"], "plugin_fail_fast": false}"#,
        );

        let log = new_log();
        let bootstrapper = Bootstrapper::with_registry(
            BootstrapOptions::new()
                .with_user_conf_root(dir.path())
                .with_config_sources(vec![config])
                .with_plugin_dirs(vec![dir.path().to_path_buf()]),
            registry_with(vec![
                RecordingPlugin::new("alpha", Arc::clone(&log)).failing(),
                RecordingPlugin::new("beta", Arc::clone(&log)),
            ]),
        );
        let instance = bootstrapper.bootstrap().await.unwrap();

        // alpha was attempted, failed, and beta still loaded.
        assert_eq!(*log.lock(), vec!["alpha", "beta"]);
        assert_eq!(instance.plugins().loaded(), vec!["beta"]);
    }

    #[tokio::test]
    async fn test_fail_fast_aborts_on_registration_failure() {
        let dir = TempDir::new().unwrap();
        plant_manifest(dir.path(), "alpha");
        plant_manifest(dir.path(), "beta");
        let config = plant_config(
            dir.path(),
            "app.json",
            r#"{"plugins": ["alpha", "beta"]}"#,
        );

        let log = new_log();
        let bootstrapper = Bootstrapper::with_registry(
            BootstrapOptions::new()
                .with_user_conf_root(dir.path())
                .with_config_sources(vec![config])
                .with_plugin_dirs(vec![dir.path().to_path_buf()]),
            registry_with(vec![
                RecordingPlugin::new("alpha", Arc::clone(&log)).failing(),
                RecordingPlugin::new("beta", Arc::clone(&log)),
            ]),
        );
        let err = bootstrapper.bootstrap().await.unwrap_err();

        assert_eq!(err.stage(), "plugin:alpha");
        // beta was never attempted.
        assert_eq!(*log.lock(), vec!["alpha"]);
    }

    #[tokio::test]
    async fn test_pre_bootstrap_mutation_changes_the_loaded_set() {
        let dir = TempDir::new().unwrap();
        plant_manifest(dir.path(), "alpha");
        plant_manifest(dir.path(), "beta");
        let config = plant_config(dir.path(), "app.json", r#"{"plugins": ["alpha"]}"#);

        let log = new_log();
        let bootstrapper = Bootstrapper::with_registry(
            BootstrapOptions::new()
                .with_user_conf_root(dir.path())
                .with_config_sources(vec![config])
                .with_plugin_dirs(vec![dir.path().to_path_buf()])
                .on_pre_bootstrap(handler_fn("rewire", |payload: BootPayload| async move {
                    if let BootPayload::Config(config) = payload {
                        config.write().set("plugins", json!(["beta"]));
                    }
                    Ok(())
                })),
            registry_with(vec![
                RecordingPlugin::new("alpha", Arc::clone(&log)),
                RecordingPlugin::new("beta", Arc::clone(&log)),
            ]),
        );
        let instance = bootstrapper.bootstrap().await.unwrap();

        // The handler's list is the one that loads, not the file's.
        assert_eq!(*log.lock(), vec!["beta"]);
        assert_eq!(instance.plugins().loaded(), vec!["beta"]);
    }

    #[tokio::test]
    async fn test_capability_attached_by_plugin_reaches_post_handlers() {
        let dir = TempDir::new().unwrap();
        plant_manifest(dir.path(), "alpha");
        let config = plant_config(dir.path(), "app.json", r#"{"plugins": ["alpha"]}"#);

        let log = new_log();
        let seen = Arc::clone(&log);
        let bootstrapper = Bootstrapper::with_registry(
            BootstrapOptions::new()
                .with_user_conf_root(dir.path())
                .with_config_sources(vec![config])
                .with_plugin_dirs(vec![dir.path().to_path_buf()])
                .on_post_bootstrap(handler_fn("reader", move |payload: BootPayload| {
                    let seen = Arc::clone(&seen);
                    async move {
                        if let BootPayload::Instance(instance) = payload {
                            let answer = instance
                                .capability_as::<u32>("answer")
                                .ok_or("capability missing")?;
                            seen.lock().push(format!("answer={answer}"));
                        }
                        Ok(())
                    }
                })),
            registry_with(vec![
                RecordingPlugin::new("alpha", new_log()).with_capability("answer", 42),
            ]),
        );
        let instance = bootstrapper.bootstrap().await.unwrap();

        assert_eq!(*log.lock(), vec!["answer=42"]);
        assert_eq!(instance.capability_names(), vec!["answer"]);
    }
}
