//! Configuration file loading and validation.

use crate::error::ConfigError;
use crate::types::{CompilerConfig, PrewarmConfig};
use prewarm_common::Target;
use std::path::Path;

/// File name looked up in a project directory.
pub const CONFIG_FILE: &str = "prewarm.toml";

/// Loads and validates `<dir>/prewarm.toml`.
pub fn load_config(dir: &Path) -> Result<PrewarmConfig, ConfigError> {
    load_config_file(&dir.join(CONFIG_FILE))
}

/// Loads and validates a configuration file at an explicit path.
pub fn load_config_file(path: &Path) -> Result<PrewarmConfig, ConfigError> {
    let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    parse(&content, &path.display().to_string())
}

/// Parses and validates a configuration from a string.
///
/// Useful for testing without filesystem dependencies.
pub fn load_config_from_str(content: &str) -> Result<PrewarmConfig, ConfigError> {
    parse(content, "<inline>")
}

fn parse(content: &str, origin: &str) -> Result<PrewarmConfig, ConfigError> {
    let config: PrewarmConfig = toml::from_str(content).map_err(|e| ConfigError::Parse {
        origin: origin.to_string(),
        message: e.to_string().trim_end().to_string(),
    })?;
    validate_config(&config)?;
    Ok(config)
}

/// Validates that required fields are present and values are usable.
fn validate_config(config: &PrewarmConfig) -> Result<(), ConfigError> {
    if config.sweep.base_dir.trim().is_empty() {
        return Err(ConfigError::MissingField("sweep.base_dir".to_string()));
    }

    match &config.sweep.targets {
        None if config.discover.is_empty() => {
            return Err(ConfigError::MissingField("sweep.targets".to_string()));
        }
        None => {}
        Some(targets) => {
            for (i, raw) in targets.iter().enumerate() {
                if let Err(e) = Target::new(raw) {
                    return Err(ConfigError::invalid(format!("sweep.targets[{i}]"), e.to_string()));
                }
            }
        }
    }

    for (i, scan) in config.discover.iter().enumerate() {
        if scan.dir.split('/').any(|segment| segment == "..") {
            return Err(ConfigError::invalid(
                format!("discover[{i}].dir"),
                format!("'{}' escapes the base directory", scan.dir),
            ));
        }
        if scan.extensions.iter().any(|e| e.is_empty() || e.starts_with('.')) {
            return Err(ConfigError::invalid(
                format!("discover[{i}].extensions"),
                "use bare extensions like \"php\"",
            ));
        }
    }

    match &config.compiler {
        CompilerConfig::Command { command } if command.is_empty() => {
            Err(ConfigError::invalid("compiler.command", "must name a program"))
        }
        CompilerConfig::Store { cache_dir, .. } if cache_dir.trim().is_empty() => {
            Err(ConfigError::MissingField("compiler.cache_dir".to_string()))
        }
        _ => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::SweepMode;

    #[test]
    fn parse_minimal_config() {
        let toml = r#"
[sweep]
base_dir = "/var/www/site"
targets = ["/wp-load.php"]
"#;
        let config = load_config_from_str(toml).unwrap();
        assert_eq!(config.sweep.base_dir, "/var/www/site");
        assert_eq!(config.sweep.targets.as_deref(), Some(&["/wp-load.php".to_string()][..]));
        assert_eq!(config.sweep.mode, SweepMode::Sequential);
        assert!(!config.sweep.fail_on_error);
        assert!(config.discover.is_empty());
        assert_eq!(config.compiler, CompilerConfig::default());
    }

    #[test]
    fn parse_full_config() {
        let toml = r#"
[sweep]
base_dir = "site"
targets = ["/wp-load.php", "/wp-includes/version.php"]
mode = "parallel"
fail_on_error = true

[[discover]]
dir = "wp-content/plugins/woocommerce/includes"
extensions = ["php"]

[[discover]]
dir = "wp-content/themes/custom"
recursive = false

[compiler]
kind = "command"
command = ["php", "-l"]
"#;
        let config = load_config_from_str(toml).unwrap();
        assert_eq!(config.sweep.mode, SweepMode::Parallel);
        assert!(config.sweep.fail_on_error);
        assert_eq!(config.discover.len(), 2);
        assert!(config.discover[0].recursive);
        assert!(!config.discover[1].recursive);
        assert!(config.discover[1].extensions.is_empty());
        assert_eq!(
            config.compiler,
            CompilerConfig::Command {
                command: vec!["php".into(), "-l".into()]
            }
        );
    }

    #[test]
    fn store_compiler_defaults() {
        let toml = r#"
[sweep]
base_dir = "/srv"
targets = []

[compiler]
kind = "store"
"#;
        let config = load_config_from_str(toml).unwrap();
        assert_eq!(
            config.compiler,
            CompilerConfig::Store {
                cache_dir: ".prewarm-cache".into(),
                require_utf8: true
            }
        );
    }

    #[test]
    fn explicit_empty_target_list_is_valid() {
        let toml = "[sweep]\nbase_dir = \"/srv\"\ntargets = []\n";
        let config = load_config_from_str(toml).unwrap();
        assert_eq!(config.sweep.targets, Some(vec![]));
    }

    #[test]
    fn absent_target_list_errors() {
        let toml = "[sweep]\nbase_dir = \"/srv\"\n";
        let err = load_config_from_str(toml).unwrap_err();
        assert!(matches!(err, ConfigError::MissingField(ref f) if f == "sweep.targets"));
    }

    #[test]
    fn discover_alone_is_enough() {
        let toml = r#"
[sweep]
base_dir = "/srv"

[[discover]]
dir = "lib"
"#;
        let config = load_config_from_str(toml).unwrap();
        assert!(config.sweep.targets.is_none());
    }

    #[test]
    fn empty_base_dir_errors() {
        let toml = "[sweep]\nbase_dir = \"\"\ntargets = []\n";
        let err = load_config_from_str(toml).unwrap_err();
        assert!(matches!(err, ConfigError::MissingField(_)));
    }

    #[test]
    fn escaping_target_errors() {
        let toml = "[sweep]\nbase_dir = \"/srv\"\ntargets = [\"/ok.php\", \"../../etc/passwd\"]\n";
        let err = load_config_from_str(toml).unwrap_err();
        assert!(err.to_string().contains("sweep.targets[1]"));
    }

    #[test]
    fn escaping_discover_dir_errors() {
        let toml = "[sweep]\nbase_dir = \"/srv\"\n[[discover]]\ndir = \"../other\"\n";
        assert!(matches!(
            load_config_from_str(toml).unwrap_err(),
            ConfigError::Invalid { .. }
        ));
    }

    #[test]
    fn dotted_extension_errors() {
        let toml = "[sweep]\nbase_dir = \"/srv\"\n[[discover]]\ndir = \"lib\"\nextensions = [\".php\"]\n";
        assert!(matches!(
            load_config_from_str(toml).unwrap_err(),
            ConfigError::Invalid { .. }
        ));
    }

    #[test]
    fn empty_command_errors() {
        let toml = "[sweep]\nbase_dir = \"/srv\"\ntargets = []\n[compiler]\nkind = \"command\"\ncommand = []\n";
        let err = load_config_from_str(toml).unwrap_err();
        assert!(err.to_string().contains("compiler.command"));
    }

    #[test]
    fn unknown_mode_errors() {
        let toml = "[sweep]\nbase_dir = \"/srv\"\ntargets = []\nmode = \"eventually\"\n";
        assert!(matches!(
            load_config_from_str(toml).unwrap_err(),
            ConfigError::Parse { .. }
        ));
    }

    #[test]
    fn invalid_toml_errors() {
        let err = load_config_from_str("this is not valid toml {{{}}}").unwrap_err();
        assert!(matches!(err, ConfigError::Parse { .. }));
    }

    #[test]
    fn io_error_from_nonexistent_dir() {
        let err = load_config(Path::new("/nonexistent/dir")).unwrap_err();
        assert!(matches!(err, ConfigError::Read { .. }));
    }

    #[test]
    fn load_from_directory() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join(CONFIG_FILE),
            "[sweep]\nbase_dir = \".\"\ntargets = [\"a.php\"]\n",
        )
        .unwrap();
        let config = load_config(dir.path()).unwrap();
        assert_eq!(config.sweep.base_dir, ".");
    }
}
