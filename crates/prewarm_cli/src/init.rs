//! `prewarm init`: writes a starter `prewarm.toml`.
//!
//! The template lists the WordPress core files that nearly every request
//! loads, and carries commented examples for directory scans and an
//! external compiler.

use std::fs;
use std::path::{Path, PathBuf};

use prewarm_config::CONFIG_FILE;

use crate::GlobalArgs;

/// Core files loaded on nearly every request, in load order.
const DEFAULT_TARGETS: &[&str] = &[
    "/wp-load.php",
    "/wp-includes/version.php",
    "/wp-includes/compat.php",
    "/wp-includes/functions.php",
    "/wp-includes/class-wp.php",
    "/wp-includes/class-wp-error.php",
    "/wp-includes/plugin.php",
    "/wp-includes/pomo/mo.php",
    "/wp-includes/l10n.php",
    "/wp-includes/formatting.php",
    "/wp-includes/meta.php",
    "/wp-includes/post.php",
    "/wp-includes/user.php",
    "/wp-includes/link-template.php",
    "/wp-includes/general-template.php",
    "/wp-includes/class-wp-query.php",
    "/wp-includes/query.php",
    "/wp-includes/theme.php",
    "/wp-includes/class-wp-theme.php",
    "/wp-includes/class-wp-widget.php",
    "/wp-includes/class-wp-widget-factory.php",
    "/wp-includes/widgets.php",
    "/wp-includes/wp-db.php",
    "/wp-includes/class-wpdb.php",
    "/wp-includes/option.php",
    "/wp-includes/cache.php",
    "/wp-includes/class-wp-object-cache.php",
];

/// Runs the `prewarm init` command.
///
/// If `dir` is `Some`, the config is written there (creating the directory
/// if needed). Otherwise it goes in the current working directory. Refuses
/// to overwrite an existing `prewarm.toml`. Returns exit code 0 on success.
pub fn run(
    dir: Option<String>,
    base_dir: &str,
    global: &GlobalArgs,
) -> Result<i32, Box<dyn std::error::Error>> {
    let config_dir = match dir {
        Some(d) => PathBuf::from(d),
        None => std::env::current_dir()?,
    };
    let path = write_config(&config_dir, base_dir)?;

    if !global.quiet {
        eprintln!("     Created {}", path.display());
        eprintln!(
            "   Next: edit the target list, then run `prewarm check` to see which files exist"
        );
    }
    Ok(0)
}

/// Writes the template into `config_dir` and returns the file path.
fn write_config(config_dir: &Path, base_dir: &str) -> Result<PathBuf, Box<dyn std::error::Error>> {
    let path = config_dir.join(CONFIG_FILE);
    if path.exists() {
        return Err(format!("{} already exists", path.display()).into());
    }
    fs::create_dir_all(config_dir)?;
    fs::write(&path, render_template(base_dir))?;
    Ok(path)
}

/// Renders the template with `base_dir` as the sweep base.
fn render_template(base_dir: &str) -> String {
    let mut out = String::new();
    out.push_str("[sweep]\n");
    out.push_str("# Relative paths resolve against this file's directory.\n");
    out.push_str(&format!(
        "base_dir = {}\n",
        toml::Value::String(base_dir.to_string())
    ));
    out.push_str("mode = \"sequential\"\n");
    out.push_str("fail_on_error = false\n");
    out.push_str("targets = [\n");
    for target in DEFAULT_TARGETS {
        out.push_str(&format!("    \"{target}\",\n"));
    }
    out.push_str("    # \"/wp-content/plugins/my-plugin/my-plugin.php\",\n");
    out.push_str("    # \"/wp-content/themes/my-theme/functions.php\",\n");
    out.push_str("]\n");
    out.push('\n');
    out.push_str("# Append every matching file under a directory to the list.\n");
    out.push_str("# [[discover]]\n");
    out.push_str("# dir = \"wp-content/plugins/woocommerce/includes\"\n");
    out.push_str("# extensions = [\"php\"]\n");
    out.push('\n');
    out.push_str("[compiler]\n");
    out.push_str("kind = \"store\"\n");
    out.push_str("cache_dir = \".prewarm-cache\"\n");
    out.push_str("# Or hand each file to an external program:\n");
    out.push_str("# kind = \"command\"\n");
    out.push_str("# command = [\"php\", \"-l\"]\n");
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use prewarm_config::{load_config_file, CompilerConfig, SweepMode};
    use tempfile::TempDir;

    fn quiet() -> GlobalArgs {
        GlobalArgs {
            quiet: true,
            verbose: false,
            color: false,
            config: None,
        }
    }

    #[test]
    fn template_is_a_valid_config() {
        let config = prewarm_config::load_config_from_str(&render_template("/var/www/site"))
            .unwrap();
        assert_eq!(config.sweep.base_dir, "/var/www/site");
        assert_eq!(config.sweep.mode, SweepMode::Sequential);
        assert!(!config.sweep.fail_on_error);
        assert!(config.discover.is_empty());
        assert_eq!(config.compiler, CompilerConfig::default());

        let targets = config.sweep.targets.unwrap();
        assert_eq!(targets.len(), DEFAULT_TARGETS.len());
        assert_eq!(targets[0], "/wp-load.php");
    }

    #[test]
    fn template_escapes_base_dir() {
        let config =
            prewarm_config::load_config_from_str(&render_template("C:\\sites\\\"blog\"")).unwrap();
        assert_eq!(config.sweep.base_dir, "C:\\sites\\\"blog\"");
    }

    #[test]
    fn init_creates_directory_and_file() {
        let tmp = TempDir::new().unwrap();
        let dir = tmp.path().join("site");
        let code = run(Some(dir.to_string_lossy().into_owned()), ".", &quiet()).unwrap();
        assert_eq!(code, 0);

        let config = load_config_file(&dir.join(CONFIG_FILE)).unwrap();
        assert_eq!(config.sweep.base_dir, ".");
    }

    #[test]
    fn init_refuses_to_overwrite() {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join(CONFIG_FILE), "# mine\n").unwrap();
        let err = run(
            Some(tmp.path().to_string_lossy().into_owned()),
            ".",
            &quiet(),
        )
        .unwrap_err();
        assert!(err.to_string().contains("already exists"));
        assert_eq!(
            fs::read_to_string(tmp.path().join(CONFIG_FILE)).unwrap(),
            "# mine\n"
        );
    }

    #[test]
    fn default_targets_are_valid() {
        for raw in DEFAULT_TARGETS {
            assert!(prewarm_sweep::Target::new(raw).is_ok(), "{raw}");
        }
    }
}
