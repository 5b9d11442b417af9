//! Init command implementation.

use anyhow::{bail, Result};
use std::path::Path;

const DEFAULT_CONFIG: &str = r#"# import-lint configuration

[analyzer]
# Project root that paths are reported against, relative to this file
# (default: the directory holding this file)
# root = "."

# Glob patterns to exclude from analysis
exclude = [
    "**/node_modules/**",
    "**/dist/**",
    "**/build/**",
]

# Respect .gitignore files
respect_gitignore = true

# Rule configurations
# Every rule needs its own options; a rule without a table is not run.
# `enabled` and `severity` are accepted by all rules, `debug = true` logs
# the values each rule computes.

[rules.relative-import-order]
# Strategies are tried in order until one decides.
sort = [
    { type = "group", groups = ["src/utils", "src/domain"], ignore = [] },
    { type = "depth" },
    { type = "name", asc = true },
]

[rules.import-spaces]
# Imports whose path from the project root matches the same pattern form a
# group; groups are separated by exactly one empty line.
groups = [
    "^src/utils.*$",
    "^src/domain.*$",
]

# [rules.siloed-relative-import]
# severity = "warning"
# directories = [
#     { filter = "^src/react", forbid = ["^src/http"] },
# ]
"#;

/// Config file created by `init`.
const CONFIG_FILE: &str = "import-lint.toml";

/// Runs the init command.
pub fn run(force: bool) -> Result<()> {
    write_config(Path::new(CONFIG_FILE), force)?;

    println!("Created {CONFIG_FILE}");
    println!("\nNext steps:");
    println!("  1. Edit {CONFIG_FILE} so the groups match your source tree");
    println!("  2. Run: import-lint check");
    println!("  3. Run: import-lint check --fix");

    Ok(())
}

fn write_config(config_path: &Path, force: bool) -> Result<()> {
    if config_path.exists() && !force {
        bail!(
            "Configuration file already exists at {}. Use --force to overwrite.",
            config_path.display()
        );
    }

    std::fs::write(config_path, DEFAULT_CONFIG)?;
    Ok(())
}
