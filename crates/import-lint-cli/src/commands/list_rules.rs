//! List rules command implementation.

use import_lint_rules::all_rules;

/// Runs the list-rules command.
pub fn run() {
    println!("Available rules:\n");
    println!("{:<8} {:<25} {:<8} Description", "Code", "Name", "Fix");
    println!("{}", "-".repeat(100));

    for rule in all_rules() {
        println!(
            "{:<8} {:<25} {:<8} {}",
            rule.code,
            rule.name,
            if rule.fixable { "yes" } else { "-" },
            rule.description
        );
    }

    println!("\nRules are enabled by adding a [rules.<name>] table to import-lint.toml.");
    println!("Run `import-lint init` to generate an annotated template.");

    println!("\nUse --rules to filter specific rules, e.g.:");
    println!("  import-lint check --rules relative-import-order,import-spaces");
    println!("  import-lint check --rules IL003 --format pretty");
}
