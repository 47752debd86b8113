//! Structural tests for architectural boundary enforcement.
//!
//! These tests scan source files to verify that the layering stays intact:
//! the domain is pure, services talk to the cloud only through ports, and
//! only `infra/` touches the AWS SDK.

use std::path::{Path, PathBuf};

/// Collect all `.rs` files under a directory recursively.
fn collect_rs_files(dir: &Path) -> Vec<PathBuf> {
    let mut files = Vec::new();
    if let Ok(entries) = std::fs::read_dir(dir) {
        for entry in entries.flatten() {
            let path = entry.path();
            if path.is_dir() {
                files.extend(collect_rs_files(&path));
            } else if path.extension().and_then(|e| e.to_str()) == Some("rs") {
                files.push(path);
            }
        }
    }
    files
}

/// Read a file and strip comment lines to avoid false positives.
fn read_non_comment_lines(path: &Path) -> Vec<String> {
    let Ok(content) = std::fs::read_to_string(path) else {
        return Vec::new();
    };
    content
        .lines()
        .filter(|l| {
            let trimmed = l.trim();
            !trimmed.starts_with("//") && !trimmed.starts_with("/*") && !trimmed.starts_with('*')
        })
        .map(String::from)
        .collect()
}

/// Track brace depth and return whether a line is inside a `#[cfg(test)]` block.
struct CfgTestTracker {
    in_test_block: bool,
    brace_depth: i32,
    test_block_start_depth: i32,
}

impl CfgTestTracker {
    fn new() -> Self {
        Self {
            in_test_block: false,
            brace_depth: 0,
            test_block_start_depth: 0,
        }
    }

    /// Process a line and return `true` if it's inside a `#[cfg(test)]` block.
    fn process_line(&mut self, line: &str) -> bool {
        let trimmed = line.trim();
        if trimmed.contains("#[cfg(test)]") {
            self.in_test_block = true;
            self.test_block_start_depth = self.brace_depth;
        }
        for ch in line.chars() {
            match ch {
                '{' => self.brace_depth += 1,
                '}' => {
                    self.brace_depth -= 1;
                    if self.in_test_block && self.brace_depth <= self.test_block_start_depth {
                        self.in_test_block = false;
                    }
                }
                _ => {}
            }
        }
        self.in_test_block
    }
}

fn src_dir() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("src")
}

fn relative(file: &Path) -> String {
    file.strip_prefix(env!("CARGO_MANIFEST_DIR"))
        .unwrap_or(file)
        .display()
        .to_string()
}

/// Every non-comment line in `dir` containing one of `needles`.
fn find_in(dir: &Path, needles: &[&str]) -> Vec<String> {
    let mut violations = Vec::new();
    for file in collect_rs_files(dir) {
        let rel = relative(&file);
        for (i, line) in read_non_comment_lines(&file).iter().enumerate() {
            for needle in needles {
                if line.contains(needle) {
                    violations.push(format!("{rel}:{}: `{needle}`: {line}", i + 1));
                }
            }
        }
    }
    violations
}

#[test]
fn domain_is_free_of_io_and_sdk() {
    let violations = find_in(
        &src_dir().join("domain"),
        &[
            "aws_sdk_",
            "aws_config",
            "tokio::",
            "std::fs",
            "crate::infra",
            "crate::application",
            "crate::output",
        ],
    );

    assert!(
        violations.is_empty(),
        "domain/ must stay pure:\n{}",
        violations.join("\n")
    );
}

#[test]
fn application_talks_to_cloud_only_through_ports() {
    let violations = find_in(
        &src_dir().join("application"),
        &[
            "aws_sdk_",
            "aws_config",
            "crate::infra",
            "crate::commands",
            "crate::output",
        ],
    );

    assert!(
        violations.is_empty(),
        "application/ must depend only on domain and ports:\n{}",
        violations.join("\n")
    );
}

#[test]
fn aws_sdk_only_referenced_from_infra() {
    let src = src_dir();
    let violations: Vec<String> = find_in(&src, &["aws_sdk_", "aws_config::"])
        .into_iter()
        .filter(|v| !v.replace('\\', "/").contains("src/infra/aws/"))
        .collect();

    assert!(
        violations.is_empty(),
        "AWS SDK usage outside infra/aws:\n{}",
        violations.join("\n")
    );
}

#[test]
fn no_inline_json_branching_in_commands() {
    let mut violations = Vec::new();

    for file in collect_rs_files(&src_dir().join("commands")) {
        let rel = relative(&file);
        for (i, line) in read_non_comment_lines(&file).iter().enumerate() {
            let lineno = i + 1;
            if line.contains("json: bool") {
                violations.push(format!("{rel}:{lineno}: found `json: bool` parameter: {line}"));
            }
            let trimmed = line.trim();
            if trimmed.starts_with("if json") || trimmed.starts_with("if !json") {
                violations.push(format!("{rel}:{lineno}: found inline JSON branch: {line}"));
            }
        }
    }

    assert!(
        violations.is_empty(),
        "Found inline JSON branching in commands/ — use app.renderer() instead:\n{}",
        violations.join("\n")
    );
}

#[test]
fn infra_has_no_imports_from_commands_or_output() {
    let violations = find_in(
        &src_dir().join("infra"),
        &["crate::commands", "crate::output"],
    );

    assert!(
        violations.is_empty(),
        "infra/ must not import from commands/ or output/:\n{}",
        violations.join("\n")
    );
}

#[test]
fn no_print_macros_outside_output_and_main() {
    let mut violations = Vec::new();

    for dir in ["domain", "application", "infra"] {
        for file in collect_rs_files(&src_dir().join(dir)) {
            let rel = relative(&file);
            let Ok(content) = std::fs::read_to_string(&file) else {
                continue;
            };

            let mut tracker = CfgTestTracker::new();
            for (i, line) in content.lines().enumerate() {
                let in_test = tracker.process_line(line);
                let trimmed = line.trim();
                if in_test || trimmed.starts_with("//") {
                    continue;
                }
                if line.contains("println!") || line.contains("eprintln!") {
                    violations.push(format!(
                        "{rel}:{}: print macro outside #[cfg(test)]: {line}",
                        i + 1
                    ));
                }
            }
        }
    }

    assert!(
        violations.is_empty(),
        "Only output/ and main.rs may print; use tracing or the reporter:\n{}",
        violations.join("\n")
    );
}

#[test]
fn command_handlers_accept_app_context() {
    let mut violations = Vec::new();

    for file in collect_rs_files(&src_dir().join("commands")) {
        let Ok(content) = std::fs::read_to_string(&file) else {
            continue;
        };
        for line in content.lines() {
            let trimmed = line.trim_start();
            if (trimmed.starts_with("pub async fn run(") || trimmed.starts_with("pub fn run("))
                && !trimmed.contains("app: &AppContext")
            {
                violations.push(format!("{}: {trimmed}", relative(&file)));
            }
        }
    }

    assert!(
        violations.is_empty(),
        "Command handlers must take `app: &AppContext` first:\n{}",
        violations.join("\n")
    );
}
