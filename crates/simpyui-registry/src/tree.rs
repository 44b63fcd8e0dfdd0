//! Dependency tree display.
//!
//! Formats a resolution result as an ASCII tree for `diff`:
//! ```text
//! dynamic-island
//! ├── animated-button
//! │   └── ripple
//! └── ripple (already listed)
//! ```

use crate::resolution::{ResolutionResult, ResolvedComponent};

/// Format a resolution tree as a human-readable string.
pub fn format_tree(resolution: &ResolutionResult) -> String {
    let mut out = String::new();

    for root in &resolution.tree {
        out.push_str(&root.slug);
        if root.shared {
            out.push_str(" (already listed)");
        }
        out.push('\n');

        let count = root.internal.len();
        for (i, dep) in root.internal.iter().enumerate() {
            format_dep(&mut out, dep, "", i == count - 1);
        }
    }

    out.push_str(&format!(
        "\n{} requested, {} to install\n",
        resolution.tree.len(),
        resolution.order.len()
    ));

    out
}

fn format_dep(out: &mut String, dep: &ResolvedComponent, prefix: &str, is_last: bool) {
    let connector = if is_last { "└── " } else { "├── " };
    let shared_marker = if dep.shared { " (already listed)" } else { "" };

    out.push_str(&format!("{prefix}{connector}{}{shared_marker}\n", dep.slug));

    let child_prefix = if is_last {
        format!("{prefix}    ")
    } else {
        format!("{prefix}│   ")
    };

    let child_count = dep.internal.len();
    for (i, child) in dep.internal.iter().enumerate() {
        format_dep(out, child, &child_prefix, i == child_count - 1);
    }
}

/// Format the flat install order, one slug per line.
pub fn format_order(resolution: &ResolutionResult) -> String {
    resolution
        .order
        .iter()
        .enumerate()
        .map(|(i, slug)| format!("{:>3}. {slug}\n", i + 1))
        .collect()
}
