//! Output formatting functionality
//!
//! Text and JSON renderings of a dependency build.

use crate::error::Result;
use crate::models::{Dependencies, DependencyInfo, Package, PackageSet};
use ansi_term::Colour::{Blue, Cyan, Yellow};
use ansi_term::Style;

/// Format one package, its line count and the packages it imports
pub fn format_package_text(
    pkg: &Package,
    imports: &PackageSet,
    info: Option<&DependencyInfo>,
    use_colors: bool,
) -> String {
    let mut output = String::new();
    let lines = info.map_or(0, |info| info.lines_of_code);
    let lines_label = format!("({} lines)", format_count(lines));

    if use_colors {
        output.push_str(&format!(
            "{} {}\n",
            Blue.bold().paint(pkg.as_str()),
            Style::new().dimmed().paint(lines_label)
        ));
    } else {
        output.push_str(&format!("{} {}\n", pkg, lines_label));
    }

    for import in imports {
        output.push_str(&format!("  -> {}\n", import));
    }

    output
}

/// Format the ignored package list, or nothing when it is empty
pub fn format_ignored_text(deps: &Dependencies, use_colors: bool) -> String {
    if deps.ignored.is_empty() {
        return String::new();
    }

    let mut output = String::new();
    if use_colors {
        output.push_str(&format!("{}\n", Yellow.bold().paint("Ignored packages:")));
    } else {
        output.push_str("Ignored packages:\n");
    }
    for pkg in &deps.ignored {
        output.push_str(&format!("  {}\n", pkg));
    }
    output
}

/// Format summary statistics; verbose mode lists cycle members
pub fn format_summary_text(deps: &Dependencies, use_colors: bool, verbose: bool) -> String {
    let mut output = String::new();
    let cycles = deps.forward.cycles();

    if use_colors {
        output.push_str(&format!("{}\n", Cyan.bold().paint("Summary:")));
    } else {
        output.push_str("Summary:\n");
    }
    output.push_str(&format!("  Packages: {}\n", deps.node_count()));
    output.push_str(&format!("  Imports: {}\n", deps.forward.edge_count()));
    output.push_str(&format!("  Ignored: {}\n", deps.ignored.len()));
    output.push_str(&format!(
        "  Lines of code: {}\n",
        format_count(deps.total_lines_of_code())
    ));
    output.push_str(&format!("  Import cycles: {}\n", cycles.len()));

    if verbose {
        for (index, cycle) in cycles.iter().enumerate() {
            let members: Vec<&str> = cycle.iter().map(Package::as_str).collect();
            output.push_str(&format!("    {}. {}\n", index + 1, members.join(", ")));
        }
    }

    output
}

/// One-line summary for quiet mode
pub fn format_quiet_text(deps: &Dependencies) -> String {
    format!(
        "{} packages, {} imports, {} ignored, {} lines\n",
        deps.node_count(),
        deps.forward.edge_count(),
        deps.ignored.len(),
        format_count(deps.total_lines_of_code())
    )
}

/// Serialize the whole build result as JSON
pub fn format_dependencies_json(deps: &Dependencies, pretty: bool) -> Result<String> {
    let mut json = if pretty {
        serde_json::to_string_pretty(deps)?
    } else {
        serde_json::to_string(deps)?
    };
    json.push('\n');
    Ok(json)
}

/// Group digits in thousands: 1234567 -> "1,234,567"
pub fn format_count(count: usize) -> String {
    let digits = count.to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (index, digit) in digits.chars().enumerate() {
        if index > 0 && (digits.len() - index) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(digit);
    }
    grouped
}
