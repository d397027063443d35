//! Text rendering for listings, trees and node details.

use crate::error::FsError;
use crate::filesystem::Filesystem;
use crate::types::NodeId;
use comfy_table::presets::UTF8_BORDERS_ONLY;
use comfy_table::Table;
use owo_colors::OwoColorize;

/// Name of a node, colored when it is a directory and color is enabled.
pub fn paint_name(name: &str, is_directory: bool, color: bool) -> String {
    if is_directory && color {
        format!("{}", name.blue().bold())
    } else {
        name.to_string()
    }
}

/// Short listing: names separated by two spaces.
pub fn format_listing(fs: &Filesystem, entries: &[NodeId], color: bool) -> Result<String, FsError> {
    let mut names = Vec::with_capacity(entries.len());
    for &id in entries {
        let node = fs.node(id)?;
        names.push(paint_name(&node.full_name(), node.is_directory(), color));
    }
    Ok(names.join("  "))
}

/// Long listing as a table: kind, size, modification time, name.
pub fn format_long_listing(
    fs: &Filesystem,
    entries: &[NodeId],
    color: bool,
) -> Result<String, FsError> {
    let mut table = Table::new();
    table.load_preset(UTF8_BORDERS_ONLY);
    table.set_header(vec!["Type", "Size", "Modified", "Name"]);
    for &id in entries {
        let node = fs.node(id)?;
        let kind = if node.is_directory() { "d" } else { "-" };
        table.add_row(vec![
            kind.to_string(),
            node.metadata().size.to_string(),
            node.metadata().modified.format("%Y-%m-%d %H:%M").to_string(),
            paint_name(&node.full_name(), node.is_directory(), color),
        ]);
    }
    Ok(table.to_string())
}

/// Indented tree rooted at `id`.
pub fn format_tree(fs: &Filesystem, id: NodeId, color: bool) -> Result<String, FsError> {
    let node = fs.node(id)?;
    let mut out = paint_name(&node.full_name(), node.is_directory(), color);
    let mut counts = (0usize, 0usize);
    if node.is_directory() {
        write_branch(fs, id, "", color, &mut out, &mut counts)?;
    }
    out.push_str(&format!(
        "\n\n{}, {}",
        count_noun(counts.0, "directory", "directories"),
        count_noun(counts.1, "file", "files")
    ));
    Ok(out)
}

fn count_noun(count: usize, singular: &str, plural: &str) -> String {
    format!("{} {}", count, if count == 1 { singular } else { plural })
}

fn write_branch(
    fs: &Filesystem,
    dir: NodeId,
    prefix: &str,
    color: bool,
    out: &mut String,
    counts: &mut (usize, usize),
) -> Result<(), FsError> {
    let children = fs.children(dir)?;
    let last_index = children.len().saturating_sub(1);
    for (index, child) in children.into_iter().enumerate() {
        let node = fs.node(child)?;
        let (branch, indent) = if index == last_index {
            ("└── ", "    ")
        } else {
            ("├── ", "│   ")
        };
        out.push('\n');
        out.push_str(prefix);
        out.push_str(branch);
        out.push_str(&paint_name(&node.full_name(), node.is_directory(), color));
        if node.is_directory() {
            counts.0 += 1;
            write_branch(fs, child, &format!("{}{}", prefix, indent), color, out, counts)?;
        } else {
            counts.1 += 1;
        }
    }
    Ok(())
}
