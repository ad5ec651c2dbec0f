//! Output formatting for CLI display.

use std::env;
use std::io::{self, IsTerminal};

use crate::highlight::{self, gutter_width};
use crate::model::{AddonFile, Project};
use crate::workflow::{DeliveryReceipt, PackageReceipt};

/// Whether to emit ANSI colour on stdout.
pub(super) fn use_color(plain: bool) -> bool {
    !plain && env::var_os("NO_COLOR").is_none() && io::stdout().is_terminal()
}

/// A file's contents with a line-number gutter, highlighted when `color` is set.
pub(super) fn format_file(file: &AddonFile, color: bool) -> String {
    let lines = highlight::highlight_file(file);
    let width = gutter_width(&lines);
    lines
        .iter()
        .map(|line| {
            if color {
                line.to_ansi(width)
            } else {
                line.to_plain(width)
            }
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// One line per file: name and what it is.
pub(super) fn format_file_list(files: &[AddonFile]) -> String {
    let width = files.iter().map(|f| f.filename.len()).max().unwrap_or(0);
    files
        .iter()
        .map(|f| format!("  {:<width$}  {}", f.filename, f.label()))
        .collect::<Vec<_>>()
        .join("\n")
}

/// A project as one listing row.
pub(super) fn format_project_row(project: &Project) -> String {
    let files = match project.files.len() {
        1 => "1 file".to_string(),
        n => format!("{n} files"),
    };
    format!(
        "{}  {}  [{}]  iteration {}  {files}  {}",
        project.short_id(),
        project.name,
        project.addon_type.label(),
        project.iteration_count,
        project.created_at.strftime("%Y-%m-%d"),
    )
}

pub(super) fn format_delivery(receipt: &DeliveryReceipt) -> String {
    let mut lines = vec![receipt.message.clone()];
    if !receipt.repository_url.is_empty() {
        lines.push(format!("Repository: {}", receipt.repository_url));
    }
    if !receipt.gist_url.is_empty() {
        lines.push(format!("Gist: {}", receipt.gist_url));
    }
    lines.join("\n")
}

pub(super) fn format_package(receipt: &PackageReceipt) -> String {
    let mut lines = vec![
        receipt.message.clone(),
        format!("Package: {}", receipt.package_name),
        format!("Install to: {}", receipt.installation_path),
    ];
    if !receipt.download_url.is_empty() {
        lines.push(format!("Download: {}", receipt.download_url));
    }
    lines.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::AddonType;

    #[test]
    fn plain_file_has_gutter_and_exact_text() {
        let file = AddonFile::new("Core.lua", "local x = 1\n\nprint(x)");

        assert_eq!(
            format_file(&file, false),
            "  1 │ local x = 1\n  2 │ \n  3 │ print(x)"
        );
    }

    #[test]
    fn file_list_aligns_labels() {
        let mut toc = AddonFile::new("X.toc", "");
        toc.description = Some("metadata".into());
        let files = [toc, AddonFile::new("Core.lua", "")];

        assert_eq!(
            format_file_list(&files),
            "  X.toc     metadata\n  Core.lua  lua"
        );
    }

    #[test]
    fn project_row_summarizes() {
        let project = Project::new("X", AddonType::Combat, vec![AddonFile::new("X.toc", "")]);

        let row = format_project_row(&project);

        assert!(row.starts_with(project.short_id()));
        assert!(row.contains("X  [Combat]  iteration 1  1 file  "));
    }

    #[test]
    fn package_omits_empty_download() {
        let receipt = PackageReceipt {
            package_name: "X.zip".into(),
            installation_path: "AddOns/".into(),
            message: "ok".into(),
            download_url: String::new(),
        };

        assert_eq!(format_package(&receipt), "ok\nPackage: X.zip\nInstall to: AddOns/");
    }
}
