//! Template scaffolding for ntmux.

use anyhow::{Context, Result};
use colored::Colorize;
use ntmux_core::{
    Format, Template,
    template::{custom_template_dir, load_custom_template, write_template},
};

/// Create `ntmux.<format>` in the current directory.
///
/// The user's custom template (`~/.config/ntmux/template.*`) is used when
/// present, otherwise the built-in starter named after the current directory.
pub fn new_template(format: Format) -> Result<()> {
    let current_dir = std::env::current_dir()
        .context("Error getting current working directory")?;
    let file_name = format!("ntmux.{}", format.extension());
    let output = current_dir.join(&file_name);

    let template = custom_template_dir()
        .and_then(|dir| load_custom_template(&dir))
        .unwrap_or_else(|| {
            // Default name from directory
            let name = current_dir
                .file_name()
                .map(|n| n.to_string_lossy().to_string())
                .unwrap_or_else(|| "workspace".to_string());
            Template::starter(&name)
        });

    write_template(&template, &output, format).context("Error writing template")?;
    println!("{} {} {}", "✔".green(), "Created".dimmed(), file_name);

    Ok(())
}
