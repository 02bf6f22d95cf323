//! New-project command: scaffold a document project from a template.

use crate::prompt::Prompter;
use adpress_core::scaffold::{self, TEMPLATE_SET};
use anyhow::{bail, Context, Result};
use std::env;

/// Scaffold a new project under the current directory.
pub fn new_project(
    prompter: &mut dyn Prompter,
    template: Option<&str>,
    name: Option<&str>,
    list: bool,
    open_entry: bool,
) -> Result<()> {
    if list {
        for template in TEMPLATE_SET {
            println!("{:<10} {}", template.id, template.description);
        }
        return Ok(());
    }

    let template_id = match template {
        Some(id) => id.to_string(),
        None => match choose_template(prompter)? {
            Some(id) => id,
            None => bail!("aborted: no template selected"),
        },
    };

    let project_name = match name {
        Some(name) => name.to_string(),
        None => match prompter.input("Project name")? {
            Some(name) => name,
            None => bail!("aborted: no project name given"),
        },
    };

    let cwd = env::current_dir().context("Failed to determine current directory")?;
    let entry = scaffold::create_project(&cwd, &template_id, &project_name)
        .with_context(|| format!("Failed to scaffold '{}'", project_name))?;

    println!("✓ Created {} from the {} template", project_name, template_id);
    println!("  Entry document: {}", entry.display());
    println!();
    println!("Next steps:");
    println!("  cd {}", project_name);
    println!("  adpress build");

    if open_entry {
        if let Err(e) = open::that(&entry) {
            tracing::warn!("Failed to open {}: {}", entry.display(), e);
        }
    }

    Ok(())
}

fn choose_template(prompter: &mut dyn Prompter) -> Result<Option<String>> {
    let items: Vec<String> = TEMPLATE_SET
        .iter()
        .map(|t| format!("{}: {}", t.name, t.description))
        .collect();

    match prompter.choose("Choose a template:", &items)? {
        Some(index) => Ok(TEMPLATE_SET.get(index).map(|t| t.id.to_string())),
        None => Ok(None),
    }
}
