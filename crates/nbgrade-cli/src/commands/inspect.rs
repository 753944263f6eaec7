//! The `nbgrade inspect` command.

use std::path::PathBuf;

use anyhow::Result;
use comfy_table::{Cell, Table};

use nbgrade_core::metadata::load_document;
use nbgrade_core::TestFile;

use crate::config::load_config_from;

pub fn execute(
    notebook: PathBuf,
    question: Option<String>,
    config_path: Option<PathBuf>,
) -> Result<()> {
    let config = load_config_from(config_path.as_deref())?;
    let ctx = config.spec_context()?;
    let document = load_document(&notebook)?;

    if let Some(question) = question {
        let file = ctx.test_file(&document, &notebook, &question, None)?;
        print_cases(&file);
        return Ok(());
    }

    let questions = ctx.extractor.questions(&document, &notebook)?;
    println!("Notebook: {} ({} tests)", notebook.display(), questions.len());

    let mut table = Table::new();
    table.set_header(vec!["Question", "Format", "Points", "Policy", "Cases", "Hidden"]);

    let mut malformed = 0usize;
    for name in questions {
        match ctx.test_file(&document, &notebook, name, None) {
            Ok(file) => {
                let hidden = file.test_cases().iter().filter(|c| c.is_hidden()).count();
                table.add_row(vec![
                    Cell::new(name),
                    Cell::new(file.format()),
                    Cell::new(file.value()),
                    Cell::new(policy_label(&file)),
                    Cell::new(file.test_cases().len()),
                    Cell::new(hidden),
                ]);
            }
            Err(e) => {
                malformed += 1;
                eprintln!("  [{name}] ERROR: {e}");
            }
        }
    }
    println!("{table}");

    anyhow::ensure!(malformed == 0, "{malformed} malformed test spec(s)");
    println!("All test specs valid.");
    Ok(())
}

fn print_cases(file: &TestFile) {
    println!(
        "Test {} ({}, {} point(s), {}): {} cases",
        file.name(),
        file.format(),
        file.value(),
        policy_label(file),
        file.test_cases().len()
    );

    let mut table = Table::new();
    table.set_header(vec!["#", "Case", "Hidden", "Body"]);
    for (i, case) in file.test_cases().iter().enumerate() {
        table.add_row(vec![
            Cell::new(i + 1),
            Cell::new(case.name()),
            Cell::new(if case.is_hidden() { "yes" } else { "no" }),
            Cell::new(format!("{} bytes", case.body().as_bytes().len())),
        ]);
    }
    println!("{table}");
}

fn policy_label(file: &TestFile) -> &'static str {
    if file.all_or_nothing() {
        "all-or-nothing"
    } else {
        "partial credit"
    }
}
