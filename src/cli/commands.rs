use crate::cli::repl::Repl;
use crate::config::EditorConfig;
use crate::editor::{ErrorState, ImportOutcome, SpreadsheetEditor};
use crate::error::{EditorError, EditorResult};
use crate::render::render;
use crate::types::CellRef;
use colored::Colorize;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Parse a `CELL=VALUE` assignment. The value may itself contain `=`.
pub fn parse_assignment(input: &str) -> EditorResult<(CellRef, String)> {
    let (cell, value) = input
        .split_once('=')
        .ok_or_else(|| EditorError::InvalidCell(format!("expected CELL=VALUE, got '{}'", input)))?;
    Ok((cell.parse()?, value.to_string()))
}

/// Import `file`, turning a failed outcome into an error
pub(crate) fn load(editor: &mut SpreadsheetEditor, file: &Path) -> EditorResult<()> {
    match editor.import_path(file) {
        ImportOutcome::Loaded { rows, cols } => {
            debug!(rows, cols, "loaded {}", file.display());
            Ok(())
        }
        ImportOutcome::Failed(ErrorState::FileRead) => Err(EditorError::FileRead(format!(
            "{}: {}",
            file.display(),
            ErrorState::FileRead
        ))),
        ImportOutcome::Failed(state) => Err(EditorError::Parse(format!(
            "{}: {}",
            file.display(),
            state
        ))),
        ImportOutcome::Stale | ImportOutcome::Skipped => Ok(()),
    }
}

/// Execute the show command
pub fn show(file: PathBuf, json: bool, config: EditorConfig, color: bool) -> EditorResult<()> {
    let mut editor = SpreadsheetEditor::new(config);
    load(&mut editor, &file)?;

    if json {
        println!("{}", serde_json::to_string_pretty(editor.grid())?);
    } else {
        print!("{}", render(&editor.view(), color));
    }
    Ok(())
}

/// Execute the edit command
pub fn edit(
    file: PathBuf,
    assignments: Vec<String>,
    output: Option<PathBuf>,
    out_dir: Option<PathBuf>,
    config: EditorConfig,
    verbose: bool,
) -> EditorResult<()> {
    println!("{}", "📝 gridedit - Editing cells".bold().green());
    println!("   File: {}", file.display());

    // Parse every assignment before touching the file
    let edits = assignments
        .iter()
        .map(|a| parse_assignment(a))
        .collect::<EditorResult<Vec<_>>>()?;

    let mut editor = SpreadsheetEditor::new(config);
    load(&mut editor, &file)?;

    if verbose {
        println!(
            "   Loaded {} rows x {} columns",
            editor.grid().row_count(),
            editor.grid().width()
        );
    }

    for (cell, value) in &edits {
        let previous = editor.grid().get(*cell).unwrap_or_default().to_string();
        editor.edit_cell(*cell, value.clone())?;
        if verbose {
            println!("   {} {:?} → {:?}", cell.to_string().cyan(), previous, value);
        }
    }

    let saved = match output {
        Some(path) => editor.export_as(&path)?,
        None => editor.export_to_dir(out_dir.as_deref().unwrap_or_else(|| Path::new(".")))?,
    };

    println!(
        "{} {} cell(s) updated",
        "✅".green(),
        edits.len().to_string().bold()
    );
    println!("   Saved: {}", saved.display());
    Ok(())
}

/// Execute the repl command
pub fn repl(file: Option<PathBuf>, config: EditorConfig, color: bool) -> EditorResult<()> {
    let repl = Repl::new(config, color)?;
    let stdout = std::io::stdout();
    let mut output = stdout.lock();

    if let Some(path) = file {
        repl.preload(&path, &mut output)?;
    }
    repl.run(std::io::stdin().lock(), &mut output)
}
