//! Interactive editing session
//!
//! Reads one command per line. Cell activation, typing and committing map
//! onto the editor's edit cursor the same way a click, keystrokes and
//! Enter/blur would.

use crate::config::EditorConfig;
use crate::editor::{EditorSession, ImportOutcome, SpreadsheetEditor};
use crate::error::{EditorError, EditorResult};
use crate::render::render;
use crate::types::CellRef;
use std::io::{BufRead, Write};
use std::path::{Path, PathBuf};
use tokio::runtime::{Builder, Runtime};

const HELP: &str = "\
Commands:
  load <path>         Load a spreadsheet (first sheet)
  edit <cell>         Open a cell for editing (A1 or row,col)
  type <text>         Replace the text of the open cell
  commit              Write the open cell (Enter / blur)
  cancel              Close the open cell without writing
  set <cell> <text>   Write a cell directly
  show                Print the grid
  save [path]         Save as .xlsx (default: loaded file name)
  clear               Discard the grid
  status              Show file, size and edit state
  help                Show this help
  quit                Leave";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReplCommand {
    Load(PathBuf),
    Edit(CellRef),
    Type(String),
    Commit,
    Cancel,
    Set(CellRef, String),
    Show,
    Save(Option<PathBuf>),
    Clear,
    Status,
    Help,
    Quit,
}

impl ReplCommand {
    /// Parse one input line. Blank lines yield `None`.
    pub fn parse(line: &str) -> EditorResult<Option<Self>> {
        let line = line.trim_start();
        if line.trim().is_empty() {
            return Ok(None);
        }
        let (word, rest) = match line.split_once(char::is_whitespace) {
            Some((word, rest)) => (word, rest),
            None => (line, ""),
        };
        let arg = rest.trim();

        let command = match word.to_lowercase().as_str() {
            "load" | "open" => {
                if arg.is_empty() {
                    return Err(EditorError::UnknownCommand("load needs a path".to_string()));
                }
                ReplCommand::Load(PathBuf::from(arg))
            }
            "edit" => ReplCommand::Edit(arg.parse()?),
            // Text after the first separator is kept verbatim
            "type" => ReplCommand::Type(rest.to_string()),
            "commit" | "enter" | "blur" => ReplCommand::Commit,
            "cancel" | "esc" => ReplCommand::Cancel,
            "set" => {
                let (cell, value) = match arg.split_once(char::is_whitespace) {
                    Some((cell, value)) => (cell, value.trim_start()),
                    None => (arg, ""),
                };
                ReplCommand::Set(cell.parse()?, value.to_string())
            }
            "show" => ReplCommand::Show,
            "save" => ReplCommand::Save((!arg.is_empty()).then(|| PathBuf::from(arg))),
            "clear" => ReplCommand::Clear,
            "status" => ReplCommand::Status,
            "help" | "?" => ReplCommand::Help,
            "quit" | "exit" => ReplCommand::Quit,
            other => return Err(EditorError::UnknownCommand(other.to_string())),
        };
        Ok(Some(command))
    }
}

pub struct Repl {
    session: EditorSession,
    runtime: Runtime,
    color: bool,
    save_dir: PathBuf,
}

impl Repl {
    pub fn new(config: EditorConfig, color: bool) -> EditorResult<Self> {
        let runtime = Builder::new_current_thread().enable_all().build()?;
        Ok(Self {
            session: EditorSession::new(SpreadsheetEditor::new(config)),
            runtime,
            color,
            save_dir: PathBuf::from("."),
        })
    }

    /// Directory used by `save` without a path
    pub fn with_save_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.save_dir = dir.into();
        self
    }

    pub fn session(&self) -> &EditorSession {
        &self.session
    }

    /// Load `path` before reading commands
    pub fn preload<W: Write>(&self, path: &Path, output: &mut W) -> EditorResult<()> {
        self.runtime
            .block_on(self.execute(ReplCommand::Load(path.to_path_buf()), output))
    }

    pub fn run<R: BufRead, W: Write>(&self, input: R, output: &mut W) -> EditorResult<()> {
        writeln!(output, "gridedit - type 'help' for commands")?;

        for line in input.lines() {
            let line = line?;
            let command = match ReplCommand::parse(&line) {
                Ok(Some(command)) => command,
                Ok(None) => continue,
                Err(e) => {
                    writeln!(output, "error: {}", e)?;
                    continue;
                }
            };
            if command == ReplCommand::Quit {
                break;
            }
            if let Err(e) = self.runtime.block_on(self.execute(command, output)) {
                writeln!(output, "error: {}", e)?;
            }
        }
        Ok(())
    }

    async fn execute<W: Write>(&self, command: ReplCommand, output: &mut W) -> EditorResult<()> {
        match command {
            ReplCommand::Load(path) => {
                if !self.session.lock().await.controls().upload_enabled {
                    writeln!(output, "busy: an import is in progress")?;
                    return Ok(());
                }
                match self.session.import_path(&path).await {
                    ImportOutcome::Loaded { rows, cols } => {
                        writeln!(output, "loaded {} rows x {} columns", rows, cols)?;
                    }
                    ImportOutcome::Failed(_) | ImportOutcome::Stale | ImportOutcome::Skipped => {}
                }
                self.show(output).await?;
            }
            ReplCommand::Edit(cell) => {
                self.session.lock().await.begin_edit(cell)?;
                self.show(output).await?;
            }
            ReplCommand::Type(text) => {
                self.session.lock().await.set_draft(text)?;
            }
            ReplCommand::Commit => {
                if let Some(cell) = self.session.lock().await.commit_edit()? {
                    writeln!(output, "{} updated", cell)?;
                }
                self.show(output).await?;
            }
            ReplCommand::Cancel => {
                self.session.lock().await.cancel_edit();
                self.show(output).await?;
            }
            ReplCommand::Set(cell, value) => {
                self.session.lock().await.edit_cell(cell, value)?;
                writeln!(output, "{} updated", cell)?;
            }
            ReplCommand::Show => self.show(output).await?,
            ReplCommand::Save(path) => {
                let mut editor = self.session.lock().await;
                let saved = match path {
                    Some(path) => editor.export_as(&path)?,
                    None => editor.export_to_dir(&self.save_dir)?,
                };
                writeln!(output, "saved {}", saved.display())?;
            }
            ReplCommand::Clear => {
                let mut editor = self.session.lock().await;
                if editor.is_loading() {
                    writeln!(output, "busy: an import is in progress")?;
                } else {
                    editor.clear();
                    writeln!(output, "cleared")?;
                }
            }
            ReplCommand::Status => {
                let editor = self.session.lock().await;
                let file = match editor.file_name() {
                    "" => "(none)",
                    name => name,
                };
                writeln!(output, "file: {}", file)?;
                writeln!(
                    output,
                    "size: {} rows x {} columns",
                    editor.grid().row_count(),
                    editor.grid().width()
                )?;
                match editor.edit_cursor() {
                    Some(cursor) => writeln!(output, "editing: {} = {:?}", cursor.cell, cursor.draft)?,
                    None => writeln!(output, "editing: -")?,
                }
                writeln!(output, "save as: {}", editor.download_name())?;
            }
            ReplCommand::Help => writeln!(output, "{}", HELP)?,
            ReplCommand::Quit => {}
        }
        Ok(())
    }

    async fn show<W: Write>(&self, output: &mut W) -> EditorResult<()> {
        let editor = self.session.lock().await;
        write!(output, "{}", render(&editor.view(), self.color))?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::excel::ExcelImporter;
    use crate::types::RaggedPolicy;
    use pretty_assertions::assert_eq;
    use rust_xlsxwriter::Workbook;
    use std::io::Cursor;
    use tempfile::TempDir;

    fn write_book(dir: &Path) -> PathBuf {
        let path = dir.join("stock.xlsx");
        let mut workbook = Workbook::new();
        let sheet = workbook.add_worksheet();
        sheet.write_string(0, 0, "Item").unwrap();
        sheet.write_string(0, 1, "Count").unwrap();
        sheet.write_string(1, 0, "bolts").unwrap();
        sheet.write_string(1, 1, "10").unwrap();
        sheet.write_string(2, 0, "nuts").unwrap();
        sheet.write_string(2, 1, "20").unwrap();
        workbook.save(&path).unwrap();
        path
    }

    fn run_script(repl: &Repl, script: &str) -> String {
        let mut output = Vec::new();
        repl.run(Cursor::new(script.to_string()), &mut output).unwrap();
        String::from_utf8(output).unwrap()
    }

    #[test]
    fn test_parse_commands() {
        assert_eq!(ReplCommand::parse("").unwrap(), None);
        assert_eq!(ReplCommand::parse("   ").unwrap(), None);
        assert_eq!(
            ReplCommand::parse("load data/book.xlsx").unwrap(),
            Some(ReplCommand::Load(PathBuf::from("data/book.xlsx")))
        );
        assert_eq!(
            ReplCommand::parse("edit B3").unwrap(),
            Some(ReplCommand::Edit(CellRef::new(2, 1)))
        );
        assert_eq!(
            ReplCommand::parse("type  two spaces").unwrap(),
            Some(ReplCommand::Type(" two spaces".to_string()))
        );
        assert_eq!(
            ReplCommand::parse("type").unwrap(),
            Some(ReplCommand::Type(String::new()))
        );
        assert_eq!(
            ReplCommand::parse("set 1,0 hello world").unwrap(),
            Some(ReplCommand::Set(CellRef::new(1, 0), "hello world".to_string()))
        );
        assert_eq!(ReplCommand::parse("ENTER").unwrap(), Some(ReplCommand::Commit));
        assert_eq!(ReplCommand::parse("save").unwrap(), Some(ReplCommand::Save(None)));
        assert_eq!(ReplCommand::parse("exit").unwrap(), Some(ReplCommand::Quit));
    }

    #[test]
    fn test_parse_errors() {
        assert!(matches!(
            ReplCommand::parse("frobnicate"),
            Err(EditorError::UnknownCommand(_))
        ));
        assert!(ReplCommand::parse("load").is_err());
        assert!(ReplCommand::parse("edit nowhere").is_err());
    }

    #[test]
    fn test_session_edit_and_save() {
        let temp_dir = TempDir::new().unwrap();
        let input = write_book(temp_dir.path());
        let repl = Repl::new(EditorConfig::default(), false)
            .unwrap()
            .with_save_dir(temp_dir.path().join("out"));
        std::fs::create_dir(temp_dir.path().join("out")).unwrap();

        let script = format!(
            "load {}\nedit B2\ntype 11\nedit B3\ntype 22\ncommit\nsave\nquit\nset B2 ignored\n",
            input.display()
        );
        let output = run_script(&repl, &script);

        assert!(output.contains("loaded 3 rows x 2 columns"), "{}", output);
        assert!(output.contains("B3 updated"), "{}", output);
        assert!(output.contains("saved"), "{}", output);

        let saved = temp_dir.path().join("out").join("stock.xlsx");
        let grid = ExcelImporter::new(RaggedPolicy::Pad)
            .parse(&std::fs::read(&saved).unwrap())
            .unwrap();
        assert_eq!(grid.get(CellRef::new(1, 1)), Some("11"));
        assert_eq!(grid.get(CellRef::new(2, 1)), Some("22"));
    }

    #[test]
    fn test_errors_do_not_end_session() {
        let repl = Repl::new(EditorConfig::default(), false).unwrap();
        let output = run_script(&repl, "bogus\ntype x\nload /nonexistent/file.xlsx\nstatus\n");

        assert!(output.contains("error: Unknown command: bogus"), "{}", output);
        assert!(output.contains("error: No cell is being edited"), "{}", output);
        assert!(output.contains("An error occurred while reading the file."), "{}", output);
        assert!(output.contains("file: file.xlsx"), "{}", output);
    }

    #[test]
    fn test_clear_and_status() {
        let temp_dir = TempDir::new().unwrap();
        let input = write_book(temp_dir.path());
        let repl = Repl::new(EditorConfig::default(), false).unwrap();
        repl.preload(&input, &mut Vec::new()).unwrap();

        let output = run_script(&repl, "clear\nstatus\n");
        assert!(output.contains("cleared"));
        assert!(output.contains("file: (none)"));
        assert!(output.contains("size: 0 rows x 0 columns"));
        assert!(output.contains("save as: updated_excel_file.xlsx"));
    }

    #[test]
    fn test_cancel_keeps_original_value() {
        let temp_dir = TempDir::new().unwrap();
        let input = write_book(temp_dir.path());
        let repl = Repl::new(EditorConfig::default(), false).unwrap();
        repl.preload(&input, &mut Vec::new()).unwrap();

        run_script(&repl, "edit A2\ntype screws\ncancel\n");

        let editor = repl.runtime.block_on(repl.session().lock());
        assert_eq!(editor.grid().get(CellRef::new(1, 0)), Some("bolts"));
        assert!(editor.edit_cursor().is_none());
    }
}
