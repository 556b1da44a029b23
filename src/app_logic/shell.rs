/*
 * A line-oriented interactive front end over `DataGeneratorLogic`. It plays
 * the role of the main window: every command maps to one user action (load a
 * list, add items, mark and remove, generate). Errors are printed and the
 * shell goes back to the prompt, so no failure ends the session.
 *
 * Input and output are generic so the tests can drive the shell with
 * in-memory buffers.
 */
use super::handler::DataGeneratorLogic;
use crate::core::BatchReport;
use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};

const PROMPT: &str = "data-generator> ";

const HELP_TEXT: &str = "\
Commands:
  load PATH                 load a data item list (NAME:SIZE per line)
  list                      show all data items of the loaded list
  add NAME...               add data items to the selection
  add-all                   add every data item to the selection
  mark NAME...              mark selected items for removal
  unmark                    clear the removal marks
  remove                    remove marked items, or the last added one
  clear                     empty the selection
  show                      show the current selection
  generate [DIR]            create the selected files (default: last directory)
  save-config PATH          write the loaded list to a file
  save-selection NAME       store the current selection under NAME
  restore-selection NAME    replace the selection with a stored one
  selections                list stored selections
  help                      show this text
  quit                      leave the shell";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ShellCommand {
    Load(PathBuf),
    List,
    Add(Vec<String>),
    AddAll,
    Mark(Vec<String>),
    Unmark,
    Remove,
    Clear,
    Show,
    Generate(Option<PathBuf>),
    SaveConfig(PathBuf),
    SaveSelection(String),
    RestoreSelection(String),
    Selections,
    Help,
    Quit,
}

/*
 * Parses one input line. Returns `Ok(None)` for blank lines and an error
 * message for unknown commands or missing arguments. Path and profile
 * arguments take the rest of the line, so they may contain spaces.
 */
pub fn parse_command(line: &str) -> Result<Option<ShellCommand>, String> {
    let line = line.trim();
    if line.is_empty() {
        return Ok(None);
    }
    let (verb, rest) = match line.split_once(char::is_whitespace) {
        Some((verb, rest)) => (verb, rest.trim()),
        None => (line, ""),
    };
    let names = || -> Vec<String> { rest.split_whitespace().map(str::to_string).collect() };
    let required = |what: &str| -> Result<String, String> {
        if rest.is_empty() {
            Err(format!("'{verb}' needs {what}"))
        } else {
            Ok(rest.to_string())
        }
    };

    let command = match verb {
        "load" => ShellCommand::Load(PathBuf::from(required("a file path")?)),
        "list" => ShellCommand::List,
        "add" => {
            required("at least one name")?;
            ShellCommand::Add(names())
        }
        "add-all" => ShellCommand::AddAll,
        "mark" => {
            required("at least one name")?;
            ShellCommand::Mark(names())
        }
        "unmark" => ShellCommand::Unmark,
        "remove" => ShellCommand::Remove,
        "clear" | "cancel" => ShellCommand::Clear,
        "show" => ShellCommand::Show,
        "generate" => ShellCommand::Generate((!rest.is_empty()).then(|| PathBuf::from(rest))),
        "save-config" => ShellCommand::SaveConfig(PathBuf::from(required("a file path")?)),
        "save-selection" => ShellCommand::SaveSelection(required("a name")?),
        "restore-selection" => ShellCommand::RestoreSelection(required("a name")?),
        "selections" => ShellCommand::Selections,
        "help" | "?" => ShellCommand::Help,
        "quit" | "exit" => ShellCommand::Quit,
        other => return Err(format!("Unknown command '{other}'. Type 'help' for a list.")),
    };
    Ok(Some(command))
}

pub fn print_report<W: Write>(out: &mut W, report: &BatchReport) -> io::Result<()> {
    for outcome in &report.outcomes {
        match &outcome.result {
            Ok(path) => writeln!(
                out,
                "  created {} ({} bytes)",
                path.display(),
                outcome.byte_len
            )?,
            Err(e) => writeln!(out, "  FAILED {}: {e}", outcome.name)?,
        }
    }
    writeln!(
        out,
        "{} of {} data items generated ({} bytes), {} failed.",
        report.succeeded().count(),
        report.outcomes.len(),
        report.total_bytes(),
        report.failed().count()
    )
}

pub fn print_rejects<W: Write>(out: &mut W, rejects: &[String]) -> io::Result<()> {
    if rejects.is_empty() {
        return Ok(());
    }
    writeln!(out, "Wrong entries in the loaded file:")?;
    for line in rejects {
        writeln!(out, "  {line}")?;
    }
    Ok(())
}

fn print_selection<W: Write>(out: &mut W, logic: &DataGeneratorLogic) -> io::Result<()> {
    let selected = logic.selection().to_ordered_list();
    if selected.is_empty() {
        return writeln!(out, "Selection is empty.");
    }
    let marked = logic.marked_for_removal();
    for name in selected {
        let flag = if marked.contains(&name) { "*" } else { " " };
        writeln!(out, "{flag} {name}")?;
    }
    writeln!(
        out,
        "{} selected, {} marked for removal.",
        logic.selection().len(),
        marked.len()
    )
}

/*
 * Executes one command. Returns `Ok(false)` when the shell should stop.
 * Only failures to write the output are returned as errors.
 */
pub fn execute<W: Write>(
    logic: &mut DataGeneratorLogic,
    command: ShellCommand,
    out: &mut W,
) -> io::Result<bool> {
    match command {
        ShellCommand::Load(path) => match logic.load_catalog(&path) {
            Ok(summary) => {
                writeln!(
                    out,
                    "Loaded {} data items from {}.",
                    summary.item_count,
                    summary.path.display()
                )?;
                print_rejects(out, &summary.rejects)?;
            }
            Err(e) => writeln!(out, "Error: {e}")?,
        },
        ShellCommand::List => {
            match logic.catalog_path() {
                Some(path) if !logic.catalog().is_empty() => {
                    writeln!(out, "Data items from {}:", path.display())?
                }
                _ => writeln!(out, "No data items loaded.")?,
            }
            for item in logic.catalog().iter() {
                writeln!(out, "{} ({} MB)", item.name, item.size_mb)?;
            }
        }
        ShellCommand::Add(names) => {
            for name in names {
                match logic.select(&name) {
                    Ok(true) => {}
                    Ok(false) => writeln!(out, "'{name}' is already selected.")?,
                    Err(e) => writeln!(out, "Error: {e}")?,
                }
            }
        }
        ShellCommand::AddAll => {
            let added = logic.select_all();
            writeln!(out, "Added {added} data items.")?;
        }
        ShellCommand::Mark(names) => {
            for name in names {
                if !logic.mark_for_removal(&name) && !logic.selection().contains(&name) {
                    writeln!(out, "'{name}' is not selected.")?;
                }
            }
        }
        ShellCommand::Unmark => logic.clear_marks(),
        ShellCommand::Remove => {
            let removed = logic.remove();
            if removed.is_empty() {
                writeln!(out, "Nothing to remove.")?;
            } else {
                writeln!(out, "Removed {}.", removed.join(", "))?;
            }
        }
        ShellCommand::Clear => logic.cancel(),
        ShellCommand::Show => print_selection(out, logic)?,
        ShellCommand::Generate(dir) => {
            let target: Option<PathBuf> =
                dir.or_else(|| logic.last_target_dir().map(Path::to_path_buf));
            match target {
                None => writeln!(out, "Error: no target directory given.")?,
                Some(_) if logic.selection().is_empty() => {
                    writeln!(out, "Selection is empty, nothing to generate.")?
                }
                Some(target) => {
                    let report = logic.generate(&target);
                    print_report(out, &report)?;
                }
            }
        }
        ShellCommand::SaveConfig(path) => match logic.save_catalog(&path) {
            Ok(()) => writeln!(out, "Saved data item list to {}.", path.display())?,
            Err(e) => writeln!(out, "Error: {e}")?,
        },
        ShellCommand::SaveSelection(name) => match logic.save_selection(&name) {
            Ok(()) => writeln!(out, "Saved selection '{name}'.")?,
            Err(e) => writeln!(out, "Error: {e}")?,
        },
        ShellCommand::RestoreSelection(name) => match logic.restore_selection(&name) {
            Ok(summary) => {
                writeln!(
                    out,
                    "Restored {} data items from '{name}'.",
                    summary.restored.len()
                )?;
                if !summary.missing.is_empty() {
                    writeln!(
                        out,
                        "Not in the loaded list: {}",
                        summary.missing.join(", ")
                    )?;
                }
            }
            Err(e) => writeln!(out, "Error: {e}")?,
        },
        ShellCommand::Selections => match logic.list_selections() {
            Ok(names) if names.is_empty() => writeln!(out, "No stored selections.")?,
            Ok(names) => {
                for name in names {
                    writeln!(out, "{name}")?;
                }
            }
            Err(e) => writeln!(out, "Error: {e}")?,
        },
        ShellCommand::Help => writeln!(out, "{HELP_TEXT}")?,
        ShellCommand::Quit => return Ok(false),
    }
    Ok(true)
}

/// Reads commands until `quit` or end of input.
pub fn run_shell<R: BufRead, W: Write>(
    logic: &mut DataGeneratorLogic,
    input: R,
    out: &mut W,
) -> io::Result<()> {
    write!(out, "{PROMPT}")?;
    out.flush()?;
    for line in input.lines() {
        let line = line?;
        match parse_command(&line) {
            Ok(Some(command)) => {
                log::trace!("Shell: Executing {command:?}");
                if !execute(logic, command, out)? {
                    return Ok(());
                }
            }
            Ok(None) => {}
            Err(message) => writeln!(out, "{message}")?,
        }
        write!(out, "{PROMPT}")?;
        out.flush()?;
    }
    writeln!(out)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_command_variants() {
        assert_eq!(parse_command("   "), Ok(None));
        assert_eq!(
            parse_command("load my lists/ListDataItem.cnf"),
            Ok(Some(ShellCommand::Load(PathBuf::from(
                "my lists/ListDataItem.cnf"
            ))))
        );
        assert_eq!(
            parse_command("add A  B"),
            Ok(Some(ShellCommand::Add(vec!["A".into(), "B".into()])))
        );
        assert_eq!(
            parse_command("generate"),
            Ok(Some(ShellCommand::Generate(None)))
        );
        assert_eq!(
            parse_command("generate /tmp/out"),
            Ok(Some(ShellCommand::Generate(Some(PathBuf::from("/tmp/out")))))
        );
        assert_eq!(parse_command("exit"), Ok(Some(ShellCommand::Quit)));
    }

    #[test]
    fn test_parse_command_errors() {
        assert!(parse_command("load").is_err());
        assert!(parse_command("add").is_err());
        assert!(parse_command("frobnicate").is_err());
    }
}
