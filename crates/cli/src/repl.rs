//! Interactive session over one loaded sheet.

use anyhow::{bail, Context, Result};
use colored::Colorize;
use rustyline::error::ReadlineError;
use rustyline::DefaultEditor;
use sheetsift_export::{export_named, ExportFormat, ExportOptions};
use sheetsift_sheet::{
    column_letters, parse_column_list, render_document, ColumnRef, FilterOutcome, RowFilter, Sheet,
};
use std::path::{Path, PathBuf};

use crate::table::format_text_table;

/// A parsed REPL command
#[derive(Debug, PartialEq)]
pub enum ReplCommand {
    Filter(RowFilter),
    Reset,
    Show,
    Html(PathBuf),
    Export { format: ExportFormat, name: String },
    Columns,
    Help,
    Clear,
    Quit,
}

/// Parse one input line; every command starts with ':'.
pub fn parse_command(line: &str) -> Result<ReplCommand> {
    let mut parts = line.split_whitespace();
    let head = parts.next().unwrap_or_default();
    let args: Vec<&str> = parts.collect();

    let command = match head {
        ":quit" | ":q" | ":exit" => ReplCommand::Quit,
        ":help" | ":h" | ":?" => ReplCommand::Help,
        ":clear" => ReplCommand::Clear,
        ":reset" => ReplCommand::Reset,
        ":show" => ReplCommand::Show,
        ":columns" | ":cols" => ReplCommand::Columns,
        ":filter" => ReplCommand::Filter(parse_filter(&args)?),
        ":html" => match args.as_slice() {
            [file] => ReplCommand::Html(PathBuf::from(file)),
            _ => bail!("usage: :html <FILE>"),
        },
        ":export" => match args.as_slice() {
            [format, name] => ReplCommand::Export {
                format: format.parse()?,
                name: (*name).to_string(),
            },
            _ => bail!("usage: :export <xlsx|csv|pdf|jpg|png> <NAME>"),
        },
        other if other.starts_with(':') => bail!("Unknown command: {other}"),
        _ => bail!("Commands start with ':' (try :help)"),
    };

    Ok(command)
}

/// `<and|or> <null|not-null> <COLS> [primary=<COL>]`
///
/// Column tokens may be split by spaces as well as commas.
fn parse_filter(args: &[&str]) -> Result<RowFilter> {
    let [combinator, condition, rest @ ..] = args else {
        bail!("usage: :filter <and|or> <null|not-null> <COLS> [primary=<COL>]");
    };

    let mut primary = None;
    let mut columns = Vec::new();
    for token in rest {
        match token.strip_prefix("primary=") {
            Some(col) => primary = Some(ColumnRef::parse(col)?),
            None => columns.push(*token),
        }
    }

    let filter = RowFilter::new(
        parse_column_list(&columns.join(","))?,
        combinator.parse()?,
        condition.parse()?,
    );
    Ok(match primary {
        Some(col) => filter.with_primary(col),
        None => filter,
    })
}

/// The loaded data and the current view of it
pub struct Session {
    original: Sheet,
    current: Sheet,
    active: Option<RowFilter>,
}

impl Session {
    pub fn new(sheet: Sheet) -> Self {
        Self {
            current: sheet.clone(),
            original: sheet,
            active: None,
        }
    }

    pub fn current(&self) -> &Sheet {
        &self.current
    }

    /// Filter the loaded data; earlier filters are discarded, not narrowed
    pub fn filter(&mut self, filter: RowFilter) -> Result<FilterOutcome> {
        let (sheet, outcome) = filter.apply(&self.original)?;
        self.current = sheet;
        self.active = Some(filter);
        Ok(outcome)
    }

    pub fn reset(&mut self) {
        self.current = self.original.clone();
        self.active = None;
    }

    /// Column letters next to their headers
    pub fn column_listing(&self) -> Vec<String> {
        self.original
            .headers()
            .iter()
            .enumerate()
            .map(|(i, header)| format!("{:>3}  {header}", column_letters(i)))
            .collect()
    }

    fn status(&self) -> String {
        match &self.active {
            Some(filter) => format!(
                "{} of {} rows ({filter})",
                self.current.row_count(),
                self.original.row_count()
            ),
            None => format!("{} rows", self.original.row_count()),
        }
    }

    /// Run a command. Returns false when the session should end.
    pub fn execute(&mut self, command: ReplCommand, export_dir: &Path) -> Result<bool> {
        match command {
            ReplCommand::Quit => return Ok(false),
            ReplCommand::Help => print_help(),
            ReplCommand::Clear => print!("\x1B[2J\x1B[1;1H"),
            ReplCommand::Filter(filter) => {
                let outcome = self.filter(filter)?;
                println!(
                    "{} {} of {} rows",
                    "Matched".green().bold(),
                    outcome.matched,
                    outcome.total
                );
            }
            ReplCommand::Reset => {
                self.reset();
                println!("{}", self.status());
            }
            ReplCommand::Show => {
                println!("{}", format_text_table(self.current()));
                println!("{}", self.status().dimmed());
            }
            ReplCommand::Columns => {
                for line in self.column_listing() {
                    println!("{line}");
                }
            }
            ReplCommand::Html(path) => {
                let html = render_document(&self.current, self.current.name());
                std::fs::write(&path, html)
                    .with_context(|| format!("Failed to write {}", path.display()))?;
                println!("{} {}", "Wrote".green().bold(), path.display());
            }
            ReplCommand::Export { format, name } => {
                let options = ExportOptions::default().with_title(self.current.name());
                let path = export_named(&self.current, format, export_dir, &name, &options)?;
                println!("{} {}", "Exported".green().bold(), path.display());
            }
        }
        Ok(true)
    }
}

/// Run the REPL over a loaded sheet.
pub fn run_repl(sheet: Sheet) -> Result<()> {
    println!(
        "{} {} - {} ({} rows, {} columns)",
        "sheetsift".cyan().bold(),
        env!("CARGO_PKG_VERSION"),
        sheet.name(),
        sheet.row_count(),
        sheet.width()
    );
    println!(
        "Type {} for help, {} to exit\n",
        ":help".yellow(),
        ":quit".yellow()
    );

    let mut session = Session::new(sheet);
    let export_dir = PathBuf::from(".");

    let mut rl = DefaultEditor::new()?;
    let history_path = dirs_history_path();

    if let Some(ref path) = history_path {
        let _ = rl.load_history(path);
    }

    loop {
        let prompt = "sift> ".green().bold().to_string();

        match rl.readline(&prompt) {
            Ok(line) => {
                let line = line.trim();
                if line.is_empty() {
                    continue;
                }
                let _ = rl.add_history_entry(line);

                let keep_going = parse_command(line)
                    .and_then(|command| session.execute(command, &export_dir));
                match keep_going {
                    Ok(true) => {}
                    Ok(false) => break,
                    Err(e) => println!("{} {e:#}", "Error:".red().bold()),
                }
            }
            Err(ReadlineError::Interrupted) => {
                println!("^C");
                continue;
            }
            Err(ReadlineError::Eof) => {
                println!("Goodbye!");
                break;
            }
            Err(e) => {
                println!("{} {e}", "Error:".red().bold());
                break;
            }
        }
    }

    if let Some(ref path) = history_path {
        let _ = rl.save_history(path);
    }

    Ok(())
}

/// Get the history file path.
fn dirs_history_path() -> Option<PathBuf> {
    dirs::data_local_dir().map(|mut p| {
        p.push("sheetsift");
        let _ = std::fs::create_dir_all(&p);
        p.push("history.txt");
        p
    })
}

fn print_help() {
    println!("{}", "sheetsift REPL Commands:".cyan().bold());
    println!(
        "  {}  Filter the loaded rows",
        ":filter <and|or> <null|not-null> <COLS> [primary=<COL>]".yellow()
    );
    println!("  {}  Show all rows again", ":reset".yellow());
    println!("  {}  Print the current rows", ":show".yellow());
    println!("  {}  List column letters and headers", ":columns".yellow());
    println!("  {}  Write the current rows as HTML", ":html <FILE>".yellow());
    println!(
        "  {}  Export the current rows",
        ":export <xlsx|csv|pdf|jpg|png> <NAME>".yellow()
    );
    println!("  {}  Clear screen", ":clear".yellow());
    println!("  {}  Show this help", ":help, :h, :?".yellow());
    println!("  {}  Exit the REPL", ":quit, :q, :exit".yellow());
    println!();
    println!("{}", "Examples:".cyan().bold());
    println!("  :filter and null B,C");
    println!("  :filter or not-null D E primary=A");
    println!("  :export pdf missing-contacts");
}

#[cfg(test)]
mod tests {
    use super::*;
    use sheetsift_sheet::{CellValue, Combinator, Condition};
    use tempfile::tempdir;

    fn contacts() -> Sheet {
        Sheet::from_data(vec![
            vec![CellValue::from("Name"), CellValue::from("Email"), CellValue::from("Phone")],
            vec![CellValue::from("Ann"), CellValue::Null, CellValue::Null],
            vec![CellValue::from("Ben"), CellValue::from("ben@example.com"), CellValue::Null],
            vec![CellValue::from("Cy"), CellValue::from("cy@example.com"), CellValue::from("555")],
        ])
    }

    #[test]
    fn test_parse_simple_commands() {
        assert_eq!(parse_command(":q").unwrap(), ReplCommand::Quit);
        assert_eq!(parse_command(":help").unwrap(), ReplCommand::Help);
        assert_eq!(parse_command(":reset").unwrap(), ReplCommand::Reset);
        assert_eq!(parse_command(":show").unwrap(), ReplCommand::Show);
        assert_eq!(parse_command(":cols").unwrap(), ReplCommand::Columns);
        assert_eq!(
            parse_command(":html out.html").unwrap(),
            ReplCommand::Html(PathBuf::from("out.html"))
        );
    }

    #[test]
    fn test_parse_filter_command() {
        let command = parse_command(":filter or not-null B, C primary=A").unwrap();
        let ReplCommand::Filter(filter) = command else {
            panic!("expected filter");
        };
        assert_eq!(filter.combinator, Combinator::Any);
        assert_eq!(filter.condition, Condition::IsNotNull);
        assert_eq!(filter.columns, vec![ColumnRef::at(1), ColumnRef::at(2)]);
        assert_eq!(filter.primary, Some(ColumnRef::at(0)));
    }

    #[test]
    fn test_parse_filter_errors() {
        assert!(parse_command(":filter and").is_err());
        assert!(parse_command(":filter and null").is_err());
        assert!(parse_command(":filter maybe null B").is_err());
        assert!(parse_command(":filter and empty B").is_err());
        assert!(parse_command(":filter and null B1").is_err());
    }

    #[test]
    fn test_parse_export_command() {
        assert_eq!(
            parse_command(":export jpg snapshot").unwrap(),
            ReplCommand::Export {
                format: ExportFormat::Jpeg,
                name: "snapshot".to_string()
            }
        );
        assert!(parse_command(":export gif snapshot").is_err());
        assert!(parse_command(":export pdf").is_err());
    }

    #[test]
    fn test_parse_unknown() {
        assert!(parse_command(":vars").is_err());
        assert!(parse_command("filter and null B").is_err());
    }

    #[test]
    fn test_filters_do_not_stack() {
        let mut session = Session::new(contacts());

        let outcome = session
            .filter(parse_filter(&["and", "null", "C"]).unwrap())
            .unwrap();
        assert_eq!(outcome.matched, 2);

        // runs against all three rows, not the two left from before
        let outcome = session
            .filter(parse_filter(&["and", "not-null", "B"]).unwrap())
            .unwrap();
        assert_eq!(outcome.matched, 2);
        assert_eq!(outcome.total, 3);

        session.reset();
        assert_eq!(session.current().row_count(), 3);
    }

    #[test]
    fn test_out_of_range_filter_keeps_view() {
        let mut session = Session::new(contacts());
        session
            .filter(parse_filter(&["and", "null", "B"]).unwrap())
            .unwrap();

        assert!(session.filter(parse_filter(&["and", "null", "Z"]).unwrap()).is_err());
        assert_eq!(session.current().row_count(), 1);
    }

    #[test]
    fn test_column_listing() {
        let session = Session::new(contacts());
        assert_eq!(
            session.column_listing(),
            vec!["  A  Name", "  B  Email", "  C  Phone"]
        );
    }

    #[test]
    fn test_execute_html_and_export() {
        let dir = tempdir().unwrap();
        let mut session = Session::new(contacts());

        let html_path = dir.path().join("view.html");
        assert!(session
            .execute(ReplCommand::Html(html_path.clone()), dir.path())
            .unwrap());
        let html = std::fs::read_to_string(&html_path).unwrap();
        assert!(html.contains("<td>NULL</td>"));

        session
            .execute(parse_command(":filter and null C").unwrap(), dir.path())
            .unwrap();
        session
            .execute(parse_command(":export csv missing").unwrap(), dir.path())
            .unwrap();
        let csv = std::fs::read_to_string(dir.path().join("missing.csv")).unwrap();
        assert_eq!(csv, "Name,Email,Phone\nAnn,,\nBen,ben@example.com,\n");

        assert!(!session.execute(ReplCommand::Quit, dir.path()).unwrap());
    }

    #[test]
    fn test_dirs_history_path() {
        if let Some(path) = dirs_history_path() {
            assert!(path.ends_with(Path::new("sheetsift").join("history.txt")));
        }
    }
}
