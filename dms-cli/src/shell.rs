//! Interactive shell — one command per line against a live session.
//!
//! Bad input never ends the loop: the error is printed and the next line is
//! read. Only end of input, `quit`, or a broken stdout stops it.

use std::io::{BufRead, Write};
use std::path::PathBuf;

use anyhow::Result;
use dms_core::{CharacterRecord, DmsError, RecordId};

use crate::commands::Session;
use crate::output;

const HELP: &str = "\
commands:
  load PATH            import a CSV file
  add LINE             add id,handle,server,occupation,wantedLevel,bountyCents,reputation,active
  update LINE          overwrite the record with the same id
  remove ID            delete a record
  archive ID           mark a record inactive
  find ID              look up by id
  handle NAME          look up by handle
  list                 active records
  search [QUERY]       substring search over active records
  top N                rank active records
  export N PATH        write the top N to a CSV file
  help                 this text
  quit                 leave the shell";

/// A parsed shell line.
#[derive(Debug, PartialEq, Eq)]
pub enum ShellCommand {
    Load(PathBuf),
    Add(String),
    Update(String),
    Remove(RecordId),
    Archive(RecordId),
    Find(RecordId),
    Handle(String),
    List,
    Search(String),
    Top(i64),
    Export(i64, PathBuf),
    Help,
    Quit,
    Empty,
}

/// Parse one input line.
pub fn parse_line(line: &str) -> Result<ShellCommand, String> {
    let line = line.trim();
    let (verb, rest) = line
        .split_once(char::is_whitespace)
        .map_or((line, ""), |(verb, rest)| (verb, rest.trim()));

    let require = |what: &str| {
        if rest.is_empty() {
            Err(format!("{verb}: missing {what}"))
        } else {
            Ok(rest.to_string())
        }
    };
    let id = || -> Result<RecordId, String> {
        rest.parse::<i64>()
            .map(RecordId)
            .map_err(|_| format!("{verb}: expected a numeric id, got {rest:?}"))
    };

    match verb.to_ascii_lowercase().as_str() {
        "" => Ok(ShellCommand::Empty),
        "load" => require("path").map(|p| ShellCommand::Load(PathBuf::from(p))),
        "add" => require("record line").map(ShellCommand::Add),
        "update" => require("record line").map(ShellCommand::Update),
        "remove" => id().map(ShellCommand::Remove),
        "archive" => id().map(ShellCommand::Archive),
        "find" => id().map(ShellCommand::Find),
        "handle" => require("handle").map(ShellCommand::Handle),
        "list" => Ok(ShellCommand::List),
        "search" => Ok(ShellCommand::Search(rest.to_string())),
        "top" => rest
            .parse()
            .map(ShellCommand::Top)
            .map_err(|_| format!("top: expected a count, got {rest:?}")),
        "export" => {
            let (n, path) = rest
                .split_once(char::is_whitespace)
                .ok_or_else(|| "export: usage is `export N PATH`".to_string())?;
            let n = n
                .parse()
                .map_err(|_| format!("export: expected a count, got {n:?}"))?;
            Ok(ShellCommand::Export(n, PathBuf::from(path.trim())))
        }
        "help" | "?" => Ok(ShellCommand::Help),
        "quit" | "exit" => Ok(ShellCommand::Quit),
        other => Err(format!("unknown command {other:?} (try `help`)")),
    }
}

/// Run the shell until `quit` or end of input.
pub fn run<R: BufRead, W: Write>(session: &mut Session, input: R, out: &mut W) -> Result<()> {
    writeln!(out, "=== Game Character DMS === (type `help`)")?;
    prompt(out)?;
    for line in input.lines() {
        match parse_line(&line?) {
            Ok(ShellCommand::Quit) => break,
            Ok(command) => {
                if let Err(err) = execute(session, command, out) {
                    writeln!(out, "error: {err:#}")?;
                }
            }
            Err(message) => writeln!(out, "{message}")?,
        }
        prompt(out)?;
    }
    writeln!(out, "Goodbye!")?;
    Ok(())
}

fn prompt<W: Write>(out: &mut W) -> Result<()> {
    write!(out, "> ")?;
    out.flush()?;
    Ok(())
}

fn execute<W: Write>(session: &mut Session, command: ShellCommand, out: &mut W) -> Result<()> {
    let json = session.json;
    match command {
        ShellCommand::Load(path) => session.load_into(&path, out)?,
        ShellCommand::Add(line) => {
            let result = CharacterRecord::from_line(&line)
                .map_err(DmsError::from)
                .and_then(|record| session.store.add(record));
            report(out, "Add", result)?;
        }
        ShellCommand::Update(line) => {
            let result = CharacterRecord::from_line(&line)
                .map_err(DmsError::from)
                .and_then(|record| session.store.update(record));
            report(out, "Update", result)?;
        }
        ShellCommand::Remove(id) => report(out, "Remove", session.store.remove(id).map(drop))?,
        ShellCommand::Archive(id) => report(out, "Archive", session.store.archive(id))?,
        ShellCommand::Find(id) => output::lookup(out, session.store.find_by_id(id), json)?,
        ShellCommand::Handle(handle) => {
            output::lookup(out, session.store.find_by_handle(&handle), json)?;
        }
        ShellCommand::List => output::records(out, &session.store.list_active(), json)?,
        ShellCommand::Search(query) => output::records(out, &session.store.search(&query), json)?,
        ShellCommand::Top(n) => session.top(out, Some(n), None, None)?,
        ShellCommand::Export(n, path) => session.top(out, Some(n), Some(&path), None)?,
        ShellCommand::Help => writeln!(out, "{HELP}")?,
        ShellCommand::Quit | ShellCommand::Empty => {}
    }
    Ok(())
}

/// Expected store failures are reported, not propagated.
fn report<W: Write>(out: &mut W, action: &str, result: dms_core::error::Result<()>) -> Result<()> {
    match result {
        Ok(()) => writeln!(out, "{action} successful.")?,
        Err(err) => writeln!(out, "{action} failed: {err}")?,
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use dms_core::{CharacterStore, DmsConfig};

    fn session() -> Session {
        Session::new(CharacterStore::new(), DmsConfig::default(), false)
    }

    fn run_script(session: &mut Session, script: &str) -> String {
        let mut out = Vec::new();
        run(session, script.as_bytes(), &mut out).expect("shell runs");
        String::from_utf8(out).expect("utf8")
    }

    #[test]
    fn parses_commands() {
        assert_eq!(parse_line("  "), Ok(ShellCommand::Empty));
        assert_eq!(parse_line("LIST"), Ok(ShellCommand::List));
        assert_eq!(parse_line("remove 7"), Ok(ShellCommand::Remove(RecordId(7))));
        assert_eq!(parse_line("search"), Ok(ShellCommand::Search(String::new())));
        assert_eq!(
            parse_line("search  night owl "),
            Ok(ShellCommand::Search("night owl".to_string()))
        );
        assert_eq!(
            parse_line("export 3 out/top.csv"),
            Ok(ShellCommand::Export(3, PathBuf::from("out/top.csv")))
        );
        assert_eq!(parse_line("top -2"), Ok(ShellCommand::Top(-2)));
    }

    #[test]
    fn rejects_bad_input() {
        assert!(parse_line("remove seven").is_err());
        assert!(parse_line("add").is_err());
        assert!(parse_line("export 3").is_err());
        assert!(parse_line("fly away").is_err());
    }

    #[test]
    fn script_exercises_crud_and_ranking() {
        let mut session = session();
        let text = run_script(
            &mut session,
            "add 1,Doofnita,NA,Troll,3,500,80,true\n\
             add 2,AnitaBath,EU,Catfish,5,1000,-95,true\n\
             add 3,doofnita,AS,Copycat,1,0,0,true\n\
             update 1,Doofnita,NA,Troll,4,500,80,true\n\
             archive 2\n\
             remove 9\n\
             top 5\n\
             quit\n\
             list\n",
        );

        assert!(text.contains("Add failed: Duplicate handle"));
        assert!(text.contains("Update successful."));
        assert!(text.contains("Archive successful."));
        assert!(text.contains("Remove failed: Record not found: 9"));
        assert!(text.contains("Score=405"));
        assert!(!text.contains("AnitaBath WL"));
        assert!(text.ends_with("Goodbye!\n"));
        assert_eq!(session.store.len(), 2);
    }

    #[test]
    fn malformed_add_does_not_stop_the_shell() {
        let mut session = session();
        let text = run_script(&mut session, "add 1,Broken\nadd 2,Fine,NA,Cook,0,0,0,true\n");
        assert!(text.contains("Add failed: Parse error: expected 8 fields, found 2"));
        assert!(text.contains("Add successful."));
        assert_eq!(session.store.len(), 1);
    }

    #[test]
    fn export_writes_file() {
        let mut session = session();
        let dir = tempfile::tempdir().expect("temp dir");
        let path = dir.path().join("top.csv");
        run_script(
            &mut session,
            &format!(
                "add 1,Doofnita,NA,Troll,3,500,80,true\nexport 1 {}\n",
                path.display()
            ),
        );
        let written = std::fs::read_to_string(&path).expect("export file");
        assert_eq!(
            written,
            "id,handle,server,occupation,wantedLevel,bountyCents,reputation,score\n\
             1,Doofnita,NA,Troll,3,500,80,305"
        );
    }
}
