//! Line-based terminal front-end.
//!
//! Single keys go through the shortcut table; `:`-commands call the rest of
//! the store API. Option selection lives here, like it would in a UI
//! component.

use std::io::{self, BufRead, Write};

use quiz_core::model::{ImportMode, QuestionType, StatusKind, TrainingMode};
use services::{Key, KeyEvent, QuestionStore, ShortcutAction, handle_key};

const HELP: &str = "\
keys:     1-9 select option   [ previous   ] next   <enter> submit   ? help   esc close settings
commands: :import <file>  :append <file>  :shuffle  :mode <normal|memorize|wrong_only>
          :stats  :sections  :reset  :merge  :clear  :settings  :quit";

pub struct Terminal<'a> {
    store: &'a mut QuestionStore,
    selected: Vec<usize>,
}

enum Flow {
    Continue,
    Quit,
}

impl<'a> Terminal<'a> {
    pub fn new(store: &'a mut QuestionStore) -> Self {
        Self {
            store,
            selected: Vec::new(),
        }
    }

    pub fn run(mut self, input: impl BufRead, mut out: impl Write) -> io::Result<()> {
        writeln!(out, "{HELP}")?;
        self.render(&mut out)?;
        for line in input.lines() {
            let line = line?;
            if let Flow::Quit = self.handle_line(line.trim(), &mut out)? {
                break;
            }
        }
        Ok(())
    }

    fn handle_line(&mut self, line: &str, out: &mut impl Write) -> io::Result<Flow> {
        if let Some(command) = line.strip_prefix(':') {
            return self.handle_command(command, out);
        }

        let key = match line {
            "" => Key::Enter,
            "[" => Key::ArrowLeft,
            "]" => Key::ArrowRight,
            "esc" => Key::Escape,
            other => match Key::from_name(other) {
                Some(key) => key,
                None => {
                    writeln!(out, "unknown input: {other}")?;
                    return Ok(Flow::Continue);
                }
            },
        };
        // terminals cannot send ctrl+?, so a bare `?` asks for help
        let event = match key {
            Key::Char('?') => KeyEvent::plain(key).with_ctrl(),
            _ => KeyEvent::plain(key),
        };

        match handle_key(self.store, &event) {
            Some(ShortcutAction::SelectOption(option)) => {
                self.toggle(option);
                self.render(out)?;
            }
            Some(ShortcutAction::Navigated(_)) => {
                self.selected.clear();
                self.render(out)?;
            }
            Some(ShortcutAction::Submit) => self.submit(out)?,
            Some(ShortcutAction::SettingsClosed) => writeln!(out, "settings closed")?,
            Some(ShortcutAction::ShowHelp) => writeln!(out, "{HELP}")?,
            None => {}
        }
        Ok(Flow::Continue)
    }

    fn toggle(&mut self, option: usize) {
        if self.store.current_question_type() == QuestionType::Single {
            self.selected = vec![option];
        } else if let Some(pos) = self.selected.iter().position(|&o| o == option) {
            self.selected.remove(pos);
        } else {
            self.selected.push(option);
        }
    }

    fn submit(&mut self, out: &mut impl Write) -> io::Result<()> {
        let Some(question) = self.store.current_question() else {
            return writeln!(out, "no question to answer");
        };
        if self.selected.is_empty() {
            return writeln!(out, "select an option first");
        }
        let labels: Vec<String> = self
            .selected
            .iter()
            .filter_map(|&i| question.options().get(i).cloned())
            .collect();
        let correct = question.answer().join(", ");

        if self.store.submit_answer(labels) {
            writeln!(out, "correct")?;
        } else {
            writeln!(out, "wrong, answer: {correct}")?;
        }
        self.selected.clear();
        self.report_status(out)
    }

    fn handle_command(&mut self, command: &str, out: &mut impl Write) -> io::Result<Flow> {
        let (name, arg) = command
            .split_once(' ')
            .map_or((command, ""), |(n, a)| (n, a.trim()));

        match name {
            "import" | "append" => {
                let mode = if name == "append" {
                    ImportMode::Append
                } else {
                    ImportMode::Replace
                };
                match std::fs::read_to_string(arg) {
                    Ok(text) => {
                        // failures are reported through the status
                        let _ = self.store.import_json(&text, mode);
                        self.report_status(out)?;
                    }
                    Err(err) => writeln!(out, "cannot read {arg}: {err}")?,
                }
            }
            "shuffle" => {
                self.store.shuffle_questions();
                self.selected.clear();
                self.render(out)?;
            }
            "mode" => match arg.parse::<TrainingMode>() {
                Ok(mode) => {
                    self.store.set_training_mode(mode);
                    self.selected.clear();
                    self.render(out)?;
                }
                Err(err) => writeln!(out, "{err}")?,
            },
            "stats" => self.print_stats(out)?,
            "sections" => self.print_sections(out)?,
            "reset" => {
                self.store.reset_progress();
                self.render(out)?;
            }
            "merge" => {
                self.store.merge_wrong_answers();
                writeln!(out, "wrong-only answers merged")?;
            }
            "clear" => {
                self.store.clear_all_data();
                if self.store.import_status().is_error() {
                    self.report_status(out)?;
                } else {
                    writeln!(out, "all data cleared")?;
                }
            }
            "settings" => {
                self.store.toggle_settings();
                let state = if self.store.is_settings_open() { "open" } else { "closed" };
                writeln!(out, "settings {state}")?;
            }
            "quit" | "q" => return Ok(Flow::Quit),
            other => writeln!(out, "unknown command: {other}")?,
        }
        Ok(Flow::Continue)
    }

    fn report_status(&mut self, out: &mut impl Write) -> io::Result<()> {
        let status = self.store.import_status();
        match status.kind {
            StatusKind::Success => writeln!(out, "ok: {}", status.message)?,
            StatusKind::Error => writeln!(out, "error: {}", status.message)?,
            StatusKind::None => {}
        }
        if !status.is_none() {
            self.store.clear_import_status();
        }
        Ok(())
    }

    fn render(&mut self, out: &mut impl Write) -> io::Result<()> {
        let mode = self.store.training_mode();
        let Some(question) = self.store.current_question() else {
            writeln!(out, "[{mode}] no questions available")?;
            return self.report_status(out);
        };

        writeln!(
            out,
            "[{mode}] {}/{}  {}  ({} answered, {} correct)",
            self.store.current_question_index() + 1,
            self.store.available_question_count(),
            question.section(),
            self.store.answered_questions(),
            self.store.correct_answers(),
        )?;
        writeln!(out, "{}", question.problem())?;
        for (i, option) in question.options().iter().enumerate() {
            let mark = if self.selected.contains(&i) { "x" } else { " " };
            writeln!(out, "  [{mark}] {}. {option}", i + 1)?;
        }
        if mode == TrainingMode::Memorize {
            writeln!(out, "  answer: {}", question.answer().join(", "))?;
        }
        self.report_status(out)
    }

    fn print_stats(&self, out: &mut impl Write) -> io::Result<()> {
        let stats = self.store.get_wrong_question_stats();
        writeln!(out, "{} wrong answers", stats.total)?;
        for (section, count) in &stats.section_stats {
            writeln!(out, "  {section}: {count}")?;
        }
        for wrong in &stats.questions {
            writeln!(
                out,
                "  #{} {}: answered {}, expected {}",
                wrong.index + 1,
                wrong.problem,
                wrong.user_answer.join(", "),
                wrong.correct_answer.join(", ")
            )?;
        }
        Ok(())
    }

    fn print_sections(&self, out: &mut impl Write) -> io::Result<()> {
        for group in self.store.sections() {
            writeln!(out, "{} ({})", group.name, group.entries.len())?;
            for entry in &group.entries {
                writeln!(
                    out,
                    "  #{} {:?} {}",
                    entry.index + 1,
                    entry.status,
                    entry.question.problem()
                )?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use quiz_core::time::fixed_clock;

    fn run_script(store: &mut QuestionStore, script: &str) -> String {
        let mut out = Vec::new();
        Terminal::new(store)
            .run(script.as_bytes(), &mut out)
            .unwrap();
        String::from_utf8(out).unwrap()
    }

    fn seeded_store() -> QuestionStore {
        let mut store = QuestionStore::in_memory(fixed_clock());
        store
            .import_json(
                r#"[
                    {"section":"A","problem":"P1","options":["x","y"],"answer":["x"]},
                    {"section":"B","problem":"P2","options":["x","y","z"],"answer":["x","z"]}
                ]"#,
                ImportMode::Replace,
            )
            .unwrap();
        store.clear_import_status();
        store
    }

    #[test]
    fn selecting_and_submitting_records_answers() {
        let mut store = seeded_store();
        let output = run_script(&mut store, "2\n\n]\n1\n3\n\n:quit\n");

        assert!(output.contains("wrong, answer: x"));
        assert!(output.contains("\ncorrect\n"));
        assert_eq!(store.answered_questions(), 2);
        assert_eq!(store.correct_answers(), 1);
    }

    #[test]
    fn wrong_only_mode_and_stats_commands() {
        let mut store = seeded_store();
        let output = run_script(&mut store, "2\n\n:mode wrong_only\n:stats\n:mode bogus\n");

        assert_eq!(store.training_mode(), TrainingMode::WrongOnly);
        assert!(output.contains("[wrong_only] 1/1  A"));
        assert!(output.contains("1 wrong answers"));
        assert!(output.contains("unknown training mode: bogus"));
    }

    #[test]
    fn submit_without_selection_is_rejected() {
        let mut store = seeded_store();
        let output = run_script(&mut store, "\n");
        assert!(output.contains("select an option first"));
        assert_eq!(store.answered_questions(), 0);
    }
}
