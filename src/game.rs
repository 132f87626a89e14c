use crate::analysis;
use crate::phrases::PhraseSet;
use crate::store::{self, PlayerStore, TrialRecord};
use crate::trial;
use crate::ui;
use chrono::Local;
use std::io::{self, BufRead, Write};
use std::time::Instant;
use time_humanize::HumanTime;
use unicode_width::UnicodeWidthStr;

pub const BANNER: &str = "keydrill: ";

/// Who is at the keyboard.
#[derive(Debug, Clone, PartialEq)]
pub enum Session {
    LoggedOut,
    LoggedIn(String),
}

impl Session {
    pub fn player(&self) -> Option<&str> {
        match self {
            Session::LoggedOut => None,
            Session::LoggedIn(name) => Some(name),
        }
    }
}

/// How performance reports are presented.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ReportMode {
    Chart,
    Plain,
}

/// The interactive menu loop. Generic over its input and output streams
/// so integration tests can drive it without a terminal.
pub struct Game<R, W> {
    store: PlayerStore,
    phrases: PhraseSet,
    report_mode: ReportMode,
    session: Session,
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> Game<R, W> {
    pub fn new(
        store: PlayerStore,
        phrases: PhraseSet,
        report_mode: ReportMode,
        input: R,
        output: W,
    ) -> Self {
        Self {
            store,
            phrases,
            report_mode,
            session: Session::LoggedOut,
            input,
            output,
        }
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    /// Log in as `name` if that profile exists.
    pub fn try_login(&mut self, name: &str) -> bool {
        if self.store.exists(name) {
            self.session = Session::LoggedIn(name.to_string());
            true
        } else {
            false
        }
    }

    pub fn run(&mut self) -> io::Result<()> {
        loop {
            if let Some(name) = self.session.player() {
                writeln!(self.output, "{BANNER}Hello {name}. Ready to begin?")?;
            }

            let choice = self.main_screen()?;
            writeln!(self.output, "{}", "-".repeat(50))?;

            match choice {
                c if c >= 7 => {
                    writeln!(self.output, "{BANNER}Bye! Hope you had fun. See you soon.")?;
                    break;
                }
                6 => self.show_tips()?,
                1 => self.create_player()?,
                2 => self.login()?,
                3 => self.run_round()?,
                4 => self.show_analysis()?,
                _ => writeln!(
                    self.output,
                    "\n{BANNER}Still working on it. Do you have some ideas?\n"
                )?,
            }
        }

        Ok(())
    }

    /// One line of input, without the trailing newline. EOF is an error:
    /// the menu has no way to continue without a keyboard.
    fn read_line(&mut self) -> io::Result<String> {
        let mut buf = String::new();
        if self.input.read_line(&mut buf)? == 0 {
            return Err(io::Error::new(
                io::ErrorKind::UnexpectedEof,
                "unexpected end of input",
            ));
        }
        Ok(buf.trim_end_matches(['\r', '\n']).to_string())
    }

    /// Display the menu and read a numeric choice. Only the player-number
    /// prompt is forgiving; a non-numeric choice here is fatal.
    fn main_screen(&mut self) -> io::Result<i64> {
        writeln!(
            self.output,
            "I am keydrill, a typing trainer for your terminal.\n\
             I will help you improve your typing speed and accuracy.\n\n\
             Menu\n----\n\n\
             1. Create player profile.\n\
             2. Log in player.\n\
             3. Begin a practice round.\n\
             4. Show performance report.\n\
             5. Game mode 2.\n\
             6. Show tips for improvement.\n\
             7. Exit.\n"
        )?;
        write!(self.output, "Enter your choice: ")?;
        self.output.flush()?;

        let line = self.read_line()?;
        writeln!(self.output)?;

        line.trim().parse().map_err(|_| {
            io::Error::new(
                io::ErrorKind::InvalidData,
                format!("menu choice must be a number, got {line:?}"),
            )
        })
    }

    fn show_tips(&mut self) -> io::Result<()> {
        writeln!(
            self.output,
            "{BANNER}Here are some tips for improvement:\n\n\
             - Use two or three primary fingers from both hands for letters.\n\
             - Use either thumb for SPACEBAR.\n\
             - Use your right ring finger for ENTER.\n\
             - Use your right middle finger for BACKSPACE.\n\
             - Use either pinky or ring finger for SHIFT.\n\
             - Use your left ring finger for TAB.\n\
             - Anchor your wrists just below the keyboard so every key is in reach.\n\
             - These are not hard and fast rules. Discover your own.\n"
        )?;
        write!(self.output, "Press ENTER to continue.")?;
        self.output.flush()?;
        self.read_line()?;
        Ok(())
    }

    fn create_player(&mut self) -> io::Result<()> {
        write!(self.output, "Enter new player name: ")?;
        self.output.flush()?;
        let name = self.read_line()?.trim().to_string();

        if !store::is_valid_name(&name) {
            writeln!(
                self.output,
                "\n{BANNER}That's not a usable player name. Try letters and numbers.\n"
            )?;
            return Ok(());
        }

        if self.store.exists(&name) {
            writeln!(
                self.output,
                "\n{BANNER}Player name already exists. Log in or create a different player.\n"
            )?;
            return Ok(());
        }

        self.store.create(&name)?;
        self.session = Session::LoggedIn(name);
        Ok(())
    }

    fn login(&mut self) -> io::Result<()> {
        let players = self.store.players()?;
        if players.is_empty() {
            writeln!(self.output, "\n{BANNER}Please add a new player first.")?;
            return Ok(());
        }

        writeln!(self.output, "Existing players:\n")?;
        for (num, name) in players.iter().enumerate() {
            writeln!(self.output, "{}. {name}", num + 1)?;
        }
        write!(self.output, "\nEnter player number: ")?;
        self.output.flush()?;

        let line = self.read_line()?;
        writeln!(self.output)?;

        let Ok(choice) = line.trim().parse::<usize>() else {
            writeln!(self.output, "{BANNER}Invalid input!")?;
            return Ok(());
        };

        if choice < 1 || choice > players.len() {
            writeln!(self.output, "\n{BANNER}Bad choice! Try again...\n")?;
        } else {
            self.session = Session::LoggedIn(players[choice - 1].clone());
        }
        Ok(())
    }

    fn run_round(&mut self) -> io::Result<()> {
        let Some(name) = self.session.player().map(str::to_string) else {
            writeln!(
                self.output,
                "\n{BANNER}Please log in to collect trial data.\n"
            )?;
            return Ok(());
        };

        writeln!(
            self.output,
            "{BANNER}Each round has {} strings for you to type.\n\
             {BANNER}I will show you the string; press ENTER when you are ready to type.\n",
            self.phrases.phrases.len()
        )?;

        let drills = self.phrases.phrases.clone();
        let mut log = self.store.append_log(&name)?;

        for (idx, target) in drills.iter().enumerate() {
            writeln!(
                self.output,
                "{BANNER}{} more to go. The string you have to type is\n\n{target}\n{}",
                drills.len() - idx,
                "─".repeat(target.width().max(1)),
            )?;
            write!(self.output, "Press ENTER key to begin typing.")?;
            self.output.flush()?;
            self.read_line()?;

            let (typed, elapsed_secs) = self.capture_trial(target)?;
            log.append(&TrialRecord {
                index: idx,
                target: target.clone(),
                typed,
                elapsed_secs,
                recorded_at: Local::now().naive_local(),
            })?;
        }

        log.close()?;
        writeln!(
            self.output,
            "{BANNER}Round over! You can relax. I saved your trials.\n\
             {BANNER}You can see your performance over time in the report section.\n"
        )?;
        Ok(())
    }

    /// Time one attempt at `target` and echo the verdict. An imperfect
    /// attempt gets its accuracy and the correction listing.
    fn capture_trial(&mut self, target: &str) -> io::Result<(String, f64)> {
        writeln!(self.output, "{BANNER}GO!")?;
        self.output.flush()?;

        let started = Instant::now();
        let typed = self.read_line()?;
        let elapsed_secs = started.elapsed().as_secs_f64();

        let score = trial::score(target, &typed);
        if score.is_perfect() {
            writeln!(self.output, "{BANNER}PERFECTLY DONE!")?;
            writeln!(self.output, "{BANNER}You took {elapsed_secs:.2} s.")?;
        } else {
            writeln!(self.output, "{BANNER}You'll get it next time :)")?;
            writeln!(self.output, "Accuracy = {:.2} %", score.ratio * 100.0)?;
            writeln!(self.output, "Target string: {target}\nYou entered  : {typed}\n")?;
            writeln!(self.output, "{BANNER}Here are the corrections:")?;
            for line in trial::correction_lines(target, &typed, &score.ops) {
                writeln!(self.output, "{line}")?;
            }
            writeln!(self.output)?;
        }

        Ok((typed, elapsed_secs))
    }

    fn show_analysis(&mut self) -> io::Result<()> {
        let Some(name) = self.session.player().map(str::to_string) else {
            writeln!(self.output, "{BANNER}Please log in to see your data.")?;
            return Ok(());
        };

        let records = self.store.load(&name)?;
        let Some(report) = analysis::aggregate(&records) else {
            writeln!(
                self.output,
                "{BANNER}There's no data to analyse. Play a round to collect performance data."
            )?;
            return Ok(());
        };

        if let Some(last) = records.last() {
            let age_secs = (Local::now().naive_local() - last.recorded_at).num_seconds();
            writeln!(
                self.output,
                "\n{BANNER}Latest trial recorded {}.",
                HumanTime::from(-age_secs)
            )?;
        }
        writeln!(
            self.output,
            "{BANNER}Raise the two left curves; sink the red one.\n"
        )?;

        match self.report_mode {
            ReportMode::Chart => ui::show_report(&name, &report)?,
            ReportMode::Plain => ui::print_report(&mut self.output, &name, &report)?,
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use std::io::Cursor;
    use std::path::Path;
    use tempfile::tempdir;

    fn tiny_set() -> PhraseSet {
        PhraseSet {
            name: "tiny".to_string(),
            size: 2,
            phrases: vec!["abc".to_string(), "one two".to_string()],
        }
    }

    fn game(dir: &Path, script: &str) -> Game<Cursor<Vec<u8>>, Vec<u8>> {
        Game::new(
            PlayerStore::new(dir),
            tiny_set(),
            ReportMode::Plain,
            Cursor::new(script.as_bytes().to_vec()),
            Vec::new(),
        )
    }

    fn output_of(game: Game<Cursor<Vec<u8>>, Vec<u8>>) -> String {
        String::from_utf8(game.output).unwrap()
    }

    #[test]
    fn exit_choice_says_goodbye() {
        let dir = tempdir().unwrap();
        let mut g = game(dir.path(), "7\n");
        g.run().unwrap();
        assert!(output_of(g).contains("Bye! Hope you had fun."));
    }

    #[test]
    fn any_choice_past_exit_also_exits() {
        let dir = tempdir().unwrap();
        let mut g = game(dir.path(), "42\n");
        g.run().unwrap();
        assert!(output_of(g).contains("Bye!"));
    }

    #[test]
    fn non_numeric_menu_choice_is_fatal() {
        let dir = tempdir().unwrap();
        let mut g = game(dir.path(), "lots\n");
        let err = g.run().unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::InvalidData);
    }

    #[test]
    fn eof_is_an_error() {
        let dir = tempdir().unwrap();
        let mut g = game(dir.path(), "");
        let err = g.run().unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::UnexpectedEof);
    }

    #[test]
    fn create_logs_the_player_in() {
        let dir = tempdir().unwrap();
        let mut g = game(dir.path(), "1\nalice\n7\n");
        g.run().unwrap();

        assert_eq!(g.session(), &Session::LoggedIn("alice".to_string()));
        assert!(g.store.exists("alice"));
        assert!(output_of(g).contains("Hello alice."));
    }

    #[test]
    fn create_rejects_duplicate_names() {
        let dir = tempdir().unwrap();
        let store = PlayerStore::new(dir.path());
        store.create("alice").unwrap();

        let mut g = game(dir.path(), "1\nalice\n7\n");
        g.run().unwrap();

        assert_eq!(g.session(), &Session::LoggedOut);
        assert!(output_of(g).contains("Player name already exists."));
    }

    #[test]
    fn create_rejects_bad_names() {
        let dir = tempdir().unwrap();
        let mut g = game(dir.path(), "1\n../oops\n7\n");
        g.run().unwrap();

        assert_eq!(g.session(), &Session::LoggedOut);
        assert!(output_of(g).contains("not a usable player name"));
    }

    #[test]
    fn login_lists_players_in_order() {
        let dir = tempdir().unwrap();
        let store = PlayerStore::new(dir.path());
        store.create("zoe").unwrap();
        store.create("alice").unwrap();

        let mut g = game(dir.path(), "2\n2\n7\n");
        g.run().unwrap();

        assert_eq!(g.session(), &Session::LoggedIn("zoe".to_string()));
        let out = output_of(g);
        assert!(out.contains("1. alice"));
        assert!(out.contains("2. zoe"));
    }

    #[test]
    fn login_with_no_players_points_at_create() {
        let dir = tempdir().unwrap();
        let mut g = game(dir.path(), "2\n7\n");
        g.run().unwrap();
        assert!(output_of(g).contains("Please add a new player first."));
    }

    #[test]
    fn login_guards_non_numeric_input() {
        let dir = tempdir().unwrap();
        let store = PlayerStore::new(dir.path());
        store.create("alice").unwrap();

        let mut g = game(dir.path(), "2\nfirst\n7\n");
        g.run().unwrap();

        assert_eq!(g.session(), &Session::LoggedOut);
        assert!(output_of(g).contains("Invalid input!"));
    }

    #[test]
    fn login_rejects_out_of_range_numbers() {
        let dir = tempdir().unwrap();
        let store = PlayerStore::new(dir.path());
        store.create("alice").unwrap();

        let mut g = game(dir.path(), "2\n5\n7\n");
        g.run().unwrap();

        assert_eq!(g.session(), &Session::LoggedOut);
        assert!(output_of(g).contains("Bad choice!"));
    }

    #[test]
    fn round_requires_login() {
        let dir = tempdir().unwrap();
        let mut g = game(dir.path(), "3\n7\n");
        g.run().unwrap();
        assert!(output_of(g).contains("Please log in to collect trial data."));
    }

    #[test]
    fn round_persists_one_record_per_drill() {
        let dir = tempdir().unwrap();
        // create alice, run the two-drill round: perfect "abc", missed "one twx"
        let mut g = game(dir.path(), "1\nalice\n3\n\nabc\n\none twx\n7\n");
        g.run().unwrap();

        let records = g.store.load("alice").unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].index, 0);
        assert_eq!(records[0].target, "abc");
        assert_eq!(records[0].typed, "abc");
        assert_eq!(records[1].index, 1);
        assert_eq!(records[1].typed, "one twx");
        assert!(records[1].elapsed_secs >= 0.0);

        let out = output_of(g);
        assert!(out.contains("PERFECTLY DONE!"));
        assert!(out.contains("You'll get it next time"));
        assert!(out.contains("Here are the corrections:"));
        assert!(out.contains("Round over!"));
    }

    #[test]
    fn analysis_requires_login() {
        let dir = tempdir().unwrap();
        let mut g = game(dir.path(), "4\n7\n");
        g.run().unwrap();
        assert!(output_of(g).contains("Please log in to see your data."));
    }

    #[test]
    fn analysis_with_no_records_prints_a_message() {
        let dir = tempdir().unwrap();
        let mut g = game(dir.path(), "1\nbob\n4\n7\n");
        g.run().unwrap();
        assert!(output_of(g).contains("There's no data to analyse."));
    }

    #[test]
    fn analysis_prints_plain_report_after_a_round() {
        let dir = tempdir().unwrap();
        let mut g = game(dir.path(), "1\nbob\n3\n\nabc\n\none two\n4\n7\n");
        g.run().unwrap();

        let out = output_of(g);
        assert!(out.contains("Latest trial recorded"));
        assert!(out.contains("Performance report for bob"));
    }

    #[test]
    fn placeholder_mode_answers_politely() {
        let dir = tempdir().unwrap();
        let mut g = game(dir.path(), "5\n7\n");
        g.run().unwrap();
        assert!(output_of(g).contains("Still working on it."));
    }

    #[test]
    fn tips_wait_for_enter() {
        let dir = tempdir().unwrap();
        let mut g = game(dir.path(), "6\n\n7\n");
        g.run().unwrap();
        assert!(output_of(g).contains("tips for improvement"));
    }

    #[test]
    fn try_login_only_accepts_existing_players() {
        let dir = tempdir().unwrap();
        let store = PlayerStore::new(dir.path());
        store.create("alice").unwrap();

        let mut g = game(dir.path(), "7\n");
        assert!(!g.try_login("bob"));
        assert_matches!(g.session(), Session::LoggedOut);
        assert!(g.try_login("alice"));
        assert_matches!(g.session(), Session::LoggedIn(name) if name.as_str() == "alice");
    }
}
