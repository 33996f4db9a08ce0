//! Interactive session: filter prompts, analysis menu, raw-data pager and
//! the restart loop.
//!
//! All terminal input goes through the [`Prompter`] trait so the session can
//! be driven by scripted answers in tests; all output goes to a plain
//! [`Write`] sink.

use std::io::Write;
use std::time::Duration;

use anyhow::Result;
use bikeshare_core::error::BikeshareError;
use bikeshare_core::formatting::{format_number, rule, title_case};
use bikeshare_core::models::{City, TripTable, ALL_OPTION, VALID_DAYS, VALID_MONTHS};
use bikeshare_data::pager::RawDataPager;
use bikeshare_data::reader::TripLoader;
use bikeshare_data::stats::StatsOperation;
use dialoguer::{Confirm, Input, Select};
use indicatif::{ProgressBar, ProgressStyle};
use tracing::{debug, info};

const GREETING: &str = "Hello! Let's explore some US bike share data!";
const FAREWELL: &str =
    "Exiting the program. Thank you for using the bike share data analysis program! Come back soon =)";

// ── Prompter ──────────────────────────────────────────────────────────────────

/// Source of user answers.
pub trait Prompter {
    /// Pick one of `items`; returns its index.
    fn select(&mut self, prompt: &str, items: &[String], default: usize) -> Result<usize>;

    /// Ask a yes/no question.
    fn confirm(&mut self, prompt: &str, default: bool) -> Result<bool>;

    /// Wait until the user acknowledges `prompt`.
    fn pause(&mut self, prompt: &str) -> Result<()>;
}

/// [`Prompter`] backed by `dialoguer` widgets on the controlling terminal.
#[derive(Debug, Default)]
pub struct TerminalPrompter;

impl Prompter for TerminalPrompter {
    fn select(&mut self, prompt: &str, items: &[String], default: usize) -> Result<usize> {
        let index = Select::new()
            .with_prompt(prompt)
            .items(items)
            .default(default)
            .interact()?;
        Ok(index)
    }

    fn confirm(&mut self, prompt: &str, default: bool) -> Result<bool> {
        let answer = Confirm::new()
            .with_prompt(prompt)
            .default(default)
            .interact()?;
        Ok(answer)
    }

    fn pause(&mut self, prompt: &str) -> Result<()> {
        let _: String = Input::new()
            .with_prompt(prompt)
            .allow_empty(true)
            .interact_text()?;
        Ok(())
    }
}

// ── Filters ───────────────────────────────────────────────────────────────────

/// A validated city/month/day selection, in the lower-case form the loader
/// accepts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Filters {
    pub city: City,
    pub month: String,
    pub day: String,
}

impl Filters {
    /// One-line description such as `"Chicago, month: March, day: all"`.
    pub fn describe(&self) -> String {
        format!(
            "{}, month: {}, day: {}",
            title_case(self.city.name()),
            display_choice(&self.month),
            display_choice(&self.day)
        )
    }
}

fn display_choice(value: &str) -> String {
    if value == ALL_OPTION {
        value.to_string()
    } else {
        title_case(value)
    }
}

/// Menu entries for a period prompt: `"all"` followed by the valid values.
fn period_choices(values: &[&str]) -> Vec<String> {
    std::iter::once(ALL_OPTION.to_string())
        .chain(values.iter().map(|v| title_case(v)))
        .collect()
}

fn period_value(values: &[&str], index: usize) -> String {
    match index.checked_sub(1).and_then(|i| values.get(i)) {
        Some(value) => value.to_string(),
        None => ALL_OPTION.to_string(),
    }
}

// ── Menu ──────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum MenuAction {
    Stats(StatsOperation),
    ViewRawData,
    Exit,
}

impl MenuAction {
    fn all() -> Vec<MenuAction> {
        StatsOperation::ALL
            .into_iter()
            .map(MenuAction::Stats)
            .chain([MenuAction::ViewRawData, MenuAction::Exit])
            .collect()
    }

    fn label(self) -> &'static str {
        match self {
            MenuAction::Stats(op) => op.label(),
            MenuAction::ViewRawData => "View Raw Data",
            MenuAction::Exit => "Exit",
        }
    }
}

// ── Session ───────────────────────────────────────────────────────────────────

/// Drives one interactive run of the program.
pub struct Session<P, W> {
    loader: TripLoader,
    page_size: usize,
    prompter: P,
    out: W,
    spinner: bool,
}

impl<P: Prompter, W: Write> Session<P, W> {
    pub fn new(loader: TripLoader, page_size: usize, prompter: P, out: W) -> Self {
        Self {
            loader,
            page_size: page_size.max(1),
            prompter,
            out,
            spinner: false,
        }
    }

    /// Show a spinner on stderr while a city file is read.
    pub fn with_spinner(mut self, enabled: bool) -> Self {
        self.spinner = enabled;
        self
    }

    /// Consume the session, returning the output sink.
    #[cfg(test)]
    pub fn into_output(self) -> W {
        self.out
    }

    /// Run until the user declines to restart.
    ///
    /// Loading errors are reported and offer a restart; prompt and output
    /// failures end the session with an error.
    pub fn run(&mut self) -> Result<()> {
        writeln!(self.out, "{}", GREETING)?;
        writeln!(self.out, "{}", rule('='))?;

        loop {
            let restart = match self.explore() {
                Ok(()) => self
                    .prompter
                    .confirm("Do you want to restart with new filters?", false)?,
                Err(e) => {
                    let load_error = e.downcast::<BikeshareError>()?;
                    info!("Load failed: {}", load_error);
                    writeln!(self.out, "An error occurred: {}", load_error)?;
                    self.prompter
                        .confirm("Do you want to restart the program?", true)?
                }
            };

            if !restart {
                break;
            }
            writeln!(
                self.out,
                "Restarting the analysis with new filters. Please wait..."
            )?;
            writeln!(self.out, "{}", rule('='))?;
        }

        writeln!(self.out, "{}", rule('*'))?;
        writeln!(self.out, "{}", FAREWELL)?;
        writeln!(self.out, "{}", rule('*'))?;
        Ok(())
    }

    /// One pass: choose filters, load the table, then serve the menu.
    fn explore(&mut self) -> Result<()> {
        let filters = self.prompt_filters()?;
        let table = self.load(&filters)?;
        writeln!(
            self.out,
            "Loaded {} trip records ({}).",
            format_number(table.len() as f64, 0),
            filters.describe()
        )?;
        writeln!(self.out, "{}", rule('-'))?;
        self.menu(&table)
    }

    fn prompt_filters(&mut self) -> Result<Filters> {
        let cities: Vec<String> = City::ALL.iter().map(|c| title_case(c.name())).collect();
        let city_index =
            self.prompter
                .select("Which city would you like to explore?", &cities, 0)?;
        let city = City::ALL
            .get(city_index)
            .copied()
            .ok_or_else(|| anyhow::anyhow!("no city at menu index {}", city_index))?;

        let month_index = self.prompter.select(
            "Which month? (or all)",
            &period_choices(VALID_MONTHS),
            0,
        )?;
        let day_index =
            self.prompter
                .select("Which day of the week? (or all)", &period_choices(VALID_DAYS), 0)?;

        let filters = Filters {
            city,
            month: period_value(VALID_MONTHS, month_index),
            day: period_value(VALID_DAYS, day_index),
        };
        debug!("Selected filters: {:?}", filters);
        Ok(filters)
    }

    fn load(&mut self, filters: &Filters) -> Result<TripTable> {
        let progress = if self.spinner {
            let bar = ProgressBar::new_spinner();
            bar.set_style(ProgressStyle::with_template("{spinner} {msg}")?);
            bar.enable_steady_tick(Duration::from_millis(100));
            bar
        } else {
            ProgressBar::hidden()
        };
        progress.set_message(format!("Loading {} trips...", title_case(filters.city.name())));

        let result = self
            .loader
            .load(filters.city.name(), &filters.month, &filters.day);
        progress.finish_and_clear();
        Ok(result?)
    }

    fn menu(&mut self, table: &TripTable) -> Result<()> {
        let actions = MenuAction::all();
        let labels: Vec<String> = actions.iter().map(|a| a.label().to_string()).collect();

        loop {
            let index = self
                .prompter
                .select("Choose an analysis to run", &labels, 0)?;
            let Some(&action) = actions.get(index) else {
                continue;
            };
            debug!("Menu action: {:?}", action);

            match action {
                MenuAction::Stats(op) => {
                    writeln!(self.out, "{}", op.run(table))?;
                    self.prompter.pause("Press Enter to continue...")?;
                }
                MenuAction::ViewRawData => self.page_raw_data(table)?,
                MenuAction::Exit => {
                    writeln!(
                        self.out,
                        "\nExiting analysis section. Going back to main program."
                    )?;
                    return Ok(());
                }
            }
        }
    }

    fn page_raw_data(&mut self, table: &TripTable) -> Result<()> {
        let mut pager = RawDataPager::new(table, self.page_size);
        if !pager.has_more() {
            writeln!(self.out, "No data to display for the selected filters.")?;
            return Ok(());
        }

        let prompt = format!(
            "Would you like to see {} lines of raw data?",
            self.page_size
        );
        while self.prompter.confirm(&prompt, true)? {
            if let Some(page) = pager.next_page() {
                writeln!(self.out, "{}", page)?;
            }
            if !pager.has_more() {
                writeln!(self.out, "\nNo more data to display.")?;
                break;
            }
        }
        Ok(())
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::VecDeque;
    use tempfile::TempDir;

    const CHICAGO_CSV: &str = "\
,Start Time,End Time,Trip Duration,Start Station,End Station,User Type,Gender,Birth Year
0,2017-01-02 09:07:57,2017-01-02 09:20:53,776,Canal St & Adams St,Clinton St & Madison St,Subscriber,Male,1985.0
1,2017-03-06 17:15:00,2017-03-06 17:40:00,1500,Canal St & Adams St,Lake Shore Dr & Monroe St,Customer,,
2,2017-03-13 17:30:00,2017-03-13 17:35:30,330,Streeter Dr & Grand Ave,Canal St & Adams St,Subscriber,Female,1990.0
";

    #[derive(Debug)]
    enum Answer {
        Select(usize),
        Confirm(bool),
        Pause,
    }

    /// Replays a fixed list of answers and records every prompt it saw.
    #[derive(Debug, Default)]
    struct ScriptedPrompter {
        answers: VecDeque<Answer>,
        prompts: Vec<String>,
    }

    impl ScriptedPrompter {
        fn new(answers: Vec<Answer>) -> Self {
            Self {
                answers: answers.into(),
                prompts: Vec::new(),
            }
        }

        fn next(&mut self, prompt: &str) -> Result<Answer> {
            self.prompts.push(prompt.to_string());
            self.answers
                .pop_front()
                .ok_or_else(|| anyhow::anyhow!("script exhausted at prompt {:?}", prompt))
        }
    }

    impl Prompter for ScriptedPrompter {
        fn select(&mut self, prompt: &str, items: &[String], _default: usize) -> Result<usize> {
            match self.next(prompt)? {
                Answer::Select(i) if i < items.len() => Ok(i),
                other => anyhow::bail!("unexpected answer {:?} for select {:?}", other, prompt),
            }
        }

        fn confirm(&mut self, prompt: &str, _default: bool) -> Result<bool> {
            match self.next(prompt)? {
                Answer::Confirm(b) => Ok(b),
                other => anyhow::bail!("unexpected answer {:?} for confirm {:?}", other, prompt),
            }
        }

        fn pause(&mut self, prompt: &str) -> Result<()> {
            match self.next(prompt)? {
                Answer::Pause => Ok(()),
                other => anyhow::bail!("unexpected answer {:?} for pause {:?}", other, prompt),
            }
        }
    }

    fn data_dir() -> TempDir {
        let tmp = TempDir::new().expect("tempdir");
        std::fs::write(tmp.path().join("chicago.csv"), CHICAGO_CSV).expect("write fixture");
        tmp
    }

    fn run_script(tmp: &TempDir, page_size: usize, answers: Vec<Answer>) -> (Result<()>, String) {
        let mut session = Session::new(
            TripLoader::new(tmp.path()),
            page_size,
            ScriptedPrompter::new(answers),
            Vec::new(),
        );
        let result = session.run();
        let out = String::from_utf8(session.into_output()).expect("utf8 output");
        (result, out)
    }

    // ── helpers ───────────────────────────────────────────────────────────────

    #[test]
    fn test_period_choices_and_values() {
        let choices = period_choices(VALID_MONTHS);
        assert_eq!(choices[0], "all");
        assert_eq!(choices[1], "January");
        assert_eq!(choices.len(), VALID_MONTHS.len() + 1);

        assert_eq!(period_value(VALID_MONTHS, 0), "all");
        assert_eq!(period_value(VALID_MONTHS, 3), "march");
        assert_eq!(period_value(VALID_DAYS, 7), "sunday");
        assert_eq!(period_value(VALID_DAYS, 99), "all");
    }

    #[test]
    fn test_menu_labels_in_order() {
        let labels: Vec<&str> = MenuAction::all().iter().map(|a| a.label()).collect();
        assert_eq!(
            labels,
            vec![
                "Time Stats",
                "Station Stats",
                "Trip Duration Stats",
                "User Stats",
                "View Raw Data",
                "Exit"
            ]
        );
    }

    #[test]
    fn test_filters_describe() {
        let filters = Filters {
            city: City::NewYorkCity,
            month: "march".to_string(),
            day: "all".to_string(),
        };
        assert_eq!(filters.describe(), "New York City, month: March, day: all");
    }

    // ── session flow ──────────────────────────────────────────────────────────

    #[test]
    fn test_session_runs_time_stats_then_exits() {
        let tmp = data_dir();
        let (result, out) = run_script(
            &tmp,
            5,
            vec![
                Answer::Select(0), // chicago
                Answer::Select(0), // all months
                Answer::Select(0), // all days
                Answer::Select(0), // Time Stats
                Answer::Pause,
                Answer::Select(5), // Exit
                Answer::Confirm(false),
            ],
        );

        result.expect("session succeeds");
        assert!(out.starts_with(GREETING));
        assert!(out.contains("Loaded 3 trip records (Chicago, month: all, day: all)."));
        assert!(out.contains("Calculating the Most Frequent Times of Travel..."));
        assert!(out.contains("March"));
        assert!(out.contains("This took"));
        assert!(out.contains("Exiting analysis section. Going back to main program."));
        assert!(out.contains(FAREWELL));
    }

    #[test]
    fn test_session_month_filter_narrows_table() {
        let tmp = data_dir();
        let (result, out) = run_script(
            &tmp,
            5,
            vec![
                Answer::Select(0),
                Answer::Select(3), // March
                Answer::Select(1), // Monday
                Answer::Select(5),
                Answer::Confirm(false),
            ],
        );

        result.expect("session succeeds");
        assert!(out.contains("Loaded 2 trip records (Chicago, month: March, day: Monday)."));
    }

    #[test]
    fn test_session_empty_selection_reports_stats_errors() {
        let tmp = data_dir();
        let (result, out) = run_script(
            &tmp,
            5,
            vec![
                Answer::Select(0),
                Answer::Select(6), // June
                Answer::Select(0),
                Answer::Select(2), // Trip Duration Stats
                Answer::Pause,
                Answer::Select(5),
                Answer::Confirm(false),
            ],
        );

        result.expect("session succeeds");
        assert!(out.contains("Loaded 0 trip records"));
        assert!(out.contains("Error calculating trip duration stats:"));
    }

    #[test]
    fn test_session_missing_file_offers_restart() {
        let tmp = data_dir();
        let (result, out) = run_script(
            &tmp,
            5,
            vec![
                Answer::Select(2), // washington, no file
                Answer::Select(0),
                Answer::Select(0),
                Answer::Confirm(true), // restart the program
                Answer::Select(0),     // chicago this time
                Answer::Select(0),
                Answer::Select(0),
                Answer::Select(5),
                Answer::Confirm(false),
            ],
        );

        result.expect("session succeeds");
        assert!(out.contains("An error occurred: File not found:"));
        assert!(out.contains("washington.csv"));
        assert!(out.contains("Restarting the analysis with new filters. Please wait..."));
        assert!(out.contains("Loaded 3 trip records"));
    }

    #[test]
    fn test_session_declining_restart_after_error_exits() {
        let tmp = data_dir();
        let (result, out) = run_script(
            &tmp,
            5,
            vec![
                Answer::Select(1), // new york city, no file
                Answer::Select(0),
                Answer::Select(0),
                Answer::Confirm(false),
            ],
        );

        result.expect("session succeeds");
        assert!(out.contains("An error occurred:"));
        assert!(!out.contains("Restarting"));
        assert!(out.trim_end().ends_with(&rule('*')));
    }

    #[test]
    fn test_session_prompt_failure_is_not_swallowed() {
        let tmp = data_dir();
        let (result, out) = run_script(&tmp, 5, vec![Answer::Select(0)]);

        let err = result.expect_err("script runs out");
        assert!(err.to_string().contains("script exhausted"));
        assert!(!out.contains("An error occurred"));
    }

    // ── raw data pager ────────────────────────────────────────────────────────

    #[test]
    fn test_session_raw_data_pages_until_exhausted() {
        let tmp = data_dir();
        let (result, out) = run_script(
            &tmp,
            2,
            vec![
                Answer::Select(0),
                Answer::Select(0),
                Answer::Select(0),
                Answer::Select(4), // View Raw Data
                Answer::Confirm(true),
                Answer::Confirm(true),
                Answer::Select(5),
                Answer::Confirm(false),
            ],
        );

        result.expect("session succeeds");
        assert!(out.contains("Start Time"));
        assert!(out.contains("Streeter Dr & Grand Ave to Canal St & Adams St"));
        assert!(out.contains("No more data to display."));
    }

    #[test]
    fn test_session_raw_data_declined_after_first_page() {
        let tmp = data_dir();
        let (result, out) = run_script(
            &tmp,
            2,
            vec![
                Answer::Select(0),
                Answer::Select(0),
                Answer::Select(0),
                Answer::Select(4),
                Answer::Confirm(true),
                Answer::Confirm(false),
                Answer::Select(5),
                Answer::Confirm(false),
            ],
        );

        result.expect("session succeeds");
        assert!(out.contains("Canal St & Adams St to Clinton St & Madison St"));
        assert!(!out.contains("Streeter Dr & Grand Ave to"));
        assert!(!out.contains("No more data to display."));
    }

    #[test]
    fn test_session_raw_data_on_empty_table() {
        let tmp = data_dir();
        let (result, out) = run_script(
            &tmp,
            5,
            vec![
                Answer::Select(0),
                Answer::Select(6), // June, no rows
                Answer::Select(0),
                Answer::Select(4),
                Answer::Select(5),
                Answer::Confirm(false),
            ],
        );

        result.expect("session succeeds");
        assert!(out.contains("No data to display for the selected filters."));
    }
}
