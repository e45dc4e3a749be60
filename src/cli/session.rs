//! Interactive tracking session.
//!
//! A [`Session`] owns the [`Tracker`] for the lifetime of the shell and turns
//! each input line into one tracker operation, writing the result to any
//! [`Write`] sink. Lines are split with shell quoting rules and parsed by clap
//! as [`ShellCommand`]s. Nothing outlives the session.

use chrono::{Datelike, Utc};
use clap::{Parser, Subcommand};
use std::io::{BufRead, Write};

use crate::constants;
use crate::domain::{Rating, WatchStatus};
use crate::models::{Drama, DramaForm, DramaFormInput};
use crate::services::view::{DerivedView, EmptyState, rating_filter_label};
use crate::services::{DramaError, Tracker};

const FIELDS_HELP: &str = "\
FIELDS:
  title, year, status (want-to-watch | watching | watched), rating (0-5),
  opinion, genre, country, episodes, poster

EXAMPLES:
  add title=\"Reply 1988\" year=2015 status=watched rating=5
  filter rating=4 country=\"Coreia do Sul\"
  edit 3f2a year=2021
  rm 3f2a";

/// One shell line, parsed like a command line without a program name.
#[derive(Parser, Debug)]
#[command(
    name = "doramas",
    no_binary_name = true,
    disable_version_flag = true,
    after_help = FIELDS_HELP
)]
struct ShellLine {
    #[command(subcommand)]
    command: ShellCommand,
}

#[derive(Subcommand, Debug, PartialEq, Eq)]
pub enum ShellCommand {
    /// Add a drama (title required; year defaults to this year)
    #[command(visible_alias = "a")]
    Add {
        #[arg(value_name = "FIELD=VALUE", required = true, value_parser = parse_assignment)]
        fields: Vec<(String, String)>,
    },

    /// Change fields of a drama; the others keep their values
    #[command(visible_alias = "e")]
    Edit {
        /// Drama id or any unique prefix of it
        id: String,
        #[arg(value_name = "FIELD=VALUE", required = true, value_parser = parse_assignment)]
        fields: Vec<(String, String)>,
    },

    /// Remove a drama
    #[command(visible_alias = "rm")]
    Remove { id: String },

    /// Show one drama in full
    Show { id: String },

    /// List dramas matching the current filters
    #[command(visible_aliases = ["ls", "l"])]
    List,

    /// Set filters (search, status, year, rating, country, genre); value 'all'
    /// unsets one, no arguments shows them
    #[command(visible_alias = "f")]
    Filter {
        #[arg(value_name = "KEY=VALUE", value_parser = parse_assignment)]
        pairs: Vec<(String, String)>,
    },

    /// Clear all filters
    Clear,

    /// Show watch counts and average rating
    Stats,

    /// Show values available for filters and fields
    Options,

    /// End the session (nothing is saved)
    #[command(visible_aliases = ["exit", "q"])]
    Quit,
}

fn parse_assignment(arg: &str) -> Result<(String, String), String> {
    arg.split_once('=')
        .map(|(key, value)| (key.trim().to_string(), value.to_string()))
        .ok_or_else(|| format!("expected key=value, got '{arg}'"))
}

/// Splits and parses one input line. `Ok(None)` for a blank line; `Err`
/// carries the message to show (including clap's help output).
pub fn parse_line(line: &str) -> Result<Option<ShellCommand>, String> {
    let args = shell_words::split(line).map_err(|e| format!("Error: {e}\n"))?;
    if args.is_empty() {
        return Ok(None);
    }
    ShellLine::try_parse_from(args)
        .map(|parsed| Some(parsed.command))
        .map_err(|e| e.to_string())
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Quit,
}

pub struct Session<W: Write> {
    tracker: Tracker,
    out: W,
}

impl<W: Write> Session<W> {
    pub const fn new(tracker: Tracker, out: W) -> Self {
        Self { tracker, out }
    }

    #[must_use]
    pub const fn tracker(&self) -> &Tracker {
        &self.tracker
    }

    pub fn into_output(self) -> W {
        self.out
    }

    pub fn greet(&mut self) -> std::io::Result<()> {
        writeln!(
            self.out,
            "Doramas v{} - type 'help' for commands",
            env!("CARGO_PKG_VERSION")
        )
    }

    /// Reads commands from a non-interactive source until `quit` or end of input.
    pub fn run<R: BufRead>(&mut self, input: R) -> anyhow::Result<()> {
        self.greet()?;

        let mut lines = input.lines();
        loop {
            write!(self.out, "{}", constants::shell::PROMPT)?;
            self.out.flush()?;

            let Some(line) = lines.next() else {
                writeln!(self.out)?;
                break;
            };

            if self.execute(&line?)? == Flow::Quit {
                break;
            }
        }

        Ok(())
    }

    /// Runs a single command line. User mistakes are reported on the output,
    /// only I/O failures are returned as errors.
    pub fn execute(&mut self, line: &str) -> anyhow::Result<Flow> {
        let command = match parse_line(line) {
            Ok(Some(command)) => command,
            Ok(None) => return Ok(Flow::Continue),
            Err(message) => {
                write!(self.out, "{message}")?;
                return Ok(Flow::Continue);
            }
        };

        match command {
            ShellCommand::Add { fields } => self.cmd_add(&fields)?,
            ShellCommand::Edit { id, fields } => self.cmd_edit(&id, &fields)?,
            ShellCommand::Remove { id } => self.cmd_remove(&id)?,
            ShellCommand::Show { id } => self.cmd_show(&id)?,
            ShellCommand::List => self.cmd_list()?,
            ShellCommand::Filter { pairs } => self.cmd_filter(&pairs)?,
            ShellCommand::Clear => {
                self.tracker.clear_filters();
                writeln!(self.out, "✓ Filters cleared")?;
            }
            ShellCommand::Stats => self.cmd_stats()?,
            ShellCommand::Options => self.cmd_options()?,
            ShellCommand::Quit => return Ok(Flow::Quit),
        }

        Ok(Flow::Continue)
    }

    fn cmd_add(&mut self, fields: &[(String, String)]) -> anyhow::Result<()> {
        let mut input = DramaFormInput::from_form(&DramaForm::blank(Utc::now().year()));
        if !self.apply_fields(&mut input, fields)? {
            return Ok(());
        }

        match self.tracker.add(&input) {
            Ok(drama) => writeln!(
                self.out,
                "✓ Added: {} (ID: {})",
                drama.title,
                drama.id.short()
            )?,
            Err(e) => self.report(&e)?,
        }
        Ok(())
    }

    fn cmd_edit(&mut self, prefix: &str, fields: &[(String, String)]) -> anyhow::Result<()> {
        let (id, mut input) = match self.tracker.resolve(prefix) {
            Ok(drama) => (drama.id, DramaFormInput::from_form(&drama.to_form())),
            Err(e) => return self.report(&e),
        };

        if !self.apply_fields(&mut input, fields)? {
            return Ok(());
        }

        match self.tracker.edit(id, &input) {
            Ok(drama) => writeln!(self.out, "✓ Updated: {}", drama.title)?,
            Err(e) => self.report(&e)?,
        }
        Ok(())
    }

    fn cmd_remove(&mut self, prefix: &str) -> anyhow::Result<()> {
        let id = match self.tracker.resolve(prefix) {
            Ok(drama) => drama.id,
            Err(DramaError::UnknownPrefix(_)) => {
                writeln!(self.out, "Nothing to remove: no drama with ID {prefix}")?;
                return Ok(());
            }
            Err(e) => return self.report(&e),
        };

        if let Some(drama) = self.tracker.remove(id) {
            writeln!(self.out, "✓ Removed: {}", drama.title)?;
        }
        Ok(())
    }

    fn cmd_show(&mut self, prefix: &str) -> anyhow::Result<()> {
        match self.tracker.resolve(prefix) {
            Ok(drama) => {
                let drama = drama.clone();
                write_card(&mut self.out, &drama)?;
                writeln!(
                    self.out,
                    "  Added: {} | Updated: {}",
                    drama.created_at.format("%Y-%m-%d %H:%M"),
                    drama.updated_at.format("%Y-%m-%d %H:%M")
                )?;
            }
            Err(e) => self.report(&e)?,
        }
        Ok(())
    }

    fn cmd_list(&mut self) -> anyhow::Result<()> {
        let view = self.tracker.view();
        write_view(&mut self.out, &view)?;
        if self.tracker.criteria().has_active_filters() {
            writeln!(self.out, "Filters active. Run 'clear' to show everything.")?;
        }
        Ok(())
    }

    /// Applies every pair or none of them.
    fn cmd_filter(&mut self, pairs: &[(String, String)]) -> anyhow::Result<()> {
        if pairs.is_empty() {
            return self.print_filters();
        }

        let mut next = self.tracker.criteria().clone();
        for (key, value) in pairs {
            if let Err(errors) = next.set(key, value) {
                return self.report(&DramaError::Validation(errors));
            }
        }
        self.tracker.set_criteria(next);

        self.cmd_list()
    }

    fn print_filters(&mut self) -> anyhow::Result<()> {
        let criteria = self.tracker.criteria().clone();
        let or_all = |v: Option<String>| v.unwrap_or_else(|| "all".to_string());
        writeln!(self.out, "Current filters:")?;
        writeln!(self.out, "  search:  \"{}\"", criteria.search)?;
        writeln!(self.out, "  status:  {}", or_all(criteria.status.map(|s| s.to_string())))?;
        writeln!(self.out, "  year:    {}", or_all(criteria.year.map(|y| y.to_string())))?;
        writeln!(
            self.out,
            "  rating:  {}",
            or_all(criteria.min_rating.map(rating_filter_label))
        )?;
        writeln!(self.out, "  country: {}", or_all(criteria.country))?;
        writeln!(self.out, "  genre:   {}", or_all(criteria.genre))?;
        Ok(())
    }

    fn cmd_stats(&mut self) -> anyhow::Result<()> {
        let stats = self.tracker.view().stats;
        writeln!(self.out, "{:<16}{}", WatchStatus::Watched.label(), stats.watched)?;
        writeln!(self.out, "{:<16}{}", WatchStatus::Watching.label(), stats.watching)?;
        writeln!(
            self.out,
            "{:<16}{}",
            WatchStatus::WantToWatch.label(),
            stats.want_to_watch
        )?;
        writeln!(self.out, "{:<16}{}", "Average rating", stats.average_display())?;
        Ok(())
    }

    fn cmd_options(&mut self) -> anyhow::Result<()> {
        let options = self.tracker.options();
        let join = |values: &[String]| {
            if values.is_empty() {
                "-".to_string()
            } else {
                values.join(", ")
            }
        };
        let years: Vec<String> = options.years.iter().map(ToString::to_string).collect();

        writeln!(self.out, "Years in collection:     {}", join(&years))?;
        writeln!(self.out, "Countries in collection: {}", join(&options.countries))?;
        writeln!(self.out, "Genres in collection:    {}", join(&options.genres))?;
        writeln!(self.out)?;

        let statuses: Vec<String> = WatchStatus::ALL
            .iter()
            .map(|s| format!("{} ({})", s, s.label()))
            .collect();
        let ratings: Vec<String> = (1..=Rating::MAX.value())
            .rev()
            .filter_map(Rating::new)
            .map(|r| format!("{} {}", r.value(), rating_filter_label(r)))
            .collect();
        let catalog = self.tracker.catalog();
        let years = self.tracker.years();

        writeln!(self.out, "Statuses:  {}", statuses.join(", "))?;
        writeln!(self.out, "Ratings:   {}", ratings.join(", "))?;
        writeln!(self.out, "Years:     {}-{}", years.min, years.max)?;
        writeln!(self.out, "Countries: {}", catalog.countries.join(", "))?;
        writeln!(self.out, "Genres:    {}", catalog.genres.join(", "))?;
        Ok(())
    }

    /// Applies field assignments; reports and returns `false` on an unknown field.
    fn apply_fields(
        &mut self,
        input: &mut DramaFormInput,
        fields: &[(String, String)],
    ) -> anyhow::Result<bool> {
        for (key, value) in fields {
            if let Err(e) = input.set(key, value) {
                writeln!(self.out, "Error: {e}")?;
                return Ok(false);
            }
        }
        Ok(true)
    }

    fn report(&mut self, err: &DramaError) -> anyhow::Result<()> {
        match err {
            DramaError::Validation(errors) => {
                for e in &errors.errors {
                    writeln!(self.out, "  {}: {}", e.field, e.message)?;
                }
            }
            other => writeln!(self.out, "Error: {other}")?,
        }
        Ok(())
    }
}

fn write_view<W: Write>(out: &mut W, view: &DerivedView) -> std::io::Result<()> {
    match view.empty_state() {
        Some(EmptyState::NoRecords) => {
            writeln!(out, "No dramas added yet.")?;
            writeln!(out, "Start your collection with: add title=\"<title>\"")?;
            return Ok(());
        }
        Some(EmptyState::NoMatches) => {
            writeln!(out, "No dramas found.")?;
            writeln!(out, "Try adjusting the filters to find what you are looking for.")?;
            return Ok(());
        }
        None => {}
    }

    let count = view.dramas.len();
    writeln!(
        out,
        "{count} drama{s} found ({total} total)",
        s = if count == 1 { "" } else { "s" },
        total = view.total
    )?;
    writeln!(out, "{:-<70}", "")?;
    for drama in &view.dramas {
        write_card(out, drama)?;
    }
    Ok(())
}

fn write_card<W: Write>(out: &mut W, drama: &Drama) -> std::io::Result<()> {
    writeln!(
        out,
        "[{}] {} ({})  {}  {}",
        drama.id.short(),
        drama.title,
        drama.year,
        drama.status.label(),
        drama.rating.stars()
    )?;

    let mut details = Vec::new();
    if let Some(genre) = &drama.genre {
        details.push(format!("Genre: {genre}"));
    }
    if let Some(country) = &drama.country {
        details.push(format!("Country: {country}"));
    }
    if let Some(episodes) = drama.episodes {
        details.push(format!("Episodes: {episodes}"));
    }
    if !details.is_empty() {
        writeln!(out, "  {}", details.join(" | "))?;
    }
    if let Some(opinion) = &drama.opinion {
        writeln!(out, "  \"{opinion}\"")?;
    }
    if let Some(poster) = &drama.poster {
        writeln!(out, "  Poster: {poster}")?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::CatalogConfig;

    fn session() -> Session<Vec<u8>> {
        Session::new(Tracker::new(CatalogConfig::default()), Vec::new())
    }

    fn run(session: &mut Session<Vec<u8>>, line: &str) -> String {
        session.out.clear();
        session.execute(line).unwrap();
        String::from_utf8(session.out.clone()).unwrap()
    }

    #[test]
    fn parse_line_honours_shell_quoting() {
        assert_eq!(
            parse_line(r#"add title="Reply 1988" year=2015"#).unwrap(),
            Some(ShellCommand::Add {
                fields: vec![
                    ("title".to_string(), "Reply 1988".to_string()),
                    ("year".to_string(), "2015".to_string()),
                ],
            })
        );
        assert_eq!(
            parse_line("a title='Reply 1988'").unwrap(),
            Some(ShellCommand::Add {
                fields: vec![("title".to_string(), "Reply 1988".to_string())],
            })
        );
        assert_eq!(
            parse_line(r#"f genre="""#).unwrap(),
            Some(ShellCommand::Filter {
                pairs: vec![("genre".to_string(), String::new())],
            })
        );
        assert_eq!(parse_line("   ").unwrap(), None);
        assert!(parse_line("add title=\"open").is_err());
        assert!(parse_line("add Goblin").is_err());
    }

    #[test]
    fn single_quoted_title_is_added_whole() {
        let mut session = session();
        let out = run(&mut session, "add title='Reply 1988' year=2015");
        assert!(out.starts_with("✓ Added: Reply 1988"), "{out}");
        assert_eq!(session.tracker().view().dramas[0].title, "Reply 1988");
    }

    #[test]
    fn rejected_filter_changes_nothing() {
        let mut session = session();
        run(&mut session, "add title=Goblin year=2016 status=watched");

        let out = run(&mut session, "filter status=watched year=soon");
        assert!(out.contains("year: Year filter must be a number, got 'soon'"));
        assert!(session.tracker().criteria().is_unset());

        let out = run(&mut session, "filter status=watched year=2016");
        assert!(out.contains("1 drama found"));
        assert_eq!(session.tracker().criteria().year, Some(2016));
    }

    #[test]
    fn help_lists_commands() {
        let mut session = session();
        let out = run(&mut session, "help");
        assert!(out.contains("add"));
        assert!(out.contains("filter"));
        assert!(out.contains("FIELDS:"));
    }

    #[test]
    fn add_then_list() {
        let mut session = session();
        let out = run(
            &mut session,
            r#"add title="Reply 1988" year=2015 status=watched rating=5"#,
        );
        assert!(out.starts_with("✓ Added: Reply 1988"));

        let out = run(&mut session, "list");
        assert!(out.contains("1 drama found (1 total)"));
        assert!(out.contains("Reply 1988 (2015)  Assistido  ★★★★★"));
    }

    #[test]
    fn add_reports_field_errors() {
        let mut session = session();
        let out = run(&mut session, "add year=1900 episodes=many");
        assert!(out.contains("title: Title is required"));
        assert!(out.contains("year: Year must be 1950 or later"));
        assert!(out.contains("episodes: Episode count must be a number"));
        assert!(session.tracker().is_empty());
    }

    #[test]
    fn edit_keeps_unspecified_fields() {
        let mut session = session();
        run(&mut session, "add title=Goblin year=2016 genre=Fantasia rating=4");
        let id = session.tracker().view().dramas[0].id;

        let out = run(&mut session, &format!("edit {} year=2017", id.short()));
        assert!(out.contains("✓ Updated: Goblin"));

        let drama = session.tracker().get(id).unwrap();
        assert_eq!(drama.year, 2017);
        assert_eq!(drama.genre.as_deref(), Some("Fantasia"));
        assert_eq!(drama.rating.value(), 4);
    }

    #[test]
    fn remove_unknown_is_harmless() {
        let mut session = session();
        run(&mut session, "add title=Goblin year=2016");
        let out = run(&mut session, "rm ffffffff");
        assert!(out.contains("Nothing to remove"));
        assert_eq!(session.tracker().len(), 1);
    }

    #[test]
    fn filter_and_clear() {
        let mut session = session();
        run(&mut session, "add title=Goblin year=2016 rating=5");
        run(&mut session, "add title=Vincenzo year=2021 rating=3");

        let out = run(&mut session, "filter rating=4");
        assert!(out.contains("1 drama found (2 total)"));
        assert!(out.contains("Goblin"));
        assert!(!out.contains("Vincenzo"));
        assert!(out.contains("Filters active"));

        let out = run(&mut session, "filter search=nothing");
        assert!(out.contains("No dramas found."));

        run(&mut session, "clear");
        let out = run(&mut session, "list");
        assert!(out.contains("2 dramas found"));
    }

    #[test]
    fn bad_filter_reported() {
        let mut session = session();
        let out = run(&mut session, "filter year=soon");
        assert!(out.contains("year: Year filter must be a number"));
    }

    #[test]
    fn stats_output() {
        let mut session = session();
        run(&mut session, "add title=Goblin year=2016 status=watched rating=5");
        run(&mut session, "add title=Vincenzo year=2021 status=watching rating=4");
        let out = run(&mut session, "stats");
        assert!(out.contains("Assistido       1"));
        assert!(out.contains("Assistindo      1"));
        assert!(out.contains("Quero Assistir  0"));
        assert!(out.contains("Average rating  4.5"));
    }

    #[test]
    fn empty_list_message() {
        let mut session = session();
        let out = run(&mut session, "list");
        assert!(out.contains("No dramas added yet."));
    }

    #[test]
    fn run_stops_at_quit() {
        let mut session = session();
        let input = "add title=Goblin year=2016\nquit\nadd title=Ignored year=2016\n";
        session.run(input.as_bytes()).unwrap();
        assert_eq!(session.tracker().len(), 1);
    }

    #[test]
    fn unknown_command() {
        let mut session = session();
        let out = run(&mut session, "watch Goblin");
        assert!(out.contains("unrecognized subcommand"), "{out}");
        assert!(out.contains("watch"));
        assert_eq!(session.execute("exit").unwrap(), Flow::Quit);
    }
}
