use crate::cli::Prompter;
use crate::config::Config;
use crate::error::{AppError, Result};
use crate::game::{answers_match, RandomSession, SessionState};
use crate::models::default_quizzes;
use crate::store::{QuizFile, QuizStore};
use clap::{CommandFactory, Parser, Subcommand};
use colored::*;
use comfy_table::{presets::UTF8_FULL, Table};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::{debug, error, info, warn};

/// Commands accepted at the interactive prompt
#[derive(Parser, Debug)]
#[command(
    no_binary_name = true,
    disable_help_flag = true,
    disable_help_subcommand = true,
    disable_version_flag = true
)]
struct ReplLine {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Show the list of commands
    #[command(alias = "h")]
    Help,

    /// List every quiz
    List,

    /// Show the question and answer of one quiz
    Show {
        #[arg(allow_hyphen_values = true)]
        id: Option<String>,
    },

    /// Add a new quiz interactively
    Add,

    /// Delete one quiz
    Delete {
        #[arg(allow_hyphen_values = true)]
        id: Option<String>,
    },

    /// Edit one quiz
    Edit {
        #[arg(allow_hyphen_values = true)]
        id: Option<String>,
    },

    /// Answer one quiz
    Test {
        #[arg(allow_hyphen_values = true)]
        id: Option<String>,
    },

    /// Answer every quiz in random order
    #[command(alias = "p")]
    Play,

    /// Show the credits
    Credits,

    /// Leave the program
    #[command(alias = "q")]
    Quit,
}

/// Parses one line typed at the prompt. Blank lines give `None`.
pub fn parse_command(line: &str) -> Result<Option<Command>> {
    let mut words: Vec<String> = line.split_whitespace().map(str::to_string).collect();
    let Some(first) = words.first_mut() else {
        return Ok(None);
    };
    *first = first.to_lowercase();
    let name = first.clone();

    match ReplLine::try_parse_from(&words) {
        Ok(parsed) => Ok(Some(parsed.command)),
        Err(e) if ReplLine::command().find_subcommand(&name).is_none() => {
            debug!("Unknown command {:?}: {:?}", name, e.kind());
            Err(AppError::Cli(format!(
                "Unknown command '{}'. Type 'help' to see the available commands.",
                name
            )))
        },
        Err(e) => {
            debug!("Bad arguments for {:?}: {}", name, e);
            Err(AppError::Cli(format!(
                "Invalid arguments for '{}'. Type 'help' to see how to use it.",
                name
            )))
        },
    }
}

/// Whether the prompt loop keeps going after a command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Quit,
}

/// Interactive quiz application: the store, where it is saved, and how the
/// user is asked for input.
pub struct App<P: Prompter> {
    store: QuizStore,
    file: Option<QuizFile>,
    prompter: P,
    rng: StdRng,
}

impl<P: Prompter> App<P> {
    /// Create an application over an existing store.
    ///
    /// `file`, when given, is rewritten after every change to the store.
    /// `seed` fixes the question order of every `play`.
    pub fn new(store: QuizStore, file: Option<QuizFile>, prompter: P, seed: Option<u64>) -> Self {
        let rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Self {
            store,
            file,
            prompter,
            rng,
        }
    }

    /// Create the application described by `config`, loading (or seeding)
    /// the quiz file.
    pub async fn from_config(config: &Config, prompter: P) -> Result<Self> {
        let file = QuizFile::new(&config.quiz_file);

        let records = if config.save {
            file.load_or_seed().await?
        } else if tokio::fs::try_exists(file.path()).await? {
            file.load().await?
        } else {
            info!("No quiz file and saving disabled, using the default quizzes");
            default_quizzes()
        };

        let store = QuizStore::from_records(records);
        Ok(Self::new(
            store,
            config.save.then_some(file),
            prompter,
            config.seed,
        ))
    }

    pub fn store(&self) -> &QuizStore {
        &self.store
    }

    /// Read and run commands until `quit` or the end of input.
    ///
    /// # Errors
    ///
    /// Returns the prompter's error if reading a command fails for any reason
    /// other than the input being closed.
    pub async fn run(&mut self) -> Result<()> {
        loop {
            let line = match self.prompter.ask("quiz") {
                Ok(line) => line,
                Err(e) if e.is_end_of_input() => {
                    info!("Input closed: {}", e);
                    break;
                },
                Err(e) => {
                    error!("Cannot read commands: {:?}", e);
                    return Err(e);
                },
            };

            match self.run_line(&line).await {
                Ok(Flow::Quit) => break,
                Ok(Flow::Continue) => {},
                Err(e) => {
                    error!("Command failed: {:?}", e);
                    println!("{} {}", "Error:".red(), e.to_string().red());
                },
            }
        }

        println!("{}", "Bye!".green());
        Ok(())
    }

    /// Parse and run a single line of input.
    pub async fn run_line(&mut self, line: &str) -> Result<Flow> {
        match parse_command(line)? {
            Some(command) => self.run_command(command).await,
            None => Ok(Flow::Continue),
        }
    }

    /// Run one command.
    pub async fn run_command(&mut self, command: Command) -> Result<Flow> {
        debug!("Running command {:?}", command);
        match command {
            Command::Help => self.help(),
            Command::List => self.list(),
            Command::Show { id } => self.show(required(id)?.as_str())?,
            Command::Add => self.add().await?,
            Command::Delete { id } => self.delete(required(id)?.as_str()).await?,
            Command::Edit { id } => self.edit(required(id)?.as_str()).await?,
            Command::Test { id } => {
                self.test(required(id)?.as_str())?;
            },
            Command::Play => {
                self.play()?;
            },
            Command::Credits => self.credits(),
            Command::Quit => return Ok(Flow::Quit),
        }
        Ok(Flow::Continue)
    }

    fn help(&self) {
        println!("{}", "Commands".bold());
        println!("  h|help - Show this help.");
        println!("  list - List the existing quizzes.");
        println!("  show <id> - Show the question and answer of the given quiz.");
        println!("  add - Add a new quiz interactively.");
        println!("  delete <id> - Delete the given quiz.");
        println!("  edit <id> - Edit the given quiz.");
        println!("  test <id> - Answer the given quiz.");
        println!("  p|play - Answer every quiz in random order.");
        println!("  credits - Credits.");
        println!("  q|quit - Leave the program.");
    }

    fn list(&self) {
        if self.store.is_empty() {
            println!("{}", "There are no quizzes yet. Use 'add' to create one.".yellow());
            return;
        }

        let mut table = Table::new();
        table.load_preset(UTF8_FULL).set_header(vec!["Id", "Question"]);
        for (index, quiz) in self.store.get_all() {
            table.add_row(vec![index.to_string(), quiz.question.clone()]);
        }
        println!("{table}");
    }

    fn show(&self, raw_id: &str) -> Result<()> {
        let index = self.store.resolve_index(raw_id)?;
        let quiz = self.store.get_by_index(index)?;
        println!(
            " [{}]: {} {} {}",
            index.to_string().magenta(),
            quiz.question,
            "=>".magenta(),
            quiz.answer
        );
        Ok(())
    }

    async fn add(&mut self) -> Result<()> {
        let question = self.prompter.ask("Enter a question")?;
        let answer = self.prompter.ask("Enter the answer")?;

        self.store.add(question.clone(), answer.clone());
        info!("Added quiz #{}", self.store.count() - 1);
        println!(
            " {}: {} {} {}",
            "Added".magenta(),
            question,
            "=>".magenta(),
            answer
        );
        self.persist().await;
        Ok(())
    }

    async fn delete(&mut self, raw_id: &str) -> Result<()> {
        let index = self.store.resolve_index(raw_id)?;
        let removed = self.store.delete_by_index(index)?;
        info!("Deleted quiz #{}", index);
        println!(
            " {} [{}]: {}",
            "Deleted".magenta(),
            index.to_string().magenta(),
            removed.question
        );
        self.persist().await;
        Ok(())
    }

    async fn edit(&mut self, raw_id: &str) -> Result<()> {
        let index = self.store.resolve_index(raw_id)?;
        let current = self.store.get_by_index(index)?.clone();

        let question = self
            .prompter
            .ask_with_initial("Enter a question", &current.question)?;
        let answer = self
            .prompter
            .ask_with_initial("Enter the answer", &current.answer)?;

        self.store.update(index, question.clone(), answer.clone())?;
        info!("Updated quiz #{}", index);
        println!(
            " Quiz {} changed to: {} {} {}",
            index.to_string().magenta(),
            question,
            "=>".magenta(),
            answer
        );
        self.persist().await;
        Ok(())
    }

    /// Ask one quiz and report whether the answer was right.
    fn test(&mut self, raw_id: &str) -> Result<bool> {
        let index = self.store.resolve_index(raw_id)?;
        let quiz = self.store.get_by_index(index)?.clone();

        let response = self.prompter.ask(&quiz.question)?;
        let correct = answers_match(&response, &quiz.answer);
        print_verdict(correct);
        Ok(correct)
    }

    /// Play every quiz in random order until one is missed.
    fn play(&mut self) -> Result<(SessionState, usize)> {
        let mut session = RandomSession::seeded(&self.store, self.rng.gen());
        info!("Starting a game with {} quizzes", session.total());

        while let Some(question) = session.next_question() {
            debug!(
                "Asking quiz {} ({} left after this one)",
                question.index,
                session.remaining()
            );
            let response = self.prompter.ask(&question.text)?;
            let Some(round) = session.answer(&response) else {
                break;
            };
            debug!("Quiz {} done, session now {:?}", round.index, round.state);
            print_verdict(round.correct);
            if round.correct {
                println!("Score so far: {}", round.score.to_string().green());
            }
        }

        let score = session.score();
        match session.state() {
            SessionState::Won => {
                println!(
                    "{} You got {} out of {}.",
                    "All quizzes answered!".green().bold(),
                    score,
                    session.total()
                );
            },
            SessionState::Lost => {
                println!("Final score: {}", score.to_string().magenta());
            },
            SessionState::NoQuestions => {
                println!("{}", "There are no questions to play.".yellow());
                println!("Final score: {}", score);
            },
            state @ (SessionState::NotStarted | SessionState::Running) => {
                warn!("Game stopped in non-terminal state {:?}", state);
            },
        }
        info!("Game finished as {:?} with score {}", session.state(), score);
        Ok((session.state(), score))
    }

    fn credits(&self) {
        println!("{}", "Credits".bold());
        println!(
            "  {} {}",
            env!("CARGO_PKG_NAME").green(),
            env!("CARGO_PKG_VERSION")
        );
        println!("  {}", env!("CARGO_PKG_AUTHORS").green());
    }

    /// Save the store if a quiz file is configured. A failed save is reported
    /// but does not undo the change in memory.
    async fn persist(&self) {
        let Some(file) = &self.file else {
            return;
        };
        if let Err(e) = file.save(self.store.records()).await {
            error!("Failed to save quizzes: {:?}", e);
            println!(
                "{} {}",
                "Could not save quizzes:".yellow(),
                e.to_string().yellow()
            );
        }
    }
}

fn required(id: Option<String>) -> Result<String> {
    id.ok_or_else(|| AppError::Cli("Missing id parameter.".to_string()))
}

fn print_verdict(correct: bool) {
    if correct {
        println!("Your answer is: {}", "Correct".green().bold());
    } else {
        println!("Your answer is: {}", "Incorrect".red().bold());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::ScriptedPrompter;
    use crate::models::QuizRecord;
    use rstest::rstest;
    use tempfile::TempDir;

    fn sample_store() -> QuizStore {
        QuizStore::from_records(vec![
            QuizRecord::new("2+2", "4"),
            QuizRecord::new("capital of France", "Paris"),
        ])
    }

    fn app_with<I, S>(store: QuizStore, responses: I) -> App<ScriptedPrompter>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        App::new(store, None, ScriptedPrompter::new(responses), Some(5))
    }

    #[rstest]
    #[case("help", Command::Help)]
    #[case("h", Command::Help)]
    #[case("list", Command::List)]
    #[case("  LIST  ", Command::List)]
    #[case("show 3", Command::Show { id: Some("3".into()) })]
    #[case("show", Command::Show { id: None })]
    #[case("delete -1", Command::Delete { id: Some("-1".into()) })]
    #[case("edit abc", Command::Edit { id: Some("abc".into()) })]
    #[case("test 0", Command::Test { id: Some("0".into()) })]
    #[case("p", Command::Play)]
    #[case("play", Command::Play)]
    #[case("credits", Command::Credits)]
    #[case("q", Command::Quit)]
    #[case("quit", Command::Quit)]
    fn parses_commands_and_aliases(#[case] line: &str, #[case] expected: Command) {
        assert_eq!(parse_command(line).unwrap(), Some(expected));
    }

    #[test]
    fn blank_line_is_no_command() {
        assert_eq!(parse_command("   ").unwrap(), None);
        assert_eq!(parse_command("").unwrap(), None);
    }

    #[test]
    fn unknown_command_is_named_in_error() {
        let err = parse_command("fly 3").unwrap_err();
        match err {
            AppError::Cli(msg) => assert!(msg.contains("Unknown command 'fly'")),
            other => panic!("Expected Cli error, got {:?}", other),
        }
    }

    #[rstest]
    #[case("q now", "q")]
    #[case("p 1", "p")]
    #[case("credits please", "credits")]
    fn known_names_and_aliases_get_argument_errors(#[case] line: &str, #[case] name: &str) {
        let err = parse_command(line).unwrap_err();
        match err {
            AppError::Cli(msg) => {
                assert!(msg.contains(&format!("Invalid arguments for '{}'", name)), "{}", msg)
            },
            other => panic!("Expected Cli error, got {:?}", other),
        }
    }

    #[test]
    fn extra_arguments_are_rejected() {
        let err = parse_command("list 1 2").unwrap_err();
        assert!(matches!(err, AppError::Cli(msg) if msg.contains("Invalid arguments for 'list'")));
    }

    #[tokio::test]
    async fn missing_id_is_reported() {
        let mut app = app_with(sample_store(), Vec::<String>::new());
        let err = app.run_line("show").await.unwrap_err();
        assert!(matches!(err, AppError::Cli(msg) if msg.contains("Missing id")));
    }

    #[tokio::test]
    async fn show_rejects_bad_indices() {
        let mut app = app_with(sample_store(), Vec::<String>::new());
        for raw in ["2", "-1", "x"] {
            let err = app.run_line(&format!("show {}", raw)).await.unwrap_err();
            match err {
                AppError::NotFound(index) => assert_eq!(index, raw),
                other => panic!("Expected NotFound, got {:?}", other),
            }
        }
        assert_eq!(app.run_line("show 1").await.unwrap(), Flow::Continue);
    }

    #[tokio::test]
    async fn add_appends_prompted_quiz() {
        let mut app = app_with(sample_store(), ["3*3", "9"]);
        app.run_line("add").await.unwrap();

        assert_eq!(app.store().count(), 3);
        assert_eq!(
            app.store().get_by_index(2).unwrap(),
            &QuizRecord::new("3*3", "9")
        );
    }

    #[tokio::test]
    async fn edit_updates_in_place() {
        let mut app = app_with(sample_store(), ["2+3", "5"]);
        app.run_line("edit 0").await.unwrap();

        assert_eq!(
            app.store().get_by_index(0).unwrap(),
            &QuizRecord::new("2+3", "5")
        );
        assert_eq!(app.store().get_by_index(1).unwrap().answer, "Paris");
        assert_eq!(
            app.prompter.prompts,
            vec!["Enter a question", "Enter the answer"]
        );
        assert_eq!(
            app.prompter.initials,
            vec![Some("2+2".to_string()), Some("4".to_string())]
        );
    }

    #[tokio::test]
    async fn add_starts_from_empty_prompts() {
        let mut app = app_with(sample_store(), ["q", "a"]);
        app.run_line("add").await.unwrap();
        assert_eq!(app.prompter.initials, vec![None, None]);
    }

    #[tokio::test]
    async fn edit_of_missing_quiz_asks_nothing() {
        let mut app = app_with(sample_store(), ["unused"]);
        assert!(app.run_line("edit 9").await.is_err());
        assert!(app.prompter.prompts.is_empty());
    }

    #[tokio::test]
    async fn delete_renumbers_later_quizzes() {
        let mut app = app_with(sample_store(), Vec::<String>::new());
        app.run_line("delete 0").await.unwrap();

        assert_eq!(app.store().count(), 1);
        assert_eq!(
            app.store().get_by_index(0).unwrap().question,
            "capital of France"
        );
    }

    #[rstest]
    #[case(" 4 ", true)]
    #[case("4", true)]
    #[case("Four", false)]
    fn test_checks_single_answer(#[case] response: &str, #[case] expected: bool) {
        let mut app = app_with(sample_store(), [response]);
        assert_eq!(app.test("0").unwrap(), expected);
        assert_eq!(app.prompter.prompts, vec!["2+2"]);
    }

    #[test]
    fn play_wins_when_every_answer_is_right() {
        let mut store = sample_store();
        store.add("3*3", "9");
        store.add("Largest planet", "Jupiter");
        let prompter = ScriptedPrompter::answering(store.records());
        let mut app = App::new(store.clone(), None, prompter, None);

        let (state, score) = app.play().unwrap();
        assert_eq!(state, SessionState::Won);
        assert_eq!(score, 4);

        let mut asked = app.prompter.prompts.clone();
        asked.sort();
        let mut questions: Vec<String> =
            store.get_all().map(|(_, q)| q.question.clone()).collect();
        questions.sort();
        assert_eq!(asked, questions);
    }

    #[test]
    fn play_stops_at_first_wrong_answer() {
        let mut app = app_with(sample_store(), ["wrong", "never asked"]);
        let (state, score) = app.play().unwrap();

        assert_eq!(state, SessionState::Lost);
        assert_eq!(score, 0);
        assert_eq!(app.prompter.prompts.len(), 1);
    }

    #[test]
    fn play_on_empty_store_asks_nothing() {
        let mut app = app_with(QuizStore::default(), Vec::<String>::new());
        let (state, score) = app.play().unwrap();

        assert_eq!(state, SessionState::NoQuestions);
        assert_eq!(score, 0);
        assert!(app.prompter.prompts.is_empty());
    }

    #[tokio::test]
    async fn run_loop_survives_errors_and_stops_on_quit() {
        let mut app = app_with(
            sample_store(),
            ["show 7", "bogus", "", "delete 1", "quit", "list"],
        );
        app.run().await.unwrap();

        assert_eq!(app.store().count(), 1);
        // "list" after quit is never read.
        assert!(!app.prompter.is_exhausted());
    }

    struct BrokenPrompter;

    impl Prompter for BrokenPrompter {
        fn ask(&mut self, _prompt: &str) -> Result<String> {
            Err(std::io::Error::new(std::io::ErrorKind::PermissionDenied, "no tty").into())
        }

        fn ask_with_initial(&mut self, prompt: &str, _initial: &str) -> Result<String> {
            self.ask(prompt)
        }
    }

    #[tokio::test]
    async fn run_loop_reports_unreadable_input() {
        let mut app = App::new(sample_store(), None, BrokenPrompter, Some(1));
        let err = app.run().await.unwrap_err();
        assert!(matches!(err, AppError::Io(io) if io.kind() == std::io::ErrorKind::PermissionDenied));
    }

    #[tokio::test]
    async fn run_loop_ends_when_input_runs_out() {
        let mut app = app_with(sample_store(), ["list"]);
        app.run().await.unwrap();
        assert!(app.prompter.is_exhausted());
    }

    #[tokio::test]
    async fn changes_are_saved_to_the_quiz_file() {
        let dir = TempDir::new().unwrap();
        let config = Config {
            quiz_file: dir.path().join("quizzes.json"),
            save: true,
            seed: Some(1),
            log_dir: dir.path().join("logs"),
        };

        let mut app = App::from_config(&config, ScriptedPrompter::new(["Who?", "Me"]))
            .await
            .unwrap();
        assert_eq!(app.store().records(), default_quizzes().as_slice());

        app.run_line("add").await.unwrap();
        app.run_line("delete 0").await.unwrap();

        let saved = QuizFile::new(&config.quiz_file).load().await.unwrap();
        assert_eq!(saved, app.store().records());
        assert_eq!(saved.last().unwrap(), &QuizRecord::new("Who?", "Me"));
    }

    #[tokio::test]
    async fn no_save_never_writes_the_file() {
        let dir = TempDir::new().unwrap();
        let config = Config {
            quiz_file: dir.path().join("quizzes.json"),
            save: false,
            seed: None,
            log_dir: dir.path().join("logs"),
        };

        let mut app = App::from_config(&config, ScriptedPrompter::new(["q", "a"]))
            .await
            .unwrap();
        app.run_line("add").await.unwrap();

        assert_eq!(app.store().count(), default_quizzes().len() + 1);
        assert!(!config.quiz_file.exists());
    }
}
