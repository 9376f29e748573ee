use std::io::Write;

use colored::{Color, Colorize};
use log::{debug, error, info};
use rand::rngs::StdRng;
use rand::SeedableRng;
use tokio::io::AsyncBufRead;

use crate::console::Console;
use crate::quiz::session::{run_play, run_test};
use crate::quiz::storage::JsonStore;
use crate::quiz::{QuizError, QuizRepository, QuizResult};

const PROMPT: &str = "quiz > ";

const HELP: &[&str] = &[
    "Commands:",
    "  h|help - Show this help.",
    "  list - List the existing quizzes.",
    "  show <id> - Show the question and the answer of the given quiz.",
    "  add - Add a new quiz interactively.",
    "  delete <id> - Delete the given quiz.",
    "  edit <id> - Edit the given quiz.",
    "  test <id> - Try the given quiz.",
    "  p|play - Answer every quiz in random order.",
    "  credits - Show the credits.",
    "  q|quit - Quit the program.",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Quit,
}

/// The interactive command loop. Owns the repository for the whole session.
pub struct Shell<R, W> {
    repo: QuizRepository,
    store: Option<JsonStore>,
    console: Console<R, W>,
    rng: StdRng,
    authors: Vec<String>,
}

impl<R, W> Shell<R, W>
where
    R: AsyncBufRead + Unpin,
    W: Write,
{
    pub fn new(repo: QuizRepository, console: Console<R, W>, authors: Vec<String>) -> Self {
        Self {
            repo,
            store: None,
            console,
            rng: StdRng::from_entropy(),
            authors,
        }
    }

    /// Saves the repository to `store` after every change.
    pub fn with_store(mut self, store: JsonStore) -> Self {
        self.store = Some(store);
        self
    }

    pub fn with_rng(mut self, rng: StdRng) -> Self {
        self.rng = rng;
        self
    }

    pub fn repository(&self) -> &QuizRepository {
        &self.repo
    }

    pub fn into_output(self) -> W {
        self.console.into_output()
    }

    /// Reads and runs commands until `quit` or the end of the input.
    pub async fn run(&mut self) -> QuizResult<()> {
        self.console.banner("Quiz", Color::Green);

        loop {
            let line = match self.console.read_line(PROMPT).await? {
                Some(line) => line,
                None => break,
            };

            match self.execute(&line).await {
                Ok(Flow::Continue) => {}
                Ok(Flow::Quit) => break,
                Err(err) => {
                    debug!("Command '{}' failed: {}", line.trim(), err);
                    self.console.error(err);
                }
            }
        }

        info!("Leaving the quiz shell");
        self.console.log("Bye!");
        Ok(())
    }

    /// Runs one command line.
    pub async fn execute(&mut self, line: &str) -> QuizResult<Flow> {
        let mut words = line.split_whitespace();
        let command = match words.next() {
            Some(command) => command.to_lowercase(),
            None => return Ok(Flow::Continue),
        };
        let arg = words.next();
        debug!("Dispatching '{}' with {:?}", command, arg);

        match command.as_str() {
            "h" | "help" => self.help(),
            "list" => self.list(),
            "show" => self.show(arg)?,
            "add" => self.add().await?,
            "delete" => self.delete(arg)?,
            "edit" => self.edit(arg).await?,
            "test" => self.test(arg).await?,
            "p" | "play" => self.play().await?,
            "credits" => self.credits(),
            "q" | "quit" => return Ok(Flow::Quit),
            other => self.console.error(format!(
                "Unknown command '{}'. Use 'help' to list the commands.",
                other
            )),
        }
        Ok(Flow::Continue)
    }

    fn help(&mut self) {
        for line in HELP {
            self.console.log(line);
        }
    }

    fn list(&mut self) {
        for (id, quiz) in self.repo.all() {
            self.console
                .log(format!("  [{}]: {}", id.to_string().magenta(), quiz.question));
        }
    }

    fn show(&mut self, arg: Option<&str>) -> QuizResult<()> {
        let id = self.require_id(arg)?;
        let quiz = self.repo.get(id)?;
        self.console.log(format!(
            "  [{}]: {} {} {}",
            id.to_string().magenta(),
            quiz.question,
            "=>".magenta(),
            quiz.answer
        ));
        Ok(())
    }

    async fn add(&mut self) -> QuizResult<()> {
        let question = self.console.prompt(" Question: ".red()).await?;
        let answer = self.console.prompt(" Answer: ".red()).await?;

        let id = self.repo.add(&question, &answer)?;
        let quiz = self.repo.get(id)?;
        self.console.log(format!(
            " {} [{}]: {} {} {}",
            "Added".magenta(),
            id,
            quiz.question,
            "=>".magenta(),
            quiz.answer
        ));
        self.persist();
        Ok(())
    }

    fn delete(&mut self, arg: Option<&str>) -> QuizResult<()> {
        let id = self.require_id(arg)?;
        let removed = self.repo.delete(id)?;
        self.console.log(format!(
            " {} [{}]: {}",
            "Deleted".magenta(),
            id,
            removed.question
        ));
        self.persist();
        Ok(())
    }

    /// Prompts for both fields showing the current values; an empty reply keeps one.
    async fn edit(&mut self, arg: Option<&str>) -> QuizResult<()> {
        let id = self.require_id(arg)?;
        let current = self.repo.get(id)?.clone();

        let question = self
            .console
            .prompt(format!("{} [{}]: ", " Question".red(), current.question))
            .await?;
        let answer = self
            .console
            .prompt(format!("{} [{}]: ", " Answer".red(), current.answer))
            .await?;

        let question = keep_if_blank(question, &current.question);
        let answer = keep_if_blank(answer, &current.answer);
        self.repo.update(id, &question, &answer)?;

        let quiz = self.repo.get(id)?;
        self.console.log(format!(
            " Quiz {} changed to: {} {} {}",
            id.to_string().magenta(),
            quiz.question,
            "=>".magenta(),
            quiz.answer
        ));
        self.persist();
        Ok(())
    }

    async fn test(&mut self, arg: Option<&str>) -> QuizResult<()> {
        let id = self.require_id(arg)?;
        run_test(&self.repo, id, &mut self.console).await?;
        Ok(())
    }

    async fn play(&mut self) -> QuizResult<()> {
        let outcome = run_play(&self.repo, &mut self.console, &mut self.rng).await?;
        debug!("Play finished: won {}, score {}", outcome.won, outcome.score);
        Ok(())
    }

    fn credits(&mut self) {
        self.console.log("Authors:");
        for author in &self.authors {
            self.console.log(format!("  {}", author.green()));
        }
    }

    fn require_id(&self, arg: Option<&str>) -> QuizResult<usize> {
        match arg {
            Some(text) => self.repo.parse_id(text),
            None => Err(QuizError::InvalidArgument("missing id parameter".to_string())),
        }
    }

    fn persist(&mut self) {
        let Some(store) = &self.store else {
            return;
        };
        if let Err(err) = store.save(self.repo.quizzes()) {
            error!("Failed to save quizzes to {}: {}", store.path().display(), err);
            self.console.error(format!("changes were not saved: {}", err));
        }
    }
}

fn keep_if_blank(reply: String, current: &str) -> String {
    if reply.trim().is_empty() {
        return current.to_string();
    }
    reply
}
