use std::fmt::Display;
use std::io::Write;

use async_trait::async_trait;
use colored::{Color, Colorize};
use log::warn;
use tokio::io::{AsyncBufRead, AsyncBufReadExt};

use crate::quiz::session::{AnswerSource, Report, Reporter};
use crate::quiz::{QuizError, QuizResult};

/// Line-based terminal: reads replies from `R` and writes colored text to `W`.
pub struct Console<R, W> {
    input: R,
    out: W,
}

impl<R, W> Console<R, W>
where
    R: AsyncBufRead + Unpin,
    W: Write,
{
    pub fn new(input: R, out: W) -> Self {
        Self { input, out }
    }

    /// Prints `prompt` and waits for one line. `None` means the input ended.
    ///
    /// Bytes that are not valid UTF-8 are replaced rather than rejected.
    pub async fn read_line(&mut self, prompt: impl Display) -> QuizResult<Option<String>> {
        write!(self.out, "{}", prompt)?;
        self.out.flush()?;

        let mut buf = Vec::new();
        if self.input.read_until(b'\n', &mut buf).await? == 0 {
            return Ok(None);
        }
        if buf.last() == Some(&b'\n') {
            buf.pop();
            if buf.last() == Some(&b'\r') {
                buf.pop();
            }
        }
        Ok(Some(String::from_utf8_lossy(&buf).into_owned()))
    }

    /// Like `read_line`, but a closed input is an error.
    pub async fn prompt(&mut self, prompt: impl Display) -> QuizResult<String> {
        self.read_line(prompt).await?.ok_or(QuizError::InputClosed)
    }

    pub fn log(&mut self, line: impl Display) {
        self.write_line(line);
    }

    pub fn error(&mut self, message: impl Display) {
        let message = message.to_string();
        self.write_line(format!("{} {}", "Error:".red().bold(), message.as_str().red()));
    }

    /// Emphasized one-line banner.
    pub fn banner(&mut self, text: impl Display, color: Color) {
        let text = text.to_string();
        self.write_line(format!("  *** {} ***", text.as_str().color(color).bold()));
    }

    pub fn into_output(self) -> W {
        self.out
    }

    fn write_line(&mut self, line: impl Display) {
        // Output is fire-and-forget; a broken pipe should not stop the shell.
        if let Err(err) = writeln!(self.out, "{}", line) {
            warn!("Failed to write to the console: {}", err);
        }
    }
}

#[async_trait(?Send)]
impl<R, W> AnswerSource for Console<R, W>
where
    R: AsyncBufRead + Unpin,
    W: Write,
{
    async fn ask_question(&mut self, question: &str) -> QuizResult<String> {
        self.prompt(format!("{}{} ", question.red(), "?".red())).await
    }
}

impl<R, W> Reporter for Console<R, W>
where
    R: AsyncBufRead + Unpin,
    W: Write,
{
    fn report(&mut self, report: Report) {
        match report {
            Report::Correct { score: None } => {
                self.log(" Your answer is correct.");
                self.banner("Correct", Color::Green);
            }
            Report::Correct { score: Some(score) } => {
                self.log(format!(" {} - {} correct so far.", "CORRECT".green(), score));
            }
            Report::Incorrect => {
                self.log(" Your answer is incorrect.");
                self.banner("Incorrect", Color::Red);
            }
            Report::FinalScore { score, exhausted } => {
                if exhausted {
                    self.log("Nothing left to ask.".red());
                }
                self.log(" End of play. Score:");
                self.banner(score, Color::Magenta);
            }
        }
    }
}
