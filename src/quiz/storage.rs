use std::fs::File;
use std::io::{BufReader, BufWriter, ErrorKind, Write};
use std::path::{Path, PathBuf};

use log::{info, warn};

use super::{Quiz, QuizResult};

/// Quizzes written on first start when no quiz file exists yet.
pub fn seed_quizzes() -> Vec<Quiz> {
    vec![
        Quiz::new("Capital of Italy", "Rome"),
        Quiz::new("Capital of France", "Paris"),
        Quiz::new("Capital of Spain", "Madrid"),
        Quiz::new("Capital of Portugal", "Lisbon"),
    ]
}

/// Quiz list persisted as a JSON array of `{ "question", "answer" }` objects.
#[derive(Debug, Clone)]
pub struct JsonStore {
    path: PathBuf,
}

impl JsonStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn load(&self) -> QuizResult<Vec<Quiz>> {
        let file = match File::open(&self.path) {
            Ok(file) => file,
            Err(err) if err.kind() == ErrorKind::NotFound => {
                warn!(
                    "Quiz file {} not found, creating it with the default quizzes",
                    self.path.display()
                );
                let quizzes = seed_quizzes();
                self.save(&quizzes)?;
                return Ok(quizzes);
            }
            Err(err) => return Err(err.into()),
        };

        let quizzes: Vec<Quiz> = serde_json::from_reader(BufReader::new(file))?;
        info!("Loaded {} quizzes from {}", quizzes.len(), self.path.display());
        Ok(quizzes)
    }

    pub fn save(&self, quizzes: &[Quiz]) -> QuizResult<()> {
        let mut writer = BufWriter::new(File::create(&self.path)?);
        serde_json::to_writer_pretty(&mut writer, quizzes)?;
        writer.flush()?;
        info!("Saved {} quizzes to {}", quizzes.len(), self.path.display());
        Ok(())
    }
}
