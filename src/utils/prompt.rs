// pgshuttle/src/utils/prompt.rs
use colored::Colorize;
use std::io::{self, BufRead, Write};

use crate::errors::Result;

/// Interactive operator session. Closed when dropped.
pub struct Session<R: BufRead, W: Write> {
    input: R,
    output: W,
}

impl Session<io::StdinLock<'static>, io::Stdout> {
    pub fn stdio() -> Self {
        Session::new(io::stdin().lock(), io::stdout())
    }
}

impl<R: BufRead, W: Write> Session<R, W> {
    pub fn new(input: R, output: W) -> Self {
        log::debug!("Interactive session opened");
        Session { input, output }
    }

    /// Returns true only for `yes` / `y` (any case, surrounding whitespace ignored).
    pub fn confirm(&mut self, prompt: &str) -> Result<bool> {
        let answer = self.ask(&prompt.blue().to_string())?.to_lowercase();
        Ok(answer == "yes" || answer == "y")
    }

    pub fn ask_file_name(&mut self, default_name: &str) -> Result<String> {
        let prompt = format!("Enter the backup file name [{}]: ", default_name);
        let answer = self.ask(&prompt.yellow().to_string())?;
        if answer.is_empty() {
            Ok(default_name.to_string())
        } else {
            Ok(answer)
        }
    }

    /// Writes `prompt` and reads one trimmed line. EOF reads as an empty answer,
    /// invalid UTF-8 is replaced rather than rejected.
    fn ask(&mut self, prompt: &str) -> Result<String> {
        write!(self.output, "{}", prompt)?;
        self.output.flush()?;

        let mut line = Vec::new();
        self.input.read_until(b'\n', &mut line)?;
        Ok(String::from_utf8_lossy(&line).trim().to_string())
    }

    #[cfg(test)]
    pub fn output(&self) -> &W {
        &self.output
    }
}

impl<R: BufRead, W: Write> Drop for Session<R, W> {
    fn drop(&mut self) {
        let _ = self.output.flush();
        log::debug!("Interactive session closed");
    }
}

#[cfg(test)]
pub(crate) fn scripted(answers: &str) -> Session<io::Cursor<Vec<u8>>, Vec<u8>> {
    Session::new(io::Cursor::new(answers.as_bytes().to_vec()), Vec::new())
}
