//! Interactive confirmation before destructive actions.

use std::io::{self, BufRead, BufReader, Stderr, Stdin, Write};

use log::debug;

use crate::domain::Confirmation;

/// Source of consent for deleting orphaned sessions.
pub trait Confirmer {
    fn confirm(&mut self, count: usize) -> Confirmation;
}

/// Interpret one line of operator input.
pub fn parse_response(line: &str) -> Confirmation {
    match line.trim().to_lowercase().as_str() {
        "y" | "yes" => Confirmation::Accepted,
        _ => Confirmation::Declined,
    }
}

/// Asks on an output stream and reads the answer from an input stream.
///
/// End of input and read errors are reported as `NoInput`.
pub struct PromptConfirmer<R, W> {
    input: R,
    output: W,
}

/// Terminal confirmer used by the binary.
pub type StdioConfirmer = PromptConfirmer<BufReader<Stdin>, Stderr>;

impl StdioConfirmer {
    /// Prompt on stderr so stdout stays clean for `--output json`, read from stdin.
    pub fn stdio() -> Self {
        Self::new(BufReader::new(io::stdin()), io::stderr())
    }
}

impl<R: BufRead, W: Write> PromptConfirmer<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }
}

impl<R: BufRead, W: Write> Confirmer for PromptConfirmer<R, W> {
    fn confirm(&mut self, count: usize) -> Confirmation {
        // A prompt that cannot be shown still gets a chance to read an answer.
        if let Err(e) = write!(self.output, "\nDelete {} orphaned sessions? [y/N]: ", count)
            .and_then(|_| self.output.flush())
        {
            debug!("Failed to write prompt: {}", e);
        }

        let mut line = String::new();
        match self.input.read_line(&mut line) {
            Ok(0) => Confirmation::NoInput,
            Ok(_) => parse_response(&line),
            Err(e) => {
                debug!("Failed to read confirmation: {}", e);
                Confirmation::NoInput
            }
        }
    }
}

/// Gives the same answer every time and counts how often it was asked.
#[derive(Debug, Clone)]
pub struct FixedConfirmer {
    answer: Confirmation,
    asked: usize,
}

impl FixedConfirmer {
    pub fn new(answer: Confirmation) -> Self {
        Self { answer, asked: 0 }
    }

    pub fn asked(&self) -> usize {
        self.asked
    }
}

impl Confirmer for FixedConfirmer {
    fn confirm(&mut self, _count: usize) -> Confirmation {
        self.asked += 1;
        self.answer
    }
}
