//! Title and comment input for new documents

use std::io::{self, BufRead, Write};

/// Title and comment written at the top of a new document
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Header {
    pub title: String,
    pub comment: String,
}

/// Supplies the header for a folder that has no document yet
pub trait Prompter {
    fn header(&mut self, folder_name: &str) -> io::Result<Header>;
}

/// Asks on a terminal. An empty title falls back to the folder name.
pub struct StdinPrompter<R, W> {
    input: R,
    output: W,
}

impl StdinPrompter<io::StdinLock<'static>, io::Stdout> {
    pub fn stdin() -> Self {
        Self::new(io::stdin().lock(), io::stdout())
    }
}

impl<R: BufRead, W: Write> StdinPrompter<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }

    fn ask(&mut self, question: &str) -> io::Result<String> {
        write!(self.output, "{}", question)?;
        self.output.flush()?;
        read_answer(&mut self.input)
    }
}

impl<R: BufRead, W: Write> Prompter for StdinPrompter<R, W> {
    fn header(&mut self, folder_name: &str) -> io::Result<Header> {
        writeln!(self.output, "\nNew document for folder: {}", folder_name)?;
        let title = self.ask("Title for the document: ")?;
        let comment = self.ask("Comment for the document: ")?;
        Ok(Header {
            title: if title.is_empty() {
                folder_name.to_string()
            } else {
                title
            },
            comment,
        })
    }
}

/// Same header for every folder; a missing title uses the folder name
#[derive(Debug, Clone, Default)]
pub struct FixedPrompter {
    pub title: Option<String>,
    pub comment: String,
}

impl Prompter for FixedPrompter {
    fn header(&mut self, folder_name: &str) -> io::Result<Header> {
        Ok(Header {
            title: self
                .title
                .clone()
                .unwrap_or_else(|| folder_name.to_string()),
            comment: self.comment.clone(),
        })
    }
}

/// Ask a yes/no question. Anything but "y" or "yes" is a no, as is end of input.
pub fn confirm<R: BufRead, W: Write>(
    input: &mut R,
    output: &mut W,
    question: &str,
) -> io::Result<bool> {
    write!(output, "{} [y/N] ", question)?;
    output.flush()?;
    let answer = read_answer(input)?.to_ascii_lowercase();
    Ok(answer == "y" || answer == "yes")
}

fn read_answer<R: BufRead>(input: &mut R) -> io::Result<String> {
    let mut line = String::new();
    input.read_line(&mut line)?;
    Ok(line.trim().to_string())
}
