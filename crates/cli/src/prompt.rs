//! Interactive input for the city and business type.

use std::collections::VecDeque;
use std::io;

use anyhow::{Context, bail};
use async_trait::async_trait;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader, Lines, Stdin, Stdout};

pub const CITY_PROMPT: &str = "Enter city: ";
pub const CATEGORY_PROMPT: &str = "Enter business type: ";

/// Source of answers to text prompts.
#[async_trait]
pub trait InputProvider: Send {
    async fn ask(&mut self, prompt: &str) -> io::Result<String>;
}

/// Reads answers line by line from stdin, printing prompts to stdout.
pub struct StdinInput {
    lines: Lines<BufReader<Stdin>>,
    stdout: Stdout,
}

impl StdinInput {
    pub fn new() -> Self {
        Self { lines: BufReader::new(tokio::io::stdin()).lines(), stdout: tokio::io::stdout() }
    }
}

impl Default for StdinInput {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl InputProvider for StdinInput {
    async fn ask(&mut self, prompt: &str) -> io::Result<String> {
        self.stdout.write_all(prompt.as_bytes()).await?;
        self.stdout.flush().await?;

        match self.lines.next_line().await? {
            Some(line) => Ok(line),
            None => Err(io::Error::new(io::ErrorKind::UnexpectedEof, "stdin closed before an answer was given")),
        }
    }
}

/// Replays canned answers and remembers the prompts it was shown.
#[derive(Debug, Default)]
pub struct ScriptedInput {
    answers: VecDeque<String>,
    pub asked: Vec<String>,
}

impl ScriptedInput {
    pub fn new<I, S>(answers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self { answers: answers.into_iter().map(Into::into).collect(), asked: Vec::new() }
    }
}

#[async_trait]
impl InputProvider for ScriptedInput {
    async fn ask(&mut self, prompt: &str) -> io::Result<String> {
        self.asked.push(prompt.to_string());
        self.answers
            .pop_front()
            .ok_or_else(|| io::Error::new(io::ErrorKind::UnexpectedEof, "no scripted answer left"))
    }
}

/// The (city, business type) pair a run is about.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Query {
    pub city: String,
    pub category: String,
}

async fn answer(input: &mut dyn InputProvider, preset: Option<String>, prompt: &str, what: &str) -> anyhow::Result<String> {
    let value = match preset.map(|v| v.trim().to_string()).filter(|v| !v.is_empty()) {
        Some(value) => value,
        None => input.ask(prompt).await.with_context(|| format!("failed to read {what}"))?.trim().to_string(),
    };
    if value.is_empty() {
        bail!("{what} must not be empty");
    }
    Ok(value)
}

/// Ask for whatever part of the query was not given on the command line.
pub async fn ask_query(
    input: &mut dyn InputProvider, city: Option<String>, category: Option<String>,
) -> anyhow::Result<Query> {
    let city = answer(input, city, CITY_PROMPT, "city").await?;
    let category = answer(input, category, CATEGORY_PROMPT, "business type").await?;
    Ok(Query { city, category })
}
