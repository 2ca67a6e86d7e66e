//! Prompt and notification surface backed by the controlling terminal.

use std::collections::VecDeque;
use std::io::{self, IsTerminal, Write};

use async_trait::async_trait;
use connprof_core::wizard::{Notifier, PromptSpec, Prompter};
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use crossterm::terminal::{disable_raw_mode, enable_raw_mode};
use log::debug;

/// Where answers come from, one line at a time. `None` is end of input.
#[async_trait]
pub trait LineSource: Send {
    async fn next_line(&mut self) -> Option<String>;

    /// A line that must not be echoed. Defaults to a plain line.
    async fn next_hidden_line(&mut self) -> Option<String> {
        self.next_line().await
    }
}

/// Lines from stdin, read on a blocking task.
#[derive(Debug, Default)]
pub struct StdinLines;

#[async_trait]
impl LineSource for StdinLines {
    async fn next_line(&mut self) -> Option<String> {
        tokio::task::spawn_blocking(|| {
            let mut line = String::new();
            match io::stdin().read_line(&mut line) {
                Ok(0) => None,
                Ok(_) => Some(line.trim_end_matches(['\r', '\n']).to_owned()),
                Err(e) => {
                    debug!("stdin read failed: {e}");
                    None
                }
            }
        })
        .await
        .ok()
        .flatten()
    }

    async fn next_hidden_line(&mut self) -> Option<String> {
        if !io::stdin().is_terminal() {
            // Nothing to hide from when input is piped in.
            return self.next_line().await;
        }
        match tokio::task::spawn_blocking(read_hidden_line).await {
            Ok(Ok(line)) => line,
            Ok(Err(e)) => {
                debug!("hidden input failed: {e}");
                None
            }
            Err(_) => None,
        }
    }
}

/// Fixed lines, then end of input.
#[async_trait]
impl LineSource for VecDeque<String> {
    async fn next_line(&mut self) -> Option<String> {
        self.pop_front()
    }
}

/// Reads a line in raw mode so nothing typed is echoed.
/// Esc or Ctrl+C dismisses the prompt.
fn read_hidden_line() -> io::Result<Option<String>> {
    enable_raw_mode()?;
    let result = read_keys_until_enter();
    let _ = disable_raw_mode();
    // Raw mode swallowed the newline of the Enter key.
    println!();
    result
}

fn read_keys_until_enter() -> io::Result<Option<String>> {
    let mut buffer = String::new();
    loop {
        let Event::Key(KeyEvent {
            code,
            modifiers,
            kind,
            ..
        }) = event::read()?
        else {
            continue;
        };
        if kind != KeyEventKind::Press {
            continue;
        }
        match code {
            KeyCode::Enter => return Ok(Some(buffer)),
            KeyCode::Esc => return Ok(None),
            KeyCode::Char('c') if modifiers.contains(KeyModifiers::CONTROL) => return Ok(None),
            KeyCode::Backspace => {
                buffer.pop();
            }
            KeyCode::Char(ch) => buffer.push(ch),
            _ => {}
        }
    }
}

/// What a single line typed at a choice prompt means.
#[derive(Debug, PartialEq, Eq)]
pub enum ChoiceInput {
    Dismissed,
    Picked(usize),
    Invalid,
}

/// Options are numbered from 1; a blank line dismisses the prompt.
pub fn parse_choice(input: &str, option_count: usize) -> ChoiceInput {
    let input = input.trim();
    if input.is_empty() {
        return ChoiceInput::Dismissed;
    }
    match input.parse::<usize>() {
        Ok(n) if (1..=option_count).contains(&n) => ChoiceInput::Picked(n - 1),
        _ => ChoiceInput::Invalid,
    }
}

fn print_prompt(spec: &PromptSpec) {
    let mut out = io::stdout();
    let _ = write!(out, "{}", spec.prompt);
    if !spec.placeholder.is_empty() {
        let _ = write!(out, " ({})", spec.placeholder);
    }
    let _ = write!(out, ": ");
    let _ = out.flush();
}

/// Asks on stdout, reads answers from `L`. End of input counts as
/// dismissing the prompt.
#[derive(Debug, Default)]
pub struct TerminalPrompter<L = StdinLines> {
    lines: L,
}

impl TerminalPrompter {
    pub fn new() -> Self {
        Self::with_lines(StdinLines)
    }
}

impl<L: LineSource> TerminalPrompter<L> {
    pub fn with_lines(lines: L) -> Self {
        Self { lines }
    }

    /// One line without the trailing newline; `None` at end of input.
    pub async fn read_line(&mut self) -> Option<String> {
        self.lines.next_line().await
    }
}

#[async_trait]
impl<L: LineSource> Prompter for TerminalPrompter<L> {
    async fn request_text(&mut self, spec: &PromptSpec) -> Option<String> {
        loop {
            print_prompt(spec);
            let input = if spec.hide_input {
                self.lines.next_hidden_line().await?
            } else {
                self.lines.next_line().await?
            };
            match spec.check(&input) {
                Ok(()) => return Some(input),
                Err(message) => eprintln!("  {message}"),
            }
        }
    }

    async fn request_choice(&mut self, options: &[String], spec: &PromptSpec) -> Option<String> {
        println!("{}", spec.prompt);
        for (i, option) in options.iter().enumerate() {
            println!("  {}) {}", i + 1, option);
        }
        loop {
            print!("Select 1-{} (empty to cancel): ", options.len());
            let _ = io::stdout().flush();

            let input = self.lines.next_line().await?;
            match parse_choice(&input, options.len()) {
                ChoiceInput::Dismissed => return None,
                ChoiceInput::Picked(i) => return Some(options[i].clone()),
                ChoiceInput::Invalid => {
                    eprintln!("  Please pick a number between 1 and {}.", options.len())
                }
            }
        }
    }
}

/// Info goes to stdout, errors to stderr.
#[derive(Debug, Default, Clone, Copy)]
pub struct TerminalNotifier;

impl Notifier for TerminalNotifier {
    fn show_info(&self, text: &str) {
        println!("{text}");
    }

    fn show_error(&self, text: &str) {
        eprintln!("Error: {text}");
    }
}
