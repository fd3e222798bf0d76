use std::io::{self, BufRead, Write};

use qlm_core::Response;
use qlm_experiment::{Input, Participant, Result, Screen};

/// Participant at a terminal: screens are printed, answers typed.
pub struct ConsoleParticipant<R: BufRead, W: Write> {
    input: R,
    output: W,
}

impl ConsoleParticipant<io::StdinLock<'static>, io::Stdout> {
    pub fn stdio() -> Self {
        Self::new(io::stdin().lock(), io::stdout())
    }
}

impl<R: BufRead, W: Write> ConsoleParticipant<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }

    fn read_line(&mut self) -> io::Result<String> {
        self.output.flush()?;
        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Err(io::Error::new(
                io::ErrorKind::UnexpectedEof,
                "participant input closed",
            ));
        }
        Ok(line.trim().to_string())
    }

    /// Re-prompts until the answer parses as a number in `range`.
    fn ask_number(&mut self, prompt: &str, range: std::ops::RangeInclusive<usize>) -> io::Result<usize> {
        loop {
            write!(self.output, "{prompt} ")?;
            let answer = self.read_line()?;
            match answer.parse::<usize>() {
                Ok(n) if range.contains(&n) => return Ok(n),
                _ => writeln!(
                    self.output,
                    "Please enter a number from {} to {}.",
                    range.start(),
                    range.end()
                )?,
            }
        }
    }
}

impl<R: BufRead, W: Write> Participant for ConsoleParticipant<R, W> {
    fn present(&mut self, screen: &Screen<'_>) -> Result<()> {
        writeln!(self.output)?;
        writeln!(self.output, "{}", screen.stimulus)?;
        if let Some(prompt) = screen.prompt.filter(|p| !p.is_empty()) {
            writeln!(self.output, "  {prompt}")?;
        }
        self.output.flush()?;
        Ok(())
    }

    fn respond(&mut self, screen: &Screen<'_>) -> Result<Response> {
        let response = match screen.input {
            Input::None => Response::Timeout,
            Input::Buttons(labels) => {
                for (i, label) in labels.iter().enumerate() {
                    writeln!(self.output, "  [{}] {label}", i + 1)?;
                }
                let choice = self.ask_number(">", 1..=labels.len().max(1))?;
                Response::Button(choice - 1)
            }
            Input::Slider { left, right } => {
                let value = self.ask_number(&format!("  {left} 0 ... 100 {right} >"), 0..=100)?;
                Response::Slider(value as u8)
            }
            Input::SliderPanel(items) => {
                let mut values = Vec::with_capacity(items.len());
                for item in items {
                    writeln!(self.output, "  {}", item.stimulus)?;
                    let value = self.ask_number(
                        &format!("    {} 0 ... 100 {} >", item.left, item.right),
                        0..=100,
                    )?;
                    values.push(value as u8);
                }
                Response::Sliders(values)
            }
        };
        Ok(response)
    }
}
