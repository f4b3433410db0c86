//! Collaborators at the edge of a session: where text goes and where the
//! player's decisions come from.

use std::collections::VecDeque;
use std::io::{BufRead, Write};

use anyhow::{bail, Context, Result};
use tracing::warn;

use crate::actions::Action;
use crate::world::{Crop, CropId, Field, FieldId, World};

const SECTION_BREAK: &str = "========================================";

pub trait Console {
    fn print(&mut self, line: &str);
    fn new_line(&mut self);
    fn section_break(&mut self);
}

/// Source of player decisions. Implementations validate raw input and only
/// ever hand back one of the options they were offered.
pub trait InputProvider {
    fn next_action(&mut self, actions: &[Action], world: &World) -> Result<Action>;
    fn field_to_plant(&mut self, empty_fields: &[&Field]) -> Result<FieldId>;
    fn crop_to_plant(
        &mut self,
        field: &Field,
        balance: i64,
        crops: &[(CropId, &Crop)],
    ) -> Result<CropId>;
    /// A quantity in `0..=max_volume`; zero cancels the purchase.
    fn crop_quantity(&mut self, max_volume: u32) -> Result<u32>;
    /// `None` returns to the menu.
    fn field_to_buy(&mut self, available: &[Field]) -> Result<Option<FieldId>>;
    fn wait_for_enter(&mut self) -> Result<()>;
    fn close(&mut self);
}

/// Console writing to any `Write`, normally stdout.
pub struct TerminalConsole<W: Write> {
    out: W,
}

impl<W: Write> TerminalConsole<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    fn write_line(&mut self, line: &str) {
        if let Err(err) = writeln!(self.out, "{line}") {
            warn!(%err, "console write failed");
        }
    }
}

impl<W: Write> Console for TerminalConsole<W> {
    fn print(&mut self, line: &str) {
        self.write_line(line);
    }

    fn new_line(&mut self) {
        self.write_line("");
    }

    fn section_break(&mut self) {
        self.write_line(SECTION_BREAK);
    }
}

/// Console that keeps every line in memory.
#[derive(Debug, Default)]
pub struct BufferConsole {
    lines: Vec<String>,
}

impl BufferConsole {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    pub fn contains(&self, needle: &str) -> bool {
        self.lines.iter().any(|line| line.contains(needle))
    }

    pub fn transcript(&self) -> String {
        self.lines.join("\n")
    }
}

impl Console for BufferConsole {
    fn print(&mut self, line: &str) {
        self.lines.push(line.to_string());
    }

    fn new_line(&mut self) {
        self.lines.push(String::new());
    }

    fn section_break(&mut self) {
        self.lines.push(SECTION_BREAK.to_string());
    }
}

/// Line-oriented keyboard input. Malformed or out-of-range entries are
/// rejected with a hint and asked for again.
pub struct TerminalInput<R: BufRead, W: Write> {
    input: R,
    out: W,
    buffer: String,
}

impl<R: BufRead, W: Write> TerminalInput<R, W> {
    pub fn new(input: R, out: W) -> Self {
        Self {
            input,
            out,
            buffer: String::new(),
        }
    }

    fn read_line(&mut self) -> Result<&str> {
        self.out.flush().context("failed to flush prompt")?;
        self.buffer.clear();
        let read = self
            .input
            .read_line(&mut self.buffer)
            .context("failed to read player input")?;
        if read == 0 {
            bail!("player input closed");
        }
        Ok(self.buffer.trim())
    }

    /// A number in `min..=max`.
    fn read_choice(&mut self, min: usize, max: usize) -> Result<usize> {
        loop {
            let parsed = self.read_line()?.parse::<usize>();
            match parsed {
                Ok(value) if (min..=max).contains(&value) => return Ok(value),
                _ => writeln!(self.out, "Please enter a number between {min} and {max}.")
                    .context("failed to write prompt")?,
            }
        }
    }
}

impl<R: BufRead, W: Write> InputProvider for TerminalInput<R, W> {
    fn next_action(&mut self, actions: &[Action], _world: &World) -> Result<Action> {
        let choice = self.read_choice(1, actions.len())?;
        Ok(actions[choice - 1])
    }

    fn field_to_plant(&mut self, empty_fields: &[&Field]) -> Result<FieldId> {
        let choice = self.read_choice(1, empty_fields.len())?;
        Ok(empty_fields[choice - 1].id())
    }

    fn crop_to_plant(
        &mut self,
        _field: &Field,
        _balance: i64,
        crops: &[(CropId, &Crop)],
    ) -> Result<CropId> {
        let choice = self.read_choice(1, crops.len())?;
        Ok(crops[choice - 1].0)
    }

    fn crop_quantity(&mut self, max_volume: u32) -> Result<u32> {
        let choice = self.read_choice(0, max_volume as usize)?;
        Ok(u32::try_from(choice)?)
    }

    fn field_to_buy(&mut self, available: &[Field]) -> Result<Option<FieldId>> {
        let choice = self.read_choice(1, available.len() + 1)?;
        Ok(available.get(choice - 1).map(Field::id))
    }

    fn wait_for_enter(&mut self) -> Result<()> {
        writeln!(self.out, "Press enter to continue.").context("failed to write prompt")?;
        self.read_line()?;
        Ok(())
    }

    fn close(&mut self) {
        if let Err(err) = self.out.flush() {
            warn!(%err, "failed to flush output on close");
        }
    }
}

/// One pre-recorded decision for [`ScriptedInput`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    Act(Action),
    /// Zero-based position in the list the player is shown.
    Pick(usize),
    Quantity(u32),
    Cancel,
}

/// Plays back a fixed list of decisions, then optionally repeats one action
/// forever. Fails as soon as a step does not fit the question asked.
#[derive(Debug, Default)]
pub struct ScriptedInput {
    steps: VecDeque<Step>,
    fallback: Option<Action>,
    polls: usize,
    acknowledgments: usize,
    closes: usize,
}

impl ScriptedInput {
    pub fn new(steps: impl IntoIterator<Item = Step>) -> Self {
        Self {
            steps: steps.into_iter().collect(),
            ..Self::default()
        }
    }

    pub fn then_repeat(mut self, action: Action) -> Self {
        self.fallback = Some(action);
        self
    }

    /// Questions asked so far, of any kind.
    pub fn polls(&self) -> usize {
        self.polls
    }

    pub fn acknowledgments(&self) -> usize {
        self.acknowledgments
    }

    pub fn closes(&self) -> usize {
        self.closes
    }

    pub fn remaining(&self) -> usize {
        self.steps.len()
    }

    fn next_step(&mut self, question: &str) -> Result<Step> {
        self.polls += 1;
        self.steps
            .pop_front()
            .with_context(|| format!("script exhausted when asked for {question}"))
    }

    fn pick(&mut self, question: &str, len: usize) -> Result<usize> {
        match self.next_step(question)? {
            Step::Pick(index) if index < len => Ok(index),
            step => bail!("{step:?} does not answer {question} with {len} options"),
        }
    }
}

impl InputProvider for ScriptedInput {
    fn next_action(&mut self, actions: &[Action], _world: &World) -> Result<Action> {
        if self.steps.is_empty() {
            if let Some(action) = self.fallback.filter(|action| actions.contains(action)) {
                self.polls += 1;
                return Ok(action);
            }
        }
        match self.next_step("an action")? {
            Step::Act(action) if actions.contains(&action) => Ok(action),
            step => bail!("{step:?} is not one of the offered actions {actions:?}"),
        }
    }

    fn field_to_plant(&mut self, empty_fields: &[&Field]) -> Result<FieldId> {
        let index = self.pick("a field to plant", empty_fields.len())?;
        Ok(empty_fields[index].id())
    }

    fn crop_to_plant(
        &mut self,
        _field: &Field,
        _balance: i64,
        crops: &[(CropId, &Crop)],
    ) -> Result<CropId> {
        let index = self.pick("a crop", crops.len())?;
        Ok(crops[index].0)
    }

    fn crop_quantity(&mut self, max_volume: u32) -> Result<u32> {
        match self.next_step("a quantity")? {
            Step::Quantity(quantity) if quantity <= max_volume => Ok(quantity),
            step => bail!("{step:?} is not a quantity within 0..={max_volume}"),
        }
    }

    fn field_to_buy(&mut self, available: &[Field]) -> Result<Option<FieldId>> {
        match self.next_step("a field to buy")? {
            Step::Cancel => Ok(None),
            Step::Pick(index) if index < available.len() => Ok(Some(available[index].id())),
            step => bail!("{step:?} does not pick one of {} fields", available.len()),
        }
    }

    fn wait_for_enter(&mut self) -> Result<()> {
        self.acknowledgments += 1;
        Ok(())
    }

    fn close(&mut self) {
        self.closes += 1;
    }
}
