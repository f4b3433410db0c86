use anyhow::Result;
use tracing::{info, warn};

use crate::{
    actions::{available_actions, ActionContext},
    engine::{EngineBuilder, EngineSettings, RoundEngine},
    io::{Console, InputProvider},
    report::render_round,
    world::World,
};

/// How a session ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// The horizon was reached; the score is balance plus asset value.
    Completed { score: i64 },
    Bankrupt { balance: i64 },
    Exited,
}

/// One play-through: owns the world, the round engine and both
/// collaborators.
pub struct Session<C: Console, I: InputProvider> {
    world: World,
    engine: RoundEngine,
    console: C,
    input: I,
}

impl<C: Console, I: InputProvider> Session<C, I> {
    pub fn new(world: World, settings: EngineSettings, console: C, input: I) -> Self {
        Self::with_engine(world, EngineBuilder::standard(settings).build(), console, input)
    }

    pub fn with_engine(world: World, engine: RoundEngine, console: C, input: I) -> Self {
        Self {
            world,
            engine,
            console,
            input,
        }
    }

    pub fn world(&self) -> &World {
        &self.world
    }

    pub fn console(&self) -> &C {
        &self.console
    }

    pub fn input(&self) -> &I {
        &self.input
    }

    /// Play until the horizon, bankruptcy or exit. The input source is
    /// closed exactly once whichever way the game ends, errors included.
    pub fn run(&mut self) -> Result<Outcome> {
        info!(
            seed = self.engine.seed(),
            horizon = self.engine.config().horizon_years,
            balance = self.world.balance(),
            "session started"
        );
        let outcome = self.play();
        self.finish();
        outcome
    }

    fn play(&mut self) -> Result<Outcome> {
        self.introduce();

        while !self.world.is_exiting() {
            if !self.world.can_afford_crops() {
                warn!(balance = self.world.balance(), "player is bankrupt");
                self.console
                    .print("You are bankrupt. You will have to find a job.");
                self.console.new_line();
                return Ok(Outcome::Bankrupt {
                    balance: self.world.balance(),
                });
            }

            self.poll_input()?;
            if self.world.is_exiting() {
                break;
            }

            let report = self.engine.resolve_round(&mut self.world)?;
            render_round(&mut self.console, &report);
            self.input.wait_for_enter()?;

            if self.world.year() > self.engine.config().horizon_years {
                return Ok(Outcome::Completed {
                    score: self.evaluate_score(),
                });
            }
        }
        Ok(Outcome::Exited)
    }

    fn introduce(&mut self) {
        self.console
            .print("Welcome to Agricultural Capitalism Simulator!");
        self.console.new_line();
        self.console.print(&format!(
            "You have {} years to make maximum profit.",
            self.engine.config().horizon_years
        ));
        self.console.new_line();
        self.console.section_break();
        self.console.new_line();
    }

    /// The planting phase: keep offering the menu until the player picks
    /// something that ends the round.
    fn poll_input(&mut self) -> Result<()> {
        loop {
            let actions = available_actions(&self.world);
            self.console.print("What would you like to do?");
            self.console.new_line();
            for (index, action) in actions.iter().enumerate() {
                self.console
                    .print(&format!("{}) {}", index + 1, action.prompt()));
            }
            self.console.new_line();

            let action = self.input.next_action(&actions, &self.world)?;
            action.execute(&mut ActionContext {
                world: &mut self.world,
                console: &mut self.console,
                input: &mut self.input,
            })?;
            if action.ends_round() {
                return Ok(());
            }

            self.input.wait_for_enter()?;
            self.console.section_break();
            self.console.new_line();
        }
    }

    fn evaluate_score(&mut self) -> i64 {
        let score = self.world.settle_score();
        info!(score, "game complete");
        self.console.section_break();
        self.console.section_break();
        self.console.new_line();
        self.console.print(&format!("Final score: {score}"));
        self.console.new_line();
        self.console
            .print("Well played, capitalist! The rich get richer.");
        self.console.new_line();
        score
    }

    fn finish(&mut self) {
        self.console.print("Bye!");
        self.input.close();
    }
}
