use anyhow::{Context, Result};
use crossterm::{
    event::{Event, EventStream, KeyEventKind},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use futures::StreamExt;
use ratatui::{Terminal, backend::CrosstermBackend};
use std::io::{Stderr, stderr};
use std::time::Duration;
use tokio::time::{Instant, Interval, MissedTickBehavior, interval, interval_at};

use crate::game::{CommandOutcome, GameCommand, GameConfig, GameEngine};
use crate::input::{InputHandler, KeyAction};
use crate::render::Renderer;
use crate::store::ScoreStore;

/// Interactive terminal session
///
/// Owns the engine and the tick timer. Everything runs on one task: terminal
/// events, ticks and frames are taken one at a time from a `select!`.
pub struct HumanMode<S: ScoreStore> {
    engine: GameEngine<S>,
    renderer: Renderer,
    input_handler: InputHandler,
    /// `None` while waiting for a resume command or after game over
    tick_timer: Option<Interval>,
    should_quit: bool,
}

impl<S: ScoreStore> HumanMode<S> {
    pub fn new(config: GameConfig, store: S) -> Result<Self> {
        let engine = GameEngine::new(config, store).context("Invalid game configuration")?;

        Ok(Self {
            engine,
            renderer: Renderer::new(),
            input_handler: InputHandler::new(),
            tick_timer: None,
            should_quit: false,
        })
    }

    pub async fn run(&mut self) -> Result<()> {
        // Setup terminal
        enable_raw_mode().context("Failed to enable raw mode")?;
        let mut stderr = stderr();
        execute!(stderr, EnterAlternateScreen).context("Failed to enter alternate screen")?;
        let backend = CrosstermBackend::new(stderr);
        let mut terminal = Terminal::new(backend).context("Failed to create terminal")?;
        terminal.hide_cursor().context("Failed to hide cursor")?;
        terminal.clear().context("Failed to clear terminal")?;

        if self.engine.config().autostart {
            self.arm_timer();
        }

        // Run game loop with cleanup
        let result = self.run_game_loop(&mut terminal).await;

        // Cleanup terminal
        self.cleanup_terminal(&mut terminal)?;

        result
    }

    async fn run_game_loop(
        &mut self,
        terminal: &mut Terminal<CrosstermBackend<Stderr>>,
    ) -> Result<()> {
        let mut event_stream = EventStream::new();

        // Render at 30 FPS (33ms per frame)
        let mut render_timer = interval(Duration::from_millis(33));

        loop {
            tokio::select! {
                // Handle terminal events
                maybe_event = event_stream.next() => {
                    match maybe_event {
                        Some(Ok(event)) => self.handle_event(event),
                        Some(Err(err)) => return Err(err).context("Failed to read terminal event"),
                        None => self.should_quit = true,
                    }
                }

                // Game logic tick
                _ = next_tick(&mut self.tick_timer) => {
                    self.update_game();
                }

                // Render frame
                _ = render_timer.tick() => {
                    let snapshot = self.engine.snapshot();
                    let waiting = self.tick_timer.is_none();
                    terminal.draw(|frame| {
                        self.renderer.render(frame, &snapshot, waiting);
                    }).context("Failed to draw frame")?;
                }

                // Handle Ctrl+C
                _ = tokio::signal::ctrl_c() => {
                    self.should_quit = true;
                }
            }

            if self.should_quit {
                break;
            }
        }

        Ok(())
    }

    fn handle_event(&mut self, event: Event) {
        if let Event::Key(key) = event {
            // Only process key press events, not release
            if key.kind != KeyEventKind::Press {
                return;
            }

            match self.input_handler.handle_key_event(key) {
                KeyAction::Command(command) => self.handle_command(command),
                KeyAction::Quit => self.should_quit = true,
                KeyAction::None => {}
            }
        }
    }

    fn handle_command(&mut self, command: GameCommand) {
        match self.engine.apply(command) {
            CommandOutcome::Restarted => self.arm_timer(),
            CommandOutcome::ResumeRequested => {
                if self.tick_timer.is_none() {
                    self.arm_timer();
                }
            }
            CommandOutcome::Accepted | CommandOutcome::Ignored => {}
        }
    }

    fn update_game(&mut self) {
        let result = self.engine.step();

        if result.terminated {
            self.tick_timer = None;
        } else if result.interval_changed {
            self.arm_timer();
        }
    }

    /// Replace any running timer with one at the engine's current interval
    fn arm_timer(&mut self) {
        let period = self.engine.tick_interval();
        let mut timer = interval_at(Instant::now() + period, period);
        timer.set_missed_tick_behavior(MissedTickBehavior::Delay);
        self.tick_timer = Some(timer);
    }

    fn cleanup_terminal(
        &mut self,
        terminal: &mut Terminal<CrosstermBackend<Stderr>>,
    ) -> Result<()> {
        disable_raw_mode().context("Failed to disable raw mode")?;
        execute!(terminal.backend_mut(), LeaveAlternateScreen)
            .context("Failed to leave alternate screen")?;
        terminal.show_cursor().context("Failed to show cursor")?;
        Ok(())
    }
}

/// Resolves on the next tick, or never while the timer is disarmed
async fn next_tick(timer: &mut Option<Interval>) {
    match timer {
        Some(timer) => {
            timer.tick().await;
        }
        None => std::future::pending::<()>().await,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::{Direction, GameStatus, Position};
    use crate::store::MemoryScoreStore;

    fn mode(config: GameConfig) -> HumanMode<MemoryScoreStore> {
        let config = GameConfig {
            seed: Some(5),
            ..config
        };
        HumanMode::new(config, MemoryScoreStore::new()).unwrap()
    }

    #[test]
    fn test_game_initialization() {
        let mode = mode(GameConfig::default());
        assert!(mode.engine.is_running());
        assert_eq!(mode.engine.score(), 0);
        assert!(mode.tick_timer.is_none());
    }

    #[test]
    fn test_invalid_config_is_reported() {
        assert!(HumanMode::new(GameConfig::new(0), MemoryScoreStore::new()).is_err());
    }

    #[tokio::test]
    async fn test_resume_arms_timer_once() {
        let mut mode = mode(GameConfig::default());

        mode.handle_command(GameCommand::Resume);
        assert!(mode.tick_timer.is_some());

        mode.handle_command(GameCommand::Resume);
        assert!(mode.tick_timer.is_some());
    }

    #[tokio::test]
    async fn test_game_over_disarms_timer() {
        let mut mode = mode(GameConfig::default());
        mode.handle_command(GameCommand::Resume);

        // Heading right from the centre ends at the right wall.
        while mode.engine.is_running() {
            mode.update_game();
        }

        assert!(matches!(mode.engine.status(), GameStatus::Over(_)));
        assert!(mode.tick_timer.is_none());

        mode.handle_command(GameCommand::Resume);
        assert!(mode.tick_timer.is_none());
    }

    #[tokio::test]
    async fn test_restart_rearms_timer() {
        let mut mode = mode(GameConfig::default());
        while mode.engine.is_running() {
            mode.update_game();
        }
        assert!(mode.tick_timer.is_none());

        mode.handle_command(GameCommand::Restart);

        assert!(mode.engine.is_running());
        assert_eq!(mode.engine.score(), 0);
        assert!(mode.tick_timer.is_some());
    }

    #[tokio::test]
    async fn test_turn_reaches_engine() {
        let mut mode = mode(GameConfig::default());

        mode.handle_command(GameCommand::Turn(Direction::Down));
        mode.update_game();

        assert_eq!(mode.engine.state().snake.head(), Position::new(5, 6));
    }
}
