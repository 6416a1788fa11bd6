use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Paragraph},
};

use crate::game::{Board, CollisionType, GameOverReason, GameSnapshot, GameStatus};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Cell {
    Empty,
    Head,
    Body,
    Food,
}

/// Shown only when this session raised the best score
fn record_line(snapshot: &GameSnapshot) -> Option<Line<'static>> {
    snapshot.new_best.then(|| {
        Line::from(vec![Span::styled(
            "New record!",
            Style::default()
                .fg(Color::Green)
                .add_modifier(Modifier::BOLD),
        )])
    })
}

/// Lays the snapshot out as a row-major grid of cells
fn cell_grid(snapshot: &GameSnapshot) -> Vec<Cell> {
    let board = Board::new(snapshot.field_size);
    let mut cells = vec![Cell::Empty; board.cell_count()];

    if let Some(index) = snapshot.food.and_then(|food| board.index_of(food)) {
        cells[index] = Cell::Food;
    }
    for (i, part) in snapshot.snake.iter().enumerate() {
        if let Some(index) = board.index_of(*part) {
            cells[index] = if i == 0 { Cell::Head } else { Cell::Body };
        }
    }

    cells
}

pub struct Renderer;

impl Renderer {
    pub fn new() -> Self {
        Self
    }

    /// Draw one frame; `waiting` is set while the tick timer is not armed
    pub fn render(&self, frame: &mut Frame, snapshot: &GameSnapshot, waiting: bool) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3), // Header
                Constraint::Min(0),    // Game area
                Constraint::Length(3), // Footer
            ])
            .split(frame.area());

        frame.render_widget(self.render_stats(snapshot), chunks[0]);

        let game_area = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([
                Constraint::Percentage(10),
                Constraint::Percentage(80),
                Constraint::Percentage(10),
            ])
            .split(chunks[1])[1];

        match snapshot.status {
            GameStatus::Running => {
                frame.render_widget(self.render_grid(snapshot, waiting), game_area)
            }
            GameStatus::Over(reason) => {
                frame.render_widget(self.render_game_over(snapshot, reason), game_area)
            }
        }

        frame.render_widget(self.render_controls(), chunks[2]);
    }

    fn render_grid(&self, snapshot: &GameSnapshot, waiting: bool) -> Paragraph<'_> {
        let cells = cell_grid(snapshot);
        let lines: Vec<Line> = cells
            .chunks(snapshot.field_size.max(1))
            .map(|row| {
                let spans: Vec<Span> = row
                    .iter()
                    .map(|cell| match cell {
                        Cell::Head => Span::styled(
                            "■ ",
                            Style::default()
                                .fg(Color::Cyan)
                                .add_modifier(Modifier::BOLD),
                        ),
                        Cell::Body => Span::styled("□ ", Style::default().fg(Color::Green)),
                        Cell::Food => Span::styled(
                            "O ",
                            Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
                        ),
                        Cell::Empty => Span::styled(". ", Style::default().fg(Color::DarkGray)),
                    })
                    .collect();
                Line::from(spans)
            })
            .collect();

        let title = if waiting {
            " Snake - press Space to start "
        } else {
            " Snake "
        };

        Paragraph::new(lines)
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_type(BorderType::Double)
                    .border_style(Style::default().fg(Color::White))
                    .title(title),
            )
            .alignment(Alignment::Center)
    }

    fn render_stats(&self, snapshot: &GameSnapshot) -> Paragraph<'_> {
        let text = vec![Line::from(vec![
            Span::styled("Score: ", Style::default().fg(Color::Yellow)),
            Span::styled(
                snapshot.score.to_string(),
                Style::default()
                    .fg(Color::White)
                    .add_modifier(Modifier::BOLD),
            ),
            Span::raw("    "),
            Span::styled("Best: ", Style::default().fg(Color::Yellow)),
            Span::styled(
                snapshot.best_score.to_string(),
                Style::default().fg(Color::White),
            ),
            Span::raw("    "),
            Span::styled("Tick: ", Style::default().fg(Color::Yellow)),
            Span::styled(
                format!("{}ms", snapshot.tick_interval.as_millis()),
                Style::default().fg(Color::White),
            ),
        ])];

        Paragraph::new(text).alignment(Alignment::Center)
    }

    fn render_game_over(&self, snapshot: &GameSnapshot, reason: GameOverReason) -> Paragraph<'_> {
        let (headline, color) = match reason {
            GameOverReason::Collision(CollisionType::Wall) => ("GAME OVER - hit the wall", Color::Red),
            GameOverReason::Collision(CollisionType::SelfCollision) => {
                ("GAME OVER - bit your own tail", Color::Red)
            }
            GameOverReason::BoardFull => ("BOARD FULL - you win", Color::Green),
        };

        let mut text = vec![
            Line::from(""),
            Line::from(vec![Span::styled(
                headline,
                Style::default().fg(color).add_modifier(Modifier::BOLD),
            )]),
            Line::from(""),
            Line::from(vec![
                Span::styled("Final Score: ", Style::default().fg(Color::Yellow)),
                Span::styled(
                    snapshot.score.to_string(),
                    Style::default()
                        .fg(Color::White)
                        .add_modifier(Modifier::BOLD),
                ),
            ]),
        ];

        text.extend(record_line(snapshot));

        text.push(Line::from(""));
        text.push(Line::from(vec![
            Span::styled("Press ", Style::default().fg(Color::Gray)),
            Span::styled(
                "R",
                Style::default()
                    .fg(Color::Green)
                    .add_modifier(Modifier::BOLD),
            ),
            Span::styled(" to restart or ", Style::default().fg(Color::Gray)),
            Span::styled(
                "Q",
                Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
            ),
            Span::styled(" to quit", Style::default().fg(Color::Gray)),
        ]));

        Paragraph::new(text).alignment(Alignment::Center).block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(color)),
        )
    }

    fn render_controls(&self) -> Paragraph<'_> {
        let text = vec![Line::from(vec![
            Span::styled("↑↓←→", Style::default().fg(Color::Cyan)),
            Span::raw(" or "),
            Span::styled("WASD", Style::default().fg(Color::Cyan)),
            Span::raw(" to move | "),
            Span::styled("Space", Style::default().fg(Color::Cyan)),
            Span::raw(" to start | "),
            Span::styled("R", Style::default().fg(Color::Green)),
            Span::raw(" to restart | "),
            Span::styled("Q", Style::default().fg(Color::Red)),
            Span::raw(" to quit"),
        ])];

        Paragraph::new(text).alignment(Alignment::Center)
    }
}

impl Default for Renderer {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::Position;
    use ratatui::{Terminal, backend::TestBackend};
    use std::time::Duration;

    fn snapshot(status: GameStatus) -> GameSnapshot {
        GameSnapshot {
            field_size: 3,
            snake: vec![Position::new(1, 1), Position::new(0, 1)],
            food: Some(Position::new(2, 0)),
            score: 4,
            best_score: 4,
            steps: 12,
            new_best: false,
            status,
            tick_interval: Duration::from_millis(500),
        }
    }

    #[test]
    fn test_cell_grid_layout() {
        let cells = cell_grid(&snapshot(GameStatus::Running));

        assert_eq!(cells.len(), 9);
        assert_eq!(cells[2], Cell::Food);
        assert_eq!(cells[3], Cell::Body);
        assert_eq!(cells[4], Cell::Head);
        assert_eq!(cells.iter().filter(|c| **c == Cell::Empty).count(), 6);
    }

    #[test]
    fn test_tying_an_old_best_is_not_a_record() {
        let tied = snapshot(GameStatus::Over(GameOverReason::BoardFull));
        assert_eq!(tied.score, tied.best_score);
        assert!(record_line(&tied).is_none());

        let raised = GameSnapshot {
            new_best: true,
            ..tied
        };
        assert!(record_line(&raised).is_some());
    }

    #[test]
    fn test_render_does_not_panic() {
        let backend = TestBackend::new(60, 20);
        let mut terminal = Terminal::new(backend).unwrap();
        let renderer = Renderer::new();

        for status in [
            GameStatus::Running,
            GameStatus::Over(GameOverReason::Collision(CollisionType::Wall)),
            GameStatus::Over(GameOverReason::BoardFull),
        ] {
            let snapshot = snapshot(status);
            terminal
                .draw(|frame| renderer.render(frame, &snapshot, true))
                .unwrap();
        }
    }
}
