use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Paragraph},
};

use crate::game::{Cell, CollisionType, GameEngine, Phase};
use crate::metrics::RunClock;
use crate::modes::Screen;
use crate::starter::Starter;

/// Everything one frame needs
pub struct SceneView<'a> {
    pub engine: &'a GameEngine,
    pub screen: Screen,
    pub starter: Starter,
    pub best: u32,
    pub tracking_best: bool,
    pub clock: &'a RunClock,
}

pub struct Renderer;

impl Renderer {
    pub fn new() -> Self {
        Self
    }

    pub fn render(&self, frame: &mut Frame, view: &SceneView<'_>) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3), // Header
                Constraint::Min(0),    // Body
                Constraint::Length(3), // Footer
            ])
            .split(frame.area());

        frame.render_widget(self.render_stats(view), chunks[0]);

        let body = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([
                Constraint::Percentage(10),
                Constraint::Percentage(80),
                Constraint::Percentage(10),
            ])
            .split(chunks[1])[1];

        let content = match view.screen {
            Screen::Menu => self.render_menu(view),
            Screen::Game => self.render_grid(view),
            Screen::GameOver => self.render_game_over(view),
        };
        frame.render_widget(content, body);

        frame.render_widget(self.render_controls(view.screen), chunks[2]);
    }

    fn render_grid(&self, view: &SceneView<'_>) -> Paragraph<'static> {
        let engine = view.engine;
        let grid = engine.grid();
        let snake = engine.snake();
        let skin = starter_color(view.starter);
        let mut lines = Vec::with_capacity(grid.height);

        for y in 0..grid.height {
            let mut spans = Vec::with_capacity(grid.width);

            for x in 0..grid.width {
                let cell = Cell::new(x as i32, y as i32);

                let span = if cell == snake.head() {
                    Span::styled("■ ", Style::default().fg(skin).add_modifier(Modifier::BOLD))
                } else if snake.occupies(cell) {
                    Span::styled("□ ", Style::default().fg(skin))
                } else if cell == engine.food() {
                    Span::styled(
                        "● ",
                        Style::default()
                            .fg(Color::Magenta)
                            .add_modifier(Modifier::BOLD),
                    )
                } else {
                    Span::styled(". ", Style::default().fg(Color::DarkGray))
                };

                spans.push(span);
            }

            lines.push(Line::from(spans));
        }

        let title = if engine.phase() == Phase::Paused {
            format!(" {} [PAUSED] ", view.starter.name())
        } else {
            format!(" {} ", view.starter.name())
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

    fn render_stats(&self, view: &SceneView<'_>) -> Paragraph<'static> {
        let best_style = if view.tracking_best {
            Style::default().fg(Color::White)
        } else {
            Style::default().fg(Color::DarkGray)
        };

        let text = vec![Line::from(vec![
            Span::styled("Score: ", Style::default().fg(Color::Yellow)),
            Span::styled(
                view.engine.score().to_string(),
                Style::default()
                    .fg(Color::White)
                    .add_modifier(Modifier::BOLD),
            ),
            Span::raw("    "),
            Span::styled("Best: ", Style::default().fg(Color::Yellow)),
            Span::styled(view.best.to_string(), best_style),
            Span::raw("    "),
            Span::styled("Time: ", Style::default().fg(Color::Yellow)),
            Span::styled(view.clock.format_time(), Style::default().fg(Color::White)),
        ])];

        Paragraph::new(text).alignment(Alignment::Center)
    }

    fn render_menu(&self, view: &SceneView<'_>) -> Paragraph<'static> {
        let mut text = vec![
            Line::from(""),
            Line::from(vec![Span::styled(
                "POKÉ-SNAKE",
                Style::default()
                    .fg(Color::Yellow)
                    .add_modifier(Modifier::BOLD),
            )]),
            Line::from(""),
            Line::from("Choose your Pokémon"),
            Line::from(""),
        ];

        let mut row = Vec::new();
        for (i, starter) in Starter::ALL.iter().enumerate() {
            let label = format!(" {}. {} #{:03} ", i + 1, starter.name(), starter.dex_number());
            let style = if *starter == view.starter {
                Style::default()
                    .fg(Color::Black)
                    .bg(starter_color(*starter))
                    .add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(starter_color(*starter))
            };
            row.push(Span::styled(label, style));
            row.push(Span::raw("  "));
        }
        text.push(Line::from(row));

        text.push(Line::from(""));
        text.push(Line::from(vec![
            Span::styled("Best score: ", Style::default().fg(Color::Gray)),
            Span::styled(
                view.best.to_string(),
                Style::default()
                    .fg(Color::White)
                    .add_modifier(Modifier::BOLD),
            ),
        ]));
        text.push(Line::from(""));
        text.push(Line::from(vec![
            Span::styled("Press ", Style::default().fg(Color::Gray)),
            Span::styled(
                "Enter",
                Style::default()
                    .fg(Color::Green)
                    .add_modifier(Modifier::BOLD),
            ),
            Span::styled(" to play", Style::default().fg(Color::Gray)),
        ]));

        Paragraph::new(text).alignment(Alignment::Center).block(
            Block::default()
                .borders(Borders::ALL)
                .border_type(BorderType::Rounded),
        )
    }

    fn render_game_over(&self, view: &SceneView<'_>) -> Paragraph<'static> {
        let reason = match view.engine.phase() {
            Phase::Over(CollisionType::Wall) => "Hit the wall",
            Phase::Over(CollisionType::SelfCollision) => "Bit its own tail",
            _ => "",
        };

        let text = vec![
            Line::from(""),
            Line::from(vec![Span::styled(
                "GAME OVER",
                Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
            )]),
            Line::from(Span::styled(reason, Style::default().fg(Color::Gray))),
            Line::from(""),
            Line::from(vec![
                Span::styled("Final Score: ", Style::default().fg(Color::Yellow)),
                Span::styled(
                    view.engine.score().to_string(),
                    Style::default()
                        .fg(Color::White)
                        .add_modifier(Modifier::BOLD),
                ),
            ]),
            Line::from(vec![
                Span::styled("Best: ", Style::default().fg(Color::Yellow)),
                Span::styled(view.best.to_string(), Style::default().fg(Color::White)),
            ]),
            Line::from(""),
            Line::from(vec![
                Span::styled("Press ", Style::default().fg(Color::Gray)),
                Span::styled(
                    "Enter",
                    Style::default()
                        .fg(Color::Green)
                        .add_modifier(Modifier::BOLD),
                ),
                Span::styled(" to play again, ", Style::default().fg(Color::Gray)),
                Span::styled("M", Style::default().fg(Color::Cyan)),
                Span::styled(" for the menu or ", Style::default().fg(Color::Gray)),
                Span::styled(
                    "Q",
                    Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
                ),
                Span::styled(" to quit", Style::default().fg(Color::Gray)),
            ]),
        ];

        Paragraph::new(text).alignment(Alignment::Center).block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::Red)),
        )
    }

    fn render_controls(&self, screen: Screen) -> Paragraph<'static> {
        let line = match screen {
            Screen::Menu => Line::from(vec![
                Span::styled("←→", Style::default().fg(Color::Cyan)),
                Span::raw(" or "),
                Span::styled("1-3", Style::default().fg(Color::Cyan)),
                Span::raw(" to choose | "),
                Span::styled("Q", Style::default().fg(Color::Red)),
                Span::raw(" to leave"),
            ]),
            Screen::Game => Line::from(vec![
                Span::styled("↑↓←→", Style::default().fg(Color::Cyan)),
                Span::raw(" or "),
                Span::styled("WASD", Style::default().fg(Color::Cyan)),
                Span::raw(" to move | "),
                Span::styled("P", Style::default().fg(Color::Cyan)),
                Span::raw(" pause | "),
                Span::styled("M", Style::default().fg(Color::Cyan)),
                Span::raw(" menu | "),
                Span::styled("Q", Style::default().fg(Color::Red)),
                Span::raw(" to leave"),
            ]),
            Screen::GameOver => Line::from(vec![
                Span::styled("R", Style::default().fg(Color::Green)),
                Span::raw(" restart | "),
                Span::styled("Q", Style::default().fg(Color::Red)),
                Span::raw(" to leave"),
            ]),
        };

        Paragraph::new(vec![line]).alignment(Alignment::Center)
    }
}

impl Default for Renderer {
    fn default() -> Self {
        Self::new()
    }
}

fn starter_color(starter: Starter) -> Color {
    match starter {
        Starter::Caterpie => Color::Green,
        Starter::Weedle => Color::Yellow,
        Starter::Wurmple => Color::Red,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::{Direction, GameConfig, Snake};
    use rand::{SeedableRng, rngs::StdRng};
    use ratatui::{Terminal, backend::TestBackend};

    fn draw(view: &SceneView<'_>) -> String {
        let mut terminal = Terminal::new(TestBackend::new(80, 30)).unwrap();
        let renderer = Renderer::new();
        terminal.draw(|frame| renderer.render(frame, view)).unwrap();
        terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(|cell| cell.symbol())
            .collect()
    }

    fn engine() -> GameEngine {
        let snake = Snake::new(Cell::new(4, 4), Direction::Right, 3);
        GameEngine::with_layout(
            GameConfig::small(),
            StdRng::seed_from_u64(1),
            snake,
            Direction::Right,
            Cell::new(6, 2),
        )
        .unwrap()
    }

    #[test]
    fn test_menu_lists_starters() {
        let engine = engine();
        let clock = RunClock::new();
        let out = draw(&SceneView {
            engine: &engine,
            screen: Screen::Menu,
            starter: Starter::Weedle,
            best: 14,
            tracking_best: true,
            clock: &clock,
        });

        assert!(out.contains("Caterpie"));
        assert!(out.contains("Weedle"));
        assert!(out.contains("Wurmple"));
        assert!(out.contains("Best"));
    }

    #[test]
    fn test_grid_shows_snake_and_food() {
        let engine = engine();
        let clock = RunClock::new();
        let out = draw(&SceneView {
            engine: &engine,
            screen: Screen::Game,
            starter: Starter::Caterpie,
            best: 0,
            tracking_best: true,
            clock: &clock,
        });

        assert!(out.contains("Score"));
        assert_eq!(out.matches('■').count(), 1);
        assert_eq!(out.matches('□').count(), 2);
        assert_eq!(out.matches('●').count(), 1);
    }

    #[test]
    fn test_paused_title() {
        let mut engine = engine();
        engine.pause();
        let clock = RunClock::new();
        let out = draw(&SceneView {
            engine: &engine,
            screen: Screen::Game,
            starter: Starter::Caterpie,
            best: 0,
            tracking_best: true,
            clock: &clock,
        });

        assert!(out.contains("PAUSED"));
    }

    #[test]
    fn test_game_over_screen() {
        let snake = Snake::new(Cell::new(0, 4), Direction::Left, 2);
        let mut engine = GameEngine::with_layout(
            GameConfig::small(),
            StdRng::seed_from_u64(1),
            snake,
            Direction::Left,
            Cell::new(6, 2),
        )
        .unwrap();
        engine.tick();
        let clock = RunClock::new();

        let out = draw(&SceneView {
            engine: &engine,
            screen: Screen::GameOver,
            starter: Starter::Caterpie,
            best: 3,
            tracking_best: true,
            clock: &clock,
        });

        assert!(out.contains("GAME OVER"));
        assert!(out.contains("Hit the wall"));
    }
}
