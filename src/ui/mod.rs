pub mod detail_popup;
pub mod movie_card;
pub mod movie_list;
pub mod search_input;
pub mod status_bar;
pub mod trending;

use ratatui::Frame;
use ratatui::layout::{Constraint, Layout};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;

use crate::app::App;

use detail_popup::DetailPopup;
use movie_list::MovieListView;
use search_input::SearchInput;
use status_bar::StatusBar;
use trending::TrendingPanel;

pub fn draw(frame: &mut Frame, app: &App) {
    let area = frame.area();

    // Layout: heading + search box + optional trending + results + status bar
    let trending_height = TrendingPanel::height(&app.trending);
    let [heading_area, input_area, trending_area, main_area, status_area] = Layout::vertical([
        Constraint::Length(1),
        Constraint::Length(3),
        Constraint::Length(trending_height),
        Constraint::Min(1),
        Constraint::Length(1),
    ])
    .areas(area);

    let heading = Line::from(vec![
        Span::styled("Find ", Style::default().fg(Color::White)),
        Span::styled(
            "Movies",
            Style::default()
                .fg(Color::Magenta)
                .add_modifier(Modifier::BOLD),
        ),
        Span::styled(
            " You'll Enjoy Without the Hassle",
            Style::default().fg(Color::White),
        ),
    ]);
    frame.render_widget(Paragraph::new(heading).centered(), heading_area);
    frame.render_widget(SearchInput::new(&app.search.input), input_area);

    if !app.trending.is_empty() {
        frame.render_widget(TrendingPanel::new(&app.trending), trending_area);
    }

    frame.render_widget(
        MovieListView::new("All Movies", &app.search).spinner_frame(app.spinner_frame),
        main_area,
    );
    frame.render_widget(StatusBar::new(app), status_area);

    // Detail popup overlay (renders on top of everything)
    if app.detail_open
        && let Some(movie) = app.search.selected_movie()
    {
        frame.render_widget(DetailPopup::new(movie, &app.config.image_base_url), area);
    }
}
