use crate::analysis::{FinanceTracker, Period};
use crate::db::FinanceStore;
use crate::error::{FinanceError, FinanceResult};
use crate::models::{BudgetUsageRecord, TrendPoint};
use crossterm::{
    event::{self, Event, KeyCode},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{
    prelude::{Alignment, Color, Constraint, Direction, Layout, Rect, Style},
    style::Modifier,
    text::{Line, Span},
    widgets::{BarChart, Block, Borders, Paragraph},
};
use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;
use std::io;

/// Width of the textual usage bar next to each category.
const USAGE_BAR_WIDTH: usize = 20;

pub struct DashboardData {
    pub title: String,
    pub usage: Vec<BudgetUsageRecord>,
    pub trend: Vec<TrendPoint>,
}

impl DashboardData {
    pub fn load<S: FinanceStore + ?Sized>(
        tracker: &FinanceTracker<'_, S>,
        period: Period,
        trend_months: u32,
    ) -> FinanceResult<Self> {
        let usage = tracker.calculate_budget_usage(period)?;
        // Oldest month on the left of the chart.
        let mut trend = tracker.get_spending_trend(trend_months)?;
        trend.reverse();
        Ok(Self {
            title: format!("Budget usage: {}", period.describe()),
            usage,
            trend,
        })
    }

    fn total_spent(&self) -> Decimal {
        self.usage.iter().map(|record| record.spent).sum()
    }

    fn total_budget(&self) -> Decimal {
        self.usage.iter().map(|record| record.budget).sum()
    }
}

pub fn run_report<S: FinanceStore + ?Sized>(
    tracker: &FinanceTracker<'_, S>,
    period: Period,
    trend_months: u32,
) -> FinanceResult<()> {
    let data = DashboardData::load(tracker, period, trend_months)?;
    render_dashboard(&data)
}

fn render_dashboard(data: &DashboardData) -> FinanceResult<()> {
    enable_raw_mode().map_err(|e| FinanceError::Io(format!("Failed to enable raw mode: {}", e)))?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)
        .map_err(|e| FinanceError::Io(format!("Failed to enter alternate screen: {}", e)))?;

    let result = (|| {
        let backend = ratatui::backend::CrosstermBackend::new(stdout);
        let mut terminal = ratatui::Terminal::new(backend)
            .map_err(|e| FinanceError::Io(format!("Failed to initialize terminal: {}", e)))?;

        loop {
            terminal
                .draw(|frame| draw_dashboard(frame, data))
                .map_err(|e| FinanceError::Io(format!("Failed to draw terminal UI: {}", e)))?;

            if event::poll(std::time::Duration::from_millis(250))
                .map_err(|e| FinanceError::Io(format!("Failed to poll input: {}", e)))?
            {
                match event::read().map_err(|e| FinanceError::Io(format!("Failed to read input: {}", e)))? {
                    Event::Key(key) if key.code == KeyCode::Char('q') => break,
                    Event::Key(key) if key.code == KeyCode::Esc => break,
                    _ => {}
                }
            }
        }

        Ok(())
    })();

    disable_raw_mode().map_err(|e| FinanceError::Io(format!("Failed to disable raw mode: {}", e)))?;
    let mut stdout = io::stdout();
    execute!(stdout, LeaveAlternateScreen)
        .map_err(|e| FinanceError::Io(format!("Failed to leave alternate screen: {}", e)))?;

    result
}

pub fn draw_dashboard(frame: &mut ratatui::Frame, data: &DashboardData) {
    let layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Percentage(60), Constraint::Percentage(40)])
        .split(frame.area());

    render_usage_table(frame, layout[0], data);
    render_trend_chart(frame, layout[1], data);
}

fn usage_color(record: &BudgetUsageRecord) -> Color {
    if record.is_over_budget() {
        Color::Red
    } else if record.percentage >= Decimal::from(80) {
        Color::Yellow
    } else {
        Color::Green
    }
}

fn usage_bar(percentage: Decimal) -> String {
    let ratio = (percentage / Decimal::ONE_HUNDRED).min(Decimal::ONE);
    let filled = (ratio * Decimal::from(USAGE_BAR_WIDTH as u64))
        .round()
        .to_usize()
        .unwrap_or(0);
    format!("{}{}", "█".repeat(filled), "░".repeat(USAGE_BAR_WIDTH - filled))
}

fn render_usage_table(frame: &mut ratatui::Frame, area: Rect, data: &DashboardData) {
    let block = Block::default()
        .title(Line::from(vec![Span::styled(
            format!("{}  (press q to exit)", data.title),
            Style::default().fg(Color::White),
        )]))
        .borders(Borders::ALL);
    let inner = block.inner(area);
    frame.render_widget(block, area);

    if data.usage.is_empty() {
        let empty = Paragraph::new("No categories defined").alignment(Alignment::Center);
        frame.render_widget(empty, inner);
        return;
    }

    let bold = Style::default().fg(Color::White).add_modifier(Modifier::BOLD);
    let mut lines = vec![Line::from(Span::styled(
        format!(
            "{:<16}{:>12}{:>12}{:>12}{:>9}  {}",
            "Category", "Spent", "Budget", "Left", "Used", "Usage"
        ),
        bold,
    ))];

    for record in &data.usage {
        let color = usage_color(record);
        lines.push(Line::from(vec![
            Span::raw(format!(
                "{:<16}{:>12}{:>12}{:>12}",
                record.category,
                record.spent.round_dp(2),
                record.budget.round_dp(2),
                record.remaining().round_dp(2)
            )),
            Span::styled(
                format!("{:>8}%  ", record.percentage.round_dp(1)),
                Style::default().fg(color),
            ),
            Span::styled(usage_bar(record.percentage), Style::default().fg(color)),
        ]));
    }

    lines.push(Line::from(Span::styled(
        format!(
            "{:<16}{:>12}{:>12}{:>12}",
            "Total",
            data.total_spent().round_dp(2),
            data.total_budget().round_dp(2),
            (data.total_budget() - data.total_spent()).round_dp(2)
        ),
        bold,
    )));

    frame.render_widget(Paragraph::new(lines).alignment(Alignment::Left), inner);
}

fn render_trend_chart(frame: &mut ratatui::Frame, area: Rect, data: &DashboardData) {
    let block = Block::default().title("Monthly Spending").borders(Borders::ALL);

    if data.trend.is_empty() {
        let inner = block.inner(area);
        frame.render_widget(block, area);
        let empty = Paragraph::new("No months requested").alignment(Alignment::Center);
        frame.render_widget(empty, inner);
        return;
    }

    let bars: Vec<(&str, u64)> = data
        .trend
        .iter()
        .map(|point| {
            let value = point.total_spent.round().to_u64().unwrap_or(0);
            (point.month_label.as_str(), value)
        })
        .collect();

    let chart = BarChart::default()
        .block(block)
        .data(bars.as_slice())
        .bar_width(8)
        .bar_gap(2)
        .bar_style(Style::default().fg(Color::Cyan))
        .value_style(Style::default().fg(Color::Black).bg(Color::Cyan));

    frame.render_widget(chart, area);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::test_support::{category, date, spend};
    use crate::db::connection::establish_test_connection;
    use ratatui::{Terminal, backend::TestBackend};

    fn screen_text(terminal: &Terminal<TestBackend>) -> String {
        terminal
            .backend()
            .buffer()
            .content
            .iter()
            .map(|cell| cell.symbol())
            .collect()
    }

    #[test]
    fn test_usage_bar_is_clamped() {
        assert_eq!(usage_bar(Decimal::ZERO), "░".repeat(USAGE_BAR_WIDTH));
        assert_eq!(usage_bar(Decimal::from(50)).chars().filter(|c| *c == '█').count(), 10);
        assert_eq!(usage_bar(Decimal::from(250)), "█".repeat(USAGE_BAR_WIDTH));
    }

    #[test]
    fn test_dashboard_load_orders_trend_oldest_first() {
        let conn = establish_test_connection().unwrap();
        category(&conn, "Dining", "20");
        spend(&conn, date(2025, 5, 4), "Dining", "35.50");
        let tracker = FinanceTracker::with_clock(&conn, || date(2025, 5, 15));

        let data = DashboardData::load(&tracker, Period::CurrentMonth, 2).unwrap();
        assert_eq!(data.title, "Budget usage: This month");
        assert_eq!(data.trend[0].month_label, "Apr 2025");
        assert_eq!(data.trend[1].month_label, "May 2025");
        assert_eq!(data.trend[1].total_spent, Decimal::new(3550, 2));
        assert_eq!(data.total_spent(), Decimal::new(3550, 2));
    }

    #[test]
    fn test_draw_dashboard_renders_categories() {
        let conn = establish_test_connection().unwrap();
        category(&conn, "Dining", "20");
        category(&conn, "Groceries", "500");
        spend(&conn, date(2025, 3, 4), "Dining", "35.50");
        let tracker = FinanceTracker::with_clock(&conn, || date(2025, 3, 15));
        let data = DashboardData::load(&tracker, Period::CurrentMonth, 3).unwrap();

        let mut terminal = Terminal::new(TestBackend::new(100, 30)).unwrap();
        terminal.draw(|frame| draw_dashboard(frame, &data)).unwrap();

        let text = screen_text(&terminal);
        assert!(text.contains("Dining"));
        assert!(text.contains("Groceries"));
        assert!(text.contains("177.5%"));
        assert!(text.contains("-15.50"));
        assert!(text.contains("Monthly Spending"));
    }
}
