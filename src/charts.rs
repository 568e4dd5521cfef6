//! Terminal charts over the report outputs. Nothing here recomputes totals;
//! it only scales what the reports hand over.

use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Bar, BarChart, BarGroup, Block, Borders, Paragraph},
    Frame,
};

use crate::fmt::{compact, money_in, percent};
use crate::models::Category;
use crate::reports::{AuthorReport, EvolutionReport, IncomeReport, SpendingReport};
use crate::tui::{
    ReportView, EXPENSE_STYLE, FOOTER_STYLE, HEADER_STYLE, INCOME_STYLE, PERSONAL_STYLE,
    SHARED_STYLE,
};

const MONTH_LABELS: [&str; 12] = [
    "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
];

#[derive(Debug, Clone, PartialEq)]
pub struct Slice {
    pub label: String,
    pub value: f64,
    pub pct: f64,
    pub style: Style,
}

#[derive(Debug, Clone, PartialEq)]
pub struct FlowGroup {
    pub label: String,
    pub income: f64,
    pub expense: f64,
}

impl FlowGroup {
    pub fn net(&self) -> f64 {
        self.income - self.expense
    }
}

/// Balance bars are drawn by magnitude; the color carries the sign.
pub fn balance_style(net: f64) -> Style {
    if net < 0.0 {
        EXPENSE_STYLE
    } else {
        INCOME_STYLE
    }
}

/// Both categories, as shares of total spending. Zero rows are kept so an
/// empty period still draws.
pub fn category_slices(report: &SpendingReport) -> Vec<Slice> {
    Category::ALL
        .iter()
        .map(|&category| Slice {
            label: category.label().to_string(),
            value: report.breakdown.get(category),
            pct: report.share_of_expenses(category),
            style: match category {
                Category::Shared => SHARED_STYLE,
                Category::Personal => PERSONAL_STYLE,
            },
        })
        .collect()
}

/// Spending per category as a share of income, plus whatever income is left.
pub fn income_use_slices(report: &SpendingReport) -> Vec<Slice> {
    let mut slices: Vec<Slice> = Category::ALL
        .iter()
        .map(|&category| Slice {
            label: category.label().to_string(),
            value: report.breakdown.get(category),
            pct: report.share_of_income(category),
            style: EXPENSE_STYLE,
        })
        .collect();
    let remaining = report.remaining();
    if remaining > 0.0 {
        slices.push(Slice {
            label: "Remaining".to_string(),
            value: remaining,
            pct: percent(remaining, report.income),
            style: INCOME_STYLE,
        });
    }
    slices
}

pub fn income_slices(report: &IncomeReport) -> Vec<Slice> {
    report
        .by_author
        .iter()
        .map(|(author, &value)| Slice {
            label: author.clone(),
            value,
            pct: report.share(author),
            style: INCOME_STYLE,
        })
        .collect()
}

pub fn evolution_groups(report: &EvolutionReport) -> Vec<FlowGroup> {
    report
        .months
        .iter()
        .zip(MONTH_LABELS)
        .map(|(m, label)| FlowGroup {
            label: label.to_string(),
            income: m.income,
            expense: m.expense,
        })
        .collect()
}

pub fn author_groups(report: &AuthorReport) -> Vec<FlowGroup> {
    report
        .authors
        .iter()
        .map(|(author, totals)| FlowGroup {
            label: author.clone(),
            income: totals.income,
            expense: totals.expense,
        })
        .collect()
}

/// Round y-axis tick values (top and mid) covering `max_val`.
pub fn axis_ticks(max_val: f64) -> (f64, f64) {
    let mut step = 10.0;
    loop {
        for mult in [1.0, 2.5, 5.0] {
            let top = step * mult;
            if top >= max_val {
                return (top, top / 2.0);
            }
        }
        step *= 10.0;
        if !step.is_finite() {
            return (max_val, max_val / 2.0);
        }
    }
}

fn bar_height(val: f64) -> u64 {
    val.max(0.0).round() as u64
}

// ---------------------------------------------------------------------------
// Views
// ---------------------------------------------------------------------------

/// Horizontal bars, one per slice, labeled with amount and percentage.
pub struct ShareView {
    title: String,
    slices: Vec<Slice>,
    currency: String,
}

impl ShareView {
    pub fn new(title: impl Into<String>, slices: Vec<Slice>, currency: &str) -> Self {
        Self {
            title: title.into(),
            slices,
            currency: currency.to_string(),
        }
    }
}

impl ReportView for ShareView {
    fn draw(&mut self, frame: &mut Frame) {
        let [title_area, chart_area, hints_area] = Layout::vertical([
            Constraint::Length(2),
            Constraint::Fill(1),
            Constraint::Length(1),
        ])
        .areas(frame.area());

        frame.render_widget(
            Paragraph::new(Span::styled(format!(" {}", self.title), HEADER_STYLE)),
            title_area,
        );

        if self.slices.iter().all(|s| s.value == 0.0) {
            frame.render_widget(
                Paragraph::new(" Nothing to show for this period."),
                chart_area,
            );
        } else {
            let bars: Vec<Bar> = self
                .slices
                .iter()
                .map(|s| {
                    Bar::default()
                        // tenths of a percent keep small shares visible
                        .value((s.pct * 10.0).round().max(0.0) as u64)
                        .label(Line::from(s.label.clone()))
                        .text_value(format!(
                            "{} ({:.1}%)",
                            money_in(s.value, &self.currency),
                            s.pct
                        ))
                        .style(s.style)
                        .value_style(s.style.add_modifier(Modifier::REVERSED))
                })
                .collect();
            let chart = BarChart::default()
                .block(Block::default().borders(Borders::NONE))
                .direction(Direction::Horizontal)
                .bar_width(1)
                .bar_gap(1)
                .data(BarGroup::default().bars(&bars));
            frame.render_widget(chart, chart_area);
        }

        frame.render_widget(
            Paragraph::new(" q/Esc=close").style(FOOTER_STYLE),
            hints_area,
        );
    }
}

/// Grouped vertical bars, income next to expense for each label, over a
/// balance panel with one bar per label.
pub struct FlowView {
    title: String,
    groups: Vec<FlowGroup>,
    footer: String,
}

impl FlowView {
    pub fn new(title: impl Into<String>, groups: Vec<FlowGroup>, footer: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            groups,
            footer: footer.into(),
        }
    }

    fn draw_balance(&self, frame: &mut Frame, area: Rect, indent: u16) {
        let [title_area, chart_area] =
            Layout::vertical([Constraint::Length(1), Constraint::Fill(1)]).areas(area);
        frame.render_widget(
            Paragraph::new(Span::styled(" Balance", HEADER_STYLE)),
            title_area,
        );
        let [_, bar_area] =
            Layout::horizontal([Constraint::Length(indent), Constraint::Fill(1)]).areas(chart_area);

        let max_net = self
            .groups
            .iter()
            .map(|g| g.net().abs())
            .fold(0.0f64, f64::max);
        // Same footprint as an income/expense pair so bars sit under their group.
        let bars: Vec<Bar> = self
            .groups
            .iter()
            .map(|g| {
                let net = g.net();
                Bar::default()
                    .value(bar_height(net.abs()))
                    .text_value(compact(net))
                    .style(balance_style(net))
                    .value_style(balance_style(net).add_modifier(Modifier::REVERSED))
            })
            .collect();
        let chart = BarChart::default()
            .bar_width(6)
            .bar_gap(2)
            .max(bar_height(max_net).max(1))
            .data(BarGroup::default().bars(&bars));
        frame.render_widget(chart, bar_area);
    }
}

impl ReportView for FlowView {
    fn draw(&mut self, frame: &mut Frame) {
        let [title_area, chart_area, legend_area, hints_area] = Layout::vertical([
            Constraint::Length(2),
            Constraint::Fill(1),
            Constraint::Length(1),
            Constraint::Length(1),
        ])
        .areas(frame.area());

        frame.render_widget(
            Paragraph::new(Span::styled(format!(" {}", self.title), HEADER_STYLE)),
            title_area,
        );

        let [flow_area, balance_area] =
            Layout::vertical([Constraint::Fill(2), Constraint::Fill(1)]).areas(chart_area);

        let max_val = self
            .groups
            .iter()
            .flat_map(|g| [g.income, g.expense])
            .fold(0.0f64, f64::max);
        let (top_tick, mid_tick) = axis_ticks(max_val.max(1.0));
        let top_label = compact(top_tick);
        let mid_label = compact(mid_tick);
        let y_label_width = top_label.len().max(mid_label.len()) as u16 + 1;

        let [y_axis_area, bar_area] = Layout::horizontal([
            Constraint::Length(y_label_width),
            Constraint::Fill(1),
        ])
        .areas(flow_area);

        // Labels line up with the top and middle of the bar area; the last
        // row is taken by group labels.
        let inner_height = bar_area.height.saturating_sub(1);
        let mid_row = inner_height / 2;
        let y_lines: Vec<Line> = (0..inner_height)
            .map(|row| {
                let label = if row == 0 {
                    top_label.as_str()
                } else if row == mid_row {
                    mid_label.as_str()
                } else {
                    ""
                };
                Line::from(Span::styled(
                    format!("{:>width$}", label, width = y_label_width as usize),
                    FOOTER_STYLE,
                ))
            })
            .collect();
        frame.render_widget(Paragraph::new(y_lines), y_axis_area);

        let mut chart = BarChart::default()
            .bar_width(3)
            .bar_gap(0)
            .group_gap(2)
            .max(bar_height(top_tick));
        for group in &self.groups {
            let bars = [
                Bar::default()
                    .value(bar_height(group.income))
                    .text_value(String::new())
                    .style(INCOME_STYLE),
                Bar::default()
                    .value(bar_height(group.expense))
                    .text_value(String::new())
                    .style(EXPENSE_STYLE),
            ];
            chart = chart.data(
                BarGroup::default()
                    .label(Line::from(group.label.clone()))
                    .bars(&bars),
            );
        }
        frame.render_widget(chart, bar_area);

        self.draw_balance(frame, balance_area, y_label_width);

        frame.render_widget(
            Paragraph::new(Line::from(vec![
                Span::styled(" \u{25A0} Income  ", INCOME_STYLE),
                Span::styled("\u{25A0} Expense  ", EXPENSE_STYLE),
                Span::styled(self.footer.clone(), Style::default()),
            ])),
            legend_area,
        );
        frame.render_widget(
            Paragraph::new(" q/Esc=close").style(FOOTER_STYLE),
            hints_area,
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aggregate::{AuthorTotals, CategoryBreakdown, MonthlyFlow};
    use std::collections::BTreeMap;

    fn spending(shared: f64, personal: f64, income: f64) -> SpendingReport {
        SpendingReport {
            breakdown: CategoryBreakdown { shared, personal },
            income,
        }
    }

    #[test]
    fn test_category_slices_empty_period() {
        let slices = category_slices(&spending(0.0, 0.0, 0.0));
        assert_eq!(slices.len(), 2);
        assert!(slices.iter().all(|s| s.value == 0.0 && s.pct == 0.0));
    }

    #[test]
    fn test_category_slices_percentages() {
        let slices = category_slices(&spending(75.0, 25.0, 0.0));
        assert_eq!(slices[0].label, "Shared");
        assert_eq!(slices[0].pct, 75.0);
        assert_eq!(slices[1].pct, 25.0);
    }

    #[test]
    fn test_income_use_adds_remaining() {
        let slices = income_use_slices(&spending(300.0, 100.0, 1000.0));
        assert_eq!(slices.len(), 3);
        assert_eq!(slices[0].pct, 30.0);
        assert_eq!(slices[2].label, "Remaining");
        assert_eq!(slices[2].value, 600.0);
        assert_eq!(slices[2].pct, 60.0);

        let overspent = income_use_slices(&spending(300.0, 100.0, 200.0));
        assert_eq!(overspent.len(), 2);
        assert_eq!(overspent[0].pct, 150.0);
    }

    #[test]
    fn test_income_slices_follow_author_map() {
        let mut by_author = BTreeMap::new();
        by_author.insert("Alice".to_string(), 300.0);
        by_author.insert("Bob".to_string(), 100.0);
        let slices = income_slices(&IncomeReport {
            by_author,
            total: 400.0,
        });
        assert_eq!(slices.len(), 2);
        assert_eq!(slices[0].label, "Alice");
        assert_eq!(slices[0].pct, 75.0);
    }

    #[test]
    fn test_evolution_groups_label_every_month() {
        let mut months = [MonthlyFlow::default(); 12];
        months[2].income = 10.0;
        let groups = evolution_groups(&EvolutionReport {
            year: 2024,
            months,
            total_income: 10.0,
            total_expense: 0.0,
        });
        assert_eq!(groups.len(), 12);
        assert_eq!(groups[0].label, "Jan");
        assert_eq!(groups[2].income, 10.0);
        assert_eq!(groups[11].label, "Dec");
    }

    #[test]
    fn test_author_groups() {
        let mut authors = BTreeMap::new();
        authors.insert(
            "Alice".to_string(),
            AuthorTotals {
                income: 5.0,
                expense: 2.0,
            },
        );
        let groups = author_groups(&AuthorReport {
            authors,
            total: AuthorTotals::default(),
        });
        assert_eq!(
            groups,
            vec![FlowGroup {
                label: "Alice".to_string(),
                income: 5.0,
                expense: 2.0
            }]
        );
    }

    #[test]
    fn test_flow_group_net_and_balance_color() {
        let deficit = FlowGroup {
            label: "Mar".to_string(),
            income: 100.0,
            expense: 250.0,
        };
        assert_eq!(deficit.net(), -150.0);
        assert_eq!(balance_style(deficit.net()), EXPENSE_STYLE);
        assert_eq!(balance_style(0.0), INCOME_STYLE);
        assert_eq!(compact(deficit.net()), "-150");
    }

    #[test]
    fn test_axis_ticks() {
        assert_eq!(axis_ticks(1.0), (10.0, 5.0));
        assert_eq!(axis_ticks(180.0), (250.0, 125.0));
        assert_eq!(axis_ticks(4200.0), (5000.0, 2500.0));
        assert_eq!(axis_ticks(10_000.0), (10_000.0, 5000.0));
    }
}
