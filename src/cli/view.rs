use super::ui;
use crate::core::aggregate;
use crate::core::money;
use crate::core::payment::PaymentGateway;
use crate::tracker::{ApplicationView, Tracker};
use anyhow::{Context, Result};
use chrono::Utc;
use comfy_table::Cell;
use rust_decimal::Decimal;

impl ApplicationView {
    pub fn display_as_table(&self) -> String {
        let app = &self.application;

        let mut output = format!(
            "Application: {}\n{}\n\n",
            ui::style_text(&app.name, ui::StyleType::Title),
            ui::style_text(&app.description, ui::StyleType::Subtle)
        );

        output.push_str(&format!(
            "{}: {} of {} {}\n",
            ui::style_text("Progress", ui::StyleType::TotalLabel),
            self.current_value.normalize(),
            app.goal_value,
            app.goal_units(Decimal::from(app.goal_value))
        ));
        output.push_str(&format!(
            "{}: {}\n",
            ui::style_text("Donations", ui::StyleType::TotalLabel),
            ui::style_text(
                &money::format_amount(self.total_donations),
                ui::StyleType::TotalValue
            )
        ));
        let names: Vec<&str> = self.charities.iter().map(|c| c.name.as_str()).collect();
        output.push_str(&format!(
            "{}: {}\n\n",
            ui::style_text("Supporting", ui::StyleType::TotalLabel),
            names.join(", ")
        ));

        let mut table = ui::new_styled_table();
        table.set_header(vec![
            ui::header_cell("Day"),
            ui::header_cell("Date"),
            ui::header_cell("Donations"),
            ui::header_cell(&format!("Progress ({})", app.goal_units_plural)),
        ]);
        for (donated, progress) in self.donation_bins.iter().zip(&self.progress_bins) {
            table.add_row(vec![
                Cell::new(donated.day_index),
                Cell::new(donated.date_label()),
                ui::amount_cell(donated.y),
                ui::value_cell(progress.y),
            ]);
        }
        output.push_str(&table.to_string());
        output
    }

    /// Both chart series, as consumed by the charting front-end.
    pub fn chart_json(&self) -> Result<String> {
        let charts = serde_json::json!({
            "goal_donations": aggregate::to_chart_points(&self.donation_bins),
            "goal_updates": aggregate::to_chart_points(&self.progress_bins),
        });
        serde_json::to_string_pretty(&charts).context("Failed to encode chart data")
    }
}

pub fn run<G: PaymentGateway>(tracker: &Tracker<G>, slug: &str, json: bool) -> Result<()> {
    let view = tracker.view_application(slug, Utc::now())?;
    if json {
        println!("{}", view.chart_json()?);
    } else {
        println!("{}", view.display_as_table());
    }
    Ok(())
}
