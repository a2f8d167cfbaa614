use super::ui;
use crate::core::payment::PaymentGateway;
use crate::core::records::Application;
use crate::tracker::{ApplicationForm, Tracker};
use anyhow::Result;
use chrono::Utc;
use comfy_table::Cell;

/// Application fields given on the command line. Missing fields are blank on
/// create and keep their current value on edit.
#[derive(Debug, Clone, Default)]
pub struct ApplicationArgs {
    pub name: Option<String>,
    pub description: Option<String>,
    pub goal_value: Option<String>,
    pub goal_units_singular: Option<String>,
    pub goal_units_plural: Option<String>,
    pub charities: Vec<u32>,
}

impl ApplicationArgs {
    pub fn into_form(self) -> ApplicationForm {
        ApplicationForm {
            name: self.name.unwrap_or_default(),
            description: self.description.unwrap_or_default(),
            goal_value: self.goal_value.unwrap_or_default(),
            goal_units_singular: self.goal_units_singular.unwrap_or_default(),
            goal_units_plural: self.goal_units_plural.unwrap_or_default(),
            charities: self.charities,
        }
    }

    pub fn overlay(self, app: &Application) -> ApplicationForm {
        ApplicationForm {
            name: app.name.clone(),
            description: self.description.unwrap_or_else(|| app.description.clone()),
            goal_value: self
                .goal_value
                .unwrap_or_else(|| app.goal_value.to_string()),
            goal_units_singular: self
                .goal_units_singular
                .unwrap_or_else(|| app.goal_units_singular.clone()),
            goal_units_plural: self
                .goal_units_plural
                .unwrap_or_else(|| app.goal_units_plural.clone()),
            charities: if self.charities.is_empty() {
                app.charities.clone()
            } else {
                self.charities
            },
        }
    }
}

pub fn applications_table(apps: &[Application]) -> String {
    let mut table = ui::new_styled_table();
    table.set_header(vec![
        ui::header_cell("Application"),
        ui::header_cell("Slug"),
        ui::header_cell("Goal"),
        ui::header_cell("Charities"),
        ui::header_cell("Created"),
    ]);
    for app in apps {
        let charities = app
            .charities
            .iter()
            .map(|id| id.to_string())
            .collect::<Vec<_>>()
            .join(", ");
        table.add_row(vec![
            Cell::new(&app.name),
            Cell::new(&app.slug),
            Cell::new(format!("{} {}", app.goal_value, app.goal_units_plural)),
            Cell::new(charities),
            Cell::new(app.created.format("%Y-%m-%d")),
        ]);
    }
    table.to_string()
}

pub fn list<G: PaymentGateway>(tracker: &Tracker<G>) -> Result<()> {
    let mut apps = tracker.store().list_applications()?;
    if apps.is_empty() {
        println!("No applications yet. Create one with `pledge create`.");
        return Ok(());
    }
    apps.sort_by(|a, b| a.created.cmp(&b.created));
    println!("{}", applications_table(&apps));
    Ok(())
}

pub fn create<G: PaymentGateway>(tracker: &Tracker<G>, args: ApplicationArgs) -> Result<()> {
    let app = tracker.save_application(args.into_form(), None, Utc::now())?;
    println!(
        "Application created! View it with `pledge view {}`",
        ui::style_text(&app.slug, ui::StyleType::TotalLabel)
    );
    Ok(())
}

pub fn edit<G: PaymentGateway>(tracker: &Tracker<G>, slug: &str, args: ApplicationArgs) -> Result<()> {
    let form = match tracker.store().get_application(slug)? {
        Some(app) => args.overlay(&app),
        // let the tracker report the missing application
        None => args.into_form(),
    };
    tracker.save_application(form, Some(slug), Utc::now())?;
    println!("Application updated!");
    Ok(())
}

pub fn delete<G: PaymentGateway>(tracker: &Tracker<G>, slug: &str) -> Result<()> {
    tracker.delete_application(slug)?;
    println!("Application deleted!");
    Ok(())
}

pub fn progress<G: PaymentGateway>(tracker: &Tracker<G>, slug: &str, value: &str) -> Result<()> {
    let update = tracker.record_progress(slug, value, Utc::now())?;
    let units = tracker
        .store()
        .get_application(slug)?
        .map(|app| app.goal_units(update.value).to_string())
        .unwrap_or_default();
    println!(
        "Progress updated: {} {}",
        ui::style_text(&update.value.normalize().to_string(), ui::StyleType::TotalValue),
        units
    );
    Ok(())
}
