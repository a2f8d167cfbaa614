use super::ui;
use crate::core::payment::PaymentGateway;
use crate::tracker::{DonationStart, Tracker};
use anyhow::Result;
use chrono::Utc;
use comfy_table::Cell;

impl DonationStart {
    pub fn display_as_table(&self) -> String {
        let mut table = ui::new_styled_table();
        table.set_header(vec![
            ui::header_cell("Charity"),
            ui::header_cell("Receiver"),
            ui::header_cell("Amount"),
        ]);
        for (charity, receiver) in self.charities.iter().zip(&self.receivers) {
            table.add_row(vec![
                Cell::new(&charity.name),
                Cell::new(&receiver.email),
                ui::amount_cell(receiver.amount),
            ]);
        }

        let mut output = format!(
            "Donation to {}\n\n",
            ui::style_text(&self.application.name, ui::StyleType::Title)
        );
        output.push_str(&table.to_string());
        output.push_str(&format!(
            "\n\n{}: {}",
            ui::style_text("Total", ui::StyleType::TotalLabel),
            ui::style_text(
                &crate::core::money::format_amount(self.amount),
                ui::StyleType::TotalValue
            )
        ));

        for message in &self.errors {
            output.push_str(&format!(
                "\n{}",
                ui::style_text(&format!("Payment provider error: {message}"), ui::StyleType::Error)
            ));
        }

        match (&self.pay_key, &self.checkout_url) {
            (Some(pay_key), Some(url)) => {
                output.push_str(&format!(
                    "\n\nPay key: {}\nComplete the donation at: {}",
                    pay_key, url
                ));
            }
            _ => output.push_str(&format!(
                "\n\n{}",
                ui::style_text(
                    "The payment provider did not start a transaction.",
                    ui::StyleType::Error
                )
            )),
        }
        output
    }
}

pub async fn donate<G: PaymentGateway>(tracker: &Tracker<G>, slug: &str, amount: &str) -> Result<()> {
    let spinner = ui::new_spinner("Contacting payment provider...");
    let result = tracker.start_donation(slug, amount).await;
    spinner.finish_and_clear();

    let start = result?;
    println!("{}", start.display_as_table());
    Ok(())
}

pub fn finish<G: PaymentGateway>(tracker: &Tracker<G>, pay_key: &str) -> Result<()> {
    match tracker.finish_donation(pay_key, Utc::now())? {
        Some(slug) => println!(
            "Your donation was successful! Thank you very much! See `pledge view {slug}`"
        ),
        None => println!(
            "{}",
            ui::style_text(&format!("No donation found for {pay_key}"), ui::StyleType::Error)
        ),
    }
    Ok(())
}

pub fn cancel<G: PaymentGateway>(tracker: &Tracker<G>, pay_key: &str) -> Result<()> {
    match tracker.cancel_donation(pay_key)? {
        Some(slug) => println!("Your donation has been canceled! See `pledge view {slug}`"),
        None => println!(
            "{}",
            ui::style_text(&format!("No donation found for {pay_key}"), ui::StyleType::Error)
        ),
    }
    Ok(())
}
