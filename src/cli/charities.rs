use super::ui;
use crate::core::records::Charity;
use comfy_table::Cell;

pub fn charities_table(charities: &[Charity]) -> String {
    let mut table = ui::new_styled_table();
    table.set_header(vec![
        ui::header_cell("ID"),
        ui::header_cell("Charity"),
        ui::header_cell("Receiver"),
    ]);
    for charity in charities {
        table.add_row(vec![
            Cell::new(charity.id),
            Cell::new(&charity.name),
            Cell::new(&charity.email),
        ]);
    }
    table.to_string()
}

pub fn run(charities: &[Charity]) {
    if charities.is_empty() {
        println!("No charities configured.");
        return;
    }
    println!("{}", charities_table(charities));
}
