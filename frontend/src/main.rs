mod components;
mod services;

use components::{date_field, ExpenseChart, FlashMessageDismisser};
use services::PageReady;

fn main() {
    PageReady::new()
        .register("flash-messages", |config| {
            FlashMessageDismisser::install(&config)?;
            Ok(())
        })
        .register("date-field", |config| {
            date_field::default_date_field(&config)?;
            Ok(())
        })
        .register("expense-chart", |config| {
            ExpenseChart::mount(config)?;
            Ok(())
        })
        .install();
}
