pub mod date_field;
pub mod expense_chart;
pub mod flash_messages;

pub use expense_chart::ExpenseChart;
pub use flash_messages::FlashMessageDismisser;
