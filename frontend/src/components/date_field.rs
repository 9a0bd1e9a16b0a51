use shared::DashboardConfig;
use web_sys::HtmlInputElement;

use crate::services::date_utils::get_current_date;
use crate::services::dom::{self, DomError};
use crate::services::Logger;

const COMPONENT: &str = "date-field";

#[derive(Debug, Clone, PartialEq)]
pub enum DateFieldOutcome {
    /// No usable date input on this page
    Missing,
    Defaulted(String),
}

/// Set the expense form's date input to today's local date
pub fn default_date_field(config: &DashboardConfig) -> Result<DateFieldOutcome, DomError> {
    let input = match dom::typed_element_by_id::<HtmlInputElement>(&config.elements.date_input_id, "input") {
        Ok(Some(input)) => input,
        Ok(None) => return Ok(DateFieldOutcome::Missing),
        Err(err @ DomError::WrongElementType { .. }) => {
            Logger::warn_with_component(COMPONENT, &format!("Leaving date field alone: {}", err));
            return Ok(DateFieldOutcome::Missing);
        }
        Err(err) => return Err(err),
    };

    let today = get_current_date().ok_or_else(|| DomError::Js("could not read today's date".to_string()))?;
    input.set_value(&today);
    Logger::debug_with_component(COMPONENT, &format!("Set date input to {}", today));

    Ok(DateFieldOutcome::Defaulted(today))
}
