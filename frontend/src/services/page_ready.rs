//! Fans the document-ready signal out to independently registered
//! dashboard behaviors.
//!
//! Configuration is read once when the document is ready. Each behavior
//! then runs in its own task, so an error raised by one of them does not
//! keep the others from running.

use std::rc::Rc;

use gloo::events::EventListener;
use gloo::timers::callback::Timeout;
use shared::{DashboardConfig, CONFIG_ELEMENT_ID};

use super::dom;
use super::logging::Logger;

const COMPONENT: &str = "page-ready";

type Handler = Box<dyn FnOnce(Rc<DashboardConfig>) -> anyhow::Result<()>>;

#[derive(Default)]
pub struct PageReady {
    handlers: Vec<(&'static str, Handler)>,
}

impl PageReady {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register<F>(mut self, name: &'static str, handler: F) -> Self
    where
        F: FnOnce(Rc<DashboardConfig>) -> anyhow::Result<()> + 'static,
    {
        self.handlers.push((name, Box::new(handler)));
        self
    }

    pub fn len(&self) -> usize {
        self.handlers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.handlers.is_empty()
    }

    /// Run the handlers once the document has been parsed
    pub fn install(self) {
        if self.is_empty() {
            return;
        }

        let document = match dom::document() {
            Ok(document) => document,
            Err(err) => {
                Logger::error_with_component(COMPONENT, &err.to_string());
                return;
            }
        };

        if document.ready_state() == "loading" {
            EventListener::once(&document, "DOMContentLoaded", move |_| self.fire()).forget();
        } else {
            self.fire();
        }
    }

    fn fire(self) {
        let config = Rc::new(load_config());
        Logger::set_min_level(config.log_level);
        Logger::debug_with_component(
            COMPONENT,
            &format!("Document ready, starting {} handlers", self.len()),
        );

        for (name, handler) in self.handlers {
            let config = Rc::clone(&config);
            Timeout::new(0, move || run_handler(name, handler, config)).forget();
        }
    }
}

fn run_handler(name: &'static str, handler: Handler, config: Rc<DashboardConfig>) {
    match handler(config) {
        Ok(()) => Logger::debug_with_component(name, "Ready"),
        Err(err) => {
            let message = format!("{:#}", err);
            Logger::error_with_component(name, &message);
            wasm_bindgen::throw_str(&format!("{}: {}", name, message));
        }
    }
}

/// Page overrides on top of the defaults; unusable overrides are ignored
pub fn load_config() -> DashboardConfig {
    let json = match dom::read_json_island(CONFIG_ELEMENT_ID) {
        Ok(Some(json)) => json,
        Ok(None) => return DashboardConfig::default(),
        Err(err) => {
            Logger::warn_with_component(COMPONENT, &format!("Could not read page configuration: {}", err));
            return DashboardConfig::default();
        }
    };

    match DashboardConfig::from_json(&json) {
        Ok(config) => config,
        Err(err) => {
            Logger::warn_with_component(COMPONENT, &format!("Ignoring page configuration: {}", err));
            DashboardConfig::default()
        }
    }
}
