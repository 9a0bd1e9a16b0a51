//! Auto-dismissal of flash banners.
//!
//! Each banner present at load time stays visible for the configured delay,
//! fades out, and is then removed. The schedule can be cancelled, and the
//! banner's close button removes it at once.

use std::cell::RefCell;
use std::rc::{Rc, Weak};

use gloo::events::EventListener;
use gloo::timers::callback::Timeout;
use shared::{BannerDismissal, BannerPhase, DashboardConfig, DismissalTimeline};
use wasm_bindgen::JsCast;
use web_sys::{Element, HtmlElement};

use crate::services::dom::{self, DomError};
use crate::services::Logger;

const COMPONENT: &str = "flash-messages";

thread_local! {
    // Keeps scheduled banners (and so their timers) alive for the page lifetime
    static SCHEDULED: RefCell<Vec<FlashBanner>> = RefCell::new(Vec::new());
}

struct BannerState {
    element: Element,
    dismissal: RefCell<BannerDismissal>,
    fade_timer: RefCell<Option<Timeout>>,
    removal_timer: RefCell<Option<Timeout>>,
    close_listener: RefCell<Option<EventListener>>,
}

/// Handle to one scheduled banner
#[derive(Clone)]
pub struct FlashBanner {
    state: Rc<BannerState>,
}

impl FlashBanner {
    pub fn schedule(element: Element, timeline: DismissalTimeline, close_selector: &str) -> Self {
        let banner = Self {
            state: Rc::new(BannerState {
                element,
                dismissal: RefCell::new(BannerDismissal::new(timeline)),
                fade_timer: RefCell::new(None),
                removal_timer: RefCell::new(None),
                close_listener: RefCell::new(None),
            }),
        };

        let weak = Rc::downgrade(&banner.state);
        let fade_timer = Timeout::new(timeline.delay_ms, move || {
            if let Some(banner) = Self::upgrade(&weak) {
                banner.begin_fade();
            }
        });
        *banner.state.fade_timer.borrow_mut() = Some(fade_timer);

        banner.attach_close_button(close_selector);
        banner
    }

    fn upgrade(weak: &Weak<BannerState>) -> Option<Self> {
        weak.upgrade().map(|state| Self { state })
    }

    pub fn element(&self) -> &Element {
        &self.state.element
    }

    pub fn phase(&self) -> BannerPhase {
        self.state.dismissal.borrow().phase()
    }

    fn begin_fade(&self) {
        if self.state.dismissal.borrow_mut().advance() != Some(BannerPhase::Fading) {
            return;
        }

        let timeline = self.state.dismissal.borrow().timeline();
        if let Some(element) = self.state.element.dyn_ref::<HtmlElement>() {
            let style = element.style();
            let _ = style.set_property("transition", &timeline.fade_transition());
            let _ = style.set_property("opacity", "0");
        }

        let weak = Rc::downgrade(&self.state);
        let removal_timer = Timeout::new(timeline.fade_ms, move || {
            if let Some(banner) = Self::upgrade(&weak) {
                banner.finish_removal();
            }
        });
        *self.state.removal_timer.borrow_mut() = Some(removal_timer);
    }

    fn finish_removal(&self) {
        if self.state.dismissal.borrow_mut().advance() == Some(BannerPhase::Removed) {
            self.state.element.remove();
        }
    }

    /// Dropping a pending `Timeout` clears it
    fn clear_timers(&self) {
        self.state.fade_timer.borrow_mut().take();
        self.state.removal_timer.borrow_mut().take();
    }

    /// Stop the schedule and leave the banner fully visible.
    /// Returns false once the banner is already gone or cancelled.
    pub fn cancel(&self) -> bool {
        if !self.state.dismissal.borrow_mut().cancel() {
            return false;
        }

        self.clear_timers();
        if let Some(element) = self.state.element.dyn_ref::<HtmlElement>() {
            let _ = element.style().remove_property("opacity");
        }
        true
    }

    /// Remove the banner now, skipping the rest of the schedule
    pub fn dismiss_now(&self) -> bool {
        if self.phase() == BannerPhase::Removed {
            return false;
        }

        // Stop pending timers first; a banner already cancelled skips this
        self.cancel();
        self.state.dismissal.borrow_mut().dismiss_now();
        self.element().remove();
        true
    }

    fn attach_close_button(&self, selector: &str) {
        if selector.trim().is_empty() {
            return;
        }
        let Ok(Some(button)) = self.state.element.query_selector(selector) else {
            return;
        };

        let weak = Rc::downgrade(&self.state);
        let listener = EventListener::new(&button, "click", move |_| {
            if let Some(banner) = Self::upgrade(&weak) {
                banner.dismiss_now();
            }
        });
        *self.state.close_listener.borrow_mut() = Some(listener);
    }
}

pub struct FlashMessageDismisser;

impl FlashMessageDismisser {
    /// Schedule every banner currently on the page
    pub fn install(config: &DashboardConfig) -> Result<Vec<FlashBanner>, DomError> {
        let banners: Vec<FlashBanner> = dom::query_all(&config.elements.banner_selector)?
            .into_iter()
            .map(|element| {
                FlashBanner::schedule(
                    element,
                    config.dismissal,
                    &config.elements.banner_close_selector,
                )
            })
            .collect();

        SCHEDULED.with(|scheduled| scheduled.borrow_mut().extend(banners.iter().cloned()));

        Logger::debug_with_component(
            COMPONENT,
            &format!(
                "Scheduled {} banners for removal after {}ms",
                banners.len(),
                config.dismissal.removal_at_ms()
            ),
        );
        Ok(banners)
    }
}
