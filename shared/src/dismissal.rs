use serde::{Deserialize, Serialize};

/// Timing of the flash banner auto-dismissal
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DismissalTimeline {
    /// Time a banner stays fully visible
    pub delay_ms: u32,
    /// Length of the opacity fade before removal
    pub fade_ms: u32,
}

impl Default for DismissalTimeline {
    fn default() -> Self {
        Self {
            delay_ms: 3000,
            fade_ms: 500,
        }
    }
}

impl DismissalTimeline {
    pub fn removal_at_ms(&self) -> u32 {
        self.delay_ms.saturating_add(self.fade_ms)
    }

    /// Phase an uncancelled banner is in `elapsed_ms` after page load
    pub fn phase_at(&self, elapsed_ms: u32) -> BannerPhase {
        if elapsed_ms < self.delay_ms {
            BannerPhase::Visible
        } else if elapsed_ms < self.removal_at_ms() {
            BannerPhase::Fading
        } else {
            BannerPhase::Removed
        }
    }

    /// CSS `transition` value for the fade, e.g. `opacity 0.5s`
    pub fn fade_transition(&self) -> String {
        format!("opacity {}s", f64::from(self.fade_ms) / 1000.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BannerPhase {
    Visible,
    Fading,
    Removed,
    /// Schedule aborted; the banner stays where it is
    Cancelled,
}

impl BannerPhase {
    pub fn is_terminal(self) -> bool {
        matches!(self, BannerPhase::Removed | BannerPhase::Cancelled)
    }
}

/// Per-banner dismissal schedule: Visible -> Fading -> Removed, abortable
/// at any point before removal.
#[derive(Debug, Clone, PartialEq)]
pub struct BannerDismissal {
    timeline: DismissalTimeline,
    phase: BannerPhase,
}

impl BannerDismissal {
    pub fn new(timeline: DismissalTimeline) -> Self {
        Self {
            timeline,
            phase: BannerPhase::Visible,
        }
    }

    pub fn phase(&self) -> BannerPhase {
        self.phase
    }

    pub fn timeline(&self) -> DismissalTimeline {
        self.timeline
    }

    /// Delay before the next transition, if one is pending
    pub fn next_delay_ms(&self) -> Option<u32> {
        match self.phase {
            BannerPhase::Visible => Some(self.timeline.delay_ms),
            BannerPhase::Fading => Some(self.timeline.fade_ms),
            BannerPhase::Removed | BannerPhase::Cancelled => None,
        }
    }

    /// Move to the next phase when its timer fires
    pub fn advance(&mut self) -> Option<BannerPhase> {
        let next = match self.phase {
            BannerPhase::Visible => BannerPhase::Fading,
            BannerPhase::Fading => BannerPhase::Removed,
            BannerPhase::Removed | BannerPhase::Cancelled => return None,
        };
        self.phase = next;
        Some(next)
    }

    /// Abort the schedule. Returns false if it already finished.
    pub fn cancel(&mut self) -> bool {
        if self.phase.is_terminal() {
            return false;
        }
        self.phase = BannerPhase::Cancelled;
        true
    }

    /// Skip straight to removal, e.g. on a manual close. A cancelled
    /// schedule can still be dismissed by hand.
    pub fn dismiss_now(&mut self) -> bool {
        if self.phase == BannerPhase::Removed {
            return false;
        }
        self.phase = BannerPhase::Removed;
        true
    }
}
