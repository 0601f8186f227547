//! Remote page counter. The catalog is the only authority on how many pages
//! exist, so the controller never caps "next"; it only refuses to go below 1
//! and lets an empty batch signal an overrun.

/// First page of the remote catalog.
pub const FIRST_PAGE: u32 = 1;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageController {
    current: u32,
}

impl PageController {
    pub fn new() -> Self {
        Self {
            current: FIRST_PAGE,
        }
    }

    pub fn current(&self) -> u32 {
        self.current
    }

    /// Whether the "Previous" affordance is enabled.
    pub fn can_retreat(&self) -> bool {
        self.current > FIRST_PAGE
    }

    pub fn advance(&mut self) {
        self.current = self.current.saturating_add(1);
    }

    /// Step back one page, floored at 1. Returns `false` when already on the
    /// first page so callers can skip the fetch.
    pub fn retreat(&mut self) -> bool {
        if !self.can_retreat() {
            return false;
        }
        self.current -= 1;
        true
    }

    /// Move straight to `page`. Zero is not a page and leaves the state alone.
    pub fn jump(&mut self, page: u32) -> bool {
        if page < FIRST_PAGE || page == self.current {
            return false;
        }
        self.current = page;
        true
    }
}

impl Default for PageController {
    fn default() -> Self {
        Self::new()
    }
}
