//! Per-frame view context handed to rendering.

/// Terminal geometry and the layout it implies
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ViewportContext {
    pub width: u16,
    pub height: u16,
    /// Narrow terminal: single-column layout, project pages load lazily
    pub compact: bool,
}

impl ViewportContext {
    pub fn new(width: u16, height: u16, compact_width: u16) -> Self {
        Self {
            width,
            height,
            compact: width < compact_width,
        }
    }
}

/// Which carousel card, if any, is under the mouse
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct HoverContext {
    pub card: Option<usize>,
}

impl HoverContext {
    pub fn is_hovered(&self, card: usize) -> bool {
        self.card == Some(card)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn compact_below_threshold() {
        assert!(ViewportContext::new(79, 40, 80).compact);
        assert!(!ViewportContext::new(80, 40, 80).compact);
    }

    #[test]
    fn hover_matches_single_card() {
        let hover = HoverContext { card: Some(2) };
        assert!(hover.is_hovered(2));
        assert!(!hover.is_hovered(1));
        assert!(!HoverContext::default().is_hovered(0));
    }
}
