//! L4 Atomic Layer: Named interaction variants
//!
//! Hover/focus styling is a pure function from a variant to a visual state.
//! Items own their variant; nothing is propagated through a shared store.

use super::timeline::VisualState;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Variant {
    #[default]
    Rest,
    /// Hovered or focused
    Active,
}

impl Variant {
    pub fn from_active(active: bool) -> Self {
        if active {
            Variant::Active
        } else {
            Variant::Rest
        }
    }
}

/// Per-item-type mapping of variants to visual states
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HoverStyle {
    pub rest: VisualState,
    pub active: VisualState,
}

impl HoverStyle {
    /// Case-study card: lifts and grows slightly
    pub const CARD: HoverStyle = HoverStyle {
        rest: VisualState::IDENTITY,
        active: VisualState {
            x: 0.0,
            y: -1.0,
            scale: 1.05,
            opacity: 1.0,
            rotation: 0.0,
        },
    };

    /// Navigation link: dims at rest
    pub const LINK: HoverStyle = HoverStyle {
        rest: VisualState {
            x: 0.0,
            y: 0.0,
            scale: 1.0,
            opacity: 0.6,
            rotation: 0.0,
        },
        active: VisualState::IDENTITY,
    };

    pub fn state(&self, variant: Variant) -> VisualState {
        match variant {
            Variant::Rest => self.rest,
            Variant::Active => self.active,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_variant_mapping_is_pure() {
        assert_eq!(HoverStyle::CARD.state(Variant::Rest), VisualState::IDENTITY);
        assert_eq!(HoverStyle::CARD.state(Variant::Active).y, -1.0);
        assert_eq!(
            HoverStyle::LINK.state(Variant::from_active(false)).opacity,
            0.6
        );
        assert_eq!(HoverStyle::LINK.state(Variant::from_active(true)), VisualState::IDENTITY);
    }
}
