//! Packed instruction layer
//!
//! Bits 0-3 are the lane, bits 4-5 belong to the red waldo and bits 6-7 to
//! the blue waldo. Within a waldo the lower bit is its arrow layer and the
//! upper bit its instruction (switch) layer: 16/32 for red, 64/128 for blue.

use std::fmt;

const LANE_MASK: i64 = 0x0F;
const RED_MASK: i64 = 0x30;
const BLUE_MASK: i64 = 0xC0;
const MAX_PACKED: i64 = 0xFF;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Waldo {
    Red,
    Blue,
}

impl Waldo {
    pub const ALL: [Waldo; 2] = [Waldo::Red, Waldo::Blue];

    fn shift(self) -> u32 {
        match self {
            Waldo::Red => 4,
            Waldo::Blue => 6,
        }
    }
}

impl fmt::Display for Waldo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Waldo::Red => write!(f, "red"),
            Waldo::Blue => write!(f, "blue"),
        }
    }
}

/// Raw layer value as stored in a save file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Layer(i64);

impl Layer {
    pub fn new(raw: i64) -> Self {
        Self(raw)
    }

    pub fn raw(self) -> i64 {
        self.0
    }

    /// Arrow layer of a waldo (16 for red, 64 for blue).
    pub fn arrows(waldo: Waldo) -> Self {
        Self(1 << waldo.shift())
    }

    /// Instruction layer of a waldo, where starts and switches live (32 for
    /// red, 128 for blue).
    pub fn instructions(waldo: Waldo) -> Self {
        Self(2 << waldo.shift())
    }

    pub fn lane(self) -> i64 {
        self.0 & LANE_MASK
    }

    /// Owning waldo, if any waldo bit is set. Values outside the packed
    /// byte have no owner.
    pub fn waldo(self) -> Option<Waldo> {
        if !self.in_packed_range() {
            return None;
        }
        if self.0 & RED_MASK != 0 {
            Some(Waldo::Red)
        } else if self.0 & BLUE_MASK != 0 {
            Some(Waldo::Blue)
        } else {
            None
        }
    }

    pub fn waldo_and_lane(self) -> (Option<Waldo>, i64) {
        (self.waldo(), self.lane())
    }

    /// Move the waldo bits onto `waldo`, keeping the lane and the
    /// arrow/instruction position.
    pub fn with_waldo(self, waldo: Waldo) -> Self {
        match self.waldo() {
            Some(current) if current != waldo => self.swap_waldo(),
            _ => self,
        }
    }

    /// Exchange the red and blue bits. Lane bits are untouched; values
    /// outside the packed byte pass through unchanged.
    pub fn swap_waldo(self) -> Self {
        if !self.in_packed_range() {
            return self;
        }
        let layer = self.0;
        Self((layer & LANE_MASK) | ((layer & RED_MASK) << 2) | ((layer & BLUE_MASK) >> 2))
    }

    /// Layers above the lane bits hold symbols the player placed; 15 and
    /// below are reactor features.
    pub fn is_symbol(self) -> bool {
        self.0 > LANE_MASK
    }

    fn in_packed_range(self) -> bool {
        (0..=MAX_PACKED).contains(&self.0)
    }
}

impl fmt::Display for Layer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_waldo_layers() {
        assert_eq!(Layer::arrows(Waldo::Red).raw(), 16);
        assert_eq!(Layer::instructions(Waldo::Red).raw(), 32);
        assert_eq!(Layer::arrows(Waldo::Blue).raw(), 64);
        assert_eq!(Layer::instructions(Waldo::Blue).raw(), 128);
    }

    #[test]
    fn test_swap_exchanges_waldo_bits() {
        assert_eq!(Layer::new(16).swap_waldo().raw(), 64);
        assert_eq!(Layer::new(32).swap_waldo().raw(), 128);
        assert_eq!(Layer::new(64).swap_waldo().raw(), 16);
        assert_eq!(Layer::new(128).swap_waldo().raw(), 32);
    }

    #[test]
    fn test_swap_keeps_lane() {
        let layer = Layer::new(32 | 5);
        let swapped = layer.swap_waldo();
        assert_eq!(swapped.raw(), 128 | 5);
        assert_eq!(swapped.lane(), 5);
    }

    #[test]
    fn test_lane_only_layers_are_unowned() {
        assert_eq!(Layer::new(3).waldo_and_lane(), (None, 3));
        assert_eq!(Layer::new(3).swap_waldo().raw(), 3);
        assert!(!Layer::new(15).is_symbol());
        assert!(Layer::new(16).is_symbol());
    }

    #[test]
    fn test_waldo_and_lane() {
        assert_eq!(Layer::new(16 | 2).waldo_and_lane(), (Some(Waldo::Red), 2));
        assert_eq!(Layer::new(128 | 7).waldo_and_lane(), (Some(Waldo::Blue), 7));
    }

    #[test]
    fn test_with_waldo() {
        let red_arrow = Layer::arrows(Waldo::Red);
        assert_eq!(red_arrow.with_waldo(Waldo::Red), red_arrow);
        assert_eq!(red_arrow.with_waldo(Waldo::Blue), Layer::arrows(Waldo::Blue));
        assert_eq!(Layer::new(4).with_waldo(Waldo::Blue).raw(), 4);
    }

    #[test]
    fn test_out_of_range_passes_through() {
        assert_eq!(Layer::new(256 + 16).swap_waldo().raw(), 256 + 16);
        assert_eq!(Layer::new(-16).swap_waldo().raw(), -16);
        assert_eq!(Layer::new(300).waldo(), None);
    }

    proptest! {
        #[test]
        fn swap_is_an_involution(raw in -1024i64..1024) {
            let layer = Layer::new(raw);
            prop_assert_eq!(layer.swap_waldo().swap_waldo(), layer);
        }

        #[test]
        fn swap_preserves_lane(raw in 0i64..=255) {
            let layer = Layer::new(raw);
            prop_assert_eq!(layer.swap_waldo().lane(), layer.lane());
        }
    }
}
