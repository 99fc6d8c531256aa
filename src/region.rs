//! The region id attached to a [`CompactSpan`](crate::CompactSpan).

bitflags::bitflags! {
    /// The region a [`CompactSpan`](crate::CompactSpan) belongs to.
    ///
    /// The low 15 bits are the region id produced by the (external) watershed
    /// partitioning step; the high bit marks a tile-border region.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    #[repr(transparent)]
    #[cfg_attr(feature = "serialize", derive(serde::Serialize, serde::Deserialize))]
    pub struct RegionId: u16 {
        /// The default region, used for spans that are not part of any region, i.e. not walkable.
        const NONE = 0;
        /// Tile border flag. Spans carrying this bit are considered un-walkable
        /// for the purposes of contour tracing.
        const BORDER = 0x8000;
    }
}

impl RegionId {
    /// Extracts the plain region id, with the border bit masked off.
    pub fn id(self) -> u16 {
        self.bits() & !Self::BORDER.bits()
    }
}

impl Default for RegionId {
    fn default() -> Self {
        Self::NONE
    }
}

impl From<u16> for RegionId {
    fn from(value: u16) -> Self {
        RegionId::from_bits_truncate(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn border_bit_is_masked_out_of_id() {
        let region = RegionId::from(5) | RegionId::BORDER;
        assert_eq!(region.id(), 5);
        assert!(region.contains(RegionId::BORDER));
    }

    #[test]
    fn none_has_no_border_bit() {
        assert!(!RegionId::NONE.contains(RegionId::BORDER));
    }
}
