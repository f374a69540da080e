//! BxDF Type

use bitflags::bitflags;

bitflags! {
    /// Stores combinations of reflection models.
    #[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
    pub struct BxDFType: u8 {
        const REFLECTION = 1 << 0;
        const TRANSMISSION = 1 << 1;
        const DIFFUSE = 1 << 2;
        const GLOSSY = 1 << 3;
        const SPECULAR = 1 << 4;
        const ALL_TYPES = Self::DIFFUSE.bits() | Self::GLOSSY.bits() | Self::SPECULAR.bits();
        const ALL_REFLECTION = Self::REFLECTION.bits() | Self::ALL_TYPES.bits();
        const ALL_TRANSMISSION = Self::TRANSMISSION.bits() | Self::ALL_TYPES.bits();
        const ALL = Self::ALL_REFLECTION.bits() | Self::ALL_TRANSMISSION.bits();
    }
}

impl Default for BxDFType {
    fn default() -> Self {
        Self::empty()
    }
}

// ----------------------------------------------------------------------------
// Tests
// ----------------------------------------------------------------------------
