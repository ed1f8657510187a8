// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

/// Cylinder/sector half of a CHS address.
///
/// On disk the pair is packed into a little-endian 16-bit word: the low six
/// bits hold the sector, bits 6 and 7 hold cylinder bits 8 and 9, and the high
/// byte holds the low eight cylinder bits.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Hash)]
pub struct CylinderSector {
    pub cylinder: u16,
    pub sector: u8,
}

impl CylinderSector {
    pub const MAX_CYLINDER: u16 = 0x3FF;
    pub const MAX_SECTOR: u8 = 0x3F;

    pub fn new(cylinder: u16, sector: u8) -> Self {
        Self {
            cylinder: cylinder & Self::MAX_CYLINDER,
            sector: sector & Self::MAX_SECTOR,
        }
    }

    /// Split a packed cylinder/sector word. Total over all inputs.
    pub fn unpack(packed: u16) -> Self {
        let sector = (packed & 0x3F) as u8;
        let mut cylinder = (packed >> 8) & 0xFF;
        if packed & 0x40 != 0 {
            cylinder += 256;
        }
        if packed & 0x80 != 0 {
            cylinder += 512;
        }
        Self { cylinder, sector }
    }

    pub fn pack(self) -> u16 {
        let cylinder = self.cylinder & Self::MAX_CYLINDER;
        let low = (self.sector as u16 & 0x3F) | (((cylinder >> 8) & 0x03) << 6);
        ((cylinder & 0xFF) << 8) | low
    }
}

impl From<u16> for CylinderSector {
    fn from(packed: u16) -> Self {
        Self::unpack(packed)
    }
}

impl From<CylinderSector> for u16 {
    fn from(value: CylinderSector) -> Self {
        value.pack()
    }
}
