use super::Ppu;

/// Objects the hardware can show on one line.
pub(super) const MAX_OBJECTS_PER_LINE: usize = 10;
pub(super) const OAM_ENTRIES: usize = 40;

/// One OAM entry selected during the scan.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub(crate) struct ObjectEntry {
    pub oam_index: u8,
    /// Screen Y + 16.
    pub y: u8,
    /// Screen X + 8.
    pub x: u8,
    pub tile: u8,
    pub attrs: u8,
    /// Object height (8 or 16) when the scan picked this entry. Rendering
    /// uses it even if LCDC changes during mode 3.
    pub height: u8,
}

impl ObjectEntry {
    pub(super) const BG_PRIORITY: u8 = 0x80;
    pub(super) const FLIP_Y: u8 = 0x40;
    pub(super) const FLIP_X: u8 = 0x20;
    pub(super) const PALETTE_1: u8 = 0x10;
}

impl Ppu {
    /// OAM scan: the first ten entries in OAM order whose rows cover LY.
    /// X is not considered, so off-screen objects still use up a slot.
    pub(super) fn select_objects(&mut self) {
        let height = self.lcdc.object_height() as u16;
        let line = self.ly as u16 + 16;
        self.line_objects.clear();

        for index in 0..OAM_ENTRIES {
            if self.line_objects.len() == MAX_OBJECTS_PER_LINE {
                break;
            }
            let entry = &self.oam[index * 4..index * 4 + 4];
            let y = entry[0] as u16;
            if line >= y && line < y + height {
                self.line_objects.push(ObjectEntry {
                    oam_index: index as u8,
                    y: entry[0],
                    x: entry[1],
                    tile: entry[2],
                    attrs: entry[3],
                    height: height as u8,
                });
            }
        }
    }

    /// Objects chosen for the current line, in OAM order.
    #[cfg(test)]
    pub(crate) fn line_objects(&self) -> &[ObjectEntry] {
        &self.line_objects
    }
}
