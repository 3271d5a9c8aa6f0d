//! Vertical clipping for windows/portals. The seg renderer narrows these as
//! walls are drawn, planes and sprites read them back.

pub struct PortalClip {
    /// Clip values are the solid pixel bounding the range.
    ///  floorclip starts out viewheight
    ///  ceilingclip starts out -1
    pub floorclip: Vec<i32>,
    pub ceilingclip: Vec<i32>,
    view_height: i32,
}

impl PortalClip {
    pub fn new(view_width: usize, view_height: usize) -> Self {
        PortalClip {
            floorclip: vec![view_height as i32; view_width],
            ceilingclip: vec![-1; view_width],
            view_height: view_height as i32,
        }
    }

    pub(crate) fn clear(&mut self) {
        self.floorclip.fill(self.view_height);
        self.ceilingclip.fill(-1);
    }

    #[cfg(test)]
    /// Rows still open in a column
    #[inline]
    pub fn open_rows(&self, x: usize) -> i32 {
        (self.floorclip[x] - self.ceilingclip[x] - 1).max(0)
    }
}
