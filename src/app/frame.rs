/// Coalesces redraw requests so that any number of triggers within one frame
/// (simulation ticks, pointer moves, edits) cost a single repaint.
#[derive(Debug, Default)]
pub struct FrameScheduler {
    pending: bool,
}

impl FrameScheduler {
    /// True only for the first request since the last [`begin_frame`].
    ///
    /// [`begin_frame`]: FrameScheduler::begin_frame
    pub fn request(&mut self) -> bool {
        if self.pending {
            return false;
        }
        self.pending = true;
        true
    }

    pub fn begin_frame(&mut self) {
        self.pending = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn requests_coalesce_within_a_frame() {
        let mut scheduler = FrameScheduler::default();
        assert!(scheduler.request());
        assert!(!scheduler.request());

        scheduler.begin_frame();
        assert!(scheduler.request());
        assert!(!scheduler.request());
    }
}
