use eframe::egui::Context;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(in crate::app) struct FrameRequest(pub(in crate::app) u64);

/// Host side of the frame loop: something that can be asked for one more frame.
pub(in crate::app) trait FrameScheduler {
    fn request_frame(&mut self) -> FrameRequest;

    fn cancel_frame(&mut self, request: FrameRequest);

    /// Called when the frame behind `request` is being delivered.
    fn frame_delivered(&mut self, _request: FrameRequest) {}
}

/// A running animation loop. Exactly one frame request is outstanding while it lives;
/// dropping it cancels that request.
pub(in crate::app) struct AnimationLoop<S: FrameScheduler> {
    scheduler: S,
    pending: Option<FrameRequest>,
    frames: u64,
}

impl<S: FrameScheduler> AnimationLoop<S> {
    pub(in crate::app) fn start(mut scheduler: S) -> Self {
        let pending = Some(scheduler.request_frame());
        Self {
            scheduler,
            pending,
            frames: 0,
        }
    }

    /// Consumes the outstanding request and schedules the next one.
    pub(in crate::app) fn next_frame(&mut self) -> u64 {
        if let Some(request) = self.pending.take() {
            self.scheduler.frame_delivered(request);
        }
        self.frames += 1;
        self.pending = Some(self.scheduler.request_frame());
        self.frames
    }

    pub(in crate::app) fn frames(&self) -> u64 {
        self.frames
    }

    pub(in crate::app) fn stop(&mut self) {
        if let Some(request) = self.pending.take() {
            self.scheduler.cancel_frame(request);
        }
    }
}

impl<S: FrameScheduler> Drop for AnimationLoop<S> {
    fn drop(&mut self) {
        self.stop();
    }
}

pub(in crate::app) struct EguiScheduler {
    ctx: Context,
    next_id: u64,
}

impl EguiScheduler {
    pub(in crate::app) fn new(ctx: Context) -> Self {
        Self { ctx, next_id: 0 }
    }
}

impl FrameScheduler for EguiScheduler {
    fn request_frame(&mut self) -> FrameRequest {
        self.next_id += 1;
        self.ctx.request_repaint();
        FrameRequest(self.next_id)
    }

    // egui cannot revoke a repaint request; once the loop stops asking, at most one idle
    // frame is drawn.
    fn cancel_frame(&mut self, _request: FrameRequest) {}
}

#[cfg(test)]
pub(in crate::app) mod testing {
    use std::cell::RefCell;
    use std::collections::HashSet;
    use std::rc::Rc;

    use super::{FrameRequest, FrameScheduler};

    /// Records outstanding frame requests so tests can check teardown.
    #[derive(Clone, Default)]
    pub(in crate::app) struct CountingScheduler {
        pending: Rc<RefCell<HashSet<u64>>>,
        next_id: Rc<RefCell<u64>>,
    }

    impl CountingScheduler {
        pub(in crate::app) fn pending(&self) -> usize {
            self.pending.borrow().len()
        }
    }

    impl FrameScheduler for CountingScheduler {
        fn request_frame(&mut self) -> FrameRequest {
            let mut next_id = self.next_id.borrow_mut();
            *next_id += 1;
            self.pending.borrow_mut().insert(*next_id);
            FrameRequest(*next_id)
        }

        fn cancel_frame(&mut self, request: FrameRequest) {
            self.pending.borrow_mut().remove(&request.0);
        }

        fn frame_delivered(&mut self, request: FrameRequest) {
            self.pending.borrow_mut().remove(&request.0);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::testing::CountingScheduler;
    use super::*;

    #[test]
    fn start_then_drop_leaves_nothing_pending() {
        let scheduler = CountingScheduler::default();
        let animation = AnimationLoop::start(scheduler.clone());
        assert_eq!(scheduler.pending(), 1);

        drop(animation);
        assert_eq!(scheduler.pending(), 0);
    }

    #[test]
    fn each_frame_keeps_exactly_one_request() {
        let scheduler = CountingScheduler::default();
        let mut animation = AnimationLoop::start(scheduler.clone());

        for expected in 1..=5 {
            assert_eq!(animation.next_frame(), expected);
            assert_eq!(scheduler.pending(), 1);
        }

        animation.stop();
        assert_eq!(scheduler.pending(), 0);
        assert_eq!(animation.frames(), 5);
    }
}
