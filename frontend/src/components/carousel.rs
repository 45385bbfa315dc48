//! Slideshow state machine plus its autoplay timer.
//!
//! The logical contract is just `{ index, direction }`. Whatever renders the
//! slides uses [`Direction::enter_from`] and [`Direction::exit_to`] so the
//! incoming and outgoing slides move the same way regardless of whether a
//! timer, a click or a drag caused the transition.

use std::{sync::Arc, time::Duration};

use tokio::{
    sync::watch,
    time::{interval_at, Instant, MissedTickBehavior},
};

use crate::timers::TimerHandle;

/// Which way the reel moves.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Direction {
    /// Toward higher indices; new slide comes in from the right.
    #[default]
    Forward,
    /// Toward lower indices; new slide comes in from the left.
    Backward,
}

/// Horizontal edge of the viewport.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Edge {
    /// Incoming slide slides in from the left.
    Left,
    /// Incoming slide slides in from the right.
    Right,
}

impl Direction {
    /// Direction of a signed step; zero counts as backward.
    pub fn of_step(delta: i64) -> Self {
        if delta > 0 {
            Direction::Forward
        } else {
            Direction::Backward
        }
    }

    /// Edge the incoming slide enters from.
    pub fn enter_from(self) -> Edge {
        match self {
            Direction::Forward => Edge::Right,
            Direction::Backward => Edge::Left,
        }
    }

    /// Edge the outgoing slide leaves toward.
    pub fn exit_to(self) -> Edge {
        match self {
            Direction::Forward => Edge::Left,
            Direction::Backward => Edge::Right,
        }
    }
}

/// Horizontal drag measurements at release.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DragRelease {
    /// Pixels moved since the drag started; negative means leftwards.
    pub offset_x: f64,
    /// Release velocity in pixels per second; negative means leftwards.
    pub velocity_x: f64,
}

impl DragRelease {
    /// `|offset| * velocity`: signed by the velocity.
    pub fn swipe_power(&self) -> f64 {
        self.offset_x.abs() * self.velocity_x
    }
}

/// One slide change. While it plays, `from` is exiting and `to` is entering.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Transition {
    /// Slide leaving the viewport.
    pub from: usize,
    /// Slide entering the viewport.
    pub to: usize,
    /// Direction of travel.
    pub direction: Direction,
}

/// Pure carousel state: current slide and last transition direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Carousel {
    len: usize,
    index: usize,
    direction: Direction,
}

impl Carousel {
    /// Carousel over `len` slides, showing the first one.
    pub fn new(len: usize) -> Self {
        Self {
            len,
            index: 0,
            direction: Direction::Forward,
        }
    }

    /// Number of slides.
    pub fn len(&self) -> usize {
        self.len
    }

    /// Whether there are no slides at all.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Slide currently shown.
    pub fn index(&self) -> usize {
        self.index
    }

    /// Direction of the most recent transition.
    pub fn direction(&self) -> Direction {
        self.direction
    }

    /// Autoplay step: always forward, wrapping at the end.
    pub fn tick(&mut self) -> Option<Transition> {
        self.paginate(1)
    }

    /// Arrow buttons and swipes: move by `delta`, wrapping both ways.
    pub fn paginate(&mut self, delta: i64) -> Option<Transition> {
        if self.len == 0 || delta == 0 {
            return None;
        }
        let len = self.len as i64;
        let step = delta.rem_euclid(len);
        let target = ((self.index as i64 + step) % len) as usize;
        self.move_to(target, Direction::of_step(delta))
    }

    /// Dot navigation: jump to `target`. The direction comes from comparing
    /// the target with the current slide. Out-of-range targets are ignored.
    pub fn select(&mut self, target: usize) -> Option<Transition> {
        if target >= self.len {
            return None;
        }
        let direction = if target > self.index {
            Direction::Forward
        } else {
            Direction::Backward
        };
        self.move_to(target, direction)
    }

    /// Drag release: a swipe stronger than `threshold` pages the reel, a
    /// weaker one snaps back.
    pub fn release_drag(&mut self, drag: DragRelease, threshold: f64) -> Option<Transition> {
        let power = drag.swipe_power();
        if power < -threshold {
            self.paginate(1)
        } else if power > threshold {
            self.paginate(-1)
        } else {
            None
        }
    }

    /// Change the slide count, keeping the index in range.
    pub fn set_len(&mut self, len: usize) {
        self.len = len;
        if self.index >= len {
            self.index = 0;
        }
    }

    fn move_to(&mut self, target: usize, direction: Direction) -> Option<Transition> {
        let from = self.index;
        self.direction = direction;
        self.index = target;
        (from != target).then_some(Transition {
            from,
            to: target,
            direction,
        })
    }
}

/// Mounted carousel: state published over a watch channel plus autoplay.
///
/// Manual actions do not pause autoplay. Dropping the controller stops it.
pub struct CarouselController {
    state: Arc<watch::Sender<Carousel>>,
    interval: Duration,
    swipe_threshold: f64,
    autoplay: Option<TimerHandle>,
}

impl CarouselController {
    /// Mount over `len` slides and start autoplay every `interval`.
    pub fn mount(len: usize, interval: Duration, swipe_threshold: f64) -> Self {
        let (state, _) = watch::channel(Carousel::new(len));
        let mut controller = Self {
            state: Arc::new(state),
            interval,
            swipe_threshold,
            autoplay: None,
        };
        controller.restart_autoplay();
        controller
    }

    /// Receiver notified on every transition.
    pub fn subscribe(&self) -> watch::Receiver<Carousel> {
        self.state.subscribe()
    }

    /// Current state.
    pub fn state(&self) -> Carousel {
        *self.state.borrow()
    }

    /// See [`Carousel::paginate`].
    pub fn paginate(&self, delta: i64) -> Option<Transition> {
        self.apply(|carousel| carousel.paginate(delta))
    }

    /// See [`Carousel::select`].
    pub fn select(&self, target: usize) -> Option<Transition> {
        self.apply(|carousel| carousel.select(target))
    }

    /// See [`Carousel::release_drag`]; uses the configured threshold.
    pub fn release_drag(&self, drag: DragRelease) -> Option<Transition> {
        let threshold = self.swipe_threshold;
        self.apply(|carousel| carousel.release_drag(drag, threshold))
    }

    /// New slide count; the autoplay timer restarts from zero.
    pub fn set_slide_count(&mut self, len: usize) {
        self.state.send_modify(|carousel| carousel.set_len(len));
        self.restart_autoplay();
    }

    /// Stop autoplay for good; manual navigation keeps working.
    pub fn stop_autoplay(&mut self) {
        self.autoplay = None;
    }

    fn apply(&self, op: impl FnOnce(&mut Carousel) -> Option<Transition>) -> Option<Transition> {
        apply_op(&self.state, op)
    }

    fn restart_autoplay(&mut self) {
        // Drop the old timer before starting the next one.
        self.autoplay = None;
        if self.state.borrow().len() < 2 || self.interval.is_zero() {
            return;
        }
        let state = self.state.clone();
        let period = self.interval;
        self.autoplay = Some(TimerHandle::spawn(async move {
            let mut ticker = interval_at(Instant::now() + period, period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                ticker.tick().await;
                if let Some(transition) = apply_op(&state, Carousel::tick) {
                    tracing::trace!("autoplay {} -> {}", transition.from, transition.to);
                }
            }
        }));
    }
}

fn apply_op(
    state: &watch::Sender<Carousel>,
    op: impl FnOnce(&mut Carousel) -> Option<Transition>,
) -> Option<Transition> {
    let mut outcome = None;
    state.send_if_modified(|carousel| {
        let before = *carousel;
        outcome = op(carousel);
        *carousel != before
    });
    outcome
}

#[cfg(test)]
mod tests {
    use super::*;

    const INTERVAL: Duration = Duration::from_millis(5_000);
    const THRESHOLD: f64 = 10_000.0;

    #[test]
    fn paginate_wraps_in_both_directions() {
        let mut carousel = Carousel::new(3);
        assert_eq!(
            carousel.paginate(-1),
            Some(Transition {
                from: 0,
                to: 2,
                direction: Direction::Backward
            })
        );
        carousel.paginate(1);
        assert_eq!(carousel.index(), 0);
        assert_eq!(carousel.direction(), Direction::Forward);

        for step in [1, 1, -1, 1, 1, 1, -1, -1, -1, -1] {
            carousel.paginate(step);
            assert!(carousel.index() < carousel.len());
        }
    }

    #[test]
    fn paginate_reduces_extreme_deltas() {
        let mut carousel = Carousel::new(3);
        // 2^63 - 1 ≡ 1 (mod 3)
        let transition = carousel.paginate(i64::MAX).expect("moved");
        assert_eq!(transition.to, 1);
        assert_eq!(transition.direction, Direction::Forward);

        // -2^63 ≡ 1 (mod 3)
        let transition = carousel.paginate(i64::MIN).expect("moved");
        assert_eq!(transition.to, 2);
        assert_eq!(transition.direction, Direction::Backward);

        assert_eq!(carousel.paginate(3), None);
        assert_eq!(carousel.index(), 2);
    }

    #[test]
    fn paginate_forward_from_last_of_two_slides() {
        let mut carousel = Carousel::new(2);
        carousel.select(1);
        let transition = carousel.paginate(1).expect("moved");
        assert_eq!(transition.to, 0);
        assert_eq!(carousel.index(), 0);
        assert_eq!(carousel.direction(), Direction::Forward);
    }

    #[test]
    fn tick_always_moves_forward() {
        let mut carousel = Carousel::new(2);
        carousel.paginate(-1);
        assert_eq!(carousel.direction(), Direction::Backward);

        carousel.tick();
        assert_eq!(carousel.direction(), Direction::Forward);
        assert_eq!(carousel.index(), 0);
    }

    #[test]
    fn select_infers_direction_from_target() {
        let mut carousel = Carousel::new(4);
        assert_eq!(carousel.select(3).map(|t| t.direction), Some(Direction::Forward));
        assert_eq!(carousel.select(1).map(|t| t.direction), Some(Direction::Backward));
        assert_eq!(carousel.select(1), None);
        assert_eq!(carousel.select(9), None);
        assert_eq!(carousel.index(), 1);
    }

    #[test]
    fn drag_release_pages_only_past_threshold() {
        let mut carousel = Carousel::new(2);

        let weak = DragRelease {
            offset_x: -40.0,
            velocity_x: -100.0,
        };
        assert_eq!(carousel.release_drag(weak, THRESHOLD), None);
        assert_eq!(carousel.index(), 0);

        let leftwards = DragRelease {
            offset_x: -200.0,
            velocity_x: -800.0,
        };
        let transition = carousel.release_drag(leftwards, THRESHOLD).expect("swiped");
        assert_eq!(transition.direction, Direction::Forward);
        assert_eq!(carousel.index(), 1);

        let rightwards = DragRelease {
            offset_x: 150.0,
            velocity_x: 900.0,
        };
        let transition = carousel.release_drag(rightwards, THRESHOLD).expect("swiped");
        assert_eq!(transition.direction, Direction::Backward);
        assert_eq!(carousel.index(), 0);
    }

    #[test]
    fn direction_picks_consistent_edges() {
        assert_eq!(Direction::Forward.enter_from(), Edge::Right);
        assert_eq!(Direction::Forward.exit_to(), Edge::Left);
        assert_eq!(Direction::Backward.enter_from(), Edge::Left);
        assert_eq!(Direction::Backward.exit_to(), Edge::Right);
    }

    #[test]
    fn empty_and_single_slide_carousels_stay_put() {
        let mut empty = Carousel::new(0);
        assert_eq!(empty.paginate(1), None);
        assert_eq!(empty.tick(), None);

        let mut single = Carousel::new(1);
        assert_eq!(single.paginate(-1), None);
        assert_eq!(single.index(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn autoplay_advances_on_interval() {
        let controller = CarouselController::mount(2, INTERVAL, THRESHOLD);
        let mut updates = controller.subscribe();

        tokio::time::sleep(Duration::from_millis(4_900)).await;
        assert_eq!(controller.state().index(), 0);

        updates.changed().await.expect("tick");
        assert_eq!(controller.state().index(), 1);
        assert_eq!(controller.state().direction(), Direction::Forward);

        updates.changed().await.expect("tick");
        assert_eq!(controller.state().index(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn manual_pagination_does_not_pause_autoplay() {
        let controller = CarouselController::mount(4, INTERVAL, THRESHOLD);

        tokio::time::sleep(Duration::from_millis(4_700)).await;
        controller.paginate(-1);
        assert_eq!(controller.state().index(), 3);
        assert_eq!(controller.state().direction(), Direction::Backward);

        tokio::time::sleep(Duration::from_millis(400)).await;
        assert_eq!(controller.state().index(), 0);
        assert_eq!(controller.state().direction(), Direction::Forward);
    }

    #[tokio::test(start_paused = true)]
    async fn slide_count_change_restarts_the_timer() {
        let mut controller = CarouselController::mount(2, INTERVAL, THRESHOLD);

        tokio::time::sleep(Duration::from_millis(4_000)).await;
        controller.set_slide_count(3);
        tokio::time::sleep(Duration::from_millis(4_000)).await;
        assert_eq!(controller.state().index(), 0);

        tokio::time::sleep(Duration::from_millis(1_100)).await;
        assert_eq!(controller.state().index(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn dropping_the_controller_stops_autoplay() {
        let controller = CarouselController::mount(2, INTERVAL, THRESHOLD);
        let updates = controller.subscribe();
        drop(controller);

        tokio::time::sleep(Duration::from_millis(20_000)).await;
        assert_eq!(updates.borrow().index(), 0);
    }
}
