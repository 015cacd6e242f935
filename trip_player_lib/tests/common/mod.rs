#![allow(dead_code)]

use std::{cell::RefCell, collections::BTreeMap, rc::Rc};

use chrono::{DateTime, TimeDelta, TimeZone, Utc};
use geo_types::{Point, Rect};
use trip_player_lib::{
    surface::{FrameScheduler, MapSurface, MarkerStyle, PathStyle, SkipControlHost},
    PlaybackConfig, Trip, TripPlayer, TripPoint,
};

pub fn at(secs: f64) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 3, 1, 8, 0, 0).unwrap()
        + TimeDelta::milliseconds((secs * 1000.0) as i64)
}

/// A trip heading north-east, one point per entry of `offsets` (seconds from start).
pub fn trip_with_offsets(offsets: &[f64]) -> Trip {
    Trip::new(
        offsets
            .iter()
            .enumerate()
            .map(|(i, secs)| TripPoint::new(43.20 + i as f64 * 0.01, 76.80 + i as f64 * 0.01, at(*secs)))
            .collect(),
    )
}

#[derive(Debug, Default)]
pub struct MapState {
    next_id: usize,
    pub groups: BTreeMap<usize, Vec<usize>>,
    pub markers: BTreeMap<usize, Point>,
    pub paths: BTreeMap<usize, Vec<Point>>,
    /// Every point ever appended to a path, in order.
    pub extended: Vec<Point>,
    pub fitted: Vec<(Rect, f64)>,
    pub operations: usize,
}

impl MapState {
    fn id(&mut self) -> usize {
        self.next_id += 1;
        self.next_id
    }

    pub fn only_path(&self) -> &Vec<Point> {
        assert_eq!(self.paths.len(), 1, "expected exactly one path");
        self.paths.values().next().unwrap()
    }
}

#[derive(Clone, Default)]
pub struct RecordingSurface {
    pub state: Rc<RefCell<MapState>>,
}

impl MapSurface for RecordingSurface {
    type Group = usize;
    type Marker = usize;
    type Path = usize;

    fn create_group(&mut self) -> usize {
        let mut state = self.state.borrow_mut();
        state.operations += 1;
        let id = state.id();
        state.groups.insert(id, Vec::new());
        id
    }

    fn remove_group(&mut self, group: usize) {
        let mut state = self.state.borrow_mut();
        state.operations += 1;
        for layer in state.groups.remove(&group).unwrap_or_default() {
            state.markers.remove(&layer);
            state.paths.remove(&layer);
        }
    }

    fn add_marker(&mut self, group: &usize, at: Point, _style: &MarkerStyle) -> usize {
        let mut state = self.state.borrow_mut();
        state.operations += 1;
        let id = state.id();
        state.markers.insert(id, at);
        state.groups.get_mut(group).expect("group exists").push(id);
        id
    }

    fn move_marker(&mut self, marker: &usize, to: Point) {
        let mut state = self.state.borrow_mut();
        state.operations += 1;
        *state.markers.get_mut(marker).expect("marker exists") = to;
    }

    fn add_path(&mut self, group: &usize, _style: &PathStyle) -> usize {
        let mut state = self.state.borrow_mut();
        state.operations += 1;
        let id = state.id();
        state.paths.insert(id, Vec::new());
        state.groups.get_mut(group).expect("group exists").push(id);
        id
    }

    fn extend_path(&mut self, path: &usize, point: Point) {
        let mut state = self.state.borrow_mut();
        state.operations += 1;
        state.paths.get_mut(path).expect("path exists").push(point);
        state.extended.push(point);
    }

    fn set_path(&mut self, path: &usize, points: &[Point]) {
        let mut state = self.state.borrow_mut();
        state.operations += 1;
        *state.paths.get_mut(path).expect("path exists") = points.to_vec();
    }

    fn fit_bounds(&mut self, bounds: Rect, padding: f64) {
        let mut state = self.state.borrow_mut();
        state.operations += 1;
        state.fitted.push((bounds, padding));
    }
}

#[derive(Default)]
pub struct FrameQueue {
    next_id: u64,
    pending: Vec<(u64, Box<dyn FnOnce()>)>,
    pub requested: usize,
    pub cancelled: usize,
}

impl FrameQueue {
    pub fn pending(&self) -> usize {
        self.pending.len()
    }
}

/// Frames only run when the test pumps them.
#[derive(Clone, Default)]
pub struct ManualFrames {
    pub queue: Rc<RefCell<FrameQueue>>,
}

impl ManualFrames {
    /// Runs the oldest pending frame, false if none was pending.
    pub fn run_next(&self) -> bool {
        let next = {
            let mut queue = self.queue.borrow_mut();
            if queue.pending.is_empty() {
                None
            } else {
                Some(queue.pending.remove(0))
            }
        };

        match next {
            Some((_, callback)) => {
                callback();
                true
            }
            None => false,
        }
    }

    pub fn run(&self, frames: usize) -> usize {
        (0..frames).take_while(|_| self.run_next()).count()
    }

    pub fn run_all(&self) -> usize {
        let mut ran = 0;
        while self.run_next() {
            ran += 1;
            assert!(ran < 100_000, "playback never finished");
        }
        ran
    }
}

impl FrameScheduler for ManualFrames {
    type Handle = u64;

    fn request_frame(&mut self, callback: Box<dyn FnOnce()>) -> u64 {
        let mut queue = self.queue.borrow_mut();
        queue.next_id += 1;
        queue.requested += 1;
        let id = queue.next_id;
        queue.pending.push((id, callback));
        id
    }

    fn cancel_frame(&mut self, handle: u64) {
        let mut queue = self.queue.borrow_mut();
        queue.cancelled += 1;
        queue.pending.retain(|(id, _)| *id != handle);
    }
}

#[derive(Default)]
pub struct SkipState {
    action: Option<Rc<dyn Fn()>>,
    pub shown: usize,
    pub hidden: usize,
}

impl SkipState {
    pub fn is_visible(&self) -> bool {
        self.action.is_some()
    }
}

#[derive(Clone, Default)]
pub struct RecordingSkipHost {
    pub state: Rc<RefCell<SkipState>>,
}

impl RecordingSkipHost {
    /// Clicks the skip control, false if none is shown.
    pub fn press(&self) -> bool {
        let action = self.state.borrow().action.clone();
        match action {
            Some(action) => {
                action();
                true
            }
            None => false,
        }
    }
}

impl SkipControlHost for RecordingSkipHost {
    fn show_skip_control(&mut self, on_activate: Box<dyn Fn()>) {
        let mut state = self.state.borrow_mut();
        state.shown += 1;
        state.action = Some(Rc::from(on_activate));
    }

    fn hide_skip_control(&mut self) {
        let mut state = self.state.borrow_mut();
        state.hidden += 1;
        state.action = None;
    }
}

pub type TestPlayer = TripPlayer<RecordingSurface, ManualFrames, RecordingSkipHost>;

pub struct Harness {
    pub player: TestPlayer,
    pub map: RecordingSurface,
    pub frames: ManualFrames,
    pub skip: RecordingSkipHost,
}

impl Harness {
    pub fn new() -> Self {
        Self::with_config(PlaybackConfig::default())
    }

    pub fn with_config(config: PlaybackConfig) -> Self {
        let map = RecordingSurface::default();
        let frames = ManualFrames::default();
        let skip = RecordingSkipHost::default();

        Self {
            player: TripPlayer::new(map.clone(), frames.clone(), skip.clone(), config),
            map,
            frames,
            skip,
        }
    }
}
