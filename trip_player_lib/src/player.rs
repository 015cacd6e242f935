use std::{
    cell::RefCell,
    rc::{Rc, Weak},
};

use crate::{
    config::PlaybackConfig,
    playback::{PlaybackState, Timeline},
    surface::{FrameScheduler, MapSurface, SkipControlHost},
    trip::Trip,
    MIN_TRIP_POINTS,
};

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PlayerError {
    #[error("trip has {0} point(s), at least 2 are needed for playback")]
    TooFewPoints(usize),
    #[error("player session is busy")]
    SessionBusy,
}

/// Animates one trip at a time on a map surface.
///
/// Frame callbacks and the skip control only hold weak references to the session, so
/// dropping the player stops the animation at the next frame.
pub struct TripPlayer<M, F, K>
where
    M: MapSurface,
    F: FrameScheduler,
{
    session: Rc<RefCell<PlayerSession<M, F, K>>>,
}

struct PlayerSession<M, F, K>
where
    M: MapSurface,
    F: FrameScheduler,
{
    surface: M,
    scheduler: F,
    skip_host: K,
    config: PlaybackConfig,
    playback: Option<ActivePlayback<M, F>>,
}

struct ActivePlayback<M, F>
where
    M: MapSurface,
    F: FrameScheduler,
{
    trip: Trip,
    timeline: Timeline,
    state: PlaybackState,
    group: M::Group,
    marker: M::Marker,
    path: M::Path,
    end_marker: Option<M::Marker>,
    frame: Option<F::Handle>,
}

type SharedSession<M, F, K> = Rc<RefCell<PlayerSession<M, F, K>>>;

impl<M, F, K> TripPlayer<M, F, K>
where
    M: MapSurface + 'static,
    F: FrameScheduler + 'static,
    K: SkipControlHost + 'static,
{
    pub fn new(surface: M, scheduler: F, skip_host: K, config: PlaybackConfig) -> Self {
        Self {
            session: Rc::new(RefCell::new(PlayerSession {
                surface,
                scheduler,
                skip_host,
                config,
                playback: None,
            })),
        }
    }

    /// Replaces whatever is playing with `trip`. Trips with fewer than two points are
    /// rejected before anything on the map changes.
    pub fn play(&self, trip: Trip) -> Result<(), PlayerError> {
        if trip.len() < MIN_TRIP_POINTS {
            tracing::warn!(points = trip.len(), "Trip has too few points to play back");
            return Err(PlayerError::TooFewPoints(trip.len()));
        }

        let mut session = self
            .session
            .try_borrow_mut()
            .map_err(|_| PlayerError::SessionBusy)?;
        session.clear();
        session.start(trip, Rc::downgrade(&self.session));
        Ok(())
    }

    /// Jumps to the end of the current playback. Does nothing if nothing is playing.
    pub fn finish(&self) -> Result<(), PlayerError> {
        let mut session = self
            .session
            .try_borrow_mut()
            .map_err(|_| PlayerError::SessionBusy)?;
        session.finish();
        Ok(())
    }

    /// Removes the current playback and everything it drew.
    pub fn clear(&self) -> Result<(), PlayerError> {
        let mut session = self
            .session
            .try_borrow_mut()
            .map_err(|_| PlayerError::SessionBusy)?;
        session.clear();
        Ok(())
    }

    /// Fits the view to the whole current trip. Returns false when nothing is playing.
    pub fn fit(&self) -> Result<bool, PlayerError> {
        let mut session = self
            .session
            .try_borrow_mut()
            .map_err(|_| PlayerError::SessionBusy)?;
        Ok(session.fit())
    }

    pub fn state(&self) -> PlaybackState {
        self.session
            .try_borrow()
            .ok()
            .and_then(|session| session.playback.as_ref().map(|playback| playback.state))
            .unwrap_or_default()
    }
}

impl<M, F, K> PlayerSession<M, F, K>
where
    M: MapSurface + 'static,
    F: FrameScheduler + 'static,
    K: SkipControlHost + 'static,
{
    fn start(&mut self, trip: Trip, handle: Weak<RefCell<Self>>) {
        let timeline = Timeline::new(&trip, &self.config);
        let positions = trip.positions();

        let group = self.surface.create_group();
        let marker = self
            .surface
            .add_marker(&group, positions[0], &self.config.start_marker);
        let path = self.surface.add_path(&group, &self.config.path);

        let on_skip = handle.clone();
        self.skip_host.show_skip_control(Box::new(move || {
            if let Some(session) = on_skip.upgrade() {
                match session.try_borrow_mut() {
                    Ok(mut session) => session.finish(),
                    Err(_) => tracing::warn!("Skip ignored, player session is busy"),
                };
            }
        }));

        tracing::debug!(
            points = trip.len(),
            frames = timeline.frame_count(),
            "Starting trip playback"
        );

        let state = timeline.start();
        let frame = self.scheduler.request_frame(frame_callback(handle));

        self.playback = Some(ActivePlayback {
            trip,
            timeline,
            state,
            group,
            marker,
            path,
            end_marker: None,
            frame: Some(frame),
        });
    }

    fn render_frame(&mut self, handle: Weak<RefCell<Self>>) {
        let Some(playback) = self.playback.as_mut() else {
            return;
        };

        // This frame's handle has fired.
        playback.frame = None;

        if let Some(position) = playback.timeline.position(&playback.trip, playback.state) {
            self.surface.move_marker(&playback.marker, position);
            self.surface.extend_path(&playback.path, position);
        }
        playback.state = playback.timeline.advance(playback.state);

        let state = playback.state;
        match state {
            PlaybackState::Playing { .. } => {
                playback.frame = Some(self.scheduler.request_frame(frame_callback(handle)));
            }
            PlaybackState::Finished => self.finish(),
            PlaybackState::Idle => {}
        }
    }

    fn finish(&mut self) {
        let Some(playback) = self.playback.as_mut() else {
            return;
        };

        if let Some(frame) = playback.frame.take() {
            self.scheduler.cancel_frame(frame);
        }

        if playback.end_marker.is_some() {
            return;
        }

        let positions = playback.trip.positions();
        self.surface.set_path(&playback.path, &positions);

        if let Some(&last) = positions.last() {
            self.surface.move_marker(&playback.marker, last);
            playback.end_marker =
                Some(self.surface.add_marker(&playback.group, last, &self.config.end_marker));
        }

        if let Some(bounds) = playback.trip.bounds() {
            self.surface.fit_bounds(bounds, self.config.fit_padding);
        }

        self.skip_host.hide_skip_control();
        playback.state = PlaybackState::Finished;

        tracing::debug!(points = positions.len(), "Trip playback finished");
    }

    fn fit(&mut self) -> bool {
        let Some(bounds) = self.playback.as_ref().and_then(|playback| playback.trip.bounds()) else {
            return false;
        };
        self.surface.fit_bounds(bounds, self.config.fit_padding);
        true
    }

    fn clear(&mut self) {
        let Some(mut playback) = self.playback.take() else {
            return;
        };

        if let Some(frame) = playback.frame.take() {
            self.scheduler.cancel_frame(frame);
        }
        self.surface.remove_group(playback.group);
        self.skip_host.hide_skip_control();

        tracing::debug!("Cleared trip playback");
    }
}

fn frame_callback<M, F, K>(handle: Weak<RefCell<PlayerSession<M, F, K>>>) -> Box<dyn FnOnce()>
where
    M: MapSurface + 'static,
    F: FrameScheduler + 'static,
    K: SkipControlHost + 'static,
{
    Box::new(move || {
        let Some(session): Option<SharedSession<M, F, K>> = handle.upgrade() else {
            return;
        };

        match session.try_borrow_mut() {
            Ok(mut session) => session.render_frame(handle),
            Err(_) => tracing::warn!("Frame skipped, player session is busy"),
        };
    })
}
