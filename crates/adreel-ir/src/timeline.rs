//! Absolute frame windows for every scene.
//!
//! The timeline is built once per render by a single prefix-sum pass. Every
//! downstream consumer (per-frame evaluation, brand injection, the audio
//! scheduler) reads these windows instead of re-accumulating durations, so
//! they can never disagree about where a scene starts.

use serde::{Deserialize, Serialize};

use adreel_core::{seconds_to_frames, Fps};

use crate::composition::CompositionProps;
use crate::scene::Scene;
use crate::settings::RenderSettings;

/// The `[start, end)` frame range a scene occupies.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SceneWindow {
    pub index: usize,
    pub scene_id: String,
    pub start: u64,
    pub end: u64,
}

impl SceneWindow {
    pub fn frames(&self) -> u64 {
        self.end - self.start
    }

    pub fn contains(&self, frame: u64) -> bool {
        frame >= self.start && frame < self.end
    }

    /// Frame at the temporal midpoint of the window.
    pub fn midpoint(&self) -> u64 {
        self.start + self.frames() / 2
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Timeline {
    windows: Vec<SceneWindow>,
    total_frames: u64,
    fps: Fps,
}

/// Frame count of one scene: missing durations take the default, unusable
/// ones occupy no frames at all.
pub fn scene_frames(scene: &Scene, fps: Fps, default_seconds: f64) -> u64 {
    let seconds = scene.duration.unwrap_or(default_seconds);
    seconds_to_frames(seconds, fps)
}

impl Timeline {
    pub fn build(props: &CompositionProps, settings: &RenderSettings) -> Self {
        let fps = settings.fps;
        let mut windows = Vec::with_capacity(props.scenes.len());
        let mut cursor = 0u64;
        for (index, scene) in props.scenes.iter().enumerate() {
            let frames = scene_frames(scene, fps, settings.default_scene_seconds);
            if frames == 0 {
                tracing::debug!(scene = %scene.id, "scene has no usable duration, skipping");
            }
            windows.push(SceneWindow {
                index,
                scene_id: scene.id.clone(),
                start: cursor,
                end: cursor.saturating_add(frames),
            });
            cursor = cursor.saturating_add(frames);
        }
        Self {
            windows,
            total_frames: cursor.max(settings.minimum_frames.max(1)),
            fps,
        }
    }

    pub fn windows(&self) -> &[SceneWindow] {
        &self.windows
    }

    pub fn window(&self, index: usize) -> Option<&SceneWindow> {
        self.windows.get(index)
    }

    pub fn total_frames(&self) -> u64 {
        self.total_frames
    }

    /// Frames covered by scenes, before the minimum-length floor.
    pub fn content_frames(&self) -> u64 {
        self.windows.last().map(|w| w.end).unwrap_or(0)
    }

    pub fn fps(&self) -> Fps {
        self.fps
    }

    pub fn scene_count(&self) -> usize {
        self.windows.len()
    }

    pub fn is_last(&self, index: usize) -> bool {
        index + 1 == self.windows.len()
    }

    /// The active scene window and the frame local to it.
    ///
    /// Zero-length windows are never active. Frames after the last scene
    /// (padding up to the minimum length) have no active scene.
    pub fn scene_at(&self, frame: u64) -> Option<(&SceneWindow, u64)> {
        let idx = self.windows.partition_point(|w| w.end <= frame);
        let window = self.windows.get(idx)?;
        window
            .contains(frame)
            .then(|| (window, frame - window.start))
    }

    /// First frame of a tail segment of `frames` length, saturating at 0.
    pub fn tail_start(&self, frames: u64) -> u64 {
        self.total_frames.saturating_sub(frames)
    }

    pub fn duration_seconds(&self) -> f64 {
        self.total_frames as f64 / self.fps.as_f64()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scene::SceneType;

    fn props(durations: &[Option<f64>]) -> CompositionProps {
        CompositionProps {
            scenes: durations
                .iter()
                .enumerate()
                .map(|(i, d)| Scene {
                    id: format!("s{i}"),
                    kind: SceneType::Benefit,
                    duration: *d,
                    ..Default::default()
                })
                .collect(),
            ..Default::default()
        }
    }

    #[test]
    fn test_prefix_sum() {
        let p = props(&[Some(4.0), Some(2.5), Some(3.0)]);
        let tl = Timeline::build(&p, &RenderSettings::default());
        let spans: Vec<(u64, u64)> = tl.windows().iter().map(|w| (w.start, w.end)).collect();
        assert_eq!(spans, vec![(0, 120), (120, 195), (195, 285)]);
        assert_eq!(tl.total_frames(), 285);
    }

    #[test]
    fn test_windows_contiguous() {
        let p = props(&[Some(1.37), Some(0.51), Some(2.02), Some(0.99)]);
        let tl = Timeline::build(&p, &RenderSettings::default());
        for pair in tl.windows().windows(2) {
            assert_eq!(pair[0].end, pair[1].start);
        }
        assert_eq!(tl.windows()[0].start, 0);
        let sum: u64 = tl.windows().iter().map(|w| w.frames()).sum();
        assert_eq!(tl.total_frames(), sum);
    }

    #[test]
    fn test_missing_duration_defaults_to_five_seconds() {
        let p = props(&[None]);
        let tl = Timeline::build(&p, &RenderSettings::default());
        assert_eq!(tl.windows()[0].frames(), 150);
    }

    #[test]
    fn test_zero_and_negative_durations_take_no_frames() {
        let p = props(&[Some(2.0), Some(0.0), Some(-3.0), Some(f64::NAN), Some(1.0)]);
        let tl = Timeline::build(&p, &RenderSettings::default());
        assert_eq!(tl.windows()[1].frames(), 0);
        assert_eq!(tl.windows()[2].frames(), 0);
        assert_eq!(tl.windows()[3].frames(), 0);
        assert_eq!(tl.total_frames(), 90);
        let (w, local) = tl.scene_at(60).unwrap();
        assert_eq!(w.index, 4);
        assert_eq!(local, 0);
    }

    #[test]
    fn test_huge_durations_saturate() {
        let p = props(&[Some(1e300), Some(1e300)]);
        let tl = Timeline::build(&p, &RenderSettings::default());
        assert_eq!(tl.windows()[0].end, u64::MAX);
        assert_eq!(tl.windows()[1].start, u64::MAX);
        assert_eq!(tl.total_frames(), u64::MAX);
        let (w, local) = tl.scene_at(40).unwrap();
        assert_eq!((w.index, local), (0, 40));
    }

    #[test]
    fn test_all_zero_collapses_to_minimum() {
        let p = props(&[Some(0.0), Some(0.0)]);
        let tl = Timeline::build(&p, &RenderSettings::default());
        assert_eq!(tl.total_frames(), 30);
        assert_eq!(tl.content_frames(), 0);
        assert!(tl.scene_at(0).is_none());
    }

    #[test]
    fn test_no_scenes_uses_minimum() {
        let tl = Timeline::build(&props(&[]), &RenderSettings::default());
        assert_eq!(tl.total_frames(), 30);
        assert!(tl.scene_at(10).is_none());
    }

    #[test]
    fn test_short_content_is_padded() {
        let p = props(&[Some(0.5)]);
        let tl = Timeline::build(&p, &RenderSettings::default());
        assert_eq!(tl.total_frames(), 30);
        assert!(tl.scene_at(14).is_some());
        assert!(tl.scene_at(15).is_none());
    }

    #[test]
    fn test_scene_at_boundaries() {
        let p = props(&[Some(4.0), Some(3.0)]);
        let tl = Timeline::build(&p, &RenderSettings::default());
        let (w, local) = tl.scene_at(0).unwrap();
        assert_eq!((w.index, local), (0, 0));
        let (w, local) = tl.scene_at(119).unwrap();
        assert_eq!((w.index, local), (0, 119));
        let (w, local) = tl.scene_at(120).unwrap();
        assert_eq!((w.index, local), (1, 0));
        assert!(tl.scene_at(210).is_none());
    }

    #[test]
    fn test_every_frame_maps_to_exactly_one_scene() {
        let p = props(&[Some(1.1), Some(0.0), Some(0.7), Some(2.3)]);
        let tl = Timeline::build(&p, &RenderSettings::default());
        for frame in 0..tl.content_frames() {
            let hits = tl.windows().iter().filter(|w| w.contains(frame)).count();
            assert_eq!(hits, 1, "frame {frame}");
            let (w, _) = tl.scene_at(frame).unwrap();
            assert!(w.contains(frame));
        }
    }

    #[test]
    fn test_tail_start_saturates() {
        let p = props(&[Some(2.0)]);
        let tl = Timeline::build(&p, &RenderSettings::default());
        assert_eq!(tl.tail_start(30), 30);
        assert_eq!(tl.tail_start(500), 0);
    }
}
