//! Audio cue scheduling and per-frame mixing.
//!
//! The cue sheet is derived from the timeline windows, so scene effects can
//! never drift from the picture. Mixing a frame covers exactly the samples
//! `[frame_to_sample(f), frame_to_sample(f + 1))`, so consecutive frames tile
//! the output without gaps.

use adreel_core::{frame_to_sample, interpolate, AdreelResult};
use adreel_ir::{usable_url, CompositionProps, RenderSettings, SoundCue, Timeline};
use serde::Serialize;

use crate::provider::AssetProvider;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum CueSource {
    Voiceover,
    Music,
    TransitionIn,
    Ambience,
    TransitionOut,
    Emphasis,
    EndCard,
}

impl std::fmt::Display for CueSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            CueSource::Voiceover => "voiceover",
            CueSource::Music => "music",
            CueSource::TransitionIn => "transition-in",
            CueSource::Ambience => "ambience",
            CueSource::TransitionOut => "transition-out",
            CueSource::Emphasis => "emphasis",
            CueSource::EndCard => "end-card",
        };
        f.write_str(s)
    }
}

/// One entry of the absolute cue sheet. Plays over `[start, end)` frames.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScheduledCue {
    pub source: CueSource,
    pub scene_index: Option<usize>,
    pub url: String,
    pub start: u64,
    pub end: u64,
    pub volume: f64,
    pub looping: bool,
}

impl ScheduledCue {
    pub fn is_active(&self, frame: u64) -> bool {
        self.start <= frame && frame < self.end
    }
}

/// A cue sounding at one frame.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ActiveCue {
    pub source: CueSource,
    pub url: String,
    pub volume: f64,
    pub start_frame: u64,
    /// Position in the source at the start of the frame.
    pub offset_seconds: f64,
    pub looping: bool,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct AudioPlan {
    pub frame: u64,
    pub cues: Vec<ActiveCue>,
}

impl AudioPlan {
    pub fn is_silent(&self) -> bool {
        self.cues.is_empty()
    }
}

/// Interleaved f32 PCM for one frame.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct AudioBuffer {
    pub sample_rate: u32,
    pub channels: u16,
    pub samples: Vec<f32>,
}

impl AudioBuffer {
    pub fn silent(sample_rate: u32, channels: u16, frames: usize) -> Self {
        Self {
            sample_rate,
            channels,
            samples: vec![0.0; frames * usize::from(channels)],
        }
    }

    /// Number of sample frames.
    pub fn frames(&self) -> usize {
        self.samples.len() / usize::from(self.channels.max(1))
    }

    pub fn peak(&self) -> f32 {
        self.samples.iter().fold(0.0f32, |m, s| m.max(s.abs()))
    }
}

/// Concatenate per-frame buffers into one track.
pub fn concat_buffers(buffers: &[AudioBuffer]) -> AudioBuffer {
    let Some(first) = buffers.first() else {
        return AudioBuffer::default();
    };
    let mut samples = Vec::with_capacity(buffers.iter().map(|b| b.samples.len()).sum());
    for b in buffers {
        samples.extend_from_slice(&b.samples);
    }
    AudioBuffer {
        sample_rate: first.sample_rate,
        channels: first.channels,
        samples,
    }
}

fn clamp_volume(v: f64) -> f64 {
    if v.is_finite() {
        v.clamp(0.0, 1.0)
    } else {
        0.0
    }
}

fn voiceover_url(props: &CompositionProps) -> Option<&str> {
    usable_url(props.voiceover_url.as_ref())
}

/// Music gain at a global frame.
///
/// Ducking keyframes, when present, are absolute volumes interpolated
/// linearly and held at both ends. Without them the whole track is ducked
/// when there is a usable voiceover.
pub fn music_volume_at(props: &CompositionProps, settings: &RenderSettings, frame: u64) -> f64 {
    let keys = &props.audio_ducking_keyframes;
    if !keys.is_empty() {
        let mut sorted = keys.clone();
        sorted.sort_by_key(|k| k.frame);
        let idx = sorted.partition_point(|k| k.frame <= frame);
        let v = match (idx.checked_sub(1).and_then(|i| sorted.get(i)), sorted.get(idx)) {
            (Some(a), Some(b)) => interpolate(
                frame as f64,
                [a.frame as f64, b.frame as f64],
                [a.volume, b.volume],
            ),
            (Some(a), None) => a.volume,
            (None, Some(b)) => b.volume,
            (None, None) => 0.0,
        };
        return clamp_volume(v);
    }
    let base = clamp_volume(props.music_volume.unwrap_or(settings.audio.music_volume));
    if voiceover_url(props).is_some() {
        clamp_volume(base * settings.audio.ducking_ratio)
    } else {
        base
    }
}

struct CueLengths<'a> {
    settings: &'a RenderSettings,
    total: u64,
}

impl CueLengths<'_> {
    fn frames(&self, cue: &SoundCue) -> u64 {
        let seconds = cue
            .duration
            .unwrap_or(self.settings.audio.default_sfx_seconds);
        self.settings.frames(seconds).min(self.total)
    }
}

/// The absolute cue sheet for the whole composition, in a stable order:
/// voiceover, music, per-scene effects in scene order, end-card bed.
pub fn schedule(
    props: &CompositionProps,
    timeline: &Timeline,
    settings: &RenderSettings,
) -> Vec<ScheduledCue> {
    let total = timeline.total_frames();
    let mut cues = Vec::new();

    if let Some(url) = voiceover_url(props) {
        cues.push(ScheduledCue {
            source: CueSource::Voiceover,
            scene_index: None,
            url: url.to_string(),
            start: 0,
            end: total,
            volume: 1.0,
            looping: false,
        });
    }
    if let Some(url) = usable_url(props.music_url.as_ref()) {
        cues.push(ScheduledCue {
            source: CueSource::Music,
            scene_index: None,
            url: url.to_string(),
            start: 0,
            end: total,
            volume: music_volume_at(props, settings, 0),
            looping: settings.audio.loop_music,
        });
    }

    let design = props.sound_design();
    if design.enabled {
        let master = design.master_volume;
        let gain = |cue: &SoundCue, fallback: Option<f64>, config: f64| {
            clamp_volume(cue.volume.unwrap_or(fallback.unwrap_or(config)) * master)
        };
        let lengths = CueLengths { settings, total };
        for window in timeline.windows() {
            if window.frames() == 0 {
                continue;
            }
            let Some(sfx) = props
                .scenes
                .get(window.index)
                .and_then(|s| s.sound_design.as_ref())
            else {
                continue;
            };
            let scene_index = Some(window.index);

            if let Some(cue) = &sfx.transition_in {
                if let Some(url) = usable_url(cue.url.as_ref()) {
                    cues.push(ScheduledCue {
                        source: CueSource::TransitionIn,
                        scene_index,
                        url: url.to_string(),
                        start: window.start,
                        end: window.start.saturating_add(lengths.frames(cue)).min(total),
                        volume: gain(cue, design.transition_volume, settings.audio.transition_volume),
                        looping: false,
                    });
                }
            }
            if let Some(cue) = &sfx.ambience {
                if let Some(url) = usable_url(cue.url.as_ref()) {
                    cues.push(ScheduledCue {
                        source: CueSource::Ambience,
                        scene_index,
                        url: url.to_string(),
                        start: window.start,
                        end: window.end,
                        volume: gain(cue, design.ambience_volume, settings.audio.ambience_volume),
                        looping: true,
                    });
                }
            }
            if let Some(cue) = &sfx.transition_out {
                if let Some(url) = usable_url(cue.url.as_ref()) {
                    let start = window
                        .end
                        .saturating_sub(lengths.frames(cue))
                        .max(window.start);
                    cues.push(ScheduledCue {
                        source: CueSource::TransitionOut,
                        scene_index,
                        url: url.to_string(),
                        start,
                        end: window.end,
                        volume: gain(cue, design.transition_volume, settings.audio.transition_volume),
                        looping: false,
                    });
                }
            }
            let emphasis = sfx
                .emphasis
                .iter()
                .find_map(|cue| usable_url(cue.url.as_ref()).map(|url| (cue, url)));
            if let Some((cue, url)) = emphasis {
                let start = window.midpoint();
                cues.push(ScheduledCue {
                    source: CueSource::Emphasis,
                    scene_index,
                    url: url.to_string(),
                    start,
                    end: start.saturating_add(lengths.frames(cue)).min(total),
                    volume: gain(cue, design.emphasis_volume, settings.audio.emphasis_volume),
                    looping: false,
                });
            }
        }
    }

    if let Some(card) = props.active_end_card() {
        if let Some(url) = usable_url(card.audio_url.as_ref()) {
            let start = timeline.tail_start(settings.frames(card.duration));
            if start < total {
                cues.push(ScheduledCue {
                    source: CueSource::EndCard,
                    scene_index: None,
                    url: url.to_string(),
                    start,
                    end: total,
                    volume: 1.0,
                    looping: false,
                });
            }
        }
    }

    cues.retain(|c| c.end > c.start);
    cues
}

/// Active cues at `frame` from a precomputed cue sheet.
pub fn plan_from_schedule(
    cues: &[ScheduledCue],
    props: &CompositionProps,
    settings: &RenderSettings,
    frame: u64,
) -> AudioPlan {
    let fps = settings.fps.as_f64();
    let cues = cues
        .iter()
        .filter(|c| c.is_active(frame))
        .map(|c| ActiveCue {
            source: c.source,
            url: c.url.clone(),
            volume: match c.source {
                CueSource::Music => music_volume_at(props, settings, frame),
                _ => c.volume,
            },
            start_frame: c.start,
            offset_seconds: (frame - c.start) as f64 / fps,
            looping: c.looping,
        })
        .collect();
    AudioPlan { frame, cues }
}

/// Active cues at `frame`.
pub fn audio_plan(
    props: &CompositionProps,
    timeline: &Timeline,
    settings: &RenderSettings,
    frame: u64,
) -> AudioPlan {
    plan_from_schedule(&schedule(props, timeline, settings), props, settings, frame)
}

/// Mix one frame's worth of samples. Cues whose PCM the provider lacks are
/// silent; the sum is clamped to [-1, 1].
pub fn mix_frame(
    plan: &AudioPlan,
    frame: u64,
    settings: &RenderSettings,
    provider: &dyn AssetProvider,
) -> AudioBuffer {
    let rate = settings.sample_rate.max(1);
    let channels = settings.channels.max(1);
    let ch = usize::from(channels);
    let s0 = frame_to_sample(frame, settings.fps, rate);
    let s1 = frame_to_sample(frame + 1, settings.fps, rate);
    let n = (s1 - s0) as usize;
    let mut out = AudioBuffer::silent(rate, channels, n);

    for cue in &plan.cues {
        let Some(clip) = provider.audio(&cue.url) else {
            continue;
        };
        let src_frames = clip.frames();
        if src_frames == 0 || cue.volume <= 0.0 {
            continue;
        }
        let gain = cue.volume as f32;
        let cue_s0 = frame_to_sample(cue.start_frame, settings.fps, rate);
        let ratio = f64::from(clip.sample_rate.max(1)) / f64::from(rate);

        for i in 0..n {
            let rel = (s0 + i as u64).saturating_sub(cue_s0) as f64;
            let mut pos = rel * ratio;
            if cue.looping {
                pos %= src_frames as f64;
            }
            let i0 = pos.floor() as usize;
            if i0 >= src_frames {
                break;
            }
            let i1 = if cue.looping {
                (i0 + 1) % src_frames
            } else {
                (i0 + 1).min(src_frames - 1)
            };
            let frac = (pos - i0 as f64) as f32;
            let (Some((l0, r0)), Some((l1, r1))) = (clip.stereo_at(i0), clip.stereo_at(i1)) else {
                break;
            };
            let l = l0 + (l1 - l0) * frac;
            let r = r0 + (r1 - r0) * frac;
            let dst = i * ch;
            if ch == 1 {
                out.samples[dst] += 0.5 * (l + r) * gain;
            } else {
                out.samples[dst] += l * gain;
                out.samples[dst + 1] += r * gain;
            }
        }
    }

    for s in &mut out.samples {
        *s = s.clamp(-1.0, 1.0);
    }
    out
}

/// Mix the whole composition into one interleaved track.
pub fn mix_all(
    props: &CompositionProps,
    timeline: &Timeline,
    settings: &RenderSettings,
    provider: &dyn AssetProvider,
) -> AdreelResult<AudioBuffer> {
    let cues = schedule(props, timeline, settings);
    let buffers: Vec<AudioBuffer> = (0..timeline.total_frames())
        .map(|f| mix_frame(&plan_from_schedule(&cues, props, settings, f), f, settings, provider))
        .collect();
    tracing::debug!(cues = cues.len(), frames = buffers.len(), "mixed audio");
    Ok(concat_buffers(&buffers))
}
