//! Audio system using Web Audio API
//!
//! Procedurally generated sound effects and a looping chase tune - no
//! external files needed. Browsers start the context suspended until a user
//! gesture; every call here is fire-and-forget and failures are only logged.

use web_sys::{AudioContext, AudioNode, GainNode, OscillatorNode, OscillatorType};

use crate::Error;
use crate::events::EventListener;
use crate::settings::Settings;
use crate::sim::GameEvent;

/// Sound effect types
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SoundEffect {
    /// Round begins
    Start,
    /// Dropping picked up
    Collect,
    /// Rabbit caught
    Victory,
    /// Clock ran out
    TimeUp,
    /// Result made a leaderboard
    NewRecord,
}

impl SoundEffect {
    pub fn for_event(event: &GameEvent) -> Option<Self> {
        match event {
            GameEvent::Started => Some(SoundEffect::Start),
            GameEvent::Collected { .. } => Some(SoundEffect::Collect),
            GameEvent::Victory => Some(SoundEffect::Victory),
            GameEvent::TimeUp => Some(SoundEffect::TimeUp),
            GameEvent::DroppingSpawned { .. } | GameEvent::Reset => None,
        }
    }
}

/// Chase tune, one entry per step (Hz, 0 = rest)
const BGM_NOTES: [f32; 16] = [
    392.0, 0.0, 440.0, 523.25, 0.0, 440.0, 392.0, 329.63, //
    392.0, 0.0, 523.25, 587.33, 659.25, 587.33, 523.25, 0.0,
];
const BGM_STEP_SECS: f64 = 0.2;
/// How far ahead of the clock notes are queued
const BGM_LOOKAHEAD_SECS: f64 = 0.3;

/// Background music in progress
struct Bgm {
    /// All music notes route through here so volume changes apply at once
    bus: GainNode,
    next_note_at: f64,
    step: usize,
}

/// Audio manager for the game
pub struct AudioManager {
    ctx: Option<AudioContext>,
    settings: Settings,
    focused: bool,
    bgm: Option<Bgm>,
}

impl AudioManager {
    pub fn new(settings: &Settings) -> Self {
        // May fail outside a secure context
        let ctx = AudioContext::new().ok();
        if ctx.is_none() {
            log::warn!("Failed to create AudioContext - audio disabled");
        }
        Self {
            ctx,
            settings: settings.clone(),
            focused: true,
            bgm: None,
        }
    }

    /// Resume audio context (required after user gesture)
    pub fn resume(&self) {
        if let Some(ctx) = &self.ctx {
            let _ = ctx.resume();
        }
    }

    /// Pick up volume/toggle changes
    pub fn apply_settings(&mut self, settings: &Settings) {
        self.settings = settings.clone();
        self.apply_bgm_level();
    }

    /// Window focus changed; music mutes while unfocused if the settings say so
    pub fn set_focused(&mut self, focused: bool) {
        self.focused = focused;
        self.apply_bgm_level();
    }

    pub fn is_bgm_playing(&self) -> bool {
        self.bgm.is_some()
    }

    /// Start the looping tune from the top
    pub fn start_bgm(&mut self) {
        self.stop_bgm();
        let Some(ctx) = &self.ctx else { return };
        let Ok(bus) = ctx.create_gain() else {
            log::warn!("Failed to create music gain node");
            return;
        };
        if bus.connect_with_audio_node(&ctx.destination()).is_err() {
            log::warn!("Failed to connect music output");
            return;
        }
        bus.gain().set_value(self.settings.bgm_level(self.focused));
        self.bgm = Some(Bgm {
            bus,
            next_note_at: ctx.current_time() + 0.05,
            step: 0,
        });
        log::debug!("Music started");
    }

    pub fn stop_bgm(&mut self) {
        if let Some(bgm) = self.bgm.take() {
            bgm.bus.gain().set_value(0.0);
            let _ = bgm.bus.disconnect();
            log::debug!("Music stopped");
        }
    }

    /// Queue upcoming music notes. Call once per frame.
    pub fn pump_bgm(&mut self) {
        let (Some(ctx), Some(bgm)) = (&self.ctx, self.bgm.as_mut()) else {
            return;
        };
        let now = ctx.current_time();
        // Frames were skipped (hidden tab): pick up from now instead of bursting
        if bgm.next_note_at < now {
            bgm.next_note_at = now + 0.05;
        }
        while bgm.next_note_at < now + BGM_LOOKAHEAD_SECS {
            let freq = BGM_NOTES[bgm.step % BGM_NOTES.len()];
            if freq > 0.0 {
                Self::blip(
                    ctx,
                    &bgm.bus,
                    freq,
                    OscillatorType::Triangle,
                    bgm.next_note_at,
                    BGM_STEP_SECS * 0.8,
                    0.5,
                );
            }
            bgm.step += 1;
            bgm.next_note_at += BGM_STEP_SECS;
        }
    }

    fn apply_bgm_level(&self) {
        if let Some(bgm) = &self.bgm {
            bgm.bus.gain().set_value(self.settings.bgm_level(self.focused));
        }
    }

    /// Play a sound effect
    pub fn play(&self, effect: SoundEffect) {
        let vol = self.settings.effective_sfx_volume();
        if vol <= 0.0 {
            return;
        }

        let Some(ctx) = &self.ctx else { return };

        if ctx.state() == web_sys::AudioContextState::Suspended {
            let _ = ctx.resume();
        }

        match effect {
            SoundEffect::Start => Self::play_start(ctx, vol),
            SoundEffect::Collect => Self::play_collect(ctx, vol),
            SoundEffect::Victory => Self::play_victory(ctx, vol),
            SoundEffect::TimeUp => Self::play_time_up(ctx, vol),
            SoundEffect::NewRecord => Self::play_new_record(ctx, vol),
        }
    }

    // === Sound generators ===

    /// Create an oscillator with gain envelope, routed into `out`
    fn create_osc(
        ctx: &AudioContext,
        out: &AudioNode,
        freq: f32,
        osc_type: OscillatorType,
    ) -> Option<(OscillatorNode, GainNode)> {
        let osc = ctx.create_oscillator().ok()?;
        let gain = ctx.create_gain().ok()?;

        osc.set_type(osc_type);
        osc.frequency().set_value(freq);
        osc.connect_with_audio_node(&gain).ok()?;
        gain.connect_with_audio_node(out).ok()?;

        Some((osc, gain))
    }

    /// Short tone at `start`, fading out over `len`
    fn blip(
        ctx: &AudioContext,
        out: &AudioNode,
        freq: f32,
        osc_type: OscillatorType,
        start: f64,
        len: f64,
        vol: f32,
    ) {
        let Some((osc, gain)) = Self::create_osc(ctx, out, freq, osc_type) else {
            return;
        };
        gain.gain().set_value_at_time(0.0, start).ok();
        gain.gain().linear_ramp_to_value_at_time(vol, start + 0.01).ok();
        gain.gain()
            .exponential_ramp_to_value_at_time(0.01, start + len)
            .ok();
        osc.start_with_when(start).ok();
        osc.stop_with_when(start + len + 0.02).ok();
    }

    /// Rising two-note "go"
    fn play_start(ctx: &AudioContext, vol: f32) {
        let out = ctx.destination();
        let t = ctx.current_time();
        Self::blip(ctx, &out, 440.0, OscillatorType::Square, t, 0.1, vol * 0.25);
        Self::blip(ctx, &out, 660.0, OscillatorType::Square, t + 0.12, 0.15, vol * 0.25);
    }

    /// Bright chirp sweeping up
    fn play_collect(ctx: &AudioContext, vol: f32) {
        let Some((osc, gain)) = Self::create_osc(ctx, &ctx.destination(), 600.0, OscillatorType::Sine)
        else {
            return;
        };
        let t = ctx.current_time();

        gain.gain().set_value_at_time(vol * 0.5, t).ok();
        gain.gain()
            .exponential_ramp_to_value_at_time(0.01, t + 0.15)
            .ok();
        osc.frequency().set_value_at_time(600.0, t).ok();
        osc.frequency()
            .exponential_ramp_to_value_at_time(1200.0, t + 0.1)
            .ok();

        osc.start().ok();
        osc.stop_with_when(t + 0.2).ok();
    }

    /// Major arpeggio fanfare
    fn play_victory(ctx: &AudioContext, vol: f32) {
        let out = ctx.destination();
        let t = ctx.current_time();
        for (i, freq) in [523.25, 659.25, 783.99, 1046.5].into_iter().enumerate() {
            let start = t + i as f64 * 0.12;
            let len = if i == 3 { 0.5 } else { 0.15 };
            Self::blip(ctx, &out, freq, OscillatorType::Triangle, start, len, vol * 0.4);
        }
    }

    /// Sad descending slide
    fn play_time_up(ctx: &AudioContext, vol: f32) {
        let Some((osc, gain)) =
            Self::create_osc(ctx, &ctx.destination(), 400.0, OscillatorType::Sawtooth)
        else {
            return;
        };
        let t = ctx.current_time();

        gain.gain().set_value_at_time(vol * 0.3, t).ok();
        gain.gain()
            .exponential_ramp_to_value_at_time(0.01, t + 0.8)
            .ok();
        osc.frequency().set_value_at_time(400.0, t).ok();
        osc.frequency()
            .exponential_ramp_to_value_at_time(100.0, t + 0.8)
            .ok();

        osc.start().ok();
        osc.stop_with_when(t + 0.85).ok();
    }

    /// Sparkly high run
    fn play_new_record(ctx: &AudioContext, vol: f32) {
        let out = ctx.destination();
        let t = ctx.current_time();
        for (i, freq) in [1046.5, 1318.5, 1568.0, 2093.0, 1568.0, 2093.0].into_iter().enumerate() {
            Self::blip(ctx, &out, freq, OscillatorType::Sine, t + i as f64 * 0.07, 0.1, vol * 0.3);
        }
    }
}

impl EventListener for AudioManager {
    fn name(&self) -> &'static str {
        "audio"
    }

    fn on_event(&mut self, event: &GameEvent) -> Result<(), Error> {
        if self.ctx.is_none() {
            return Err(Error::Listener {
                name: "audio",
                detail: "no AudioContext".into(),
            });
        }
        if let Some(effect) = SoundEffect::for_event(event) {
            self.play(effect);
        }
        match event {
            GameEvent::Started => self.start_bgm(),
            GameEvent::Victory | GameEvent::TimeUp | GameEvent::Reset => self.stop_bgm(),
            GameEvent::Collected { .. } | GameEvent::DroppingSpawned { .. } => {}
        }
        Ok(())
    }
}
