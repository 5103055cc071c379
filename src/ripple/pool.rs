//! Bounded pool of time-limited circular wave disturbances.

use glam::Vec2;

use crate::gpu_types::{RippleBufferGpu, RippleGpu};

/// Fixed capacity of the ripple pool; also the length of the GPU-side array.
pub const MAX_RIPPLES: usize = 8;

/// One active disturbance on the water surface.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RippleEvent {
    /// Center on the world XZ plane.
    pub center: Vec2,
    /// Simulation-clock time at which the ripple was spawned.
    pub start_time: f32,
    pub intensity: f32,
    /// Lifetime in seconds; the event expires when its age reaches this.
    pub duration: f32,
    pub max_radius: f32,
    /// Propagation speed in m/s; 0 means "use the pool default".
    pub speed: f32,
    /// Recency counter. Newer events always carry a higher value, which is
    /// the only thing eviction looks at.
    priority: u64,
    active: bool,
}

impl RippleEvent {
    fn inactive() -> Self {
        Self {
            center: Vec2::ZERO,
            start_time: 0.0,
            intensity: 0.0,
            duration: 0.0,
            max_radius: 0.0,
            speed: 0.0,
            priority: 0,
            active: false,
        }
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn priority(&self) -> u64 {
        self.priority
    }
}

/// Fixed-capacity ripple pool with priority-based eviction.
///
/// When all 8 slots are active and a new ripple arrives, the slot with the
/// numerically lowest priority (the oldest event) is overwritten. The
/// counter is never reset, only relative order matters.
pub struct RipplePool {
    slots: [RippleEvent; MAX_RIPPLES],
    next_priority: u64,
    /// Default propagation speed serialized into the GPU footer.
    pub default_speed: f32,
    /// Radial decay factor serialized into the GPU footer.
    pub decay: f32,
}

impl Default for RipplePool {
    fn default() -> Self {
        Self::new()
    }
}

impl RipplePool {
    pub fn new() -> Self {
        Self {
            slots: [RippleEvent::inactive(); MAX_RIPPLES],
            next_priority: 0,
            default_speed: 2.5,
            decay: 1.5,
        }
    }

    /// Spawns a ripple at `center`, evicting the oldest event if the pool is
    /// full. Returns the slot index used.
    pub fn add(
        &mut self,
        center: Vec2,
        duration: f32,
        intensity: f32,
        max_radius: f32,
        now: f32,
    ) -> usize {
        let slot = self
            .slots
            .iter()
            .position(|s| !s.active)
            .unwrap_or_else(|| self.lowest_priority_slot());

        self.next_priority += 1;
        self.slots[slot] = RippleEvent {
            center,
            start_time: now,
            intensity,
            duration,
            max_radius,
            speed: 0.0,
            priority: self.next_priority,
            active: true,
        };
        slot
    }

    /// Deactivates every event whose age has reached its duration.
    pub fn update(&mut self, now: f32) {
        for slot in &mut self.slots {
            if slot.active && now - slot.start_time >= slot.duration {
                slot.active = false;
            }
        }
    }

    /// Deactivates all slots. The priority counter keeps climbing.
    pub fn clear(&mut self) {
        for slot in &mut self.slots {
            slot.active = false;
        }
    }

    pub fn active_count(&self) -> usize {
        self.slots.iter().filter(|s| s.active).count()
    }

    pub fn slots(&self) -> &[RippleEvent; MAX_RIPPLES] {
        &self.slots
    }

    /// Packs all active events into the GPU mirror block.
    ///
    /// Entries appear in insertion-slot order, not priority order; consumers
    /// must not assume recency ordering. Identical pool state and `now`
    /// produce byte-identical output.
    pub fn serialize(&self, now: f32) -> RippleBufferGpu {
        let mut out = RippleBufferGpu {
            speed: self.default_speed,
            decay: self.decay,
            current_time: now,
            ..Default::default()
        };

        let mut count = 0usize;
        for slot in self.slots.iter().filter(|s| s.active) {
            out.ripples[count] = RippleGpu {
                position: slot.center.to_array(),
                start_time: slot.start_time,
                intensity: slot.intensity,
                duration: slot.duration,
                max_radius: slot.max_radius,
                speed: if slot.speed > 0.0 {
                    slot.speed
                } else {
                    self.default_speed
                },
                _pad: 0.0,
            };
            count += 1;
        }
        out.active_count = count as u32;
        out
    }

    fn lowest_priority_slot(&self) -> usize {
        self.slots
            .iter()
            .enumerate()
            .min_by_key(|(_, s)| s.priority)
            .map(|(i, _)| i)
            .unwrap_or(0)
    }
}
