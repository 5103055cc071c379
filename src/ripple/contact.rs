//! Collision-driven ripple debouncing.
//!
//! A body standing in the water overlaps the surface every frame; without
//! debouncing each frame would spawn a duplicate ripple and flood the pool.
//! A ripple is only warranted on the rising edge of a contact, or once the
//! body has moved far enough while staying in contact.

use glam::Vec2;

/// Per-object contact state.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HitRecord {
    /// Caller-assigned identifier of the colliding object.
    pub id: u64,
    /// Position recorded the last time this object spawned a ripple.
    pub last_position: Vec2,
    /// Whether the object was in contact on the previous report.
    pub was_hitting: bool,
}

/// Tracks contact records and decides when a ripple should spawn.
pub struct ContactTracker {
    records: Vec<HitRecord>,
    /// Minimum XZ displacement (meters) that re-triggers a ripple during
    /// continuous contact.
    pub min_move_distance: f32,
    capacity: usize,
}

impl Default for ContactTracker {
    fn default() -> Self {
        Self::new(16, 0.5)
    }
}

impl ContactTracker {
    pub fn new(capacity: usize, min_move_distance: f32) -> Self {
        Self {
            records: Vec::with_capacity(capacity),
            min_move_distance,
            capacity,
        }
    }

    /// Reports the contact state of object `id` this frame. Returns `true`
    /// when a ripple should be spawned at `position`.
    ///
    /// Spawn conditions: not-hitting → hitting transition, or displacement
    /// beyond `min_move_distance` since the last spawn while still hitting.
    pub fn report(&mut self, id: u64, position: Vec2, hitting: bool) -> bool {
        match self.records.iter_mut().find(|r| r.id == id) {
            Some(record) => {
                let rising_edge = hitting && !record.was_hitting;
                let moved = hitting
                    && record.was_hitting
                    && record.last_position.distance(position) >= self.min_move_distance;

                record.was_hitting = hitting;
                if rising_edge || moved {
                    record.last_position = position;
                    return true;
                }
                false
            }
            None => {
                if hitting {
                    self.insert(HitRecord {
                        id,
                        last_position: position,
                        was_hitting: true,
                    });
                }
                hitting
            }
        }
    }

    /// Drops the record for an object that no longer exists.
    pub fn forget(&mut self, id: u64) {
        self.records.retain(|r| r.id != id);
    }

    pub fn record(&self, id: u64) -> Option<&HitRecord> {
        self.records.iter().find(|r| r.id == id)
    }

    fn insert(&mut self, record: HitRecord) {
        if self.records.len() >= self.capacity {
            // Prefer recycling a slot whose contact already ended.
            if let Some(idx) = self.records.iter().position(|r| !r.was_hitting) {
                self.records[idx] = record;
            } else {
                self.records[0] = record;
            }
        } else {
            self.records.push(record);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn continuous_contact_spawns_once() {
        let mut tracker = ContactTracker::default();
        let pos = Vec2::new(3.0, 4.0);

        // false -> true -> true -> true at a fixed position: one ripple.
        let spawns: Vec<bool> = (0..4).map(|_| tracker.report(7, pos, true)).collect();
        assert_eq!(spawns, vec![true, false, false, false]);
    }

    #[test]
    fn movement_past_threshold_retriggers() {
        let mut tracker = ContactTracker::new(4, 0.5);
        assert!(tracker.report(1, Vec2::ZERO, true));
        assert!(!tracker.report(1, Vec2::new(0.2, 0.0), true));
        assert!(tracker.report(1, Vec2::new(0.6, 0.0), true));
        // Threshold is measured from the last spawn position.
        assert!(!tracker.report(1, Vec2::new(0.7, 0.0), true));
    }

    #[test]
    fn rising_edge_after_separation_spawns_again() {
        let mut tracker = ContactTracker::default();
        assert!(tracker.report(1, Vec2::ZERO, true));
        assert!(!tracker.report(1, Vec2::ZERO, false));
        assert!(tracker.report(1, Vec2::ZERO, true));
    }

    #[test]
    fn objects_are_tracked_independently() {
        let mut tracker = ContactTracker::default();
        assert!(tracker.report(1, Vec2::ZERO, true));
        assert!(tracker.report(2, Vec2::ZERO, true));
        assert!(!tracker.report(1, Vec2::ZERO, true));
    }

    #[test]
    fn ended_contacts_are_recycled_when_full() {
        let mut tracker = ContactTracker::new(2, 0.5);
        tracker.report(1, Vec2::ZERO, true);
        tracker.report(2, Vec2::ZERO, true);
        tracker.report(1, Vec2::ZERO, false); // contact ends

        tracker.report(3, Vec2::ZERO, true);
        assert!(tracker.record(3).is_some());
        assert!(tracker.record(1).is_none());
        assert!(tracker.record(2).is_some());
    }

    #[test]
    fn non_hitting_report_of_unknown_object_is_ignored() {
        let mut tracker = ContactTracker::default();
        assert!(!tracker.report(9, Vec2::ZERO, false));
        assert!(tracker.record(9).is_none());
    }
}
