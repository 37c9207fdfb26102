// Beat pattern - ordered slots, one per subdivision tick
// Rebuilt from scratch whenever beat count or multiplier changes

/// Which click sound a slot resolves to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClickRole {
    /// First slot of the very first beat (downbeat)
    Accent,
    /// First slot of every other beat
    Normal,
    /// Every remaining subdivision slot
    Subdivision,
}

/// One subdivision tick. Identity is purely positional (its index in the
/// pattern); a slot only knows which sound it plays.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Slot {
    pub role: ClickRole,
}

/// Ordered, fixed-length list of slots, length = `beats * multiplier`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pattern {
    slots: Vec<Slot>,
}

impl Pattern {
    /// Build a pattern of `beats` groups of `multiplier` slots each.
    ///
    /// Group 0's first slot uses `accent`, every other group's first slot
    /// uses `normal`, all non-first slots in every group use `filler`.
    /// Pure and deterministic; callers guard `beats >= 1` and
    /// `multiplier >= 1` before invoking.
    pub fn build(
        beats: u32,
        multiplier: u32,
        accent: ClickRole,
        normal: ClickRole,
        filler: ClickRole,
    ) -> Self {
        let mut slots = Vec::with_capacity((beats * multiplier) as usize);

        for group in 0..beats {
            let first = if group == 0 { accent } else { normal };
            slots.push(Slot { role: first });

            for _ in 1..multiplier {
                slots.push(Slot { role: filler });
            }
        }

        Self { slots }
    }

    /// Build with the conventional role assignment
    pub fn standard(beats: u32, multiplier: u32) -> Self {
        Self::build(
            beats,
            multiplier,
            ClickRole::Accent,
            ClickRole::Normal,
            ClickRole::Subdivision,
        )
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    pub fn slot(&self, index: usize) -> Option<Slot> {
        self.slots.get(index).copied()
    }

    pub fn slots(&self) -> &[Slot] {
        &self.slots
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pattern_length() {
        for beats in 1..=8u32 {
            for multiplier in 1..=8u32 {
                let pattern = Pattern::standard(beats, multiplier);
                assert_eq!(pattern.len(), (beats * multiplier) as usize);
            }
        }
    }

    #[test]
    fn test_role_assignment() {
        let pattern = Pattern::standard(4, 4);

        // 4 beats x 4 subdivisions = 16 slots
        assert_eq!(pattern.len(), 16);

        // Slot 0 is the downbeat accent
        assert_eq!(pattern.slot(0).unwrap().role, ClickRole::Accent);

        // First slot of every other group is normal
        for group_start in [4, 8, 12] {
            assert_eq!(pattern.slot(group_start).unwrap().role, ClickRole::Normal);
        }

        // Everything else is subdivision filler
        for index in 0..16 {
            if index % 4 != 0 {
                assert_eq!(pattern.slot(index).unwrap().role, ClickRole::Subdivision);
            }
        }
    }

    #[test]
    fn test_multiplier_one_has_no_filler() {
        let pattern = Pattern::standard(4, 1);
        assert_eq!(pattern.len(), 4);

        assert_eq!(pattern.slot(0).unwrap().role, ClickRole::Accent);
        for index in 1..4 {
            assert_eq!(pattern.slot(index).unwrap().role, ClickRole::Normal);
        }
    }

    #[test]
    fn test_single_beat() {
        let pattern = Pattern::standard(1, 3);
        assert_eq!(pattern.len(), 3);
        assert_eq!(pattern.slot(0).unwrap().role, ClickRole::Accent);
        assert_eq!(pattern.slot(1).unwrap().role, ClickRole::Subdivision);
        assert_eq!(pattern.slot(2).unwrap().role, ClickRole::Subdivision);
    }

    #[test]
    fn test_custom_roles() {
        // The builder is parametric over the three roles it places
        let pattern = Pattern::build(
            2,
            2,
            ClickRole::Normal,
            ClickRole::Normal,
            ClickRole::Normal,
        );
        assert!(pattern.slots().iter().all(|s| s.role == ClickRole::Normal));
    }

    #[test]
    fn test_out_of_range_slot() {
        let pattern = Pattern::standard(4, 4);
        assert!(pattern.slot(16).is_none());
    }
}
