use crate::pitch::PitchType;
use fnv::FnvHashSet;

/// Pitch types currently toggled on for display.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ActiveFilter {
    types: FnvHashSet<PitchType>,
}

impl ActiveFilter {
    pub fn set(&mut self, pitch_type: &PitchType, enabled: bool) {
        if enabled {
            self.types.insert(pitch_type.clone());
        } else {
            self.types.remove(pitch_type);
        }
    }

    pub fn contains(&self, pitch_type: &PitchType) -> bool {
        self.types.contains(pitch_type)
    }

    pub fn clear(&mut self) {
        self.types.clear();
    }

    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }

    pub fn len(&self) -> usize {
        self.types.len()
    }

    /// Enabled types in sorted order.
    pub fn types(&self) -> Vec<PitchType> {
        let mut types: Vec<PitchType> = self.types.iter().cloned().collect();
        types.sort();
        types
    }
}
