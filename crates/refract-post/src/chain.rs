use crate::effect::{ChainEntry, EffectKind, PlacementMode};

/// Ordered list of effects applied every frame.
///
/// The chain starts from a seed whose length is the *floor*: `pop_last` never
/// removes seeded entries, and `reset` restores exactly the seed.
#[derive(Debug, Clone)]
pub struct EffectChain {
    entries: Vec<ChainEntry>,
    seed: Vec<ChainEntry>,
}

impl EffectChain {
    pub fn new(seed: Vec<ChainEntry>) -> Self {
        Self {
            entries: seed.clone(),
            seed,
        }
    }

    /// Three underwater passes, one per wall opening.
    pub fn default_seed() -> Vec<ChainEntry> {
        vec![ChainEntry::new(EffectKind::Underwater, PlacementMode::WindowPolygon); 3]
    }

    /// Appends without validation; duplicates are allowed.
    pub fn append(&mut self, effect: EffectKind, mode: PlacementMode) {
        self.entries.push(ChainEntry::new(effect, mode));
    }

    /// Appends both halves of the separable Gaussian blur.
    pub fn append_blur_pair(&mut self, mode: PlacementMode) {
        self.append(EffectKind::GaussianBlurHorizontal, mode);
        self.append(EffectKind::GaussianBlurVertical, mode);
    }

    /// Removes the most recent user entry and returns what was removed.
    ///
    /// A trailing vertical blur takes its horizontal half with it, as long as
    /// that half sits above the floor.
    pub fn pop_last(&mut self) -> Vec<ChainEntry> {
        let floor = self.floor();
        if self.entries.len() <= floor {
            return Vec::new();
        }

        let Some(last) = self.entries.pop() else {
            return Vec::new();
        };
        let mut removed = vec![last];

        if last.effect == EffectKind::GaussianBlurVertical
            && self.entries.len() > floor
            && self
                .entries
                .last()
                .is_some_and(|e| e.effect == EffectKind::GaussianBlurHorizontal)
        {
            if let Some(half) = self.entries.pop() {
                removed.insert(0, half);
            }
        }

        removed
    }

    pub fn reset(&mut self) {
        self.entries.clear();
        self.entries.extend_from_slice(&self.seed);
    }

    #[inline]
    pub fn floor(&self) -> usize {
        self.seed.len()
    }

    #[inline]
    pub fn entries(&self) -> &[ChainEntry] {
        &self.entries
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, ChainEntry> {
        self.entries.iter()
    }
}

impl Default for EffectChain {
    fn default() -> Self {
        Self::new(Self::default_seed())
    }
}

impl<'a> IntoIterator for &'a EffectChain {
    type Item = &'a ChainEntry;
    type IntoIter = std::slice::Iter<'a, ChainEntry>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use EffectKind::*;
    use PlacementMode::*;

    fn kinds(chain: &EffectChain) -> Vec<EffectKind> {
        chain.iter().map(|e| e.effect).collect()
    }

    // ── seeding ───────────────────────────────────────────────────────────

    #[test]
    fn default_is_three_window_underwater() {
        let chain = EffectChain::default();
        assert_eq!(chain.len(), 3);
        assert_eq!(chain.floor(), 3);
        assert!(chain.iter().all(|e| *e == ChainEntry::new(Underwater, WindowPolygon)));
    }

    #[test]
    fn reset_restores_seed() {
        let mut chain = EffectChain::default();
        chain.append(Tint, Fullscreen);
        chain.append(Burn, Area);
        chain.reset();
        assert_eq!(chain.entries(), EffectChain::default_seed().as_slice());
    }

    // ── append ────────────────────────────────────────────────────────────

    #[test]
    fn append_allows_duplicates() {
        let mut chain = EffectChain::new(Vec::new());
        chain.append(Tint, Fullscreen);
        chain.append(Tint, Fullscreen);
        assert_eq!(kinds(&chain), vec![Tint, Tint]);
    }

    #[test]
    fn blur_pair_is_horizontal_then_vertical() {
        let mut chain = EffectChain::new(Vec::new());
        chain.append_blur_pair(Area);
        assert_eq!(
            chain.entries(),
            &[
                ChainEntry::new(GaussianBlurHorizontal, Area),
                ChainEntry::new(GaussianBlurVertical, Area),
            ]
        );
    }

    // ── pop_last ──────────────────────────────────────────────────────────

    #[test]
    fn pop_at_floor_is_a_no_op() {
        let mut chain = EffectChain::default();
        assert!(chain.pop_last().is_empty());
        assert_eq!(chain.len(), 3);
    }

    #[test]
    fn pop_removes_one_entry() {
        let mut chain = EffectChain::default();
        chain.append(Tint, Fullscreen);
        chain.append(Burn, Fullscreen);
        assert_eq!(chain.pop_last(), vec![ChainEntry::new(Burn, Fullscreen)]);
        assert_eq!(chain.len(), 4);
    }

    #[test]
    fn pop_removes_blur_pair_together() {
        let mut chain = EffectChain::default();
        chain.append_blur_pair(Fullscreen);
        let removed = chain.pop_last();
        assert_eq!(
            removed,
            vec![
                ChainEntry::new(GaussianBlurHorizontal, Fullscreen),
                ChainEntry::new(GaussianBlurVertical, Fullscreen),
            ]
        );
        assert_eq!(chain.len(), 3);
    }

    #[test]
    fn lone_vertical_blur_pops_alone() {
        let mut chain = EffectChain::default();
        chain.append(Tint, Fullscreen);
        chain.append(GaussianBlurVertical, Fullscreen);
        assert_eq!(chain.pop_last().len(), 1);
        assert_eq!(kinds(&chain).last(), Some(&Tint));
    }

    #[test]
    fn blur_half_in_seed_is_protected() {
        let seed = vec![ChainEntry::new(GaussianBlurHorizontal, Fullscreen)];
        let mut chain = EffectChain::new(seed);
        chain.append(GaussianBlurVertical, Fullscreen);
        assert_eq!(chain.pop_last().len(), 1);
        assert_eq!(chain.len(), 1);
        assert_eq!(chain.entries()[0].effect, GaussianBlurHorizontal);
    }

    #[test]
    fn pop_never_goes_below_floor() {
        let mut chain = EffectChain::default();
        for _ in 0..4 {
            chain.append_blur_pair(Polygon);
        }
        for _ in 0..20 {
            chain.pop_last();
            assert!(chain.len() >= chain.floor());
        }
        assert_eq!(chain.len(), 3);
    }

    #[test]
    fn empty_seed_chain_can_empty_out() {
        let mut chain = EffectChain::new(Vec::new());
        chain.append(Copy, Fullscreen);
        chain.pop_last();
        assert!(chain.is_empty());
        assert!(chain.pop_last().is_empty());
    }
}
