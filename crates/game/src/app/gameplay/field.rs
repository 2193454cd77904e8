#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct Collectible {
    pub(crate) x: f32,
    pub(crate) y: f32,
}

impl Collectible {
    pub(crate) fn rect(&self) -> Rect {
        Rect::new(self.x, self.y, COLLECTIBLE_SIZE, COLLECTIBLE_SIZE)
    }
}

/// The live set of uncollected items. It shrinks in place as the player picks
/// things up and never refills itself; regeneration is the scene's call.
#[derive(Debug, Clone, Default, PartialEq)]
pub(crate) struct CollectibleField {
    items: Vec<Collectible>,
}

impl CollectibleField {
    /// Places `count` items uniformly at random, rejection-sampling each
    /// against `exclude` (normally the player's rectangle). Items may overlap
    /// each other. Sampling retries are capped; once the cap is hit the last
    /// candidate is kept even if it overlaps, so generation always
    /// terminates.
    pub(crate) fn generate<R: Rng>(
        count: u32,
        bounds: WorldBounds,
        exclude: Rect,
        rng: &mut R,
    ) -> Self {
        let mut items = Vec::with_capacity(count as usize);
        for _ in 0..count {
            items.push(place_outside(bounds, exclude, rng));
        }
        Self { items }
    }

    #[cfg(test)]
    pub(crate) fn from_items(items: Vec<Collectible>) -> Self {
        Self { items }
    }

    /// Removes every item intersecting `rect` in a single pass and returns
    /// how many were removed. Several items can go in one call.
    pub(crate) fn collect_at(&mut self, rect: Rect) -> usize {
        let before = self.items.len();
        self.items.retain(|item| !item.rect().intersects(&rect));
        before - self.items.len()
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub(crate) fn len(&self) -> usize {
        self.items.len()
    }

    pub(crate) fn items(&self) -> &[Collectible] {
        &self.items
    }
}

fn place_outside<R: Rng>(bounds: WorldBounds, exclude: Rect, rng: &mut R) -> Collectible {
    let mut candidate = sample_position(bounds, rng);
    let mut attempts = 1;
    while candidate.rect().intersects(&exclude) && attempts < MAX_PLACEMENT_ATTEMPTS {
        candidate = sample_position(bounds, rng);
        attempts += 1;
    }
    candidate
}

fn sample_position<R: Rng>(bounds: WorldBounds, rng: &mut R) -> Collectible {
    Collectible {
        x: rng.gen_range(0.0..bounds.width - COLLECTIBLE_SIZE),
        y: rng.gen_range(0.0..bounds.height - COLLECTIBLE_SIZE),
    }
}
