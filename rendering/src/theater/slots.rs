/// Integer-indexed storage where every slot is explicitly filled or empty.
///
/// Used for per-index assets that may legitimately be missing: an empty slot
/// means "nothing to draw", not an error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssetSlots<T> {
    slots: Vec<Option<T>>,
}

impl<T> Default for AssetSlots<T> {
    fn default() -> Self {
        Self { slots: Vec::new() }
    }
}

impl<T> AssetSlots<T> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_len(len: usize) -> Self {
        Self {
            slots: std::iter::repeat_with(|| None).take(len).collect(),
        }
    }

    pub fn push(&mut self, value: Option<T>) {
        self.slots.push(value);
    }

    /// Fills slot `index`, growing the container when needed.
    pub fn set(&mut self, index: usize, value: T) {
        if index >= self.slots.len() {
            self.slots.resize_with(index + 1, || None);
        }
        self.slots[index] = Some(value);
    }

    pub fn get(&self, index: usize) -> Option<&T> {
        self.slots.get(index).and_then(Option::as_ref)
    }

    pub fn is_present(&self, index: usize) -> bool {
        self.get(index).is_some()
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    pub fn present_count(&self) -> usize {
        self.slots.iter().filter(|s| s.is_some()).count()
    }

    pub fn iter(&self) -> impl Iterator<Item = Option<&T>> {
        self.slots.iter().map(Option::as_ref)
    }

    /// Filled slots with their indices.
    pub fn present(&self) -> impl Iterator<Item = (usize, &T)> {
        self.slots
            .iter()
            .enumerate()
            .filter_map(|(i, s)| s.as_ref().map(|v| (i, v)))
    }
}

impl<T> FromIterator<Option<T>> for AssetSlots<T> {
    fn from_iter<I: IntoIterator<Item = Option<T>>>(iter: I) -> Self {
        Self {
            slots: iter.into_iter().collect(),
        }
    }
}
