use crc32fast::Hasher;

/// Derive a stable namespace id from a name using CRC32
pub fn get_document_id(name: &str) -> String {
    let mut buff = String::from(name);
    if !name.starts_with("folio://") {
        buff = format!("folio://{}", buff);
    }

    let mut hasher = Hasher::new();
    hasher.update(buff.as_bytes());
    format!("{:x}", hasher.finalize())
}

/// Sequential id generator for headings, frames, pages and index entries
#[derive(Debug, Clone, PartialEq)]
pub struct IDGenerator {
    seed: String,
    count: u32,
}

impl IDGenerator {
    pub fn new(namespace: &str) -> Self {
        Self {
            seed: get_document_id(namespace),
            count: 0,
        }
    }

    /// Generate next sequential id
    pub fn new_id(&mut self) -> String {
        self.count += 1;
        format!("{}-{}", self.seed, self.count)
    }

    /// Advance the counter past an id minted by this generator's seed.
    ///
    /// Used after loading persisted data so fresh ids never collide with
    /// ids already present in the payload.
    pub fn observe(&mut self, id: &str) {
        let Some(rest) = id.strip_prefix(self.seed.as_str()) else {
            return;
        };
        if let Some(n) = rest.strip_prefix('-').and_then(|n| n.parse::<u32>().ok()) {
            self.count = self.count.max(n);
        }
    }

    pub fn seed(&self) -> &str {
        &self.seed
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_document_id_generation() {
        let id1 = get_document_id("handbook");
        let id2 = get_document_id("handbook");
        assert_eq!(id1, id2);

        let id3 = get_document_id("release-notes");
        assert_ne!(id1, id3);
    }

    #[test]
    fn test_sequential_ids() {
        let mut gen = IDGenerator::new("handbook");

        let id1 = gen.new_id();
        let id2 = gen.new_id();

        assert!(id1.ends_with("-1"));
        assert!(id2.ends_with("-2"));
        assert!(id1.starts_with(gen.seed()));
    }

    #[test]
    fn test_observe_skips_existing_ids() {
        let mut gen = IDGenerator::new("layout");
        let seen = format!("{}-41", gen.seed());
        gen.observe(&seen);
        gen.observe("unrelated-99");

        assert_eq!(gen.new_id(), format!("{}-42", gen.seed()));
    }
}
