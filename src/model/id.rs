use uuid::Uuid;

const ALPHABET: &[u8; 62] = b"0123456789ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz";

/// Default length of generated identifiers.
pub const ID_LEN: usize = 16;

/// Source of document-unique identifiers for new floors, zones and surfaces.
pub trait IdGenerator {
    fn next_id(&mut self) -> String;
}

/// Random base-62 identifiers drawn from UUID v4 entropy.
#[derive(Debug, Clone, Copy, Default)]
pub struct NanoIds;

impl IdGenerator for NanoIds {
    fn next_id(&mut self) -> String {
        let mut n = Uuid::new_v4().as_u128();
        let mut id = String::with_capacity(ID_LEN);
        for _ in 0..ID_LEN {
            id.push(ALPHABET[(n % 62) as usize] as char);
            n /= 62;
        }
        id
    }
}

/// Deterministic `prefix-1`, `prefix-2`, ... identifiers for tests and
/// reproducible batch runs. Callers must pick a prefix no existing id uses.
#[derive(Debug, Clone)]
pub struct SequentialIds {
    prefix: String,
    next: u64,
}

impl SequentialIds {
    #[must_use]
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
            next: 1,
        }
    }
}

impl IdGenerator for SequentialIds {
    fn next_id(&mut self) -> String {
        let id = format!("{}-{}", self.prefix, self.next);
        self.next += 1;
        id
    }
}
