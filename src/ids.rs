use uuid::Uuid;

/// Source of the short identifiers carried by orders and order lines.
///
/// Kept behind a trait so tests can pin the generated ids.
pub trait IdGenerator: Send + Sync {
    fn next_short(&self) -> String;
}

/// Default generator: date prefix plus the first uuid block, e.g.
/// `250825-1c9e8f2a`. Unique enough per node for order volumes here.
#[derive(Debug, Default, Clone)]
pub struct ShortIdGenerator;

impl IdGenerator for ShortIdGenerator {
    fn next_short(&self) -> String {
        let date = chrono::Utc::now().format("%y%m%d");
        let suffix = Uuid::new_v4().simple().to_string();
        format!("{}-{}", date, &suffix[..8])
    }
}
