//! Memory context formatting and ranking

use std::cmp::Ordering;

use crate::domain::entities::{MemoryRecord, ScoredRecord};

pub const CONTEXT_HEADER: &str = "\n--- RELEVANT PAST CONTEXT ---\n";
pub const CONTEXT_FOOTER: &str = "-----------------------------\n";

/// Render ranked records as a delimited block, one `ROLE: text` line each.
///
/// Rank order is preserved. No records means no block at all.
pub fn format_context<'a, I>(records: I) -> String
where
    I: IntoIterator<Item = &'a MemoryRecord>,
{
    let mut body = String::new();
    for record in records {
        body.push_str(record.role.label());
        body.push_str(": ");
        body.push_str(&record.text);
        body.push('\n');
    }

    if body.is_empty() {
        return body;
    }

    format!("{CONTEXT_HEADER}{body}{CONTEXT_FOOTER}")
}

/// Cosine similarity in [-1.0, 1.0]; mismatched or zero vectors score 0.0.
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    if a.len() != b.len() || a.is_empty() {
        return 0.0;
    }

    let mut dot = 0.0f32;
    let mut norm_a = 0.0f32;
    let mut norm_b = 0.0f32;

    for (x, y) in a.iter().zip(b) {
        dot += x * y;
        norm_a += x * x;
        norm_b += y * y;
    }

    let denom = norm_a.sqrt() * norm_b.sqrt();
    if denom < f32::EPSILON {
        0.0
    } else {
        dot / denom
    }
}

/// Cosine distance in [0.0, 2.0]; smaller is more relevant.
pub fn cosine_distance(a: &[f32], b: &[f32]) -> f32 {
    1.0 - cosine_similarity(a, b)
}

/// Score candidates against a query embedding and keep the `limit` closest.
///
/// Ties fall back to creation time, then id, so identical inputs always
/// produce the same order.
pub fn rank(query: &[f32], candidates: Vec<MemoryRecord>, limit: usize) -> Vec<ScoredRecord> {
    let mut scored: Vec<ScoredRecord> = candidates
        .into_iter()
        .map(|record| ScoredRecord {
            distance: cosine_distance(query, &record.embedding),
            record,
        })
        .collect();

    scored.sort_by(|a, b| {
        a.distance
            .partial_cmp(&b.distance)
            .unwrap_or(Ordering::Equal)
            .then_with(|| a.record.timestamp.cmp(&b.record.timestamp))
            .then_with(|| a.record.id.cmp(&b.record.id))
    });
    scored.truncate(limit);
    scored
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::value_objects::Role;

    fn record(text: &str, role: Role, embedding: Vec<f32>) -> MemoryRecord {
        MemoryRecord::new("s1".to_string(), role, text.to_string(), embedding)
    }

    #[test]
    fn test_empty_records_give_empty_block() {
        let records: Vec<MemoryRecord> = vec![];
        assert_eq!(format_context(&records), "");
    }

    #[test]
    fn test_block_layout() {
        let records = vec![
            record("My name is Ada", Role::User, vec![]),
            record("Noted, Ada.", Role::Assistant, vec![]),
        ];
        assert_eq!(
            format_context(&records),
            "\n--- RELEVANT PAST CONTEXT ---\nUSER: My name is Ada\nASSISTANT: Noted, Ada.\n-----------------------------\n"
        );
    }

    #[test]
    fn test_cosine_similarity_edges() {
        assert!((cosine_similarity(&[1.0, 0.0], &[1.0, 0.0]) - 1.0).abs() < 1e-6);
        assert!(cosine_similarity(&[1.0, 0.0], &[0.0, 1.0]).abs() < 1e-6);
        assert!((cosine_similarity(&[1.0, 0.0], &[-1.0, 0.0]) + 1.0).abs() < 1e-6);
        assert_eq!(cosine_similarity(&[], &[]), 0.0);
        assert_eq!(cosine_similarity(&[1.0, 2.0], &[1.0, 2.0, 3.0]), 0.0);
        assert_eq!(cosine_similarity(&[0.0, 0.0], &[1.0, 0.0]), 0.0);
    }

    #[test]
    fn test_rank_orders_by_distance() {
        let candidates = vec![
            record("python", Role::User, vec![0.0, 0.0, 0.9, 0.1]),
            record("rust", Role::User, vec![0.9, 0.1, 0.0, 0.0]),
            record("mixed", Role::User, vec![0.5, 0.5, 0.0, 0.0]),
        ];
        let ranked = rank(&[0.85, 0.15, 0.0, 0.0], candidates, 3);
        let texts: Vec<&str> = ranked.iter().map(|s| s.record.text.as_str()).collect();
        assert_eq!(texts, vec!["rust", "mixed", "python"]);
        assert!(ranked[0].distance <= ranked[1].distance);
    }

    #[test]
    fn test_rank_ties_are_deterministic() {
        let first = record("first", Role::User, vec![1.0, 0.0]);
        std::thread::sleep(std::time::Duration::from_millis(2));
        let second = record("second", Role::User, vec![1.0, 0.0]);

        let a = rank(&[1.0, 0.0], vec![second.clone(), first.clone()], 2);
        let b = rank(&[1.0, 0.0], vec![first, second], 2);
        let order_a: Vec<&str> = a.iter().map(|s| s.record.text.as_str()).collect();
        let order_b: Vec<&str> = b.iter().map(|s| s.record.text.as_str()).collect();
        assert_eq!(order_a, vec!["first", "second"]);
        assert_eq!(order_a, order_b);
    }

    #[test]
    fn test_rank_truncates() {
        let candidates = (0..10)
            .map(|i| record(&format!("m{i}"), Role::User, vec![1.0, i as f32]))
            .collect();
        assert_eq!(rank(&[1.0, 0.0], candidates, 5).len(), 5);
    }
}
