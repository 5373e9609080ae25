//! Replays recorded interactions from a cassette.

use std::collections::HashMap;

use super::format::{Cassette, Interaction};

/// Key for indexing interactions by port and method.
#[derive(Debug, Clone, Hash, Eq, PartialEq)]
struct PortMethodKey {
    port: String,
    method: String,
}

/// Replays interactions from a loaded cassette, serving them sequentially
/// per port/method pair.
#[derive(Debug)]
pub struct CassetteReplayer {
    queues: HashMap<PortMethodKey, Vec<Interaction>>,
    cursors: HashMap<PortMethodKey, usize>,
}

impl CassetteReplayer {
    /// Create a new replayer from a loaded cassette.
    #[must_use]
    pub fn new(cassette: &Cassette) -> Self {
        let mut queues: HashMap<PortMethodKey, Vec<Interaction>> = HashMap::new();
        for interaction in &cassette.interactions {
            let key = PortMethodKey {
                port: interaction.port.clone(),
                method: interaction.method.clone(),
            };
            queues.entry(key).or_default().push(interaction.clone());
        }
        Self { queues, cursors: HashMap::new() }
    }

    /// Return the next interaction for the given port and method.
    ///
    /// # Errors
    ///
    /// Returns an error if the cassette has no (more) interactions for the
    /// given port/method combination.
    pub fn next_interaction(&mut self, port: &str, method: &str) -> Result<&Interaction, String> {
        let key = PortMethodKey { port: port.to_string(), method: method.to_string() };

        let Some(queue) = self.queues.get(&key) else {
            let mut available: Vec<String> =
                self.queues.keys().map(|k| format!("{}::{}", k.port, k.method)).collect();
            available.sort();
            return Err(format!(
                "Cassette exhausted: no interactions recorded for port={port:?} method={method:?}. \
                 Available port::method pairs: [{}]",
                available.join(", ")
            ));
        };

        let cursor = self.cursors.entry(key).or_insert(0);
        let interaction = queue.get(*cursor).ok_or_else(|| {
            format!(
                "Cassette exhausted: all {count} interactions for port={port:?} \
                 method={method:?} have been consumed.",
                count = queue.len(),
            )
        })?;
        *cursor += 1;
        Ok(interaction)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use serde_json::json;

    fn interaction(seq: u64, method: &str) -> Interaction {
        Interaction {
            seq,
            port: "thumbnail_service".into(),
            method: method.into(),
            input: json!({}),
            output: json!({"Ok": "QUJDRA=="}),
        }
    }

    fn make_cassette(interactions: Vec<Interaction>) -> Cassette {
        Cassette {
            name: "test".into(),
            recorded_at: Utc::now(),
            commit: "abc".into(),
            interactions,
        }
    }

    #[test]
    fn replay_in_order_per_method() {
        let cassette = make_cassette(vec![
            interaction(0, "generate"),
            interaction(1, "replicate"),
            interaction(2, "generate"),
        ]);
        let mut replayer = CassetteReplayer::new(&cassette);

        assert_eq!(replayer.next_interaction("thumbnail_service", "replicate").unwrap().seq, 1);
        assert_eq!(replayer.next_interaction("thumbnail_service", "generate").unwrap().seq, 0);
        assert_eq!(replayer.next_interaction("thumbnail_service", "generate").unwrap().seq, 2);
    }

    #[test]
    fn exhausted_replayer_errors() {
        let cassette = make_cassette(vec![interaction(0, "generate")]);
        let mut replayer = CassetteReplayer::new(&cassette);
        replayer.next_interaction("thumbnail_service", "generate").unwrap();

        let err = replayer.next_interaction("thumbnail_service", "generate").unwrap_err();
        assert!(err.contains("have been consumed"));
    }

    #[test]
    fn unknown_method_errors() {
        let cassette = make_cassette(vec![interaction(0, "generate")]);
        let mut replayer = CassetteReplayer::new(&cassette);
        let err = replayer.next_interaction("thumbnail_service", "replicate").unwrap_err();
        assert!(err.contains("no interactions recorded"));
        assert!(err.contains("thumbnail_service::generate"));
    }
}
