#![no_main]

use copytab_lsp::registry::DocumentRegistry;
use libfuzzer_sys::fuzz_target;
use url::Url;

// Each input byte is one operation on a small universe of identifiers:
// low bit selects track vs untrack, the rest picks the document. Checks
// the registry invariants after every step.
fuzz_target!(|data: &[u8]| {
    let universe: Vec<Url> = (0..16)
        .map(|i| Url::parse(&format!("file:///doc_{i}.txt")).unwrap())
        .collect();

    let mut registry = DocumentRegistry::new();
    let mut first_tracked: Vec<Url> = Vec::new();

    for byte in data {
        let uri = &universe[usize::from(byte >> 1) % universe.len()];
        if byte & 1 == 0 {
            let added = registry.track(uri);
            if added {
                first_tracked.push(uri.clone());
            }
        } else {
            let removed = registry.untrack(uri);
            if removed {
                first_tracked.retain(|tracked| tracked != uri);
            }
        }

        let snapshot = registry.snapshot();

        // No duplicates, ever.
        for (i, left) in snapshot.iter().enumerate() {
            for right in &snapshot[i + 1..] {
                assert_ne!(left, right, "duplicate identifier in registry");
            }
        }

        // Iteration order equals first-tracked order of the survivors.
        assert_eq!(snapshot, first_tracked, "tracking order diverged");

        // Emptiness agrees with the length.
        assert_eq!(registry.is_empty(), snapshot.is_empty());
        assert_eq!(registry.len(), snapshot.len());
    }
});
