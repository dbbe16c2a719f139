#![no_main]
use girpack::RadixTree;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let words: Vec<&str> = data
        .split(|b| *b == b'\n')
        .filter_map(|w| str::from_utf8(w).ok())
        .filter(|w| !w.is_empty())
        .collect();

    let mut tree = RadixTree::new();
    for (i, word) in words.iter().enumerate() {
        tree.insert(word, i);
    }
    // Every inserted word must be found again, with its payload.
    for (i, word) in words.iter().enumerate() {
        let payloads = tree.lookup(word).unwrap();
        assert!(payloads.contains(&i));
    }
});
