#![allow(dead_code)]
// Synthetic corpus shared by the benches.
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

pub fn generate_word(rng: &mut StdRng, max_length: usize) -> String {
    let length = rng.gen_range(1..=max_length);
    (0..length).map(|_| rng.gen_range(b'a'..=b'z') as char).collect()
}

pub fn generate_dictionary(rng: &mut StdRng, word_count: usize, max_length: usize) -> Vec<String> {
    let mut words: Vec<String> = (0..word_count).map(|_| generate_word(rng, max_length)).collect();
    words.sort();
    words.dedup();
    words
}

pub fn generate_query(rng: &mut StdRng, dictionary: &[String], max_word_count: usize) -> String {
    let word_count = rng.gen_range(1..=max_word_count);
    let words: Vec<&str> = (0..word_count)
        .map(|_| dictionary[rng.gen_range(0..dictionary.len())].as_str())
        .collect();
    words.join(" ")
}

pub fn generate_queries(rng: &mut StdRng, dictionary: &[String], query_count: usize, max_word_count: usize) -> Vec<String> {
    (0..query_count).map(|_| generate_query(rng, dictionary, max_word_count)).collect()
}

pub fn rng() -> StdRng {
    StdRng::seed_from_u64(5489)
}
