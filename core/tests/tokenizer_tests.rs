use postsearch_core::tokenizer::tokenize;

#[test]
fn it_normalizes_and_stems() {
    let toks = tokenize("Running Runners RUN! The café's menu.");
    let words: Vec<String> = toks.into_iter().map(|(w, _)| w).collect();
    assert!(words.contains(&"run".to_string()));
    // NFKC keeps the accent; only compatibility forms fold
    assert!(words.iter().any(|w| w.starts_with("café")));
}

#[test]
fn it_folds_fullwidth_letters() {
    let toks = tokenize("ＣＡＴ");
    assert_eq!(toks[0].0, "cat");
}

#[test]
fn it_filters_stopwords() {
    let toks = tokenize("The quick brown fox and the lazy dog");
    let words: Vec<String> = toks.into_iter().map(|(w, _)| w).collect();
    assert!(!words.contains(&"the".to_string()));
    assert!(!words.contains(&"and".to_string()));
}
