use std::fs;

use mumble::evaluate;
use walkdir::WalkDir;

#[test]
fn script_corpus_runs_clean() {
    let mut count = 0;

    for entry in
        WalkDir::new("tests/scripts").into_iter()
                                     .filter_map(Result::ok)
                                     .filter(|e| {
                                         e.path().extension().is_some_and(|ext| ext == "m")
                                     })
    {
        let path = entry.path();
        let source =
            fs::read_to_string(path).unwrap_or_else(|e| panic!("Failed to read {path:?}: {e}"));

        count += 1;
        let result = evaluate(&source);
        assert!(result.errors.is_empty(),
                "script {path:?} reported errors:\n{:#?}\noutput so far: {:?}",
                result.errors,
                result.output);
        assert!(!result.output.is_empty(),
                "script {path:?} produced no output");
    }

    assert!(count > 0, "No scripts found in tests/scripts");
}

#[test]
fn fizzbuzz_prints_the_classics() {
    let source = fs::read_to_string("tests/scripts/fizzbuzz.m").expect("missing file");
    let output = evaluate(&source).output;

    assert!(output.contains("\nfizz\n"));
    assert!(output.contains("\nbuzz\n"));
    assert!(output.ends_with("fizzbuzz"));
}
