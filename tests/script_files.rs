use std::fs;

use abacus::interpreter::Interpreter;
use pretty_assertions::assert_eq;
use walkdir::WalkDir;

/// What a `# expect` annotation asks of the lines before it.
enum Expectation {
    Value(String),
    Error,
}

/// Splits a script into chunks, each ending at an annotation.
fn chunks(content: &str) -> Vec<(String, Expectation)> {
    let mut chunks = Vec::new();
    let mut buf = String::new();

    for line in content.lines() {
        let trimmed = line.trim();
        if let Some(expected) = trimmed.strip_prefix("# expect:") {
            chunks.push((std::mem::take(&mut buf), Expectation::Value(expected.trim().to_string())));
            continue;
        }
        if trimmed == "# expect-error" {
            chunks.push((std::mem::take(&mut buf), Expectation::Error));
            continue;
        }
        buf.push_str(line);
        buf.push('\n');
    }

    chunks
}

#[test]
fn script_files_produce_their_annotated_values() {
    let mut count = 0;

    for entry in WalkDir::new("tests/scripts").into_iter()
                                              .filter_map(Result::ok)
                                              .filter(|e| e.path().extension().is_some_and(|ext| ext == "calc"))
    {
        let path = entry.path();
        let content = fs::read_to_string(path).unwrap_or_else(|e| panic!("Failed to read {path:?}: {e}"));
        let mut interpreter = Interpreter::new();

        for (source, expectation) in chunks(&content) {
            count += 1;
            let result = interpreter.execute_script(&source);
            match expectation {
                Expectation::Value(expected) => {
                    let value = match result {
                        Ok(Some(value)) => value,
                        Ok(None) => panic!("{path:?}: no value from\n{source}"),
                        Err(e) => panic!("{path:?}: script failed:\n{source}\nError: {e}"),
                    };
                    assert_eq!(interpreter.format_value(&value), expected, "{path:?}:\n{source}");
                },
                Expectation::Error => {
                    assert!(result.is_err(), "{path:?}: script succeeded but was expected to fail:\n{source}");
                },
            }
        }
    }

    assert!(count > 0, "No annotated scripts found in tests/scripts");
}
