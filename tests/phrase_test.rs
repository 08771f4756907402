use phraselist::phrase::Phrase;

#[test]
fn test_sanitize_mixed_input() {
    let phrase = Phrase::sanitize("Don't Stop Me Now (2011 Remaster) - Queen!");
    assert_eq!(
        phrase.tokens(),
        ["don't", "stop", "me", "now", "remaster", "queen"]
    );
    assert_eq!(phrase.description(), "don't stop me now remaster queen");
    assert_eq!(phrase.len(), 6);
}

#[test]
fn test_sanitize_output_alphabet() {
    let inputs = [
        "Hello, World! It's a 'test'.",
        "ÄÖÜ straße café naïve",
        "tabs\tand\nnewlines",
        "  leading and   trailing  ",
        "1234567890 !@#$%^&*()",
        "",
    ];

    for input in inputs {
        let phrase = Phrase::sanitize(input);
        for token in phrase.tokens() {
            assert!(!token.is_empty(), "empty token for {:?}", input);
            assert!(
                token.chars().all(|c| c.is_ascii_lowercase() || c == '\''),
                "unexpected character in {:?} from {:?}",
                token,
                input
            );
        }
        assert!(!phrase.description().contains("  "));
    }
}

#[test]
fn test_sanitize_drops_non_ascii_letters() {
    let phrase = Phrase::sanitize("café straße");
    assert_eq!(phrase.tokens(), ["caf", "strae"]);
}

#[test]
fn test_display_matches_description() {
    let phrase = Phrase::sanitize("Good   Life");
    assert_eq!(phrase.to_string(), "good life");
}
