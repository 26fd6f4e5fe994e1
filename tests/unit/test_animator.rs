//! Unit tests for the animator and scheduler working together
//!
//! Tests cover:
//! - The typing sequence for a chosen snippet
//! - Exactly L appends per snippet when stalls are off
//! - The line cap over long runs with real randomness

use nevera::animator::{Keystroke, ScriptedDice, Typewriter, TypingSettings};
use nevera::config::AnimationConfig;
use rand::rngs::StdRng;
use rand::SeedableRng;

fn deterministic(max_lines: usize) -> Typewriter {
    let config = AnimationConfig {
        stall_probability: 0.0,
        max_lines,
        ..AnimationConfig::default()
    };
    Typewriter::from_config(&config)
}

#[test]
fn test_example_sequence() {
    let mut tw = deterministic(50);
    let mut dice = ScriptedDice::new().with_picks([0]);
    let snippets = vec!["a=1".to_string(), "b=2".to_string()];
    tw.start_cycle(&snippets, &mut dice);

    let mut observed = Vec::new();
    loop {
        match tw.keystroke(&mut dice).keystroke {
            Keystroke::Typed(_) => observed.push(tw.buffer().last().unwrap().to_string()),
            Keystroke::Finished => break,
            other => panic!("unexpected keystroke {:?}", other),
        }
    }

    assert_eq!(observed, vec!["a", "a=", "a=1"]);
    assert_eq!(tw.buffer().last(), Some(""));
    assert_eq!(tw.buffer().len(), 2);
}

#[test]
fn test_append_count_matches_length() {
    let snippet = "function example1() { console.log('Example 1'); }";
    let mut tw = deterministic(50);
    let mut dice = StdRng::seed_from_u64(1);
    tw.begin(snippet);

    let mut appends = 0;
    while tw.keystroke(&mut dice).keystroke != Keystroke::Finished {
        appends += 1;
    }
    assert_eq!(appends, snippet.chars().count());
}

#[test]
fn test_random_run_respects_cap() {
    let settings = TypingSettings::default();
    let mut tw = Typewriter::new(settings, 50);
    let mut rng = StdRng::seed_from_u64(2024);
    let snippets: Vec<String> = (0..7).map(|i| format!("let x{} = {};", i, i * i)).collect();

    let mut stalls = 0;
    for _ in 0..200 {
        tw.start_cycle(&snippets, &mut rng);
        loop {
            match tw.keystroke(&mut rng).keystroke {
                Keystroke::Finished => break,
                Keystroke::Stalled => stalls += 1,
                _ => {}
            }
            assert!(tw.buffer().len() <= 50);
        }
    }

    assert_eq!(tw.buffer().len(), 50);
    assert_eq!(tw.buffer().last(), Some(""));
    assert!(stalls > 0, "a 10% stall chance should show up over 200 snippets");
    for line in tw.buffer().lines().take(49) {
        assert!(snippets.iter().any(|s| s == line), "unexpected line {:?}", line);
    }
}
