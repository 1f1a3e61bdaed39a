use rand::{rngs::StdRng, SeedableRng};
use rollcalc::parse::{self, DiagnosticKind};
use rollcalc::roll::{EvalError, MarkdownStringifier, Stringify};
use rollcalc::{roll, roll_with, Error, Outcome, RollContext};

fn seeded(seed: u64) -> RollContext<StdRng> {
    RollContext::new_bounded(1000, StdRng::seed_from_u64(seed))
}

fn keys(outcome: &Outcome) -> Vec<String> {
    outcome.metadata.keys().map(ToString::to_string).collect()
}

#[test]
fn plain_arithmetic() {
    let outcome = roll("5 + 5").unwrap();
    assert_eq!(outcome.value, 10);
    assert_eq!(keys(&outcome), ["5(0)", "5(1)"]);
    assert_eq!(roll("10/0").unwrap().value, 10);
    assert_eq!(roll("5^0").unwrap().value, 1);
    assert_eq!(roll("2^3").unwrap().value, 8);
}

#[test]
fn tagged_terms() {
    let outcome = roll("5 + 5 * 2[test][another one]").unwrap();
    assert_eq!(outcome.value, 15);
    assert_eq!(
        outcome.metadata.get("2(0)").unwrap().tags,
        ["test", "another one"]
    );

    let outcome = roll("(5[first] + 5[second]) * 2[third]").unwrap();
    assert_eq!(outcome.value, 20);
    assert_eq!(keys(&outcome), ["5(0)", "5(1)", "2(0)"]);
}

#[test]
fn one_sided_dice() {
    let outcome = roll("d1qu2[test] + 10").unwrap();
    assert_eq!(outcome.value, 12);
    let term = outcome.metadata.get("2d1[test](0)").unwrap();
    assert_eq!(term.raw_rolls, [1, 1]);
    assert_eq!(term.final_rolls, [1, 1]);
    assert_eq!(term.value, 2);

    let outcome = roll("d1qu4kh3 - 2").unwrap();
    assert_eq!(outcome.value, 1);
    let term = outcome.metadata.get("4d1kh3(0)").unwrap();
    assert_eq!(term.raw_rolls, [1, 1, 1, 1]);
    assert_eq!(term.final_rolls, [1, 1, 1]);
    assert_eq!(term.value, 3);
}

#[test]
fn seeded_rolls_repeat() {
    let first = roll_with("4d6kh3 + 2d20kl1 + 3", &mut seeded(7)).unwrap();
    let second = roll_with("4d6kh3 + 2d20kl1 + 3", &mut seeded(7)).unwrap();
    assert_eq!(first, second);

    let kept = first.metadata.get("4d6kh3(0)").unwrap();
    assert_eq!(kept.raw_rolls.len(), 4);
    assert_eq!(kept.final_rolls.len(), 3);
    assert!(kept.raw_rolls.iter().all(|x| (1..=6).contains(x)));
    let lowest = first.metadata.get("2d20kl1(0)").unwrap();
    assert_eq!(lowest.final_rolls, [*lowest.raw_rolls.iter().min().unwrap()]);
    assert_eq!(first.value, kept.value + lowest.value + 3);
}

#[test]
fn overview_notation() {
    let mut ctx = seeded(11);
    for _ in 0..100 {
        let outcome = roll_with("3d6kh2+4", &mut ctx).unwrap();
        assert!((6..=16).contains(&outcome.value), "{}", outcome.value);
    }
}

#[test]
fn parse_problems_are_errors() {
    let err = roll("(1 + 2").unwrap_err();
    match err {
        Error::Parse(diagnostics) => {
            assert_eq!(diagnostics.len(), 1);
            assert_eq!(diagnostics.0[0].kind, DiagnosticKind::UnclosedParen);
        }
        other => panic!("expected a parse error, got {:?}", other),
    }

    assert_eq!(
        roll("2 + foo").unwrap_err(),
        Error::Eval(EvalError::Illegal("foo".to_string()))
    );
    assert_eq!(roll("").unwrap_err().to_string(), "empty expression");
    assert_eq!(
        roll("1 % 0").unwrap_err().to_string(),
        "cannot take modulus by zero"
    );
}

#[test]
fn deep_nesting_is_a_parse_error() {
    let deep = format!("{}1{}", "(".repeat(100_000), ")".repeat(100_000));
    for input in ["(".repeat(100_000), deep, vec!["1"; 100_000].join("+")] {
        match roll(&input).unwrap_err() {
            Error::Parse(diagnostics) => {
                assert_eq!(diagnostics.len(), 1);
                assert_eq!(
                    diagnostics.0[0].kind,
                    DiagnosticKind::TooDeep(parse::DEFAULT_MAX_DEPTH)
                );
            }
            other => panic!("expected a parse error, got {:?}", other),
        }
    }

    let nested = format!("{}2{}", "(".repeat(100), ")".repeat(100));
    assert_eq!(roll(&nested).unwrap().value, 2);
}

#[test]
fn roll_limit() {
    let mut ctx = RollContext::new_bounded(10, StdRng::seed_from_u64(1));
    assert_eq!(
        roll_with("11d6", &mut ctx).unwrap_err(),
        Error::Eval(EvalError::TooManyRolls)
    );
    assert!(roll_with("10d6", &mut ctx).is_ok());
}

#[test]
fn lenient_evaluation() {
    let parsed = parse::parse("2 * (3 + 4");
    assert_eq!(parsed.diagnostics.len(), 1);
    let evaluation = seeded(0).eval(&parsed.program);
    assert_eq!(evaluation.value, Ok(14));
}

#[test]
fn json_round_trip() {
    let outcome = roll_with("2d6[fire] + 3 + 3", &mut seeded(3)).unwrap();
    let json = serde_json::to_value(&outcome).unwrap();

    let metadata = json["metadata"].as_object().unwrap();
    assert_eq!(metadata.len(), 3);
    assert_eq!(metadata["3(1)"]["value"], 3);
    assert_eq!(metadata["2d6[fire](0)"]["tags"][0], "fire");
    assert_eq!(json["value"], outcome.value);

    let text = serde_json::to_string(&outcome).unwrap();
    let back: Outcome = serde_json::from_str(&text).unwrap();
    assert_eq!(back, outcome);
    assert_eq!(keys(&back), ["2d6[fire](0)", "3(0)", "3(1)"]);
}

#[test]
fn markdown_rendering() {
    let outcome = roll("d1qu4kh3 - 2").unwrap();
    assert_eq!(
        MarkdownStringifier::new().stringify(&outcome),
        "**1**\n- `4d1kh3(0)`: [1, 1, 1, ~~1~~] = **3**\n- `2(0)` = **2**"
    );
}

#[test]
fn contexts_on_separate_threads() {
    let handles: Vec<_> = (0..4u64)
        .map(|seed| {
            std::thread::spawn(move || {
                let mut ctx = seeded(seed);
                (0..50)
                    .map(|_| roll_with("2d8 + 1", &mut ctx).unwrap().value)
                    .collect::<Vec<_>>()
            })
        })
        .collect();

    for (seed, handle) in handles.into_iter().enumerate() {
        let values = handle.join().unwrap();
        assert!(values.iter().all(|v| (3..=17).contains(v)));

        let mut ctx = seeded(seed as u64);
        let expected: Vec<_> = (0..50)
            .map(|_| roll_with("2d8 + 1", &mut ctx).unwrap().value)
            .collect();
        assert_eq!(values, expected);
    }
}
