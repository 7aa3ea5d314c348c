use std::collections::HashSet;

use formlogic::{Engine, FieldValues, RuleSet};
use tracing_subscriber::EnvFilter;

const RULES: &str = r#"
rule vip "VIP tier":
    when spend >= 1000
    then set tier = "vip", show perks

rule perks "Perk picker":
    when tier == "vip"
    then enable perk-picker, require perk-picker

rule budget "Budget lock":
    when spend < 5000
    then disable perk-picker

rule promo "Promo banner":
    when coupon starts with "SPRING"
    then show banner
"#;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let ruleset = RuleSet::from_dsl(RULES).expect("failed to parse rules");
    let values = FieldValues::new().set("spend", 1200_i64).set("coupon", "spring-24");
    let breakpoints = HashSet::from(["perks".to_owned()]);
    let engine = Engine::default();

    // Run to the first breakpoint.
    let mut session = engine.run(ruleset.rules(), &values, &breakpoints, None);
    println!("{session}");
    for line in session.trace() {
        println!("  {line}");
    }

    // Step through the rest one rule at a time.
    while !session.is_complete() {
        session = engine.step(ruleset.rules(), &values, &breakpoints, &session);
        println!("{session}");
    }

    for line in session.trace() {
        println!("  {line}");
    }
    for conflict in session.conflicts() {
        println!("conflict: {conflict}");
    }

    println!("\nEdge cases:");
    for case in ruleset.edge_cases() {
        let replay = ruleset.evaluate(&case.values);
        println!("  {:<16} {}", case.label, replay.coverage());
    }
}
