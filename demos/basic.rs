use formlogic::{field, Action, FieldValues, RuleSetBuilder};

fn main() {
    // Define rules
    let ruleset = RuleSetBuilder::new()
        .rule("adult", |r| {
            r.name("Adult consent")
                .when(field("age").gt(18_i64))
                .then(Action::show("consent"))
                .then(Action::require("signature"))
        })
        .rule("minor", |r| {
            r.name("Guardian details")
                .when(field("age").lte(18_i64))
                .then(Action::show("guardian"))
        })
        .rule("newsletter", |r| {
            r.name("Newsletter opt-in")
                .when(field("email").is_not_empty())
                .when(field("tos").is_checked())
                .then(Action::enable("subscribe"))
        })
        .build()
        .expect("invalid rules");

    println!("{ruleset}");

    // Evaluate against the current form values
    let values = FieldValues::new()
        .set("age", 25_i64)
        .set("email", "pat@example.com")
        .set("tos", true);

    let session = ruleset.evaluate(&values);
    for line in session.trace() {
        println!("{line}");
    }
    println!("{session}");
    println!("consent visible: {:?}", session.snapshot().is_visible("consent"));
    println!("subscribe enabled: {:?}", session.snapshot().is_enabled("subscribe"));
}
